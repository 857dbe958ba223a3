//! Plain-text rendering of a dependency parse

use crate::Document;

const HEADER: [&str; 5] = ["#", "token", "dep", "head", "pos"];

/// Aligned table: index, token, dependency label, head (index:text), POS
pub fn render_dependency_parse(doc: &Document) -> String {
    let rows: Vec<[String; 5]> = doc
        .tokens
        .iter()
        .enumerate()
        .map(|(i, t)| {
            [
                i.to_string(),
                t.text.clone(),
                t.dep.clone(),
                match doc.tokens.get(t.head) {
                    Some(head) => format!("{}:{}", t.head, head.text),
                    None => format!("{}:?", t.head),
                },
                t.pos.clone(),
            ]
        })
        .collect();

    let mut widths = HEADER.map(str::len);
    for row in &rows {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    let mut push_line = |cells: &[&str]| {
        let line = cells
            .iter()
            .zip(widths)
            .map(|(c, w)| format!("{:<w$}", c, w = w))
            .collect::<Vec<_>>()
            .join("  ");
        out.push_str(line.trim_end());
        out.push('\n');
    };
    push_line(&HEADER);
    for row in &rows {
        let cells: Vec<&str> = row.iter().map(String::as_str).collect();
        push_line(&cells);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Token;

    #[test]
    fn renders_one_line_per_token() {
        let doc = Document::new(
            vec![
                Token::new("cats", "cat", "NOUN", "nsubj", 1),
                Token::new("sleep", "sleep", "VERB", "ROOT", 1),
            ],
            vec![],
        );
        let text = render_dependency_parse(&doc);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "#  token  dep    head     pos");
        assert_eq!(lines[1], "0  cats   nsubj  1:sleep  NOUN");
        assert_eq!(lines[2], "1  sleep  ROOT   1:sleep  VERB");
    }

    #[test]
    fn dangling_head_is_marked() {
        let doc = Document::new(vec![Token::new("cats", "cat", "NOUN", "nsubj", 4)], vec![]);
        let text = render_dependency_parse(&doc);
        assert_eq!(text.lines().nth(1), Some("0  cats   nsubj  4:?   NOUN"));
    }
}
