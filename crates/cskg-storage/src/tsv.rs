//! Delimited text export of a relation table
//!
//! Layout: a header line `index\thead\trelation\ttail`, then one line per row.
//! A missing tail is written as an empty field. Tabs, line breaks and
//! backslashes inside a cell are written as `\t`, `\n`, `\r` and `\\`.

use cskg_table::{RelationTable, Triple};
use std::io::{BufRead, Write};
use std::path::Path;

use crate::{Result, StorageError};

pub const EXPORT_HEADER: [&str; 4] = ["index", "head", "relation", "tail"];

/// Write the table as TSV with its row index
pub fn write_export<W: Write>(table: &RelationTable, mut out: W) -> Result<()> {
    writeln!(out, "{}", EXPORT_HEADER.join("\t"))?;
    for (id, triple) in table.rows() {
        writeln!(
            out,
            "{}\t{}\t{}\t{}",
            id,
            escape(&triple.head),
            escape(&triple.relation),
            escape(triple.tail.as_deref().unwrap_or(""))
        )?;
    }
    out.flush()?;
    Ok(())
}

/// Read a table back from its TSV export
///
/// The index column must be contiguous from zero; feature columns are not part
/// of the export and come back empty.
pub fn read_export(path: &Path) -> Result<RelationTable> {
    let file = std::fs::File::open(path)?;
    let reader = std::io::BufReader::new(file);
    let mut table = RelationTable::new();

    let malformed = |line: usize, message: String| StorageError::MalformedExport {
        path: path.to_path_buf(),
        line,
        message,
    };

    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        let line_no = i + 1;
        if i == 0 {
            if line.trim_end_matches('\r') != EXPORT_HEADER.join("\t") {
                return Err(malformed(line_no, "missing export header".to_string()));
            }
            continue;
        }
        let line = line.trim_end_matches('\r');
        if line.is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split('\t').collect();
        if fields.len() != EXPORT_HEADER.len() {
            return Err(malformed(
                line_no,
                format!("expected {} fields, got {}", EXPORT_HEADER.len(), fields.len()),
            ));
        }
        let index: usize = fields[0]
            .parse()
            .map_err(|_| malformed(line_no, format!("bad index `{}`", fields[0])))?;
        if index != table.len() {
            return Err(malformed(
                line_no,
                format!("index {} out of sequence (expected {})", index, table.len()),
            ));
        }
        let cells = [fields[1], fields[2], fields[3]]
            .map(unescape)
            .into_iter()
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|message| malformed(line_no, message))?;
        let tail = (!cells[2].is_empty()).then_some(cells[2].as_str());
        table.push(Triple::new(cells[0].as_str(), cells[1].as_str(), tail));
    }

    Ok(table)
}

fn escape(cell: &str) -> String {
    let mut out = String::with_capacity(cell.len());
    for c in cell.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\t' => out.push_str("\\t"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            c => out.push(c),
        }
    }
    out
}

fn unescape(cell: &str) -> std::result::Result<String, String> {
    let mut out = String::with_capacity(cell.len());
    let mut chars = cell.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('\\') => out.push('\\'),
            Some('t') => out.push('\t'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            other => {
                return Err(format!(
                    "bad escape `\\{}` in `{}`",
                    other.map(String::from).unwrap_or_default(),
                    cell
                ))
            }
        }
    }
    Ok(out)
}
