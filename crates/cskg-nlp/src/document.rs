//! Analyzed document model
//!
//! Mirrors what a dependency parser hands back: tokens pointing at their
//! syntactic head by index (the root points at itself) and noun-chunk spans
//! with a root token.

use serde::{Deserialize, Serialize};

use crate::AnalysisError;

/// Universal POS tag for verbs
pub const VERB: &str = "VERB";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub text: String,
    pub lemma: String,
    /// Universal part-of-speech tag
    pub pos: String,
    /// Dependency label
    pub dep: String,
    /// Index of the syntactic head within the document
    pub head: usize,
    /// Whether a space follows the token
    #[serde(default = "default_true")]
    pub whitespace: bool,
}

fn default_true() -> bool {
    true
}

impl Token {
    pub fn new(
        text: impl Into<String>,
        lemma: impl Into<String>,
        pos: impl Into<String>,
        dep: impl Into<String>,
        head: usize,
    ) -> Self {
        Self {
            text: text.into(),
            lemma: lemma.into(),
            pos: pos.into(),
            dep: dep.into(),
            head,
            whitespace: true,
        }
    }
}

/// Noun chunk as a token span `[start, end)` with its root token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkSpan {
    pub start: usize,
    pub end: usize,
    pub root: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub text: String,
    pub tokens: Vec<Token>,
    #[serde(default)]
    pub noun_chunks: Vec<ChunkSpan>,
}

impl Document {
    /// Build a document whose text is the tokens joined by their whitespace
    pub fn new(mut tokens: Vec<Token>, noun_chunks: Vec<ChunkSpan>) -> Self {
        if let Some(last) = tokens.last_mut() {
            last.whitespace = false;
        }
        let text = join_tokens(&tokens);
        Self {
            text,
            tokens,
            noun_chunks,
        }
    }

    /// Check head indices and chunk bounds
    pub fn validate(&self) -> Result<(), AnalysisError> {
        let n = self.tokens.len();
        for (i, t) in self.tokens.iter().enumerate() {
            if t.head >= n {
                return Err(AnalysisError::Invalid(format!(
                    "`{}`: token {} has head {} outside {} tokens",
                    self.text, i, t.head, n
                )));
            }
        }
        for c in &self.noun_chunks {
            if c.start >= c.end || c.end > n || c.root < c.start || c.root >= c.end {
                return Err(AnalysisError::Invalid(format!(
                    "`{}`: bad noun chunk {:?}",
                    self.text, c
                )));
            }
        }
        Ok(())
    }

    pub fn head_of(&self, i: usize) -> &Token {
        &self.tokens[self.tokens[i].head]
    }

    /// Syntactic children of token `i`, in document order
    pub fn children_of(&self, i: usize) -> impl Iterator<Item = &Token> + '_ {
        self.tokens
            .iter()
            .enumerate()
            .filter(move |(j, t)| *j != i && t.head == i)
            .map(|(_, t)| t)
    }

    pub fn span_text(&self, start: usize, end: usize) -> String {
        join_tokens(&self.tokens[start..end])
    }

    /// Dependency labels of all tokens, hyphen-joined in document order
    pub fn dependency_signature(&self) -> String {
        self.tokens
            .iter()
            .map(|t| t.dep.as_str())
            .collect::<Vec<_>>()
            .join("-")
    }
}

fn join_tokens(tokens: &[Token]) -> String {
    let mut out = String::new();
    for (i, t) in tokens.iter().enumerate() {
        out.push_str(&t.text);
        if t.whitespace && i + 1 < tokens.len() {
            out.push(' ');
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    /// "The cat sleeps"
    fn doc() -> Document {
        Document::new(
            vec![
                Token::new("The", "the", "DET", "det", 1),
                Token::new("cat", "cat", "NOUN", "nsubj", 2),
                Token::new("sleeps", "sleep", "VERB", "ROOT", 2),
            ],
            vec![ChunkSpan {
                start: 0,
                end: 2,
                root: 1,
            }],
        )
    }

    #[test]
    fn text_and_signature() {
        let d = doc();
        assert_eq!(d.text, "The cat sleeps");
        assert_eq!(d.dependency_signature(), "det-nsubj-ROOT");
        assert_eq!(d.span_text(0, 2), "The cat");
    }

    #[test]
    fn root_is_not_its_own_child() {
        let d = doc();
        let children: Vec<_> = d.children_of(2).map(|t| t.text.as_str()).collect();
        assert_eq!(children, vec!["cat"]);
        assert_eq!(d.head_of(2).text, "sleeps");
    }

    #[test]
    fn validate_rejects_dangling_head() {
        let mut d = doc();
        assert!(d.validate().is_ok());
        d.tokens[0].head = 9;
        assert!(matches!(d.validate(), Err(AnalysisError::Invalid(_))));
    }
}
