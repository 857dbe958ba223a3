//! Test doubles for the analysis collaborators

#![allow(dead_code)]

use cskg_nlp::{AnalysisError, ChunkSpan, Document, LinguisticAnalyzer, RoleLabeler, Token};
use cskg_table::{SrlFrame, SrlParse};
use std::cell::RefCell;
use std::collections::HashMap;

/// (text, lemma, pos, dep, head)
pub type TokenSpec<'a> = (&'a str, &'a str, &'a str, &'a str, usize);

pub fn doc(tokens: &[TokenSpec<'_>], chunks: &[(usize, usize, usize)]) -> Document {
    Document::new(
        tokens
            .iter()
            .map(|&(text, lemma, pos, dep, head)| Token::new(text, lemma, pos, dep, head))
            .collect(),
        chunks
            .iter()
            .map(|&(start, end, root)| ChunkSpan { start, end, root })
            .collect(),
    )
}

/// "The cat sleeps", "Dogs bark", "Birds sing", "Fish swim"
pub fn corpus() -> Vec<Document> {
    vec![
        doc(
            &[
                ("The", "the", "DET", "det", 1),
                ("cat", "cat", "NOUN", "nsubj", 2),
                ("sleeps", "sleep", "VERB", "ROOT", 2),
            ],
            &[(0, 2, 1)],
        ),
        doc(
            &[("Dogs", "dog", "NOUN", "nsubj", 1), ("bark", "bark", "VERB", "ROOT", 1)],
            &[(0, 1, 0)],
        ),
        doc(
            &[("Birds", "bird", "NOUN", "nsubj", 1), ("sing", "sing", "VERB", "ROOT", 1)],
            &[(0, 1, 0)],
        ),
        doc(
            &[("Fish", "fish", "NOUN", "nsubj", 1), ("swim", "swim", "VERB", "ROOT", 1)],
            &[(0, 1, 0)],
        ),
    ]
}

/// Analyzer serving fixed documents and counting calls per text
#[derive(Default)]
pub struct CountingAnalyzer {
    docs: HashMap<String, Document>,
    calls: RefCell<HashMap<String, usize>>,
}

impl CountingAnalyzer {
    pub fn new(docs: impl IntoIterator<Item = Document>) -> Self {
        Self {
            docs: docs.into_iter().map(|d| (d.text.clone(), d)).collect(),
            calls: RefCell::new(HashMap::new()),
        }
    }

    pub fn calls(&self, text: &str) -> usize {
        self.calls.borrow().get(text).copied().unwrap_or(0)
    }

    pub fn total_calls(&self) -> usize {
        self.calls.borrow().values().sum()
    }
}

impl LinguisticAnalyzer for CountingAnalyzer {
    fn analyze(&self, text: &str) -> Result<Document, AnalysisError> {
        *self.calls.borrow_mut().entry(text.to_string()).or_default() += 1;
        self.docs
            .get(text)
            .cloned()
            .ok_or_else(|| AnalysisError::Missing(text.to_string()))
    }
}

/// Labeler producing a single `[V: ...]` frame on the last word, counting calls
#[derive(Default)]
pub struct CountingLabeler {
    calls: RefCell<usize>,
}

impl CountingLabeler {
    pub fn calls(&self) -> usize {
        *self.calls.borrow()
    }
}

impl RoleLabeler for CountingLabeler {
    fn label(&self, sentence: &str) -> Result<SrlParse, AnalysisError> {
        *self.calls.borrow_mut() += 1;
        let words: Vec<String> = sentence.split_whitespace().map(str::to_string).collect();
        let Some(verb) = words.last().cloned() else {
            return Err(AnalysisError::Backend("empty sentence".to_string()));
        };
        let mut tags = vec!["O".to_string(); words.len()];
        if let Some(last) = tags.last_mut() {
            *last = "B-V".to_string();
        }
        Ok(SrlParse {
            frames: vec![SrlFrame {
                description: format!("[V: {verb}]"),
                verb,
                tags,
            }],
            words,
        })
    }
}
