//! Linguistic analysis collaborators
//!
//! The parser and the semantic role labeler live outside this crate. They are
//! constructed once by the caller and passed in by reference; every call is a
//! synchronous, possibly slow inference with no retry.
//!
//! `PrecomputedAnalyzer` / `PrecomputedLabeler` serve analyses produced ahead
//! of time by an external model (JSON array or JSON lines), keyed by text.

use cskg_table::{SrlFrame, SrlParse};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

use crate::{AnalysisError, Document};

/// Syntactic analysis: text in, tokens + dependency arcs + noun chunks out
pub trait LinguisticAnalyzer {
    fn analyze(&self, text: &str) -> Result<Document, AnalysisError>;
}

/// Semantic role labeling of a single sentence
pub trait RoleLabeler {
    fn label(&self, sentence: &str) -> Result<SrlParse, AnalysisError>;
}

impl<T: LinguisticAnalyzer + ?Sized> LinguisticAnalyzer for &T {
    fn analyze(&self, text: &str) -> Result<Document, AnalysisError> {
        (**self).analyze(text)
    }
}

impl<T: RoleLabeler + ?Sized> RoleLabeler for &T {
    fn label(&self, sentence: &str) -> Result<SrlParse, AnalysisError> {
        (**self).label(sentence)
    }
}

/// Records from a JSON array (`[...]`) or from JSON lines
fn parse_records<T: serde::de::DeserializeOwned>(text: &str) -> Result<Vec<T>, AnalysisError> {
    if text.trim_start().starts_with('[') {
        return Ok(serde_json::from_str(text)?);
    }
    text.lines()
        .filter(|l| !l.trim().is_empty())
        .map(|l| serde_json::from_str(l).map_err(AnalysisError::from))
        .collect()
}

// ============================================================================
// Precomputed dependency analyses
// ============================================================================

/// Serves documents parsed ahead of time, looked up by exact text
#[derive(Debug, Clone, Default)]
pub struct PrecomputedAnalyzer {
    documents: HashMap<String, Document>,
}

impl PrecomputedAnalyzer {
    pub fn from_documents(
        documents: impl IntoIterator<Item = Document>,
    ) -> Result<Self, AnalysisError> {
        let mut map = HashMap::new();
        for doc in documents {
            doc.validate()?;
            map.insert(doc.text.clone(), doc);
        }
        Ok(Self { documents: map })
    }

    pub fn from_json_str(text: &str) -> Result<Self, AnalysisError> {
        Self::from_documents(parse_records::<Document>(text)?)
    }

    pub fn load(path: &Path) -> Result<Self, AnalysisError> {
        let text = std::fs::read_to_string(path)?;
        let analyzer = Self::from_json_str(&text)?;
        tracing::info!(
            path = %path.display(),
            documents = analyzer.len(),
            "loaded precomputed analyses"
        );
        Ok(analyzer)
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

impl LinguisticAnalyzer for PrecomputedAnalyzer {
    fn analyze(&self, text: &str) -> Result<Document, AnalysisError> {
        self.documents
            .get(text)
            .cloned()
            .ok_or_else(|| AnalysisError::Missing(text.to_string()))
    }
}

// ============================================================================
// Precomputed semantic role labels
// ============================================================================

/// One verb frame as emitted by the SRL predictor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredictedVerb {
    pub verb: String,
    pub description: String,
    pub tags: Vec<String>,
}

/// Predictor output for one sentence
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredictedSentence {
    pub sentence: String,
    pub words: Vec<String>,
    #[serde(default)]
    pub verbs: Vec<PredictedVerb>,
}

impl PredictedSentence {
    pub fn into_parse(self) -> SrlParse {
        SrlParse {
            words: self.words,
            frames: self
                .verbs
                .into_iter()
                .map(|v| SrlFrame {
                    description: v.description,
                    verb: v.verb,
                    tags: v.tags,
                })
                .collect(),
        }
    }
}

/// Serves SRL predictions made ahead of time, looked up by sentence
#[derive(Debug, Clone, Default)]
pub struct PrecomputedLabeler {
    parses: HashMap<String, SrlParse>,
}

impl PrecomputedLabeler {
    pub fn from_predictions(
        predictions: impl IntoIterator<Item = PredictedSentence>,
    ) -> Result<Self, AnalysisError> {
        let mut parses = HashMap::new();
        for p in predictions {
            if let Some(v) = p.verbs.iter().find(|v| v.tags.len() != p.words.len()) {
                return Err(AnalysisError::Invalid(format!(
                    "`{}`: frame `{}` has {} tags for {} words",
                    p.sentence,
                    v.verb,
                    v.tags.len(),
                    p.words.len()
                )));
            }
            parses.insert(p.sentence.clone(), p.into_parse());
        }
        Ok(Self { parses })
    }

    pub fn from_json_str(text: &str) -> Result<Self, AnalysisError> {
        Self::from_predictions(parse_records::<PredictedSentence>(text)?)
    }

    pub fn load(path: &Path) -> Result<Self, AnalysisError> {
        let text = std::fs::read_to_string(path)?;
        let labeler = Self::from_json_str(&text)?;
        tracing::info!(
            path = %path.display(),
            sentences = labeler.len(),
            "loaded precomputed role labels"
        );
        Ok(labeler)
    }

    pub fn len(&self) -> usize {
        self.parses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parses.is_empty()
    }
}

impl RoleLabeler for PrecomputedLabeler {
    fn label(&self, sentence: &str) -> Result<SrlParse, AnalysisError> {
        self.parses
            .get(sentence)
            .cloned()
            .ok_or_else(|| AnalysisError::Missing(sentence.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOCS: &str = r#"
{"text": "cats sleep", "tokens": [{"text": "cats", "lemma": "cat", "pos": "NOUN", "dep": "nsubj", "head": 1}, {"text": "sleep", "lemma": "sleep", "pos": "VERB", "dep": "ROOT", "head": 1, "whitespace": false}], "noun_chunks": [{"start": 0, "end": 1, "root": 0}]}
{"text": "run", "tokens": [{"text": "run", "lemma": "run", "pos": "VERB", "dep": "ROOT", "head": 0}]}
"#;

    #[test]
    fn json_lines_documents() {
        let analyzer = PrecomputedAnalyzer::from_json_str(DOCS).unwrap();
        assert_eq!(analyzer.len(), 2);
        let doc = analyzer.analyze("cats sleep").unwrap();
        assert_eq!(doc.dependency_signature(), "nsubj-ROOT");
        assert!(analyzer.analyze("run").unwrap().noun_chunks.is_empty());
        assert!(matches!(
            analyzer.analyze("dogs bark"),
            Err(AnalysisError::Missing(_))
        ));
    }

    #[test]
    fn json_array_predictions() {
        let json = r#"[{
            "sentence": "PersonX adopts a cat",
            "words": ["PersonX", "adopts", "a", "cat"],
            "verbs": [{
                "verb": "adopts",
                "description": "[ARG0: PersonX] [V: adopts] [ARG1: a cat]",
                "tags": ["B-ARG0", "B-V", "B-ARG1", "I-ARG1"]
            }]
        }]"#;
        let labeler = PrecomputedLabeler::from_json_str(json).unwrap();
        let parse = labeler.label("PersonX adopts a cat").unwrap();
        assert_eq!(parse.words.len(), 4);
        assert_eq!(parse.frames[0].verb, "adopts");
        assert_eq!(parse.frames[0].tags[1], "B-V");
    }

    #[test]
    fn tag_count_must_match_words() {
        let json = r#"{"sentence": "a b", "words": ["a", "b"], "verbs": [{"verb": "b", "description": "", "tags": ["O"]}]}"#;
        assert!(matches!(
            PrecomputedLabeler::from_json_str(json),
            Err(AnalysisError::Invalid(_))
        ));
    }
}
