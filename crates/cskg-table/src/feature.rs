//! Row features: derived columns attached to a relation table

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of per-row analysis that can be attached as a derived column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AnalysisKind {
    /// Semantic role labeling of the head phrase
    SemanticRoles,
    /// Dependency parse of the head phrase
    Dependency,
}

impl AnalysisKind {
    /// Resolve a requested analysis name (`srl`, `dp`, `dep`)
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "srl" => Some(AnalysisKind::SemanticRoles),
            "dp" | "dep" => Some(AnalysisKind::Dependency),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            AnalysisKind::SemanticRoles => "srl",
            AnalysisKind::Dependency => "dep",
        }
    }
}

impl fmt::Display for AnalysisKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One token's dependency arc, seen from the token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyArc {
    pub token: String,
    pub dep: String,
    /// Text of the syntactic head
    pub head: String,
    /// Part of speech of the syntactic head
    pub head_pos: String,
    /// Children of the syntactic head, in document order
    pub children: Vec<String>,
}

/// One verb frame of a semantic role labeling
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SrlFrame {
    /// Bracketed frame description, e.g. `[ARG0: PersonX] [V: adopts] [ARG1: a cat]`
    pub description: String,
    pub verb: String,
    /// BIO role tags, one per word
    pub tags: Vec<String>,
}

/// Semantic role labeling of a sentence
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SrlParse {
    pub words: Vec<String>,
    pub frames: Vec<SrlFrame>,
}

/// A feature value for a single row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RowFeature {
    SemanticRoles(SrlParse),
    Dependency(Vec<DependencyArc>),
}

impl RowFeature {
    pub fn kind(&self) -> AnalysisKind {
        match self {
            RowFeature::SemanticRoles(_) => AnalysisKind::SemanticRoles,
            RowFeature::Dependency(_) => AnalysisKind::Dependency,
        }
    }
}
