//! Linguistic features for CSKG relation tables
//!
//! Builds syntactic and semantic features on top of external analysis
//! collaborators:
//! - per-cell dependency parses (optionally dumped under a dated file name)
//! - lemmatized verbs governing a given dependency relation
//! - dependency-pattern histograms over distinct documents
//! - noun-chunk inventories
//! - SRL / dependency columns attached to the table itself
//!
//! The parser and the role labeler are passed in explicitly; nothing here
//! holds a global model instance.

pub mod analyzer;
pub mod document;
pub mod features;
pub mod render;

pub use analyzer::*;
pub use document::*;
pub use features::*;
pub use render::render_dependency_parse;

use cskg_storage::StorageError;
use cskg_table::TableError;

// ============================================================================
// Errors
// ============================================================================

/// Failure of an analysis collaborator
#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    #[error("no analysis available for `{0}`")]
    Missing(String),

    #[error("analysis backend failed: {0}")]
    Backend(String),

    #[error("invalid analysis: {0}")]
    Invalid(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum FeatureError {
    #[error("parse type `{0}` not implemented (expected srl, dp or dep)")]
    UnsupportedAnalysis(String),

    #[error("semantic role labeling requested but no role labeler was provided")]
    MissingLabeler,

    #[error(transparent)]
    Analysis(#[from] AnalysisError),

    #[error(transparent)]
    Table(#[from] TableError),

    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}
