//! Commonsense triple ingestion for CSKG
//!
//! Turns a directory of headerless triple tables into one `RelationTable` and
//! prepares it for feature extraction:
//! - `loader`: merge every `*.tsv` in a directory into one contiguous table
//! - `categories`: physical/entity, social and event views by relation exclusion
//! - `sample`: all (relation, tail) pairs attached to a head phrase
//! - `placeholders`: replace `PersonX`/`PersonY`/`PersonZ` markers with
//!   distinct names drawn from a caller-owned pool
//!
//! Loading and normalization are fatal on error: a malformed file aborts the
//! whole load, and an exhausted name pool aborts normalization.

use cskg_storage::StorageError;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub mod categories;
pub mod loader;
pub mod placeholders;
pub mod sample;

pub use categories::*;
pub use loader::*;
pub use placeholders::*;
pub use sample::*;

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot list source directory: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("malformed triple table {path} (line {line}): {message}")]
    Malformed {
        path: PathBuf,
        line: usize,
        message: String,
    },

    #[error("triple table {path} has no rows")]
    Empty { path: PathBuf },

    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

// ============================================================================
// Configuration
// ============================================================================

/// Ingestion and normalization settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestConfig {
    /// Directory holding the per-relation triple tables
    pub source_dir: PathBuf,
    /// Extension of the triple tables (without the dot)
    pub extension: String,
    /// File name of the previously exported table, never re-ingested
    pub processed_file: String,
    /// Placeholder regexes, applied case-insensitively in order
    pub placeholder_patterns: Vec<String>,
    /// Candidate substitution names
    pub names: Vec<String>,
    /// Seed for name sampling; `None` draws from OS entropy
    pub seed: Option<u64>,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            source_dir: PathBuf::from("data/atomic"),
            extension: "tsv".to_string(),
            processed_file: "processed.tsv".to_string(),
            placeholder_patterns: DEFAULT_PLACEHOLDER_PATTERNS
                .iter()
                .map(|p| p.to_string())
                .collect(),
            names: DEFAULT_NAMES.iter().map(|n| n.to_string()).collect(),
            seed: None,
        }
    }
}

impl IngestConfig {
    pub fn placeholders(&self) -> Result<PlaceholderSet, PlaceholderError> {
        PlaceholderSet::new(&self.placeholder_patterns)
    }

    pub fn name_pool(&self) -> NamePool {
        NamePool::new(self.names.iter().cloned())
    }

    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}
