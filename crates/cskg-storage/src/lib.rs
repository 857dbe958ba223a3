//! CSKG storage layer
//!
//! Every relation table is written in two formats:
//!
//! ```text
//!                    ┌──────────────────┐     ┌──────────────────┐
//!                    │                  │────►│  atomic.bin      │
//!  RelationTable ───►│    TableStore    │     │  (fast reload)   │
//!                    │                  │     └──────────────────┘
//!                    │                  │     ┌──────────────────┐
//!                    │                  │────►│  processed.tsv   │
//!                    └──────────────────┘     │  (human)         │
//!                             │               └──────────────────┘
//!                             ▼
//!                  features/<name>_<date>.bin
//! ```
//!
//! Feature dumps embed the calendar date in their file name so runs on
//! different days never overwrite each other.

pub mod fs;
pub mod tsv;


use chrono::NaiveDate;
use cskg_table::RelationTable;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub use fs::FsStore;
pub use tsv::{read_export, write_export};

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Encode(String),

    #[error("Deserialization error: {0}")]
    Decode(String),

    #[error("Malformed export {path} line {line}: {message}")]
    MalformedExport {
        path: PathBuf,
        line: usize,
        message: String,
    },
}

pub type Result<T> = std::result::Result<T, StorageError>;

// ============================================================================
// Storage Configuration
// ============================================================================

/// Configuration for the filesystem store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory holding the table snapshot and export
    pub root: PathBuf,
    /// Binary snapshot file name (relative to `root`)
    pub snapshot_file: String,
    /// Delimited text export file name (relative to `root`)
    pub export_file: String,
    /// Snapshot of the table after feature attachment (relative to `root`)
    pub annotated_file: String,
    /// Directory for dated feature dumps
    pub features_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("data/atomic"),
            snapshot_file: "atomic.bin".to_string(),
            export_file: "processed.tsv".to_string(),
            annotated_file: "parse.bin".to_string(),
            features_dir: PathBuf::from("data/features"),
        }
    }
}

impl StorageConfig {
    /// Config rooted at a single directory (features go to `<dir>/features`)
    pub fn rooted(dir: impl Into<PathBuf>) -> Self {
        let root = dir.into();
        Self {
            features_dir: root.join("features"),
            root,
            ..Default::default()
        }
    }

    pub fn snapshot_path(&self) -> PathBuf {
        self.root.join(&self.snapshot_file)
    }

    pub fn export_path(&self) -> PathBuf {
        self.root.join(&self.export_file)
    }

    pub fn annotated_path(&self) -> PathBuf {
        self.root.join(&self.annotated_file)
    }

    pub fn features_path(&self, name: &str, date: NaiveDate) -> PathBuf {
        self.features_dir.join(dated_file_name(name, date))
    }
}

/// `<name>_<YYYY-MM-DD>.bin`
pub fn dated_file_name(name: &str, date: NaiveDate) -> String {
    format!("{}_{}.bin", name, date.format("%Y-%m-%d"))
}

// ============================================================================
// Store contract
// ============================================================================

/// Handle returned after persisting a table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedTable {
    pub snapshot: PathBuf,
    pub export: PathBuf,
    pub rows: usize,
}

/// Persistence contract used by ingestion and feature extraction
pub trait TableStore {
    /// Write the binary snapshot and the delimited text export
    fn save_table(&self, table: &RelationTable) -> Result<SavedTable>;

    /// Reload the binary snapshot
    fn load_table(&self) -> Result<RelationTable>;

    /// Checkpoint a table carrying attached feature columns
    fn save_annotated(&self, table: &RelationTable) -> Result<PathBuf>;

    /// Dump a feature side table under a date-stamped name
    fn save_features<T: Serialize + ?Sized>(&self, name: &str, value: &T) -> Result<PathBuf>;
}
