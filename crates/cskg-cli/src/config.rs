//! CLI configuration: storage + ingestion settings from one JSON file

use anyhow::{Context, Result};
use cskg_ingest::IngestConfig;
use cskg_storage::StorageConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    pub storage: StorageConfig,
    pub ingest: IngestConfig,
}

/// Command-line overrides applied on top of the file
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub source_dir: Option<PathBuf>,
    pub data_dir: Option<PathBuf>,
    pub seed: Option<u64>,
}

impl CliConfig {
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("parsing config {}", path.display()))
    }

    pub fn apply(mut self, overrides: Overrides) -> Self {
        if let Some(dir) = overrides.source_dir {
            self.ingest.source_dir = dir;
        }
        if let Some(dir) = overrides.data_dir {
            self.storage = StorageConfig {
                snapshot_file: self.storage.snapshot_file,
                export_file: self.storage.export_file,
                annotated_file: self.storage.annotated_file,
                ..StorageConfig::rooted(dir)
            };
        }
        if overrides.seed.is_some() {
            self.ingest.seed = overrides.seed;
        }
        self
    }
}
