//! Filesystem-backed `TableStore`

use chrono::{Local, NaiveDate};
use cskg_table::RelationTable;
use serde::Serialize;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use crate::{tsv, Result, SavedTable, StorageConfig, StorageError, TableStore};

/// Store writing bincode snapshots and TSV exports under a root directory
#[derive(Debug, Clone)]
pub struct FsStore {
    config: StorageConfig,
}

impl FsStore {
    pub fn new(config: StorageConfig) -> Self {
        Self { config }
    }

    /// Store rooted at a single directory
    pub fn open(dir: impl Into<PathBuf>) -> Self {
        Self::new(StorageConfig::rooted(dir))
    }

    pub fn config(&self) -> &StorageConfig {
        &self.config
    }

    /// Feature dump for an explicit date
    pub fn save_features_on<T: Serialize + ?Sized>(
        &self,
        name: &str,
        value: &T,
        date: NaiveDate,
    ) -> Result<PathBuf> {
        let path = self.config.features_path(name, date);
        write_bincode(&path, value)?;
        tracing::info!(path = %path.display(), "saved feature dump");
        Ok(path)
    }

    /// Reload a feature dump written by `save_features`
    pub fn load_features<T: serde::de::DeserializeOwned>(&self, path: &Path) -> Result<T> {
        let bytes = std::fs::read(path)?;
        bincode::deserialize(&bytes).map_err(|e| StorageError::Decode(e.to_string()))
    }

    /// Reload the annotated checkpoint
    pub fn load_annotated(&self) -> Result<RelationTable> {
        read_snapshot(&self.config.annotated_path())
    }
}

impl TableStore for FsStore {
    fn save_table(&self, table: &RelationTable) -> Result<SavedTable> {
        let snapshot = self.config.snapshot_path();
        let export = self.config.export_path();

        write_bincode(&snapshot, table)?;

        ensure_parent(&export)?;
        let file = std::fs::File::create(&export)?;
        tsv::write_export(table, BufWriter::new(file))?;

        tracing::info!(
            rows = table.len(),
            snapshot = %snapshot.display(),
            export = %export.display(),
            "saved relation table"
        );

        Ok(SavedTable {
            snapshot,
            export,
            rows: table.len(),
        })
    }

    fn load_table(&self) -> Result<RelationTable> {
        read_snapshot(&self.config.snapshot_path())
    }

    fn save_annotated(&self, table: &RelationTable) -> Result<PathBuf> {
        let path = self.config.annotated_path();
        write_bincode(&path, table)?;
        tracing::info!(
            rows = table.len(),
            path = %path.display(),
            "saved annotated relation table"
        );
        Ok(path)
    }

    fn save_features<T: Serialize + ?Sized>(&self, name: &str, value: &T) -> Result<PathBuf> {
        self.save_features_on(name, value, Local::now().date_naive())
    }
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    Ok(())
}

fn write_bincode<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let bytes = bincode::serialize(value).map_err(|e| StorageError::Encode(e.to_string()))?;
    ensure_parent(path)?;
    std::fs::write(path, bytes)?;
    Ok(())
}

fn read_snapshot(path: &Path) -> Result<RelationTable> {
    let bytes = std::fs::read(path)?;
    bincode::deserialize(&bytes).map_err(|e| StorageError::Decode(e.to_string()))
}
