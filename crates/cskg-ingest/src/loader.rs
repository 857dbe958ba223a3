//! Relation store loader
//!
//! Reads every triple table in a directory and concatenates their first three
//! columns into one table. Files are processed in file-name order and keep
//! their own row order; the result gets a fresh, contiguous row index.
//!
//! File format: tab-separated, UTF-8, no header. The first non-blank line fixes
//! the field count of the file (at least three). Later lines may have fewer
//! fields (the tail is then missing) but never more.

use cskg_storage::{SavedTable, TableStore};
use cskg_table::{is_known_relation, RelationTable, Triple};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::{IngestConfig, IngestError};

/// Tail values read as "missing"
pub const MISSING_MARKERS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Per-file summary of a load
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedFile {
    pub path: PathBuf,
    pub rows: usize,
}

/// Result of loading a source directory
#[derive(Debug, Clone)]
pub struct LoadReport {
    pub table: RelationTable,
    pub files: Vec<LoadedFile>,
    /// Relation labels outside the known vocabulary
    pub unknown_relations: BTreeSet<String>,
}

/// Triple tables to ingest, in processing order
///
/// The reserved processed artifact is skipped by file-name match.
pub fn source_files(config: &IngestConfig) -> Result<Vec<PathBuf>, IngestError> {
    let mut files = Vec::new();
    for entry in WalkDir::new(&config.source_dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry?;
        let path = entry.path();
        if !entry.file_type().is_file() {
            continue;
        }
        if !path
            .extension()
            .map_or(false, |e| e == config.extension.as_str())
        {
            continue;
        }
        if entry.file_name() == config.processed_file.as_str() {
            tracing::debug!(path = %path.display(), "skipping processed table");
            continue;
        }
        files.push(path.to_path_buf());
    }
    Ok(files)
}

/// Load every triple table under `config.source_dir` into one table
pub fn load_relation_table(config: &IngestConfig) -> Result<LoadReport, IngestError> {
    let files = source_files(config)?;
    if files.is_empty() {
        tracing::warn!(
            dir = %config.source_dir.display(),
            extension = %config.extension,
            "no triple tables found"
        );
    }

    let mut table = RelationTable::new();
    let mut loaded = Vec::with_capacity(files.len());
    let mut unknown_relations = BTreeSet::new();

    for path in files {
        let triples = read_triple_file(&path)?;
        tracing::info!(path = %path.display(), rows = triples.len(), "loaded triple table");
        loaded.push(LoadedFile {
            path,
            rows: triples.len(),
        });
        for triple in triples {
            if !is_known_relation(&triple.relation) && !unknown_relations.contains(&triple.relation) {
                unknown_relations.insert(triple.relation.clone());
            }
            table.push(triple);
        }
    }

    if !unknown_relations.is_empty() {
        tracing::warn!(
            relations = ?unknown_relations,
            "relation labels outside the known vocabulary"
        );
    }

    Ok(LoadReport {
        table,
        files: loaded,
        unknown_relations,
    })
}

/// Load and checkpoint the unified table through a store
pub fn load_and_save<S: TableStore>(
    config: &IngestConfig,
    store: &S,
) -> Result<(LoadReport, SavedTable), IngestError> {
    let report = load_relation_table(config)?;
    let saved = store.save_table(&report.table)?;
    Ok((report, saved))
}

/// Read one headerless triple table
pub fn read_triple_file(path: &Path) -> Result<Vec<Triple>, IngestError> {
    let bytes = std::fs::read(path).map_err(|source| IngestError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let text = std::str::from_utf8(&bytes).map_err(|e| {
        let line = bytes[..e.valid_up_to()].iter().filter(|&&b| b == b'\n').count() + 1;
        IngestError::Malformed {
            path: path.to_path_buf(),
            line,
            message: "invalid UTF-8".to_string(),
        }
    })?;
    let triples = parse_triples(text).map_err(|(line, message)| IngestError::Malformed {
        path: path.to_path_buf(),
        line,
        message,
    })?;
    if triples.is_empty() {
        return Err(IngestError::Empty {
            path: path.to_path_buf(),
        });
    }
    Ok(triples)
}

/// Parse TSV text into triples; errors carry the 1-based line number
pub fn parse_triples(text: &str) -> Result<Vec<Triple>, (usize, String)> {
    let mut triples = Vec::new();
    let mut width: Option<usize> = None;

    for (i, raw) in text.lines().enumerate() {
        let line_no = i + 1;
        let line = raw.strip_suffix('\r').unwrap_or(raw);
        if line.trim().is_empty() {
            continue;
        }

        let fields: Vec<&str> = line.split('\t').collect();
        let expected = *width.get_or_insert(fields.len());
        if expected < 3 {
            return Err((
                line_no,
                format!("expected at least 3 columns, found {}", expected),
            ));
        }
        if fields.len() > expected {
            return Err((
                line_no,
                format!("expected {} fields, saw {}", expected, fields.len()),
            ));
        }

        let head = fields[0];
        let relation = fields.get(1).copied().unwrap_or("");
        if head.is_empty() {
            return Err((line_no, "empty head".to_string()));
        }
        if relation.is_empty() {
            return Err((line_no, "empty relation".to_string()));
        }
        let tail = fields
            .get(2)
            .copied()
            .filter(|t| !MISSING_MARKERS.contains(t));

        triples.push(Triple::new(head, relation, tail));
    }

    Ok(triples)
}
