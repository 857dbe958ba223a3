//! Commonsense knowledge-graph relation table
//!
//! Shared data model for the CSKG crates:
//! - `Triple` / `RelationTable`: the unified, row-indexed store of
//!   (head, relation, tail) records built by ingestion
//! - `CategoryView`: a borrowed projection that keeps row identity
//! - relation vocabulary and the fixed category exclusion sets
//! - row features attached as derived columns (SRL, dependency arcs)
//!
//! The table is append-only for ingestion and mutable in place for
//! normalization. Rows are never removed, so a `RowId` is simply the row's
//! position and stays valid for the lifetime of the table.

pub mod feature;
pub mod relation;
pub mod table;
pub mod view;

pub use feature::*;
pub use relation::*;
pub use table::*;
pub use view::*;

/// Errors raised by table operations
#[derive(Debug, thiserror::Error)]
pub enum TableError {
    #[error("unknown column `{0}` (expected head, relation or tail)")]
    UnknownColumn(String),

    #[error("feature column `{kind}` has {actual} rows, table has {expected}")]
    ColumnLength {
        kind: AnalysisKind,
        expected: usize,
        actual: usize,
    },
}
