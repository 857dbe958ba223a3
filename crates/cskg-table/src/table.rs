//! Triples and the unified relation table

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::{AnalysisKind, RowFeature, TableError};

/// Stable row identifier: the row's position in load order
pub type RowId = usize;

/// A single (head, relation, tail) record
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Triple {
    pub head: String,
    pub relation: String,
    pub tail: Option<String>,
}

impl Triple {
    pub fn new(head: impl Into<String>, relation: impl Into<String>, tail: Option<&str>) -> Self {
        Self {
            head: head.into(),
            relation: relation.into(),
            tail: tail.map(str::to_string),
        }
    }

    pub fn get(&self, column: Column) -> Option<&str> {
        match column {
            Column::Head => Some(&self.head),
            Column::Relation => Some(&self.relation),
            Column::Tail => self.tail.as_deref(),
        }
    }

    pub fn get_mut(&mut self, column: Column) -> Option<&mut String> {
        match column {
            Column::Head => Some(&mut self.head),
            Column::Relation => Some(&mut self.relation),
            Column::Tail => self.tail.as_mut(),
        }
    }
}

/// Positional column of a triple
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Column {
    Head,
    Relation,
    Tail,
}

impl Column {
    pub const ALL: [Column; 3] = [Column::Head, Column::Relation, Column::Tail];

    pub fn name(self) -> &'static str {
        match self {
            Column::Head => "head",
            Column::Relation => "relation",
            Column::Tail => "tail",
        }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Column {
    type Err = TableError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Column::ALL
            .into_iter()
            .find(|c| c.name() == s.trim())
            .ok_or_else(|| TableError::UnknownColumn(s.to_string()))
    }
}

/// Unified, row-indexed collection of triples
///
/// Row ids are contiguous from zero and assigned once on insertion. Derived
/// feature columns are kept alongside the rows and always have one entry per
/// row.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RelationTable {
    rows: Vec<Triple>,
    features: BTreeMap<AnalysisKind, Vec<RowFeature>>,
}

impl RelationTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_triples(triples: impl IntoIterator<Item = Triple>) -> Self {
        Self {
            rows: triples.into_iter().collect(),
            features: BTreeMap::new(),
        }
    }

    /// Append a triple and return its row id
    pub fn push(&mut self, triple: Triple) -> RowId {
        self.rows.push(triple);
        self.rows.len() - 1
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get(&self, row: RowId) -> Option<&Triple> {
        self.rows.get(row)
    }

    /// Rows with their ids, in load order
    pub fn rows(&self) -> impl Iterator<Item = (RowId, &Triple)> + '_ {
        self.rows.iter().enumerate()
    }

    /// Values of one column; missing tails come back as `None`
    pub fn column(&self, column: Column) -> impl Iterator<Item = (RowId, Option<&str>)> + '_ {
        self.rows.iter().enumerate().map(move |(i, t)| (i, t.get(column)))
    }

    /// Mutable cells of one column; missing cells are skipped
    pub fn column_mut(&mut self, column: Column) -> impl Iterator<Item = &mut String> + '_ {
        self.rows.iter_mut().filter_map(move |t| t.get_mut(column))
    }

    /// Attach (or replace) a derived feature column
    pub fn attach_features(
        &mut self,
        kind: AnalysisKind,
        values: Vec<RowFeature>,
    ) -> Result<(), TableError> {
        if values.len() != self.rows.len() {
            return Err(TableError::ColumnLength {
                kind,
                expected: self.rows.len(),
                actual: values.len(),
            });
        }
        self.features.insert(kind, values);
        Ok(())
    }

    pub fn features(&self, kind: AnalysisKind) -> Option<&[RowFeature]> {
        self.features.get(&kind).map(Vec::as_slice)
    }

    pub fn feature_kinds(&self) -> impl Iterator<Item = AnalysisKind> + '_ {
        self.features.keys().copied()
    }
}

impl FromIterator<Triple> for RelationTable {
    fn from_iter<I: IntoIterator<Item = Triple>>(iter: I) -> Self {
        Self::from_triples(iter)
    }
}
