//! Category views: filtered projections sharing row identity with the table

use crate::{RelationTable, RowId, Triple};

/// Rows of a table whose relation is *not* in an exclusion set
///
/// A view borrows its table and keeps the source row ids.
#[derive(Debug, Clone)]
pub struct CategoryView<'a> {
    table: &'a RelationTable,
    excluded: &'a [&'a str],
    rows: Vec<RowId>,
}

impl<'a> CategoryView<'a> {
    /// Build a view dropping every row whose relation is in `excluded`
    pub fn excluding(table: &'a RelationTable, excluded: &'a [&'a str]) -> Self {
        let rows = table
            .rows()
            .filter(|(_, t)| !excluded.contains(&t.relation.as_str()))
            .map(|(id, _)| id)
            .collect();
        Self {
            table,
            excluded,
            rows,
        }
    }

    pub fn table(&self) -> &'a RelationTable {
        self.table
    }

    pub fn excluded(&self) -> &'a [&'a str] {
        self.excluded
    }

    pub fn row_ids(&self) -> &[RowId] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn contains(&self, row: RowId) -> bool {
        self.rows.binary_search(&row).is_ok()
    }

    pub fn iter(&self) -> impl Iterator<Item = (RowId, &'a Triple)> + '_ {
        let table = self.table;
        self.rows
            .iter()
            .filter_map(move |&id| table.get(id).map(|t| (id, t)))
    }
}
