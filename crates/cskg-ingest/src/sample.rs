//! Sample collector: point query by head phrase

use cskg_table::RelationTable;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One (relation, tail) pair attached to a head
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relation {
    pub relation: String,
    pub tail: Option<String>,
}

/// All (relation, tail) pairs whose head equals `from_head` exactly
///
/// The result always has the queried head as its only key; an absent head maps
/// to an empty list.
pub fn collect_sample(from_head: &str, table: &RelationTable) -> BTreeMap<String, Vec<Relation>> {
    let relations = table
        .rows()
        .filter(|(_, t)| t.head == from_head)
        .map(|(_, t)| Relation {
            relation: t.relation.clone(),
            tail: t.tail.clone(),
        })
        .collect();

    BTreeMap::from([(from_head.to_string(), relations)])
}
