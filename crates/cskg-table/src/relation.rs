//! Relation vocabulary and category exclusion sets
//!
//! The corpus uses a closed set of relation labels. Partitioning works by
//! *excluding* one of the fixed groups below; labels outside every group pass
//! through all filters untouched.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Physical-attribute relations
pub const PHYSICAL_RELATIONS: &[&str] = &["ObjectUse", "AtLocation", "MadeUpOf", "HasProperty"];

/// Entity-attribute relations
pub const ENTITY_RELATIONS: &[&str] = &["CapableOf", "Desires", "NotDesires"];

/// Social-interaction relations
pub const SOCIAL_RELATIONS: &[&str] = &[
    "xNeed", "xAttr", "xEffect", "xReact", "xWant", "xIntent", "oEffect", "oReact", "oWant",
];

/// Script (event ordering) relations
pub const SCRIPT_RELATIONS: &[&str] = &["isAfter", "isBefore", "HasSubevent"];

/// Dynamic (causal) event relations
pub const DYNAMIC_RELATIONS: &[&str] = &["Causes", "HinderedBy", "xReason"];

/// Relations that appear in the corpus but belong to no category group
pub const UNGROUPED_RELATIONS: &[&str] = &["isFilledBy"];

/// Relation category, one per exclusion group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    Physical,
    Entity,
    Social,
    Script,
    Dynamic,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Physical,
        Category::Entity,
        Category::Social,
        Category::Script,
        Category::Dynamic,
    ];

    /// The relation labels belonging to this category
    pub fn relations(self) -> &'static [&'static str] {
        match self {
            Category::Physical => PHYSICAL_RELATIONS,
            Category::Entity => ENTITY_RELATIONS,
            Category::Social => SOCIAL_RELATIONS,
            Category::Script => SCRIPT_RELATIONS,
            Category::Dynamic => DYNAMIC_RELATIONS,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Category::Physical => "physical",
            Category::Entity => "entity",
            Category::Social => "social",
            Category::Script => "script",
            Category::Dynamic => "dynamic",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|c| c.name().eq_ignore_ascii_case(name.trim()))
    }

    /// Category a relation label belongs to, if any
    pub fn of(relation: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|c| c.relations().contains(&relation))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// True when the label is part of the known corpus vocabulary
pub fn is_known_relation(relation: &str) -> bool {
    Category::of(relation).is_some() || UNGROUPED_RELATIONS.contains(&relation)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_are_disjoint() {
        for (i, a) in Category::ALL.iter().enumerate() {
            for b in &Category::ALL[i + 1..] {
                for rel in a.relations() {
                    assert!(!b.relations().contains(rel), "{rel} in {a} and {b}");
                }
            }
        }
    }

    #[test]
    fn category_lookup() {
        assert_eq!(Category::of("AtLocation"), Some(Category::Physical));
        assert_eq!(Category::of("xReason"), Some(Category::Dynamic));
        assert_eq!(Category::of("isFilledBy"), None);
        assert!(is_known_relation("isFilledBy"));
        assert!(!is_known_relation("RelatedTo"));
        assert_eq!(Category::from_name("Social"), Some(Category::Social));
    }
}
