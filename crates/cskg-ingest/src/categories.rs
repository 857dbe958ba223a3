//! Category partitioner
//!
//! Each split keeps the rows whose relation is *outside* a category group.
//! The view returned first by `physical_entity_attributes` therefore has the
//! physical relations removed and the entity relations kept, and vice versa.

use cskg_table::{
    Category, CategoryView, RelationTable, DYNAMIC_RELATIONS, ENTITY_RELATIONS,
    PHYSICAL_RELATIONS, SCRIPT_RELATIONS, SOCIAL_RELATIONS,
};

/// Rows whose relation is not in `excluded`
pub fn exclude_relations<'a>(table: &'a RelationTable, excluded: &'a [&'a str]) -> CategoryView<'a> {
    CategoryView::excluding(table, excluded)
}

/// Rows outside one category group
pub fn exclude_category(table: &RelationTable, category: Category) -> CategoryView<'_> {
    CategoryView::excluding(table, category.relations())
}

/// Physical/entity split: `(without physical relations, without entity relations)`
pub fn physical_entity_attributes(table: &RelationTable) -> (CategoryView<'_>, CategoryView<'_>) {
    (
        CategoryView::excluding(table, PHYSICAL_RELATIONS),
        CategoryView::excluding(table, ENTITY_RELATIONS),
    )
}

/// Social split: rows without social-interaction relations
pub fn social_attributes(table: &RelationTable) -> CategoryView<'_> {
    CategoryView::excluding(table, SOCIAL_RELATIONS)
}

/// Event split: `(without script relations, without dynamic relations)`
pub fn event_attributes(table: &RelationTable) -> (CategoryView<'_>, CategoryView<'_>) {
    (
        CategoryView::excluding(table, SCRIPT_RELATIONS),
        CategoryView::excluding(table, DYNAMIC_RELATIONS),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use cskg_table::Triple;

    fn relations(view: &CategoryView<'_>) -> Vec<String> {
        view.iter().map(|(_, t)| t.relation.clone()).collect()
    }

    #[test]
    fn physical_entity_inversion() {
        let table = RelationTable::from_triples([
            Triple::new("fork", "ObjectUse", Some("eat")),
            Triple::new("dog", "CapableOf", Some("bark")),
            Triple::new("cat", "Desires", Some("fish")),
        ]);
        let (without_physical, without_entity) = physical_entity_attributes(&table);
        assert_eq!(relations(&without_physical), vec!["CapableOf", "Desires"]);
        assert_eq!(relations(&without_entity), vec!["ObjectUse"]);
        assert_eq!(without_physical.row_ids(), &[1, 2]);
        assert_eq!(without_entity.row_ids(), &[0]);
    }

    #[test]
    fn social_split_drops_social_relations() {
        let table = RelationTable::from_triples([
            Triple::new("PersonX eats", "xWant", Some("sleep")),
            Triple::new("PersonX eats", "oReact", Some("happy")),
            Triple::new("PersonX eats", "isAfter", Some("cooks")),
        ]);
        let view = social_attributes(&table);
        assert_eq!(relations(&view), vec!["isAfter"]);
        assert_eq!(view.row_ids(), &[2]);
    }

    #[test]
    fn event_split() {
        let table = RelationTable::from_triples([
            Triple::new("a", "isBefore", None),
            Triple::new("b", "HasSubevent", None),
            Triple::new("c", "Causes", None),
            Triple::new("d", "xReason", None),
        ]);
        let (without_script, without_dynamic) = event_attributes(&table);
        assert_eq!(relations(&without_script), vec!["Causes", "xReason"]);
        assert_eq!(relations(&without_dynamic), vec!["isBefore", "HasSubevent"]);
    }

    #[test]
    fn unknown_relations_pass_every_filter() {
        let table = RelationTable::from_triples([Triple::new("a", "RelatedTo", Some("b"))]);
        for category in Category::ALL {
            assert_eq!(exclude_category(&table, category).len(), 1);
        }
    }
}
