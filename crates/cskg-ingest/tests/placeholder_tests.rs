use cskg_ingest::{fill_placeholders, NamePool, PlaceholderError, PlaceholderSet, DEFAULT_COLUMNS};
use cskg_table::{RelationTable, Triple};
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::BTreeSet;

/// `k` placeholder patterns `marker0 .. marker{k-1}` and a table mentioning all of them
fn fixture(k: usize) -> (PlaceholderSet, RelationTable) {
    let patterns: Vec<String> = (0..k).map(|i| format!(r"\bmarker{i}\b")).collect();
    let head = (0..k)
        .map(|i| format!("MARKER{i}"))
        .collect::<Vec<_>>()
        .join(" meets ");
    let table = RelationTable::from_triples([
        Triple::new(head, "xReact", Some("glad")),
        Triple::new("nobody here", "xNeed", None),
    ]);
    (PlaceholderSet::new(&patterns).unwrap(), table)
}

fn pool(n: usize) -> NamePool {
    NamePool::from_iter((0..n).map(|i| format!("Name{i}")))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn exact_pool_is_fully_consumed_without_reuse(k in 1usize..8, seed in any::<u64>()) {
        let (set, mut table) = fixture(k);
        let mut rng = StdRng::seed_from_u64(seed);
        let out = fill_placeholders(&mut table, DEFAULT_COLUMNS, &set, pool(k), &mut rng).unwrap();

        prop_assert!(out.pool.is_empty());
        let names: BTreeSet<_> = out.assignments.iter().map(|a| a.name.clone()).collect();
        prop_assert_eq!(names.len(), k);

        let head = &table.get(0).unwrap().head;
        for a in &out.assignments {
            prop_assert!(head.contains(&a.name));
        }
        prop_assert!(!head.to_lowercase().contains("marker"));
        prop_assert_eq!(&table.get(1).unwrap().head, "nobody here");
        prop_assert_eq!(&table.get(1).unwrap().tail, &None);
    }

    #[test]
    fn one_name_short_fails(k in 1usize..8, seed in any::<u64>()) {
        let (set, mut table) = fixture(k);
        let mut rng = StdRng::seed_from_u64(seed);
        let err = fill_placeholders(&mut table, DEFAULT_COLUMNS, &set, pool(k - 1), &mut rng)
            .unwrap_err();
        let is_exhausted = matches!(err, PlaceholderError::PoolExhausted { assigned, .. } if assigned == k - 1);
        prop_assert!(is_exhausted);
    }

    #[test]
    fn same_seed_same_assignment(seed in any::<u64>()) {
        let (set, table) = fixture(3);
        let run = |mut t: RelationTable| {
            let mut rng = StdRng::seed_from_u64(seed);
            fill_placeholders(&mut t, DEFAULT_COLUMNS, &set, pool(6), &mut rng).unwrap();
            t
        };
        prop_assert_eq!(run(table.clone()), run(table));
    }
}
