//! Feature extraction against counting test doubles

mod common;

use common::{corpus, doc, CountingAnalyzer, CountingLabeler};
use cskg_nlp::{
    AnalysisError, DependencyParses, FeatureError, FeatureExtractor, NounChunk,
    DEPENDENCY_PARSE_DUMP,
};
use cskg_storage::{dated_file_name, FsStore};
use cskg_table::{AnalysisKind, Column, DependencyArc, RelationTable, RowFeature, Triple};
use std::collections::BTreeSet;
use tempfile::tempdir;

fn heads(texts: &[&str]) -> RelationTable {
    texts
        .iter()
        .map(|h| Triple::new(*h, "xEffect", None))
        .collect()
}

fn repeated_heads() -> RelationTable {
    heads(&[
        "Dogs bark",
        "The cat sleeps",
        "Birds sing",
        "Dogs bark",
        "Fish swim",
        "The cat sleeps",
    ])
}

// ============================================================================
// Histogram / noun chunks
// ============================================================================

#[test]
fn histogram_is_sorted_by_signature() {
    let analyzer = CountingAnalyzer::new(corpus());
    let extractor = FeatureExtractor::new(&analyzer);

    let histogram = extractor
        .extract_dependency_parses(&repeated_heads(), Column::Head)
        .unwrap();

    assert_eq!(
        histogram.sorted_counts(),
        vec![("det-nsubj-ROOT", 1), ("nsubj-ROOT", 3)]
    );
    assert_eq!(
        histogram.documents["nsubj-ROOT"],
        vec!["Dogs bark", "Birds sing", "Fish swim"]
    );
    assert_eq!(histogram.documents["det-nsubj-ROOT"], vec!["The cat sleeps"]);
}

#[test]
fn histogram_analyzes_each_distinct_text_once() {
    let analyzer = CountingAnalyzer::new(corpus());
    let extractor = FeatureExtractor::new(&analyzer);

    extractor
        .extract_dependency_parses(&repeated_heads(), Column::Head)
        .unwrap();

    assert_eq!(analyzer.calls("Dogs bark"), 1);
    assert_eq!(analyzer.calls("The cat sleeps"), 1);
    assert_eq!(analyzer.total_calls(), 4);
}

#[test]
fn noun_chunks_carry_root_head_context() {
    let analyzer = CountingAnalyzer::new(corpus());
    let extractor = FeatureExtractor::new(&analyzer);

    let chunks = extractor
        .noun_chunking(&repeated_heads(), Column::Head)
        .unwrap();

    assert_eq!(analyzer.total_calls(), 4);
    assert_eq!(chunks.len(), 4);
    assert_eq!(
        chunks["The cat sleeps"],
        vec![NounChunk {
            text: "The cat".to_string(),
            head: "sleeps".to_string(),
            head_pos: "VERB".to_string(),
            head_dep: "ROOT".to_string(),
        }]
    );
    assert_eq!(chunks["Dogs bark"][0].text, "Dogs");
}

#[test]
fn missing_tails_are_not_analyzed() {
    let analyzer = CountingAnalyzer::new(corpus());
    let extractor = FeatureExtractor::new(&analyzer);
    let table = RelationTable::from_triples(vec![
        Triple::new("Dogs bark", "xEffect", Some("Birds sing")),
        Triple::new("Fish swim", "xEffect", None),
        Triple::new("Fish swim", "xWant", Some("Birds sing")),
    ]);

    let histogram = extractor
        .extract_dependency_parses(&table, Column::Tail)
        .unwrap();

    assert_eq!(histogram.sorted_counts(), vec![("nsubj-ROOT", 1)]);
    assert_eq!(analyzer.total_calls(), 1);
}

// ============================================================================
// Verbs
// ============================================================================

#[test]
fn verbs_governing_subjects_analyze_every_row() {
    let analyzer = CountingAnalyzer::new(corpus());
    let extractor = FeatureExtractor::new(&analyzer);

    let verbs = extractor
        .extract_verbs(&repeated_heads(), Column::Head, "nsubj")
        .unwrap();

    let expected: BTreeSet<String> = ["bark", "sing", "sleep", "swim"]
        .into_iter()
        .map(String::from)
        .collect();
    assert_eq!(verbs, expected);
    assert_eq!(analyzer.calls("Dogs bark"), 2);
    assert_eq!(analyzer.total_calls(), 6);
}

#[test]
fn verbs_with_unmatched_label_is_empty() {
    let analyzer = CountingAnalyzer::new(corpus());
    let extractor = FeatureExtractor::new(&analyzer);

    let verbs = extractor
        .extract_verbs(&repeated_heads(), Column::Head, "dobj")
        .unwrap();
    assert!(verbs.is_empty());
}

// ============================================================================
// Dependency parses
// ============================================================================

fn mixed_table() -> RelationTable {
    RelationTable::from_triples(vec![
        Triple::new("Dogs bark", "xEffect", Some("Birds sing")),
        Triple::new("The cat sleeps", "HasProperty", None),
    ])
}

#[test]
fn dependency_parse_keyed_by_column_and_row() {
    let analyzer = CountingAnalyzer::new(corpus());
    let extractor = FeatureExtractor::new(&analyzer);

    let parses = extractor
        .dependency_parse(&mixed_table(), &[Column::Head, Column::Tail])
        .unwrap();

    let head = &parses[&Column::Head];
    assert_eq!(head.len(), 2);
    assert_eq!(
        head[&0].arcs[0],
        DependencyArc {
            token: "Dogs".to_string(),
            dep: "nsubj".to_string(),
            head: "bark".to_string(),
            head_pos: "VERB".to_string(),
            children: vec!["Dogs".to_string()],
        }
    );
    assert_eq!(head[&1].document.text, "The cat sleeps");

    let tail = &parses[&Column::Tail];
    assert_eq!(tail.keys().copied().collect::<Vec<_>>(), vec![0]);
    assert_eq!(analyzer.total_calls(), 3);
}

#[test]
fn dependency_parse_dump_is_dated() {
    let dir = tempdir().unwrap();
    let store = FsStore::open(dir.path());
    let analyzer = CountingAnalyzer::new(corpus());
    let extractor = FeatureExtractor::new(&analyzer);

    let (parses, path) = extractor
        .dependency_parse_saved(&mixed_table(), &[Column::Head], &store)
        .unwrap();

    let today = chrono::Local::now().date_naive();
    assert_eq!(
        path.file_name().unwrap().to_str().unwrap(),
        dated_file_name(DEPENDENCY_PARSE_DUMP, today)
    );
    let reloaded: DependencyParses = store.load_features(&path).unwrap();
    assert_eq!(reloaded, parses);
}

#[test]
fn analyzer_failure_propagates() {
    let analyzer = CountingAnalyzer::new(corpus());
    let extractor = FeatureExtractor::new(&analyzer);
    let table = heads(&["Dogs bark", "Cows moo"]);

    let err = extractor
        .dependency_parse(&table, &[Column::Head])
        .unwrap_err();
    assert!(matches!(
        err,
        FeatureError::Analysis(AnalysisError::Missing(ref t)) if t == "Cows moo"
    ));
}

fn dangling_head() -> CountingAnalyzer {
    CountingAnalyzer::new([doc(&[("Dogs", "dog", "NOUN", "nsubj", 5)], &[])])
}

fn is_invalid(err: &FeatureError) -> bool {
    matches!(err, FeatureError::Analysis(AnalysisError::Invalid(_)))
}

#[test]
fn dangling_head_index_is_an_error() {
    let analyzer = dangling_head();
    let extractor = FeatureExtractor::new(&analyzer);
    let mut table = heads(&["Dogs"]);

    let err = extractor
        .extract_verbs(&table, Column::Head, "nsubj")
        .unwrap_err();
    assert!(is_invalid(&err), "{err}");
    let err = extractor
        .dependency_parse(&table, &[Column::Head])
        .unwrap_err();
    assert!(is_invalid(&err), "{err}");
    let err = extractor
        .extract_dependency_parses(&table, Column::Head)
        .unwrap_err();
    assert!(is_invalid(&err), "{err}");
    let err = extractor.annotate_named(&mut table, "dep").unwrap_err();
    assert!(is_invalid(&err), "{err}");
    assert!(table.features(AnalysisKind::Dependency).is_none());
}

#[test]
fn chunk_span_past_the_tokens_is_an_error() {
    let analyzer = CountingAnalyzer::new([doc(&[("Dogs", "dog", "NOUN", "ROOT", 0)], &[(0, 3, 0)])]);
    let extractor = FeatureExtractor::new(&analyzer);

    let err = extractor
        .noun_chunking(&heads(&["Dogs"]), Column::Head)
        .unwrap_err();
    assert!(is_invalid(&err), "{err}");
}

// ============================================================================
// Annotation
// ============================================================================

#[test]
fn unknown_analysis_name_makes_no_calls() {
    let analyzer = CountingAnalyzer::new(corpus());
    let labeler = CountingLabeler::default();
    let extractor = FeatureExtractor::new(&analyzer).with_labeler(&labeler);
    let mut table = repeated_heads();

    let err = extractor.annotate_named(&mut table, "ner").unwrap_err();

    assert!(matches!(err, FeatureError::UnsupportedAnalysis(ref n) if n == "ner"));
    assert_eq!(analyzer.total_calls(), 0);
    assert_eq!(labeler.calls(), 0);
    assert!(table.feature_kinds().next().is_none());
}

#[test]
fn dependency_annotation_attaches_one_value_per_row() {
    let analyzer = CountingAnalyzer::new(corpus());
    let extractor = FeatureExtractor::new(&analyzer);
    let mut table = repeated_heads();

    let rows = extractor.annotate_named(&mut table, "dep").unwrap();

    assert_eq!(rows, table.len());
    let features = table.features(AnalysisKind::Dependency).unwrap();
    assert_eq!(features.len(), 6);
    let RowFeature::Dependency(arcs) = &features[1] else {
        panic!("expected dependency arcs");
    };
    assert_eq!(arcs.len(), 3);
    assert_eq!(arcs[0].token, "The");
}

#[test]
fn srl_without_labeler_is_rejected() {
    let analyzer = CountingAnalyzer::new(corpus());
    let extractor = FeatureExtractor::new(&analyzer);
    let mut table = repeated_heads();

    let err = extractor.annotate_named(&mut table, "srl").unwrap_err();
    assert!(matches!(err, FeatureError::MissingLabeler));
    assert!(extractor.semantic_roles("Dogs bark").is_err());
}

#[test]
fn srl_annotation_is_checkpointed() {
    let dir = tempdir().unwrap();
    let store = FsStore::open(dir.path());
    let analyzer = CountingAnalyzer::new(corpus());
    let labeler = CountingLabeler::default();
    let extractor = FeatureExtractor::new(&analyzer).with_labeler(&labeler);
    let mut table = repeated_heads();

    let path = extractor
        .annotate_and_save(&mut table, "srl", &store)
        .unwrap();

    assert_eq!(labeler.calls(), 6);
    assert_eq!(analyzer.total_calls(), 0);
    assert_eq!(path, store.config().annotated_path());

    let reloaded = store.load_annotated().unwrap();
    assert_eq!(reloaded, table);
    let RowFeature::SemanticRoles(parse) = &reloaded.features(AnalysisKind::SemanticRoles).unwrap()[0]
    else {
        panic!("expected semantic roles");
    };
    assert_eq!(parse.words, vec!["Dogs", "bark"]);
    assert_eq!(parse.frames[0].verb, "bark");
}
