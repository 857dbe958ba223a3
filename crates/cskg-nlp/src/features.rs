//! Linguistic feature extraction over relation tables
//!
//! Every analysis goes through the collaborators held by `FeatureExtractor`.
//! A collaborator call is the expensive step, so the histogram and noun-chunk
//! inventories analyze each distinct text exactly once.

use cskg_storage::TableStore;
use cskg_table::{
    AnalysisKind, Column, DependencyArc, RelationTable, RowFeature, RowId, SrlParse,
};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::path::PathBuf;

use crate::{Document, FeatureError, LinguisticAnalyzer, RoleLabeler, VERB};

/// File stem for dependency parse dumps
pub const DEPENDENCY_PARSE_DUMP: &str = "dependency_parse";

/// Dependency parse of one table cell
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CellParse {
    pub arcs: Vec<DependencyArc>,
    pub document: Document,
}

/// `column → row → parse`
pub type DependencyParses = BTreeMap<Column, BTreeMap<RowId, CellParse>>;

/// Noun chunk with the syntactic context of its root
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NounChunk {
    pub text: String,
    /// Text of the chunk root's head
    pub head: String,
    pub head_pos: String,
    pub head_dep: String,
}

/// Documents grouped by dependency signature, plus per-signature counts
///
/// Both maps are ordered by signature.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyHistogram {
    pub documents: BTreeMap<String, Vec<String>>,
    pub counts: BTreeMap<String, usize>,
}

impl DependencyHistogram {
    pub fn sorted_counts(&self) -> Vec<(&str, usize)> {
        self.counts.iter().map(|(k, v)| (k.as_str(), *v)).collect()
    }
}

/// One arc per token: token, its dependency label, and its head's context
pub fn dependency_arcs(doc: &Document) -> Vec<DependencyArc> {
    doc.tokens
        .iter()
        .map(|t| {
            let head = &doc.tokens[t.head];
            DependencyArc {
                token: t.text.clone(),
                dep: t.dep.clone(),
                head: head.text.clone(),
                head_pos: head.pos.clone(),
                children: doc.children_of(t.head).map(|c| c.text.clone()).collect(),
            }
        })
        .collect()
}

/// Noun chunks of a document with their root's head context
pub fn noun_chunks(doc: &Document) -> Vec<NounChunk> {
    doc.noun_chunks
        .iter()
        .map(|c| {
            let head = doc.head_of(c.root);
            NounChunk {
                text: doc.span_text(c.start, c.end),
                head: head.text.clone(),
                head_pos: head.pos.clone(),
                head_dep: head.dep.clone(),
            }
        })
        .collect()
}

/// Distinct present values of a column, in first-seen order
fn unique_values(table: &RelationTable, column: Column) -> Vec<&str> {
    let mut seen = HashSet::new();
    table
        .column(column)
        .filter_map(|(row, v)| {
            if v.is_none() {
                tracing::debug!(row, column = %column, "skipping missing cell");
            }
            v
        })
        .filter(|v| seen.insert(*v))
        .collect()
}

// ============================================================================
// Extractor
// ============================================================================

/// Feature extraction bound to explicitly constructed collaborators
pub struct FeatureExtractor<'a> {
    analyzer: &'a dyn LinguisticAnalyzer,
    labeler: Option<&'a dyn RoleLabeler>,
}

impl<'a> FeatureExtractor<'a> {
    pub fn new(analyzer: &'a dyn LinguisticAnalyzer) -> Self {
        Self {
            analyzer,
            labeler: None,
        }
    }

    pub fn with_labeler(mut self, labeler: &'a dyn RoleLabeler) -> Self {
        self.labeler = Some(labeler);
        self
    }

    /// Analyzer call whose output is checked before any index is followed
    fn analyze(&self, text: &str) -> Result<Document, FeatureError> {
        let doc = self.analyzer.analyze(text)?;
        doc.validate()?;
        Ok(doc)
    }

    /// Parse every present cell of the target columns
    pub fn dependency_parse(
        &self,
        table: &RelationTable,
        columns: &[Column],
    ) -> Result<DependencyParses, FeatureError> {
        let mut parses: DependencyParses = columns.iter().map(|c| (*c, BTreeMap::new())).collect();
        for (row, triple) in table.rows() {
            for &column in columns {
                let Some(text) = triple.get(column) else {
                    tracing::debug!(row, column = %column, "skipping missing cell");
                    continue;
                };
                let document = self.analyze(text)?;
                let arcs = dependency_arcs(&document);
                if let Some(by_row) = parses.get_mut(&column) {
                    by_row.insert(row, CellParse { arcs, document });
                }
            }
        }
        tracing::info!(
            rows = table.len(),
            columns = columns.len(),
            "dependency parse complete"
        );
        Ok(parses)
    }

    /// `dependency_parse` followed by a dated dump through the store
    pub fn dependency_parse_saved<S: TableStore>(
        &self,
        table: &RelationTable,
        columns: &[Column],
        store: &S,
    ) -> Result<(DependencyParses, PathBuf), FeatureError> {
        let parses = self.dependency_parse(table, columns)?;
        let path = store.save_features(DEPENDENCY_PARSE_DUMP, &parses)?;
        Ok((parses, path))
    }

    /// Lemmas of verbs governing a token with the given dependency label
    ///
    /// Every row is analyzed; repeated lemmas collapse in the set.
    pub fn extract_verbs(
        &self,
        table: &RelationTable,
        column: Column,
        dependent_on: &str,
    ) -> Result<BTreeSet<String>, FeatureError> {
        let mut verbs = BTreeSet::new();
        for (row, text) in table.column(column) {
            let Some(text) = text else {
                tracing::debug!(row, column = %column, "skipping missing cell");
                continue;
            };
            let doc = self.analyze(text)?;
            for (i, t) in doc.tokens.iter().enumerate() {
                let head = doc.head_of(i);
                if t.dep == dependent_on && head.pos == VERB {
                    verbs.insert(head.lemma.clone());
                }
            }
        }
        Ok(verbs)
    }

    /// Group distinct documents by dependency signature and count them
    pub fn extract_dependency_parses(
        &self,
        table: &RelationTable,
        column: Column,
    ) -> Result<DependencyHistogram, FeatureError> {
        let mut histogram = DependencyHistogram::default();
        for text in unique_values(table, column) {
            let doc = self.analyze(text)?;
            let signature = doc.dependency_signature();
            histogram
                .documents
                .entry(signature.clone())
                .or_default()
                .push(doc.text);
            *histogram.counts.entry(signature).or_default() += 1;
        }
        tracing::info!(
            column = %column,
            patterns = histogram.counts.len(),
            "dependency patterns collected"
        );
        Ok(histogram)
    }

    /// Noun chunks of every distinct document, keyed by document text
    pub fn noun_chunking(
        &self,
        table: &RelationTable,
        column: Column,
    ) -> Result<BTreeMap<String, Vec<NounChunk>>, FeatureError> {
        let mut chunks = BTreeMap::new();
        for text in unique_values(table, column) {
            let doc = self.analyze(text)?;
            chunks.insert(doc.text.clone(), noun_chunks(&doc));
        }
        Ok(chunks)
    }

    /// Semantic role labeling of one sentence
    pub fn semantic_roles(&self, sentence: &str) -> Result<SrlParse, FeatureError> {
        let labeler = self.labeler.ok_or(FeatureError::MissingLabeler)?;
        Ok(labeler.label(sentence)?)
    }

    /// Attach a per-row analysis of the head column as a derived column
    pub fn annotate(
        &self,
        table: &mut RelationTable,
        kind: AnalysisKind,
    ) -> Result<usize, FeatureError> {
        let values = match kind {
            AnalysisKind::SemanticRoles => {
                let labeler = self.labeler.ok_or(FeatureError::MissingLabeler)?;
                tracing::info!(rows = table.len(), "start srl parsing");
                table
                    .rows()
                    .map(|(_, t)| labeler.label(&t.head).map(RowFeature::SemanticRoles))
                    .collect::<Result<Vec<_>, _>>()?
            }
            AnalysisKind::Dependency => {
                tracing::info!(rows = table.len(), "start dep parsing");
                table
                    .rows()
                    .map(|(_, t)| {
                        self.analyze(&t.head)
                            .map(|doc| RowFeature::Dependency(dependency_arcs(&doc)))
                    })
                    .collect::<Result<Vec<_>, FeatureError>>()?
            }
        };
        let rows = values.len();
        table.attach_features(kind, values)?;
        Ok(rows)
    }

    /// `annotate` by analysis name (`srl`, `dp`, `dep`)
    ///
    /// Unknown names are rejected before any collaborator call.
    pub fn annotate_named(
        &self,
        table: &mut RelationTable,
        name: &str,
    ) -> Result<usize, FeatureError> {
        let kind = AnalysisKind::from_name(name)
            .ok_or_else(|| FeatureError::UnsupportedAnalysis(name.to_string()))?;
        self.annotate(table, kind)
    }

    /// `annotate_named` followed by a checkpoint of the annotated table
    pub fn annotate_and_save<S: TableStore>(
        &self,
        table: &mut RelationTable,
        name: &str,
        store: &S,
    ) -> Result<PathBuf, FeatureError> {
        self.annotate_named(table, name)?;
        Ok(store.save_annotated(table)?)
    }
}
