//! Placeholder normalizer
//!
//! Replaces generic person markers (`PersonX`, `Person Y`, ...) with concrete
//! names. Each pattern gets one name drawn uniformly from the pool, every
//! matching span in the target columns is rewritten, and the name is then
//! removed from the pool so no two patterns share a name.
//!
//! The pool is a plain value owned by the caller: `fill_placeholders` consumes
//! it and hands back what is left.

use cskg_table::{Column, RelationTable};
use rand::Rng;
use regex::{NoExpand, Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

/// Placeholder regexes, matched case-insensitively, in processing order
pub const DEFAULT_PLACEHOLDER_PATTERNS: &[&str] =
    &[r"\bperson\s?x\b", r"\bperson\s?y\b", r"\bperson\s?z\b"];

/// Default candidate names
pub const DEFAULT_NAMES: &[&str] = &[
    "Alex", "Bailey", "Casey", "Dakota", "Emerson", "Finley", "Harper", "Jordan", "Kendall",
    "Logan", "Morgan", "Parker", "Quinn", "Riley", "Rowan", "Sawyer", "Skyler", "Taylor",
];

/// Columns rewritten when the caller does not name any
pub const DEFAULT_COLUMNS: &[Column] = &[Column::Head, Column::Tail];

#[derive(Debug, thiserror::Error)]
pub enum PlaceholderError {
    #[error("name pool exhausted at pattern `{pattern}` after {assigned} assignments")]
    PoolExhausted { pattern: String, assigned: usize },

    #[error("invalid placeholder pattern `{pattern}`: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

// ============================================================================
// Name pool
// ============================================================================

/// Candidate substitution names; duplicates are dropped on construction
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamePool {
    names: Vec<String>,
}

impl NamePool {
    pub fn new(names: impl IntoIterator<Item = String>) -> Self {
        let mut unique: Vec<String> = Vec::new();
        for name in names {
            if !unique.contains(&name) {
                unique.push(name);
            }
        }
        Self { names: unique }
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Draw one name uniformly; returns it with the reduced pool
    pub fn draw<R: Rng + ?Sized>(mut self, rng: &mut R) -> Option<(String, NamePool)> {
        if self.names.is_empty() {
            return None;
        }
        let idx = rng.gen_range(0..self.names.len());
        let name = self.names.remove(idx);
        Some((name, self))
    }
}

impl<S: Into<String>> FromIterator<S> for NamePool {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter.into_iter().map(Into::into))
    }
}

// ============================================================================
// Patterns
// ============================================================================

/// Compiled, ordered placeholder patterns
#[derive(Debug, Clone)]
pub struct PlaceholderSet {
    patterns: Vec<Regex>,
}

impl PlaceholderSet {
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Result<Self, PlaceholderError> {
        let patterns = patterns
            .iter()
            .map(|p| {
                RegexBuilder::new(p.as_ref())
                    .case_insensitive(true)
                    .build()
                    .map_err(|source| PlaceholderError::InvalidPattern {
                        pattern: p.as_ref().to_string(),
                        source,
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { patterns })
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn patterns(&self) -> impl Iterator<Item = &str> + '_ {
        self.patterns.iter().map(Regex::as_str)
    }
}

impl Default for PlaceholderSet {
    fn default() -> Self {
        let patterns = DEFAULT_PLACEHOLDER_PATTERNS
            .iter()
            .map(|p| {
                RegexBuilder::new(p)
                    .case_insensitive(true)
                    .build()
                    .unwrap()
            })
            .collect();
        Self { patterns }
    }
}

// ============================================================================
// Normalization
// ============================================================================

/// Name chosen for one placeholder pattern
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    pub pattern: String,
    pub name: String,
}

/// Outcome of a normalization run
#[derive(Debug, Clone)]
pub struct Normalization {
    /// One assignment per pattern, in processing order
    pub assignments: Vec<Assignment>,
    /// Names left after the run
    pub pool: NamePool,
    /// Number of cells that changed
    pub cells_rewritten: usize,
}

/// Replace every placeholder match in `columns` with a distinct name
///
/// Patterns are processed in order; missing cells pass through. On
/// `PoolExhausted` the table keeps the substitutions made for the earlier
/// patterns and should be reloaded before reuse.
pub fn fill_placeholders<R: Rng + ?Sized>(
    table: &mut RelationTable,
    columns: &[Column],
    placeholders: &PlaceholderSet,
    pool: NamePool,
    rng: &mut R,
) -> Result<Normalization, PlaceholderError> {
    let mut pool = pool;
    let mut assignments = Vec::with_capacity(placeholders.len());
    let mut cells_rewritten = 0;

    for rex in &placeholders.patterns {
        let (name, rest) = pool.draw(rng).ok_or_else(|| PlaceholderError::PoolExhausted {
            pattern: rex.as_str().to_string(),
            assigned: assignments.len(),
        })?;

        for &column in columns {
            for cell in table.column_mut(column) {
                if let Some(rewritten) = replace(cell, rex, &name) {
                    *cell = rewritten;
                    cells_rewritten += 1;
                }
            }
        }

        tracing::debug!(pattern = rex.as_str(), name = %name, "placeholder assigned");
        assignments.push(Assignment {
            pattern: rex.as_str().to_string(),
            name,
        });
        pool = rest;
    }

    tracing::info!(
        patterns = assignments.len(),
        cells = cells_rewritten,
        remaining = pool.len(),
        "placeholders filled"
    );

    Ok(Normalization {
        assignments,
        pool,
        cells_rewritten,
    })
}

/// Rewritten text, or `None` when the pattern does not occur
fn replace(text: &str, placeholder: &Regex, replace_with: &str) -> Option<String> {
    if !placeholder.is_match(text) {
        return None;
    }
    Some(placeholder.replace_all(text, NoExpand(replace_with)).into_owned())
}
