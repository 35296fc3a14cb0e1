//! Title queries: ordered sets of case-insensitive substrings.
//!
//! A window matches a [`TitleQuery`] when its title contains at least one of
//! the query's patterns, compared after Unicode lower-case folding.
//!
//! Folding is applied character by character (`char::to_lowercase`), so it is
//! context-free: the Greek final sigma `ς` is additionally folded to `σ`
//! because `str::to_lowercase` would otherwise produce `ς` or `σ` depending on
//! word position.  Full case folding (`ß` against `SS`) is not attempted.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised when building a [`TitleQuery`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum QueryError {
    /// A pattern was empty or whitespace only; it would match every window.
    #[error("title pattern at position {0} is empty")]
    EmptyPattern(usize),
}

/// An ordered set of case-insensitive title substrings.
///
/// Immutable once built.  Duplicate patterns (after folding) are dropped,
/// keeping the first occurrence.  An empty query is valid and matches nothing.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct TitleQuery {
    patterns: Vec<Pattern>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Pattern {
    raw: String,
    folded: String,
}

impl TitleQuery {
    /// Builds a query from patterns in priority order.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::EmptyPattern`] if any pattern is blank.
    pub fn new<I, S>(patterns: I) -> Result<Self, QueryError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut out: Vec<Pattern> = Vec::new();
        for (index, raw) in patterns.into_iter().enumerate() {
            let raw: String = raw.into();
            if raw.trim().is_empty() {
                return Err(QueryError::EmptyPattern(index));
            }
            let folded = fold_case(&raw);
            if out.iter().any(|p| p.folded == folded) {
                continue;
            }
            out.push(Pattern { raw, folded });
        }
        Ok(Self { patterns: out })
    }

    /// Builds a single-pattern query.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::EmptyPattern`] if `pattern` is blank.
    pub fn single(pattern: impl Into<String>) -> Result<Self, QueryError> {
        Self::new([pattern.into()])
    }

    /// Returns `true` if the query holds no patterns.
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Number of distinct patterns.
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    /// Iterates the patterns as originally written, in order.
    pub fn patterns(&self) -> impl Iterator<Item = &str> {
        self.patterns.iter().map(|p| p.raw.as_str())
    }

    /// Returns the first pattern contained in `title`, if any.
    pub fn first_match(&self, title: &str) -> Option<&str> {
        if self.patterns.is_empty() {
            return None;
        }
        let folded_title = fold_case(title);
        self.patterns
            .iter()
            .find(|p| folded_title.contains(&p.folded))
            .map(|p| p.raw.as_str())
    }

    /// Returns `true` if `title` contains at least one pattern.
    pub fn matches(&self, title: &str) -> bool {
        self.first_match(title).is_some()
    }
}

impl TryFrom<Vec<String>> for TitleQuery {
    type Error = QueryError;

    fn try_from(value: Vec<String>) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<TitleQuery> for Vec<String> {
    fn from(query: TitleQuery) -> Self {
        query.patterns.into_iter().map(|p| p.raw).collect()
    }
}

fn fold_case(s: &str) -> String {
    s.chars()
        .flat_map(char::to_lowercase)
        .map(|c| if c == 'ς' { 'σ' } else { c })
        .collect()
}
