//! Match results and the assembled index.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Pages (1-based) on which each label was found.
///
/// Page lists are kept ascending and deduplicated; labels without pages
/// are never stored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MatchResult {
    pages: BTreeMap<String, Vec<u32>>,
}

impl MatchResult {
    /// Create an empty result.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the pages for a label. An empty page list leaves the result
    /// unchanged.
    pub fn insert(&mut self, label: impl Into<String>, mut pages: Vec<u32>) {
        if pages.is_empty() {
            return;
        }
        pages.sort_unstable();
        pages.dedup();
        self.pages.insert(label.into(), pages);
    }

    /// Pages for a label.
    pub fn get(&self, label: &str) -> Option<&[u32]> {
        self.pages.get(label).map(Vec::as_slice)
    }

    /// Iterate over `(label, pages)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[u32])> {
        self.pages
            .iter()
            .map(|(label, pages)| (label.as_str(), pages.as_slice()))
    }

    /// Number of labels with at least one page.
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    /// Check if no label matched.
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}

/// One line of the index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexEntry {
    /// Display label
    pub label: String,
    /// Pages on which the label was found (1-based, ascending)
    pub pages: Vec<u32>,
    /// Collapsed page ranges, e.g. `"1-3, 5"`
    pub ranges: String,
}

impl IndexEntry {
    /// Formatted index line: `"<label> - <ranges>"`.
    pub fn line(&self) -> String {
        format!("{} - {}", self.label, self.ranges)
    }
}

/// A generated index, entries sorted case-insensitively by label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Index {
    /// Ordered index entries
    pub entries: Vec<IndexEntry>,
    #[serde(skip)]
    matches: MatchResult,
}

impl Index {
    pub(crate) fn new(entries: Vec<IndexEntry>, matches: MatchResult) -> Self {
        Self { entries, matches }
    }

    /// Formatted lines in index order.
    pub fn lines(&self) -> Vec<String> {
        self.entries.iter().map(IndexEntry::line).collect()
    }

    /// The index as newline-separated text.
    pub fn to_text(&self) -> String {
        self.lines().join("\n")
    }

    /// The underlying label to pages mapping.
    pub fn matches(&self) -> &MatchResult {
        &self.matches
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the index has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Result of an indexing run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexOutcome {
    /// At least one label matched.
    Found(Index),
    /// Terms were supplied and the document was scanned, but nothing matched.
    NoMatches,
}

impl IndexOutcome {
    /// The index, if any label matched.
    pub fn index(&self) -> Option<&Index> {
        match self {
            IndexOutcome::Found(index) => Some(index),
            IndexOutcome::NoMatches => None,
        }
    }

    /// Consume the outcome, returning the index if any label matched.
    pub fn into_index(self) -> Option<Index> {
        match self {
            IndexOutcome::Found(index) => Some(index),
            IndexOutcome::NoMatches => None,
        }
    }

    /// Check if nothing matched.
    pub fn is_no_matches(&self) -> bool {
        matches!(self, IndexOutcome::NoMatches)
    }
}
