//! Label to search-term mapping.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Mapping from index label to the search terms (synonyms) that locate it.
///
/// Inserting a label that already exists replaces its terms.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TermMap {
    entries: BTreeMap<String, Vec<String>>,
}

impl TermMap {
    /// Create an empty term map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a label with its terms, returning the terms it replaced.
    pub fn insert(&mut self, label: impl Into<String>, terms: Vec<String>) -> Option<Vec<String>> {
        self.entries.insert(label.into(), terms)
    }

    /// Terms for a label.
    pub fn get(&self, label: &str) -> Option<&[String]> {
        self.entries.get(label).map(Vec::as_slice)
    }

    /// Iterate over `(label, terms)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries
            .iter()
            .map(|(label, terms)| (label.as_str(), terms.as_slice()))
    }

    /// Iterate over labels.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Number of labels.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if no labels were supplied.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<L: Into<String>> FromIterator<(L, Vec<String>)> for TermMap {
    fn from_iter<I: IntoIterator<Item = (L, Vec<String>)>>(iter: I) -> Self {
        let mut map = TermMap::new();
        for (label, terms) in iter {
            map.insert(label, terms);
        }
        map
    }
}
