//! Term-to-page matching.

use regex::{Regex, RegexBuilder};

use crate::error::{Error, Result};
use crate::model::{MatchResult, TermMap};
use crate::parser::PageSelection;

/// Build a case-insensitive, whole-word matcher for a literal term.
///
/// Word boundaries follow Unicode word characters (letters, digits,
/// underscore), so `King` does not match inside `Viking` but does match
/// before punctuation.
pub fn term_regex(term: &str) -> Result<Regex> {
    RegexBuilder::new(&format!(r"\b{}\b", regex::escape(term)))
        .case_insensitive(true)
        .build()
        .map_err(|e| Error::InvalidTerm(term.to_string(), e.to_string()))
}

/// Matches every label of a [`TermMap`] against a document's body text.
pub struct TermMatcher<'t> {
    labels: Vec<(&'t str, Vec<Regex>)>,
    pages: PageSelection,
}

impl<'t> TermMatcher<'t> {
    /// Compile the search terms of every label.
    pub fn new(terms: &'t TermMap) -> Result<Self> {
        let labels = terms
            .iter()
            .map(|(label, terms)| {
                let patterns = terms
                    .iter()
                    .map(|t| term_regex(t))
                    .collect::<Result<Vec<_>>>()?;
                Ok::<_, Error>((label, patterns))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            labels,
            pages: PageSelection::All,
        })
    }

    /// Only scan the selected pages (1-based).
    pub fn with_pages(mut self, pages: PageSelection) -> Self {
        self.pages = pages;
        self
    }

    /// Scan `page_count` pages.
    ///
    /// `body_text` maps a 0-based page index to that page's body text. It
    /// is called at most once per page; the text is reused for every label.
    /// An error from `body_text` aborts the run.
    pub fn run<F>(&self, page_count: usize, mut body_text: F) -> Result<MatchResult>
    where
        F: FnMut(usize) -> Result<String>,
    {
        let mut cache: Vec<Option<String>> = vec![None; page_count];
        let mut result = MatchResult::new();

        for (label, patterns) in &self.labels {
            if patterns.is_empty() {
                continue;
            }

            let mut pages = Vec::new();
            for (index, slot) in cache.iter_mut().enumerate() {
                let page_num = index as u32 + 1;
                if !self.pages.includes(page_num) {
                    continue;
                }

                if slot.is_none() {
                    *slot = Some(body_text(index)?);
                }
                let text = slot.as_deref().unwrap_or_default();

                if patterns.iter().any(|p| p.is_match(text)) {
                    pages.push(page_num);
                }
            }

            log::debug!("{:?}: {} pages", label, pages.len());
            result.insert(*label, pages);
        }

        Ok(result)
    }
}

/// Find the pages on which each label's terms occur.
///
/// Convenience wrapper around [`TermMatcher`] scanning every page.
pub fn match_terms<F>(page_count: usize, body_text: F, terms: &TermMap) -> Result<MatchResult>
where
    F: FnMut(usize) -> Result<String>,
{
    TermMatcher::new(terms)?.run(page_count, body_text)
}
