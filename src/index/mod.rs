//! The indexing pipeline: term parsing, body text extraction, matching,
//! range collapsing and index assembly.

mod assemble;
mod body;
mod matcher;
mod ranges;
mod terms;

pub use assemble::{assemble, build_index, compare_labels};
pub use body::extract_body_text;
pub use matcher::{match_terms, term_regex, TermMatcher};
pub use ranges::collapse_ranges;
pub use terms::parse_terms;
