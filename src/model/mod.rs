//! Data model shared by the parser and the indexing pipeline.
//!
//! All values are constructed fresh for each indexing run and owned by
//! it; nothing here is cached across runs.

mod block;
mod index;
mod terms;

pub use block::{BBox, PageBlock};
pub use index::{Index, IndexEntry, IndexOutcome, MatchResult};
pub use terms::TermMap;
