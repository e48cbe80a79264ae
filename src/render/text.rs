//! Plain text rendering of an index.

use crate::model::Index;

/// Render the index as newline-separated `"<label> - <ranges>"` lines,
/// suitable for saving as a `.txt` file.
pub fn to_text(index: &Index) -> String {
    index.to_text()
}
