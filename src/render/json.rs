//! JSON rendering of an index.

use crate::error::{Error, Result};
use crate::model::Index;

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Pretty-printed JSON with indentation
    #[default]
    Pretty,
    /// Compact JSON without extra whitespace
    Compact,
}

/// Convert an index to JSON.
pub fn to_json(index: &Index, format: JsonFormat) -> Result<String> {
    let result = match format {
        JsonFormat::Pretty => serde_json::to_string_pretty(index),
        JsonFormat::Compact => serde_json::to_string(index),
    };

    result.map_err(|e| Error::Render(format!("JSON serialization error: {}", e)))
}
