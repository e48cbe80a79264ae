//! Rendering module for writing an index in various output formats.

mod json;
mod text;

pub use json::{to_json, JsonFormat};
pub use text::to_text;
