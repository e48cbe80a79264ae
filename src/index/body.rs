//! Body text extraction.

use crate::model::PageBlock;

/// Concatenate the text of every block outside the header band.
///
/// A block is dropped only when its bottom edge lies strictly above
/// `header_threshold`. Each kept fragment is preceded by a single space,
/// in the order given.
pub fn extract_body_text(blocks: &[PageBlock], header_threshold: f32) -> String {
    let mut body = String::new();
    for block in blocks.iter().filter(|b| !b.is_header(header_threshold)) {
        body.push(' ');
        body.push_str(&block.text);
    }
    body
}
