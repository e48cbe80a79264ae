//! Positioned text produced by the PDF layout primitive.

use serde::{Deserialize, Serialize};

/// An axis-aligned bounding box in PDF points.
///
/// The origin is the top-left corner of the page and `y` grows downward,
/// so `y0` is the top edge and `y1` the bottom edge.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BBox {
    /// Left edge
    pub x0: f32,
    /// Top edge
    pub y0: f32,
    /// Right edge
    pub x1: f32,
    /// Bottom edge
    pub y1: f32,
}

impl BBox {
    /// Create a bounding box from its edges.
    pub fn new(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// Width of the box.
    pub fn width(&self) -> f32 {
        self.x1 - self.x0
    }

    /// Height of the box.
    pub fn height(&self) -> f32 {
        self.y1 - self.y0
    }

    /// Smallest box containing both `self` and `other`.
    pub fn union(&self, other: &BBox) -> BBox {
        BBox {
            x0: self.x0.min(other.x0),
            y0: self.y0.min(other.y0),
            x1: self.x1.max(other.x1),
            y1: self.y1.max(other.y1),
        }
    }
}

/// One fragment of positioned text on a page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageBlock {
    /// Bounding box of the fragment
    pub bbox: BBox,
    /// Text content
    pub text: String,
}

impl PageBlock {
    /// Create a new block.
    pub fn new(bbox: BBox, text: impl Into<String>) -> Self {
        Self {
            bbox,
            text: text.into(),
        }
    }

    /// Whether the block lies entirely inside the header band, i.e. its
    /// bottom edge is strictly above `header_threshold`.
    pub fn is_header(&self, header_threshold: f32) -> bool {
        self.bbox.y1 < header_threshold
    }
}
