//! PDF backend abstraction layer.
//!
//! Provides a trait-based interface for the handful of PDF operations the
//! block layout needs, isolating the concrete PDF library (lopdf) from the
//! indexing logic.

use std::collections::{BTreeMap, HashSet};
use std::io::Read;
use std::path::Path;

use lopdf::{Document as LopdfDocument, Object};

use crate::error::{Error, Result};

/// Page identifier: (object number, generation number).
pub type PageId = (u32, u16);

/// Top edge used when a page has no usable MediaBox (US Letter).
pub const DEFAULT_PAGE_TOP: f32 = 792.0;

/// Font resource name to declared encoding name, for one page.
pub type FontEncodings = BTreeMap<Vec<u8>, String>;

/// A value from a PDF content stream operand.
#[derive(Debug, Clone, PartialEq)]
pub enum PdfValue {
    Integer(i64),
    Real(f32),
    Name(Vec<u8>),
    Str(Vec<u8>),
    Array(Vec<PdfValue>),
    Other,
}

/// A single operation from a PDF content stream.
#[derive(Debug, Clone)]
pub struct ContentOp {
    pub operator: String,
    pub operands: Vec<PdfValue>,
}

impl ContentOp {
    /// Create an operation from an operator and its operands.
    pub fn new(operator: impl Into<String>, operands: Vec<PdfValue>) -> Self {
        Self {
            operator: operator.into(),
            operands,
        }
    }
}

/// Abstract interface for PDF document access.
///
/// Implementations provide page enumeration, page geometry, content stream
/// decoding, and text decoding without exposing any concrete PDF library
/// types.
pub trait PdfBackend {
    /// Return all pages as (1-based page number → PageId).
    fn pages(&self) -> BTreeMap<u32, PageId>;

    /// Return the user-space y coordinate of the page's top edge (the
    /// larger MediaBox y).
    fn page_top(&self, page: PageId) -> Result<f32>;

    /// Return the raw (decompressed) content stream bytes for a page.
    fn page_content(&self, page: PageId) -> Result<Vec<u8>>;

    /// Parse raw content stream bytes into a sequence of operations.
    fn decode_content(&self, data: &[u8]) -> Result<Vec<ContentOp>>;

    /// Return the encodings declared by the fonts available to a page.
    fn font_encodings(&self, page: PageId) -> FontEncodings;
}

/// Decode a text byte sequence shown with a font of the given encoding.
///
/// Identity-H/V fonts carry 2-byte codes that usually map to Unicode;
/// everything else goes through [`decode_text_simple`].
pub fn decode_text(encoding: Option<&str>, bytes: &[u8]) -> String {
    if let Some(encoding) = encoding {
        if encoding.starts_with("Identity") && bytes.len() >= 2 && bytes.len() % 2 == 0 {
            let units: Vec<u16> = bytes
                .chunks(2)
                .map(|c| u16::from_be_bytes([c[0], c[1]]))
                .collect();
            let decoded = String::from_utf16_lossy(&units);
            if !decoded.chars().all(|c| c == '\u{FFFD}' || c == '\0') {
                return decoded;
            }
        }
    }
    decode_text_simple(bytes)
}

/// Simple text decoding fallback when no encoding is available.
pub fn decode_text_simple(bytes: &[u8]) -> String {
    // Try UTF-16BE first (BOM marker)
    if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
        let utf16: Vec<u16> = bytes[2..]
            .chunks(2)
            .filter_map(|c| {
                if c.len() == 2 {
                    Some(u16::from_be_bytes([c[0], c[1]]))
                } else {
                    None
                }
            })
            .collect();
        return String::from_utf16_lossy(&utf16);
    }

    if let Ok(s) = std::str::from_utf8(bytes) {
        return s.to_string();
    }

    // Fallback: Latin-1
    bytes.iter().map(|&b| b as char).collect()
}

/// Helper: extract a number from a [`PdfValue`].
pub fn get_number_from_value(val: &PdfValue) -> Option<f32> {
    match val {
        PdfValue::Integer(i) => Some(*i as f32),
        PdfValue::Real(r) => Some(*r),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// LopdfBackend: concrete implementation backed by lopdf
// ---------------------------------------------------------------------------

/// Concrete [`PdfBackend`] backed by `lopdf::Document`.
pub struct LopdfBackend {
    doc: LopdfDocument,
}

impl LopdfBackend {
    /// Load from a file path.
    pub fn load_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let doc = LopdfDocument::load(path)?;
        Self::from_document(doc)
    }

    /// Load from an in-memory byte slice.
    pub fn load_bytes(data: &[u8]) -> Result<Self> {
        let doc = LopdfDocument::load_mem(data)?;
        Self::from_document(doc)
    }

    /// Load from a reader.
    pub fn load_reader<R: Read>(mut reader: R) -> Result<Self> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Self::load_bytes(&data)
    }

    fn from_document(doc: LopdfDocument) -> Result<Self> {
        if doc.is_encrypted() {
            return Err(Error::Encrypted);
        }
        Ok(Self { doc })
    }

    /// Get PDF version string.
    pub fn version(&self) -> String {
        self.doc.version.to_string()
    }

    /// Walk up the page tree to find the MediaBox array.
    ///
    /// Fails on a `Parent` chain that loops back on itself.
    fn find_media_box(&self, page: PageId) -> Result<Option<Vec<f32>>> {
        let mut seen = HashSet::from([page]);
        let mut dict = self.doc.get_dictionary(page)?;

        loop {
            if let Ok(obj) = dict.get(b"MediaBox") {
                let resolved = match obj {
                    Object::Reference(id) => self.doc.get_object(*id).ok(),
                    other => Some(other),
                };
                if let Some(Object::Array(arr)) = resolved {
                    let nums: Vec<f32> = arr.iter().filter_map(get_number).collect();
                    if nums.len() == 4 {
                        return Ok(Some(nums));
                    }
                }
            }

            let Ok(parent_id) = dict.get(b"Parent").and_then(Object::as_reference) else {
                return Ok(None);
            };
            if !seen.insert(parent_id) {
                return Err(Error::PdfParse(format!(
                    "page tree cycle at object {} {}",
                    parent_id.0, parent_id.1
                )));
            }
            match self.doc.get_dictionary(parent_id) {
                Ok(parent) => dict = parent,
                Err(_) => return Ok(None),
            }
        }
    }
}

impl PdfBackend for LopdfBackend {
    fn pages(&self) -> BTreeMap<u32, PageId> {
        self.doc.get_pages()
    }

    fn page_top(&self, page: PageId) -> Result<f32> {
        match self.find_media_box(page)? {
            Some(b) => Ok(b[1].max(b[3])),
            None => {
                log::debug!("page {:?} has no MediaBox, assuming Letter", page);
                Ok(DEFAULT_PAGE_TOP)
            }
        }
    }

    fn page_content(&self, page: PageId) -> Result<Vec<u8>> {
        self.doc
            .get_page_content(page)
            .map_err(|e| Error::PdfParse(format!("cannot get page content: {}", e)))
    }

    fn decode_content(&self, data: &[u8]) -> Result<Vec<ContentOp>> {
        let content = lopdf::content::Content::decode(data)
            .map_err(|e| Error::PdfParse(format!("content stream decode error: {}", e)))?;

        Ok(content
            .operations
            .into_iter()
            .map(|op| ContentOp {
                operator: op.operator,
                operands: op.operands.iter().map(convert_object).collect(),
            })
            .collect())
    }

    fn font_encodings(&self, page: PageId) -> FontEncodings {
        let Ok(fonts) = self.doc.get_page_fonts(page) else {
            return FontEncodings::new();
        };
        fonts
            .into_iter()
            .filter_map(|(name, font)| match font.get(b"Encoding").ok()? {
                Object::Name(encoding) => {
                    Some((name, String::from_utf8_lossy(encoding).into_owned()))
                }
                _ => None,
            })
            .collect()
    }
}

/// Convert a `lopdf::Object` to [`PdfValue`].
fn convert_object(obj: &Object) -> PdfValue {
    match obj {
        Object::Integer(i) => PdfValue::Integer(*i),
        Object::Real(r) => PdfValue::Real(*r),
        Object::Name(n) => PdfValue::Name(n.clone()),
        Object::String(b, _) => PdfValue::Str(b.clone()),
        Object::Array(arr) => PdfValue::Array(arr.iter().map(convert_object).collect()),
        _ => PdfValue::Other,
    }
}

fn get_number(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r),
        _ => None,
    }
}
