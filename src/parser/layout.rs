//! Block layout for PDF pages.
//!
//! Interprets a page's content stream into positioned text spans, groups
//! spans into lines and lines into blocks, and reports each block as a
//! [`PageBlock`] in top-left-origin coordinates (y grows downward).

use crate::error::Result;
use crate::model::{BBox, PageBlock};

use super::backend::{
    decode_text, get_number_from_value, FontEncodings, PageId, PdfBackend, PdfValue,
};

/// Average glyph width as a fraction of the font size, used when no
/// metrics are available.
const AVG_CHAR_WIDTH_RATIO: f32 = 0.5;

/// A vertical gap between lines larger than this multiple of the font
/// size starts a new block.
const BLOCK_GAP_RATIO: f32 = 1.6;

/// TJ adjustments beyond this (in thousandths of an em) are word breaks.
const TJ_SPACE_THRESHOLD: f32 = 200.0;

/// A text span with position information, in PDF user space (y up).
#[derive(Debug, Clone)]
pub struct TextSpan {
    /// The text content
    pub text: String,
    /// X position (left edge)
    pub x: f32,
    /// Y position (baseline)
    pub y: f32,
    /// Width of the text
    pub width: f32,
    /// Font size in points
    pub font_size: f32,
}

impl TextSpan {
    /// Create a new text span.
    pub fn new(text: impl Into<String>, x: f32, y: f32, width: f32, font_size: f32) -> Self {
        Self {
            text: text.into(),
            x,
            y,
            width,
            font_size,
        }
    }

    /// Get the bottom Y coordinate (approximate, based on font size).
    pub fn bottom(&self) -> f32 {
        self.y - self.font_size * 0.2 // Approximate descender
    }

    /// Get the top Y coordinate (approximate, based on font size).
    pub fn top(&self) -> f32 {
        self.y + self.font_size * 0.8 // Approximate ascender
    }
}

/// A text line composed of multiple spans on the same baseline.
#[derive(Debug, Clone)]
pub struct TextLine {
    /// The spans in this line, sorted by X position
    pub spans: Vec<TextSpan>,
    /// Y position (baseline)
    pub y: f32,
    /// Dominant font size in this line
    pub font_size: f32,
}

impl TextLine {
    /// Create a new text line from spans.
    pub fn from_spans(mut spans: Vec<TextSpan>) -> Self {
        if spans.is_empty() {
            return Self {
                spans,
                y: 0.0,
                font_size: 0.0,
            };
        }

        spans.sort_by(|a, b| a.x.partial_cmp(&b.x).unwrap_or(std::cmp::Ordering::Equal));

        // Dominant font size, weighted by text length
        let total_chars: usize = spans.iter().map(|s| s.text.len()).sum();
        let weighted_size: f32 = spans
            .iter()
            .map(|s| s.font_size * s.text.len() as f32)
            .sum();
        let font_size = if total_chars > 0 {
            weighted_size / total_chars as f32
        } else {
            spans[0].font_size
        };

        let y = spans[0].y;
        Self {
            spans,
            y,
            font_size,
        }
    }

    /// Get the combined text of all spans.
    ///
    /// Inserts a space where the horizontal gap between spans suggests a
    /// word break, except between characters of scripts written without
    /// spaces.
    pub fn text(&self) -> String {
        let mut result = String::new();

        for (i, span) in self.spans.iter().enumerate() {
            if i == 0 {
                result.push_str(&span.text);
                continue;
            }

            let prev = &self.spans[i - 1];
            let gap = span.x - (prev.x + prev.width);

            let char_count = span.text.chars().count();
            let avg_char_width = if char_count > 0 && span.width > 0.0 {
                span.width / char_count as f32
            } else {
                span.font_size * AVG_CHAR_WIDTH_RATIO
            };

            let spaceless = matches!(
                (prev.text.chars().last(), span.text.chars().next()),
                (Some(a), Some(b)) if is_spaceless_script_char(a) && is_spaceless_script_char(b)
            );
            let has_space = prev.text.ends_with([' ', '\u{00A0}'])
                || span.text.starts_with([' ', '\u{00A0}']);

            if gap > avg_char_width * 0.2 && !spaceless && !has_space {
                result.push(' ');
            }
            result.push_str(&span.text);
        }

        result
    }

    /// Bounding box in top-left-origin coordinates, measured down from the
    /// page's top edge at user-space y `page_top`.
    fn bbox(&self, page_top: f32) -> BBox {
        let mut x0 = f32::MAX;
        let mut x1 = f32::MIN;
        let mut top = f32::MIN;
        let mut bottom = f32::MAX;
        for span in &self.spans {
            x0 = x0.min(span.x);
            x1 = x1.max(span.x + span.width);
            top = top.max(span.top());
            bottom = bottom.min(span.bottom());
        }
        BBox::new(x0, page_top - top, x1, page_top - bottom)
    }
}

/// Extracts positioned text blocks from PDF pages.
pub struct LayoutAnalyzer<'a, B: PdfBackend + ?Sized> {
    backend: &'a B,
}

impl<'a, B: PdfBackend + ?Sized> LayoutAnalyzer<'a, B> {
    /// Create a new layout analyzer.
    pub fn new(backend: &'a B) -> Self {
        Self { backend }
    }

    /// Extract the text blocks of a page, top to bottom.
    pub fn page_blocks(&self, page_id: PageId) -> Result<Vec<PageBlock>> {
        let page_top = self.backend.page_top(page_id)?;
        let spans = self.extract_page_spans(page_id)?;
        let lines = group_spans_into_lines(spans);
        let blocks = group_lines_into_blocks(lines, page_top);

        log::debug!("page {:?}: {} blocks", page_id, blocks.len());
        Ok(blocks)
    }

    /// Extract text spans from a page with position information.
    pub fn extract_page_spans(&self, page_id: PageId) -> Result<Vec<TextSpan>> {
        let content = self.backend.page_content(page_id)?;
        let ops = self.backend.decode_content(&content)?;
        let fonts = self.backend.font_encodings(page_id);

        let mut state = TextState::default();
        let mut ctm_stack: Vec<Matrix> = Vec::new();
        let mut spans = Vec::new();

        for op in ops {
            let operands = &op.operands;
            match op.operator.as_str() {
                "q" => ctm_stack.push(state.ctm),
                "Q" => {
                    if let Some(ctm) = ctm_stack.pop() {
                        state.ctm = ctm;
                    }
                }
                "cm" => {
                    if let Some(m) = Matrix::from_operands(operands) {
                        state.ctm = m.concat(&state.ctm);
                    }
                }
                "BT" => {
                    state.in_text = true;
                    state.tm = Matrix::IDENTITY;
                    state.tlm = Matrix::IDENTITY;
                }
                "ET" => state.in_text = false,
                "Tf" => {
                    if let Some(PdfValue::Name(name)) = operands.first() {
                        state.font_name = name.clone();
                    }
                    if let Some(size) = operands.get(1).and_then(get_number_from_value) {
                        state.font_size = size;
                    }
                }
                "TL" => {
                    if let Some(leading) = operands.first().and_then(get_number_from_value) {
                        state.leading = leading;
                    }
                }
                "Td" | "TD" => {
                    let tx = operands.first().and_then(get_number_from_value);
                    let ty = operands.get(1).and_then(get_number_from_value);
                    if let (Some(tx), Some(ty)) = (tx, ty) {
                        if op.operator == "TD" {
                            state.leading = -ty;
                        }
                        state.move_line(tx, ty);
                    }
                }
                "Tm" => {
                    if let Some(m) = Matrix::from_operands(operands) {
                        state.tm = m;
                        state.tlm = m;
                    }
                }
                "T*" => state.next_line(),
                "Tj" => {
                    if let Some(PdfValue::Str(bytes)) = operands.first() {
                        let text = decode(&fonts, &state, bytes);
                        state.show(text, 0.0, &mut spans);
                    }
                }
                "TJ" => {
                    if let Some(PdfValue::Array(items)) = operands.first() {
                        let (text, adjust) = decode_tj(&fonts, &state, items);
                        state.show(text, adjust, &mut spans);
                    }
                }
                "'" | "\"" => {
                    state.next_line();
                    let text_idx = if op.operator == "\"" { 2 } else { 0 };
                    if let Some(PdfValue::Str(bytes)) = operands.get(text_idx) {
                        let text = decode(&fonts, &state, bytes);
                        state.show(text, 0.0, &mut spans);
                    }
                }
                _ => {}
            }
        }

        Ok(spans)
    }
}

fn decode(fonts: &FontEncodings, state: &TextState, bytes: &[u8]) -> String {
    decode_text(fonts.get(&state.font_name).map(String::as_str), bytes)
}

/// Decode a TJ array, returning the text and the total positioning
/// adjustment in thousandths of an em.
fn decode_tj(fonts: &FontEncodings, state: &TextState, items: &[PdfValue]) -> (String, f32) {
    let mut combined = String::new();
    let mut adjust = 0.0;

    for item in items {
        match item {
            PdfValue::Str(bytes) => combined.push_str(&decode(fonts, state, bytes)),
            other => {
                let Some(n) = get_number_from_value(other) else {
                    continue;
                };
                adjust += n;
                // Negative values advance the pen; large ones are word gaps
                let ends_with_space = combined.ends_with([' ', '\u{00A0}']);
                let spaceless = combined
                    .chars()
                    .last()
                    .map(is_spaceless_script_char)
                    .unwrap_or(true);
                if -n > TJ_SPACE_THRESHOLD && !ends_with_space && !spaceless {
                    combined.push(' ');
                }
            }
        }
    }

    (combined, adjust)
}

/// Group spans into lines based on baseline, top to bottom.
fn group_spans_into_lines(mut spans: Vec<TextSpan>) -> Vec<TextLine> {
    if spans.is_empty() {
        return vec![];
    }

    // Sort spans by Y (descending, since PDF Y is bottom-up) then X
    spans.sort_by(|a, b| {
        b.y.partial_cmp(&a.y)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.x.partial_cmp(&b.x).unwrap_or(std::cmp::Ordering::Equal))
    });

    let mut lines: Vec<TextLine> = Vec::new();
    let mut current: Vec<TextSpan> = Vec::new();
    let mut current_y: Option<f32> = None;

    for span in spans {
        let tolerance = span.font_size * 0.3;
        match current_y {
            Some(y) if (span.y - y).abs() <= tolerance => current.push(span),
            _ => {
                if !current.is_empty() {
                    lines.push(TextLine::from_spans(std::mem::take(&mut current)));
                }
                current_y = Some(span.y);
                current.push(span);
            }
        }
    }

    if !current.is_empty() {
        lines.push(TextLine::from_spans(current));
    }

    lines
}

/// Group consecutive lines into blocks, breaking on large vertical gaps
/// and font size changes.
fn group_lines_into_blocks(lines: Vec<TextLine>, page_top: f32) -> Vec<PageBlock> {
    let mut blocks = Vec::new();
    let mut current: Vec<TextLine> = Vec::new();

    for line in lines {
        if let Some(prev) = current.last() {
            if should_break_block(prev, &line) {
                blocks.push(make_block(std::mem::take(&mut current), page_top));
            }
        }
        current.push(line);
    }

    if !current.is_empty() {
        blocks.push(make_block(current, page_top));
    }

    blocks
}

fn should_break_block(prev: &TextLine, curr: &TextLine) -> bool {
    let spacing = (prev.y - curr.y).abs();
    let size = prev.font_size.max(curr.font_size);

    spacing > size * BLOCK_GAP_RATIO || (prev.font_size - curr.font_size).abs() > 1.0
}

fn make_block(lines: Vec<TextLine>, page_top: f32) -> PageBlock {
    let bbox = lines
        .iter()
        .map(|l| l.bbox(page_top))
        .reduce(|a, b| a.union(&b))
        .unwrap_or_default();
    let text = lines
        .iter()
        .map(TextLine::text)
        .collect::<Vec<_>>()
        .join(" ");
    PageBlock::new(bbox, text)
}

/// Affine transform `[a b c d e f]` as used by PDF (row-vector convention).
#[derive(Debug, Clone, Copy, PartialEq)]
struct Matrix {
    a: f32,
    b: f32,
    c: f32,
    d: f32,
    e: f32,
    f: f32,
}

impl Matrix {
    const IDENTITY: Matrix = Matrix {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        e: 0.0,
        f: 0.0,
    };

    fn translation(tx: f32, ty: f32) -> Self {
        Matrix {
            e: tx,
            f: ty,
            ..Self::IDENTITY
        }
    }

    fn from_operands(operands: &[PdfValue]) -> Option<Self> {
        if operands.len() < 6 {
            return None;
        }
        let n: Vec<f32> = operands[..6]
            .iter()
            .map(|v| get_number_from_value(v).unwrap_or(0.0))
            .collect();
        Some(Matrix {
            a: n[0],
            b: n[1],
            c: n[2],
            d: n[3],
            e: n[4],
            f: n[5],
        })
    }

    /// `self × other`
    fn concat(&self, other: &Matrix) -> Matrix {
        Matrix {
            a: self.a * other.a + self.b * other.c,
            b: self.a * other.b + self.b * other.d,
            c: self.c * other.a + self.d * other.c,
            d: self.c * other.b + self.d * other.d,
            e: self.e * other.a + self.f * other.c + other.e,
            f: self.e * other.b + self.f * other.d + other.f,
        }
    }

    fn transform(&self, x: f32, y: f32) -> (f32, f32) {
        (
            self.a * x + self.c * y + self.e,
            self.b * x + self.d * y + self.f,
        )
    }

    fn vertical_scale(&self) -> f32 {
        (self.c * self.c + self.d * self.d).sqrt()
    }
}

/// Text and graphics state tracked while interpreting a content stream.
#[derive(Debug, Clone)]
struct TextState {
    ctm: Matrix,
    tm: Matrix,
    tlm: Matrix,
    font_name: Vec<u8>,
    font_size: f32,
    leading: f32,
    in_text: bool,
}

impl Default for TextState {
    fn default() -> Self {
        Self {
            ctm: Matrix::IDENTITY,
            tm: Matrix::IDENTITY,
            tlm: Matrix::IDENTITY,
            font_name: Vec::new(),
            font_size: 12.0,
            leading: 0.0,
            in_text: false,
        }
    }
}

impl TextState {
    fn move_line(&mut self, tx: f32, ty: f32) {
        self.tlm = Matrix::translation(tx, ty).concat(&self.tlm);
        self.tm = self.tlm;
    }

    fn next_line(&mut self) {
        // Without TL, fall back to single spacing
        let leading = if self.leading != 0.0 {
            self.leading
        } else {
            self.font_size * 1.2
        };
        self.move_line(0.0, -leading);
    }

    /// Record a span for `text` at the current position and advance the
    /// text matrix past it.
    fn show(&mut self, text: String, tj_adjust: f32, spans: &mut Vec<TextSpan>) {
        if !self.in_text {
            return;
        }

        let rendering = self.tm.concat(&self.ctm);
        let (x, y) = rendering.transform(0.0, 0.0);

        let glyphs = text.chars().count() as f32;
        let advance = glyphs * self.font_size * AVG_CHAR_WIDTH_RATIO
            - tj_adjust / 1000.0 * self.font_size;
        let (end_x, _) = rendering.transform(advance, 0.0);
        self.tm = Matrix::translation(advance, 0.0).concat(&self.tm);

        if text.trim().is_empty() {
            return;
        }

        let size = self.font_size * rendering.vertical_scale();
        spans.push(TextSpan::new(text, x, y, (end_x - x).abs(), size));
    }
}

/// Check if character is from a script that doesn't use word spaces.
/// Chinese and Japanese don't use spaces between words, but Korean does.
fn is_spaceless_script_char(c: char) -> bool {
    let code = c as u32;

    // CJK Unified Ideographs and extensions
    (0x4E00..=0x9FFF).contains(&code)
    || (0x3400..=0x4DBF).contains(&code)
    || (0x20000..=0x2EBEF).contains(&code)
    // Hiragana, Katakana
    || (0x3040..=0x30FF).contains(&code)
    // CJK Symbols and Punctuation
    || (0x3000..=0x303F).contains(&code)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::backend::ContentOp;
    use std::collections::BTreeMap;

    const PAGE: PageId = (3, 0);

    /// Mock backend serving pre-decoded operations for a single page.
    struct MockBackend {
        top: f32,
        ops: Vec<ContentOp>,
        fonts: FontEncodings,
    }

    impl MockBackend {
        fn new(ops: Vec<ContentOp>) -> Self {
            Self {
                top: 792.0,
                ops,
                fonts: FontEncodings::new(),
            }
        }

        fn with_top(mut self, top: f32) -> Self {
            self.top = top;
            self
        }
    }

    impl PdfBackend for MockBackend {
        fn pages(&self) -> BTreeMap<u32, PageId> {
            BTreeMap::from([(1, PAGE)])
        }

        fn page_top(&self, _page: PageId) -> Result<f32> {
            Ok(self.top)
        }

        fn page_content(&self, _page: PageId) -> Result<Vec<u8>> {
            Ok(vec![])
        }

        fn decode_content(&self, _data: &[u8]) -> Result<Vec<ContentOp>> {
            Ok(self.ops.clone())
        }

        fn font_encodings(&self, _page: PageId) -> FontEncodings {
            self.fonts.clone()
        }
    }

    fn num(n: f32) -> PdfValue {
        PdfValue::Real(n)
    }

    fn s(text: &str) -> PdfValue {
        PdfValue::Str(text.as_bytes().to_vec())
    }

    /// `BT /F1 size Tf x y Td (text) Tj ET`
    fn text_at(x: f32, y: f32, size: f32, text: &str) -> Vec<ContentOp> {
        vec![
            ContentOp::new("BT", vec![]),
            ContentOp::new("Tf", vec![PdfValue::Name(b"F1".to_vec()), num(size)]),
            ContentOp::new("Td", vec![num(x), num(y)]),
            ContentOp::new("Tj", vec![s(text)]),
            ContentOp::new("ET", vec![]),
        ]
    }

    #[test]
    fn test_header_and_body_are_separate_blocks() {
        let mut ops = text_at(72.0, 752.0, 12.0, "Chapter One");
        ops.extend(text_at(72.0, 700.0, 12.0, "The fire burned."));
        let backend = MockBackend::new(ops);

        let blocks = LayoutAnalyzer::new(&backend).page_blocks(PAGE).unwrap();
        assert_eq!(blocks.len(), 2);

        assert_eq!(blocks[0].text, "Chapter One");
        assert!((blocks[0].bbox.y1 - 42.4).abs() < 0.01);
        assert!(blocks[0].is_header(80.0));

        assert_eq!(blocks[1].text, "The fire burned.");
        assert!((blocks[1].bbox.y0 - 82.4).abs() < 0.01);
        assert!(!blocks[1].is_header(80.0));
    }

    #[test]
    fn test_consecutive_lines_form_one_block() {
        let ops = vec![
            ContentOp::new("BT", vec![]),
            ContentOp::new("Tf", vec![PdfValue::Name(b"F1".to_vec()), num(10.0)]),
            ContentOp::new("TL", vec![num(12.0)]),
            ContentOp::new("Td", vec![num(72.0), num(600.0)]),
            ContentOp::new("Tj", vec![s("first line")]),
            ContentOp::new("T*", vec![]),
            ContentOp::new("Tj", vec![s("second line")]),
            ContentOp::new("'", vec![s("third line")]),
            ContentOp::new("ET", vec![]),
        ];
        let backend = MockBackend::new(ops);

        let blocks = LayoutAnalyzer::new(&backend).page_blocks(PAGE).unwrap();
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].text, "first line second line third line");
        // Bottom of the third line: 792 - (576 - 2)
        assert!((blocks[0].bbox.y1 - 218.0).abs() < 0.01);
    }

    #[test]
    fn test_tj_word_gaps_insert_spaces() {
        let ops = vec![
            ContentOp::new("BT", vec![]),
            ContentOp::new("Tf", vec![PdfValue::Name(b"F1".to_vec()), num(12.0)]),
            ContentOp::new("Td", vec![num(72.0), num(500.0)]),
            ContentOp::new(
                "TJ",
                vec![PdfValue::Array(vec![
                    s("King"),
                    PdfValue::Integer(-250),
                    s("Conan"),
                    PdfValue::Integer(-20),
                    s("!"),
                ])],
            ),
            ContentOp::new("ET", vec![]),
        ];
        let backend = MockBackend::new(ops);

        let blocks = LayoutAnalyzer::new(&backend).page_blocks(PAGE).unwrap();
        assert_eq!(blocks[0].text, "King Conan!");
    }

    #[test]
    fn test_cm_and_tm_positioning() {
        let ops = vec![
            ContentOp::new("q", vec![]),
            ContentOp::new(
                "cm",
                vec![num(1.0), num(0.0), num(0.0), num(1.0), num(0.0), num(100.0)],
            ),
            ContentOp::new("BT", vec![]),
            ContentOp::new("Tf", vec![PdfValue::Name(b"F1".to_vec()), num(1.0)]),
            ContentOp::new(
                "Tm",
                vec![num(10.0), num(0.0), num(0.0), num(10.0), num(50.0), num(600.0)],
            ),
            ContentOp::new("Tj", vec![s("scaled")]),
            ContentOp::new("ET", vec![]),
            ContentOp::new("Q", vec![]),
        ];
        let backend = MockBackend::new(ops);

        let spans = LayoutAnalyzer::new(&backend)
            .extract_page_spans(PAGE)
            .unwrap();
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].x, 50.0);
        assert_eq!(spans[0].y, 700.0);
        assert_eq!(spans[0].font_size, 10.0);
        assert_eq!(spans[0].width, 30.0);
    }

    #[test]
    fn test_text_outside_bt_is_ignored() {
        let ops = vec![ContentOp::new("Tj", vec![s("stray")])];
        let backend = MockBackend::new(ops);
        let blocks = LayoutAnalyzer::new(&backend).page_blocks(PAGE).unwrap();
        assert!(blocks.is_empty());
    }

    #[test]
    fn test_offset_media_box_measures_from_top_edge() {
        // MediaBox [0 100 612 892]: the top edge sits at y=892
        let mut ops = text_at(72.0, 852.0, 12.0, "Running Head");
        ops.extend(text_at(72.0, 800.0, 12.0, "Body text."));
        let backend = MockBackend::new(ops).with_top(892.0);

        let blocks = LayoutAnalyzer::new(&backend).page_blocks(PAGE).unwrap();
        assert_eq!(blocks.len(), 2);

        assert!((blocks[0].bbox.y1 - 42.4).abs() < 0.01);
        assert!(blocks[0].is_header(80.0));

        assert!((blocks[1].bbox.y0 - 82.4).abs() < 0.01);
        assert!((blocks[1].bbox.y1 - 94.4).abs() < 0.01);
        assert!(!blocks[1].is_header(80.0));
    }

    #[test]
    fn test_identity_font_decoded_as_utf16() {
        let ops = vec![
            ContentOp::new("BT", vec![]),
            ContentOp::new("Tf", vec![PdfValue::Name(b"F2".to_vec()), num(12.0)]),
            ContentOp::new("Td", vec![num(72.0), num(500.0)]),
            ContentOp::new("Tj", vec![PdfValue::Str(vec![0x00, 0x46, 0x00, 0x69])]),
            ContentOp::new("ET", vec![]),
        ];
        let mut backend = MockBackend::new(ops);
        backend
            .fonts
            .insert(b"F2".to_vec(), "Identity-H".to_string());

        let blocks = LayoutAnalyzer::new(&backend).page_blocks(PAGE).unwrap();
        assert_eq!(blocks[0].text, "Fi");
    }

    #[test]
    fn test_line_text_spacing() {
        let line = TextLine::from_spans(vec![
            TextSpan::new("world", 130.0, 500.0, 30.0, 12.0),
            TextSpan::new("Hello", 72.0, 500.0, 30.0, 12.0),
        ]);
        assert_eq!(line.text(), "Hello world");

        let cjk = TextLine::from_spans(vec![
            TextSpan::new("日本", 72.0, 500.0, 24.0, 12.0),
            TextSpan::new("語", 110.0, 500.0, 12.0, 12.0),
        ]);
        assert_eq!(cjk.text(), "日本語");
    }
}
