//! Synthetic PDF fixtures for integration tests.

#![allow(dead_code)]

/// One page of a synthetic document: an optional running head near the top
/// edge and body lines further down.
pub struct TestPage<'a> {
    pub header: Option<&'a str>,
    pub body: &'a [&'a str],
}

impl<'a> TestPage<'a> {
    pub fn new(header: Option<&'a str>, body: &'a [&'a str]) -> Self {
        Self { header, body }
    }
}

fn escape(text: &str) -> String {
    text.replace('\\', "\\\\")
        .replace('(', "\\(")
        .replace(')', "\\)")
}

fn page_content(page: &TestPage) -> String {
    let mut content = String::new();
    if let Some(header) = page.header {
        // Baseline 752 on a 792pt page puts the block between y=30.4 and y=42.4.
        content.push_str(&format!(
            "BT /F1 12 Tf 72 752 Td ({}) Tj ET\n",
            escape(header)
        ));
    }
    if !page.body.is_empty() {
        content.push_str("BT /F1 12 Tf 14 TL 72 700 Td\n");
        for (i, line) in page.body.iter().enumerate() {
            if i > 0 {
                content.push_str("T*\n");
            }
            content.push_str(&format!("({}) Tj\n", escape(line)));
        }
        content.push_str("ET\n");
    }
    content
}

/// Build a US Letter PDF with one Helvetica font and uncompressed content
/// streams.
pub fn build_pdf(pages: &[TestPage]) -> Vec<u8> {
    let page_count = pages.len();
    let mut objects: Vec<String> = Vec::new();

    objects.push("<< /Type /Catalog /Pages 2 0 R >>".to_string());

    let kids: Vec<String> = (0..page_count)
        .map(|i| format!("{} 0 R", 4 + i * 2))
        .collect();
    objects.push(format!(
        "<< /Type /Pages /Kids [{}] /Count {} >>",
        kids.join(" "),
        page_count
    ));

    objects.push(
        "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica /Encoding /WinAnsiEncoding >>"
            .to_string(),
    );

    for (i, page) in pages.iter().enumerate() {
        let content_id = 5 + i * 2;
        objects.push(format!(
            "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] \
             /Resources << /Font << /F1 3 0 R >> >> /Contents {} 0 R >>",
            content_id
        ));
        let content = page_content(page);
        objects.push(format!(
            "<< /Length {} >>\nstream\n{}endstream",
            content.len(),
            content
        ));
    }

    build_raw_pdf(&objects)
}

/// Serialize numbered objects (object `n` at index `n - 1`, catalog first)
/// with a correct xref table.
pub fn build_raw_pdf(objects: &[String]) -> Vec<u8> {
    let mut pdf = String::from("%PDF-1.4\n");
    let mut offsets = Vec::with_capacity(objects.len());
    for (i, object) in objects.iter().enumerate() {
        offsets.push(pdf.len());
        pdf.push_str(&format!("{} 0 obj\n{}\nendobj\n", i + 1, object));
    }

    let xref_offset = pdf.len();
    pdf.push_str(&format!("xref\n0 {}\n", objects.len() + 1));
    pdf.push_str("0000000000 65535 f \n");
    for offset in &offsets {
        pdf.push_str(&format!("{:010} 00000 n \n", offset));
    }
    pdf.push_str(&format!(
        "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{}\n%%EOF\n",
        objects.len() + 1,
        xref_offset
    ));

    pdf.into_bytes()
}

/// Ten pages that mention fire on 1-3 and 5, with the word "Fire" in every
/// running head.
pub fn fire_book() -> Vec<u8> {
    let bodies: [&[&str]; 10] = [
        &["The fire burned all night."],
        &["A small fire in the hearth."],
        &["Smoke, then fire."],
        &["Quiet water."],
        &["They fled the FIRE at dawn."],
        &["Nothing here."],
        &["Firewood was stacked high."],
        &["Misfire of the cannon."],
        &["Calm seas."],
        &["The end."],
    ];
    let pages: Vec<TestPage> = bodies
        .iter()
        .map(|body| TestPage::new(Some("Chapter One: Fire"), body))
        .collect();
    build_pdf(&pages)
}

const FONT: &str =
    "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica /Encoding /WinAnsiEncoding >>";

fn stream(content: &str) -> String {
    format!(
        "<< /Length {} >>\nstream\n{}endstream",
        content.len(),
        content
    )
}

/// One page, object 3, with the given page dictionary entries.
pub fn single_page_pdf(page_entries: &str, content: &str) -> Vec<u8> {
    build_raw_pdf(&[
        "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
        "<< /Type /Pages /Kids [3 0 R] /Count 1 >>".to_string(),
        format!(
            "<< /Type /Page {} /Resources << /Font << /F1 5 0 R >> >> /Contents 4 0 R >>",
            page_entries
        ),
        stream(content),
        FONT.to_string(),
    ])
}

/// A page without a MediaBox whose Parent points back at itself.
pub fn parent_cycle_pdf() -> Vec<u8> {
    single_page_pdf("/Parent 3 0 R", "BT /F1 12 Tf 72 700 Td (The fire.) Tj ET\n")
}
