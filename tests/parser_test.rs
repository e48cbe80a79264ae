//! Block extraction tests over synthetic PDFs.

mod common;

use common::{build_pdf, fire_book, parent_cycle_pdf, single_page_pdf, TestPage};
use pdf_indexer::{Error, PageSource, PdfParser, DEFAULT_HEADER_THRESHOLD};

#[test]
fn test_page_count_and_version() {
    let parser = PdfParser::from_bytes(&fire_book()).unwrap();
    assert_eq!(parser.page_count(), 10);
    assert_eq!(parser.version(), "1.4");
}

#[test]
fn test_header_and_body_blocks() {
    let pdf = build_pdf(&[TestPage::new(
        Some("Running Head"),
        &["First body line", "second body line"],
    )]);
    let parser = PdfParser::from_bytes(&pdf).unwrap();
    let blocks = parser.page_blocks(0).unwrap();

    assert_eq!(blocks.len(), 2);

    let header = &blocks[0];
    assert_eq!(header.text, "Running Head");
    assert!(header.is_header(DEFAULT_HEADER_THRESHOLD));
    assert!(header.bbox.y1 < 80.0);

    let body = &blocks[1];
    assert_eq!(body.text, "First body line second body line");
    assert!(!body.is_header(DEFAULT_HEADER_THRESHOLD));
    assert!(body.bbox.y0 > 80.0);
}

#[test]
fn test_body_text_excludes_header() {
    let pdf = build_pdf(&[TestPage::new(Some("Fire Chapter"), &["Water only."])]);
    let parser = PdfParser::from_bytes(&pdf).unwrap();

    let text = parser.body_text(0).unwrap();
    assert!(text.contains("Water only."));
    assert!(!text.contains("Fire"));
}

#[test]
fn test_empty_page() {
    let pdf = build_pdf(&[TestPage::new(None, &[])]);
    let parser = PdfParser::from_bytes(&pdf).unwrap();

    assert!(parser.page_blocks(0).unwrap().is_empty());
    assert_eq!(parser.body_text(0).unwrap(), "");
}

#[test]
fn test_page_out_of_range() {
    let parser = PdfParser::from_bytes(&fire_book()).unwrap();
    assert!(parser.page_blocks(10).is_err());
}

#[test]
fn test_parent_cycle_is_a_parse_error() {
    let parser = PdfParser::from_bytes(&parent_cycle_pdf()).unwrap();
    assert_eq!(parser.page_count(), 1);

    let result = parser.page_blocks(0);
    assert!(matches!(result, Err(Error::PdfParse(_))));
}

#[test]
fn test_offset_media_box() {
    let pdf = single_page_pdf(
        "/Parent 2 0 R /MediaBox [0 100 612 892]",
        "BT /F1 12 Tf 72 852 Td (Fire Chapter) Tj ET\n\
         BT /F1 12 Tf 72 800 Td (Water only.) Tj ET\n",
    );
    let parser = PdfParser::from_bytes(&pdf).unwrap();

    let blocks = parser.page_blocks(0).unwrap();
    assert_eq!(blocks.len(), 2);
    assert!(blocks[0].is_header(DEFAULT_HEADER_THRESHOLD));
    assert!(!blocks[1].is_header(DEFAULT_HEADER_THRESHOLD));

    let text = parser.body_text(0).unwrap();
    assert!(text.contains("Water only."));
    assert!(!text.contains("Fire"));
}
