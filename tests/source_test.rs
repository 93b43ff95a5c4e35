//! Integration tests for line sources and decoder dumps.

use std::io::Write;

use bookchunk::source::{PdfBlock, PdfLine, PdfPage, PdfSpan};
use bookchunk::{
    chunk_file_with, load_dump, Chunker, DocumentDump, DocxLineSource, DocxParagraph, Error,
    HeadingCriteria, LineSource, PageMarker, PageWindow, PdfLineSource, SourceKind,
};

fn write_dump(json: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(json.as_bytes()).unwrap();
    file
}

fn text_page(width: f64, lines: &[(&str, f64, bool, [f64; 4])]) -> PdfPage {
    PdfPage {
        width,
        blocks: lines
            .iter()
            .map(|&(text, size, italic, bbox)| PdfBlock {
                lines: vec![PdfLine {
                    bbox: Some(bbox),
                    spans: vec![PdfSpan {
                        text: text.to_string(),
                        size,
                        bold: false,
                        italic,
                    }],
                }],
            })
            .collect(),
        error: None,
    }
}

const CENTER: [f64; 4] = [250.0, 80.0, 350.0, 95.0];
const LEFT: [f64; 4] = [50.0, 120.0, 550.0, 135.0];

#[test]
fn test_pdf_dump_end_to_end() {
    let dump = DocumentDump::Pdf {
        pages: vec![
            text_page(600.0, &[("Contents ....... 3", 10.0, false, LEFT)]),
            text_page(
                600.0,
                &[
                    ("Early Days", 10.0, true, CENTER),
                    ("It began on a quiet morning.", 10.0, false, LEFT),
                    ("12", 10.0, false, CENTER),
                ],
            ),
            text_page(
                600.0,
                &[
                    ("Later Years", 10.0, true, CENTER),
                    ("Everything changed.", 10.0, false, LEFT),
                ],
            ),
        ],
    };
    let file = write_dump(&serde_json::to_string(&dump).unwrap());

    let window = PageWindow::new().with_start_skip(1).with_start_page_offset(1);
    let result = chunk_file_with(file.path(), &Chunker::new(), window).unwrap();

    assert_eq!(result.chunks.len(), 1);
    let chunk = &result.chunks[0];
    assert_eq!(chunk.chapter_title, "Early Days");
    assert_eq!(chunk.start_page_marker, PageMarker::Page(1));
    assert_eq!(
        chunk.text,
        "It began on a quiet morning. Later Years Everything changed."
    );
    assert_eq!(chunk.subchapter_title, None);
    assert_eq!(result.report.subchapter_headings, 1);
}

#[test]
fn test_docx_dump_without_layout() {
    let file = write_dump(
        r#"{
            "kind": "docx",
            "paragraphs": [
                { "runs": [ { "text": "Early Days", "italic": true } ] },
                { "text": "" },
                { "text": "It began on a quiet morning." },
                { "runs": [ { "text": "A Turn", "italic": true } ] },
                { "text": "Everything changed." }
            ]
        }"#,
    );

    let source = load_dump(file.path(), PageWindow::default()).unwrap();
    assert_eq!(source.kind(), SourceKind::Docx);

    // Layout gates are not applicable to DOCX lines
    let items = Chunker::new().classify(source.as_ref()).unwrap();
    assert_eq!(items.len(), 4);
    assert!(items[0].kind.is_heading());
    assert_eq!(items[1].line.page_marker, PageMarker::Paragraph(3));

    let result = Chunker::new().run(source.as_ref()).unwrap();
    assert_eq!(result.chunks.len(), 1);
    assert_eq!(result.chunks[0].chapter_title, "Early Days");
    assert_eq!(result.chunks[0].start_page_marker, PageMarker::Paragraph(3));
}

#[test]
fn test_pdf_page_error_is_skipped() {
    let mut broken = text_page(600.0, &[]);
    broken.error = Some("unsupported filter".to_string());

    let source = PdfLineSource::new(vec![
        text_page(600.0, &[("CHAPTER 1", 14.0, true, CENTER)]),
        broken,
        text_page(600.0, &[("Recovered text.", 10.0, false, LEFT)]),
    ]);

    let result = Chunker::new().run(&source).unwrap();
    assert_eq!(result.report.extraction_failures, 1);
    assert_eq!(result.chunks.len(), 1);
    assert_eq!(result.chunks[0].chapter_title, "CHAPTER 1");
    assert_eq!(result.chunks[0].start_page_marker, PageMarker::Page(3));
}

#[test]
fn test_font_size_gate_uses_dominant_size() {
    let body = "Ordinary body text that fills most of the page";
    let source = PdfLineSource::new(vec![text_page(
        600.0,
        &[
            ("Big Upright Title", 16.0, false, LEFT),
            (body, 10.0, false, LEFT),
            (body, 10.0, false, LEFT),
            ("Small Upright Line", 10.0, false, LEFT),
        ],
    )]);
    assert_eq!(source.dominant_font_size(), Some(10.0));

    let criteria = HeadingCriteria::none().with_font_delta(2.0);
    let items = Chunker::new().with_criteria(criteria).classify(&source).unwrap();

    assert!(items[0].kind.is_heading());
    assert!(!items[1].kind.is_heading());
    assert!(!items[3].kind.is_heading());
}

#[test]
fn test_docx_source_in_memory() {
    let source = DocxLineSource::new(vec![
        DocxParagraph::plain("CHAPTER 1"),
        DocxParagraph::plain("Once upon a time."),
    ]);

    let result = Chunker::new().run(&source).unwrap();
    assert_eq!(result.chunks[0].chapter_title, "CHAPTER 1");
    assert_eq!(result.chunks[0].start_page_marker, PageMarker::Paragraph(2));
}

#[test]
fn test_unknown_dump_format() {
    let file = write_dump(r#"{ "kind": "odt", "content": [] }"#);
    let result = load_dump(file.path(), PageWindow::default());
    assert!(matches!(result, Err(Error::UnknownFormat(_))));
}
