//! # bookchunk
//!
//! Structure-aware segmentation and token-bounded chunking for long-form
//! documents.
//!
//! This library turns decoded book pages into retrieval-ready chunks: it
//! drops boilerplate, detects chapter and subchapter headings, splits body
//! text into sentences stamped with their section context, and packs the
//! sentences into overlapping chunks that never cross a chapter boundary.
//!
//! ## Quick Start
//!
//! ```no_run
//! use bookchunk::{chunk_file, render};
//!
//! fn main() -> bookchunk::Result<()> {
//!     // Chunk a decoder dump
//!     let result = chunk_file("book.json")?;
//!
//!     // Export as JSON
//!     let json = render::to_json(&result.chunks, render::JsonFormat::Pretty, true)?;
//!     println!("{}", json);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Noise filtering**: page numbers, imprint lines, contact fragments
//! - **Configurable heading detection**: style, case, layout, length,
//!   keyword and font-size gates
//! - **Chapter context**: every chunk knows its chapter and subchapter
//! - **Token-bounded packing**: sentence overlap between chunks
//! - **Pluggable collaborators**: sentence segmenters and token counters
//! - **Parallel processing**: uses Rayon for per-line detection

pub mod classify;
pub mod error;
pub mod model;
pub mod pack;
pub mod pipeline;
pub mod render;
pub mod report;
pub mod segment;
pub mod source;
pub mod structure;
pub mod tokenize;

// Re-export commonly used types
pub use classify::{
    is_noise, Detection, HeadingClassifier, HeadingCriteria, HeadingMode, LineNormalizer,
    NormalizeOptions,
};
pub use error::{Error, Result};
pub use model::{
    Chunk, Classification, ClassifiedItem, ContextualUnit, LayoutHints, Line, PageMarker, Rect,
    StyleHints, FRONT_MATTER_TITLE,
};
pub use pack::{chunk_by_chapter, ChunkMode, PackOptions, TokenPacker};
pub use pipeline::Chunker;
pub use render::JsonFormat;
pub use report::{ChunkingReport, ChunkingResult, Outcome};
pub use segment::{RegexSentenceSegmenter, SentenceSegmenter, UnicodeSentenceSegmenter};
pub use source::{
    load_dump, DocumentDump, DocxLineSource, DocxParagraph, LineSource, PageWindow,
    PdfLineSource, SourceKind,
};
pub use structure::{track_structure, StructureTracker};
#[cfg(feature = "tiktoken")]
pub use tokenize::TiktokenCounter;
pub use tokenize::{TokenCounter, WhitespaceTokenCounter};

use std::path::Path;

/// Chunk a JSON decoder dump with default settings.
///
/// # Example
///
/// ```no_run
/// use bookchunk::chunk_file;
///
/// let result = chunk_file("book.json").unwrap();
/// println!("Chunks: {}", result.chunks.len());
/// ```
pub fn chunk_file<P: AsRef<Path>>(path: P) -> Result<ChunkingResult> {
    let source = load_dump(path, PageWindow::default())?;
    Chunker::new().run(source.as_ref())
}

/// Chunk a JSON decoder dump with a custom chunker and page window.
///
/// # Example
///
/// ```no_run
/// use bookchunk::{chunk_file_with, Chunker, PageWindow};
///
/// let chunker = Chunker::new().with_target_tokens(120).with_overlap_units(1);
/// let window = PageWindow::new().with_start_skip(4).with_start_page_offset(1);
/// let result = chunk_file_with("book.json", &chunker, window).unwrap();
/// ```
pub fn chunk_file_with<P: AsRef<Path>>(
    path: P,
    chunker: &Chunker,
    window: PageWindow,
) -> Result<ChunkingResult> {
    let source = load_dump(path, window)?;
    chunker.run(source.as_ref())
}

/// Chunk in-memory lines with default settings.
///
/// # Example
///
/// ```
/// use bookchunk::{chunk_lines, Line, PageMarker};
///
/// let lines = vec![Line::new("Just one sentence.", PageMarker::Page(1))];
/// let result = chunk_lines(lines)?;
/// assert_eq!(result.chunks[0].text, "Just one sentence.");
/// # Ok::<(), bookchunk::Error>(())
/// ```
pub fn chunk_lines(lines: Vec<Line>) -> Result<ChunkingResult> {
    Chunker::new().run(&lines)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_chunk_lines_front_matter() {
        let result = chunk_lines(vec![Line::new(
            "A preface sentence. Another one.",
            PageMarker::Page(1),
        )])
        .unwrap();

        assert_eq!(result.chunks.len(), 1);
        assert_eq!(result.chunks[0].chapter_title, FRONT_MATTER_TITLE);
        assert_eq!(result.report.units_extracted, 2);
    }

    #[test]
    fn test_chunk_file_missing() {
        let result = chunk_file("/nonexistent/book.json");
        assert!(matches!(result, Err(Error::Io(_))));
    }

    #[test]
    fn test_chunk_file_docx_dump() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"kind":"docx","paragraphs":[
                {{"text":"CHAPTER 1"}},
                {{"text":"It was a quiet morning."}}
            ]}}"#
        )
        .unwrap();

        let chunker = Chunker::new().with_criteria(HeadingCriteria::keyword_only(r"^CHAPTER\s+\d+"));
        let result = chunk_file_with(file.path(), &chunker, PageWindow::default()).unwrap();

        assert_eq!(result.chunks.len(), 1);
        assert_eq!(result.chunks[0].chapter_title, "CHAPTER 1");
        assert_eq!(result.chunks[0].start_page_marker, PageMarker::Paragraph(2));
    }

    #[test]
    fn test_chunk_file_rejects_unknown_dump() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"kind":"html","body":"<p>hi</p>"}}"#).unwrap();
        assert!(matches!(chunk_file(file.path()), Err(Error::UnknownFormat(_))));
    }
}
