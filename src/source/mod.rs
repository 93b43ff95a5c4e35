//! Line sources: adapters from decoded documents to classified input.
//!
//! Decoding PDF and DOCX files is left to external tools. A source takes
//! their output (either in memory or as a JSON dump) and produces [`Line`]s
//! in reading order with whatever style and layout hints the format
//! provides.

mod docx;
mod pdf;

pub use docx::{DocxLineSource, DocxParagraph, DocxRun};
pub use pdf::{PageWindow, PdfBlock, PdfLine, PdfLineSource, PdfPage, PdfSpan};

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::{Error, Result};
use crate::model::Line;

/// The kind of document behind a line source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    /// Paginated source with layout
    Pdf,
    /// Paragraph-based word-processor source
    Docx,
    /// Pre-built lines
    Lines,
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceKind::Pdf => write!(f, "PDF"),
            SourceKind::Docx => write!(f, "DOCX"),
            SourceKind::Lines => write!(f, "lines"),
        }
    }
}

/// Produces document lines in reading order.
pub trait LineSource: Send + Sync {
    /// The kind of document.
    fn kind(&self) -> SourceKind;

    /// Dominant body font size, if the source can tell.
    fn dominant_font_size(&self) -> Option<f64> {
        None
    }

    /// All lines in reading order.
    ///
    /// A page or paragraph that could not be decoded yields an
    /// [`Error::Extraction`] item in its place; the remaining items are
    /// still delivered.
    fn lines(&self) -> Vec<Result<Line>>;
}

impl LineSource for Vec<Line> {
    fn kind(&self) -> SourceKind {
        SourceKind::Lines
    }

    fn lines(&self) -> Vec<Result<Line>> {
        self.iter().cloned().map(Ok).collect()
    }
}

/// A serialized decoder output.
///
/// ```json
/// { "kind": "docx", "paragraphs": [ { "text": "CHAPTER 1" } ] }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DocumentDump {
    /// Pages of positioned text spans
    Pdf {
        /// Pages in document order
        pages: Vec<PdfPage>,
    },
    /// Paragraphs of styled runs
    Docx {
        /// Paragraphs in document order
        paragraphs: Vec<DocxParagraph>,
    },
}

impl DocumentDump {
    /// Parse a dump from JSON text.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| Error::UnknownFormat(format!("not a document dump: {}", e)))
    }

    /// The kind of document in this dump.
    pub fn kind(&self) -> SourceKind {
        match self {
            DocumentDump::Pdf { .. } => SourceKind::Pdf,
            DocumentDump::Docx { .. } => SourceKind::Docx,
        }
    }

    /// Turn the dump into a line source. The window only applies to PDF
    /// dumps.
    pub fn into_source(self, window: PageWindow) -> Box<dyn LineSource> {
        match self {
            DocumentDump::Pdf { pages } => Box::new(PdfLineSource::new(pages).with_window(window)),
            DocumentDump::Docx { paragraphs } => Box::new(DocxLineSource::new(paragraphs)),
        }
    }
}

/// Load a JSON decoder dump from disk.
///
/// # Example
///
/// ```no_run
/// use bookchunk::source::{load_dump, PageWindow};
///
/// let source = load_dump("book.json", PageWindow::default())?;
/// println!("{} lines", source.lines().len());
/// # Ok::<(), bookchunk::Error>(())
/// ```
pub fn load_dump<P: AsRef<Path>>(path: P, window: PageWindow) -> Result<Box<dyn LineSource>> {
    let path = path.as_ref();
    let json = fs::read_to_string(path)?;
    let dump = DocumentDump::from_json(&json)?;
    log::info!("loaded {} dump from {}", dump.kind(), path.display());
    Ok(dump.into_source(window))
}
