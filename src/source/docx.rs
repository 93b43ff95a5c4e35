//! Paragraph-based sources without layout.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::model::{Line, PageMarker, StyleHints};

use super::{LineSource, SourceKind};

/// A styled run inside a paragraph.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocxRun {
    /// Run text
    pub text: String,
    /// Bold formatting
    #[serde(default)]
    pub bold: bool,
    /// Italic formatting
    #[serde(default)]
    pub italic: bool,
}

/// One paragraph of a word-processor document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocxParagraph {
    /// Paragraph text; the runs are concatenated when empty
    #[serde(default)]
    pub text: String,
    /// Styled runs
    #[serde(default)]
    pub runs: Vec<DocxRun>,
}

impl DocxParagraph {
    /// Create a paragraph with plain text and no runs.
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            runs: Vec::new(),
        }
    }

    /// Create a paragraph from runs.
    pub fn from_runs(runs: Vec<DocxRun>) -> Self {
        Self {
            text: String::new(),
            runs,
        }
    }

    fn full_text(&self) -> String {
        if self.text.is_empty() {
            self.runs.iter().map(|r| r.text.as_str()).collect()
        } else {
            self.text.clone()
        }
    }

    /// Character-weighted style over the runs. Plain paragraphs without
    /// runs carry no style information.
    fn style(&self) -> Option<StyleHints> {
        if self.runs.is_empty() {
            return None;
        }
        Some(StyleHints::from_runs(
            self.runs.iter().map(|r| (r.text.as_str(), r.bold, r.italic)),
        ))
    }
}

/// Lines from DOCX paragraphs, one line per non-blank paragraph.
///
/// Markers are 1-based paragraph positions in the document, blank
/// paragraphs included, so they point back at the source paragraph.
#[derive(Debug, Clone, Default)]
pub struct DocxLineSource {
    paragraphs: Vec<DocxParagraph>,
}

impl DocxLineSource {
    /// Create a source over paragraphs in document order.
    pub fn new(paragraphs: Vec<DocxParagraph>) -> Self {
        Self { paragraphs }
    }
}

impl LineSource for DocxLineSource {
    fn kind(&self) -> SourceKind {
        SourceKind::Docx
    }

    fn lines(&self) -> Vec<Result<Line>> {
        self.paragraphs
            .iter()
            .enumerate()
            .filter_map(|(i, paragraph)| {
                let text = paragraph.full_text();
                if text.trim().is_empty() {
                    return None;
                }
                let line = Line::new(text, PageMarker::Paragraph(i as u32 + 1));
                Some(Ok(match paragraph.style() {
                    Some(style) => line.with_style(style),
                    None => line,
                }))
            })
            .collect()
    }
}
