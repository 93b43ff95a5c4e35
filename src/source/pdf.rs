//! Paginated sources with positioned, styled text spans.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::ops::Range;

use crate::classify::is_noise;
use crate::error::{Error, Result};
use crate::model::{LayoutHints, Line, PageMarker, Rect, StyleHints};

use super::{LineSource, SourceKind};

/// Spans at or below this size (in points) are ignored.
const MIN_SPAN_SIZE: f64 = 5.0;

/// Pages inspected when estimating the body font size.
const FONT_SCAN_PAGES: usize = 15;

/// A run of text with uniform styling.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PdfSpan {
    /// Span text
    pub text: String,
    /// Font size in points
    #[serde(default)]
    pub size: f64,
    /// Bold font
    #[serde(default)]
    pub bold: bool,
    /// Italic font
    #[serde(default)]
    pub italic: bool,
}

impl PdfSpan {
    fn counts(&self) -> bool {
        self.size > MIN_SPAN_SIZE && !self.text.trim().is_empty()
    }
}

/// A visual line of spans.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PdfLine {
    /// `[x0, y0, x1, y1]` in page coordinates
    #[serde(default)]
    pub bbox: Option<[f64; 4]>,
    /// Spans in reading order
    #[serde(default)]
    pub spans: Vec<PdfSpan>,
}

impl PdfLine {
    /// Concatenated span text.
    pub fn text(&self) -> String {
        self.spans.iter().map(|s| s.text.as_str()).collect()
    }

    fn style(&self) -> StyleHints {
        let spans: Vec<&PdfSpan> = self.spans.iter().filter(|s| s.counts()).collect();
        let style = StyleHints::from_runs(spans.iter().map(|s| (s.text.as_str(), s.bold, s.italic)));

        match spans.iter().map(|s| s.size).reduce(f64::max) {
            Some(size) => style.with_font_size(round_size(size)),
            None => style,
        }
    }
}

/// A text block grouping adjacent lines.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PdfBlock {
    /// Lines in reading order
    #[serde(default)]
    pub lines: Vec<PdfLine>,
}

/// One decoded page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PdfPage {
    /// Page width in points
    #[serde(default)]
    pub width: f64,
    /// Text blocks in reading order
    #[serde(default)]
    pub blocks: Vec<PdfBlock>,
    /// Decoder error for this page, if it could not be read
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Which pages to read and how to number them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageWindow {
    /// Leading pages to skip (cover, table of contents)
    pub start_skip: usize,
    /// Trailing pages to skip (index, ads)
    pub end_skip: usize,
    /// Printed page number of the first processed page
    pub start_page_offset: u32,
}

impl PageWindow {
    /// Create a window covering every page, numbered from 1.
    pub fn new() -> Self {
        Self::default()
    }

    /// Skip leading pages.
    pub fn with_start_skip(mut self, pages: usize) -> Self {
        self.start_skip = pages;
        self
    }

    /// Skip trailing pages.
    pub fn with_end_skip(mut self, pages: usize) -> Self {
        self.end_skip = pages;
        self
    }

    /// Set the printed number of the first processed page.
    pub fn with_start_page_offset(mut self, offset: u32) -> Self {
        self.start_page_offset = offset;
        self
    }

    /// Page positions (0-based) inside the window.
    pub fn range(&self, total_pages: usize) -> Range<usize> {
        let end = total_pages.saturating_sub(self.end_skip);
        self.start_skip.min(end)..end
    }

    /// Marker for the page at `position` (0-based).
    pub fn marker(&self, position: usize) -> PageMarker {
        let relative = position.saturating_sub(self.start_skip) as u32;
        PageMarker::Page(relative.saturating_add(self.start_page_offset))
    }
}

impl Default for PageWindow {
    fn default() -> Self {
        Self {
            start_skip: 0,
            end_skip: 0,
            start_page_offset: 1,
        }
    }
}

/// Lines from decoded PDF pages.
#[derive(Debug, Clone, Default)]
pub struct PdfLineSource {
    pages: Vec<PdfPage>,
    window: PageWindow,
}

impl PdfLineSource {
    /// Create a source over every page.
    pub fn new(pages: Vec<PdfPage>) -> Self {
        Self {
            pages,
            window: PageWindow::default(),
        }
    }

    /// Restrict and renumber pages.
    pub fn with_window(mut self, window: PageWindow) -> Self {
        self.window = window;
        self
    }

    /// Total number of pages, including skipped ones.
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn windowed_pages(&self) -> impl Iterator<Item = (usize, &PdfPage)> {
        let range = self.window.range(self.pages.len());
        self.pages[range.clone()]
            .iter()
            .enumerate()
            .map(move |(i, page)| (range.start + i, page))
    }
}

impl LineSource for PdfLineSource {
    fn kind(&self) -> SourceKind {
        SourceKind::Pdf
    }

    /// Character-weighted most common span size over the first pages of
    /// the window, ignoring boilerplate lines.
    fn dominant_font_size(&self) -> Option<f64> {
        let mut chars_by_size: HashMap<i64, usize> = HashMap::new();

        for (_, page) in self.windowed_pages().take(FONT_SCAN_PAGES) {
            for line in page.blocks.iter().flat_map(|b| &b.lines) {
                if is_noise(&line.text()) {
                    continue;
                }
                for span in line.spans.iter().filter(|s| s.counts()) {
                    *chars_by_size.entry(size_key(span.size)).or_default() +=
                        span.text.trim().chars().count();
                }
            }
        }

        chars_by_size
            .into_iter()
            .max_by(|a, b| a.1.cmp(&b.1).then(b.0.cmp(&a.0)))
            .map(|(key, _)| key as f64 / 10.0)
    }

    fn lines(&self) -> Vec<Result<Line>> {
        let mut lines = Vec::new();

        for (position, page) in self.windowed_pages() {
            let marker = self.window.marker(position);

            if let Some(ref message) = page.error {
                lines.push(Err(Error::Extraction(format!("page {}: {}", marker, message))));
                continue;
            }

            let page_width = (page.width > 0.0).then_some(page.width);

            for block in &page.blocks {
                let alone = block
                    .lines
                    .iter()
                    .filter(|l| !l.text().trim().is_empty())
                    .count()
                    == 1;

                for pdf_line in &block.lines {
                    let text = pdf_line.text();
                    if text.trim().is_empty() {
                        continue;
                    }

                    let layout = LayoutHints {
                        bounding_box: pdf_line.bbox.map(|[x0, y0, x1, y1]| Rect::new(x0, y0, x1, y1)),
                        is_alone_in_block: alone,
                        page_width,
                    };

                    lines.push(Ok(Line::new(text, marker)
                        .with_style(pdf_line.style())
                        .with_layout(layout)));
                }
            }
        }

        lines
    }
}

fn size_key(size: f64) -> i64 {
    (size * 10.0).round() as i64
}

fn round_size(size: f64) -> f64 {
    size_key(size) as f64 / 10.0
}
