//! Line-level input types produced by document decoders.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Provenance token attached to every line, unit and chunk.
///
/// Markers are ordered (pages before paragraphs, then by index) but are
/// never used arithmetically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageMarker {
    /// Printed page number of a paginated source
    Page(u32),
    /// 1-based paragraph index of a non-paginated source
    Paragraph(u32),
}

impl fmt::Display for PageMarker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageMarker::Page(n) => write!(f, "{}", n),
            PageMarker::Paragraph(n) => write!(f, "paragraph {}", n),
        }
    }
}

/// Typographic hints for a line.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct StyleHints {
    /// Most of the line's characters are bold
    pub is_bold: bool,
    /// Most of the line's characters are italic
    pub is_italic: bool,
    /// Dominant font size of the line in points, if known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
}

/// Fraction of styled characters above which a line counts as styled.
pub const STYLED_CHAR_RATIO: f64 = 0.6;

impl StyleHints {
    /// Create hints from plain flags.
    pub fn new(is_bold: bool, is_italic: bool) -> Self {
        Self {
            is_bold,
            is_italic,
            font_size: None,
        }
    }

    /// Set the dominant font size.
    pub fn with_font_size(mut self, size: f64) -> Self {
        self.font_size = Some(size);
        self
    }

    /// Derive hints from styled runs, weighting each run by its
    /// non-whitespace character count.
    ///
    /// Each run is `(text, bold, italic)`. Blank runs are ignored.
    pub fn from_runs<'a, I>(runs: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, bool, bool)>,
    {
        let mut total = 0usize;
        let mut bold = 0usize;
        let mut italic = 0usize;

        for (text, is_bold, is_italic) in runs {
            let len = text.trim().chars().count();
            total += len;
            if is_bold {
                bold += len;
            }
            if is_italic {
                italic += len;
            }
        }

        if total == 0 {
            return Self::default();
        }

        Self {
            is_bold: bold as f64 / total as f64 > STYLED_CHAR_RATIO,
            is_italic: italic as f64 / total as f64 > STYLED_CHAR_RATIO,
            font_size: None,
        }
    }
}

/// Axis-aligned bounding box in page coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge
    pub x0: f64,
    /// Top edge
    pub y0: f64,
    /// Right edge
    pub x1: f64,
    /// Bottom edge
    pub y1: f64,
}

impl Rect {
    /// Create a new rectangle.
    pub fn new(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// Width of the rectangle.
    pub fn width(&self) -> f64 {
        self.x1 - self.x0
    }
}

/// Layout hints for a line. DOCX sources usually carry none.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LayoutHints {
    /// Bounding box of the line
    #[serde(default)]
    pub bounding_box: Option<Rect>,
    /// Whether the line is the only line of its block
    #[serde(default)]
    pub is_alone_in_block: bool,
    /// Width of the page the line sits on
    #[serde(default)]
    pub page_width: Option<f64>,
}

impl LayoutHints {
    /// Create layout hints for a positioned line.
    pub fn positioned(bounding_box: Rect, page_width: f64, is_alone_in_block: bool) -> Self {
        Self {
            bounding_box: Some(bounding_box),
            is_alone_in_block,
            page_width: Some(page_width),
        }
    }
}

/// One decoded line of a document, in reading order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Line {
    /// Raw line text
    pub text: String,
    /// Provenance of the line
    pub page_marker: PageMarker,
    /// Optional typographic hints
    #[serde(default)]
    pub style: Option<StyleHints>,
    /// Optional layout hints
    #[serde(default)]
    pub layout: Option<LayoutHints>,
}

impl Line {
    /// Create a line with no style or layout hints.
    pub fn new(text: impl Into<String>, page_marker: PageMarker) -> Self {
        Self {
            text: text.into(),
            page_marker,
            style: None,
            layout: None,
        }
    }

    /// Attach style hints.
    pub fn with_style(mut self, style: StyleHints) -> Self {
        self.style = Some(style);
        self
    }

    /// Attach layout hints.
    pub fn with_layout(mut self, layout: LayoutHints) -> Self {
        self.layout = Some(layout);
        self
    }

    /// Number of whitespace-separated words.
    pub fn word_count(&self) -> usize {
        self.text.split_whitespace().count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_marker_display() {
        assert_eq!(PageMarker::Page(12).to_string(), "12");
        assert_eq!(PageMarker::Paragraph(3).to_string(), "paragraph 3");
    }

    #[test]
    fn test_page_marker_ordering() {
        assert!(PageMarker::Page(2) < PageMarker::Page(10));
        assert!(PageMarker::Paragraph(1) < PageMarker::Paragraph(2));
    }

    #[test]
    fn test_style_from_runs_weighted() {
        // 12 of 15 visible characters are bold: 0.8 > 0.6
        let style = StyleHints::from_runs([("Bold heading", true, false), ("abc", false, true)]);
        assert!(style.is_bold);
        assert!(!style.is_italic);
    }

    #[test]
    fn test_style_from_runs_below_threshold() {
        // Exactly 60% is not enough
        let style = StyleHints::from_runs([("abc", true, false), ("de", false, false)]);
        assert!(!style.is_bold);
    }

    #[test]
    fn test_style_from_blank_runs() {
        let style = StyleHints::from_runs([("   ", true, true)]);
        assert_eq!(style, StyleHints::default());
    }

    #[test]
    fn test_line_builder() {
        let line = Line::new("The Beginning", PageMarker::Page(1))
            .with_style(StyleHints::new(true, false))
            .with_layout(LayoutHints::positioned(
                Rect::new(200.0, 80.0, 400.0, 95.0),
                600.0,
                true,
            ));
        assert_eq!(line.word_count(), 2);
        assert!(line.style.unwrap().is_bold);
        assert_eq!(line.layout.unwrap().bounding_box.unwrap().width(), 200.0);
    }

    #[test]
    fn test_line_deserialize_minimal() {
        let line: Line =
            serde_json::from_str(r#"{"text": "Hello", "page_marker": {"page": 4}}"#).unwrap();
        assert_eq!(line.page_marker, PageMarker::Page(4));
        assert!(line.style.is_none());
        assert!(line.layout.is_none());
    }
}
