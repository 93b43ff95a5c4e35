//! Classified lines and context-stamped text units.

use serde::{Deserialize, Serialize};

use super::{Line, PageMarker};

/// Chapter title used until the first chapter heading is seen.
pub const FRONT_MATTER_TITLE: &str = "Unknown / front matter";

/// Outcome of classifying a single line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "text", rename_all = "snake_case")]
pub enum Classification {
    /// Boilerplate to drop
    Noise,
    /// Start of a new top-level section
    Chapter(String),
    /// Start of a nested section
    Subchapter(String),
    /// Regular body text
    Body(String),
}

impl Classification {
    /// Check if this is a chapter or subchapter heading.
    pub fn is_heading(&self) -> bool {
        matches!(self, Classification::Chapter(_) | Classification::Subchapter(_))
    }

    /// Short label for display.
    pub fn label(&self) -> &'static str {
        match self {
            Classification::Noise => "noise",
            Classification::Chapter(_) => "chapter",
            Classification::Subchapter(_) => "subchapter",
            Classification::Body(_) => "body",
        }
    }
}

/// A line together with its classification.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifiedItem {
    /// The source line
    pub line: Line,
    /// What the classifier decided
    pub kind: Classification,
}

impl ClassifiedItem {
    /// Pair a line with its classification.
    pub fn new(line: Line, kind: Classification) -> Self {
        Self { line, kind }
    }
}

/// A sentence-level text unit stamped with its section context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextualUnit {
    /// Unit text
    pub text: String,
    /// Provenance of the line the unit came from
    pub page_marker: PageMarker,
    /// Active chapter title
    pub chapter_title: String,
    /// Active subchapter title, if any
    pub subchapter_title: Option<String>,
}

impl ContextualUnit {
    /// Create a unit in the given context.
    pub fn new(
        text: impl Into<String>,
        page_marker: PageMarker,
        chapter_title: impl Into<String>,
        subchapter_title: Option<String>,
    ) -> Self {
        Self {
            text: text.into(),
            page_marker,
            chapter_title: chapter_title.into(),
            subchapter_title,
        }
    }

    /// Check if the unit precedes any detected chapter.
    pub fn is_front_matter(&self) -> bool {
        self.chapter_title == FRONT_MATTER_TITLE
    }
}
