//! Criteria-driven heading classification.
//!
//! Classification runs in two steps. [`HeadingClassifier::detect`] looks
//! only at the line itself and can run in parallel over a whole document.
//! [`HeadingClassifier::resolve`] then turns a detected heading into a
//! chapter or subchapter using the currently open chapter.

use regex::{Regex, RegexBuilder};
use std::sync::OnceLock;

use super::criteria::{HeadingCriteria, HeadingMode};
use super::noise::is_noise;
use crate::error::{Error, Result};
use crate::model::{Classification, Line};

/// Lines ending in one of these are never headings.
const TERMINAL_PUNCTUATION: &[char] = &['.', '?', '!', ':', ',', ';'];

/// Maximum left/right margin difference for a centered line, as a share of page width.
pub const CENTER_TOLERANCE_RATIO: f64 = 0.18;

/// Minimum margin on each side of a centered line, as a share of page width.
pub const MIN_MARGIN_RATIO: f64 = 0.15;

fn explicit_chapter_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)^\s*(CHAPTER|SECTION|PART)\s+[IVXLCDM\d]+")
            .expect("valid chapter label regex")
    })
}

/// Context-free result of looking at a single line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Detection {
    /// Boilerplate
    Noise,
    /// Passed every enabled gate
    Heading {
        /// Matched an explicit chapter pattern
        explicit: bool,
    },
    /// Anything else
    Body,
}

/// Classifies lines as noise, chapter heading, subchapter heading or body.
#[derive(Debug, Clone)]
pub struct HeadingClassifier {
    criteria: HeadingCriteria,
    mode: HeadingMode,
    keyword: Option<Regex>,
    body_font_size: Option<f64>,
}

impl HeadingClassifier {
    /// Build a classifier, validating the criteria and compiling the
    /// keyword pattern once.
    pub fn new(criteria: HeadingCriteria) -> Result<Self> {
        criteria.validate()?;

        let keyword = match criteria.active_keyword_pattern() {
            Some(pattern) => Some(
                RegexBuilder::new(pattern)
                    .case_insensitive(true)
                    .build()
                    .map_err(|source| Error::InvalidPattern {
                        pattern: pattern.to_string(),
                        source,
                    })?,
            ),
            None => None,
        };

        Ok(Self {
            criteria,
            mode: HeadingMode::default(),
            keyword,
            body_font_size: None,
        })
    }

    /// Set the heading mode.
    pub fn with_mode(mut self, mode: HeadingMode) -> Self {
        self.mode = mode;
        self
    }

    /// Set the dominant body font size used by the font-size gate.
    pub fn with_body_font_size(mut self, size: Option<f64>) -> Self {
        self.body_font_size = size;
        self
    }

    /// The criteria this classifier was built from.
    pub fn criteria(&self) -> &HeadingCriteria {
        &self.criteria
    }

    /// The heading mode.
    pub fn mode(&self) -> HeadingMode {
        self.mode
    }

    /// Classify a line given the currently open chapter, if any.
    pub fn classify(&self, line: &Line, current_chapter: Option<&str>) -> Classification {
        self.resolve(self.detect(line), &line.text, current_chapter)
    }

    /// Evaluate noise and heading gates without any document context.
    pub fn detect(&self, line: &Line) -> Detection {
        let text = line.text.trim();

        if is_noise(text) {
            return Detection::Noise;
        }

        if text.ends_with(TERMINAL_PUNCTUATION) {
            return Detection::Body;
        }

        let keyword_match = self.keyword.as_ref().map(|re| re.is_match(text));
        let structural = self.criteria.has_structural_gates();

        match keyword_match {
            None if !structural => return Detection::Body,
            Some(false) if !structural => return Detection::Body,
            _ => {}
        }

        if !self.passes_gates(line, text) {
            return Detection::Body;
        }

        let explicit = keyword_match == Some(true) || explicit_chapter_regex().is_match(text);
        Detection::Heading { explicit }
    }

    /// Turn a detection into a classification.
    pub fn resolve(
        &self,
        detection: Detection,
        text: &str,
        current_chapter: Option<&str>,
    ) -> Classification {
        let text = text.trim();
        match detection {
            Detection::Noise => Classification::Noise,
            Detection::Body => Classification::Body(text.to_string()),
            Detection::Heading { explicit } => {
                let opens_chapter =
                    current_chapter.is_none() || explicit || self.mode == HeadingMode::Flat;
                if opens_chapter {
                    Classification::Chapter(text.to_string())
                } else {
                    Classification::Subchapter(text.to_string())
                }
            }
        }
    }

    fn passes_gates(&self, line: &Line, text: &str) -> bool {
        self.length_gate(text)
            && self.style_gate(line)
            && self.case_gate(text)
            && self.layout_gate(line)
            && self.font_size_gate(line)
    }

    fn length_gate(&self, text: &str) -> bool {
        if !self.criteria.use_length {
            return true;
        }
        let words = text.split_whitespace().count();
        (self.criteria.min_words..=self.criteria.max_words).contains(&words)
    }

    fn style_gate(&self, line: &Line) -> bool {
        if !self.criteria.use_style {
            return true;
        }
        // Missing hints: gate not applicable
        let Some(style) = line.style else {
            return true;
        };
        (!self.criteria.require_bold || style.is_bold)
            && (!self.criteria.require_italic || style.is_italic)
    }

    fn case_gate(&self, text: &str) -> bool {
        if !self.criteria.use_case {
            return true;
        }
        (!self.criteria.require_title_case || is_title_case(text))
            && (!self.criteria.require_all_caps || is_all_caps(text))
    }

    fn layout_gate(&self, line: &Line) -> bool {
        if !self.criteria.use_layout {
            return true;
        }
        let Some(layout) = line.layout else {
            return true;
        };

        if self.criteria.require_isolated && !layout.is_alone_in_block {
            return false;
        }

        if self.criteria.require_centered {
            if let (Some(bbox), Some(width)) = (layout.bounding_box, layout.page_width) {
                if width > 0.0 && !is_centered(bbox.x0, bbox.x1, width) {
                    return false;
                }
            }
        }

        true
    }

    fn font_size_gate(&self, line: &Line) -> bool {
        if !self.criteria.use_font_size {
            return true;
        }
        match (self.body_font_size, line.style.and_then(|s| s.font_size)) {
            (Some(body), Some(size)) => size >= body + self.criteria.min_font_delta,
            _ => true,
        }
    }
}

/// Every word containing a letter starts with a non-lowercase letter.
pub fn is_title_case(text: &str) -> bool {
    let mut saw_letter = false;
    for word in text.split_whitespace() {
        if let Some(first) = word.chars().find(|c| c.is_alphabetic()) {
            saw_letter = true;
            if first.is_lowercase() {
                return false;
            }
        }
    }
    saw_letter
}

/// Every letter is uppercase and there is at least one letter.
pub fn is_all_caps(text: &str) -> bool {
    let mut saw_letter = false;
    for c in text.chars().filter(|c| c.is_alphabetic()) {
        saw_letter = true;
        if c.is_lowercase() {
            return false;
        }
    }
    saw_letter
}

/// Margins differ by less than the tolerance and both exceed the minimum.
pub fn is_centered(left_edge: f64, right_edge: f64, page_width: f64) -> bool {
    let left = left_edge;
    let right = page_width - right_edge;
    (left - right).abs() < page_width * CENTER_TOLERANCE_RATIO
        && left > page_width * MIN_MARGIN_RATIO
        && right > page_width * MIN_MARGIN_RATIO
}
