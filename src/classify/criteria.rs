//! User-facing heading detection criteria.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Keyword pattern offered by default: numbered chapter/section/part labels.
pub const DEFAULT_KEYWORD_PATTERN: &str = r"^(CHAPTER|SECTION|PART)\s+[IVXLCDM\d]+";

/// Which signals a line must show to count as a heading.
///
/// Each group has a master toggle (`use_*`). A disabled group is never
/// evaluated and behaves as an always-passing gate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeadingCriteria {
    /// Evaluate bold/italic requirements
    pub use_style: bool,
    /// Heading must be mostly bold
    pub require_bold: bool,
    /// Heading must be mostly italic
    pub require_italic: bool,

    /// Evaluate letter-case requirements
    pub use_case: bool,
    /// Every word must start with an uppercase letter
    pub require_title_case: bool,
    /// Every letter must be uppercase
    pub require_all_caps: bool,

    /// Evaluate layout requirements
    pub use_layout: bool,
    /// Line must be roughly centered on the page
    pub require_centered: bool,
    /// Line must be alone in its block
    pub require_isolated: bool,

    /// Evaluate the word-count range
    pub use_length: bool,
    /// Minimum number of words
    pub min_words: usize,
    /// Maximum number of words
    pub max_words: usize,

    /// Evaluate the keyword pattern
    pub use_keywords: bool,
    /// Case-insensitive regular expression marking explicit chapter headings
    pub keyword_pattern: Option<String>,

    /// Evaluate the font-size signal
    pub use_font_size: bool,
    /// Points above the dominant body size a heading must reach
    pub min_font_delta: f64,
}

impl HeadingCriteria {
    /// Create criteria with the default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Criteria with every group disabled.
    pub fn none() -> Self {
        Self {
            use_style: false,
            require_bold: false,
            require_italic: false,
            use_case: false,
            require_title_case: false,
            require_all_caps: false,
            use_layout: false,
            require_centered: false,
            require_isolated: false,
            use_length: false,
            min_words: 1,
            max_words: 50,
            use_keywords: false,
            keyword_pattern: None,
            use_font_size: false,
            min_font_delta: 1.0,
        }
    }

    /// Only the keyword pattern, nothing else.
    pub fn keyword_only(pattern: impl Into<String>) -> Self {
        Self::none().with_keyword_pattern(pattern)
    }

    /// Require bold and/or italic text.
    pub fn with_style(mut self, bold: bool, italic: bool) -> Self {
        self.use_style = true;
        self.require_bold = bold;
        self.require_italic = italic;
        self
    }

    /// Require Title Case and/or ALL CAPS.
    pub fn with_case(mut self, title_case: bool, all_caps: bool) -> Self {
        self.use_case = true;
        self.require_title_case = title_case;
        self.require_all_caps = all_caps;
        self
    }

    /// Require centering and/or isolation.
    pub fn with_layout(mut self, centered: bool, isolated: bool) -> Self {
        self.use_layout = true;
        self.require_centered = centered;
        self.require_isolated = isolated;
        self
    }

    /// Require a word count in `[min, max]`.
    pub fn with_word_range(mut self, min: usize, max: usize) -> Self {
        self.use_length = true;
        self.min_words = min;
        self.max_words = max;
        self
    }

    /// Set the keyword pattern.
    pub fn with_keyword_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.use_keywords = true;
        self.keyword_pattern = Some(pattern.into());
        self
    }

    /// Require a font size at least `delta` points above the body size.
    pub fn with_font_delta(mut self, delta: f64) -> Self {
        self.use_font_size = true;
        self.min_font_delta = delta;
        self
    }

    /// Disable the style group.
    pub fn without_style(mut self) -> Self {
        self.use_style = false;
        self
    }

    /// Disable the case group.
    pub fn without_case(mut self) -> Self {
        self.use_case = false;
        self
    }

    /// Disable the layout group.
    pub fn without_layout(mut self) -> Self {
        self.use_layout = false;
        self
    }

    /// Disable the length group.
    pub fn without_length(mut self) -> Self {
        self.use_length = false;
        self
    }

    /// Disable the keyword group.
    pub fn without_keywords(mut self) -> Self {
        self.use_keywords = false;
        self
    }

    /// The keyword pattern, if the keyword group is enabled and non-blank.
    pub fn active_keyword_pattern(&self) -> Option<&str> {
        if !self.use_keywords {
            return None;
        }
        self.keyword_pattern
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
    }

    pub(crate) fn style_active(&self) -> bool {
        self.use_style && (self.require_bold || self.require_italic)
    }

    pub(crate) fn case_active(&self) -> bool {
        self.use_case && (self.require_title_case || self.require_all_caps)
    }

    pub(crate) fn layout_active(&self) -> bool {
        self.use_layout && (self.require_centered || self.require_isolated)
    }

    /// Whether any gate other than the keyword pattern is enabled.
    pub fn has_structural_gates(&self) -> bool {
        self.style_active()
            || self.case_active()
            || self.layout_active()
            || self.use_length
            || self.use_font_size
    }

    /// Check numeric consistency. Pattern compilation happens in
    /// [`HeadingClassifier::new`](super::HeadingClassifier::new).
    pub fn validate(&self) -> Result<()> {
        if self.use_length {
            if self.max_words == 0 {
                return Err(Error::InvalidConfig("max_words must be at least 1".into()));
            }
            if self.min_words > self.max_words {
                return Err(Error::InvalidConfig(format!(
                    "min_words ({}) exceeds max_words ({})",
                    self.min_words, self.max_words
                )));
            }
        }
        if self.use_font_size && !(self.min_font_delta.is_finite() && self.min_font_delta >= 0.0) {
            return Err(Error::InvalidConfig(format!(
                "min_font_delta must be a non-negative number, got {}",
                self.min_font_delta
            )));
        }
        Ok(())
    }
}

impl Default for HeadingCriteria {
    fn default() -> Self {
        Self {
            use_style: true,
            require_bold: false,
            require_italic: true,
            use_case: true,
            require_title_case: true,
            require_all_caps: false,
            use_layout: true,
            require_centered: true,
            require_isolated: true,
            use_length: true,
            min_words: 1,
            max_words: 10,
            use_keywords: true,
            keyword_pattern: Some(DEFAULT_KEYWORD_PATTERN.to_string()),
            use_font_size: false,
            min_font_delta: 1.0,
        }
    }
}

/// How detected headings map onto chapters and subchapters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeadingMode {
    /// Explicit chapter patterns open chapters; other headings become
    /// subchapters once a chapter is open
    #[default]
    Hierarchical,
    /// Every detected heading opens a chapter
    Flat,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_criteria() {
        let criteria = HeadingCriteria::default();
        assert!(criteria.require_italic);
        assert!(criteria.require_title_case);
        assert_eq!(criteria.max_words, 10);
        assert_eq!(criteria.active_keyword_pattern(), Some(DEFAULT_KEYWORD_PATTERN));
        assert!(criteria.has_structural_gates());
        assert!(criteria.validate().is_ok());
    }

    #[test]
    fn test_keyword_only() {
        let criteria = HeadingCriteria::keyword_only(r"^Part \d+");
        assert!(!criteria.has_structural_gates());
        assert_eq!(criteria.active_keyword_pattern(), Some(r"^Part \d+"));
    }

    #[test]
    fn test_blank_pattern_is_inactive() {
        let criteria = HeadingCriteria::none().with_keyword_pattern("   ");
        assert_eq!(criteria.active_keyword_pattern(), None);
    }

    #[test]
    fn test_disabled_keywords_hide_pattern() {
        let criteria = HeadingCriteria::default().without_keywords();
        assert_eq!(criteria.active_keyword_pattern(), None);
    }

    #[test]
    fn test_toggle_without_requirements_is_inactive() {
        let mut criteria = HeadingCriteria::none();
        criteria.use_style = true;
        criteria.use_layout = true;
        assert!(!criteria.has_structural_gates());
    }

    #[test]
    fn test_validate_word_range() {
        let criteria = HeadingCriteria::none().with_word_range(5, 2);
        assert!(matches!(criteria.validate(), Err(Error::InvalidConfig(_))));

        // Range is ignored when the group is off
        let criteria = HeadingCriteria::none().with_word_range(5, 2).without_length();
        assert!(criteria.validate().is_ok());
    }

    #[test]
    fn test_validate_font_delta() {
        let criteria = HeadingCriteria::none().with_font_delta(-1.0);
        assert!(criteria.validate().is_err());
    }

    #[test]
    fn test_deserialize_partial() {
        let criteria: HeadingCriteria =
            serde_json::from_str(r#"{"require_bold": true, "max_words": 6}"#).unwrap();
        assert!(criteria.require_bold);
        assert_eq!(criteria.max_words, 6);
        // Unspecified fields keep their defaults
        assert!(criteria.require_italic);
    }
}
