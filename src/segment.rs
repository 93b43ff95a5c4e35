//! Sentence segmentation of body lines.
//!
//! The sentence-boundary detector is an injected dependency. Whatever it
//! does, [`segment_or_whole`] never fails: on error the whole line becomes
//! a single unit.

use regex::Regex;
use std::sync::OnceLock;
use unicode_segmentation::UnicodeSegmentation;

use crate::error::Result;

/// Splits text into sentences.
pub trait SentenceSegmenter: Send + Sync {
    /// Split `text` into trimmed, non-empty sentences in order.
    fn segment(&self, text: &str) -> Result<Vec<String>>;

    /// Human-readable segmenter name.
    fn name(&self) -> &str;
}

/// UAX #29 sentence boundaries from `unicode-segmentation`.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnicodeSentenceSegmenter;

impl SentenceSegmenter for UnicodeSentenceSegmenter {
    fn segment(&self, text: &str) -> Result<Vec<String>> {
        Ok(text
            .unicode_sentences()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect())
    }

    fn name(&self) -> &str {
        "unicode"
    }
}

fn sentence_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s).*?[.!?]+(?:\s+|$)|.+$").expect("valid sentence regex"))
}

/// Splits after runs of `.`, `!` or `?` followed by whitespace.
#[derive(Debug, Clone, Copy, Default)]
pub struct RegexSentenceSegmenter;

impl SentenceSegmenter for RegexSentenceSegmenter {
    fn segment(&self, text: &str) -> Result<Vec<String>> {
        Ok(sentence_regex()
            .find_iter(text)
            .map(|m| m.as_str().trim())
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect())
    }

    fn name(&self) -> &str {
        "regex"
    }
}

/// Segment `text`, degrading to the whole trimmed line on failure.
///
/// Returns the sentences and whether the fallback was used. An empty
/// result from the segmenter on non-blank text also falls back.
pub fn segment_or_whole(segmenter: &dyn SentenceSegmenter, text: &str) -> (Vec<String>, bool) {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return (Vec::new(), false);
    }

    match segmenter.segment(trimmed) {
        Ok(sentences) if !sentences.is_empty() => (sentences, false),
        Ok(_) => {
            log::warn!(
                "{} segmenter returned no sentences; keeping line whole",
                segmenter.name()
            );
            (vec![trimmed.to_string()], true)
        }
        Err(e) => {
            log::warn!("{}; keeping line whole", e);
            (vec![trimmed.to_string()], true)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    struct FailingSegmenter;

    impl SentenceSegmenter for FailingSegmenter {
        fn segment(&self, text: &str) -> Result<Vec<String>> {
            Err(Error::Segmentation(format!("cannot segment {} bytes", text.len())))
        }

        fn name(&self) -> &str {
            "failing"
        }
    }

    #[test]
    fn test_unicode_segmenter() {
        let sentences = UnicodeSentenceSegmenter
            .segment("This is a sentence. This is another.")
            .unwrap();
        assert_eq!(sentences, vec!["This is a sentence.", "This is another."]);
    }

    #[test]
    fn test_regex_segmenter() {
        let sentences = RegexSentenceSegmenter
            .segment("Is it? Yes! It is... and then a trailing clause")
            .unwrap();
        assert_eq!(
            sentences,
            vec!["Is it?", "Yes!", "It is...", "and then a trailing clause"]
        );
    }

    #[test]
    fn test_regex_segmenter_keeps_decimals() {
        let sentences = RegexSentenceSegmenter.segment("Pi is 3.14 roughly.").unwrap();
        assert_eq!(sentences, vec!["Pi is 3.14 roughly."]);
    }

    #[test]
    fn test_fallback_on_error() {
        let (sentences, fallback) = segment_or_whole(&FailingSegmenter, "  One. Two.  ");
        assert!(fallback);
        assert_eq!(sentences, vec!["One. Two."]);
    }

    #[test]
    fn test_blank_text() {
        let (sentences, fallback) = segment_or_whole(&UnicodeSentenceSegmenter, "   ");
        assert!(sentences.is_empty());
        assert!(!fallback);
    }

    #[test]
    fn test_no_fallback_on_success() {
        let (sentences, fallback) = segment_or_whole(&UnicodeSentenceSegmenter, "Hello there.");
        assert!(!fallback);
        assert_eq!(sentences, vec!["Hello there."]);
    }
}
