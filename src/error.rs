//! Error types for bookchunk library.

use std::io;
use thiserror::Error;

/// Result type alias for bookchunk operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while segmenting and chunking documents.
///
/// Only the configuration variants are fatal to a run. The per-item
/// variants are produced by collaborators (line sources, segmenters,
/// token counters) and recovered locally by the pipeline.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The heading keyword pattern is not a valid regular expression.
    #[error("Invalid keyword pattern '{pattern}': {source}")]
    InvalidPattern {
        /// The pattern as supplied by the caller
        pattern: String,
        /// Underlying regex compilation error
        #[source]
        source: regex::Error,
    },

    /// Inconsistent configuration values.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The decoder failed on a page or paragraph.
    #[error("Extraction error: {0}")]
    Extraction(String),

    /// The sentence-boundary detector failed on a line.
    #[error("Sentence segmentation error: {0}")]
    Segmentation(String),

    /// The token counter failed on a unit.
    #[error("Tokenization error: {0}")]
    Tokenization(String),

    /// The decoder dump is not in a recognized shape.
    #[error("Unknown document dump format: {0}")]
    UnknownFormat(String),

    /// Error during rendering (JSON, text).
    #[error("Rendering error: {0}")]
    Render(String),
}

impl Error {
    /// Whether this error must abort a run before any processing happens.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Error::InvalidPattern { .. } | Error::InvalidConfig(_) | Error::UnknownFormat(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::Tokenization("bad unit".to_string());
        assert_eq!(err.to_string(), "Tokenization error: bad unit");

        let err = Error::InvalidConfig("min_words (5) exceeds max_words (2)".to_string());
        assert_eq!(
            err.to_string(),
            "Invalid configuration: min_words (5) exceeds max_words (2)"
        );
    }

    #[test]
    fn test_invalid_pattern_display() {
        let source = regex::Regex::new("(unclosed").unwrap_err();
        let err = Error::InvalidPattern {
            pattern: "(unclosed".to_string(),
            source,
        };
        assert!(err.to_string().starts_with("Invalid keyword pattern '(unclosed'"));
        assert!(err.is_fatal());
    }

    #[test]
    fn test_per_item_errors_are_not_fatal() {
        assert!(!Error::Extraction("page 3".into()).is_fatal());
        assert!(!Error::Segmentation("line".into()).is_fatal());
        assert!(!Error::Tokenization("unit".into()).is_fatal());
        assert!(!Error::Render("json".into()).is_fatal());
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }
}
