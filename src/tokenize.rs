//! Token counting used to size chunks.
//!
//! Tokens are only a sizing metric. Counters are injected into the packer
//! rather than held in process-wide state.

use crate::error::Result;

/// Counts tokens in a text unit.
pub trait TokenCounter: Send + Sync {
    /// Number of tokens in `text`. Must be deterministic.
    fn count_tokens(&self, text: &str) -> Result<usize>;
}

impl<F> TokenCounter for F
where
    F: Fn(&str) -> usize + Send + Sync,
{
    fn count_tokens(&self, text: &str) -> Result<usize> {
        Ok(self(text))
    }
}

/// Whitespace-separated words as a token approximation.
///
/// Non-empty text without whitespace-separated words still counts as one
/// token.
#[derive(Debug, Clone, Copy, Default)]
pub struct WhitespaceTokenCounter;

impl TokenCounter for WhitespaceTokenCounter {
    fn count_tokens(&self, text: &str) -> Result<usize> {
        let count = text.split_whitespace().count();
        if count == 0 && !text.is_empty() {
            Ok(1)
        } else {
            Ok(count)
        }
    }
}

#[cfg(feature = "tiktoken")]
pub use self::tiktoken::TiktokenCounter;

#[cfg(feature = "tiktoken")]
mod tiktoken {
    use tiktoken_rs::CoreBPE;

    use super::TokenCounter;
    use crate::error::{Error, Result};

    /// Exact `cl100k_base` BPE token counts.
    pub struct TiktokenCounter {
        encoder: CoreBPE,
    }

    impl TiktokenCounter {
        /// Load the `cl100k_base` encoding.
        pub fn cl100k() -> Result<Self> {
            let encoder = tiktoken_rs::cl100k_base()
                .map_err(|e| Error::Tokenization(format!("cannot load cl100k_base: {}", e)))?;
            Ok(Self { encoder })
        }
    }

    impl std::fmt::Debug for TiktokenCounter {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.debug_struct("TiktokenCounter").finish_non_exhaustive()
        }
    }

    impl TokenCounter for TiktokenCounter {
        fn count_tokens(&self, text: &str) -> Result<usize> {
            Ok(self.encoder.encode_with_special_tokens(text).len())
        }
    }
}
