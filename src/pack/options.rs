//! Packing options and configuration.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default chunk size in tokens.
pub const DEFAULT_TARGET_TOKENS: usize = 200;

/// Default number of units repeated at the start of the next chunk.
pub const DEFAULT_OVERLAP_UNITS: usize = 2;

/// How units are grouped into chunks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChunkMode {
    /// Chunks of about `target_tokens` with sentence overlap
    #[default]
    TokenBudget,
    /// One chunk per contiguous chapter
    Chapter,
}

/// Options for packing units into chunks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PackOptions {
    /// Approximate tokens per chunk
    pub target_tokens: usize,

    /// Units carried over after a token-budget flush
    pub overlap_units: usize,

    /// Grouping strategy
    pub mode: ChunkMode,
}

impl PackOptions {
    /// Create new pack options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the target chunk size in tokens.
    pub fn with_target_tokens(mut self, tokens: usize) -> Self {
        self.target_tokens = tokens;
        self
    }

    /// Set the number of overlapping units.
    pub fn with_overlap_units(mut self, units: usize) -> Self {
        self.overlap_units = units;
        self
    }

    /// Set the chunk mode.
    pub fn with_mode(mut self, mode: ChunkMode) -> Self {
        self.mode = mode;
        self
    }

    /// Check the options before a run.
    pub fn validate(&self) -> Result<()> {
        if self.mode == ChunkMode::TokenBudget && self.target_tokens == 0 {
            return Err(Error::InvalidConfig(
                "target_tokens must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

impl Default for PackOptions {
    fn default() -> Self {
        Self {
            target_tokens: DEFAULT_TARGET_TOKENS,
            overlap_units: DEFAULT_OVERLAP_UNITS,
            mode: ChunkMode::TokenBudget,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pack_options_builder() {
        let options = PackOptions::new()
            .with_target_tokens(50)
            .with_overlap_units(1)
            .with_mode(ChunkMode::Chapter);

        assert_eq!(options.target_tokens, 50);
        assert_eq!(options.overlap_units, 1);
        assert_eq!(options.mode, ChunkMode::Chapter);
    }

    #[test]
    fn test_default_options() {
        let options = PackOptions::default();
        assert_eq!(options.target_tokens, 200);
        assert_eq!(options.overlap_units, 2);
        assert_eq!(options.mode, ChunkMode::TokenBudget);
        assert!(options.validate().is_ok());
    }

    #[test]
    fn test_zero_target_rejected() {
        let options = PackOptions::new().with_target_tokens(0);
        assert!(matches!(options.validate(), Err(Error::InvalidConfig(_))));

        // Chapter mode ignores the budget
        let options = options.with_mode(ChunkMode::Chapter);
        assert!(options.validate().is_ok());
    }
}
