//! Packing contextual units into chunks.

mod chapter;
mod options;
mod packer;

pub use chapter::chunk_by_chapter;
pub use options::{ChunkMode, PackOptions, DEFAULT_OVERLAP_UNITS, DEFAULT_TARGET_TOKENS};
pub use packer::TokenPacker;

use crate::model::{Chunk, ContextualUnit};
use crate::tokenize::TokenCounter;

/// Outcome of packing a unit stream.
#[derive(Debug, Clone, Default)]
pub struct PackOutput {
    /// Chunks in document order
    pub chunks: Vec<Chunk>,
    /// Units dropped because they could not be tokenized
    pub skipped_units: usize,
}

/// Pack units according to `options.mode`.
pub fn pack_units<I>(units: I, counter: &dyn TokenCounter, options: &PackOptions) -> PackOutput
where
    I: IntoIterator<Item = ContextualUnit>,
{
    match options.mode {
        ChunkMode::TokenBudget => {
            let mut packer = TokenPacker::new(counter, options);
            for unit in units {
                packer.push(unit);
            }
            let skipped_units = packer.skipped_units();
            PackOutput {
                chunks: packer.finish(),
                skipped_units,
            }
        }
        ChunkMode::Chapter => PackOutput {
            chunks: chunk_by_chapter(units, counter),
            skipped_units: 0,
        },
    }
}
