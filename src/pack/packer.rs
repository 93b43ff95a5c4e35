//! Token-bounded chunk assembly with sentence overlap.

use crate::model::{Chunk, ContextualUnit};
use crate::tokenize::TokenCounter;

use super::PackOptions;

/// A buffered unit with its token count.
#[derive(Debug, Clone)]
struct Entry {
    unit: ContextualUnit,
    tokens: usize,
}

/// Why the open buffer was flushed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FlushReason {
    /// The next unit belongs to another chapter
    ChapterChange,
    /// The next unit would exceed the token budget
    Budget,
    /// The next unit is oversized and goes into a chunk of its own
    Oversized,
    /// Input exhausted
    End,
}

/// Assembles units into chunks of roughly `target_tokens` tokens.
///
/// Invariants:
/// - a chunk never contains units from two chapters;
/// - after a budget flush the next chunk starts with the last
///   `overlap_units` units of the previous one;
/// - a unit of `target_tokens` or more is never split and never carried
///   as overlap, so it always ends up alone in its chunk;
/// - a unit identical to the last overlap unit is not appended after it.
pub struct TokenPacker<'a> {
    counter: &'a dyn TokenCounter,
    target_tokens: usize,
    overlap_units: usize,
    buffer: Vec<Entry>,
    running_tokens: usize,
    chunks: Vec<Chunk>,
    skipped_units: usize,
}

impl<'a> TokenPacker<'a> {
    /// Create a packer using `counter` for token counts.
    pub fn new(counter: &'a dyn TokenCounter, options: &PackOptions) -> Self {
        Self {
            counter,
            target_tokens: options.target_tokens.max(1),
            overlap_units: options.overlap_units,
            buffer: Vec::new(),
            running_tokens: 0,
            chunks: Vec::new(),
            skipped_units: 0,
        }
    }

    /// Number of units dropped because the token counter failed on them.
    pub fn skipped_units(&self) -> usize {
        self.skipped_units
    }

    /// Chunks emitted so far.
    pub fn chunks(&self) -> &[Chunk] {
        &self.chunks
    }

    /// Feed the next unit in document order.
    pub fn push(&mut self, unit: ContextualUnit) {
        let chapter_changed = self
            .buffer
            .first()
            .is_some_and(|open| open.unit.chapter_title != unit.chapter_title);
        if chapter_changed {
            self.flush(FlushReason::ChapterChange);
        }

        let tokens = match self.counter.count_tokens(&unit.text) {
            Ok(tokens) => tokens,
            Err(e) => {
                log::warn!("skipping unit at {}: {}", unit.page_marker, e);
                self.skipped_units += 1;
                return;
            }
        };

        if !self.buffer.is_empty() {
            if tokens >= self.target_tokens {
                self.flush(FlushReason::Oversized);
            } else if self.running_tokens + tokens > self.target_tokens {
                let seed = self.overlap_tail();
                self.flush(FlushReason::Budget);
                for entry in seed {
                    self.append(entry);
                }
                // The overlap already ends with this sentence
                if self.buffer.last().is_some_and(|last| last.unit.text == unit.text) {
                    log::debug!("dropping repeated unit at {}", unit.page_marker);
                    return;
                }
            }
        }

        self.append(Entry { unit, tokens });
    }

    /// Flush the remaining buffer and return every chunk.
    pub fn finish(mut self) -> Vec<Chunk> {
        self.flush(FlushReason::End);
        self.chunks
    }

    /// Pack a whole unit stream.
    pub fn pack<I>(mut self, units: I) -> Vec<Chunk>
    where
        I: IntoIterator<Item = ContextualUnit>,
    {
        for unit in units {
            self.push(unit);
        }
        self.finish()
    }

    fn append(&mut self, entry: Entry) {
        self.running_tokens += entry.tokens;
        self.buffer.push(entry);
    }

    /// The last `overlap_units` buffered units, minus oversized ones.
    fn overlap_tail(&self) -> Vec<Entry> {
        let start = self.buffer.len().saturating_sub(self.overlap_units);
        self.buffer[start..]
            .iter()
            .filter(|entry| entry.tokens < self.target_tokens)
            .cloned()
            .collect()
    }

    fn flush(&mut self, reason: FlushReason) {
        if self.buffer.is_empty() {
            return;
        }

        let entries = std::mem::take(&mut self.buffer);
        let token_count = std::mem::take(&mut self.running_tokens);

        let text = entries
            .iter()
            .map(|entry| entry.unit.text.trim())
            .filter(|text| !text.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        if text.is_empty() {
            return;
        }

        let first = &entries[0].unit;
        log::debug!(
            "chunk {} ({:?}): {} units, {} tokens, starts at {}",
            self.chunks.len() + 1,
            reason,
            entries.len(),
            token_count,
            first.page_marker
        );

        self.chunks.push(Chunk {
            text,
            start_page_marker: first.page_marker,
            chapter_title: first.chapter_title.clone(),
            subchapter_title: first.subchapter_title.clone(),
            token_count,
            unit_count: entries.len(),
        });
    }
}
