//! One chunk per contiguous chapter.

use crate::model::{Chunk, ContextualUnit};
use crate::tokenize::TokenCounter;

/// Group units into one chunk per contiguous run of the same chapter.
///
/// A chapter title that reappears later in the document starts a new
/// chunk. Token counts are metadata only; a unit the counter rejects is
/// kept and counted as zero tokens.
pub fn chunk_by_chapter<I>(units: I, counter: &dyn TokenCounter) -> Vec<Chunk>
where
    I: IntoIterator<Item = ContextualUnit>,
{
    let mut chunks: Vec<Chunk> = Vec::new();
    let mut open: Option<Chunk> = None;

    for unit in units {
        let text = unit.text.trim();
        if text.is_empty() {
            continue;
        }

        let tokens = counter.count_tokens(text).unwrap_or_else(|e| {
            log::warn!("no token count for unit at {}: {}", unit.page_marker, e);
            0
        });

        match open.as_mut() {
            Some(chunk) if chunk.chapter_title == unit.chapter_title => {
                chunk.text.push(' ');
                chunk.text.push_str(text);
                chunk.token_count += tokens;
                chunk.unit_count += 1;
            }
            _ => {
                chunks.extend(open.take());
                open = Some(Chunk {
                    text: text.to_string(),
                    start_page_marker: unit.page_marker,
                    chapter_title: unit.chapter_title,
                    subchapter_title: unit.subchapter_title,
                    token_count: tokens,
                    unit_count: 1,
                });
            }
        }
    }

    chunks.extend(open);
    chunks
}
