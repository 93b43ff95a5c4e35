//! Output chunk type.

use serde::{Deserialize, Serialize};

use super::PageMarker;

/// A token-bounded run of units from a single chapter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    /// Space-joined unit texts, in document order
    #[serde(rename = "chunk_text")]
    pub text: String,
    /// Page marker of the first contained unit
    pub start_page_marker: PageMarker,
    /// Chapter every contained unit belongs to
    pub chapter_title: String,
    /// Subchapter of the first contained unit
    pub subchapter_title: Option<String>,
    /// Sum of the unit token counts
    pub token_count: usize,
    /// Number of units joined into this chunk
    pub unit_count: usize,
}

impl Chunk {
    /// Number of whitespace-separated words in the chunk.
    pub fn word_count(&self) -> usize {
        self.text.split_whitespace().count()
    }
}
