//! JSON rendering for chunks.

use serde::Serialize;

use crate::error::{Error, Result};
use crate::model::Chunk;

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Pretty-printed JSON with indentation
    #[default]
    Pretty,
    /// Compact JSON without extra whitespace
    Compact,
    /// One compact JSON object per line
    Lines,
}

/// Flat, export-friendly view of a chunk.
#[derive(Debug, Serialize)]
struct ChunkRecord<'a> {
    chunk_text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    start_page_marker: Option<String>,
    chapter_title: &'a str,
    subchapter_title: Option<&'a str>,
    token_count: usize,
}

impl<'a> ChunkRecord<'a> {
    fn new(chunk: &'a Chunk, include_page_markers: bool) -> Self {
        Self {
            chunk_text: &chunk.text,
            start_page_marker: include_page_markers.then(|| chunk.start_page_marker.to_string()),
            chapter_title: &chunk.chapter_title,
            subchapter_title: chunk.subchapter_title.as_deref(),
            token_count: chunk.token_count,
        }
    }
}

fn render_error(e: serde_json::Error) -> Error {
    Error::Render(format!("JSON serialization error: {}", e))
}

/// Convert chunks to JSON.
///
/// Page markers are rendered as display strings (`"12"`,
/// `"paragraph 3"`) and omitted entirely when `include_page_markers` is
/// false.
pub fn to_json(chunks: &[Chunk], format: JsonFormat, include_page_markers: bool) -> Result<String> {
    let records: Vec<ChunkRecord<'_>> = chunks
        .iter()
        .map(|chunk| ChunkRecord::new(chunk, include_page_markers))
        .collect();

    match format {
        JsonFormat::Pretty => serde_json::to_string_pretty(&records).map_err(render_error),
        JsonFormat::Compact => serde_json::to_string(&records).map_err(render_error),
        JsonFormat::Lines => {
            let mut output = String::new();
            for record in &records {
                output.push_str(&serde_json::to_string(record).map_err(render_error)?);
                output.push('\n');
            }
            Ok(output)
        }
    }
}
