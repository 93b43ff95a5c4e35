//! Plain text rendering for chunks.

use std::fmt::Write;

use crate::model::{Chunk, PageMarker};

/// Convert chunks to a human-readable listing.
///
/// Each chunk gets a header line with its position, chapter context and
/// token count, followed by the chunk text and a blank line.
pub fn to_text(chunks: &[Chunk], include_page_markers: bool) -> String {
    let mut output = String::new();

    for (i, chunk) in chunks.iter().enumerate() {
        let _ = write!(output, "[{}] {}", i + 1, chunk.chapter_title);
        if let Some(ref subchapter) = chunk.subchapter_title {
            let _ = write!(output, " > {}", subchapter);
        }
        if include_page_markers {
            match chunk.start_page_marker {
                PageMarker::Page(n) => {
                    let _ = write!(output, " (page {})", n);
                }
                PageMarker::Paragraph(n) => {
                    let _ = write!(output, " (paragraph {})", n);
                }
            }
        }
        let _ = writeln!(output, " [{} tokens]", chunk.token_count);
        output.push_str(&chunk.text);
        output.push_str("\n\n");
    }

    output.trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_text() {
        let chunks = vec![
            Chunk {
                text: "First chunk.".to_string(),
                start_page_marker: PageMarker::Page(3),
                chapter_title: "One".to_string(),
                subchapter_title: None,
                token_count: 2,
                unit_count: 1,
            },
            Chunk {
                text: "Second chunk.".to_string(),
                start_page_marker: PageMarker::Paragraph(9),
                chapter_title: "Two".to_string(),
                subchapter_title: Some("Later".to_string()),
                token_count: 2,
                unit_count: 1,
            },
        ];

        let result = to_text(&chunks, true);
        assert!(result.starts_with("[1] One (page 3) [2 tokens]\nFirst chunk."));
        assert!(result.contains("[2] Two > Later (paragraph 9) [2 tokens]"));
        assert!(result.ends_with("Second chunk."));

        let without = to_text(&chunks, false);
        assert!(!without.contains("(page"));
        assert!(!without.contains("(paragraph"));
    }

    #[test]
    fn test_to_text_empty() {
        assert_eq!(to_text(&[], true), "");
    }
}
