//! Run result with chunks and statistics.

use serde::{Deserialize, Serialize};

use crate::model::{Chunk, Classification};

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// At least one chunk was emitted
    Chunked,
    /// No content units were extracted
    NoContent,
    /// Units were extracted but none survived packing
    NoChunks,
}

/// Statistics collected during a chunking run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkingReport {
    /// Lines delivered by the source
    pub lines_read: usize,

    /// Pages or paragraphs the source failed to decode
    pub extraction_failures: usize,

    /// Lines dropped as boilerplate
    pub noise_lines: usize,

    /// Lines that opened a chapter
    pub chapter_headings: usize,

    /// Lines that opened a subchapter
    pub subchapter_headings: usize,

    /// Body lines
    pub body_lines: usize,

    /// Contextual units extracted
    pub units_extracted: usize,

    /// Body lines kept whole because sentence segmentation failed
    pub segmentation_fallbacks: usize,

    /// Units dropped because they could not be tokenized
    pub units_skipped: usize,

    /// Chunks emitted
    pub chunks_emitted: usize,

    /// Sum of chunk token counts
    pub total_tokens: usize,
}

impl ChunkingReport {
    /// Create an empty report.
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one classified line.
    pub fn count_line(&mut self, kind: &Classification) {
        self.lines_read += 1;
        match kind {
            Classification::Noise => self.noise_lines += 1,
            Classification::Chapter(_) => self.chapter_headings += 1,
            Classification::Subchapter(_) => self.subchapter_headings += 1,
            Classification::Body(_) => self.body_lines += 1,
        }
    }

    /// Record the emitted chunks.
    pub fn count_chunks(&mut self, chunks: &[Chunk]) {
        self.chunks_emitted = chunks.len();
        self.total_tokens = chunks.iter().map(|c| c.token_count).sum();
    }

    /// Classify the run. Empty results are reported, not raised.
    pub fn outcome(&self) -> Outcome {
        if self.chunks_emitted > 0 {
            Outcome::Chunked
        } else if self.units_extracted == 0 {
            Outcome::NoContent
        } else {
            Outcome::NoChunks
        }
    }
}

/// Chunks plus the report of the run that produced them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkingResult {
    /// Chunks in document order
    pub chunks: Vec<Chunk>,

    /// Run statistics
    pub report: ChunkingReport,
}

impl ChunkingResult {
    /// Create a new result.
    pub fn new(chunks: Vec<Chunk>, report: ChunkingReport) -> Self {
        Self { chunks, report }
    }

    /// Check if no chunks were produced.
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PageMarker;

    #[test]
    fn test_count_line() {
        let mut report = ChunkingReport::new();
        report.count_line(&Classification::Noise);
        report.count_line(&Classification::Chapter("One".into()));
        report.count_line(&Classification::Subchapter("Early".into()));
        report.count_line(&Classification::Body("Text.".into()));
        report.count_line(&Classification::Body("More.".into()));

        assert_eq!(report.lines_read, 5);
        assert_eq!(report.noise_lines, 1);
        assert_eq!(report.chapter_headings, 1);
        assert_eq!(report.subchapter_headings, 1);
        assert_eq!(report.body_lines, 2);
    }

    #[test]
    fn test_outcome() {
        let mut report = ChunkingReport::new();
        assert_eq!(report.outcome(), Outcome::NoContent);

        report.units_extracted = 3;
        report.units_skipped = 3;
        assert_eq!(report.outcome(), Outcome::NoChunks);

        report.count_chunks(&[Chunk {
            text: "x".into(),
            start_page_marker: PageMarker::Page(1),
            chapter_title: "One".into(),
            subchapter_title: None,
            token_count: 4,
            unit_count: 1,
        }]);
        assert_eq!(report.outcome(), Outcome::Chunked);
        assert_eq!(report.total_tokens, 4);
    }

    #[test]
    fn test_report_serializes() {
        let json = serde_json::to_string(&ChunkingReport::new()).unwrap();
        assert!(json.contains("\"lines_read\":0"));
    }
}
