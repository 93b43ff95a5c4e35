//! The end-to-end chunking pipeline.

use rayon::prelude::*;

use crate::classify::{
    Detection, HeadingClassifier, HeadingCriteria, HeadingMode, LineNormalizer, NormalizeOptions,
};
use crate::error::Result;
use crate::model::{Classification, ClassifiedItem, Line};
use crate::pack::{pack_units, ChunkMode, PackOptions};
use crate::report::{ChunkingReport, ChunkingResult};
use crate::segment::{SentenceSegmenter, UnicodeSentenceSegmenter};
use crate::source::LineSource;
use crate::structure::StructureTracker;
use crate::tokenize::{TokenCounter, WhitespaceTokenCounter};

/// Builder and runner for the chunking pipeline.
///
/// Lines flow through normalization, noise and heading detection,
/// chapter resolution, sentence segmentation and token packing.
/// Detection is per line and runs in parallel unless disabled;
/// everything that depends on document order runs sequentially.
///
/// # Example
///
/// ```
/// use bookchunk::{Chunker, HeadingCriteria, Line, PageMarker};
///
/// let lines = vec![
///     Line::new("CHAPTER 1", PageMarker::Page(1)),
///     Line::new("This is a sentence. This is another.", PageMarker::Page(1)),
/// ];
///
/// let result = Chunker::new()
///     .with_criteria(HeadingCriteria::keyword_only(r"^CHAPTER\s+\d+"))
///     .with_target_tokens(50)
///     .run(&lines)?;
///
/// assert_eq!(result.chunks.len(), 1);
/// assert_eq!(result.chunks[0].chapter_title, "CHAPTER 1");
/// # Ok::<(), bookchunk::Error>(())
/// ```
pub struct Chunker {
    criteria: HeadingCriteria,
    heading_mode: HeadingMode,
    pack_options: PackOptions,
    normalize_options: NormalizeOptions,
    parallel: bool,
    segmenter: Box<dyn SentenceSegmenter>,
    counter: Box<dyn TokenCounter>,
}

impl Chunker {
    /// Create a chunker with default criteria and packing options.
    pub fn new() -> Self {
        Self {
            criteria: HeadingCriteria::default(),
            heading_mode: HeadingMode::default(),
            pack_options: PackOptions::default(),
            normalize_options: NormalizeOptions::default(),
            parallel: true,
            segmenter: Box::new(UnicodeSentenceSegmenter),
            counter: Box::new(WhitespaceTokenCounter),
        }
    }

    /// Set the heading criteria.
    pub fn with_criteria(mut self, criteria: HeadingCriteria) -> Self {
        self.criteria = criteria;
        self
    }

    /// Set the heading mode.
    pub fn with_heading_mode(mut self, mode: HeadingMode) -> Self {
        self.heading_mode = mode;
        self
    }

    /// Replace all packing options.
    pub fn with_pack_options(mut self, options: PackOptions) -> Self {
        self.pack_options = options;
        self
    }

    /// Set the target chunk size in tokens.
    pub fn with_target_tokens(mut self, tokens: usize) -> Self {
        self.pack_options = self.pack_options.with_target_tokens(tokens);
        self
    }

    /// Set the number of overlapping units.
    pub fn with_overlap_units(mut self, units: usize) -> Self {
        self.pack_options = self.pack_options.with_overlap_units(units);
        self
    }

    /// Set the chunk mode.
    pub fn with_chunk_mode(mut self, mode: ChunkMode) -> Self {
        self.pack_options = self.pack_options.with_mode(mode);
        self
    }

    /// Set line normalization options.
    pub fn with_normalize(mut self, options: NormalizeOptions) -> Self {
        self.normalize_options = options;
        self
    }

    /// Enable or disable parallel line detection.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Disable parallel processing.
    pub fn sequential(self) -> Self {
        self.with_parallel(false)
    }

    /// Use a different sentence segmenter.
    pub fn with_segmenter(mut self, segmenter: impl SentenceSegmenter + 'static) -> Self {
        self.segmenter = Box::new(segmenter);
        self
    }

    /// Use a different token counter.
    pub fn with_token_counter(mut self, counter: impl TokenCounter + 'static) -> Self {
        self.counter = Box::new(counter);
        self
    }

    /// The heading criteria.
    pub fn criteria(&self) -> &HeadingCriteria {
        &self.criteria
    }

    /// The packing options.
    pub fn pack_options(&self) -> &PackOptions {
        &self.pack_options
    }

    /// Check every option without touching any input.
    pub fn validate(&self) -> Result<()> {
        self.pack_options.validate()?;
        HeadingClassifier::new(self.criteria.clone())?;
        Ok(())
    }

    /// Classify every line of `source` without chunking.
    pub fn classify(&self, source: &dyn LineSource) -> Result<Vec<ClassifiedItem>> {
        let mut report = ChunkingReport::new();
        self.classify_source(source, &mut report)
    }

    /// Run the whole pipeline over `source`.
    ///
    /// Configuration problems fail before any line is read. Problems with
    /// individual pages, lines or units are logged, counted in the report
    /// and skipped. An empty result is not an error.
    pub fn run(&self, source: &dyn LineSource) -> Result<ChunkingResult> {
        self.pack_options.validate()?;

        let mut report = ChunkingReport::new();
        let items = self.classify_source(source, &mut report)?;

        let mut tracker = StructureTracker::new();
        let mut units = Vec::new();
        for item in &items {
            units.extend(tracker.consume(item, self.segmenter.as_ref()));
        }
        report.units_extracted = units.len();
        report.segmentation_fallbacks = tracker.segmentation_fallbacks();

        let output = pack_units(units, self.counter.as_ref(), &self.pack_options);
        report.units_skipped = output.skipped_units;
        report.count_chunks(&output.chunks);

        log::info!(
            "{} lines ({} noise, {} chapters, {} subchapters), {} units, {} chunks",
            report.lines_read,
            report.noise_lines,
            report.chapter_headings,
            report.subchapter_headings,
            report.units_extracted,
            report.chunks_emitted
        );

        Ok(ChunkingResult::new(output.chunks, report))
    }

    fn classify_source(
        &self,
        source: &dyn LineSource,
        report: &mut ChunkingReport,
    ) -> Result<Vec<ClassifiedItem>> {
        let body_font_size = if self.criteria.use_font_size {
            source.dominant_font_size()
        } else {
            None
        };
        let classifier = HeadingClassifier::new(self.criteria.clone())?
            .with_mode(self.heading_mode)
            .with_body_font_size(body_font_size);
        if let Some(size) = body_font_size {
            log::debug!("dominant body font size: {:.1}pt", size);
        }

        let mut lines = Vec::new();
        for item in source.lines() {
            match item {
                Ok(line) => lines.push(line),
                Err(e) if e.is_fatal() => return Err(e),
                Err(e) => {
                    log::warn!("skipping unreadable content: {}", e);
                    report.extraction_failures += 1;
                }
            }
        }

        let normalizer = LineNormalizer::new(self.normalize_options.clone());
        let detect = |mut line: Line| -> (Line, Detection) {
            line.text = normalizer.normalize(&line.text);
            let detection = classifier.detect(&line);
            (line, detection)
        };

        let detected: Vec<(Line, Detection)> = if self.parallel {
            lines.into_par_iter().map(detect).collect()
        } else {
            lines.into_iter().map(detect).collect()
        };

        let mut open_chapter: Option<String> = None;
        let items = detected
            .into_iter()
            .map(|(line, detection)| {
                let kind = classifier.resolve(detection, &line.text, open_chapter.as_deref());
                if let Classification::Chapter(ref title) = kind {
                    open_chapter = Some(title.clone());
                }
                report.count_line(&kind);
                ClassifiedItem::new(line, kind)
            })
            .collect();

        Ok(items)
    }
}

impl Default for Chunker {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Chunker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Chunker")
            .field("criteria", &self.criteria)
            .field("heading_mode", &self.heading_mode)
            .field("pack_options", &self.pack_options)
            .field("normalize_options", &self.normalize_options)
            .field("parallel", &self.parallel)
            .field("segmenter", &self.segmenter.name())
            .finish_non_exhaustive()
    }
}
