//! Chapter/subchapter context tracking.
//!
//! A two-field state machine folded over classified lines in document
//! order. Chapter headings only change state; subchapter headings change
//! state and are emitted as content; body lines are split into sentences
//! and stamped with the active context.

use crate::model::{Classification, ClassifiedItem, ContextualUnit, FRONT_MATTER_TITLE};
use crate::segment::{segment_or_whole, SentenceSegmenter};

/// Tracks the active chapter and subchapter.
#[derive(Debug, Clone)]
pub struct StructureTracker {
    current_chapter: String,
    chapter_seen: bool,
    current_subchapter: Option<String>,
    segmentation_fallbacks: usize,
}

impl StructureTracker {
    /// Create a tracker positioned in the front matter.
    pub fn new() -> Self {
        Self {
            current_chapter: FRONT_MATTER_TITLE.to_string(),
            chapter_seen: false,
            current_subchapter: None,
            segmentation_fallbacks: 0,
        }
    }

    /// Title of the active chapter (the front-matter title before any heading).
    pub fn chapter(&self) -> &str {
        &self.current_chapter
    }

    /// Title of the active chapter, or `None` before the first chapter heading.
    pub fn open_chapter(&self) -> Option<&str> {
        self.chapter_seen.then_some(self.current_chapter.as_str())
    }

    /// Title of the active subchapter.
    pub fn subchapter(&self) -> Option<&str> {
        self.current_subchapter.as_deref()
    }

    /// Number of body lines that had to be kept whole because the
    /// segmenter failed.
    pub fn segmentation_fallbacks(&self) -> usize {
        self.segmentation_fallbacks
    }

    /// Apply one classified item, returning the units it produces.
    pub fn consume(
        &mut self,
        item: &ClassifiedItem,
        segmenter: &dyn SentenceSegmenter,
    ) -> Vec<ContextualUnit> {
        let marker = item.line.page_marker;
        match &item.kind {
            Classification::Noise => Vec::new(),
            Classification::Chapter(title) => {
                log::debug!("chapter '{}' opens at {}", title, marker);
                self.current_chapter = title.clone();
                self.chapter_seen = true;
                self.current_subchapter = None;
                Vec::new()
            }
            Classification::Subchapter(title) => {
                log::debug!("subchapter '{}' opens at {}", title, marker);
                self.current_subchapter = Some(title.clone());
                vec![self.unit(title.clone(), item)]
            }
            Classification::Body(text) => {
                let (sentences, fell_back) = segment_or_whole(segmenter, text);
                if fell_back {
                    self.segmentation_fallbacks += 1;
                }
                sentences
                    .into_iter()
                    .map(|sentence| self.unit(sentence, item))
                    .collect()
            }
        }
    }

    fn unit(&self, text: String, item: &ClassifiedItem) -> ContextualUnit {
        ContextualUnit::new(
            text,
            item.line.page_marker,
            self.current_chapter.clone(),
            self.current_subchapter.clone(),
        )
    }
}

impl Default for StructureTracker {
    fn default() -> Self {
        Self::new()
    }
}

/// Fold a whole classified stream into units.
pub fn track_structure(
    items: &[ClassifiedItem],
    segmenter: &dyn SentenceSegmenter,
) -> Vec<ContextualUnit> {
    let mut tracker = StructureTracker::new();
    items
        .iter()
        .flat_map(|item| tracker.consume(item, segmenter))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Line, PageMarker};
    use crate::segment::UnicodeSentenceSegmenter;

    fn item(kind: Classification, page: u32) -> ClassifiedItem {
        let text = match &kind {
            Classification::Chapter(t) | Classification::Subchapter(t) | Classification::Body(t) => {
                t.clone()
            }
            Classification::Noise => String::new(),
        };
        ClassifiedItem::new(Line::new(text, PageMarker::Page(page)), kind)
    }

    #[test]
    fn test_front_matter_default() {
        let units = track_structure(
            &[item(Classification::Body("Preface text.".into()), 1)],
            &UnicodeSentenceSegmenter,
        );
        assert_eq!(units.len(), 1);
        assert_eq!(units[0].chapter_title, FRONT_MATTER_TITLE);
        assert!(units[0].is_front_matter());
        assert_eq!(units[0].subchapter_title, None);
    }

    #[test]
    fn test_chapter_heading_is_state_only() {
        let units = track_structure(
            &[
                item(Classification::Chapter("CHAPTER 1".into()), 2),
                item(
                    Classification::Body("This is a sentence. This is another.".into()),
                    2,
                ),
            ],
            &UnicodeSentenceSegmenter,
        );
        assert_eq!(units.len(), 2);
        assert!(units.iter().all(|u| u.chapter_title == "CHAPTER 1"));
        assert_eq!(units[0].text, "This is a sentence.");
        assert_eq!(units[1].text, "This is another.");
    }

    #[test]
    fn test_subchapter_is_content_and_resets() {
        let units = track_structure(
            &[
                item(Classification::Chapter("One".into()), 1),
                item(Classification::Subchapter("Early Days".into()), 1),
                item(Classification::Body("Body.".into()), 2),
                item(Classification::Noise, 2),
                item(Classification::Chapter("Two".into()), 3),
                item(Classification::Body("Later.".into()), 3),
            ],
            &UnicodeSentenceSegmenter,
        );

        assert_eq!(units.len(), 3);
        assert_eq!(units[0].text, "Early Days");
        assert_eq!(units[0].subchapter_title.as_deref(), Some("Early Days"));
        assert_eq!(units[1].subchapter_title.as_deref(), Some("Early Days"));
        assert_eq!(units[1].page_marker, PageMarker::Page(2));
        assert_eq!(units[2].chapter_title, "Two");
        assert_eq!(units[2].subchapter_title, None);
    }

    #[test]
    fn test_open_chapter() {
        let mut tracker = StructureTracker::new();
        assert_eq!(tracker.open_chapter(), None);
        assert_eq!(tracker.chapter(), FRONT_MATTER_TITLE);

        tracker.consume(
            &item(Classification::Chapter("Prologue".into()), 1),
            &UnicodeSentenceSegmenter,
        );
        assert_eq!(tracker.open_chapter(), Some("Prologue"));
        assert_eq!(tracker.subchapter(), None);
    }
}
