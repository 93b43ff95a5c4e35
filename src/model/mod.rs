//! Data model for segmentation and chunking.
//!
//! Lines come in from a decoder, get classified, become context-stamped
//! units and are finally packed into chunks. Every stage carries the
//! page marker of the line it came from.

mod chunk;
mod line;
mod unit;

pub use chunk::Chunk;
pub use line::{LayoutHints, Line, PageMarker, Rect, StyleHints, STYLED_CHAR_RATIO};
pub use unit::{Classification, ClassifiedItem, ContextualUnit, FRONT_MATTER_TITLE};
