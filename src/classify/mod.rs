//! Line classification: normalization, noise filtering and heading detection.

mod criteria;
mod heading;
mod noise;
mod normalize;

pub use criteria::{HeadingCriteria, HeadingMode, DEFAULT_KEYWORD_PATTERN};
pub use heading::{
    is_all_caps, is_centered, is_title_case, Detection, HeadingClassifier,
    CENTER_TOLERANCE_RATIO, MIN_MARGIN_RATIO,
};
pub use noise::is_noise;
pub use normalize::{LineNormalizer, NormalizeOptions};
