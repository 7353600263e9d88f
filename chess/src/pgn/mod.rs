mod canonical;
mod normalize;
mod result;

pub use canonical::CanonicalGame;
pub use normalize::{normalize, strip_annotations, NormalizeError, Normalized, SegmentError};
pub use result::ResultToken;
