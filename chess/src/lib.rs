//! Move-text handling for archived games.
//!
//! Turns the annotated PGN blobs served by online game archives into a
//! compact per-move mapping. Only the text is interpreted: move legality and
//! board state are out of scope.

pub mod pgn;

pub use pgn::{
    normalize, strip_annotations, CanonicalGame, NormalizeError, Normalized, ResultToken,
    SegmentError,
};
