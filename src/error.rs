//! Error types for the markup reinsertion engine.
//!
//! This module defines all error types using `thiserror` for zero-overhead,
//! typed errors, following the same shape the teacher crate uses for its
//! `ParseError`/`RenderError` pair.

use thiserror::Error;

/// Errors that can abort reinsertion for a sentence (`spec.md` §7).
///
/// `UnusedTags` is deliberately *not* a variant here: per `spec.md` §7 it is
/// non-fatal and travels alongside a successful
/// [`crate::project::ReinsertionOutput`] instead.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ReinsertError {
    /// The source sentence's markup is not balanced: an opening tag with no
    /// closing partner, a closing tag with no opening predecessor, or a
    /// closing tag whose id doesn't match the innermost open id.
    #[error("malformed source markup: {reason}")]
    MalformedSourceMarkup { reason: String },

    /// An alignment pair refers to a source or target index that is out of
    /// range for the supplied token sequences.
    #[error("alignment index {index} out of range for {side} sequence of length {len}")]
    AlignmentShapeMismatch {
        side: AlignmentSide,
        index: usize,
        len: usize,
    },
}

/// Which side of an alignment pair was out of range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlignmentSide {
    Source,
    Target,
}

impl std::fmt::Display for AlignmentSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Source => write!(f, "source"),
            Self::Target => write!(f, "target"),
        }
    }
}

/// Result type for reinsertion operations.
pub type ReinsertResult<T> = Result<T, ReinsertError>;
