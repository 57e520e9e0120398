//! Error types for the path crate.

use thiserror::Error;

/// Errors raised while building or parsing paths.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PathError {
    /// A segment was added in a state where it makes no sense, such as a
    /// `line_to` with no current subpath.
    #[error("invalid path state in `{op}`: {reason}")]
    InvalidPathState {
        /// The operation that was attempted.
        op: &'static str,
        /// Why the builder could not accept it.
        reason: &'static str,
    },

    /// SVG path data could not be parsed.
    #[error("invalid SVG path data at byte {position}: {message}")]
    Svg {
        /// Byte offset into the input.
        position: usize,
        message: String,
    },
}

impl PathError {
    pub(crate) fn state(op: &'static str, reason: &'static str) -> Self {
        Self::InvalidPathState { op, reason }
    }
}

/// Result type for path operations.
pub type PathResult<T> = Result<T, PathError>;
