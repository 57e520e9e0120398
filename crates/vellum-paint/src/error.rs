//! Error types for the paint crate.

use thiserror::Error;

/// Errors raised while constructing paint values.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaintError {
    /// Gradient colors and positions do not line up, or fewer than two
    /// colors were given.
    #[error("invalid gradient stops: {colors} colors, {positions} positions")]
    GradientStops { colors: usize, positions: usize },

    /// A dash pattern needs an even number (at least two) of positive
    /// intervals.
    #[error("invalid dash pattern with {count} intervals")]
    InvalidDash { count: usize },
}

/// Result type for paint operations.
pub type PaintResult<T> = Result<T, PaintError>;
