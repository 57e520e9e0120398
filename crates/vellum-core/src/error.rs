//! Error types for the core crate.

use thiserror::Error;

/// Errors raised by core geometry state.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoreError {
    /// A restore was requested with no matching save.
    #[error("transform stack underflow: restore without a matching save")]
    StackUnderflow,
}

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;
