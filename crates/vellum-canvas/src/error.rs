//! Error types for the canvas crate.

use std::error::Error as StdError;

use thiserror::Error;
use vellum_core::CoreError;

/// Boxed error type carried as the source of a [`RenderError`].
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// An opaque failure reported by a renderer sink.
///
/// The draw context never inspects or retries it; it is handed back to the
/// caller of the draw operation unchanged.
#[derive(Error, Debug)]
#[error("{message}")]
pub struct RenderError {
    message: String,
    #[source]
    source: Option<BoxError>,
}

impl RenderError {
    /// Create a render error with a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    /// Create a render error wrapping an underlying error.
    pub fn with_source(message: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// The message given by the renderer.
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Errors that can occur while drawing.
#[derive(Error, Debug)]
pub enum DrawError {
    /// A path with no segments was drawn.
    #[error("cannot draw an empty path")]
    EmptyPath,

    /// `restore` was called without a matching `save`.
    #[error("restore without a matching save")]
    StackUnderflow,

    /// `save` would nest deeper than the configured limit.
    #[error("save depth limit of {limit} exceeded")]
    SaveDepthExceeded { limit: usize },

    /// The session ended with saves that were never restored.
    #[error("draw context finished with {depth} unbalanced save(s)")]
    UnbalancedSave { depth: usize },

    /// The renderer sink rejected an instruction.
    #[error(transparent)]
    Render(#[from] RenderError),
}

impl From<CoreError> for DrawError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::StackUnderflow => Self::StackUnderflow,
        }
    }
}

/// Result type for draw operations.
pub type DrawResult<T> = Result<T, DrawError>;

/// Errors raised while loading a [`ContextConfig`](crate::ContextConfig).
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The TOML document could not be parsed.
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// A value is out of range.
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Result type for configuration loading.
pub type ConfigResult<T> = Result<T, ConfigError>;
