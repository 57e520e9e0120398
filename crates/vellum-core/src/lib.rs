//! Core geometry for Vellum.
//!
//! This crate holds the value types every other Vellum crate builds on:
//! points, sizes and rectangles, the [`Transform2D`] affine matrix, and the
//! [`TransformStack`] that scopes transforms with save/restore.
//!
//! ```
//! use vellum_core::{Point, TransformStack};
//!
//! let mut stack = TransformStack::new();
//! stack.push();
//! stack.translate(5.0, 5.0);
//! assert_eq!(stack.map_point(Point::ZERO), Point::new(5.0, 5.0));
//! stack.pop()?;
//! assert!(stack.current().is_identity());
//! # Ok::<(), vellum_core::CoreError>(())
//! ```

mod error;
pub mod logging;
mod transform;
mod types;

pub use error::{CoreError, CoreResult};
pub use transform::{Transform2D, TransformStack};
pub use types::{CornerRadii, Point, Rect, RoundRect, Size};
