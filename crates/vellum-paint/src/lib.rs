//! Paint values for Vellum.
//!
//! A [`Paint`] describes how geometry is colored: a solid [`Color`] or a
//! gradient [`Shader`], fill or stroke style, stroke geometry, an optional
//! [`DashEffect`] and a [`BlendMode`]. Paints are immutable; every `with_*`
//! method returns a modified copy.
//!
//! ```
//! use vellum_paint::{Color, GradientStop, Paint, Shader, TileMode};
//! use vellum_core::Point;
//!
//! let stops = GradientStop::from_colors(&[Color::RED, Color::BLUE], None)?;
//! let paint = Paint::fill(Color::BLACK).with_shader(Shader::linear(
//!     Point::ZERO,
//!     Point::new(100.0, 0.0),
//!     stops,
//!     TileMode::Clamp,
//! ));
//! assert!(paint.shader().is_some());
//! # Ok::<(), vellum_paint::PaintError>(())
//! ```

mod color;
mod effect;
mod error;
mod paint;
mod shader;

pub use color::Color;
pub use effect::DashEffect;
pub use error::{PaintError, PaintResult};
pub use paint::{BlendMode, Paint, PaintStyle, StrokeCap, StrokeJoin};
pub use shader::{GradientStop, Shader, TileMode};
