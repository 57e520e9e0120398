//! Draw context and renderer sink for Vellum.
//!
//! A [`DrawContext`] combines paths with the current transform, clip and a
//! [`Paint`](vellum_paint::Paint), and submits the result as a
//! [`DrawInstruction`] to a [`Renderer`]. Anything that implements
//! `Renderer` can be drawn to: a GPU backend, a software rasterizer, or a
//! [`PictureRecorder`] that keeps the instructions for later playback.
//!
//! ```
//! use vellum_canvas::{DrawContext, DrawError, PictureRecorder};
//! use vellum_core::Point;
//! use vellum_paint::{Color, Paint};
//! use vellum_path::{Path, PathBuilder};
//!
//! let mut builder = PathBuilder::new();
//! builder
//!     .move_to(Point::new(0.0, 0.0))
//!     .line_to(Point::new(10.0, 0.0))?
//!     .line_to(Point::new(10.0, 10.0))?
//!     .close()?;
//! let triangle = builder.build();
//!
//! let mut ctx = DrawContext::new(PictureRecorder::new());
//! ctx.draw_path(&triangle, &Paint::fill(Color::RED))?;
//! assert!(matches!(ctx.draw_path(&Path::new(), &Paint::new()), Err(DrawError::EmptyPath)));
//!
//! let picture = ctx.finish()?.finish_recording();
//! assert_eq!(picture.instructions()[0].path, triangle);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod clip;
mod config;
mod context;
mod error;
mod picture;
mod renderer;

pub use clip::{ClipEntry, ClipOp, ClipShape, ClipState};
pub use config::ContextConfig;
pub use context::{DrawContext, PointMode};
pub use error::{BoxError, ConfigError, ConfigResult, DrawError, DrawResult, RenderError};
pub use picture::{Picture, PictureRecorder};
pub use renderer::{DrawInstruction, Renderer};
