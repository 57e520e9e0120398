//! Vellum - a 2D vector-graphics drawing core.
//!
//! This is the umbrella crate that re-exports the public APIs of the Vellum
//! crates, one module per capability:
//!
//! - [`geometry`]: points, rectangles, [`Transform2D`](geometry::Transform2D) and the
//!   transform stack
//! - [`paint`]: colors, gradients, dashes and immutable [`Paint`](paint::Paint) values
//! - [`path`]: the path builder, SVG path data and lyon tessellation
//! - [`canvas`]: the draw context, clipping and the renderer sink
//!
//! # Example
//!
//! ```
//! use vellum::prelude::*;
//!
//! fn main() -> vellum::Result<()> {
//!     let mut builder = PathBuilder::new();
//!     builder
//!         .move_to(Point::new(0.0, 0.0))
//!         .line_to(Point::new(10.0, 0.0))?
//!         .line_to(Point::new(10.0, 10.0))?
//!         .close()?;
//!     let path = builder.build();
//!
//!     let mut ctx = DrawContext::new(PictureRecorder::new());
//!     ctx.save()?;
//!     ctx.rotate_degrees(45.0);
//!     ctx.draw_path(&path, &Paint::stroke(Color::BLACK, 2.0))?;
//!     ctx.restore()?;
//!
//!     let picture = ctx.finish()?.finish_recording();
//!     assert_eq!(picture.len(), 1);
//!     Ok(())
//! }
//! ```

pub mod prelude;

/// Geometry and transforms.
pub mod geometry {
    pub use vellum_core::*;
}

/// Paint values.
pub mod paint {
    pub use vellum_paint::*;
}

/// Path construction and tessellation.
pub mod path {
    pub use vellum_path::*;
}

/// Draw contexts and renderer sinks.
pub mod canvas {
    pub use vellum_canvas::*;
}

use thiserror::Error;

/// Any error raised by a Vellum crate.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Core(#[from] vellum_core::CoreError),

    #[error(transparent)]
    Paint(#[from] vellum_paint::PaintError),

    #[error(transparent)]
    Path(#[from] vellum_path::PathError),

    #[error(transparent)]
    Draw(#[from] vellum_canvas::DrawError),

    #[error(transparent)]
    Config(#[from] vellum_canvas::ConfigError),
}

impl From<vellum_canvas::RenderError> for Error {
    fn from(err: vellum_canvas::RenderError) -> Self {
        Self::Draw(err.into())
    }
}

/// Result type using the umbrella [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
