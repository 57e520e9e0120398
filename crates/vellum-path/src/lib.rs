//! Path construction for Vellum.
//!
//! [`PathBuilder`] accumulates move/line/curve/close segments, checking that
//! every drawing segment follows an open subpath, and seals them into an
//! immutable [`Path`]. Paths answer geometric queries (bounds, hit testing),
//! convert to and from SVG path data, and can be tessellated into triangles
//! with lyon for renderers that need them.
//!
//! ```
//! use vellum_core::{Point, Transform2D};
//! use vellum_path::{tessellate_fill, Path, DEFAULT_TOLERANCE};
//!
//! let path: Path = "M0 0 L10 0 L10 10 Z".parse()?;
//! let device = path.transformed(&Transform2D::scale(2.0));
//! assert_eq!(device.last_point(), Some(Point::new(20.0, 20.0)));
//!
//! let mesh = tessellate_fill(&device, DEFAULT_TOLERANCE);
//! assert_eq!(mesh.triangle_count(), 1);
//! # Ok::<(), vellum_path::PathError>(())
//! ```

mod builder;
mod error;
mod path;
mod svg;
mod tessellate;

pub use builder::{Direction, PathBuilder};
pub use error::{PathError, PathResult};
pub use path::{Contour, FillType, Path, PathSegment, SegmentMask};
pub use tessellate::{
    DEFAULT_TOLERANCE, TessellatedPath, tessellate_fill, tessellate_stroke, to_lyon_path,
};
