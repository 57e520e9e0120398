//! Prelude module for Vellum.
//!
//! Re-exports the most commonly used types:
//!
//! ```
//! use vellum::prelude::*;
//! ```

// ============================================================================
// Geometry
// ============================================================================

pub use vellum_core::{CornerRadii, Point, Rect, RoundRect, Size};

// ============================================================================
// Transforms
// ============================================================================

pub use vellum_core::{Transform2D, TransformStack};

// ============================================================================
// Paint
// ============================================================================

pub use vellum_paint::{
    BlendMode, Color, DashEffect, GradientStop, Paint, PaintStyle, Shader, StrokeCap, StrokeJoin,
    TileMode,
};

// ============================================================================
// Paths
// ============================================================================

pub use vellum_path::{Direction, FillType, Path, PathBuilder, PathSegment};

// ============================================================================
// Drawing
// ============================================================================

pub use vellum_canvas::{
    ClipOp, ContextConfig, DrawContext, DrawInstruction, Picture, PictureRecorder, PointMode,
    RenderError, Renderer,
};

// ============================================================================
// Errors
// ============================================================================

pub use crate::Error;
