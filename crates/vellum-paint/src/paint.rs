//! Paint styles for filling and stroking paths.
//!
//! A [`Paint`] is an immutable value. Every `with_*` method returns a new
//! paint and leaves the receiver untouched, so paints can be shared freely
//! between threads and draw calls.

use serde::{Deserialize, Serialize};
use static_assertions::assert_impl_all;
use tracing::warn;
use vellum_core::Transform2D;
use vellum_core::logging::targets;

use crate::color::Color;
use crate::effect::DashEffect;
use crate::shader::Shader;

/// Whether a paint fills, strokes, or does both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PaintStyle {
    /// Fill the interior of the geometry.
    #[default]
    Fill,
    /// Outline the geometry.
    Stroke,
    /// Fill the interior, then outline it.
    StrokeAndFill,
}

/// Line cap style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum StrokeCap {
    /// Flat cap at the exact endpoint.
    #[default]
    Butt,
    /// Rounded cap extending past the endpoint.
    Round,
    /// Square cap extending past the endpoint.
    Square,
}

/// Line join style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum StrokeJoin {
    /// Sharp corner (may be limited by the miter limit).
    #[default]
    Miter,
    /// Rounded corner.
    Round,
    /// Beveled corner.
    Bevel,
}

/// Blend mode for compositing a draw onto the destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum BlendMode {
    /// Clear the destination.
    Clear,
    /// Replace the destination with the source.
    Src,
    /// Keep the destination.
    Dst,
    /// Source over destination.
    #[default]
    SrcOver,
    /// Destination over source.
    DstOver,
    /// Source where the destination is present.
    SrcIn,
    /// Destination where the source is present.
    DstIn,
    /// Source where the destination is absent.
    SrcOut,
    /// Destination where the source is absent.
    DstOut,
    /// Source atop destination.
    SrcATop,
    /// Destination atop source.
    DstATop,
    Xor,
    /// Additive.
    Plus,
    /// Multiply all channels, including alpha.
    Modulate,
    Screen,
    Overlay,
    Darken,
    Lighten,
    ColorDodge,
    ColorBurn,
    HardLight,
    SoftLight,
    Difference,
    Exclusion,
    Multiply,
    Hue,
    Saturation,
    Color,
    Luminosity,
}

impl BlendMode {
    /// Whether this is one of the Porter-Duff coefficient modes.
    pub fn is_porter_duff(self) -> bool {
        (self as u8) <= (BlendMode::Modulate as u8)
    }

    /// Whether the mode operates per channel (everything except the
    /// hue/saturation/color/luminosity family).
    pub fn is_separable(self) -> bool {
        !matches!(
            self,
            BlendMode::Hue | BlendMode::Saturation | BlendMode::Color | BlendMode::Luminosity
        )
    }
}

/// An immutable paint: color, stroke parameters and compositing state.
///
/// ```
/// use vellum_paint::{Color, Paint, PaintStyle, StrokeCap};
///
/// let base = Paint::fill(Color::RED);
/// let outline = base
///     .with_style(PaintStyle::Stroke)
///     .with_stroke_width(2.0)
///     .with_stroke_cap(StrokeCap::Round);
///
/// assert!(base.is_fill());
/// assert!(outline.is_stroke());
/// assert_eq!(outline.stroke_width(), 2.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paint {
    color: Color,
    style: PaintStyle,
    stroke_width: f32,
    stroke_miter: f32,
    stroke_cap: StrokeCap,
    stroke_join: StrokeJoin,
    blend_mode: BlendMode,
    antialias: bool,
    shader: Option<Shader>,
    dash: Option<DashEffect>,
}

assert_impl_all!(Paint: Send, Sync, Clone, PartialEq);

impl Default for Paint {
    fn default() -> Self {
        Self {
            color: Color::BLACK,
            style: PaintStyle::Fill,
            stroke_width: 0.0,
            stroke_miter: Self::DEFAULT_MITER_LIMIT,
            stroke_cap: StrokeCap::Butt,
            stroke_join: StrokeJoin::Miter,
            blend_mode: BlendMode::SrcOver,
            antialias: true,
            shader: None,
            dash: None,
        }
    }
}

impl Paint {
    /// Miter limit used unless overridden.
    pub const DEFAULT_MITER_LIMIT: f32 = 4.0;

    /// An opaque black fill.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// A fill with the given color.
    #[inline]
    pub fn fill(color: Color) -> Self {
        Self {
            color,
            ..Self::default()
        }
    }

    /// A stroke with the given color and width.
    #[inline]
    pub fn stroke(color: Color, width: f32) -> Self {
        Self::fill(color)
            .with_style(PaintStyle::Stroke)
            .with_stroke_width(width)
    }

    /// Return a copy with a different color.
    #[inline]
    pub fn with_fill_color(&self, color: Color) -> Self {
        Self {
            color,
            ..self.clone()
        }
    }

    /// Return a copy whose color has a different alpha.
    #[inline]
    pub fn with_alpha(&self, alpha: u8) -> Self {
        self.with_fill_color(self.color.with_alpha(alpha))
    }

    /// Return a copy with a different paint style.
    #[inline]
    pub fn with_style(&self, style: PaintStyle) -> Self {
        Self {
            style,
            ..self.clone()
        }
    }

    /// Return a copy with a different stroke width.
    ///
    /// Negative or non-finite widths are clamped to 0 (a hairline).
    pub fn with_stroke_width(&self, width: f32) -> Self {
        Self {
            stroke_width: non_negative("stroke_width", width),
            ..self.clone()
        }
    }

    /// Return a copy with a different miter limit.
    ///
    /// Negative or non-finite limits are clamped to 0.
    pub fn with_stroke_miter(&self, limit: f32) -> Self {
        Self {
            stroke_miter: non_negative("stroke_miter", limit),
            ..self.clone()
        }
    }

    /// Return a copy with a different line cap.
    #[inline]
    pub fn with_stroke_cap(&self, cap: StrokeCap) -> Self {
        Self {
            stroke_cap: cap,
            ..self.clone()
        }
    }

    /// Return a copy with a different line join.
    #[inline]
    pub fn with_stroke_join(&self, join: StrokeJoin) -> Self {
        Self {
            stroke_join: join,
            ..self.clone()
        }
    }

    /// Return a copy with a different blend mode.
    #[inline]
    pub fn with_blend_mode(&self, blend_mode: BlendMode) -> Self {
        Self {
            blend_mode,
            ..self.clone()
        }
    }

    /// Return a copy with antialiasing turned on or off.
    #[inline]
    pub fn with_antialias(&self, antialias: bool) -> Self {
        Self {
            antialias,
            ..self.clone()
        }
    }

    /// Return a copy that colors geometry with `shader` instead of the color.
    ///
    /// Pass `None` to go back to the solid color.
    #[inline]
    pub fn with_shader(&self, shader: impl Into<Option<Shader>>) -> Self {
        Self {
            shader: shader.into(),
            ..self.clone()
        }
    }

    /// Return a copy with a dash pattern applied to strokes.
    #[inline]
    pub fn with_dash(&self, dash: impl Into<Option<DashEffect>>) -> Self {
        Self {
            dash: dash.into(),
            ..self.clone()
        }
    }

    #[inline]
    pub fn color(&self) -> Color {
        self.color
    }

    #[inline]
    pub fn style(&self) -> PaintStyle {
        self.style
    }

    #[inline]
    pub fn stroke_width(&self) -> f32 {
        self.stroke_width
    }

    #[inline]
    pub fn stroke_miter(&self) -> f32 {
        self.stroke_miter
    }

    #[inline]
    pub fn stroke_cap(&self) -> StrokeCap {
        self.stroke_cap
    }

    #[inline]
    pub fn stroke_join(&self) -> StrokeJoin {
        self.stroke_join
    }

    #[inline]
    pub fn blend_mode(&self) -> BlendMode {
        self.blend_mode
    }

    #[inline]
    pub fn is_antialias(&self) -> bool {
        self.antialias
    }

    #[inline]
    pub fn shader(&self) -> Option<&Shader> {
        self.shader.as_ref()
    }

    #[inline]
    pub fn dash(&self) -> Option<&DashEffect> {
        self.dash.as_ref()
    }

    /// Whether the paint outlines geometry (`Stroke` or `StrokeAndFill`).
    #[inline]
    pub fn is_stroke(&self) -> bool {
        matches!(self.style, PaintStyle::Stroke | PaintStyle::StrokeAndFill)
    }

    /// Whether the paint fills geometry (`Fill` or `StrokeAndFill`).
    #[inline]
    pub fn is_fill(&self) -> bool {
        matches!(self.style, PaintStyle::Fill | PaintStyle::StrokeAndFill)
    }

    /// Whether strokes are drawn one device pixel wide regardless of transform.
    #[inline]
    pub fn is_hairline(&self) -> bool {
        self.is_stroke() && self.stroke_width == 0.0
    }

    /// How far stroked geometry can reach outside the path's bounds.
    ///
    /// Zero for fills. Accounts for square caps and miter joins.
    pub fn stroke_outset(&self) -> f32 {
        if !self.is_stroke() {
            return 0.0;
        }
        let half = self.stroke_width.max(1.0) / 2.0;
        let mut factor: f32 = 1.0;
        if self.stroke_cap == StrokeCap::Square {
            factor = std::f32::consts::SQRT_2;
        }
        if self.stroke_join == StrokeJoin::Miter {
            factor = factor.max(self.stroke_miter);
        }
        half * factor
    }

    /// A copy with shader geometry mapped into device space and the stroke
    /// width scaled by the transform's average scale factor.
    ///
    /// Hairlines stay hairlines.
    pub fn transformed(&self, transform: &Transform2D) -> Self {
        if transform.is_identity() {
            return self.clone();
        }
        Self {
            stroke_width: self.stroke_width * transform.approx_scale(),
            shader: self.shader.as_ref().map(|s| s.transformed(transform)),
            dash: self
                .dash
                .as_ref()
                .map(|d| d.scaled(transform.approx_scale())),
            ..self.clone()
        }
    }
}

/// Clamp a stroke parameter to a finite non-negative value.
fn non_negative(field: &'static str, value: f32) -> f32 {
    if value.is_finite() && value >= 0.0 {
        return value;
    }
    warn!(target: targets::PAINT, field, value, "clamping invalid stroke parameter to 0");
    0.0
}
