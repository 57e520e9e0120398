//! Gradient shaders.

use serde::{Deserialize, Serialize};
use vellum_core::{Point, Transform2D};

use crate::color::Color;
use crate::error::{PaintError, PaintResult};

/// How a gradient behaves outside its `0..=1` range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TileMode {
    /// Extend the edge colors.
    #[default]
    Clamp,
    /// Repeat the gradient.
    Repeat,
    /// Repeat the gradient, mirroring every other copy.
    Mirror,
    /// Transparent outside the range.
    Decal,
}

/// A gradient color stop.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GradientStop {
    /// Position along the gradient (0.0 to 1.0).
    pub offset: f32,
    /// Color at this stop.
    pub color: Color,
}

impl GradientStop {
    /// Create a new gradient stop.
    #[inline]
    pub const fn new(offset: f32, color: Color) -> Self {
        Self { offset, color }
    }

    /// Build stops from colors, either evenly spaced or at explicit positions.
    ///
    /// Explicit positions must match the color count and are clamped to
    /// `0..=1`. At least two colors are required.
    ///
    /// ```
    /// use vellum_paint::{Color, GradientStop};
    ///
    /// let stops = GradientStop::from_colors(&[Color::RED, Color::GREEN, Color::BLUE], None)?;
    /// assert_eq!(stops[1].offset, 0.5);
    /// # Ok::<(), vellum_paint::PaintError>(())
    /// ```
    pub fn from_colors(colors: &[Color], positions: Option<&[f32]>) -> PaintResult<Vec<Self>> {
        if colors.len() < 2 {
            return Err(PaintError::GradientStops {
                colors: colors.len(),
                positions: positions.map_or(0, <[f32]>::len),
            });
        }

        match positions {
            Some(positions) if positions.len() != colors.len() => Err(PaintError::GradientStops {
                colors: colors.len(),
                positions: positions.len(),
            }),
            Some(positions) => Ok(colors
                .iter()
                .zip(positions)
                .map(|(&color, &offset)| Self::new(offset.clamp(0.0, 1.0), color))
                .collect()),
            None => {
                let last = (colors.len() - 1) as f32;
                Ok(colors
                    .iter()
                    .enumerate()
                    .map(|(i, &color)| Self::new(i as f32 / last, color))
                    .collect())
            }
        }
    }
}

/// A shader colors geometry in place of the paint's solid color.
///
/// Geometry is given in the local coordinates of the draw call;
/// [`transformed`](Shader::transformed) maps it into device space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Shader {
    /// Colors vary along the line from `start` to `end`.
    LinearGradient {
        start: Point,
        end: Point,
        stops: Vec<GradientStop>,
        tile_mode: TileMode,
    },
    /// Colors vary with the distance from `center`.
    RadialGradient {
        center: Point,
        radius: f32,
        stops: Vec<GradientStop>,
        tile_mode: TileMode,
        /// Set when the gradient has been mapped through a non-uniform
        /// transform; the circle is then an ellipse in device space.
        local_transform: Option<Transform2D>,
    },
    /// Colors vary with the angle around `center`.
    SweepGradient {
        center: Point,
        stops: Vec<GradientStop>,
        local_transform: Option<Transform2D>,
    },
}

impl Shader {
    /// Create a linear gradient.
    pub fn linear(start: Point, end: Point, stops: Vec<GradientStop>, tile_mode: TileMode) -> Self {
        Self::LinearGradient {
            start,
            end,
            stops,
            tile_mode,
        }
    }

    /// Create a radial gradient.
    pub fn radial(center: Point, radius: f32, stops: Vec<GradientStop>, tile_mode: TileMode) -> Self {
        Self::RadialGradient {
            center,
            radius: radius.abs(),
            stops,
            tile_mode,
            local_transform: None,
        }
    }

    /// Create a sweep gradient.
    pub fn sweep(center: Point, stops: Vec<GradientStop>) -> Self {
        Self::SweepGradient {
            center,
            stops,
            local_transform: None,
        }
    }

    /// The color stops of this gradient.
    pub fn stops(&self) -> &[GradientStop] {
        match self {
            Self::LinearGradient { stops, .. }
            | Self::RadialGradient { stops, .. }
            | Self::SweepGradient { stops, .. } => stops,
        }
    }

    /// Whether every stop is fully opaque.
    pub fn is_opaque(&self) -> bool {
        let tiled_decal = matches!(
            self,
            Self::LinearGradient { tile_mode: TileMode::Decal, .. }
                | Self::RadialGradient { tile_mode: TileMode::Decal, .. }
        );
        !tiled_decal && self.stops().iter().all(|s| s.color.is_opaque())
    }

    /// Map the gradient geometry through `transform`.
    ///
    /// Linear gradients map their endpoints directly. Radial and sweep
    /// gradients map their center; anything the center and radius cannot
    /// express (rotation, skew, non-uniform scale) is kept in
    /// `local_transform`.
    pub fn transformed(&self, transform: &Transform2D) -> Self {
        match self {
            Self::LinearGradient {
                start,
                end,
                stops,
                tile_mode,
            } => Self::LinearGradient {
                start: transform.map_point(*start),
                end: transform.map_point(*end),
                stops: stops.clone(),
                tile_mode: *tile_mode,
            },
            Self::RadialGradient {
                center,
                radius,
                stops,
                tile_mode,
                local_transform,
            } => {
                let full = compose(transform, *local_transform);
                if let Some(scale) = uniform_scale(&full) {
                    Self::RadialGradient {
                        center: full.map_point(*center),
                        radius: radius * scale,
                        stops: stops.clone(),
                        tile_mode: *tile_mode,
                        local_transform: None,
                    }
                } else {
                    Self::RadialGradient {
                        center: *center,
                        radius: *radius,
                        stops: stops.clone(),
                        tile_mode: *tile_mode,
                        local_transform: Some(full),
                    }
                }
            }
            Self::SweepGradient {
                center,
                stops,
                local_transform,
            } => {
                let full = compose(transform, *local_transform);
                if full.is_translate_only() {
                    Self::SweepGradient {
                        center: full.map_point(*center),
                        stops: stops.clone(),
                        local_transform: None,
                    }
                } else {
                    Self::SweepGradient {
                        center: *center,
                        stops: stops.clone(),
                        local_transform: Some(full),
                    }
                }
            }
        }
    }
}

fn compose(outer: &Transform2D, inner: Option<Transform2D>) -> Transform2D {
    match inner {
        Some(inner) => outer.then(&inner),
        None => *outer,
    }
}

/// The scale factor of a transform made only of translation and uniform
/// positive scale.
fn uniform_scale(t: &Transform2D) -> Option<f32> {
    let [sx, ky, kx, sy, _, _] = *t.as_array();
    (ky == 0.0 && kx == 0.0 && sx == sy && sx > 0.0).then_some(sx)
}
