//! The renderer sink boundary.
//!
//! A [`DrawContext`](crate::DrawContext) resolves every draw into a
//! [`DrawInstruction`] and hands it to a [`Renderer`]. Rasterization, GPU
//! submission and pixel storage all live behind that trait.

use vellum_core::{Rect, Transform2D};
use vellum_paint::{BlendMode, Paint};
use vellum_path::{Path, TessellatedPath, tessellate_fill, tessellate_stroke};

use crate::clip::ClipState;
use crate::error::RenderError;

/// A fully resolved draw, ready for a renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawInstruction {
    /// The geometry, already mapped into device space.
    pub path: Path,
    /// The paint as given to the draw call, in local units.
    pub paint: Paint,
    /// The blend mode to composite with.
    pub blend_mode: BlendMode,
    /// The clip in effect when the draw was issued.
    pub clip: ClipState,
    /// The local-to-device transform that was applied to `path`.
    pub transform: Transform2D,
    /// Curve flattening tolerance in device pixels.
    pub tolerance: f32,
}

impl DrawInstruction {
    /// The paint with stroke width, dashes and shader geometry mapped into
    /// device space.
    pub fn device_paint(&self) -> Paint {
        self.paint.transformed(&self.transform)
    }

    /// Conservative device bounds of everything this draw can touch.
    pub fn bounds(&self) -> Rect {
        let outset = self.device_paint().stroke_outset();
        let bounds = self.path.bounds();
        if outset > 0.0 {
            bounds.inflate(outset)
        } else {
            bounds
        }
    }

    /// Triangulate the filled interior, if the paint fills.
    pub fn tessellate_fill(&self) -> Option<TessellatedPath> {
        self.paint
            .is_fill()
            .then(|| tessellate_fill(&self.path, self.tolerance))
    }

    /// Triangulate the stroked outline, if the paint strokes.
    pub fn tessellate_stroke(&self) -> Option<TessellatedPath> {
        self.paint
            .is_stroke()
            .then(|| tessellate_stroke(&self.path, &self.device_paint(), self.tolerance))
    }
}

/// A sink that receives draw instructions.
///
/// Implementations report failures through [`RenderError`]; the draw context
/// returns them to its caller untouched.
pub trait Renderer {
    /// Accept one draw instruction.
    fn submit(&mut self, instruction: DrawInstruction) -> Result<(), RenderError>;
}

impl<R: Renderer + ?Sized> Renderer for &mut R {
    #[inline]
    fn submit(&mut self, instruction: DrawInstruction) -> Result<(), RenderError> {
        (**self).submit(instruction)
    }
}

impl<R: Renderer + ?Sized> Renderer for Box<R> {
    #[inline]
    fn submit(&mut self, instruction: DrawInstruction) -> Result<(), RenderError> {
        (**self).submit(instruction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vellum_paint::{Color, PaintStyle, StrokeJoin};
    use vellum_path::{Direction, PathBuilder};

    fn instruction(paint: Paint, transform: Transform2D) -> DrawInstruction {
        let mut builder = PathBuilder::new();
        builder.add_rect(Rect::new(0.0, 0.0, 10.0, 10.0), Direction::Clockwise);
        DrawInstruction {
            path: builder.build().transformed(&transform),
            blend_mode: paint.blend_mode(),
            paint,
            clip: ClipState::wide_open(),
            transform,
            tolerance: 0.1,
        }
    }

    struct Counter(usize);

    impl Renderer for Counter {
        fn submit(&mut self, _instruction: DrawInstruction) -> Result<(), RenderError> {
            self.0 += 1;
            Ok(())
        }
    }

    #[test]
    fn test_fill_bounds() {
        let inst = instruction(Paint::fill(Color::RED), Transform2D::scale(2.0));
        assert_eq!(inst.bounds(), Rect::new(0.0, 0.0, 20.0, 20.0));
    }

    #[test]
    fn test_stroke_bounds_scale_with_transform() {
        let paint = Paint::stroke(Color::BLACK, 2.0).with_stroke_join(StrokeJoin::Round);
        let inst = instruction(paint, Transform2D::scale(2.0));
        // Width 2 becomes 4 in device space, so the outline reaches 2 past the edge.
        assert_eq!(inst.bounds(), Rect::new(-2.0, -2.0, 24.0, 24.0));
        assert_eq!(inst.device_paint().stroke_width(), 4.0);
    }

    #[test]
    fn test_tessellate_by_style() {
        let fill = instruction(Paint::fill(Color::RED), Transform2D::IDENTITY);
        assert!(fill.tessellate_fill().is_some_and(|t| !t.is_empty()));
        assert!(fill.tessellate_stroke().is_none());

        let both = instruction(
            Paint::fill(Color::RED).with_style(PaintStyle::StrokeAndFill),
            Transform2D::IDENTITY,
        );
        assert!(both.tessellate_fill().is_some());
        assert!(both.tessellate_stroke().is_some_and(|t| !t.is_empty()));
    }

    #[test]
    fn test_forwarding_impls() {
        let mut counter = Counter(0);
        let inst = instruction(Paint::new(), Transform2D::IDENTITY);

        (&mut counter).submit(inst.clone()).unwrap();
        let mut boxed: Box<dyn Renderer> = Box::new(Counter(0));
        boxed.submit(inst.clone()).unwrap();
        assert_eq!(counter.0, 1);

        let mut nested = &mut counter;
        Renderer::submit(&mut nested, inst).unwrap();
        assert_eq!(counter.0, 2);
    }
}
