//! The draw context.
//!
//! A [`DrawContext`] owns a renderer for the length of a drawing session. It
//! tracks the current transform and clip, resolves each draw into a
//! [`DrawInstruction`] and submits it. The context never rasterizes.

use tracing::{debug, error, trace};
use vellum_core::logging::targets;
use vellum_core::{Point, Rect, RoundRect, Transform2D, TransformStack};
use vellum_paint::{Paint, PaintStyle};
use vellum_path::{Direction, Path, PathBuilder};

use crate::clip::{ClipOp, ClipState};
use crate::config::ContextConfig;
use crate::error::{ConfigResult, DrawError, DrawResult};
use crate::renderer::{DrawInstruction, Renderer};

/// How [`DrawContext::draw_points`] interprets its points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PointMode {
    /// Each point on its own, drawn with the paint's stroke cap.
    #[default]
    Points,
    /// Each pair of points as a separate line; an odd last point is ignored.
    Lines,
    /// All points as one open polyline.
    Polygon,
}

/// Transform and clip state, saved and restored together.
#[derive(Debug)]
struct StateStack {
    transforms: TransformStack,
    /// Transform that `reset_matrix` returns to.
    base: Transform2D,
    /// Clip at each outstanding save.
    saved_clips: Vec<ClipState>,
    clip: ClipState,
    finished: bool,
}

impl StateStack {
    fn new(base: Transform2D) -> Self {
        Self {
            transforms: TransformStack::with_base(base),
            base,
            saved_clips: Vec::new(),
            clip: ClipState::wide_open(),
            finished: false,
        }
    }

    fn save(&mut self) {
        self.transforms.save();
        self.saved_clips.push(self.clip.clone());
    }

    fn restore(&mut self) -> DrawResult<()> {
        self.transforms.restore()?;
        if let Some(clip) = self.saved_clips.pop() {
            self.clip = clip;
        }
        Ok(())
    }

    fn restore_to_count(&mut self, count: usize) {
        self.transforms.restore_to_count(count);
        let target = count.max(1) - 1;
        if target < self.saved_clips.len() {
            self.clip = self.saved_clips.swap_remove(target);
            self.saved_clips.truncate(target);
        }
    }
}

impl Drop for StateStack {
    fn drop(&mut self) {
        let depth = self.transforms.depth();
        if !self.finished && depth > 0 {
            error!(
                target: targets::CANVAS,
                depth,
                "draw context dropped with unbalanced save"
            );
        }
    }
}

/// A drawing session over a [`Renderer`].
///
/// # Examples
///
/// ```
/// use vellum_canvas::{DrawContext, PictureRecorder};
/// use vellum_core::Rect;
/// use vellum_paint::{Color, Paint};
///
/// let mut ctx = DrawContext::new(PictureRecorder::new());
/// ctx.save()?;
/// ctx.translate(10.0, 10.0);
/// ctx.draw_rect(Rect::new(0.0, 0.0, 5.0, 5.0), &Paint::fill(Color::RED))?;
/// ctx.restore()?;
///
/// let picture = ctx.finish()?.finish_recording();
/// assert_eq!(picture.bounds(), Some(Rect::new(10.0, 10.0, 5.0, 5.0)));
/// # Ok::<(), vellum_canvas::DrawError>(())
/// ```
#[derive(Debug)]
pub struct DrawContext<R: Renderer> {
    renderer: R,
    state: StateStack,
    config: ContextConfig,
}

impl<R: Renderer> DrawContext<R> {
    /// Start a session with the default configuration.
    pub fn new(renderer: R) -> Self {
        Self::build(renderer, ContextConfig::default())
    }

    /// Start a session with a validated configuration.
    pub fn with_config(renderer: R, config: ContextConfig) -> ConfigResult<Self> {
        config.validate()?;
        Ok(Self::build(renderer, config))
    }

    fn build(renderer: R, config: ContextConfig) -> Self {
        debug!(
            target: targets::CANVAS,
            device_scale = config.device_scale,
            tolerance = config.tolerance,
            "draw context started"
        );
        Self {
            renderer,
            state: StateStack::new(Transform2D::scale(config.device_scale)),
            config,
        }
    }

    // =========================================================================
    // State Stack
    // =========================================================================

    /// Save the current transform and clip.
    pub fn save(&mut self) -> DrawResult<()> {
        if let Some(limit) = self.config.max_save_depth
            && self.state.transforms.depth() >= limit
        {
            return Err(DrawError::SaveDepthExceeded { limit });
        }
        self.state.save();
        trace!(target: targets::CANVAS, depth = self.depth(), "save");
        Ok(())
    }

    /// Restore the transform and clip from the matching `save`.
    pub fn restore(&mut self) -> DrawResult<()> {
        self.state.restore()?;
        trace!(target: targets::CANVAS, depth = self.depth(), "restore");
        Ok(())
    }

    /// Number of saves not yet restored.
    #[inline]
    pub fn depth(&self) -> usize {
        self.state.transforms.depth()
    }

    /// `depth() + 1`.
    #[inline]
    pub fn save_count(&self) -> usize {
        self.state.transforms.save_count()
    }

    /// Restore until [`save_count`](Self::save_count) equals `count`.
    ///
    /// Counts below 1 are treated as 1; counts at or above the current save
    /// count do nothing.
    pub fn restore_to_count(&mut self, count: usize) {
        self.state.restore_to_count(count);
        trace!(target: targets::CANVAS, depth = self.depth(), "restore to count");
    }

    // =========================================================================
    // Transforms
    // =========================================================================

    pub fn translate(&mut self, dx: f32, dy: f32) {
        self.state.transforms.translate(dx, dy);
    }

    pub fn scale(&mut self, sx: f32, sy: f32) {
        self.state.transforms.scale_xy(sx, sy);
    }

    /// Rotate by `angle` radians.
    pub fn rotate(&mut self, angle: f32) {
        self.state.transforms.rotate(angle);
    }

    pub fn rotate_degrees(&mut self, degrees: f32) {
        self.state.transforms.rotate_degrees(degrees);
    }

    pub fn skew(&mut self, kx: f32, ky: f32) {
        self.state.transforms.skew(kx, ky);
    }

    /// Apply `transform` in local space, before the current transform.
    pub fn concat(&mut self, transform: &Transform2D) {
        self.state.transforms.concat(transform);
    }

    /// Replace the total local-to-device transform.
    pub fn set_matrix(&mut self, transform: Transform2D) {
        self.state.transforms.set(transform);
    }

    /// Return to the device base transform (the configured device scale).
    pub fn reset_matrix(&mut self) {
        self.state.transforms.set(self.state.base);
    }

    /// The total local-to-device transform.
    #[inline]
    pub fn total_matrix(&self) -> Transform2D {
        self.state.transforms.current()
    }

    // =========================================================================
    // Clipping
    // =========================================================================

    pub fn clip_rect(&mut self, rect: Rect, op: ClipOp, antialias: bool) {
        let transform = self.total_matrix();
        self.state.clip.clip_rect(rect, &transform, op, antialias);
        trace!(target: targets::CANVAS, ?rect, ?op, "clip rect");
    }

    pub fn clip_round_rect(&mut self, rrect: RoundRect, op: ClipOp, antialias: bool) {
        if rrect.is_rect() {
            self.clip_rect(rrect.rect, op, antialias);
            return;
        }
        let mut builder = PathBuilder::new();
        builder.add_round_rect(rrect, Direction::Clockwise);
        self.clip_path(&builder.build(), op, antialias);
    }

    pub fn clip_path(&mut self, path: &Path, op: ClipOp, antialias: bool) {
        let transform = self.total_matrix();
        self.state.clip.clip_path(path, &transform, op, antialias);
        trace!(target: targets::CANVAS, segments = path.len(), ?op, "clip path");
    }

    /// The current clip.
    #[inline]
    pub fn clip(&self) -> &ClipState {
        &self.state.clip
    }

    /// Conservative device bounds of the clip, `None` when unbounded.
    #[inline]
    pub fn clip_bounds(&self) -> Option<Rect> {
        self.state.clip.bounds()
    }

    /// Whether a local rectangle is certainly outside the clip.
    pub fn quick_reject(&self, rect: Rect) -> bool {
        let device = self.total_matrix().map_rect(&rect.sorted());
        self.state.clip.quick_reject(&device)
    }

    // =========================================================================
    // Drawing
    // =========================================================================

    /// Draw a path with the current transform and clip.
    ///
    /// Fails with [`DrawError::EmptyPath`] for a path with no segments. A
    /// renderer failure is returned as [`DrawError::Render`], unchanged.
    pub fn draw_path(&mut self, path: &Path, paint: &Paint) -> DrawResult<()> {
        if path.is_empty() {
            return Err(DrawError::EmptyPath);
        }

        let transform = self.total_matrix();
        let instruction = DrawInstruction {
            path: path.transformed(&transform),
            paint: paint.clone(),
            blend_mode: paint.blend_mode(),
            clip: self.state.clip.clone(),
            transform,
            tolerance: self.config.tolerance,
        };

        if self.config.cull_offscreen
            && !path.fill_type().is_inverse()
            && self.state.clip.quick_reject(&instruction.bounds())
        {
            trace!(target: targets::CANVAS, segments = path.len(), "culled offscreen draw");
            return Ok(());
        }

        debug!(
            target: targets::CANVAS,
            segments = path.len(),
            style = ?paint.style(),
            blend_mode = ?paint.blend_mode(),
            "submitting draw"
        );
        self.renderer.submit(instruction)?;
        Ok(())
    }

    pub fn draw_rect(&mut self, rect: Rect, paint: &Paint) -> DrawResult<()> {
        let mut builder = PathBuilder::new();
        builder.add_rect(rect, Direction::Clockwise);
        self.draw_path(&builder.build(), paint)
    }

    pub fn draw_round_rect(&mut self, rrect: RoundRect, paint: &Paint) -> DrawResult<()> {
        let mut builder = PathBuilder::new();
        builder.add_round_rect(rrect, Direction::Clockwise);
        self.draw_path(&builder.build(), paint)
    }

    pub fn draw_oval(&mut self, oval: Rect, paint: &Paint) -> DrawResult<()> {
        let mut builder = PathBuilder::new();
        builder.add_oval(oval, Direction::Clockwise);
        self.draw_path(&builder.build(), paint)
    }

    pub fn draw_circle(&mut self, center: Point, radius: f32, paint: &Paint) -> DrawResult<()> {
        let mut builder = PathBuilder::new();
        builder.add_circle(center, radius, Direction::Clockwise);
        self.draw_path(&builder.build(), paint)
    }

    /// Stroke a line segment. The paint is always stroked.
    pub fn draw_line(&mut self, p0: Point, p1: Point, paint: &Paint) -> DrawResult<()> {
        let mut builder = PathBuilder::new();
        builder.add_poly(&[p0, p1], false);
        self.draw_path(&builder.build(), &stroked(paint))
    }

    /// Stroke a set of points as dots, separate lines or a polyline.
    ///
    /// Fails with [`DrawError::EmptyPath`] when the mode yields no geometry,
    /// such as [`PointMode::Lines`] with a single point.
    pub fn draw_points(&mut self, mode: PointMode, points: &[Point], paint: &Paint) -> DrawResult<()> {
        let mut builder = PathBuilder::new();
        match mode {
            PointMode::Points => {
                for &p in points {
                    builder.add_poly(&[p, p], false);
                }
            }
            PointMode::Lines => {
                for pair in points.chunks_exact(2) {
                    builder.add_poly(pair, false);
                }
            }
            PointMode::Polygon => {
                builder.add_poly(points, false);
            }
        }
        self.draw_path(&builder.build(), &stroked(paint))
    }

    // =========================================================================
    // Session
    // =========================================================================

    pub fn config(&self) -> &ContextConfig {
        &self.config
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    /// End the session and hand back the renderer.
    ///
    /// Fails with [`DrawError::UnbalancedSave`] if saves are outstanding.
    pub fn finish(self) -> DrawResult<R> {
        let Self {
            renderer,
            mut state,
            ..
        } = self;
        state.finished = true;
        let depth = state.transforms.depth();
        if depth > 0 {
            return Err(DrawError::UnbalancedSave { depth });
        }
        debug!(target: targets::CANVAS, "draw context finished");
        Ok(renderer)
    }
}

fn stroked(paint: &Paint) -> Paint {
    if paint.style() == PaintStyle::Stroke {
        paint.clone()
    } else {
        paint.with_style(PaintStyle::Stroke)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RenderError;
    use vellum_paint::Color;
    use vellum_path::PathSegment;

    #[derive(Default)]
    struct Sink(Vec<DrawInstruction>);

    impl Renderer for Sink {
        fn submit(&mut self, instruction: DrawInstruction) -> Result<(), RenderError> {
            self.0.push(instruction);
            Ok(())
        }
    }

    #[test]
    fn test_save_restore_unwinds_transform_and_clip() {
        let mut ctx = DrawContext::new(Sink::default());
        ctx.translate(5.0, 5.0);
        let before = ctx.total_matrix();

        ctx.save().unwrap();
        ctx.rotate_degrees(30.0);
        ctx.scale(2.0, 3.0);
        ctx.clip_rect(Rect::new(0.0, 0.0, 10.0, 10.0), ClipOp::Intersect, true);
        assert!(!ctx.clip().is_wide_open());
        ctx.restore().unwrap();

        assert_eq!(ctx.total_matrix(), before);
        assert!(ctx.clip().is_wide_open());
        assert!(matches!(ctx.restore(), Err(DrawError::StackUnderflow)));
        ctx.finish().unwrap();
    }

    #[test]
    fn test_restore_to_count() {
        let mut ctx = DrawContext::new(Sink::default());
        ctx.save().unwrap();
        ctx.clip_rect(Rect::new(0.0, 0.0, 50.0, 50.0), ClipOp::Intersect, false);
        ctx.save().unwrap();
        ctx.clip_rect(Rect::new(0.0, 0.0, 10.0, 10.0), ClipOp::Intersect, false);
        ctx.save().unwrap();
        assert_eq!(ctx.save_count(), 4);

        ctx.restore_to_count(2);
        assert_eq!(ctx.save_count(), 2);
        assert_eq!(ctx.clip_bounds(), Some(Rect::new(0.0, 0.0, 50.0, 50.0)));

        ctx.restore_to_count(0);
        assert_eq!(ctx.depth(), 0);
        assert!(ctx.clip().is_wide_open());
        ctx.finish().unwrap();
    }

    #[test]
    fn test_device_scale_base() {
        let config = ContextConfig::new().with_device_scale(2.0);
        let mut ctx = DrawContext::with_config(Sink::default(), config).unwrap();
        ctx.translate(1.0, 1.0);
        assert_eq!(ctx.total_matrix().map_point(Point::ZERO), Point::new(2.0, 2.0));

        ctx.reset_matrix();
        assert_eq!(ctx.total_matrix(), Transform2D::scale(2.0));
        ctx.set_matrix(Transform2D::IDENTITY);
        assert!(ctx.total_matrix().is_identity());
    }

    #[test]
    fn test_with_config_validates() {
        let config = ContextConfig::new().with_tolerance(0.0);
        assert!(DrawContext::with_config(Sink::default(), config).is_err());
    }

    #[test]
    fn test_draw_line_forces_stroke() {
        let mut ctx = DrawContext::new(Sink::default());
        ctx.draw_line(Point::ZERO, Point::new(10.0, 0.0), &Paint::fill(Color::BLUE))
            .unwrap();
        let sink = ctx.finish().unwrap();
        assert_eq!(sink.0[0].paint.style(), PaintStyle::Stroke);
        assert_eq!(sink.0[0].paint.color(), Color::BLUE);
    }

    #[test]
    fn test_draw_points_modes() {
        let points = [Point::new(0.0, 0.0), Point::new(1.0, 0.0), Point::new(1.0, 1.0)];
        let paint = Paint::stroke(Color::BLACK, 1.0);
        let mut ctx = DrawContext::new(Sink::default());

        ctx.draw_points(PointMode::Points, &points, &paint).unwrap();
        ctx.draw_points(PointMode::Lines, &points, &paint).unwrap();
        ctx.draw_points(PointMode::Polygon, &points, &paint).unwrap();
        assert!(matches!(
            ctx.draw_points(PointMode::Lines, &points[..1], &paint),
            Err(DrawError::EmptyPath)
        ));
        assert!(matches!(
            ctx.draw_points(PointMode::Points, &[], &paint),
            Err(DrawError::EmptyPath)
        ));

        let sink = ctx.finish().unwrap();
        assert_eq!(sink.0.len(), 3);
        assert_eq!(sink.0[0].path.subpath_count(), 3);
        assert_eq!(sink.0[1].path.subpath_count(), 1);
        assert_eq!(
            sink.0[2].path.segments(),
            &[
                PathSegment::MoveTo(points[0]),
                PathSegment::LineTo(points[1]),
                PathSegment::LineTo(points[2]),
            ]
        );
    }

    #[test]
    fn test_save_depth_limit() {
        let config = ContextConfig::new().with_max_save_depth(1);
        let mut ctx = DrawContext::with_config(Sink::default(), config).unwrap();
        ctx.save().unwrap();
        assert!(matches!(ctx.save(), Err(DrawError::SaveDepthExceeded { limit: 1 })));
        assert_eq!(ctx.depth(), 1);
        ctx.restore().unwrap();
        ctx.finish().unwrap();
    }

    #[test]
    fn test_finish_unbalanced() {
        let mut ctx = DrawContext::new(Sink::default());
        ctx.save().unwrap();
        ctx.save().unwrap();
        assert!(matches!(ctx.finish(), Err(DrawError::UnbalancedSave { depth: 2 })));
    }
}
