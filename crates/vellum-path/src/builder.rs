//! Incremental path construction.

use tracing::{debug, trace};
use vellum_core::logging::targets;
use vellum_core::{Point, Rect, RoundRect, Size, Transform2D};

use crate::error::PathResult;
use crate::path::{FillType, Path, PathSegment, SubpathState};

/// Control point distance for approximating a quarter circle with a cubic.
const KAPPA: f32 = 0.552_284_8;

/// Winding direction for closed shapes added by the builder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Direction {
    /// Clockwise in a y-down coordinate system.
    #[default]
    Clockwise,
    CounterClockwise,
}

/// Accumulates segments and seals them into an immutable [`Path`].
///
/// Drawing segments need a current subpath: `line_to`, `quad_to`,
/// `cubic_to` and `close` fail with
/// [`PathError::InvalidPathState`](crate::PathError::InvalidPathState) before
/// the first `move_to`, and again after `close` until the next `move_to`.
/// A failed call leaves the builder unchanged.
///
/// # Examples
///
/// ```
/// use vellum_core::{Point, Rect};
/// use vellum_path::{Direction, PathBuilder};
///
/// let mut builder = PathBuilder::new();
/// assert!(builder.line_to(Point::new(1.0, 1.0)).is_err());
///
/// builder.add_rect(Rect::new(0.0, 0.0, 10.0, 10.0), Direction::Clockwise);
/// builder.move_to(Point::new(20.0, 0.0)).line_to(Point::new(30.0, 0.0))?;
///
/// let path = builder.build();
/// assert_eq!(path.subpath_count(), 2);
/// assert!(builder.is_empty());
/// # Ok::<(), vellum_path::PathError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct PathBuilder {
    segments: Vec<PathSegment>,
    fill_type: FillType,
    state: SubpathState,
    /// Start of the current subpath.
    start: Point,
    /// Point that relative operations are measured from.
    current: Point,
}

impl PathBuilder {
    /// Create an empty builder.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new subpath at `p`.
    pub fn move_to(&mut self, p: Point) -> &mut Self {
        self.segments.push(PathSegment::MoveTo(p));
        self.state = SubpathState::Open;
        self.start = p;
        self.current = p;
        self
    }

    /// Draw a line from the current point to `p`.
    pub fn line_to(&mut self, p: Point) -> PathResult<&mut Self> {
        self.push(PathSegment::LineTo(p))
    }

    /// Draw a quadratic bezier curve with control point `c` ending at `p`.
    pub fn quad_to(&mut self, c: Point, p: Point) -> PathResult<&mut Self> {
        self.push(PathSegment::QuadTo(c, p))
    }

    /// Draw a cubic bezier curve with control points `c1`, `c2` ending at `p`.
    pub fn cubic_to(&mut self, c1: Point, c2: Point, p: Point) -> PathResult<&mut Self> {
        self.push(PathSegment::CubicTo(c1, c2, p))
    }

    /// Close the current subpath with a line back to its start.
    pub fn close(&mut self) -> PathResult<&mut Self> {
        self.push(PathSegment::Close)
    }

    /// [`move_to`](Self::move_to) relative to the current point (the origin
    /// for an empty builder).
    pub fn r_move_to(&mut self, d: Point) -> &mut Self {
        self.move_to(self.current + d)
    }

    /// [`line_to`](Self::line_to) with an offset from the current point.
    pub fn r_line_to(&mut self, d: Point) -> PathResult<&mut Self> {
        let o = self.current;
        self.line_to(o + d)
    }

    /// [`quad_to`](Self::quad_to) with offsets from the current point.
    pub fn r_quad_to(&mut self, c: Point, p: Point) -> PathResult<&mut Self> {
        let o = self.current;
        self.quad_to(o + c, o + p)
    }

    /// [`cubic_to`](Self::cubic_to) with offsets from the current point.
    pub fn r_cubic_to(&mut self, c1: Point, c2: Point, p: Point) -> PathResult<&mut Self> {
        let o = self.current;
        self.cubic_to(o + c1, o + c2, o + p)
    }

    /// Set the fill type of the path being built.
    pub fn set_fill_type(&mut self, fill_type: FillType) -> &mut Self {
        self.fill_type = fill_type;
        self
    }

    #[inline]
    pub fn fill_type(&self) -> FillType {
        self.fill_type
    }

    /// The end point of the last segment added, if any.
    pub fn last_point(&self) -> Option<Point> {
        self.segments.iter().rev().find_map(PathSegment::end_point)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Number of segments added so far.
    #[inline]
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Drop every segment and reset the fill type.
    pub fn reset(&mut self) -> &mut Self {
        *self = Self::default();
        self
    }

    /// Seal the accumulated segments into a [`Path`] and reset the builder.
    pub fn build(&mut self) -> Path {
        let builder = std::mem::take(self);
        debug!(
            target: targets::PATH,
            segments = builder.segments.len(),
            fill_type = ?builder.fill_type,
            "built path"
        );
        Path::from_parts(builder.segments, builder.fill_type)
    }

    /// Add a closed rectangle as a new subpath, starting at its top-left corner.
    pub fn add_rect(&mut self, rect: Rect, dir: Direction) -> &mut Self {
        let r = rect.sorted();
        self.add_contour(
            r.top_left(),
            vec![
                PathSegment::LineTo(r.top_right()),
                PathSegment::LineTo(r.bottom_right()),
                PathSegment::LineTo(r.bottom_left()),
            ],
            dir,
        )
    }

    /// Add a closed oval inscribed in `oval` as a new subpath, built from
    /// four cubic quarter arcs starting at the top center.
    pub fn add_oval(&mut self, oval: Rect, dir: Direction) -> &mut Self {
        let r = oval.sorted();
        let c = r.center();
        let (rx, ry) = (r.width() / 2.0, r.height() / 2.0);
        let (kx, ky) = (rx * KAPPA, ry * KAPPA);

        let top = Point::new(c.x, r.top());
        let right = Point::new(r.right(), c.y);
        let bottom = Point::new(c.x, r.bottom());
        let left = Point::new(r.left(), c.y);

        self.add_contour(
            top,
            vec![
                PathSegment::CubicTo(
                    Point::new(c.x + kx, r.top()),
                    Point::new(r.right(), c.y - ky),
                    right,
                ),
                PathSegment::CubicTo(
                    Point::new(r.right(), c.y + ky),
                    Point::new(c.x + kx, r.bottom()),
                    bottom,
                ),
                PathSegment::CubicTo(
                    Point::new(c.x - kx, r.bottom()),
                    Point::new(r.left(), c.y + ky),
                    left,
                ),
                PathSegment::CubicTo(
                    Point::new(r.left(), c.y - ky),
                    Point::new(c.x - kx, r.top()),
                    top,
                ),
            ],
            dir,
        )
    }

    /// Add a closed circle as a new subpath.
    pub fn add_circle(&mut self, center: Point, radius: f32, dir: Direction) -> &mut Self {
        let d = radius.abs() * 2.0;
        self.add_oval(Rect::from_center(center, Size::new(d, d)), dir)
    }

    /// Add a closed rounded rectangle as a new subpath.
    ///
    /// Radii too large for the rectangle are scaled down proportionally.
    pub fn add_round_rect(&mut self, rrect: RoundRect, dir: Direction) -> &mut Self {
        let rrect = RoundRect::with_radii(rrect.rect.sorted(), rrect.radii);
        let radii = rrect.clamped_radii();
        if radii.is_zero() {
            return self.add_rect(rrect.rect, dir);
        }

        let r = rrect.rect;
        let (l, t, rt, b) = (r.left(), r.top(), r.right(), r.bottom());
        let (tl, tr, br, bl) = (
            radii.top_left,
            radii.top_right,
            radii.bottom_right,
            radii.bottom_left,
        );

        let mut segments = Vec::with_capacity(8);
        segments.push(PathSegment::LineTo(Point::new(rt - tr, t)));
        if tr > 0.0 {
            segments.push(PathSegment::CubicTo(
                Point::new(rt - tr + tr * KAPPA, t),
                Point::new(rt, t + tr - tr * KAPPA),
                Point::new(rt, t + tr),
            ));
        }
        segments.push(PathSegment::LineTo(Point::new(rt, b - br)));
        if br > 0.0 {
            segments.push(PathSegment::CubicTo(
                Point::new(rt, b - br + br * KAPPA),
                Point::new(rt - br + br * KAPPA, b),
                Point::new(rt - br, b),
            ));
        }
        segments.push(PathSegment::LineTo(Point::new(l + bl, b)));
        if bl > 0.0 {
            segments.push(PathSegment::CubicTo(
                Point::new(l + bl - bl * KAPPA, b),
                Point::new(l, b - bl + bl * KAPPA),
                Point::new(l, b - bl),
            ));
        }
        segments.push(PathSegment::LineTo(Point::new(l, t + tl)));
        if tl > 0.0 {
            segments.push(PathSegment::CubicTo(
                Point::new(l, t + tl - tl * KAPPA),
                Point::new(l + tl - tl * KAPPA, t),
                Point::new(l + tl, t),
            ));
        }

        self.add_contour(Point::new(l + tl, t), segments, dir)
    }

    /// Add a polyline through `points` as a new subpath, closing it if asked.
    ///
    /// An empty slice adds nothing.
    pub fn add_poly(&mut self, points: &[Point], close: bool) -> &mut Self {
        let Some((&first, rest)) = points.split_first() else {
            return self;
        };
        self.move_to(first);
        self.extend_open(rest.iter().map(|&p| PathSegment::LineTo(p)));
        if close {
            self.extend_open([PathSegment::Close]);
        }
        self
    }

    /// Add an open elliptical arc as a new subpath.
    ///
    /// Angles are in degrees, measured from the positive x axis toward the
    /// positive y axis. Sweeps beyond a full turn are clamped; an empty oval
    /// or a zero sweep adds nothing.
    pub fn add_arc(&mut self, oval: Rect, start_degrees: f32, sweep_degrees: f32) -> &mut Self {
        let r = oval.sorted();
        if r.is_empty() || sweep_degrees == 0.0 || !sweep_degrees.is_finite() {
            trace!(target: targets::PATH, "skipping empty arc");
            return self;
        }

        let sweep = sweep_degrees.clamp(-360.0, 360.0).to_radians();
        let start = start_degrees.to_radians();
        let c = r.center();
        let (rx, ry) = (r.width() / 2.0, r.height() / 2.0);
        let at = |theta: f32| Point::new(c.x + rx * theta.cos(), c.y + ry * theta.sin());
        let tangent = |theta: f32| Point::new(-rx * theta.sin(), ry * theta.cos());

        let n = (sweep_degrees.abs().min(360.0) / 90.0).ceil().max(1.0) as usize;
        let step = sweep / n as f32;
        let k = 4.0 / 3.0 * (step / 4.0).tan();

        self.move_to(at(start));
        let pieces = (0..n).map(|i| {
            let a0 = start + step * i as f32;
            let a1 = a0 + step;
            PathSegment::CubicTo(
                at(a0) + tangent(a0) * k,
                at(a1) - tangent(a1) * k,
                at(a1),
            )
        });
        self.extend_open(pieces);
        self
    }

    /// Append every subpath of `path`, mapped through `transform`.
    pub fn add_path(&mut self, path: &Path, transform: &Transform2D) -> &mut Self {
        for segment in path.segments() {
            let segment = segment.transformed(transform);
            if let PathSegment::MoveTo(p) = segment {
                self.move_to(p);
            } else {
                self.extend_open([segment]);
            }
        }
        self
    }

    /// Check `segment` against the subpath state and append it.
    fn push(&mut self, segment: PathSegment) -> PathResult<&mut Self> {
        self.state = self.state.accept(&segment)?;
        self.segments.push(segment);
        self.current = segment.end_point().unwrap_or(self.start);
        Ok(self)
    }

    /// Append segments that follow an open subpath by construction.
    fn extend_open(&mut self, segments: impl IntoIterator<Item = PathSegment>) {
        for segment in segments {
            if let PathSegment::MoveTo(p) = segment {
                self.move_to(p);
                continue;
            }
            self.state = match segment {
                PathSegment::Close => SubpathState::Closed,
                _ => SubpathState::Open,
            };
            self.segments.push(segment);
            self.current = segment.end_point().unwrap_or(self.start);
        }
    }

    /// Add a closed contour given in clockwise order, reversing it for
    /// counter-clockwise shapes.
    fn add_contour(&mut self, start: Point, segments: Vec<PathSegment>, dir: Direction) -> &mut Self {
        match dir {
            Direction::Clockwise => {
                self.move_to(start);
                self.extend_open(segments);
            }
            Direction::CounterClockwise => {
                let (new_start, reversed) = reverse_contour(start, &segments);
                self.move_to(new_start);
                self.extend_open(reversed);
            }
        }
        self.extend_open([PathSegment::Close]);
        self
    }
}

/// Reverse a run of drawing segments that starts at `start`.
///
/// Returns the new start point (the old end point) and the reversed
/// segments, which end back at `start`.
fn reverse_contour(start: Point, segments: &[PathSegment]) -> (Point, Vec<PathSegment>) {
    let mut froms = Vec::with_capacity(segments.len());
    let mut from = start;
    for segment in segments {
        froms.push(from);
        if let Some(p) = segment.end_point() {
            from = p;
        }
    }

    let reversed = segments
        .iter()
        .zip(froms)
        .rev()
        .filter_map(|(segment, from)| match *segment {
            PathSegment::LineTo(_) => Some(PathSegment::LineTo(from)),
            PathSegment::QuadTo(c, _) => Some(PathSegment::QuadTo(c, from)),
            PathSegment::CubicTo(c1, c2, _) => Some(PathSegment::CubicTo(c2, c1, from)),
            PathSegment::MoveTo(_) | PathSegment::Close => None,
        })
        .collect();
    (from, reversed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PathError;

    fn p(x: f32, y: f32) -> Point {
        Point::new(x, y)
    }

    #[test]
    fn test_empty_builder_builds_empty_path() {
        let mut b = PathBuilder::new();
        let path = b.build();
        assert!(path.is_empty());
        assert_eq!(path.len(), 0);
    }

    #[test]
    fn test_drawing_requires_move_to() {
        let mut b = PathBuilder::new();
        for result in [
            b.line_to(p(1.0, 1.0)).map(|_| ()),
            b.quad_to(p(1.0, 1.0), p(2.0, 2.0)).map(|_| ()),
            b.cubic_to(p(1.0, 1.0), p(2.0, 2.0), p(3.0, 3.0)).map(|_| ()),
            b.close().map(|_| ()),
        ] {
            assert!(matches!(result, Err(PathError::InvalidPathState { .. })));
        }
        assert!(b.is_empty());
    }

    #[test]
    fn test_close_ends_subpath() {
        let mut b = PathBuilder::new();
        b.move_to(p(0.0, 0.0)).line_to(p(10.0, 0.0)).unwrap();
        b.close().unwrap();

        let err = b.line_to(p(5.0, 5.0)).unwrap_err();
        assert!(matches!(err, PathError::InvalidPathState { op: "line_to", .. }));
        assert!(b.close().is_err());

        b.move_to(p(20.0, 0.0)).line_to(p(30.0, 0.0)).unwrap();
        assert_eq!(b.build().subpath_count(), 2);
    }

    #[test]
    fn test_build_resets() {
        let mut b = PathBuilder::new();
        b.set_fill_type(FillType::EvenOdd).move_to(p(1.0, 1.0));
        let path = b.build();
        assert_eq!(path.fill_type(), FillType::EvenOdd);
        assert!(b.is_empty());
        assert_eq!(b.fill_type(), FillType::Winding);
        assert!(b.line_to(p(0.0, 0.0)).is_err());
    }

    #[test]
    fn test_relative_ops() {
        let mut b = PathBuilder::new();
        b.r_move_to(p(5.0, 5.0))
            .r_line_to(p(10.0, 0.0))
            .unwrap()
            .r_quad_to(p(5.0, 5.0), p(0.0, 10.0))
            .unwrap()
            .r_cubic_to(p(0.0, 1.0), p(1.0, 1.0), p(1.0, 0.0))
            .unwrap();
        let path = b.build();
        assert_eq!(
            path.segments(),
            &[
                PathSegment::MoveTo(p(5.0, 5.0)),
                PathSegment::LineTo(p(15.0, 5.0)),
                PathSegment::QuadTo(p(20.0, 10.0), p(15.0, 15.0)),
                PathSegment::CubicTo(p(15.0, 16.0), p(16.0, 16.0), p(16.0, 15.0)),
            ]
        );
    }

    #[test]
    fn test_r_move_to_after_close_uses_subpath_start() {
        let mut b = PathBuilder::new();
        b.move_to(p(1.0, 1.0)).line_to(p(5.0, 1.0)).unwrap();
        b.close().unwrap();
        b.r_move_to(p(1.0, 0.0));
        assert_eq!(b.last_point(), Some(p(2.0, 1.0)));
    }

    #[test]
    fn test_add_rect_directions() {
        let rect = Rect::new(0.0, 0.0, 10.0, 5.0);
        let mut b = PathBuilder::new();
        b.add_rect(rect, Direction::Clockwise);
        let cw = b.build();
        assert_eq!(
            cw.segments(),
            &[
                PathSegment::MoveTo(p(0.0, 0.0)),
                PathSegment::LineTo(p(10.0, 0.0)),
                PathSegment::LineTo(p(10.0, 5.0)),
                PathSegment::LineTo(p(0.0, 5.0)),
                PathSegment::Close,
            ]
        );

        b.add_rect(rect, Direction::CounterClockwise);
        let ccw = b.build();
        assert_eq!(
            ccw.segments(),
            &[
                PathSegment::MoveTo(p(0.0, 5.0)),
                PathSegment::LineTo(p(10.0, 5.0)),
                PathSegment::LineTo(p(10.0, 0.0)),
                PathSegment::LineTo(p(0.0, 0.0)),
                PathSegment::Close,
            ]
        );
        assert_eq!(cw.bounds(), ccw.bounds());
    }

    #[test]
    fn test_shapes_leave_subpath_closed() {
        let mut b = PathBuilder::new();
        b.add_circle(p(0.0, 0.0), 5.0, Direction::Clockwise);
        assert!(b.line_to(p(1.0, 1.0)).is_err());

        let path = b.build();
        assert_eq!(path.len(), 6);
        let bounds = path.tight_bounds();
        assert!((bounds.width() - 10.0).abs() < 1e-4);
        assert!((bounds.left() + 5.0).abs() < 1e-4);
        assert!(path.contains(p(0.0, 0.0)));
        assert!(!path.contains(p(4.0, 4.0)));
    }

    #[test]
    fn test_round_rect() {
        let mut b = PathBuilder::new();
        b.add_round_rect(
            RoundRect::new(Rect::new(0.0, 0.0, 20.0, 10.0), 2.0),
            Direction::Clockwise,
        );
        let path = b.build();
        assert_eq!(path.segments()[0], PathSegment::MoveTo(p(2.0, 0.0)));
        assert_eq!(path.subpath_count(), 1);
        assert!((path.tight_bounds().height() - 10.0).abs() < 1e-4);
        assert!(!path.contains(p(0.1, 0.1)));
        assert!(path.contains(p(1.0, 5.0)));

        // Zero radii fall back to a plain rectangle.
        b.add_round_rect(RoundRect::new(Rect::new(0.0, 0.0, 20.0, 10.0), 0.0), Direction::Clockwise);
        assert_eq!(b.build().len(), 5);
    }

    #[test]
    fn test_add_poly() {
        let mut b = PathBuilder::new();
        b.add_poly(&[], true);
        assert!(b.is_empty());

        b.add_poly(&[p(0.0, 0.0), p(4.0, 0.0), p(4.0, 4.0)], true);
        let path = b.build();
        assert_eq!(path.len(), 4);
        assert_eq!(path.segments()[3], PathSegment::Close);
    }

    #[test]
    fn test_add_arc_quarter() {
        let mut b = PathBuilder::new();
        b.add_arc(Rect::new(-10.0, -10.0, 20.0, 20.0), 0.0, 90.0);
        let path = b.build();
        assert_eq!(path.len(), 2);
        let start = path.segments()[0].end_point().unwrap();
        let end = path.last_point().unwrap();
        assert!((start.x - 10.0).abs() < 1e-4 && start.y.abs() < 1e-4);
        assert!(end.x.abs() < 1e-4 && (end.y - 10.0).abs() < 1e-4);

        b.add_arc(Rect::new(0.0, 0.0, 10.0, 10.0), 0.0, 0.0);
        assert!(b.is_empty());

        b.add_arc(Rect::new(0.0, 0.0, 10.0, 10.0), 0.0, -270.0);
        assert_eq!(b.build().len(), 4);
    }

    #[test]
    fn test_add_path_with_transform() {
        let mut b = PathBuilder::new();
        b.add_rect(Rect::new(0.0, 0.0, 1.0, 1.0), Direction::Clockwise);
        let unit = b.build();

        b.add_path(&unit, &Transform2D::scale(10.0));
        let scaled = b.build();
        assert_eq!(scaled.len(), unit.len());
        assert_eq!(scaled.bounds(), Rect::new(0.0, 0.0, 10.0, 10.0));
    }
}
