//! Sealed paths and their geometric queries.

use std::fmt::Write as _;

use serde::{Deserialize, Serialize};
use vellum_core::{Point, Rect, Transform2D};

use crate::error::{PathError, PathResult};

/// Commands that make up a path.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PathSegment {
    /// Start a new subpath at a point.
    MoveTo(Point),
    /// Draw a line to a point.
    LineTo(Point),
    /// Draw a quadratic bezier curve: control point, end point.
    QuadTo(Point, Point),
    /// Draw a cubic bezier curve: two control points, end point.
    CubicTo(Point, Point, Point),
    /// Close the current subpath.
    Close,
}

impl PathSegment {
    /// The point this segment ends at, or `None` for [`Close`](Self::Close).
    #[inline]
    pub fn end_point(&self) -> Option<Point> {
        match *self {
            Self::MoveTo(p) | Self::LineTo(p) | Self::QuadTo(_, p) | Self::CubicTo(_, _, p) => {
                Some(p)
            }
            Self::Close => None,
        }
    }

    /// Map every point of the segment through `transform`.
    pub fn transformed(&self, transform: &Transform2D) -> Self {
        let map = |p: Point| transform.map_point(p);
        match *self {
            Self::MoveTo(p) => Self::MoveTo(map(p)),
            Self::LineTo(p) => Self::LineTo(map(p)),
            Self::QuadTo(c, p) => Self::QuadTo(map(c), map(p)),
            Self::CubicTo(c1, c2, p) => Self::CubicTo(map(c1), map(c2), map(p)),
            Self::Close => Self::Close,
        }
    }

    fn for_each_point(&self, mut f: impl FnMut(Point)) {
        match *self {
            Self::MoveTo(p) | Self::LineTo(p) => f(p),
            Self::QuadTo(c, p) => {
                f(c);
                f(p);
            }
            Self::CubicTo(c1, c2, p) => {
                f(c1);
                f(c2);
                f(p);
            }
            Self::Close => {}
        }
    }
}

/// Rule deciding which points are inside a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum FillType {
    /// Inside when the winding number is non-zero.
    #[default]
    Winding,
    /// Inside when the winding number is odd.
    EvenOdd,
    /// Outside when the winding number is non-zero.
    InverseWinding,
    /// Outside when the winding number is odd.
    InverseEvenOdd,
}

impl FillType {
    /// Whether the fill covers the outside of the path.
    #[inline]
    pub fn is_inverse(self) -> bool {
        matches!(self, Self::InverseWinding | Self::InverseEvenOdd)
    }

    /// Whether the even-odd rule applies.
    #[inline]
    pub fn is_even_odd(self) -> bool {
        matches!(self, Self::EvenOdd | Self::InverseEvenOdd)
    }

    /// The same rule with inside and outside swapped.
    pub fn toggle_inverse(self) -> Self {
        match self {
            Self::Winding => Self::InverseWinding,
            Self::EvenOdd => Self::InverseEvenOdd,
            Self::InverseWinding => Self::Winding,
            Self::InverseEvenOdd => Self::EvenOdd,
        }
    }

    fn covers(self, winding: i32) -> bool {
        let inside = if self.is_even_odd() {
            winding % 2 != 0
        } else {
            winding != 0
        };
        inside != self.is_inverse()
    }
}

/// Which kinds of drawing segments a path contains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SegmentMask(u8);

impl SegmentMask {
    pub const LINE: Self = Self(1 << 0);
    pub const QUAD: Self = Self(1 << 1);
    pub const CUBIC: Self = Self(1 << 2);

    /// Whether every bit of `other` is set.
    #[inline]
    pub fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Whether no bit is set.
    #[inline]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub fn bits(self) -> u8 {
        self.0
    }
}

impl std::ops::BitOr for SegmentMask {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl std::ops::BitOrAssign for SegmentMask {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

/// An immutable, validated sequence of path segments.
///
/// Paths are produced by [`PathBuilder::build`](crate::PathBuilder::build),
/// parsed from SVG path data, or checked with [`Path::from_segments`]. Every
/// non-empty path starts with a `MoveTo`, and drawing segments and `Close`
/// only follow an open subpath.
///
/// ```
/// use vellum_core::Point;
/// use vellum_path::{PathBuilder, PathSegment};
///
/// let mut builder = PathBuilder::new();
/// builder
///     .move_to(Point::new(0.0, 0.0))
///     .line_to(Point::new(10.0, 0.0))?
///     .line_to(Point::new(10.0, 10.0))?
///     .close()?;
/// let path = builder.build();
///
/// assert_eq!(path.len(), 4);
/// assert_eq!(path.segments()[3], PathSegment::Close);
/// assert!(path.contains(Point::new(8.0, 2.0)));
/// # Ok::<(), vellum_path::PathError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "RawPath", into = "RawPath")]
pub struct Path {
    segments: Vec<PathSegment>,
    fill_type: FillType,
}

/// Unvalidated serde form of a [`Path`].
#[derive(Serialize, Deserialize)]
struct RawPath {
    segments: Vec<PathSegment>,
    #[serde(default)]
    fill_type: FillType,
}

impl TryFrom<RawPath> for Path {
    type Error = PathError;

    fn try_from(raw: RawPath) -> PathResult<Self> {
        Path::from_segments(raw.segments, raw.fill_type)
    }
}

impl From<Path> for RawPath {
    fn from(path: Path) -> Self {
        Self {
            segments: path.segments,
            fill_type: path.fill_type,
        }
    }
}

impl TryFrom<Vec<PathSegment>> for Path {
    type Error = PathError;

    fn try_from(segments: Vec<PathSegment>) -> PathResult<Self> {
        Path::from_segments(segments, FillType::default())
    }
}

impl Path {
    /// Create an empty path.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a path from raw segments, checking the segment order.
    pub fn from_segments(segments: Vec<PathSegment>, fill_type: FillType) -> PathResult<Self> {
        let mut state = SubpathState::None;
        for segment in &segments {
            state = state.accept(segment)?;
        }
        Ok(Self::from_parts(segments, fill_type))
    }

    /// Wrap segments already known to be well ordered.
    pub(crate) fn from_parts(segments: Vec<PathSegment>, fill_type: FillType) -> Self {
        Self {
            segments,
            fill_type,
        }
    }

    #[inline]
    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// Number of segments, `Close` included.
    #[inline]
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    #[inline]
    pub fn fill_type(&self) -> FillType {
        self.fill_type
    }

    /// A copy of the path with a different fill type.
    pub fn with_fill_type(&self, fill_type: FillType) -> Self {
        Self {
            segments: self.segments.clone(),
            fill_type,
        }
    }

    /// Every point of the path, control points included, in order.
    pub fn points(&self) -> Vec<Point> {
        let mut points = Vec::with_capacity(self.point_count());
        for segment in &self.segments {
            segment.for_each_point(|p| points.push(p));
        }
        points
    }

    /// Number of points, control points included.
    pub fn point_count(&self) -> usize {
        self.segments
            .iter()
            .map(|s| match s {
                PathSegment::MoveTo(_) | PathSegment::LineTo(_) => 1,
                PathSegment::QuadTo(..) => 2,
                PathSegment::CubicTo(..) => 3,
                PathSegment::Close => 0,
            })
            .sum()
    }

    /// The last point of the path, if any.
    pub fn last_point(&self) -> Option<Point> {
        self.segments.iter().rev().find_map(PathSegment::end_point)
    }

    /// Number of subpaths (one per `MoveTo`).
    pub fn subpath_count(&self) -> usize {
        self.segments
            .iter()
            .filter(|s| matches!(s, PathSegment::MoveTo(_)))
            .count()
    }

    /// Which kinds of drawing segments the path contains.
    pub fn segment_mask(&self) -> SegmentMask {
        let mut mask = SegmentMask::default();
        for segment in &self.segments {
            match segment {
                PathSegment::LineTo(_) => mask |= SegmentMask::LINE,
                PathSegment::QuadTo(..) => mask |= SegmentMask::QUAD,
                PathSegment::CubicTo(..) => mask |= SegmentMask::CUBIC,
                PathSegment::MoveTo(_) | PathSegment::Close => {}
            }
        }
        mask
    }

    /// Bounds of every point, control points included.
    ///
    /// Cheap, but may be larger than the curves themselves. Empty paths
    /// return [`Rect::ZERO`].
    pub fn bounds(&self) -> Rect {
        Rect::from_points(self.points()).unwrap_or(Rect::ZERO)
    }

    /// Bounds of the geometry itself, using the extrema of each curve.
    pub fn tight_bounds(&self) -> Rect {
        let mut extrema = Vec::with_capacity(self.point_count());
        let mut last = Point::ZERO;
        for segment in &self.segments {
            match *segment {
                PathSegment::MoveTo(p) | PathSegment::LineTo(p) => extrema.push(p),
                PathSegment::QuadTo(c, p) => {
                    extrema.push(p);
                    for t in quad_extrema(last, c, p) {
                        extrema.push(eval_quad(last, c, p, t));
                    }
                }
                PathSegment::CubicTo(c1, c2, p) => {
                    extrema.push(p);
                    for t in cubic_extrema(last, c1, c2, p) {
                        extrema.push(eval_cubic(last, c1, c2, p, t));
                    }
                }
                PathSegment::Close => {}
            }
            if let Some(p) = segment.end_point() {
                last = p;
            }
        }
        Rect::from_points(extrema).unwrap_or(Rect::ZERO)
    }

    /// Whether `point` is inside the filled area, honoring the fill type.
    ///
    /// Open subpaths are treated as implicitly closed. Curves are flattened
    /// with a fixed tolerance relative to their size.
    pub fn contains(&self, point: Point) -> bool {
        if self.is_empty() {
            return self.fill_type.is_inverse();
        }
        if !self.fill_type.is_inverse() && !self.tight_bounds().inflate(f32::EPSILON).contains(point)
        {
            return false;
        }

        let tolerance = (self.bounds().size.width.max(self.bounds().size.height) / 1000.0)
            .max(1e-3);
        let winding = self
            .flatten(tolerance)
            .iter()
            .map(|contour| contour.winding(point))
            .sum();
        self.fill_type.covers(winding)
    }

    /// A copy of the path with every point mapped through `transform`.
    pub fn transformed(&self, transform: &Transform2D) -> Self {
        if transform.is_identity() {
            return self.clone();
        }
        Self {
            segments: self
                .segments
                .iter()
                .map(|s| s.transformed(transform))
                .collect(),
            fill_type: self.fill_type,
        }
    }

    /// Render the path as SVG path data using absolute commands.
    ///
    /// The fill type is not part of SVG path data and is not written.
    pub fn to_svg(&self) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            if !out.is_empty() {
                out.push(' ');
            }
            // Writing into a String never fails.
            let _ = match *segment {
                PathSegment::MoveTo(p) => write!(out, "M{} {}", p.x, p.y),
                PathSegment::LineTo(p) => write!(out, "L{} {}", p.x, p.y),
                PathSegment::QuadTo(c, p) => write!(out, "Q{} {} {} {}", c.x, c.y, p.x, p.y),
                PathSegment::CubicTo(c1, c2, p) => write!(
                    out,
                    "C{} {} {} {} {} {}",
                    c1.x, c1.y, c2.x, c2.y, p.x, p.y
                ),
                PathSegment::Close => write!(out, "Z"),
            };
        }
        out
    }

    /// Flatten every subpath into a polyline.
    ///
    /// `tolerance` bounds the distance between a curve and its polyline.
    pub fn flatten(&self, tolerance: f32) -> Vec<Contour> {
        let tolerance = tolerance.max(1e-4);
        let mut contours = Vec::new();
        let mut current = Contour::default();
        let mut last = Point::ZERO;

        for segment in &self.segments {
            match *segment {
                PathSegment::MoveTo(p) => {
                    if !current.points.is_empty() {
                        contours.push(std::mem::take(&mut current));
                    }
                    current.points.push(p);
                }
                PathSegment::LineTo(p) => current.points.push(p),
                PathSegment::QuadTo(c, p) => {
                    let dd = (last - c * 2.0 + p).length();
                    let n = pieces(dd / 4.0, tolerance);
                    for i in 1..=n {
                        current.points.push(eval_quad(last, c, p, i as f32 / n as f32));
                    }
                }
                PathSegment::CubicTo(c1, c2, p) => {
                    let dd = (last - c1 * 2.0 + c2)
                        .length()
                        .max((c1 - c2 * 2.0 + p).length());
                    let n = pieces(dd * 0.75, tolerance);
                    for i in 1..=n {
                        current
                            .points
                            .push(eval_cubic(last, c1, c2, p, i as f32 / n as f32));
                    }
                }
                PathSegment::Close => {
                    current.closed = true;
                    contours.push(std::mem::take(&mut current));
                }
            }
            if let Some(p) = segment.end_point() {
                last = p;
            }
        }
        if !current.points.is_empty() {
            contours.push(current);
        }
        contours
    }
}

impl std::str::FromStr for Path {
    type Err = PathError;

    fn from_str(s: &str) -> PathResult<Self> {
        Self::from_svg(s)
    }
}

/// A flattened subpath.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Contour {
    pub points: Vec<Point>,
    /// Whether the subpath ended with `Close`.
    pub closed: bool,
}

impl Contour {
    /// Winding number of the contour around `p`, closing it implicitly.
    fn winding(&self, p: Point) -> i32 {
        let n = self.points.len();
        if n < 2 {
            return 0;
        }
        let mut winding = 0;
        for i in 0..n {
            let a = self.points[i];
            let b = self.points[(i + 1) % n];
            let side = (b.x - a.x) * (p.y - a.y) - (p.x - a.x) * (b.y - a.y);
            if a.y <= p.y {
                if b.y > p.y && side > 0.0 {
                    winding += 1;
                }
            } else if b.y <= p.y && side < 0.0 {
                winding -= 1;
            }
        }
        winding
    }
}

/// Tracks whether a subpath is open, so segments can be checked in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) enum SubpathState {
    /// No `MoveTo` yet.
    #[default]
    None,
    Open,
    Closed,
}

impl SubpathState {
    pub(crate) fn accept(self, segment: &PathSegment) -> PathResult<Self> {
        let op = match segment {
            PathSegment::MoveTo(_) => return Ok(Self::Open),
            PathSegment::LineTo(_) => "line_to",
            PathSegment::QuadTo(..) => "quad_to",
            PathSegment::CubicTo(..) => "cubic_to",
            PathSegment::Close => "close",
        };
        match self {
            Self::Open if *segment == PathSegment::Close => Ok(Self::Closed),
            Self::Open => Ok(Self::Open),
            Self::None => Err(PathError::state(op, "no current subpath, call move_to first")),
            Self::Closed => Err(PathError::state(
                op,
                "the subpath is closed, call move_to to start a new one",
            )),
        }
    }
}

/// Number of line pieces for a curve whose second difference is `dd`.
fn pieces(dd: f32, tolerance: f32) -> usize {
    let n = (dd / tolerance).sqrt().ceil();
    if n.is_finite() { (n as usize).clamp(1, 100) } else { 1 }
}

fn eval_quad(p0: Point, c: Point, p1: Point, t: f32) -> Point {
    let mt = 1.0 - t;
    p0 * (mt * mt) + c * (2.0 * mt * t) + p1 * (t * t)
}

fn eval_cubic(p0: Point, c1: Point, c2: Point, p1: Point, t: f32) -> Point {
    let mt = 1.0 - t;
    p0 * (mt * mt * mt) + c1 * (3.0 * mt * mt * t) + c2 * (3.0 * mt * t * t) + p1 * (t * t * t)
}

/// Parameters in `(0, 1)` where a quadratic has a horizontal or vertical tangent.
fn quad_extrema(p0: Point, c: Point, p1: Point) -> Vec<f32> {
    let mut ts = Vec::with_capacity(2);
    for (a, b, d) in [(p0.x, c.x, p1.x), (p0.y, c.y, p1.y)] {
        let denom = a - 2.0 * b + d;
        if denom != 0.0 {
            let t = (a - b) / denom;
            if t > 0.0 && t < 1.0 {
                ts.push(t);
            }
        }
    }
    ts
}

/// Parameters in `(0, 1)` where a cubic has a horizontal or vertical tangent.
fn cubic_extrema(p0: Point, c1: Point, c2: Point, p1: Point) -> Vec<f32> {
    let mut ts = Vec::with_capacity(4);
    for (a0, a1, a2, a3) in [(p0.x, c1.x, c2.x, p1.x), (p0.y, c1.y, c2.y, p1.y)] {
        let a = -a0 + 3.0 * a1 - 3.0 * a2 + a3;
        let b = 2.0 * (a0 - 2.0 * a1 + a2);
        let c = a1 - a0;
        ts.extend(solve_quadratic(a, b, c).into_iter().filter(|t| *t > 0.0 && *t < 1.0));
    }
    ts
}

fn solve_quadratic(a: f32, b: f32, c: f32) -> Vec<f32> {
    if a.abs() < 1e-12 {
        return if b.abs() < 1e-12 { Vec::new() } else { vec![-c / b] };
    }
    let disc = b * b - 4.0 * a * c;
    if disc < 0.0 {
        return Vec::new();
    }
    let root = disc.sqrt();
    vec![(-b + root) / (2.0 * a), (-b - root) / (2.0 * a)]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Path {
        Path::from_segments(
            vec![
                PathSegment::MoveTo(Point::new(0.0, 0.0)),
                PathSegment::LineTo(Point::new(10.0, 0.0)),
                PathSegment::LineTo(Point::new(10.0, 10.0)),
                PathSegment::LineTo(Point::new(0.0, 10.0)),
                PathSegment::Close,
            ],
            FillType::Winding,
        )
        .unwrap()
    }

    #[test]
    fn test_from_segments_validates_order() {
        let err = Path::try_from(vec![PathSegment::LineTo(Point::ZERO)]).unwrap_err();
        assert!(matches!(err, PathError::InvalidPathState { op: "line_to", .. }));

        let err = Path::try_from(vec![
            PathSegment::MoveTo(Point::ZERO),
            PathSegment::Close,
            PathSegment::Close,
        ])
        .unwrap_err();
        assert!(matches!(err, PathError::InvalidPathState { op: "close", .. }));

        assert!(Path::try_from(vec![]).unwrap().is_empty());
    }

    #[test]
    fn test_queries() {
        let path = square();
        assert_eq!(path.len(), 5);
        assert_eq!(path.point_count(), 4);
        assert_eq!(path.subpath_count(), 1);
        assert_eq!(path.last_point(), Some(Point::new(0.0, 10.0)));
        assert_eq!(path.segment_mask(), SegmentMask::LINE);
        assert_eq!(path.bounds(), Rect::new(0.0, 0.0, 10.0, 10.0));
    }

    #[test]
    fn test_tight_bounds_of_curve() {
        let path = Path::try_from(vec![
            PathSegment::MoveTo(Point::new(0.0, 0.0)),
            PathSegment::QuadTo(Point::new(5.0, 10.0), Point::new(10.0, 0.0)),
        ])
        .unwrap();
        assert_eq!(path.bounds().height(), 10.0);
        let tight = path.tight_bounds();
        assert!((tight.height() - 5.0).abs() < 1e-5);
        assert_eq!(tight.width(), 10.0);
        assert!(path.segment_mask().contains(SegmentMask::QUAD));
    }

    #[test]
    fn test_contains_fill_types() {
        let mut segments = square().segments().to_vec();
        // A second square inside the first, same direction.
        segments.extend([
            PathSegment::MoveTo(Point::new(2.0, 2.0)),
            PathSegment::LineTo(Point::new(8.0, 2.0)),
            PathSegment::LineTo(Point::new(8.0, 8.0)),
            PathSegment::LineTo(Point::new(2.0, 8.0)),
            PathSegment::Close,
        ]);
        let winding = Path::from_segments(segments, FillType::Winding).unwrap();
        let center = Point::new(5.0, 5.0);
        let ring = Point::new(1.0, 5.0);

        assert!(winding.contains(center));
        assert!(winding.contains(ring));
        assert!(!winding.contains(Point::new(20.0, 5.0)));

        let even_odd = winding.with_fill_type(FillType::EvenOdd);
        assert!(!even_odd.contains(center));
        assert!(even_odd.contains(ring));

        let inverse = winding.with_fill_type(FillType::InverseWinding);
        assert!(!inverse.contains(center));
        assert!(inverse.contains(Point::new(20.0, 5.0)));

        assert!(Path::new().with_fill_type(FillType::InverseEvenOdd).contains(center));
        assert!(!Path::new().contains(center));
    }

    #[test]
    fn test_transformed() {
        let moved = square().transformed(&Transform2D::translate(5.0, 5.0));
        assert_eq!(moved.segments()[0], PathSegment::MoveTo(Point::new(5.0, 5.0)));
        assert_eq!(moved.bounds(), Rect::new(5.0, 5.0, 10.0, 10.0));
        assert_eq!(square().transformed(&Transform2D::IDENTITY), square());
    }

    #[test]
    fn test_to_svg() {
        assert_eq!(square().to_svg(), "M0 0 L10 0 L10 10 L0 10 Z");
    }

    #[test]
    fn test_flatten_curve() {
        let path = Path::try_from(vec![
            PathSegment::MoveTo(Point::new(0.0, 0.0)),
            PathSegment::CubicTo(
                Point::new(0.0, 50.0),
                Point::new(100.0, 50.0),
                Point::new(100.0, 0.0),
            ),
        ])
        .unwrap();
        let contours = path.flatten(0.1);
        assert_eq!(contours.len(), 1);
        assert!(!contours[0].closed);
        assert!(contours[0].points.len() > 4);
        assert_eq!(contours[0].points.last(), Some(&Point::new(100.0, 0.0)));
    }

    #[test]
    fn test_fill_type_toggle() {
        assert_eq!(FillType::Winding.toggle_inverse(), FillType::InverseWinding);
        assert!(FillType::InverseEvenOdd.is_even_odd());
        assert!(!FillType::EvenOdd.is_inverse());
    }

    #[test]
    fn test_serde_revalidates() {
        let json = serde_json::to_string(&square()).unwrap();
        let back: Path = serde_json::from_str(&json).unwrap();
        assert_eq!(back, square());

        let bad = r#"{"segments":[{"LineTo":{"x":1.0,"y":1.0}}]}"#;
        assert!(serde_json::from_str::<Path>(bad).is_err());
    }
}
