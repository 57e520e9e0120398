//! Path tessellation using lyon.
//!
//! Renderer sinks that draw with triangles can turn a device-space path into
//! vertex and index buffers with [`tessellate_fill`] and
//! [`tessellate_stroke`]. Nothing in Vellum itself rasterizes.

use lyon::math::point as lyon_point;
use lyon::path::Path as LyonPath;
use lyon::path::builder::SvgPathBuilder;
use lyon::tessellation::{
    BuffersBuilder, FillOptions, FillRule as LyonFillRule, FillTessellator, FillVertex,
    FillVertexConstructor, LineCap as LyonLineCap, LineJoin as LyonLineJoin, StrokeOptions,
    StrokeTessellator, StrokeVertex, StrokeVertexConstructor, VertexBuffers,
};
use tracing::{trace, warn};
use vellum_core::Point;
use vellum_core::logging::targets;
use vellum_paint::{DashEffect, Paint, StrokeCap, StrokeJoin};

use crate::path::{Contour, FillType, Path, PathSegment};

/// Default tessellation tolerance.
///
/// Smaller values produce more accurate curves but more vertices.
pub const DEFAULT_TOLERANCE: f32 = 0.1;

/// Triangulated path output.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TessellatedPath {
    /// Vertex positions.
    pub vertices: Vec<Point>,
    /// Triangle indices into `vertices`.
    pub indices: Vec<u32>,
}

impl TessellatedPath {
    /// Create a new empty tessellated path.
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if the tessellation produced no triangles.
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Number of triangles.
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// The vertex buffer as raw bytes, two `f32`s per vertex.
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }
}

/// Convert a path to lyon's path format.
pub fn to_lyon_path(path: &Path) -> LyonPath {
    let mut builder = LyonPath::svg_builder();

    for segment in path.segments() {
        match *segment {
            PathSegment::MoveTo(p) => {
                builder.move_to(lyon_point(p.x, p.y));
            }
            PathSegment::LineTo(p) => {
                builder.line_to(lyon_point(p.x, p.y));
            }
            PathSegment::QuadTo(c, p) => {
                builder.quadratic_bezier_to(lyon_point(c.x, c.y), lyon_point(p.x, p.y));
            }
            PathSegment::CubicTo(c1, c2, p) => {
                builder.cubic_bezier_to(
                    lyon_point(c1.x, c1.y),
                    lyon_point(c2.x, c2.y),
                    lyon_point(p.x, p.y),
                );
            }
            PathSegment::Close => {
                builder.close();
            }
        }
    }

    builder.build()
}

/// Build a lyon path of open polylines.
fn polylines_to_lyon(contours: &[Contour]) -> LyonPath {
    let mut builder = LyonPath::svg_builder();
    for contour in contours {
        let Some((first, rest)) = contour.points.split_first() else {
            continue;
        };
        builder.move_to(lyon_point(first.x, first.y));
        for p in rest {
            builder.line_to(lyon_point(p.x, p.y));
        }
        if contour.closed {
            builder.close();
        }
    }
    builder.build()
}

fn to_lyon_fill_rule(fill_type: FillType) -> LyonFillRule {
    if fill_type.is_even_odd() {
        LyonFillRule::EvenOdd
    } else {
        LyonFillRule::NonZero
    }
}

fn to_lyon_line_cap(cap: StrokeCap) -> LyonLineCap {
    match cap {
        StrokeCap::Butt => LyonLineCap::Butt,
        StrokeCap::Round => LyonLineCap::Round,
        StrokeCap::Square => LyonLineCap::Square,
    }
}

fn to_lyon_line_join(join: StrokeJoin) -> LyonLineJoin {
    match join {
        StrokeJoin::Miter => LyonLineJoin::Miter,
        StrokeJoin::Round => LyonLineJoin::Round,
        StrokeJoin::Bevel => LyonLineJoin::Bevel,
    }
}

struct FillVertexCtor;

impl FillVertexConstructor<Point> for FillVertexCtor {
    fn new_vertex(&mut self, vertex: FillVertex) -> Point {
        Point::new(vertex.position().x, vertex.position().y)
    }
}

struct StrokeVertexCtor;

impl StrokeVertexConstructor<Point> for StrokeVertexCtor {
    fn new_vertex(&mut self, vertex: StrokeVertex) -> Point {
        Point::new(vertex.position().x, vertex.position().y)
    }
}

/// Tessellate the interior of a path.
///
/// The path's fill type selects the non-zero or even-odd rule. Inverse fill
/// types tessellate the same interior; covering the outside is left to the
/// renderer. Tessellation failures are logged and yield an empty result.
pub fn tessellate_fill(path: &Path, tolerance: f32) -> TessellatedPath {
    if path.is_empty() {
        return TessellatedPath::new();
    }

    let lyon_path = to_lyon_path(path);

    let mut buffers: VertexBuffers<Point, u32> = VertexBuffers::new();
    let mut tessellator = FillTessellator::new();

    let options = FillOptions::default()
        .with_fill_rule(to_lyon_fill_rule(path.fill_type()))
        .with_tolerance(tolerance);

    let result = tessellator.tessellate_path(
        &lyon_path,
        &options,
        &mut BuffersBuilder::new(&mut buffers, FillVertexCtor),
    );

    if let Err(err) = result {
        warn!(target: targets::TESSELLATE, error = ?err, "fill tessellation failed");
        return TessellatedPath::new();
    }

    trace!(
        target: targets::TESSELLATE,
        vertices = buffers.vertices.len(),
        indices = buffers.indices.len(),
        "tessellated fill"
    );
    TessellatedPath {
        vertices: buffers.vertices,
        indices: buffers.indices,
    }
}

/// Tessellate the outline of a path using the paint's stroke parameters.
///
/// Width, cap, join and miter limit come from `paint`; a hairline is
/// tessellated one unit wide. A dash effect on the paint is applied before
/// tessellating.
pub fn tessellate_stroke(path: &Path, paint: &Paint, tolerance: f32) -> TessellatedPath {
    if path.is_empty() {
        return TessellatedPath::new();
    }

    let lyon_path = match paint.dash() {
        Some(dash) => polylines_to_lyon(&apply_dash(&path.flatten(tolerance), dash)),
        None => to_lyon_path(path),
    };

    let width = if paint.is_hairline() {
        1.0
    } else {
        paint.stroke_width()
    };

    let mut buffers: VertexBuffers<Point, u32> = VertexBuffers::new();
    let mut tessellator = StrokeTessellator::new();

    let options = StrokeOptions::default()
        .with_line_width(width)
        .with_line_cap(to_lyon_line_cap(paint.stroke_cap()))
        .with_line_join(to_lyon_line_join(paint.stroke_join()))
        .with_miter_limit(paint.stroke_miter().max(StrokeOptions::MINIMUM_MITER_LIMIT))
        .with_tolerance(tolerance);

    let result = tessellator.tessellate_path(
        &lyon_path,
        &options,
        &mut BuffersBuilder::new(&mut buffers, StrokeVertexCtor),
    );

    if let Err(err) = result {
        warn!(target: targets::TESSELLATE, error = ?err, "stroke tessellation failed");
        return TessellatedPath::new();
    }

    trace!(
        target: targets::TESSELLATE,
        vertices = buffers.vertices.len(),
        indices = buffers.indices.len(),
        dashed = paint.dash().is_some(),
        "tessellated stroke"
    );
    TessellatedPath {
        vertices: buffers.vertices,
        indices: buffers.indices,
    }
}

/// Most dashes a single stroke may be cut into. Denser patterns are stroked
/// solid.
const MAX_DASH_COUNT: f32 = 1_000_000.0;

/// Cut flattened contours into the "on" runs of a dash pattern.
///
/// The pattern restarts at the phase for every contour. A degenerate
/// pattern (no intervals, a negative or non-finite interval, a zero period)
/// or one that would produce more than [`MAX_DASH_COUNT`] dashes leaves the
/// contours undashed.
fn apply_dash(contours: &[Contour], dash: &DashEffect) -> Vec<Contour> {
    let intervals = dash.intervals();
    let period = dash.pattern_length();
    if intervals.len() < 2
        || !(period.is_finite() && period > 0.0)
        || intervals.iter().any(|v| !(v.is_finite() && *v >= 0.0))
    {
        warn!(target: targets::TESSELLATE, period, "ignoring degenerate dash pattern");
        return contours.to_vec();
    }

    let total: f32 = contours.iter().map(contour_length).sum();
    let estimate = total / period * intervals.len() as f32;
    if !(estimate <= MAX_DASH_COUNT) {
        warn!(
            target: targets::TESSELLATE,
            estimate,
            limit = MAX_DASH_COUNT,
            "dash pattern too dense, stroking solid"
        );
        return contours.to_vec();
    }

    let mut dashes = Vec::new();

    for contour in contours {
        let mut points = contour.points.clone();
        if contour.closed
            && let Some(&first) = points.first()
        {
            points.push(first);
        }

        // Locate the phase within the pattern.
        let mut index = 0;
        let mut remaining = intervals[0];
        let mut offset = dash.phase().rem_euclid(period);
        while offset > 0.0 {
            if offset < remaining {
                remaining -= offset;
                offset = 0.0;
            } else {
                offset -= remaining;
                index = (index + 1) % intervals.len();
                remaining = intervals[index];
            }
        }

        let mut current = Contour::default();
        if index % 2 == 0
            && let Some(&first) = points.first()
        {
            current.points.push(first);
        }

        for pair in points.windows(2) {
            let (mut a, b) = (pair[0], pair[1]);
            let mut length = a.distance(b);
            while length > 0.0 {
                let step = remaining.min(length);
                let next = a.lerp(b, step / length);
                if index % 2 == 0 {
                    current.points.push(next);
                }
                length -= step;
                remaining -= step;
                a = next;
                if remaining <= 0.0 {
                    if index % 2 == 0 && current.points.len() > 1 {
                        dashes.push(std::mem::take(&mut current));
                    }
                    current.points.clear();
                    index = (index + 1) % intervals.len();
                    remaining = intervals[index];
                    if index % 2 == 0 {
                        current.points.push(a);
                    }
                }
            }
        }

        if index % 2 == 0 && current.points.len() > 1 {
            dashes.push(current);
        }
    }

    dashes
}

/// Length of a flattened contour, including the closing edge.
fn contour_length(contour: &Contour) -> f32 {
    let open: f32 = contour
        .points
        .windows(2)
        .map(|pair| pair[0].distance(pair[1]))
        .sum();
    match (contour.closed, contour.points.first(), contour.points.last()) {
        (true, Some(&first), Some(&last)) => open + last.distance(first),
        _ => open,
    }
}
