//! Device-space clip state.

use vellum_core::{Rect, Transform2D};
use vellum_path::{Direction, Path, PathBuilder};

/// How a new clip shape combines with the existing clip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ClipOp {
    /// Keep only what is inside both.
    #[default]
    Intersect,
    /// Remove the shape from the existing clip.
    Difference,
}

/// A clip shape in device space.
#[derive(Debug, Clone, PartialEq)]
pub enum ClipShape {
    /// An axis-aligned rectangle.
    Rect(Rect),
    /// Any other shape, including rectangles under rotation or skew.
    Path(Path),
}

impl ClipShape {
    /// Bounds of the shape, or `None` when it covers an unbounded area
    /// (an inverse-filled path).
    pub fn bounds(&self) -> Option<Rect> {
        match self {
            Self::Rect(rect) => Some(*rect),
            Self::Path(path) if path.fill_type().is_inverse() => None,
            Self::Path(path) => Some(path.tight_bounds()),
        }
    }
}

/// One clip operation recorded by the draw context.
#[derive(Debug, Clone, PartialEq)]
pub struct ClipEntry {
    pub shape: ClipShape,
    pub op: ClipOp,
    pub antialias: bool,
}

/// The clip in effect for a draw: every clip operation applied since the
/// session started (or since the enclosing `save`), in device space.
///
/// The state also keeps conservative device bounds: nothing outside them can
/// be drawn, though not everything inside them is necessarily visible.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ClipState {
    entries: Vec<ClipEntry>,
    bounds: Option<Rect>,
    empty: bool,
}

impl ClipState {
    /// A clip that lets everything through.
    pub fn wide_open() -> Self {
        Self::default()
    }

    /// The recorded clip operations, oldest first.
    #[inline]
    pub fn entries(&self) -> &[ClipEntry] {
        &self.entries
    }

    /// Conservative device bounds, or `None` when the clip is unbounded.
    #[inline]
    pub fn bounds(&self) -> Option<Rect> {
        if self.empty { Some(Rect::ZERO) } else { self.bounds }
    }

    /// Whether no clip has been applied.
    #[inline]
    pub fn is_wide_open(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether the clip is known to exclude everything.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.empty
    }

    /// Intersect with or subtract a rectangle given in local coordinates.
    ///
    /// Stays a rectangle when `transform` keeps rectangles axis-aligned.
    pub fn clip_rect(&mut self, rect: Rect, transform: &Transform2D, op: ClipOp, antialias: bool) {
        let shape = if transform.rect_stays_rect() {
            ClipShape::Rect(transform.map_rect(&rect.sorted()))
        } else {
            let mut builder = PathBuilder::new();
            builder.add_rect(rect, Direction::Clockwise);
            ClipShape::Path(builder.build().transformed(transform))
        };
        self.push(ClipEntry {
            shape,
            op,
            antialias,
        });
    }

    /// Intersect with or subtract a path given in local coordinates.
    pub fn clip_path(&mut self, path: &Path, transform: &Transform2D, op: ClipOp, antialias: bool) {
        self.push(ClipEntry {
            shape: ClipShape::Path(path.transformed(transform)),
            op,
            antialias,
        });
    }

    /// Record a device-space clip entry and narrow the bounds.
    pub fn push(&mut self, entry: ClipEntry) {
        if entry.op == ClipOp::Intersect {
            match (entry.shape.bounds(), self.bounds) {
                (Some(shape), Some(current)) => match current.intersect(&shape) {
                    Some(bounds) => self.bounds = Some(bounds),
                    None => self.empty = true,
                },
                (Some(shape), None) => {
                    if shape.is_empty() {
                        self.empty = true;
                    }
                    self.bounds = Some(shape);
                }
                (None, _) => {}
            }
        }
        self.entries.push(entry);
    }

    /// Whether a device-space rectangle is certainly outside the clip.
    ///
    /// May return `false` for rectangles that end up fully clipped.
    pub fn quick_reject(&self, device_rect: &Rect) -> bool {
        if self.empty {
            return true;
        }
        if let Some(bounds) = self.bounds
            && !bounds.overlaps(device_rect)
        {
            return true;
        }
        self.entries.iter().any(|entry| {
            entry.op == ClipOp::Difference
                && matches!(entry.shape, ClipShape::Rect(r) if r.contains_rect(device_rect))
        })
    }
}
