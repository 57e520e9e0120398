//! 2D transformations and transform stack.
//!
//! This module provides affine transformations for 2D drawing and the
//! save/restore stack that scopes them.

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::error::{CoreError, CoreResult};
use crate::logging::targets;
use crate::types::{Point, Rect};

/// A 2D affine transformation matrix.
///
/// Supports translation, rotation, scaling, and skewing operations.
/// Transforms can be composed together and applied to points and rectangles.
///
/// Stored as a 3x2 matrix in column-major order:
/// ```text
/// | m00 m10 m20 |   | scale_x  skew_x   translate_x |
/// | m01 m11 m21 | = | skew_y   scale_y  translate_y |
/// ```
///
/// # Examples
///
/// ```
/// use vellum_core::{Point, Transform2D};
///
/// let translate = Transform2D::translate(100.0, 50.0);
/// assert_eq!(translate.map_point(Point::ZERO), Point::new(100.0, 50.0));
///
/// // `then` composes right-to-left: the argument applies first.
/// let t = Transform2D::scale(2.0).then(&Transform2D::translate(10.0, 0.0));
/// assert_eq!(t.map_point(Point::new(5.0, 0.0)), Point::new(30.0, 0.0));
///
/// let inverse = t.inverse().unwrap();
/// let back = inverse.map_point(Point::new(30.0, 0.0));
/// assert!((back.x - 5.0).abs() < 1e-4);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform2D {
    /// Matrix elements in column-major order.
    m: [f32; 6],
}

impl Default for Transform2D {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform2D {
    /// The identity transform (no transformation).
    pub const IDENTITY: Self = Self {
        m: [1.0, 0.0, 0.0, 1.0, 0.0, 0.0],
    };

    /// Create a transform from raw matrix elements.
    ///
    /// Elements are in the order: m00, m01, m10, m11, m20, m21
    #[inline]
    pub const fn from_matrix(m00: f32, m01: f32, m10: f32, m11: f32, m20: f32, m21: f32) -> Self {
        Self {
            m: [m00, m01, m10, m11, m20, m21],
        }
    }

    /// Create a transform from the row-major layout used by most canvas
    /// APIs: `scale_x, skew_x, trans_x, skew_y, scale_y, trans_y`.
    #[inline]
    pub const fn from_row(
        scale_x: f32,
        skew_x: f32,
        trans_x: f32,
        skew_y: f32,
        scale_y: f32,
        trans_y: f32,
    ) -> Self {
        Self::from_matrix(scale_x, skew_y, skew_x, scale_y, trans_x, trans_y)
    }

    /// Create a translation transform.
    #[inline]
    pub const fn translate(tx: f32, ty: f32) -> Self {
        Self {
            m: [1.0, 0.0, 0.0, 1.0, tx, ty],
        }
    }

    /// Create a uniform scaling transform.
    #[inline]
    pub const fn scale(s: f32) -> Self {
        Self::scale_xy(s, s)
    }

    /// Create a non-uniform scaling transform.
    #[inline]
    pub const fn scale_xy(sx: f32, sy: f32) -> Self {
        Self {
            m: [sx, 0.0, 0.0, sy, 0.0, 0.0],
        }
    }

    /// Create a rotation transform (angle in radians).
    #[inline]
    pub fn rotate(angle: f32) -> Self {
        let (sin, cos) = angle.sin_cos();
        Self {
            m: [cos, sin, -sin, cos, 0.0, 0.0],
        }
    }

    /// Create a rotation transform (angle in degrees).
    #[inline]
    pub fn rotate_degrees(degrees: f32) -> Self {
        Self::rotate(degrees.to_radians())
    }

    /// Create a rotation transform around a point.
    #[inline]
    pub fn rotate_around(angle: f32, center: Point) -> Self {
        Self::translate(center.x, center.y)
            .then(&Self::rotate(angle))
            .then(&Self::translate(-center.x, -center.y))
    }

    /// Create a skew (shear) transform.
    ///
    /// `kx` and `ky` are raw shear factors: `x' = x + kx * y`,
    /// `y' = ky * x + y`.
    #[inline]
    pub const fn skew(kx: f32, ky: f32) -> Self {
        Self {
            m: [1.0, ky, kx, 1.0, 0.0, 0.0],
        }
    }

    /// Concatenate this transform with another (self * other).
    ///
    /// The resulting transform first applies `other`, then `self`.
    #[inline]
    pub fn then(&self, other: &Self) -> Self {
        let a = &self.m;
        let b = &other.m;
        Self {
            m: [
                a[0] * b[0] + a[2] * b[1],
                a[1] * b[0] + a[3] * b[1],
                a[0] * b[2] + a[2] * b[3],
                a[1] * b[2] + a[3] * b[3],
                a[0] * b[4] + a[2] * b[5] + a[4],
                a[1] * b[4] + a[3] * b[5] + a[5],
            ],
        }
    }

    /// Apply a translation in local space.
    #[inline]
    pub fn translated(&self, tx: f32, ty: f32) -> Self {
        self.then(&Self::translate(tx, ty))
    }

    /// Apply a uniform scale in local space.
    #[inline]
    pub fn scaled(&self, s: f32) -> Self {
        self.then(&Self::scale(s))
    }

    /// Apply a non-uniform scale in local space.
    #[inline]
    pub fn scaled_xy(&self, sx: f32, sy: f32) -> Self {
        self.then(&Self::scale_xy(sx, sy))
    }

    /// Apply a rotation in local space.
    #[inline]
    pub fn rotated(&self, angle: f32) -> Self {
        self.then(&Self::rotate(angle))
    }

    /// Apply a skew in local space.
    #[inline]
    pub fn skewed(&self, kx: f32, ky: f32) -> Self {
        self.then(&Self::skew(kx, ky))
    }

    /// Transform a point.
    #[inline]
    pub fn map_point(&self, p: Point) -> Point {
        Point {
            x: self.m[0] * p.x + self.m[2] * p.y + self.m[4],
            y: self.m[1] * p.x + self.m[3] * p.y + self.m[5],
        }
    }

    /// Transform a vector (ignores translation).
    #[inline]
    pub fn map_vector(&self, v: Point) -> Point {
        Point {
            x: self.m[0] * v.x + self.m[2] * v.y,
            y: self.m[1] * v.x + self.m[3] * v.y,
        }
    }

    /// Transform a rectangle's bounding box.
    ///
    /// Returns the axis-aligned bounding box of the transformed rectangle,
    /// which may be larger than the original if rotation is involved.
    pub fn map_rect(&self, rect: &Rect) -> Rect {
        let corners = [
            self.map_point(rect.top_left()),
            self.map_point(rect.top_right()),
            self.map_point(rect.bottom_left()),
            self.map_point(rect.bottom_right()),
        ];
        Rect::from_points(corners).unwrap_or(Rect::ZERO)
    }

    /// Compute the inverse of this transform, if it exists.
    pub fn inverse(&self) -> Option<Self> {
        let det = self.determinant();
        if det.abs() < 1e-10 {
            return None;
        }

        let inv_det = 1.0 / det;
        Some(Self {
            m: [
                self.m[3] * inv_det,
                -self.m[1] * inv_det,
                -self.m[2] * inv_det,
                self.m[0] * inv_det,
                (self.m[2] * self.m[5] - self.m[3] * self.m[4]) * inv_det,
                (self.m[1] * self.m[4] - self.m[0] * self.m[5]) * inv_det,
            ],
        })
    }

    /// Get the translation component.
    #[inline]
    pub fn translation(&self) -> (f32, f32) {
        (self.m[4], self.m[5])
    }

    /// Get the determinant of the linear part.
    #[inline]
    pub fn determinant(&self) -> f32 {
        self.m[0] * self.m[3] - self.m[1] * self.m[2]
    }

    /// Check if this is the identity transform.
    #[inline]
    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }

    /// Check if this transform only contains translation.
    #[inline]
    pub fn is_translate_only(&self) -> bool {
        self.m[0] == 1.0 && self.m[1] == 0.0 && self.m[2] == 0.0 && self.m[3] == 1.0
    }

    /// Whether axis-aligned rectangles stay axis-aligned (no rotation or skew).
    #[inline]
    pub fn rect_stays_rect(&self) -> bool {
        (self.m[1] == 0.0 && self.m[2] == 0.0) || (self.m[0] == 0.0 && self.m[3] == 0.0)
    }

    /// Approximate uniform scale factor, the square root of the area scale.
    ///
    /// Used to convert device-space tolerances into local space.
    #[inline]
    pub fn approx_scale(&self) -> f32 {
        self.determinant().abs().sqrt()
    }

    /// Whether every element is finite.
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.m.iter().all(|v| v.is_finite())
    }

    /// Get the raw matrix elements.
    #[inline]
    pub fn as_array(&self) -> &[f32; 6] {
        &self.m
    }

    /// Convert to a glam affine transform.
    #[inline]
    pub fn to_affine2(&self) -> glam::Affine2 {
        glam::Affine2::from_cols_array(&self.m)
    }

    /// Create from a glam affine transform.
    #[inline]
    pub fn from_affine2(affine: glam::Affine2) -> Self {
        Self {
            m: affine.to_cols_array(),
        }
    }

    /// Convert to a column-major 3x3 homogeneous matrix.
    #[inline]
    pub fn to_mat3(&self) -> glam::Mat3 {
        glam::Mat3::from(self.to_affine2())
    }
}

impl From<glam::Affine2> for Transform2D {
    fn from(affine: glam::Affine2) -> Self {
        Self::from_affine2(affine)
    }
}

/// A stack of transforms for save/restore functionality.
///
/// The stack always holds a base entry (identity unless changed with
/// [`set`](Self::set)). [`push`](Self::push) duplicates the top entry and
/// [`pop`](Self::pop) discards it; popping the base entry is a
/// [`CoreError::StackUnderflow`].
///
/// Mutating operations right-multiply the top, so they act in the local
/// coordinate frame established by earlier operations.
///
/// # Examples
///
/// ```
/// use vellum_core::{Point, TransformStack};
///
/// let mut stack = TransformStack::new();
/// stack.translate(100.0, 50.0);
///
/// stack.push();
/// stack.scale(2.0);
/// assert_eq!(stack.map_point(Point::new(10.0, 0.0)), Point::new(120.0, 50.0));
///
/// stack.pop().unwrap();
/// assert_eq!(stack.map_point(Point::new(10.0, 0.0)), Point::new(110.0, 50.0));
/// assert!(stack.pop().is_err());
/// ```
#[derive(Debug, Clone)]
pub struct TransformStack {
    /// The saved entries below the top.
    stack: Vec<Transform2D>,
    /// The top entry.
    current: Transform2D,
}

impl Default for TransformStack {
    fn default() -> Self {
        Self::new()
    }
}

impl TransformStack {
    /// Create a new transform stack holding only the identity.
    #[inline]
    pub fn new() -> Self {
        Self::with_base(Transform2D::IDENTITY)
    }

    /// Create a new transform stack whose base entry is `base`.
    #[inline]
    pub fn with_base(base: Transform2D) -> Self {
        Self {
            stack: Vec::new(),
            current: base,
        }
    }

    /// Get the composed top transform.
    #[inline]
    pub fn current(&self) -> Transform2D {
        self.current
    }

    /// Replace the top transform.
    #[inline]
    pub fn set(&mut self, transform: Transform2D) {
        self.current = transform;
    }

    /// Reset the top transform to identity.
    #[inline]
    pub fn reset(&mut self) {
        self.current = Transform2D::IDENTITY;
    }

    /// Duplicate the top transform onto the stack.
    pub fn push(&mut self) {
        self.stack.push(self.current);
        trace!(target: targets::TRANSFORM, depth = self.depth(), "pushed transform");
    }

    /// Discard the top transform, restoring the one below it.
    pub fn pop(&mut self) -> CoreResult<()> {
        let transform = self.stack.pop().ok_or(CoreError::StackUnderflow)?;
        self.current = transform;
        trace!(target: targets::TRANSFORM, depth = self.depth(), "popped transform");
        Ok(())
    }

    /// Alias for [`push`](Self::push).
    #[inline]
    pub fn save(&mut self) {
        self.push();
    }

    /// Alias for [`pop`](Self::pop).
    #[inline]
    pub fn restore(&mut self) -> CoreResult<()> {
        self.pop()
    }

    /// Number of pushes not yet popped.
    #[inline]
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Number of entries on the stack, including the base entry.
    #[inline]
    pub fn save_count(&self) -> usize {
        self.stack.len() + 1
    }

    /// Pop until [`save_count`](Self::save_count) equals `count`.
    ///
    /// Counts below 1 are treated as 1. Counts at or above the current
    /// save count leave the stack unchanged.
    pub fn restore_to_count(&mut self, count: usize) {
        let target = count.max(1) - 1;
        if target < self.stack.len() {
            self.current = self.stack[target];
            self.stack.truncate(target);
            trace!(target: targets::TRANSFORM, depth = self.depth(), "restored transform stack");
        }
    }

    /// Apply a transform on top of the current transform.
    #[inline]
    pub fn concat(&mut self, transform: &Transform2D) {
        self.current = self.current.then(transform);
    }

    /// Apply a translation.
    #[inline]
    pub fn translate(&mut self, tx: f32, ty: f32) {
        self.current = self.current.translated(tx, ty);
    }

    /// Apply a uniform scale.
    #[inline]
    pub fn scale(&mut self, s: f32) {
        self.current = self.current.scaled(s);
    }

    /// Apply a non-uniform scale.
    #[inline]
    pub fn scale_xy(&mut self, sx: f32, sy: f32) {
        self.current = self.current.scaled_xy(sx, sy);
    }

    /// Apply a rotation (radians).
    #[inline]
    pub fn rotate(&mut self, angle: f32) {
        self.current = self.current.rotated(angle);
    }

    /// Apply a rotation (degrees).
    #[inline]
    pub fn rotate_degrees(&mut self, degrees: f32) {
        self.rotate(degrees.to_radians());
    }

    /// Apply a skew.
    #[inline]
    pub fn skew(&mut self, kx: f32, ky: f32) {
        self.current = self.current.skewed(kx, ky);
    }

    /// Transform a point using the current transform.
    #[inline]
    pub fn map_point(&self, p: Point) -> Point {
        self.current.map_point(p)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    const EPSILON: f32 = 1e-5;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < EPSILON
    }

    fn approx_point(a: Point, b: Point) -> bool {
        approx_eq(a.x, b.x) && approx_eq(a.y, b.y)
    }

    #[test]
    fn test_identity() {
        let p = Point::new(5.0, 10.0);
        assert_eq!(Transform2D::IDENTITY.map_point(p), p);
        assert!(Transform2D::default().is_identity());
    }

    #[test]
    fn test_translation() {
        let t = Transform2D::translate(10.0, 20.0);
        assert_eq!(t.map_point(Point::new(5.0, 5.0)), Point::new(15.0, 25.0));
        assert_eq!(t.map_vector(Point::new(5.0, 5.0)), Point::new(5.0, 5.0));
        assert!(t.is_translate_only());
    }

    #[test]
    fn test_scale() {
        let t = Transform2D::scale_xy(2.0, 3.0);
        assert_eq!(t.map_point(Point::new(5.0, 10.0)), Point::new(10.0, 30.0));
    }

    #[test]
    fn test_rotation() {
        let t = Transform2D::rotate(PI / 2.0);
        assert!(approx_point(t.map_point(Point::new(1.0, 0.0)), Point::new(0.0, 1.0)));

        let d = Transform2D::rotate_degrees(90.0);
        assert!(approx_point(d.map_point(Point::new(1.0, 0.0)), Point::new(0.0, 1.0)));
    }

    #[test]
    fn test_rotate_around() {
        let t = Transform2D::rotate_around(PI / 2.0, Point::new(50.0, 50.0));
        let p = t.map_point(Point::new(100.0, 50.0));
        assert!((p.x - 50.0).abs() < 1e-3);
        assert!((p.y - 100.0).abs() < 1e-3);
    }

    #[test]
    fn test_skew() {
        let t = Transform2D::skew(0.5, 0.0);
        assert_eq!(t.map_point(Point::new(0.0, 10.0)), Point::new(5.0, 10.0));
        assert!(!t.rect_stays_rect());
    }

    #[test]
    fn test_from_row_matches_from_matrix() {
        let t = Transform2D::from_row(2.0, 0.5, 10.0, 0.25, 3.0, 20.0);
        assert_eq!(t.map_point(Point::new(1.0, 1.0)), Point::new(12.5, 23.25));
    }

    #[test]
    fn test_concatenation() {
        let combined = Transform2D::scale(2.0).then(&Transform2D::translate(10.0, 0.0));
        assert_eq!(combined.map_point(Point::new(5.0, 0.0)), Point::new(30.0, 0.0));
    }

    #[test]
    fn test_inverse() {
        let t = Transform2D::translate(10.0, 20.0).scaled(2.0).rotated(PI / 4.0);
        let inv = t.inverse().unwrap();
        let p = Point::new(100.0, 50.0);
        let round_trip = t.then(&inv).map_point(p);
        assert!((round_trip.x - p.x).abs() < 1e-3);
        assert!((round_trip.y - p.y).abs() < 1e-3);

        assert!(Transform2D::scale(0.0).inverse().is_none());
    }

    #[test]
    fn test_map_rect() {
        let t = Transform2D::translate(10.0, 10.0);
        let r = Rect::new(0.0, 0.0, 100.0, 50.0);
        assert_eq!(t.map_rect(&r), Rect::new(10.0, 10.0, 100.0, 50.0));

        let rotated = Transform2D::rotate(PI / 2.0).map_rect(&r);
        assert!(approx_eq(rotated.width(), 50.0));
        assert!(approx_eq(rotated.height(), 100.0));
    }

    #[test]
    fn test_glam_round_trip() {
        let t = Transform2D::translate(3.0, 4.0).rotated(0.3).scaled_xy(2.0, 0.5);
        let back = Transform2D::from_affine2(t.to_affine2());
        assert_eq!(t, back);

        let p = Point::new(7.0, -2.0);
        let via_glam = t.to_mat3().transform_point2(p.to_vec2());
        assert!(approx_point(Point::from_vec2(via_glam), t.map_point(p)));
    }

    #[test]
    fn test_transform_stack() {
        let mut stack = TransformStack::new();

        stack.translate(10.0, 20.0);
        stack.push();
        stack.scale(2.0);

        // Scale applies first in local space, then the translation.
        assert_eq!(stack.map_point(Point::new(5.0, 5.0)), Point::new(20.0, 30.0));

        stack.pop().unwrap();
        assert_eq!(stack.map_point(Point::new(5.0, 5.0)), Point::new(15.0, 25.0));
    }

    #[test]
    fn test_pop_base_underflows() {
        let mut stack = TransformStack::new();
        assert!(matches!(stack.pop(), Err(CoreError::StackUnderflow)));
        assert_eq!(stack.depth(), 0);
        assert!(stack.current().is_identity());
    }

    #[test]
    fn test_restore_to_count() {
        let mut stack = TransformStack::new();
        stack.translate(1.0, 0.0);
        stack.push();
        stack.translate(1.0, 0.0);
        stack.push();
        stack.translate(1.0, 0.0);
        stack.push();
        assert_eq!(stack.save_count(), 4);

        stack.restore_to_count(10);
        assert_eq!(stack.save_count(), 4);

        stack.restore_to_count(2);
        assert_eq!(stack.save_count(), 2);
        assert_eq!(stack.current().translation(), (2.0, 0.0));

        stack.restore_to_count(0);
        assert_eq!(stack.save_count(), 1);
        assert_eq!(stack.current().translation(), (1.0, 0.0));
    }

    #[test]
    fn test_set_and_reset_top() {
        let mut stack = TransformStack::new();
        stack.push();
        stack.set(Transform2D::scale(3.0));
        assert_eq!(stack.current(), Transform2D::scale(3.0));
        stack.reset();
        assert!(stack.current().is_identity());
        stack.pop().unwrap();
    }
}
