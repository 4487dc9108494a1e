//! Axis-aligned rectangle primitive
//!
//! [`Rect`] is the only shape the world knows about. Static geometry is a
//! list of them and every body carries one. Anything that can hand out a
//! rectangle implements [`HasRect`] and can be tested against the world.

use serde::{Serialize, Deserialize};

use crate::foundation::math::{is_finite_point, is_finite_vec, Point2, Vec2};
use super::PhysicsError;

/// Capability of exposing a rectangle for intersection tests
pub trait HasRect {
    /// The rectangle used for collision checks
    fn rect(&self) -> &Rect;
}

/// Axis-aligned bounding box
///
/// Invariants:
/// - `min` components are less than or equal to `max` components.
/// - All coordinates are finite.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "[f32; 4]", into = "[f32; 4]")]
pub struct Rect {
    min: Point2,
    max: Point2,
}

impl Rect {
    /// Create a rectangle spanning two opposite corners.
    ///
    /// The corners may be given in any order; they are sorted per axis.
    /// Non-finite coordinates are rejected.
    pub fn new(a: Point2, b: Point2) -> Result<Self, PhysicsError> {
        if !is_finite_point(&a) || !is_finite_point(&b) {
            return Err(PhysicsError::InvalidInput(format!(
                "rectangle corners must be finite, got ({}, {}) and ({}, {})",
                a.x, a.y, b.x, b.y
            )));
        }
        Ok(Self {
            min: Point2::new(a.x.min(b.x), a.y.min(b.y)),
            max: Point2::new(a.x.max(b.x), a.y.max(b.y)),
        })
    }

    /// Create a rectangle from raw bounds
    pub fn from_bounds(x1: f32, y1: f32, x2: f32, y2: f32) -> Result<Self, PhysicsError> {
        Self::new(Point2::new(x1, y1), Point2::new(x2, y2))
    }

    /// Create a rectangle centered at `center` with the given size
    pub fn from_center(center: Point2, width: f32, height: f32) -> Result<Self, PhysicsError> {
        let half = Vec2::new(width * 0.5, height * 0.5);
        Self::new(center - half, center + half)
    }

    /// Minimum corner
    pub fn min(&self) -> Point2 {
        self.min
    }

    /// Maximum corner
    pub fn max(&self) -> Point2 {
        self.max
    }

    /// Left edge
    pub fn min_x(&self) -> f32 {
        self.min.x
    }

    /// Bottom edge (top in screen coordinates)
    pub fn min_y(&self) -> f32 {
        self.min.y
    }

    /// Right edge
    pub fn max_x(&self) -> f32 {
        self.max.x
    }

    /// Top edge (bottom in screen coordinates)
    pub fn max_y(&self) -> f32 {
        self.max.y
    }

    /// Extent along X
    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    /// Extent along Y
    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    /// Get the center of the rectangle
    pub fn center(&self) -> Point2 {
        nalgebra::center(&self.min, &self.max)
    }

    /// Check if this rectangle contains a point (edges inclusive)
    pub fn contains_point(&self, point: &Point2) -> bool {
        point.x >= self.min.x && point.x <= self.max.x &&
        point.y >= self.min.y && point.y <= self.max.y
    }

    /// Check if this rectangle intersects another.
    ///
    /// Closed intervals on both axes: rectangles sharing only an edge or a
    /// corner intersect.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.min.x <= other.max.x && self.max.x >= other.min.x &&
        self.min.y <= other.max.y && self.max.y >= other.min.y
    }

    /// Grow (or shrink, for a negative margin) by `margin` on every side
    pub fn expand(&self, margin: f32) -> Result<Self, PhysicsError> {
        let delta = Vec2::new(margin, margin);
        Self::new(self.min - delta, self.max + delta)
    }

    /// The same rectangle moved by `delta`
    pub fn translated(&self, delta: &Vec2) -> Result<Self, PhysicsError> {
        if !is_finite_vec(delta) {
            return Err(PhysicsError::InvalidInput(format!(
                "translation must be finite, got ({}, {})",
                delta.x, delta.y
            )));
        }
        Self::new(self.min + delta, self.max + delta)
    }

    /// Intersect the segment `origin -> target` with this rectangle using
    /// the slab method.
    ///
    /// Returns the fraction `t` in `[0, 1]` along the segment where it
    /// enters the box, and the entry point. A segment starting inside the
    /// box reports `t = 0`.
    pub fn intersect_segment(&self, origin: &Point2, target: &Point2) -> Option<(f32, Point2)> {
        let direction = target - origin;

        let (entry_x, exit_x) = slab(origin.x, direction.x, self.min.x, self.max.x)?;
        let (entry_y, exit_y) = slab(origin.y, direction.y, self.min.y, self.max.y)?;

        let entry = entry_x.max(entry_y);
        let exit = exit_x.min(exit_y);

        if entry <= exit && exit >= 0.0 && entry <= 1.0 {
            let t = entry.max(0.0);
            Some((t, origin + direction * t))
        } else {
            None
        }
    }
}

/// Entry/exit fractions of a ray against one axis' slab.
///
/// A ray parallel to the slab is either inside it for its whole length or
/// never touches it.
fn slab(origin: f32, direction: f32, min: f32, max: f32) -> Option<(f32, f32)> {
    if direction == 0.0 {
        if origin >= min && origin <= max {
            Some((f32::NEG_INFINITY, f32::INFINITY))
        } else {
            None
        }
    } else {
        let t1 = (min - origin) / direction;
        let t2 = (max - origin) / direction;
        Some((t1.min(t2), t1.max(t2)))
    }
}

impl HasRect for Rect {
    fn rect(&self) -> &Rect {
        self
    }
}

impl TryFrom<[f32; 4]> for Rect {
    type Error = PhysicsError;

    fn try_from(bounds: [f32; 4]) -> Result<Self, Self::Error> {
        let [x1, y1, x2, y2] = bounds;
        Self::from_bounds(x1, y1, x2, y2)
    }
}

impl From<Rect> for [f32; 4] {
    fn from(rect: Rect) -> Self {
        [rect.min.x, rect.min.y, rect.max.x, rect.max.y]
    }
}
