//! Bodies registered in the collision world
//!
//! A body is a rectangle with an identity. It may carry a velocity (integrated
//! by `World::step`), a static flag, an opaque payload for game code, and a
//! reaction key naming the handler to dispatch when one of its moves is
//! blocked.

use std::fmt;

use serde::{Serialize, Deserialize};

use crate::foundation::math::{is_finite_vec, Point2, Vec2};
use super::rect::{HasRect, Rect};
use super::PhysicsError;

/// Body identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BodyId(pub u64);

impl BodyId {
    /// Get the raw identifier
    pub fn id(&self) -> u64 {
        self.0
    }
}

impl From<u64> for BodyId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl fmt::Display for BodyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A rectangle with identity, optional motion, and game data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Body<P = ()> {
    id: Option<BodyId>,
    rect: Rect,
    previous_rect: Option<Rect>,
    velocity: Option<Vec2>,
    is_static: bool,
    reaction: Option<String>,
    /// Opaque game data; never inspected by the world
    pub payload: P,
}

impl Body<()> {
    /// Start building a body spanning two corners
    pub fn from_corners(x1: f32, y1: f32, x2: f32, y2: f32) -> BodyBuilder<()> {
        BodyBuilder::new(Shape::Corners(Point2::new(x1, y1), Point2::new(x2, y2)))
    }

    /// Start building a body centered at `(x, y)` with the given size
    pub fn from_center(x: f32, y: f32, width: f32, height: f32) -> BodyBuilder<()> {
        BodyBuilder::new(Shape::Centered(Point2::new(x, y), width, height))
    }

    /// Start building a body from an existing rectangle
    pub fn from_rect(rect: Rect) -> BodyBuilder<()> {
        BodyBuilder::new(Shape::Rect(rect))
    }
}

impl<P> Body<P> {
    /// Identity, set once the body is registered or given one explicitly
    pub fn id(&self) -> Option<BodyId> {
        self.id
    }

    /// Current rectangle
    pub fn current_rect(&self) -> &Rect {
        &self.rect
    }

    /// Rectangle before the last resolved move or step, if any
    pub fn previous_rect(&self) -> Option<&Rect> {
        self.previous_rect.as_ref()
    }

    /// Velocity in units per second; `None` means the body is inert
    pub fn velocity(&self) -> Option<Vec2> {
        self.velocity
    }

    /// Whether the body is a fixed obstacle
    pub fn is_static(&self) -> bool {
        self.is_static
    }

    /// Key of the reaction dispatched when a move is blocked
    pub fn reaction(&self) -> Option<&str> {
        self.reaction.as_deref()
    }

    /// Set or clear the velocity
    pub fn set_velocity(&mut self, velocity: Option<Vec2>) -> Result<(), PhysicsError> {
        self.velocity = validate_velocity(velocity)?;
        Ok(())
    }

    /// Set the reaction key
    pub fn set_reaction(&mut self, key: impl Into<String>) {
        self.reaction = Some(key.into());
    }

    /// Remove the reaction key; blocked moves then leave the world untouched
    pub fn clear_reaction(&mut self) {
        self.reaction = None;
    }

    pub(crate) fn assign_id(&mut self, id: BodyId) {
        self.id = Some(id);
    }

    /// Commit a resolved move, remembering where the body came from
    pub(crate) fn commit_move(&mut self, rect: Rect) {
        self.previous_rect = Some(self.rect);
        self.rect = rect;
    }

    /// Mark the current rectangle as the interpolation baseline
    pub(crate) fn settle(&mut self) {
        self.previous_rect = Some(self.rect);
    }
}

impl<P> HasRect for Body<P> {
    fn rect(&self) -> &Rect {
        &self.rect
    }
}

fn validate_velocity(velocity: Option<Vec2>) -> Result<Option<Vec2>, PhysicsError> {
    match velocity {
        Some(v) if !is_finite_vec(&v) => Err(PhysicsError::InvalidInput(format!(
            "velocity must be finite, got ({}, {})",
            v.x, v.y
        ))),
        other => Ok(other),
    }
}

#[derive(Debug, Clone, Copy)]
enum Shape {
    Corners(Point2, Point2),
    Centered(Point2, f32, f32),
    Rect(Rect),
}

/// Builder for [`Body`]
///
/// Coordinates and velocity are validated by [`BodyBuilder::build`].
#[derive(Debug, Clone)]
pub struct BodyBuilder<P> {
    shape: Shape,
    id: Option<BodyId>,
    velocity: Option<Vec2>,
    is_static: bool,
    reaction: Option<String>,
    payload: P,
}

impl BodyBuilder<()> {
    fn new(shape: Shape) -> Self {
        Self {
            shape,
            id: None,
            velocity: None,
            is_static: false,
            reaction: None,
            payload: (),
        }
    }
}

impl<P> BodyBuilder<P> {
    /// Use an explicit identity instead of an allocated one
    pub fn id(mut self, id: impl Into<BodyId>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Make the body a fixed obstacle
    pub fn fixed(mut self) -> Self {
        self.is_static = true;
        self
    }

    /// Initial velocity in units per second
    pub fn velocity(mut self, vx: f32, vy: f32) -> Self {
        self.velocity = Some(Vec2::new(vx, vy));
        self
    }

    /// Reaction dispatched when a move of this body is blocked
    pub fn reaction(mut self, key: impl Into<String>) -> Self {
        self.reaction = Some(key.into());
        self
    }

    /// Attach game data
    pub fn payload<Q>(self, payload: Q) -> BodyBuilder<Q> {
        BodyBuilder {
            shape: self.shape,
            id: self.id,
            velocity: self.velocity,
            is_static: self.is_static,
            reaction: self.reaction,
            payload,
        }
    }

    /// Validate and create the body
    pub fn build(self) -> Result<Body<P>, PhysicsError> {
        let rect = match self.shape {
            Shape::Corners(a, b) => Rect::new(a, b)?,
            Shape::Centered(center, width, height) => Rect::from_center(center, width, height)?,
            Shape::Rect(rect) => rect,
        };

        Ok(Body {
            id: self.id,
            rect,
            previous_rect: None,
            velocity: validate_velocity(self.velocity)?,
            is_static: self.is_static,
            reaction: self.reaction,
            payload: self.payload,
        })
    }
}
