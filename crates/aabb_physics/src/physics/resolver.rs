//! Move-with-resolution
//!
//! A move computes a candidate rectangle and tests it against the world,
//! ignoring the moving body itself. A clear candidate is committed. A
//! blocked candidate leaves the body where it was and dispatches the body's
//! reaction, which is free to change the world in response.

use log::{debug, trace};

use crate::foundation::math::{is_finite_point, Point2, Vec2};
use super::body::{Body, BodyId};
use super::reaction::{CollisionEvent, Reactions};
use super::rect::{HasRect, Rect};
use super::world::World;
use super::PhysicsError;

/// Result of a move or placement attempt
#[derive(Debug, Clone, PartialEq)]
pub enum MoveOutcome<P = ()> {
    /// The move was committed (or ignored, for a static body)
    Moved(Body<P>),
    /// The move was blocked; the world was not changed by the move itself
    Collided {
        /// The body as it was before the attempt
        body: Body<P>,
        /// What blocked it
        event: CollisionEvent,
    },
}

impl<P> MoveOutcome<P> {
    /// `true` for [`MoveOutcome::Collided`]
    pub fn is_collided(&self) -> bool {
        matches!(self, Self::Collided { .. })
    }

    /// The body carried by either variant
    pub fn body(&self) -> &Body<P> {
        match self {
            Self::Moved(body) | Self::Collided { body, .. } => body,
        }
    }

    /// The collision event, if the move was blocked
    pub fn event(&self) -> Option<&CollisionEvent> {
        match self {
            Self::Moved(_) => None,
            Self::Collided { event, .. } => Some(event),
        }
    }
}

impl<P: Clone> World<P> {
    /// Try to move a body by `delta`.
    ///
    /// Static bodies ignore the request and report `Moved` unchanged. On a
    /// blocked move the body's reaction (if any) is dispatched and the
    /// returned body is the pre-move value; inspect the world for whatever
    /// the reaction did.
    pub fn move_body(
        &mut self,
        id: BodyId,
        delta: Vec2,
        reactions: &Reactions<P>,
    ) -> Result<MoveOutcome<P>, PhysicsError> {
        self.resolve(id, reactions, |current| current.translated(&delta))
    }

    /// Try to place a body centered at `center`.
    ///
    /// `size` defaults to the body's current width and height. Used for
    /// direct position assignment rather than incremental movement.
    pub fn update_to(
        &mut self,
        id: BodyId,
        center: Point2,
        size: Option<(f32, f32)>,
        reactions: &Reactions<P>,
    ) -> Result<MoveOutcome<P>, PhysicsError> {
        if !is_finite_point(&center) {
            return Err(PhysicsError::InvalidInput(format!(
                "placement center must be finite, got ({}, {})",
                center.x, center.y
            )));
        }
        self.resolve(id, reactions, |current| {
            let (width, height) = size.unwrap_or((current.width(), current.height()));
            Rect::from_center(center, width, height)
        })
    }

    fn resolve<F>(
        &mut self,
        id: BodyId,
        reactions: &Reactions<P>,
        candidate: F,
    ) -> Result<MoveOutcome<P>, PhysicsError>
    where
        F: FnOnce(&Rect) -> Result<Rect, PhysicsError>,
    {
        let body = self.get(id).ok_or(PhysicsError::NotFound(id))?;
        if body.is_static() {
            trace!("Ignoring move of static body {id}");
            return Ok(MoveOutcome::Moved(body.clone()));
        }

        let target = candidate(body.rect())?;
        let report = self.collision_report(&target, Some(id));

        if report.collided() {
            let original = body.clone();
            let event = CollisionEvent::from_report(id, report);
            debug!(
                "Body {id} blocked (bodies: {:?}, static: {})",
                event.colliding, event.hit_static
            );
            reactions.dispatch(self, &original, &event)?;
            return Ok(MoveOutcome::Collided { body: original, event });
        }

        let body = self.body_mut(id).ok_or(PhysicsError::NotFound(id))?;
        body.commit_move(target);
        Ok(MoveOutcome::Moved(body.clone()))
    }
}
