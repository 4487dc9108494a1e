//! Render-time interpolation between the previous and current step
//!
//! `alpha` is not clamped. Values outside `[0, 1]` extrapolate along the
//! last motion, which renderers use to smooth over late ticks.

use crate::foundation::math::{lerp_point, Point2};
use super::body::BodyId;
use super::rect::{HasRect, Rect};
use super::world::World;
use super::PhysicsError;

impl<P> World<P> {
    /// Rectangle blended between the previous and current rectangle.
    ///
    /// A body that has not moved or stepped yet reports its current
    /// rectangle for any alpha.
    pub fn interpolated_rect(&self, id: BodyId, alpha: f32) -> Result<Rect, PhysicsError> {
        let body = self.get(id).ok_or(PhysicsError::NotFound(id))?;
        let current = body.rect();
        match body.previous_rect() {
            None => Ok(*current),
            Some(previous) => Rect::new(
                lerp_point(&previous.min(), &current.min(), alpha),
                lerp_point(&previous.max(), &current.max(), alpha),
            ),
        }
    }

    /// Interpolated minimum corner
    pub fn interpolated_position(&self, id: BodyId, alpha: f32) -> Result<Point2, PhysicsError> {
        let body = self.get(id).ok_or(PhysicsError::NotFound(id))?;
        let current = body.rect().min();
        Ok(match body.previous_rect() {
            None => current,
            Some(previous) => lerp_point(&previous.min(), &current, alpha),
        })
    }

    /// Interpolated center
    pub fn interpolated_center(&self, id: BodyId, alpha: f32) -> Result<Point2, PhysicsError> {
        let body = self.get(id).ok_or(PhysicsError::NotFound(id))?;
        let current = body.rect().center();
        Ok(match body.previous_rect() {
            None => current,
            Some(previous) => lerp_point(&previous.center(), &current, alpha),
        })
    }
}
