//! # AABB Physics
//!
//! Authoritative 2D axis-aligned collision state for a server-side game
//! simulation.
//!
//! ## Features
//!
//! - **Collision World**: Bodies with identity plus an ordered list of static rectangles
//! - **Move or Reject**: Discrete resolution with reactions dispatched on blocked moves
//! - **Stepping**: Variable `step` and a fixed-timestep accumulator
//! - **Interpolation**: Smooth render positions between ticks
//! - **Raycasts**: Slab-method hit tests against the whole world
//!
//! ## Quick Start
//!
//! ```rust
//! use aabb_physics::prelude::*;
//!
//! fn main() -> Result<(), PhysicsError> {
//!     let mut world = World::new();
//!     world.add_static(Rect::from_bounds(20.0, 0.0, 36.0, 100.0)?);
//!
//!     let player = world.insert(Body::from_corners(0.0, 10.0, 16.0, 26.0).velocity(60.0, 0.0).build()?)?;
//!     let reactions = Reactions::new();
//!
//!     world.step(1.0 / 60.0, &reactions)?;
//!     let _render_at = world.interpolated_center(player, 0.5)?;
//!
//!     let hit = world.raycast(Point2::new(0.0, 50.0), Point2::new(100.0, 50.0), &RaycastOptions::default());
//!     assert_eq!(hit.map(|h| h.tag), Some(HitTag::Static(0)));
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod foundation;
pub mod physics;

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        config::{Config, ConfigError, PhysicsConfig},
        foundation::math::{Point2, Vec2},
        physics::{
            Body, BodyId, CollisionEvent, FixedStepper, HasRect, HitTag, MoveOutcome,
            PhysicsError, RayFilter, RayHit, RaycastOptions, Reactions, Rect, StepReport, World,
        },
    };
}
