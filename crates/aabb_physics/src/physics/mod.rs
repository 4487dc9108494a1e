//! Physics module for 2D AABB collision
//!
//! Provides the collision world (bodies plus static geometry), discrete
//! move-or-reject resolution with pluggable reactions, time stepping,
//! render interpolation, and raycasts.

pub mod body;
pub mod error;
pub mod interpolation;
pub mod raycast;
pub mod reaction;
pub mod rect;
pub mod resolver;
pub mod step;
pub mod world;

pub use body::{Body, BodyBuilder, BodyId};
pub use error::PhysicsError;
pub use raycast::{HitTag, RayFilter, RayHit, RaycastOptions};
pub use reaction::{CollisionEvent, Reaction, Reactions};
pub use rect::{HasRect, Rect};
pub use resolver::MoveOutcome;
pub use step::{FixedStepper, StepReport};
pub use world::{CollisionReport, World};
