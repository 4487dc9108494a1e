//! Collision events and the reaction dispatcher
//!
//! Bodies do not store behavior. A body names a reaction by key and the
//! caller registers handlers for those keys in [`Reactions`]. When a move is
//! blocked the resolver builds a [`CollisionEvent`] and dispatches it to the
//! handler for the moving body's key, exactly once per blocked move.
//!
//! Handlers receive the world mutably and may add, remove, or replace any
//! body, including the one that moved. They must not call `move_body`,
//! `update_to`, or `step` themselves.

use std::collections::HashMap;
use std::fmt;

use log::{trace, warn};
use serde::{Serialize, Deserialize};

use super::body::{Body, BodyId};
use super::world::{CollisionReport, World};
use super::PhysicsError;

/// A blocked move
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollisionEvent {
    /// The body that tried to move
    pub body: BodyId,
    /// Other bodies overlapping the rejected rectangle, ascending
    pub colliding: Vec<BodyId>,
    /// Whether static geometry overlapped the rejected rectangle
    pub hit_static: bool,
}

impl CollisionEvent {
    pub(crate) fn from_report(body: BodyId, report: CollisionReport) -> Self {
        Self {
            body,
            colliding: report.colliding,
            hit_static: report.hit_static,
        }
    }
}

/// Handler invoked for a blocked move
pub type Reaction<P> =
    Box<dyn Fn(&mut World<P>, &CollisionEvent) -> Result<(), PhysicsError> + Send + Sync>;

/// Registry of reaction handlers keyed by reaction name
pub struct Reactions<P = ()> {
    handlers: HashMap<String, Reaction<P>>,
}

impl<P> Default for Reactions<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P> fmt::Debug for Reactions<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<&String> = self.handlers.keys().collect();
        keys.sort();
        f.debug_struct("Reactions").field("keys", &keys).finish()
    }
}

impl<P> Reactions<P> {
    /// Create an empty registry
    pub fn new() -> Self {
        Self { handlers: HashMap::new() }
    }

    /// Register a handler, replacing any previous handler for `key`
    pub fn register<F>(&mut self, key: impl Into<String>, handler: F) -> &mut Self
    where
        F: Fn(&mut World<P>, &CollisionEvent) -> Result<(), PhysicsError> + Send + Sync + 'static,
    {
        self.handlers.insert(key.into(), Box::new(handler));
        self
    }

    /// Builder-style [`Reactions::register`]
    pub fn with<F>(mut self, key: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&mut World<P>, &CollisionEvent) -> Result<(), PhysicsError> + Send + Sync + 'static,
    {
        self.register(key, handler);
        self
    }

    /// Remove the handler for `key`
    pub fn unregister(&mut self, key: &str) -> bool {
        self.handlers.remove(key).is_some()
    }

    /// Check whether a handler is registered for `key`
    pub fn contains(&self, key: &str) -> bool {
        self.handlers.contains_key(key)
    }

    /// Number of registered handlers
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// `true` if no handlers are registered
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Run the reaction named by `body` for `event`.
    ///
    /// Returns `Ok(false)` if the body names no reaction or an unregistered
    /// one; the world is left untouched in that case.
    pub fn dispatch(
        &self,
        world: &mut World<P>,
        body: &Body<P>,
        event: &CollisionEvent,
    ) -> Result<bool, PhysicsError> {
        let Some(key) = body.reaction() else {
            return Ok(false);
        };
        let Some(handler) = self.handlers.get(key) else {
            warn!("Body {} names unregistered reaction '{key}'", event.body);
            return Ok(false);
        };

        trace!("Dispatching reaction '{key}' for body {}", event.body);
        handler(world, event)?;
        Ok(true)
    }
}
