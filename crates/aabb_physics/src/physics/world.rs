//! Collision world: body registry, static geometry, and overlap queries
//!
//! The world is a plain owned value. Cloning it gives an independent
//! snapshot, so a renderer can keep last tick's world while the simulation
//! produces the next one.

use std::collections::BTreeMap;

use log::{debug, trace, warn};

use crate::config::PhysicsConfig;
use crate::foundation::math::Vec2;
use super::body::{Body, BodyId};
use super::rect::{HasRect, Rect};
use super::PhysicsError;

/// Everything a rectangle touched in the world
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollisionReport {
    /// Bodies whose rectangle intersects, in ascending id order
    pub colliding: Vec<BodyId>,
    /// Whether any static rectangle intersects
    pub hit_static: bool,
}

impl CollisionReport {
    /// `true` if anything was hit
    pub fn collided(&self) -> bool {
        self.hit_static || !self.colliding.is_empty()
    }
}

/// Registry of bodies and static geometry
#[derive(Debug, Clone, PartialEq)]
pub struct World<P = ()> {
    bodies: BTreeMap<BodyId, Body<P>>,
    static_geometry: Vec<Rect>,
    // `None` once the id space is used up
    next_id: Option<u64>,
}

impl<P> Default for World<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P> World<P> {
    /// Create an empty world
    pub fn new() -> Self {
        Self::from_config(&PhysicsConfig::default())
    }

    /// Create an empty world whose allocator starts at `config.first_body_id`
    pub fn from_config(config: &PhysicsConfig) -> Self {
        Self {
            bodies: BTreeMap::new(),
            static_geometry: Vec::new(),
            next_id: Some(config.first_body_id),
        }
    }

    // --- Static geometry -------------------------------------------------

    /// Append a static rectangle
    pub fn add_static(&mut self, rect: Rect) {
        self.static_geometry.push(rect);
    }

    /// Append many static rectangles, in order
    pub fn extend_static(&mut self, rects: impl IntoIterator<Item = Rect>) {
        self.static_geometry.extend(rects);
    }

    /// Remove the static rectangle at `index`; later rectangles shift down
    pub fn remove_static(&mut self, index: usize) -> Result<Rect, PhysicsError> {
        let len = self.static_geometry.len();
        if index >= len {
            return Err(PhysicsError::OutOfRange { index, len });
        }
        Ok(self.static_geometry.remove(index))
    }

    /// Number of static rectangles
    pub fn static_count(&self) -> usize {
        self.static_geometry.len()
    }

    /// Static rectangles in insertion order
    pub fn static_geometry(&self) -> &[Rect] {
        &self.static_geometry
    }

    // --- Bodies ----------------------------------------------------------

    /// Register a body and return its identity.
    ///
    /// A body without an id gets the next free allocator id. A body whose
    /// explicit id is already registered replaces the existing one.
    ///
    /// Fails with [`PhysicsError::IdsExhausted`] when a body needs an id
    /// and every id from the allocator's position up to `u64::MAX` has
    /// been handed out or claimed.
    pub fn insert(&mut self, mut body: Body<P>) -> Result<BodyId, PhysicsError> {
        let id = match body.id() {
            Some(id) => id,
            None => self.allocate_id()?,
        };
        body.assign_id(id);

        if self.bodies.insert(id, body).is_some() {
            debug!("Replaced existing body {id}");
        } else {
            trace!("Registered body {id}");
        }
        Ok(id)
    }

    fn allocate_id(&mut self) -> Result<BodyId, PhysicsError> {
        let mut candidate = self.next_id.ok_or(PhysicsError::IdsExhausted)?;
        // Skip ids claimed explicitly by callers
        while self.bodies.contains_key(&BodyId(candidate)) {
            match candidate.checked_add(1) {
                Some(next) => candidate = next,
                None => {
                    self.next_id = None;
                    return Err(PhysicsError::IdsExhausted);
                }
            }
        }
        self.next_id = candidate.checked_add(1);
        if self.next_id.is_none() {
            warn!("Body id allocator reached u64::MAX; no further ids will be allocated");
        }
        Ok(BodyId(candidate))
    }

    /// Remove a body; removing an absent id is a no-op
    pub fn remove(&mut self, id: BodyId) -> Option<Body<P>> {
        let removed = self.bodies.remove(&id);
        if removed.is_some() {
            trace!("Removed body {id}");
        }
        removed
    }

    /// Get a body by id
    pub fn get(&self, id: BodyId) -> Option<&Body<P>> {
        self.bodies.get(&id)
    }

    /// Mutable access to a body's game data
    pub fn payload_mut(&mut self, id: BodyId) -> Option<&mut P> {
        self.bodies.get_mut(&id).map(|body| &mut body.payload)
    }

    /// Check whether a body is registered
    pub fn contains(&self, id: BodyId) -> bool {
        self.bodies.contains_key(&id)
    }

    /// All registered ids, ascending
    pub fn ids(&self) -> Vec<BodyId> {
        self.bodies.keys().copied().collect()
    }

    /// Iterate over registered bodies in ascending id order
    pub fn bodies(&self) -> impl Iterator<Item = &Body<P>> {
        self.bodies.values()
    }

    /// Number of registered bodies
    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    /// `true` if no bodies are registered
    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    /// Persist a body under its id, replacing the stored value
    pub fn replace(&mut self, body: Body<P>) -> Result<(), PhysicsError> {
        let id = body
            .id()
            .ok_or_else(|| PhysicsError::InvalidInput("cannot replace a body without an id".to_string()))?;
        let slot = self.bodies.get_mut(&id).ok_or(PhysicsError::NotFound(id))?;
        *slot = body;
        Ok(())
    }

    /// Set or clear a body's velocity
    pub fn set_velocity(&mut self, id: BodyId, velocity: Option<Vec2>) -> Result<(), PhysicsError> {
        self.bodies
            .get_mut(&id)
            .ok_or(PhysicsError::NotFound(id))?
            .set_velocity(velocity)
    }

    pub(crate) fn body_mut(&mut self, id: BodyId) -> Option<&mut Body<P>> {
        self.bodies.get_mut(&id)
    }

    // --- Queries ---------------------------------------------------------

    /// `true` if both bodies exist and their rectangles intersect
    pub fn bodies_intersect(&self, a: BodyId, b: BodyId) -> bool {
        match (self.bodies.get(&a), self.bodies.get(&b)) {
            (Some(a), Some(b)) => a.rect().intersects(b.rect()),
            _ => false,
        }
    }

    /// Ids of bodies (other than `exclude`) intersecting `shape`, ascending
    pub fn bodies_intersecting<S: HasRect + ?Sized>(&self, shape: &S, exclude: Option<BodyId>) -> Vec<BodyId> {
        let rect = shape.rect();
        self.bodies
            .iter()
            .filter(|(id, body)| Some(**id) != exclude && body.rect().intersects(rect))
            .map(|(id, _)| *id)
            .collect()
    }

    /// Index of the first static rectangle intersecting `shape`
    pub fn first_static_hit<S: HasRect + ?Sized>(&self, shape: &S) -> Option<usize> {
        let rect = shape.rect();
        self.static_geometry.iter().position(|s| s.intersects(rect))
    }

    /// `true` if `shape` intersects any static rectangle or any body other
    /// than `exclude`. Static geometry is checked first.
    pub fn collides<S: HasRect + ?Sized>(&self, shape: &S, exclude: Option<BodyId>) -> bool {
        if self.first_static_hit(shape).is_some() {
            return true;
        }
        let rect = shape.rect();
        self.bodies
            .iter()
            .any(|(id, body)| Some(*id) != exclude && body.rect().intersects(rect))
    }

    /// Full set of what `shape` touches, excluding one body
    pub fn collision_report<S: HasRect + ?Sized>(&self, shape: &S, exclude: Option<BodyId>) -> CollisionReport {
        CollisionReport {
            colliding: self.bodies_intersecting(shape, exclude),
            hit_static: self.first_static_hit(shape).is_some(),
        }
    }
}
