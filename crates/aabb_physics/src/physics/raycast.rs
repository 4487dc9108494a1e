//! Ray queries against the whole world
//!
//! Every static rectangle and body (subject to the filter) is tested with
//! the slab method from [`Rect::intersect_segment`]. Hits are reported as
//! fractions along the segment so callers can compare them without knowing
//! its length.

use bitflags::bitflags;
use log::trace;

use crate::foundation::math::{is_finite_point, Point2};
use super::body::BodyId;
use super::rect::{HasRect, Rect};
use super::world::World;

bitflags! {
    /// Which geometry a ray is tested against
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct RayFilter: u8 {
        /// Static rectangles
        const STATIC = 1 << 0;
        /// Registered bodies
        const BODIES = 1 << 1;
    }
}

/// Raycast options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RaycastOptions {
    /// Geometry to test
    pub filter: RayFilter,
    /// Body to ignore, usually the shooter
    pub exclude: Option<BodyId>,
}

impl Default for RaycastOptions {
    fn default() -> Self {
        Self {
            filter: RayFilter::all(),
            exclude: None,
        }
    }
}

impl RaycastOptions {
    /// Test only the given geometry
    pub fn only(filter: RayFilter) -> Self {
        Self { filter, exclude: None }
    }

    /// Ignore one body
    pub fn excluding(mut self, id: BodyId) -> Self {
        self.exclude = Some(id);
        self
    }
}

/// What a ray hit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HitTag {
    /// Static rectangle at this index
    Static(usize),
    /// Registered body
    Body(BodyId),
}

/// A single ray intersection
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    /// Fraction along `origin -> target`, in `[0, 1]`
    pub t: f32,
    /// Entry point (the origin, for a ray starting inside)
    pub point: Point2,
    /// What was hit
    pub tag: HitTag,
}

impl<P> World<P> {
    /// All intersections of the segment `origin -> target`, nearest first.
    ///
    /// Equal fractions keep static geometry ahead of bodies. Non-finite
    /// endpoints hit nothing.
    pub fn raycast_all(&self, origin: Point2, target: Point2, options: &RaycastOptions) -> Vec<RayHit> {
        if !is_finite_point(&origin) || !is_finite_point(&target) {
            trace!("Ignoring raycast with non-finite endpoints");
            return Vec::new();
        }

        let hit = |rect: &Rect, tag: HitTag| {
            rect.intersect_segment(&origin, &target)
                .map(|(t, point)| RayHit { t, point, tag })
        };

        let mut hits: Vec<RayHit> = Vec::new();
        if options.filter.contains(RayFilter::STATIC) {
            hits.extend(
                self.static_geometry()
                    .iter()
                    .enumerate()
                    .filter_map(|(index, rect)| hit(rect, HitTag::Static(index))),
            );
        }
        if options.filter.contains(RayFilter::BODIES) {
            hits.extend(
                self.bodies()
                    .filter_map(|body| {
                        let id = body.id()?;
                        if Some(id) == options.exclude {
                            return None;
                        }
                        hit(body.rect(), HitTag::Body(id))
                    }),
            );
        }

        hits.sort_by(|a, b| a.t.total_cmp(&b.t));
        hits
    }

    /// Nearest intersection, or `None` on a miss
    pub fn raycast(&self, origin: Point2, target: Point2, options: &RaycastOptions) -> Option<RayHit> {
        self.raycast_all(origin, target, options).into_iter().next()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::Body;
    use approx::assert_relative_eq;

    fn rect(x1: f32, y1: f32, x2: f32, y2: f32) -> Rect {
        Rect::from_bounds(x1, y1, x2, y2).unwrap()
    }

    fn shooting_range() -> (World, BodyId, BodyId) {
        let mut world = World::new();
        world.add_static(rect(40.0, -10.0, 60.0, 10.0));
        world.add_static(rect(0.0, 50.0, 100.0, 60.0));
        let shooter = world.insert(Body::from_corners(-2.0, -2.0, 2.0, 2.0).build().unwrap()).unwrap();
        let target = world.insert(Body::from_corners(20.0, -5.0, 30.0, 5.0).build().unwrap()).unwrap();
        (world, shooter, target)
    }

    #[test]
    fn test_hits_are_sorted_and_in_range() {
        let (world, shooter, target) = shooting_range();
        let hits = world.raycast_all(
            Point2::new(0.0, 0.0),
            Point2::new(100.0, 0.0),
            &RaycastOptions::default(),
        );

        let tags: Vec<HitTag> = hits.iter().map(|h| h.tag).collect();
        assert_eq!(tags, vec![HitTag::Body(shooter), HitTag::Body(target), HitTag::Static(0)]);
        assert!(hits.windows(2).all(|w| w[0].t <= w[1].t));
        assert!(hits.iter().all(|h| (0.0..=1.0).contains(&h.t)));
        assert_relative_eq!(hits[1].t, 0.2);
        assert_relative_eq!(hits[2].point, Point2::new(40.0, 0.0));
    }

    #[test]
    fn test_exclude_and_filter() {
        let (world, shooter, target) = shooting_range();
        let origin = Point2::new(0.0, 0.0);
        let end = Point2::new(100.0, 0.0);

        let nearest = world.raycast(origin, end, &RaycastOptions::default().excluding(shooter));
        assert_eq!(nearest.map(|h| h.tag), Some(HitTag::Body(target)));

        let walls = world.raycast_all(origin, end, &RaycastOptions::only(RayFilter::STATIC));
        assert_eq!(walls.len(), 1);
        assert_eq!(walls[0].tag, HitTag::Static(0));

        let nothing = world.raycast_all(origin, end, &RaycastOptions::only(RayFilter::empty()));
        assert!(nothing.is_empty());
    }

    #[test]
    fn test_miss_returns_none() {
        let (world, _, _) = shooting_range();
        let miss = world.raycast(
            Point2::new(0.0, 30.0),
            Point2::new(100.0, 30.0),
            &RaycastOptions::default(),
        );
        assert!(miss.is_none());
    }

    #[test]
    fn test_vertical_ray() {
        let (world, _, _) = shooting_range();
        let hit = world
            .raycast(
                Point2::new(50.0, 100.0),
                Point2::new(50.0, 0.0),
                &RaycastOptions::only(RayFilter::STATIC),
            )
            .unwrap();
        assert_eq!(hit.tag, HitTag::Static(1));
        assert_relative_eq!(hit.t, 0.4);
        assert_relative_eq!(hit.point, Point2::new(50.0, 60.0));
    }

    #[test]
    fn test_non_finite_ray_hits_nothing() {
        let (world, _, _) = shooting_range();
        let hits = world.raycast_all(
            Point2::new(f32::NAN, 0.0),
            Point2::new(100.0, 0.0),
            &RaycastOptions::default(),
        );
        assert!(hits.is_empty());
    }
}
