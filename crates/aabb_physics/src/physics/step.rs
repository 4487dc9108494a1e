//! Time integration
//!
//! [`World::step`] advances every moving body by one time slice.
//! [`FixedStepper`] sits on top of it and converts variable frame times into
//! whole fixed slices plus an interpolation alpha for rendering.

use log::{debug, trace, warn};

use crate::config::PhysicsConfig;
use crate::foundation::math::{is_finite_vec, Vec2};
use super::body::BodyId;
use super::reaction::Reactions;
use super::world::World;
use super::PhysicsError;

fn validate_dt(dt: f32) -> Result<(), PhysicsError> {
    if !dt.is_finite() {
        return Err(PhysicsError::InvalidInput(format!("time step must be finite, got {dt}")));
    }
    if dt < 0.0 {
        return Err(PhysicsError::NegativeTimeStep(dt));
    }
    Ok(())
}

impl<P: Clone> World<P> {
    /// Advance every body by `dt` seconds.
    ///
    /// Each body's motion (velocity and static flag) is captured when the
    /// call starts, and every captured body is visited once in ascending id
    /// order. A visited body first gets its previous rectangle set to its
    /// current one. A body that was captured with a velocity and not static
    /// is then moved by `velocity * dt` through [`World::move_body`], so a
    /// blocked move dispatches its reaction.
    ///
    /// A reaction that changes a later body's velocity takes effect from the
    /// next step; a body made static by a reaction stays put. Bodies removed
    /// by a reaction before their turn are skipped; bodies added by a
    /// reaction wait for the next step.
    ///
    /// A displacement that overflows to infinity fails the whole call with
    /// [`PhysicsError::InvalidInput`] before any body is touched.
    pub fn step(&mut self, dt: f32, reactions: &Reactions<P>) -> Result<(), PhysicsError> {
        validate_dt(dt)?;

        let snapshot = self.motion_snapshot(dt)?;
        trace!("Stepping {} bodies by {dt}s", snapshot.len());

        for (id, delta) in snapshot {
            let Some(body) = self.body_mut(id) else {
                trace!("Body {id} removed earlier in this step");
                continue;
            };
            body.settle();

            let Some(delta) = delta else {
                continue;
            };

            match self.move_body(id, delta, reactions) {
                Ok(_) | Err(PhysicsError::NotFound(_)) => {}
                Err(e) => return Err(e),
            }
        }
        Ok(())
    }

    /// Every body id paired with the displacement it gets this step, if any
    fn motion_snapshot(&self, dt: f32) -> Result<Vec<(BodyId, Option<Vec2>)>, PhysicsError> {
        self.ids()
            .into_iter()
            .zip(self.bodies())
            .map(|(id, body)| {
                let delta = match body.velocity() {
                    Some(velocity) if !body.is_static() => {
                        let delta = velocity * dt;
                        if !is_finite_vec(&delta) {
                            return Err(PhysicsError::InvalidInput(format!(
                                "displacement of body {id} overflows: ({}, {})",
                                delta.x, delta.y
                            )));
                        }
                        Some(delta)
                    }
                    _ => None,
                };
                Ok((id, delta))
            })
            .collect()
    }
}

/// Summary of one [`FixedStepper::advance`] call
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepReport {
    /// Fixed steps run
    pub steps: u32,
    /// Progress into the next step, for interpolation
    pub alpha: f32,
    /// Seconds discarded because the substep cap was reached
    pub dropped: f32,
}

/// Fixed-timestep accumulator
#[derive(Debug, Clone, PartialEq)]
pub struct FixedStepper {
    fixed_timestep: f32,
    max_substeps: u32,
    accumulator: f32,
}

impl FixedStepper {
    /// Create a stepper running `fixed_timestep` slices, at most
    /// `max_substeps` per advance
    pub fn new(fixed_timestep: f32, max_substeps: u32) -> Result<Self, PhysicsError> {
        validate_dt(fixed_timestep)?;
        if fixed_timestep == 0.0 {
            return Err(PhysicsError::InvalidInput("fixed time step must be positive".to_string()));
        }
        if max_substeps == 0 {
            return Err(PhysicsError::InvalidInput("max_substeps must be at least 1".to_string()));
        }
        Ok(Self {
            fixed_timestep,
            max_substeps,
            accumulator: 0.0,
        })
    }

    /// Create a stepper from configuration
    pub fn from_config(config: &PhysicsConfig) -> Result<Self, PhysicsError> {
        Self::new(config.fixed_timestep, config.max_substeps)
    }

    /// Length of one step in seconds
    pub fn fixed_timestep(&self) -> f32 {
        self.fixed_timestep
    }

    /// Current interpolation alpha in `[0, 1)`
    pub fn alpha(&self) -> f32 {
        self.accumulator / self.fixed_timestep
    }

    /// Add `frame_dt` seconds of wall-clock time and run as many whole
    /// steps as fit, up to the substep cap
    pub fn advance<P: Clone>(
        &mut self,
        world: &mut World<P>,
        frame_dt: f32,
        reactions: &Reactions<P>,
    ) -> Result<StepReport, PhysicsError> {
        validate_dt(frame_dt)?;
        self.accumulator += frame_dt;

        let mut steps = 0;
        while self.accumulator >= self.fixed_timestep && steps < self.max_substeps {
            world.step(self.fixed_timestep, reactions)?;
            self.accumulator -= self.fixed_timestep;
            steps += 1;
        }

        let mut dropped = 0.0;
        if self.accumulator >= self.fixed_timestep {
            // Falling behind; keep only the partial step so we don't spiral
            let remainder = self.accumulator % self.fixed_timestep;
            dropped = self.accumulator - remainder;
            self.accumulator = remainder;
            warn!("Substep cap of {} reached, dropped {dropped:.4}s", self.max_substeps);
        }

        debug!("Advanced {steps} steps, alpha {:.3}", self.alpha());
        Ok(StepReport { steps, alpha: self.alpha(), dropped })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::{Body, CollisionEvent, Rect};
    use crate::physics::rect::HasRect;
    use approx::assert_relative_eq;

    fn rect(x1: f32, y1: f32, x2: f32, y2: f32) -> Rect {
        Rect::from_bounds(x1, y1, x2, y2).unwrap()
    }

    #[test]
    fn test_step_moves_by_velocity() {
        let mut world = World::new();
        let id = world.insert(Body::from_corners(0.0, 0.0, 10.0, 10.0).velocity(10.0, -4.0).build().unwrap()).unwrap();

        world.step(0.5, &Reactions::new()).unwrap();

        let body = world.get(id).unwrap();
        assert_eq!(*body.rect(), rect(5.0, -2.0, 15.0, 8.0));
        assert_eq!(body.previous_rect(), Some(&rect(0.0, 0.0, 10.0, 10.0)));
    }

    #[test]
    fn test_zero_dt_only_settles() {
        let mut world = World::new();
        let moving = world.insert(Body::from_corners(0.0, 0.0, 10.0, 10.0).velocity(10.0, 0.0).build().unwrap()).unwrap();
        let inert = world.insert(Body::from_corners(20.0, 0.0, 30.0, 10.0).build().unwrap()).unwrap();
        let wall = world.insert(Body::from_corners(50.0, 0.0, 60.0, 10.0).fixed().velocity(5.0, 0.0).build().unwrap()).unwrap();

        world.step(0.0, &Reactions::new()).unwrap();

        for id in [moving, inert, wall] {
            let body = world.get(id).unwrap();
            assert_eq!(body.previous_rect(), Some(body.rect()));
        }
        assert_eq!(*world.get(moving).unwrap().rect(), rect(0.0, 0.0, 10.0, 10.0));
        assert_eq!(*world.get(wall).unwrap().rect(), rect(50.0, 0.0, 60.0, 10.0));
    }

    #[test]
    fn test_step_rejects_bad_dt() {
        let mut world: World = World::new();
        assert_eq!(
            world.step(-0.1, &Reactions::new()),
            Err(PhysicsError::NegativeTimeStep(-0.1))
        );
        assert!(matches!(
            world.step(f32::NAN, &Reactions::new()),
            Err(PhysicsError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_blocked_body_stays_and_settles() {
        let mut world = World::new();
        world.add_static(rect(12.0, 0.0, 20.0, 10.0));
        let id = world.insert(Body::from_corners(0.0, 0.0, 10.0, 10.0).velocity(10.0, 0.0).build().unwrap()).unwrap();

        world.step(1.0, &Reactions::new()).unwrap();

        let body = world.get(id).unwrap();
        assert_eq!(*body.rect(), rect(0.0, 0.0, 10.0, 10.0));
        assert_eq!(body.previous_rect(), Some(&rect(0.0, 0.0, 10.0, 10.0)));
    }

    #[test]
    fn test_reaction_removing_later_body_is_skipped() {
        let mut world = World::new();
        // Body 1 moves into body 2; its reaction deletes both. Body 2 also
        // has a velocity but must not be processed afterwards.
        let bullet = world.insert(
            Body::from_corners(0.0, 0.0, 4.0, 4.0).velocity(10.0, 0.0).reaction("bullet").build().unwrap(),
        ).unwrap();
        let target = world.insert(
            Body::from_corners(8.0, 0.0, 16.0, 8.0).velocity(0.0, 5.0).build().unwrap(),
        ).unwrap();
        let bystander = world.insert(
            Body::from_corners(100.0, 0.0, 104.0, 4.0).velocity(1.0, 0.0).build().unwrap(),
        ).unwrap();

        let reactions = Reactions::new().with("bullet", |world: &mut World, event: &CollisionEvent| {
            for hit in &event.colliding {
                world.remove(*hit);
            }
            world.remove(event.body);
            Ok(())
        });

        world.step(1.0, &reactions).unwrap();

        assert!(!world.contains(bullet));
        assert!(!world.contains(target));
        assert_eq!(*world.get(bystander).unwrap().rect(), rect(101.0, 0.0, 105.0, 4.0));
    }

    #[test]
    fn test_reaction_error_aborts_step() {
        let mut world = World::new();
        world.add_static(rect(5.0, 0.0, 6.0, 10.0));
        let id = world.insert(
            Body::from_corners(0.0, 0.0, 4.0, 4.0).velocity(2.0, 0.0).reaction("strict").build().unwrap(),
        ).unwrap();

        let reactions = Reactions::new().with("strict", |_: &mut World, event: &CollisionEvent| {
            Err(PhysicsError::reaction(event.body, "wall hit"))
        });

        assert_eq!(world.step(1.0, &reactions), Err(PhysicsError::reaction(id, "wall hit")));
    }

    #[test]
    fn test_velocity_change_by_reaction_waits_for_next_step() {
        let mut world = World::new();
        world.add_static(rect(5.0, 0.0, 6.0, 10.0));
        let stunner = world.insert(
            Body::from_corners(0.0, 0.0, 4.0, 4.0).velocity(2.0, 0.0).reaction("stun").build().unwrap(),
        ).unwrap();
        let runner = world.insert(
            Body::from_corners(100.0, 0.0, 104.0, 4.0).velocity(1.0, 0.0).build().unwrap(),
        ).unwrap();

        let reactions = Reactions::new().with("stun", move |world: &mut World, _: &CollisionEvent| {
            world.set_velocity(runner, None)
        });

        world.step(1.0, &reactions).unwrap();
        assert_eq!(*world.get(stunner).unwrap().rect(), rect(0.0, 0.0, 4.0, 4.0));
        assert_eq!(*world.get(runner).unwrap().rect(), rect(101.0, 0.0, 105.0, 4.0));
        assert_eq!(world.get(runner).unwrap().velocity(), None);

        world.step(1.0, &reactions).unwrap();
        assert_eq!(*world.get(runner).unwrap().rect(), rect(101.0, 0.0, 105.0, 4.0));
    }

    #[test]
    fn test_overflowing_displacement_fails_before_any_move() {
        let mut world = World::new();
        let slow = world.insert(Body::from_corners(0.0, 0.0, 1.0, 1.0).velocity(2.0, 0.0).build().unwrap()).unwrap();
        world.insert(
            Body::from_corners(10.0, 0.0, 11.0, 1.0).velocity(f32::MAX, 0.0).build().unwrap(),
        ).unwrap();
        let before = world.clone();

        assert!(matches!(world.step(2.0, &Reactions::new()), Err(PhysicsError::InvalidInput(_))));
        assert_eq!(world, before);
        assert!(world.get(slow).unwrap().previous_rect().is_none());
    }

    #[test]
    fn test_fixed_stepper_accumulates() {
        let mut world = World::new();
        let id = world.insert(Body::from_corners(0.0, 0.0, 1.0, 1.0).velocity(2.0, 0.0).build().unwrap()).unwrap();
        let mut stepper = FixedStepper::new(0.5, 5).unwrap();
        let reactions = Reactions::new();

        let report = stepper.advance(&mut world, 1.25, &reactions).unwrap();
        assert_eq!(report.steps, 2);
        assert_relative_eq!(report.alpha, 0.5);
        assert_relative_eq!(report.dropped, 0.0);
        assert_relative_eq!(world.get(id).unwrap().rect().min_x(), 2.0);

        let report = stepper.advance(&mut world, 0.25, &reactions).unwrap();
        assert_eq!(report.steps, 1);
        assert_relative_eq!(report.alpha, 0.0);
    }

    #[test]
    fn test_fixed_stepper_caps_substeps() {
        let mut world: World = World::new();
        let mut stepper = FixedStepper::new(0.25, 2).unwrap();

        let report = stepper.advance(&mut world, 1.125, &Reactions::new()).unwrap();
        assert_eq!(report.steps, 2);
        assert_relative_eq!(report.dropped, 0.5);
        assert_relative_eq!(report.alpha, 0.5);
        assert!(stepper.alpha() < 1.0);
    }

    #[test]
    fn test_fixed_stepper_validation() {
        assert!(FixedStepper::new(0.0, 1).is_err());
        assert!(FixedStepper::new(0.1, 0).is_err());
        assert!(FixedStepper::from_config(&PhysicsConfig::default()).is_ok());

        let mut stepper = FixedStepper::new(0.1, 1).unwrap();
        let mut world: World = World::new();
        assert!(matches!(
            stepper.advance(&mut world, -1.0, &Reactions::new()),
            Err(PhysicsError::NegativeTimeStep(_))
        ));
    }
}
