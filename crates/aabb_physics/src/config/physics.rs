//! Simulation configuration
//!
//! Controls the fixed-step driver and the body identity allocator.

use serde::{Serialize, Deserialize};

use super::{Config, ConfigError};

/// Configuration for the collision world and its fixed-step driver
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Duration of one simulation tick in seconds
    pub fixed_timestep: f32,

    /// Maximum ticks run per `FixedStepper::advance` call.
    /// Accumulated time beyond this is dropped.
    pub max_substeps: u32,

    /// First identity handed out to bodies registered without one
    pub first_body_id: u64,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            fixed_timestep: 1.0 / 60.0,
            max_substeps: 5,
            first_body_id: 1,
        }
    }
}

impl PhysicsConfig {
    /// Create a configuration with the given tick rate in Hz
    pub fn with_tick_rate(mut self, hz: f32) -> Self {
        self.fixed_timestep = 1.0 / hz;
        self
    }

    /// Set the substep cap
    pub fn with_max_substeps(mut self, max_substeps: u32) -> Self {
        self.max_substeps = max_substeps;
        self
    }
}

impl Config for PhysicsConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if !self.fixed_timestep.is_finite() || self.fixed_timestep <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "fixed_timestep must be a positive number, got {}",
                self.fixed_timestep
            )));
        }
        if self.max_substeps == 0 {
            return Err(ConfigError::Invalid("max_substeps must be at least 1".to_string()));
        }
        Ok(())
    }
}
