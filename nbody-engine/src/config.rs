// Copyright 2025 John Brosnihan
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//! Simulation configuration
//!
//! `SimulationConfig` gathers every tunable parameter of a run: body count,
//! gravitational constant, timestep, softening, the active motion policy and
//! how host frame time maps onto physical steps. A parameter panel never
//! mutates it directly; it issues `ConfigUpdate` commands that the
//! `Simulation` validates and applies from the next step on.
//!
//! Configurations serialize to JSON so a host can persist panel state:
//!
//! ```json
//! {
//!   "body_count": 200,
//!   "gravitational_constant": 1.0,
//!   "time_step": 0.01,
//!   "softening": 0.01,
//!   "motion": "gravity",
//!   "solver": { "kind": "direct" },
//!   "time_mode": "fixed"
//! }
//! ```
//!
//! Missing fields fall back to their defaults.

use crate::error::SimError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Default number of bodies
pub const DEFAULT_BODY_COUNT: usize = 200;

/// Default gravitational constant (simulation units)
pub const DEFAULT_GRAVITATIONAL_CONSTANT: f64 = 1.0;

/// Default physical timestep
pub const DEFAULT_TIME_STEP: f64 = 0.01;

/// Default softening added to the separation distance
pub const DEFAULT_SOFTENING: f64 = 0.01;

/// Default half-width of the kinematic bounce cube
pub const DEFAULT_BOUNDARY: f64 = 2.0;

/// Default cap on physical steps taken for one host frame
pub const DEFAULT_MAX_STEPS_PER_TICK: usize = 8;

/// Which motion policy advances the bodies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MotionMode {
    /// Pairwise gravitational attraction
    #[default]
    Gravity,
    /// Constant velocity with wall bounces, no gravity
    Kinematic,
}

/// What to do with a pair of bodies at exactly zero separation
///
/// With zero softening the force kernel evaluates 0/0 for coincident bodies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoincidencePolicy {
    /// Evaluate the kernel anyway; the NaN propagates into the state
    #[default]
    Propagate,
    /// Leave zero-separation pairs out of the sum
    Skip,
}

/// Algorithm used to sum forces in gravity mode
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum ForceSolver {
    /// Exact O(n²) pairwise summation
    #[default]
    Direct,
    /// Octree approximation; nodes with size/distance below `theta` are
    /// treated as a single mass at their center of mass
    BarnesHut {
        /// Opening-angle threshold (0 means never approximate)
        theta: f64,
    },
}

/// How host frame time maps to physical steps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeMode {
    /// Fixed physical step; elapsed frame time is accumulated and whole
    /// steps of `time_step` are taken
    #[default]
    Fixed,
    /// One step per frame of `time_step * elapsed` (frame-rate dependent)
    FrameScaled,
    /// One step of `time_step` per frame, ignoring elapsed time
    PerFrame,
}

/// Mass assignment for freshly spawned bodies
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum MassDistribution {
    /// Uniform in `[min, max)`
    Uniform {
        /// Lower bound (inclusive)
        min: f64,
        /// Upper bound (exclusive)
        max: f64,
    },
    /// Every body gets `1 / n`
    Equal,
}

impl Default for MassDistribution {
    fn default() -> Self {
        MassDistribution::Uniform { min: 0.1, max: 0.6 }
    }
}

/// Ranges used when bodies are (re)created
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnConfig {
    /// Positions are uniform in `[-extent, extent)` per axis
    pub position_extent: f64,
    /// Lower bound of each velocity component
    pub velocity_min: f64,
    /// Upper bound of each velocity component
    pub velocity_max: f64,
    /// Mass assignment
    pub mass: MassDistribution,
}

impl Default for SpawnConfig {
    fn default() -> Self {
        SpawnConfig {
            position_extent: 2.0,
            velocity_min: -0.01,
            velocity_max: 0.19,
            mass: MassDistribution::default(),
        }
    }
}

impl SpawnConfig {
    /// Check all ranges
    pub fn validate(&self) -> Result<(), SimError> {
        if !(self.position_extent > 0.0 && (2.0 * self.position_extent).is_finite()) {
            return Err(invalid(format!(
                "position extent must be positive with a finite span, got {}",
                self.position_extent
            )));
        }
        if !(self.velocity_max - self.velocity_min).is_finite() || self.velocity_min >= self.velocity_max {
            return Err(invalid(format!(
                "velocity range [{}, {}) is empty or its span is not finite",
                self.velocity_min, self.velocity_max
            )));
        }
        if let MassDistribution::Uniform { min, max } = self.mass {
            if !(min > 0.0 && (max - min).is_finite() && min < max) {
                return Err(invalid(format!(
                    "mass range [{}, {}) must be positive and non-empty with a finite span",
                    min, max
                )));
            }
        }
        Ok(())
    }
}

/// Complete parameter set for a simulation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Number of bodies (fixed for a run; changing it resets)
    pub body_count: usize,
    /// Gravitational constant G ≥ 0
    pub gravitational_constant: f64,
    /// Physical timestep dt > 0
    pub time_step: f64,
    /// Softening ε ≥ 0 added to the separation distance
    pub softening: f64,
    /// Handling of exactly coincident bodies
    pub coincidence: CoincidencePolicy,
    /// Force summation algorithm
    pub solver: ForceSolver,
    /// Active motion policy
    pub motion: MotionMode,
    /// Half-width of the bounce cube in kinematic mode
    pub boundary: f64,
    /// Frame time to physical step mapping
    pub time_mode: TimeMode,
    /// Cap on steps per tick in `TimeMode::Fixed`
    pub max_steps_per_tick: usize,
    /// Initial condition ranges
    pub spawn: SpawnConfig,
    /// RNG seed; `None` draws from OS entropy
    pub seed: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfig {
            body_count: DEFAULT_BODY_COUNT,
            gravitational_constant: DEFAULT_GRAVITATIONAL_CONSTANT,
            time_step: DEFAULT_TIME_STEP,
            softening: DEFAULT_SOFTENING,
            coincidence: CoincidencePolicy::default(),
            solver: ForceSolver::default(),
            motion: MotionMode::default(),
            boundary: DEFAULT_BOUNDARY,
            time_mode: TimeMode::default(),
            max_steps_per_tick: DEFAULT_MAX_STEPS_PER_TICK,
            spawn: SpawnConfig::default(),
            seed: None,
        }
    }
}

impl SimulationConfig {
    /// Set the body count
    pub fn with_body_count(mut self, count: usize) -> Self {
        self.body_count = count;
        self
    }

    /// Set the gravitational constant
    pub fn with_gravitational_constant(mut self, g: f64) -> Self {
        self.gravitational_constant = g;
        self
    }

    /// Set the physical timestep
    pub fn with_time_step(mut self, dt: f64) -> Self {
        self.time_step = dt;
        self
    }

    /// Set the softening distance
    pub fn with_softening(mut self, softening: f64) -> Self {
        self.softening = softening;
        self
    }

    /// Set the coincidence policy
    pub fn with_coincidence(mut self, policy: CoincidencePolicy) -> Self {
        self.coincidence = policy;
        self
    }

    /// Set the force solver
    pub fn with_solver(mut self, solver: ForceSolver) -> Self {
        self.solver = solver;
        self
    }

    /// Set the motion policy
    pub fn with_motion(mut self, motion: MotionMode) -> Self {
        self.motion = motion;
        self
    }

    /// Set the kinematic bounce half-width
    pub fn with_boundary(mut self, boundary: f64) -> Self {
        self.boundary = boundary;
        self
    }

    /// Set the time mode
    pub fn with_time_mode(mut self, mode: TimeMode) -> Self {
        self.time_mode = mode;
        self
    }

    /// Set the spawn ranges
    pub fn with_spawn(mut self, spawn: SpawnConfig) -> Self {
        self.spawn = spawn;
        self
    }

    /// Set a deterministic RNG seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Check every parameter against its allowed range
    pub fn validate(&self) -> Result<(), SimError> {
        if self.body_count == 0 {
            return Err(invalid("body count must be at least 1".to_string()));
        }
        if !(self.gravitational_constant >= 0.0 && self.gravitational_constant.is_finite()) {
            return Err(invalid(format!(
                "gravitational constant must be non-negative and finite, got {}",
                self.gravitational_constant
            )));
        }
        if !(self.time_step > 0.0 && self.time_step.is_finite()) {
            return Err(SimError::InvalidTimestep(self.time_step));
        }
        if !(self.softening >= 0.0 && self.softening.is_finite()) {
            return Err(invalid(format!(
                "softening must be non-negative and finite, got {}",
                self.softening
            )));
        }
        if let ForceSolver::BarnesHut { theta } = self.solver {
            if !(theta >= 0.0 && theta.is_finite()) {
                return Err(invalid(format!(
                    "Barnes-Hut theta must be non-negative and finite, got {}",
                    theta
                )));
            }
        }
        if !(self.boundary > 0.0 && self.boundary.is_finite()) {
            return Err(invalid(format!(
                "boundary must be positive and finite, got {}",
                self.boundary
            )));
        }
        if self.max_steps_per_tick == 0 {
            return Err(invalid("max steps per tick must be at least 1".to_string()));
        }
        self.spawn.validate()
    }

    /// Load a configuration from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SimError> {
        let json = fs::read_to_string(path)?;
        let config: SimulationConfig = serde_json::from_str(&json)?;
        config.validate()?;
        Ok(config)
    }

    /// Save the configuration to a JSON file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SimError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}

/// A discrete command from a parameter panel
///
/// Parameter changes take effect from the next step. Changing the body
/// count discards the current bodies and spawns a fresh set.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "command", content = "value")]
pub enum ConfigUpdate {
    /// Change G
    SetGravitationalConstant(f64),
    /// Change the physical timestep
    SetTimeStep(f64),
    /// Change the softening distance
    SetSoftening(f64),
    /// Change n (implies a reset)
    SetBodyCount(usize),
    /// Switch between gravity and kinematic motion
    SetMotionMode(MotionMode),
    /// Switch the force summation algorithm
    SetSolver(ForceSolver),
    /// Change how frame time maps to steps
    SetTimeMode(TimeMode),
    /// Discard and respawn all bodies
    Reset,
    /// Flip the pause flag
    TogglePause,
    /// Set the pause flag
    SetPaused(bool),
}

fn invalid(msg: String) -> SimError {
    SimError::InvalidConfig(msg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = SimulationConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.body_count, 200);
        assert_eq!(config.boundary, 2.0);
        assert_eq!(config.spawn.mass, MassDistribution::Uniform { min: 0.1, max: 0.6 });
    }

    #[test]
    fn test_rejects_spawn_ranges_wider_than_f64() {
        let mut spawn = SpawnConfig { position_extent: 1e308, ..SpawnConfig::default() };
        assert!(matches!(spawn.validate(), Err(SimError::InvalidConfig(_))));

        spawn = SpawnConfig { velocity_min: -1e308, velocity_max: 1e308, ..SpawnConfig::default() };
        assert!(matches!(spawn.validate(), Err(SimError::InvalidConfig(_))));

        spawn = SpawnConfig { mass: MassDistribution::Uniform { min: 0.1, max: f64::INFINITY }, ..SpawnConfig::default() };
        assert!(matches!(spawn.validate(), Err(SimError::InvalidConfig(_))));

        let config = SimulationConfig::default().with_spawn(SpawnConfig { position_extent: 1e308, ..SpawnConfig::default() });
        assert!(matches!(config.validate(), Err(SimError::InvalidConfig(_))));
    }

    #[test]
    fn test_rejects_zero_bodies() {
        let config = SimulationConfig::default().with_body_count(0);
        assert!(matches!(config.validate(), Err(SimError::InvalidConfig(_))));
    }

    #[test]
    fn test_rejects_bad_timestep() {
        for dt in [0.0, -0.01, f64::NAN, f64::INFINITY] {
            let config = SimulationConfig::default().with_time_step(dt);
            assert!(matches!(config.validate(), Err(SimError::InvalidTimestep(_))));
        }
    }

    #[test]
    fn test_rejects_negative_gravity_and_softening() {
        let config = SimulationConfig::default().with_gravitational_constant(-1.0);
        assert!(config.validate().is_err());

        let config = SimulationConfig::default().with_softening(-0.1);
        assert!(config.validate().is_err());

        let config = SimulationConfig::default().with_gravitational_constant(0.0).with_softening(0.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_bad_theta() {
        let config = SimulationConfig::default().with_solver(ForceSolver::BarnesHut { theta: -0.5 });
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_empty_mass_range() {
        let spawn = SpawnConfig {
            mass: MassDistribution::Uniform { min: 0.6, max: 0.1 },
            ..SpawnConfig::default()
        };
        assert!(SimulationConfig::default().with_spawn(spawn).validate().is_err());

        let spawn = SpawnConfig {
            mass: MassDistribution::Uniform { min: 0.0, max: 1.0 },
            ..SpawnConfig::default()
        };
        assert!(spawn.validate().is_err());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: SimulationConfig =
            serde_json::from_str(r#"{ "body_count": 12, "motion": "kinematic" }"#).unwrap();
        assert_eq!(config.body_count, 12);
        assert_eq!(config.motion, MotionMode::Kinematic);
        assert_eq!(config.time_step, DEFAULT_TIME_STEP);
        assert_eq!(config.solver, ForceSolver::Direct);
    }

    #[test]
    fn test_tagged_solver_json() {
        let config: SimulationConfig =
            serde_json::from_str(r#"{ "solver": { "kind": "barnes_hut", "theta": 0.5 } }"#).unwrap();
        assert_eq!(config.solver, ForceSolver::BarnesHut { theta: 0.5 });
    }

    #[test]
    fn test_update_command_json() {
        let update: ConfigUpdate =
            serde_json::from_str(r#"{ "command": "set_body_count", "value": 50 }"#).unwrap();
        assert_eq!(update, ConfigUpdate::SetBodyCount(50));

        let reset: ConfigUpdate = serde_json::from_str(r#"{ "command": "reset" }"#).unwrap();
        assert_eq!(reset, ConfigUpdate::Reset);
    }
}
