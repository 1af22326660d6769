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
//! Motion policies
//!
//! A motion policy turns one snapshot of the body set into the next. Two
//! policies exist and they are never mixed within a run:
//!
//! - **Gravity**: pairwise Newtonian attraction with optional softening
//! - **Kinematic**: constant velocity with wall bounces, no forces at all
//!
//! # Step contract
//!
//! Every policy is double-buffered. `step` borrows the current bodies, reads
//! only that snapshot, and returns a freshly allocated body list. No body's
//! update can observe another body's already-updated state, so the result
//! does not depend on iteration order. Masses and the body count never
//! change across a step.
//!
//! # Timestep Guidelines
//!
//! - The step itself rejects zero, negative and non-finite timesteps
//! - Very small or very large timesteps are accepted but logged (see
//!   [`timestep_advisory`])

use crate::body::Body;
use crate::config::{MotionMode, SimulationConfig};
use crate::error::SimError;

mod gravity;
mod kinematic;
mod octree;

pub use gravity::GravityIntegrator;
pub use kinematic::KinematicIntegrator;

/// Trait for policies that advance the body set by one step
pub trait MotionPolicy: Send + Sync {
    /// Get the name of this policy
    fn name(&self) -> &str;

    /// Produce the next body set from the current one
    ///
    /// # Errors
    ///
    /// - [`SimError::EmptySystem`] if `bodies` is empty
    /// - [`SimError::InvalidTimestep`] if `dt` is not positive and finite
    fn step(&self, bodies: &[Body], dt: f64) -> Result<Vec<Body>, SimError>;
}

/// Build the policy selected by a configuration
///
/// The configuration is assumed to be validated.
pub fn policy_for(config: &SimulationConfig) -> Box<dyn MotionPolicy> {
    match config.motion {
        MotionMode::Gravity => Box::new(GravityIntegrator::from_config(config)),
        MotionMode::Kinematic => Box::new(KinematicIntegrator::new(config.boundary)),
    }
}

/// Check the preconditions shared by every policy
pub fn check_step_inputs(bodies: &[Body], dt: f64) -> Result<(), SimError> {
    if bodies.is_empty() {
        return Err(SimError::EmptySystem);
    }
    if !(dt > 0.0 && dt.is_finite()) {
        return Err(SimError::InvalidTimestep(dt));
    }
    Ok(())
}

/// Describe a timestep that is valid but likely to misbehave
///
/// Extremely small timesteps lose precision in f64; large ones make the
/// first-order update unstable for close encounters.
pub fn timestep_advisory(dt: f64) -> Option<String> {
    if dt < 1e-9 {
        Some(format!(
            "Timestep {} is extremely small and may cause precision loss with f64",
            dt
        ))
    } else if dt > 1.0 {
        Some(format!(
            "Timestep {} is large and may cause instability for close encounters",
            dt
        ))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::body::Mass;
    use glam::DVec3;

    #[test]
    fn test_check_step_inputs() {
        let bodies = vec![Body::at_rest(DVec3::ZERO, Mass::default())];
        assert!(check_step_inputs(&bodies, 0.01).is_ok());
        assert!(matches!(check_step_inputs(&[], 0.01), Err(SimError::EmptySystem)));
        assert!(matches!(check_step_inputs(&bodies, 0.0), Err(SimError::InvalidTimestep(_))));
        assert!(matches!(check_step_inputs(&bodies, f64::NAN), Err(SimError::InvalidTimestep(_))));
    }

    #[test]
    fn test_timestep_advisory() {
        assert!(timestep_advisory(0.01).is_none());
        assert!(timestep_advisory(1e-10).unwrap().contains("extremely small"));
        assert!(timestep_advisory(2.0).unwrap().contains("large"));
    }

    #[test]
    fn test_policy_for_mode() {
        let gravity = policy_for(&SimulationConfig::default());
        assert_eq!(gravity.name(), "gravity");

        let kinematic = policy_for(&SimulationConfig::default().with_motion(MotionMode::Kinematic));
        assert_eq!(kinematic.name(), "kinematic");
    }
}
