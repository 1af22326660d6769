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
//! Kinematic wall-bounce policy
//!
//! Bodies drift at constant velocity with no forces between them. After the
//! position update each axis is checked on its own: a coordinate beyond
//! `±bound` negates that velocity component. Positions are not clamped, so a
//! body may sit slightly outside the cube for one step while it turns back.

use crate::body::Body;
use crate::config::DEFAULT_BOUNDARY;
use crate::error::SimError;
use crate::integration::{check_step_inputs, MotionPolicy};

/// Constant-velocity motion inside a cube `[-bound, bound]³`
///
/// # Example
///
/// ```
/// use glam::DVec3;
/// use nbody_engine::body::{Body, Mass};
/// use nbody_engine::integration::{KinematicIntegrator, MotionPolicy};
///
/// let walls = KinematicIntegrator::default();
/// let body = Body::new(DVec3::new(1.9, 0.0, 0.0), DVec3::X, Mass::new(1.0));
///
/// let next = walls.step(&[body], 0.2).unwrap();
/// assert_eq!(next[0].velocity.x, -1.0);
/// ```
#[derive(Debug, Clone)]
pub struct KinematicIntegrator {
    bound: f64,
}

impl KinematicIntegrator {
    /// Create a kinematic policy bouncing at `±bound`
    ///
    /// # Panics
    ///
    /// Panics if `bound` is not positive and finite.
    pub fn new(bound: f64) -> Self {
        assert!(bound > 0.0 && bound.is_finite(), "Boundary must be positive and finite");
        KinematicIntegrator { bound }
    }

    /// Get the wall half-width
    pub fn bound(&self) -> f64 {
        self.bound
    }

    fn advance(&self, body: &Body, dt: f64) -> Body {
        let position = body.position + body.velocity * dt;
        let mut velocity = body.velocity;

        for axis in 0..3 {
            if position[axis] < -self.bound || position[axis] > self.bound {
                velocity[axis] = -velocity[axis];
            }
        }

        body.with_motion(position, velocity)
    }
}

impl Default for KinematicIntegrator {
    fn default() -> Self {
        KinematicIntegrator::new(DEFAULT_BOUNDARY)
    }
}

impl MotionPolicy for KinematicIntegrator {
    fn name(&self) -> &str {
        "kinematic"
    }

    fn step(&self, bodies: &[Body], dt: f64) -> Result<Vec<Body>, SimError> {
        check_step_inputs(bodies, dt)?;
        Ok(bodies.iter().map(|body| self.advance(body, dt)).collect())
    }
}
