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
//! Body value types
//!
//! A body is a point mass with a position, a velocity and a fixed mass.
//! Bodies have no identity beyond their index in the body list, and their
//! mass never changes once created. Vectors use double precision.

use glam::DVec3;

/// Mass of a body
///
/// Always strictly positive and finite. There is no immovable or massless
/// body in this model: every body both attracts and is attracted.
///
/// # Examples
///
/// ```
/// use nbody_engine::body::Mass;
///
/// let mass = Mass::new(0.25);
/// assert_eq!(mass.value(), 0.25);
/// assert!(Mass::try_new(0.0).is_none());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mass {
    value: f64,
}

impl Mass {
    /// Create a new mass
    ///
    /// # Panics
    ///
    /// Panics if the mass is zero, negative, NaN or infinite. This is
    /// appropriate for programming errors; use `try_new` for fallible
    /// construction.
    pub fn new(value: f64) -> Self {
        assert!(value > 0.0 && value.is_finite(), "Mass must be positive and finite");
        Mass { value }
    }

    /// Try to create a new mass
    ///
    /// Returns `None` if the value is not strictly positive and finite.
    pub fn try_new(value: f64) -> Option<Self> {
        if value > 0.0 && value.is_finite() {
            Some(Mass { value })
        } else {
            None
        }
    }

    /// Get the mass value
    pub fn value(&self) -> f64 {
        self.value
    }
}

impl Default for Mass {
    fn default() -> Self {
        Mass::new(1.0)
    }
}

/// A point mass in 3D space
///
/// Position and velocity are public so hosts can read them for rendering;
/// the mass is only readable, since it is fixed at creation.
///
/// # Examples
///
/// ```
/// use glam::DVec3;
/// use nbody_engine::body::{Body, Mass};
///
/// let body = Body::new(DVec3::ZERO, DVec3::new(1.0, 0.0, 0.0), Mass::new(2.0));
/// assert_eq!(body.momentum(), DVec3::new(2.0, 0.0, 0.0));
/// assert!(body.is_valid());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Body {
    /// Position in simulation units
    pub position: DVec3,
    /// Velocity in simulation units per time unit
    pub velocity: DVec3,
    mass: Mass,
}

impl Body {
    /// Create a new body
    pub fn new(position: DVec3, velocity: DVec3, mass: Mass) -> Self {
        Body { position, velocity, mass }
    }

    /// Create a body with zero velocity
    pub fn at_rest(position: DVec3, mass: Mass) -> Self {
        Body::new(position, DVec3::ZERO, mass)
    }

    /// Get the mass value
    pub fn mass(&self) -> f64 {
        self.mass.value()
    }

    /// Get the mass component
    pub fn mass_component(&self) -> Mass {
        self.mass
    }

    /// Copy of this body with new kinematic state and the same mass
    pub fn with_motion(&self, position: DVec3, velocity: DVec3) -> Self {
        Body { position, velocity, mass: self.mass }
    }

    /// Check if position and velocity are finite (not NaN or infinite)
    pub fn is_valid(&self) -> bool {
        self.position.is_finite() && self.velocity.is_finite()
    }

    /// Linear momentum m·v
    pub fn momentum(&self) -> DVec3 {
        self.velocity * self.mass.value()
    }

    /// Kinetic energy 0.5·m·v²
    pub fn kinetic_energy(&self) -> f64 {
        0.5 * self.mass.value() * self.velocity.length_squared()
    }
}
