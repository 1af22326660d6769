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
//! Energy and momentum measurements
//!
//! The integrator does not enforce conservation of anything. These helpers
//! only measure, so hosts can log drift and tests can check symmetry.

use crate::body::Body;
use glam::DVec3;

/// Total kinetic energy Σ 0.5·m·v²
pub fn kinetic_energy(bodies: &[Body]) -> f64 {
    bodies.iter().map(Body::kinetic_energy).sum()
}

/// Total potential energy -Σ G·mᵢ·mⱼ / (rᵢⱼ + ε) over unordered pairs
///
/// Coincident pairs with zero softening are skipped.
pub fn potential_energy(bodies: &[Body], g_constant: f64, softening: f64) -> f64 {
    let mut total = 0.0;
    for (i, a) in bodies.iter().enumerate() {
        for b in &bodies[i + 1..] {
            let r = a.position.distance(b.position) + softening;
            if r > 0.0 {
                total -= g_constant * a.mass() * b.mass() / r;
            }
        }
    }
    total
}

/// Total linear momentum Σ m·v
pub fn total_momentum(bodies: &[Body]) -> DVec3 {
    bodies.iter().map(Body::momentum).sum()
}

/// Total mass
pub fn total_mass(bodies: &[Body]) -> f64 {
    bodies.iter().map(Body::mass).sum()
}

/// Mass-weighted mean position, or `None` for an empty set
pub fn center_of_mass(bodies: &[Body]) -> Option<DVec3> {
    let mass = total_mass(bodies);
    if mass > 0.0 {
        let weighted: DVec3 = bodies.iter().map(|b| b.position * b.mass()).sum();
        Some(weighted / mass)
    } else {
        None
    }
}

/// Snapshot of the aggregate quantities of a body set
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Diagnostics {
    /// Number of bodies
    pub body_count: usize,
    /// Number of bodies with a non-finite position or velocity
    pub invalid_count: usize,
    /// Total kinetic energy
    pub kinetic_energy: f64,
    /// Total potential energy
    pub potential_energy: f64,
    /// Total linear momentum
    pub momentum: DVec3,
}

impl Diagnostics {
    /// Measure a body set
    pub fn capture(bodies: &[Body], g_constant: f64, softening: f64) -> Self {
        Diagnostics {
            body_count: bodies.len(),
            invalid_count: bodies.iter().filter(|b| !b.is_valid()).count(),
            kinetic_energy: kinetic_energy(bodies),
            potential_energy: potential_energy(bodies, g_constant, softening),
            momentum: total_momentum(bodies),
        }
    }

    /// Kinetic plus potential energy
    pub fn total_energy(&self) -> f64 {
        self.kinetic_energy + self.potential_energy
    }
}
