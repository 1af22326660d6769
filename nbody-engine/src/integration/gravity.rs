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
//! Pairwise gravity integrator
//!
//! Computes the net specific force on every body from every other body and
//! advances positions and velocities with a first-order update.
//!
//! # Force Law
//!
//! For body i the net force per unit mass is
//!
//! ```text
//! F_i = -G * Σ_{j≠i} (r_i - r_j) * m_j / (|r_i - r_j| + ε)³
//! ```
//!
//! The `(r_i - r_j)` direction together with the leading `-G` points the
//! force from i toward j, i.e. attraction. ε is a softening distance added
//! to the separation. With ε = 0 two coincident bodies evaluate `0 * (m/0)`,
//! which is NaN; [`CoincidencePolicy`] decides whether that pair is summed
//! anyway (the NaN reaches the state and is logged) or skipped.
//!
//! # Update
//!
//! ```text
//! v_i' = v_i + F_i * dt
//! r_i' = r_i + 0.5 * F_i * dt² + v_i * dt
//! ```
//!
//! The position update uses the *old* velocity. This is not textbook
//! leapfrog or velocity Verlet, and it is not momentum-exact over long runs.
//!
//! ## Parallel Computation
//!
//! Each F_i is an independent sum over the pre-step snapshot, so the force
//! loop is split across Rayon workers. Every F_i is still summed in index
//! order, so parallel and sequential results are bit-identical.

use crate::body::Body;
use crate::config::{CoincidencePolicy, ForceSolver, SimulationConfig};
use crate::error::SimError;
use crate::integration::octree::Octree;
use crate::integration::{check_step_inputs, MotionPolicy};
use glam::DVec3;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Below this many bodies the force loop stays on the calling thread
#[cfg(feature = "parallel")]
const PARALLEL_THRESHOLD: usize = 64;

/// Gravity integrator configuration
///
/// # Example
///
/// ```rust
/// use glam::DVec3;
/// use nbody_engine::body::{Body, Mass};
/// use nbody_engine::integration::{GravityIntegrator, MotionPolicy};
///
/// let mut gravity = GravityIntegrator::new(1.0);
/// gravity.set_softening(0.01);
///
/// let bodies = vec![
///     Body::at_rest(DVec3::new(-1.0, 0.0, 0.0), Mass::new(1.0)),
///     Body::at_rest(DVec3::new(1.0, 0.0, 0.0), Mass::new(1.0)),
/// ];
/// let next = gravity.step(&bodies, 0.01).unwrap();
/// assert!(next[0].velocity.x > 0.0);
/// assert!(next[1].velocity.x < 0.0);
/// ```
#[derive(Debug, Clone)]
pub struct GravityIntegrator {
    g_constant: f64,
    softening: f64,
    coincidence: CoincidencePolicy,
    solver: ForceSolver,
    /// Minimum bodies per parallel work item (0 = let Rayon decide)
    chunk_size: usize,
}

impl GravityIntegrator {
    /// Create a gravity integrator with no softening and direct summation
    ///
    /// # Panics
    ///
    /// Panics if `g_constant` is negative or not finite.
    pub fn new(g_constant: f64) -> Self {
        assert!(
            g_constant >= 0.0 && g_constant.is_finite(),
            "Gravitational constant must be non-negative and finite"
        );

        GravityIntegrator {
            g_constant,
            softening: 0.0,
            coincidence: CoincidencePolicy::default(),
            solver: ForceSolver::default(),
            chunk_size: 0,
        }
    }

    /// Create a gravity integrator from a validated configuration
    pub fn from_config(config: &SimulationConfig) -> Self {
        let mut gravity = GravityIntegrator::new(config.gravitational_constant);
        gravity.set_softening(config.softening);
        gravity.set_coincidence(config.coincidence);
        gravity.set_solver(config.solver);
        gravity
    }

    /// Get the gravitational constant
    pub fn g_constant(&self) -> f64 {
        self.g_constant
    }

    /// Set the softening distance
    ///
    /// # Panics
    ///
    /// Panics if `softening` is negative or not finite.
    pub fn set_softening(&mut self, softening: f64) {
        assert!(
            softening >= 0.0 && softening.is_finite(),
            "Softening factor must be non-negative and finite"
        );
        self.softening = softening;
    }

    /// Get the softening distance
    pub fn softening(&self) -> f64 {
        self.softening
    }

    /// Set how zero-separation pairs are handled
    pub fn set_coincidence(&mut self, policy: CoincidencePolicy) {
        self.coincidence = policy;
    }

    /// Get the coincidence policy
    pub fn coincidence(&self) -> CoincidencePolicy {
        self.coincidence
    }

    /// Set the force summation algorithm
    ///
    /// # Panics
    ///
    /// Panics if a Barnes-Hut `theta` is negative or not finite.
    pub fn set_solver(&mut self, solver: ForceSolver) {
        if let ForceSolver::BarnesHut { theta } = solver {
            assert!(
                theta >= 0.0 && theta.is_finite(),
                "Barnes-Hut theta must be non-negative and finite"
            );
        }
        self.solver = solver;
    }

    /// Get the force summation algorithm
    pub fn solver(&self) -> ForceSolver {
        self.solver
    }

    /// Set the minimum number of bodies per parallel work item
    ///
    /// Set to 0 to let Rayon split adaptively.
    pub fn set_chunk_size(&mut self, size: usize) {
        self.chunk_size = size;
    }

    /// Net specific force on every body, computed from one snapshot
    pub fn net_forces(&self, bodies: &[Body]) -> Vec<DVec3> {
        let forces = match self.solver {
            ForceSolver::Direct => self.map_bodies(bodies, |i| self.direct_sum(i, bodies)),
            ForceSolver::BarnesHut { theta } => {
                let tree = Octree::build(bodies);
                self.map_bodies(bodies, |i| {
                    tree.sum_for_body(i, bodies, theta, self.softening, self.coincidence)
                })
            }
        };

        forces.into_iter().map(|sum| sum * -self.g_constant).collect()
    }

    /// Σ_{j≠i} (r_i - r_j) m_j / (|r_i - r_j| + ε)³, before scaling by -G
    fn direct_sum(&self, i: usize, bodies: &[Body]) -> DVec3 {
        let ri = bodies[i].position;
        let mut sum = DVec3::ZERO;

        for (j, other) in bodies.iter().enumerate() {
            if j == i {
                continue;
            }
            if let Some(term) = pair_term(ri, other.position, other.mass(), self.softening, self.coincidence) {
                sum += term;
            }
        }

        sum
    }

    #[cfg(feature = "parallel")]
    fn map_bodies<F>(&self, bodies: &[Body], per_body: F) -> Vec<DVec3>
    where
        F: Fn(usize) -> DVec3 + Send + Sync,
    {
        if bodies.len() < PARALLEL_THRESHOLD {
            return (0..bodies.len()).map(per_body).collect();
        }

        (0..bodies.len())
            .into_par_iter()
            .with_min_len(self.chunk_size.max(1))
            .map(per_body)
            .collect()
    }

    #[cfg(not(feature = "parallel"))]
    fn map_bodies<F>(&self, bodies: &[Body], per_body: F) -> Vec<DVec3>
    where
        F: Fn(usize) -> DVec3,
    {
        (0..bodies.len()).map(per_body).collect()
    }
}

impl MotionPolicy for GravityIntegrator {
    fn name(&self) -> &str {
        "gravity"
    }

    fn step(&self, bodies: &[Body], dt: f64) -> Result<Vec<Body>, SimError> {
        check_step_inputs(bodies, dt)?;

        let forces = self.net_forces(bodies);

        let invalid = forces.iter().filter(|f| !f.is_finite()).count();
        if invalid > 0 {
            log::warn!(
                "{} of {} bodies received a non-finite force (softening = {})",
                invalid,
                bodies.len(),
                self.softening
            );
        }

        let half_dt_sq = 0.5 * dt * dt;
        let next = bodies
            .iter()
            .zip(forces.iter())
            .map(|(body, &force)| {
                let position = body.position + force * half_dt_sq + body.velocity * dt;
                let velocity = body.velocity + force * dt;
                body.with_motion(position, velocity)
            })
            .collect();

        Ok(next)
    }
}

/// Contribution of a source mass at `rj` to the force sum at `ri`
///
/// Returns `None` only for an exactly coincident pair under
/// [`CoincidencePolicy::Skip`].
pub(crate) fn pair_term(
    ri: DVec3,
    rj: DVec3,
    mass_j: f64,
    softening: f64,
    coincidence: CoincidencePolicy,
) -> Option<DVec3> {
    let d = ri - rj;
    let distance = d.length();

    if distance == 0.0 && coincidence == CoincidencePolicy::Skip {
        return None;
    }

    let denom = (distance + softening).powi(3);
    Some(d * (mass_j / denom))
}
