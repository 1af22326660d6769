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
//! Randomized initial conditions
//!
//! Every reset throws the old bodies away and draws a fresh set: positions
//! uniform in a cube, velocity components uniform in a (slightly positive
//! biased) range, and masses either uniform or equal to `1/n`.

use crate::body::{Body, Mass};
use crate::config::{MassDistribution, SpawnConfig};
use glam::DVec3;
use rand::distributions::{Distribution, Uniform};
use rand::Rng;

/// Draw `count` fresh bodies
///
/// The caller is expected to have validated `spawn` (see
/// [`SpawnConfig::validate`]); empty ranges panic inside `rand`.
pub fn spawn_bodies<R: Rng + ?Sized>(count: usize, spawn: &SpawnConfig, rng: &mut R) -> Vec<Body> {
    let position = Uniform::new(-spawn.position_extent, spawn.position_extent);
    let velocity = Uniform::new(spawn.velocity_min, spawn.velocity_max);

    let mut bodies = Vec::with_capacity(count);
    for _ in 0..count {
        let p = DVec3::new(position.sample(rng), position.sample(rng), position.sample(rng));
        let v = DVec3::new(velocity.sample(rng), velocity.sample(rng), velocity.sample(rng));
        let m = draw_mass(&spawn.mass, count, rng);
        bodies.push(Body::new(p, v, m));
    }
    bodies
}

fn draw_mass<R: Rng + ?Sized>(distribution: &MassDistribution, count: usize, rng: &mut R) -> Mass {
    match *distribution {
        MassDistribution::Uniform { min, max } => Mass::new(rng.gen_range(min..max)),
        MassDistribution::Equal => Mass::new(1.0 / count as f64),
    }
}
