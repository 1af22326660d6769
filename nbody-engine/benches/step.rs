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
//! Benchmarks for the simulation step
//!
//! These benchmarks measure:
//! - Direct O(n²) gravity throughput for different body counts
//! - Barnes-Hut against direct summation at larger counts
//! - The kinematic policy as a baseline

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use nbody_engine::body::Body;
use nbody_engine::config::{ForceSolver, SpawnConfig};
use nbody_engine::integration::{GravityIntegrator, KinematicIntegrator, MotionPolicy};
use nbody_engine::spawn::spawn_bodies;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn bodies(count: usize) -> Vec<Body> {
    spawn_bodies(count, &SpawnConfig::default(), &mut StdRng::seed_from_u64(count as u64))
}

fn gravity(solver: ForceSolver) -> GravityIntegrator {
    let mut gravity = GravityIntegrator::new(1.0);
    gravity.set_softening(0.01);
    gravity.set_solver(solver);
    gravity
}

fn bench_direct_throughput(c: &mut Criterion) {
    let mut group = c.benchmark_group("gravity_direct");
    let integrator = gravity(ForceSolver::Direct);

    for count in [10usize, 100, 200, 1000].iter() {
        let state = bodies(*count);
        group.throughput(Throughput::Elements(*count as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), &state, |b, state| {
            b.iter(|| integrator.step(black_box(state), black_box(0.01)))
        });
    }

    group.finish();
}

fn bench_barnes_hut(c: &mut Criterion) {
    let mut group = c.benchmark_group("gravity_solver");
    group.sample_size(20);
    let direct = gravity(ForceSolver::Direct);
    let tree = gravity(ForceSolver::BarnesHut { theta: 0.5 });

    for count in [1000usize, 4000].iter() {
        let state = bodies(*count);
        group.bench_with_input(BenchmarkId::new("direct", count), &state, |b, state| {
            b.iter(|| direct.step(black_box(state), 0.01))
        });
        group.bench_with_input(BenchmarkId::new("barnes_hut", count), &state, |b, state| {
            b.iter(|| tree.step(black_box(state), 0.01))
        });
    }

    group.finish();
}

fn bench_kinematic(c: &mut Criterion) {
    let walls = KinematicIntegrator::default();
    let state = bodies(1000);

    c.bench_function("kinematic_1000", |b| b.iter(|| walls.step(black_box(&state), 0.01)));
}

criterion_group!(benches, bench_direct_throughput, bench_barnes_hut, bench_kinematic);
criterion_main!(benches);
