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
//! # N-Body Engine
//!
//! A small gravitational N-body integrator. It owns a set of point masses in
//! 3D space and advances them once per tick, either under pairwise Newtonian
//! attraction or under a simpler kinematic policy that bounces bodies off the
//! walls of a cube.
//!
//! ## Features
//!
//! - **Brute-force gravity**: O(n²) pairwise summation with optional softening
//! - **Double-buffered steps**: every update reads one pre-step snapshot
//! - **Kinematic mode**: constant velocity with axis-independent wall bounces
//! - **Parallelization**: optional Rayon integration for the force loop
//! - **Barnes-Hut**: optional octree approximation inside the gravity step
//! - **Host-driven simulation**: pause, reset and discrete parameter updates
//!
//! ## Example
//!
//! ```rust
//! use nbody_engine::{Simulation, SimulationConfig};
//! use nbody_engine::config::ConfigUpdate;
//!
//! let config = SimulationConfig::default().with_body_count(16).with_seed(7);
//! let mut sim = Simulation::new(config).unwrap();
//!
//! sim.apply(ConfigUpdate::SetGravitationalConstant(0.5)).unwrap();
//! sim.tick(1.0 / 60.0).unwrap();
//! assert_eq!(sim.bodies().len(), 16);
//! ```

#![warn(missing_docs)]

/// Body and mass value types
pub mod body;

/// Simulation parameters and panel update commands
pub mod config;

/// Energy and momentum measurements
pub mod diagnostics;

/// Error type shared by the crate
pub mod error;

/// Motion policies (gravity and kinematic)
pub mod integration;

/// Host-facing simulation driver
pub mod simulation;

/// Randomized initial conditions
pub mod spawn;

pub use body::{Body, Mass};
pub use config::SimulationConfig;
pub use error::SimError;
pub use integration::{GravityIntegrator, KinematicIntegrator, MotionPolicy};
pub use simulation::Simulation;
