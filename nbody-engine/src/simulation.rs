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
//! Host-facing simulation driver
//!
//! `Simulation` owns the evolving body set and everything a host loop needs
//! around it: the validated configuration, the active motion policy, the
//! RNG used for resets, a pause flag and time accounting.
//!
//! The host calls [`Simulation::tick`] once per rendered frame with the
//! elapsed wall-clock time, and forwards panel input through
//! [`Simulation::apply`]. Parameter changes take effect from the next step;
//! changing the body count discards every body and spawns a new set.

use crate::body::Body;
use crate::config::{ConfigUpdate, SimulationConfig, TimeMode};
use crate::error::SimError;
use crate::integration::{policy_for, timestep_advisory, MotionPolicy};
use crate::spawn::spawn_bodies;
use rand::rngs::StdRng;
use rand::SeedableRng;

/// A running N-body simulation
pub struct Simulation {
    config: SimulationConfig,
    bodies: Vec<Body>,
    policy: Box<dyn MotionPolicy>,
    rng: StdRng,
    paused: bool,
    /// Unspent frame time in `TimeMode::Fixed`
    accumulator: f64,
    steps: u64,
    simulated_time: f64,
}

impl Simulation {
    /// Create a simulation and spawn its initial bodies
    pub fn new(config: SimulationConfig) -> Result<Self, SimError> {
        config.validate()?;

        let mut rng = seeded_rng(config.seed);
        let bodies = spawn_bodies(config.body_count, &config.spawn, &mut rng);
        Ok(Simulation::assemble(config, bodies, rng))
    }

    /// Create a simulation from explicit bodies
    ///
    /// `config.body_count` is overwritten with `bodies.len()`. No random
    /// bodies are drawn, so a later [`reset`](Self::reset) under a fixed
    /// seed spawns the same set as [`Simulation::new`] would.
    pub fn with_bodies(mut config: SimulationConfig, bodies: Vec<Body>) -> Result<Self, SimError> {
        config.body_count = bodies.len();
        config.validate()?;

        let rng = seeded_rng(config.seed);
        Ok(Simulation::assemble(config, bodies, rng))
    }

    fn assemble(config: SimulationConfig, bodies: Vec<Body>, rng: StdRng) -> Self {
        let policy = policy_for(&config);

        log::info!(
            "Simulation created: {} bodies, {} policy, G = {}, dt = {}",
            config.body_count,
            policy.name(),
            config.gravitational_constant,
            config.time_step
        );

        let sim = Simulation {
            config,
            bodies,
            policy,
            rng,
            paused: false,
            accumulator: 0.0,
            steps: 0,
            simulated_time: 0.0,
        };
        if let Some(advice) = sim.timestep_advice() {
            log::warn!("{}", advice);
        }
        sim
    }

    /// Current bodies, in index order
    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    /// Active configuration
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Name of the active motion policy
    pub fn policy_name(&self) -> &str {
        self.policy.name()
    }

    /// Whether `tick` is currently gated off
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Number of steps taken since creation or the last reset
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Physical time advanced since creation or the last reset
    pub fn simulated_time(&self) -> f64 {
        self.simulated_time
    }

    /// Warning about the configured `time_step`, if it is outside the
    /// comfortable range for f64 stepping
    pub fn timestep_advice(&self) -> Option<String> {
        timestep_advisory(self.config.time_step)
    }

    /// Discard every body and spawn `body_count` fresh ones
    pub fn reset(&mut self) {
        self.bodies = spawn_bodies(self.config.body_count, &self.config.spawn, &mut self.rng);
        self.accumulator = 0.0;
        self.steps = 0;
        self.simulated_time = 0.0;
        log::debug!("Reset: spawned {} bodies", self.bodies.len());
    }

    /// Apply a panel command
    ///
    /// Rejected values leave the simulation untouched.
    pub fn apply(&mut self, update: ConfigUpdate) -> Result<(), SimError> {
        let mut next = self.config.clone();

        match update {
            ConfigUpdate::SetGravitationalConstant(g) => next.gravitational_constant = g,
            ConfigUpdate::SetTimeStep(dt) => next.time_step = dt,
            ConfigUpdate::SetSoftening(eps) => next.softening = eps,
            ConfigUpdate::SetBodyCount(n) => next.body_count = n,
            ConfigUpdate::SetMotionMode(mode) => next.motion = mode,
            ConfigUpdate::SetSolver(solver) => next.solver = solver,
            ConfigUpdate::SetTimeMode(mode) => next.time_mode = mode,
            ConfigUpdate::Reset => {
                self.reset();
                return Ok(());
            }
            ConfigUpdate::TogglePause => {
                self.set_paused(!self.paused);
                return Ok(());
            }
            ConfigUpdate::SetPaused(paused) => {
                self.set_paused(paused);
                return Ok(());
            }
        }

        next.validate()?;

        let count_changed = next.body_count != self.config.body_count;
        if next.time_mode != self.config.time_mode {
            self.accumulator = 0.0;
        }
        self.config = next;
        self.policy = policy_for(&self.config);
        log::debug!("Applied {:?}", update);

        if let Some(advice) = self.timestep_advice() {
            log::warn!("{}", advice);
        }

        if count_changed {
            self.reset();
        }
        Ok(())
    }

    /// Pause or resume without touching the bodies
    pub fn set_paused(&mut self, paused: bool) {
        if self.paused != paused {
            log::debug!("{}", if paused { "Paused" } else { "Resumed" });
        }
        self.paused = paused;
    }

    /// Advance by one host frame that took `frame_elapsed` seconds
    ///
    /// Returns the number of physical steps taken (0 while paused).
    ///
    /// # Errors
    ///
    /// [`SimError::InvalidTimestep`] if `frame_elapsed` is negative or not
    /// finite.
    pub fn tick(&mut self, frame_elapsed: f64) -> Result<usize, SimError> {
        if !(frame_elapsed >= 0.0 && frame_elapsed.is_finite()) {
            return Err(SimError::InvalidTimestep(frame_elapsed));
        }
        if self.paused {
            return Ok(0);
        }

        let dt = self.config.time_step;
        match self.config.time_mode {
            TimeMode::PerFrame => {
                self.advance(dt)?;
                Ok(1)
            }
            TimeMode::FrameScaled => {
                let scaled = dt * frame_elapsed;
                if scaled == 0.0 {
                    return Ok(0);
                }
                self.advance(scaled)?;
                Ok(1)
            }
            TimeMode::Fixed => {
                self.accumulator += frame_elapsed;
                let due = (self.accumulator / dt).floor() as usize;
                let taken = due.min(self.config.max_steps_per_tick);

                for _ in 0..taken {
                    self.advance(dt)?;
                }

                if due > taken {
                    log::debug!("Dropping {} steps of backlog", due - taken);
                    self.accumulator %= dt;
                } else {
                    self.accumulator -= taken as f64 * dt;
                }
                Ok(taken)
            }
        }
    }

    /// Take exactly one step of `time_step`, even while paused
    pub fn step_once(&mut self) -> Result<(), SimError> {
        self.advance(self.config.time_step)
    }

    fn advance(&mut self, dt: f64) -> Result<(), SimError> {
        let next = self.policy.step(&self.bodies, dt)?;

        if self.bodies.iter().all(Body::is_valid) && !next.iter().all(Body::is_valid) {
            log::warn!("Step {} produced non-finite body state", self.steps + 1);
        }

        self.bodies = next;
        self.steps += 1;
        self.simulated_time += dt;
        Ok(())
    }
}

fn seeded_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}
