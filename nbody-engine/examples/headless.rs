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
//! Headless host loop
//!
//! Plays the role of a renderer and parameter panel: a fixed 60 Hz frame
//! clock drives `Simulation::tick`, a few scripted panel commands are issued
//! along the way, and diagnostics are logged instead of drawn.
//!
//! # Running
//!
//! ```bash
//! # 200 bodies, 10 seconds of frames
//! RUST_LOG=info cargo run --example headless --release
//!
//! # Kinematic mode, loaded from a saved panel state
//! RUST_LOG=debug cargo run --example headless -- --config panel.json --seconds 5
//!
//! # Frame-coupled timing, more bodies
//! cargo run --example headless -- --bodies 500 --frame-scaled
//! ```

use nbody_engine::config::{ConfigUpdate, SimulationConfig, TimeMode};
use nbody_engine::diagnostics::Diagnostics;
use nbody_engine::{SimError, Simulation};

const FRAME: f64 = 1.0 / 60.0;

struct Options {
    config: SimulationConfig,
    seconds: f64,
}

fn parse_args() -> Result<Options, SimError> {
    let args: Vec<String> = std::env::args().collect();
    let mut config = SimulationConfig::default();
    let mut seconds = 10.0;

    let mut i = 1;
    while i < args.len() {
        let value = args.get(i + 1);
        match (args[i].as_str(), value) {
            ("--config", Some(path)) => {
                config = SimulationConfig::load(path)?;
                i += 2;
            }
            ("--bodies", Some(v)) => {
                config.body_count = v
                    .parse()
                    .map_err(|_| SimError::InvalidConfig(format!("invalid body count '{}'", v)))?;
                i += 2;
            }
            ("--seconds", Some(v)) => {
                seconds = v
                    .parse()
                    .map_err(|_| SimError::InvalidConfig(format!("invalid duration '{}'", v)))?;
                i += 2;
            }
            ("--seed", Some(v)) => {
                config.seed = Some(
                    v.parse()
                        .map_err(|_| SimError::InvalidConfig(format!("invalid seed '{}'", v)))?,
                );
                i += 2;
            }
            ("--frame-scaled", _) => {
                config.time_mode = TimeMode::FrameScaled;
                i += 1;
            }
            (flag, _) => {
                log::warn!("Ignoring argument '{}'", flag);
                i += 1;
            }
        }
    }

    Ok(Options { config, seconds })
}

fn report(sim: &Simulation, frame: usize) {
    let config = sim.config();
    let d = Diagnostics::capture(sim.bodies(), config.gravitational_constant, config.softening);
    log::info!(
        "frame {:5} | steps {:6} | t = {:8.3} | E = {:+.6e} | |p| = {:.3e} | invalid {}",
        frame,
        sim.steps(),
        sim.simulated_time(),
        d.total_energy(),
        d.momentum.length(),
        d.invalid_count
    );
}

fn main() -> Result<(), SimError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let options = parse_args()?;
    let mut sim = Simulation::new(options.config)?;

    let frames = (options.seconds / FRAME).ceil() as usize;
    for frame in 0..frames {
        // Scripted panel input at fixed points of the run
        if frame == frames / 4 {
            sim.apply(ConfigUpdate::TogglePause)?;
        } else if frame == frames / 4 + 30 {
            sim.apply(ConfigUpdate::TogglePause)?;
            sim.apply(ConfigUpdate::SetGravitationalConstant(0.5))?;
        } else if frame == frames / 2 {
            let count = sim.config().body_count;
            sim.apply(ConfigUpdate::SetBodyCount(count + count / 2))?;
        }

        sim.tick(FRAME)?;

        if frame % 60 == 0 {
            report(&sim, frame);
        }
    }

    report(&sim, frames);
    Ok(())
}
