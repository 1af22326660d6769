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
//! Integration tests for resets, panel updates and frame timing

use glam::DVec3;
use nbody_engine::body::{Body, Mass};
use nbody_engine::config::{ConfigUpdate, MassDistribution, SimulationConfig, SpawnConfig, TimeMode};
use nbody_engine::{SimError, Simulation};

fn seeded(count: usize) -> SimulationConfig {
    SimulationConfig::default().with_body_count(count).with_seed(1234)
}

#[test]
fn test_reset_with_new_count() {
    let mut sim = Simulation::new(seeded(10)).unwrap();
    let old = sim.bodies().to_vec();
    sim.step_once().unwrap();

    sim.apply(ConfigUpdate::SetBodyCount(37)).unwrap();

    assert_eq!(sim.bodies().len(), 37);
    assert_eq!(sim.config().body_count, 37);
    assert_eq!(sim.steps(), 0);
    assert_eq!(sim.simulated_time(), 0.0);
    for body in sim.bodies() {
        assert!((0.1..0.6).contains(&body.mass()));
    }
    // None of the previous bodies survive
    for body in sim.bodies() {
        assert!(!old.contains(body));
    }
}

#[test]
fn test_reset_redraws_same_count() {
    let mut sim = Simulation::new(seeded(12)).unwrap();
    let old = sim.bodies().to_vec();

    sim.apply(ConfigUpdate::Reset).unwrap();

    assert_eq!(sim.bodies().len(), 12);
    assert_ne!(sim.bodies(), &old[..]);
}

#[test]
fn test_equal_mass_reset() {
    let spawn = SpawnConfig { mass: MassDistribution::Equal, ..SpawnConfig::default() };
    let mut sim = Simulation::new(seeded(5).with_spawn(spawn)).unwrap();
    sim.apply(ConfigUpdate::SetBodyCount(8)).unwrap();

    assert!(sim.bodies().iter().all(|b| b.mass() == 0.125));
}

#[test]
fn test_seed_makes_runs_reproducible() {
    let mut a = Simulation::new(seeded(20)).unwrap();
    let mut b = Simulation::new(seeded(20)).unwrap();

    for _ in 0..10 {
        a.step_once().unwrap();
        b.step_once().unwrap();
    }
    assert_eq!(a.bodies(), b.bodies());
}

#[test]
fn test_update_applies_from_next_step() {
    let mut sim = Simulation::new(seeded(6).with_time_mode(TimeMode::PerFrame)).unwrap();
    sim.apply(ConfigUpdate::SetGravitationalConstant(0.0)).unwrap();
    let before = sim.bodies().to_vec();

    sim.tick(0.016).unwrap();

    // G = 0: pure drift by v * dt
    for (old, new) in before.iter().zip(sim.bodies()) {
        assert_eq!(new.velocity, old.velocity);
        assert!((new.position - (old.position + old.velocity * 0.01)).length() < 1e-12);
    }
}

#[test]
fn test_fixed_mode_accumulates_frame_time() {
    let config = seeded(4).with_time_step(0.01);
    let mut sim = Simulation::new(config).unwrap();

    assert_eq!(sim.tick(0.004).unwrap(), 0);
    assert_eq!(sim.tick(0.004).unwrap(), 0);
    assert_eq!(sim.tick(0.004).unwrap(), 1);
    assert_eq!(sim.tick(0.025).unwrap(), 2);
    assert_eq!(sim.steps(), 3);
    assert!((sim.simulated_time() - 0.03).abs() < 1e-12);
}

#[test]
fn test_fixed_mode_caps_backlog() {
    let mut config = seeded(4).with_time_step(0.01);
    config.max_steps_per_tick = 3;
    let mut sim = Simulation::new(config).unwrap();

    // One second behind: only the cap runs, the backlog is dropped
    assert_eq!(sim.tick(1.0).unwrap(), 3);
    assert!(sim.tick(0.0).unwrap() <= 1);
}

#[test]
fn test_frame_scaled_mode() {
    let config = seeded(3).with_time_mode(TimeMode::FrameScaled).with_time_step(0.5);
    let mut sim = Simulation::new(config).unwrap();

    assert_eq!(sim.tick(0.0).unwrap(), 0);
    assert_eq!(sim.tick(0.1).unwrap(), 1);
    assert!((sim.simulated_time() - 0.05).abs() < 1e-12);
}

#[test]
fn test_with_bodies_overrides_count() {
    let bodies = vec![
        Body::at_rest(DVec3::new(-1.0, 0.0, 0.0), Mass::new(1.0)),
        Body::at_rest(DVec3::new(1.0, 0.0, 0.0), Mass::new(1.0)),
    ];
    let sim = Simulation::with_bodies(seeded(99), bodies.clone()).unwrap();

    assert_eq!(sim.config().body_count, 2);
    assert_eq!(sim.bodies(), &bodies[..]);

    assert!(matches!(
        Simulation::with_bodies(seeded(3), Vec::new()),
        Err(SimError::InvalidConfig(_))
    ));
}

#[test]
fn test_config_file_roundtrip() {
    let path = std::env::temp_dir().join(format!("nbody-config-{}.json", std::process::id()));
    let config = seeded(42).with_softening(0.05).with_time_mode(TimeMode::PerFrame);

    config.save(&path).unwrap();
    let loaded = SimulationConfig::load(&path).unwrap();
    std::fs::remove_file(&path).unwrap();

    assert_eq!(loaded, config);
}

#[test]
fn test_config_load_rejects_invalid_values() {
    let path = std::env::temp_dir().join(format!("nbody-bad-config-{}.json", std::process::id()));
    std::fs::write(&path, r#"{ "time_step": -1.0 }"#).unwrap();

    let result = SimulationConfig::load(&path);
    std::fs::remove_file(&path).unwrap();

    assert!(matches!(result, Err(SimError::InvalidTimestep(_))));
}

#[test]
fn test_oversized_spawn_range_rejected_before_spawning() {
    let path = std::env::temp_dir().join(format!("nbody-wide-spawn-{}.json", std::process::id()));
    std::fs::write(&path, r#"{ "spawn": { "position_extent": 1e308 } }"#).unwrap();

    let result = SimulationConfig::load(&path);
    std::fs::remove_file(&path).unwrap();
    assert!(matches!(result, Err(SimError::InvalidConfig(_))));

    let mut config = seeded(1);
    config.spawn.velocity_min = -1e308;
    config.spawn.velocity_max = 1e308;
    assert!(matches!(Simulation::new(config), Err(SimError::InvalidConfig(_))));
}

#[test]
fn test_config_load_missing_file() {
    let result = SimulationConfig::load("/nonexistent/nbody/config.json");
    assert!(matches!(result, Err(SimError::Io(_))));
}
