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
//! Error types
//!
//! Precondition violations (an empty body set, a non-positive timestep,
//! an out-of-range parameter) are surfaced to the caller as `SimError`.
//! Non-finite numerical results are not errors: they are logged and left
//! in the state for the caller to inspect.

use std::fmt;

/// Errors produced by the simulation
#[derive(Debug)]
pub enum SimError {
    /// A step was requested on a system with no bodies.
    EmptySystem,
    /// The timestep was zero, negative, NaN or infinite.
    InvalidTimestep(f64),
    /// A configuration value was out of range.
    InvalidConfig(String),
    /// Failed to read or write a configuration file.
    Io(std::io::Error),
    /// Failed to encode or decode a configuration file.
    Serialization(serde_json::Error),
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimError::EmptySystem => write!(f, "Cannot step a system with no bodies"),
            SimError::InvalidTimestep(dt) => {
                write!(f, "Invalid timestep: {}. Must be positive and finite.", dt)
            }
            SimError::InvalidConfig(msg) => write!(f, "Invalid configuration: {}", msg),
            SimError::Io(e) => write!(f, "Failed to access configuration file: {}", e),
            SimError::Serialization(e) => write!(f, "Failed to parse configuration: {}", e),
        }
    }
}

impl std::error::Error for SimError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SimError::Io(e) => Some(e),
            SimError::Serialization(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for SimError {
    fn from(e: std::io::Error) -> Self {
        SimError::Io(e)
    }
}

impl From<serde_json::Error> for SimError {
    fn from(e: serde_json::Error) -> Self {
        SimError::Serialization(e)
    }
}
