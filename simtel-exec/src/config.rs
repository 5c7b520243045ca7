// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use serde::{Deserialize, Serialize};
use simtel_error::{EngineError, Result};
use std::path::Path;

/// Tuning knobs of a [`Supervisor`](crate::Supervisor).
///
/// ```toml
/// queue_capacity = 4096
/// max_consecutive_failures = 3
/// event_capacity = 256
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Samples buffered between runners and the sink before new ones are dropped
    pub queue_capacity: usize,
    /// Tick failures in a row after which a runner stops with `RunnerFailed`
    pub max_consecutive_failures: u32,
    /// Events buffered per subscriber before slow subscribers start lagging
    pub event_capacity: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            queue_capacity: 1024,
            max_consecutive_failures: 3,
            event_capacity: 256,
        }
    }
}

impl EngineConfig {
    /// Parse and validate a TOML document. Missing keys take their defaults.
    ///
    /// # Errors
    /// Returns `InvalidConfig` on malformed TOML, unknown keys or invalid values.
    pub fn from_toml_str(toml: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(toml).map_err(|e| EngineError::invalid_config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    /// Returns `InvalidConfig` if the file cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let toml = std::fs::read_to_string(path)
            .map_err(|e| EngineError::invalid_config(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&toml)
    }

    /// # Errors
    /// Returns `InvalidConfig` naming the first zero-valued setting.
    pub fn validate(&self) -> Result<()> {
        if self.queue_capacity == 0 {
            return Err(EngineError::invalid_config("queue_capacity must be at least 1"));
        }
        if self.max_consecutive_failures == 0 {
            return Err(EngineError::invalid_config(
                "max_consecutive_failures must be at least 1",
            ));
        }
        if self.event_capacity == 0 {
            return Err(EngineError::invalid_config("event_capacity must be at least 1"));
        }
        Ok(())
    }

    pub fn with_queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = capacity;
        self
    }

    pub fn with_max_consecutive_failures(mut self, failures: u32) -> Self {
        self.max_consecutive_failures = failures;
        self
    }

    pub fn with_event_capacity(mut self, capacity: usize) -> Self {
        self.event_capacity = capacity;
        self
    }
}
