// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::error::GeneratorError;
use crate::waveform::{seconds, Waveform};
use core::time::Duration;

/// `amplitude * sin(angular_frequency * t + phase)`, with `t` in seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SineWave {
    pub amplitude: f64,
    pub angular_frequency: f64,
    pub phase: f64,
}

impl SineWave {
    pub const fn new(amplitude: f64, angular_frequency: f64, phase: f64) -> Self {
        Self {
            amplitude,
            angular_frequency,
            phase,
        }
    }

    /// Raw value at `elapsed`; identical inputs always give identical output.
    pub fn value_at(&self, elapsed: Duration) -> f64 {
        self.amplitude * (self.angular_frequency * seconds(elapsed) + self.phase).sin()
    }
}

impl Waveform for SineWave {
    fn next_value(&mut self, elapsed: Duration) -> Result<f64, GeneratorError> {
        Ok(self.value_at(elapsed))
    }
}
