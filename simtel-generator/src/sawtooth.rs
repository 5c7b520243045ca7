// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::error::GeneratorError;
use crate::waveform::{seconds, Waveform};
use core::f64::consts::TAU;
use core::time::Duration;

/// Linear ramp from `-amplitude` to `+amplitude` repeating every `2π / angular_frequency` seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sawtooth {
    pub amplitude: f64,
    pub angular_frequency: f64,
    pub phase: f64,
}

impl Sawtooth {
    pub const fn new(amplitude: f64, angular_frequency: f64, phase: f64) -> Self {
        Self {
            amplitude,
            angular_frequency,
            phase,
        }
    }

    /// Raw value at `elapsed`; identical inputs always give identical output.
    pub fn value_at(&self, elapsed: Duration) -> f64 {
        let cycles = self.angular_frequency * seconds(elapsed) / TAU + self.phase / TAU;
        let fraction = cycles - cycles.floor();
        self.amplitude * (2.0 * fraction - 1.0)
    }
}

impl Waveform for Sawtooth {
    fn next_value(&mut self, elapsed: Duration) -> Result<f64, GeneratorError> {
        Ok(self.value_at(elapsed))
    }
}
