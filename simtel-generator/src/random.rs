// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::error::GeneratorError;
use crate::normalize::clamp;
use crate::waveform::Waveform;
use core::time::Duration;
use rand::distr::Uniform;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Draws each tick independently and uniformly from `[lower, upper]`.
///
/// Bounds whose span overflows `f64` (for example `[-f64::MAX, f64::MAX]`)
/// are sampled by interpolating between the bounds instead of through
/// [`Uniform`], which rejects a non-finite span.
#[derive(Debug, Clone)]
pub struct RandomGenerator {
    lower: f64,
    upper: f64,
    uniform: Option<Uniform<f64>>,
    rng: StdRng,
}

impl RandomGenerator {
    /// Seeds the generator from the operating system.
    pub fn new(lower: f64, upper: f64) -> Self {
        Self::with_rng(lower, upper, StdRng::from_os_rng())
    }

    /// Reproducible generator for a fixed seed.
    pub fn seeded(lower: f64, upper: f64, seed: u64) -> Self {
        Self::with_rng(lower, upper, StdRng::seed_from_u64(seed))
    }

    fn with_rng(lower: f64, upper: f64, rng: StdRng) -> Self {
        let uniform = if lower < upper {
            Uniform::new_inclusive(lower, upper).ok()
        } else {
            None
        };
        Self {
            lower,
            upper,
            uniform,
            rng,
        }
    }

    pub const fn bounds(&self) -> (f64, f64) {
        (self.lower, self.upper)
    }
}

impl Waveform for RandomGenerator {
    fn next_value(&mut self, _elapsed: Duration) -> Result<f64, GeneratorError> {
        if self.lower >= self.upper {
            return Ok(self.lower);
        }
        if let Some(uniform) = &self.uniform {
            return Ok(self.rng.sample(uniform));
        }
        // Each term stays within its own bound, so the sum cannot overflow.
        let t: f64 = self.rng.random_range(0.0..=1.0);
        let value = self.lower * (1.0 - t) + self.upper * t;
        Ok(clamp(value, self.lower, self.upper))
    }
}
