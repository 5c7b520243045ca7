// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::error::GeneratorError;
use core::time::Duration;

/// A source of raw values, called once per tick by a measurement runner.
///
/// `elapsed` is the time between the runner's start and the tick's scheduled
/// deadline, so the first tick sees `Duration::ZERO`. Implementations may
/// keep state between calls, which is owned exclusively by one runner.
pub trait Waveform: Send + 'static {
    /// Produce the raw value for the tick at `elapsed`.
    ///
    /// # Errors
    /// Returns a [`GeneratorError`] if no value can be produced for this tick.
    fn next_value(&mut self, elapsed: Duration) -> Result<f64, GeneratorError>;
}

impl<W: Waveform + ?Sized> Waveform for Box<W> {
    fn next_value(&mut self, elapsed: Duration) -> Result<f64, GeneratorError> {
        (**self).next_value(elapsed)
    }
}

/// Rejects raw values that cannot be normalized.
///
/// # Errors
/// Returns [`GeneratorError::NonFinite`] for NaN and infinities.
pub fn checked(value: f64) -> Result<f64, GeneratorError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(GeneratorError::NonFinite { value })
    }
}

// Elapsed time in seconds as used by the waveform formulas.
pub(crate) fn seconds(elapsed: Duration) -> f64 {
    elapsed.as_secs_f64()
}
