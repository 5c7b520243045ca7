// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Error injection for measurement runners.

use simtel_generator::{GeneratorError, Waveform};
use std::collections::BTreeSet;
use std::time::Duration;

/// A value source that fails on chosen ticks.
///
/// Ticks are counted from zero in call order. On every other tick the wave
/// returns a constant value.
///
/// # Examples
///
/// ```rust
/// use simtel_generator::Waveform;
/// use simtel_test_utils::FailingWaveform;
/// use std::time::Duration;
///
/// let mut wave = FailingWaveform::constant(7.0).failing_on([1]);
///
/// assert_eq!(wave.next_value(Duration::ZERO), Ok(7.0));
/// assert!(wave.next_value(Duration::ZERO).is_err());
/// assert_eq!(wave.next_value(Duration::ZERO), Ok(7.0));
/// ```
#[derive(Debug, Clone)]
pub struct FailingWaveform {
    value: f64,
    fail_on: BTreeSet<u64>,
    fail_always: bool,
    panic_always: bool,
    tick: u64,
}

impl FailingWaveform {
    /// Never fails.
    pub fn constant(value: f64) -> Self {
        Self {
            value,
            fail_on: BTreeSet::new(),
            fail_always: false,
            panic_always: false,
            tick: 0,
        }
    }

    /// Fails on every tick.
    pub fn always() -> Self {
        Self {
            fail_always: true,
            ..Self::constant(0.0)
        }
    }

    /// Panics on every tick instead of returning an error.
    pub fn panicking() -> Self {
        Self {
            panic_always: true,
            ..Self::constant(0.0)
        }
    }

    /// Additionally fails on the given tick indices.
    pub fn failing_on(mut self, ticks: impl IntoIterator<Item = u64>) -> Self {
        self.fail_on.extend(ticks);
        self
    }

    /// Number of calls so far.
    pub fn ticks(&self) -> u64 {
        self.tick
    }
}

impl Waveform for FailingWaveform {
    fn next_value(&mut self, _elapsed: Duration) -> Result<f64, GeneratorError> {
        let tick = self.tick;
        self.tick += 1;
        if self.panic_always {
            panic!("injected panic on tick {tick}");
        }
        if self.fail_always || self.fail_on.contains(&tick) {
            Err(GeneratorError::source(format!("injected failure on tick {tick}")))
        } else {
            Ok(self.value)
        }
    }
}
