// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::error::GeneratorError;
use crate::random::RandomGenerator;
use crate::replay::Replay;
use crate::sawtooth::Sawtooth;
use crate::sine::SineWave;
use crate::waveform::Waveform;
use core::time::Duration;
use simtel_core::{GeneratorKind, Measurement, Parameter};

/// The generator variant selected by a measurement's `generatorFunction`.
///
/// # Example
///
/// ```rust
/// use core::time::Duration;
/// use simtel_core::{GeneratorKind, Measurement};
/// use simtel_generator::{Generator, Waveform};
///
/// let measurement = Measurement::new("m", "p", "model", "f", GeneratorKind::Replay)
///     .with_bounds(0.0, 5.0)
///     .with_replay_sequence(vec![1.0, 2.0]);
/// let mut generator = Generator::from_measurement(&measurement).unwrap();
///
/// assert_eq!(generator.next_value(Duration::ZERO), Ok(1.0));
/// assert_eq!(generator.next_value(Duration::ZERO), Ok(2.0));
/// assert_eq!(generator.next_value(Duration::ZERO), Ok(1.0));
/// ```
#[derive(Debug, Clone)]
pub enum Generator {
    /// Independent uniform draws within the bounds
    Random(RandomGenerator),
    /// Sine wave over elapsed time
    Sine(SineWave),
    /// Linear ramp over elapsed time, repeating every period
    Sawtooth(Sawtooth),
    /// Cycles through a recorded sequence, one element per tick
    Replay(Replay),
}

impl Generator {
    /// Builds the variant for `measurement`.
    ///
    /// The definition is expected to have passed `Measurement::validate`; an
    /// absent optional `phase` defaults to `0`.
    ///
    /// # Errors
    /// Returns [`GeneratorError::MissingParameter`] if a required parameter is absent.
    pub fn from_measurement(measurement: &Measurement) -> Result<Self, GeneratorError> {
        let require = |value: Option<f64>, parameter| {
            value.ok_or(GeneratorError::MissingParameter { parameter })
        };

        let generator = match measurement.generator_function {
            GeneratorKind::Random => Self::Random(RandomGenerator::new(
                measurement.lower_bound,
                measurement.upper_bound,
            )),
            GeneratorKind::Sine => Self::Sine(SineWave::new(
                require(measurement.amplitude, Parameter::Amplitude)?,
                require(measurement.angular_frequency, Parameter::AngularFrequency)?,
                measurement.phase.unwrap_or(0.0),
            )),
            GeneratorKind::Sawtooth => Self::Sawtooth(Sawtooth::new(
                require(measurement.amplitude, Parameter::Amplitude)?,
                require(measurement.angular_frequency, Parameter::AngularFrequency)?,
                measurement.phase.unwrap_or(0.0),
            )),
            GeneratorKind::Replay => {
                let sequence = measurement
                    .replay_sequence
                    .clone()
                    .filter(|sequence| !sequence.is_empty())
                    .ok_or(GeneratorError::MissingParameter {
                        parameter: Parameter::ReplaySequence,
                    })?;
                Self::Replay(Replay::new(sequence))
            }
        };
        Ok(generator)
    }

    pub const fn kind(&self) -> GeneratorKind {
        match self {
            Self::Random(_) => GeneratorKind::Random,
            Self::Sine(_) => GeneratorKind::Sine,
            Self::Sawtooth(_) => GeneratorKind::Sawtooth,
            Self::Replay(_) => GeneratorKind::Replay,
        }
    }
}

impl Waveform for Generator {
    fn next_value(&mut self, elapsed: Duration) -> Result<f64, GeneratorError> {
        match self {
            Self::Random(generator) => generator.next_value(elapsed),
            Self::Sine(generator) => generator.next_value(elapsed),
            Self::Sawtooth(generator) => generator.next_value(elapsed),
            Self::Replay(generator) => generator.next_value(elapsed),
        }
    }
}
