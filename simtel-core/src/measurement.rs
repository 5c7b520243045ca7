// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Measurement definitions and their validation contract.

use crate::generator_kind::{GeneratorKind, Parameter};
use serde::{Deserialize, Serialize};
use simtel_error::{EngineError, Result};

/// The generator configuration bound to one property.
///
/// A measurement is immutable from the engine's point of view: an update is a
/// full replacement of the definition, never a partial field change.
///
/// # Example
///
/// ```rust
/// use simtel_core::{GeneratorKind, Measurement};
///
/// let measurement = Measurement::new("m-1", "p-1", "model-1", "f-1", GeneratorKind::Sine)
///     .with_bounds(-10.0, 10.0)
///     .with_frequency(250)
///     .with_precision(2)
///     .with_amplitude(10.0)
///     .with_angular_frequency(1.0);
///
/// assert!(measurement.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Measurement {
    pub measurement_id: String,
    pub property_id: String,
    pub model_id: String,
    pub factory_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset_id: Option<String>,
    pub lower_bound: f64,
    pub upper_bound: f64,
    pub generator_function: GeneratorKind,
    /// Sampling interval in milliseconds
    pub frequency: u64,
    /// Number of decimal digits kept in every sample
    pub precision: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub angular_frequency: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amplitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phase: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replay_sequence: Option<Vec<f64>>,
}

impl Measurement {
    /// Creates a definition with bounds `[0, 0]`, a 1000 ms interval and no decimals.
    pub fn new(
        measurement_id: impl Into<String>,
        property_id: impl Into<String>,
        model_id: impl Into<String>,
        factory_id: impl Into<String>,
        generator_function: GeneratorKind,
    ) -> Self {
        Self {
            measurement_id: measurement_id.into(),
            property_id: property_id.into(),
            model_id: model_id.into(),
            factory_id: factory_id.into(),
            asset_id: None,
            lower_bound: 0.0,
            upper_bound: 0.0,
            generator_function,
            frequency: 1000,
            precision: 0,
            angular_frequency: None,
            amplitude: None,
            phase: None,
            replay_sequence: None,
        }
    }

    /// Parses a JSON definition and validates it.
    ///
    /// # Errors
    /// Returns `MalformedDefinition` if the payload does not deserialize or
    /// fails [`Measurement::validate`].
    pub fn from_json(json: &str) -> Result<Self> {
        let measurement: Self = serde_json::from_str(json)
            .map_err(|e| EngineError::malformed(sniff_measurement_id(json), e.to_string()))?;
        measurement.validate()?;
        Ok(measurement)
    }

    /// Serializes the definition to JSON.
    ///
    /// # Errors
    /// Returns `MalformedDefinition` if a field cannot be represented in JSON
    /// (non-finite numbers).
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self)
            .map_err(|e| EngineError::malformed(&self.measurement_id, e.to_string()))
    }

    pub fn with_asset(mut self, asset_id: impl Into<String>) -> Self {
        self.asset_id = Some(asset_id.into());
        self
    }

    pub fn with_bounds(mut self, lower_bound: f64, upper_bound: f64) -> Self {
        self.lower_bound = lower_bound;
        self.upper_bound = upper_bound;
        self
    }

    pub fn with_frequency(mut self, frequency_ms: u64) -> Self {
        self.frequency = frequency_ms;
        self
    }

    pub fn with_precision(mut self, precision: u32) -> Self {
        self.precision = precision;
        self
    }

    pub fn with_amplitude(mut self, amplitude: f64) -> Self {
        self.amplitude = Some(amplitude);
        self
    }

    pub fn with_angular_frequency(mut self, angular_frequency: f64) -> Self {
        self.angular_frequency = Some(angular_frequency);
        self
    }

    pub fn with_phase(mut self, phase: f64) -> Self {
        self.phase = Some(phase);
        self
    }

    pub fn with_replay_sequence(mut self, sequence: impl Into<Vec<f64>>) -> Self {
        self.replay_sequence = Some(sequence.into());
        self
    }

    /// Whether a generator parameter is present (and, for sequences, non-empty).
    pub fn has_parameter(&self, parameter: Parameter) -> bool {
        match parameter {
            Parameter::Amplitude => self.amplitude.is_some(),
            Parameter::AngularFrequency => self.angular_frequency.is_some(),
            Parameter::Phase => self.phase.is_some(),
            Parameter::ReplaySequence => self
                .replay_sequence
                .as_ref()
                .is_some_and(|sequence| !sequence.is_empty()),
        }
    }

    /// Checks the definition against the engine's validation contract.
    ///
    /// A definition is accepted if its identity fields are non-blank, its
    /// bounds are finite with `lowerBound <= upperBound`, `frequency >= 1`,
    /// and every parameter its generator requires is present and finite.
    /// Replay sequences must be non-empty.
    ///
    /// # Errors
    /// Returns `MalformedDefinition` describing the first violation found.
    pub fn validate(&self) -> Result<()> {
        let malformed = |reason: String| EngineError::malformed(&self.measurement_id, reason);

        let identity = [
            ("measurementId", &self.measurement_id),
            ("propertyId", &self.property_id),
            ("modelId", &self.model_id),
            ("factoryId", &self.factory_id),
        ];
        for (field, value) in identity {
            if value.trim().is_empty() {
                return Err(malformed(format!("{field} must not be empty")));
            }
        }
        if !self.lower_bound.is_finite() || !self.upper_bound.is_finite() {
            return Err(malformed("bounds must be finite numbers".to_string()));
        }
        if self.lower_bound > self.upper_bound {
            return Err(malformed(format!(
                "lowerBound {} exceeds upperBound {}",
                self.lower_bound, self.upper_bound
            )));
        }
        if self.frequency < 1 {
            return Err(malformed("frequency must be at least 1 ms".to_string()));
        }

        let kind = self.generator_function;
        for parameter in kind.required_parameters() {
            if !self.has_parameter(*parameter) {
                let reason = if *parameter == Parameter::ReplaySequence
                    && self.replay_sequence.is_some()
                {
                    "replaySequence must not be empty".to_string()
                } else {
                    format!("generator '{kind}' requires '{parameter}'")
                };
                return Err(malformed(reason));
            }
        }

        let scalars = [
            (Parameter::Amplitude, self.amplitude),
            (Parameter::AngularFrequency, self.angular_frequency),
            (Parameter::Phase, self.phase),
        ];
        for (parameter, value) in scalars {
            if value.is_some_and(|v| !v.is_finite()) {
                return Err(malformed(format!("'{parameter}' must be a finite number")));
            }
        }

        if let Some(sequence) = &self.replay_sequence {
            if let Some(index) = sequence.iter().position(|v| !v.is_finite()) {
                return Err(malformed(format!(
                    "replaySequence[{index}] must be a finite number"
                )));
            }
        }

        Ok(())
    }
}

// Best effort recovery of the id from a payload that failed to deserialize.
fn sniff_measurement_id(json: &str) -> String {
    serde_json::from_str::<serde_json::Value>(json)
        .ok()
        .and_then(|value| {
            value
                .get("measurementId")
                .and_then(serde_json::Value::as_str)
                .map(str::to_owned)
        })
        .unwrap_or_default()
}
