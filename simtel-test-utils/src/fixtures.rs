// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use simtel_core::{GeneratorKind, Measurement, Model, Property};

pub const FACTORY_ID: &str = "factory-1";
pub const MODEL_ID: &str = "model-1";

/// Integers in `[0, 100]`, one per second.
pub fn random_measurement(measurement_id: &str) -> Measurement {
    MeasurementBuilder::new(measurement_id).build(GeneratorKind::Random)
}

/// `10 sin(t)` with two decimals, bounded to `[-10, 10]`, every 100 ms.
pub fn sine_measurement(measurement_id: &str) -> Measurement {
    MeasurementBuilder::new(measurement_id).build(GeneratorKind::Sine)
}

/// A ramp from -10 to 10 with period 2π s, two decimals, every 100 ms.
pub fn sawtooth_measurement(measurement_id: &str) -> Measurement {
    MeasurementBuilder::new(measurement_id).build(GeneratorKind::Sawtooth)
}

/// Replays `1, 2, 3` within `[0, 5]` every 100 ms.
pub fn replay_measurement(measurement_id: &str) -> Measurement {
    MeasurementBuilder::new(measurement_id).build(GeneratorKind::Replay)
}

/// A model owning `measurements`, with one consistent property per measurement.
///
/// Model and factory ids are taken from the first measurement.
pub fn model_of(measurements: Vec<Measurement>) -> Model {
    let (model_id, factory_id) = measurements.first().map_or_else(
        || (MODEL_ID.to_string(), FACTORY_ID.to_string()),
        |m| (m.model_id.clone(), m.factory_id.clone()),
    );
    let mut model = Model::new(model_id, factory_id);
    model.properties = measurements
        .iter()
        .map(|m| Property {
            property_id: m.property_id.clone(),
            factory_id: m.factory_id.clone(),
            model_id: m.model_id.clone(),
            asset_id: m.asset_id.clone().unwrap_or_default(),
            measurement_id: m.measurement_id.clone(),
            name: m.property_id.clone(),
            unit: "unit".to_string(),
            generator_type: m.generator_function.display_name().to_string(),
        })
        .collect();
    model.measurements = measurements;
    model
}

/// Builds fixture measurements with custom ownership.
///
/// ```rust
/// use simtel_core::GeneratorKind;
/// use simtel_test_utils::MeasurementBuilder;
///
/// let m = MeasurementBuilder::new("m1")
///     .model("press")
///     .asset("press-7")
///     .build(GeneratorKind::Replay);
///
/// assert_eq!(m.model_id, "press");
/// assert_eq!(m.asset_id.as_deref(), Some("press-7"));
/// ```
#[derive(Debug, Clone)]
pub struct MeasurementBuilder {
    measurement_id: String,
    property_id: String,
    model_id: String,
    factory_id: String,
    asset_id: Option<String>,
}

impl MeasurementBuilder {
    pub fn new(measurement_id: &str) -> Self {
        Self {
            measurement_id: measurement_id.to_string(),
            property_id: format!("property-{measurement_id}"),
            model_id: MODEL_ID.to_string(),
            factory_id: FACTORY_ID.to_string(),
            asset_id: None,
        }
    }

    pub fn property(mut self, property_id: &str) -> Self {
        self.property_id = property_id.to_string();
        self
    }

    pub fn model(mut self, model_id: &str) -> Self {
        self.model_id = model_id.to_string();
        self
    }

    pub fn factory(mut self, factory_id: &str) -> Self {
        self.factory_id = factory_id.to_string();
        self
    }

    pub fn asset(mut self, asset_id: &str) -> Self {
        self.asset_id = Some(asset_id.to_string());
        self
    }

    /// A valid measurement of `kind` with the scenario parameters of the fixture functions.
    pub fn build(self, kind: GeneratorKind) -> Measurement {
        let base = Measurement::new(
            self.measurement_id,
            self.property_id,
            self.model_id,
            self.factory_id,
            kind,
        );
        let base = match self.asset_id {
            Some(asset_id) => base.with_asset(asset_id),
            None => base,
        };

        match kind {
            GeneratorKind::Random => base.with_bounds(0.0, 100.0).with_frequency(1000),
            GeneratorKind::Sine | GeneratorKind::Sawtooth => base
                .with_bounds(-10.0, 10.0)
                .with_frequency(100)
                .with_precision(2)
                .with_amplitude(10.0)
                .with_angular_frequency(1.0)
                .with_phase(0.0),
            GeneratorKind::Replay => base
                .with_bounds(0.0, 5.0)
                .with_frequency(100)
                .with_replay_sequence(vec![1.0, 2.0, 3.0]),
        }
    }
}
