// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::generator_kind::GeneratorKind;
use crate::measurement::Measurement;
use serde::{Deserialize, Serialize};

/// A sensor-like quantity of an asset, bound to exactly one measurement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    pub property_id: String,
    pub factory_id: String,
    pub model_id: String,
    #[serde(default)]
    pub asset_id: String,
    pub measurement_id: String,
    pub name: String,
    pub unit: String,
    /// Display label mirroring the measurement's generator function
    pub generator_type: String,
}

impl Property {
    /// Kind named by `generator_type`, accepting display labels and wire names.
    pub fn generator_kind(&self) -> Option<GeneratorKind> {
        self.generator_type.parse().ok()
    }

    /// Whether `measurement` is the one this property owns and uses the same generator.
    pub fn is_consistent_with(&self, measurement: &Measurement) -> bool {
        measurement.measurement_id == self.measurement_id
            && measurement.property_id == self.property_id
            && measurement.model_id == self.model_id
            && measurement.factory_id == self.factory_id
            && self.generator_kind() == Some(measurement.generator_function)
    }
}
