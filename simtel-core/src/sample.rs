// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::measurement::Measurement;
use serde::{Deserialize, Serialize};

/// One generated value, handed to the sink with the full identity of its property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sample {
    pub factory_id: String,
    pub model_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset_id: Option<String>,
    pub property_id: String,
    pub measurement_id: String,
    /// Milliseconds since the Unix epoch
    pub timestamp: u64,
    pub value: f64,
}

impl Sample {
    pub fn for_measurement(measurement: &Measurement, timestamp: u64, value: f64) -> Self {
        Self {
            factory_id: measurement.factory_id.clone(),
            model_id: measurement.model_id.clone(),
            asset_id: measurement.asset_id.clone(),
            property_id: measurement.property_id.clone(),
            measurement_id: measurement.measurement_id.clone(),
            timestamp,
            value,
        }
    }
}
