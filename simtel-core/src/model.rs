// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::attribute::Attribute;
use crate::measurement::Measurement;
use crate::property::Property;
use serde::{Deserialize, Serialize};
use simtel_error::{EngineError, Result};
use std::collections::HashSet;

/// An asset model: ordered attributes and properties, and one measurement per property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Model {
    pub model_id: String,
    pub factory_id: String,
    #[serde(default)]
    pub attributes: Vec<Attribute>,
    #[serde(default)]
    pub properties: Vec<Property>,
    #[serde(default)]
    pub measurements: Vec<Measurement>,
}

impl Model {
    pub fn new(model_id: impl Into<String>, factory_id: impl Into<String>) -> Self {
        Self {
            model_id: model_id.into(),
            factory_id: factory_id.into(),
            attributes: Vec::new(),
            properties: Vec::new(),
            measurements: Vec::new(),
        }
    }

    /// Finds the measurement owned by `property`.
    pub fn measurement_for(&self, property: &Property) -> Option<&Measurement> {
        self.measurements
            .iter()
            .find(|m| m.measurement_id == property.measurement_id)
    }

    /// Checks names, the property/measurement pairing and every measurement.
    ///
    /// # Errors
    /// Returns `InvalidModel` for structural problems and `MalformedDefinition`
    /// for the first measurement that fails [`Measurement::validate`].
    pub fn validate(&self) -> Result<()> {
        let invalid = |reason: String| EngineError::invalid_model(&self.model_id, reason);

        let mut attribute_names = HashSet::new();
        for attribute in &self.attributes {
            if !attribute_names.insert(attribute.name.as_str()) {
                return Err(invalid(format!("duplicate attribute name '{}'", attribute.name)));
            }
        }

        let mut property_names = HashSet::new();
        let mut owned = HashSet::new();
        for property in &self.properties {
            if !property_names.insert(property.name.as_str()) {
                return Err(invalid(format!("duplicate property name '{}'", property.name)));
            }
            if !owned.insert(property.measurement_id.as_str()) {
                return Err(invalid(format!(
                    "measurement '{}' is bound to more than one property",
                    property.measurement_id
                )));
            }
            let measurement = self.measurement_for(property).ok_or_else(|| {
                invalid(format!(
                    "property '{}' has no measurement '{}'",
                    property.name, property.measurement_id
                ))
            })?;
            if !property.is_consistent_with(measurement) {
                return Err(invalid(format!(
                    "property '{}' (generatorType '{}') does not match measurement '{}' ({})",
                    property.name,
                    property.generator_type,
                    measurement.measurement_id,
                    measurement.generator_function
                )));
            }
        }

        let mut measurement_ids = HashSet::new();
        for measurement in &self.measurements {
            if !measurement_ids.insert(measurement.measurement_id.as_str()) {
                return Err(invalid(format!(
                    "duplicate measurement '{}'",
                    measurement.measurement_id
                )));
            }
            if !owned.contains(measurement.measurement_id.as_str()) {
                return Err(invalid(format!(
                    "measurement '{}' is not owned by any property",
                    measurement.measurement_id
                )));
            }
            measurement.validate()?;
        }

        Ok(())
    }

    /// Measurements in property order, with a missing asset id taken from the owning property.
    pub fn resolved_measurements(&self) -> Vec<Measurement> {
        self.properties
            .iter()
            .filter_map(|property| {
                let mut measurement = self.measurement_for(property)?.clone();
                if measurement.asset_id.is_none() && !property.asset_id.is_empty() {
                    measurement.asset_id = Some(property.asset_id.clone());
                }
                Some(measurement)
            })
            .collect()
    }
}
