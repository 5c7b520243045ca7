// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use serde::{Deserialize, Serialize};
use simtel_core::{Measurement, Model};

/// A change notification from the definition source.
///
/// Serialized with an internal `kind` tag:
///
/// ```json
/// { "kind": "removeAsset", "assetId": "press-7" }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum DefinitionChange {
    /// A measurement was created or re-submitted
    Upsert { measurement: Measurement },
    /// A whole model was created or re-submitted
    UpsertModel { model: Model },
    /// A property and its measurement were deleted
    Remove { measurement_id: String },
    RemoveModel { model_id: String },
    RemoveAsset { asset_id: String },
    RemoveFactory { factory_id: String },
}

impl DefinitionChange {
    pub fn upsert(measurement: Measurement) -> Self {
        Self::Upsert { measurement }
    }

    pub fn remove(measurement_id: impl Into<String>) -> Self {
        Self::Remove {
            measurement_id: measurement_id.into(),
        }
    }
}
