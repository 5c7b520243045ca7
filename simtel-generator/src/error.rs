// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use simtel_core::Parameter;

/// Failure of a single generator call
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GeneratorError {
    /// Replay was asked for a value with nothing to replay
    #[error("replay sequence is empty")]
    EmptySequence,

    /// The generator produced NaN or an infinity
    #[error("generator produced a non-finite value ({value})")]
    NonFinite {
        /// The offending raw value
        value: f64,
    },

    /// A parameter the variant needs was absent from the definition
    #[error("missing required parameter '{parameter}'")]
    MissingParameter {
        /// The absent parameter
        parameter: Parameter,
    },

    /// Failure reported by a custom value source
    #[error("{message}")]
    Source {
        /// Description of the failure
        message: String,
    },
}

impl GeneratorError {
    /// Create a failure for a custom value source
    pub fn source(message: impl Into<String>) -> Self {
        Self::Source {
            message: message.into(),
        }
    }
}
