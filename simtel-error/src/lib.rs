// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

#![allow(clippy::multiple_crate_versions, clippy::doc_markdown)]
//! Error types for the simtel measurement generation engine
//!
//! This crate defines the root [`EngineError`] type shared by every simtel crate.
//! Variants are grouped by how far a failure reaches:
//!
//! - Rejected input, with no effect on running generation:
//!   [`EngineError::MalformedDefinition`], [`EngineError::InvalidModel`],
//!   [`EngineError::InvalidReplaySequence`], [`EngineError::InvalidConfig`]
//! - Transient, contained inside one runner:
//!   [`EngineError::GeneratorTickFailure`], [`EngineError::SinkUnavailable`]
//! - Fatal for one runner only: [`EngineError::RunnerFailed`]
//!
//! # Examples
//!
//! ```
//! use simtel_error::{EngineError, Result};
//!
//! fn check_frequency(measurement_id: &str, frequency: u64) -> Result<()> {
//!     if frequency == 0 {
//!         return Err(EngineError::malformed(measurement_id, "frequency must be at least 1 ms"));
//!     }
//!     Ok(())
//! }
//!
//! assert!(check_frequency("m-1", 0).is_err());
//! ```

/// Root error type for all simtel operations
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EngineError {
    /// A measurement definition failed validation
    ///
    /// Returned by `upsert` before any runner is touched. The caller must
    /// fix the definition and resubmit it.
    #[error("Malformed definition for measurement '{measurement_id}': {reason}")]
    MalformedDefinition {
        /// Identity of the rejected measurement (may be empty if it could not be parsed)
        measurement_id: String,
        /// What is wrong with the definition
        reason: String,
    },

    /// A model failed structural validation
    #[error("Invalid model '{model_id}': {reason}")]
    InvalidModel {
        /// Identity of the rejected model
        model_id: String,
        /// What is wrong with the model
        reason: String,
    },

    /// A single tick's generator call failed
    ///
    /// The tick is skipped and the runner keeps scheduling.
    #[error("Generator tick failed for measurement '{measurement_id}': {reason}")]
    GeneratorTickFailure {
        /// Measurement whose tick failed
        measurement_id: String,
        /// Generator failure description
        reason: String,
    },

    /// A runner gave up after repeated tick failures
    #[error("Runner for measurement '{measurement_id}' failed after {failures} consecutive tick failures: {reason}")]
    RunnerFailed {
        /// Measurement whose runner stopped
        measurement_id: String,
        /// Number of consecutive failures that triggered the escalation
        failures: u32,
        /// Description of the last failure
        reason: String,
    },

    /// A sample could not be handed to the sink and was dropped
    #[error("Sink unavailable: {reason}")]
    SinkUnavailable {
        /// Why the sample could not be delivered
        reason: String,
    },

    /// A replay sequence could not be parsed
    #[error("Invalid replay sequence: {context}")]
    InvalidReplaySequence {
        /// Location and cause of the parse failure
        context: String,
    },

    /// Engine configuration is invalid or could not be loaded
    #[error("Invalid configuration: {context}")]
    InvalidConfig {
        /// Description of the offending setting
        context: String,
    },

    /// No async runtime was available to schedule runners on
    #[error("No async runtime available: {context}")]
    RuntimeUnavailable {
        /// Underlying runtime lookup failure
        context: String,
    },

    /// The supervisor was shut down and accepts no more work
    #[error("Supervisor has been shut down")]
    ShutDown,
}

impl EngineError {
    /// Create a malformed definition error
    pub fn malformed(measurement_id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedDefinition {
            measurement_id: measurement_id.into(),
            reason: reason.into(),
        }
    }

    /// Create an invalid model error
    pub fn invalid_model(model_id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidModel {
            model_id: model_id.into(),
            reason: reason.into(),
        }
    }

    /// Create a generator tick failure
    pub fn tick_failure(measurement_id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::GeneratorTickFailure {
            measurement_id: measurement_id.into(),
            reason: reason.into(),
        }
    }

    /// Create a runner failure
    pub fn runner_failed(
        measurement_id: impl Into<String>,
        failures: u32,
        reason: impl Into<String>,
    ) -> Self {
        Self::RunnerFailed {
            measurement_id: measurement_id.into(),
            failures,
            reason: reason.into(),
        }
    }

    /// Create a sink unavailable error
    pub fn sink_unavailable(reason: impl Into<String>) -> Self {
        Self::SinkUnavailable {
            reason: reason.into(),
        }
    }

    /// Create a replay sequence parse error
    pub fn invalid_replay(context: impl Into<String>) -> Self {
        Self::InvalidReplaySequence {
            context: context.into(),
        }
    }

    /// Create a configuration error
    pub fn invalid_config(context: impl Into<String>) -> Self {
        Self::InvalidConfig {
            context: context.into(),
        }
    }

    /// Create a runtime lookup error
    pub fn runtime_unavailable(context: impl Into<String>) -> Self {
        Self::RuntimeUnavailable {
            context: context.into(),
        }
    }

    /// Check if the failure is contained and generation continues
    ///
    /// A skipped tick or a dropped sample does not stop the runner.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::GeneratorTickFailure { .. } | Self::SinkUnavailable { .. }
        )
    }

    /// Check if the failure stopped a runner
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::RunnerFailed { .. })
    }

    /// Measurement the error refers to, if any
    #[must_use]
    pub fn measurement_id(&self) -> Option<&str> {
        match self {
            Self::MalformedDefinition { measurement_id, .. }
            | Self::GeneratorTickFailure { measurement_id, .. }
            | Self::RunnerFailed { measurement_id, .. } => Some(measurement_id),
            _ => None,
        }
    }
}

/// Specialized Result type for simtel operations
pub type Result<T> = std::result::Result<T, EngineError>;
