// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Test utilities and fixtures for the simtel engine.
//!
//! Intended for development and testing only.
//!
//! # Key Types
//!
//! - Measurement fixtures matching common scenarios, plus [`MeasurementBuilder`]
//!   for custom identities
//! - Sinks with controlled behavior: [`CollectingSink`] records everything,
//!   [`StallingSink`] never returns, [`RejectingSink`] always fails
//! - [`FailingWaveform`] for injecting generator failures on chosen ticks
//!
//! # Example
//!
//! ```rust
//! use simtel_exec::Supervisor;
//! use simtel_test_utils::{replay_measurement, CollectingSink};
//! use std::time::Duration;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> simtel_error::Result<()> {
//! let sink = CollectingSink::new();
//! let supervisor = Supervisor::new(sink.clone())?;
//! supervisor.upsert(replay_measurement("m1"))?;
//!
//! let samples = sink.wait_for(3, Duration::from_secs(5)).await;
//! let values: Vec<f64> = samples.iter().map(|s| s.value).collect();
//! assert_eq!(values, vec![1.0, 2.0, 3.0]);
//! # supervisor.shutdown().await;
//! # Ok(())
//! # }
//! ```

#![allow(clippy::multiple_crate_versions, clippy::doc_markdown)]
pub mod failing_waveform;
pub mod fixtures;
pub mod helpers;
pub mod sinks;

pub use failing_waveform::FailingWaveform;
pub use fixtures::{
    model_of, random_measurement, replay_measurement, sawtooth_measurement, sine_measurement,
    MeasurementBuilder,
};
pub use helpers::{drain_events, values_of};
pub use sinks::{CollectingSink, RejectingSink, StallingSink};
