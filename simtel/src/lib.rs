// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! # simtel
//!
//! Synthetic telemetry for modelled factory assets.
//!
//! Every property of an asset model owns one [`Measurement`]: a waveform
//! generator with bounds, a sampling interval in milliseconds, a decimal
//! precision and generator-specific parameters. A [`Supervisor`] runs one
//! independent tokio task per measurement and delivers every normalized
//! [`Sample`] to a [`Sink`].
//!
//! ## Generators
//!
//! | `generatorFunction` | Value at elapsed time `t` (seconds)                  |
//! |---------------------|------------------------------------------------------|
//! | `random`            | uniform in `[lowerBound, upperBound]`                 |
//! | `sine`              | `amplitude * sin(angularFrequency * t + phase)`       |
//! | `sawtooth`          | ramp from `-amplitude` to `amplitude`, period `2π/ω`  |
//! | `replay`            | next element of `replaySequence`, wrapping around     |
//!
//! Raw values are clamped to the bounds, rounded to `precision` decimals and
//! clamped once more, so every sample lies within the bounds.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use simtel::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> simtel::Result<()> {
//!     let (sink, mut samples) = ChannelSink::channel();
//!     let supervisor = Supervisor::new(sink)?;
//!
//!     let spindle = Measurement::new("spindle-rpm", "rpm", "lathe", "plant-a", GeneratorKind::Sine)
//!         .with_bounds(-1500.0, 1500.0)
//!         .with_frequency(250)
//!         .with_precision(1)
//!         .with_amplitude(1500.0)
//!         .with_angular_frequency(0.5);
//!     supervisor.upsert(spindle)?;
//!
//!     while let Some(sample) = samples.recv().await {
//!         println!("{} {} {}", sample.measurement_id, sample.timestamp, sample.value);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Reacting to definition changes
//!
//! The definition source notifies the engine with [`DefinitionChange`]
//! values, for example decoded from JSON. [`Supervisor::follow`] applies a
//! stream of them; definitions that fail validation are reported as
//! [`EngineEvent::DefinitionRejected`] and never touch a running measurement.

#![allow(clippy::multiple_crate_versions, clippy::doc_markdown)]

pub use simtel_core::{
    parse_replay_csv, parse_replay_str, Attribute, GeneratorKind, Measurement, Model, Parameter,
    Property, Sample,
};
pub use simtel_error::{EngineError, Result};
pub use simtel_exec::{
    ChannelSink, DefinitionChange, EngineConfig, EngineEvent, RunnerHealth, RunnerState, Sink,
    SinkStats, Supervisor, TracingSink,
};
pub use simtel_generator::{normalize, Generator, GeneratorError, Waveform};

/// Prelude module for convenient imports
pub mod prelude {
    pub use simtel_core::{GeneratorKind, Measurement, Model, Sample};
    pub use simtel_error::{EngineError, Result};
    pub use simtel_exec::{
        ChannelSink, DefinitionChange, EngineConfig, EngineEvent, RunnerState, Sink, Supervisor,
    };
    pub use simtel_generator::Waveform;
}
