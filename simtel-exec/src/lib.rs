// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

#![allow(clippy::multiple_crate_versions, clippy::doc_markdown)]
//! Execution layer of the simtel engine.
//!
//! A [`Supervisor`] owns one runner per active measurement.
//! Every runner ticks on its own tokio timer, normalizes its generator's
//! output and hands samples to a bounded queue that a single dispatcher task
//! drains into the configured [`Sink`]. A slow sink fills the queue and
//! causes dropped samples, never delayed timers.
mod logging;

pub mod config;
pub mod definition;
pub mod dispatcher;
pub mod events;
pub mod runner;
pub mod sink;
pub mod supervisor;

pub use config::EngineConfig;
pub use definition::DefinitionChange;
pub use dispatcher::SinkStats;
pub use events::EngineEvent;
pub use runner::{RunnerHealth, RunnerState};
pub use sink::{ChannelSink, Sink, TracingSink};
pub use supervisor::Supervisor;
