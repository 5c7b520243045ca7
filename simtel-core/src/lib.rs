// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

#![allow(clippy::multiple_crate_versions, clippy::doc_markdown)]
//! Data model for the simtel measurement generation engine.
//!
//! A factory asset is described by a [`Model`] owning named [`Attribute`]s and
//! [`Property`]s. Every property is bound to exactly one [`Measurement`], the
//! definition the engine turns into a live stream of [`Sample`]s.
pub mod attribute;
pub mod generator_kind;
pub mod measurement;
pub mod model;
pub mod property;
pub mod replay;
pub mod sample;

pub use self::attribute::Attribute;
pub use self::generator_kind::{GeneratorKind, Parameter};
pub use self::measurement::Measurement;
pub use self::model::Model;
pub use self::property::Property;
pub use self::replay::{parse_replay_csv, parse_replay_str};
pub use self::sample::Sample;
pub use simtel_error::{EngineError, Result};
