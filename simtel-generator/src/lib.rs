// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

#![allow(clippy::multiple_crate_versions, clippy::doc_markdown)]
//! Generator variants and sample normalization.
//!
//! Every variant maps the time elapsed since its runner started to a raw
//! value. [`SineWave`] and [`Sawtooth`] are pure functions of elapsed time,
//! [`Replay`] owns a cursor, and [`RandomGenerator`] owns its random source.
//! [`normalize`] turns a raw value into the emitted one.
pub mod error;
pub mod generator;
pub mod normalize;
pub mod random;
pub mod replay;
pub mod sawtooth;
pub mod sine;
pub mod waveform;

pub use self::error::GeneratorError;
pub use self::generator::Generator;
pub use self::normalize::{clamp, normalize, round_to};
pub use self::random::RandomGenerator;
pub use self::replay::Replay;
pub use self::sawtooth::Sawtooth;
pub use self::sine::SineWave;
pub use self::waveform::{checked, Waveform};
