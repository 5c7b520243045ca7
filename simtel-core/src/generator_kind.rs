// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use core::fmt;
use core::str::FromStr;
use serde::{Deserialize, Serialize};
use simtel_error::EngineError;

/// The closed set of waveform kinds a measurement can be generated with.
///
/// Serialized as the `generatorFunction` field of a measurement definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GeneratorKind {
    Random,
    Sine,
    Sawtooth,
    Replay,
}

/// Generator-specific parameters of a measurement definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Parameter {
    Amplitude,
    AngularFrequency,
    Phase,
    ReplaySequence,
}

impl Parameter {
    /// Field name as it appears in a serialized definition
    pub const fn name(self) -> &'static str {
        match self {
            Self::Amplitude => "amplitude",
            Self::AngularFrequency => "angularFrequency",
            Self::Phase => "phase",
            Self::ReplaySequence => "replaySequence",
        }
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl GeneratorKind {
    pub const ALL: [Self; 4] = [Self::Random, Self::Sine, Self::Sawtooth, Self::Replay];

    /// Wire name used by `generatorFunction`
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Random => "random",
            Self::Sine => "sine",
            Self::Sawtooth => "sawtooth",
            Self::Replay => "replay",
        }
    }

    /// Label shown for the kind in a property's `generatorType`
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Random => "Random",
            Self::Sine => "Sine wave",
            Self::Sawtooth => "Sawtooth",
            Self::Replay => "Replay",
        }
    }

    /// Parses a `generatorType` label back into a kind.
    pub fn from_display_name(label: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.display_name().eq_ignore_ascii_case(label.trim()))
    }

    /// Parameters a definition of this kind must carry.
    pub const fn required_parameters(self) -> &'static [Parameter] {
        match self {
            Self::Random => &[],
            Self::Sine | Self::Sawtooth => &[Parameter::Amplitude, Parameter::AngularFrequency],
            Self::Replay => &[Parameter::ReplaySequence],
        }
    }

    /// Parameters a definition of this kind may carry; absent ones take their default.
    pub const fn optional_parameters(self) -> &'static [Parameter] {
        match self {
            Self::Sine | Self::Sawtooth => &[Parameter::Phase],
            Self::Random | Self::Replay => &[],
        }
    }
}

impl fmt::Display for GeneratorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GeneratorKind {
    type Err = EngineError;

    /// Accepts both the wire name (`"sine"`) and the display label (`"Sine wave"`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(trimmed))
            .or_else(|| Self::from_display_name(trimmed))
            .ok_or_else(|| EngineError::malformed("", format!("unknown generator function '{s}'")))
    }
}
