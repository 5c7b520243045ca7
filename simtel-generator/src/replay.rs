// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::error::GeneratorError;
use crate::waveform::Waveform;
use core::time::Duration;

/// Replays a recorded sequence one element per tick, wrapping to the start forever.
#[derive(Debug, Clone, PartialEq)]
pub struct Replay {
    sequence: Vec<f64>,
    cursor: usize,
}

impl Replay {
    pub fn new(sequence: impl Into<Vec<f64>>) -> Self {
        Self::with_offset(sequence, 0)
    }

    /// Starts the cursor at `offset` modulo the sequence length.
    pub fn with_offset(sequence: impl Into<Vec<f64>>, offset: usize) -> Self {
        let sequence = sequence.into();
        let cursor = offset.checked_rem(sequence.len()).unwrap_or(0);
        Self { sequence, cursor }
    }

    /// Index of the element the next tick will emit.
    pub const fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }

    /// Value emitted at tick `tick` of a replay started at offset 0.
    pub fn value_at_tick(&self, tick: u64) -> Option<f64> {
        let len = u64::try_from(self.sequence.len()).ok()?;
        let index = usize::try_from(tick.checked_rem(len)?).ok()?;
        self.sequence.get(index).copied()
    }
}

impl Waveform for Replay {
    fn next_value(&mut self, _elapsed: Duration) -> Result<f64, GeneratorError> {
        let value = *self
            .sequence
            .get(self.cursor)
            .ok_or(GeneratorError::EmptySequence)?;
        self.cursor = (self.cursor + 1) % self.sequence.len();
        Ok(value)
    }
}
