// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use simtel_error::EngineError;
use tokio::sync::broadcast;

/// Lifecycle and failure notifications published by a supervisor.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    RunnerStarted {
        measurement_id: String,
    },
    RunnerStopped {
        measurement_id: String,
    },
    /// A tick was skipped; the runner keeps going
    TickFailed {
        error: EngineError,
        consecutive_failures: u32,
    },
    /// The runner stopped after too many consecutive tick failures
    RunnerFailed {
        error: EngineError,
    },
    /// A definition was rejected before any runner was touched
    DefinitionRejected {
        error: EngineError,
    },
}

impl EngineEvent {
    pub fn measurement_id(&self) -> Option<&str> {
        match self {
            Self::RunnerStarted { measurement_id } | Self::RunnerStopped { measurement_id } => {
                Some(measurement_id)
            }
            Self::TickFailed { error, .. }
            | Self::RunnerFailed { error }
            | Self::DefinitionRejected { error } => error.measurement_id(),
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct EventBus {
    tx: broadcast::Sender<EngineEvent>,
}

impl EventBus {
    pub(crate) fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    pub(crate) fn subscribe(&self) -> broadcast::Receiver<EngineEvent> {
        self.tx.subscribe()
    }

    // Having no subscribers is not an error.
    pub(crate) fn publish(&self, event: EngineEvent) {
        let _ = self.tx.send(event);
    }
}
