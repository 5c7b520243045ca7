// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Bounded hand-off between runners and the sink.

use crate::logging::{debug, warn};
use crate::sink::Sink;
use simtel_core::Sample;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Delivery counters across all runners of a supervisor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SinkStats {
    /// Accepted by the sink
    pub delivered: u64,
    /// Refused by the sink with an error
    pub rejected: u64,
    /// Never queued because the queue was full or closed
    pub dropped: u64,
    /// Queued, then skipped because their runner was stopped first
    pub discarded: u64,
}

#[derive(Debug, Default)]
pub(crate) struct SinkCounters {
    delivered: AtomicU64,
    rejected: AtomicU64,
    dropped: AtomicU64,
    discarded: AtomicU64,
}

impl SinkCounters {
    pub(crate) fn snapshot(&self) -> SinkStats {
        SinkStats {
            delivered: self.delivered.load(Ordering::Relaxed),
            rejected: self.rejected.load(Ordering::Relaxed),
            dropped: self.dropped.load(Ordering::Relaxed),
            discarded: self.discarded.load(Ordering::Relaxed),
        }
    }
}

/// A queued sample together with its runner's liveness token.
#[derive(Debug)]
pub(crate) struct Envelope {
    pub(crate) sample: Sample,
    pub(crate) live: CancellationToken,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Offer {
    Queued,
    Full,
    Closed,
}

/// Non-blocking producer side of the queue, cloned into every runner.
#[derive(Debug, Clone)]
pub(crate) struct SampleQueue {
    tx: mpsc::Sender<Envelope>,
    counters: Arc<SinkCounters>,
}

impl SampleQueue {
    pub(crate) fn offer(&self, envelope: Envelope) -> Offer {
        match self.tx.try_send(envelope) {
            Ok(()) => Offer::Queued,
            Err(TrySendError::Full(_)) => {
                self.counters.dropped.fetch_add(1, Ordering::Relaxed);
                Offer::Full
            }
            Err(TrySendError::Closed(_)) => {
                self.counters.dropped.fetch_add(1, Ordering::Relaxed);
                Offer::Closed
            }
        }
    }
}

/// The task draining the queue into the sink.
#[derive(Debug)]
pub(crate) struct Dispatcher {
    cancel: CancellationToken,
    handle: Option<JoinHandle<()>>,
}

impl Dispatcher {
    pub(crate) fn spawn(
        runtime: &Handle,
        sink: Arc<dyn Sink>,
        capacity: usize,
        counters: Arc<SinkCounters>,
    ) -> (SampleQueue, Self) {
        let (tx, rx) = mpsc::channel(capacity);
        let cancel = CancellationToken::new();
        let handle = runtime.spawn(run(rx, sink, Arc::clone(&counters), cancel.clone()));
        (
            SampleQueue { tx, counters },
            Self {
                cancel,
                handle: Some(handle),
            },
        )
    }

    pub(crate) fn cancel(&self) {
        self.cancel.cancel();
    }

    pub(crate) async fn join(&mut self) {
        if let Some(handle) = self.handle.take() {
            let _ = handle.await;
        }
    }
}

impl Drop for Dispatcher {
    fn drop(&mut self) {
        self.cancel.cancel();
        if let Some(handle) = &self.handle {
            handle.abort();
        }
    }
}

async fn run(
    mut rx: mpsc::Receiver<Envelope>,
    sink: Arc<dyn Sink>,
    counters: Arc<SinkCounters>,
    cancel: CancellationToken,
) {
    loop {
        let envelope = tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            envelope = rx.recv() => envelope,
        };
        let Some(Envelope { sample, live }) = envelope else {
            break;
        };

        if live.is_cancelled() {
            counters.discarded.fetch_add(1, Ordering::Relaxed);
            continue;
        }

        let measurement_id = sample.measurement_id.clone();
        let outcome = tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            outcome = sink.accept(sample) => outcome,
        };
        match outcome {
            Ok(()) => {
                counters.delivered.fetch_add(1, Ordering::Relaxed);
            }
            Err(error) => {
                counters.rejected.fetch_add(1, Ordering::Relaxed);
                warn!("sink rejected sample of measurement '{}': {}", measurement_id, error);
            }
        }
    }
    debug!("sample dispatcher stopped");
}
