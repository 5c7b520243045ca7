// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use async_trait::async_trait;
use parking_lot::Mutex;
use simtel_core::Sample;
use simtel_error::{EngineError, Result};
use simtel_exec::Sink;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;
use tokio::time::{timeout_at, Instant};

/// Records every accepted sample.
#[derive(Debug, Default)]
pub struct CollectingSink {
    samples: Mutex<Vec<Sample>>,
    notify: Notify,
}

impl CollectingSink {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn samples(&self) -> Vec<Sample> {
        self.samples.lock().clone()
    }

    /// Values received for one measurement, in arrival order.
    pub fn values_for(&self, measurement_id: &str) -> Vec<f64> {
        self.samples
            .lock()
            .iter()
            .filter(|s| s.measurement_id == measurement_id)
            .map(|s| s.value)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.samples.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Waits until at least `count` samples arrived or `timeout` elapsed,
    /// then returns everything received so far.
    pub async fn wait_for(&self, count: usize, timeout: Duration) -> Vec<Sample> {
        let deadline = Instant::now() + timeout;
        loop {
            let notified = self.notify.notified();
            {
                let samples = self.samples.lock();
                if samples.len() >= count {
                    return samples.clone();
                }
            }
            if timeout_at(deadline, notified).await.is_err() {
                return self.samples();
            }
        }
    }
}

#[async_trait]
impl Sink for CollectingSink {
    async fn accept(&self, sample: Sample) -> Result<()> {
        self.samples.lock().push(sample);
        self.notify.notify_waiters();
        Ok(())
    }
}

/// Never completes `accept`, holding the dispatcher on the first sample.
#[derive(Debug, Default)]
pub struct StallingSink {
    calls: AtomicU64,
}

impl StallingSink {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn calls(&self) -> u64 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Sink for StallingSink {
    async fn accept(&self, _sample: Sample) -> Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        std::future::pending().await
    }
}

/// Fails every `accept` with `SinkUnavailable`.
#[derive(Debug, Default)]
pub struct RejectingSink {
    calls: AtomicU64,
}

impl RejectingSink {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn calls(&self) -> u64 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Sink for RejectingSink {
    async fn accept(&self, _sample: Sample) -> Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(EngineError::sink_unavailable("sink is offline"))
    }
}
