// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::logging::info;
use async_trait::async_trait;
use simtel_core::Sample;
use simtel_error::{EngineError, Result};
use std::sync::Arc;
use tokio::sync::mpsc;

/// The external consumer of generated samples.
///
/// A supervisor calls `accept` from a single dispatcher task, one sample at a
/// time. Implementations must be thread-safe; a slow `accept` only delays
/// delivery and never the runners' timers.
///
/// # Example
///
/// ```rust
/// use async_trait::async_trait;
/// use simtel_core::Sample;
/// use simtel_error::Result;
/// use simtel_exec::Sink;
///
/// struct Stdout;
///
/// #[async_trait]
/// impl Sink for Stdout {
///     async fn accept(&self, sample: Sample) -> Result<()> {
///         println!("{} = {}", sample.measurement_id, sample.value);
///         Ok(())
///     }
/// }
/// ```
#[async_trait]
pub trait Sink: Send + Sync + 'static {
    /// Deliver one sample.
    ///
    /// # Errors
    /// Returns `SinkUnavailable` if the sample could not be taken. The sample
    /// is dropped and counted; generation continues.
    async fn accept(&self, sample: Sample) -> Result<()>;
}

#[async_trait]
impl<S: Sink + ?Sized> Sink for Arc<S> {
    async fn accept(&self, sample: Sample) -> Result<()> {
        (**self).accept(sample).await
    }
}

/// Forwards samples into an unbounded tokio channel.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<Sample>,
}

impl ChannelSink {
    pub fn new(tx: mpsc::UnboundedSender<Sample>) -> Self {
        Self { tx }
    }

    /// Creates a sink together with the receiving end of its channel.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<Sample>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::new(tx), rx)
    }
}

#[async_trait]
impl Sink for ChannelSink {
    async fn accept(&self, sample: Sample) -> Result<()> {
        self.tx
            .send(sample)
            .map_err(|_| EngineError::sink_unavailable("channel receiver dropped"))
    }
}

/// Logs every sample at info level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

#[async_trait]
impl Sink for TracingSink {
    async fn accept(&self, sample: Sample) -> Result<()> {
        info!(
            "sample factory={} model={} asset={} property={} measurement={} timestamp={} value={}",
            sample.factory_id,
            sample.model_id,
            sample.asset_id.as_deref().unwrap_or("-"),
            sample.property_id,
            sample.measurement_id,
            sample.timestamp,
            sample.value
        );
        Ok(())
    }
}
