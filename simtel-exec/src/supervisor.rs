// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::config::EngineConfig;
use crate::definition::DefinitionChange;
use crate::dispatcher::{Dispatcher, SinkCounters, SinkStats};
use crate::events::{EngineEvent, EventBus};
use crate::logging::{debug, info, warn};
use crate::runner::{MeasurementRunner, RunnerContext, RunnerHealth, RunnerState};
use crate::sink::Sink;
use futures::stream::{Stream, StreamExt};
use parking_lot::{Mutex, MutexGuard};
use simtel_core::{Measurement, Model};
use simtel_error::{EngineError, Result};
use simtel_generator::{Generator, Waveform};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;

/// Owns the set of live runners, at most one per `measurementId`.
///
/// `Supervisor` is a cheap handle; clones share the same runners. Every
/// registration and removal is serialized on one table lock, so concurrent
/// `upsert` and `remove` calls can never leave two runners alive for the
/// same measurement. Dropping the last handle stops every runner.
///
/// # Example
///
/// ```rust
/// use simtel_core::{GeneratorKind, Measurement};
/// use simtel_exec::{ChannelSink, Supervisor};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> simtel_error::Result<()> {
/// let (sink, mut samples) = ChannelSink::channel();
/// let supervisor = Supervisor::new(sink)?;
///
/// let measurement = Measurement::new("temp-1", "temp", "press", "plant-a", GeneratorKind::Random)
///     .with_bounds(20.0, 25.0)
///     .with_frequency(10);
/// supervisor.upsert(measurement)?;
///
/// let sample = samples.recv().await.expect("a sample");
/// assert!((20.0..=25.0).contains(&sample.value));
///
/// supervisor.shutdown().await;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Supervisor {
    inner: Arc<Inner>,
}

// Runners and the dispatcher cancel their tasks when dropped.
#[derive(Debug)]
struct Inner {
    table: Mutex<Table>,
    context: RunnerContext,
    counters: Arc<SinkCounters>,
    dispatcher: Mutex<Option<Dispatcher>>,
    config: EngineConfig,
}

#[derive(Debug, Default)]
struct Table {
    runners: HashMap<String, MeasurementRunner>,
    shut_down: bool,
}

impl Supervisor {
    /// Creates a supervisor with the default configuration on the current tokio runtime.
    ///
    /// # Errors
    /// Returns `RuntimeUnavailable` when called outside a tokio runtime.
    pub fn new(sink: impl Sink) -> Result<Self> {
        Self::with_config(sink, EngineConfig::default())
    }

    /// # Errors
    /// Returns `InvalidConfig` for an invalid `config`, or `RuntimeUnavailable`
    /// when called outside a tokio runtime.
    pub fn with_config(sink: impl Sink, config: EngineConfig) -> Result<Self> {
        let runtime = Handle::try_current()
            .map_err(|e| EngineError::runtime_unavailable(e.to_string()))?;
        Self::with_runtime(sink, config, runtime)
    }

    /// Creates a supervisor whose tasks run on `runtime`.
    ///
    /// # Errors
    /// Returns `InvalidConfig` for an invalid `config`.
    pub fn with_runtime(sink: impl Sink, config: EngineConfig, runtime: Handle) -> Result<Self> {
        config.validate()?;

        let counters = Arc::new(SinkCounters::default());
        let (queue, dispatcher) = Dispatcher::spawn(
            &runtime,
            Arc::new(sink),
            config.queue_capacity,
            Arc::clone(&counters),
        );
        let context = RunnerContext {
            runtime,
            queue,
            events: EventBus::new(config.event_capacity),
            max_consecutive_failures: config.max_consecutive_failures,
        };

        Ok(Self {
            inner: Arc::new(Inner {
                table: Mutex::new(Table::default()),
                context,
                counters,
                dispatcher: Mutex::new(Some(dispatcher)),
                config,
            }),
        })
    }

    /// Validates `measurement` and replaces any runner for its id with a fresh one.
    ///
    /// # Errors
    /// Returns `MalformedDefinition` without touching any existing runner if
    /// the definition is invalid, or `ShutDown` after [`shutdown`](Self::shutdown).
    pub fn upsert(&self, measurement: Measurement) -> Result<()> {
        self.ensure_open()?;
        let generator = self.build(&measurement).map_err(|e| self.reject(e))?;
        let mut table = self.lock_open()?;
        self.install(&mut table, measurement, Box::new(generator));
        Ok(())
    }

    /// Like [`upsert`](Self::upsert), with a caller-supplied value source in
    /// place of the generator named by `generatorFunction`.
    ///
    /// Bounds, precision and frequency of `measurement` still apply.
    ///
    /// # Errors
    /// Returns `MalformedDefinition` if the definition is invalid, or `ShutDown`.
    pub fn upsert_with(&self, measurement: Measurement, waveform: impl Waveform) -> Result<()> {
        self.ensure_open()?;
        measurement.validate().map_err(|e| self.reject(e))?;
        let mut table = self.lock_open()?;
        self.install(&mut table, measurement, Box::new(waveform));
        Ok(())
    }

    /// Runs every measurement of `model`, replacing runners of the same ids
    /// and stopping runners of that model the new version no longer contains.
    ///
    /// Returns the number of runners started.
    ///
    /// # Errors
    /// Returns `InvalidModel` or `MalformedDefinition` before any runner is
    /// touched if any part of the model is invalid, or `ShutDown`.
    pub fn upsert_model(&self, model: &Model) -> Result<usize> {
        self.ensure_open()?;
        model.validate().map_err(|e| self.reject(e))?;

        let mut prepared = Vec::with_capacity(model.measurements.len());
        for measurement in model.resolved_measurements() {
            let generator = self.build(&measurement).map_err(|e| self.reject(e))?;
            prepared.push((measurement, generator));
        }

        let mut table = self.lock_open()?;
        let current: HashSet<&str> = prepared
            .iter()
            .map(|(m, _)| m.measurement_id.as_str())
            .collect();
        table.runners.retain(|id, runner| {
            let stale =
                runner.measurement().model_id == model.model_id && !current.contains(id.as_str());
            if stale {
                runner.stop();
            }
            !stale
        });

        let started = prepared.len();
        for (measurement, generator) in prepared {
            self.install(&mut table, measurement, Box::new(generator));
        }
        info!("model '{}' running {} measurements", model.model_id, started);
        Ok(started)
    }

    /// Stops and discards the runner for `measurement_id`. Returns whether one existed.
    ///
    /// # Errors
    /// Returns `ShutDown` after [`shutdown`](Self::shutdown).
    pub fn remove(&self, measurement_id: &str) -> Result<bool> {
        let mut table = self.lock_open()?;
        let removed = table.runners.remove(measurement_id);
        if let Some(runner) = &removed {
            runner.stop();
        }
        Ok(removed.is_some())
    }

    /// # Errors
    /// Returns `ShutDown` after [`shutdown`](Self::shutdown).
    pub fn remove_by_model(&self, model_id: &str) -> Result<usize> {
        self.remove_matching(|m| m.model_id == model_id)
    }

    /// # Errors
    /// Returns `ShutDown` after [`shutdown`](Self::shutdown).
    pub fn remove_by_asset(&self, asset_id: &str) -> Result<usize> {
        self.remove_matching(|m| m.asset_id.as_deref() == Some(asset_id))
    }

    /// # Errors
    /// Returns `ShutDown` after [`shutdown`](Self::shutdown).
    pub fn remove_by_factory(&self, factory_id: &str) -> Result<usize> {
        self.remove_matching(|m| m.factory_id == factory_id)
    }

    /// Applies one change notification from the definition source.
    ///
    /// # Errors
    /// Propagates the error of the underlying operation.
    pub fn apply(&self, change: DefinitionChange) -> Result<()> {
        match change {
            DefinitionChange::Upsert { measurement } => self.upsert(measurement),
            DefinitionChange::UpsertModel { model } => self.upsert_model(&model).map(drop),
            DefinitionChange::Remove { measurement_id } => self.remove(&measurement_id).map(drop),
            DefinitionChange::RemoveModel { model_id } => self.remove_by_model(&model_id).map(drop),
            DefinitionChange::RemoveAsset { asset_id } => self.remove_by_asset(&asset_id).map(drop),
            DefinitionChange::RemoveFactory { factory_id } => {
                self.remove_by_factory(&factory_id).map(drop)
            }
        }
    }

    /// Applies changes from `changes` until the stream ends or `cancel` fires.
    ///
    /// Rejected definitions are logged and published as
    /// [`EngineEvent::DefinitionRejected`]; they do not end the loop.
    ///
    /// # Errors
    /// Returns `ShutDown` if the supervisor is shut down while following.
    pub async fn follow<S>(&self, changes: S, cancel: CancellationToken) -> Result<()>
    where
        S: Stream<Item = DefinitionChange> + Send,
    {
        let mut changes = std::pin::pin!(changes);
        loop {
            let change = tokio::select! {
                biased;
                () = cancel.cancelled() => break,
                change = changes.next() => change,
            };
            let Some(change) = change else {
                break;
            };

            match self.apply(change) {
                Ok(()) => {}
                Err(EngineError::ShutDown) => return Err(EngineError::ShutDown),
                Err(e) => warn!("definition change not applied: {}", e),
            }
        }
        debug!("stopped following definition changes");
        Ok(())
    }

    pub fn health(&self, measurement_id: &str) -> Option<RunnerHealth> {
        self.inner
            .table
            .lock()
            .runners
            .get(measurement_id)
            .map(MeasurementRunner::health)
    }

    /// Health of every registered runner, ordered by measurement id.
    pub fn health_report(&self) -> Vec<RunnerHealth> {
        let mut report: Vec<RunnerHealth> = self
            .inner
            .table
            .lock()
            .runners
            .values()
            .map(MeasurementRunner::health)
            .collect();
        report.sort_by(|a, b| a.measurement_id.cmp(&b.measurement_id));
        report
    }

    /// Number of registered runners, including ones stopped by repeated failures.
    pub fn len(&self) -> usize {
        self.inner.table.lock().runners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn running_count(&self) -> usize {
        self.inner
            .table
            .lock()
            .runners
            .values()
            .filter(|runner| runner.state() == RunnerState::Running)
            .count()
    }

    pub fn contains(&self, measurement_id: &str) -> bool {
        self.inner.table.lock().runners.contains_key(measurement_id)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<EngineEvent> {
        self.inner.context.events.subscribe()
    }

    pub fn sink_stats(&self) -> SinkStats {
        self.inner.counters.snapshot()
    }

    pub fn config(&self) -> &EngineConfig {
        &self.inner.config
    }

    /// Stops every runner and the dispatcher, then waits for their tasks.
    ///
    /// Idempotent. Afterwards every mutating operation returns `ShutDown`.
    pub async fn shutdown(&self) {
        let mut runners: Vec<MeasurementRunner> = {
            let mut table = self.inner.table.lock();
            table.shut_down = true;
            table.runners.drain().map(|(_, runner)| runner).collect()
        };
        for runner in &runners {
            runner.stop();
        }
        for runner in &mut runners {
            runner.join().await;
        }

        let dispatcher = self.inner.dispatcher.lock().take();
        if let Some(mut dispatcher) = dispatcher {
            dispatcher.cancel();
            dispatcher.join().await;
            info!("supervisor shut down, {} runners stopped", runners.len());
        }
    }

    fn build(&self, measurement: &Measurement) -> Result<Generator> {
        measurement.validate()?;
        Generator::from_measurement(measurement)
            .map_err(|e| EngineError::malformed(&measurement.measurement_id, e.to_string()))
    }

    fn install(
        &self,
        table: &mut Table,
        measurement: Measurement,
        waveform: Box<dyn Waveform>,
    ) {
        let id = measurement.measurement_id.clone();
        let ctx = &self.inner.context;
        let runner = match table.runners.remove(&id) {
            Some(previous) => previous.replace(measurement, waveform, ctx),
            None => {
                let mut runner = MeasurementRunner::new(measurement, waveform);
                runner.start(ctx);
                runner
            }
        };
        table.runners.insert(id, runner);
    }

    fn remove_matching(&self, matches: impl Fn(&Measurement) -> bool) -> Result<usize> {
        let mut table = self.lock_open()?;
        let mut removed = 0;
        table.runners.retain(|_, runner| {
            if matches(runner.measurement()) {
                runner.stop();
                removed += 1;
                false
            } else {
                true
            }
        });
        Ok(removed)
    }

    fn reject(&self, error: EngineError) -> EngineError {
        warn!("definition rejected: {}", error);
        self.inner
            .context
            .events
            .publish(EngineEvent::DefinitionRejected {
                error: error.clone(),
            });
        error
    }

    fn ensure_open(&self) -> Result<()> {
        self.lock_open().map(drop)
    }

    fn lock_open(&self) -> Result<MutexGuard<'_, Table>> {
        let table = self.inner.table.lock();
        if table.shut_down {
            return Err(EngineError::ShutDown);
        }
        Ok(table)
    }
}
