// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! One ticking task per active measurement.

use crate::dispatcher::{Envelope, Offer, SampleQueue};
use crate::events::{EngineEvent, EventBus};
use crate::logging::{debug, error, warn};
use parking_lot::Mutex;
use simtel_core::{Measurement, Sample};
use simtel_error::EngineError;
use simtel_generator::{checked, normalize, GeneratorError, Waveform};
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

/// Lifecycle of a runner. `Stopped` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RunnerState {
    Idle,
    Running,
    Stopped,
}

/// Point-in-time view of one runner.
#[derive(Debug, Clone, PartialEq)]
pub struct RunnerHealth {
    pub measurement_id: String,
    pub state: RunnerState,
    /// Most recent tick failure, or the `RunnerFailed` that stopped the runner
    pub last_error: Option<EngineError>,
    pub consecutive_failures: u32,
    pub ticks: u64,
    pub samples_emitted: u64,
    pub samples_dropped: u64,
}

impl RunnerHealth {
    fn idle(measurement_id: &str) -> Self {
        Self {
            measurement_id: measurement_id.to_string(),
            state: RunnerState::Idle,
            last_error: None,
            consecutive_failures: 0,
            ticks: 0,
            samples_emitted: 0,
            samples_dropped: 0,
        }
    }
}

/// Everything a runner task shares with its supervisor.
#[derive(Debug, Clone)]
pub(crate) struct RunnerContext {
    pub(crate) runtime: Handle,
    pub(crate) queue: SampleQueue,
    pub(crate) events: EventBus,
    pub(crate) max_consecutive_failures: u32,
}

/// The live execution of one measurement definition.
///
/// The definition is immutable for the lifetime of the runner; a changed
/// definition gets a fresh runner through [`MeasurementRunner::replace`].
/// Dropping a runner cancels its task.
pub(crate) struct MeasurementRunner {
    measurement: Arc<Measurement>,
    waveform: Option<Box<dyn Waveform>>,
    status: Arc<Mutex<RunnerHealth>>,
    cancel: CancellationToken,
    handle: Option<JoinHandle<()>>,
    events: Option<EventBus>,
}

impl std::fmt::Debug for MeasurementRunner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MeasurementRunner")
            .field("measurement_id", &self.measurement.measurement_id)
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}

impl MeasurementRunner {
    pub(crate) fn new(measurement: Measurement, waveform: Box<dyn Waveform>) -> Self {
        let status = RunnerHealth::idle(&measurement.measurement_id);
        Self {
            measurement: Arc::new(measurement),
            waveform: Some(waveform),
            status: Arc::new(Mutex::new(status)),
            cancel: CancellationToken::new(),
            handle: None,
            events: None,
        }
    }

    /// Arms the schedule. The first tick fires immediately with zero elapsed time.
    ///
    /// Only an `Idle` runner starts; any other state leaves the runner untouched.
    pub(crate) fn start(&mut self, ctx: &RunnerContext) {
        let Some(waveform) = self.waveform.take() else {
            return;
        };
        {
            let mut status = self.status.lock();
            if status.state != RunnerState::Idle {
                return;
            }
            status.state = RunnerState::Running;
        }

        let task = RunnerTask {
            measurement: Arc::clone(&self.measurement),
            waveform,
            status: Arc::clone(&self.status),
            queue: ctx.queue.clone(),
            events: ctx.events.clone(),
            live: self.cancel.clone(),
            max_consecutive_failures: ctx.max_consecutive_failures,
        };
        let origin = Instant::now();
        self.handle = Some(ctx.runtime.spawn(task.run(origin)));
        self.events = Some(ctx.events.clone());

        ctx.events.publish(EngineEvent::RunnerStarted {
            measurement_id: self.measurement.measurement_id.clone(),
        });
        debug!(
            "runner '{}' started ({} every {} ms)",
            self.measurement.measurement_id,
            self.measurement.generator_function,
            self.measurement.frequency
        );
    }

    /// Cancels the schedule and moves to `Stopped`. Idempotent.
    ///
    /// Once this returns the runner hands no further samples to the queue,
    /// and samples it queued earlier are discarded by the dispatcher.
    pub(crate) fn stop(&self) {
        self.cancel.cancel();
        let transitioned = {
            let mut status = self.status.lock();
            let running = status.state != RunnerState::Stopped;
            status.state = RunnerState::Stopped;
            running
        };
        if let Some(handle) = &self.handle {
            handle.abort();
        }

        if transitioned {
            if let Some(events) = &self.events {
                events.publish(EngineEvent::RunnerStopped {
                    measurement_id: self.measurement.measurement_id.clone(),
                });
            }
            debug!("runner '{}' stopped", self.measurement.measurement_id);
        }
    }

    /// Stops this runner and starts a fresh one for `measurement`.
    pub(crate) fn replace(
        self,
        measurement: Measurement,
        waveform: Box<dyn Waveform>,
        ctx: &RunnerContext,
    ) -> Self {
        self.stop();
        let mut next = Self::new(measurement, waveform);
        next.start(ctx);
        next
    }

    pub(crate) fn state(&self) -> RunnerState {
        self.status.lock().state
    }

    pub(crate) fn health(&self) -> RunnerHealth {
        self.status.lock().clone()
    }

    pub(crate) fn measurement(&self) -> &Measurement {
        &self.measurement
    }

    /// Waits for the task to finish. Call after `stop`.
    pub(crate) async fn join(&mut self) {
        if let Some(handle) = self.handle.take() {
            let _ = handle.await;
        }
    }
}

impl Drop for MeasurementRunner {
    fn drop(&mut self) {
        self.cancel.cancel();
        self.status.lock().state = RunnerState::Stopped;
        if let Some(handle) = &self.handle {
            handle.abort();
        }
    }
}

struct RunnerTask {
    measurement: Arc<Measurement>,
    waveform: Box<dyn Waveform>,
    status: Arc<Mutex<RunnerHealth>>,
    queue: SampleQueue,
    events: EventBus,
    live: CancellationToken,
    max_consecutive_failures: u32,
}

impl RunnerTask {
    async fn run(mut self, origin: Instant) {
        let period = Duration::from_millis(self.measurement.frequency.max(1));
        let mut ticker = interval_at(origin, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut clock = TickClock::default();

        loop {
            let deadline = tokio::select! {
                biased;
                () = self.live.cancelled() => break,
                deadline = ticker.tick() => deadline,
            };
            let elapsed = deadline.duration_since(origin);

            let keep_going = match self.raw_value(elapsed) {
                Ok(raw) => {
                    let m = &self.measurement;
                    let value = normalize(raw, m.lower_bound, m.upper_bound, m.precision);
                    self.emit(Sample::for_measurement(m, clock.now_millis(), value))
                }
                Err(failure) => self.record_failure(&failure.to_string()),
            };
            if !keep_going {
                break;
            }
        }
    }

    // A panicking waveform counts as a failed tick, like any other generator error.
    fn raw_value(&mut self, elapsed: Duration) -> Result<f64, GeneratorError> {
        let waveform = &mut self.waveform;
        panic::catch_unwind(AssertUnwindSafe(|| waveform.next_value(elapsed)))
            .unwrap_or_else(|payload| {
                Err(GeneratorError::source(format!(
                    "generator panicked: {}",
                    panic_message(payload.as_ref())
                )))
            })
            .and_then(checked)
    }

    // Holds the status lock across the hand-off so `stop` cannot interleave.
    fn emit(&self, sample: Sample) -> bool {
        let mut status = self.status.lock();
        if status.state != RunnerState::Running {
            return false;
        }
        status.ticks += 1;
        status.consecutive_failures = 0;

        let envelope = Envelope {
            sample,
            live: self.live.clone(),
        };
        match self.queue.offer(envelope) {
            Offer::Queued => status.samples_emitted += 1,
            Offer::Full | Offer::Closed => {
                status.samples_dropped += 1;
                debug!(
                    "{}",
                    EngineError::sink_unavailable(format!(
                        "queue full, dropped sample of measurement '{}'",
                        self.measurement.measurement_id
                    ))
                );
            }
        }
        true
    }

    fn record_failure(&self, reason: &str) -> bool {
        let id = &self.measurement.measurement_id;
        let mut status = self.status.lock();
        if status.state != RunnerState::Running {
            return false;
        }
        status.ticks += 1;
        status.consecutive_failures += 1;
        let failures = status.consecutive_failures;

        let failure = EngineError::tick_failure(id, reason);
        warn!("{} (consecutive failures: {})", failure, failures);
        status.last_error = Some(failure.clone());
        self.events.publish(EngineEvent::TickFailed {
            error: failure,
            consecutive_failures: failures,
        });

        if failures < self.max_consecutive_failures {
            return true;
        }

        let fatal = EngineError::runner_failed(id, failures, reason);
        error!("{}", fatal);
        status.state = RunnerState::Stopped;
        status.last_error = Some(fatal.clone());
        self.events.publish(EngineEvent::RunnerFailed { error: fatal });
        false
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("unknown panic payload")
}

/// Wall-clock epoch milliseconds, never decreasing within one runner.
#[derive(Debug, Default)]
struct TickClock {
    last: u64,
}

impl TickClock {
    fn now_millis(&mut self) -> u64 {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |since| u64::try_from(since.as_millis()).unwrap_or(u64::MAX));
        self.last = self.last.max(now);
        self.last
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatcher::{Dispatcher, SinkCounters};
    use crate::sink::ChannelSink;
    use simtel_core::GeneratorKind;
    use simtel_generator::{GeneratorError, Replay};
    use tokio::sync::mpsc::UnboundedReceiver;
    use tokio::time::sleep;

    struct Harness {
        ctx: RunnerContext,
        samples: UnboundedReceiver<Sample>,
        _dispatcher: Dispatcher,
    }

    fn harness(max_consecutive_failures: u32) -> Harness {
        let (sink, samples) = ChannelSink::channel();
        let counters = Arc::new(SinkCounters::default());
        let (queue, dispatcher) = Dispatcher::spawn(&Handle::current(), Arc::new(sink), 16, counters);
        Harness {
            ctx: RunnerContext {
                runtime: Handle::current(),
                queue,
                events: EventBus::new(16),
                max_consecutive_failures,
            },
            samples,
            _dispatcher: dispatcher,
        }
    }

    fn replay(values: Vec<f64>) -> Measurement {
        Measurement::new("m1", "p1", "model", "factory", GeneratorKind::Replay)
            .with_bounds(0.0, 10.0)
            .with_frequency(100)
            .with_replay_sequence(values)
    }

    struct Broken;

    impl Waveform for Broken {
        fn next_value(&mut self, _elapsed: Duration) -> Result<f64, GeneratorError> {
            Err(GeneratorError::source("sensor offline"))
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_tick_fires_at_start() -> anyhow::Result<()> {
        // Arrange
        let mut h = harness(3);
        let mut runner = MeasurementRunner::new(
            replay(vec![4.0, 5.0]),
            Box::new(Replay::new(vec![4.0, 5.0])),
        );

        // Act
        runner.start(&h.ctx);
        let first = h.samples.recv().await;

        // Assert
        assert_eq!(runner.state(), RunnerState::Running);
        assert_eq!(first.map(|s| s.value), Some(4.0));
        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_is_idempotent_and_terminal() -> anyhow::Result<()> {
        // Arrange
        let h = harness(3);
        let mut events = h.ctx.events.subscribe();
        let mut runner =
            MeasurementRunner::new(replay(vec![1.0]), Box::new(Replay::new(vec![1.0])));
        runner.start(&h.ctx);

        // Act
        runner.stop();
        runner.stop();
        runner.start(&h.ctx);

        // Assert
        assert_eq!(runner.state(), RunnerState::Stopped);
        assert!(matches!(events.try_recv(), Ok(EngineEvent::RunnerStarted { .. })));
        assert!(matches!(events.try_recv(), Ok(EngineEvent::RunnerStopped { .. })));
        assert!(events.try_recv().is_err());
        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn test_consecutive_failures_stop_runner() -> anyhow::Result<()> {
        // Arrange
        let h = harness(3);
        let mut runner = MeasurementRunner::new(replay(vec![1.0]), Box::new(Broken));

        // Act
        runner.start(&h.ctx);
        sleep(Duration::from_millis(450)).await;

        // Assert
        let health = runner.health();
        assert_eq!(health.state, RunnerState::Stopped);
        assert_eq!(health.ticks, 3);
        assert_eq!(health.consecutive_failures, 3);
        assert!(matches!(
            health.last_error,
            Some(EngineError::RunnerFailed { failures: 3, .. })
        ));
        Ok(())
    }

    #[test]
    fn test_tick_clock_never_goes_backwards() {
        let mut clock = TickClock { last: u64::MAX - 1 };

        assert_eq!(clock.now_millis(), u64::MAX - 1);
    }
}
