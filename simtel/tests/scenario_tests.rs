// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use simtel::prelude::*;
use simtel::RunnerHealth;
use simtel_test_utils::{
    random_measurement, replay_measurement, sawtooth_measurement, sine_measurement, values_of,
    CollectingSink, FailingWaveform, MeasurementBuilder,
};
use std::time::Duration;
use tokio::time::sleep;

const WAIT: Duration = Duration::from_secs(60);

fn health(supervisor: &Supervisor, id: &str) -> anyhow::Result<RunnerHealth> {
    supervisor
        .health(id)
        .ok_or_else(|| anyhow::anyhow!("no runner for '{id}'"))
}

#[tokio::test(start_paused = true)]
async fn test_random_with_zero_precision_emits_integers_within_bounds() -> anyhow::Result<()> {
    // Arrange
    let sink = CollectingSink::new();
    let supervisor = Supervisor::new(sink.clone())?;

    // Act
    supervisor.upsert(random_measurement("m1"))?;
    let samples = sink.wait_for(30, WAIT).await;

    // Assert
    assert_eq!(samples.len(), 30);
    for value in values_of(&samples) {
        assert_eq!(value.fract(), 0.0, "{value} is not an integer");
        assert!((0.0..=100.0).contains(&value), "{value} is out of bounds");
    }
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_sine_starts_at_zero_and_peaks_at_quarter_period() -> anyhow::Result<()> {
    // Arrange
    let sink = CollectingSink::new();
    let supervisor = Supervisor::new(sink.clone())?;
    let measurement = sine_measurement("m1").with_frequency(1571);

    // Act
    supervisor.upsert(measurement)?;
    let samples = sink.wait_for(2, WAIT).await;

    // Assert
    assert_eq!(values_of(&samples), vec![0.0, 10.0]);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_replay_cycles_through_sequence() -> anyhow::Result<()> {
    let sink = CollectingSink::new();
    let supervisor = Supervisor::new(sink.clone())?;

    supervisor.upsert(replay_measurement("m1"))?;
    let samples = sink.wait_for(7, WAIT).await;

    assert_eq!(
        values_of(&samples),
        vec![1.0, 2.0, 3.0, 1.0, 2.0, 3.0, 1.0]
    );
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_replay_values_are_clamped_and_rounded() -> anyhow::Result<()> {
    // Arrange
    let sink = CollectingSink::new();
    let supervisor = Supervisor::new(sink.clone())?;
    let measurement = replay_measurement("m1").with_replay_sequence(vec![-3.0, 2.46, 9.0]);

    // Act
    supervisor.upsert(measurement.with_precision(1))?;
    let samples = sink.wait_for(3, WAIT).await;

    // Assert
    assert_eq!(values_of(&samples), vec![0.0, 2.5, 5.0]);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_wave_generators_are_pure_functions_of_elapsed_time() -> anyhow::Result<()> {
    // Arrange
    let sink = CollectingSink::new();
    let supervisor = Supervisor::new(sink.clone())?;

    // Act
    supervisor.upsert(sawtooth_measurement("saw-a"))?;
    supervisor.upsert(sawtooth_measurement("saw-b"))?;
    supervisor.upsert(sine_measurement("sine-a"))?;
    supervisor.upsert(sine_measurement("sine-b"))?;
    sleep(Duration::from_millis(2050)).await;

    // Assert
    assert_eq!(sink.values_for("saw-a").len(), 21);
    assert_eq!(sink.values_for("saw-a"), sink.values_for("saw-b"));
    assert_eq!(sink.values_for("sine-a"), sink.values_for("sine-b"));
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_every_sample_lies_within_bounds() -> anyhow::Result<()> {
    // Arrange
    let sink = CollectingSink::new();
    let supervisor = Supervisor::new(sink.clone())?;
    let cases = [
        sawtooth_measurement("saw").with_bounds(-3.3, 7.25).with_precision(1),
        sine_measurement("sine").with_bounds(0.04, 0.06).with_precision(1),
        random_measurement("random")
            .with_bounds(-0.5, 0.5)
            .with_precision(3)
            .with_frequency(10),
        random_measurement("random-wide")
            .with_bounds(-f64::MAX, f64::MAX)
            .with_precision(3)
            .with_frequency(50),
        random_measurement("random-high")
            .with_bounds(f64::MAX / 2.0, f64::MAX)
            .with_frequency(50),
        replay_measurement("replay")
            .with_bounds(1.15, 1.25)
            .with_replay_sequence(vec![1.0, 1.149, 1.2, 1.251, 4.0])
            .with_precision(1),
    ];
    for measurement in cases.iter().cloned() {
        supervisor.upsert(measurement)?;
    }

    // Act
    sleep(Duration::from_secs(5)).await;

    // Assert
    for measurement in &cases {
        let values = sink.values_for(&measurement.measurement_id);
        assert!(!values.is_empty());
        for value in values {
            assert!(
                (measurement.lower_bound..=measurement.upper_bound).contains(&value),
                "{} emitted {value} outside [{}, {}]",
                measurement.measurement_id,
                measurement.lower_bound,
                measurement.upper_bound
            );
        }
    }
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_three_failures_stop_only_the_failing_runner() -> anyhow::Result<()> {
    // Arrange
    let sink = CollectingSink::new();
    let supervisor = Supervisor::new(sink.clone())?;
    let mut events = supervisor.subscribe();

    // Act
    supervisor.upsert_with(replay_measurement("broken"), FailingWaveform::always())?;
    supervisor.upsert(replay_measurement("healthy"))?;
    sleep(Duration::from_secs(2)).await;

    // Assert
    let broken = health(&supervisor, "broken")?;
    assert_eq!(broken.state, RunnerState::Stopped);
    assert!(matches!(
        broken.last_error,
        Some(EngineError::RunnerFailed { failures: 3, .. })
    ));

    let healthy = health(&supervisor, "healthy")?;
    assert_eq!(healthy.state, RunnerState::Running);
    assert!(healthy.ticks >= 20);

    let mut failed = Vec::new();
    while let Ok(event) = events.try_recv() {
        if let EngineEvent::RunnerFailed { error } = event {
            failed.push(error);
        }
    }
    assert_eq!(failed.len(), 1);
    assert_eq!(failed[0].measurement_id(), Some("broken"));
    assert!(failed[0].is_fatal());
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_repeated_upserts_never_leave_two_runners() -> anyhow::Result<()> {
    // Arrange
    let sink = CollectingSink::new();
    let supervisor = Supervisor::new(sink.clone())?;

    // Act
    for round in 0..10_u32 {
        let value = f64::from(round % 5);
        supervisor.upsert(replay_measurement("m1").with_replay_sequence(vec![value]))?;
        sleep(Duration::from_millis(30)).await;
    }
    let settled = sink.len();
    sleep(Duration::from_millis(1000)).await;

    // Assert
    assert_eq!(supervisor.len(), 1);
    assert_eq!(supervisor.running_count(), 1);
    // Only the last runner is still ticking, once per 100 ms.
    let fresh = sink.values_for("m1").split_off(settled);
    assert!((10..=11).contains(&fresh.len()), "{} samples", fresh.len());
    assert!(fresh.iter().all(|&v| v == 4.0));
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_many_measurements_tick_independently() -> anyhow::Result<()> {
    // Arrange
    let sink = CollectingSink::new();
    let supervisor = Supervisor::new(sink.clone())?;
    let frequencies = [10_u64, 50, 100, 250, 1000];

    // Act
    for (asset, frequency) in frequencies.iter().enumerate() {
        for property in 0..20 {
            let measurement = MeasurementBuilder::new(&format!("m-{asset}-{property}"))
                .asset(&format!("asset-{asset}"))
                .build(GeneratorKind::Random)
                .with_frequency(*frequency);
            supervisor.upsert(measurement)?;
        }
    }
    sleep(Duration::from_millis(1005)).await;

    // Assert
    assert_eq!(supervisor.running_count(), 100);
    for (asset, frequency) in frequencies.iter().enumerate() {
        let ticks = health(&supervisor, &format!("m-{asset}-0"))?.ticks;
        assert_eq!(ticks, 1000 / frequency + 1, "frequency {frequency}");
    }
    assert_eq!(supervisor.sink_stats().dropped, 0);
    Ok(())
}
