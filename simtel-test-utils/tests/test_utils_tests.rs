// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use simtel_core::{GeneratorKind, Sample};
use simtel_exec::Sink;
use simtel_generator::Waveform;
use simtel_test_utils::{
    random_measurement, replay_measurement, sawtooth_measurement, sine_measurement,
    CollectingSink, FailingWaveform, MeasurementBuilder, RejectingSink,
};
use std::time::Duration;

#[test]
fn test_fixtures_are_valid() -> anyhow::Result<()> {
    for measurement in [
        random_measurement("r"),
        sine_measurement("s"),
        sawtooth_measurement("w"),
        replay_measurement("p"),
    ] {
        measurement.validate()?;
    }
    Ok(())
}

#[test]
fn test_builder_overrides_ownership() {
    let measurement = MeasurementBuilder::new("m1")
        .property("pressure")
        .model("press")
        .factory("plant-b")
        .asset("press-7")
        .build(GeneratorKind::Random);

    assert_eq!(measurement.property_id, "pressure");
    assert_eq!(measurement.model_id, "press");
    assert_eq!(measurement.factory_id, "plant-b");
    assert_eq!(measurement.asset_id.as_deref(), Some("press-7"));
}

#[test]
fn test_failing_waveform_always_fails() {
    let mut wave = FailingWaveform::always();

    for _ in 0..5 {
        assert!(wave.next_value(Duration::ZERO).is_err());
    }
    assert_eq!(wave.ticks(), 5);
}

#[tokio::test(start_paused = true)]
async fn test_collecting_sink_wait_for_returns_once_enough_arrived() -> anyhow::Result<()> {
    // Arrange
    let sink = CollectingSink::new();
    let measurement = replay_measurement("m1");

    // Act
    let collector = tokio::spawn({
        let sink = sink.clone();
        async move { sink.wait_for(2, Duration::from_secs(1)).await }
    });
    sink.accept(Sample::for_measurement(&measurement, 1, 1.0)).await?;
    sink.accept(Sample::for_measurement(&measurement, 2, 2.0)).await?;
    let samples = collector.await?;

    // Assert
    assert_eq!(samples.len(), 2);
    assert_eq!(sink.values_for("m1"), vec![1.0, 2.0]);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_collecting_sink_wait_for_times_out() {
    let sink = CollectingSink::new();

    let samples = sink.wait_for(1, Duration::from_millis(100)).await;

    assert!(samples.is_empty());
}

#[tokio::test]
async fn test_rejecting_sink_counts_calls() {
    let sink = RejectingSink::new();
    let measurement = random_measurement("m1");

    let result = sink.accept(Sample::for_measurement(&measurement, 0, 1.0)).await;

    assert!(result.is_err());
    assert_eq!(sink.calls(), 1);
}
