// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use core::f64::consts::{FRAC_PI_2, PI, TAU};
use core::time::Duration;
use simtel_core::{GeneratorKind, Measurement, Parameter};
use simtel_generator::{
    checked, normalize, Generator, GeneratorError, RandomGenerator, Replay, Sawtooth, SineWave,
    Waveform,
};

// Duration keeps nanoseconds, so values derived from it are compared loosely
const EPSILON: f64 = 1e-6;

fn secs(seconds: f64) -> Duration {
    Duration::from_secs_f64(seconds)
}

// ============================================================================
// SineWave
// ============================================================================

#[test]
fn test_sine_starts_at_zero_without_phase() {
    let sine = SineWave::new(10.0, 1.0, 0.0);

    assert_eq!(sine.value_at(Duration::ZERO), 0.0);
}

#[test]
fn test_sine_peaks_at_quarter_period() {
    // Arrange
    let sine = SineWave::new(10.0, 1.0, 0.0);

    // Act
    let raw = sine.value_at(secs(FRAC_PI_2));

    // Assert
    assert!((raw - 10.0).abs() < EPSILON);
    assert_eq!(normalize(raw, -10.0, 10.0, 2), 10.0);
}

#[test]
fn test_sine_near_quarter_period_in_millis() {
    let sine = SineWave::new(10.0, 1.0, 0.0);

    let raw = sine.value_at(Duration::from_micros(1_570_800));

    assert_eq!(normalize(raw, -10.0, 10.0, 2), 10.0);
}

#[test]
fn test_sine_phase_shifts_wave() {
    let sine = SineWave::new(2.0, 1.0, FRAC_PI_2);

    assert!((sine.value_at(Duration::ZERO) - 2.0).abs() < EPSILON);
}

#[test]
fn test_sine_is_pure_function_of_elapsed_time() {
    let mut sine = SineWave::new(3.0, 2.5, 0.3);
    let elapsed = Duration::from_millis(1234);

    let first = sine.next_value(elapsed);
    let _ = sine.next_value(Duration::from_millis(99_999));
    let second = sine.next_value(elapsed);

    assert_eq!(first, second);
}

// ============================================================================
// Sawtooth
// ============================================================================

#[test]
fn test_sawtooth_starts_at_negative_amplitude() {
    let sawtooth = Sawtooth::new(4.0, 1.0, 0.0);

    assert_eq!(sawtooth.value_at(Duration::ZERO), -4.0);
}

#[test]
fn test_sawtooth_crosses_zero_at_half_period() {
    let sawtooth = Sawtooth::new(4.0, 1.0, 0.0);

    assert!(sawtooth.value_at(secs(PI)).abs() < EPSILON);
}

#[test]
fn test_sawtooth_ramps_linearly() {
    let sawtooth = Sawtooth::new(1.0, TAU, 0.0); // one period per second

    assert!((sawtooth.value_at(secs(0.25)) - -0.5).abs() < EPSILON);
    assert!((sawtooth.value_at(secs(0.75)) - 0.5).abs() < EPSILON);
}

#[test]
fn test_sawtooth_repeats_every_period() {
    let sawtooth = Sawtooth::new(2.0, 0.5, 0.7);
    let period = TAU / 0.5;

    for step in 0..20_u32 {
        let t = f64::from(step) * 0.37;
        let a = sawtooth.value_at(secs(t));
        let b = sawtooth.value_at(secs(t + period));
        assert!((a - b).abs() < 1e-6, "mismatch at t={t}: {a} vs {b}");
    }
}

#[test]
fn test_sawtooth_stays_within_amplitude() {
    let sawtooth = Sawtooth::new(5.0, 3.3, 1.1);

    for millis in (0..20_000).step_by(7) {
        let value = sawtooth.value_at(Duration::from_millis(millis));
        assert!((-5.0..5.0).contains(&value), "{value} at {millis} ms");
    }
}

#[test]
fn test_sawtooth_is_pure_function_of_elapsed_time() {
    let mut sawtooth = Sawtooth::new(1.5, 0.8, 0.0);
    let elapsed = Duration::from_millis(4321);

    assert_eq!(sawtooth.next_value(elapsed), sawtooth.next_value(elapsed));
}

// ============================================================================
// Replay
// ============================================================================

#[test]
fn test_replay_cycles_through_sequence() {
    let mut replay = Replay::new(vec![1.0, 2.0, 3.0]);

    let values: Vec<f64> = (0..7)
        .map(|_| replay.next_value(Duration::ZERO).unwrap())
        .collect();

    assert_eq!(values, vec![1.0, 2.0, 3.0, 1.0, 2.0, 3.0, 1.0]);
}

#[test]
fn test_replay_tick_k_equals_tick_k_mod_n() {
    let sequence = vec![4.0, 8.0, 15.0, 16.0, 23.0];
    let mut replay = Replay::new(sequence.clone());

    for tick in 0..50u64 {
        let value = replay.next_value(Duration::ZERO).unwrap();
        let index = usize::try_from(tick % 5).unwrap();
        assert_eq!(value, sequence[index]);
        assert_eq!(replay.value_at_tick(tick), Some(value));
    }
}

#[test]
fn test_replay_offset_wraps() {
    let mut replay = Replay::with_offset(vec![1.0, 2.0, 3.0], 4);

    assert_eq!(replay.cursor(), 1);
    assert_eq!(replay.next_value(Duration::ZERO), Ok(2.0));
}

#[test]
fn test_empty_replay_fails_each_tick() {
    let mut replay = Replay::new(Vec::new());

    assert_eq!(
        replay.next_value(Duration::ZERO),
        Err(GeneratorError::EmptySequence)
    );
    assert_eq!(replay.value_at_tick(3), None);
}

// ============================================================================
// Random
// ============================================================================

#[test]
fn test_random_stays_within_bounds() {
    let cases = [
        (-3.0, 7.0),
        (-f64::MAX, f64::MAX),
        (-f64::MAX, 0.0),
        (f64::MAX / 2.0, f64::MAX),
        (f64::MIN_POSITIVE, 2.0 * f64::MIN_POSITIVE),
    ];

    for (lower, upper) in cases {
        let mut random = RandomGenerator::seeded(lower, upper, 42);
        for _ in 0..5_000 {
            let value = random.next_value(Duration::ZERO).unwrap();
            assert!(
                (lower..=upper).contains(&value),
                "{value} outside [{lower}, {upper}]"
            );
        }
    }
}

#[test]
fn test_random_with_widest_bounds_spans_both_signs() {
    let mut random = RandomGenerator::seeded(-f64::MAX, f64::MAX, 9);

    let values: Vec<f64> = (0..1_000)
        .map(|_| random.next_value(Duration::ZERO).unwrap())
        .collect();

    assert!(values.iter().any(|v| *v < 0.0));
    assert!(values.iter().any(|v| *v > 0.0));
}

#[test]
fn test_generator_from_widest_random_definition() {
    let measurement = Measurement::new("m", "p", "model", "f", GeneratorKind::Random)
        .with_bounds(-f64::MAX, f64::MAX);
    assert!(measurement.validate().is_ok());

    let mut generator = Generator::from_measurement(&measurement).unwrap();
    let raw = generator.next_value(Duration::ZERO).unwrap();

    let value = normalize(raw, -f64::MAX, f64::MAX, 2);
    assert!(value.is_finite());
    assert!((-f64::MAX..=f64::MAX).contains(&value));
}

#[test]
fn test_random_is_roughly_uniform() {
    let mut random = RandomGenerator::seeded(0.0, 10.0, 1);
    let mut buckets = [0u32; 10];

    for _ in 0..20_000 {
        let value = random.next_value(Duration::ZERO).unwrap();
        let bucket = (value.floor() as usize).min(9);
        buckets[bucket] += 1;
    }

    // 2000 expected per bucket
    assert!(buckets.iter().all(|count| (1_700..2_300).contains(count)), "{buckets:?}");
}

#[test]
fn test_random_seeded_is_reproducible() {
    let mut a = RandomGenerator::seeded(0.0, 1.0, 99);
    let mut b = RandomGenerator::seeded(0.0, 1.0, 99);

    for _ in 0..10 {
        assert_eq!(a.next_value(Duration::ZERO), b.next_value(Duration::ZERO));
    }
}

#[test]
fn test_random_with_equal_bounds_returns_bound() {
    let mut random = RandomGenerator::new(5.0, 5.0);

    assert_eq!(random.next_value(Duration::ZERO), Ok(5.0));
}

// ============================================================================
// Generator
// ============================================================================

fn measurement(kind: GeneratorKind) -> Measurement {
    Measurement::new("m-1", "p-1", "model-1", "f-1", kind).with_bounds(-10.0, 10.0)
}

#[test]
fn test_generator_selects_variant_by_kind() -> anyhow::Result<()> {
    let sine = measurement(GeneratorKind::Sine)
        .with_amplitude(10.0)
        .with_angular_frequency(1.0);
    let sawtooth = measurement(GeneratorKind::Sawtooth)
        .with_amplitude(1.0)
        .with_angular_frequency(1.0)
        .with_phase(0.5);
    let replay = measurement(GeneratorKind::Replay).with_replay_sequence(vec![1.0]);

    for (definition, kind) in [
        (measurement(GeneratorKind::Random), GeneratorKind::Random),
        (sine, GeneratorKind::Sine),
        (sawtooth, GeneratorKind::Sawtooth),
        (replay, GeneratorKind::Replay),
    ] {
        assert_eq!(Generator::from_measurement(&definition)?.kind(), kind);
    }
    Ok(())
}

#[test]
fn test_generator_defaults_missing_phase_to_zero() -> anyhow::Result<()> {
    let definition = measurement(GeneratorKind::Sine)
        .with_amplitude(10.0)
        .with_angular_frequency(1.0);

    match Generator::from_measurement(&definition)? {
        Generator::Sine(sine) => assert_eq!(sine.phase, 0.0),
        other => panic!("unexpected variant {other:?}"),
    }
    Ok(())
}

#[test]
fn test_generator_reports_missing_parameter() {
    let definition = measurement(GeneratorKind::Sawtooth).with_amplitude(1.0);

    let error = Generator::from_measurement(&definition).unwrap_err();

    assert_eq!(
        error,
        GeneratorError::MissingParameter {
            parameter: Parameter::AngularFrequency
        }
    );
    assert_eq!(error.to_string(), "missing required parameter 'angularFrequency'");
}

#[test]
fn test_generator_rejects_empty_replay_sequence() {
    let definition = measurement(GeneratorKind::Replay).with_replay_sequence(vec![]);

    assert!(matches!(
        Generator::from_measurement(&definition),
        Err(GeneratorError::MissingParameter {
            parameter: Parameter::ReplaySequence
        })
    ));
}

#[test]
fn test_checked_rejects_non_finite() {
    assert_eq!(checked(1.5), Ok(1.5));
    assert!(matches!(checked(f64::NAN), Err(GeneratorError::NonFinite { .. })));
    assert!(matches!(
        checked(f64::INFINITY),
        Err(GeneratorError::NonFinite { .. })
    ));
}
