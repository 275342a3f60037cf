use fronthaul_capacity::domain::aligner::trace::{PacketRecord, RawCellTraces, ThroughputRecord};
use fronthaul_capacity::domain::aligner::{align, align_cells};
use fronthaul_capacity::domain::config::AlignerConfig;
use fronthaul_capacity::domain::utils::id::CellId;
use fronthaul_capacity::error::Error;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const SAMPLES: usize = 2000;
const STEP_SEC: f64 = 0.01;

/// Throughput sampled every 10 ms with packet accounting lagging by
/// `lag_sec`. Packet loss mirrors the throughput counter exactly.
fn lagged_traces(seed: u64, lag_sec: f64) -> RawCellTraces {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut traces = RawCellTraces::default();

    for i in 0..SAMPLES {
        let t = i as f64 * STEP_SEC;
        let kbits: f64 = rng.random_range(10.0..50.0);
        traces.throughput.push(ThroughputRecord { timestamp: t, kbits });
        traces.packets.push(PacketRecord { timestamp: t + lag_sec, tx: kbits + 100.0, rx: 100.0, too_late: 0.0 });
    }

    traces
}

#[test]
fn test_align_recovers_known_lag() {
    let traces = lagged_traces(7, 0.5);

    let outcome = align(CellId::new("1"), &traces, &AlignerConfig::default()).expect("alignment should succeed");

    assert!((outcome.shift_sec - 0.5).abs() < 0.025, "Expected a shift of 0.5s, got {}", outcome.shift_sec);
    assert!(outcome.correlation > 0.99, "Correlation at the true lag should be near 1, got {}", outcome.correlation);
    assert_eq!(outcome.spikes_removed, 0);
    assert_eq!(outcome.series.len(), SAMPLES);
    assert_eq!(outcome.series.cell(), &CellId::new("1"));
}

#[test]
fn test_align_recovers_negative_lag() {
    let traces = lagged_traces(11, -0.25);

    let outcome = align(CellId::new("2"), &traces, &AlignerConfig::default()).expect("alignment should succeed");

    assert!((outcome.shift_sec + 0.25).abs() < 0.025, "Expected a shift of -0.25s, got {}", outcome.shift_sec);
}

#[test]
fn test_aligned_loss_follows_throughput() {
    let traces = lagged_traces(3, 0.5);

    let outcome = align(CellId::new("1"), &traces, &AlignerConfig::default()).unwrap();

    // Loss at each throughput timestamp equals the kbits counter there.
    for (record, loss) in traces.throughput.iter().zip(outcome.series.packet_loss()) {
        assert!((record.kbits - loss).abs() < 1e-6, "Loss {} does not match counter {}", loss, record.kbits);
    }
}

#[test]
fn test_constant_loss_picks_first_candidate() {
    let mut rng = StdRng::seed_from_u64(5);
    let mut traces = RawCellTraces::default();
    for i in 0..SAMPLES {
        traces.throughput.push(ThroughputRecord { timestamp: i as f64 * STEP_SEC, kbits: rng.random_range(10.0..50.0) });
    }
    // Packet trace covers every shifted target with the same loss value.
    for i in 0..2401 {
        traces.packets.push(PacketRecord { timestamp: -2.0 + i as f64 * STEP_SEC, tx: 10.0, rx: 5.0, too_late: 0.0 });
    }

    let outcome = align(CellId::new("1"), &traces, &AlignerConfig::default()).unwrap();

    assert_eq!(outcome.correlation, 0.0);
    assert!((outcome.shift_sec + 1.5).abs() < 1e-12, "Ties must resolve to the first grid value, got {}", outcome.shift_sec);
    assert!(outcome.series.packet_loss().iter().all(|v| *v == 5.0));
}

#[test]
fn test_spikes_are_zeroed_in_aligned_throughput() {
    let mut traces = lagged_traces(13, 0.0);
    traces.throughput[100].kbits = 1_000_000.0;

    let outcome = align(CellId::new("1"), &traces, &AlignerConfig::default()).unwrap();

    assert_eq!(outcome.spikes_removed, 1);
    assert_eq!(outcome.series.throughput_gbps()[100], 0.0);
    assert!(outcome.series.throughput_gbps()[99] > 0.0);
}

#[test]
fn test_unsorted_input_is_sorted_by_timestamp() {
    let mut traces = lagged_traces(17, 0.5);
    traces.throughput.reverse();
    traces.packets.reverse();

    let outcome = align(CellId::new("1"), &traces, &AlignerConfig::default()).unwrap();

    assert!(outcome.series.timestamps().windows(2).all(|w| w[0] <= w[1]), "Aligned timestamps must be ascending");
    assert!((outcome.shift_sec - 0.5).abs() < 0.025);
}

#[test]
fn test_empty_trace_is_an_error() {
    let mut traces = lagged_traces(1, 0.0);
    traces.packets.clear();

    let result = align(CellId::new("1"), &traces, &AlignerConfig::default());

    assert!(matches!(result, Err(Error::EmptyTrace(_))), "Expected EmptyTrace, got {:?}", result);
}

#[test]
fn test_align_cells_skips_failures_and_continues() {
    let unreadable = Err(Error::EmptyTrace("unreadable".to_string()));
    let empty = Ok(RawCellTraces::default());
    let good = Ok(lagged_traces(23, 0.5));

    let batch = align_cells(
        vec![(CellId::new("1"), unreadable), (CellId::new("2"), empty), (CellId::new("3"), good)],
        &AlignerConfig::default(),
    );

    assert_eq!(batch.aligned.len(), 1);
    assert_eq!(batch.aligned[0].series.cell(), &CellId::new("3"));

    let skipped: Vec<&str> = batch.skipped.iter().map(|s| s.cell.as_str()).collect();
    assert_eq!(skipped, vec!["1", "2"]);
}

#[test]
fn test_non_finite_timestamp_does_not_abort_the_batch() {
    let mut poisoned = lagged_traces(5, 0.0);
    poisoned.throughput.push(ThroughputRecord { timestamp: f64::NAN, kbits: 20.0 });

    let batch = align_cells(
        vec![(CellId::new("1"), Ok(poisoned)), (CellId::new("2"), Ok(lagged_traces(6, 0.0)))],
        &AlignerConfig::default(),
    );

    assert_eq!(batch.aligned.len() + batch.skipped.len(), 2);
    assert!(batch.aligned.iter().any(|o| o.series.cell() == &CellId::new("2")));
}
