use fronthaul_capacity::domain::config::{DEFAULT_BUFFER_TIME_SEC, SLOT_DURATION_SEC, SimulationConfig};
use fronthaul_capacity::domain::simulator::{LeakyBucket, drop_rate, simulate};

use proptest::prelude::*;

#[test]
fn test_empty_input_has_no_drops() {
    let result = simulate(10.0, &[], DEFAULT_BUFFER_TIME_SEC);

    assert_eq!(result.drop_rate, 0.0);
    assert!(!result.congested);
}

#[test]
fn test_idle_input_has_no_drops_even_at_zero_capacity() {
    let result = simulate(0.0, &[0.0; 100], DEFAULT_BUFFER_TIME_SEC);

    assert_eq!(result.drop_rate, 0.0);
}

#[test]
fn test_zero_capacity_drops_everything() {
    let result = simulate(0.0, &[1.0, 2.0, 3.0], DEFAULT_BUFFER_TIME_SEC);

    assert_eq!(result.drop_rate, 1.0);
    assert!(result.congested);
}

#[test]
fn test_burst_without_buffer_drops_the_excess() {
    // 2 Gbps for one slot into a 1 Gbps link: half the bits overflow.
    let rate = drop_rate(1.0, &[2.0, 0.0], 0.0, SLOT_DURATION_SEC);

    assert!((rate - 0.5).abs() < 1e-12, "Expected half the burst dropped, got {}", rate);
}

#[test]
fn test_buffer_absorbs_short_burst() {
    // One slot worth of excess fits exactly into a one-slot buffer.
    let rate = drop_rate(1.0, &[2.0, 0.0], SLOT_DURATION_SEC, SLOT_DURATION_SEC);

    assert_eq!(rate, 0.0);
}

#[test]
fn test_congestion_flag_uses_configured_limit() {
    let strict = LeakyBucket::from(&SimulationConfig { max_drop_rate: 0.0, ..SimulationConfig::default() });
    let lenient = LeakyBucket::from(&SimulationConfig { max_drop_rate: 0.6, ..SimulationConfig::default() });

    assert!(strict.simulate(1.0, &[2.0, 0.0], 0.0).congested);
    assert!(!lenient.simulate(1.0, &[2.0, 0.0], 0.0).congested);
}

fn load_strategy() -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(0.0f64..50.0, 1..300)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn prop_capacity_at_peak_never_drops(load in load_strategy(), headroom in 0.0f64..10.0, buffer in 0.0f64..0.001) {
        let peak = load.iter().cloned().fold(0.0, f64::max);

        let result = simulate(peak + headroom, &load, buffer);

        prop_assert_eq!(result.drop_rate, 0.0);
        prop_assert!(!result.congested);
    }

    #[test]
    fn prop_zero_capacity_drops_all_positive_input(load in load_strategy(), buffer in 0.0f64..0.001) {
        prop_assume!(load.iter().any(|v| *v > 0.0));

        let result = simulate(0.0, &load, buffer);

        prop_assert_eq!(result.drop_rate, 1.0);
        prop_assert!(result.congested);
    }

    #[test]
    fn prop_drop_rate_is_a_fraction(load in load_strategy(), capacity in 0.0f64..60.0, buffer in 0.0f64..0.001) {
        let rate = simulate(capacity, &load, buffer).drop_rate;

        prop_assert!((0.0..=1.0).contains(&rate), "drop rate {} outside [0, 1]", rate);
    }

    #[test]
    fn prop_more_capacity_never_drops_more(load in load_strategy(), low in 0.0f64..50.0, extra in 0.0f64..20.0, buffer in 0.0f64..0.001) {
        let tight = simulate(low, &load, buffer).drop_rate;
        let loose = simulate(low + extra, &load, buffer).drop_rate;

        prop_assert!(loose <= tight + 1e-9, "capacity {} drops {} but capacity {} drops {}", low, tight, low + extra, loose);
    }

    #[test]
    fn prop_larger_buffer_never_drops_more(load in load_strategy(), capacity in 0.0f64..50.0, buffer in 0.0f64..0.001, extra in 0.0f64..0.001) {
        let small = simulate(capacity, &load, buffer).drop_rate;
        let large = simulate(capacity, &load, buffer + extra).drop_rate;

        prop_assert!(large <= small + 1e-9);
    }
}
