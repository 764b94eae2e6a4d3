//! Behavior-driven tests for the indicator engine
//!
//! These tests pin the observable numbers a report depends on: which
//! indicators appear for a given amount of history and how they relate.

use tradewise_core::indicators::{moving_average, rsi, volatility, TRADING_DAYS_PER_YEAR};
use tradewise_core::{compute_all_indicators, IndicatorBundle, PriceSeries};

fn closes(values: Vec<f64>) -> PriceSeries {
    PriceSeries::from_closes(values).expect("finite closes")
}

/// Deterministic zig-zag around an upward drift.
fn wavy_closes(len: usize) -> Vec<f64> {
    (0..len)
        .map(|i| {
            let i = i as f64;
            100.0 + i * 0.3 + (i * 0.7).sin() * 2.5
        })
        .collect()
}

// =============================================================================
// Availability by history length
// =============================================================================

#[test]
fn when_twenty_rising_closes_are_given_short_average_is_known_and_long_is_not() {
    // Given: closes 10, 11, ..., 29
    let prices = closes((10..30).map(f64::from).collect());

    // When: the bundle is computed
    let bundle = compute_all_indicators(&prices);

    // Then: the 20-day average covers the whole series, the 50-day cannot
    assert_eq!(bundle.last_close, Some(29.0));
    assert_eq!(bundle.ma_20, Some(19.5));
    assert_eq!(bundle.ma_50, None);

    // And: a strictly rising series has no losses
    assert_eq!(bundle.rsi, Some(100.0));
    assert!(bundle.volatility.expect("enough returns") > 0.0);
}

#[test]
fn when_prices_are_flat_volatility_is_zero_and_rsi_saturates() {
    // Given: sixty identical closes
    let prices = closes(vec![42.5; 60]);

    // When: the bundle is computed
    let bundle = compute_all_indicators(&prices);

    // Then: every indicator is available with degenerate values
    assert_eq!(bundle.ma_20, Some(42.5));
    assert_eq!(bundle.ma_50, Some(42.5));
    assert_eq!(bundle.volatility, Some(0.0));
    assert_eq!(bundle.rsi, Some(100.0));
    assert_eq!(bundle.available_count(), 5);
}

#[test]
fn when_only_one_close_exists_only_last_close_is_reported() {
    let bundle = compute_all_indicators(&closes(vec![187.32]));

    assert_eq!(
        bundle,
        IndicatorBundle {
            last_close: Some(187.32),
            ..IndicatorBundle::unavailable()
        }
    );
}

#[test]
fn when_series_is_empty_every_indicator_is_absent() {
    let bundle = compute_all_indicators(&PriceSeries::empty());

    assert_eq!(bundle, IndicatorBundle::unavailable());
    assert_eq!(bundle.available_count(), 0);
}

#[test]
fn when_rsi_period_is_not_covered_rsi_is_absent() {
    // Given: fourteen closes, one short of a 14-period RSI
    let prices = closes(wavy_closes(14));

    // Then: the RSI is missing while the last close is known
    let bundle = compute_all_indicators(&prices);
    assert_eq!(bundle.rsi, None);
    assert!(bundle.last_close.is_some());
}

// =============================================================================
// Column selection
// =============================================================================

#[test]
fn when_close_column_is_present_it_wins_over_earlier_columns() {
    // Given: a frame whose first column is not the close
    let prices = PriceSeries::from_columns(vec![
        ("Open", vec![1.0, 1.0, 1.0]),
        ("Close", vec![5.0, 6.0, 7.0]),
    ])
    .expect("well-formed columns");

    // Then: indicators read the Close column
    assert_eq!(compute_all_indicators(&prices).last_close, Some(7.0));
}

#[test]
fn when_no_close_column_exists_first_column_is_used() {
    let prices = PriceSeries::from_columns(vec![
        ("Adj Price", vec![3.0, 4.0]),
        ("Volume", vec![100.0, 200.0]),
    ])
    .expect("well-formed columns");

    assert_eq!(compute_all_indicators(&prices).last_close, Some(4.0));
}

// =============================================================================
// Numeric relationships
// =============================================================================

#[test]
fn when_gains_grow_relative_to_losses_rsi_increases() {
    // Given: fourteen alternating moves with a growing gain/loss ratio
    let series_with_gain = |gain: f64| -> Vec<f64> {
        let mut price = 100.0;
        let mut values = vec![price];
        for step in 0..14 {
            price += if step % 2 == 0 { gain } else { -1.0 };
            values.push(price);
        }
        values
    };

    // When: RSI is evaluated for each ratio
    let readings: Vec<f64> = [1.0, 2.0, 4.0]
        .into_iter()
        .map(|gain| rsi(&series_with_gain(gain), 14).expect("15 observations"))
        .collect();

    // Then: RSI follows 100 - 100 / (1 + RS)
    assert_eq!(readings, vec![50.0, 66.67, 80.0]);
    assert!(readings.windows(2).all(|pair| pair[0] < pair[1]));
}

#[test]
fn when_volatility_is_annualized_it_scales_by_square_root_of_trading_days() {
    let values = wavy_closes(120);

    let raw = volatility(&values, false).expect("enough returns");
    let annualized = volatility(&values, true).expect("enough returns");

    // Each reading is rounded to four decimals on its own.
    let expected = raw * TRADING_DAYS_PER_YEAR.sqrt();
    assert!(
        (annualized - expected).abs() < 2e-3,
        "annualized {annualized} should be close to {expected}"
    );
}

#[test]
fn when_window_exceeds_history_moving_average_is_absent() {
    let values = wavy_closes(49);

    assert!(moving_average(&values, 49).is_some());
    assert_eq!(moving_average(&values, 50), None);
    assert_eq!(moving_average(&values, 0), None);
}

#[test]
fn when_same_series_is_evaluated_twice_results_are_identical() {
    let prices = closes(wavy_closes(80));

    assert_eq!(
        compute_all_indicators(&prices),
        compute_all_indicators(&prices)
    );
}

// =============================================================================
// Input contract
// =============================================================================

#[test]
fn when_a_close_is_not_finite_series_construction_fails() {
    let err = PriceSeries::from_closes(vec![1.0, f64::NAN, 3.0]).expect_err("NaN is rejected");

    assert!(err.to_string().contains("non-finite"));
}
