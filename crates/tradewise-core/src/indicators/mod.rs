//! # Indicator Engine
//!
//! Pure transforms over an ascending price series. Each transform evaluates
//! only the most recent position and reports insufficient history as `None`;
//! nothing in this module returns an error.
//!
//! | Function | Needs | Output |
//! |----------|-------|--------|
//! | [`moving_average`] | `window` observations | mean of last `window` |
//! | [`rsi`] | `period + 1` observations | RSI in `[0, 100]`, 2 decimals |
//! | [`volatility`] | two defined returns | return std-dev (annualized), 4 decimals |
//! | [`compute_all_indicators`] | anything | [`IndicatorBundle`] |
//!
//! ```rust
//! use tradewise_core::{compute_all_indicators, PriceSeries};
//!
//! let closes: Vec<f64> = (10..30).map(f64::from).collect();
//! let bundle = compute_all_indicators(&PriceSeries::from_closes(closes).unwrap());
//!
//! assert_eq!(bundle.last_close, Some(29.0));
//! assert_eq!(bundle.ma_20, Some(19.5));
//! assert_eq!(bundle.ma_50, None);
//! ```

mod moving_average;
mod rsi;
mod volatility;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::PriceSeries;

pub use moving_average::moving_average;
pub use rsi::{rsi, DEFAULT_RSI_PERIOD};
pub use volatility::{volatility, TRADING_DAYS_PER_YEAR};

pub const SHORT_MA_WINDOW: usize = 20;
pub const LONG_MA_WINDOW: usize = 50;

/// Fixed-shape indicator snapshot for one analysis request.
///
/// Absent fields mean the history was too short for that indicator; a
/// partial bundle is a normal result for recently listed symbols.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct IndicatorBundle {
    pub last_close: Option<f64>,
    pub ma_20: Option<f64>,
    pub ma_50: Option<f64>,
    pub rsi: Option<f64>,
    pub volatility: Option<f64>,
}

impl IndicatorBundle {
    /// Bundle with every field absent.
    pub const fn unavailable() -> Self {
        Self {
            last_close: None,
            ma_20: None,
            ma_50: None,
            rsi: None,
            volatility: None,
        }
    }

    /// Number of populated fields.
    pub fn available_count(&self) -> usize {
        [
            self.last_close,
            self.ma_20,
            self.ma_50,
            self.rsi,
            self.volatility,
        ]
        .iter()
        .filter(|value| value.is_some())
        .count()
    }
}

/// Computes every indicator from the series' closing prices.
///
/// An empty series produces [`IndicatorBundle::unavailable`].
pub fn compute_all_indicators(prices: &PriceSeries) -> IndicatorBundle {
    let close = prices.close();
    let Some(&last_close) = close.last() else {
        debug!("empty price series; every indicator unavailable");
        return IndicatorBundle::unavailable();
    };

    let bundle = IndicatorBundle {
        last_close: Some(last_close),
        ma_20: moving_average(close, SHORT_MA_WINDOW),
        ma_50: moving_average(close, LONG_MA_WINDOW),
        rsi: rsi(close, DEFAULT_RSI_PERIOD),
        volatility: volatility(close, true),
    };
    debug!(
        observations = close.len(),
        available = bundle.available_count(),
        "computed indicator bundle"
    );
    bundle
}

pub(crate) fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10_f64.powi(decimals);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_observation_only_has_last_close() {
        let series = PriceSeries::from_closes(vec![42.5]).expect("valid series");
        let bundle = compute_all_indicators(&series);

        assert_eq!(
            bundle,
            IndicatorBundle {
                last_close: Some(42.5),
                ..IndicatorBundle::unavailable()
            }
        );
        assert_eq!(bundle.available_count(), 1);
    }

    #[test]
    fn long_history_fills_every_field() {
        let closes: Vec<f64> = (0..60).map(|i| 100.0 + f64::from(i % 7)).collect();
        let bundle = compute_all_indicators(&PriceSeries::from_closes(closes).expect("valid"));

        assert_eq!(bundle.available_count(), 5);
    }

    #[test]
    fn uses_first_column_when_close_is_unlabelled() {
        let series = PriceSeries::from_columns(vec![("price", vec![1.0, 2.0, 3.0])])
            .expect("valid series");
        assert_eq!(compute_all_indicators(&series).last_close, Some(3.0));
    }

    #[test]
    fn absent_fields_serialize_as_null() {
        let json = serde_json::to_value(IndicatorBundle::unavailable()).expect("serializable");
        assert!(json["ma_50"].is_null());
    }

    #[test]
    fn rounds_half_away_from_zero() {
        assert_eq!(round_to(1.25, 1), 1.3);
        assert_eq!(round_to(-0.00004, 4), -0.0);
    }
}
