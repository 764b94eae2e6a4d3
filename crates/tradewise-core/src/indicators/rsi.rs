// Relative Strength Index over simple (not Wilder-smoothed) averages.
//
//   delta[i] = p[i] - p[i-1]
//   gain     = max(delta, 0),  loss = max(-delta, 0)
//   RS       = mean(gain over last `period`) / mean(loss over last `period`)
//   RSI      = 100 - 100 / (1 + RS)
//
// A window with no losses is pinned to 100.0, including the flat case where
// there are no gains either.

use super::round_to;

/// Conventional RSI lookback.
pub const DEFAULT_RSI_PERIOD: usize = 14;

/// Trailing RSI value rounded to two decimals.
///
/// Needs `period + 1` observations to form `period` differences; shorter
/// series (or `period == 0`) yield `None`.
pub fn rsi(series: &[f64], period: usize) -> Option<f64> {
    if period == 0 || series.len() < period + 1 {
        return None;
    }

    let window = &series[series.len() - (period + 1)..];
    let (gains, losses) = window
        .windows(2)
        .map(|pair| pair[1] - pair[0])
        .fold((0.0_f64, 0.0_f64), |(gains, losses), delta| {
            if delta > 0.0 {
                (gains + delta, losses)
            } else {
                (gains, losses - delta)
            }
        });

    let avg_gain = gains / period as f64;
    let avg_loss = losses / period as f64;
    if avg_loss == 0.0 {
        return Some(100.0);
    }

    Some(rsi_from_averages(avg_gain, avg_loss))
}

fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
    let rs = avg_gain / avg_loss;
    round_to(100.0 - 100.0 / (1.0 + rs), 2)
}
