use super::round_to;

/// Trading sessions per year used to annualize daily volatility.
pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// Historical volatility: sample standard deviation of period-over-period
/// percentage returns, scaled by `sqrt(252)` when `annualize` is set.
/// Rounded to four decimals.
///
/// Returns after a zero price are undefined and skipped. Fewer than two
/// defined returns leave the deviation undefined, so the result is `None`.
pub fn volatility(series: &[f64], annualize: bool) -> Option<f64> {
    if series.len() < 2 {
        return None;
    }

    let returns = percentage_returns(series);
    let deviation = sample_std_dev(&returns)?;
    let scaled = if annualize {
        deviation * TRADING_DAYS_PER_YEAR.sqrt()
    } else {
        deviation
    };

    Some(round_to(scaled, 4))
}

fn percentage_returns(series: &[f64]) -> Vec<f64> {
    series
        .windows(2)
        .filter(|pair| pair[0] != 0.0)
        .map(|pair| pair[1] / pair[0] - 1.0)
        .collect()
}

fn sample_std_dev(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }

    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values
        .iter()
        .map(|value| (value - mean).powi(2))
        .sum::<f64>()
        / (n - 1.0);

    Some(variance.sqrt())
}
