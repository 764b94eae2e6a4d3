/// Simple moving average of the last `window` observations.
///
/// Only the trailing value is produced. Returns `None` when the series holds
/// fewer than `window` observations or `window` is zero.
pub fn moving_average(series: &[f64], window: usize) -> Option<f64> {
    if window == 0 || series.len() < window {
        return None;
    }

    let tail = &series[series.len() - window..];
    Some(tail.iter().sum::<f64>() / window as f64)
}
