use serde::{Deserialize, Serialize};

use crate::{Symbol, UtcDateTime, ValidationError};

/// Daily OHLCV bar as delivered by a price provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub ts: UtcDateTime,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: Option<u64>,
}

impl Bar {
    pub fn new(
        ts: UtcDateTime,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: Option<u64>,
    ) -> Result<Self, ValidationError> {
        validate_price("open", open)?;
        validate_price("high", high)?;
        validate_price("low", low)?;
        validate_price("close", close)?;

        if high < low {
            return Err(ValidationError::InvalidBarRange);
        }

        if !(low..=high).contains(&open) || !(low..=high).contains(&close) {
            return Err(ValidationError::InvalidBarBounds);
        }

        Ok(Self {
            ts,
            open,
            high,
            low,
            close,
            volume,
        })
    }
}

/// Ascending-by-time price history for one symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarSeries {
    pub symbol: Symbol,
    pub bars: Vec<Bar>,
}

impl BarSeries {
    /// Builds a series, sorting bars by timestamp so downstream window
    /// computations always see the most recent bar last.
    pub fn new(symbol: Symbol, mut bars: Vec<Bar>) -> Self {
        bars.sort_by_key(|bar| bar.ts);
        Self { symbol, bars }
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|bar| bar.close).collect()
    }
}

fn validate_price(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::NonFiniteValue { field });
    }
    if value < 0.0 {
        return Err(ValidationError::NegativeValue { field });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(raw: &str) -> UtcDateTime {
        UtcDateTime::parse(raw).expect("timestamp")
    }

    #[test]
    fn rejects_close_outside_range() {
        let err = Bar::new(ts("2024-01-02T00:00:00Z"), 10.0, 12.0, 9.0, 12.5, Some(10))
            .expect_err("must fail");
        assert_eq!(err, ValidationError::InvalidBarBounds);
    }

    #[test]
    fn rejects_nan_price() {
        let err = Bar::new(ts("2024-01-02T00:00:00Z"), f64::NAN, 12.0, 9.0, 10.0, None)
            .expect_err("must fail");
        assert_eq!(err, ValidationError::NonFiniteValue { field: "open" });
    }

    #[test]
    fn series_orders_bars_by_timestamp() {
        let later = Bar::new(ts("2024-01-03T00:00:00Z"), 11.0, 11.0, 11.0, 11.0, None)
            .expect("valid bar");
        let earlier = Bar::new(ts("2024-01-02T00:00:00Z"), 10.0, 10.0, 10.0, 10.0, None)
            .expect("valid bar");

        let series = BarSeries::new(Symbol::parse("AAPL").expect("symbol"), vec![later, earlier]);

        assert_eq!(series.closes(), vec![10.0, 11.0]);
    }
}
