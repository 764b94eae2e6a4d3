//! Column-labelled price history consumed by the indicator engine.
//!
//! Providers do not label their columns consistently, so the engine never
//! indexes a fixed layout: it asks [`PriceSeries::close`] for the column
//! labelled `Close` and falls back to the first column otherwise.

use serde::{Deserialize, Serialize};

use crate::{BarSeries, ValidationError};

/// Label looked up by [`PriceSeries::close`].
pub const CLOSE_LABEL: &str = "Close";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Column {
    label: String,
    values: Vec<f64>,
}

/// Ordered (oldest first) numeric observations, one or more labelled columns
/// of equal length.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceSeries {
    columns: Vec<Column>,
}

impl PriceSeries {
    /// Series with no columns and no rows.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Builds a series from `(label, values)` pairs, keeping column order.
    ///
    /// Fails on blank or duplicate labels, columns of differing length, and
    /// non-finite observations.
    pub fn from_columns<L>(columns: Vec<(L, Vec<f64>)>) -> Result<Self, ValidationError>
    where
        L: Into<String>,
    {
        let mut validated: Vec<Column> = Vec::with_capacity(columns.len());

        for (label, values) in columns {
            let label = label.into().trim().to_owned();
            if label.is_empty() {
                return Err(ValidationError::EmptyColumnLabel);
            }
            if validated
                .iter()
                .any(|column| column.label.eq_ignore_ascii_case(&label))
            {
                return Err(ValidationError::DuplicateColumn { label });
            }
            if let Some(first) = validated.first() {
                if values.len() != first.values.len() {
                    return Err(ValidationError::RaggedColumn {
                        label,
                        len: values.len(),
                        expected: first.values.len(),
                    });
                }
            }
            if let Some(index) = values.iter().position(|value| !value.is_finite()) {
                return Err(ValidationError::NonFiniteObservation { label, index });
            }

            validated.push(Column { label, values });
        }

        Ok(Self { columns: validated })
    }

    /// Single `Close` column series.
    pub fn from_closes(closes: Vec<f64>) -> Result<Self, ValidationError> {
        Self::from_columns(vec![(CLOSE_LABEL, closes)])
    }

    /// OHLC(V) columns from provider bars. `Volume` is only included when
    /// every bar reports it.
    pub fn from_bars(series: &BarSeries) -> Self {
        let bars = &series.bars;
        let mut columns = vec![
            Column {
                label: String::from("Open"),
                values: bars.iter().map(|bar| bar.open).collect(),
            },
            Column {
                label: String::from("High"),
                values: bars.iter().map(|bar| bar.high).collect(),
            },
            Column {
                label: String::from("Low"),
                values: bars.iter().map(|bar| bar.low).collect(),
            },
            Column {
                label: String::from(CLOSE_LABEL),
                values: bars.iter().map(|bar| bar.close).collect(),
            },
        ];

        let volumes = bars
            .iter()
            .map(|bar| bar.volume.map(|volume| volume as f64))
            .collect::<Option<Vec<_>>>();
        if let Some(values) = volumes {
            columns.push(Column {
                label: String::from("Volume"),
                values,
            });
        }

        Self { columns }
    }

    /// Number of observations (rows).
    pub fn len(&self) -> usize {
        self.columns.first().map_or(0, |column| column.values.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|column| column.label.as_str())
    }

    /// Case-insensitive column lookup.
    pub fn column(&self, label: &str) -> Option<&[f64]> {
        self.columns
            .iter()
            .find(|column| column.label.eq_ignore_ascii_case(label))
            .map(|column| column.values.as_slice())
    }

    /// Closing prices: the `Close` column if present, else the first column,
    /// else an empty slice.
    pub fn close(&self) -> &[f64] {
        self.column(CLOSE_LABEL)
            .or_else(|| self.columns.first().map(|column| column.values.as_slice()))
            .unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Bar, Symbol, UtcDateTime};

    #[test]
    fn close_prefers_labelled_column() {
        let series = PriceSeries::from_columns(vec![
            ("Open", vec![1.0, 2.0]),
            ("close", vec![3.0, 4.0]),
        ])
        .expect("valid columns");

        assert_eq!(series.close(), &[3.0, 4.0]);
    }

    #[test]
    fn close_falls_back_to_first_column() {
        let series = PriceSeries::from_columns(vec![
            ("Adj Close", vec![5.0, 6.0]),
            ("High", vec![7.0, 8.0]),
        ])
        .expect("valid columns");

        assert_eq!(series.close(), &[5.0, 6.0]);
    }

    #[test]
    fn empty_series_has_no_closes() {
        let series = PriceSeries::empty();
        assert!(series.is_empty());
        assert!(series.close().is_empty());
    }

    #[test]
    fn rejects_ragged_columns() {
        let err = PriceSeries::from_columns(vec![("Open", vec![1.0, 2.0]), ("Close", vec![1.0])])
            .expect_err("must fail");
        assert_eq!(
            err,
            ValidationError::RaggedColumn {
                label: String::from("Close"),
                len: 1,
                expected: 2,
            }
        );
    }

    #[test]
    fn rejects_nan_observation() {
        let err = PriceSeries::from_closes(vec![1.0, f64::NAN]).expect_err("must fail");
        assert!(matches!(
            err,
            ValidationError::NonFiniteObservation { index: 1, .. }
        ));
    }

    #[test]
    fn rejects_duplicate_labels() {
        let err = PriceSeries::from_columns(vec![("Close", vec![1.0]), ("CLOSE", vec![2.0])])
            .expect_err("must fail");
        assert!(matches!(err, ValidationError::DuplicateColumn { .. }));
    }

    #[test]
    fn bars_without_volume_skip_volume_column() {
        let ts = UtcDateTime::parse("2024-01-02T00:00:00Z").expect("timestamp");
        let bars = vec![
            Bar::new(ts, 10.0, 11.0, 9.0, 10.5, Some(100)).expect("bar"),
            Bar::new(ts.minus_days(-1), 10.5, 12.0, 10.0, 11.5, None).expect("bar"),
        ];
        let series = PriceSeries::from_bars(&BarSeries::new(
            Symbol::parse("AAPL").expect("symbol"),
            bars,
        ));

        assert_eq!(series.labels().collect::<Vec<_>>(), ["Open", "High", "Low", "Close"]);
        assert_eq!(series.close(), &[10.5, 11.5]);
    }
}
