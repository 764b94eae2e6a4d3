//! Market data provider contract and request/response types.
//!
//! The indicator engine performs no I/O; price history, headlines and ticker
//! validation come from a [`MarketDataSource`] implementation.
//!
//! | Operation | Request | Response |
//! |-----------|---------|----------|
//! | History | [`HistoryRequest`] | [`BarSeries`] |
//! | Headlines | [`HeadlinesRequest`] | [`HeadlineBatch`] |
//! | Ticker validation | [`Symbol`] | `bool` |
//!
//! # Example
//!
//! ```rust,ignore
//! use tradewise_core::{HistoryRequest, MarketDataSource, Symbol, YahooAdapter};
//!
//! async fn last_close(adapter: &YahooAdapter) -> Option<f64> {
//!     let request = HistoryRequest::new(Symbol::parse("AAPL").ok()?, 6).ok()?;
//!     let series = adapter.history(request).await.ok()?;
//!     series.bars.last().map(|bar| bar.close)
//! }
//! ```

use std::fmt::{Display, Formatter};
use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};

use crate::{BarSeries, Symbol};

/// Months of history probed by the default [`MarketDataSource::validate_ticker`].
pub const VALIDATION_LOOKBACK_MONTHS: u32 = 1;

/// Adapter-level error classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceErrorKind {
    Unavailable,
    RateLimited,
    InvalidRequest,
    Internal,
}

/// Structured provider error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceError {
    kind: SourceErrorKind,
    message: String,
}

impl SourceError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::Unavailable,
            message: message.into(),
        }
    }

    pub fn rate_limited(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::RateLimited,
            message: message.into(),
        }
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::InvalidRequest,
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::Internal,
            message: message.into(),
        }
    }

    pub const fn kind(&self) -> SourceErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub const fn code(&self) -> &'static str {
        match self.kind {
            SourceErrorKind::Unavailable => "source.unavailable",
            SourceErrorKind::RateLimited => "source.rate_limited",
            SourceErrorKind::InvalidRequest => "source.invalid_request",
            SourceErrorKind::Internal => "source.internal",
        }
    }
}

impl Display for SourceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.code())
    }
}

impl std::error::Error for SourceError {}

/// Request for daily price history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryRequest {
    pub symbol: Symbol,
    pub lookback_months: u32,
}

impl HistoryRequest {
    pub fn new(symbol: Symbol, lookback_months: u32) -> Result<Self, SourceError> {
        if lookback_months == 0 {
            return Err(SourceError::invalid_request(
                "history lookback must be at least one month",
            ));
        }
        Ok(Self {
            symbol,
            lookback_months,
        })
    }
}

/// Request for recent news headlines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadlinesRequest {
    pub symbol: Symbol,
    pub limit: usize,
}

impl HeadlinesRequest {
    pub fn new(symbol: Symbol, limit: usize) -> Result<Self, SourceError> {
        if limit == 0 {
            return Err(SourceError::invalid_request(
                "headlines request limit must be greater than zero",
            ));
        }
        Ok(Self { symbol, limit })
    }
}

/// Headlines ordered most relevant first, as the provider returned them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeadlineBatch {
    pub headlines: Vec<String>,
}

/// Price, headline and ticker-validation provider.
///
/// Implementations must be `Send + Sync`; one instance serves concurrent
/// analysis requests.
pub trait MarketDataSource: Send + Sync {
    /// Provider name used in logs and output metadata.
    fn name(&self) -> &'static str;

    /// Fetches ascending daily bars covering `lookback_months`.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] when the provider is unreachable, rate limited,
    /// or has no usable history for the symbol.
    fn history<'a>(
        &'a self,
        req: HistoryRequest,
    ) -> Pin<Box<dyn Future<Output = Result<BarSeries, SourceError>> + Send + 'a>>;

    /// Fetches up to `limit` recent headlines. An empty batch is a valid result.
    fn headlines<'a>(
        &'a self,
        req: HeadlinesRequest,
    ) -> Pin<Box<dyn Future<Output = Result<HeadlineBatch, SourceError>> + Send + 'a>>;

    /// Whether the symbol exists and has downloadable history.
    ///
    /// The default probes one month of history.
    fn validate_ticker<'a>(
        &'a self,
        symbol: &'a Symbol,
    ) -> Pin<Box<dyn Future<Output = bool> + Send + 'a>> {
        Box::pin(async move {
            let Ok(request) = HistoryRequest::new(symbol.clone(), VALIDATION_LOOKBACK_MONTHS)
            else {
                return false;
            };
            matches!(self.history(request).await, Ok(series) if !series.is_empty())
        })
    }
}
