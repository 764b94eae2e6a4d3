use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use serde::Deserialize;
use tracing::{debug, warn};

use crate::data_source::{
    HeadlineBatch, HeadlinesRequest, HistoryRequest, MarketDataSource, SourceError,
};
use crate::http_client::{HttpClient, HttpRequest, HttpResponse, ReqwestHttpClient};
use crate::{Bar, BarSeries, Symbol, UtcDateTime};

const CHART_ENDPOINT: &str = "https://query1.finance.yahoo.com/v8/finance/chart";
const SEARCH_ENDPOINT: &str = "https://query2.finance.yahoo.com/v1/finance/search";
const REFERER: &str = "https://finance.yahoo.com/";
const TRADING_DAYS_PER_MONTH: u32 = 21;

/// Fewer bars than this cannot produce a single return, so the history is
/// reported as unavailable.
pub const MIN_HISTORY_BARS: usize = 2;

#[derive(Clone)]
enum Mode {
    Live(Arc<dyn HttpClient>),
    Mock,
}

/// Yahoo Finance adapter: daily chart history and news headlines.
///
/// [`YahooAdapter::default`] runs in mock mode and serves deterministic
/// synthetic data without network access.
#[derive(Clone)]
pub struct YahooAdapter {
    mode: Mode,
}

impl Default for YahooAdapter {
    fn default() -> Self {
        Self::mock()
    }
}

impl YahooAdapter {
    pub fn mock() -> Self {
        Self { mode: Mode::Mock }
    }

    /// Live adapter backed by `reqwest`.
    pub fn live() -> Self {
        Self::with_http_client(Arc::new(ReqwestHttpClient::new()))
    }

    pub fn with_http_client(http_client: Arc<dyn HttpClient>) -> Self {
        Self {
            mode: Mode::Live(http_client),
        }
    }

    pub fn is_mock(&self) -> bool {
        matches!(self.mode, Mode::Mock)
    }
}

impl MarketDataSource for YahooAdapter {
    fn name(&self) -> &'static str {
        if self.is_mock() {
            "yahoo-mock"
        } else {
            "yahoo"
        }
    }

    fn history<'a>(
        &'a self,
        req: HistoryRequest,
    ) -> Pin<Box<dyn Future<Output = Result<BarSeries, SourceError>> + Send + 'a>> {
        Box::pin(async move {
            let series = match &self.mode {
                Mode::Live(client) => fetch_history(client.as_ref(), &req).await?,
                Mode::Mock => mock_history(&req)?,
            };

            if series.len() < MIN_HISTORY_BARS {
                return Err(SourceError::unavailable(format!(
                    "yahoo returned {} usable bars for {}, need at least {MIN_HISTORY_BARS}",
                    series.len(),
                    req.symbol
                )));
            }
            Ok(series)
        })
    }

    fn headlines<'a>(
        &'a self,
        req: HeadlinesRequest,
    ) -> Pin<Box<dyn Future<Output = Result<HeadlineBatch, SourceError>> + Send + 'a>> {
        Box::pin(async move {
            match &self.mode {
                Mode::Live(client) => fetch_headlines(client.as_ref(), &req).await,
                Mode::Mock => Ok(mock_headlines(&req)),
            }
        })
    }
}

async fn fetch_history(
    client: &dyn HttpClient,
    req: &HistoryRequest,
) -> Result<BarSeries, SourceError> {
    let endpoint = format!(
        "{CHART_ENDPOINT}/{}?range={}mo&interval=1d",
        urlencoding::encode(req.symbol.as_str()),
        req.lookback_months
    );
    debug!(symbol = %req.symbol, months = req.lookback_months, "requesting yahoo chart");

    let response = send(client, &endpoint).await?;
    let chart: YahooChartResponse = serde_json::from_str(&response.body)
        .map_err(|e| SourceError::internal(format!("failed to parse yahoo chart: {e}")))?;

    if let Some(error) = chart.chart.error {
        return Err(SourceError::unavailable(format!(
            "yahoo chart error for {}: {}",
            req.symbol,
            error.describe()
        )));
    }

    let Some(result) = chart.chart.result.into_iter().flatten().next() else {
        return Ok(BarSeries::new(req.symbol.clone(), Vec::new()));
    };
    let timestamps = result.timestamp.unwrap_or_default();
    let Some(quote) = result.indicators.quote.into_iter().next() else {
        return Ok(BarSeries::new(req.symbol.clone(), Vec::new()));
    };

    let adjusted = result
        .indicators
        .adjclose
        .into_iter()
        .next()
        .map(|series| series.adjclose)
        .unwrap_or_default();

    let mut bars = Vec::with_capacity(timestamps.len());
    let mut skipped = 0_usize;
    for (i, &seconds) in timestamps.iter().enumerate() {
        let (Some(open), Some(high), Some(low), Some(close)) = (
            value_at(&quote.open, i),
            value_at(&quote.high, i),
            value_at(&quote.low, i),
            value_at(&quote.close, i),
        ) else {
            skipped += 1;
            continue;
        };
        let [open, high, low, close] =
            adjust_for_splits_and_dividends([open, high, low, close], value_at(&adjusted, i));
        // Vendor rounding can leave open/close a hair outside the day's range.
        let high = high.max(open).max(close);
        let low = low.min(open).min(close);
        let volume = quote
            .volume
            .get(i)
            .copied()
            .flatten()
            .and_then(|v| u64::try_from(v).ok());

        let bar = UtcDateTime::from_unix_timestamp(seconds)
            .and_then(|ts| Bar::new(ts, open, high, low, close, volume));
        match bar {
            Ok(bar) => bars.push(bar),
            Err(_) => skipped += 1,
        }
    }

    if skipped > 0 {
        debug!(symbol = %req.symbol, skipped, "dropped incomplete yahoo bars");
    }
    Ok(BarSeries::new(req.symbol.clone(), bars))
}

async fn fetch_headlines(
    client: &dyn HttpClient,
    req: &HeadlinesRequest,
) -> Result<HeadlineBatch, SourceError> {
    let endpoint = format!(
        "{SEARCH_ENDPOINT}?q={}&quotesCount=0&newsCount={}",
        urlencoding::encode(req.symbol.as_str()),
        req.limit
    );
    debug!(symbol = %req.symbol, limit = req.limit, "requesting yahoo news");

    let response = send(client, &endpoint).await?;
    let search: YahooSearchResponse = serde_json::from_str(&response.body)
        .map_err(|e| SourceError::internal(format!("failed to parse yahoo search: {e}")))?;

    let headlines = search
        .news
        .into_iter()
        .filter_map(|item| {
            item.title
                .filter(|title| !title.trim().is_empty())
                .or(item.link)
                .map(|text| text.trim().to_owned())
                .filter(|text| !text.is_empty())
        })
        .take(req.limit)
        .collect();

    Ok(HeadlineBatch { headlines })
}

async fn send(client: &dyn HttpClient, endpoint: &str) -> Result<HttpResponse, SourceError> {
    let request = HttpRequest::get(endpoint).with_header("referer", REFERER);
    let response = client.execute(request).await.map_err(|e| {
        warn!(error = %e, "yahoo transport error");
        SourceError::unavailable(format!("yahoo transport error: {}", e.message()))
    })?;

    match response.status {
        429 => Err(SourceError::rate_limited("yahoo returned status 429")),
        // Unknown symbols come back as 404 with a chart error body.
        404 => Ok(response),
        _ if response.is_success() => Ok(response),
        status => Err(SourceError::unavailable(format!(
            "yahoo returned status {status}"
        ))),
    }
}

fn mock_history(req: &HistoryRequest) -> Result<BarSeries, SourceError> {
    let seed = symbol_seed(&req.symbol);
    let count = (req.lookback_months * TRADING_DAYS_PER_MONTH) as usize;
    let base = 40.0 + (seed % 260) as f64;
    let phase = (seed % 7) as f64;
    let today = UtcDateTime::now();

    let mut bars = Vec::with_capacity(count);
    let mut previous = base;
    for index in 0..count {
        let step = index as f64;
        let close = base * (1.0 + 0.03 * (step * 0.35 + phase).sin() + 0.0015 * step);
        let open = previous;
        let high = open.max(close) * 1.004;
        let low = open.min(close) * 0.996;
        let ts = today.minus_days((count - index) as i64);

        let bar = Bar::new(ts, open, high, low, close, Some(1_000_000 + (seed % 5_000) * 10))
            .map_err(|e| SourceError::internal(e.to_string()))?;
        bars.push(bar);
        previous = close;
    }

    Ok(BarSeries::new(req.symbol.clone(), bars))
}

fn mock_headlines(req: &HeadlinesRequest) -> HeadlineBatch {
    let templates = [
        "{} beats quarterly earnings estimates",
        "Analysts raise price target on {}",
        "{} faces regulatory scrutiny over new product line",
        "{} announces share buyback program",
    ];
    let headlines = templates
        .iter()
        .take(req.limit)
        .map(|template| template.replace("{}", req.symbol.as_str()))
        .collect();
    HeadlineBatch { headlines }
}

/// Scales OHLC by `adjclose / close` so returns include dividends and splits.
fn adjust_for_splits_and_dividends(prices: [f64; 4], adjusted_close: Option<f64>) -> [f64; 4] {
    let close = prices[3];
    match adjusted_close {
        Some(adjusted) if close != 0.0 && adjusted.is_finite() => {
            let ratio = adjusted / close;
            prices.map(|price| price * ratio)
        }
        _ => prices,
    }
}

fn value_at(values: &[Option<f64>], index: usize) -> Option<f64> {
    values.get(index).copied().flatten()
}

fn symbol_seed(symbol: &Symbol) -> u64 {
    symbol.as_str().bytes().fold(0_u64, |acc, byte| {
        acc.wrapping_mul(33).wrapping_add(u64::from(byte))
    })
}

#[derive(Debug, Deserialize)]
struct YahooChartResponse {
    chart: YahooChartData,
}

#[derive(Debug, Deserialize)]
struct YahooChartData {
    #[serde(default)]
    result: Option<Vec<YahooChartResult>>,
    #[serde(default)]
    error: Option<YahooApiError>,
}

#[derive(Debug, Deserialize)]
struct YahooApiError {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    description: Option<String>,
}

impl YahooApiError {
    fn describe(&self) -> String {
        match (&self.code, &self.description) {
            (Some(code), Some(description)) => format!("{code}: {description}"),
            (Some(text), None) | (None, Some(text)) => text.clone(),
            (None, None) => String::from("unknown error"),
        }
    }
}

#[derive(Debug, Deserialize)]
struct YahooChartResult {
    #[serde(default)]
    timestamp: Option<Vec<i64>>,
    indicators: YahooChartIndicators,
}

#[derive(Debug, Deserialize)]
struct YahooChartIndicators {
    #[serde(default)]
    quote: Vec<YahooChartQuote>,
    #[serde(default)]
    adjclose: Vec<YahooAdjClose>,
}

#[derive(Debug, Deserialize)]
struct YahooAdjClose {
    #[serde(default)]
    adjclose: Vec<Option<f64>>,
}

#[derive(Debug, Deserialize)]
struct YahooChartQuote {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<i64>>,
}

#[derive(Debug, Deserialize)]
struct YahooSearchResponse {
    #[serde(default)]
    news: Vec<YahooNewsItem>,
}

#[derive(Debug, Deserialize)]
struct YahooNewsItem {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    link: Option<String>,
}
