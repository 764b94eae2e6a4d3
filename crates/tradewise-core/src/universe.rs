//! Static list of large-cap US tickers offered for analysis.
//!
//! The indicator engine works for any symbol; this list only backs the
//! `--restrict-universe` option and the `tickers` command.

use crate::Symbol;

/// Top US large caps by market capitalization.
pub const TOP_100_TICKERS: &[&str] = &[
    "AAPL", "MSFT", "AMZN", "NVDA", "GOOGL", "GOOG", "META", "BRK-B", "TSLA", "UNH", "JNJ", "XOM",
    "JPM", "V", "PG", "MA", "HD", "CVX", "ABBV", "MRK", "PEP", "KO", "AVGO", "COST", "LLY", "BAC",
    "WMT", "MCD", "TMO", "CSCO", "ACN", "DHR", "ABT", "WFC", "LIN", "DIS", "ADBE", "CRM", "TXN",
    "NFLX", "PM", "ORCL", "VZ", "INTC", "AMD", "QCOM", "IBM", "GE", "CAT", "RTX", "GS", "NOW",
    "AMGN", "SPGI", "ISRG", "LOW", "NEE", "BKNG", "MS", "MDT", "AXP", "BLK", "HON", "BA", "DE",
    "CVS", "GILD", "INTU", "PLD", "LMT", "T", "SYK", "MO", "PFE", "C", "ADP", "SCHW", "MMC", "UPS",
    "ELV", "VRTX", "TJX", "BDX", "ZTS", "CI", "CB", "REGN", "SO", "DUK", "APD", "USB", "ETN", "GM",
    "F", "PNC",
];

pub fn is_allowed(symbol: &Symbol) -> bool {
    TOP_100_TICKERS.contains(&symbol.as_str())
}

/// The list as validated symbols, in display order.
pub fn symbols() -> impl Iterator<Item = Symbol> {
    TOP_100_TICKERS
        .iter()
        .filter_map(|ticker| Symbol::parse(ticker).ok())
}
