use serde::Serialize;
use tradewise_core::universe::TOP_100_TICKERS;

use crate::error::CliError;

use super::CommandResult;

const TICKERS_PER_LINE: usize = 10;

#[derive(Debug, Serialize)]
struct TickersResponseData {
    count: usize,
    tickers: &'static [&'static str],
}

pub fn run() -> Result<CommandResult, CliError> {
    let text = TOP_100_TICKERS
        .chunks(TICKERS_PER_LINE)
        .map(|row| row.join("  "))
        .collect::<Vec<_>>()
        .join("\n");

    let data = serde_json::to_value(TickersResponseData {
        count: TOP_100_TICKERS.len(),
        tickers: TOP_100_TICKERS,
    })?;
    Ok(CommandResult::new(data, text))
}
