use serde::Serialize;
use tradewise_core::{Analyzer, IndicatorBundle, InvestmentHorizon, RiskProfile, Symbol};

use crate::cli::TickerArgs;
use crate::error::CliError;

use super::analyze::render_summary;
use super::CommandResult;

#[derive(Debug, Serialize)]
struct IndicatorsResponseData {
    symbol: Symbol,
    source: &'static str,
    observations: usize,
    indicators: IndicatorBundle,
}

pub async fn run(args: &TickerArgs, analyzer: &Analyzer) -> Result<CommandResult, CliError> {
    // Profile and horizon only shape the context, which is not printed here.
    let report = analyzer
        .prepare(&args.ticker, RiskProfile::default(), InvestmentHorizon::default())
        .await?;

    let text = render_summary(&report);
    let data = serde_json::to_value(IndicatorsResponseData {
        symbol: report.symbol,
        source: report.source,
        observations: report.observations,
        indicators: report.indicators,
    })?;
    Ok(CommandResult::new(data, text))
}
