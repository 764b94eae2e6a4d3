use serde::Serialize;
use tradewise_core::{AnalysisContext, Analyzer, Symbol};

use crate::cli::AnalyzeArgs;
use crate::error::CliError;

use super::CommandResult;

#[derive(Debug, Serialize)]
struct ContextResponseData {
    symbol: Symbol,
    context: AnalysisContext,
}

pub async fn run(args: &AnalyzeArgs, analyzer: &Analyzer) -> Result<CommandResult, CliError> {
    let report = analyzer
        .prepare(&args.ticker, args.profile, args.horizon)
        .await?;

    let text = report.context.to_string();
    let data = serde_json::to_value(ContextResponseData {
        symbol: report.symbol,
        context: report.context,
    })?;
    Ok(CommandResult::new(data, text))
}
