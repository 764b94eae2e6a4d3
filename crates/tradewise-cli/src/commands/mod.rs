mod analyze;
mod context;
mod indicators;
mod tickers;

use std::sync::Arc;

use serde_json::Value;
use tradewise_core::{
    Analyzer, GeminiConfig, GeminiGenerator, MarketDataSource, NarrativeGenerator,
    StaticGenerator, YahooAdapter,
};

use crate::cli::{Cli, Command};
use crate::error::CliError;

/// Command output in both renderings; the global `--format` flag picks one.
pub struct CommandResult {
    pub data: Value,
    pub text: String,
}

impl CommandResult {
    pub fn new(data: Value, text: impl Into<String>) -> Self {
        Self {
            data,
            text: text.into(),
        }
    }
}

pub async fn run(cli: &Cli) -> Result<CommandResult, CliError> {
    let analyzer = build_analyzer(cli);

    match &cli.command {
        Command::Analyze(args) => analyze::run(args, &analyzer).await,
        Command::Indicators(args) => indicators::run(args, &analyzer).await,
        Command::Context(args) => context::run(args, &analyzer).await,
        Command::Tickers => tickers::run(),
    }
}

fn build_analyzer(cli: &Cli) -> Analyzer {
    let (source, generator): (Arc<dyn MarketDataSource>, Arc<dyn NarrativeGenerator>) = if cli.mock
    {
        (
            Arc::new(YahooAdapter::mock()),
            Arc::new(StaticGenerator::offline()),
        )
    } else {
        (
            Arc::new(YahooAdapter::live()),
            Arc::new(GeminiGenerator::new(GeminiConfig::from_env())),
        )
    };

    Analyzer::new(source, generator, cli.analysis_settings())
}
