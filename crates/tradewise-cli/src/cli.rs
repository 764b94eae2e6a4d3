//! CLI argument definitions for Tradewise.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `analyze` | Full report: indicators, headlines and generated narrative |
//! | `indicators` | Technical indicators only |
//! | `context` | The context that would be sent to the model |
//! | `tickers` | Supported large-cap tickers |
//!
//! # Global Options
//!
//! | Option | Default | Description |
//! |--------|---------|-------------|
//! | `--format` | `text` | Output format (text, json) |
//! | `--pretty` | `false` | Pretty-print JSON output |
//! | `--mock` | `false` | Deterministic offline data, no model call |
//! | `--months` | `6` | Months of daily history |
//! | `--headlines` | `10` | Maximum headlines in the context |
//! | `--restrict-universe` | `false` | Only accept listed tickers |
//!
//! # Examples
//!
//! ```bash
//! tradewise analyze AAPL --profile conservative --horizon long
//! tradewise indicators MSFT --format json --pretty
//! tradewise context NVDA --mock
//! ```

use clap::{Args, Parser, Subcommand, ValueEnum};
use tradewise_core::config::{DEFAULT_LOOKBACK_MONTHS, DEFAULT_MAX_HEADLINES};
use tradewise_core::{AnalysisSettings, InvestmentHorizon, RiskProfile};

/// Tradewise - technical indicators and AI-written trading reports
#[derive(Debug, Parser)]
#[command(
    name = "tradewise",
    author,
    version,
    about = "Technical indicators and AI-written trading reports",
    long_about = "Tradewise fetches daily prices and recent headlines for a ticker, computes \
moving averages, RSI and volatility, and asks Gemini for a structured report tailored to \
your risk profile and horizon.\n\
\n\
Set GEMINI_API_KEY in the environment or a .env file before running 'analyze'.\n\
The output is informational only and is not financial advice."
)]
pub struct Cli {
    /// Output format for results.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Pretty-print JSON output with indentation.
    #[arg(long, global = true, default_value_t = false)]
    pub pretty: bool,

    /// Use deterministic offline prices and headlines and skip the model call.
    #[arg(long, global = true, default_value_t = false)]
    pub mock: bool,

    /// Months of daily price history to download.
    #[arg(
        long,
        global = true,
        default_value_t = DEFAULT_LOOKBACK_MONTHS,
        value_parser = clap::value_parser!(u32).range(1..=120)
    )]
    pub months: u32,

    /// Maximum number of headlines included in the context.
    #[arg(
        long,
        global = true,
        default_value_t = DEFAULT_MAX_HEADLINES as u64,
        value_parser = clap::value_parser!(u64).range(1..=50)
    )]
    pub headlines: u64,

    /// Reject tickers outside the supported large-cap list.
    #[arg(long, global = true, default_value_t = false)]
    pub restrict_universe: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    pub fn analysis_settings(&self) -> AnalysisSettings {
        AnalysisSettings {
            lookback_months: self.months,
            max_headlines: usize::try_from(self.headlines).unwrap_or(DEFAULT_MAX_HEADLINES),
            restrict_to_universe: self.restrict_universe,
        }
    }
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable report.
    Text,
    /// Single JSON object.
    Json,
}

/// Available CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the full analysis and print the generated report.
    ///
    /// # Examples
    ///
    ///   tradewise analyze AAPL
    ///   tradewise analyze brk-b --profile aggressive --horizon short
    Analyze(AnalyzeArgs),

    /// Compute technical indicators without calling the model.
    Indicators(TickerArgs),

    /// Print the context that `analyze` would send to the model.
    Context(AnalyzeArgs),

    /// List the supported large-cap tickers.
    Tickers,
}

/// Ticker plus investor profile.
#[derive(Debug, Args)]
pub struct AnalyzeArgs {
    /// Ticker symbol (case-insensitive, e.g. AAPL, brk-b).
    pub ticker: String,

    /// Risk profile: conservative, moderate or aggressive.
    #[arg(long, default_value_t = RiskProfile::Moderate)]
    pub profile: RiskProfile,

    /// Investment horizon: short, medium or long.
    #[arg(long, default_value_t = InvestmentHorizon::MediumTerm)]
    pub horizon: InvestmentHorizon,
}

/// Arguments for commands that take only a ticker.
#[derive(Debug, Args)]
pub struct TickerArgs {
    /// Ticker symbol (case-insensitive).
    pub ticker: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_profile_and_horizon_aliases() {
        let cli = Cli::try_parse_from([
            "tradewise",
            "analyze",
            "aapl",
            "--profile",
            "aggressive",
            "--horizon",
            "short",
            "--format",
            "json",
        ])
        .expect("valid arguments");

        assert_eq!(cli.format, OutputFormat::Json);
        match cli.command {
            Command::Analyze(args) => {
                assert_eq!(args.ticker, "aapl");
                assert_eq!(args.profile, RiskProfile::Aggressive);
                assert_eq!(args.horizon, InvestmentHorizon::ShortTerm);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn zero_months_is_rejected() {
        let result = Cli::try_parse_from(["tradewise", "indicators", "MSFT", "--months", "0"]);
        assert!(result.is_err());
    }

    #[test]
    fn settings_follow_global_flags() {
        let cli = Cli::try_parse_from([
            "tradewise",
            "--months",
            "12",
            "--headlines",
            "3",
            "--restrict-universe",
            "tickers",
        ])
        .expect("valid arguments");

        let settings = cli.analysis_settings();
        assert_eq!(settings.lookback_months, 12);
        assert_eq!(settings.max_headlines, 3);
        assert!(settings.restrict_to_universe);
    }
}
