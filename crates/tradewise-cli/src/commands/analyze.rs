use std::fmt::Write as _;

use tradewise_core::context::render_value;
use tradewise_core::{AnalysisReport, Analyzer};

use crate::cli::AnalyzeArgs;
use crate::error::CliError;

use super::CommandResult;

pub async fn run(args: &AnalyzeArgs, analyzer: &Analyzer) -> Result<CommandResult, CliError> {
    let report = analyzer
        .run(&args.ticker, args.profile, args.horizon)
        .await?;

    let data = serde_json::to_value(&report)?;
    Ok(CommandResult::new(data, render_report(&report)))
}

/// Header, indicator table, headlines and narrative as plain text.
pub(super) fn render_report(report: &AnalysisReport) -> String {
    let mut out = render_summary(report);

    out.push_str("\nRecent headlines\n");
    if report.headlines.is_empty() {
        out.push_str("  (none found)\n");
    }
    for headline in &report.headlines {
        let _ = writeln!(out, "  - {headline}");
    }

    if let Some(narrative) = &report.narrative {
        let _ = write!(out, "\nReport ({})\n\n{}\n", narrative.model, narrative.text);
    }
    out
}

/// Header line plus the indicator table.
pub(super) fn render_summary(report: &AnalysisReport) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} | {} profile | {} horizon",
        report.symbol,
        report.risk_profile.label(),
        report.horizon.label()
    );
    let _ = writeln!(
        out,
        "source: {}, {} daily observations",
        report.source, report.observations
    );

    out.push_str("\nTechnical indicators\n");
    let indicators = &report.indicators;
    for (label, value) in [
        ("Last close", indicators.last_close),
        ("SMA 20", indicators.ma_20),
        ("SMA 50", indicators.ma_50),
        ("RSI 14", indicators.rsi),
        ("Volatility (ann.)", indicators.volatility),
    ] {
        let _ = writeln!(out, "  {label:<18} {}", render_value(value));
    }
    out
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use tradewise_core::{
        AnalysisSettings, InvestmentHorizon, RiskProfile, StaticGenerator, YahooAdapter,
    };

    use super::*;

    #[tokio::test]
    async fn text_report_lists_indicators_headlines_and_narrative() {
        let analyzer = Analyzer::new(
            Arc::new(YahooAdapter::mock()),
            Arc::new(StaticGenerator::new("Sentiment: NEUTRAL")),
            AnalysisSettings::default(),
        );
        let report = analyzer
            .run("AAPL", RiskProfile::Conservative, InvestmentHorizon::LongTerm)
            .await
            .expect("mock analysis succeeds");

        let text = render_report(&report);
        assert!(text.starts_with("AAPL | Conservative profile | Long term horizon"));
        assert!(text.contains("SMA 50"));
        assert!(text.contains("Recent headlines\n  - "));
        assert!(text.trim_end().ends_with("Sentiment: NEUTRAL"));
    }
}
