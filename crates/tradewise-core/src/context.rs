//! Deterministic rendering of an analysis request into the text payload
//! handed to the narrative generator.
//!
//! The layout is fixed regardless of how much data is available:
//!
//! 1. asset block (symbol, risk profile, horizon)
//! 2. technical indicators, absent values as [`NOT_AVAILABLE`]
//! 3. headlines in caller order, or [`NO_HEADLINES`]
//! 4. response directives for the generator
//!
//! Identical inputs always render byte-identical output.

use std::fmt::{Display, Formatter};

use serde::Serialize;

use crate::{IndicatorBundle, InvestmentHorizon, RiskProfile, Symbol};

/// Placeholder for an indicator without enough history.
pub const NOT_AVAILABLE: &str = "N/A (insufficient data)";

/// Placeholder line for an empty headline list.
pub const NO_HEADLINES: &str = "No recent headlines found.";

const DIRECTIVES: [&str; 7] = [
    "1. **Technical analysis**: Interpret the moving averages, RSI and volatility.",
    "2. **News sentiment**: Classify the overall sentiment as POSITIVE, NEGATIVE or NEUTRAL and briefly justify it.",
    "3. **Bullish scenario**: A plausible favourable evolution and the conditions that would support it.",
    "4. **Bearish scenario**: The main risks and a plausible unfavourable evolution.",
    "5. **Risk assessment**: Risk level (low/medium/high) and why.",
    "6. **Profile-based recommendation**: Adapt tone and considerations to the stated risk profile and horizon.",
    "7. **Disclaimer**: State explicitly that this analysis is NOT financial advice and that the user should consult a qualified professional.",
];

/// Serialized context document. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct AnalysisContext(String);

impl AnalysisContext {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl Display for AnalysisContext {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for AnalysisContext {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Renders the context for one analysis request.
pub fn build_context<S>(
    symbol: &Symbol,
    risk_profile: RiskProfile,
    horizon: InvestmentHorizon,
    indicators: &IndicatorBundle,
    headlines: &[S],
) -> AnalysisContext
where
    S: AsRef<str>,
{
    render(symbol, risk_profile, horizon, None, indicators, headlines)
}

/// [`build_context`] with the price-history span named in the indicator
/// heading, e.g. `## Technical indicators (last 6 months)`.
pub fn build_context_for_window<S>(
    symbol: &Symbol,
    risk_profile: RiskProfile,
    horizon: InvestmentHorizon,
    lookback_months: u32,
    indicators: &IndicatorBundle,
    headlines: &[S],
) -> AnalysisContext
where
    S: AsRef<str>,
{
    render(
        symbol,
        risk_profile,
        horizon,
        Some(lookback_months),
        indicators,
        headlines,
    )
}

fn render<S>(
    symbol: &Symbol,
    risk_profile: RiskProfile,
    horizon: InvestmentHorizon,
    lookback_months: Option<u32>,
    indicators: &IndicatorBundle,
    headlines: &[S],
) -> AnalysisContext
where
    S: AsRef<str>,
{
    let indicator_heading = match lookback_months {
        Some(1) => String::from("## Technical indicators (last 1 month)"),
        Some(months) => format!("## Technical indicators (last {months} months)"),
        None => String::from("## Technical indicators"),
    };
    let mut lines: Vec<String> = vec![
        String::from("# Trading analysis context"),
        String::new(),
        format!("## Asset: {symbol}"),
        format!("- User risk profile: {}", risk_profile.label()),
        format!("- Investment horizon: {}", horizon.label()),
        String::new(),
        indicator_heading,
        format!("- Most recent close: {}", render_value(indicators.last_close)),
        format!("- 20-day moving average: {}", render_value(indicators.ma_20)),
        format!("- 50-day moving average: {}", render_value(indicators.ma_50)),
        format!("- RSI (14): {}", render_value(indicators.rsi)),
        format!(
            "- Annualized volatility (std. dev. of returns): {}",
            render_value(indicators.volatility)
        ),
        String::new(),
        String::from("## Recent headlines"),
    ];

    if headlines.is_empty() {
        lines.push(format!("- {NO_HEADLINES}"));
    } else {
        lines.extend(
            headlines
                .iter()
                .map(|headline| format!("- {}", single_line(headline.as_ref()))),
        );
    }

    lines.extend([
        String::new(),
        String::from("---"),
        String::new(),
        String::from(
            "Respond clearly and in a structured way. Include the following sections:",
        ),
    ]);
    lines.extend(DIRECTIVES.iter().map(|directive| String::from(*directive)));

    AnalysisContext(lines.join("\n"))
}

/// Stable textual form of an optional indicator value. Whole numbers keep a
/// trailing `.0` so `100.0` never renders as `100`.
pub fn render_value(value: Option<f64>) -> String {
    match value {
        None => String::from(NOT_AVAILABLE),
        Some(value) if value.fract() == 0.0 && value.abs() < 1e15 => format!("{value:.1}"),
        Some(value) => value.to_string(),
    }
}

// A headline containing a newline would otherwise open a new context line.
fn single_line(headline: &str) -> String {
    headline.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn aapl() -> Symbol {
        Symbol::parse("AAPL").expect("valid symbol")
    }

    #[test]
    fn renders_whole_numbers_with_one_decimal() {
        assert_eq!(render_value(Some(100.0)), "100.0");
        assert_eq!(render_value(Some(19.5)), "19.5");
        assert_eq!(render_value(Some(0.2345)), "0.2345");
        assert_eq!(render_value(None), NOT_AVAILABLE);
    }

    #[test]
    fn missing_indicators_use_placeholder() {
        let context = build_context(
            &aapl(),
            RiskProfile::Moderate,
            InvestmentHorizon::MediumTerm,
            &IndicatorBundle::unavailable(),
            &["Apple ships new phone"],
        );

        assert!(context
            .as_str()
            .contains(&format!("- 50-day moving average: {NOT_AVAILABLE}")));
        assert!(context.as_str().contains("- Apple ships new phone"));
    }

    #[test]
    fn multi_line_headline_is_flattened() {
        let context = build_context(
            &aapl(),
            RiskProfile::Aggressive,
            InvestmentHorizon::ShortTerm,
            &IndicatorBundle::unavailable(),
            &["Earnings beat\nexpectations"],
        );

        assert!(context.as_str().contains("- Earnings beat expectations\n"));
    }

    #[test]
    fn ends_with_disclaimer_directive() {
        let context = build_context::<&str>(
            &aapl(),
            RiskProfile::Conservative,
            InvestmentHorizon::LongTerm,
            &IndicatorBundle::unavailable(),
            &[],
        );

        let last = context.as_str().lines().last().expect("non-empty");
        assert!(last.starts_with("7. **Disclaimer**"));
    }
}
