//! End-to-end analysis pipeline.
//!
//! ```text
//! ticker ─▶ normalize ─▶ universe check ─▶ validate ─▶ history + headlines
//!                                                          │
//!        narrative ◀─ context ◀─ indicators ◀──────────────┘
//! ```
//!
//! Headline failures degrade to an empty list; price failures abort.

use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

use crate::config::AnalysisSettings;
use crate::data_source::{HeadlinesRequest, HistoryRequest, MarketDataSource, SourceError};
use crate::narrative::{GenerationFailure, Narrative, NarrativeGenerator};
use crate::{
    build_context_for_window, compute_all_indicators, universe, AnalysisContext, CoreError,
    IndicatorBundle, InvestmentHorizon, PriceSeries, RiskProfile, Symbol, UtcDateTime,
    ValidationError,
};

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("ticker '{input}' is not valid: {source}")]
    MalformedTicker {
        input: String,
        #[source]
        source: ValidationError,
    },
    #[error("ticker '{symbol}' was not found or has no price history")]
    InvalidTicker { symbol: Symbol },
    #[error("ticker '{symbol}' is not in the supported universe")]
    NotInUniverse { symbol: Symbol },
    #[error("could not fetch price history for '{symbol}': {source}")]
    PricesUnavailable {
        symbol: Symbol,
        #[source]
        source: SourceError,
    },
    #[error("narrative generation failed: {0}")]
    Generation(#[from] GenerationFailure),
}

impl AnalysisError {
    pub const fn code(&self) -> &'static str {
        match self {
            Self::MalformedTicker { .. } | Self::InvalidTicker { .. } => "analysis.invalid_ticker",
            Self::NotInUniverse { .. } => "analysis.not_in_universe",
            Self::PricesUnavailable { .. } => "analysis.prices_unavailable",
            Self::Generation(failure) => failure.code(),
        }
    }
}

/// Everything gathered for one ticker. `narrative` is `None` until
/// [`Analyzer::run`] has called the generator.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub symbol: Symbol,
    pub risk_profile: RiskProfile,
    pub horizon: InvestmentHorizon,
    pub source: &'static str,
    pub generated_at: UtcDateTime,
    pub observations: usize,
    pub indicators: IndicatorBundle,
    pub headlines: Vec<String>,
    pub context: AnalysisContext,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub narrative: Option<Narrative>,
}

impl AnalysisReport {
    pub fn to_json(&self, pretty: bool) -> Result<String, CoreError> {
        let json = if pretty {
            serde_json::to_string_pretty(self)?
        } else {
            serde_json::to_string(self)?
        };
        Ok(json)
    }
}

/// Wires a data source and a narrative generator into the analysis flow.
#[derive(Clone)]
pub struct Analyzer {
    source: Arc<dyn MarketDataSource>,
    generator: Arc<dyn NarrativeGenerator>,
    settings: AnalysisSettings,
}

impl Analyzer {
    pub fn new(
        source: Arc<dyn MarketDataSource>,
        generator: Arc<dyn NarrativeGenerator>,
        settings: AnalysisSettings,
    ) -> Self {
        Self {
            source,
            generator,
            settings,
        }
    }

    pub const fn settings(&self) -> &AnalysisSettings {
        &self.settings
    }

    /// Trims and uppercases `input`, applies the universe restriction, and
    /// confirms the provider has history for it.
    pub async fn resolve_ticker(&self, input: &str) -> Result<Symbol, AnalysisError> {
        let symbol = Symbol::parse(input).map_err(|source| AnalysisError::MalformedTicker {
            input: input.trim().to_owned(),
            source,
        })?;

        if self.settings.restrict_to_universe && !universe::is_allowed(&symbol) {
            return Err(AnalysisError::NotInUniverse { symbol });
        }
        if !self.source.validate_ticker(&symbol).await {
            return Err(AnalysisError::InvalidTicker { symbol });
        }
        Ok(symbol)
    }

    /// Fetches prices and headlines and renders the context, without calling
    /// the narrative generator.
    #[instrument(skip(self), fields(source = self.source.name()))]
    pub async fn prepare(
        &self,
        ticker: &str,
        risk_profile: RiskProfile,
        horizon: InvestmentHorizon,
    ) -> Result<AnalysisReport, AnalysisError> {
        let symbol = self.resolve_ticker(ticker).await?;

        let history_request = HistoryRequest::new(symbol.clone(), self.settings.lookback_months)
            .map_err(|source| AnalysisError::PricesUnavailable {
                symbol: symbol.clone(),
                source,
            })?;
        let bars = self
            .source
            .history(history_request)
            .await
            .map_err(|source| {
                warn!(symbol = %symbol, code = source.code(), "price history unavailable");
                AnalysisError::PricesUnavailable {
                    symbol: symbol.clone(),
                    source,
                }
            })?;

        let headlines = self.fetch_headlines(&symbol).await;
        let prices = PriceSeries::from_bars(&bars);
        let indicators = compute_all_indicators(&prices);
        let context = build_context_for_window(
            &symbol,
            risk_profile,
            horizon,
            self.settings.lookback_months,
            &indicators,
            headlines.as_slice(),
        );

        info!(
            symbol = %symbol,
            observations = prices.len(),
            headlines = headlines.len(),
            indicators = indicators.available_count(),
            "analysis context prepared"
        );

        Ok(AnalysisReport {
            symbol,
            risk_profile,
            horizon,
            source: self.source.name(),
            generated_at: UtcDateTime::now(),
            observations: prices.len(),
            indicators,
            headlines,
            context,
            narrative: None,
        })
    }

    /// Full pipeline including narrative generation.
    pub async fn run(
        &self,
        ticker: &str,
        risk_profile: RiskProfile,
        horizon: InvestmentHorizon,
    ) -> Result<AnalysisReport, AnalysisError> {
        let mut report = self.prepare(ticker, risk_profile, horizon).await?;
        let narrative = self.generator.generate(&report.context).await.map_err(|failure| {
            warn!(symbol = %report.symbol, code = failure.code(), "narrative generation failed");
            AnalysisError::Generation(failure)
        })?;
        debug!(symbol = %report.symbol, model = %narrative.model, "narrative generated");
        report.narrative = Some(narrative);
        Ok(report)
    }

    async fn fetch_headlines(&self, symbol: &Symbol) -> Vec<String> {
        let request = match HeadlinesRequest::new(symbol.clone(), self.settings.max_headlines) {
            Ok(request) => request,
            Err(_) => return Vec::new(),
        };
        match self.source.headlines(request).await {
            Ok(batch) => batch.headlines,
            Err(error) => {
                warn!(symbol = %symbol, code = error.code(), "headlines unavailable, continuing without");
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::narrative::StaticGenerator;
    use crate::YahooAdapter;

    fn analyzer(settings: AnalysisSettings) -> Analyzer {
        Analyzer::new(
            Arc::new(YahooAdapter::mock()),
            Arc::new(StaticGenerator::new("Outlook: neutral.")),
            settings,
        )
    }

    #[tokio::test]
    async fn prepare_normalizes_ticker_and_skips_narrative() {
        let report = analyzer(AnalysisSettings::default())
            .prepare(" msft ", RiskProfile::Conservative, InvestmentHorizon::LongTerm)
            .await
            .expect("mock analysis succeeds");

        assert_eq!(report.symbol.as_str(), "MSFT");
        assert!(report.narrative.is_none());
        assert!(report.context.as_str().contains("## Asset: MSFT"));
        assert!(report
            .context
            .as_str()
            .contains("## Technical indicators (last 6 months)"));
        assert!(report.indicators.ma_50.is_some());
    }

    #[tokio::test]
    async fn restricted_universe_rejects_unknown_symbol() {
        let settings = AnalysisSettings {
            restrict_to_universe: true,
            ..AnalysisSettings::default()
        };
        let err = analyzer(settings)
            .run("ZZZZ", RiskProfile::Moderate, InvestmentHorizon::MediumTerm)
            .await
            .expect_err("must fail");

        assert!(matches!(err, AnalysisError::NotInUniverse { .. }));
        assert_eq!(err.code(), "analysis.not_in_universe");
    }

    #[tokio::test]
    async fn blank_ticker_is_malformed() {
        let err = analyzer(AnalysisSettings::default())
            .run("   ", RiskProfile::Moderate, InvestmentHorizon::MediumTerm)
            .await
            .expect_err("must fail");

        assert!(matches!(
            err,
            AnalysisError::MalformedTicker {
                source: ValidationError::EmptySymbol,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn report_serializes_with_narrative() {
        let report = analyzer(AnalysisSettings::default())
            .run("AAPL", RiskProfile::Aggressive, InvestmentHorizon::ShortTerm)
            .await
            .expect("mock analysis succeeds");

        let json: serde_json::Value =
            serde_json::from_str(&report.to_json(false).expect("serializable")).expect("json");
        assert_eq!(json["symbol"], "AAPL");
        assert_eq!(json["risk_profile"], "aggressive");
        assert_eq!(json["narrative"]["text"], "Outlook: neutral.");
        assert_eq!(json["source"], "yahoo-mock");
    }
}
