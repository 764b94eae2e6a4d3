//! # Tradewise Core
//!
//! Indicator engine and analysis pipeline for single-ticker trading reports.
//!
//! ## Overview
//!
//! - **Indicator engine**: SMA(20), SMA(50), RSI(14) and annualized
//!   volatility over a column-labelled [`PriceSeries`]
//! - **Context serializer** rendering indicators, headlines and investor
//!   profile into a deterministic [`AnalysisContext`]
//! - **Provider traits** for price/headline sources and narrative generators
//! - **Yahoo adapter** and **Gemini generator** behind those traits
//! - **Analysis pipeline** wiring everything together
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`adapters`] | Market data adapters (Yahoo, live and mock) |
//! | [`analysis`] | [`Analyzer`] pipeline and [`AnalysisReport`] |
//! | [`config`] | Gemini credentials and analysis settings |
//! | [`context`] | Context serializer |
//! | [`data_source`] | Market data trait and request/response types |
//! | [`domain`] | Domain models (Symbol, Bar, RiskProfile, InvestmentHorizon) |
//! | [`error`] | Core error types |
//! | [`http_client`] | HTTP client abstraction |
//! | [`indicators`] | Indicator engine |
//! | [`narrative`] | Narrative generator trait and Gemini client |
//! | [`series`] | Column-labelled price series |
//! | [`universe`] | Supported large-cap tickers |
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use tradewise_core::{
//!     AnalysisSettings, Analyzer, GeminiConfig, GeminiGenerator, InvestmentHorizon, RiskProfile,
//!     YahooAdapter,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let analyzer = Analyzer::new(
//!         Arc::new(YahooAdapter::live()),
//!         Arc::new(GeminiGenerator::new(GeminiConfig::from_env())),
//!         AnalysisSettings::default(),
//!     );
//!
//!     let report = analyzer
//!         .run("AAPL", RiskProfile::Moderate, InvestmentHorizon::LongTerm)
//!         .await?;
//!     println!("{}", report.narrative.map(|n| n.text).unwrap_or_default());
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! Too little history is never an error: indicators come back as `None` and
//! render as [`context::NOT_AVAILABLE`]. Malformed input is a
//! [`ValidationError`]; provider failures carry a [`SourceErrorKind`]:
//!
//! ```rust
//! use tradewise_core::{SourceError, SourceErrorKind};
//!
//! fn is_transient(error: &SourceError) -> bool {
//!     matches!(
//!         error.kind(),
//!         SourceErrorKind::RateLimited | SourceErrorKind::Unavailable
//!     )
//! }
//! ```
//!
//! ## Security
//!
//! - API keys are read from environment variables only (never logged)
//! - Credential-bearing types redact secrets in `Debug` output

pub mod adapters;
pub mod analysis;
pub mod config;
pub mod context;
pub mod data_source;
pub mod domain;
pub mod error;
pub mod http_client;
pub mod indicators;
pub mod narrative;
pub mod series;
pub mod universe;

// Adapter implementations
pub use adapters::YahooAdapter;

// Pipeline
pub use analysis::{AnalysisError, AnalysisReport, Analyzer};

// Configuration
pub use config::{AnalysisSettings, GeminiConfig};

// Context serializer
pub use context::{build_context, build_context_for_window, AnalysisContext};

// Data source trait and types
pub use data_source::{
    HeadlineBatch, HeadlinesRequest, HistoryRequest, MarketDataSource, SourceError,
    SourceErrorKind,
};

// Domain models
pub use domain::{Bar, BarSeries, InvestmentHorizon, RiskProfile, Symbol, UtcDateTime};

// Error types
pub use error::{CoreError, ValidationError};

// HTTP client types
pub use http_client::{
    HttpAuth, HttpClient, HttpError, HttpMethod, HttpRequest, HttpResponse, ReqwestHttpClient,
};

// Indicator engine
pub use indicators::{compute_all_indicators, IndicatorBundle};

// Narrative generation
pub use narrative::{
    GeminiGenerator, GenerationFailure, Narrative, NarrativeGenerator, StaticGenerator,
};

// Price series
pub use series::PriceSeries;
