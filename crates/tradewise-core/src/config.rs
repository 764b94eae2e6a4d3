//! Runtime settings.
//!
//! Credentials come from the environment only and are never logged. The CLI
//! loads a `.env` file before calling [`GeminiConfig::from_env`].

use std::env;

pub const GEMINI_API_KEY_VARS: [&str; 2] = ["TRADEWISE_GEMINI_API_KEY", "GEMINI_API_KEY"];
pub const GEMINI_MODEL_VAR: &str = "TRADEWISE_GEMINI_MODEL";

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash";
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_LOOKBACK_MONTHS: u32 = 6;
pub const DEFAULT_MAX_HEADLINES: usize = 10;

/// Gemini `generateContent` settings.
#[derive(Clone, PartialEq)]
pub struct GeminiConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    pub temperature: f32,
    pub max_output_tokens: u32,
    pub timeout_ms: u64,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: String::from(DEFAULT_GEMINI_MODEL),
            base_url: String::from(DEFAULT_GEMINI_BASE_URL),
            temperature: 0.4,
            max_output_tokens: 2048,
            timeout_ms: 30_000,
        }
    }
}

impl std::fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("temperature", &self.temperature)
            .field("max_output_tokens", &self.max_output_tokens)
            .field("timeout_ms", &self.timeout_ms)
            .finish()
    }
}

impl GeminiConfig {
    /// Reads the API key (`TRADEWISE_GEMINI_API_KEY`, then `GEMINI_API_KEY`)
    /// and optional model override from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Same as [`GeminiConfig::from_env`] over an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = GEMINI_API_KEY_VARS
            .iter()
            .filter_map(|name| lookup(name))
            .map(|key| key.trim().to_owned())
            .find(|key| !key.is_empty());
        let model = lookup(GEMINI_MODEL_VAR)
            .map(|model| model.trim().to_owned())
            .filter(|model| !model.is_empty())
            .unwrap_or_else(|| String::from(DEFAULT_GEMINI_MODEL));

        Self {
            api_key,
            model,
            ..Self::default()
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

/// Per-request knobs of the analysis pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalysisSettings {
    pub lookback_months: u32,
    pub max_headlines: usize,
    /// Reject symbols outside [`TOP_100_TICKERS`](crate::universe::TOP_100_TICKERS).
    pub restrict_to_universe: bool,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            lookback_months: DEFAULT_LOOKBACK_MONTHS,
            max_headlines: DEFAULT_MAX_HEADLINES,
            restrict_to_universe: false,
        }
    }
}
