//! Narrative generation behind a swappable capability trait.
//!
//! The pipeline hands the rendered [`AnalysisContext`] to a
//! [`NarrativeGenerator`] and expects either non-empty text or a
//! [`GenerationFailure`]. [`GeminiGenerator`] talks to Google's
//! `generateContent` REST endpoint; [`StaticGenerator`] serves canned output
//! for offline runs and tests.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::GeminiConfig;
use crate::http_client::{HttpAuth, HttpClient, HttpRequest, ReqwestHttpClient};
use crate::AnalysisContext;

/// Generated report text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Narrative {
    pub text: String,
    pub model: String,
}

/// Why a narrative could not be produced.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GenerationFailure {
    #[error("GEMINI_API_KEY is not configured; set it in the environment or a .env file")]
    MissingCredentials,
    #[error("API key is invalid or not authorized; check your .env file")]
    InvalidCredentials,
    #[error("API usage limit reached; try again later")]
    QuotaExceeded,
    #[error("the model returned no text; try again")]
    EmptyResponse,
    #[error("provider error: {0}")]
    Provider(String),
}

impl GenerationFailure {
    pub const fn code(&self) -> &'static str {
        match self {
            Self::MissingCredentials => "generator.missing_credentials",
            Self::InvalidCredentials => "generator.invalid_credentials",
            Self::QuotaExceeded => "generator.quota_exceeded",
            Self::EmptyResponse => "generator.empty_response",
            Self::Provider(_) => "generator.provider",
        }
    }
}

/// Maps a provider error (HTTP status when known, plus message) onto a
/// [`GenerationFailure`]. Credential problems take precedence over quota.
pub fn classify_failure(status: Option<u16>, message: &str) -> GenerationFailure {
    classify_with_reasons(status, &[], message)
}

/// [`classify_failure`] that also weighs machine-readable reason codes
/// such as `API_KEY_INVALID` or `RESOURCE_EXHAUSTED`.
pub fn classify_with_reasons(
    status: Option<u16>,
    reasons: &[&str],
    message: &str,
) -> GenerationFailure {
    let message = message.trim();
    let lower = message.to_ascii_lowercase();
    let reasons: Vec<String> = reasons
        .iter()
        .map(|reason| reason.to_ascii_uppercase())
        .collect();
    let has_reason = |token: &str| reasons.iter().any(|reason| reason.contains(token));

    if matches!(status, Some(401 | 403))
        || lower.contains("api_key")
        || lower.contains("api key")
        || lower.contains("invalid")
        || has_reason("API_KEY")
    {
        return GenerationFailure::InvalidCredentials;
    }
    if status == Some(429)
        || lower.contains("quota")
        || lower.contains("resource")
        || has_reason("QUOTA")
        || has_reason("RESOURCE_EXHAUSTED")
    {
        return GenerationFailure::QuotaExceeded;
    }
    if message.is_empty() {
        return GenerationFailure::Provider(String::from("unknown error"));
    }
    GenerationFailure::Provider(message.to_owned())
}

/// Narrative generation capability.
pub trait NarrativeGenerator: Send + Sync {
    /// Sends the context verbatim and returns trimmed, non-empty text.
    fn generate<'a>(
        &'a self,
        context: &'a AnalysisContext,
    ) -> Pin<Box<dyn Future<Output = Result<Narrative, GenerationFailure>> + Send + 'a>>;
}

/// Google Gemini `generateContent` client.
#[derive(Clone)]
pub struct GeminiGenerator {
    config: GeminiConfig,
    http_client: Arc<dyn HttpClient>,
}

impl GeminiGenerator {
    pub fn new(config: GeminiConfig) -> Self {
        Self::with_http_client(config, Arc::new(ReqwestHttpClient::new()))
    }

    pub fn with_http_client(config: GeminiConfig, http_client: Arc<dyn HttpClient>) -> Self {
        Self {
            config,
            http_client,
        }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        )
    }

    fn request_body<'c>(&self, context: &'c AnalysisContext) -> GeminiRequest<'c> {
        GeminiRequest {
            contents: vec![GeminiContent {
                parts: vec![GeminiPart {
                    text: context.as_str(),
                }],
            }],
            generation_config: GeminiGenerationConfig {
                temperature: self.config.temperature,
                max_output_tokens: self.config.max_output_tokens,
            },
        }
    }
}

impl NarrativeGenerator for GeminiGenerator {
    fn generate<'a>(
        &'a self,
        context: &'a AnalysisContext,
    ) -> Pin<Box<dyn Future<Output = Result<Narrative, GenerationFailure>> + Send + 'a>> {
        Box::pin(async move {
            let api_key = self
                .config
                .api_key
                .as_deref()
                .map(str::trim)
                .filter(|key| !key.is_empty())
                .ok_or(GenerationFailure::MissingCredentials)?;

            let auth = HttpAuth::Header {
                name: String::from("x-goog-api-key"),
                value: api_key.to_owned(),
            };
            let request = HttpRequest::post_json(self.endpoint(), &self.request_body(context))
                .map_err(|e| GenerationFailure::Provider(e.to_string()))?
                .with_auth(&auth)
                .with_timeout_ms(self.config.timeout_ms);

            debug!(model = %self.config.model, context_len = context.as_str().len(), "calling gemini");
            let response = self.http_client.execute(request).await.map_err(|e| {
                warn!(error = %e, "gemini transport error");
                classify_failure(None, e.message())
            })?;

            if !response.is_success() {
                let failure = match serde_json::from_str::<GeminiErrorResponse>(&response.body) {
                    Ok(body) => body.error.classify(response.status),
                    Err(_) => classify_failure(Some(response.status), &response.body),
                };
                warn!(status = response.status, code = failure.code(), "gemini request failed");
                return Err(failure);
            }

            let parsed: GeminiResponse = serde_json::from_str(&response.body)
                .map_err(|e| GenerationFailure::Provider(format!("unreadable response: {e}")))?;
            let text = parsed
                .candidates
                .into_iter()
                .next()
                .and_then(|candidate| candidate.content)
                .map(|content| {
                    content
                        .parts
                        .into_iter()
                        .filter_map(|part| part.text)
                        .collect::<String>()
                })
                .unwrap_or_default();

            let text = text.trim();
            if text.is_empty() {
                return Err(GenerationFailure::EmptyResponse);
            }

            Ok(Narrative {
                text: text.to_owned(),
                model: self.config.model.clone(),
            })
        })
    }
}

/// Generator returning a fixed outcome; used by `--mock` runs and tests.
#[derive(Debug, Clone)]
pub struct StaticGenerator {
    outcome: Result<String, GenerationFailure>,
}

impl StaticGenerator {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            outcome: Ok(text.into()),
        }
    }

    pub fn failing(failure: GenerationFailure) -> Self {
        Self {
            outcome: Err(failure),
        }
    }

    /// Placeholder narrative for offline runs.
    pub fn offline() -> Self {
        Self::new(
            "Offline mode: narrative generation was skipped. \
             The context above is exactly what would be sent to the model. \
             This is not financial advice.",
        )
    }
}

impl NarrativeGenerator for StaticGenerator {
    fn generate<'a>(
        &'a self,
        context: &'a AnalysisContext,
    ) -> Pin<Box<dyn Future<Output = Result<Narrative, GenerationFailure>> + Send + 'a>> {
        let _ = context;
        Box::pin(async move {
            let text = self.outcome.clone()?;
            let text = text.trim();
            if text.is_empty() {
                return Err(GenerationFailure::EmptyResponse);
            }
            Ok(Narrative {
                text: text.to_owned(),
                model: String::from("static"),
            })
        })
    }
}

#[derive(Debug, Serialize)]
struct GeminiRequest<'a> {
    contents: Vec<GeminiContent<'a>>,
    #[serde(rename = "generationConfig")]
    generation_config: GeminiGenerationConfig,
}

#[derive(Debug, Serialize)]
struct GeminiContent<'a> {
    parts: Vec<GeminiPart<'a>>,
}

#[derive(Debug, Serialize)]
struct GeminiPart<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
struct GeminiGenerationConfig {
    temperature: f32,
    #[serde(rename = "maxOutputTokens")]
    max_output_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    #[serde(default)]
    content: Option<GeminiResponseContent>,
}

#[derive(Debug, Deserialize)]
struct GeminiResponseContent {
    #[serde(default)]
    parts: Vec<GeminiResponsePart>,
}

#[derive(Debug, Deserialize)]
struct GeminiResponsePart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorResponse {
    error: GeminiErrorBody,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorBody {
    #[serde(default)]
    message: String,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    details: Vec<GeminiErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorDetail {
    #[serde(default)]
    reason: Option<String>,
}

impl GeminiErrorBody {
    fn classify(&self, http_status: u16) -> GenerationFailure {
        let reasons: Vec<&str> = self
            .status
            .iter()
            .map(String::as_str)
            .chain(self.details.iter().filter_map(|detail| detail.reason.as_deref()))
            .collect();
        classify_with_reasons(Some(http_status), &reasons, &self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http_client::{HttpError, HttpResponse};
    use crate::{build_context, IndicatorBundle, InvestmentHorizon, RiskProfile, Symbol};
    use std::sync::Mutex;

    struct CannedHttpClient {
        response: Result<HttpResponse, HttpError>,
        requests: Mutex<Vec<HttpRequest>>,
    }

    impl CannedHttpClient {
        fn new(response: Result<HttpResponse, HttpError>) -> Arc<Self> {
            Arc::new(Self {
                response,
                requests: Mutex::new(Vec::new()),
            })
        }

        fn last_request(&self) -> HttpRequest {
            self.requests
                .lock()
                .expect("request store should not be poisoned")
                .last()
                .cloned()
                .expect("a request was sent")
        }
    }

    impl HttpClient for CannedHttpClient {
        fn execute<'a>(
            &'a self,
            request: HttpRequest,
        ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + Send + 'a>> {
            self.requests
                .lock()
                .expect("request store should not be poisoned")
                .push(request);
            let response = self.response.clone();
            Box::pin(async move { response })
        }
    }

    fn context() -> AnalysisContext {
        build_context::<&str>(
            &Symbol::parse("MSFT").expect("valid symbol"),
            RiskProfile::Moderate,
            InvestmentHorizon::MediumTerm,
            &IndicatorBundle::unavailable(),
            &[],
        )
    }

    fn configured() -> GeminiConfig {
        GeminiConfig::default()
            .with_api_key("test-key")
            .with_base_url("https://gemini.test/v1beta/")
    }

    #[tokio::test]
    async fn sends_context_verbatim_and_trims_reply() {
        let body = r#"{"candidates":[{"content":{"parts":[{"text":"  Report "},{"text":"body \n"}]}}]}"#;
        let client = CannedHttpClient::new(Ok(HttpResponse::ok_json(body)));
        let generator = GeminiGenerator::with_http_client(configured(), client.clone());
        let context = context();

        let narrative = generator.generate(&context).await.expect("generation succeeds");
        assert_eq!(narrative.text, "Report body");
        assert_eq!(narrative.model, "gemini-1.5-flash");

        let request = client.last_request();
        assert_eq!(
            request.url,
            "https://gemini.test/v1beta/models/gemini-1.5-flash:generateContent"
        );
        assert_eq!(
            request.headers.get("x-goog-api-key").map(String::as_str),
            Some("test-key")
        );
        let sent: serde_json::Value =
            serde_json::from_str(request.body.as_deref().expect("body")).expect("json body");
        assert_eq!(sent["contents"][0]["parts"][0]["text"], context.as_str());
        assert_eq!(sent["generationConfig"]["maxOutputTokens"], 2048);
    }

    #[tokio::test]
    async fn missing_key_fails_without_network_call() {
        let client = CannedHttpClient::new(Ok(HttpResponse::ok_json("{}")));
        let generator = GeminiGenerator::with_http_client(GeminiConfig::default(), client.clone());

        let failure = generator.generate(&context()).await.expect_err("must fail");
        assert_eq!(failure, GenerationFailure::MissingCredentials);
        assert!(client.requests.lock().expect("lock").is_empty());
    }

    #[tokio::test]
    async fn quota_error_body_is_classified() {
        let body = r#"{"error":{"code":429,"message":"Quota exceeded for requests per minute","status":"RESOURCE_EXHAUSTED"}}"#;
        let client = CannedHttpClient::new(Ok(HttpResponse::new(429, body)));
        let generator = GeminiGenerator::with_http_client(configured(), client);

        let failure = generator.generate(&context()).await.expect_err("must fail");
        assert_eq!(failure, GenerationFailure::QuotaExceeded);
    }

    #[tokio::test]
    async fn rejected_key_is_classified_from_error_reason() {
        let body = r#"{"error":{"code":400,"message":"Request could not be authorized.","status":"INVALID_ARGUMENT","details":[{"@type":"type.googleapis.com/google.rpc.ErrorInfo","reason":"API_KEY_INVALID","domain":"googleapis.com"}]}}"#;
        let client = CannedHttpClient::new(Ok(HttpResponse::new(400, body)));
        let generator = GeminiGenerator::with_http_client(configured(), client);

        let failure = generator.generate(&context()).await.expect_err("must fail");
        assert_eq!(failure, GenerationFailure::InvalidCredentials);
    }

    #[tokio::test]
    async fn bad_request_without_key_reason_stays_a_provider_error() {
        let body = r#"{"error":{"code":400,"message":"Unsupported MIME type.","status":"INVALID_ARGUMENT"}}"#;
        let client = CannedHttpClient::new(Ok(HttpResponse::new(400, body)));
        let generator = GeminiGenerator::with_http_client(configured(), client);

        let failure = generator.generate(&context()).await.expect_err("must fail");
        assert_eq!(
            failure,
            GenerationFailure::Provider(String::from("Unsupported MIME type."))
        );
    }

    #[tokio::test]
    async fn blank_candidate_is_empty_response() {
        let client = CannedHttpClient::new(Ok(HttpResponse::ok_json(r#"{"candidates":[]}"#)));
        let generator = GeminiGenerator::with_http_client(configured(), client);

        let failure = generator.generate(&context()).await.expect_err("must fail");
        assert_eq!(failure, GenerationFailure::EmptyResponse);
    }

    #[test]
    fn classifies_provider_messages() {
        assert_eq!(
            classify_failure(Some(400), "API key not valid. Please pass a valid API key."),
            GenerationFailure::InvalidCredentials
        );
        assert_eq!(
            classify_failure(None, "Api Key expired. Please renew the API key."),
            GenerationFailure::InvalidCredentials
        );
        assert_eq!(
            classify_with_reasons(Some(400), &["RESOURCE_EXHAUSTED"], "Too many requests"),
            GenerationFailure::QuotaExceeded
        );
        assert_eq!(
            classify_failure(None, "Resource has been exhausted"),
            GenerationFailure::QuotaExceeded
        );
        assert_eq!(
            classify_failure(Some(500), "  "),
            GenerationFailure::Provider(String::from("unknown error"))
        );
        assert_eq!(
            classify_failure(Some(503), "model overloaded"),
            GenerationFailure::Provider(String::from("model overloaded"))
        );
    }

    #[tokio::test]
    async fn static_generator_returns_configured_failure() {
        let generator = StaticGenerator::failing(GenerationFailure::QuotaExceeded);
        assert_eq!(
            generator.generate(&context()).await,
            Err(GenerationFailure::QuotaExceeded)
        );
    }
}
