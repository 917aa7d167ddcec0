//! Gemini `generateContent` client for semantic analysis.
//!
//! Builds the prompt with [`leggibile_core::semantic::build_prompt`], posts it
//! to the API, and parses the first candidate's text with
//! [`leggibile_core::semantic::parse_response`]. Transient failures (HTTP 429,
//! 5xx, transport errors) are retried with exponential backoff.

use std::time::Duration;

use leggibile_core::config::Config;
use leggibile_core::semantic::{build_prompt, parse_response};
use leggibile_core::{SemanticError, SemanticReport, SemanticResult};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

/// Default model name.
pub const DEFAULT_MODEL: &str = leggibile_core::config::DEFAULT_GEMINI_MODEL;

/// Default API base URL.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Value of [`SemanticReport::source`] for reports produced here.
pub const SOURCE: &str = "gemini";

/// Connection settings for [`GeminiClient`].
#[derive(Clone)]
pub struct GeminiConfig {
    /// API key; `None` leaves the client unconfigured.
    pub api_key: Option<String>,
    /// Model name, e.g. `gemini-flash-latest`.
    pub model: String,
    /// API base URL (without the `/v1beta` path).
    pub base_url: String,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Retries after the first attempt for transient failures.
    pub max_retries: u32,
    /// Delay before the first retry; doubles on each subsequent one.
    pub base_delay: Duration,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(60),
            max_retries: 2,
            base_delay: Duration::from_millis(500),
        }
    }
}

impl GeminiConfig {
    /// Settings from the loaded configuration, with defaults for unset fields.
    pub fn from_config(config: &Config) -> Self {
        let defaults = Self::default();
        Self {
            api_key: config
                .gemini_api_key
                .clone()
                .filter(|key| !key.trim().is_empty()),
            model: config.gemini_model.clone().unwrap_or(defaults.model),
            base_url: config.gemini_base_url.clone().unwrap_or(defaults.base_url),
            timeout: config
                .gemini_timeout_secs
                .map_or(defaults.timeout, Duration::from_secs),
            max_retries: config.gemini_max_retries.unwrap_or(defaults.max_retries),
            base_delay: defaults.base_delay,
        }
    }
}

impl std::fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("max_retries", &self.max_retries)
            .finish_non_exhaustive()
    }
}

/// Client for the Gemini API.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    config: GeminiConfig,
    http: reqwest::Client,
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: [Content<'a>; 1],
}

#[derive(Serialize)]
struct Content<'a> {
    parts: [Part<'a>; 1],
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: Option<String>,
}

/// A failed attempt, tagged with whether another attempt may succeed.
struct AttemptError {
    error: SemanticError,
    retryable: bool,
}

impl AttemptError {
    const fn fatal(error: SemanticError) -> Self {
        Self {
            error,
            retryable: false,
        }
    }

    const fn transient(error: SemanticError) -> Self {
        Self {
            error,
            retryable: true,
        }
    }
}

impl GeminiClient {
    /// Create a client.
    ///
    /// # Errors
    ///
    /// [`SemanticError::Request`] if the HTTP client cannot be built.
    pub fn new(config: GeminiConfig) -> SemanticResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| SemanticError::Request(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { config, http })
    }

    /// Whether an API key is present.
    pub const fn is_configured(&self) -> bool {
        self.config.api_key.is_some()
    }

    /// The model this client talks to.
    pub fn model(&self) -> &str {
        &self.config.model
    }

    fn endpoint(&self) -> String {
        let base = self.config.base_url.trim_end_matches('/');
        format!("{base}/v1beta/models/{}:generateContent", self.config.model)
    }

    /// Ask the model to analyze `text`.
    ///
    /// # Errors
    ///
    /// - [`SemanticError::NotConfigured`] without an API key (no request is sent)
    /// - [`SemanticError::EmptyInput`] for blank text
    /// - [`SemanticError::Request`] when the call fails after retries
    /// - [`SemanticError::InvalidResponse`] when the answer cannot be parsed
    #[instrument(skip(self, text), fields(text_len = text.len(), model = %self.config.model))]
    pub async fn analyze(&self, text: &str) -> SemanticResult<SemanticReport> {
        let Some(api_key) = self.config.api_key.as_deref() else {
            return Err(SemanticError::NotConfigured(
                "set GEMINI_API_KEY or gemini_api_key in the configuration".into(),
            ));
        };
        if text.trim().is_empty() {
            return Err(SemanticError::EmptyInput);
        }

        let prompt = build_prompt(text);
        let answer = self.generate_with_retry(api_key, &prompt).await?;
        let mut report = parse_response(&answer)?;
        report.source = SOURCE.to_string();

        debug!(
            score = report.complexity_score.score,
            "semantic analysis received"
        );
        Ok(report)
    }

    async fn generate_with_retry(&self, api_key: &str, prompt: &str) -> SemanticResult<String> {
        let mut attempt = 0;
        loop {
            match self.generate(api_key, prompt).await {
                Ok(text) => {
                    if attempt > 0 {
                        debug!(attempt, "request succeeded after retry");
                    }
                    return Ok(text);
                }
                Err(failure) => {
                    if !failure.retryable || attempt >= self.config.max_retries {
                        return Err(failure.error);
                    }
                    let delay = backoff_delay(self.config.base_delay, attempt);
                    warn!(
                        attempt,
                        delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                        error = %failure.error,
                        "retrying after transient error"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }

    async fn generate(&self, api_key: &str, prompt: &str) -> Result<String, AttemptError> {
        let body = GenerateRequest {
            contents: [Content {
                parts: [Part { text: prompt }],
            }],
        };

        let response = self
            .http
            .post(self.endpoint())
            .header("x-goog-api-key", api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| AttemptError::transient(SemanticError::Request(e.to_string())))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let error = SemanticError::Request(format!("HTTP {status}: {}", body.trim()));
            return Err(if status.as_u16() == 429 || status.is_server_error() {
                AttemptError::transient(error)
            } else {
                AttemptError::fatal(error)
            });
        }

        let parsed: GenerateResponse = response.json().await.map_err(|e| {
            AttemptError::fatal(SemanticError::InvalidResponse(format!(
                "failed to parse response envelope: {e}"
            )))
        })?;

        first_candidate_text(parsed).ok_or_else(|| {
            AttemptError::fatal(SemanticError::InvalidResponse(
                "response contains no candidate text".into(),
            ))
        })
    }
}

fn first_candidate_text(response: GenerateResponse) -> Option<String> {
    response
        .candidates
        .into_iter()
        .next()?
        .content?
        .parts
        .into_iter()
        .next()?
        .text
}

/// `base * 2^attempt`, saturating.
fn backoff_delay(base: Duration, attempt: u32) -> Duration {
    base.saturating_mul(2u32.saturating_pow(attempt))
}
