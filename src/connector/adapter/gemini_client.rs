use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::application::AnswerGenerator;
use crate::domain::DomainError;

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash-latest";
const API_KEY_HEADER: &str = "x-goog-api-key";

/// Connection settings for [`GeminiClient`].
///
/// The API key travels in the `x-goog-api-key` header, never in the URL.
#[derive(Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    /// `None` leaves requests without a deadline.
    pub timeout: Option<Duration>,
}

impl GeminiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: None,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Construct from environment variables:
    ///
    /// | Variable              | Default                                     |
    /// |-----------------------|---------------------------------------------|
    /// | `GEMINI_API_KEY`      | required                                    |
    /// | `GEMINI_BASE_URL`     | `https://generativelanguage.googleapis.com` |
    /// | `GEMINI_MODEL`        | `gemini-1.5-flash-latest`                   |
    /// | `GEMINI_TIMEOUT_SECS` | unset or `0` (no timeout)                   |
    pub fn from_env() -> Result<Self, DomainError> {
        Self::from_vars(|name| std::env::var(name).ok())
    }

    /// Same as [`GeminiConfig::from_env`], reading variables through `var`.
    fn from_vars(var: impl Fn(&str) -> Option<String>) -> Result<Self, DomainError> {
        let key = var("GEMINI_API_KEY")
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| DomainError::configuration("GEMINI_API_KEY is not set"))?;

        let mut config = Self::new(key);

        if let Some(base) = var("GEMINI_BASE_URL").filter(|v| !v.trim().is_empty()) {
            config = config.with_base_url(base.trim());
        }
        if let Some(model) = var("GEMINI_MODEL").filter(|v| !v.trim().is_empty()) {
            config = config.with_model(model.trim());
        }
        if let Some(secs) = var("GEMINI_TIMEOUT_SECS").filter(|v| !v.trim().is_empty()) {
            let secs: u64 = secs.trim().parse().map_err(|_| {
                DomainError::configuration(format!("GEMINI_TIMEOUT_SECS is not a number: {secs}"))
            })?;
            // 0 means no timeout.
            if secs > 0 {
                config = config.with_timeout(Duration::from_secs(secs));
            }
        }

        Ok(config)
    }

    pub fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }
}

impl fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[derive(Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<RequestContent<'a>>,
}

#[derive(Serialize)]
struct RequestContent<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

impl<'a> GenerateContentRequest<'a> {
    /// The question is the only content; no earlier turns are sent.
    fn for_question(question: &'a str) -> Self {
        Self {
            contents: vec![RequestContent {
                parts: vec![RequestPart { text: question }],
            }],
        }
    }
}

/// Minimal subset of the `generateContent` response we care about.
#[derive(Deserialize)]
struct GenerateContentResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    parts: Option<Vec<ResponsePart>>,
}

#[derive(Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: Option<ErrorDetail>,
    message: Option<String>,
}

#[derive(Deserialize)]
struct ErrorDetail {
    message: Option<String>,
}

/// HTTP client for the Gemini `generateContent` API.
///
/// Failures are classified the way the session reports them:
/// - a non-success status is a `ServerError` carrying the server's message;
/// - a request that got no response (connect, timeout, transport) is a
///   `NetworkError`;
/// - a request that could not be built, or a payload without
///   `candidates[0].content.parts[0].text`, is a `ClientError`.
pub struct GeminiClient {
    client: reqwest::Client,
    api_key: String,
    model: String,
    /// Full endpoint URL (base + model path).
    url: String,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Result<Self, DomainError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| DomainError::configuration(format!("GeminiClient: {e}")))?;

        let url = config.endpoint();
        debug!("GeminiClient targeting {}", url);

        Ok(Self {
            client,
            api_key: config.api_key,
            model: config.model,
            url,
        })
    }

    /// Pull `candidates[0].content.parts[0].text` out of a response body.
    fn extract_answer(body: &str) -> Result<String, DomainError> {
        let response: GenerateContentResponse = serde_json::from_str(body)
            .map_err(|e| DomainError::client(format!("GeminiClient: failed to parse response: {e}")))?;

        response
            .candidates
            .ok_or_else(|| DomainError::client("GeminiClient: response has no candidates"))?
            .into_iter()
            .next()
            .ok_or_else(|| DomainError::client("GeminiClient: candidates list is empty"))?
            .content
            .and_then(|c| c.parts)
            .and_then(|parts| parts.into_iter().next())
            .and_then(|part| part.text)
            .ok_or_else(|| DomainError::client("GeminiClient: first candidate has no text part"))
    }

    /// Best-effort extraction of the server's explanation from an error body.
    fn server_message(body: &str) -> Option<String> {
        let envelope: ErrorEnvelope = serde_json::from_str(body).ok()?;
        let present = |m: &String| !m.trim().is_empty();
        envelope
            .error
            .and_then(|e| e.message)
            .filter(present)
            .or_else(|| envelope.message.filter(present))
    }

    fn classify_send_error(e: reqwest::Error) -> DomainError {
        if e.is_builder() {
            DomainError::client(format!("GeminiClient: could not build request: {e}"))
        } else {
            DomainError::network(format!("GeminiClient: request failed: {e}"))
        }
    }
}

#[async_trait]
impl AnswerGenerator for GeminiClient {
    async fn generate(&self, question: &str) -> Result<String, DomainError> {
        let request = GenerateContentRequest::for_question(question);

        let response = self
            .client
            .post(&self.url)
            .header(API_KEY_HEADER, &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(Self::classify_send_error)?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| DomainError::network(format!("GeminiClient: failed to read response: {e}")))?;

        if !status.is_success() {
            warn!("GeminiClient: API returned {status}: {body}");
            return Err(DomainError::server(
                status.as_u16(),
                Self::server_message(&body),
            ));
        }

        Self::extract_answer(&body)
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
