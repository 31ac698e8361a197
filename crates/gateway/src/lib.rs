use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use shared::{AgeCategory, ErrorKind, ImagePayload, SessionError};
use thiserror::Error;
use tracing::{info, warn};

pub mod config;
pub mod prompt;

pub use config::GatewaySettings;
pub use prompt::{character_prompt, prompt_for};

const API_KEY_HEADER: &str = "x-goog-api-key";
const MAX_ERROR_BODY_CHARS: usize = 300;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("API key missing: none of [{checked}] is set")]
    MissingCredential { checked: String },
    #[error("API key rejected (HTTP {status}): {message}")]
    Credential { status: u16, message: String },
    #[error("service returned HTTP {status}: {message}")]
    Http { status: u16, message: String },
    #[error("transport failure: {0}")]
    Transport(String),
    #[error("image generation failed: no content returned")]
    EmptyResponse,
    #[error("no image data found in the response")]
    NoImageInResponse,
    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

impl GatewayError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            GatewayError::MissingCredential { .. } | GatewayError::Credential { .. } => {
                ErrorKind::CredentialError
            }
            GatewayError::Http { .. } | GatewayError::Transport(_) => ErrorKind::TransportFailure,
            GatewayError::EmptyResponse => ErrorKind::EmptyResponse,
            GatewayError::NoImageInResponse | GatewayError::MalformedResponse(_) => {
                ErrorKind::NoImageInResponse
            }
        }
    }

    /// Failures worth another attempt when retries are enabled.
    pub fn is_transient(&self) -> bool {
        match self {
            GatewayError::Transport(_) => true,
            GatewayError::Http { status, .. } => {
                *status == StatusCode::TOO_MANY_REQUESTS.as_u16() || *status >= 500
            }
            _ => false,
        }
    }
}

impl From<reqwest::Error> for GatewayError {
    fn from(value: reqwest::Error) -> Self {
        GatewayError::Transport(value.to_string())
    }
}

impl From<GatewayError> for SessionError {
    fn from(value: GatewayError) -> Self {
        SessionError::new(value.kind(), value.to_string())
    }
}

/// Turns a source photo into a stylized character image.
#[async_trait]
pub trait GenerationGateway: Send + Sync {
    async fn request_character(
        &self,
        source: &ImagePayload,
        age: AgeCategory,
    ) -> Result<ImagePayload, GatewayError>;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    #[serde(alias = "mime_type")]
    mime_type: String,
    data: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Part {
    #[serde(default, alias = "inline_data", skip_serializing_if = "Option::is_none")]
    inline_data: Option<InlineData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_modalities: Vec<&'static str>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Default, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
}

#[derive(Debug, Default, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
}

fn build_request(source: &ImagePayload, age: AgeCategory) -> GenerateContentRequest {
    GenerateContentRequest {
        contents: vec![Content {
            parts: vec![
                Part {
                    inline_data: Some(InlineData {
                        mime_type: source.mime_type().to_string(),
                        data: source.to_base64(),
                    }),
                    text: None,
                },
                Part {
                    inline_data: None,
                    text: Some(prompt_for(age)),
                },
            ],
        }],
        generation_config: GenerationConfig {
            response_modalities: vec!["IMAGE", "TEXT"],
        },
    }
}

fn extract_image(response: GenerateContentResponse) -> Result<ImagePayload, GatewayError> {
    let parts = response
        .candidates
        .into_iter()
        .next()
        .and_then(|candidate| candidate.content)
        .map(|content| content.parts)
        .unwrap_or_default();

    if parts.is_empty() {
        return Err(GatewayError::EmptyResponse);
    }

    let inline = parts
        .into_iter()
        .find_map(|part| part.inline_data)
        .ok_or(GatewayError::NoImageInResponse)?;

    ImagePayload::from_base64(inline.mime_type, &inline.data)
        .map_err(|err| GatewayError::MalformedResponse(err.to_string()))
}

fn error_message(body: &str) -> String {
    if let Ok(envelope) = serde_json::from_str::<ErrorEnvelope>(body) {
        if !envelope.error.message.is_empty() {
            return envelope.error.message;
        }
    }
    body.chars().take(MAX_ERROR_BODY_CHARS).collect()
}

fn classify_http_failure(status: StatusCode, body: &str) -> GatewayError {
    let message = error_message(body);
    let mentions_key = message.to_ascii_lowercase().contains("api key");
    if status == StatusCode::UNAUTHORIZED
        || status == StatusCode::FORBIDDEN
        || (status == StatusCode::BAD_REQUEST && mentions_key)
    {
        GatewayError::Credential {
            status: status.as_u16(),
            message,
        }
    } else {
        GatewayError::Http {
            status: status.as_u16(),
            message,
        }
    }
}

/// [`GenerationGateway`] backed by the Gemini `generateContent` endpoint.
pub struct GeminiGateway {
    http: Client,
    settings: GatewaySettings,
}

impl GeminiGateway {
    pub fn new(settings: GatewaySettings) -> Self {
        Self {
            http: Client::new(),
            settings,
        }
    }

    async fn send_once(
        &self,
        api_key: &str,
        body: &GenerateContentRequest,
    ) -> Result<ImagePayload, GatewayError> {
        let mut request = self
            .http
            .post(self.settings.generate_url())
            .header(API_KEY_HEADER, api_key)
            .json(body);
        if let Some(timeout) = self.settings.request_timeout {
            request = request.timeout(timeout);
        }

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(classify_http_failure(status, &text));
        }

        let parsed: GenerateContentResponse = serde_json::from_str(&text)
            .map_err(|err| GatewayError::MalformedResponse(err.to_string()))?;
        extract_image(parsed)
    }
}

#[async_trait]
impl GenerationGateway for GeminiGateway {
    async fn request_character(
        &self,
        source: &ImagePayload,
        age: AgeCategory,
    ) -> Result<ImagePayload, GatewayError> {
        let api_key = self
            .settings
            .resolve_api_key()
            .ok_or_else(|| GatewayError::MissingCredential {
                checked: self.settings.api_key_vars.join(", "),
            })?;

        let body = build_request(source, age);
        info!(
            model = %self.settings.model,
            age = %age,
            mime_type = source.mime_type(),
            source_bytes = source.len(),
            "gateway: requesting character"
        );

        let mut attempt: u32 = 0;
        loop {
            match self.send_once(&api_key, &body).await {
                Ok(image) => {
                    info!(
                        mime_type = image.mime_type(),
                        result_bytes = image.len(),
                        attempt,
                        "gateway: character received"
                    );
                    return Ok(image);
                }
                Err(err) if err.is_transient() && attempt < self.settings.max_retries => {
                    attempt += 1;
                    let delay = self.settings.retry_backoff * attempt;
                    warn!(
                        attempt,
                        max_retries = self.settings.max_retries,
                        delay_ms = delay.as_millis() as u64,
                        "gateway: transient failure, retrying: {err}"
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(err) => {
                    warn!(attempt, kind = ?err.kind(), "gateway: request failed: {err}");
                    return Err(err);
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
