//! GeminiApiAgent - Direct REST API implementation for Gemini.
//!
//! The API key is looked up through [`SecretService`] before every call, so a
//! missing key surfaces as [`TranslationError::AuthMissing`] rather than a
//! construction failure.

use std::sync::Arc;

use async_trait::async_trait;
use opsh_core::config::DEFAULT_GEMINI_MODEL;
use opsh_core::secret::SecretService;
use opsh_core::translator::Translator;
use opsh_core::TranslationError;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

const BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Translator that talks to the Gemini HTTP API.
#[derive(Clone)]
pub struct GeminiApiAgent {
    client: Client,
    secrets: Arc<dyn SecretService>,
    model: String,
    base_url: String,
}

impl GeminiApiAgent {
    /// Creates an agent using the default model.
    pub fn new(secrets: Arc<dyn SecretService>) -> Self {
        Self {
            client: Client::new(),
            secrets,
            model: DEFAULT_GEMINI_MODEL.to_string(),
            base_url: BASE_URL.to_string(),
        }
    }

    /// Overrides the model after construction.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Points the agent at a different API root (used by tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    async fn send_request(
        &self,
        api_key: &str,
        body: &GenerateContentRequest,
    ) -> Result<String, TranslationError> {
        let url = format!("{}/{}:generateContent", self.base_url, self.model);

        let response = self
            .client
            .post(url)
            .header("x-goog-api-key", api_key)
            .json(body)
            .send()
            .await
            .map_err(|err| TranslationError::Network(format!("Gemini API request failed: {err}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read Gemini error body".to_string());
            return Err(map_http_error(status, &body_text));
        }

        let parsed: GenerateContentResponse = response.json().await.map_err(|err| {
            TranslationError::Malformed(format!("Failed to parse Gemini response: {err}"))
        })?;

        extract_text_response(parsed)
    }
}

#[async_trait]
impl Translator for GeminiApiAgent {
    async fn translate(&self, prompt: &str) -> Result<String, TranslationError> {
        let api_key = self
            .secrets
            .gemini_api_key()
            .ok_or(TranslationError::AuthMissing)?;

        let request = GenerateContentRequest {
            contents: vec![Content {
                role: "user".to_string(),
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
        };

        tracing::debug!(model = %self.model, prompt_chars = prompt.len(), "Sending Gemini request");
        self.send_request(&api_key, &request).await
    }
}

#[derive(Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Serialize)]
struct Content {
    role: String,
    parts: Vec<Part>,
}

#[derive(Serialize)]
struct Part {
    text: String,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<ContentResponse>,
}

#[derive(Deserialize)]
struct ContentResponse {
    #[serde(default)]
    parts: Vec<PartResponse>,
}

#[derive(Deserialize)]
struct PartResponse {
    text: Option<String>,
}

#[derive(Deserialize)]
struct ErrorWrapper {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    #[allow(dead_code)]
    code: Option<i32>,
    message: Option<String>,
    status: Option<String>,
}

fn extract_text_response(response: GenerateContentResponse) -> Result<String, TranslationError> {
    response
        .candidates
        .and_then(|candidates| candidates.into_iter().next())
        .and_then(|candidate| candidate.content)
        .and_then(|content| content.parts.into_iter().find_map(|part| part.text))
        .ok_or_else(|| {
            TranslationError::Malformed("Gemini API returned no text in the response candidates".into())
        })
}

fn map_http_error(status: StatusCode, body: &str) -> TranslationError {
    let (status_text, message) = serde_json::from_str::<ErrorWrapper>(body)
        .map(|wrapper| {
            (
                wrapper.error.status.unwrap_or_default(),
                wrapper.error.message.unwrap_or_else(|| body.to_string()),
            )
        })
        .unwrap_or_else(|_| (String::new(), body.to_string()));

    let detail = if status_text.is_empty() {
        message.clone()
    } else {
        format!("{status_text}: {message}")
    };

    let rejected_key = message.contains("API key") || message.contains("API_KEY_INVALID");

    match status {
        StatusCode::TOO_MANY_REQUESTS => TranslationError::RateLimited(detail),
        _ if status_text == "RESOURCE_EXHAUSTED" => TranslationError::RateLimited(detail),
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => TranslationError::AuthInvalid(detail),
        StatusCode::BAD_REQUEST if rejected_key => TranslationError::AuthInvalid(detail),
        _ => TranslationError::Network(format!("HTTP {}: {detail}", status.as_u16())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_rate_limit() {
        let body = r#"{"error":{"code":429,"message":"Quota exceeded","status":"RESOURCE_EXHAUSTED"}}"#;
        assert_eq!(
            map_http_error(StatusCode::TOO_MANY_REQUESTS, body),
            TranslationError::RateLimited("RESOURCE_EXHAUSTED: Quota exceeded".into())
        );
    }

    #[test]
    fn test_map_invalid_key() {
        let body = r#"{"error":{"code":400,"message":"API key not valid. Please pass a valid API key.","status":"INVALID_ARGUMENT"}}"#;
        assert!(matches!(
            map_http_error(StatusCode::BAD_REQUEST, body),
            TranslationError::AuthInvalid(_)
        ));
        assert!(matches!(
            map_http_error(StatusCode::FORBIDDEN, "denied"),
            TranslationError::AuthInvalid(_)
        ));
    }

    #[test]
    fn test_map_server_error() {
        let err = map_http_error(StatusCode::SERVICE_UNAVAILABLE, "upstream down");
        assert_eq!(err, TranslationError::Network("HTTP 503: upstream down".into()));
    }

    #[test]
    fn test_extract_text() {
        let parsed: GenerateContentResponse = serde_json::from_str(
            r#"{"candidates":[{"content":{"parts":[{"text":"ls -la"}]}}]}"#,
        )
        .unwrap();
        assert_eq!(extract_text_response(parsed).unwrap(), "ls -la");
    }

    #[test]
    fn test_extract_text_missing() {
        let parsed: GenerateContentResponse = serde_json::from_str(r#"{"candidates":[]}"#).unwrap();
        assert!(matches!(
            extract_text_response(parsed),
            Err(TranslationError::Malformed(_))
        ));
    }
}
