//! Google generative-language client.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::debug;

use crate::config::AiConfig;
use crate::error::{EngineError, EngineResult};

use super::LanguageModel;

/// Google error response format.
#[derive(Debug, Deserialize)]
struct GoogleError {
    code: Option<u16>,
    message: String,
    status: Option<String>,
}

/// Google error wrapper.
#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: GoogleError,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

/// Gemini client over `generateContent`.
///
/// # Example
///
/// ```no_run
/// use benefit_engine::config::AiConfig;
/// use benefit_engine::llm::GeminiClient;
///
/// let client = GeminiClient::from_env(&AiConfig::default()).unwrap();
/// ```
pub struct GeminiClient {
    client: reqwest::Client,
    base_url: String,
    model: String,
    api_key: String,
}

impl GeminiClient {
    /// Creates a client with an explicit API key.
    pub fn new(config: &AiConfig, api_key: impl Into<String>) -> EngineResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| EngineError::AiTransport {
                message: e.to_string(),
            })?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key: api_key.into(),
        })
    }

    /// Creates a client reading the API key from the configured environment
    /// variable. A missing or blank key is `AiNotConfigured`.
    pub fn from_env(config: &AiConfig) -> EngineResult<Self> {
        let api_key = std::env::var(&config.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or(EngineError::AiNotConfigured)?;
        Self::new(config, api_key)
    }

    fn endpoint(&self) -> String {
        format!("{}/{}:generateContent", self.base_url, self.model)
    }

    fn build_request_body(prompt: &str) -> Value {
        json!({
            "contents": [{
                "role": "user",
                "parts": [{ "text": prompt }]
            }]
        })
    }

    /// Joins the text parts of the first candidate.
    fn extract_text(body: &str) -> EngineResult<String> {
        let response: GenerateResponse =
            serde_json::from_str(body).map_err(|e| EngineError::AiResponseMalformed {
                message: format!("unexpected response body: {}", e),
            })?;

        let text: String = response
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|p| p.text)
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(EngineError::AiResponseMalformed {
                message: "response has no text candidate".to_string(),
            });
        }
        Ok(text)
    }

    fn error_message(status: reqwest::StatusCode, body: &str) -> String {
        match serde_json::from_str::<ErrorResponse>(body) {
            Ok(error_response) => format!(
                "{} {}: {}",
                error_response.error.code.unwrap_or(status.as_u16()),
                error_response.error.status.unwrap_or_default(),
                error_response.error.message
            ),
            Err(_) => format!("{}: {}", status.as_u16(), body),
        }
    }
}

#[async_trait]
impl LanguageModel for GeminiClient {
    async fn generate(&self, prompt: &str) -> EngineResult<String> {
        debug!(model = %self.model, prompt_chars = prompt.len(), "Sending generateContent request");

        let response = self
            .client
            .post(self.endpoint())
            .query(&[("key", self.api_key.as_str())])
            .json(&Self::build_request_body(prompt))
            .send()
            .await
            .map_err(|e| EngineError::AiTransport {
                message: e.to_string(),
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| EngineError::AiTransport {
            message: e.to_string(),
        })?;

        if !status.is_success() {
            return Err(EngineError::AiTransport {
                message: Self::error_message(status, &body),
            });
        }

        Self::extract_text(&body)
    }

    fn name(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::Router;
    use axum::routing::post;

    #[test]
    fn test_request_body_shape() {
        let body = GeminiClient::build_request_body("olá");
        assert_eq!(body["contents"][0]["parts"][0]["text"], "olá");
        assert_eq!(body["contents"][0]["role"], "user");
    }

    #[test]
    fn test_extract_text_joins_parts() {
        let body = r#"{"candidates":[{"content":{"parts":[{"text":"{\"a\":"},{"text":"1}"}],"role":"model"}}]}"#;
        assert_eq!(GeminiClient::extract_text(body).unwrap(), "{\"a\":1}");
    }

    #[test]
    fn test_extract_text_without_candidates_is_malformed() {
        match GeminiClient::extract_text(r#"{"candidates":[]}"#) {
            Err(EngineError::AiResponseMalformed { .. }) => {}
            other => panic!("Expected AiResponseMalformed, got {:?}", other),
        }
    }

    #[test]
    fn test_error_message_uses_google_error() {
        let body = r#"{"error":{"code":403,"message":"API key not valid","status":"PERMISSION_DENIED"}}"#;
        let message = GeminiClient::error_message(reqwest::StatusCode::FORBIDDEN, body);
        assert_eq!(message, "403 PERMISSION_DENIED: API key not valid");
    }

    #[test]
    fn test_from_env_without_key_is_not_configured() {
        let config = AiConfig {
            api_key_env: "BENEFIT_ENGINE_TEST_MISSING_KEY".to_string(),
            ..AiConfig::default()
        };
        assert!(matches!(
            GeminiClient::from_env(&config),
            Err(EngineError::AiNotConfigured)
        ));
    }

    async fn serve(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}/models", addr)
    }

    #[tokio::test]
    async fn test_generate_against_local_server() {
        let router = Router::new().route(
            "/models/:call",
            post(|| async {
                axum::Json(json!({
                    "candidates": [{ "content": { "parts": [{ "text": "resposta" }] } }]
                }))
            }),
        );
        let config = AiConfig {
            base_url: serve(router).await,
            ..AiConfig::default()
        };

        let client = GeminiClient::new(&config, "test-key").unwrap();
        assert_eq!(client.generate("pergunta").await.unwrap(), "resposta");
    }

    #[tokio::test]
    async fn test_http_error_is_transport_failure() {
        let router = Router::new().route(
            "/models/:call",
            post(|| async {
                (
                    axum::http::StatusCode::INTERNAL_SERVER_ERROR,
                    "upstream unavailable",
                )
            }),
        );
        let config = AiConfig {
            base_url: serve(router).await,
            ..AiConfig::default()
        };

        let client = GeminiClient::new(&config, "test-key").unwrap();
        match client.generate("pergunta").await {
            Err(e @ EngineError::AiTransport { .. }) => assert!(e.is_retryable()),
            other => panic!("Expected AiTransport, got {:?}", other),
        }
    }
}
