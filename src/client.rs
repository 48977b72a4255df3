//! HTTP client for OpenAI-compatible chat completions.
//!
//! One request in, one typed result out. The timeout covers the whole
//! exchange (connect, send, read), so no invocation outlives its deadline by
//! more than I/O teardown.

use crate::error::LlmError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Everything one completion attempt needs. Cloned for the fallback attempt
/// with only the endpoint swapped.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub endpoint: String,
    pub api_key: String,
    pub model: String,
    pub temperature: f32,
    pub system: String,
    pub user: String,
    pub timeout_ms: u64,
}

/// Seam between the orchestrator and the wire. Tests substitute mock
/// implementations; production uses [`HttpCompletionClient`].
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn invoke(&self, request: &CompletionRequest) -> Result<String, LlmError>;
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    temperature: f32,
    messages: Vec<Message<'a>>,
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize, Default)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize, Default)]
struct Choice {
    #[serde(default)]
    message: MessageBody,
}

#[derive(Deserialize, Default)]
struct MessageBody {
    #[serde(default)]
    content: String,
}

/// Reqwest-backed client.
pub struct HttpCompletionClient {
    http: reqwest::Client,
}

impl HttpCompletionClient {
    pub fn new() -> Self {
        Self {
            http: reqwest::Client::new(),
        }
    }
}

impl Default for HttpCompletionClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CompletionClient for HttpCompletionClient {
    async fn invoke(&self, request: &CompletionRequest) -> Result<String, LlmError> {
        let body = ChatRequest {
            model: &request.model,
            temperature: request.temperature,
            messages: vec![
                Message {
                    role: "system",
                    content: &request.system,
                },
                Message {
                    role: "user",
                    content: &request.user,
                },
            ],
        };

        tracing::debug!(endpoint = %request.endpoint, model = %request.model, "sending completion request");

        let exchange = async {
            let response = self
                .http
                .post(&request.endpoint)
                .header("Content-Type", "application/json")
                .header("Authorization", format!("Bearer {}", request.api_key))
                .json(&body)
                .send()
                .await
                .map_err(|e| LlmError::Network(e.to_string()))?;

            let status = response.status();
            // Best-effort body read; an unreadable body becomes "".
            let text = response.text().await.unwrap_or_default();

            if !status.is_success() {
                return Err(LlmError::Http {
                    status: status.as_u16(),
                    body: text,
                });
            }

            extract_content(&text)
        };

        match tokio::time::timeout(Duration::from_millis(request.timeout_ms), exchange).await {
            Ok(result) => result,
            Err(_) => Err(LlmError::Timeout(request.timeout_ms)),
        }
    }
}

/// Pull `choices[0].message.content` out of a 2xx body. A missing shape is
/// valid empty output, not an error; a body that is not JSON at all is a
/// parse failure carrying the raw text.
fn extract_content(body: &str) -> Result<String, LlmError> {
    if body.trim().is_empty() {
        return Ok(String::new());
    }
    let parsed: ChatResponse = serde_json::from_str(body).map_err(|_| LlmError::Parse {
        raw: body.to_string(),
    })?;
    Ok(parsed
        .choices
        .into_iter()
        .next()
        .map(|c| c.message.content)
        .unwrap_or_default())
}
