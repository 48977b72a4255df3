//! Request orchestration: one primary attempt, at most one fallback.
//!
//! The fallback exists because providers disagree on the `/v1` path segment,
//! not as a transient-retry policy. Any failure kind triggers it, the two
//! attempts run back-to-back, and the second attempt's outcome is returned
//! verbatim.

use crate::client::{CompletionClient, CompletionRequest};
use crate::config::Config;
use crate::endpoint;
use crate::error::LlmError;

pub struct Orchestrator<C: CompletionClient> {
    client: C,
}

impl<C: CompletionClient> Orchestrator<C> {
    pub fn new(client: C) -> Self {
        Self { client }
    }

    /// Run one completion with the configured temperature.
    pub async fn complete(
        &self,
        config: &Config,
        system: &str,
        user: &str,
    ) -> Result<String, LlmError> {
        self.complete_with_temperature(config, config.temperature, system, user)
            .await
    }

    /// Run one completion with an explicit temperature (action suggestions
    /// use a colder setting than reply drafting).
    pub async fn complete_with_temperature(
        &self,
        config: &Config,
        temperature: f32,
        system: &str,
        user: &str,
    ) -> Result<String, LlmError> {
        let api_key = config.api_key.trim();
        if api_key.is_empty() {
            return Err(LlmError::Config("API key missing".to_string()));
        }

        let endpoints = endpoint::resolve(&config.base_url);
        let request = CompletionRequest {
            endpoint: endpoints.primary.clone(),
            api_key: api_key.to_string(),
            model: config.model.clone(),
            temperature,
            system: system.to_string(),
            user: user.to_string(),
            timeout_ms: config.timeout_ms,
        };

        match self.client.invoke(&request).await {
            Ok(content) => Ok(content),
            Err(primary_err) => {
                let alternate = match endpoints.alternate {
                    Some(alt) if alt != endpoints.primary => alt,
                    _ => return Err(primary_err),
                };
                tracing::debug!(
                    primary = %endpoints.primary,
                    alternate = %alternate,
                    error = %primary_err,
                    "primary endpoint failed, trying alternate"
                );
                let retry = CompletionRequest {
                    endpoint: alternate,
                    ..request
                };
                self.client.invoke(&retry).await
            }
        }
    }
}
