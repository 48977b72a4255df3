//! Request/response contract exposed to the presentation layer.
//!
//! Each message kind is a variant of a tagged union handled by an async
//! call returning a plain response value; no callbacks, no shared state
//! between in-flight requests.

use crate::actions::{self, ActionSuggestion};
use crate::client::CompletionClient;
use crate::config::Config;
use crate::error::LlmError;
use crate::orchestrator::Orchestrator;
use crate::prompt::{self, SUGGEST_ACTIONS_SYSTEM, SUGGEST_TEMPERATURE};
use serde::{Deserialize, Serialize};

const TEST_SYSTEM: &str = "Quick test. Respond with 'OK'.";
const TEST_USER: &str = "Reply exactly: OK";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Request {
    /// Fixed "reply exactly: OK" round trip to validate the configuration.
    TestConnection,
    /// Ask the model for next-action suggestions given a ticket context.
    SuggestActions { context: String },
    /// Generate a reply from a fully assembled prompt payload.
    GenerateReply { payload: String },
}

/// Uniform response shape: `ok` plus whichever payload fields apply. `raw`
/// carries unparseable model output back to the caller for inspection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Response {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actions: Option<Vec<ActionSuggestion>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw: Option<String>,
}

impl Response {
    fn success_content(content: String) -> Self {
        Self {
            ok: true,
            content: Some(content),
            ..Self::default()
        }
    }

    fn failure(error: impl Into<String>) -> Self {
        Self {
            ok: false,
            error: Some(error.into()),
            ..Self::default()
        }
    }
}

/// Handles presentation-layer requests by composing the prompt, orchestrator
/// and parser stages.
pub struct Handler<C: CompletionClient> {
    orchestrator: Orchestrator<C>,
}

impl<C: CompletionClient> Handler<C> {
    pub fn new(client: C) -> Self {
        Self {
            orchestrator: Orchestrator::new(client),
        }
    }

    pub async fn handle(&self, config: &Config, request: Request) -> Response {
        match request {
            Request::TestConnection => {
                match self
                    .orchestrator
                    .complete(config, TEST_SYSTEM, TEST_USER)
                    .await
                {
                    Ok(content) => Response::success_content(content.trim().to_string()),
                    Err(err) => Response::failure(err.to_string()),
                }
            }
            Request::SuggestActions { context } => {
                let raw = match self
                    .orchestrator
                    .complete_with_temperature(
                        config,
                        SUGGEST_TEMPERATURE,
                        SUGGEST_ACTIONS_SYSTEM,
                        &context,
                    )
                    .await
                {
                    Ok(raw) => raw,
                    Err(err) => return Response::failure(err.to_string()),
                };
                match actions::parse_actions(&raw) {
                    Ok(actions) => Response {
                        ok: true,
                        actions: Some(actions),
                        ..Response::default()
                    },
                    Err(LlmError::Parse { raw }) => Response {
                        ok: false,
                        error: Some("Could not parse suggestions JSON.".to_string()),
                        raw: Some(raw),
                        ..Response::default()
                    },
                    Err(err) => Response::failure(err.to_string()),
                }
            }
            Request::GenerateReply { payload } => {
                let system = prompt::persona(&config.system_prompt);
                match self.orchestrator.complete(config, &system, &payload).await {
                    Ok(content) => Response::success_content(content.trim().to_string()),
                    Err(err) => Response::failure(err.to_string()),
                }
            }
        }
    }
}
