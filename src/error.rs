use thiserror::Error;

/// Failures surfaced by the completion pipeline.
///
/// The client reports the most specific kind it can observe; callers decide
/// whether a failure is recoverable (parse failures keep the raw model text
/// so it can be shown to the operator).
#[derive(Debug, Error)]
pub enum LlmError {
    /// Missing or invalid local configuration. Never involves network I/O.
    #[error("{0}")]
    Config(String),

    /// Transport-level failure (DNS, connection refused, reset, ...).
    #[error("network error: {0}")]
    Network(String),

    /// The request did not complete within the configured deadline.
    #[error("request timed out after {0} ms")]
    Timeout(u64),

    /// Non-2xx response from the completion service.
    #[error("LLM error ({status}): {body}")]
    Http { status: u16, body: String },

    /// Model output was not the JSON we asked for. The raw text is kept for
    /// diagnostic display.
    #[error("could not parse model output as JSON")]
    Parse { raw: String },
}

impl LlmError {
    /// True for errors produced before any network attempt.
    pub fn is_config(&self) -> bool {
        matches!(self, LlmError::Config(_))
    }
}
