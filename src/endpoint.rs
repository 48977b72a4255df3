//! Base-URL normalization for OpenAI-compatible chat endpoints.
//!
//! Providers disagree on whether `/v1` belongs in the path, so alongside the
//! canonical endpoint we compute exactly one alternate with the `/v1`
//! segment toggled. The orchestrator uses it for a single fallback attempt.

use crate::config::DEFAULT_BASE_URL;

const CHAT_SUFFIX: &str = "/chat/completions";
const V1_CHAT_SUFFIX: &str = "/v1/chat/completions";

/// Canonical endpoint plus its single fallback variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub primary: String,
    pub alternate: Option<String>,
}

fn ends_with_ci(s: &str, suffix: &str) -> bool {
    s.len() >= suffix.len()
        && s.as_bytes()[s.len() - suffix.len()..].eq_ignore_ascii_case(suffix.as_bytes())
}

/// Normalize a user-supplied base URL into the primary request endpoint and
/// compute its alternate. Re-resolving an already-canonical endpoint returns
/// it unchanged.
pub fn resolve(base_url: &str) -> Endpoints {
    let mut base = base_url.trim().trim_end_matches('/');
    if base.is_empty() {
        base = DEFAULT_BASE_URL;
    }

    let primary = if ends_with_ci(base, CHAT_SUFFIX) {
        base.to_string()
    } else if ends_with_ci(base, "/v1") {
        format!("{}{}", base, CHAT_SUFFIX)
    } else {
        format!("{}{}", base, V1_CHAT_SUFFIX)
    };

    let alternate = alternate_for(&primary);
    Endpoints { primary, alternate }
}

/// Toggle the `/v1` segment of a canonical endpoint. Applying this twice
/// returns the original shape. Non-canonical inputs have no alternate.
pub fn alternate_for(endpoint: &str) -> Option<String> {
    if ends_with_ci(endpoint, V1_CHAT_SUFFIX) {
        let stem = &endpoint[..endpoint.len() - V1_CHAT_SUFFIX.len()];
        Some(format!("{}{}", stem, CHAT_SUFFIX))
    } else if ends_with_ci(endpoint, CHAT_SUFFIX) {
        let stem = &endpoint[..endpoint.len() - CHAT_SUFFIX.len()];
        Some(format!("{}{}", stem, V1_CHAT_SUFFIX))
    } else {
        None
    }
}
