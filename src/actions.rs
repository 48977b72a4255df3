//! Tolerant extraction of action suggestions from raw model output.
//!
//! Models wrap the requested JSON array in prose or code fences often enough
//! that strict parsing is useless. The heuristic lives here and nowhere
//! else: strip fences, take the last `[` .. `]` run, fall back to the whole
//! trimmed text. Failures keep the raw text so the operator can read what
//! the model actually said.

use crate::error::LlmError;
use crate::util::clamp_chars;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// At most this many suggestions are kept.
pub const MAX_ACTIONS: usize = 8;
/// Display clamp for button labels.
pub const LABEL_CLAMP: usize = 28;
/// Clamp for the generation instruction behind a button.
pub const INSTRUCTION_CLAMP: usize = 1400;

const FALLBACK_INSTRUCTION: &str = "Generate helpful response.";

/// One model-proposed next action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionSuggestion {
    pub label: String,
    pub instruction: String,
}

/// Strip markdown code fences from a response
fn strip_markdown_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let clean = if trimmed.starts_with("```json") {
        trimmed.strip_prefix("```json").unwrap_or(trimmed)
    } else if trimmed.starts_with("```") {
        trimmed.strip_prefix("```").unwrap_or(trimmed)
    } else {
        trimmed
    };
    let clean = if clean.ends_with("```") {
        clean.strip_suffix("```").unwrap_or(clean)
    } else {
        clean
    };
    clean.trim()
}

/// The bracketed array candidate: greedy first-`[` to last-`]` anchored at
/// end-of-text, fence noise ignored.
fn array_candidate(text: &str) -> &str {
    let clean = strip_markdown_fences(text);
    let found = Regex::new(r"(?s)\[.*\]\s*$")
        .ok()
        .and_then(|re| re.find(clean));
    match found {
        Some(m) => m.as_str().trim(),
        None => clean,
    }
}

/// Parse suggestions from raw model text.
///
/// The top-level JSON value must be an array; entries are truncated to
/// [`MAX_ACTIONS`], labels and instructions are clamped, and entries missing
/// a field get a positional label or default instruction.
pub fn parse_actions(raw: &str) -> Result<Vec<ActionSuggestion>, LlmError> {
    let parse_err = || LlmError::Parse {
        raw: raw.to_string(),
    };

    let candidate = array_candidate(raw);
    let parsed: Value = serde_json::from_str(candidate).map_err(|_| parse_err())?;
    let items = parsed.as_array().ok_or_else(parse_err)?;

    let actions = items
        .iter()
        .take(MAX_ACTIONS)
        .enumerate()
        .map(|(i, item)| {
            let label = item
                .get("label")
                .and_then(Value::as_str)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(|s| clamp_chars(s, LABEL_CLAMP))
                .unwrap_or_else(|| format!("Action {}", i + 1));
            let instruction = item
                .get("instruction")
                .and_then(Value::as_str)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(|s| clamp_chars(s, INSTRUCTION_CLAMP))
                .unwrap_or_else(|| FALLBACK_INSTRUCTION.to_string());
            ActionSuggestion { label, instruction }
        })
        .collect();

    Ok(actions)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_fenced_array() {
        let raw = "Here: ```json\n[{\"label\":\"A\",\"instruction\":\"B\"}]\n```";
        let actions = parse_actions(raw).unwrap();
        assert_eq!(
            actions,
            vec![ActionSuggestion {
                label: "A".to_string(),
                instruction: "B".to_string(),
            }]
        );
    }

    #[test]
    fn parses_bare_array() {
        let raw = r#"[{"label":"Request logs","instruction":"Ask for the VPN client log."}]"#;
        let actions = parse_actions(raw).unwrap();
        assert_eq!(actions[0].label, "Request logs");
    }

    #[test]
    fn prose_around_array_is_ignored() {
        let raw = "Sure! Here are my suggestions:\n[{\"label\":\"A\",\"instruction\":\"B\"}]";
        assert_eq!(parse_actions(raw).unwrap().len(), 1);
    }

    #[test]
    fn not_json_keeps_raw_text() {
        match parse_actions("not json") {
            Err(LlmError::Parse { raw }) => assert_eq!(raw, "not json"),
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn top_level_object_is_rejected() {
        let raw = r#"{"label":"A","instruction":"B"}"#;
        assert!(matches!(parse_actions(raw), Err(LlmError::Parse { .. })));
    }

    #[test]
    fn truncates_to_eight_entries() {
        let items: Vec<String> = (0..12)
            .map(|i| format!(r#"{{"label":"L{}","instruction":"I{}"}}"#, i, i))
            .collect();
        let raw = format!("[{}]", items.join(","));
        let actions = parse_actions(&raw).unwrap();
        assert_eq!(actions.len(), MAX_ACTIONS);
        assert_eq!(actions[7].label, "L7");
    }

    #[test]
    fn missing_fields_get_positional_fallbacks() {
        let raw = r#"[{"instruction":"do a thing"}, {"label":"Only label"}, 42]"#;
        let actions = parse_actions(raw).unwrap();
        assert_eq!(actions[0].label, "Action 1");
        assert_eq!(actions[0].instruction, "do a thing");
        assert_eq!(actions[1].label, "Only label");
        assert_eq!(actions[1].instruction, "Generate helpful response.");
        assert_eq!(actions[2].label, "Action 3");
    }

    #[test]
    fn label_and_instruction_are_clamped() {
        let long_label = "L".repeat(50);
        let long_instr = "I".repeat(2000);
        let raw = format!(
            r#"[{{"label":"{}","instruction":"{}"}}]"#,
            long_label, long_instr
        );
        let actions = parse_actions(&raw).unwrap();
        assert_eq!(actions[0].label.chars().count(), LABEL_CLAMP);
        assert_eq!(actions[0].instruction.chars().count(), INSTRUCTION_CLAMP);
    }

    #[test]
    fn empty_array_is_valid_and_empty() {
        assert!(parse_actions("[]").unwrap().is_empty());
    }
}
