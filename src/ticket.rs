//! Ticket content as handed over by the extraction layer.
//!
//! The crate does not walk the page itself; it consumes one immutable
//! `TicketData` record per extraction pass.

use serde::{Deserialize, Serialize};

/// One extracted ticket. `comments` are ordered newest first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TicketData {
    pub key: String,
    pub summary: String,
    pub description: String,
    pub comments: Vec<String>,
    /// Reporter display name; may be empty when the page did not expose one.
    pub author: String,
}

/// Per-extraction-session state. The reporter name is looked up at most once
/// per session and threaded through explicitly instead of living in a
/// process-wide cache.
#[derive(Debug, Clone, Default)]
pub struct ExtractionContext {
    reporter: Option<String>,
}

impl ExtractionContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the memoized reporter name, invoking `lookup` on first use.
    pub fn reporter<F: FnOnce() -> String>(&mut self, lookup: F) -> &str {
        self.reporter.get_or_insert_with(lookup).as_str()
    }
}

/// Find the most recent question in the ticket: newest comment first, then
/// older comments, then the description. Returns the text from the start of
/// the line holding the last `?` onward.
pub fn last_question(ticket: &TicketData) -> Option<String> {
    let texts = ticket
        .comments
        .iter()
        .chain(std::iter::once(&ticket.description));
    for text in texts {
        let t = text.trim();
        if t.is_empty() {
            continue;
        }
        if let Some(qm) = t.rfind('?') {
            let start = t[..qm].rfind('\n').map(|i| i + 1).unwrap_or(0);
            return Some(t[start..].trim().to_string());
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reporter_lookup_runs_once() {
        let mut ctx = ExtractionContext::new();
        let mut calls = 0;
        let first = ctx
            .reporter(|| {
                calls += 1;
                "Alex".to_string()
            })
            .to_string();
        let second = ctx
            .reporter(|| {
                calls += 1;
                "Someone Else".to_string()
            })
            .to_string();
        assert_eq!(first, "Alex");
        assert_eq!(second, "Alex");
        assert_eq!(calls, 1);
    }

    #[test]
    fn last_question_prefers_newest_comment() {
        let ticket = TicketData {
            description: "Does the description question count?".to_string(),
            comments: vec![
                "Status update.\nDid you try restarting the client?".to_string(),
                "Older comment, also a question?".to_string(),
            ],
            ..TicketData::default()
        };
        assert_eq!(
            last_question(&ticket).as_deref(),
            Some("Did you try restarting the client?")
        );
    }

    #[test]
    fn last_question_falls_back_to_description() {
        let ticket = TicketData {
            description: "Printer is down.\nWhich model is it?".to_string(),
            comments: vec!["No questions here.".to_string()],
            ..TicketData::default()
        };
        assert_eq!(last_question(&ticket).as_deref(), Some("Which model is it?"));
    }

    #[test]
    fn last_question_none_without_question_mark() {
        let ticket = TicketData {
            description: "All statements.".to_string(),
            comments: vec!["Still no question.".to_string()],
            ..TicketData::default()
        };
        assert!(last_question(&ticket).is_none());
    }
}
