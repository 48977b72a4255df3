//! Prompt assembly for reply drafting.
//!
//! Every assembled user message carries three sections in fixed order:
//! `[CONTEXT]` (ticket facts and analysis), `[TASK]` (the resolved
//! instruction) and `[FORMAT]` (the mode-dependent output contract).
//! Instructions come from static per-kind tables; only `free` and `dyn`
//! take caller-supplied text.

use crate::categorize::{Analysis, Category};
use crate::ticket::{self, TicketData};
use crate::util::clamp_chars;
use serde::{Deserialize, Serialize};

/// Caller-supplied free text is clamped to this many characters.
pub const FREE_TEXT_CLAMP: usize = 4000;

/// Action suggestion requests run colder than reply drafting.
pub const SUGGEST_TEMPERATURE: f32 = 0.1;

const DEFAULT_INSTRUCTION: &str = "Generate helpful, precise response.";

/// Who the reply is written for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReplyMode {
    /// Internal, technical phrasing. No greeting or sign-off.
    #[default]
    Agent,
    /// Customer-facing prose with greeting and sign-off.
    User,
}

/// The closed set of reply instructions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKind {
    AgentSummary,
    NoResponse,
    Free,
    VpnDiag,
    VpnWork,
    SsoChk,
    SmtpDiag,
    MxCheck,
    SyncReset,
    PrintDiag,
    Triage,
    Short,
    Steps,
    Question,
    Workaround,
    /// Instruction supplied externally, e.g. from a model-suggested action.
    Dynamic,
}

impl PromptKind {
    pub fn key(&self) -> &'static str {
        match self {
            PromptKind::AgentSummary => "agent_summary",
            PromptKind::NoResponse => "no_response",
            PromptKind::Free => "free",
            PromptKind::VpnDiag => "vpn_diag",
            PromptKind::VpnWork => "vpn_work",
            PromptKind::SsoChk => "sso_chk",
            PromptKind::SmtpDiag => "smtp_diag",
            PromptKind::MxCheck => "mx_check",
            PromptKind::SyncReset => "sync_reset",
            PromptKind::PrintDiag => "print_diag",
            PromptKind::Triage => "triage",
            PromptKind::Short => "short",
            PromptKind::Steps => "steps",
            PromptKind::Question => "question",
            PromptKind::Workaround => "workaround",
            PromptKind::Dynamic => "dyn",
        }
    }

    pub fn parse(key: &str) -> Option<Self> {
        let kind = match key {
            "agent_summary" => PromptKind::AgentSummary,
            "no_response" => PromptKind::NoResponse,
            "free" => PromptKind::Free,
            "vpn_diag" => PromptKind::VpnDiag,
            "vpn_work" => PromptKind::VpnWork,
            "sso_chk" => PromptKind::SsoChk,
            "smtp_diag" => PromptKind::SmtpDiag,
            "mx_check" => PromptKind::MxCheck,
            "sync_reset" => PromptKind::SyncReset,
            "print_diag" => PromptKind::PrintDiag,
            "triage" => PromptKind::Triage,
            "short" => PromptKind::Short,
            "steps" => PromptKind::Steps,
            "question" => PromptKind::Question,
            "workaround" => PromptKind::Workaround,
            "dyn" => PromptKind::Dynamic,
            _ => return None,
        };
        Some(kind)
    }
}

/// Default persona used when the operator has not configured a custom one.
pub const DEFAULT_PERSONA: &str = "\
You are an IT support assistant for support tickets.
- Language: English. No jargon, no small talk, no markdown.
- Write concisely, precisely, numbered when appropriate.
- When \"Agent\" mode: technical responses with root cause hypotheses, next steps, required artifacts (logs/IDs/URLs).
- When \"User\" mode: user-friendly, flowing text without numbered steps, only necessary details, no technical jargon.
- For incomplete information: ask targeted follow-up questions as a short list.
- Adapt depth/terminology to the detected ticket category (e.g., SSO/VPN/Mail/Storage/Network/Hardware/Software).
";

/// System prompt for the action-suggestion round trip.
pub const SUGGEST_ACTIONS_SYSTEM: &str = "\
You are an assistant that suggests the next logical actions for a support ticket.
- Return only a JSON list of 3-6 objects, no additional explanation.
- Each object: { \"label\": \"Button text\", \"instruction\": \"concise, precise instruction for response generation\" }.
- Adapt actions to category, history, and missing information (e.g., request logs, specific checks, escalation, workaround, follow-up questions).
- Keep label short (<= 24 characters).";

/// Pick the system message: custom persona if the operator set one, default
/// persona otherwise.
pub fn persona(custom: &str) -> String {
    let trimmed = custom.trim();
    if trimmed.is_empty() {
        DEFAULT_PERSONA.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Resolve a prompt kind into its instruction text. `free_text` feeds the
/// `Free` and `Dynamic` kinds and is ignored for all others.
pub fn instruction_for(
    kind: PromptKind,
    analysis: &Analysis,
    mode: ReplyMode,
    free_text: Option<&str>,
) -> String {
    let cat = analysis.category;
    match kind {
        PromptKind::AgentSummary => format!(
            "Create a brief technical summary for internal use:\n\
             - TL;DR (1-2 sentences)\n\
             - Timeline of events\n\
             - Current status\n\
             - Top 3 suspected causes with verification steps\n\
             - Missing information (targeted questions)\n\
             - Next steps (prioritized)\n\
             - Risks/workarounds if relevant\n\
             Adapt terminology to {} category.",
            cat
        ),
        PromptKind::NoResponse => "Compose a polite request for user feedback:\n\
             - Brief, professional, friendly tone\n\
             - Summarize what the issue was about\n\
             - Reference the last question asked if any\n\
             - Suggest 1-2 specific response options (Yes/No, screenshot, timing, etc.)\n\
             - English, no formal greeting/closing."
            .to_string(),
        PromptKind::Free | PromptKind::Dynamic => {
            let text = free_text.map(str::trim).unwrap_or("");
            if text.is_empty() {
                DEFAULT_INSTRUCTION.to_string()
            } else {
                clamp_chars(text, FREE_TEXT_CLAMP)
            }
        }
        PromptKind::VpnDiag => "VPN troubleshooting guide (client status, certificates, timing, location, network changes, DNS resolution, firewall). Max 7 steps.".to_string(),
        PromptKind::VpnWork => match mode {
            ReplyMode::User => "User-friendly VPN workaround (reconnect WiFi, DNS flush, client restart, mobile hotspot), mention risks.".to_string(),
            ReplyMode::Agent => "Technical VPN workaround with policy notes, security impact, fallback plan.".to_string(),
        },
        PromptKind::SsoChk => "SSO/MFA checklist (app consent, token lifetime, conditional access, sign-in logs, UPN/domain, time/NTP, error codes).".to_string(),
        PromptKind::SmtpDiag => "SMTP diagnosis (port/TLS, auth, sender, SPF/DMARC/DKIM, bounces, throttling, connector policies).".to_string(),
        PromptKind::MxCheck => "MX/SPF quick check: current MX records, SPF includes, DKIM selectors, DMARC policy, common misconfigurations.".to_string(),
        PromptKind::SyncReset => "Cloud storage reset/repair sequence (disconnect account, reset command, folder moves, permissions, placeholders, limits). Max 7 steps.".to_string(),
        PromptKind::PrintDiag => "Printer troubleshooting: drivers, queue, spooler, network/port, firmware, test page, permissions, default printer.".to_string(),
        PromptKind::Triage => "General IT triage: scope, timing, error messages, affected users/locations, reproducibility, recent changes, logs/IDs.".to_string(),
        PromptKind::Short => match mode {
            ReplyMode::User => "Brief user response with key message and current status.".to_string(),
            ReplyMode::Agent => "Brief technical status with key issues, blockers, ETA.".to_string(),
        },
        PromptKind::Steps => match mode {
            ReplyMode::User => "Step-by-step user guide, max 7 steps, clear menu names.".to_string(),
            ReplyMode::Agent => format!(
                "Technical checklist (max 7) with specific checks/logs for {}.",
                cat
            ),
        },
        PromptKind::Question => match mode {
            ReplyMode::User => "Targeted user questions, max 6 points.".to_string(),
            ReplyMode::Agent => "Technical questions (artifacts/IDs/logs/times/systems), max 8 points.".to_string(),
        },
        PromptKind::Workaround => match mode {
            ReplyMode::User => "Safe user workaround with limitation notes.".to_string(),
            ReplyMode::Agent => "Technical workaround with impact, fallback, required permissions.".to_string(),
        },
    }
}

/// System/user message pair ready for the completion client.
#[derive(Debug, Clone, PartialEq)]
pub struct MessagePair {
    pub system: String,
    pub user: String,
}

fn or_na(s: &str) -> &str {
    let t = s.trim();
    if t.is_empty() {
        "(N/A)"
    } else {
        t
    }
}

/// The output contract appended to every user message. `compact` limits the
/// reply to a few sentences (used for follow-up nudges).
fn format_contract(mode: ReplyMode, author: &str, compact: bool) -> String {
    match mode {
        ReplyMode::Agent => {
            if compact {
                "- English, no markdown, no greeting/closing.\n\
                 - Internal text that can be sent 1:1 to end user.\n\
                 - Maximum 6 short sentences."
                    .to_string()
            } else {
                "- English, no markdown, no greeting/closing.\n\
                 - Technical, internal use, concise.\n\
                 - Maximum relevant details, no context repetition."
                    .to_string()
            }
        }
        ReplyMode::User => {
            let name = author.trim();
            let greeting = if name.is_empty() {
                "Hello".to_string()
            } else {
                format!("Hello {}", name)
            };
            let closing = if compact {
                "- Maximum 6 short sentences."
            } else {
                "- Maximum relevant details, no context repetition."
            };
            format!(
                "- English, no markdown.\n\
                 - User-friendly, flowing text without numbered steps.\n\
                 - Start with \"{}\".\n\
                 - End with \"Best regards\".\n\
                 {}",
                greeting, closing
            )
        }
    }
}

fn context_block(ticket: &TicketData, analysis: &Analysis) -> String {
    format!(
        "[CONTEXT]\n\
         Ticket Key: {}\n\
         Title: {}\n\
         Description:\n{}\n\n\
         Comments (newest to oldest):\n{}\n\n\
         Detected Category: {}\n\
         Tags: {}",
        or_na(&ticket.key),
        or_na(&ticket.summary),
        ticket.description.trim(),
        ticket.comments.join("\n---\n"),
        analysis.category,
        analysis.tags.join(", "),
    )
}

/// Assemble the full system/user message pair for one generation request.
///
/// `custom_persona` is the operator-configured system prompt ("" selects the
/// default persona); `free_text` feeds `Free`/`Dynamic` kinds.
pub fn assemble(
    kind: PromptKind,
    mode: ReplyMode,
    ticket: &TicketData,
    analysis: &Analysis,
    custom_persona: &str,
    free_text: Option<&str>,
) -> MessagePair {
    let instruction = instruction_for(kind, analysis, mode, free_text);

    let user = if kind == PromptKind::NoResponse {
        // Follow-up nudges send a condensed context: the reply should point
        // back at the open question, not re-tell the whole ticket.
        let last_q = ticket::last_question(ticket).unwrap_or_default();
        format!(
            "[CONTEXT]\n\
             Ticket Key: {}\n\
             Title: {}\n\
             Case summary (brief).\n\
             Last question asked (if any):\n{}\n\n\
             [TASK]\n{}\n\n\
             [FORMAT]\n{}",
            or_na(&ticket.key),
            or_na(&ticket.summary),
            if last_q.is_empty() { "(none detected)" } else { &last_q },
            instruction,
            format_contract(mode, &ticket.author, true),
        )
    } else {
        format!(
            "{}\n\n[TASK]\n{}\n\n[FORMAT]\n{}",
            context_block(ticket, analysis),
            instruction,
            format_contract(mode, &ticket.author, false),
        )
    };

    MessagePair {
        system: persona(custom_persona),
        user,
    }
}

/// Context payload for the action-suggestion request: newest 8 comments plus
/// the analysis, ending in the fixed suggestion task.
pub fn build_suggestion_context(ticket: &TicketData, analysis: &Analysis) -> String {
    let recent: Vec<&str> = ticket
        .comments
        .iter()
        .take(8)
        .map(String::as_str)
        .collect();
    format!(
        "[CONTEXT]\n\
         Ticket Key: {}\n\
         Title: {}\n\
         Description:\n{}\n\n\
         Recent Comments (newest first), max 8:\n{}\n\n\
         Detected Category: {}\n\
         Tags: {}\n\n\
         [TASK]\n\
         Suggest 3-6 logical next actions as JSON list (label + instruction).",
        or_na(&ticket.key),
        or_na(&ticket.summary),
        ticket.description.trim(),
        recent.join("\n---\n"),
        analysis.category,
        analysis.tags.join(", "),
    )
}

/// A statically-known action button for a category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StaticAction {
    pub kind: PromptKind,
    pub label: &'static str,
}

const fn action(kind: PromptKind, label: &'static str) -> StaticAction {
    StaticAction { kind, label }
}

/// Fallback action table shown when the model does not supply dynamic
/// suggestions.
pub fn static_actions(category: Category) -> &'static [StaticAction] {
    match category {
        Category::Vpn => const {
            &[
                action(PromptKind::Steps, "VPN Steps"),
                action(PromptKind::VpnDiag, "VPN Diagnosis"),
                action(PromptKind::VpnWork, "VPN Workaround"),
                action(PromptKind::Question, "VPN Questions"),
            ]
        },
        Category::SsoMfa => const {
            &[
                action(PromptKind::Steps, "SSO/MFA Steps"),
                action(PromptKind::SsoChk, "SSO/MFA Checklist"),
                action(PromptKind::Question, "SSO/MFA Questions"),
            ]
        },
        Category::Mail => const {
            &[
                action(PromptKind::Steps, "Mail Steps"),
                action(PromptKind::SmtpDiag, "SMTP Diagnosis"),
                action(PromptKind::MxCheck, "MX/SPF Check"),
                action(PromptKind::Question, "Mail Questions"),
            ]
        },
        Category::Storage => const {
            &[
                action(PromptKind::Steps, "Storage Steps"),
                action(PromptKind::SyncReset, "Sync Reset"),
                action(PromptKind::Question, "Storage Questions"),
            ]
        },
        Category::Print => const {
            &[
                action(PromptKind::Steps, "Print Steps"),
                action(PromptKind::PrintDiag, "Print Diagnosis"),
                action(PromptKind::Workaround, "Print Workaround"),
            ]
        },
        Category::Generic => const {
            &[
                action(PromptKind::Steps, "General Steps"),
                action(PromptKind::Triage, "Triage Checklist"),
                action(PromptKind::Question, "Follow-up Questions"),
                action(PromptKind::Workaround, "Workaround"),
            ]
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn generic_analysis() -> Analysis {
        Analysis {
            category: Category::Generic,
            tags: vec![],
        }
    }

    fn sample_ticket() -> TicketData {
        TicketData {
            key: "IT-42".to_string(),
            summary: "Printer offline".to_string(),
            description: "The 3rd floor printer shows offline.".to_string(),
            comments: vec!["Tried power cycling, no change.".to_string()],
            author: "Alex".to_string(),
        }
    }

    #[test]
    fn kind_keys_round_trip() {
        for kind in [
            PromptKind::AgentSummary,
            PromptKind::NoResponse,
            PromptKind::Free,
            PromptKind::VpnDiag,
            PromptKind::MxCheck,
            PromptKind::Steps,
            PromptKind::Dynamic,
        ] {
            assert_eq!(PromptKind::parse(kind.key()), Some(kind));
        }
        assert_eq!(PromptKind::parse("nope"), None);
    }

    #[test]
    fn free_text_is_clamped_and_defaulted() {
        let analysis = generic_analysis();
        let long = "x".repeat(5000);
        let clamped = instruction_for(PromptKind::Free, &analysis, ReplyMode::Agent, Some(&long));
        assert_eq!(clamped.chars().count(), FREE_TEXT_CLAMP);

        let empty = instruction_for(PromptKind::Free, &analysis, ReplyMode::Agent, Some("  "));
        assert_eq!(empty, "Generate helpful, precise response.");
    }

    #[test]
    fn generic_kinds_switch_phrasing_on_mode() {
        let analysis = generic_analysis();
        let agent = instruction_for(PromptKind::Short, &analysis, ReplyMode::Agent, None);
        let user = instruction_for(PromptKind::Short, &analysis, ReplyMode::User, None);
        assert_ne!(agent, user);
        assert!(agent.contains("technical"));
    }

    #[test]
    fn steps_instruction_embeds_category_in_agent_mode() {
        let analysis = Analysis {
            category: Category::Mail,
            tags: vec![],
        };
        let text = instruction_for(PromptKind::Steps, &analysis, ReplyMode::Agent, None);
        assert!(text.contains("mail"));
    }

    #[test]
    fn assemble_orders_sections() {
        let pair = assemble(
            PromptKind::Steps,
            ReplyMode::Agent,
            &sample_ticket(),
            &generic_analysis(),
            "",
            None,
        );
        let ctx = pair.user.find("[CONTEXT]").unwrap();
        let task = pair.user.find("[TASK]").unwrap();
        let fmt = pair.user.find("[FORMAT]").unwrap();
        assert!(ctx < task && task < fmt);
        assert!(pair.user.contains("Ticket Key: IT-42"));
        assert!(pair.user.contains("Detected Category: generic"));
    }

    #[test]
    fn user_mode_contract_greets_author_and_signs_off() {
        let pair = assemble(
            PromptKind::NoResponse,
            ReplyMode::User,
            &sample_ticket(),
            &generic_analysis(),
            "",
            None,
        );
        assert!(pair.user.contains("Start with \"Hello Alex\""));
        assert!(pair.user.contains("End with \"Best regards\""));
    }

    #[test]
    fn user_mode_without_author_greets_plainly() {
        let mut ticket = sample_ticket();
        ticket.author = String::new();
        let pair = assemble(
            PromptKind::Short,
            ReplyMode::User,
            &ticket,
            &generic_analysis(),
            "",
            None,
        );
        assert!(pair.user.contains("Start with \"Hello\""));
    }

    #[test]
    fn agent_mode_contract_omits_greeting() {
        let pair = assemble(
            PromptKind::Steps,
            ReplyMode::Agent,
            &sample_ticket(),
            &generic_analysis(),
            "",
            None,
        );
        assert!(!pair.user.contains("Hello"));
        assert!(!pair.user.contains("Best regards"));
        assert!(pair.user.contains("no greeting/closing"));
    }

    #[test]
    fn no_response_embeds_last_question() {
        let mut ticket = sample_ticket();
        ticket.comments = vec!["Could you attach the spooler log?".to_string()];
        let pair = assemble(
            PromptKind::NoResponse,
            ReplyMode::Agent,
            &ticket,
            &generic_analysis(),
            "",
            None,
        );
        assert!(pair.user.contains("Could you attach the spooler log?"));
        assert!(pair.user.contains("Maximum 6 short sentences."));
    }

    #[test]
    fn custom_persona_overrides_default() {
        let pair = assemble(
            PromptKind::Short,
            ReplyMode::Agent,
            &sample_ticket(),
            &generic_analysis(),
            "You are a terse bot.",
            None,
        );
        assert_eq!(pair.system, "You are a terse bot.");

        let default_pair = assemble(
            PromptKind::Short,
            ReplyMode::Agent,
            &sample_ticket(),
            &generic_analysis(),
            "   ",
            None,
        );
        assert_eq!(default_pair.system, DEFAULT_PERSONA);
    }

    #[test]
    fn dynamic_kind_uses_supplied_instruction() {
        let pair = assemble(
            PromptKind::Dynamic,
            ReplyMode::Agent,
            &sample_ticket(),
            &generic_analysis(),
            "",
            Some("Ask for the exact error code."),
        );
        assert!(pair.user.contains("[TASK]\nAsk for the exact error code."));
    }

    #[test]
    fn suggestion_context_caps_comments_at_eight() {
        let mut ticket = sample_ticket();
        ticket.comments = (0..12).map(|i| format!("comment {}", i)).collect();
        let context = build_suggestion_context(&ticket, &generic_analysis());
        assert!(context.contains("comment 7"));
        assert!(!context.contains("comment 8"));
        assert!(context.ends_with("Suggest 3-6 logical next actions as JSON list (label + instruction)."));
    }

    #[test]
    fn every_category_has_static_actions() {
        for category in [
            Category::Vpn,
            Category::SsoMfa,
            Category::Mail,
            Category::Storage,
            Category::Print,
            Category::Generic,
        ] {
            assert!(!static_actions(category).is_empty());
        }
        assert_eq!(static_actions(Category::Print)[1].label, "Print Diagnosis");
    }
}
