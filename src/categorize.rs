//! Keyword-based ticket classification.
//!
//! Categories are decided by an ordered rule table: the first rule with any
//! keyword hit wins, so precedence is data, not control flow. Tag rules run
//! independently and can all fire.

use crate::ticket::TicketData;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Vpn,
    #[serde(rename = "sso/mfa")]
    SsoMfa,
    Mail,
    Storage,
    Print,
    Generic,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Vpn => "vpn",
            Category::SsoMfa => "sso/mfa",
            Category::Mail => "mail",
            Category::Storage => "storage",
            Category::Print => "print",
            Category::Generic => "generic",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of classifying one ticket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    pub category: Category,
    /// Deduplicated, in rule-evaluation order.
    pub tags: Vec<String>,
}

struct CategoryRule {
    category: Category,
    keywords: &'static [&'static str],
    /// Tag pushed alongside the category when this rule fires.
    implied_tag: Option<&'static str>,
}

/// Evaluated top to bottom; the first hit wins. Note: "consent" under sso/mfa
/// is known to false-positive on unrelated "user consent" phrasing.
const CATEGORY_RULES: &[CategoryRule] = &[
    CategoryRule {
        category: Category::Vpn,
        keywords: &["vpn", "anyconnect", "ipsec", "cisco"],
        implied_tag: Some("network"),
    },
    CategoryRule {
        category: Category::SsoMfa,
        keywords: &["mfa", "2fa", "authenticator", "sso", "single sign-on", "consent", "aadsts"],
        implied_tag: None,
    },
    CategoryRule {
        category: Category::Mail,
        keywords: &["outlook", "smtp", "imap", "mailflow", "mailbox", "shared mailbox", "bounce"],
        implied_tag: None,
    },
    CategoryRule {
        category: Category::Storage,
        keywords: &["onedrive", "odsp", "sharepoint", "sync"],
        implied_tag: None,
    },
    CategoryRule {
        category: Category::Print,
        keywords: &["printer", "print"],
        implied_tag: None,
    },
];

/// Independent of the category outcome; any number may match.
const TAG_RULES: &[(&str, &[&str])] = &[
    ("teams", &["teams", "meeting", "call"]),
    ("cert", &["certificate", "ssl", "tls"]),
    ("firewall", &["firewall", "policy"]),
];

/// Classify a ticket into exactly one category plus a set of tags.
pub fn analyze(ticket: &TicketData) -> Analysis {
    let mut blob = String::new();
    blob.push_str(&ticket.summary);
    blob.push('\n');
    blob.push_str(&ticket.description);
    for comment in &ticket.comments {
        blob.push('\n');
        blob.push_str(comment);
    }
    let blob = blob.to_lowercase();

    let has = |keywords: &[&str]| keywords.iter().any(|k| blob.contains(k));

    let mut tags: Vec<String> = Vec::new();
    let push_tag = |tags: &mut Vec<String>, tag: &str| {
        if !tags.iter().any(|t| t == tag) {
            tags.push(tag.to_string());
        }
    };

    let mut category = Category::Generic;
    for rule in CATEGORY_RULES {
        if has(rule.keywords) {
            category = rule.category;
            if let Some(tag) = rule.implied_tag {
                push_tag(&mut tags, tag);
            }
            break;
        }
    }

    for (tag, keywords) in TAG_RULES {
        if has(keywords) {
            push_tag(&mut tags, tag);
        }
    }

    Analysis { category, tags }
}
