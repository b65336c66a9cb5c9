//! Core inbox domain types — analyzed emails, analysis snapshots, drafts.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Priority bucket assigned by the analyze collaborator.
///
/// Immutable once set — a new bucket assignment only arrives via a fresh
/// analysis snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Urgent,
    NeedsResponse,
    Fyi,
}

impl Priority {
    /// Short label for display and logging.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Urgent => "Urgent",
            Self::NeedsResponse => "Needs response",
            Self::Fyi => "FYI",
        }
    }

    /// Colored glyph used in chat markup.
    pub fn glyph(&self) -> &'static str {
        match self {
            Self::Urgent => "🔴",
            Self::NeedsResponse => "🟡",
            Self::Fyi => "🔵",
        }
    }
}

/// An email enriched with triage metadata.
///
/// Created wholesale by the analyze collaborator inside an [`InboxAnalysis`];
/// never mutated individually; superseded only by a fresh analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzedEmail {
    /// Provider-native message id.
    pub id: String,
    pub subject: String,
    pub from: String,
    pub snippet: String,
    /// Provider-native date display value — carried verbatim, never parsed.
    pub date: String,
    pub is_unread: bool,
    #[serde(default)]
    pub labels: BTreeSet<String>,
    pub priority: Priority,
    pub category: String,
    pub summary: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggested_action: Option<String>,
}

/// A snapshot of triage state — three disjoint priority buckets.
///
/// Bucket order is the relevance order assigned by the analyze collaborator
/// and is never re-sorted here. Replaced atomically on each successful scan.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InboxAnalysis {
    pub provider: String,
    pub connected_account: String,
    pub analyzed_at: DateTime<Utc>,
    pub urgent: Vec<AnalyzedEmail>,
    pub needs_response: Vec<AnalyzedEmail>,
    pub fyi: Vec<AnalyzedEmail>,
    /// Human-readable one-paragraph overview of the inbox.
    pub summary: String,
}

/// Mailbox connection health — set by every fetch/analyze attempt.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InboxStatus {
    pub connected: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connected_account: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// A reply in progress.
///
/// At most one current draft exists per session; refinement replaces it
/// wholesale, a successful send clears it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailDraft {
    pub subject: String,
    pub body: String,
    pub tone: String,
    pub original_email_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_email(id: &str, priority: Priority) -> AnalyzedEmail {
        AnalyzedEmail {
            id: id.into(),
            subject: format!("Subject {id}"),
            from: format!("{id}@example.com"),
            snippet: "snippet".into(),
            date: "Mon, 2 Feb 2026 09:15:00 +0000".into(),
            is_unread: true,
            labels: BTreeSet::new(),
            priority,
            category: "general".into(),
            summary: format!("Summary for {id}"),
            suggested_action: None,
        }
    }

    #[test]
    fn priority_serializes_snake_case() {
        let json = serde_json::to_value(Priority::NeedsResponse).unwrap();
        assert_eq!(json, "needs_response");
    }

    #[test]
    fn priority_labels() {
        assert_eq!(Priority::Urgent.label(), "Urgent");
        assert_eq!(Priority::NeedsResponse.label(), "Needs response");
        assert_eq!(Priority::Fyi.label(), "FYI");
    }

    #[test]
    fn analyzed_email_camel_case_wire_format() {
        let email = make_email("m1", Priority::Urgent);
        let json = serde_json::to_value(&email).unwrap();
        assert_eq!(json["isUnread"], true);
        assert_eq!(json["priority"], "urgent");
        // No suggested action → field omitted entirely
        assert!(json.get("suggestedAction").is_none());
    }

    #[test]
    fn analyzed_email_deserializes_without_labels() {
        let json = r#"{
            "id": "m1",
            "subject": "Hi",
            "from": "a@example.com",
            "snippet": "…",
            "date": "Mon, 2 Feb 2026 09:15:00 +0000",
            "isUnread": false,
            "priority": "fyi",
            "category": "general",
            "summary": "An FYI"
        }"#;
        let email: AnalyzedEmail = serde_json::from_str(json).unwrap();
        assert!(email.labels.is_empty());
        assert_eq!(email.priority, Priority::Fyi);
    }

    #[test]
    fn analysis_round_trips() {
        let analysis = InboxAnalysis {
            provider: "gmail".into(),
            connected_account: "ops@example.com".into(),
            analyzed_at: Utc::now(),
            urgent: vec![make_email("a", Priority::Urgent)],
            needs_response: vec![],
            fyi: vec![],
            summary: "1 urgent email".into(),
        };
        let json = serde_json::to_string(&analysis).unwrap();
        let parsed: InboxAnalysis = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.connected_account, "ops@example.com");
        assert_eq!(parsed.urgent.len(), 1);
        assert!(parsed.needs_response.is_empty());
    }
}
