//! Wire types for the dashboard collaborator API (camelCase JSON).

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::inbox::model::{EmailDraft, InboxAnalysis};

/// A raw mailbox message as returned by the fetch collaborator,
/// before any triage metadata exists.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawEmail {
    pub id: String,
    pub subject: String,
    pub from: String,
    pub snippet: String,
    /// Provider-native date display value.
    pub date: String,
    pub is_unread: bool,
    #[serde(default)]
    pub labels: BTreeSet<String>,
}

/// Payload of the fetched mailbox: account identity plus unread/flagged messages.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchData {
    pub provider: String,
    pub connected_account: String,
    #[serde(default)]
    pub emails: Vec<RawEmail>,
}

/// Response of the fetch collaborator.
///
/// A missing mailbox connection is a `connected: false` payload with a
/// human-readable `message`/`error` — never a transport error.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchResponse {
    pub connected: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<FetchData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Request body for the analyze collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeRequest {
    pub emails: Vec<RawEmail>,
    pub provider: String,
    pub connected_account: String,
}

/// Response of the analyze collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeResponse {
    pub analysis: InboxAnalysis,
}

/// The slice of an analyzed email the draft collaborator needs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftSource {
    pub id: String,
    pub subject: String,
    pub from: String,
    pub snippet: String,
    pub summary: String,
}

/// Request body for the draft collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftRequest {
    pub original_email: DraftSource,
    pub tone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_context: Option<String>,
}

/// Response of the draft collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftResponse {
    pub draft: EmailDraft,
}

/// Request body for the send collaborator — the draft payload is passed
/// explicitly so the collaborator stays stateless (see DESIGN.md).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendRequest {
    pub draft: EmailDraft,
}

/// Response of the send collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fetch_response_disconnected_minimal() {
        let json = r#"{"connected": false, "message": "No mailbox linked"}"#;
        let resp: FetchResponse = serde_json::from_str(json).unwrap();
        assert!(!resp.connected);
        assert!(resp.data.is_none());
        assert_eq!(resp.message.as_deref(), Some("No mailbox linked"));
    }

    #[test]
    fn fetch_response_connected_with_emails() {
        let json = r#"{
            "connected": true,
            "data": {
                "provider": "outlook",
                "connectedAccount": "ops@example.com",
                "emails": [{
                    "id": "m1",
                    "subject": "Invoice overdue",
                    "from": "billing@vendor.com",
                    "snippet": "Your invoice #42…",
                    "date": "Tue, 3 Feb 2026 08:00:00 +0000",
                    "isUnread": true,
                    "labels": ["INBOX", "IMPORTANT"]
                }]
            }
        }"#;
        let resp: FetchResponse = serde_json::from_str(json).unwrap();
        let data = resp.data.unwrap();
        assert_eq!(data.connected_account, "ops@example.com");
        assert_eq!(data.emails.len(), 1);
        assert!(data.emails[0].labels.contains("IMPORTANT"));
    }

    #[test]
    fn draft_request_wire_shape() {
        let req = DraftRequest {
            original_email: DraftSource {
                id: "m1".into(),
                subject: "Invoice overdue".into(),
                from: "billing@vendor.com".into(),
                snippet: "Your invoice #42…".into(),
                summary: "Vendor chasing invoice #42".into(),
            },
            tone: "professional".into(),
            instructions: None,
            user_context: Some("Operations lead at Acme".into()),
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["originalEmail"]["id"], "m1");
        assert_eq!(json["tone"], "professional");
        assert_eq!(json["userContext"], "Operations lead at Acme");
        // Absent instructions are omitted, not null
        assert!(json.get("instructions").is_none());
    }

    #[test]
    fn send_response_failure_carries_error() {
        let json = r#"{"success": false, "error": "SMTP relay refused"}"#;
        let resp: SendResponse = serde_json::from_str(json).unwrap();
        assert!(!resp.success);
        assert_eq!(resp.error.as_deref(), Some("SMTP relay refused"));
    }
}
