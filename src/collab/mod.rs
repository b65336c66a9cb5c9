//! Collaborator boundary — the four external services this engine consumes.
//!
//! Each trait is pure I/O with no triage logic; the dialogue executor and
//! inbox store own all sequencing and state. Implementations live in
//! [`http`] (the dashboard API) and in test mocks.

pub mod http;
pub mod types;

use async_trait::async_trait;

use crate::chat::intent::DraftTone;
use crate::error::CollabError;
use crate::inbox::model::{AnalyzedEmail, EmailDraft, InboxAnalysis};
use crate::collab::types::{FetchResponse, RawEmail};

pub use http::HttpCollaborators;

/// Retrieves mailbox connection status and unread/flagged messages.
///
/// A missing mailbox connection is reported as `connected: false` inside the
/// response, never as an `Err` — only transport/protocol failures error.
#[async_trait]
pub trait InboxFetcher: Send + Sync {
    async fn fetch(&self) -> Result<FetchResponse, CollabError>;
}

/// Prioritizes and summarizes raw messages into a three-bucket analysis.
#[async_trait]
pub trait InboxAnalyzer: Send + Sync {
    async fn analyze(
        &self,
        emails: &[RawEmail],
        provider: &str,
        connected_account: &str,
    ) -> Result<InboxAnalysis, CollabError>;
}

/// Composes a reply draft for an analyzed email.
///
/// `instructions` carries free-text refinement requests ("make it shorter");
/// `user_context` lets the collaborator write in the user's voice.
#[async_trait]
pub trait ReplyDrafter: Send + Sync {
    async fn draft(
        &self,
        original: &AnalyzedEmail,
        tone: DraftTone,
        instructions: Option<&str>,
        user_context: Option<&str>,
    ) -> Result<EmailDraft, CollabError>;
}

/// Transmits a finished draft.
///
/// The draft payload is passed explicitly — this engine owns the single
/// current draft, so the collaborator stays stateless and a retry resends
/// exactly what the user approved. A wire-level `success: false` surfaces
/// as [`CollabError::Rejected`].
#[async_trait]
pub trait DraftSender: Send + Sync {
    async fn send(&self, draft: &EmailDraft) -> Result<(), CollabError>;
}
