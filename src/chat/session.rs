//! Conversation session state — explicit, executor-owned, never persisted.

use uuid::Uuid;

use crate::inbox::model::{AnalyzedEmail, EmailDraft};

/// Per-session dialogue state: the cursor into the flattened email
/// sequence plus the draft lifecycle.
///
/// Owned exclusively by the dialogue executor; passed explicitly into
/// `execute` so operation sequences are testable without a UI harness.
#[derive(Debug, Clone)]
pub struct SessionState {
    /// Session identity for logging/tracing.
    pub id: Uuid,
    /// 0-based index into the flattened sequence. Only meaningful while an
    /// analysis with at least one email exists.
    pub current_email_index: usize,
    /// The single in-progress draft, if any.
    pub current_draft: Option<EmailDraft>,
    /// The email the current/most recent draft was generated for — resolves
    /// refinement requests that don't repeat the target.
    pub last_draft_email: Option<AnalyzedEmail>,
}

impl SessionState {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            current_email_index: 0,
            current_draft: None,
            last_draft_email: None,
        }
    }

    pub fn has_draft(&self) -> bool {
        self.current_draft.is_some()
    }

    /// Clear the in-progress draft (after a successful send). The
    /// last-draft reference is kept — it only stops mattering because the
    /// refinement intent is gated on a draft existing.
    pub fn clear_draft(&mut self) {
        self.current_draft = None;
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}
