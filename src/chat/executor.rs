//! Dialogue executor — runs parsed email actions against the inbox store
//! and the session state, and synthesizes the chat response.
//!
//! Every branch that cannot satisfy its precondition returns a guidance
//! string naming the remedying next utterance — preconditions are expected
//! conversational paths, not errors. Collaborator failures are converted to
//! ⚠️-prefixed messages at this boundary and leave the session untouched,
//! so the same action can be retried safely.
//!
//! Actions serialize on the session mutex (queue-and-drain): an utterance
//! arriving while another is executing waits its turn instead of
//! interleaving store mutations. Collaborator calls are the only await
//! points, and state is mutated strictly after they return — dropping the
//! in-flight future discards the result without partial application.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::chat::format;
use crate::chat::intent::{self, DraftTone, EmailAction};
use crate::chat::session::SessionState;
use crate::collab::{DraftSender, ReplyDrafter};
use crate::inbox::model::{AnalyzedEmail, InboxAnalysis};
use crate::inbox::sequence;
use crate::inbox::store::InboxStore;

/// Guidance shown whenever an action needs an analysis that doesn't exist.
const NEED_SCAN: &str =
    "📭 I haven't scanned your inbox yet. Say \"scan inbox\" and I'll prioritize what's there.";

/// Guidance shown when the inbox was scanned and came back empty.
const NO_EMAILS: &str =
    "✨ Your inbox is clear — no emails to step through. Say \"scan inbox\" to check again later.";

/// Executes [`EmailAction`]s for one conversation.
pub struct DialogueExecutor {
    store: Arc<InboxStore>,
    drafter: Arc<dyn ReplyDrafter>,
    sender: Arc<dyn DraftSender>,
    user_context: Option<String>,
    session: Mutex<SessionState>,
    processing: AtomicBool,
}

impl DialogueExecutor {
    pub fn new(
        store: Arc<InboxStore>,
        drafter: Arc<dyn ReplyDrafter>,
        sender: Arc<dyn DraftSender>,
        user_context: Option<String>,
    ) -> Self {
        Self {
            store,
            drafter,
            sender,
            user_context,
            session: Mutex::new(SessionState::new()),
            processing: AtomicBool::new(false),
        }
    }

    /// Whether an action is currently executing. Overlapping utterances are
    /// not dropped — they queue on the session lock — but callers can use
    /// this to surface a "working…" indicator.
    pub fn is_processing(&self) -> bool {
        self.processing.load(Ordering::Relaxed)
    }

    /// Parse and execute one utterance.
    ///
    /// Returns `None` when the utterance is not an inbox intent — the
    /// caller falls through to its general-purpose handler. The parse step
    /// runs under the session lock, so it always sees the state left by the
    /// previously completed action.
    pub async fn handle_utterance(&self, utterance: &str) -> Option<String> {
        let mut session = self.session.lock().await;
        let action = intent::parse(utterance, session.has_draft())?;

        info!(
            session_id = %session.id,
            action = action.label(),
            "Executing email action"
        );

        self.processing.store(true, Ordering::Relaxed);
        let response = self.execute(action, &mut session).await;
        self.processing.store(false, Ordering::Relaxed);

        Some(response)
    }

    /// Run one action against explicit session state.
    ///
    /// Never fails — every outcome, including collaborator errors, is a
    /// user-facing string.
    pub async fn execute(&self, action: EmailAction, session: &mut SessionState) -> String {
        match action {
            EmailAction::ScanInbox => self.scan_inbox(session).await,
            EmailAction::ShowEmails => self.show_emails(session).await,
            EmailAction::NextEmail => self.step_cursor(session, 1).await,
            EmailAction::PrevEmail => self.step_cursor(session, -1).await,
            EmailAction::SkipToUrgent => self.skip_to_urgent(session).await,
            EmailAction::BackToSummary => self.back_to_summary().await,
            EmailAction::DraftReply {
                email_index,
                keyword,
                tone,
            } => {
                self.draft_reply(session, email_index, keyword.as_deref(), tone)
                    .await
            }
            EmailAction::SendDraft => self.send_draft(session).await,
            EmailAction::RefineDraft { instructions } => {
                self.refine_draft(session, &instructions).await
            }
        }
    }

    // ── Scan ────────────────────────────────────────────────────────

    async fn scan_inbox(&self, session: &mut SessionState) -> String {
        match self.store.analyze_inbox().await {
            Some(analysis) => {
                session.current_email_index = 0;
                format::format_analysis(&analysis)
            }
            None => {
                let status = self.store.status().await;
                if status.connected {
                    format!(
                        "⚠️ I couldn't analyze your inbox just now ({}). Say \"scan inbox\" to try again.",
                        status.error.as_deref().unwrap_or("temporary failure")
                    )
                } else {
                    let detail = status
                        .message
                        .or(status.error)
                        .unwrap_or_else(|| "no mailbox is connected".into());
                    format!(
                        "📪 {detail} Connect your email account in settings, then say \"scan inbox\"."
                    )
                }
            }
        }
    }

    // ── Navigation ──────────────────────────────────────────────────

    async fn show_emails(&self, session: &mut SessionState) -> String {
        let Some(analysis) = self.store.analysis().await else {
            return NEED_SCAN.to_string();
        };
        session.current_email_index = 0;
        match format::format_email_at(&analysis, 0) {
            Some(rendered) => rendered,
            None => NO_EMAILS.to_string(),
        }
    }

    /// Move the cursor by one step, clamped to `[0, total-1]` — no wrap.
    async fn step_cursor(&self, session: &mut SessionState, delta: i64) -> String {
        let Some(analysis) = self.store.analysis().await else {
            return NEED_SCAN.to_string();
        };
        let total = sequence::total_emails(&analysis);
        if total == 0 {
            return NO_EMAILS.to_string();
        }

        let current = session.current_email_index.min(total - 1);
        let moved = if delta >= 0 {
            current.saturating_add(delta as usize).min(total - 1)
        } else {
            current.saturating_sub(delta.unsigned_abs() as usize)
        };
        session.current_email_index = moved;

        // Always in range after clamping.
        format::format_email_at(&analysis, moved).unwrap_or_else(|| NO_EMAILS.to_string())
    }

    async fn skip_to_urgent(&self, session: &mut SessionState) -> String {
        let Some(analysis) = self.store.analysis().await else {
            return NEED_SCAN.to_string();
        };
        match sequence::first_urgent_position(&analysis) {
            Some(position) => {
                session.current_email_index = position;
                format::format_email_at(&analysis, position)
                    .unwrap_or_else(|| NO_EMAILS.to_string())
            }
            None => "✅ No urgent emails right now — nothing needs immediate attention. \
                     Say \"show emails\" to walk the rest."
                .to_string(),
        }
    }

    async fn back_to_summary(&self) -> String {
        match self.store.analysis().await {
            Some(analysis) => format::format_analysis(&analysis),
            None => NEED_SCAN.to_string(),
        }
    }

    // ── Draft lifecycle ─────────────────────────────────────────────

    async fn draft_reply(
        &self,
        session: &mut SessionState,
        email_index: Option<usize>,
        keyword: Option<&str>,
        tone: DraftTone,
    ) -> String {
        let Some(analysis) = self.store.analysis().await else {
            return NEED_SCAN.to_string();
        };
        let total = sequence::total_emails(&analysis);
        if total == 0 {
            return NO_EMAILS.to_string();
        }

        let (position, email) = match self.resolve_target(&analysis, email_index, keyword, session)
        {
            Ok(resolved) => resolved,
            Err(guidance) => return guidance,
        };
        let email = email.clone();

        match self
            .drafter
            .draft(&email, tone, None, self.user_context.as_deref())
            .await
        {
            Ok(draft) => {
                session.current_email_index = position;
                session.last_draft_email = Some(email);
                let rendered = format::format_draft(&draft);
                session.current_draft = Some(draft);
                rendered
            }
            Err(e) => {
                warn!(error = %e, email_id = %email.id, "Draft collaborator failed");
                format!("⚠️ Drafting failed: {e}. Nothing was changed — say \"draft reply\" to try again.")
            }
        }
    }

    /// Resolve the draft target: explicit index, then keyword, then the
    /// email at the cursor.
    fn resolve_target<'a>(
        &self,
        analysis: &'a InboxAnalysis,
        email_index: Option<usize>,
        keyword: Option<&str>,
        session: &SessionState,
    ) -> Result<(usize, &'a AnalyzedEmail), String> {
        let total = sequence::total_emails(analysis);

        if let Some(index) = email_index {
            return sequence::email_by_number(analysis, index + 1)
                .map(|email| (index, email))
                .ok_or_else(|| {
                    format!(
                        "There are only {total} emails in this scan — pick one between 1 and {total}, \
                         like \"draft reply to #1\"."
                    )
                });
        }

        if let Some(keyword) = keyword {
            return sequence::find_email_by_keyword(analysis, keyword).ok_or_else(|| {
                format!(
                    "I couldn't find an email matching \"{keyword}\". Say \"show emails\" to see \
                     the list, or pick one by number like \"draft reply to #2\"."
                )
            });
        }

        let position = session.current_email_index.min(total - 1);
        Ok((position, sequence::all_emails_in_order(analysis)[position]))
    }

    async fn send_draft(&self, session: &mut SessionState) -> String {
        let Some(draft) = session.current_draft.clone() else {
            return "There's no draft to send. Say \"draft reply\" on an email first.".to_string();
        };

        match self.sender.send(&draft).await {
            Ok(()) => {
                session.clear_draft();
                let recipient = session
                    .last_draft_email
                    .as_ref()
                    .map(|email| email.from.clone())
                    .unwrap_or_else(|| "the sender".into());

                let mut response = format!("✅ Reply sent to {recipient}!");
                if let Some(analysis) = self.store.analysis().await {
                    let total = sequence::total_emails(&analysis);
                    let index = session.current_email_index;
                    if index + 1 < total {
                        response.push_str(&format!(
                            "\n\n📬 {} emails left in your queue — say \"next\" to keep going.",
                            total - index
                        ));
                    }
                }
                response
            }
            Err(e) => {
                warn!(error = %e, "Send collaborator failed");
                format!("⚠️ Sending failed: {e}. The draft is still here — say \"send it\" to retry.")
            }
        }
    }

    async fn refine_draft(&self, session: &mut SessionState, instructions: &str) -> String {
        // The intent rule is gated on a draft existing, so a missing draft
        // or target reference here means the session was reset under us.
        let (Some(_), Some(target)) = (&session.current_draft, session.last_draft_email.clone())
        else {
            return "There's no draft to refine yet. Say \"draft reply\" on an email first."
                .to_string();
        };

        match self
            .drafter
            .draft(
                &target,
                DraftTone::Professional,
                Some(instructions),
                self.user_context.as_deref(),
            )
            .await
        {
            Ok(draft) => {
                let rendered = format::format_draft(&draft);
                session.current_draft = Some(draft);
                rendered
            }
            Err(e) => {
                warn!(error = %e, email_id = %target.id, "Refine collaborator failed");
                format!(
                    "⚠️ Refining failed: {e}. Your current draft is unchanged — \
                     say \"send it\" to send it as-is, or try the change again."
                )
            }
        }
    }
}
