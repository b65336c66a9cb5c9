//! Response formatters — pure, deterministic chat-markup builders.
//!
//! These are the rendering contract: other components never assemble their
//! own analysis/email/draft markup. No control flow beyond data
//! substitution.

use crate::inbox::model::{AnalyzedEmail, EmailDraft, InboxAnalysis};
use crate::inbox::sequence;

/// FYI entries shown before the section truncates.
const FYI_PREVIEW_LIMIT: usize = 5;

/// Render a full analysis: header, summary, one section per non-empty
/// bucket (urgent → needs-response → fyi) with 1-based numbering running
/// continuously across buckets, and a footer inviting a draft request.
pub fn format_analysis(analysis: &InboxAnalysis) -> String {
    let mut out = String::with_capacity(1024);

    out.push_str(&format!(
        "📬 **Inbox Intelligence** — {} ({})\n",
        analysis.connected_account, analysis.provider
    ));
    out.push_str(&format!(
        "_Synced {} UTC_\n\n",
        analysis.analyzed_at.format("%Y-%m-%d %H:%M")
    ));
    out.push_str(&analysis.summary);
    out.push('\n');

    let mut number = 0usize;

    if !analysis.urgent.is_empty() {
        out.push_str(&format!("\n🔴 **Urgent** ({})\n", analysis.urgent.len()));
        for email in &analysis.urgent {
            number += 1;
            push_entry(&mut out, number, email);
        }
    }

    if !analysis.needs_response.is_empty() {
        out.push_str(&format!(
            "\n🟡 **Needs response** ({})\n",
            analysis.needs_response.len()
        ));
        for email in &analysis.needs_response {
            number += 1;
            push_entry(&mut out, number, email);
        }
    }

    if !analysis.fyi.is_empty() {
        out.push_str(&format!("\n🔵 **FYI** ({})\n", analysis.fyi.len()));
        for email in analysis.fyi.iter().take(FYI_PREVIEW_LIMIT) {
            number += 1;
            push_entry(&mut out, number, email);
        }
        if analysis.fyi.len() > FYI_PREVIEW_LIMIT {
            out.push_str(&format!(
                "   _…and {} more_\n",
                analysis.fyi.len() - FYI_PREVIEW_LIMIT
            ));
        }
    }

    out.push_str("\nWant a reply drafted? Say \"draft reply to #N\".");
    out
}

fn push_entry(out: &mut String, number: usize, email: &AnalyzedEmail) {
    out.push_str(&format!("{number}. **{}** — {}\n", email.subject, email.from));
    out.push_str(&format!("   {}\n", email.summary));
    if let Some(action) = &email.suggested_action {
        out.push_str(&format!("   ↳ {action}\n"));
    }
}

/// Render a single email at a 1-based position out of `total`.
pub fn format_single_email(email: &AnalyzedEmail, position: usize, total: usize) -> String {
    let mut out = String::with_capacity(256);

    out.push_str(&format!("📧 Email {position} of {total}\n\n"));
    out.push_str(&format!("**{}**\n", email.subject));
    out.push_str(&format!("From: {}\n", email.from));
    out.push_str(&format!(
        "Priority: {} {}\n\n",
        email.priority.glyph(),
        email.priority.label()
    ));
    out.push_str(&email.summary);
    out.push('\n');
    if let Some(action) = &email.suggested_action {
        out.push_str(&format!("\n💡 Suggested: {action}\n"));
    }
    out.push_str("\nSay \"draft reply\" to respond, or \"next\" to keep moving.");
    out
}

/// Render a draft with the fixed follow-up menu.
pub fn format_draft(draft: &EmailDraft) -> String {
    let mut out = String::with_capacity(draft.body.len() + 256);

    out.push_str(&format!("✍️ **Draft reply** — {}\n\n", draft.subject));
    out.push_str(&draft.body);
    out.push_str("\n\n———\n");
    out.push_str(
        "Say **\"send it\"** to send, **\"make it shorter\"** to tighten it, \
         **\"add …\"** to include something, or **\"start over\"** with a fresh \"draft reply\".",
    );
    out
}

/// Render the email at the session cursor, clamped into range.
///
/// Convenience used by the executor after cursor moves; returns `None`
/// when the analysis holds no emails at all.
pub fn format_email_at(analysis: &InboxAnalysis, index: usize) -> Option<String> {
    let total = sequence::total_emails(analysis);
    if total == 0 {
        return None;
    }
    let clamped = index.min(total - 1);
    let email = sequence::all_emails_in_order(analysis)[clamped];
    Some(format_single_email(email, clamped + 1, total))
}
