//! Priority sequencer — pure projections over an analysis snapshot.
//!
//! The three buckets are the only source of truth for ordering. The
//! flattened sequence is recomputed on every access, never cached, so it
//! always reflects the latest scan.

use crate::inbox::model::{AnalyzedEmail, InboxAnalysis, Priority};

/// All analyzed emails in priority order: urgent, then needs-response,
/// then FYI. Order within each bucket is preserved.
pub fn all_emails_in_order(analysis: &InboxAnalysis) -> Vec<&AnalyzedEmail> {
    analysis
        .urgent
        .iter()
        .chain(analysis.needs_response.iter())
        .chain(analysis.fyi.iter())
        .collect()
}

/// Total number of analyzed emails across all buckets.
pub fn total_emails(analysis: &InboxAnalysis) -> usize {
    analysis.urgent.len() + analysis.needs_response.len() + analysis.fyi.len()
}

/// Look up an email by its 1-based position in the flattened sequence.
///
/// Returns `None` outside `[1, total]`.
pub fn email_by_number(analysis: &InboxAnalysis, number: usize) -> Option<&AnalyzedEmail> {
    if number == 0 {
        return None;
    }
    all_emails_in_order(analysis).get(number - 1).copied()
}

/// Find the first email whose subject, summary, or sender contains the
/// keyword (case-insensitive), in flattened order.
///
/// Returns the 0-based flattened position alongside the email so callers
/// can move the cursor to the match.
pub fn find_email_by_keyword<'a>(
    analysis: &'a InboxAnalysis,
    keyword: &str,
) -> Option<(usize, &'a AnalyzedEmail)> {
    let needle = keyword.trim().to_lowercase();
    if needle.is_empty() {
        return None;
    }
    all_emails_in_order(analysis)
        .into_iter()
        .enumerate()
        .find(|(_, email)| {
            email.subject.to_lowercase().contains(&needle)
                || email.summary.to_lowercase().contains(&needle)
                || email.from.to_lowercase().contains(&needle)
        })
}

/// Flattened position of the first urgent email, or `None` when the urgent
/// bucket is empty. The urgent bucket leads the sequence, so a hit is
/// always position 0.
pub fn first_urgent_position(analysis: &InboxAnalysis) -> Option<usize> {
    all_emails_in_order(analysis)
        .iter()
        .position(|email| email.priority == Priority::Urgent)
}
