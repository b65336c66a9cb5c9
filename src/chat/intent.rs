//! Intent parser — maps a free-text utterance to one member of the closed
//! [`EmailAction`] set.
//!
//! Matching runs over an explicit **ordered** rules table: first matching
//! rule wins and later rules are never evaluated. The scan/check phrasings
//! sit above the permissive refinement keywords so "check my email" can
//! never be swallowed by a coincidental overlap, and the refinement rule is
//! gated on a draft actually existing so "make it shorter" means nothing
//! before a draft does.

use std::sync::LazyLock;

use regex::Regex;

/// Tone requested for a draft reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DraftTone {
    #[default]
    Professional,
    Friendly,
    Brief,
    Detailed,
}

impl DraftTone {
    /// Wire value sent to the draft collaborator.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Professional => "professional",
            Self::Friendly => "friendly",
            Self::Brief => "brief",
            Self::Detailed => "detailed",
        }
    }
}

/// The closed set of recognized inbox requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmailAction {
    ScanInbox,
    ShowEmails,
    NextEmail,
    PrevEmail,
    SkipToUrgent,
    BackToSummary,
    DraftReply {
        /// 0-based index into the flattened sequence, when the user named
        /// one explicitly ("draft reply to #3").
        email_index: Option<usize>,
        /// Keyword target ("draft reply about the invoice"); an explicit
        /// index wins over a keyword.
        keyword: Option<String>,
        tone: DraftTone,
    },
    SendDraft,
    RefineDraft {
        /// The full original utterance — the draft collaborator reads the
        /// request verbatim.
        instructions: String,
    },
}

impl EmailAction {
    /// Short label for logging.
    pub fn label(&self) -> &'static str {
        match self {
            Self::ScanInbox => "scan_inbox",
            Self::ShowEmails => "show_emails",
            Self::NextEmail => "next_email",
            Self::PrevEmail => "prev_email",
            Self::SkipToUrgent => "skip_to_urgent",
            Self::BackToSummary => "back_to_summary",
            Self::DraftReply { .. } => "draft_reply",
            Self::SendDraft => "send_draft",
            Self::RefineDraft { .. } => "refine_draft",
        }
    }
}

/// One entry in the ordered rules table.
///
/// `matches` sees the normalized (trimmed, lowercased) utterance; `build`
/// additionally receives the trimmed original so actions can carry the
/// user's exact words.
struct Rule {
    name: &'static str,
    /// The rule is skipped entirely unless a draft currently exists.
    needs_draft: bool,
    matches: fn(&str) -> bool,
    build: fn(raw: &str, norm: &str) -> EmailAction,
}

/// Ordered rules — precedence is the array order, top rule wins.
const RULES: &[Rule] = &[
    Rule {
        name: "scan_inbox",
        needs_draft: false,
        matches: matches_scan_inbox,
        build: |_, _| EmailAction::ScanInbox,
    },
    Rule {
        name: "show_emails",
        needs_draft: false,
        matches: matches_show_emails,
        build: |_, _| EmailAction::ShowEmails,
    },
    Rule {
        name: "next_email",
        needs_draft: false,
        matches: |u| matches!(u, "next" | "next email"),
        build: |_, _| EmailAction::NextEmail,
    },
    Rule {
        name: "prev_email",
        needs_draft: false,
        matches: |u| matches!(u, "back" | "previous" | "prev"),
        build: |_, _| EmailAction::PrevEmail,
    },
    Rule {
        name: "skip_to_urgent",
        needs_draft: false,
        matches: |u| u.contains("skip to urgent") || u.contains("urgent only"),
        build: |_, _| EmailAction::SkipToUrgent,
    },
    Rule {
        name: "back_to_summary",
        needs_draft: false,
        matches: |u| u.contains("back to summary") || u.contains("show summary"),
        build: |_, _| EmailAction::BackToSummary,
    },
    Rule {
        name: "draft_reply",
        needs_draft: false,
        matches: matches_draft_reply,
        build: build_draft_reply,
    },
    Rule {
        name: "send_draft",
        needs_draft: false,
        matches: |u| matches!(u, "send it" | "send" | "send draft" | "send the email"),
        build: |_, _| EmailAction::SendDraft,
    },
    Rule {
        name: "refine_draft",
        needs_draft: true,
        matches: matches_refine_draft,
        build: |raw, _| EmailAction::RefineDraft {
            instructions: raw.to_string(),
        },
    },
];

/// Parse an utterance into an email action.
///
/// Case-insensitive, whitespace-trimmed. `has_draft` gates the refinement
/// rule. Returns `None` when no rule matches — the utterance is not an
/// inbox intent and the caller should fall through to general handling.
pub fn parse(utterance: &str, has_draft: bool) -> Option<EmailAction> {
    let raw = utterance.trim();
    if raw.is_empty() {
        return None;
    }
    let norm = raw.to_lowercase();

    for rule in RULES {
        if rule.needs_draft && !has_draft {
            continue;
        }
        if (rule.matches)(&norm) {
            tracing::debug!(rule = rule.name, "Utterance matched intent rule");
            return Some((rule.build)(raw, &norm));
        }
    }
    None
}

// ── Matchers ────────────────────────────────────────────────────────

fn matches_scan_inbox(u: &str) -> bool {
    let names_mailbox = u.contains("inbox") || u.contains("email");
    (u.contains("scan") && names_mailbox)
        || (u.contains("check") && names_mailbox)
        || u.contains("inbox intelligence")
        || matches!(u, "scan inbox" | "check email" | "check my email")
}

fn matches_show_emails(u: &str) -> bool {
    u.contains("show email") || matches!(u, "show emails" | "list emails")
}

fn matches_draft_reply(u: &str) -> bool {
    u.contains("draft reply") || u.contains("draft a reply") || u.contains("write reply")
}

fn matches_refine_draft(u: &str) -> bool {
    const REFINE_KEYWORDS: &[&str] = &[
        "make it",
        "add ",
        "change ",
        "shorter",
        "longer",
        "more friendly",
        "more professional",
    ];
    REFINE_KEYWORDS.iter().any(|k| u.contains(k))
}

// ── Draft-reply extraction ──────────────────────────────────────────

/// Target pattern: "(to )?(#|number )?<digits>", 1-indexed.
static TARGET_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:\bto\s+)?(?:#|\bnumber\s+)?(\d+)").unwrap());

/// Keyword target: "about (the) <words>".
static ABOUT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\babout\s+(?:the\s+)?(.+?)\s*$").unwrap());

fn build_draft_reply(_raw: &str, norm: &str) -> EmailAction {
    let email_index = TARGET_RE
        .captures(norm)
        .and_then(|caps| caps[1].parse::<usize>().ok())
        .and_then(|n| n.checked_sub(1));

    let keyword = ABOUT_RE
        .captures(norm)
        .map(|caps| caps[1].trim_matches(|c: char| c.is_ascii_punctuation()).trim().to_string())
        .filter(|kw| !kw.is_empty());

    EmailAction::DraftReply {
        email_index,
        keyword,
        tone: extract_tone(norm),
    }
}

/// Tone keyword precedence: friendly, then brief/short, then detailed,
/// defaulting to professional.
fn extract_tone(u: &str) -> DraftTone {
    if u.contains("friendly") {
        DraftTone::Friendly
    } else if u.contains("brief") || u.contains("short") {
        DraftTone::Brief
    } else if u.contains("detailed") {
        DraftTone::Detailed
    } else {
        DraftTone::Professional
    }
}
