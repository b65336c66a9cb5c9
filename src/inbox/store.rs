//! Inbox analysis store — owns the latest analysis snapshot and connection
//! status, and sequences the fetch/analyze collaborator calls.
//!
//! Contract highlights:
//! - `check_connection` never errors — failures land in `InboxStatus`.
//! - `analyze_inbox` is two-phase (fetch, then analyze) and only replaces
//!   the stored analysis on full success; a connected-but-empty mailbox is
//!   a valid terminal result, not an error.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::Utc;
use tokio::sync::RwLock;
use tracing::{debug, error, info};

use crate::collab::{InboxAnalyzer, InboxFetcher};
use crate::inbox::model::{InboxAnalysis, InboxStatus};

/// Summary stored when the mailbox is connected but has nothing to triage.
pub const INBOX_CLEAR_SUMMARY: &str =
    "Inbox zero — no unread or flagged emails need attention right now.";

/// Owner of the triage snapshot. Read-only to every other component; only
/// the methods here write `status` and `analysis`.
pub struct InboxStore {
    fetcher: Arc<dyn InboxFetcher>,
    analyzer: Arc<dyn InboxAnalyzer>,
    status: RwLock<InboxStatus>,
    analysis: RwLock<Option<InboxAnalysis>>,
    // Observable independently: analyze_inbox performs a fetch step first,
    // so a UI can show "checking mailbox…" vs "prioritizing…".
    is_fetching: AtomicBool,
    is_analyzing: AtomicBool,
}

impl InboxStore {
    pub fn new(fetcher: Arc<dyn InboxFetcher>, analyzer: Arc<dyn InboxAnalyzer>) -> Self {
        Self {
            fetcher,
            analyzer,
            status: RwLock::new(InboxStatus::default()),
            analysis: RwLock::new(None),
            is_fetching: AtomicBool::new(false),
            is_analyzing: AtomicBool::new(false),
        }
    }

    /// Snapshot of the current connection status.
    pub async fn status(&self) -> InboxStatus {
        self.status.read().await.clone()
    }

    /// Snapshot of the latest analysis, if any scan has succeeded.
    pub async fn analysis(&self) -> Option<InboxAnalysis> {
        self.analysis.read().await.clone()
    }

    pub fn is_fetching(&self) -> bool {
        self.is_fetching.load(Ordering::Relaxed)
    }

    pub fn is_analyzing(&self) -> bool {
        self.is_analyzing.load(Ordering::Relaxed)
    }

    /// Probe the mailbox connection. Never errors — transport failures are
    /// folded into the returned status with `connected: false`.
    pub async fn check_connection(&self) -> InboxStatus {
        self.is_fetching.store(true, Ordering::Relaxed);
        let result = self.fetcher.fetch().await;
        self.is_fetching.store(false, Ordering::Relaxed);

        let status = match result {
            Ok(response) => {
                let (provider, account) = response
                    .data
                    .as_ref()
                    .map(|d| (Some(d.provider.clone()), Some(d.connected_account.clone())))
                    .unwrap_or((None, None));
                InboxStatus {
                    connected: response.connected,
                    provider,
                    connected_account: account,
                    error: response.error,
                    message: response.message,
                }
            }
            Err(e) => {
                error!(error = %e, "Connection check failed");
                InboxStatus {
                    connected: false,
                    error: Some(e.to_string()),
                    message: Some("Could not reach the mailbox service.".into()),
                    ..InboxStatus::default()
                }
            }
        };

        *self.status.write().await = status.clone();
        status
    }

    /// Fetch and analyze the inbox.
    ///
    /// Returns the fresh analysis on success, `None` when the mailbox is
    /// disconnected or a collaborator failed. On failure the previously
    /// stored analysis is left untouched so the user can retry safely.
    pub async fn analyze_inbox(&self) -> Option<InboxAnalysis> {
        // Phase 1: fetch. A disconnected mailbox short-circuits — the
        // analyze collaborator is never called without emails to analyze.
        self.is_fetching.store(true, Ordering::Relaxed);
        let fetched = self.fetcher.fetch().await;
        self.is_fetching.store(false, Ordering::Relaxed);

        let response = match fetched {
            Ok(response) => response,
            Err(e) => {
                error!(error = %e, "Inbox fetch failed");
                *self.status.write().await = InboxStatus {
                    connected: false,
                    error: Some(e.to_string()),
                    message: Some("Could not reach the mailbox service.".into()),
                    ..InboxStatus::default()
                };
                return None;
            }
        };

        if !response.connected {
            debug!("Mailbox not connected — skipping analysis");
            *self.status.write().await = InboxStatus {
                connected: false,
                error: response.error,
                message: response.message,
                ..InboxStatus::default()
            };
            return None;
        }

        let Some(data) = response.data else {
            // Connected without a payload is a collaborator contract breach;
            // treat it like a soft failure and keep the previous analysis.
            error!("Fetch reported connected but returned no data");
            *self.status.write().await = InboxStatus {
                connected: true,
                error: Some("fetch returned no mailbox data".into()),
                message: response.message,
                ..InboxStatus::default()
            };
            return None;
        };

        let connected_status = InboxStatus {
            connected: true,
            provider: Some(data.provider.clone()),
            connected_account: Some(data.connected_account.clone()),
            error: None,
            message: response.message.clone(),
        };

        // Phase 2a: nothing to triage — a valid terminal result.
        if data.emails.is_empty() {
            info!(account = %data.connected_account, "Inbox is clear");
            let analysis = InboxAnalysis {
                provider: data.provider,
                connected_account: data.connected_account,
                analyzed_at: Utc::now(),
                urgent: vec![],
                needs_response: vec![],
                fyi: vec![],
                summary: INBOX_CLEAR_SUMMARY.to_string(),
            };
            *self.status.write().await = connected_status;
            *self.analysis.write().await = Some(analysis.clone());
            return Some(analysis);
        }

        // Phase 2b: analyze.
        self.is_analyzing.store(true, Ordering::Relaxed);
        let analyzed = self
            .analyzer
            .analyze(&data.emails, &data.provider, &data.connected_account)
            .await;
        self.is_analyzing.store(false, Ordering::Relaxed);

        match analyzed {
            Ok(analysis) => {
                info!(
                    account = %analysis.connected_account,
                    urgent = analysis.urgent.len(),
                    needs_response = analysis.needs_response.len(),
                    fyi = analysis.fyi.len(),
                    "Inbox analyzed"
                );
                *self.status.write().await = connected_status;
                *self.analysis.write().await = Some(analysis.clone());
                Some(analysis)
            }
            Err(e) => {
                error!(error = %e, "Inbox analysis failed");
                *self.status.write().await = InboxStatus {
                    error: Some(e.to_string()),
                    ..connected_status
                };
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    use crate::collab::types::{FetchData, FetchResponse, RawEmail};
    use crate::error::CollabError;
    use crate::inbox::model::Priority;

    struct FixedFetcher {
        response: Result<FetchResponse, String>,
    }

    #[async_trait]
    impl InboxFetcher for FixedFetcher {
        async fn fetch(&self) -> Result<FetchResponse, CollabError> {
            self.response
                .clone()
                .map_err(|reason| CollabError::RequestFailed {
                    endpoint: "/api/inbox-fetch".into(),
                    reason,
                })
        }
    }

    struct FixedAnalyzer {
        fail: bool,
    }

    #[async_trait]
    impl InboxAnalyzer for FixedAnalyzer {
        async fn analyze(
            &self,
            emails: &[RawEmail],
            provider: &str,
            connected_account: &str,
        ) -> Result<InboxAnalysis, CollabError> {
            if self.fail {
                return Err(CollabError::RequestFailed {
                    endpoint: "/api/inbox-analyze".into(),
                    reason: "model overloaded".into(),
                });
            }
            Ok(InboxAnalysis {
                provider: provider.into(),
                connected_account: connected_account.into(),
                analyzed_at: Utc::now(),
                urgent: vec![],
                needs_response: emails
                    .iter()
                    .map(|raw| crate::inbox::model::AnalyzedEmail {
                        id: raw.id.clone(),
                        subject: raw.subject.clone(),
                        from: raw.from.clone(),
                        snippet: raw.snippet.clone(),
                        date: raw.date.clone(),
                        is_unread: raw.is_unread,
                        labels: raw.labels.clone(),
                        priority: Priority::NeedsResponse,
                        category: "general".into(),
                        summary: format!("needs a look: {}", raw.subject),
                        suggested_action: None,
                    })
                    .collect(),
                fyi: vec![],
                summary: format!("{} emails need attention", emails.len()),
            })
        }
    }

    fn raw_email(id: &str) -> RawEmail {
        RawEmail {
            id: id.into(),
            subject: format!("Subject {id}"),
            from: format!("{id}@example.com"),
            snippet: "…".into(),
            date: "Mon, 2 Feb 2026 09:15:00 +0000".into(),
            is_unread: true,
            labels: Default::default(),
        }
    }

    fn connected_response(emails: Vec<RawEmail>) -> FetchResponse {
        FetchResponse {
            connected: true,
            data: Some(FetchData {
                provider: "gmail".into(),
                connected_account: "ops@example.com".into(),
                emails,
            }),
            message: None,
            error: None,
        }
    }

    fn store(
        fetch: Result<FetchResponse, String>,
        analyzer_fails: bool,
    ) -> InboxStore {
        InboxStore::new(
            Arc::new(FixedFetcher { response: fetch }),
            Arc::new(FixedAnalyzer {
                fail: analyzer_fails,
            }),
        )
    }

    #[tokio::test]
    async fn check_connection_success() {
        let store = store(Ok(connected_response(vec![])), false);
        let status = store.check_connection().await;
        assert!(status.connected);
        assert_eq!(status.connected_account.as_deref(), Some("ops@example.com"));
        assert!(status.error.is_none());
    }

    #[tokio::test]
    async fn check_connection_disconnected_is_not_an_error() {
        let store = store(
            Ok(FetchResponse {
                connected: false,
                data: None,
                message: Some("No mailbox linked".into()),
                error: None,
            }),
            false,
        );
        let status = store.check_connection().await;
        assert!(!status.connected);
        assert_eq!(status.message.as_deref(), Some("No mailbox linked"));
    }

    #[tokio::test]
    async fn check_connection_captures_transport_failure() {
        let store = store(Err("connection refused".into()), false);
        let status = store.check_connection().await;
        assert!(!status.connected);
        assert!(status.error.unwrap().contains("connection refused"));
    }

    #[tokio::test]
    async fn analyze_inbox_disconnected_short_circuits() {
        let store = store(
            Ok(FetchResponse {
                connected: false,
                data: None,
                message: Some("No mailbox linked".into()),
                error: None,
            }),
            // Analyzer would fail loudly if called — it must not be.
            true,
        );
        assert!(store.analyze_inbox().await.is_none());
        assert!(!store.status().await.connected);
        assert!(store.analysis().await.is_none());
    }

    #[tokio::test]
    async fn analyze_inbox_empty_mailbox_synthesizes_clear_analysis() {
        let store = store(Ok(connected_response(vec![])), true);
        let analysis = store.analyze_inbox().await.expect("empty inbox is valid");
        assert!(analysis.urgent.is_empty());
        assert!(analysis.needs_response.is_empty());
        assert!(analysis.fyi.is_empty());
        assert_eq!(analysis.summary, INBOX_CLEAR_SUMMARY);
        assert!(store.status().await.connected);
        // The synthesized analysis is stored, not just returned.
        assert!(store.analysis().await.is_some());
    }

    #[tokio::test]
    async fn analyze_inbox_success_stores_snapshot() {
        let store = store(
            Ok(connected_response(vec![raw_email("m1"), raw_email("m2")])),
            false,
        );
        let analysis = store.analyze_inbox().await.unwrap();
        assert_eq!(analysis.needs_response.len(), 2);

        let stored = store.analysis().await.unwrap();
        assert_eq!(stored.needs_response.len(), 2);
        assert!(store.status().await.connected);
    }

    #[tokio::test]
    async fn analyzer_failure_keeps_previous_analysis() {
        // First scan succeeds.
        let store = store(Ok(connected_response(vec![raw_email("m1")])), false);
        store.analyze_inbox().await.unwrap();

        // Second store simulates a later failing analyze against the same
        // snapshot holder by swapping in a failing analyzer.
        let failing = InboxStore {
            fetcher: Arc::new(FixedFetcher {
                response: Ok(connected_response(vec![raw_email("m2")])),
            }),
            analyzer: Arc::new(FixedAnalyzer { fail: true }),
            status: RwLock::new(store.status().await),
            analysis: RwLock::new(store.analysis().await),
            is_fetching: AtomicBool::new(false),
            is_analyzing: AtomicBool::new(false),
        };

        assert!(failing.analyze_inbox().await.is_none());
        // Previous snapshot untouched, error recorded, still connected.
        let kept = failing.analysis().await.unwrap();
        assert_eq!(kept.needs_response[0].id, "m1");
        let status = failing.status().await;
        assert!(status.connected);
        assert!(status.error.unwrap().contains("model overloaded"));
    }

    #[tokio::test]
    async fn loading_flags_idle_outside_calls() {
        let store = store(Ok(connected_response(vec![])), false);
        assert!(!store.is_fetching());
        assert!(!store.is_analyzing());
        store.analyze_inbox().await;
        assert!(!store.is_fetching());
        assert!(!store.is_analyzing());
    }
}
