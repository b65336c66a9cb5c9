//! HTTP collaborators — all four traits backed by the dashboard API.
//!
//! One `reqwest::Client` with a shared timeout; JSON request/response bodies
//! in the camelCase wire format of [`super::types`]. Non-2xx responses are
//! captured with a body preview so failures are diagnosable from logs.

use async_trait::async_trait;
use secrecy::ExposeSecret;

use crate::chat::intent::DraftTone;
use crate::collab::types::{
    AnalyzeRequest, AnalyzeResponse, DraftRequest, DraftResponse, DraftSource, FetchResponse,
    RawEmail, SendRequest, SendResponse,
};
use crate::collab::{DraftSender, InboxAnalyzer, InboxFetcher, ReplyDrafter};
use crate::config::TriageConfig;
use crate::error::CollabError;
use crate::inbox::model::{AnalyzedEmail, EmailDraft, InboxAnalysis};

/// Max body bytes echoed into error reasons.
const ERROR_BODY_PREVIEW: usize = 300;

/// Dashboard API client implementing all four collaborator traits.
pub struct HttpCollaborators {
    client: reqwest::Client,
    api_base: String,
    api_token: Option<secrecy::SecretString>,
}

impl HttpCollaborators {
    /// Build a client from configuration.
    pub fn new(config: &TriageConfig) -> Result<Self, CollabError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;

        Ok(Self {
            client,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            api_token: config.api_token.clone(),
        })
    }

    fn api_url(&self, endpoint: &str) -> String {
        format!("{}{endpoint}", self.api_base)
    }

    /// POST `body` to `endpoint` and decode a JSON response of type `T`.
    async fn post_json<B, T>(&self, endpoint: &str, body: Option<&B>) -> Result<T, CollabError>
    where
        B: serde::Serialize + Sync,
        T: serde::de::DeserializeOwned,
    {
        let mut request = self.client.post(self.api_url(endpoint));
        if let Some(token) = &self.api_token {
            request = request.bearer_auth(token.expose_secret());
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let preview: String = body.chars().take(ERROR_BODY_PREVIEW).collect();
            tracing::warn!(endpoint, %status, "Collaborator call failed");
            return Err(CollabError::RequestFailed {
                endpoint: endpoint.to_string(),
                reason: format!("{status}: {preview}"),
            });
        }

        let text = response.text().await?;
        serde_json::from_str(&text).map_err(|e| CollabError::InvalidResponse {
            endpoint: endpoint.to_string(),
            reason: e.to_string(),
        })
    }
}

#[async_trait]
impl InboxFetcher for HttpCollaborators {
    async fn fetch(&self) -> Result<FetchResponse, CollabError> {
        // The fetch endpoint takes no request body.
        self.post_json::<(), _>("/api/inbox-fetch", None).await
    }
}

#[async_trait]
impl InboxAnalyzer for HttpCollaborators {
    async fn analyze(
        &self,
        emails: &[RawEmail],
        provider: &str,
        connected_account: &str,
    ) -> Result<InboxAnalysis, CollabError> {
        let request = AnalyzeRequest {
            emails: emails.to_vec(),
            provider: provider.to_string(),
            connected_account: connected_account.to_string(),
        };
        let response: AnalyzeResponse = self.post_json("/api/inbox-analyze", Some(&request)).await?;
        Ok(response.analysis)
    }
}

#[async_trait]
impl ReplyDrafter for HttpCollaborators {
    async fn draft(
        &self,
        original: &AnalyzedEmail,
        tone: DraftTone,
        instructions: Option<&str>,
        user_context: Option<&str>,
    ) -> Result<EmailDraft, CollabError> {
        let request = DraftRequest {
            original_email: DraftSource {
                id: original.id.clone(),
                subject: original.subject.clone(),
                from: original.from.clone(),
                snippet: original.snippet.clone(),
                summary: original.summary.clone(),
            },
            tone: tone.as_str().to_string(),
            instructions: instructions.map(String::from),
            user_context: user_context.map(String::from),
        };
        let response: DraftResponse = self
            .post_json("/api/draft-email-reply", Some(&request))
            .await?;
        Ok(response.draft)
    }
}

#[async_trait]
impl DraftSender for HttpCollaborators {
    async fn send(&self, draft: &EmailDraft) -> Result<(), CollabError> {
        let request = SendRequest {
            draft: draft.clone(),
        };
        let response: SendResponse = self.post_json("/api/send-draft", Some(&request)).await?;

        if response.success {
            tracing::info!(original_email_id = %draft.original_email_id, "Draft sent");
            Ok(())
        } else {
            Err(CollabError::Rejected {
                reason: response
                    .error
                    .unwrap_or_else(|| "send-draft reported failure without a reason".into()),
            })
        }
    }
}
