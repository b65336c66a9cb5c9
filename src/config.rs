//! Configuration types.

use std::time::Duration;

use secrecy::SecretString;

use crate::error::ConfigError;

/// Default request timeout for collaborator calls.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Triage engine configuration.
///
/// All collaborator endpoints live under one dashboard API base URL.
#[derive(Debug, Clone)]
pub struct TriageConfig {
    /// Base URL of the dashboard API (e.g. `https://ops.example.com`).
    pub api_base: String,
    /// Optional bearer token for the dashboard API.
    pub api_token: Option<SecretString>,
    /// Free-text context about the user, forwarded to the draft collaborator
    /// so replies are written in their voice.
    pub user_context: Option<String>,
    /// Timeout applied to every collaborator request.
    pub request_timeout: Duration,
}

impl Default for TriageConfig {
    fn default() -> Self {
        Self {
            api_base: "http://localhost:3000".to_string(),
            api_token: None,
            user_context: None,
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl TriageConfig {
    /// Load configuration from the environment.
    ///
    /// - `INBOX_INTEL_API_BASE` (required) — dashboard API base URL
    /// - `INBOX_INTEL_API_TOKEN` — bearer token
    /// - `INBOX_INTEL_USER_CONTEXT` — user voice/context for drafting
    /// - `INBOX_INTEL_TIMEOUT_SECS` — collaborator request timeout
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_base = std::env::var("INBOX_INTEL_API_BASE")
            .ok()
            .map(|v| v.trim().trim_end_matches('/').to_string())
            .filter(|v| !v.is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar {
                key: "INBOX_INTEL_API_BASE".into(),
                hint: "export INBOX_INTEL_API_BASE=http://localhost:3000".into(),
            })?;

        let api_token = std::env::var("INBOX_INTEL_API_TOKEN")
            .ok()
            .filter(|v| !v.is_empty())
            .map(SecretString::from);

        let user_context = std::env::var("INBOX_INTEL_USER_CONTEXT")
            .ok()
            .filter(|v| !v.is_empty());

        let request_timeout = match std::env::var("INBOX_INTEL_TIMEOUT_SECS") {
            Ok(raw) => {
                let secs: u64 = raw.parse().map_err(|_| ConfigError::InvalidValue {
                    key: "INBOX_INTEL_TIMEOUT_SECS".into(),
                    message: format!("expected a positive integer, got '{raw}'"),
                })?;
                Duration::from_secs(secs)
            }
            Err(_) => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        };

        Ok(Self {
            api_base,
            api_token,
            user_context,
            request_timeout,
        })
    }
}
