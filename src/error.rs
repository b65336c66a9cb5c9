//! Error types for Inbox Intel.

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {key}. {hint}")]
    MissingEnvVar { key: String, hint: String },

    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Collaborator (fetch/analyze/draft/send) errors.
///
/// These never escape the dialogue executor — it converts them into
/// user-facing guidance strings at its boundary. They do surface from the
/// collaborator traits directly, so callers wiring their own collaborators
/// see the full taxonomy.
#[derive(Debug, thiserror::Error)]
pub enum CollabError {
    #[error("Request to {endpoint} failed: {reason}")]
    RequestFailed { endpoint: String, reason: String },

    #[error("Invalid response from {endpoint}: {reason}")]
    InvalidResponse { endpoint: String, reason: String },

    #[error("Collaborator rejected the request: {reason}")]
    Rejected { reason: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}
