//! Error types for the HTTP MAC core.

/// Core error type for credential construction and configuration.
#[derive(Debug, thiserror::Error)]
pub enum MacAuthError {
    /// Credential identifier is empty or contains characters that cannot be
    /// carried inside a quoted header parameter.
    #[error("invalid MAC credential identifier: {0:?}")]
    InvalidCredentialId(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// Internal error with context.
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

/// Convenience result type for core operations.
pub type MacAuthResult<T> = Result<T, MacAuthError>;
