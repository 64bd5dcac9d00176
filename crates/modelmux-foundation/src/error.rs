//! Router error taxonomy.
//!
//! Every failure a requester can observe maps to one of four variants, each
//! with a stable wire code. Provider failures carry the provider name, or the
//! resolution stage (`model_selection`, `auto_select`) when no provider was
//! ever chosen.

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum RouterError {
    /// The request payload violated a validation constraint. The message
    /// names the first violation found.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Provider resolution or execution failed.
    #[error("Provider error ({provider}): {message}")]
    Provider { provider: String, message: String },

    /// The configured deadline elapsed before the provider replied.
    #[error("Request timed out after {0}ms")]
    Timeout(u64),

    /// Unexpected failure inside the router itself.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl RouterError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn provider(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Provider {
            provider: provider.into(),
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Stable code reported in error replies.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Provider { .. } => "PROVIDER_ERROR",
            Self::Timeout(_) => "TIMEOUT",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

/// Result type used across the router.
pub type RouterResult<T> = Result<T, RouterError>;
