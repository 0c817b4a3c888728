//! Error types for promoscout.
//!
//! Two layers: [`ProviderError`] classifies upstream LLM failures so the
//! retry policy can tell transient conditions from everything else, and
//! [`ScoutError`] is the crate-wide error the API surface maps to HTTP
//! statuses.

use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, ScoutError>;

/// Top-level promoscout error.
#[derive(Debug, Error)]
pub enum ScoutError {
    /// An upstream provider call failed (after retries, where applicable).
    #[error("provider error: {0}")]
    Provider(#[from] ProviderError),

    /// The caller supplied an empty (or whitespace-only) prompt.
    #[error("prompt must not be empty")]
    EmptyPrompt,

    /// Missing or invalid startup configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// I/O failure (server bind, etc.).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Internal server-side failure.
    #[error("server error: {0}")]
    Server(String),
}

/// Classified failure from an upstream code-search provider.
///
/// The classification decides retry behavior: only [`Transient`] errors are
/// retried, everything else propagates immediately.
///
/// [`Transient`]: ProviderError::Transient
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Temporary upstream failure expected to succeed on retry.
    #[error("transient provider failure: {0}")]
    Transient(String),

    /// Upstream failure that will not improve with retries.
    #[error("permanent provider failure: {0}")]
    Permanent(String),

    /// The provider rejected the request as malformed.
    #[error("malformed provider request: {0}")]
    MalformedRequest(String),
}

impl ProviderError {
    /// Whether the retry policy should attempt this call again.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Transient(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_is_retryable() {
        assert!(ProviderError::Transient("503".into()).is_transient());
    }

    #[test]
    fn test_permanent_is_not_retryable() {
        assert!(!ProviderError::Permanent("401".into()).is_transient());
        assert!(!ProviderError::MalformedRequest("400".into()).is_transient());
    }

    #[test]
    fn test_provider_error_converts_to_scout_error() {
        let err: ScoutError = ProviderError::Permanent("upstream".into()).into();
        assert!(matches!(err, ScoutError::Provider(_)));
    }

    #[test]
    fn test_display_messages() {
        let err = ScoutError::EmptyPrompt;
        assert_eq!(err.to_string(), "prompt must not be empty");
        let err = ProviderError::Transient("service unavailable".into());
        assert!(err.to_string().contains("service unavailable"));
    }
}
