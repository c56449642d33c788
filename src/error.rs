//! Error types for Cloud Foundry operations.

use std::time::Duration;

use thiserror::Error;

/// Errors that can occur during Cloud Foundry API operations.
#[derive(Debug, Error)]
pub enum CfError {
    /// Configuration is missing or incomplete.
    #[error("Cloud Foundry configuration required: {0}")]
    ConfigMissing(String),

    /// No resource matched the requested name.
    #[error("{entity_type} {name} does not exist")]
    NotFound {
        entity_type: &'static str,
        name: String,
    },

    /// More than one resource matched the requested name.
    #[error("{entity_type} {name} is ambiguous: {count} matches")]
    Ambiguous {
        entity_type: &'static str,
        name: String,
        count: usize,
    },

    /// An asynchronous job reached the failed state.
    #[error("{code}: {description}")]
    JobFailed {
        job_id: String,
        code: String,
        description: String,
    },

    /// A job did not reach a terminal state within the configured budget.
    #[error("Job {job_id} did not complete within {elapsed:?}")]
    Timeout { job_id: String, elapsed: Duration },

    /// A page reported a successor that does not move the listing forward.
    #[error("Invalid pagination cursor: page {page} reported next page {next}")]
    InvalidCursor { page: u32, next: u32 },

    /// An operation attempted an illegal phase transition.
    #[error("Invalid operation transition from {from} to {to}")]
    InvalidState {
        from: &'static str,
        to: &'static str,
    },

    /// API request failed.
    #[error("Cloud Foundry API error: {message}")]
    ApiError {
        message: String,
        status_code: Option<u16>,
        error_code: Option<String>,
    },

    /// HTTP transport error.
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    /// JSON parsing error.
    #[error("Failed to parse response: {0}")]
    ParseError(#[from] serde_json::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    UrlError(#[from] url::ParseError),

    /// Rate limited.
    #[error("Rate limited, retry after {retry_after_secs:?} seconds")]
    RateLimited { retry_after_secs: Option<u64> },
}

/// Coarse classification of a [`CfError`].
///
/// Callers that render errors to users branch on this rather than matching
/// every variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Ambiguous,
    JobFailed,
    Timeout,
    Transport,
    Config,
    Internal,
}

impl CfError {
    /// Returns the kind of this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::Ambiguous { .. } => ErrorKind::Ambiguous,
            Self::JobFailed { .. } => ErrorKind::JobFailed,
            Self::Timeout { .. } => ErrorKind::Timeout,
            Self::ApiError { .. }
            | Self::HttpError(_)
            | Self::ParseError(_)
            | Self::UrlError(_)
            | Self::RateLimited { .. } => ErrorKind::Transport,
            Self::ConfigMissing(_) => ErrorKind::Config,
            Self::InvalidCursor { .. } | Self::InvalidState { .. } => ErrorKind::Internal,
        }
    }

    pub(crate) fn not_found(entity_type: &'static str, name: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type,
            name: name.into(),
        }
    }
}

/// Result type alias for Cloud Foundry operations.
pub type Result<T> = core::result::Result<T, CfError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_failed_display() {
        let err = CfError::JobFailed {
            job_id: "job-1".to_string(),
            code: "CF-ServiceBrokerBadResponse".to_string(),
            description: "broker returned 500".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "CF-ServiceBrokerBadResponse: broker returned 500"
        );
        assert_eq!(err.kind(), ErrorKind::JobFailed);
    }

    #[test]
    fn test_lookup_error_kinds() {
        assert_eq!(
            CfError::not_found("Space", "dev").to_string(),
            "Space dev does not exist"
        );

        let err = CfError::Ambiguous {
            entity_type: "Service instance",
            name: "db".to_string(),
            count: 2,
        };
        assert_eq!(err.kind(), ErrorKind::Ambiguous);
        assert!(err.to_string().contains("2 matches"));
    }
}
