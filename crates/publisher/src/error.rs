//! Error types for publisher.

use std::time::Duration;

use thiserror::Error;

/// Errors returned by a posting client.
#[derive(Debug, Error)]
pub enum PostError {
    /// The endpoint throttled the request. The only retryable failure.
    #[error("Rate limited (retry after {retry_after:?})")]
    RateLimited { retry_after: Option<Duration> },

    /// HTTP transport failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The endpoint rejected the post (auth, duplicate, payload, ...).
    #[error("Rejected with HTTP {status}: {body}")]
    Rejected { status: u16, body: String },

    /// Invalid client configuration.
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl PostError {
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, Self::RateLimited { .. })
    }
}

/// Why a bulletin was dropped.
#[derive(Debug, Error)]
pub enum PublishError {
    /// The first attempt failed with a non-retryable error.
    #[error("Post failed: {0}")]
    Failed(PostError),

    /// The single retry after a rate limit failed too.
    #[error("Retry after rate limit failed: {0}")]
    RetryFailed(PostError),
}

impl PublishError {
    /// The underlying posting error.
    pub fn source_error(&self) -> &PostError {
        match self {
            Self::Failed(e) | Self::RetryFailed(e) => e,
        }
    }
}
