//! Posting clients.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, AUTHORIZATION};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::PostError;
use crate::oauth::OAuth1Credentials;

/// Acknowledgement of a successful post.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostReceipt {
    /// Identifier assigned by the endpoint, when it returns one.
    pub id: Option<String>,
}

/// The outbound posting capability.
///
/// Implementations report throttling as [`PostError::RateLimited`]; every
/// other error is treated as final by the publisher.
#[async_trait]
pub trait PostingClient: Send + Sync {
    /// Post one text.
    async fn post(&self, text: &str) -> Result<PostReceipt, PostError>;

    /// Get a human-readable name for this client.
    fn name(&self) -> &str;
}

/// Configuration for [`XClient`].
#[derive(Clone)]
pub struct XConfig {
    /// API base URL (e.g., "https://api.twitter.com").
    pub api_url: String,
    /// OAuth 1.0a app and user credentials.
    pub credentials: OAuth1Credentials,
    /// Request timeout.
    pub timeout: Duration,
}

impl XConfig {
    pub fn new(credentials: OAuth1Credentials) -> Self {
        Self {
            api_url: "https://api.twitter.com".to_string(),
            credentials,
            timeout: Duration::from_secs(30),
        }
    }

    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    /// Get the create-post endpoint URL.
    pub fn tweets_url(&self) -> String {
        format!("{}/2/tweets", self.api_url.trim_end_matches('/'))
    }
}

impl std::fmt::Debug for XConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("XConfig")
            .field("api_url", &self.api_url)
            .field("credentials", &self.credentials)
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[derive(Debug, Serialize)]
struct CreatePostRequest<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct CreatePostResponse {
    data: Option<CreatedPost>,
}

#[derive(Debug, Deserialize)]
struct CreatedPost {
    id: String,
}

/// Client for the X API v2 create-post endpoint.
#[derive(Clone)]
pub struct XClient {
    http: Client,
    config: XConfig,
}

impl XClient {
    pub fn new(config: XConfig) -> Result<Self, PostError> {
        if let Some(missing) = config.credentials.missing() {
            return Err(PostError::Config(format!("{} is empty", missing)));
        }
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(PostError::Http)?;
        Ok(Self { http, config })
    }

    /// Get the configuration.
    pub fn config(&self) -> &XConfig {
        &self.config
    }
}

#[async_trait]
impl PostingClient for XClient {
    async fn post(&self, text: &str) -> Result<PostReceipt, PostError> {
        let url = self.config.tweets_url();
        debug!(url = %url, "Posting to X");

        let authorization = self.config.credentials.authorization(
            "POST",
            &url,
            &[],
            &uuid::Uuid::new_v4().simple().to_string(),
            chrono::Utc::now().timestamp(),
        );

        let response = self
            .http
            .post(&url)
            .header(AUTHORIZATION, authorization)
            .json(&CreatePostRequest { text })
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = retry_after(response.headers(), chrono::Utc::now().timestamp());
            return Err(PostError::RateLimited { retry_after });
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PostError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        let created: CreatePostResponse = response.json().await?;
        Ok(PostReceipt {
            id: created.data.map(|post| post.id),
        })
    }

    fn name(&self) -> &str {
        "x"
    }
}

impl std::fmt::Debug for XClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("XClient")
            .field("config", &self.config)
            .finish()
    }
}

/// Cooldown advertised by a throttled response.
///
/// `retry-after` (seconds) wins; otherwise `x-rate-limit-reset` (epoch
/// seconds) is compared against `now`.
pub fn retry_after(headers: &HeaderMap, now: i64) -> Option<Duration> {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<i64>().ok())
    };

    if let Some(secs) = header("retry-after") {
        return Some(Duration::from_secs(secs.max(0) as u64));
    }
    header("x-rate-limit-reset").map(|reset| Duration::from_secs((reset - now).max(0) as u64))
}

/// A client that only logs; used for dry runs.
#[derive(Debug, Clone, Default)]
pub struct LoggingClient;

#[async_trait]
impl PostingClient for LoggingClient {
    async fn post(&self, text: &str) -> Result<PostReceipt, PostError> {
        info!(chars = text.chars().count(), "[dry-run] Would post:\n{}", text);
        Ok(PostReceipt::default())
    }

    fn name(&self) -> &str {
        "logging"
    }
}
