//! Bulletin publishing for the earthquake relay.
//!
//! [`Publisher`] sits between the formatter and the posting endpoint. It
//! truncates bulletins to the platform limit and retries exactly once when
//! the endpoint signals a rate limit.
//!
//! # Example
//!
//! ```no_run
//! use bulletin::Bulletin;
//! use publisher::{OAuth1Credentials, Publisher, XClient, XConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let credentials = OAuth1Credentials::new("api-key", "api-secret", "token", "token-secret");
//! let client = XClient::new(XConfig::new(credentials))?;
//! let publisher = Publisher::new(client);
//!
//! publisher.publish(&Bulletin::new("津波警報等は解除されました。")).await?;
//! # Ok(())
//! # }
//! ```

mod client;
mod error;
mod oauth;

use std::borrow::Cow;
use std::sync::Arc;
use std::time::Duration;

use bulletin::Bulletin;
use tracing::{error, info, warn};

pub use client::{retry_after, LoggingClient, PostReceipt, PostingClient, XClient, XConfig};
pub use error::{PostError, PublishError};
pub use oauth::OAuth1Credentials;

/// Characters kept when a bulletin is too long.
pub const MAX_CHARS: usize = 139;

/// Marker appended to truncated bulletins.
pub const ELLIPSIS: char = '…';

/// Cooldown used when a rate-limited response advertises none.
pub const DEFAULT_RETRY_AFTER: Duration = Duration::from_secs(60);

/// Longest cooldown honoured before the single retry. Daily limits advertise
/// resets hours away; an alert that late is stale.
pub const MAX_RETRY_AFTER: Duration = Duration::from_secs(15 * 60);

/// A bulletin that reached the endpoint.
#[derive(Debug, Clone)]
pub struct Posted {
    /// Text as transmitted (after truncation).
    pub text: String,
    /// Endpoint acknowledgement.
    pub receipt: PostReceipt,
    /// Number of underlying post calls (1, or 2 after a rate limit).
    pub attempts: u32,
}

/// Truncate to [`MAX_CHARS`] characters plus [`ELLIPSIS`].
///
/// Text at or under the limit is returned unchanged.
pub fn truncate(text: &str) -> Cow<'_, str> {
    match text.char_indices().nth(MAX_CHARS) {
        Some((cut, _)) => {
            let mut out = String::with_capacity(cut + ELLIPSIS.len_utf8());
            out.push_str(&text[..cut]);
            out.push(ELLIPSIS);
            Cow::Owned(out)
        }
        None => Cow::Borrowed(text),
    }
}

/// Posts bulletins through a [`PostingClient`].
#[derive(Clone)]
pub struct Publisher {
    client: Arc<dyn PostingClient>,
    default_retry_after: Duration,
    max_retry_after: Duration,
}

impl Publisher {
    /// Create a publisher around a posting client.
    pub fn new(client: impl PostingClient + 'static) -> Self {
        Self::from_arc(Arc::new(client))
    }

    /// Create a publisher around a shared posting client.
    pub fn from_arc(client: Arc<dyn PostingClient>) -> Self {
        Self {
            client,
            default_retry_after: DEFAULT_RETRY_AFTER,
            max_retry_after: MAX_RETRY_AFTER,
        }
    }

    /// Override the cooldown used when none is advertised.
    pub fn with_default_retry_after(mut self, delay: Duration) -> Self {
        self.default_retry_after = delay;
        self
    }

    /// Override the cap applied to advertised cooldowns.
    pub fn with_max_retry_after(mut self, delay: Duration) -> Self {
        self.max_retry_after = delay;
        self
    }

    /// Get the underlying client.
    pub fn client(&self) -> &dyn PostingClient {
        self.client.as_ref()
    }

    /// Truncate and post a bulletin, retrying once after a rate limit.
    pub async fn publish(&self, bulletin: &Bulletin) -> Result<Posted, PublishError> {
        let text = truncate(bulletin.as_str()).into_owned();
        let client = self.client.name();

        match self.client.post(&text).await {
            Ok(receipt) => {
                info!(client = %client, id = ?receipt.id, "Bulletin posted");
                Ok(Posted {
                    text,
                    receipt,
                    attempts: 1,
                })
            }
            Err(PostError::RateLimited { retry_after }) => {
                let wait = retry_after
                    .unwrap_or(self.default_retry_after)
                    .min(self.max_retry_after);
                warn!(
                    client = %client,
                    wait_secs = wait.as_secs(),
                    "Rate limited, retrying once after cooldown"
                );
                tokio::time::sleep(wait).await;

                match self.client.post(&text).await {
                    Ok(receipt) => {
                        info!(client = %client, id = ?receipt.id, "Bulletin posted on retry");
                        Ok(Posted {
                            text,
                            receipt,
                            attempts: 2,
                        })
                    }
                    Err(e) => {
                        error!(client = %client, error = %e, "Retry failed, dropping bulletin");
                        Err(PublishError::RetryFailed(e))
                    }
                }
            }
            Err(e) => {
                error!(client = %client, error = %e, "Post failed, dropping bulletin");
                Err(PublishError::Failed(e))
            }
        }
    }
}

impl std::fmt::Debug for Publisher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Publisher")
            .field("client", &self.client.name())
            .field("default_retry_after", &self.default_retry_after)
            .field("max_retry_after", &self.max_retry_after)
            .finish()
    }
}

/// Crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
