//! Configuration types for quake-feed.

use std::time::Duration;

use crate::error::FeedError;

/// Default delay between a closed connection and the next attempt.
pub const DEFAULT_RECONNECT_DELAY: Duration = Duration::from_millis(5000);

/// Configuration for a single upstream feed.
#[derive(Debug, Clone)]
pub struct FeedConfig {
    /// Short name used in log lines (e.g. "p2pquake").
    pub name: String,
    /// WebSocket URL of the feed (e.g. "wss://api.p2pquake.net/v2/ws").
    pub url: String,
    /// Reconnection policy.
    pub reconnect: ReconnectConfig,
}

impl FeedConfig {
    /// Create a new configuration with the default reconnect policy.
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            reconnect: ReconnectConfig::default(),
        }
    }

    /// Replace the reconnect policy.
    pub fn with_reconnect(mut self, reconnect: ReconnectConfig) -> Self {
        self.reconnect = reconnect;
        self
    }

    /// Check that the URL is a WebSocket URL.
    pub fn validate(&self) -> Result<(), FeedError> {
        if self.url.starts_with("ws://") || self.url.starts_with("wss://") {
            Ok(())
        } else {
            Err(FeedError::Config(format!(
                "feed {} has non-WebSocket url {:?}",
                self.name, self.url
            )))
        }
    }
}

/// Configuration for automatic reconnection.
///
/// Reconnection never gives up. The default is a fixed interval; a
/// multiplier above 1.0 turns it into capped exponential backoff.
#[derive(Debug, Clone)]
pub struct ReconnectConfig {
    /// Delay before the first retry.
    pub initial_delay: Duration,
    /// Maximum delay between retries.
    pub max_delay: Duration,
    /// Backoff multiplier for each retry.
    pub backoff_multiplier: f64,
}

impl Default for ReconnectConfig {
    fn default() -> Self {
        Self::fixed(DEFAULT_RECONNECT_DELAY)
    }
}

impl ReconnectConfig {
    /// Retry at a constant interval.
    pub fn fixed(delay: Duration) -> Self {
        Self {
            initial_delay: delay,
            max_delay: delay,
            backoff_multiplier: 1.0,
        }
    }

    /// Retry with capped exponential backoff.
    pub fn exponential(initial_delay: Duration, max_delay: Duration, multiplier: f64) -> Self {
        Self {
            initial_delay,
            max_delay,
            backoff_multiplier: multiplier.max(1.0),
        }
    }

    /// Calculate delay for a given attempt number (0-based).
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let delay_ms = self.initial_delay.as_millis() as f64
            * self.backoff_multiplier.powi(attempt.min(64) as i32);
        let delay = Duration::from_millis(delay_ms.min(u64::MAX as f64) as u64);
        delay.min(self.max_delay)
    }
}
