//! Configuration loaded from environment variables.

use std::env;
use std::net::SocketAddr;
use std::time::Duration;

use publisher::OAuth1Credentials;
use quake_feed::{FeedConfig, ReconnectConfig, DEFAULT_RECONNECT_DELAY};

/// Feed name used for the P2PQuake socket.
pub const P2PQUAKE_FEED: &str = "p2pquake";

/// Feed name used for the early warning socket.
pub const EEW_FEED: &str = "eew";

const DEFAULT_P2PQUAKE_URL: &str = "wss://api.p2pquake.net/v2/ws";
const DEFAULT_EEW_URL: &str = "wss://ws-api.wolfx.jp/jma_eew";
const DEFAULT_X_API_URL: &str = "https://api.twitter.com";
const DEFAULT_PORT: u16 = 3000;

/// OAuth 1.0a variables, all required to post.
const CREDENTIAL_VARS: [&str; 4] = ["X_API_KEY", "X_API_SECRET", "X_ACCESS_TOKEN", "X_ACCESS_SECRET"];

/// Relay configuration.
#[derive(Clone)]
pub struct RelayConfig {
    /// P2PQuake WebSocket URL; `None` disables the feed.
    pub p2pquake_url: Option<String>,
    /// Early warning WebSocket URL; `None` disables the feed.
    pub eew_url: Option<String>,
    /// Delay between a closed connection and the next attempt.
    pub reconnect_interval: Duration,
    /// Liveness server bind address.
    pub addr: SocketAddr,
    /// X API base URL.
    pub x_api_url: String,
    /// X OAuth 1.0a credentials; required unless `dry_run`.
    pub x_credentials: Option<OAuth1Credentials>,
    /// Log bulletins instead of posting them.
    pub dry_run: bool,
}

impl RelayConfig {
    /// Load configuration from environment variables.
    ///
    /// | Variable | Description | Default |
    /// |----------|-------------|---------|
    /// | `P2PQUAKE_WS_URL` | P2PQuake feed URL (empty disables) | `wss://api.p2pquake.net/v2/ws` |
    /// | `EEW_WS_URL` | Early warning feed URL (empty disables) | `wss://ws-api.wolfx.jp/jma_eew` |
    /// | `RECONNECT_INTERVAL_MS` | Reconnect delay | `5000` |
    /// | `PORT` | Liveness server port | `3000` |
    /// | `X_API_URL` | X API base URL | `https://api.twitter.com` |
    /// | `X_API_KEY` | X app consumer key | (required unless `DRY_RUN`) |
    /// | `X_API_SECRET` | X app consumer secret | (required unless `DRY_RUN`) |
    /// | `X_ACCESS_TOKEN` | X user access token | (required unless `DRY_RUN`) |
    /// | `X_ACCESS_SECRET` | X user access token secret | (required unless `DRY_RUN`) |
    /// | `DRY_RUN` | Log instead of posting | `false` |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let feed_url = |key: &str, default: &str| {
            let url = lookup(key).unwrap_or_else(|| default.to_string());
            let url = url.trim();
            if url.is_empty() {
                None
            } else {
                Some(url.to_string())
            }
        };

        let p2pquake_url = feed_url("P2PQUAKE_WS_URL", DEFAULT_P2PQUAKE_URL);
        let eew_url = feed_url("EEW_WS_URL", DEFAULT_EEW_URL);
        if p2pquake_url.is_none() && eew_url.is_none() {
            return Err(ConfigError::NoFeeds);
        }

        let reconnect_interval = match lookup("RECONNECT_INTERVAL_MS") {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|ms| *ms > 0)
                .map(Duration::from_millis)
                .ok_or(ConfigError::InvalidReconnectInterval)?,
            None => DEFAULT_RECONNECT_DELAY,
        };

        let port = match lookup("PORT") {
            Some(raw) => raw.trim().parse::<u16>().map_err(|_| ConfigError::InvalidPort)?,
            None => DEFAULT_PORT,
        };

        let x_api_url = lookup("X_API_URL").unwrap_or_else(|| DEFAULT_X_API_URL.to_string());

        let dry_run = lookup("DRY_RUN")
            .map(|v| matches!(v.trim().to_lowercase().as_str(), "true" | "1" | "yes"))
            .unwrap_or(false);

        let x_credentials = match CREDENTIAL_VARS
            .iter()
            .find(|var| lookup(var).map_or(true, |v| v.trim().is_empty()))
        {
            None => {
                let var = |key: &str| lookup(key).unwrap_or_default().trim().to_string();
                Some(OAuth1Credentials::new(
                    var("X_API_KEY"),
                    var("X_API_SECRET"),
                    var("X_ACCESS_TOKEN"),
                    var("X_ACCESS_SECRET"),
                ))
            }
            Some(_) if dry_run => None,
            Some(var) => return Err(ConfigError::MissingCredential(*var)),
        };

        let config = Self {
            p2pquake_url,
            eew_url,
            reconnect_interval,
            addr: SocketAddr::from(([0, 0, 0, 0], port)),
            x_api_url,
            x_credentials,
            dry_run,
        };
        for feed in config.feeds() {
            feed.validate().map_err(|_| ConfigError::InvalidFeedUrl {
                name: feed.name.clone(),
                url: feed.url.clone(),
            })?;
        }
        Ok(config)
    }

    /// Configured feeds, each with the shared reconnect policy.
    pub fn feeds(&self) -> Vec<FeedConfig> {
        let reconnect = ReconnectConfig::fixed(self.reconnect_interval);
        [
            (P2PQUAKE_FEED, self.p2pquake_url.as_ref()),
            (EEW_FEED, self.eew_url.as_ref()),
        ]
        .into_iter()
        .filter_map(|(name, url)| {
            url.map(|url| FeedConfig::new(name, url).with_reconnect(reconnect.clone()))
        })
        .collect()
    }
}

impl std::fmt::Debug for RelayConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RelayConfig")
            .field("p2pquake_url", &self.p2pquake_url)
            .field("eew_url", &self.eew_url)
            .field("reconnect_interval", &self.reconnect_interval)
            .field("addr", &self.addr)
            .field("x_api_url", &self.x_api_url)
            .field("x_credentials", &self.x_credentials)
            .field("dry_run", &self.dry_run)
            .finish()
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid PORT value")]
    InvalidPort,

    #[error("RECONNECT_INTERVAL_MS must be a positive integer")]
    InvalidReconnectInterval,

    #[error("{0} environment variable is required unless DRY_RUN is set")]
    MissingCredential(&'static str),

    #[error("Feed {name} has an invalid WebSocket URL: {url}")]
    InvalidFeedUrl { name: String, url: String },

    #[error("At least one of P2PQUAKE_WS_URL and EEW_WS_URL must be set")]
    NoFeeds,
}
