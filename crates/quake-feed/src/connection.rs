//! Persistent, self-reconnecting feed connection.

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures::StreamExt;
use serde::de::DeserializeOwned;
use tracing::{debug, error, info, warn};

use crate::config::FeedConfig;
use crate::error::FeedError;
use crate::transport::Connector;

/// Lifecycle state of a [`FeedConnection`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// No connection; a reconnect is pending or about to start.
    Disconnected,
    /// Handshake in progress.
    Connecting,
    /// Receiving frames.
    Connected,
}

/// Why a session ended.
#[derive(Debug)]
pub enum CloseReason {
    /// The peer closed the connection or the stream ended.
    Closed,
    /// The transport failed mid-session.
    Error(FeedError),
    /// The connection could not be opened.
    ConnectFailed(FeedError),
}

impl fmt::Display for CloseReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Closed => write!(f, "closed"),
            Self::Error(e) => write!(f, "transport error: {}", e),
            Self::ConnectFailed(e) => write!(f, "connect failed: {}", e),
        }
    }
}

/// Counters for one connection, mostly useful in tests and logs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConnectionStats {
    /// Connection attempts started.
    pub sessions: u64,
    /// Reconnects scheduled after a session ended.
    pub reconnects: u64,
    /// Frames decoded and handed to the handler.
    pub messages: u64,
    /// Frames dropped because they failed to decode.
    pub dropped: u64,
}

/// Receives decoded messages and lifecycle notifications from a feed.
#[async_trait]
pub trait FeedHandler<M: Send + 'static>: Send + Sync {
    /// Handle one decoded message. Called in arrival order.
    async fn handle(&self, message: M);

    /// Called after a connection is established.
    async fn on_connected(&self, _feed: &str) {}

    /// Called after a session ended, before the reconnect delay.
    async fn on_closed(&self, _feed: &str, _reason: &CloseReason) {}
}

#[async_trait]
impl<M, T> FeedHandler<M> for Arc<T>
where
    M: Send + 'static,
    T: FeedHandler<M> + ?Sized,
{
    async fn handle(&self, message: M) {
        (**self).handle(message).await
    }

    async fn on_connected(&self, feed: &str) {
        (**self).on_connected(feed).await
    }

    async fn on_closed(&self, feed: &str, reason: &CloseReason) {
        (**self).on_closed(feed, reason).await
    }
}

/// One upstream feed: connects, decodes frames into `M`, and reconnects
/// forever.
pub struct FeedConnection<M, C, H> {
    config: FeedConfig,
    connector: C,
    handler: H,
    state: ConnectionState,
    attempt: u32,
    stats: ConnectionStats,
    _message: PhantomData<fn() -> M>,
}

impl<M, C, H> FeedConnection<M, C, H>
where
    M: DeserializeOwned + Send + 'static,
    C: Connector,
    H: FeedHandler<M>,
{
    /// Create a connection in the `Disconnected` state.
    pub fn new(config: FeedConfig, connector: C, handler: H) -> Self {
        Self {
            config,
            connector,
            handler,
            state: ConnectionState::Disconnected,
            attempt: 0,
            stats: ConnectionStats::default(),
            _message: PhantomData,
        }
    }

    /// Feed name from the configuration.
    pub fn name(&self) -> &str {
        &self.config.name
    }

    /// Current lifecycle state.
    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// Counters since creation.
    pub fn stats(&self) -> ConnectionStats {
        self.stats
    }

    /// Run forever: one session after another, separated by the reconnect
    /// delay.
    pub async fn run(mut self) {
        loop {
            let reason = self.run_session().await;
            let delay = self.schedule_reconnect(&reason);
            tokio::time::sleep(delay).await;
        }
    }

    /// Drive a single connect → receive → close cycle.
    pub async fn run_session(&mut self) -> CloseReason {
        self.state = ConnectionState::Connecting;
        self.stats.sessions += 1;
        info!(feed = %self.config.name, url = %self.config.url, "Connecting to feed");

        let mut frames = match self.connector.connect(&self.config.url).await {
            Ok(frames) => frames,
            Err(e) => {
                error!(feed = %self.config.name, error = %e, "Failed to connect to feed");
                return self.close(CloseReason::ConnectFailed(e)).await;
            }
        };

        self.state = ConnectionState::Connected;
        self.attempt = 0;
        info!(feed = %self.config.name, "Feed connection established");
        self.handler.on_connected(&self.config.name).await;

        let reason = loop {
            match frames.next().await {
                Some(Ok(text)) => self.dispatch(&text).await,
                Some(Err(e)) => {
                    error!(feed = %self.config.name, error = %e, "Feed transport error");
                    break CloseReason::Error(e);
                }
                None => break CloseReason::Closed,
            }
        };

        self.close(reason).await
    }

    async fn close(&mut self, reason: CloseReason) -> CloseReason {
        self.state = ConnectionState::Disconnected;
        self.handler.on_closed(&self.config.name, &reason).await;
        reason
    }

    /// Account for a finished session and return how long to wait.
    fn schedule_reconnect(&mut self, reason: &CloseReason) -> Duration {
        let delay = self.config.reconnect.delay_for_attempt(self.attempt);
        self.attempt = self.attempt.saturating_add(1);
        self.stats.reconnects += 1;
        warn!(
            feed = %self.config.name,
            reason = %reason,
            attempt = self.attempt,
            delay_ms = delay.as_millis() as u64,
            "Feed connection closed, reconnecting"
        );
        delay
    }

    async fn dispatch(&mut self, text: &str) {
        match serde_json::from_str::<M>(text) {
            Ok(message) => {
                self.stats.messages += 1;
                self.handler.handle(message).await;
            }
            Err(e) => {
                self.stats.dropped += 1;
                warn!(feed = %self.config.name, error = %e, "Dropping malformed payload");
                debug!(feed = %self.config.name, raw = %text, "Malformed payload");
            }
        }
    }
}

impl<M, C, H> fmt::Debug for FeedConnection<M, C, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FeedConnection")
            .field("config", &self.config)
            .field("state", &self.state)
            .field("stats", &self.stats)
            .finish()
    }
}
