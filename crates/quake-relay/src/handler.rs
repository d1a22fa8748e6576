//! Feed handler that turns routed messages into posted bulletins.

use async_trait::async_trait;
use bulletin::Bulletin;
use publisher::{Posted, PublishError, Publisher};
use quake_feed::FeedHandler;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::router::{Route, RouteDecision, RouteError};

/// Result of handling one message.
#[derive(Debug)]
pub enum HandleOutcome {
    /// A bulletin reached the endpoint.
    Published(Posted),
    /// The message produced no bulletin.
    Ignored { reason: String },
    /// The message was structurally unusable.
    Rejected(RouteError),
    /// Posting failed; the bulletin is dropped.
    Failed(PublishError),
}

/// Routes messages of one feed and publishes the resulting bulletins.
///
/// Routing happens in arrival order on the feed's task. Publishing runs on a
/// task per bulletin, so a rate-limit cooldown never stops the feed from
/// reading. Failures are logged and never escape.
#[derive(Debug, Clone)]
pub struct RelayHandler {
    feed: String,
    publisher: Publisher,
}

impl RelayHandler {
    pub fn new(feed: impl Into<String>, publisher: Publisher) -> Self {
        Self {
            feed: feed.into(),
            publisher,
        }
    }

    pub fn feed(&self) -> &str {
        &self.feed
    }

    /// Route and publish a single message, waiting for the outcome.
    pub async fn process<M: Route>(&self, message: &M) -> HandleOutcome {
        match self.route(message) {
            Ok(bulletin) => self.publish(bulletin).await,
            Err(outcome) => outcome,
        }
    }

    /// Publish on a background task.
    pub fn publish_in_background(&self, bulletin: Bulletin) -> JoinHandle<HandleOutcome> {
        let handler = self.clone();
        tokio::spawn(async move { handler.publish(bulletin).await })
    }

    fn route<M: Route>(&self, message: &M) -> Result<Bulletin, HandleOutcome> {
        match message.route() {
            Ok(RouteDecision::Publish(bulletin)) => Ok(bulletin),
            Ok(RouteDecision::Ignore { reason }) => {
                debug!(feed = %self.feed, reason = %reason, "Ignored feed message");
                Err(HandleOutcome::Ignored { reason })
            }
            Err(e) => {
                warn!(feed = %self.feed, error = %e, "Rejected feed message");
                Err(HandleOutcome::Rejected(e))
            }
        }
    }

    async fn publish(&self, bulletin: Bulletin) -> HandleOutcome {
        info!(feed = %self.feed, chars = bulletin.char_len(), "Publishing bulletin");
        match self.publisher.publish(&bulletin).await {
            Ok(posted) => HandleOutcome::Published(posted),
            Err(e) => HandleOutcome::Failed(e),
        }
    }
}

#[async_trait]
impl<M> FeedHandler<M> for RelayHandler
where
    M: Route + Send + Sync + 'static,
{
    async fn handle(&self, message: M) {
        if let Ok(bulletin) = self.route(&message) {
            let _ = self.publish_in_background(bulletin);
        }
    }
}
