//! Runs every configured feed as an independent task.

use std::future::Future;

use futures::stream::{FuturesUnordered, StreamExt};
use publisher::Publisher;
use quake_feed::{Connector, EewMessage, FeedConfig, FeedConnection, FeedHandler, P2pQuakeMessage};
use serde::de::DeserializeOwned;
use tokio::task::{AbortHandle, JoinHandle};
use tracing::{error, info, warn};

use crate::config::{EEW_FEED, P2PQUAKE_FEED};
use crate::handler::RelayHandler;

/// Owns the feed tasks. Each feed reconnects on its own; a failing feed
/// never blocks another.
#[derive(Debug, Default)]
pub struct Supervisor {
    tasks: Vec<(String, JoinHandle<()>)>,
}

impl Supervisor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawn the relay for each known feed, sharing one connector and
    /// publisher. Unknown feed names are skipped.
    pub fn for_feeds<C>(feeds: Vec<FeedConfig>, connector: C, publisher: &Publisher) -> Self
    where
        C: Connector + Clone + 'static,
    {
        let mut supervisor = Self::new();
        for feed in feeds {
            let handler = RelayHandler::new(feed.name.clone(), publisher.clone());
            match feed.name.as_str() {
                P2PQUAKE_FEED => supervisor.spawn(FeedConnection::<P2pQuakeMessage, _, _>::new(
                    feed,
                    connector.clone(),
                    handler,
                )),
                EEW_FEED => supervisor.spawn(FeedConnection::<EewMessage, _, _>::new(
                    feed,
                    connector.clone(),
                    handler,
                )),
                other => warn!(feed = %other, "Unknown feed, not starting"),
            }
        }
        supervisor
    }

    /// Start a connection on its own task.
    pub fn spawn<M, C, H>(&mut self, connection: FeedConnection<M, C, H>)
    where
        M: DeserializeOwned + Send + 'static,
        C: Connector + 'static,
        H: FeedHandler<M> + 'static,
    {
        let name = connection.name().to_string();
        info!(feed = %name, "Starting feed");
        self.tasks.push((name, tokio::spawn(connection.run())));
    }

    /// Names of the running feeds, in start order.
    pub fn feeds(&self) -> Vec<&str> {
        self.tasks.iter().map(|(name, _)| name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Wait until `shutdown` completes, then abort every feed.
    ///
    /// Returns early if all feed tasks end on their own, which only happens
    /// when they panic.
    pub async fn run_until<S>(self, shutdown: S)
    where
        S: Future<Output = ()> + Send,
    {
        let aborts: Vec<AbortHandle> = self.tasks.iter().map(|(_, t)| t.abort_handle()).collect();
        let mut running: FuturesUnordered<_> = self
            .tasks
            .into_iter()
            .map(|(name, task)| async move { (name, task.await) })
            .collect();

        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                biased;

                () = &mut shutdown => {
                    info!(feeds = aborts.len(), "Shutdown signal received, stopping feeds");
                    for task in &aborts {
                        task.abort();
                    }
                    return;
                }

                next = running.next() => match next {
                    Some((name, Ok(()))) => error!(feed = %name, "Feed task ended"),
                    Some((name, Err(e))) => error!(feed = %name, error = %e, "Feed task failed"),
                    None => {
                        warn!("No feed tasks left running");
                        return;
                    }
                },
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use publisher::LoggingClient;
    use quake_feed::{FeedError, FrameStream, ReconnectConfig};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    #[derive(Clone, Default)]
    struct Refusing {
        attempts: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl Connector for Refusing {
        async fn connect(&self, _url: &str) -> Result<FrameStream, FeedError> {
            self.attempts.fetch_add(1, Ordering::SeqCst);
            Err(FeedError::Connection("refused".to_string()))
        }
    }

    fn feed(name: &str) -> FeedConfig {
        FeedConfig::new(name, "wss://feed.invalid/ws")
            .with_reconnect(ReconnectConfig::fixed(Duration::from_millis(100)))
    }

    #[tokio::test(start_paused = true)]
    async fn test_spawns_known_feeds_only() {
        let connector = Refusing::default();
        let publisher = Publisher::new(LoggingClient);
        let supervisor = Supervisor::for_feeds(
            vec![feed(P2PQUAKE_FEED), feed("bogus"), feed(EEW_FEED)],
            connector.clone(),
            &publisher,
        );
        assert_eq!(supervisor.feeds(), vec![P2PQUAKE_FEED, EEW_FEED]);

        supervisor
            .run_until(tokio::time::sleep(Duration::from_millis(250)))
            .await;

        // Two feeds, each attempting at 0, 100 and 200 ms.
        assert_eq!(connector.attempts.load(Ordering::SeqCst), 6);
    }

    #[tokio::test]
    async fn test_empty_supervisor_returns() {
        let supervisor = Supervisor::new();
        assert!(supervisor.is_empty());
        supervisor.run_until(std::future::pending()).await;
    }
}
