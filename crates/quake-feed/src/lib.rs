//! Reconnecting consumers for push-based earthquake alert feeds.
//!
//! This crate owns the transport side of the relay:
//!
//! - [`FeedConnection`] keeps one WebSocket connection alive forever,
//!   reconnecting after a fixed delay whenever it closes or fails
//! - frames are decoded with `serde_json` into the feed's wire type and
//!   handed to a [`FeedHandler`]; malformed frames are logged and dropped
//! - [`P2pQuakeMessage`] and [`EewMessage`] model the two supported feeds
//!
//! # Example
//!
//! ```no_run
//! use quake_feed::{FeedConfig, FeedConnection, FeedHandler, P2pQuakeMessage, WsConnector};
//!
//! struct Print;
//!
//! #[quake_feed::async_trait]
//! impl FeedHandler<P2pQuakeMessage> for Print {
//!     async fn handle(&self, message: P2pQuakeMessage) {
//!         println!("code {}", message.code);
//!     }
//! }
//!
//! # async fn example() {
//! let config = FeedConfig::new("p2pquake", "wss://api.p2pquake.net/v2/ws");
//! let connection: FeedConnection<P2pQuakeMessage, _, _> =
//!     FeedConnection::new(config, WsConnector, Print);
//! connection.run().await;
//! # }
//! ```

pub mod config;
pub mod connection;
pub mod error;
pub mod transport;
pub mod types;

pub use config::{FeedConfig, ReconnectConfig, DEFAULT_RECONNECT_DELAY};
pub use connection::{CloseReason, ConnectionState, ConnectionStats, FeedConnection, FeedHandler};
pub use error::FeedError;
pub use transport::{text_frames, Connector, FrameStream, WsConnector};
pub use types::*;

// Re-export async_trait for handler implementations
pub use async_trait::async_trait;

/// Crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
