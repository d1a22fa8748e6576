//! Error types for quake-feed.

use thiserror::Error;

/// Errors that can occur while consuming an upstream feed.
#[derive(Debug, Error)]
pub enum FeedError {
    /// WebSocket handshake or transport failure.
    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    /// Payload could not be decoded into the feed's message type.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Connection could not be established.
    #[error("Connection failed: {0}")]
    Connection(String),

    /// A frame arrived that cannot carry a JSON document.
    #[error("Unsupported frame: {0}")]
    UnsupportedFrame(String),

    /// Invalid configuration.
    #[error("Invalid configuration: {0}")]
    Config(String),
}
