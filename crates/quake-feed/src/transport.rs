//! Transport abstraction for feed connections.

use async_trait::async_trait;
use futures::future;
use futures::stream::{BoxStream, Stream, StreamExt};
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::{self, Message};
use tracing::{debug, info};

use crate::error::FeedError;

/// A stream of text frames from one live connection.
///
/// The stream ends when the peer closes the connection. An `Err` item is
/// terminal for the session.
pub type FrameStream = BoxStream<'static, Result<String, FeedError>>;

/// Opens connections to an upstream feed.
#[async_trait]
pub trait Connector: Send + Sync {
    /// Open a new connection and return its frames.
    async fn connect(&self, url: &str) -> Result<FrameStream, FeedError>;
}

/// WebSocket connector backed by tokio-tungstenite.
#[derive(Debug, Clone, Copy, Default)]
pub struct WsConnector;

#[async_trait]
impl Connector for WsConnector {
    async fn connect(&self, url: &str) -> Result<FrameStream, FeedError> {
        let (ws_stream, response) = connect_async(url).await?;
        debug!(status = %response.status(), "WebSocket handshake complete");
        Ok(text_frames(ws_stream).boxed())
    }
}

/// Reduce raw WebSocket messages to text frames.
///
/// Ping/pong frames are dropped (tungstenite answers pings while reading),
/// binary frames are kept when they are valid UTF-8, and a close frame ends
/// the stream.
pub fn text_frames<S>(messages: S) -> impl Stream<Item = Result<String, FeedError>> + Send
where
    S: Stream<Item = Result<Message, tungstenite::Error>> + Send,
{
    messages
        .take_while(|msg| {
            let open = !matches!(msg, Ok(Message::Close(_)));
            if !open {
                info!("WebSocket closed by server");
            }
            future::ready(open)
        })
        .filter_map(|msg| {
            future::ready(match msg {
                Ok(Message::Text(text)) => Some(Ok(text.to_string())),
                Ok(Message::Binary(data)) => Some(
                    String::from_utf8(data.to_vec())
                        .map_err(|e| FeedError::UnsupportedFrame(e.to_string())),
                ),
                Ok(_) => None,
                Err(e) => Some(Err(FeedError::from(e))),
            })
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::stream;

    #[tokio::test]
    async fn test_text_frames_stop_at_close() {
        let raw = vec![
            Ok(Message::Ping(vec![1].into())),
            Ok(Message::Text("a".into())),
            Ok(Message::Binary(b"b".to_vec().into())),
            Ok(Message::Close(None)),
            Ok(Message::Text("after close".into())),
        ];
        let frames: Vec<_> = text_frames(stream::iter(raw)).collect().await;
        let texts: Vec<String> = frames.into_iter().map(|f| f.unwrap()).collect();
        assert_eq!(texts, vec!["a".to_string(), "b".to_string()]);
    }

    #[tokio::test]
    async fn test_text_frames_surface_errors() {
        let raw = vec![
            Ok(Message::Binary(vec![0xff, 0xfe].into())),
            Err(tungstenite::Error::ConnectionClosed),
        ];
        let frames: Vec<_> = text_frames(stream::iter(raw)).collect().await;
        assert!(matches!(frames[0], Err(FeedError::UnsupportedFrame(_))));
        assert!(matches!(frames[1], Err(FeedError::WebSocket(_))));
    }
}
