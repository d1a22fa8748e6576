//! Feed frames through routing, rendering and publishing.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use publisher::{PostError, PostReceipt, PostingClient, Publisher};
use quake_feed::{
    CloseReason, Connector, EewMessage, FeedConfig, FeedConnection, FeedError, FrameStream,
    P2pQuakeMessage,
};
use quake_relay::{RelayHandler, EEW_FEED, P2PQUAKE_FEED};
use serde_json::json;
use tokio::time::Instant;

/// Serves a single session made of the given frames.
struct OneSession {
    frames: Mutex<Option<Vec<String>>>,
}

impl OneSession {
    fn new(frames: Vec<serde_json::Value>) -> Self {
        Self {
            frames: Mutex::new(Some(frames.iter().map(|f| f.to_string()).collect())),
        }
    }

    fn raw(frames: Vec<&str>) -> Self {
        Self {
            frames: Mutex::new(Some(frames.into_iter().map(String::from).collect())),
        }
    }
}

#[async_trait]
impl Connector for OneSession {
    async fn connect(&self, _url: &str) -> Result<FrameStream, FeedError> {
        let frames = self
            .frames
            .lock()
            .unwrap()
            .take()
            .ok_or_else(|| FeedError::Connection("no more sessions".to_string()))?;
        Ok(stream::iter(frames.into_iter().map(Ok)).boxed())
    }
}

/// Records posted text. The first post starting with a throttled prefix is
/// rate limited once.
#[derive(Default)]
struct Outbox {
    throttled: Mutex<Option<(&'static str, Duration)>>,
    posted: Mutex<Vec<String>>,
}

impl Outbox {
    fn throttle_once(prefix: &'static str, retry_after: Duration) -> Self {
        Self {
            throttled: Mutex::new(Some((prefix, retry_after))),
            ..Default::default()
        }
    }

    fn posted(&self) -> Vec<String> {
        self.posted.lock().unwrap().clone()
    }
}

#[async_trait]
impl PostingClient for Outbox {
    async fn post(&self, text: &str) -> Result<PostReceipt, PostError> {
        let mut throttled = self.throttled.lock().unwrap();
        if let Some((_, retry_after)) = (*throttled).filter(|(prefix, _)| text.starts_with(prefix)) {
            *throttled = None;
            return Err(PostError::RateLimited {
                retry_after: Some(retry_after),
            });
        }
        drop(throttled);
        self.posted.lock().unwrap().push(text.to_string());
        Ok(PostReceipt::default())
    }

    fn name(&self) -> &str {
        "outbox"
    }
}

/// Let background publishes finish on the paused clock.
async fn settle() {
    tokio::time::sleep(Duration::from_secs(1)).await;
}

fn eew_frame(serial: u32, is_final: bool) -> serde_json::Value {
    json!({
        "Title": "緊急地震速報（予報）",
        "CodeType": "Ｍ、最大予測震度及び主要動到達予測時刻の緊急地震速報",
        "Serial": serial,
        "isFinal": is_final,
        "isCancel": false,
        "isAssumption": false,
        "OriginTime": "2024/03/15 00:14:05",
        "Hypocenter": "福島県沖",
        "Magunitude": 5.6,
        "Depth": 50,
        "MaxIntensity": "4"
    })
}

#[tokio::test(start_paused = true)]
async fn test_eew_publishes_first_and_final_reports() {
    let outbox = Arc::new(Outbox::default());
    let connector = OneSession::new(vec![
        eew_frame(1, false),
        eew_frame(2, false),
        eew_frame(3, false),
        eew_frame(4, true),
    ]);
    let handler = RelayHandler::new(EEW_FEED, Publisher::from_arc(outbox.clone()));
    let mut connection: FeedConnection<EewMessage, _, _> =
        FeedConnection::new(FeedConfig::new(EEW_FEED, "wss://eew.invalid"), connector, handler);

    let reason = connection.run_session().await;
    assert!(matches!(reason, CloseReason::Closed));
    assert_eq!(connection.stats().messages, 4);
    settle().await;

    let posted = outbox.posted();
    assert_eq!(posted.len(), 2);
    assert!(posted[0].starts_with("[緊急地震速報 第1報]"));
    assert!(posted[1].starts_with("[緊急地震速報 第4報]"));
    assert!(posted[1].ends_with("[最終報]"));
}

#[tokio::test(start_paused = true)]
async fn test_p2pquake_filters_and_formats() {
    let outbox = Arc::new(Outbox::default());
    let connector = OneSession::raw(vec![
        r#"{"code": 551}"#,
        r#"{"code": 555, "areas": []}"#,
        r#"{"code": 551, "earthquake": "#,
        r#"{"code": 552, "cancelled": true, "areas": []}"#,
        r#"{"code": 551,
            "earthquake": {"time": "2024/01/01 16:10:00",
                           "hypocenter": {"name": "石川県能登地方", "magnitude": 7.6, "depth": 10},
                           "maxScale": 70, "domesticTsunami": "Warning"},
            "issue": {"type": "DetailScale"},
            "points": [{"pref": "石川県", "addr": "志賀町香能", "scale": 70},
                       {"pref": "石川県", "addr": "輪島市門前町走出", "scale": 60}]}"#,
    ]);
    let handler = RelayHandler::new(P2PQUAKE_FEED, Publisher::from_arc(outbox.clone()));
    let mut connection: FeedConnection<P2pQuakeMessage, _, _> = FeedConnection::new(
        FeedConfig::new(P2PQUAKE_FEED, "wss://p2p.invalid"),
        connector,
        handler,
    );

    connection.run_session().await;
    assert_eq!(connection.stats().messages, 4);
    assert_eq!(connection.stats().dropped, 1);
    settle().await;

    let posted = outbox.posted();
    assert_eq!(posted.len(), 2);
    assert_eq!(posted[0], "津波警報等は解除されました。");
    assert!(posted[1].starts_with("01/01 16:10\n震源:石川県能登地方\n最大震度:7\nM7.6 深さ:約10km\n"));
    assert!(posted[1].contains("\n震度7: 石川県(志賀町) "));
    assert!(posted[1].ends_with("\n震度6強: 石川県(輪島市)"));
}

const CANCELLED: &str = "津波警報等は解除されました。";

#[tokio::test(start_paused = true)]
async fn test_rate_limited_bulletin_is_posted_after_cooldown() {
    let outbox = Arc::new(Outbox::throttle_once(CANCELLED, Duration::from_secs(60)));
    let connector = OneSession::raw(vec![r#"{"code": 552, "cancelled": true}"#]);
    let handler = RelayHandler::new(P2PQUAKE_FEED, Publisher::from_arc(outbox.clone()));
    let mut connection: FeedConnection<P2pQuakeMessage, _, _> = FeedConnection::new(
        FeedConfig::new(P2PQUAKE_FEED, "wss://p2p.invalid"),
        connector,
        handler,
    );

    let start = Instant::now();
    connection.run_session().await;
    assert!(start.elapsed() < Duration::from_secs(1));

    tokio::time::sleep(Duration::from_secs(59)).await;
    assert!(outbox.posted().is_empty());

    tokio::time::sleep(Duration::from_secs(2)).await;
    assert_eq!(outbox.posted(), vec![CANCELLED.to_string()]);
}

#[tokio::test(start_paused = true)]
async fn test_cooldown_does_not_delay_later_alerts() {
    let outbox = Arc::new(Outbox::throttle_once(CANCELLED, Duration::from_secs(900)));
    let connector = OneSession::raw(vec![
        r#"{"code": 552, "cancelled": true}"#,
        r#"{"code": 552, "cancelled": false,
            "areas": [{"name": "岩手県", "grade": "MajorWarning",
                       "maxHeight": {"description": "１０ｍ超"}}]}"#,
    ]);
    let handler = RelayHandler::new(P2PQUAKE_FEED, Publisher::from_arc(outbox.clone()));
    let mut connection: FeedConnection<P2pQuakeMessage, _, _> = FeedConnection::new(
        FeedConfig::new(P2PQUAKE_FEED, "wss://p2p.invalid"),
        connector,
        handler,
    );

    connection.run_session().await;
    assert_eq!(connection.stats().messages, 2);

    tokio::time::sleep(Duration::from_secs(10)).await;
    let posted = outbox.posted();
    assert_eq!(posted.len(), 1);
    assert!(posted[0].contains("岩手県(１０ｍ超)"));

    tokio::time::sleep(Duration::from_secs(900)).await;
    let posted = outbox.posted();
    assert_eq!(posted.len(), 2);
    assert_eq!(posted[1], CANCELLED);
}
