//! Liveness endpoint for the hosting platform.

use std::net::SocketAddr;

use axum::{routing::get, Json, Router};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tracing::{error, info};

/// Body returned for every path other than `/health`.
pub const LIVENESS_TEXT: &str = "WebSocket client is running.";

/// Build the liveness router.
pub fn router() -> Router {
    Router::new()
        .route("/health", get(health))
        .fallback(liveness)
}

async fn liveness() -> &'static str {
    LIVENESS_TEXT
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Serve the liveness router until the process exits.
pub async fn serve(addr: SocketAddr) -> std::io::Result<()> {
    let listener = TcpListener::bind(addr).await?;
    info!(addr = %addr, "Liveness server listening");
    axum::serve(listener, router()).await
}

/// Serve on a background task. A failure is logged and leaves the rest of
/// the process running.
pub fn spawn(addr: SocketAddr) -> JoinHandle<()> {
    tokio::spawn(async move {
        if let Err(e) = serve(addr).await {
            error!(addr = %addr, error = %e, "Liveness server failed, feeds keep running");
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    async fn get_path(method: &str, uri: &str) -> (StatusCode, String, Vec<u8>) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap();
        let response = router().oneshot(request).await.unwrap();

        let status = response.status();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        (status, content_type, body.to_vec())
    }

    #[tokio::test]
    async fn test_any_path_reports_running() {
        for (method, uri) in [("GET", "/"), ("GET", "/status/anything"), ("POST", "/")] {
            let (status, content_type, body) = get_path(method, uri).await;
            assert_eq!(status, StatusCode::OK, "{} {}", method, uri);
            assert!(content_type.starts_with("text/plain"));
            assert_eq!(body, LIVENESS_TEXT.as_bytes());
        }
    }

    #[tokio::test]
    async fn test_bind_failure_is_contained() {
        let taken = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = taken.local_addr().unwrap();

        // The task ends on its own instead of taking the process down.
        spawn(addr).await.unwrap();
    }

    #[tokio::test]
    async fn test_health_returns_json() {
        let (status, content_type, body) = get_path("GET", "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(content_type, "application/json");

        let value: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(value, json!({ "status": "ok" }));
    }
}
