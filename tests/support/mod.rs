use axum::body::Body;
use axum::http::StatusCode;
use axum::response::Response;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Initialize tracing for tests with proper test output handling
pub fn tracing_init() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

/// A loopback server speaking the download protocol: `/health` answers ok,
/// `/download` replays a fixed body and counts how often it was hit.
pub struct FakeServer {
    pub base_url: String,
    pub download_hits: Arc<AtomicUsize>,
}

impl FakeServer {
    /// Serve a well-formed download response: one JSON metadata line
    /// followed by the raw payload.
    pub async fn with_track(metadata_line: &str, payload: &[u8]) -> Self {
        let mut body = metadata_line.as_bytes().to_vec();
        body.push(b'\n');
        body.extend_from_slice(payload);
        Self::with_raw_response(StatusCode::OK, body).await
    }

    /// Serve an arbitrary response body and status from `/download`.
    pub async fn with_raw_response(status: StatusCode, body: Vec<u8>) -> Self {
        let download_hits = Arc::new(AtomicUsize::new(0));
        let body = Arc::new(body);

        let handler_hits = download_hits.clone();
        let app = Router::new()
            .route("/health", get(|| async { Json(json!({"status": "ok"})) }))
            .route(
                "/download",
                post(move || {
                    let body = body.clone();
                    let hits = handler_hits.clone();
                    async move {
                        hits.fetch_add(1, Ordering::SeqCst);
                        Response::builder()
                            .status(status)
                            .body(Body::from(body.as_ref().clone()))
                            .unwrap()
                    }
                }),
            );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        FakeServer {
            base_url: format!("http://{}", addr),
            download_hits,
        }
    }

    /// Serve a `/health` endpoint that answers 2xx but not `"ok"`.
    pub async fn with_bad_health() -> Self {
        let app = Router::new().route(
            "/health",
            get(|| async { Json(json!({"status": "degraded"})) }),
        );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        FakeServer {
            base_url: format!("http://{}", addr),
            download_hits: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn download_count(&self) -> usize {
        self.download_hits.load(Ordering::SeqCst)
    }
}
