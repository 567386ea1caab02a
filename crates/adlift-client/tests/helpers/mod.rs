//! Mock ingestion server for integration tests.
//!
//! Serves the two endpoints the client consumes: `POST /upload/stream` with
//! a scripted response, and `GET /upload/status/{job_id}` with a scripted
//! sequence of status bodies (the last entry repeats once the script runs
//! out). Request counters and captured headers let tests assert on traffic.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::body::to_bytes;
use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json};
use axum::routing::{get, post};
use axum::Router;
use serde_json::Value;

pub struct MockState {
    upload_status: u16,
    upload_body: Value,
    statuses: Mutex<Vec<Value>>,
    pub upload_hits: AtomicUsize,
    pub status_hits: AtomicUsize,
    pub last_authorization: Mutex<Option<String>>,
    pub last_requested_with: Mutex<Option<String>>,
}

pub struct MockIngest {
    pub url: String,
    pub state: Arc<MockState>,
}

impl MockIngest {
    pub fn upload_hits(&self) -> usize {
        self.state.upload_hits.load(Ordering::SeqCst)
    }

    pub fn status_hits(&self) -> usize {
        self.state.status_hits.load(Ordering::SeqCst)
    }
}

/// Spawn the mock on an ephemeral port.
pub async fn spawn_mock(upload_status: u16, upload_body: Value, statuses: Vec<Value>) -> MockIngest {
    let state = Arc::new(MockState {
        upload_status,
        upload_body,
        statuses: Mutex::new(statuses),
        upload_hits: AtomicUsize::new(0),
        status_hits: AtomicUsize::new(0),
        last_authorization: Mutex::new(None),
        last_requested_with: Mutex::new(None),
    });

    let app = Router::new()
        .route("/upload/stream", post(handle_upload))
        .route("/upload/status/{job_id}", get(handle_status))
        .with_state(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    MockIngest {
        url: format!("http://{}", addr),
        state,
    }
}

async fn handle_upload(State(state): State<Arc<MockState>>, request: Request) -> impl IntoResponse {
    state.upload_hits.fetch_add(1, Ordering::SeqCst);

    let headers = request.headers().clone();
    *state.last_authorization.lock().unwrap() = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(String::from);
    *state.last_requested_with.lock().unwrap() = headers
        .get("x-requested-with")
        .and_then(|v| v.to_str().ok())
        .map(String::from);

    // Drain the multipart body so the client finishes writing it.
    let _ = to_bytes(request.into_body(), usize::MAX).await;

    let status = StatusCode::from_u16(state.upload_status).unwrap();
    (status, Json(state.upload_body.clone()))
}

async fn handle_status(State(state): State<Arc<MockState>>) -> impl IntoResponse {
    state.status_hits.fetch_add(1, Ordering::SeqCst);

    let mut statuses = state.statuses.lock().unwrap();
    let body = if statuses.len() > 1 {
        statuses.remove(0)
    } else if let Some(last) = statuses.first() {
        last.clone()
    } else {
        return (StatusCode::NOT_FOUND, Json(serde_json::json!({"error": "No such job"})));
    };

    // A scripted {"http_status": N} entry forces a raw error response, for
    // exercising the fail-fast poll path.
    if let Some(code) = body.get("http_status").and_then(|v| v.as_u64()) {
        let status = StatusCode::from_u16(code as u16).unwrap();
        return (status, Json(serde_json::json!({"error": "status endpoint unavailable"})));
    }

    (StatusCode::OK, Json(body))
}

/// Write a small fixture file and return its path alongside the tempdir
/// keeping it alive.
pub fn fixture_file(contents: &[u8]) -> (tempfile::TempDir, std::path::PathBuf) {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("campaigns.csv");
    std::fs::write(&path, contents).unwrap();
    (dir, path)
}
