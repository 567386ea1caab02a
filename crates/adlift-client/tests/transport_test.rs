//! Submission behavior: headers, 401 broadcast, error detail extraction.

mod helpers;

use serde_json::json;

use adlift_client::transport::{submit, TransportOutcome};
use adlift_client::{upload_with_progress, Auth, UploadClient, UploadOptions};
use helpers::{fixture_file, spawn_mock};

#[tokio::test]
async fn bearer_token_and_anti_forgery_header_are_attached() {
    let mock = spawn_mock(
        200,
        json!({"status": "accepted", "job_id": "job-1", "message": "Queued"}),
        vec![],
    )
    .await;
    let client = UploadClient::new(&mock.url, Auth::Bearer("tok-123".to_string())).unwrap();
    let (_dir, path) = fixture_file(b"some bytes");

    let outcome = submit(&client, &path, "abc123", None).await.unwrap();
    assert!(matches!(outcome, TransportOutcome::Accepted { .. }));

    assert_eq!(
        mock.state.last_authorization.lock().unwrap().as_deref(),
        Some("Bearer tok-123")
    );
    assert_eq!(
        mock.state.last_requested_with.lock().unwrap().as_deref(),
        Some("XMLHttpRequest")
    );
}

#[tokio::test]
async fn anonymous_client_sends_no_authorization_header() {
    let mock = spawn_mock(
        200,
        json!({"status": "accepted", "job_id": "job-2", "message": "Queued"}),
        vec![],
    )
    .await;
    let client = UploadClient::new(&mock.url, Auth::None).unwrap();
    let (_dir, path) = fixture_file(b"anon bytes");

    submit(&client, &path, "abc123", None).await.unwrap();
    assert!(mock.state.last_authorization.lock().unwrap().is_none());
}

#[tokio::test]
async fn unauthorized_broadcasts_exactly_one_signal_and_returns_error_result() {
    let mock = spawn_mock(401, json!({"error": "token expired"}), vec![]).await;
    let client = UploadClient::new(&mock.url, Auth::Bearer("stale".to_string())).unwrap();
    let mut session_rx = client.subscribe_session_expired();
    let (_dir, path) = fixture_file(b"bytes");

    let result =
        upload_with_progress(&client, &path, &UploadOptions::default(), |_| {}).await;
    assert!(result.is_error());

    // Exactly one signal fired.
    assert!(session_rx.try_recv().is_ok());
    assert!(session_rx.try_recv().is_err());
    assert_eq!(mock.status_hits(), 0);
}

#[tokio::test]
async fn unauthorized_is_not_a_generic_transport_error() {
    let mock = spawn_mock(401, json!({"error": "token expired"}), vec![]).await;
    let client = UploadClient::new(&mock.url, Auth::None).unwrap();
    let (_dir, path) = fixture_file(b"bytes");

    let err = submit(&client, &path, "abc", None).await.unwrap_err();
    assert!(matches!(err, adlift_client::UploadError::SessionExpired));
}

#[tokio::test]
async fn server_error_detail_is_extracted_from_body() {
    let mock = spawn_mock(
        422,
        json!({"error": "Sheet 'Q9' not found in workbook"}),
        vec![],
    )
    .await;
    let client = UploadClient::new(&mock.url, Auth::None).unwrap();
    let (_dir, path) = fixture_file(b"workbook");

    let err = submit(&client, &path, "abc", Some("Q9")).await.unwrap_err();
    match err {
        adlift_client::UploadError::Transport { status, detail } => {
            assert_eq!(status, Some(422));
            assert_eq!(detail, "Sheet 'Q9' not found in workbook");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn unreachable_server_is_a_transport_error_without_status() {
    // Port 1 is never listening.
    let client = UploadClient::new("http://127.0.0.1:1", Auth::None).unwrap();
    let (_dir, path) = fixture_file(b"bytes");

    let err = submit(&client, &path, "abc", None).await.unwrap_err();
    assert!(matches!(
        err,
        adlift_client::UploadError::Transport { status: None, .. }
    ));
}

#[tokio::test]
async fn unclassifiable_success_body_is_rejected() {
    let mock = spawn_mock(200, json!({"unexpected": "shape"}), vec![]).await;
    let client = UploadClient::new(&mock.url, Auth::None).unwrap();
    let (_dir, path) = fixture_file(b"bytes");

    let err = submit(&client, &path, "abc", None).await.unwrap_err();
    assert!(matches!(err, adlift_client::UploadError::InvalidResponse(_)));
}
