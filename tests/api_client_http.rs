use reqwest::StatusCode;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use content_dash::api::{ApiClient, ApiError, DashboardApi, SubmissionPatch};
use content_dash::model::SubmissionStatus;

/// Serve one canned HTTP response on a loopback port. The handle yields the
/// raw request that was received.
async fn serve_once(response: String) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base_url = format!("http://{}/", listener.local_addr().unwrap());
    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut raw = Vec::new();
        let mut buf = [0u8; 1024];
        loop {
            let n = socket.read(&mut buf).await.unwrap();
            if n == 0 {
                break;
            }
            raw.extend_from_slice(&buf[..n]);
            if request_complete(&raw) {
                break;
            }
        }
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.unwrap();
        String::from_utf8_lossy(&raw).into_owned()
    });
    (base_url, handle)
}

/// Headers are in and the body has reached its declared length.
fn request_complete(raw: &[u8]) -> bool {
    let text = String::from_utf8_lossy(raw);
    let Some(end) = text.find("\r\n\r\n") else {
        return false;
    };
    let length = text[..end]
        .lines()
        .filter_map(|line| line.split_once(':'))
        .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
        .and_then(|(_, value)| value.trim().parse::<usize>().ok())
        .unwrap_or(0);
    raw.len() >= end + 4 + length
}

fn response(status_line: &str, body: &str) -> String {
    format!(
        "HTTP/1.1 {status_line}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
        body.len()
    )
}

fn client(base_url: &str) -> ApiClient {
    ApiClient::new(base_url, "secret".into(), Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn no_content_patch_echoes_nothing() {
    let (base_url, server) = serve_once(response("204 No Content", "")).await;

    let echoed = client(&base_url)
        .patch_submission(7, &SubmissionPatch::status(SubmissionStatus::Final))
        .await
        .unwrap();
    assert_eq!(echoed, SubmissionPatch::default());

    let request = server.await.unwrap();
    assert!(request.starts_with("PATCH /api/submissions/7 HTTP/1.1\r\n"));
    assert!(request
        .to_ascii_lowercase()
        .contains("authorization: bearer secret\r\n"));
    assert!(request.ends_with(r#"{"status":"FINAL"}"#));
}

#[tokio::test]
async fn conflict_surfaces_backend_detail() {
    let (base_url, server) =
        serve_once(response("409 Conflict", r#"{"detail":"Is locked"}"#)).await;

    let err = client(&base_url)
        .patch_submission(7, &SubmissionPatch::release_date("2024-03-09"))
        .await
        .unwrap_err();
    match &err {
        ApiError::Status { status, detail } => {
            assert_eq!(*status, StatusCode::CONFLICT);
            assert_eq!(detail.as_deref(), Some("Is locked"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(err.user_message(), "Is locked");
    server.await.unwrap();
}

#[tokio::test]
async fn calendar_read_sends_month_query() {
    let body = r#"{"submissions":[{"id":3,"episodeTitle":"Pilot","contentType":"AUDIO","status":"DRAFT","releaseDate":"2024-03-08"}]}"#;
    let (base_url, server) = serve_once(response("200 OK", body)).await;

    let submissions = client(&base_url).fetch_calendar(2024, 3).await.unwrap();
    assert_eq!(submissions.len(), 1);
    assert_eq!(submissions[0].episode_title, "Pilot");

    let request = server.await.unwrap();
    let request_line = request.lines().next().unwrap();
    assert!(request_line.starts_with("GET /api/calendar?"));
    assert!(request_line.contains("year=2024"));
    assert!(request_line.contains("month=3"));
}
