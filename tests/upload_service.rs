//! Integration tests against a local stand-in for the extraction service.
//!
//! Each test starts a one-route HTTP server on an ephemeral port that answers
//! every request with a canned status and body, and records what it received.
//! No external network access is needed.
//!
//! Run with:
//!   cargo test --test upload_service -- --nocapture

use chrono::NaiveDate;
use docview::{
    export_json, export_to_dir, CandidateFile, ClientConfig, Coordinator, HtmlRenderer, Phase,
    ResultView, SubmitOutcome, TextRenderer, UploadClient, UploadPolicy, Uploader,
};
use serde_json::json;
use std::sync::{Arc, Mutex};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

// ── Test helpers ─────────────────────────────────────────────────────────────

struct MockService {
    base_url: String,
    requests: Arc<Mutex<Vec<String>>>,
}

impl MockService {
    fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

/// Serve `status` + `body` for every request until the test ends.
async fn spawn_service(status: u16, body: &'static str) -> MockService {
    let response = format!(
        "HTTP/1.1 {status} Mock\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    );
    spawn_raw_service(response).await
}

/// Answer every request with exactly `response`, then close the connection.
async fn spawn_raw_service(response: String) -> MockService {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let requests = Arc::new(Mutex::new(Vec::new()));
    let seen = requests.clone();
    let response: Arc<str> = response.into();

    tokio::spawn(async move {
        loop {
            let Ok((stream, _)) = listener.accept().await else {
                return;
            };
            tokio::spawn(handle(stream, response.clone(), seen.clone()));
        }
    });

    MockService {
        base_url: format!("http://{addr}"),
        requests,
    }
}

async fn handle(mut stream: TcpStream, response: Arc<str>, seen: Arc<Mutex<Vec<String>>>) {
    let Some(raw) = read_request(&mut stream).await else {
        return;
    };
    // Record before answering so the client never observes a response for an
    // unrecorded request.
    seen.lock().unwrap().push(String::from_utf8_lossy(&raw).into_owned());

    if stream.write_all(response.as_bytes()).await.is_ok() {
        stream.shutdown().await.ok();
    }
}

/// Read one full HTTP request (headers + body).
async fn read_request(stream: &mut TcpStream) -> Option<Vec<u8>> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    loop {
        let n = stream.read(&mut chunk).await.ok()?;
        if n == 0 {
            return Some(buf);
        }
        buf.extend_from_slice(&chunk[..n]);

        let Some(header_end) = find(&buf, b"\r\n\r\n") else {
            continue;
        };
        let headers = String::from_utf8_lossy(&buf[..header_end]).to_ascii_lowercase();
        let body = &buf[header_end + 4..];
        let complete = match content_length(&headers) {
            Some(len) => body.len() >= len,
            None => body.ends_with(b"0\r\n\r\n") || body.ends_with(b"--\r\n"),
        };
        if complete {
            return Some(buf);
        }
    }
}

fn content_length(headers: &str) -> Option<usize> {
    headers
        .lines()
        .find_map(|l| l.strip_prefix("content-length:"))
        .and_then(|v| v.trim().parse().ok())
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

fn client_for(service: &MockService) -> UploadClient {
    let config = ClientConfig::builder()
        .base_url(format!("{}/", service.base_url))
        .request_timeout_secs(10)
        .build()
        .unwrap();
    UploadClient::new(&config).unwrap()
}

fn invoice_pdf() -> CandidateFile {
    CandidateFile::new("invoice.pdf", "application/pdf", b"%PDF-1.7\n%mock\n".to_vec())
}

const INVOICE: &str =
    r#"{"document_type":"invoice","keyword_matches":{"total":2},"structured_data":{"amount":100}}"#;

// ── Upload client ────────────────────────────────────────────────────────────

#[tokio::test]
async fn upload_posts_multipart_file_field() {
    let service = spawn_service(200, INVOICE).await;
    let client = client_for(&service);

    let result = client.upload(&invoice_pdf()).await.expect("upload should succeed");
    assert_eq!(result.document_type(), "invoice");

    let requests = service.requests();
    assert_eq!(requests.len(), 1, "exactly one request per upload");
    let req = &requests[0];
    assert!(req.starts_with("POST /upload "), "got: {req}");
    assert!(req.to_ascii_lowercase().contains("multipart/form-data; boundary="));
    assert!(req.contains("name=\"file\""), "got: {req}");
    assert!(req.contains("filename=\"invoice.pdf\""), "got: {req}");
    assert!(req.contains("%PDF-1.7"));
}

#[tokio::test]
async fn upload_passes_unknown_fields_through() {
    let service = spawn_service(
        200,
        r#"{"document_type":"receipt","raw_text":"TOTAL 9.99","confidence":0.93}"#,
    )
    .await;
    let result = client_for(&service).upload(&invoice_pdf()).await.unwrap();
    assert_eq!(result.raw()["raw_text"], json!("TOTAL 9.99"));
    assert_eq!(result.raw()["confidence"], json!(0.93));
}

#[tokio::test]
async fn upload_rejects_non_json_success_body() {
    let service = spawn_service(200, "<html>ok</html>").await;
    let err = client_for(&service).upload(&invoice_pdf()).await.unwrap_err();
    assert!(err.message.contains("Invalid JSON"), "got: {}", err.message);
}

#[tokio::test]
async fn upload_reports_connection_failure() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let config = ClientConfig::builder()
        .base_url(format!("http://{addr}"))
        .build()
        .unwrap();
    let err = UploadClient::new(&config)
        .unwrap()
        .upload(&invoice_pdf())
        .await
        .unwrap_err();
    assert!(!err.message.is_empty());
}

// ── Full session ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn successful_session_renders_and_exports() {
    let service = spawn_service(200, INVOICE).await;
    let mut session = Coordinator::new(UploadPolicy::default(), client_for(&service)).unwrap();
    session.on_file_selected(invoice_pdf());

    assert_eq!(session.on_submit().await, SubmitOutcome::Succeeded);
    let state = session.state().clone();
    assert_eq!(state.phase(), Phase::Succeeded);
    assert!(!state.busy);

    // Classification badges.
    match session.result_view() {
        ResultView::Loaded {
            document_type,
            keyword_badges,
            ..
        } => {
            assert_eq!(document_type, "invoice");
            assert_eq!(keyword_badges.len(), 1);
            assert_eq!(keyword_badges[0].label(), "total: 2 matches");
        }
        ResultView::Empty => panic!("expected results"),
    }

    // Export is byte-for-byte the 2-space pretty form of the response.
    let result = state.result.as_ref().unwrap();
    let parsed: serde_json::Value = serde_json::from_str(INVOICE).unwrap();
    let expected = serde_json::to_string_pretty(&parsed).unwrap();
    assert_eq!(export_json(result), expected);

    let out = tempfile::tempdir().unwrap();
    let date = NaiveDate::from_ymd_opt(2024, 6, 30).unwrap();
    let path = export_to_dir(result, out.path(), date).await.unwrap();
    assert!(path.ends_with("extraction-result-2024-06-30.json"));
    assert_eq!(std::fs::read_to_string(&path).unwrap(), expected);

    // Same state renders the same bytes.
    let text = TextRenderer::default();
    assert_eq!(
        text.render_results(&session.result_view()),
        text.render_results(&session.result_view())
    );
    let html = HtmlRenderer::default();
    let page = html.render_page(&state, date);
    assert_eq!(page, html.render_page(&state, date));
    assert!(page.contains("<object"), "PDF preview should embed a viewer");
}

#[tokio::test]
async fn server_detail_becomes_view_error() {
    let service = spawn_service(422, r#"{"detail":"file corrupted"}"#).await;
    let mut session = Coordinator::new(UploadPolicy::default(), client_for(&service)).unwrap();
    session.on_file_selected(invoice_pdf());

    assert_eq!(session.on_submit().await, SubmitOutcome::Failed);
    let state = session.state();
    assert_eq!(state.error.as_deref(), Some("file corrupted"));
    assert!(state.result.is_none());
    assert!(state.preview.is_none());
    assert!(!state.busy);
}

#[tokio::test]
async fn unparseable_error_body_uses_generic_message() {
    let service = spawn_service(500, "Internal Server Error").await;
    let mut session = Coordinator::new(UploadPolicy::default(), client_for(&service)).unwrap();
    session.on_file_selected(invoice_pdf());

    session.on_submit().await;
    assert_eq!(session.state().error.as_deref(), Some("Upload failed."));
    assert!(!session.state().busy);
}

#[tokio::test]
async fn truncated_error_body_uses_generic_message() {
    // Declares 200 bytes, sends five, then hangs up.
    let service = spawn_raw_service(
        "HTTP/1.1 500 Mock\r\nContent-Type: application/json\r\nContent-Length: 200\r\nConnection: close\r\n\r\n{\"det".to_string(),
    )
    .await;
    let mut session = Coordinator::new(UploadPolicy::default(), client_for(&service)).unwrap();
    session.on_file_selected(invoice_pdf());

    assert_eq!(session.on_submit().await, SubmitOutcome::Failed);
    assert_eq!(session.state().error.as_deref(), Some("Upload failed."));
    assert!(!session.state().busy);
}

#[tokio::test]
async fn session_recovers_after_failure() {
    let failing = spawn_service(503, r#"{"detail":"service busy"}"#).await;
    let mut session = Coordinator::new(UploadPolicy::default(), client_for(&failing)).unwrap();
    session.on_file_selected(invoice_pdf());
    assert_eq!(session.on_submit().await, SubmitOutcome::Failed);

    // A second attempt in the same session starts from a clean slate.
    assert_eq!(session.on_submit().await, SubmitOutcome::Failed);
    assert_eq!(session.state().attempt, 2);
    assert_eq!(failing.requests().len(), 2);
}

#[tokio::test]
async fn rejected_file_never_reaches_the_service() {
    let service = spawn_service(200, INVOICE).await;
    let mut session = Coordinator::new(UploadPolicy::default(), client_for(&service)).unwrap();

    let huge = CandidateFile::new("scan.png", "image/png", vec![0u8; 10 * 1024 * 1024 + 1]);
    assert!(matches!(
        session.on_file_selected(huge),
        docview::SelectionOutcome::Rejected {
            reason: docview::RejectReason::TooLarge,
            ..
        }
    ));
    assert_eq!(session.on_submit().await, SubmitOutcome::NoSelection);
    assert!(service.requests().is_empty());
}
