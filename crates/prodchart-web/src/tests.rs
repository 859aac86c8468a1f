use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use serde_json::Value;
use tower::ServiceExt;

use prodchart_core::{BackendError, PageLayout, PdfBackend, TextLine};
use prodchart_parsing::ReportExtractor;

use crate::build_router;
use crate::state::AppState;

const BOUNDARY: &str = "prodchart-test-boundary";
const SIZE: f32 = 10.0;

struct FixedBackend(PageLayout);

impl PdfBackend for FixedBackend {
    fn first_page_layout(&self, _pdf: &[u8]) -> Result<PageLayout, BackendError> {
        Ok(self.0.clone())
    }
}

fn report_layout(header_lines: &[&str]) -> PageLayout {
    let mut lines: Vec<TextLine> = header_lines
        .iter()
        .enumerate()
        .map(|(i, text)| TextLine::monospace(text, 300.0, 10.0 + 15.0 * i as f32, SIZE))
        .collect();
    for (y, cells) in [
        (80.0, [("Lantabur", 0.0), ("Red", 100.0), ("10", 200.0)]),
        (92.0, [("", 0.0), ("Blue", 100.0), ("20", 200.0)]),
        (104.0, [("Taqwa", 0.0), ("Green", 100.0), ("5", 200.0)]),
    ] {
        for (text, x) in cells {
            if !text.is_empty() {
                lines.push(TextLine::monospace(text, x, y, SIZE));
            }
        }
    }
    PageLayout {
        width: 600.0,
        height: 800.0,
        lines,
    }
}

fn app_with(layout: PageLayout) -> axum::Router {
    let state = Arc::new(AppState {
        extractor: ReportExtractor::new(),
        backend: Arc::new(FixedBackend(layout)),
    });
    build_router(state, 1024 * 1024)
}

fn app() -> axum::Router {
    app_with(report_layout(&["Lantabur Prod. 30", "Taqwa Prod. 5"]))
}

fn multipart_body(field: &str, filename: &str, content: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"{field}\"; filename=\"{filename}\"\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
    body.extend_from_slice(content);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
    body
}

fn raw_upload(uri: &str, body: Vec<u8>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

fn upload_request(uri: &str, field: &str, filename: &str) -> Request<Body> {
    raw_upload(uri, multipart_body(field, filename, b"%PDF-1.7\n"))
}

async fn send(app: axum::Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn upload_returns_totals_breakdowns_and_charts() {
    let (status, json) = send(app(), upload_request("/", "file", "report.pdf")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["lantabur_total"], 30.0);
    assert_eq!(json["taqwa_total"], 5.0);
    assert_eq!(json["lantabur_data"][0]["Color"], "Red");
    assert_eq!(json["lantabur_data"][1]["Quantity"], 20.0);
    assert_eq!(json["taqwa_data"][0]["Percentage"], 100.0);
    assert_eq!(json["lantabur_chart"]["data"][0]["type"], "pie");
    assert_eq!(
        json["taqwa_chart"]["layout"]["title"]["text"],
        "Taqwa Production by Color"
    );
}

#[tokio::test]
async fn upload_alias_behaves_like_root() {
    let (status, json) = send(app(), upload_request("/api/upload", "file", "REPORT.PDF")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["lantabur_total"], 30.0);
}

#[tokio::test]
async fn non_pdf_extension_is_rejected() {
    let (status, json) = send(app(), upload_request("/", "file", "report.txt")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "Invalid file format. Please upload a PDF.");
    assert_eq!(json["status"], 400);
}

#[tokio::test]
async fn missing_totals_are_a_client_error() {
    let app = app_with(report_layout(&["Lantabur Prod. 30"]));
    let (status, json) = send(app, upload_request("/", "file", "report.pdf")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "Could not find production data in the PDF.");
}

#[tokio::test]
async fn missing_file_field_is_rejected() {
    let (status, json) = send(app(), upload_request("/", "document", "report.pdf")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "No file uploaded");
}

#[tokio::test]
async fn zero_total_is_unprocessable() {
    let app = app_with(report_layout(&["Lantabur Prod. 0", "Taqwa Prod. 5"]));
    let (status, _) = send(app, upload_request("/", "file", "report.pdf")).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn repeated_uploads_give_identical_output() {
    let (_, first) = send(app(), upload_request("/", "file", "report.pdf")).await;
    let (_, second) = send(app(), upload_request("/", "file", "report.pdf")).await;
    assert_eq!(first, second);
}

#[tokio::test]
async fn health_reports_entities() {
    let request = Request::builder()
        .uri("/api/health")
        .body(Body::empty())
        .unwrap();
    let (status, json) = send(app(), request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "ok");
    assert_eq!(json["entities"], serde_json::json!(["Lantabur", "Taqwa"]));
}

#[tokio::test]
async fn index_serves_upload_form() {
    let request = Request::builder().uri("/").body(Body::empty()).unwrap();
    let response = app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let html = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(html.contains("name=\"file\""));
    assert!(html.contains("Lantabur, Taqwa"));
}

#[tokio::test]
async fn first_file_field_wins() {
    let mut body = Vec::new();
    for filename in ["report.pdf", "notes.txt"] {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        body.extend_from_slice(
            format!("Content-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\n\r\n")
                .as_bytes(),
        );
        body.extend_from_slice(b"%PDF-1.7\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    let (status, json) = send(app(), raw_upload("/", body)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["taqwa_total"], 5.0);
}

#[tokio::test]
async fn truncated_extra_field_fails_the_upload() {
    let mut body = multipart_body("file", "report.pdf", b"%PDF-1.7\n");
    // Drop the closing delimiter and start a field that never ends.
    let closing = format!("--{BOUNDARY}--\r\n");
    body.truncate(body.len() - closing.len());
    body.extend_from_slice(
        format!("--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"note\"\r\n\r\nunterminated")
            .as_bytes(),
    );

    let (status, json) = send(app(), raw_upload("/", body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["status"], 400);
}
