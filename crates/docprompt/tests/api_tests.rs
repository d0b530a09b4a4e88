#![cfg(feature = "api")]
//! Integration tests for the HTTP API, driven through the router with `oneshot`.

mod helpers;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode},
};
use docprompt::{
    ExtractionConfig,
    api::{ApiSizeLimits, create_router, create_router_with_limits},
};
use serde_json::Value;
use tower::ServiceExt;

use helpers::{THREE_LINE_TEXT, docx_bytes, jpeg_bytes, pdf_bytes, xlsx_bytes};

const BOUNDARY: &str = "docprompt-test-boundary";

fn multipart_body(field: &str, filename: Option<&str>, content: &[u8]) -> Vec<u8> {
    let disposition = match filename {
        Some(filename) => format!("form-data; name=\"{field}\"; filename=\"{filename}\""),
        None => format!("form-data; name=\"{field}\""),
    };

    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: {disposition}\r\nContent-Type: application/octet-stream\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(content);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
    body
}

fn upload_request(body: Vec<u8>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/extract-metadata")
        .header("content-type", format!("multipart/form-data; boundary={BOUNDARY}"))
        .header("content-length", body.len())
        .body(Body::from(body))
        .expect("Failed to build request")
}

async fn send(router: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.oneshot(request).await.expect("Request failed");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), 10_000_000)
        .await
        .expect("Failed to read body");
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

async fn upload(filename: &str, content: &[u8]) -> (StatusCode, Value) {
    let router = create_router(ExtractionConfig::default());
    send(router, upload_request(multipart_body("file", Some(filename), content))).await
}

#[tokio::test]
async fn test_root_describes_service() {
    let router = create_router(ExtractionConfig::default());
    let request = Request::builder().uri("/").body(Body::empty()).unwrap();

    let (status, body) = send(router, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Document Metadata Extractor API");
    assert_eq!(body["endpoints"], serde_json::json!(["/extract-metadata"]));
}

#[tokio::test]
async fn test_health_endpoint() {
    let router = create_router(ExtractionConfig::default());
    let request = Request::builder().uri("/health").body(Body::empty()).unwrap();

    let (status, body) = send(router, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_plain_text_upload() {
    let (status, body) = upload("notes.txt", THREE_LINE_TEXT.as_bytes()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);

    let metadata = &body["metadata"];
    assert_eq!(metadata["document_type"], "text");
    assert_eq!(metadata["line_count"], 3);
    assert_eq!(metadata["character_count"], 42);
    assert_eq!(metadata["tables_count"], 0);
    assert_eq!(metadata["images_count"], 0);
    assert_eq!(metadata["filename"], "notes.txt");
    assert_eq!(metadata["file_size"], 42);
    assert_eq!(metadata["mime_type"], "text/plain");
    assert_eq!(metadata["file_extension"], ".txt");
    assert!(metadata.get("error").is_none());

    let prompt = body["prompt_context"].as_str().unwrap();
    assert!(prompt.starts_with("Document Analysis:\n- Type: text\n- Pages: 1\n"));
    assert!(prompt.ends_with(THREE_LINE_TEXT));
}

#[tokio::test]
async fn test_single_page_pdf_upload() {
    let (status, body) = upload("brief.pdf", &pdf_bytes(&["Executive summary"])).await;
    assert_eq!(status, StatusCode::OK);

    let metadata = &body["metadata"];
    assert_eq!(metadata["document_type"], "pdf");
    assert_eq!(metadata["page_count"], 1);
    assert_eq!(metadata["images_count"], 0);
    assert_eq!(metadata["is_encrypted"], false);
    assert_eq!(metadata["has_bookmarks"], false);
    assert_eq!(metadata["mime_type"], "application/pdf");
    assert_eq!(metadata["structure_elements"], serde_json::json!(["PDF"]));
}

#[tokio::test]
async fn test_jpeg_upload() {
    let (status, body) = upload("photo.jpg", &jpeg_bytes(100, 200)).await;
    assert_eq!(status, StatusCode::OK);

    let metadata = &body["metadata"];
    assert_eq!(metadata["document_type"], "image");
    assert_eq!(metadata["dimensions"], "100x200");
    assert_eq!(metadata["format"], "JPEG");
    assert_eq!(metadata["mode"], "RGB");
    assert_eq!(metadata["page_count"], 1);
    assert_eq!(metadata["images_count"], 1);
    assert_eq!(metadata["mime_type"], "image/jpeg");
}

#[tokio::test]
async fn test_unrecognized_content_rejected() {
    let (status, body) = upload("mystery.dat", &[0x00, 0x9f, 0x13, 0x37, 0x00, 0x42]).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let message = body["message"].as_str().unwrap();
    assert!(message.contains("application/octet-stream"));
    for mime in docprompt::SupportedTypes::default().iter() {
        assert!(message.contains(mime), "missing {mime} in {message}");
    }
    assert_eq!(body["status_code"], 400);
}

#[tokio::test]
async fn test_spreadsheet_upload_returns_full_transcript() {
    let workbook = xlsx_bytes(&[(
        "Budget",
        vec![vec!["Item", "Cost"], vec!["Paper", "12"], vec!["Ink", "30"]],
    )]);
    let (status, body) = upload("budget.xlsx", &workbook).await;
    assert_eq!(status, StatusCode::OK);

    let metadata = &body["metadata"];
    assert_eq!(metadata["document_type"], "spreadsheet");
    assert_eq!(metadata["sheet_names"], serde_json::json!(["Budget"]));
    assert_eq!(metadata["page_count"], 1);
    assert_eq!(metadata["tables_count"], 1);
    assert_eq!(
        metadata["mime_type"],
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
    );

    let full_content = metadata["full_content"].as_str().unwrap();
    assert!(full_content.contains("=== SHEET: Budget ==="));
    assert!(full_content.contains("COLUMNS: Item | Cost"));

    let prompt = body["prompt_context"].as_str().unwrap();
    assert!(prompt.ends_with(full_content));
}

#[tokio::test]
async fn test_docx_upload() {
    let document = docx_bytes(&["Quarterly report", "Revenue grew."], true);
    let (status, body) = upload("report.docx", &document).await;
    assert_eq!(status, StatusCode::OK);

    let metadata = &body["metadata"];
    assert_eq!(metadata["document_type"], "document");
    assert_eq!(metadata["page_count"], 1);
    assert_eq!(metadata["tables_count"], 1);
    assert!(metadata["text_preview"].as_str().unwrap().starts_with("Quarterly report\n"));
    assert_eq!(
        metadata["structure_elements"],
        serde_json::json!(["Document", "Paragraphs", "Tables"])
    );
}

#[tokio::test]
async fn test_broken_pdf_degrades_to_placeholder() {
    let (status, body) = upload("broken.pdf", b"%PDF-1.4\n% truncated before any object").await;
    assert_eq!(status, StatusCode::OK);

    let metadata = &body["metadata"];
    assert_eq!(metadata["document_type"], "pdf");
    assert_eq!(metadata["text_preview"], "PDF document (unable to read content)");
    assert!(metadata["error"].is_string());
}

#[tokio::test]
async fn test_broken_pdf_is_server_error_when_fatal() {
    let mut config = ExtractionConfig::default();
    config.pdf.fail_on_error = true;
    let router = create_router(config);

    let request = upload_request(multipart_body("file", Some("broken.pdf"), b"%PDF-1.4\n% truncated"));
    let (status, body) = send(router, request).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(
        body["message"]
            .as_str()
            .unwrap()
            .starts_with("Error processing document: ")
    );
}

#[tokio::test]
async fn test_missing_file_field_rejected() {
    let router = create_router(ExtractionConfig::default());
    let request = upload_request(multipart_body("attachment", Some("notes.txt"), b"hello"));

    let (status, body) = send(router, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "No file provided");
}

#[tokio::test]
async fn test_empty_filename_rejected() {
    let (status, body) = upload("", b"hello").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "No file provided");
}

#[tokio::test]
async fn test_field_without_filename_rejected() {
    let router = create_router(ExtractionConfig::default());
    let request = upload_request(multipart_body("file", None, b"hello"));

    let (status, _) = send(router, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_malformed_multipart_rejected() {
    let router = create_router(ExtractionConfig::default());
    let request = upload_request(b"this is not a multipart body".to_vec());

    let (status, _) = send(router, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_oversized_upload_rejected() {
    let router = create_router_with_limits(ExtractionConfig::default(), ApiSizeLimits::new(1024, 1024));
    let request = upload_request(multipart_body("file", Some("big.txt"), &vec![b'a'; 4096]));

    let response = router.oneshot(request).await.expect("Request failed");
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
}
