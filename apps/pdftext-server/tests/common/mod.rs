//! Shared helpers for integration tests
#![allow(dead_code)]

use std::path::Path;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request};
use serde_json::{json, Map};

use pdftext_server::config::Config;
use pdftext_server::extract::{ParsedPdf, PdfParseError, PdfParser};
use pdftext_server::AppState;

pub const BOUNDARY: &str = "pdftext-test-boundary";

/// Parser stand-in: everything after the `%PDF-x.y` header line is the text.
pub struct StubParser;

impl PdfParser for StubParser {
    fn parse(&self, bytes: &[u8]) -> Result<ParsedPdf, PdfParseError> {
        if !bytes.starts_with(b"%PDF-") {
            return Err(PdfParseError::InvalidPdf("Invalid PDF structure".to_string()));
        }

        let content = String::from_utf8_lossy(bytes);
        let (header, text) = content.split_once('\n').unwrap_or((content.as_ref(), ""));

        let mut info = Map::new();
        info.insert("Title".to_string(), json!("Stub Document"));

        Ok(ParsedPdf {
            text: text.to_string(),
            page_count: 1,
            info: Some(info),
            version: header.strip_prefix("%PDF-").map(|v| v.trim().to_string()),
        })
    }
}

pub fn test_config(scratch_dir: &Path) -> Config {
    let mut config = Config::default();
    config.upload.scratch_dir = scratch_dir.to_path_buf();
    config
}

pub fn test_state(config: Config) -> AppState {
    AppState::with_parser(config, Arc::new(StubParser)).unwrap()
}

/// Build a single-part multipart body
pub fn multipart_body(field: &str, filename: &str, content_type: &str, data: &[u8]) -> Vec<u8> {
    let mut body = Vec::with_capacity(data.len() + 256);
    body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
            field, filename
        )
        .as_bytes(),
    );
    body.extend_from_slice(format!("Content-Type: {}\r\n\r\n", content_type).as_bytes());
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());
    body
}

/// Build a multipart body with one plain text field (no filename)
pub fn text_field_body(field: &str, value: &str) -> Vec<u8> {
    format!(
        "--{b}\r\nContent-Disposition: form-data; name=\"{field}\"\r\n\r\n{value}\r\n--{b}--\r\n",
        b = BOUNDARY,
        field = field,
        value = value
    )
    .into_bytes()
}

pub fn upload_request(body: Vec<u8>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/extract-text")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(body))
        .unwrap()
}

/// Number of entries in the scratch directory (0 if it was never created)
pub fn scratch_entries(dir: &Path) -> usize {
    std::fs::read_dir(dir).map(|entries| entries.count()).unwrap_or(0)
}
