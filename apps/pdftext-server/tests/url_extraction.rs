//! URL endpoint tests
//!
//! A throwaway upstream server on 127.0.0.1 plays the remote document host.

mod common;

use std::net::SocketAddr;

use axum::http::{header, StatusCode};
use axum::routing::get;
use axum::Router;
use axum_test::TestServer;
use serde_json::{json, Value};
use tempfile::TempDir;

use pdftext_server::build_router;

use common::{test_config, test_state};

async fn spawn_upstream() -> SocketAddr {
    let app = Router::new()
        .route(
            "/files/:name",
            get(|| async {
                (
                    [(header::CONTENT_TYPE, "application/pdf")],
                    "%PDF-1.6\nRemote document body text",
                )
            }),
        )
        .route(
            "/doc.pdf",
            get(|| async { ([(header::CONTENT_TYPE, "application/pdf")], "%PDF-1.5\nfour words right here") }),
        )
        .route("/plain.txt", get(|| async { "this is not a pdf" }))
        .route("/gone.pdf", get(|| async { StatusCode::NOT_FOUND }));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

fn server(scratch: &TempDir) -> TestServer {
    TestServer::new(build_router(test_state(test_config(scratch.path())))).unwrap()
}

#[tokio::test]
async fn test_url_success() {
    let upstream = spawn_upstream().await;
    let scratch = TempDir::new().unwrap();
    let url = format!("http://{}/doc.pdf", upstream);

    let response = server(&scratch)
        .post("/extract-text-url")
        .json(&json!({ "url": url }))
        .await;

    response.assert_status(StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["url"], url);
    assert_eq!(body["filename"], "doc.pdf");
    assert!(body.get("fileSize").is_none());
    assert_eq!(body["text"], "four words right here");
    assert_eq!(body["wordCount"], 4);
    assert_eq!(body["textLength"], 21);
    assert_eq!(body["metadata"]["version"], "1.5");
}

#[tokio::test]
async fn test_explicit_filename_echoed() {
    let upstream = spawn_upstream().await;
    let scratch = TempDir::new().unwrap();

    let response = server(&scratch)
        .post("/extract-text-url")
        .json(&json!({
            "url": format!("http://{}/doc.pdf", upstream),
            "filename": "../../weird name",
        }))
        .await;

    response.assert_status(StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["filename"], "../../weird name");
}

#[tokio::test]
async fn test_filename_from_encoded_path() {
    let upstream = spawn_upstream().await;
    let scratch = TempDir::new().unwrap();

    let response = server(&scratch)
        .post("/extract-text-url")
        .json(&json!({ "url": format!("http://{}/files/annual%20report.pdf", upstream) }))
        .await;

    response.assert_status(StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["filename"], "annual report.pdf");
}

#[tokio::test]
async fn test_missing_url() {
    let scratch = TempDir::new().unwrap();
    let server = server(&scratch);

    for payload in [json!({}), json!({ "url": "" }), json!({ "filename": "a.pdf" })] {
        let response = server.post("/extract-text-url").json(&payload).await;
        response.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "missing_input");
        assert_eq!(body["message"], "No PDF URL provided");
    }
}

#[tokio::test]
async fn test_malformed_json_is_missing_input() {
    let scratch = TempDir::new().unwrap();

    let response = server(&scratch)
        .post("/extract-text-url")
        .text("{ not json")
        .content_type("application/json")
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["error"], "missing_input");
}

#[tokio::test]
async fn test_unreachable_url() {
    let scratch = TempDir::new().unwrap();

    let response = server(&scratch)
        .post("/extract-text-url")
        .json(&json!({ "url": "http://127.0.0.1:1/doc.pdf" }))
        .await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json();
    assert_eq!(body["error"], "fetch_failure");
    let message = body["message"].as_str().unwrap();
    assert!(message.starts_with("Failed to fetch PDF from URL: "));
    assert!(message.contains("error sending request"), "{}", message);
    assert!(message.to_lowercase().contains("connection refused"), "{}", message);
}

#[tokio::test]
async fn test_upstream_error_status() {
    let upstream = spawn_upstream().await;
    let scratch = TempDir::new().unwrap();

    let response = server(&scratch)
        .post("/extract-text-url")
        .json(&json!({ "url": format!("http://{}/gone.pdf", upstream) }))
        .await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json();
    assert_eq!(body["error"], "fetch_failure");
    assert!(body["message"].as_str().unwrap().contains("404 Not Found"));
}

#[tokio::test]
async fn test_remote_non_pdf_is_parse_failure() {
    let upstream = spawn_upstream().await;
    let scratch = TempDir::new().unwrap();

    let response = server(&scratch)
        .post("/extract-text-url")
        .json(&json!({ "url": format!("http://{}/plain.txt", upstream) }))
        .await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json();
    assert_eq!(body["error"], "parse_failure");
    assert_eq!(body["message"], "Invalid PDF structure");
}

#[tokio::test]
async fn test_opt_in_body_cap() {
    let upstream = spawn_upstream().await;
    let scratch = TempDir::new().unwrap();
    let mut config = test_config(scratch.path());
    config.fetch.max_body_size = Some(8);

    let server = TestServer::new(build_router(test_state(config))).unwrap();
    let response = server
        .post("/extract-text-url")
        .json(&json!({ "url": format!("http://{}/doc.pdf", upstream) }))
        .await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json();
    assert_eq!(body["error"], "fetch_failure");
    assert!(body["message"].as_str().unwrap().contains("exceeds 8 bytes"));
}
