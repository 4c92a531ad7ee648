//! API integration tests
//!
//! Exercise the routes that are decided locally (validation failures, 501s,
//! health) without making any upstream call.

use anyhow::Result;
use axum::http::StatusCode;
use axum::Router;
use axum_test::TestServer;
use caf_admin::config::AppConfig;
use caf_admin::server::app::create_app;
use serde_json::{json, Value};

async fn setup_test_server() -> Result<TestServer> {
    let app = create_app(AppConfig::default(), Some("*")).await?;
    let server = TestServer::new(app)?;
    Ok(server)
}

/// Minimal stand-in for the Lambda admin API, answering 404 to everything.
async fn spawn_stub_admin_api() -> Result<String> {
    let stub = Router::new().fallback(|| async { StatusCode::NOT_FOUND });
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        let _ = axum::serve(listener, stub).await;
    });
    Ok(format!("http://{addr}"))
}

fn multipart_body(boundary: &str, fields: &[(&str, &str)]) -> Vec<u8> {
    let mut body = String::new();
    for (name, value) in fields {
        body.push_str(&format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
        ));
    }
    body.push_str(&format!("--{boundary}--\r\n"));
    body.into_bytes()
}

#[tokio::test]
async fn test_health_endpoint() -> Result<()> {
    let server = setup_test_server().await?;

    let response = server.get("/health").await;

    assert_eq!(response.status_code(), StatusCode::OK);

    let body: Value = response.json();
    assert_eq!(body["service"], "caf-admin");
    assert_eq!(body["status"], "healthy");
    assert!(body["version"].is_string());

    Ok(())
}

#[tokio::test]
async fn test_upload_requires_file_bucket_and_key() -> Result<()> {
    let server = setup_test_server().await?;

    let boundary = "test-boundary";
    let body = multipart_body(boundary, &[("bucket", "cafpreviews")]);

    let response = server
        .post("/api/upload")
        .content_type(&format!("multipart/form-data; boundary={boundary}"))
        .bytes(body.into())
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["error"], "File, bucket, and key are required");

    Ok(())
}

#[tokio::test]
async fn test_download_url_requires_bucket_and_key() -> Result<()> {
    let server = setup_test_server().await?;

    let response = server
        .post("/api/files/download-url")
        .json(&json!({ "bucket": "caforders" }))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["error"], "Missing required fields: bucket or key");

    Ok(())
}

#[tokio::test]
async fn test_presign_validates_query_parameters() -> Result<()> {
    let server = setup_test_server().await?;

    let response = server.get("/api/upload/presign").await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["error"], "Missing required parameter: fileName");

    let response = server
        .get("/api/upload/presign")
        .add_query_param("fileName", "cover.png")
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["error"], "Missing required parameter: contentType");

    Ok(())
}

#[tokio::test]
async fn test_prompt_test_requires_prompt_and_images() -> Result<()> {
    let server = setup_test_server().await?;

    let response = server
        .post("/api/prompt-templates/test")
        .json(&json!({ "prompt": "make it moody", "imageKeys": [] }))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["error"], "Prompt and at least one image are required");

    Ok(())
}

#[tokio::test]
async fn test_unknown_design_maps_upstream_404_to_local_404() -> Result<()> {
    let config = AppConfig {
        admin_api_base_url: spawn_stub_admin_api().await?,
        ..AppConfig::default()
    };
    let app = create_app(config, Some("*")).await?;
    let server = TestServer::new(app)?;

    let response = server.get("/api/designs/does-not-exist").await;

    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    let body: Value = response.json();
    assert_eq!(body["error"], "Design not found");

    Ok(())
}

#[tokio::test]
async fn test_collection_create_is_not_implemented() -> Result<()> {
    let server = setup_test_server().await?;

    let response = server
        .post("/api/collections")
        .json(&json!({ "slug": "new", "name": "New" }))
        .await;

    assert_eq!(response.status_code(), StatusCode::NOT_IMPLEMENTED);
    let body: Value = response.json();
    assert!(body["error"].as_str().unwrap().contains("not yet implemented"));

    Ok(())
}

#[tokio::test]
async fn test_collection_toggle_is_not_implemented() -> Result<()> {
    let server = setup_test_server().await?;

    let response = server
        .patch("/api/collections/summer")
        .json(&json!({ "isActive": false }))
        .await;

    assert_eq!(response.status_code(), StatusCode::NOT_IMPLEMENTED);

    Ok(())
}

#[tokio::test]
async fn test_reorder_rejects_empty_slug_list() -> Result<()> {
    let server = setup_test_server().await?;

    let response = server
        .patch("/api/collections")
        .json(&json!({ "slugs": [] }))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["error"], "At least one collection slug is required");

    Ok(())
}
