//! End-to-end tests against a live server on an ephemeral port.
//!
//! Run with: cargo test --test http_tests

use std::net::SocketAddr;

use futures::future::join_all;
use labor_law_assistant::config::{ConfigError, EnvSource, Settings};
use labor_law_assistant::routes::create_router;
use tokio::net::TcpListener;

/// Serve the application router on 127.0.0.1 and return its address.
async fn spawn_server() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, create_router())
            .await
            .expect("Test server failed");
    });

    addr
}

#[tokio::test]
async fn test_default_startup_serves_health() {
    let settings = Settings::from_source(&EnvSource::default()).unwrap();
    assert_eq!(settings.app_env, "development");
    assert!(settings.app_debug);
    assert_eq!(settings.app_port, 8000);

    let addr = spawn_server().await;
    let response = reqwest::get(format!("http://{}/health", addr))
        .await
        .unwrap();

    assert_eq!(response.status(), reqwest::StatusCode::OK);
    assert_eq!(
        response.headers()[reqwest::header::CONTENT_TYPE],
        "application/json"
    );
    assert_eq!(response.text().await.unwrap(), r#"{"status":"ok"}"#);
}

#[tokio::test]
async fn test_production_without_credential_refuses_to_start() {
    let source = EnvSource::from_pairs([("APP_ENV", "production")]);
    let err = Settings::from_source(&source).unwrap_err();
    assert!(matches!(err, ConfigError::MissingCredential { .. }));
}

#[tokio::test]
async fn test_production_with_credential_starts_without_debug() {
    let source = EnvSource::from_pairs([
        ("APP_ENV", "production"),
        ("APP_DEBUG", "1"),
        ("ANTHROPIC_API_KEY", "sk-prod"),
    ]);
    let settings = Settings::from_source(&source).unwrap();
    assert!(!settings.app_debug);

    let addr = spawn_server().await;
    let response = reqwest::get(format!("http://{}/health", addr))
        .await
        .unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::OK);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_health_checks() {
    let addr = spawn_server().await;
    let client = reqwest::Client::new();
    let url = format!("http://{}/health", addr);

    let responses = join_all((0..64).map(|_| {
        let client = client.clone();
        let url = url.clone();
        async move {
            let response = client.get(&url).send().await.unwrap();
            let status = response.status();
            let json: serde_json::Value = response.json().await.unwrap();
            (status, json)
        }
    }))
    .await;

    assert_eq!(responses.len(), 64);
    for (status, json) in responses {
        assert_eq!(status, reqwest::StatusCode::OK);
        assert_eq!(json, serde_json::json!({ "status": "ok" }));
    }
}

#[tokio::test]
async fn test_responses_carry_request_id() {
    let addr = spawn_server().await;
    let response = reqwest::get(format!("http://{}/health", addr))
        .await
        .unwrap();

    assert!(response.headers().contains_key("x-request-id"));
}
