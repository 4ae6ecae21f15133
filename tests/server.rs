//! Integration tests for the HTTP server, health endpoint, and graceful shutdown.

use std::net::SocketAddr;
use std::sync::Arc;

use secrecy::SecretString;
use serde_json::json;

use tickerproxy::config::provider_for;
use tickerproxy::config::KeySource;
use tickerproxy::health::HealthResponse;
use tickerproxy::proxy::upstream::UpstreamClient;
use tickerproxy::server::{self, AppState};

async fn start_test_server(key_source: KeySource) -> (SocketAddr, tokio::sync::oneshot::Sender<()>) {
    let upstream = UpstreamClient::new(
        server::build_http_client(),
        url::Url::parse("http://127.0.0.1:9/query").unwrap(),
        None,
    );
    let state = Arc::new(AppState::new(upstream, provider_for(key_source)));

    let router = server::build_router(state, 65_536);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();

    tokio::spawn(async move {
        axum::serve(listener, router)
            .with_graceful_shutdown(async {
                let _ = shutdown_rx.await;
            })
            .await
            .unwrap();
    });

    (addr, shutdown_tx)
}

fn static_key() -> KeySource {
    KeySource::Static(SecretString::new("demo".into()))
}

#[tokio::test]
async fn health_endpoint_returns_healthy() {
    let (addr, shutdown) = start_test_server(static_key()).await;

    let url = format!("http://{addr}/health");
    let resp = reqwest::get(&url).await.unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(
        resp.headers().get("access-control-allow-origin").unwrap(),
        "*"
    );

    let health: HealthResponse = resp.json().await.unwrap();
    assert_eq!(health.status, "healthy");
    assert_eq!(health.upstream.url, "http://127.0.0.1:9/query");
    assert_eq!(health.upstream.key_source, "static");
    assert_eq!(health.stats.requests_relayed, 0);
    assert_eq!(health.stats.requests_rejected, 0);
    assert_eq!(health.stats.requests_failed, 0);

    let _ = shutdown.send(());
}

#[tokio::test]
async fn health_version_matches_crate() {
    let (addr, shutdown) = start_test_server(static_key()).await;

    let url = format!("http://{addr}/health");
    let health: HealthResponse = reqwest::get(&url).await.unwrap().json().await.unwrap();
    assert_eq!(health.version, env!("CARGO_PKG_VERSION"));

    let _ = shutdown.send(());
}

#[tokio::test]
async fn health_counts_rejected_and_failed_requests() {
    let (addr, shutdown) = start_test_server(KeySource::Env(
        "TICKERPROXY_IT_HEALTH_NEVER_SET_77AD".into(),
    ))
    .await;
    let client = reqwest::Client::new();

    // 400: unknown endpoint
    let resp = client
        .post(format!("http://{addr}/"))
        .json(&json!({ "symbol": "IBM", "endpoint": "daily" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);

    // 500: key variable unset
    let resp = client
        .post(format!("http://{addr}/"))
        .json(&json!({ "symbol": "IBM", "endpoint": "quote" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 500);

    let health: HealthResponse = reqwest::get(format!("http://{addr}/health"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(health.upstream.key_source, "env");
    assert_eq!(health.stats.requests_relayed, 0);
    assert_eq!(health.stats.requests_rejected, 1);
    assert_eq!(health.stats.requests_failed, 1);

    let _ = shutdown.send(());
}

#[tokio::test]
async fn non_get_health_is_relayed() {
    let (addr, shutdown) = start_test_server(static_key()).await;

    let resp = reqwest::Client::new()
        .post(format!("http://{addr}/health"))
        .json(&json!({ "endpoint": "quote" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "Symbol is required");

    let _ = shutdown.send(());
}

#[tokio::test]
async fn graceful_shutdown_works() {
    let (addr, shutdown) = start_test_server(static_key()).await;

    // Verify server is running
    let url = format!("http://{addr}/health");
    assert!(reqwest::get(&url).await.is_ok());

    // Send shutdown
    let _ = shutdown.send(());

    // Give it a moment to shut down
    tokio::time::sleep(std::time::Duration::from_millis(100)).await;

    // Server should no longer accept connections
    let result = reqwest::get(&url).await;
    assert!(result.is_err());
}
