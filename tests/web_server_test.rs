//! Integration tests for the status web surface
//!
//! Each test binds the router to an ephemeral port and talks to it over
//! real HTTP.
//!
//! Run with: cargo test --test web_server_test

use std::net::SocketAddr;
use std::sync::Arc;

use serde_json::{json, Value};
use teloxide::types::Update;
use tokio::sync::mpsc;

use handout::core::supervisor::RuntimeStatus;
use handout::core::web_server::{router, WebState};
use handout::delivery::Asset;
use handout::storage::Store;

struct TestApp {
    addr: SocketAddr,
    updates_rx: mpsc::UnboundedReceiver<Update>,
    // Keeps the backing files alive for the duration of the test.
    _dir: tempfile::TempDir,
}

impl TestApp {
    fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

async fn spawn_app() -> TestApp {
    let dir = tempfile::tempdir().unwrap();

    let mut store = Store::load(dir.path().join("users.json"));
    store.upsert("42", Some("ann".to_string()), "Ann", None);
    store.increment_download("42");
    let store = store.into_shared();

    let runtime = Arc::new(RuntimeStatus::new());
    runtime.mark_connected();

    let asset = Arc::new(Asset::probe(dir.path().join("missing.zip")));

    let (tx, rx) = mpsc::unbounded_channel();
    let state = WebState::new(store, runtime, asset, tx);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router(state)).await.unwrap();
    });

    TestApp {
        addr,
        updates_rx: rx,
        _dir: dir,
    }
}

#[tokio::test]
async fn health_reports_runtime_and_store_state() {
    let app = spawn_app().await;

    let body: Value = reqwest::get(app.url("/health")).await.unwrap().json().await.unwrap();

    assert_eq!(body["status"], "ok");
    assert_eq!(body["connected"], true);
    assert_eq!(body["asset_available"], false);
    assert_eq!(body["total_users"], 1);
    assert_eq!(body["failures"], 0);
    assert!(body["store_file_bytes"].as_u64().unwrap() > 0);
}

#[tokio::test]
async fn stats_payload_matches_store_aggregates() {
    let app = spawn_app().await;

    let body: Value = reqwest::get(app.url("/stats")).await.unwrap().json().await.unwrap();

    assert_eq!(body["total_users"], 1);
    assert_eq!(body["active_today"], 1);
    assert_eq!(body["total_downloads"], 1);
    assert_eq!(body["top_downloaders"][0]["name"], "Ann");
    assert_eq!(body["top_downloaders"][0]["downloads"], 1);
}

#[tokio::test]
async fn status_page_renders_html() {
    let app = spawn_app().await;

    let response = reqwest::get(app.url("/")).await.unwrap();
    assert!(response.status().is_success());

    let body = response.text().await.unwrap();
    assert!(body.contains("Distribution bot"));
    assert!(body.contains("Ann"));
    assert!(body.contains("missing"));
}

#[tokio::test]
async fn restart_is_accepted_but_does_nothing() {
    let app = spawn_app().await;

    let response = reqwest::Client::new().post(app.url("/restart")).send().await.unwrap();
    assert_eq!(response.status().as_u16(), 202);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["status"], "accepted");
    assert_eq!(body["action"], "none");
}

#[tokio::test]
async fn webhook_rejects_payload_without_update_id() {
    let app = spawn_app().await;

    let response = reqwest::Client::new()
        .post(app.url("/webhook"))
        .json(&json!({"not": "an update"}))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 400);
}

#[tokio::test]
async fn webhook_forwards_parsed_update_into_the_channel() {
    let mut app = spawn_app().await;

    let response = reqwest::Client::new()
        .post(app.url("/webhook"))
        .json(&json!({"update_id": 7}))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());

    let update = app.updates_rx.recv().await.unwrap();
    assert_eq!(update.id.0, 7);
}
