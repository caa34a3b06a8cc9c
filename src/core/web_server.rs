//! Status web surface running alongside the dispatcher.
//!
//! Routes: GET / (HTML status page), GET /health (JSON), GET /stats
//! (JSON), POST /webhook (update ingestion into the dispatcher), and
//! POST /restart (accepted, intentionally not wired to any action; the
//! supervisor already restarts the polling loop on its own).

use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde_json::json;
use std::net::SocketAddr;
use std::ops::ControlFlow;
use std::sync::Arc;
use teloxide::dispatching::UpdateHandler;
use teloxide::prelude::*;
use teloxide::types::{Me, Update};
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use crate::core::stats::{self, StatsSnapshot};
use crate::core::supervisor::RuntimeStatus;
use crate::delivery::Asset;
use crate::storage::SharedStore;
use crate::telegram::handlers::HandlerError;

/// Shared state for the web server.
#[derive(Clone)]
pub struct WebState {
    store: SharedStore,
    runtime: Arc<RuntimeStatus>,
    asset: Arc<Asset>,
    updates_tx: mpsc::UnboundedSender<Update>,
}

impl WebState {
    pub fn new(
        store: SharedStore,
        runtime: Arc<RuntimeStatus>,
        asset: Arc<Asset>,
        updates_tx: mpsc::UnboundedSender<Update>,
    ) -> Self {
        Self {
            store,
            runtime,
            asset,
            updates_tx,
        }
    }
}

/// Spawns the task that feeds webhook updates into the same handler tree
/// the polling dispatcher runs, and returns the sender side.
pub fn spawn_webhook_forwarder(handler: UpdateHandler<HandlerError>, bot: Bot, me: Me) -> mpsc::UnboundedSender<Update> {
    let (tx, mut rx) = mpsc::unbounded_channel::<Update>();

    tokio::spawn(async move {
        while let Some(update) = rx.recv().await {
            let update_id = update.id;
            match handler.dispatch(dptree::deps![bot.clone(), me.clone(), update]).await {
                ControlFlow::Break(Ok(())) => {}
                ControlFlow::Break(Err(e)) => {
                    log::error!("webhook update {:?} handler error: {}", update_id, e);
                }
                ControlFlow::Continue(_) => {
                    log::debug!("webhook update {:?} matched no handler branch", update_id);
                }
            }
        }
    });

    tx
}

/// Builds the router; split out from [`start_web_server`] so tests can
/// drive it on an ephemeral port.
pub fn router(state: WebState) -> Router {
    Router::new()
        .route("/", get(status_page_handler))
        .route("/health", get(health_handler))
        .route("/stats", get(stats_handler))
        .route("/webhook", post(webhook_handler))
        .route("/restart", post(restart_handler))
        .with_state(state)
}

/// Start the status web server.
pub async fn start_web_server(port: u16, state: WebState) -> Result<(), Box<dyn std::error::Error>> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let app = router(state);

    log::info!("Starting status web server on http://{}", addr);
    log::info!("  /         - Status page (HTML)");
    log::info!("  /health   - Health check (JSON)");
    log::info!("  /stats    - Statistics (JSON)");
    log::info!("  /webhook  - Update ingestion (POST)");
    log::info!("  /restart  - Accepted no-op (POST)");

    let listener = TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// GET / — renders the status page HTML.
async fn status_page_handler(State(state): State<WebState>) -> Html<String> {
    let (snapshot, store_file_bytes) = {
        let store = state.store.lock().await;
        (stats::snapshot(&store), store.file_size_bytes())
    };

    Html(render_status_page(
        state.runtime.is_connected(),
        state.runtime.failures(),
        state.asset.available(),
        &snapshot,
        store_file_bytes,
    ))
}

/// GET /health — machine-readable liveness payload.
async fn health_handler(State(state): State<WebState>) -> impl IntoResponse {
    let (total_users, store_file_bytes) = {
        let store = state.store.lock().await;
        (store.total_users(), store.file_size_bytes())
    };

    let payload = json!({
        "status": "ok",
        "connected": state.runtime.is_connected(),
        "asset_available": state.asset.available(),
        "total_users": total_users,
        "store_file_bytes": store_file_bytes,
        "failures": state.runtime.failures(),
        "last_started": state.runtime.last_started(),
    });

    (StatusCode::OK, Json(payload))
}

/// GET /stats — the same aggregates /stats reports in chat.
async fn stats_handler(State(state): State<WebState>) -> Json<StatsSnapshot> {
    let snapshot = {
        let store = state.store.lock().await;
        stats::snapshot(&store)
    };
    Json(snapshot)
}

/// POST /webhook — accepts a JSON update payload and forwards it into the
/// dispatcher.
async fn webhook_handler(State(state): State<WebState>, Json(payload): Json<serde_json::Value>) -> Response {
    let update: Update = match serde_json::from_value(payload) {
        Ok(update) => update,
        Err(e) => {
            log::warn!("rejected malformed webhook payload: {}", e);
            return (StatusCode::BAD_REQUEST, Json(json!({"error": "malformed update payload"}))).into_response();
        }
    };

    if state.updates_tx.send(update).is_err() {
        log::error!("webhook received an update but the dispatcher channel is closed");
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({"error": "dispatcher unavailable"})),
        )
            .into_response();
    }

    (StatusCode::OK, Json(json!({"ok": true}))).into_response()
}

/// POST /restart — acknowledged but performs no restart action. The
/// supervisor loop already reconnects the polling session by itself, so
/// this route stays a documented no-op.
async fn restart_handler() -> impl IntoResponse {
    log::info!("restart requested over HTTP; acknowledged without action");
    (StatusCode::ACCEPTED, Json(json!({"status": "accepted", "action": "none"})))
}

/// Render the status page HTML.
fn render_status_page(
    connected: bool,
    failures: u64,
    asset_available: bool,
    snapshot: &StatsSnapshot,
    store_file_bytes: u64,
) -> String {
    let connection_badge = if connected {
        r#"<span class="badge ok">connected</span>"#
    } else {
        r#"<span class="badge bad">disconnected</span>"#
    };
    let asset_badge = if asset_available {
        r#"<span class="badge ok">available</span>"#
    } else {
        r#"<span class="badge bad">missing</span>"#
    };

    let top = stats::render_top(&snapshot.top_downloaders)
        .lines()
        .map(|line| format!("<li>{}</li>", html_escape(line)))
        .collect::<String>();

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>Distribution bot — status</title>
<style>
*{{box-sizing:border-box;margin:0;padding:0}}
body{{background:#0d0d0d;min-height:100vh;display:flex;justify-content:center;align-items:center;font-family:-apple-system,BlinkMacSystemFont,'Segoe UI',sans-serif;padding:20px;color:#fff}}
.card{{background:rgba(255,255,255,.08);border:1px solid rgba(255,255,255,.12);border-radius:24px;padding:32px;max-width:480px;width:100%}}
h1{{font-size:1.4rem;font-weight:700;margin-bottom:16px}}
dl{{display:grid;grid-template-columns:auto 1fr;gap:6px 16px;margin-bottom:20px}}
dt{{color:rgba(255,255,255,.6)}}
dd{{text-align:right}}
.badge{{padding:2px 10px;border-radius:50px;font-size:.8rem;font-weight:600}}
.badge.ok{{background:#1DB954;color:#000}}
.badge.bad{{background:#fc3c44;color:#fff}}
h2{{font-size:1rem;margin-bottom:8px;color:rgba(255,255,255,.8)}}
ol{{list-style:none}}
li{{color:rgba(255,255,255,.7);font-size:.9rem;padding:2px 0}}
</style>
</head>
<body>
<div class="card">
<h1>📦 Distribution bot</h1>
<dl>
<dt>Messaging loop</dt><dd>{connection_badge}</dd>
<dt>Loop failures</dt><dd>{failures}</dd>
<dt>Archive</dt><dd>{asset_badge}</dd>
<dt>Registered users</dt><dd>{total_users}</dd>
<dt>Active today</dt><dd>{active_today}</dd>
<dt>Total downloads</dt><dd>{total_downloads}</dd>
<dt>Store file</dt><dd>{store_file_bytes} B</dd>
</dl>
<h2>Top downloaders</h2>
<ol>{top}</ol>
</div>
</body>
</html>"#,
        connection_badge = connection_badge,
        failures = failures,
        asset_badge = asset_badge,
        total_users = snapshot.total_users,
        active_today = snapshot.active_today,
        total_downloads = snapshot.total_downloads,
        store_file_bytes = store_file_bytes,
        top = top,
    )
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
