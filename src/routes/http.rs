// GET handlers: dashboard page, status JSON, disks JSON, version

use axum::{
    extract::State,
    response::{Html, IntoResponse, Response},
};

use super::{AppState, html};

/// GET / — dashboard page for the current snapshot.
pub(super) async fn index_handler(State(state): State<AppState>) -> Html<String> {
    let snapshot = state.snapshot().await;
    Html(html::render_index(&snapshot))
}

/// GET /api/status — `system, cpu, memory, disk_io, network, battery, processes`; unavailable
/// categories are `null`.
pub(super) async fn api_status_handler(State(state): State<AppState>) -> Response {
    let snapshot = state.snapshot().await;
    axum::Json(snapshot.status()).into_response()
}

/// GET /api/disks — per-partition usage, the same list the dashboard page shows.
pub(super) async fn api_disks_handler(State(state): State<AppState>) -> impl IntoResponse {
    let snapshot = state.snapshot().await;
    axum::Json(snapshot.disks.clone())
}

/// GET /version — service name and version (from Cargo.toml at build time).
pub(super) async fn version_handler() -> impl IntoResponse {
    axum::Json(serde_json::json!({
        "name": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
