// HTTP routes

mod html;
mod http;

use axum::{Router, routing::get};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::collector::Collector;
use crate::config::SamplingMode;
use crate::models::SystemSnapshot;
use crate::sampler::SnapshotCache;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) collector: Collector,
    pub(crate) cache: SnapshotCache,
    pub(crate) mode: SamplingMode,
}

impl AppState {
    /// Cached snapshot in background mode; a fresh collection on demand or before the first
    /// background sample exists.
    pub(crate) async fn snapshot(&self) -> Arc<SystemSnapshot> {
        if self.mode == SamplingMode::Background
            && let Some(snapshot) = self.cache.latest().await
        {
            return snapshot;
        }
        Arc::new(self.collector.collect().await)
    }
}

pub fn app(collector: Collector, cache: SnapshotCache, mode: SamplingMode) -> Router {
    let state = AppState {
        collector,
        cache,
        mode,
    };
    Router::new()
        .route("/", get(http::index_handler)) // GET /
        .route("/api/status", get(http::api_status_handler)) // GET /api/status
        .route("/api/disks", get(http::api_disks_handler)) // GET /api/disks
        .route("/version", get(http::version_handler)) // GET /version
        .layer(CorsLayer::new().allow_origin(Any))
        .with_state(state)
}
