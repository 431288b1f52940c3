//! Request/response handlers

use super::AppState;
use crate::poll::CycleReport;
use crate::snapshot::Snapshot;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use std::sync::Arc;

/// Dashboard page from `<static_dir>/index.html`
pub(super) async fn index(State(state): State<Arc<AppState>>) -> Response {
    let path = state.static_dir.join("index.html");
    match tokio::fs::read_to_string(&path).await {
        Ok(page) => Html(page).into_response(),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Dashboard page unavailable");
            (StatusCode::NOT_FOUND, "dashboard page not found").into_response()
        }
    }
}

/// Current snapshot without waiting for the next broadcast
pub(super) async fn get_snapshot(State(state): State<Arc<AppState>>) -> Json<Snapshot> {
    Json(state.dashboard.get_snapshot().await)
}

#[derive(Debug, Serialize)]
pub(super) struct HealthResponse {
    status: &'static str,
    connections: usize,
    last_cycle: Option<CycleReport>,
}

pub(super) async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        connections: state.dashboard.registry().len().await,
        last_cycle: state.dashboard.status().last_cycle().await,
    })
}
