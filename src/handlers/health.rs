//! Health check handler

use axum::{extract::State, Json};
use serde::Serialize;

use crate::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    version: &'static str,
    timestamp: i64,
    model_loaded: bool,
    model_name: Option<String>,
}

pub async fn check(State(state): State<AppState>) -> Json<HealthResponse> {
    let loaded = state.model.is_ready();
    let model = state.model.model();

    Json(HealthResponse {
        status: if loaded { "healthy" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        timestamp: chrono::Utc::now().timestamp(),
        model_loaded: loaded,
        model_name: model.map(|m| m.name().to_string()),
    })
}
