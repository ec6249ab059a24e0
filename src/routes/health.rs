use axum::{extract::State, routing::get, Json, Router};

use crate::models::{AppState, HealthResponse};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health_check))
        .with_state(state)
}

async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let session = state.system.session();
    let response = HealthResponse {
        status: "ok".to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        search: if session.is_online() { "configured" } else { "offline" }.to_string(),
        model: state.system.model().map(str::to_string),
        cache: session.cache().stats(),
    };

    Json(response)
}
