use std::time::Instant;

use axum::{extract::State, routing::post, Json, Router};
use tracing::info;
use uuid::Uuid;

use crate::models::{AppState, ResearchRequest, ResearchResponse};
use crate::types::{AppError, AppResult};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/research", post(run_research))
        .with_state(state)
}

async fn run_research(
    State(state): State<AppState>,
    Json(request): Json<ResearchRequest>,
) -> AppResult<Json<ResearchResponse>> {
    if request.query.trim().is_empty() {
        return Err(AppError::InvalidRequest("query must not be empty".to_string()));
    }
    let request_id = Uuid::new_v4();
    info!(request_id = %request_id, query = %request.query, "Received research request");

    let start = Instant::now();
    let report = state
        .system
        .research_with_progress(&request.query, |step| info!(step = %step, "Research progress"))
        .await;

    Ok(Json(ResearchResponse {
        request_id,
        query: request.query,
        report,
        duration_ms: u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX),
    }))
}
