use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};

use crate::agents::{AgentConfig, AgentRoster};
use crate::models::AppState;
use crate::types::{AppError, AppResult};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/agents", get(list_agents))
        .route("/api/agents/{name}", get(get_agent))
        .with_state(state)
}

async fn list_agents(State(state): State<AppState>) -> Json<AgentRoster> {
    Json(state.roster.as_ref().clone())
}

async fn get_agent(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> AppResult<Json<AgentConfig>> {
    state
        .roster
        .get(&name)
        .cloned()
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Agent not found: {}", name)))
}
