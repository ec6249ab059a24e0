use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use serde_json::Value;
use tracing::info;

use crate::models::{AppState, ToolCallResponse};
use crate::tools::ToolDefinition;
use crate::types::AppResult;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/tools", get(list_tools))
        .route("/api/tools/{name}", post(call_tool))
        .with_state(state)
}

async fn list_tools(State(state): State<AppState>) -> Json<Vec<ToolDefinition>> {
    Json(state.tools.get_tool_definitions())
}

async fn call_tool(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Json(args): Json<Value>,
) -> AppResult<Json<ToolCallResponse>> {
    info!(tool = %name, "Tool call");
    let output = state.tools.execute(&name, args).await?;
    // tool outputs are JSON text; anything else is passed through as a string
    let output = serde_json::from_str(&output).unwrap_or(Value::String(output));
    Ok(Json(ToolCallResponse { tool: name, output }))
}
