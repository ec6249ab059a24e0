//! API Routes
//!
//! - `/api/health` - Health check with search and cache status
//! - `/api/research` - Run a full research request
//! - `/api/tools` - List and invoke the research tools directly
//! - `/api/agents` - The agent roster

pub mod agents;
pub mod health;
pub mod research;
pub mod tools;

use axum::{
    http::{HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json, Router,
};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use crate::models::AppState;
use crate::types::AppError;

/// Create the main application router
pub fn create_router(state: AppState) -> Router {
    info!("Creating application router");
    let cors = cors_layer(&state.config.server.cors_allowed_origins);

    Router::new()
        .merge(health::router(state.clone()))
        .merge(research::router(state.clone()))
        .merge(tools::router(state.clone()))
        .merge(agents::router(state))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if origins.iter().any(|o| o == "*") {
        return layer.allow_origin(Any);
    }
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match o.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %o, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    layer.allow_origin(AllowOrigin::list(origins))
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::InvalidRequest(_) | AppError::Json(_) => StatusCode::BAD_REQUEST,
            AppError::Search(_) | AppError::LLMApi(_) => StatusCode::BAD_GATEWAY,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            error!(error = %self, "Request failed");
        }
        (status, Json(serde_json::json!({ "error": self.to_string() }))).into_response()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::agents::DeepResearchSystem;
    use crate::config::{Config, UserProfile};
    use crate::research::session::tests::StubSearch;
    use crate::research::ResearchSession;
    use axum::body::Body;
    use axum::http::Request;
    use std::sync::Arc;
    use tower::ServiceExt;

    pub(crate) fn test_state() -> AppState {
        let config = Config::from_lookup(|_| None).unwrap();
        let system = DeepResearchSystem::new(
            Arc::new(ResearchSession::new(Arc::new(StubSearch::default()))),
            None,
            UserProfile::default(),
        );
        AppState::new(config, system).unwrap()
    }

    pub(crate) async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_unknown_route() {
        let response = create_router(test_state())
            .oneshot(Request::get("/api/nope").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_error_response_shape() {
        let response = AppError::NotFound("Tool not found: x".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(response).await["error"], "Not found: Tool not found: x");
    }

    #[tokio::test]
    async fn test_cors_allows_configured_origin() {
        let response = create_router(test_state())
            .oneshot(
                Request::get("/api/health")
                    .header("origin", "http://localhost:5173")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(
            response.headers()["access-control-allow-origin"],
            "http://localhost:5173"
        );
    }
}
