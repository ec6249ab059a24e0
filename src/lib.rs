// Deep Research - multi-step web research with planning, source scoring and synthesis

pub mod agents;
pub mod config;
pub mod llm;
pub mod models;
pub mod research;
pub mod routes;
pub mod search;
pub mod tools;
pub mod types;

// Re-exports for convenience
pub use agents::DeepResearchSystem;
pub use config::Config;
pub use models::AppState;

pub fn create_router(state: AppState) -> axum::Router {
    routes::create_router(state)
}
