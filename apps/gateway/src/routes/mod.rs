pub mod health;
pub mod tools;

use axum::{
    routing::{get, post},
    Router,
};

use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/tools", get(tools::handle_list_tools))
        .route("/api/v1/tools/:name", post(tools::handle_call_tool))
        .with_state(state)
}
