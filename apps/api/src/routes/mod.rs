pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::intake::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/resumes/extract", post(handlers::handle_extract))
        .route(
            "/api/v1/applications/:id/parse",
            post(handlers::handle_parse),
        )
        .route(
            "/api/v1/applications/:id/approve",
            post(handlers::handle_approve),
        )
        .with_state(state)
}
