pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::quote::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Configurator API
        .route("/api/v1/catalog", get(handlers::handle_catalog))
        .route("/api/v1/layout", post(handlers::handle_layout))
        .route("/api/v1/quote", post(handlers::handle_quote))
        .route("/api/v1/quote/breakdown", post(handlers::handle_breakdown))
        .with_state(state)
}
