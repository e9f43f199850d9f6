use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;

use crate::{ApiState, handlers};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route(
            "/api/availability",
            get(handlers::availability::query_available_providers),
        )
        .route(
            "/api/providers/:id/availability",
            get(handlers::availability::query_provider_availability),
        )
        .route(
            "/api/providers/:id/availability/generate",
            post(handlers::availability::generate_availability),
        )
}
