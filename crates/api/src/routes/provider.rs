use axum::{
    Router,
    routing::{delete, get, post, put},
};
use std::sync::Arc;

use crate::{ApiState, handlers};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/api/providers", post(handlers::provider::create_provider))
        .route("/api/providers/:id", get(handlers::provider::get_provider))
        .route(
            "/api/providers/:id/template",
            put(handlers::provider::set_template),
        )
        .route(
            "/api/providers/:id/template",
            get(handlers::provider::get_template),
        )
        .route(
            "/api/providers/:id/exceptions",
            post(handlers::provider::create_exception),
        )
        .route(
            "/api/providers/:id/exceptions",
            get(handlers::provider::list_exceptions),
        )
        .route(
            "/api/exceptions/:id",
            delete(handlers::provider::delete_exception),
        )
        .route("/api/pets", post(handlers::provider::create_pet))
}
