use axum::{
    Router,
    routing::{delete, get, post, put},
};
use std::sync::Arc;

use crate::{ApiState, handlers};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route(
            "/api/appointments",
            post(handlers::appointment::create_appointment),
        )
        .route(
            "/api/appointments/:id",
            get(handlers::appointment::get_appointment),
        )
        .route(
            "/api/appointments/:id",
            put(handlers::appointment::update_appointment),
        )
        .route(
            "/api/appointments/:id",
            delete(handlers::appointment::delete_appointment),
        )
        .route(
            "/api/appointments/:id/status",
            post(handlers::appointment::transition_status),
        )
}
