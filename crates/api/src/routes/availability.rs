use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;

use crate::{ApiState, handlers};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route(
            "/api/dentists/:id/slots",
            get(handlers::availability::free_slots),
        )
        .route(
            "/api/bookings/check",
            post(handlers::availability::check_booking),
        )
}
