use axum::{
    Router,
    routing::{get, post, put},
};
use std::sync::Arc;

use crate::{ApiState, handlers::appointment};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route(
            "/api/appointments",
            post(appointment::book_appointment).get(appointment::list_appointments),
        )
        .route("/api/appointments/:id", get(appointment::get_appointment))
        .route(
            "/api/appointments/:id/cancel",
            post(appointment::cancel_appointment),
        )
        .route(
            "/api/appointments/:id/status",
            put(appointment::update_status),
        )
        .route(
            "/api/dentists/:id/agenda",
            get(appointment::dentist_agenda),
        )
}
