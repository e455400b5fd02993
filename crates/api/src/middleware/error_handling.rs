//! # Error Handling Middleware
//!
//! Maps domain errors to HTTP status codes and a JSON body of the form
//! `{"error": "<message>"}`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use dentalsync_core::errors::DentalError;
use serde_json::json;
use tracing::error;

/// Application error wrapper that provides HTTP status code mapping
///
/// Handlers return `Result<_, AppError>` and use `?` on anything producing a
/// [`DentalError`] or an `eyre::Report`.
#[derive(Debug)]
pub struct AppError(pub DentalError);

impl AppError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            DentalError::InvalidDuration(_) => StatusCode::BAD_REQUEST,
            DentalError::Validation(_) => StatusCode::BAD_REQUEST,
            DentalError::OutOfHours(_) => StatusCode::UNPROCESSABLE_ENTITY,
            DentalError::Conflict(_) => StatusCode::CONFLICT,
            DentalError::NotFound(_) => StatusCode::NOT_FOUND,
            DentalError::Authentication(_) => StatusCode::UNAUTHORIZED,
            DentalError::Authorization(_) => StatusCode::FORBIDDEN,
            DentalError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            DentalError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("Request failed: {:?}", self.0);
        }

        let body = Json(json!({ "error": self.0.to_string() }));
        (status, body).into_response()
    }
}

impl From<DentalError> for AppError {
    fn from(err: DentalError) -> Self {
        AppError(err)
    }
}

/// Wraps the report in `DentalError::Database`.
impl From<eyre::Report> for AppError {
    fn from(err: eyre::Report) -> Self {
        AppError(DentalError::Database(err))
    }
}

/// Maps a DentalError to an HTTP response
pub fn map_error(err: DentalError) -> Response {
    AppError(err).into_response()
}
