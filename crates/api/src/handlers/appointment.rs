//! # Appointment Handlers
//!
//! Booking and the rest of the appointment lifecycle. Every handler takes the
//! caller's [`Context`] and passes it to the booking service, which decides
//! what the actor may do.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::NaiveDate;
use dentalsync_core::models::appointment::{
    AppointmentResponse, BookAppointmentRequest, UpdateStatusRequest,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    ApiState,
    middleware::{context::Context, error_handling::AppError},
};

#[derive(Debug, Deserialize)]
pub struct AgendaQuery {
    pub date: NaiveDate,
}

/// `POST /api/appointments`
#[axum::debug_handler]
pub async fn book_appointment(
    State(state): State<Arc<ApiState>>,
    Context(ctx): Context,
    Json(request): Json<BookAppointmentRequest>,
) -> Result<(StatusCode, Json<AppointmentResponse>), AppError> {
    let appointment = state.booking.book(&ctx, request).await?;
    Ok((StatusCode::CREATED, Json(appointment.into())))
}

/// `GET /api/appointments`, the calling patient's own appointments.
#[axum::debug_handler]
pub async fn list_appointments(
    State(state): State<Arc<ApiState>>,
    Context(ctx): Context,
) -> Result<Json<Vec<AppointmentResponse>>, AppError> {
    let appointments = state.booking.list_for_patient(&ctx).await?;
    Ok(Json(appointments.into_iter().map(Into::into).collect()))
}

#[axum::debug_handler]
pub async fn get_appointment(
    State(state): State<Arc<ApiState>>,
    Context(ctx): Context,
    Path(id): Path<Uuid>,
) -> Result<Json<AppointmentResponse>, AppError> {
    let appointment = state.booking.get(&ctx, id).await?;
    Ok(Json(appointment.into()))
}

#[axum::debug_handler]
pub async fn cancel_appointment(
    State(state): State<Arc<ApiState>>,
    Context(ctx): Context,
    Path(id): Path<Uuid>,
) -> Result<Json<AppointmentResponse>, AppError> {
    let appointment = state.booking.cancel(&ctx, id).await?;
    Ok(Json(appointment.into()))
}

/// `PUT /api/appointments/:id/status`, staff only.
#[axum::debug_handler]
pub async fn update_status(
    State(state): State<Arc<ApiState>>,
    Context(ctx): Context,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateStatusRequest>,
) -> Result<Json<AppointmentResponse>, AppError> {
    let appointment = state.booking.update_status(&ctx, id, request.status).await?;
    Ok(Json(appointment.into()))
}

/// `GET /api/dentists/:id/agenda?date=YYYY-MM-DD`, staff only.
#[axum::debug_handler]
pub async fn dentist_agenda(
    State(state): State<Arc<ApiState>>,
    Context(ctx): Context,
    Path(dentist_id): Path<Uuid>,
    Query(query): Query<AgendaQuery>,
) -> Result<Json<Vec<AppointmentResponse>>, AppError> {
    let appointments = state.booking.agenda(&ctx, dentist_id, query.date).await?;
    Ok(Json(appointments.into_iter().map(Into::into).collect()))
}
