//! # Availability Handlers
//!
//! Free slot lookup for a dentist's day and the dry-run booking check.
//! Neither endpoint requires a request context.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State},
};
use chrono::NaiveDate;
use dentalsync_core::{
    errors::DentalError,
    models::{
        appointment::{BookingCheckRequest, BookingCheckResponse},
        availability::FreeSlotsResponse,
    },
};
use serde::Deserialize;
use tracing::debug;
use uuid::Uuid;

use crate::{ApiState, middleware::error_handling::AppError};

/// Query parameters for the free slots endpoint
///
/// Exactly one of `service_id` and `duration_minutes` sizes the slots. When
/// both are given the service wins.
#[derive(Debug, Deserialize)]
pub struct SlotsQuery {
    pub date: NaiveDate,
    pub service_id: Option<Uuid>,
    pub duration_minutes: Option<i64>,
}

/// Lists free slot starts for a dentist on one day
///
/// ```text
/// GET /api/dentists/:id/slots?date=2025-06-16&service_id=<uuid>
/// GET /api/dentists/:id/slots?date=2025-06-16&duration_minutes=60
/// ```
///
/// A closed day is not an error: it answers with an empty list and
/// `closed: true`.
#[axum::debug_handler]
pub async fn free_slots(
    State(state): State<Arc<ApiState>>,
    Path(dentist_id): Path<Uuid>,
    Query(query): Query<SlotsQuery>,
) -> Result<Json<FreeSlotsResponse>, AppError> {
    let (slots, duration_minutes) = match (query.service_id, query.duration_minutes) {
        (Some(service_id), _) => {
            state
                .booking
                .free_slots_for_service(dentist_id, query.date, service_id)
                .await?
        }
        (None, Some(duration_minutes)) => {
            let slots = state
                .booking
                .free_slots(dentist_id, query.date, duration_minutes)
                .await?;
            (slots, duration_minutes)
        }
        (None, None) => {
            return Err(AppError(DentalError::Validation(
                "Either service_id or duration_minutes is required".to_string(),
            )));
        }
    };

    let times: Vec<String> = slots
        .iter()
        .map(|slot| slot.format("%H:%M").to_string())
        .collect();
    debug!(
        "{} free slots for dentist {} on {}",
        times.len(),
        dentist_id,
        query.date
    );

    let message = if slots.is_closed() {
        Some("Clinic closed on this day".to_string())
    } else if times.is_empty() {
        Some("No free slots on this day".to_string())
    } else {
        None
    };

    Ok(Json(FreeSlotsResponse {
        dentist_id,
        date: query.date,
        duration_minutes,
        closed: slots.is_closed(),
        slots: times,
        message,
    }))
}

/// Checks whether an interval could be booked right now
///
/// ```text
/// POST /api/bookings/check
/// {"dentist_id": "<uuid>", "start": "2025-06-16T09:00:00", "duration_minutes": 30}
/// ```
///
/// Answers 200 when the interval is free, otherwise the error status of the
/// failed rule (400, 422 or 409).
#[axum::debug_handler]
pub async fn check_booking(
    State(state): State<Arc<ApiState>>,
    Json(request): Json<BookingCheckRequest>,
) -> Result<Json<BookingCheckResponse>, AppError> {
    let range = state
        .booking
        .check(request.dentist_id, request.start, request.duration_minutes)
        .await?;

    Ok(Json(BookingCheckResponse::available(range)))
}
