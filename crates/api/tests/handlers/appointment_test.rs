use std::future::IntoFuture;

use axum::http::StatusCode;
use dentalsync_api::middleware::context::ACTOR_ROLE_HEADER;
use dentalsync_core::models::appointment::{AppointmentResponse, AppointmentStatus};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use uuid::Uuid;

use crate::test_utils::{TestContext, at, future_monday, with_actor};

fn booking(ctx: &TestContext, hour: u32, minute: u32) -> Value {
    json!({
        "dentist_id": ctx.dentist.id,
        "service_id": ctx.whitening.id,
        "start": at(hour, minute),
        "patient_id": null,
        "notes": "first visit"
    })
}

async fn book_as_patient(ctx: &TestContext, hour: u32) -> AppointmentResponse {
    let response = ctx
        .as_patient(ctx.server.post("/api/appointments"))
        .json(&booking(ctx, hour, 0))
        .await;
    response.assert_status(StatusCode::CREATED);
    response.json()
}

#[tokio::test]
async fn test_patient_books_pending_appointment() {
    let ctx = TestContext::new();

    let appointment = book_as_patient(&ctx, 9).await;

    assert_eq!(appointment.status, AppointmentStatus::Pending);
    assert_eq!(appointment.patient_id, ctx.patient.id);
    assert_eq!(appointment.start, at(9, 0));
    assert_eq!(appointment.end, at(10, 0));
    assert_eq!(appointment.notes.as_deref(), Some("first visit"));
}

#[tokio::test]
async fn test_second_booking_of_same_slot_conflicts() {
    let ctx = TestContext::new();
    book_as_patient(&ctx, 9).await;

    let response = ctx
        .as_other_patient(ctx.server.post("/api/appointments"))
        .json(&booking(&ctx, 9, 30))
        .await;

    response.assert_status(StatusCode::CONFLICT);
    let body: Value = response.json();
    assert!(body["error"].as_str().unwrap().starts_with("Scheduling conflict"));
}

#[tokio::test]
async fn test_concurrent_requests_book_once() {
    let ctx = TestContext::new();

    let first = ctx
        .as_patient(ctx.server.post("/api/appointments"))
        .json(&booking(&ctx, 14, 0))
        .into_future();
    let second = ctx
        .as_other_patient(ctx.server.post("/api/appointments"))
        .json(&booking(&ctx, 14, 0))
        .into_future();
    let (first, second) = tokio::join!(first, second);

    let mut statuses = vec![first.status_code().as_u16(), second.status_code().as_u16()];
    statuses.sort();
    assert_eq!(statuses, vec![201, 409]);
}

#[tokio::test]
async fn test_booking_outside_hours_is_unprocessable() {
    let ctx = TestContext::new();

    let response = ctx
        .as_patient(ctx.server.post("/api/appointments"))
        .json(&booking(&ctx, 11, 30))
        .await;

    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_missing_actor_headers_are_unauthorized() {
    let ctx = TestContext::new();

    let response = ctx
        .server
        .post("/api/appointments")
        .json(&booking(&ctx, 9, 0))
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_unknown_role_is_unauthorized() {
    let ctx = TestContext::new();

    let response = with_actor(ctx.server.get("/api/appointments"), "dentist", Uuid::new_v4()).await;
    response.assert_status(StatusCode::UNAUTHORIZED);

    let malformed_id = ctx
        .server
        .get("/api/appointments")
        .add_header(
            axum::http::HeaderName::from_static(ACTOR_ROLE_HEADER),
            axum::http::HeaderValue::from_static("patient"),
        )
        .add_header(
            axum::http::HeaderName::from_static("x-actor-id"),
            axum::http::HeaderValue::from_static("not-a-uuid"),
        )
        .await;
    malformed_id.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_staff_books_confirmed_for_patient() {
    let ctx = TestContext::new();
    let mut request = booking(&ctx, 15, 0);
    request["patient_id"] = json!(ctx.patient.id);

    let response = ctx
        .as_staff(ctx.server.post("/api/appointments"))
        .json(&request)
        .await;

    response.assert_status(StatusCode::CREATED);
    let appointment: AppointmentResponse = response.json();
    assert_eq!(appointment.status, AppointmentStatus::Confirmed);
    assert_eq!(appointment.patient_id, ctx.patient.id);
}

#[tokio::test]
async fn test_staff_booking_without_patient_is_bad_request() {
    let ctx = TestContext::new();

    let response = ctx
        .as_staff(ctx.server.post("/api/appointments"))
        .json(&booking(&ctx, 15, 0))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_appointment_visibility() {
    let ctx = TestContext::new();
    let appointment = book_as_patient(&ctx, 9).await;
    let path = format!("/api/appointments/{}", appointment.id);

    ctx.as_patient(ctx.server.get(&path)).await.assert_status_ok();
    ctx.as_staff(ctx.server.get(&path)).await.assert_status_ok();
    ctx.as_other_patient(ctx.server.get(&path))
        .await
        .assert_status(StatusCode::FORBIDDEN);
    ctx.as_staff(ctx.server.get(&format!("/api/appointments/{}", Uuid::new_v4())))
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_cancel_frees_the_slot() {
    let ctx = TestContext::new();
    let appointment = book_as_patient(&ctx, 9).await;

    let response = ctx
        .as_patient(
            ctx.server
                .post(&format!("/api/appointments/{}/cancel", appointment.id)),
        )
        .await;
    response.assert_status_ok();
    let canceled: AppointmentResponse = response.json();
    assert_eq!(canceled.status, AppointmentStatus::Canceled);

    let rebooked = ctx
        .as_other_patient(ctx.server.post("/api/appointments"))
        .json(&booking(&ctx, 9, 0))
        .await;
    rebooked.assert_status(StatusCode::CREATED);
}

#[tokio::test]
async fn test_status_updates_are_staff_only() {
    let ctx = TestContext::new();
    let appointment = book_as_patient(&ctx, 9).await;
    let path = format!("/api/appointments/{}/status", appointment.id);

    ctx.as_patient(ctx.server.put(&path))
        .json(&json!({ "status": "confirmed" }))
        .await
        .assert_status(StatusCode::FORBIDDEN);

    let confirmed = ctx
        .as_staff(ctx.server.put(&path))
        .json(&json!({ "status": "confirmed" }))
        .await;
    confirmed.assert_status_ok();
    let body: AppointmentResponse = confirmed.json();
    assert_eq!(body.status, AppointmentStatus::Confirmed);

    ctx.as_staff(ctx.server.put(&path))
        .json(&json!({ "status": "pending" }))
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_patient_lists_own_appointments() {
    let ctx = TestContext::new();
    book_as_patient(&ctx, 9).await;
    book_as_patient(&ctx, 14).await;
    ctx.existing(at(16, 0), 60).await;

    let appointments: Vec<AppointmentResponse> = ctx
        .as_patient(ctx.server.get("/api/appointments"))
        .await
        .json();

    assert_eq!(appointments.len(), 2);
    assert!(appointments.iter().all(|a| a.patient_id == ctx.patient.id));
}

#[tokio::test]
async fn test_staff_agenda_is_ordered() {
    let ctx = TestContext::new();
    book_as_patient(&ctx, 14).await;
    ctx.existing(at(8, 0), 60).await;
    let path = format!(
        "/api/dentists/{}/agenda?date={}",
        ctx.dentist.id,
        future_monday()
    );

    let response = ctx.as_staff(ctx.server.get(&path)).await;
    response.assert_status_ok();
    let agenda: Vec<AppointmentResponse> = response.json();
    let starts: Vec<_> = agenda.iter().map(|a| a.start).collect();
    assert_eq!(starts, vec![at(8, 0), at(14, 0)]);

    ctx.as_patient(ctx.server.get(&path))
        .await
        .assert_status(StatusCode::FORBIDDEN);
}
