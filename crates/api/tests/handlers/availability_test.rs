use axum::http::StatusCode;
use chrono::Duration;
use dentalsync_core::models::{
    appointment::BookingCheckResponse, availability::FreeSlotsResponse,
};
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::{Value, json};
use uuid::Uuid;

use crate::test_utils::{TestContext, at, future_monday};

fn slots_url(ctx: &TestContext, query: &str) -> String {
    format!("/api/dentists/{}/slots?date={}&{}", ctx.dentist.id, future_monday(), query)
}

#[tokio::test]
async fn test_slots_for_service_on_open_day() {
    let ctx = TestContext::new();

    let response = ctx
        .server
        .get(&slots_url(&ctx, &format!("service_id={}", ctx.cleaning.id)))
        .await;

    response.assert_status_ok();
    let body: FreeSlotsResponse = response.json();
    assert!(!body.closed);
    assert_eq!(body.duration_minutes, 30);
    assert_eq!(body.slots.len(), 16);
    assert_eq!(body.slots.first().map(String::as_str), Some("08:00"));
    assert_eq!(body.slots.last().map(String::as_str), Some("17:30"));
    assert_eq!(body.message, None);
}

#[tokio::test]
async fn test_slots_exclude_booked_time() {
    let ctx = TestContext::new();
    ctx.existing(at(9, 0), 60).await;

    let body: FreeSlotsResponse = ctx
        .server
        .get(&slots_url(&ctx, "duration_minutes=60"))
        .await
        .json();

    assert_eq!(
        body.slots,
        vec!["08:00", "10:00", "10:30", "11:00", "14:00", "14:30", "15:00", "15:30", "16:00", "16:30", "17:00"]
    );
}

#[tokio::test]
async fn test_closed_day_answers_empty_list() {
    let ctx = TestContext::new();
    let sunday = future_monday() + Duration::days(6);

    let response = ctx
        .server
        .get(&format!(
            "/api/dentists/{}/slots?date={}&duration_minutes=30",
            ctx.dentist.id, sunday
        ))
        .await;

    response.assert_status_ok();
    let body: FreeSlotsResponse = response.json();
    assert!(body.closed);
    assert!(body.slots.is_empty());
    assert_eq!(body.message.as_deref(), Some("Clinic closed on this day"));
}

#[rstest]
#[case("duration_minutes=0", StatusCode::BAD_REQUEST)]
#[case("duration_minutes=-30", StatusCode::BAD_REQUEST)]
#[case("duration_minutes=45", StatusCode::BAD_REQUEST)]
#[case("", StatusCode::BAD_REQUEST)]
#[case("duration_minutes=299999999999999990", StatusCode::BAD_REQUEST)]
#[case("duration_minutes=300000000000000000", StatusCode::BAD_REQUEST)]
#[tokio::test]
async fn test_invalid_slot_queries(#[case] query: &str, #[case] expected: StatusCode) {
    let ctx = TestContext::new();

    let response = ctx.server.get(&slots_url(&ctx, query)).await;

    response.assert_status(expected);
    let body: Value = response.json();
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_slots_for_unknown_dentist() {
    let ctx = TestContext::new();

    let response = ctx
        .server
        .get(&format!(
            "/api/dentists/{}/slots?date={}&duration_minutes=30",
            Uuid::new_v4(),
            future_monday()
        ))
        .await;

    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_booking_check_outcomes() {
    let ctx = TestContext::new();
    ctx.existing(at(9, 0), 60).await;

    let free = ctx
        .server
        .post("/api/bookings/check")
        .json(&json!({ "dentist_id": ctx.dentist.id, "start": at(10, 0), "duration_minutes": 30 }))
        .await;
    free.assert_status_ok();
    let body: BookingCheckResponse = free.json();
    assert!(body.available);
    assert_eq!(body.end, at(10, 30));

    let adjacent = ctx
        .server
        .post("/api/bookings/check")
        .json(&json!({ "dentist_id": ctx.dentist.id, "start": at(8, 59), "duration_minutes": 1 }))
        .await;
    adjacent.assert_status(StatusCode::OK);

    let conflict = ctx
        .server
        .post("/api/bookings/check")
        .json(&json!({ "dentist_id": ctx.dentist.id, "start": at(9, 59), "duration_minutes": 1 }))
        .await;
    conflict.assert_status(StatusCode::CONFLICT);

    let after_hours = ctx
        .server
        .post("/api/bookings/check")
        .json(&json!({ "dentist_id": ctx.dentist.id, "start": at(11, 30), "duration_minutes": 60 }))
        .await;
    after_hours.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_booking_check_with_unrepresentable_duration() {
    let ctx = TestContext::new();

    let response = ctx
        .server
        .post("/api/bookings/check")
        .json(&json!({
            "dentist_id": ctx.dentist.id,
            "start": at(9, 0),
            "duration_minutes": 1_000_000_000_000_000_i64
        }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert!(body["error"].is_string());

    // The server is still answering afterwards.
    ctx.server
        .post("/api/bookings/check")
        .json(&json!({ "dentist_id": ctx.dentist.id, "start": at(9, 0), "duration_minutes": 30 }))
        .await
        .assert_status_ok();
}
