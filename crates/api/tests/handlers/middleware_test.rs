use std::collections::HashMap;

use axum::http::{Request, StatusCode, request::Parts};
use dentalsync_api::{
    config::ApiConfig,
    middleware::{context::actor_from_parts, error_handling::map_error},
};
use dentalsync_core::{errors::DentalError, models::context::Actor};
use pretty_assertions::assert_eq;
use rstest::rstest;
use tracing::Level;
use uuid::Uuid;

#[rstest]
#[case(DentalError::InvalidDuration("zero".into()), StatusCode::BAD_REQUEST)]
#[case(DentalError::Validation("bad".into()), StatusCode::BAD_REQUEST)]
#[case(DentalError::OutOfHours("late".into()), StatusCode::UNPROCESSABLE_ENTITY)]
#[case(DentalError::Conflict("taken".into()), StatusCode::CONFLICT)]
#[case(DentalError::NotFound("gone".into()), StatusCode::NOT_FOUND)]
#[case(DentalError::Authentication("who".into()), StatusCode::UNAUTHORIZED)]
#[case(DentalError::Authorization("no".into()), StatusCode::FORBIDDEN)]
#[case(DentalError::Database(eyre::eyre!("down")), StatusCode::INTERNAL_SERVER_ERROR)]
#[case(
    DentalError::Internal(Box::new(std::io::Error::other("boom"))),
    StatusCode::INTERNAL_SERVER_ERROR
)]
fn test_error_status_mapping(#[case] error: DentalError, #[case] expected: StatusCode) {
    assert_eq!(map_error(error).status(), expected);
}

fn parts(headers: &[(&str, &str)]) -> Parts {
    let mut builder = Request::builder().uri("/api/appointments");
    for (name, value) in headers {
        builder = builder.header(*name, *value);
    }
    builder.body(()).unwrap().into_parts().0
}

#[test]
fn test_actor_from_headers() {
    let id = Uuid::new_v4();
    let id_text = id.to_string();

    let patient = actor_from_parts(&parts(&[("x-actor-role", "patient"), ("x-actor-id", &id_text)]));
    assert_eq!(patient.unwrap(), Actor::Patient(id));

    let staff = actor_from_parts(&parts(&[("x-actor-role", "Staff"), ("x-actor-id", &id_text)]));
    assert_eq!(staff.unwrap(), Actor::Staff(id));
}

#[rstest]
#[case(&[])]
#[case(&[("x-actor-role", "patient")])]
#[case(&[("x-actor-role", "patient"), ("x-actor-id", "42")])]
#[case(&[("x-actor-role", "admin"), ("x-actor-id", "6f1c2f0e-8a6b-4b7e-9c1d-2a3b4c5d6e7f")])]
fn test_bad_actor_headers_fail_authentication(#[case] headers: &[(&str, &str)]) {
    let result = actor_from_parts(&parts(headers));
    assert!(matches!(result, Err(DentalError::Authentication(_))));
}

fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[test]
fn test_config_defaults() {
    let config = ApiConfig::from_vars(vars(&[("DATABASE_URL", "postgres://localhost/dental")])).unwrap();

    assert_eq!(config.host, "0.0.0.0");
    assert_eq!(config.port, 3000);
    assert_eq!(config.max_connections, 5);
    assert_eq!(config.log_level, Level::INFO);
    assert_eq!(config.cors_origins, None);
    assert_eq!(config.request_timeout, 30);
    assert_eq!(config.server_addr(), "0.0.0.0:3000");
}

#[test]
fn test_config_overrides() {
    let config = ApiConfig::from_vars(vars(&[
        ("DATABASE_URL", "postgres://localhost/dental"),
        ("API_HOST", "127.0.0.1"),
        ("API_PORT", "8080"),
        ("DATABASE_MAX_CONNECTIONS", "20"),
        ("LOG_LEVEL", "DEBUG"),
        ("API_CORS_ORIGINS", "http://localhost:5173, https://clinic.example.com"),
        ("API_REQUEST_TIMEOUT_SECONDS", "10"),
    ]))
    .unwrap();

    assert_eq!(config.server_addr(), "127.0.0.1:8080");
    assert_eq!(config.max_connections, 20);
    assert_eq!(config.log_level, Level::DEBUG);
    assert_eq!(
        config.cors_origins,
        Some(vec![
            "http://localhost:5173".to_string(),
            "https://clinic.example.com".to_string()
        ])
    );
    assert_eq!(config.request_timeout, 10);
}

#[test]
fn test_config_requires_database_url() {
    assert!(ApiConfig::from_vars(vars(&[])).is_err());
    assert!(
        ApiConfig::from_vars(vars(&[
            ("DATABASE_URL", "postgres://localhost/dental"),
            ("API_PORT", "not-a-port")
        ]))
        .is_err()
    );
}
