//! Extracts the acting patient or staff member from request headers.
//!
//! An upstream gateway authenticates callers and forwards their identity as
//! `x-actor-role` (`patient` or `staff`) and `x-actor-id` (a UUID). Requests
//! without both headers are rejected with 401.

use async_trait::async_trait;
use axum::{extract::FromRequestParts, http::request::Parts};
use dentalsync_core::{
    errors::DentalError,
    models::context::{Actor, RequestContext},
};
use uuid::Uuid;

use super::error_handling::AppError;

pub const ACTOR_ROLE_HEADER: &str = "x-actor-role";
pub const ACTOR_ID_HEADER: &str = "x-actor-id";

/// The request's [`RequestContext`], stamped with the clinic's local time.
#[derive(Debug, Clone, Copy)]
pub struct Context(pub RequestContext);

fn header<'a>(parts: &'a Parts, name: &str) -> Result<&'a str, DentalError> {
    parts
        .headers
        .get(name)
        .ok_or_else(|| DentalError::Authentication(format!("Missing {} header", name)))?
        .to_str()
        .map(str::trim)
        .map_err(|_| DentalError::Authentication(format!("Malformed {} header", name)))
}

pub fn actor_from_parts(parts: &Parts) -> Result<Actor, DentalError> {
    let id = Uuid::parse_str(header(parts, ACTOR_ID_HEADER)?)
        .map_err(|_| DentalError::Authentication(format!("{} must be a UUID", ACTOR_ID_HEADER)))?;

    match header(parts, ACTOR_ROLE_HEADER)?.to_ascii_lowercase().as_str() {
        "patient" => Ok(Actor::Patient(id)),
        "staff" => Ok(Actor::Staff(id)),
        other => Err(DentalError::Authentication(format!(
            "Unknown actor role '{}'",
            other
        ))),
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for Context
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let actor = actor_from_parts(parts)?;
        Ok(Context(RequestContext::at_local_now(actor)))
    }
}
