use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Who is performing a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "role", content = "id", rename_all = "lowercase")]
pub enum Actor {
    Patient(Uuid),
    Staff(Uuid),
}

impl Actor {
    pub fn id(&self) -> Uuid {
        match self {
            Actor::Patient(id) | Actor::Staff(id) => *id,
        }
    }

    pub fn role(&self) -> &'static str {
        match self {
            Actor::Patient(_) => "patient",
            Actor::Staff(_) => "staff",
        }
    }
}

/// Request-scoped context handed to every booking operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestContext {
    pub actor: Actor,
    /// Clinic wall clock at the time the request was received.
    pub now: NaiveDateTime,
}

impl RequestContext {
    pub fn new(actor: Actor, now: NaiveDateTime) -> Self {
        Self { actor, now }
    }

    pub fn at_local_now(actor: Actor) -> Self {
        Self::new(actor, Local::now().naive_local())
    }
}
