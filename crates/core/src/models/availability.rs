use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FreeSlotsResponse {
    pub dentist_id: Uuid,
    pub date: NaiveDate,
    pub duration_minutes: i64,
    pub closed: bool,
    /// Slot start times formatted as `HH:MM`.
    pub slots: Vec<String>,
    pub message: Option<String>,
}
