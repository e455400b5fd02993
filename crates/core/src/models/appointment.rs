use std::{fmt, str::FromStr};

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{errors::DentalError, interval::TimeRange};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatus {
    Pending,
    Confirmed,
    Completed,
    Canceled,
}

impl AppointmentStatus {
    pub const ALL: [AppointmentStatus; 4] = [
        AppointmentStatus::Pending,
        AppointmentStatus::Confirmed,
        AppointmentStatus::Completed,
        AppointmentStatus::Canceled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AppointmentStatus::Pending => "pending",
            AppointmentStatus::Confirmed => "confirmed",
            AppointmentStatus::Completed => "completed",
            AppointmentStatus::Canceled => "canceled",
        }
    }

    /// Every status except `Canceled` keeps the dentist's time reserved.
    pub fn blocks_time(&self) -> bool {
        !matches!(self, AppointmentStatus::Canceled)
    }

    /// Pending and confirmed appointments are still ahead of the patient.
    pub fn is_scheduled(&self) -> bool {
        matches!(self, AppointmentStatus::Pending | AppointmentStatus::Confirmed)
    }

    pub fn can_transition_to(&self, next: AppointmentStatus) -> bool {
        use AppointmentStatus::*;
        matches!(
            (self, next),
            (Pending, Confirmed) | (Pending, Completed) | (Pending, Canceled)
                | (Confirmed, Completed) | (Confirmed, Canceled)
        )
    }

    /// Statuses an appointment may be in for a move to `next` to be legal.
    pub fn predecessors_of(next: AppointmentStatus) -> Vec<AppointmentStatus> {
        Self::ALL
            .into_iter()
            .filter(|status| status.can_transition_to(next))
            .collect()
    }

    pub fn transition_error(&self, next: AppointmentStatus) -> DentalError {
        DentalError::Validation(format!(
            "Cannot move an appointment from {} to {}",
            self, next
        ))
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AppointmentStatus {
    type Err = DentalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(AppointmentStatus::Pending),
            "confirmed" => Ok(AppointmentStatus::Confirmed),
            "completed" => Ok(AppointmentStatus::Completed),
            "canceled" => Ok(AppointmentStatus::Canceled),
            other => Err(DentalError::Validation(format!(
                "Unknown appointment status: {}",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: Uuid,
    pub dentist_id: Uuid,
    pub patient_id: Uuid,
    pub service_id: Uuid,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    pub status: AppointmentStatus,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Appointment {
    pub fn range(&self) -> TimeRange {
        TimeRange::new(self.start_time, self.end_time)
    }

    pub fn duration_minutes(&self) -> i64 {
        (self.end_time - self.start_time).num_minutes()
    }

    pub fn date(&self) -> NaiveDate {
        self.start_time.date()
    }
}

/// An appointment that has passed validation and is ready to be persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct NewAppointment {
    pub dentist_id: Uuid,
    pub patient_id: Uuid,
    pub service_id: Uuid,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    pub status: AppointmentStatus,
    pub notes: Option<String>,
}

impl NewAppointment {
    pub fn range(&self) -> TimeRange {
        TimeRange::new(self.start_time, self.end_time)
    }

    pub fn into_appointment(self, id: Uuid, now: DateTime<Utc>) -> Appointment {
        Appointment {
            id,
            dentist_id: self.dentist_id,
            patient_id: self.patient_id,
            service_id: self.service_id,
            start_time: self.start_time,
            end_time: self.end_time,
            status: self.status,
            notes: self.notes,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookAppointmentRequest {
    pub dentist_id: Uuid,
    pub service_id: Uuid,
    pub start: NaiveDateTime,
    /// Required when staff books on behalf of a patient, ignored otherwise.
    pub patient_id: Option<Uuid>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppointmentResponse {
    pub id: Uuid,
    pub dentist_id: Uuid,
    pub patient_id: Uuid,
    pub service_id: Uuid,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub status: AppointmentStatus,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Appointment> for AppointmentResponse {
    fn from(appointment: Appointment) -> Self {
        Self {
            id: appointment.id,
            dentist_id: appointment.dentist_id,
            patient_id: appointment.patient_id,
            service_id: appointment.service_id,
            start: appointment.start_time,
            end: appointment.end_time,
            status: appointment.status,
            notes: appointment.notes,
            created_at: appointment.created_at,
            updated_at: appointment.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: AppointmentStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingCheckRequest {
    pub dentist_id: Uuid,
    pub start: NaiveDateTime,
    pub duration_minutes: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingCheckResponse {
    pub available: bool,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl BookingCheckResponse {
    pub fn available(range: TimeRange) -> Self {
        Self {
            available: true,
            start: range.start,
            end: range.end,
        }
    }
}
