use chrono::{DateTime, NaiveDateTime, NaiveTime, Utc};
use dentalsync_core::{
    errors::{DentalError, DentalResult},
    models::{
        appointment::Appointment,
        catalog::{Dentist, Patient, Service},
        clinic::Shift,
    },
};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbAppointment {
    pub id: Uuid,
    pub dentist_id: Uuid,
    pub patient_id: Uuid,
    pub service_id: Uuid,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    pub status: String,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<DbAppointment> for Appointment {
    type Error = DentalError;

    fn try_from(row: DbAppointment) -> DentalResult<Self> {
        Ok(Appointment {
            id: row.id,
            dentist_id: row.dentist_id,
            patient_id: row.patient_id,
            service_id: row.service_id,
            start_time: row.start_time,
            end_time: row.end_time,
            status: row.status.parse()?,
            notes: row.notes,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbDentist {
    pub id: Uuid,
    pub name: String,
    pub registration: String,
    pub specialty: Option<String>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<DbDentist> for Dentist {
    fn from(row: DbDentist) -> Self {
        Dentist {
            id: row.id,
            name: row.name,
            registration: row.registration,
            specialty: row.specialty,
            active: row.active,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbService {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub duration_minutes: i32,
    pub price_cents: i64,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<DbService> for Service {
    fn from(row: DbService) -> Self {
        Service {
            id: row.id,
            name: row.name,
            description: row.description,
            duration_minutes: i64::from(row.duration_minutes),
            price_cents: row.price_cents,
            active: row.active,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbPatient {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<DbPatient> for Patient {
    fn from(row: DbPatient) -> Self {
        Patient {
            id: row.id,
            name: row.name,
            email: row.email,
            phone: row.phone,
            active: row.active,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbClinicSettings {
    pub id: i16,
    pub clinic_name: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub slot_minutes: i32,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbClinicShift {
    pub id: Uuid,
    /// Days from Monday, 0 through 6.
    pub weekday: i16,
    pub opens: NaiveTime,
    pub closes: NaiveTime,
}

impl TryFrom<DbClinicShift> for Shift {
    type Error = DentalError;

    fn try_from(row: DbClinicShift) -> DentalResult<Self> {
        Shift::new(row.opens, row.closes)
    }
}
