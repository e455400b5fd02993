//! Collaborators the availability engine and booking service depend on.
//!
//! The engine never talks to a database directly. It reads appointments,
//! opening hours and reference data through these traits, which are
//! implemented by the PostgreSQL store in `dentalsync-db` and by
//! [`memory::InMemoryStore`] for tests and local runs.

pub mod memory;

use async_trait::async_trait;
use chrono::{NaiveDate, Weekday};
use uuid::Uuid;

use crate::{
    errors::DentalResult,
    models::{
        appointment::{Appointment, AppointmentStatus, NewAppointment},
        catalog::{Dentist, Patient, Service},
        clinic::DaySchedule,
    },
};

#[async_trait]
pub trait AppointmentStore: Send + Sync {
    /// All appointments of a dentist that start on `date`, any status,
    /// ordered by start time.
    async fn list(&self, dentist_id: Uuid, date: NaiveDate) -> DentalResult<Vec<Appointment>>;

    /// Persists an appointment. Fails with `DentalError::Conflict` when the
    /// store itself detects an overlapping non-canceled appointment.
    async fn insert(&self, appointment: NewAppointment) -> DentalResult<Appointment>;

    /// Marks an appointment canceled. Fails with `DentalError::NotFound`, or
    /// `DentalError::Validation` if it is no longer pending or confirmed.
    async fn cancel(&self, id: Uuid) -> DentalResult<Appointment>;

    async fn get(&self, id: Uuid) -> DentalResult<Option<Appointment>>;

    /// Moves an appointment to `status` only if that is legal from its
    /// current status at the moment of the write.
    async fn update_status(&self, id: Uuid, status: AppointmentStatus) -> DentalResult<Appointment>;

    /// A patient's appointments, most recent first.
    async fn list_for_patient(&self, patient_id: Uuid) -> DentalResult<Vec<Appointment>>;
}

#[async_trait]
pub trait ClinicConfiguration: Send + Sync {
    /// Opening hours for a weekday, `None` when the clinic is closed.
    async fn schedule_for(&self, weekday: Weekday) -> DentalResult<Option<DaySchedule>>;
}

#[async_trait]
pub trait Catalog: Send + Sync {
    async fn dentist(&self, id: Uuid) -> DentalResult<Option<Dentist>>;

    async fn service(&self, id: Uuid) -> DentalResult<Option<Service>>;

    async fn patient(&self, id: Uuid) -> DentalResult<Option<Patient>>;
}
