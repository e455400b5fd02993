//! PostgreSQL-backed implementation of the core collaborator traits.

use async_trait::async_trait;
use chrono::{NaiveDate, Weekday};
use dentalsync_core::{
    errors::{DentalError, DentalResult},
    models::{
        appointment::{Appointment, AppointmentStatus, NewAppointment},
        catalog::{Dentist, Patient, Service},
        clinic::{DEFAULT_GRANULARITY_MINUTES, DaySchedule, Shift},
    },
    store::{AppointmentStore, Catalog, ClinicConfiguration},
};
use uuid::Uuid;

use crate::{
    DbPool,
    repositories::{appointment, catalog, clinic},
};

#[derive(Clone)]
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

#[async_trait]
impl AppointmentStore for PgStore {
    async fn list(&self, dentist_id: Uuid, date: NaiveDate) -> DentalResult<Vec<Appointment>> {
        appointment::list_for_dentist_on(&self.pool, dentist_id, date)
            .await?
            .into_iter()
            .map(Appointment::try_from)
            .collect()
    }

    async fn insert(&self, new: NewAppointment) -> DentalResult<Appointment> {
        match appointment::insert_appointment(&self.pool, &new).await? {
            Some(row) => row.try_into(),
            None => Err(DentalError::Conflict(format!(
                "dentist {} already has an appointment between {} and {}",
                new.dentist_id, new.start_time, new.end_time
            ))),
        }
    }

    async fn cancel(&self, id: Uuid) -> DentalResult<Appointment> {
        self.update_status(id, AppointmentStatus::Canceled).await
    }

    async fn get(&self, id: Uuid) -> DentalResult<Option<Appointment>> {
        appointment::get_appointment_by_id(&self.pool, id)
            .await?
            .map(Appointment::try_from)
            .transpose()
    }

    async fn update_status(&self, id: Uuid, status: AppointmentStatus) -> DentalResult<Appointment> {
        if let Some(row) = appointment::update_appointment_status(&self.pool, id, status).await? {
            return row.try_into();
        }

        // Nothing matched: tell a missing row apart from a lost race.
        match appointment::get_appointment_by_id(&self.pool, id).await? {
            Some(row) => {
                let current = Appointment::try_from(row)?.status;
                Err(current.transition_error(status))
            }
            None => Err(DentalError::NotFound(format!("Appointment {} not found", id))),
        }
    }

    async fn list_for_patient(&self, patient_id: Uuid) -> DentalResult<Vec<Appointment>> {
        appointment::list_for_patient(&self.pool, patient_id)
            .await?
            .into_iter()
            .map(Appointment::try_from)
            .collect()
    }
}

#[async_trait]
impl ClinicConfiguration for PgStore {
    async fn schedule_for(&self, weekday: Weekday) -> DentalResult<Option<DaySchedule>> {
        let rows = clinic::get_shifts_for_weekday(&self.pool, weekday).await?;
        if rows.is_empty() {
            return Ok(None);
        }

        let granularity = clinic::get_settings(&self.pool)
            .await?
            .map(|settings| i64::from(settings.slot_minutes))
            .unwrap_or(DEFAULT_GRANULARITY_MINUTES);

        let shifts = rows
            .into_iter()
            .map(Shift::try_from)
            .collect::<DentalResult<Vec<_>>>()?;

        DaySchedule::new(shifts, granularity).map(Some)
    }
}

#[async_trait]
impl Catalog for PgStore {
    async fn dentist(&self, id: Uuid) -> DentalResult<Option<Dentist>> {
        Ok(catalog::get_dentist_by_id(&self.pool, id).await?.map(Dentist::from))
    }

    async fn service(&self, id: Uuid) -> DentalResult<Option<Service>> {
        Ok(catalog::get_service_by_id(&self.pool, id).await?.map(Service::from))
    }

    async fn patient(&self, id: Uuid) -> DentalResult<Option<Patient>> {
        Ok(catalog::get_patient_by_id(&self.pool, id).await?.map(Patient::from))
    }
}
