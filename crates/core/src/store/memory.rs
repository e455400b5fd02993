use std::{
    collections::HashMap,
    sync::{Mutex, MutexGuard},
};

use async_trait::async_trait;
use chrono::{NaiveDate, Utc, Weekday};
use uuid::Uuid;

use super::{AppointmentStore, Catalog, ClinicConfiguration};
use crate::{
    errors::{DentalError, DentalResult},
    models::{
        appointment::{Appointment, AppointmentStatus, NewAppointment},
        catalog::{Dentist, Patient, Service},
        clinic::{DaySchedule, WeeklySchedule},
    },
};

#[derive(Default)]
struct State {
    appointments: HashMap<Uuid, Appointment>,
    dentists: HashMap<Uuid, Dentist>,
    services: HashMap<Uuid, Service>,
    patients: HashMap<Uuid, Patient>,
    schedule: WeeklySchedule,
}

/// Process-local store backing every collaborator trait.
///
/// `insert` rejects overlapping non-canceled appointments for the same
/// dentist, the same guarantee the PostgreSQL exclusion constraint gives.
#[derive(Default)]
pub struct InMemoryStore {
    state: Mutex<State>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_schedule(schedule: WeeklySchedule) -> Self {
        Self {
            state: Mutex::new(State {
                schedule,
                ..Default::default()
            }),
        }
    }

    fn state(&self) -> DentalResult<MutexGuard<'_, State>> {
        self.state
            .lock()
            .map_err(|_| DentalError::Internal("in-memory store lock poisoned".into()))
    }

    pub fn set_schedule(&self, schedule: WeeklySchedule) -> DentalResult<()> {
        self.state()?.schedule = schedule;
        Ok(())
    }

    pub fn add_dentist(&self, dentist: Dentist) -> DentalResult<()> {
        self.state()?.dentists.insert(dentist.id, dentist);
        Ok(())
    }

    pub fn add_service(&self, service: Service) -> DentalResult<()> {
        self.state()?.services.insert(service.id, service);
        Ok(())
    }

    pub fn add_patient(&self, patient: Patient) -> DentalResult<()> {
        self.state()?.patients.insert(patient.id, patient);
        Ok(())
    }

    /// Compare-and-set under the state lock: the move only happens if it is
    /// legal from the status the appointment holds right now.
    fn set_status(&self, id: Uuid, status: AppointmentStatus) -> DentalResult<Appointment> {
        let mut state = self.state()?;
        let appointment = state
            .appointments
            .get_mut(&id)
            .ok_or_else(|| DentalError::NotFound(format!("Appointment with ID {} not found", id)))?;
        if !appointment.status.can_transition_to(status) {
            return Err(appointment.status.transition_error(status));
        }
        appointment.status = status;
        appointment.updated_at = Utc::now();
        Ok(appointment.clone())
    }
}

#[async_trait]
impl AppointmentStore for InMemoryStore {
    async fn list(&self, dentist_id: Uuid, date: NaiveDate) -> DentalResult<Vec<Appointment>> {
        let state = self.state()?;
        let mut appointments: Vec<Appointment> = state
            .appointments
            .values()
            .filter(|a| a.dentist_id == dentist_id && a.date() == date)
            .cloned()
            .collect();
        appointments.sort_by_key(|a| a.start_time);
        Ok(appointments)
    }

    async fn insert(&self, appointment: NewAppointment) -> DentalResult<Appointment> {
        let mut state = self.state()?;

        let requested = appointment.range();
        let clash = state.appointments.values().any(|existing| {
            existing.dentist_id == appointment.dentist_id
                && existing.status.blocks_time()
                && existing.range().overlaps(&requested)
        });
        if clash && appointment.status.blocks_time() {
            return Err(DentalError::Conflict(
                "The dentist already has an appointment in this time range".to_string(),
            ));
        }

        let created = appointment.into_appointment(Uuid::new_v4(), Utc::now());
        state.appointments.insert(created.id, created.clone());
        Ok(created)
    }

    async fn cancel(&self, id: Uuid) -> DentalResult<Appointment> {
        self.set_status(id, AppointmentStatus::Canceled)
    }

    async fn get(&self, id: Uuid) -> DentalResult<Option<Appointment>> {
        Ok(self.state()?.appointments.get(&id).cloned())
    }

    async fn update_status(&self, id: Uuid, status: AppointmentStatus) -> DentalResult<Appointment> {
        self.set_status(id, status)
    }

    async fn list_for_patient(&self, patient_id: Uuid) -> DentalResult<Vec<Appointment>> {
        let state = self.state()?;
        let mut appointments: Vec<Appointment> = state
            .appointments
            .values()
            .filter(|a| a.patient_id == patient_id)
            .cloned()
            .collect();
        appointments.sort_by(|a, b| b.start_time.cmp(&a.start_time));
        Ok(appointments)
    }
}

#[async_trait]
impl ClinicConfiguration for InMemoryStore {
    async fn schedule_for(&self, weekday: Weekday) -> DentalResult<Option<DaySchedule>> {
        Ok(self.state()?.schedule.day(weekday).cloned())
    }
}

#[async_trait]
impl Catalog for InMemoryStore {
    async fn dentist(&self, id: Uuid) -> DentalResult<Option<Dentist>> {
        Ok(self.state()?.dentists.get(&id).cloned())
    }

    async fn service(&self, id: Uuid) -> DentalResult<Option<Service>> {
        Ok(self.state()?.services.get(&id).cloned())
    }

    async fn patient(&self, id: Uuid) -> DentalResult<Option<Patient>> {
        Ok(self.state()?.patients.get(&id).cloned())
    }
}
