//! # Booking Service
//!
//! Caller-side rules around the availability engine: who may book, cancel and
//! update which appointment, and the atomic validate-then-insert sequence.
//!
//! Patients and staff take separate paths. A patient books for themselves,
//! only in the future, and the appointment starts out `pending`. Staff book
//! on behalf of any active patient and the appointment is `confirmed`
//! immediately.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use chrono::{NaiveDate, NaiveDateTime};
use tokio::sync::Mutex as AsyncMutex;
use tracing::{debug, info};
use uuid::Uuid;

use crate::{
    availability::{AvailabilityEngine, FreeSlots},
    errors::{DentalError, DentalResult},
    interval::TimeRange,
    models::{
        appointment::{Appointment, AppointmentStatus, BookAppointmentRequest, NewAppointment},
        catalog::{Dentist, Patient, Service},
        context::{Actor, RequestContext},
    },
    store::{AppointmentStore, Catalog, ClinicConfiguration},
};

/// One async mutex per dentist, created on first use.
#[derive(Default)]
struct DentistLocks {
    locks: Mutex<HashMap<Uuid, Arc<AsyncMutex<()>>>>,
}

impl DentistLocks {
    fn for_dentist(&self, dentist_id: Uuid) -> DentalResult<Arc<AsyncMutex<()>>> {
        let mut locks = self
            .locks
            .lock()
            .map_err(|_| DentalError::Internal("dentist lock table poisoned".into()))?;
        Ok(locks.entry(dentist_id).or_default().clone())
    }
}

#[derive(Clone)]
pub struct BookingService {
    engine: AvailabilityEngine,
    appointments: Arc<dyn AppointmentStore>,
    catalog: Arc<dyn Catalog>,
    locks: Arc<DentistLocks>,
}

impl BookingService {
    pub fn new(
        appointments: Arc<dyn AppointmentStore>,
        clinic: Arc<dyn ClinicConfiguration>,
        catalog: Arc<dyn Catalog>,
    ) -> Self {
        Self {
            engine: AvailabilityEngine::new(appointments.clone(), clinic),
            appointments,
            catalog,
            locks: Arc::new(DentistLocks::default()),
        }
    }

    pub fn engine(&self) -> &AvailabilityEngine {
        &self.engine
    }

    async fn active_dentist(&self, id: Uuid) -> DentalResult<Dentist> {
        match self.catalog.dentist(id).await? {
            Some(dentist) if dentist.active => Ok(dentist),
            _ => Err(DentalError::NotFound(format!("Dentist with ID {} not found", id))),
        }
    }

    async fn active_service(&self, id: Uuid) -> DentalResult<Service> {
        match self.catalog.service(id).await? {
            Some(service) if service.active => Ok(service),
            _ => Err(DentalError::NotFound(format!("Service with ID {} not found", id))),
        }
    }

    async fn active_patient(&self, id: Uuid) -> DentalResult<Patient> {
        match self.catalog.patient(id).await? {
            Some(patient) if patient.active => Ok(patient),
            _ => Err(DentalError::NotFound(format!("Patient with ID {} not found", id))),
        }
    }

    async fn existing(&self, id: Uuid) -> DentalResult<Appointment> {
        self.appointments
            .get(id)
            .await?
            .ok_or_else(|| DentalError::NotFound(format!("Appointment with ID {} not found", id)))
    }

    fn require_staff(ctx: &RequestContext, action: &str) -> DentalResult<()> {
        match ctx.actor {
            Actor::Staff(_) => Ok(()),
            Actor::Patient(_) => Err(DentalError::Authorization(format!(
                "Only clinic staff can {}",
                action
            ))),
        }
    }

    fn ensure_visible(ctx: &RequestContext, appointment: &Appointment) -> DentalResult<()> {
        match ctx.actor {
            Actor::Staff(_) => Ok(()),
            Actor::Patient(id) if id == appointment.patient_id => Ok(()),
            Actor::Patient(_) => Err(DentalError::Authorization(
                "This appointment belongs to another patient".to_string(),
            )),
        }
    }

    /// An active service from the catalog.
    /// Whether `[start, start + duration_minutes)` could be booked with an
    /// active dentist right now. Nothing is reserved.
    pub async fn check(
        &self,
        dentist_id: Uuid,
        start: NaiveDateTime,
        duration_minutes: i64,
    ) -> DentalResult<TimeRange> {
        self.active_dentist(dentist_id).await?;
        self.engine
            .validate_booking(dentist_id, start, duration_minutes)
            .await
    }

    /// Free slots on `date` sized to the duration of `service_id`, along with
    /// that duration in minutes.
    pub async fn free_slots_for_service(
        &self,
        dentist_id: Uuid,
        date: NaiveDate,
        service_id: Uuid,
    ) -> DentalResult<(FreeSlots, i64)> {
        self.active_dentist(dentist_id).await?;
        let service = self.active_service(service_id).await?;
        let slots = self
            .engine
            .compute_free_slots(dentist_id, date, service.duration_minutes)
            .await?;
        Ok((slots, service.duration_minutes))
    }

    /// Free slots on `date` for an explicit duration.
    pub async fn free_slots(
        &self,
        dentist_id: Uuid,
        date: NaiveDate,
        duration_minutes: i64,
    ) -> DentalResult<FreeSlots> {
        self.active_dentist(dentist_id).await?;
        self.engine
            .compute_free_slots(dentist_id, date, duration_minutes)
            .await
    }

    pub async fn book(
        &self,
        ctx: &RequestContext,
        request: BookAppointmentRequest,
    ) -> DentalResult<Appointment> {
        match ctx.actor {
            Actor::Patient(patient_id) => self.book_as_patient(ctx, patient_id, request).await,
            Actor::Staff(_) => self.book_as_staff(request).await,
        }
    }

    async fn book_as_patient(
        &self,
        ctx: &RequestContext,
        patient_id: Uuid,
        request: BookAppointmentRequest,
    ) -> DentalResult<Appointment> {
        if request.start <= ctx.now {
            return Err(DentalError::Validation(
                "Appointments can only be booked in the future".to_string(),
            ));
        }
        self.active_patient(patient_id).await?;

        self.reserve(patient_id, request, AppointmentStatus::Pending)
            .await
    }

    async fn book_as_staff(&self, request: BookAppointmentRequest) -> DentalResult<Appointment> {
        let patient_id = request.patient_id.ok_or_else(|| {
            DentalError::Validation("Staff bookings must name the patient".to_string())
        })?;
        self.active_patient(patient_id).await?;

        self.reserve(patient_id, request, AppointmentStatus::Confirmed)
            .await
    }

    /// Validates and inserts while holding the dentist's lock.
    async fn reserve(
        &self,
        patient_id: Uuid,
        request: BookAppointmentRequest,
        status: AppointmentStatus,
    ) -> DentalResult<Appointment> {
        let dentist = self.active_dentist(request.dentist_id).await?;
        let service = self.active_service(request.service_id).await?;

        let lock = self.locks.for_dentist(dentist.id)?;
        let _guard = lock.lock().await;

        let range = self
            .engine
            .validate_booking(dentist.id, request.start, service.duration_minutes)
            .await?;

        let appointment = self
            .appointments
            .insert(NewAppointment {
                dentist_id: dentist.id,
                patient_id,
                service_id: service.id,
                start_time: range.start,
                end_time: range.end,
                status,
                notes: request
                    .notes
                    .map(|notes| notes.trim().to_string())
                    .filter(|notes| !notes.is_empty()),
            })
            .await?;

        info!(
            "Booked appointment {} with {} for patient {} at {} ({})",
            appointment.id, dentist.name, patient_id, appointment.start_time, status
        );
        Ok(appointment)
    }

    pub async fn cancel(&self, ctx: &RequestContext, id: Uuid) -> DentalResult<Appointment> {
        let appointment = self.existing(id).await?;
        Self::ensure_visible(ctx, &appointment)?;

        if !appointment.status.is_scheduled() {
            return Err(DentalError::Validation(format!(
                "A {} appointment cannot be canceled",
                appointment.status
            )));
        }

        let canceled = self.appointments.cancel(id).await?;
        info!("Appointment {} canceled by {} {}", id, ctx.actor.role(), ctx.actor.id());
        Ok(canceled)
    }

    pub async fn update_status(
        &self,
        ctx: &RequestContext,
        id: Uuid,
        status: AppointmentStatus,
    ) -> DentalResult<Appointment> {
        Self::require_staff(ctx, "change an appointment's status")?;

        let appointment = self.existing(id).await?;
        if !appointment.status.can_transition_to(status) {
            return Err(appointment.status.transition_error(status));
        }

        let updated = self.appointments.update_status(id, status).await?;
        debug!("Appointment {} moved from {} to {}", id, appointment.status, status);
        Ok(updated)
    }

    pub async fn get(&self, ctx: &RequestContext, id: Uuid) -> DentalResult<Appointment> {
        let appointment = self.existing(id).await?;
        Self::ensure_visible(ctx, &appointment)?;
        Ok(appointment)
    }

    pub async fn list_for_patient(&self, ctx: &RequestContext) -> DentalResult<Vec<Appointment>> {
        match ctx.actor {
            Actor::Patient(patient_id) => self.appointments.list_for_patient(patient_id).await,
            Actor::Staff(_) => Err(DentalError::Validation(
                "Staff should use the dentist agenda to list appointments".to_string(),
            )),
        }
    }

    pub async fn agenda(
        &self,
        ctx: &RequestContext,
        dentist_id: Uuid,
        date: NaiveDate,
    ) -> DentalResult<Vec<Appointment>> {
        Self::require_staff(ctx, "view a dentist's agenda")?;
        // Inactive dentists still have a history worth showing.
        if self.catalog.dentist(dentist_id).await?.is_none() {
            return Err(DentalError::NotFound(format!(
                "Dentist with ID {} not found",
                dentist_id
            )));
        }
        self.appointments.list(dentist_id, date).await
    }
}
