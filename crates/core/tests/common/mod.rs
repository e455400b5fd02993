#![allow(dead_code)]

use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime, Utc};
use dentalsync_core::{
    booking::BookingService,
    models::{
        appointment::{Appointment, AppointmentStatus, NewAppointment},
        catalog::{Dentist, Patient, Service},
        clinic::WeeklySchedule,
        context::{Actor, RequestContext},
    },
    store::{AppointmentStore, memory::InMemoryStore},
};
use fake::{
    Fake,
    faker::{internet::en::SafeEmail, name::en::Name},
};
use uuid::Uuid;

/// 2025-06-16 is a Monday.
pub fn monday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 16).unwrap()
}

pub fn saturday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 21).unwrap()
}

pub fn at(hour: u32, minute: u32) -> NaiveDateTime {
    monday().and_hms_opt(hour, minute, 0).unwrap()
}

pub fn dentist(active: bool) -> Dentist {
    Dentist {
        id: Uuid::new_v4(),
        name: format!("Dr. {}", Name().fake::<String>()),
        registration: format!("{}-SP", (10000..99999).fake::<u32>()),
        specialty: Some("General dentistry".to_string()),
        active,
        created_at: Utc::now(),
    }
}

pub fn service(duration_minutes: i64) -> Service {
    Service {
        id: Uuid::new_v4(),
        name: format!("Procedure {}", duration_minutes),
        description: None,
        duration_minutes,
        price_cents: 10_000,
        active: true,
        created_at: Utc::now(),
    }
}

pub fn patient() -> Patient {
    Patient {
        id: Uuid::new_v4(),
        name: Name().fake(),
        email: SafeEmail().fake(),
        phone: None,
        active: true,
        created_at: Utc::now(),
    }
}

/// A clinic with the default weekly hours, one dentist, two patients and
/// services of 30, 60 and 45 minutes.
pub struct Clinic {
    pub store: Arc<InMemoryStore>,
    pub booking: BookingService,
    pub dentist: Dentist,
    pub cleaning: Service,
    pub whitening: Service,
    pub filling: Service,
    pub patient: Patient,
    pub other_patient: Patient,
    pub staff_id: Uuid,
}

impl Clinic {
    pub fn new() -> Self {
        let store = Arc::new(InMemoryStore::with_schedule(WeeklySchedule::default()));

        let dentist = dentist(true);
        let cleaning = service(30);
        let whitening = service(60);
        let filling = service(45);
        let other_patient = patient();
        let patient = patient();

        store.add_dentist(dentist.clone()).unwrap();
        store.add_service(cleaning.clone()).unwrap();
        store.add_service(whitening.clone()).unwrap();
        store.add_service(filling.clone()).unwrap();
        store.add_patient(patient.clone()).unwrap();
        store.add_patient(other_patient.clone()).unwrap();

        let booking = BookingService::new(store.clone(), store.clone(), store.clone());

        Self {
            store,
            booking,
            dentist,
            cleaning,
            whitening,
            filling,
            patient,
            other_patient,
            staff_id: Uuid::new_v4(),
        }
    }

    /// The week before `monday()`, so every Monday slot is in the future.
    pub fn now(&self) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 6, 9)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    pub fn as_patient(&self) -> RequestContext {
        RequestContext::new(Actor::Patient(self.patient.id), self.now())
    }

    pub fn as_other_patient(&self) -> RequestContext {
        RequestContext::new(Actor::Patient(self.other_patient.id), self.now())
    }

    pub fn as_staff(&self) -> RequestContext {
        RequestContext::new(Actor::Staff(self.staff_id), self.now())
    }

    /// Inserts an appointment directly into the store.
    pub async fn existing(
        &self,
        start: NaiveDateTime,
        minutes: i64,
        status: AppointmentStatus,
    ) -> Appointment {
        self.store
            .insert(NewAppointment {
                dentist_id: self.dentist.id,
                patient_id: self.other_patient.id,
                service_id: self.whitening.id,
                start_time: start,
                end_time: start + chrono::Duration::minutes(minutes),
                status,
                notes: None,
            })
            .await
            .unwrap()
    }
}
