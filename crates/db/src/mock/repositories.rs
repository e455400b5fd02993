use async_trait::async_trait;
use chrono::{NaiveDate, Weekday};
use dentalsync_core::{
    errors::DentalResult,
    models::{
        appointment::{Appointment, AppointmentStatus, NewAppointment},
        catalog::{Dentist, Patient, Service},
        clinic::DaySchedule,
    },
    store::{AppointmentStore, Catalog, ClinicConfiguration},
};
use mockall::mock;
use uuid::Uuid;

// Mock stores for testing the engine without a database
mock! {
    pub AppointmentRepo {}

    #[async_trait]
    impl AppointmentStore for AppointmentRepo {
        async fn list(&self, dentist_id: Uuid, date: NaiveDate) -> DentalResult<Vec<Appointment>>;
        async fn insert(&self, appointment: NewAppointment) -> DentalResult<Appointment>;
        async fn cancel(&self, id: Uuid) -> DentalResult<Appointment>;
        async fn get(&self, id: Uuid) -> DentalResult<Option<Appointment>>;
        async fn update_status(&self, id: Uuid, status: AppointmentStatus) -> DentalResult<Appointment>;
        async fn list_for_patient(&self, patient_id: Uuid) -> DentalResult<Vec<Appointment>>;
    }
}

mock! {
    pub ClinicConfigRepo {}

    #[async_trait]
    impl ClinicConfiguration for ClinicConfigRepo {
        async fn schedule_for(&self, weekday: Weekday) -> DentalResult<Option<DaySchedule>>;
    }
}

mock! {
    pub CatalogRepo {}

    #[async_trait]
    impl Catalog for CatalogRepo {
        async fn dentist(&self, id: Uuid) -> DentalResult<Option<Dentist>>;
        async fn service(&self, id: Uuid) -> DentalResult<Option<Service>>;
        async fn patient(&self, id: Uuid) -> DentalResult<Option<Patient>>;
    }
}
