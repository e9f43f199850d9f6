use chrono::NaiveDate;
use mockall::mock;
use uuid::Uuid;

use crate::models::{DbAppointment, DbAvailabilitySnapshot, DbPet, DbProvider, DbScheduleException};
use crate::repositories::appointment::AppointmentWrite;
use vetbook_core::models::appointment::Appointment;
use vetbook_core::models::availability::AvailabilitySnapshot;
use vetbook_core::models::schedule::{DayConfig, WeeklyTemplate};

// Mock repositories for testing
mock! {
    pub ProviderRepo {
        pub async fn create_provider(&self, name: &'static str) -> eyre::Result<DbProvider>;

        pub async fn get_provider_by_id(&self, id: Uuid) -> eyre::Result<Option<DbProvider>>;

        pub async fn list_active_providers(&self) -> eyre::Result<Vec<DbProvider>>;

        pub async fn create_pet(
            &self,
            owner_id: Uuid,
            name: &'static str,
        ) -> eyre::Result<DbPet>;

        pub async fn get_pet_by_id(&self, id: Uuid) -> eyre::Result<Option<DbPet>>;
    }
}

mock! {
    pub TemplateRepo {
        pub async fn set_template(
            &self,
            provider_id: Uuid,
            days: Vec<DayConfig>,
        ) -> eyre::Result<WeeklyTemplate>;

        pub async fn get_latest_template(
            &self,
            provider_id: Uuid,
        ) -> eyre::Result<Option<WeeklyTemplate>>;
    }
}

mock! {
    pub ExceptionRepo {
        pub async fn create_exception(
            &self,
            provider_id: Uuid,
            date: NaiveDate,
            reason: &'static str,
            all_day: bool,
            start_minutes: Option<i32>,
            end_minutes: Option<i32>,
        ) -> eyre::Result<DbScheduleException>;

        pub async fn get_exception_for_date(
            &self,
            provider_id: Uuid,
            date: NaiveDate,
        ) -> eyre::Result<Option<DbScheduleException>>;

        pub async fn list_exceptions(
            &self,
            provider_id: Uuid,
        ) -> eyre::Result<Vec<DbScheduleException>>;

        pub async fn delete_exception(&self, id: Uuid) -> eyre::Result<bool>;
    }
}

mock! {
    pub AppointmentRepo {
        pub async fn create_appointment(
            &self,
            appointment: Appointment,
        ) -> eyre::Result<AppointmentWrite>;

        pub async fn get_appointment_by_id(
            &self,
            id: Uuid,
        ) -> eyre::Result<Option<DbAppointment>>;

        pub async fn get_active_appointments(
            &self,
            provider_id: Uuid,
            date: NaiveDate,
        ) -> eyre::Result<Vec<DbAppointment>>;

        pub async fn update_appointment(
            &self,
            appointment: Appointment,
        ) -> eyre::Result<AppointmentWrite>;

        pub async fn update_status(
            &self,
            appointment: Appointment,
        ) -> eyre::Result<DbAppointment>;

        pub async fn delete_appointment(&self, id: Uuid) -> eyre::Result<bool>;
    }
}

mock! {
    pub SnapshotRepo {
        pub async fn upsert_snapshot(
            &self,
            snapshot: AvailabilitySnapshot,
        ) -> eyre::Result<DbAvailabilitySnapshot>;

        pub async fn get_snapshot(
            &self,
            provider_id: Uuid,
            date: NaiveDate,
        ) -> eyre::Result<Option<DbAvailabilitySnapshot>>;
    }
}
