use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Method;
use tracing::debug;
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::supabase::SupabaseClient;

use crate::models::{Appointment, Doctor, DoctorChanges};

const DOCTORS_PATH: &str = "/rest/v1/doctors";
const APPOINTMENTS_PATH: &str = "/rest/v1/appointments";

/// Persistence operations the doctor handlers rely on.
#[async_trait]
pub trait DoctorStore: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Doctor>>;

    async fn find_by_owner(&self, user_id: &str) -> Result<Option<Doctor>>;

    async fn insert(&self, doctor: &Doctor) -> Result<Doctor>;

    /// Returns the updated record, or `None` when no record has this id.
    async fn update_by_id(&self, id: Uuid, changes: &DoctorChanges) -> Result<Option<Doctor>>;

    async fn update_by_owner(&self, user_id: &str, changes: &DoctorChanges) -> Result<Option<Doctor>>;

    /// Returns the removed record as it was before deletion.
    async fn delete_by_id(&self, id: Uuid) -> Result<Option<Doctor>>;

    async fn find_appointments(&self, doctor_id: Uuid) -> Result<Vec<Appointment>>;
}

pub struct SupabaseDoctorStore {
    supabase: SupabaseClient,
}

impl SupabaseDoctorStore {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
        }
    }

    async fn select_one(&self, query: &[(&str, String)]) -> Result<Option<Doctor>> {
        let rows: Vec<Doctor> = self.supabase.request(
            Method::GET,
            DOCTORS_PATH,
            query,
            None,
        ).await?;

        Ok(rows.into_iter().next())
    }

    async fn write(
        &self,
        method: Method,
        query: &[(&str, String)],
        body: Option<serde_json::Value>,
    ) -> Result<Option<Doctor>> {
        let rows: Vec<Doctor> = self.supabase.request_with_headers(
            method,
            DOCTORS_PATH,
            query,
            body,
            Some(SupabaseClient::representation_headers()),
        ).await?;

        Ok(rows.into_iter().next())
    }
}

#[async_trait]
impl DoctorStore for SupabaseDoctorStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Doctor>> {
        debug!("Fetching doctor {}", id);
        self.select_one(&[SupabaseClient::eq_filter("id", id)]).await
    }

    async fn find_by_owner(&self, user_id: &str) -> Result<Option<Doctor>> {
        debug!("Fetching doctor owned by {}", user_id);
        self.select_one(&[
            SupabaseClient::eq_filter("user_id", user_id),
            ("order", "created_at.asc".to_string()),
            ("limit", "1".to_string()),
        ]).await
    }

    async fn insert(&self, doctor: &Doctor) -> Result<Doctor> {
        debug!("Inserting doctor {} for {}", doctor.id, doctor.user_id);
        let body = serde_json::to_value(doctor)?;

        self.write(Method::POST, &[], Some(body))
            .await?
            .context("Failed to create doctor profile: no row returned")
    }

    async fn update_by_id(&self, id: Uuid, changes: &DoctorChanges) -> Result<Option<Doctor>> {
        debug!("Updating doctor {}", id);
        let body = serde_json::to_value(changes)?;
        self.write(Method::PATCH, &[SupabaseClient::eq_filter("id", id)], Some(body)).await
    }

    async fn update_by_owner(&self, user_id: &str, changes: &DoctorChanges) -> Result<Option<Doctor>> {
        debug!("Updating doctor owned by {}", user_id);
        let body = serde_json::to_value(changes)?;
        self.write(Method::PATCH, &[SupabaseClient::eq_filter("user_id", user_id)], Some(body)).await
    }

    async fn delete_by_id(&self, id: Uuid) -> Result<Option<Doctor>> {
        debug!("Deleting doctor {}", id);
        self.write(Method::DELETE, &[SupabaseClient::eq_filter("id", id)], None).await
    }

    async fn find_appointments(&self, doctor_id: Uuid) -> Result<Vec<Appointment>> {
        debug!("Fetching appointments for doctor {}", doctor_id);
        self.supabase.request(
            Method::GET,
            APPOINTMENTS_PATH,
            &[SupabaseClient::eq_filter("doctor_id", doctor_id)],
            None,
        ).await
    }
}
