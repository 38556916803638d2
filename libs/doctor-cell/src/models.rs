use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use uuid::Uuid;

use shared_models::error::AppError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Doctor {
    pub id: Uuid,
    pub user_id: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub contact: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub image: String,
    pub experience: Option<i32>,
    pub timings: Option<Value>,
    #[serde(default)]
    pub status: bool,
    pub specialization: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Doctor {
    pub fn full_name(&self) -> String {
        [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Appointment row as stored by the appointment component. Only the keys this
/// service filters on are typed; the rest is passed through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: Uuid,
    pub doctor_id: Uuid,
    #[serde(flatten)]
    pub details: serde_json::Map<String, Value>,
}

/// Text fields of the multipart create form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CreateDoctorForm {
    pub user_id: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub contact: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub experience: Option<i32>,
    pub timings: Option<Value>,
    pub status: bool,
    pub specialization: Option<String>,
}

impl CreateDoctorForm {
    pub fn from_fields(mut fields: HashMap<String, String>) -> Result<Self, DoctorError> {
        let mut take = |key: &str| {
            fields
                .remove(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let user_id = take("user_id")
            .ok_or_else(|| DoctorError::ValidationError("user_id is required".to_string()))?;

        let experience = take("experience")
            .map(|raw| {
                raw.parse::<i32>().map_err(|_| {
                    DoctorError::ValidationError(format!("experience must be a whole number, got {:?}", raw))
                })
            })
            .transpose()?;

        let status = take("status")
            .map(|raw| {
                raw.to_ascii_lowercase().parse::<bool>().map_err(|_| {
                    DoctorError::ValidationError(format!("status must be true or false, got {:?}", raw))
                })
            })
            .transpose()?
            .unwrap_or(false);

        // Schedules may be posted as JSON or as free text.
        let timings = take("timings")
            .map(|raw| serde_json::from_str(&raw).unwrap_or(Value::String(raw)));

        Ok(Self {
            user_id,
            first_name: take("first_name"),
            last_name: take("last_name"),
            contact: take("contact"),
            email: take("email"),
            address: take("address"),
            experience,
            timings,
            status,
            specialization: take("specialization"),
        })
    }

    pub fn into_doctor(self, image_url: String) -> Doctor {
        let now = Utc::now();
        Doctor {
            id: Uuid::new_v4(),
            user_id: self.user_id,
            first_name: self.first_name,
            last_name: self.last_name,
            contact: self.contact,
            email: self.email,
            address: self.address,
            image: image_url,
            experience: self.experience,
            timings: self.timings,
            status: self.status,
            specialization: self.specialization,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OwnerLookupRequest {
    #[serde(rename = "_id")]
    pub user_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteDoctorRequest {
    pub id: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateDoctorRequest {
    #[serde(rename = "_id")]
    pub user_id: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub contact: Option<String>,
    pub address: Option<String>,
    pub experience: Option<i32>,
    pub timings: Option<Value>,
    pub specialization: Option<String>,
}

impl UpdateDoctorRequest {
    pub fn into_changes(self) -> (String, DoctorChanges) {
        let changes = DoctorChanges {
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            contact: self.contact,
            address: self.address,
            experience: self.experience,
            timings: self.timings,
            specialization: self.specialization,
            image: None,
            updated_at: Some(Utc::now()),
        };
        (self.user_id, changes)
    }
}

/// Partial update of a doctor row. Absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DoctorChanges {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub experience: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timings: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub specialization: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl DoctorChanges {
    pub fn image(url: String) -> Self {
        Self {
            image: Some(url),
            updated_at: Some(Utc::now()),
            ..Self::default()
        }
    }

    pub fn apply_to(&self, doctor: &mut Doctor) {
        fn set<T: Clone>(target: &mut Option<T>, value: &Option<T>) {
            if let Some(value) = value {
                *target = Some(value.clone());
            }
        }

        set(&mut doctor.first_name, &self.first_name);
        set(&mut doctor.last_name, &self.last_name);
        set(&mut doctor.email, &self.email);
        set(&mut doctor.contact, &self.contact);
        set(&mut doctor.address, &self.address);
        set(&mut doctor.experience, &self.experience);
        set(&mut doctor.timings, &self.timings);
        set(&mut doctor.specialization, &self.specialization);
        if let Some(image) = &self.image {
            doctor.image = image.clone();
        }
        if let Some(updated_at) = self.updated_at {
            doctor.updated_at = updated_at;
        }
    }
}

// Error types specific to doctor operations
#[derive(Debug, Error)]
pub enum DoctorError {
    #[error("Doctor not found")]
    NotFound,

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Doctor profile already exists for user {0}")]
    AlreadyExists(String),

    #[error("Store error: {0:#}")]
    Store(anyhow::Error),

    #[error("Media store error: {0:#}")]
    Media(anyhow::Error),
}

impl DoctorError {
    /// Maps onto the HTTP taxonomy. `context` becomes the envelope message of
    /// upstream failures.
    pub fn into_app_error(self, context: &str) -> AppError {
        match self {
            DoctorError::NotFound => AppError::NotFound("Doctor not found".to_string()),
            DoctorError::ValidationError(msg) => AppError::ValidationError(msg),
            DoctorError::AlreadyExists(_) => AppError::Conflict(self.to_string()),
            DoctorError::Store(e) | DoctorError::Media(e) => {
                AppError::internal(context, format!("{:#}", e))
            }
        }
    }
}
