use std::sync::Arc;

use tracing::{debug, info, warn};
use uuid::Uuid;

use shared_config::AppConfig;

use crate::models::{
    Appointment, CreateDoctorForm, Doctor, DoctorChanges, DoctorError, UpdateDoctorRequest,
};
use crate::services::media::{CloudinaryClient, MediaStore, UploadedImage};
use crate::services::store::{DoctorStore, SupabaseDoctorStore};
use crate::upload::ImageFile;

pub struct DoctorService {
    store: Arc<dyn DoctorStore>,
    media: Arc<dyn MediaStore>,
    image_folder: String,
}

impl DoctorService {
    pub fn new(
        store: Arc<dyn DoctorStore>,
        media: Arc<dyn MediaStore>,
        image_folder: impl Into<String>,
    ) -> Self {
        Self {
            store,
            media,
            image_folder: image_folder.into(),
        }
    }

    /// Production wiring: Supabase for records, Cloudinary for images.
    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            Arc::new(SupabaseDoctorStore::new(config)),
            Arc::new(CloudinaryClient::new(config)),
            config.doctor_image_folder.clone(),
        )
    }

    /// Create a doctor profile with its profile image
    pub async fn create_doctor(
        &self,
        form: CreateDoctorForm,
        image: Option<ImageFile>,
    ) -> Result<Doctor, DoctorError> {
        let image = image
            .ok_or_else(|| DoctorError::ValidationError("Image is required".to_string()))?;

        debug!("Creating doctor profile for user: {}", form.user_id);

        // One profile per user; this is check-then-insert and can race.
        if self.store.find_by_owner(&form.user_id).await.map_err(DoctorError::Store)?.is_some() {
            return Err(DoctorError::AlreadyExists(form.user_id));
        }

        let uploaded = self.media
            .upload(image, Some(self.image_folder.as_str()))
            .await
            .map_err(DoctorError::Media)?;

        let doctor = form.into_doctor(uploaded.secure_url.clone());
        match self.store.insert(&doctor).await {
            Ok(saved) => {
                info!("Doctor profile {} created for user {}", saved.id, saved.user_id);
                Ok(saved)
            }
            Err(e) => {
                self.discard_upload(&uploaded).await;
                Err(DoctorError::Store(e))
            }
        }
    }

    /// Replace the profile image of an existing doctor
    pub async fn upload_image(
        &self,
        doctor_id: &str,
        image: Option<ImageFile>,
    ) -> Result<Doctor, DoctorError> {
        let id = parse_doctor_id(doctor_id).ok_or(DoctorError::NotFound)?;

        self.store
            .find_by_id(id)
            .await
            .map_err(DoctorError::Store)?
            .ok_or(DoctorError::NotFound)?;

        let image = image
            .ok_or_else(|| DoctorError::ValidationError("No image uploaded".to_string()))?;

        let uploaded = self.media
            .upload(image, None)
            .await
            .map_err(DoctorError::Media)?;

        let changes = DoctorChanges::image(uploaded.secure_url.clone());
        match self.store.update_by_id(id, &changes).await {
            Ok(Some(doctor)) => {
                info!("Profile image of doctor {} replaced", doctor.id);
                Ok(doctor)
            }
            Ok(None) => {
                // Deleted between lookup and update.
                self.discard_upload(&uploaded).await;
                Err(DoctorError::NotFound)
            }
            Err(e) => {
                self.discard_upload(&uploaded).await;
                Err(DoctorError::Store(e))
            }
        }
    }

    pub async fn get_by_owner(&self, user_id: &str) -> Result<Doctor, DoctorError> {
        debug!("Fetching doctor profile for user: {}", user_id);

        self.store
            .find_by_owner(user_id)
            .await
            .map_err(DoctorError::Store)?
            .ok_or(DoctorError::NotFound)
    }

    /// Patch the profile owned by `request.user_id`; absent fields are kept.
    pub async fn update_profile(&self, request: UpdateDoctorRequest) -> Result<Doctor, DoctorError> {
        let (user_id, changes) = request.into_changes();
        debug!("Updating doctor profile for user: {}", user_id);

        let doctor = self.store
            .update_by_owner(&user_id, &changes)
            .await
            .map_err(DoctorError::Store)?
            .ok_or(DoctorError::NotFound)?;

        info!("Doctor profile {} updated", doctor.id);
        Ok(doctor)
    }

    pub async fn get_doctor(&self, doctor_id: &str) -> Result<Doctor, DoctorError> {
        let id = parse_doctor_id(doctor_id).ok_or(DoctorError::NotFound)?;

        self.store
            .find_by_id(id)
            .await
            .map_err(DoctorError::Store)?
            .ok_or(DoctorError::NotFound)
    }

    pub async fn delete_doctor(&self, doctor_id: &str) -> Result<Doctor, DoctorError> {
        let id = parse_doctor_id(doctor_id).ok_or(DoctorError::NotFound)?;

        let doctor = self.store
            .delete_by_id(id)
            .await
            .map_err(DoctorError::Store)?
            .ok_or(DoctorError::NotFound)?;

        info!("Doctor profile {} ({}) deleted", doctor.id, doctor.full_name());
        Ok(doctor)
    }

    /// Appointments booked with a doctor. No matches is an empty list.
    pub async fn appointments_for_doctor(&self, doctor_id: &str) -> Result<Vec<Appointment>, DoctorError> {
        let Some(id) = parse_doctor_id(doctor_id) else {
            return Ok(Vec::new());
        };

        self.store
            .find_appointments(id)
            .await
            .map_err(DoctorError::Store)
    }

    async fn discard_upload(&self, uploaded: &UploadedImage) {
        match self.media.destroy(&uploaded.public_id).await {
            Ok(()) => info!("Removed orphaned image {}", uploaded.public_id),
            Err(e) => warn!("Failed to remove orphaned image {}: {:#}", uploaded.public_id, e),
        }
    }
}

fn parse_doctor_id(raw: &str) -> Option<Uuid> {
    Uuid::parse_str(raw.trim()).ok()
}
