use std::sync::Arc;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};

use shared_config::AppConfig;

use crate::handlers;
use crate::services::DoctorService;
use crate::upload::UploadLimits;

/// State shared by every doctor route.
pub struct DoctorState {
    pub doctors: DoctorService,
    pub upload_limits: UploadLimits,
}

impl DoctorState {
    pub fn new(doctors: DoctorService, upload_limits: UploadLimits) -> Self {
        Self { doctors, upload_limits }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            DoctorService::from_config(config),
            UploadLimits::new(config.max_image_bytes),
        )
    }
}

pub fn doctor_routes(state: Arc<DoctorState>) -> Router {
    let body_limit = state.upload_limits.body_limit();

    Router::new()
        .route("/", post(handlers::create_doctor).delete(handlers::delete_doctor))
        .route(
            "/me",
            get(handlers::get_doctor_info)
                .post(handlers::get_doctor_info)
                .put(handlers::update_doctor_profile)
                .patch(handlers::update_doctor_profile),
        )
        .route("/{doctor_id}", get(handlers::get_doctor))
        .route(
            "/{doctor_id}/image",
            post(handlers::upload_doctor_image).put(handlers::upload_doctor_image),
        )
        .route("/{doctor_id}/appointments", get(handlers::get_doctor_appointments))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}
