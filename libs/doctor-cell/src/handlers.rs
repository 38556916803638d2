use std::sync::Arc;

use axum::{
    extract::{multipart::MultipartRejection, rejection::JsonRejection, Multipart, Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use tracing::debug;

use shared_models::error::AppError;

use crate::models::{CreateDoctorForm, DeleteDoctorRequest, OwnerLookupRequest, UpdateDoctorRequest};
use crate::router::DoctorState;
use crate::upload::read_image_form;

fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| AppError::BadRequest(rejection.body_text()))
}

#[axum::debug_handler]
pub async fn create_doctor(
    State(state): State<Arc<DoctorState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    const CONTEXT: &str = "Error creating doctor";

    let form = read_image_form(multipart, state.upload_limits).await?;
    let fields = CreateDoctorForm::from_fields(form.fields)
        .map_err(|e| e.into_app_error(CONTEXT))?;

    let doctor = state.doctors.create_doctor(fields, form.image).await
        .map_err(|e| e.into_app_error(CONTEXT))?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "Doctor created successfully",
            "doctor": doctor
        })),
    ))
}

#[axum::debug_handler]
pub async fn upload_doctor_image(
    State(state): State<Arc<DoctorState>>,
    Path(doctor_id): Path<String>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<Value>, AppError> {
    // No multipart body means no file; the id lookup still runs first.
    let image = match multipart {
        Ok(multipart) => read_image_form(Ok(multipart), state.upload_limits).await?.image,
        Err(rejection) => {
            debug!("Image upload for {} carried no multipart body: {}", doctor_id, rejection.body_text());
            None
        }
    };

    let doctor = state.doctors.upload_image(&doctor_id, image).await
        .map_err(|e| e.into_app_error("Error uploading image"))?;

    Ok(Json(json!({
        "success": true,
        "message": "Image uploaded successfully",
        "doctor": doctor
    })))
}

#[axum::debug_handler]
pub async fn get_doctor_info(
    State(state): State<Arc<DoctorState>>,
    payload: Result<Json<OwnerLookupRequest>, JsonRejection>,
) -> Result<Json<Value>, AppError> {
    let request = json_body(payload)?;
    let doctor = state.doctors.get_by_owner(&request.user_id).await
        .map_err(|e| e.into_app_error("Error fetching doctor's details"))?;

    Ok(Json(json!({
        "success": true,
        "message": "Doctor data fetched successfully",
        "data": doctor
    })))
}

#[axum::debug_handler]
pub async fn update_doctor_profile(
    State(state): State<Arc<DoctorState>>,
    payload: Result<Json<UpdateDoctorRequest>, JsonRejection>,
) -> Result<Json<Value>, AppError> {
    let request = json_body(payload)?;
    let doctor = state.doctors.update_profile(request).await
        .map_err(|e| e.into_app_error("Error updating doctor profile"))?;

    Ok(Json(json!({
        "success": true,
        "message": "Doctor profile updated successfully",
        "data": doctor
    })))
}

#[axum::debug_handler]
pub async fn get_doctor(
    State(state): State<Arc<DoctorState>>,
    Path(doctor_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let doctor = state.doctors.get_doctor(&doctor_id).await
        .map_err(|e| e.into_app_error("Error fetching doctor"))?;

    Ok(Json(json!({
        "success": true,
        "message": "Single doctor fetched",
        "data": doctor
    })))
}

#[axum::debug_handler]
pub async fn delete_doctor(
    State(state): State<Arc<DoctorState>>,
    payload: Result<Json<DeleteDoctorRequest>, JsonRejection>,
) -> Result<Json<Value>, AppError> {
    let request = json_body(payload)?;
    let doctor = state.doctors.delete_doctor(&request.id).await
        .map_err(|e| e.into_app_error("Error deleting doctor"))?;

    Ok(Json(json!({
        "success": true,
        "message": "Doctor deleted successfully",
        "data": doctor
    })))
}

#[axum::debug_handler]
pub async fn get_doctor_appointments(
    State(state): State<Arc<DoctorState>>,
    Path(doctor_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let appointments = state.doctors.appointments_for_doctor(&doctor_id).await
        .map_err(|e| e.into_app_error("Error fetching appointments"))?;

    Ok(Json(json!({
        "success": true,
        "message": "Appointments fetched successfully",
        "data": appointments
    })))
}
