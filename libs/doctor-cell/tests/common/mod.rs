// libs/doctor-cell/tests/common/mod.rs
#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, Response},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

use doctor_cell::models::{Appointment, Doctor, DoctorChanges};
use doctor_cell::router::{doctor_routes, DoctorState};
use doctor_cell::services::{DoctorService, DoctorStore, MediaStore, UploadedImage};
use doctor_cell::upload::{ImageFile, UploadLimits};
use shared_config::DEFAULT_MAX_IMAGE_BYTES;

pub const BOUNDARY: &str = "doctor-test-boundary";

#[derive(Default)]
pub struct InMemoryDoctorStore {
    pub doctors: Mutex<Vec<Doctor>>,
    pub appointments: Mutex<Vec<Appointment>>,
    pub fail_writes: Mutex<bool>,
}

impl InMemoryDoctorStore {
    pub fn count(&self) -> usize {
        self.doctors.lock().unwrap().len()
    }

    pub fn fail_writes(&self) {
        *self.fail_writes.lock().unwrap() = true;
    }

    fn check_writes(&self) -> Result<()> {
        if *self.fail_writes.lock().unwrap() {
            return Err(anyhow!("database unavailable"));
        }
        Ok(())
    }
}

#[async_trait]
impl DoctorStore for InMemoryDoctorStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Doctor>> {
        Ok(self.doctors.lock().unwrap().iter().find(|d| d.id == id).cloned())
    }

    async fn find_by_owner(&self, user_id: &str) -> Result<Option<Doctor>> {
        Ok(self.doctors.lock().unwrap().iter().find(|d| d.user_id == user_id).cloned())
    }

    async fn insert(&self, doctor: &Doctor) -> Result<Doctor> {
        self.check_writes()?;
        self.doctors.lock().unwrap().push(doctor.clone());
        Ok(doctor.clone())
    }

    async fn update_by_id(&self, id: Uuid, changes: &DoctorChanges) -> Result<Option<Doctor>> {
        self.check_writes()?;
        let mut doctors = self.doctors.lock().unwrap();
        Ok(doctors.iter_mut().find(|d| d.id == id).map(|doctor| {
            changes.apply_to(doctor);
            doctor.clone()
        }))
    }

    async fn update_by_owner(&self, user_id: &str, changes: &DoctorChanges) -> Result<Option<Doctor>> {
        self.check_writes()?;
        let mut doctors = self.doctors.lock().unwrap();
        Ok(doctors.iter_mut().find(|d| d.user_id == user_id).map(|doctor| {
            changes.apply_to(doctor);
            doctor.clone()
        }))
    }

    async fn delete_by_id(&self, id: Uuid) -> Result<Option<Doctor>> {
        self.check_writes()?;
        let mut doctors = self.doctors.lock().unwrap();
        Ok(doctors
            .iter()
            .position(|d| d.id == id)
            .map(|index| doctors.remove(index)))
    }

    async fn find_appointments(&self, doctor_id: Uuid) -> Result<Vec<Appointment>> {
        Ok(self
            .appointments
            .lock()
            .unwrap()
            .iter()
            .filter(|a| a.doctor_id == doctor_id)
            .cloned()
            .collect())
    }
}

#[derive(Debug, Clone)]
pub struct RecordedUpload {
    pub file_name: String,
    pub content_type: String,
    pub size: usize,
    pub folder: Option<String>,
}

#[derive(Default)]
pub struct FakeMediaStore {
    pub uploads: Mutex<Vec<RecordedUpload>>,
    pub destroyed: Mutex<Vec<String>>,
    pub fail_uploads: Mutex<bool>,
}

impl FakeMediaStore {
    pub fn upload_count(&self) -> usize {
        self.uploads.lock().unwrap().len()
    }

    pub fn last_upload(&self) -> Option<RecordedUpload> {
        self.uploads.lock().unwrap().last().cloned()
    }

    pub fn destroyed(&self) -> Vec<String> {
        self.destroyed.lock().unwrap().clone()
    }

    pub fn fail_uploads(&self) {
        *self.fail_uploads.lock().unwrap() = true;
    }
}

#[async_trait]
impl MediaStore for FakeMediaStore {
    async fn upload(&self, image: ImageFile, folder: Option<&str>) -> Result<UploadedImage> {
        if *self.fail_uploads.lock().unwrap() {
            return Err(anyhow!("media host unreachable"));
        }

        let mut uploads = self.uploads.lock().unwrap();
        let public_id = match folder {
            Some(folder) => format!("{}/img-{}", folder, uploads.len() + 1),
            None => format!("img-{}", uploads.len() + 1),
        };
        uploads.push(RecordedUpload {
            file_name: image.file_name.clone(),
            content_type: image.content_type.clone(),
            size: image.len(),
            folder: folder.map(str::to_string),
        });

        Ok(UploadedImage {
            secure_url: format!("https://res.cloudinary.com/test-cloud/image/upload/{}.png", public_id),
            public_id,
        })
    }

    async fn destroy(&self, public_id: &str) -> Result<()> {
        self.destroyed.lock().unwrap().push(public_id.to_string());
        Ok(())
    }
}

pub struct TestApp {
    pub router: Router,
    pub store: Arc<InMemoryDoctorStore>,
    pub media: Arc<FakeMediaStore>,
}

impl TestApp {
    pub fn new() -> Self {
        let store = Arc::new(InMemoryDoctorStore::default());
        let media = Arc::new(FakeMediaStore::default());

        let service = DoctorService::new(store.clone(), media.clone(), "doctor_images");
        let state = DoctorState::new(service, UploadLimits::new(DEFAULT_MAX_IMAGE_BYTES));

        Self {
            router: doctor_routes(Arc::new(state)),
            store,
            media,
        }
    }

    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router.clone().oneshot(request).await.unwrap()
    }
}

pub async fn body_json(response: Response<Body>) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&body).unwrap()
}

pub struct FilePart<'a> {
    pub field: &'a str,
    pub file_name: &'a str,
    pub content_type: &'a str,
    pub bytes: Vec<u8>,
}

pub fn multipart_body(fields: &[(&str, &str)], file: Option<FilePart<'_>>) -> Vec<u8> {
    let mut body = Vec::new();

    for (name, value) in fields {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        body.extend_from_slice(
            format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", name).as_bytes(),
        );
        body.extend_from_slice(value.as_bytes());
        body.extend_from_slice(b"\r\n");
    }

    if let Some(file) = file {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
                file.field, file.file_name
            )
            .as_bytes(),
        );
        body.extend_from_slice(format!("Content-Type: {}\r\n\r\n", file.content_type).as_bytes());
        body.extend_from_slice(&file.bytes);
        body.extend_from_slice(b"\r\n");
    }

    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    body
}

pub fn multipart_request(method: &str, uri: &str, body: Vec<u8>) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(
            "content-type",
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(body))
        .unwrap()
}

pub fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn empty_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub fn png_part(size: usize) -> FilePart<'static> {
    FilePart {
        field: "image",
        file_name: "photo.png",
        content_type: "image/png",
        bytes: shared_utils::test_utils::TestImages::png(size),
    }
}
