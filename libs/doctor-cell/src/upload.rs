//! Gatekeeper for multipart image uploads.
//!
//! Files are checked against the image allow-list before their bytes are read
//! and are buffered in memory only; nothing touches the local disk.

use std::collections::HashMap;

use axum::extract::multipart::{Multipart, MultipartError, MultipartRejection};
use axum::http::StatusCode;
use tracing::{debug, warn};

use shared_models::error::AppError;

/// Multipart field that carries the image.
pub const IMAGE_FIELD: &str = "image";

/// Room for the text fields that travel next to the image.
pub const FORM_FIELDS_ALLOWANCE: usize = 1024 * 1024;

const ALLOWED_IMAGE_TYPES: [&str; 4] = ["jpeg", "jpg", "png", "gif"];

#[derive(Debug, Clone)]
pub struct ImageFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl ImageFile {
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

#[derive(Debug, Default)]
pub struct ImageForm {
    pub fields: HashMap<String, String>,
    pub image: Option<ImageFile>,
}

#[derive(Debug, Clone, Copy)]
pub struct UploadLimits {
    pub max_image_bytes: usize,
}

impl UploadLimits {
    pub fn new(max_image_bytes: usize) -> Self {
        Self { max_image_bytes }
    }

    /// Cap for the whole request body.
    pub fn body_limit(&self) -> usize {
        self.max_image_bytes + FORM_FIELDS_ALLOWANCE
    }
}

/// Both the file extension and the declared content type must name an
/// allowed image format.
pub fn is_allowed_image(file_name: &str, content_type: &str) -> bool {
    let extension = match file_name.rsplit_once('.') {
        Some((_, ext)) => ext.to_ascii_lowercase(),
        None => return false,
    };

    let mime = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    let subtype = match mime.strip_prefix("image/") {
        Some(subtype) => subtype,
        None => return false,
    };

    ALLOWED_IMAGE_TYPES.contains(&extension.as_str()) && ALLOWED_IMAGE_TYPES.contains(&subtype)
}

/// Reads a multipart body into text fields plus at most one image.
pub async fn read_image_form(
    multipart: Result<Multipart, MultipartRejection>,
    limits: UploadLimits,
) -> Result<ImageForm, AppError> {
    let mut multipart = multipart
        .map_err(|e| AppError::BadRequest(format!("Invalid multipart request: {}", e.body_text())))?;
    let mut form = ImageForm::default();

    while let Some(mut field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or_default().to_string();

        let Some(file_name) = field.file_name().map(str::to_string) else {
            let value = field.text().await.map_err(multipart_error)?;
            form.fields.insert(name, value);
            continue;
        };

        if name != IMAGE_FIELD || form.image.is_some() {
            warn!("Rejected unexpected file field {:?}", name);
            return Err(AppError::BadRequest(format!("Unexpected file field: {}", name)));
        }

        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();

        if !is_allowed_image(&file_name, &content_type) {
            warn!("Rejected upload {:?} with content type {}", file_name, content_type);
            return Err(AppError::ValidationError("Only images are allowed".to_string()));
        }

        let mut bytes = Vec::new();
        while let Some(chunk) = field.chunk().await.map_err(multipart_error)? {
            if bytes.len() + chunk.len() > limits.max_image_bytes {
                warn!("Rejected upload {:?}: larger than {} bytes", file_name, limits.max_image_bytes);
                return Err(too_large(limits));
            }
            bytes.extend_from_slice(&chunk);
        }

        debug!("Accepted upload {:?} ({} bytes, {})", file_name, bytes.len(), content_type);
        form.image = Some(ImageFile { file_name, content_type, bytes });
    }

    Ok(form)
}

fn too_large(limits: UploadLimits) -> AppError {
    AppError::PayloadTooLarge(format!(
        "Image exceeds the {} byte limit",
        limits.max_image_bytes
    ))
}

fn multipart_error(err: MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(err.body_text())
    } else {
        AppError::BadRequest(format!("Failed to read multipart data: {}", err.body_text()))
    }
}
