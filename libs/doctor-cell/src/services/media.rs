// libs/doctor-cell/src/services/media.rs
use std::collections::BTreeMap;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::Utc;
use reqwest::{
    multipart::{Form, Part},
    Client,
};
use serde::Deserialize;
use serde_json::Value;
use sha2::{Digest, Sha256};
use tracing::{debug, error, info, warn};

use shared_config::AppConfig;

use crate::upload::ImageFile;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct UploadedImage {
    pub secure_url: String,
    pub public_id: String,
}

/// Remote image host. Receives bytes, hands back a durable URL.
#[async_trait]
pub trait MediaStore: Send + Sync {
    async fn upload(&self, image: ImageFile, folder: Option<&str>) -> Result<UploadedImage>;

    async fn destroy(&self, public_id: &str) -> Result<()>;
}

/// Cloudinary Upload API client using signed requests.
/// Based on: https://cloudinary.com/documentation/image_upload_api_reference
pub struct CloudinaryClient {
    client: Client,
    base_url: String,
    cloud_name: String,
    api_key: String,
    api_secret: String,
}

impl CloudinaryClient {
    pub fn new(config: &AppConfig) -> Self {
        if !config.is_media_configured() {
            warn!("Cloudinary credentials missing, image uploads will fail");
        }

        Self {
            client: Client::new(),
            base_url: config.cloudinary_base_url.trim_end_matches('/').to_string(),
            cloud_name: config.cloudinary_cloud_name.clone(),
            api_key: config.cloudinary_api_key.clone(),
            api_secret: config.cloudinary_api_secret.clone(),
        }
    }

    fn endpoint(&self, action: &str) -> String {
        format!("{}/{}/image/{}", self.base_url, self.cloud_name, action)
    }

    /// Hex SHA-256 over the sorted `key=value` pairs joined by `&`, with the
    /// API secret appended.
    pub fn sign(&self, params: &BTreeMap<&'static str, String>) -> String {
        let to_sign = params
            .iter()
            .map(|(key, value)| format!("{}={}", key, value))
            .collect::<Vec<_>>()
            .join("&");

        let mut hasher = Sha256::new();
        hasher.update(to_sign.as_bytes());
        hasher.update(self.api_secret.as_bytes());
        format!("{:x}", hasher.finalize())
    }

    async fn read_response(response: reqwest::Response, action: &str) -> Result<Value> {
        let status = response.status();
        let response_text = response.text().await?;

        debug!("Cloudinary {} response: {} - {}", action, status, response_text);

        if !status.is_success() {
            let message = serde_json::from_str::<Value>(&response_text)
                .ok()
                .and_then(|body| body["error"]["message"].as_str().map(str::to_string))
                .unwrap_or(response_text);
            error!("Cloudinary {} failed: {} - {}", action, status, message);
            return Err(anyhow!("Cloudinary {} failed (HTTP {}): {}", action, status, message));
        }

        serde_json::from_str(&response_text)
            .map_err(|e| anyhow!("Failed to parse Cloudinary {} response: {}", action, e))
    }
}

#[async_trait]
impl MediaStore for CloudinaryClient {
    async fn upload(&self, image: ImageFile, folder: Option<&str>) -> Result<UploadedImage> {
        info!("Uploading {} ({} bytes) to Cloudinary", image.file_name, image.len());

        let mut params = BTreeMap::new();
        params.insert("timestamp", Utc::now().timestamp().to_string());
        if let Some(folder) = folder {
            params.insert("folder", folder.to_string());
        }
        let signature = self.sign(&params);

        let part = Part::bytes(image.bytes)
            .file_name(image.file_name)
            .mime_str(&image.content_type)?;

        let mut form = Form::new()
            .part("file", part)
            .text("api_key", self.api_key.clone())
            .text("signature", signature)
            .text("signature_algorithm", "sha256");
        for (key, value) in params {
            form = form.text(key, value);
        }

        let response = self
            .client
            .post(self.endpoint("upload"))
            .multipart(form)
            .send()
            .await?;

        let body = Self::read_response(response, "upload").await?;
        let uploaded: UploadedImage = serde_json::from_value(body)
            .map_err(|e| anyhow!("Cloudinary upload response missing fields: {}", e))?;

        info!("Uploaded image {} to {}", uploaded.public_id, uploaded.secure_url);
        Ok(uploaded)
    }

    async fn destroy(&self, public_id: &str) -> Result<()> {
        info!("Deleting image {} from Cloudinary", public_id);

        let mut params = BTreeMap::new();
        params.insert("public_id", public_id.to_string());
        params.insert("timestamp", Utc::now().timestamp().to_string());
        let signature = self.sign(&params);

        let mut fields: Vec<(&str, String)> = params.into_iter().collect();
        fields.push(("api_key", self.api_key.clone()));
        fields.push(("signature", signature));
        fields.push(("signature_algorithm", "sha256".to_string()));

        let response = self
            .client
            .post(self.endpoint("destroy"))
            .form(&fields)
            .send()
            .await?;

        let body = Self::read_response(response, "destroy").await?;
        match body["result"].as_str() {
            Some("ok") => Ok(()),
            other => Err(anyhow!(
                "Cloudinary destroy of {} returned {}",
                public_id,
                other.unwrap_or("no result")
            )),
        }
    }
}
