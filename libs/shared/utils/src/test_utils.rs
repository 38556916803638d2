use chrono::Utc;
use serde_json::json;
use uuid::Uuid;

use shared_config::{AppConfig, DEFAULT_MAX_IMAGE_BYTES};

pub struct TestConfig {
    pub supabase_url: String,
    pub supabase_service_key: String,
    pub cloudinary_base_url: String,
    pub cloudinary_cloud_name: String,
    pub cloudinary_api_key: String,
    pub cloudinary_api_secret: String,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            supabase_url: "http://localhost:54321".to_string(),
            supabase_service_key: "test-service-key".to_string(),
            cloudinary_base_url: "http://localhost:54322".to_string(),
            cloudinary_cloud_name: "test-cloud".to_string(),
            cloudinary_api_key: "test-api-key".to_string(),
            cloudinary_api_secret: "test-api-secret".to_string(),
        }
    }
}

impl TestConfig {
    /// Points both upstream services at the given mock server.
    pub fn with_mock_server(uri: &str) -> Self {
        Self {
            supabase_url: uri.to_string(),
            cloudinary_base_url: uri.to_string(),
            ..Self::default()
        }
    }

    pub fn to_app_config(&self) -> AppConfig {
        AppConfig {
            supabase_url: self.supabase_url.clone(),
            supabase_service_key: self.supabase_service_key.clone(),
            cloudinary_cloud_name: self.cloudinary_cloud_name.clone(),
            cloudinary_api_key: self.cloudinary_api_key.clone(),
            cloudinary_api_secret: self.cloudinary_api_secret.clone(),
            cloudinary_base_url: self.cloudinary_base_url.clone(),
            doctor_image_folder: "doctor_images".to_string(),
            max_image_bytes: DEFAULT_MAX_IMAGE_BYTES,
            server_port: 3000,
        }
    }
}

pub struct MockSupabaseResponses;

impl MockSupabaseResponses {
    pub fn doctor_row(id: &Uuid, user_id: &str) -> serde_json::Value {
        json!({
            "id": id,
            "user_id": user_id,
            "first_name": "Ann",
            "last_name": "Lee",
            "contact": "+1234567890",
            "email": "ann.lee@example.com",
            "address": "1 Clinic Road",
            "image": format!("https://res.cloudinary.com/test-cloud/image/upload/doctor_images/{}.png", id),
            "experience": 7,
            "timings": { "mon": "09:00-17:00" },
            "status": true,
            "specialization": "Cardiology",
            "created_at": "2024-01-01T00:00:00Z",
            "updated_at": "2024-01-01T00:00:00Z"
        })
    }

    pub fn appointment_row(doctor_id: &Uuid, user_id: &str) -> serde_json::Value {
        json!({
            "id": Uuid::new_v4(),
            "doctor_id": doctor_id,
            "user_id": user_id,
            "date": "2024-12-25",
            "time": "10:00",
            "status": "pending",
            "created_at": Utc::now().to_rfc3339()
        })
    }

    pub fn error_response(message: &str, code: &str) -> serde_json::Value {
        json!({
            "message": message,
            "code": code
        })
    }
}

pub struct MockCloudinaryResponses;

impl MockCloudinaryResponses {
    pub fn upload_response(cloud_name: &str, public_id: &str) -> serde_json::Value {
        json!({
            "asset_id": Uuid::new_v4().simple().to_string(),
            "public_id": public_id,
            "version": 1719304854,
            "format": "png",
            "resource_type": "image",
            "bytes": 2048,
            "url": format!("http://res.cloudinary.com/{}/image/upload/v1719304854/{}.png", cloud_name, public_id),
            "secure_url": format!("https://res.cloudinary.com/{}/image/upload/v1719304854/{}.png", cloud_name, public_id)
        })
    }

    pub fn destroy_response() -> serde_json::Value {
        json!({ "result": "ok" })
    }

    pub fn error_response(message: &str) -> serde_json::Value {
        json!({ "error": { "message": message } })
    }
}

pub struct TestImages;

impl TestImages {
    const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

    /// PNG signature padded with zeros to `len` bytes.
    pub fn png(len: usize) -> Vec<u8> {
        let mut bytes = Self::PNG_SIGNATURE.to_vec();
        bytes.resize(len.max(Self::PNG_SIGNATURE.len()), 0);
        bytes
    }

    pub fn kib(n: usize) -> usize {
        n * 1024
    }

    pub fn mib(n: usize) -> usize {
        n * 1024 * 1024
    }
}
