pub mod handlers;
pub mod router;
pub mod models;
pub mod services;
pub mod upload;

// Re-export all models and services for external use
pub use models::*;
pub use services::*;

pub use router::{doctor_routes, DoctorState};
pub use upload::{ImageFile, UploadLimits};
