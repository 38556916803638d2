pub mod doctor;
pub mod media;
pub mod store;

pub use doctor::DoctorService;
pub use media::{CloudinaryClient, MediaStore, UploadedImage};
pub use store::{DoctorStore, SupabaseDoctorStore};
