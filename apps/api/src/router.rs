use std::sync::Arc;

use axum::{
    Router,
    routing::get,
};

use doctor_cell::router::{doctor_routes, DoctorState};

pub fn create_router(doctors: Arc<DoctorState>) -> Router {
    Router::new()
        .route("/", get(|| async { "Doctor records API is running!" }))
        .nest("/doctors", doctor_routes(doctors))
}
