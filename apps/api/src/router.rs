use std::sync::Arc;

use axum::{routing::get, Router};

use appointment_cell::{appointment_routes, AppointmentStore};
use patient_cell::{patient_routes, PatientStore};
use shared_database::Database;

pub const API_BASE_PATH: &str = "/appointments";

pub fn create_router(database: Database) -> Router {
    let patients: Arc<dyn PatientStore> = Arc::new(database.clone());
    let appointments: Arc<dyn AppointmentStore> = Arc::new(database);

    Router::new()
        .route("/", get(|| async { "Clinic appointments API is running!" }))
        .nest(
            API_BASE_PATH,
            patient_routes(patients.clone()).merge(appointment_routes(appointments, patients)),
        )
}
