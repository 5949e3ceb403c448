// libs/appointment-cell/src/router.rs
use std::sync::Arc;

use axum::{
    routing::{delete, get, post, put},
    Router,
};

use patient_cell::PatientStore;

use crate::handlers;
use crate::store::AppointmentStore;

/// Stores the appointment handlers need. Patients are consulted to check that
/// a referenced patient exists.
#[derive(Clone)]
pub struct AppointmentState {
    pub appointments: Arc<dyn AppointmentStore>,
    pub patients: Arc<dyn PatientStore>,
}

pub fn appointment_routes(
    appointments: Arc<dyn AppointmentStore>,
    patients: Arc<dyn PatientStore>,
) -> Router {
    let state = AppointmentState {
        appointments,
        patients,
    };

    Router::new()
        .route("/appointments/", get(handlers::list_appointments))
        .route("/appointments/create/", post(handlers::create_appointment))
        .route(
            "/appointments/{appointment_id}/update/",
            put(handlers::update_appointment),
        )
        .route(
            "/appointments/{appointment_id}/delete/",
            delete(handlers::delete_appointment),
        )
        .with_state(state)
}
