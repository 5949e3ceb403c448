use std::sync::Arc;

use axum::{routing::get, Router};

use crate::handlers::*;
use crate::store::PatientStore;

pub fn patient_routes(store: Arc<dyn PatientStore>) -> Router {
    Router::new()
        .route("/patients/", get(list_patients).post(create_patient))
        .with_state(store)
}
