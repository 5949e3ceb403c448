use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};

use shared_models::AppError;
use shared_utils::extractor::JsonObject;

use crate::models::{Patient, PatientError};
use crate::services::PatientService;
use crate::store::PatientStore;

fn into_app_error(err: PatientError, operation: &str) -> AppError {
    match err {
        PatientError::Validation(errors) => AppError::Validation(errors),
        PatientError::Database(e) => AppError::operation_failed(operation, e),
    }
}

#[axum::debug_handler]
pub async fn list_patients(
    State(store): State<Arc<dyn PatientStore>>,
) -> Result<Json<Vec<Patient>>, AppError> {
    let service = PatientService::new(store);

    let patients = service
        .list_patients()
        .await
        .map_err(|e| into_app_error(e, "Failed to list patients"))?;

    Ok(Json(patients))
}

#[axum::debug_handler]
pub async fn create_patient(
    State(store): State<Arc<dyn PatientStore>>,
    JsonObject(body): JsonObject,
) -> Result<(StatusCode, Json<Patient>), AppError> {
    let service = PatientService::new(store);

    let patient = service
        .create_patient(&body)
        .await
        .map_err(|e| into_app_error(e, "Failed to create patient"))?;

    Ok((StatusCode::CREATED, Json(patient)))
}
