// libs/appointment-cell/src/handlers.rs
use axum::{
    extract::{rejection::PathRejection, Path, State},
    http::StatusCode,
    Json,
};
use chrono::Local;

use shared_models::AppError;
use shared_utils::extractor::JsonObject;

use crate::mapping::{to_delete_response, to_response};
use crate::models::{
    AppointmentError, AppointmentListItem, AppointmentResponse, DeleteAppointmentResponse,
    APPOINTMENT_NOT_FOUND, CREATED_MESSAGE, UPDATED_MESSAGE,
};
use crate::router::AppointmentState;
use crate::services::AppointmentBookingService;

fn into_app_error(err: AppointmentError, operation: &str) -> AppError {
    match err {
        AppointmentError::NotFound => AppError::NotFound(APPOINTMENT_NOT_FOUND.to_string()),
        AppointmentError::Validation(errors) => AppError::InvalidData(errors),
        AppointmentError::Database(e) => AppError::operation_failed(operation, e),
    }
}

/// Path ids that are not integers cannot name an appointment.
fn appointment_id(path: Result<Path<i64>, PathRejection>) -> Result<i64, AppError> {
    path.map(|Path(id)| id)
        .map_err(|_| AppError::NotFound(APPOINTMENT_NOT_FOUND.to_string()))
}

fn service(state: AppointmentState) -> AppointmentBookingService {
    AppointmentBookingService::new(state.appointments, state.patients)
}

#[axum::debug_handler]
pub async fn list_appointments(
    State(state): State<AppointmentState>,
) -> Result<Json<Vec<AppointmentListItem>>, AppError> {
    let appointments = service(state)
        .list_appointments()
        .await
        .map_err(|e| into_app_error(e, "Failed to list appointments"))?;

    Ok(Json(appointments))
}

#[axum::debug_handler]
pub async fn create_appointment(
    State(state): State<AppointmentState>,
    JsonObject(body): JsonObject,
) -> Result<(StatusCode, Json<AppointmentResponse>), AppError> {
    let today = Local::now().date_naive();

    let appointment = service(state)
        .create_appointment(&body, today)
        .await
        .map_err(|e| into_app_error(e, "Failed to create appointment"))?;

    Ok((StatusCode::CREATED, Json(to_response(&appointment, CREATED_MESSAGE))))
}

#[axum::debug_handler]
pub async fn update_appointment(
    State(state): State<AppointmentState>,
    path: Result<Path<i64>, PathRejection>,
    body: Result<JsonObject, AppError>,
) -> Result<Json<AppointmentResponse>, AppError> {
    let appointment_id = appointment_id(path)?;
    let today = Local::now().date_naive();
    let service = service(state);

    // An unknown appointment is reported before anything about the body.
    let body = match body {
        Ok(JsonObject(body)) => body,
        Err(rejection) => {
            service
                .find_appointment(appointment_id)
                .await
                .map_err(|e| into_app_error(e, "Failed to update appointment"))?;
            return Err(rejection);
        }
    };

    let appointment = service
        .update_appointment(appointment_id, &body, today)
        .await
        .map_err(|e| into_app_error(e, "Failed to update appointment"))?;

    Ok(Json(to_response(&appointment, UPDATED_MESSAGE)))
}

#[axum::debug_handler]
pub async fn delete_appointment(
    State(state): State<AppointmentState>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<DeleteAppointmentResponse>, AppError> {
    let appointment_id = appointment_id(path)?;

    let deleted_id = service(state)
        .delete_appointment(appointment_id)
        .await
        .map_err(|e| into_app_error(e, "Failed to delete appointment"))?;

    Ok(Json(to_delete_response(deleted_id)))
}
