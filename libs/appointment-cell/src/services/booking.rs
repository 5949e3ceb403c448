// libs/appointment-cell/src/services/booking.rs
use std::sync::Arc;

use chrono::NaiveDate;
use serde_json::{Map, Value};
use tracing::{debug, error, info, instrument, trace, warn};

use patient_cell::PatientStore;
use shared_database::DbError;
use shared_models::FieldErrors;
use shared_utils::validation::is_not_in_past;

use crate::mapping::{apply_changes, APPOINTMENT_DATE, APPOINTMENT_TIME, PATIENT_ID, REASON};
use crate::models::{
    Appointment, AppointmentChanges, AppointmentError, AppointmentListItem,
    CreateAppointmentRequest, NewAppointment, UpdateAppointmentRequest, DATE_IN_PAST,
    PATIENT_NOT_FOUND,
};
use crate::store::AppointmentStore;

pub struct AppointmentBookingService {
    appointments: Arc<dyn AppointmentStore>,
    patients: Arc<dyn PatientStore>,
}

fn not_in_past(date: NaiveDate, today: NaiveDate) -> Result<NaiveDate, String> {
    if is_not_in_past(date, today) {
        Ok(date)
    } else {
        Err(DATE_IN_PAST.to_string())
    }
}

impl AppointmentBookingService {
    pub fn new(appointments: Arc<dyn AppointmentStore>, patients: Arc<dyn PatientStore>) -> Self {
        Self {
            appointments,
            patients,
        }
    }

    pub async fn list_appointments(&self) -> Result<Vec<AppointmentListItem>, AppointmentError> {
        debug!("Listing appointments");

        let appointments = self.appointments.list_appointments().await.map_err(|e| {
            error!("Failed to list appointments: {}", e);
            AppointmentError::Database(e)
        })?;

        for appointment in &appointments {
            trace!("{}", appointment);
        }

        Ok(appointments)
    }

    /// Validate every field, then insert. `today` bounds the earliest allowed date.
    #[instrument(skip(self, body))]
    pub async fn create_appointment(
        &self,
        body: &Map<String, Value>,
        today: NaiveDate,
    ) -> Result<Appointment, AppointmentError> {
        let request = CreateAppointmentRequest::from_json(body);
        let mut errors = FieldErrors::new();

        let patient_id = match request.patient_id {
            Ok(id) => {
                if self.patients.patient_exists(id).await? {
                    Some(id)
                } else {
                    errors.add(PATIENT_ID, PATIENT_NOT_FOUND);
                    None
                }
            }
            Err(msg) => {
                errors.add(PATIENT_ID, msg);
                None
            }
        };

        let appointment_date = errors.take(
            APPOINTMENT_DATE,
            request.appointment_date.and_then(|d| not_in_past(d, today)),
        );
        let appointment_time = errors.take(APPOINTMENT_TIME, request.appointment_time);
        let reason = errors.take(REASON, request.reason);

        let new_appointment = match (patient_id, appointment_date, appointment_time, reason) {
            (Some(patient_id), Some(appointment_date), Some(appointment_time), Some(reason))
                if errors.is_empty() =>
            {
                NewAppointment {
                    patient_id,
                    appointment_date,
                    appointment_time,
                    reason,
                }
            }
            _ => {
                warn!("Appointment rejected: {}", errors);
                return Err(AppointmentError::Validation(errors));
            }
        };

        let appointment = self
            .appointments
            .insert_appointment(new_appointment)
            .await
            .map_err(|e| {
                error!("Failed to create appointment: {}", e);
                AppointmentError::Database(e)
            })?;

        info!(
            "Created appointment {} for patient {} on {} at {}",
            appointment.id, appointment.patient_id, appointment.appointment_date, appointment.appointment_time
        );
        Ok(appointment)
    }

    pub async fn find_appointment(&self, appointment_id: i64) -> Result<Appointment, AppointmentError> {
        self.appointments
            .find_appointment(appointment_id)
            .await?
            .ok_or(AppointmentError::NotFound)
    }

    /// Apply a partial update. Only a supplied date is checked against `today`.
    #[instrument(skip(self, body))]
    pub async fn update_appointment(
        &self,
        appointment_id: i64,
        body: &Map<String, Value>,
        today: NaiveDate,
    ) -> Result<Appointment, AppointmentError> {
        let existing = self.find_appointment(appointment_id).await?;

        let request = UpdateAppointmentRequest::from_json(body);
        let mut errors = FieldErrors::new();

        let changes = AppointmentChanges {
            appointment_date: errors
                .take(
                    APPOINTMENT_DATE,
                    request
                        .appointment_date
                        .and_then(|d| d.map(|d| not_in_past(d, today)).transpose()),
                )
                .flatten(),
            appointment_time: errors.take(APPOINTMENT_TIME, request.appointment_time).flatten(),
            reason: errors.take(REASON, request.reason).flatten(),
        };

        if !errors.is_empty() {
            warn!("Update of appointment {} rejected: {}", appointment_id, errors);
            return Err(AppointmentError::Validation(errors));
        }

        if changes.is_empty() {
            debug!("No fields supplied for appointment {}", appointment_id);
        }

        let updated = apply_changes(existing, changes);

        match self.appointments.save_appointment(updated).await {
            Ok(appointment) => {
                info!(
                    "Updated appointment {} to {} at {}",
                    appointment.id, appointment.appointment_date, appointment.appointment_time
                );
                Ok(appointment)
            }
            Err(DbError::NotFound(_)) => Err(AppointmentError::NotFound),
            Err(e) => {
                error!("Failed to update appointment {}: {}", appointment_id, e);
                Err(AppointmentError::Database(e))
            }
        }
    }

    /// Remove an appointment, returning the stored id it had.
    #[instrument(skip(self))]
    pub async fn delete_appointment(&self, appointment_id: i64) -> Result<i64, AppointmentError> {
        let appointment = self.find_appointment(appointment_id).await?;

        if !self.appointments.delete_appointment(appointment.id).await? {
            return Err(AppointmentError::NotFound);
        }

        info!("Deleted appointment {}", appointment.id);
        Ok(appointment.id)
    }
}
