// libs/appointment-cell/src/models.rs
use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveTime, Timelike, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use shared_database::DbError;
use shared_models::FieldErrors;

/// Added to the stored id wherever an appointment id appears in a response
/// body. Path parameters always carry the stored id.
pub const DISPLAY_ID_OFFSET: i64 = 100;

pub const PATIENT_NOT_FOUND: &str = "Patient with this ID does not exist.";
pub const DATE_IN_PAST: &str = "Appointment date cannot be in the past.";
pub const APPOINTMENT_NOT_FOUND: &str = "Appointment not found";

pub const CREATED_MESSAGE: &str = "Appointment created successfully";
pub const UPDATED_MESSAGE: &str = "Appointment updated successfully";
pub const DELETED_MESSAGE: &str = "Appointment deleted successfully";

// ==============================================================================
// STORED RECORDS
// ==============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: i64,
    pub patient_id: i64,
    pub appointment_date: NaiveDate,
    pub appointment_time: NaiveTime,
    pub reason: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Listing row. `patient_name` is read through the patient relation, never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppointmentListItem {
    pub id: i64,
    pub patient: i64,
    pub patient_name: String,
    pub appointment_date: NaiveDate,
    #[serde(with = "iso_time")]
    pub appointment_time: NaiveTime,
    pub reason: String,
    pub created_at: DateTime<Utc>,
}

impl fmt::Display for AppointmentListItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Appointment for {} on {} at {}",
            self.patient_name, self.appointment_date, self.appointment_time
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewAppointment {
    pub patient_id: i64,
    pub appointment_date: NaiveDate,
    pub appointment_time: NaiveTime,
    pub reason: String,
}

/// Fields supplied by a partial update. `None` leaves the stored value alone.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppointmentChanges {
    pub appointment_date: Option<NaiveDate>,
    pub appointment_time: Option<NaiveTime>,
    pub reason: Option<String>,
}

impl AppointmentChanges {
    pub fn is_empty(&self) -> bool {
        self.appointment_date.is_none() && self.appointment_time.is_none() && self.reason.is_none()
    }
}

// ==============================================================================
// WIRE MODELS
// ==============================================================================

/// `HH:MM:SS`, with microseconds only when the time has a fraction.
mod iso_time {
    use super::*;

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        let format = if time.nanosecond() == 0 {
            "%H:%M:%S"
        } else {
            "%H:%M:%S%.6f"
        };
        serializer.collect_str(&time.format(format))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        NaiveTime::deserialize(deserializer)
    }
}

/// Create body after format parsing; each field keeps its own parse result so
/// all failures can be reported together.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateAppointmentRequest {
    pub patient_id: Result<i64, String>,
    pub appointment_date: Result<NaiveDate, String>,
    pub appointment_time: Result<NaiveTime, String>,
    pub reason: Result<String, String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UpdateAppointmentRequest {
    pub appointment_date: Result<Option<NaiveDate>, String>,
    pub appointment_time: Result<Option<NaiveTime>, String>,
    pub reason: Result<Option<String>, String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AppointmentResponse {
    pub appointment_id: i64,
    pub patient_id: i64,
    pub appointment_date: NaiveDate,
    #[serde(with = "iso_time")]
    pub appointment_time: NaiveTime,
    pub reason: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteAppointmentResponse {
    pub message: String,
    #[serde(rename = "AppointmentId")]
    pub appointment_id: i64,
}

// ==============================================================================
// ERRORS
// ==============================================================================

#[derive(Debug, thiserror::Error)]
pub enum AppointmentError {
    #[error("Appointment not found")]
    NotFound,

    #[error("Validation error: {0}")]
    Validation(FieldErrors),

    #[error("Database error: {0}")]
    Database(#[from] DbError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn response(time: NaiveTime) -> AppointmentResponse {
        AppointmentResponse {
            appointment_id: 101,
            patient_id: 1,
            appointment_date: NaiveDate::from_ymd_opt(2030, 6, 1).unwrap(),
            appointment_time: time,
            reason: "Checkup".to_string(),
            message: CREATED_MESSAGE.to_string(),
        }
    }

    #[test]
    fn test_time_written_with_seconds() {
        let value = serde_json::to_value(response(NaiveTime::from_hms_opt(10, 0, 0).unwrap())).unwrap();
        assert_eq!(value["AppointmentTime"], json!("10:00:00"));
    }

    #[test]
    fn test_fractional_time_padded_to_microseconds() {
        let time = NaiveTime::from_hms_milli_opt(10, 0, 0, 250).unwrap();
        let value = serde_json::to_value(response(time)).unwrap();
        assert_eq!(value["AppointmentTime"], json!("10:00:00.250000"));

        let back: AppointmentResponse = serde_json::from_value(value).unwrap();
        assert_eq!(back.appointment_time, time);
    }

    #[test]
    fn test_list_item_display_names_patient() {
        let item = AppointmentListItem {
            id: 101,
            patient: 1,
            patient_name: "John Doe".to_string(),
            appointment_date: NaiveDate::from_ymd_opt(2030, 6, 1).unwrap(),
            appointment_time: NaiveTime::from_hms_opt(9, 30, 0).unwrap(),
            reason: "Checkup".to_string(),
            created_at: Utc::now(),
        };

        assert_eq!(item.to_string(), "Appointment for John Doe on 2030-06-01 at 09:30:00");
    }
}
