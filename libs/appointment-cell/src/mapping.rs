//! Translation between the PascalCase wire format and stored appointments.
//!
//! Everything here is pure; semantic checks that need the store or the clock
//! live in the booking service.

use serde_json::{Map, Value};

use shared_utils::validation::{optional, parse_date, parse_integer, parse_text, parse_time, required};

use crate::models::{
    Appointment, AppointmentChanges, AppointmentResponse, CreateAppointmentRequest,
    DeleteAppointmentResponse, UpdateAppointmentRequest, DELETED_MESSAGE, DISPLAY_ID_OFFSET,
};

pub const PATIENT_ID: &str = "PatientId";
pub const APPOINTMENT_DATE: &str = "AppointmentDate";
pub const APPOINTMENT_TIME: &str = "AppointmentTime";
pub const REASON: &str = "Reason";

pub fn display_id(stored_id: i64) -> i64 {
    stored_id + DISPLAY_ID_OFFSET
}

impl CreateAppointmentRequest {
    pub fn from_json(body: &Map<String, Value>) -> Self {
        Self {
            patient_id: required(body, PATIENT_ID).and_then(parse_integer),
            appointment_date: required(body, APPOINTMENT_DATE).and_then(parse_date),
            appointment_time: required(body, APPOINTMENT_TIME).and_then(parse_time),
            reason: required(body, REASON).and_then(|v| parse_text(v, None)),
        }
    }
}

impl UpdateAppointmentRequest {
    pub fn from_json(body: &Map<String, Value>) -> Self {
        Self {
            appointment_date: optional(body, APPOINTMENT_DATE)
                .and_then(|v| v.map(parse_date).transpose()),
            appointment_time: optional(body, APPOINTMENT_TIME)
                .and_then(|v| v.map(parse_time).transpose()),
            reason: optional(body, REASON).and_then(|v| v.map(|v| parse_text(v, None)).transpose()),
        }
    }
}

/// Overwrite only the supplied fields.
pub fn apply_changes(mut appointment: Appointment, changes: AppointmentChanges) -> Appointment {
    if let Some(date) = changes.appointment_date {
        appointment.appointment_date = date;
    }
    if let Some(time) = changes.appointment_time {
        appointment.appointment_time = time;
    }
    if let Some(reason) = changes.reason {
        appointment.reason = reason;
    }
    appointment
}

pub fn to_response(appointment: &Appointment, message: &str) -> AppointmentResponse {
    AppointmentResponse {
        appointment_id: display_id(appointment.id),
        patient_id: appointment.patient_id,
        appointment_date: appointment.appointment_date,
        appointment_time: appointment.appointment_time,
        reason: appointment.reason.clone(),
        message: message.to_string(),
    }
}

pub fn to_delete_response(stored_id: i64) -> DeleteAppointmentResponse {
    DeleteAppointmentResponse {
        message: DELETED_MESSAGE.to_string(),
        appointment_id: display_id(stored_id),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime, Utc};
    use serde_json::json;
    use shared_utils::validation::{INVALID_INTEGER, INVALID_TIME, NOT_BLANK, NOT_NULL, REQUIRED};

    use crate::models::CREATED_MESSAGE;

    fn appointment() -> Appointment {
        let now = Utc::now();
        Appointment {
            id: 1,
            patient_id: 4,
            appointment_date: NaiveDate::from_ymd_opt(2030, 3, 1).unwrap(),
            appointment_time: NaiveTime::from_hms_opt(9, 15, 0).unwrap(),
            reason: "Annual checkup".to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_display_id_offset() {
        assert_eq!(display_id(1), 101);
        assert_eq!(display_id(57), 157);
    }

    #[test]
    fn test_response_uses_pascal_case_and_display_id() {
        let body = serde_json::to_value(to_response(&appointment(), CREATED_MESSAGE)).unwrap();
        assert_eq!(
            body,
            json!({
                "AppointmentId": 101,
                "PatientId": 4,
                "AppointmentDate": "2030-03-01",
                "AppointmentTime": "09:15:00",
                "Reason": "Annual checkup",
                "Message": "Appointment created successfully"
            })
        );
    }

    #[test]
    fn test_delete_response_shape() {
        let body = serde_json::to_value(to_delete_response(7)).unwrap();
        assert_eq!(
            body,
            json!({"message": "Appointment deleted successfully", "AppointmentId": 107})
        );
    }

    #[test]
    fn test_create_request_parses_each_field() {
        let body = json!({
            "PatientId": "4",
            "AppointmentDate": "2030-03-01",
            "AppointmentTime": "09:15",
            "Reason": "Annual checkup"
        });
        let request = CreateAppointmentRequest::from_json(body.as_object().unwrap());

        assert_eq!(request.patient_id, Ok(4));
        assert_eq!(request.appointment_date, Ok(NaiveDate::from_ymd_opt(2030, 3, 1).unwrap()));
        assert_eq!(request.appointment_time, Ok(NaiveTime::from_hms_opt(9, 15, 0).unwrap()));
        assert_eq!(request.reason, Ok("Annual checkup".to_string()));
    }

    #[test]
    fn test_create_request_keeps_field_failures() {
        let body = json!({"PatientId": "four", "AppointmentTime": "9am", "Reason": ""});
        let request = CreateAppointmentRequest::from_json(body.as_object().unwrap());

        assert_eq!(request.patient_id, Err(INVALID_INTEGER.to_string()));
        assert_eq!(request.appointment_date, Err(REQUIRED.to_string()));
        assert_eq!(request.appointment_time, Err(INVALID_TIME.to_string()));
        assert_eq!(request.reason, Err(NOT_BLANK.to_string()));
    }

    #[test]
    fn test_update_request_absent_fields_are_none() {
        let body = json!({"Reason": "Follow-up", "AppointmentTime": null});
        let request = UpdateAppointmentRequest::from_json(body.as_object().unwrap());

        assert_eq!(request.appointment_date, Ok(None));
        assert_eq!(request.appointment_time, Err(NOT_NULL.to_string()));
        assert_eq!(request.reason, Ok(Some("Follow-up".to_string())));
    }

    #[test]
    fn test_apply_changes_is_partial() {
        let original = appointment();
        let updated = apply_changes(
            original.clone(),
            AppointmentChanges {
                reason: Some("Follow-up".to_string()),
                ..Default::default()
            },
        );

        assert_eq!(updated.reason, "Follow-up");
        assert_eq!(updated.appointment_date, original.appointment_date);
        assert_eq!(updated.appointment_time, original.appointment_time);
        assert_eq!(updated.id, original.id);
    }
}
