use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use shared_database::DbError;
use shared_models::FieldErrors;
use shared_utils::validation::{
    all_of, check_max_length, parse_date, parse_text, required, validate_email, validate_phone,
    EMAIL_MAX_LENGTH,
};

pub const NAME_MAX_LENGTH: usize = 100;
pub const PHONE_MAX_LENGTH: usize = 17;
pub const DUPLICATE_EMAIL: &str = "patient with this email already exists.";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Patient {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub date_of_birth: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl fmt::Display for Patient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (ID: {})", self.name, self.id)
    }
}

/// Validated input for a patient insert.
#[derive(Debug, Clone, PartialEq)]
pub struct NewPatient {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub date_of_birth: NaiveDate,
}

impl NewPatient {
    /// Parse a create request, collecting an error for every bad field.
    /// Email uniqueness is checked against the store separately.
    pub fn from_json(body: &Map<String, Value>) -> Result<Self, FieldErrors> {
        let mut errors = FieldErrors::new();

        let name = errors.take(
            "name",
            required(body, "name").and_then(|v| parse_text(v, Some(NAME_MAX_LENGTH))),
        );
        // Length and format are both checked so each failure gets its message.
        let email = errors.take_all(
            "email",
            required(body, "email")
                .and_then(|v| parse_text(v, None))
                .map_err(|message| vec![message])
                .and_then(|email| {
                    let checks = [check_max_length(&email, EMAIL_MAX_LENGTH), validate_email(&email)];
                    all_of(email, checks)
                }),
        );
        let phone = errors.take_all(
            "phone",
            required(body, "phone")
                .and_then(|v| parse_text(v, None))
                .map_err(|message| vec![message])
                .and_then(|phone| {
                    let checks = [validate_phone(&phone), check_max_length(&phone, PHONE_MAX_LENGTH)];
                    all_of(phone, checks)
                }),
        );
        let date_of_birth = errors.take(
            "date_of_birth",
            required(body, "date_of_birth").and_then(parse_date),
        );

        match (name, email, phone, date_of_birth) {
            (Some(name), Some(email), Some(phone), Some(date_of_birth)) if errors.is_empty() => {
                Ok(Self {
                    name,
                    email,
                    phone,
                    date_of_birth,
                })
            }
            _ => Err(errors),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PatientError {
    #[error("Validation error: {0}")]
    Validation(FieldErrors),

    #[error("Database error: {0}")]
    Database(#[from] DbError),
}
