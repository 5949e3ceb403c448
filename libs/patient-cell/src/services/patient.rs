use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::{debug, error, info, warn};

use shared_database::DbError;
use shared_models::FieldErrors;

use crate::models::{NewPatient, Patient, PatientError, DUPLICATE_EMAIL};
use crate::store::PatientStore;

pub struct PatientService {
    store: Arc<dyn PatientStore>,
}

impl PatientService {
    pub fn new(store: Arc<dyn PatientStore>) -> Self {
        Self { store }
    }

    pub async fn list_patients(&self) -> Result<Vec<Patient>, PatientError> {
        debug!("Listing patients");

        self.store.list_patients().await.map_err(|e| {
            error!("Failed to list patients: {}", e);
            PatientError::Database(e)
        })
    }

    pub async fn create_patient(&self, body: &Map<String, Value>) -> Result<Patient, PatientError> {
        let mut errors = FieldErrors::new();

        let parsed = match NewPatient::from_json(body) {
            Ok(patient) => Some(patient),
            Err(field_errors) => {
                errors = field_errors;
                None
            }
        };

        // Uniqueness is reported alongside format errors, so check it even when
        // other fields failed.
        let email = match &parsed {
            Some(patient) => Some(patient.email.clone()),
            None if !errors.contains("email") => body
                .get("email")
                .and_then(Value::as_str)
                .map(|e| e.trim().to_string()),
            None => None,
        };

        if let Some(email) = email {
            debug!("Checking email uniqueness for {}", email);
            if self.store.email_exists(&email).await? {
                errors.add("email", DUPLICATE_EMAIL);
            }
        }

        let new_patient = match parsed {
            Some(patient) if errors.is_empty() => patient,
            _ => {
                warn!("Patient rejected: {}", errors);
                return Err(PatientError::Validation(errors));
            }
        };

        match self.store.insert_patient(new_patient).await {
            Ok(patient) => {
                info!("Created patient {}", patient);
                Ok(patient)
            }
            // Lost a race with a concurrent insert of the same email
            Err(DbError::Constraint(msg)) => {
                warn!("Patient insert hit constraint: {}", msg);
                Err(PatientError::Validation(FieldErrors::single("email", DUPLICATE_EMAIL)))
            }
            Err(e) => {
                error!("Failed to create patient: {}", e);
                Err(PatientError::Database(e))
            }
        }
    }
}
