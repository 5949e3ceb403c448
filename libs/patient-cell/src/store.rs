use async_trait::async_trait;
use chrono::Utc;
use rusqlite::{params, OptionalExtension, Row};

use shared_database::{Database, DbResult};

use crate::models::{NewPatient, Patient};

const PATIENT_COLUMNS: &str =
    "id, name, email, phone, date_of_birth, created_at, updated_at";

/// Persistence operations for patients.
#[async_trait]
pub trait PatientStore: Send + Sync {
    /// All patients, ordered by name.
    async fn list_patients(&self) -> DbResult<Vec<Patient>>;

    async fn find_patient(&self, id: i64) -> DbResult<Option<Patient>>;

    async fn patient_exists(&self, id: i64) -> DbResult<bool>;

    async fn email_exists(&self, email: &str) -> DbResult<bool>;

    /// Insert and return the stored row. A taken email surfaces as
    /// `DbError::Constraint`.
    async fn insert_patient(&self, patient: NewPatient) -> DbResult<Patient>;

    /// Remove a patient together with all of their appointments.
    async fn delete_patient(&self, id: i64) -> DbResult<bool>;
}

fn patient_from_row(row: &Row<'_>) -> rusqlite::Result<Patient> {
    Ok(Patient {
        id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        phone: row.get(3)?,
        date_of_birth: row.get(4)?,
        created_at: row.get(5)?,
        updated_at: row.get(6)?,
    })
}

#[async_trait]
impl PatientStore for Database {
    async fn list_patients(&self) -> DbResult<Vec<Patient>> {
        self.call(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {} FROM patients ORDER BY name, id",
                PATIENT_COLUMNS
            ))?;
            let rows = stmt.query_map([], patient_from_row)?;
            Ok(rows.collect::<Result<Vec<_>, _>>()?)
        })
        .await
    }

    async fn find_patient(&self, id: i64) -> DbResult<Option<Patient>> {
        self.call(move |conn| {
            Ok(conn
                .query_row(
                    &format!("SELECT {} FROM patients WHERE id = ?1", PATIENT_COLUMNS),
                    [id],
                    patient_from_row,
                )
                .optional()?)
        })
        .await
    }

    async fn patient_exists(&self, id: i64) -> DbResult<bool> {
        self.call(move |conn| {
            Ok(conn.query_row(
                "SELECT EXISTS(SELECT 1 FROM patients WHERE id = ?1)",
                [id],
                |row| row.get(0),
            )?)
        })
        .await
    }

    async fn email_exists(&self, email: &str) -> DbResult<bool> {
        let email = email.to_string();
        self.call(move |conn| {
            Ok(conn.query_row(
                "SELECT EXISTS(SELECT 1 FROM patients WHERE email = ?1)",
                [email],
                |row| row.get(0),
            )?)
        })
        .await
    }

    async fn insert_patient(&self, patient: NewPatient) -> DbResult<Patient> {
        self.call(move |conn| {
            let now = Utc::now();
            conn.execute(
                r#"
                INSERT INTO patients (name, email, phone, date_of_birth, created_at, updated_at)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                "#,
                params![
                    patient.name,
                    patient.email,
                    patient.phone,
                    patient.date_of_birth,
                    now,
                    now,
                ],
            )?;

            Ok(Patient {
                id: conn.last_insert_rowid(),
                name: patient.name,
                email: patient.email,
                phone: patient.phone,
                date_of_birth: patient.date_of_birth,
                created_at: now,
                updated_at: now,
            })
        })
        .await
    }

    async fn delete_patient(&self, id: i64) -> DbResult<bool> {
        self.call(move |conn| Ok(conn.execute("DELETE FROM patients WHERE id = ?1", [id])? > 0))
            .await
    }
}
