use async_trait::async_trait;
use chrono::Utc;
use rusqlite::{params, OptionalExtension, Row};

use shared_database::{Database, DbError, DbResult};

use crate::models::{Appointment, AppointmentListItem, NewAppointment};

const APPOINTMENT_COLUMNS: &str =
    "id, patient_id, appointment_date, appointment_time, reason, created_at, updated_at";

/// Persistence operations for appointments.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AppointmentStore: Send + Sync {
    /// All appointments with their patient's name, ordered by date then time.
    async fn list_appointments(&self) -> DbResult<Vec<AppointmentListItem>>;

    async fn find_appointment(&self, id: i64) -> DbResult<Option<Appointment>>;

    /// Fails with `DbError::Constraint` when the patient is unknown or the
    /// (patient, date, time) slot is already taken.
    async fn insert_appointment(&self, appointment: NewAppointment) -> DbResult<Appointment>;

    /// Persist date, time and reason, refreshing `updated_at`.
    async fn save_appointment(&self, appointment: Appointment) -> DbResult<Appointment>;

    async fn delete_appointment(&self, id: i64) -> DbResult<bool>;
}

fn appointment_from_row(row: &Row<'_>) -> rusqlite::Result<Appointment> {
    Ok(Appointment {
        id: row.get(0)?,
        patient_id: row.get(1)?,
        appointment_date: row.get(2)?,
        appointment_time: row.get(3)?,
        reason: row.get(4)?,
        created_at: row.get(5)?,
        updated_at: row.get(6)?,
    })
}

#[async_trait]
impl AppointmentStore for Database {
    async fn list_appointments(&self) -> DbResult<Vec<AppointmentListItem>> {
        self.call(|conn| {
            let mut stmt = conn.prepare(
                r#"
                SELECT a.id, a.patient_id, p.name, a.appointment_date,
                       a.appointment_time, a.reason, a.created_at
                FROM appointments a
                JOIN patients p ON p.id = a.patient_id
                ORDER BY a.appointment_date, a.appointment_time, a.id
                "#,
            )?;

            let rows = stmt.query_map([], |row| {
                Ok(AppointmentListItem {
                    id: row.get(0)?,
                    patient: row.get(1)?,
                    patient_name: row.get(2)?,
                    appointment_date: row.get(3)?,
                    appointment_time: row.get(4)?,
                    reason: row.get(5)?,
                    created_at: row.get(6)?,
                })
            })?;

            Ok(rows.collect::<Result<Vec<_>, _>>()?)
        })
        .await
    }

    async fn find_appointment(&self, id: i64) -> DbResult<Option<Appointment>> {
        self.call(move |conn| {
            Ok(conn
                .query_row(
                    &format!("SELECT {} FROM appointments WHERE id = ?1", APPOINTMENT_COLUMNS),
                    [id],
                    appointment_from_row,
                )
                .optional()?)
        })
        .await
    }

    async fn insert_appointment(&self, appointment: NewAppointment) -> DbResult<Appointment> {
        self.call(move |conn| {
            let now = Utc::now();
            conn.execute(
                r#"
                INSERT INTO appointments (
                    patient_id, appointment_date, appointment_time, reason,
                    created_at, updated_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                "#,
                params![
                    appointment.patient_id,
                    appointment.appointment_date,
                    appointment.appointment_time,
                    appointment.reason,
                    now,
                    now,
                ],
            )?;

            Ok(Appointment {
                id: conn.last_insert_rowid(),
                patient_id: appointment.patient_id,
                appointment_date: appointment.appointment_date,
                appointment_time: appointment.appointment_time,
                reason: appointment.reason,
                created_at: now,
                updated_at: now,
            })
        })
        .await
    }

    async fn save_appointment(&self, appointment: Appointment) -> DbResult<Appointment> {
        self.call(move |conn| {
            let now = Utc::now();
            let rows_affected = conn.execute(
                r#"
                UPDATE appointments SET
                    appointment_date = ?2,
                    appointment_time = ?3,
                    reason = ?4,
                    updated_at = ?5
                WHERE id = ?1
                "#,
                params![
                    appointment.id,
                    appointment.appointment_date,
                    appointment.appointment_time,
                    appointment.reason,
                    now,
                ],
            )?;

            if rows_affected == 0 {
                return Err(DbError::NotFound(format!("appointment {}", appointment.id)));
            }

            Ok(Appointment {
                updated_at: now,
                ..appointment
            })
        })
        .await
    }

    async fn delete_appointment(&self, id: i64) -> DbResult<bool> {
        self.call(move |conn| {
            Ok(conn.execute("DELETE FROM appointments WHERE id = ?1", [id])? > 0)
        })
        .await
    }
}
