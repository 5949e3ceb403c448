//! SQLite schema for the clinic store.

pub const SCHEMA: &str = r#"
PRAGMA foreign_keys = ON;

-- ============================================================================
-- Patients
-- ============================================================================

CREATE TABLE IF NOT EXISTS patients (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    email TEXT NOT NULL UNIQUE,
    phone TEXT NOT NULL,
    date_of_birth TEXT NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_patients_name ON patients(name);

-- ============================================================================
-- Appointments
-- ============================================================================

CREATE TABLE IF NOT EXISTS appointments (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    patient_id INTEGER NOT NULL REFERENCES patients(id) ON DELETE CASCADE,
    appointment_date TEXT NOT NULL,
    appointment_time TEXT NOT NULL,
    reason TEXT NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL,
    UNIQUE (patient_id, appointment_date, appointment_time)
);

CREATE INDEX IF NOT EXISTS idx_appointments_schedule
    ON appointments(appointment_date, appointment_time);
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    fn seeded() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(SCHEMA).unwrap();
        conn.execute(
            "INSERT INTO patients (name, email, phone, date_of_birth, created_at, updated_at)
             VALUES ('John Doe', 'john.doe@example.com', '+1234567890', '1990-05-15', 'now', 'now')",
            [],
        )
        .unwrap();
        conn
    }

    #[test]
    fn test_schema_valid() {
        let conn = Connection::open_in_memory().unwrap();
        let result = conn.execute_batch(SCHEMA);
        assert!(result.is_ok(), "Schema should be valid SQL: {:?}", result);

        // Applying twice is a no-op
        assert!(conn.execute_batch(SCHEMA).is_ok());
    }

    #[test]
    fn test_duplicate_email_rejected() {
        let conn = seeded();
        let result = conn.execute(
            "INSERT INTO patients (name, email, phone, date_of_birth, created_at, updated_at)
             VALUES ('Other', 'john.doe@example.com', '+1234567899', '1991-01-01', 'now', 'now')",
            [],
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_appointment_slot_unique() {
        let conn = seeded();
        let insert = "INSERT INTO appointments
            (patient_id, appointment_date, appointment_time, reason, created_at, updated_at)
            VALUES (1, '2030-01-01', ?1, 'Checkup', 'now', 'now')";

        assert!(conn.execute(insert, ["10:00:00"]).is_ok());
        assert!(conn.execute(insert, ["10:00:00"]).is_err());
        assert!(conn.execute(insert, ["11:00:00"]).is_ok());
    }

    #[test]
    fn test_appointment_requires_patient() {
        let conn = seeded();
        let result = conn.execute(
            "INSERT INTO appointments
             (patient_id, appointment_date, appointment_time, reason, created_at, updated_at)
             VALUES (42, '2030-01-01', '10:00:00', 'Checkup', 'now', 'now')",
            [],
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_patient_delete_cascades() {
        let conn = seeded();
        conn.execute(
            "INSERT INTO appointments
             (patient_id, appointment_date, appointment_time, reason, created_at, updated_at)
             VALUES (1, '2030-01-01', '10:00:00', 'Checkup', 'now', 'now')",
            [],
        )
        .unwrap();

        conn.execute("DELETE FROM patients WHERE id = 1", []).unwrap();

        let remaining: i64 = conn
            .query_row("SELECT COUNT(*) FROM appointments", [], |row| row.get(0))
            .unwrap();
        assert_eq!(remaining, 0);
    }
}
