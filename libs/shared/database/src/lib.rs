//! SQLite-backed store shared by the patient and appointment cells.

mod schema;

pub use schema::SCHEMA;

use std::path::Path;
use std::sync::{Arc, Mutex};

use rusqlite::{Connection, ErrorCode};
use thiserror::Error;
use tracing::{debug, error};

use shared_config::AppConfig;

#[derive(Error, Debug)]
pub enum DbError {
    /// Unique, foreign key or not-null rule rejected by the engine.
    #[error("{0}")]
    Constraint(String),

    #[error("SQLite error: {0}")]
    Sqlite(rusqlite::Error),

    #[error("Record not found: {0}")]
    NotFound(String),

    #[error("Database task failed: {0}")]
    Task(String),
}

impl DbError {
    pub fn is_constraint(&self) -> bool {
        matches!(self, DbError::Constraint(_))
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(err: rusqlite::Error) -> Self {
        match err {
            rusqlite::Error::SqliteFailure(failure, message)
                if failure.code == ErrorCode::ConstraintViolation =>
            {
                DbError::Constraint(message.unwrap_or_else(|| failure.to_string()))
            }
            other => DbError::Sqlite(other),
        }
    }
}

pub type DbResult<T> = Result<T, DbError>;

/// Cloneable handle to the clinic database.
///
/// A single connection sits behind a mutex; each [`Database::call`] holds it for
/// the whole closure, so a closure is the unit of atomicity for callers.
#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    /// Open database at path, creating it and its tables if needed.
    pub fn open<P: AsRef<Path>>(path: P) -> DbResult<Self> {
        debug!("Opening database at {}", path.as_ref().display());
        Self::initialize(Connection::open(path)?)
    }

    pub fn open_in_memory() -> DbResult<Self> {
        Self::initialize(Connection::open_in_memory()?)
    }

    pub fn from_config(config: &AppConfig) -> DbResult<Self> {
        if config.is_in_memory() {
            Self::open_in_memory()
        } else {
            Self::open(&config.database_path)
        }
    }

    fn initialize(conn: Connection) -> DbResult<Self> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Run `f` against the connection on the blocking pool.
    pub async fn call<F, T>(&self, f: F) -> DbResult<T>
    where
        F: FnOnce(&mut Connection) -> DbResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let conn = Arc::clone(&self.conn);

        tokio::task::spawn_blocking(move || {
            let mut guard = conn
                .lock()
                .map_err(|_| DbError::Task("connection mutex poisoned".to_string()))?;
            f(&mut *guard)
        })
        .await
        .map_err(|e| {
            error!("Database task aborted: {}", e);
            DbError::Task(e.to_string())
        })?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[tokio::test]
    async fn test_open_in_memory() {
        let db = Database::open_in_memory().unwrap();
        let tables: Vec<String> = db
            .call(|conn| {
                let mut stmt = conn.prepare(
                    "SELECT name FROM sqlite_master WHERE type='table' ORDER BY name",
                )?;
                let rows = stmt.query_map([], |row| row.get(0))?;
                Ok(rows.collect::<Result<Vec<String>, _>>()?)
            })
            .await
            .unwrap();

        assert!(tables.contains(&"patients".to_string()));
        assert!(tables.contains(&"appointments".to_string()));
    }

    #[tokio::test]
    async fn test_constraint_violation_classified() {
        let db = Database::open_in_memory().unwrap();
        let insert = |conn: &mut Connection| -> DbResult<()> {
            conn.execute(
                "INSERT INTO patients (name, email, phone, date_of_birth, created_at, updated_at)
                 VALUES ('Jane Smith', 'jane.smith@example.com', '+1234567891', '1985-08-22', 'now', 'now')",
                [],
            )?;
            Ok(())
        };

        db.call(insert).await.unwrap();
        let err = db.call(insert).await.unwrap_err();

        assert!(err.is_constraint());
        assert_matches!(err, DbError::Constraint(msg) if msg.contains("UNIQUE constraint failed"));
    }

    #[tokio::test]
    async fn test_other_errors_not_constraints() {
        let db = Database::open_in_memory().unwrap();
        let err = db
            .call(|conn| {
                conn.execute("SELECT * FROM no_such_table", [])?;
                Ok(())
            })
            .await
            .unwrap_err();

        assert_matches!(err, DbError::Sqlite(_));
    }

    #[tokio::test]
    async fn test_file_database_persists_between_opens() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clinic.db");

        {
            let db = Database::open(&path).unwrap();
            db.call(|conn| {
                conn.execute(
                    "INSERT INTO patients (name, email, phone, date_of_birth, created_at, updated_at)
                     VALUES ('David Wilson', 'david.wilson@example.com', '+1234567894', '1995-07-09', 'now', 'now')",
                    [],
                )?;
                Ok(())
            })
            .await
            .unwrap();
        }

        let db = Database::open(&path).unwrap();
        let count: i64 = db
            .call(|conn| Ok(conn.query_row("SELECT COUNT(*) FROM patients", [], |row| row.get(0))?))
            .await
            .unwrap();
        assert_eq!(count, 1);
    }
}
