pub mod schema;
pub mod migrations;
pub mod problem_repo;

use rusqlite::Connection;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::info;

use crate::utils::date::Calendar;
use crate::utils::error::{AppError, AppResult};

pub use problem_repo::ProblemRepository;

/// Huvuddatabas-wrapper, skapas en gång vid start och skickas vidare
pub struct Database {
    conn: Arc<Mutex<Connection>>,
    path: Option<PathBuf>,
    calendar: Calendar,
}

impl Database {
    /// Öppna eller skapa databas och säkerställ schemat
    pub fn open(path: &Path) -> AppResult<Self> {
        // Skapa katalog om den inte finns
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;

        // Konfigurera SQLite
        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA busy_timeout = 5000;
            "
        )?;

        info!("Databas öppnad: {:?}", path);

        let db = Self {
            conn: Arc::new(Mutex::new(conn)),
            path: Some(path.to_path_buf()),
            calendar: Calendar::default(),
        };
        db.migrate()?;
        Ok(db)
    }

    /// Öppna in-memory databas (för tester)
    pub fn open_in_memory() -> AppResult<Self> {
        let conn = Connection::open_in_memory()?;

        let db = Self {
            conn: Arc::new(Mutex::new(conn)),
            path: None,
            calendar: Calendar::default(),
        };
        db.migrate()?;
        Ok(db)
    }

    /// Välj kalender för datumstämpling av nya ärenden
    pub fn with_calendar(mut self, calendar: Calendar) -> Self {
        self.calendar = calendar;
        self
    }

    /// Kör databasmigrationer
    pub fn migrate(&self) -> AppResult<()> {
        let conn = lock(&self.conn)?;
        migrations::run_migrations(&conn)?;
        Ok(())
    }

    /// Hämta ärende-repository
    pub fn problems(&self) -> ProblemRepository {
        ProblemRepository::new(Arc::clone(&self.conn), self.calendar)
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn calendar(&self) -> Calendar {
        self.calendar
    }

    #[cfg(test)]
    pub(crate) fn conn_for_tests(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap()
    }
}

impl Clone for Database {
    fn clone(&self) -> Self {
        Self {
            conn: Arc::clone(&self.conn),
            path: self.path.clone(),
            calendar: self.calendar,
        }
    }
}

/// Lås anslutningen; en förgiftad mutex blir ett lagringsfel
pub(crate) fn lock(conn: &Mutex<Connection>) -> AppResult<MutexGuard<'_, Connection>> {
    conn.lock().map_err(|_| AppError::LockPoisoned)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_open_creates_directory_and_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("problems.db");

        let db = Database::open(&path).unwrap();
        assert!(path.exists());
        assert_eq!(db.path(), Some(path.as_path()));
        assert_eq!(db.problems().count().unwrap(), 0);
    }

    #[test]
    fn test_reopen_keeps_data() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("problems.db");

        let id = {
            let db = Database::open(&path).unwrap();
            db.problems().create("Skärm flimrar", "", "Ny kabel").unwrap()
        };

        let db = Database::open(&path).unwrap();
        let problem = db.problems().get(id).unwrap();
        assert_eq!(problem.subject, "Skärm flimrar");
        assert_eq!(problem.solution, "Ny kabel");
    }
}
