//! Applikationsskal: håller vad som visas och anropar lagret
//!
//! Skalet äger ingen data. Efter varje ändring hämtas listan på nytt.

use std::path::{Path, PathBuf};

use crate::db::Database;
use crate::models::{AppSettings, Problem, SearchScope};
use crate::services::{BackupResult, BackupService, RestorePreview, RestoreService};
use crate::utils::error::{AppError, AppResult};

/// Statusrad längst ned i vyn
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusMessage {
    Info(String),
    Success(String),
    Error(String),
}

impl StatusMessage {
    pub fn text(&self) -> &str {
        match self {
            Self::Info(s) | Self::Success(s) | Self::Error(s) => s,
        }
    }
}

/// Fält att ändra i ett ärende; `None` behåller nuvarande värde
#[derive(Debug, Clone, Default)]
pub struct EntryChanges {
    pub date: Option<String>,
    pub subject: Option<String>,
    pub problem: Option<String>,
    pub solution: Option<String>,
}

/// Huvudapplikation
pub struct TrackerApp {
    db: Database,
    settings: AppSettings,
    /// Senast renderade lista
    records: Vec<Problem>,
    status: Option<StatusMessage>,
}

impl TrackerApp {
    pub fn new(db: Database, settings: AppSettings) -> Self {
        Self {
            db,
            settings,
            records: Vec::new(),
            status: None,
        }
    }

    pub fn records(&self) -> &[Problem] {
        &self.records
    }

    pub fn status(&self) -> Option<&StatusMessage> {
        self.status.as_ref()
    }

    pub fn settings(&self) -> &AppSettings {
        &self.settings
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    /// Ladda de senaste ärendena
    pub fn load_entries(&mut self, limit: Option<u32>) -> AppResult<&[Problem]> {
        let limit = limit.unwrap_or(self.settings.recent_limit);
        self.records = self.db.problems().list_recent(limit)?;
        self.set_info(format!("Visar {} ärenden", self.records.len()));
        Ok(&self.records)
    }

    /// Sök; tomt nyckelord visar de senaste ärendena
    pub fn search(&mut self, keyword: &str, scope: SearchScope) -> AppResult<&[Problem]> {
        if keyword.is_empty() {
            return self.load_entries(None);
        }

        self.records = self.db.problems().search(keyword, scope)?;
        self.set_info(format!("Hittade {} matchande ärenden", self.records.len()));
        Ok(&self.records)
    }

    pub fn show_details(&self, id: i64) -> AppResult<Problem> {
        self.db.problems().get(id)
    }

    /// Nytt ärende
    pub fn add_entry(&mut self, subject: &str, problem: &str, solution: &str) -> AppResult<i64> {
        let id = self.track(self.db.problems().create(subject, problem, solution))?;

        self.load_entries(None)?;
        self.set_success("Nytt ärende sparat");
        Ok(id)
    }

    /// Spara redigerat ärende
    pub fn save_entry(&mut self, problem: &Problem) -> AppResult<()> {
        self.track(self.db.problems().update(
            problem.id,
            &problem.date,
            &problem.subject,
            &problem.problem,
            &problem.solution,
        ))?;

        self.load_entries(None)?;
        self.set_success(format!("Ärende {} uppdaterat", problem.id));
        Ok(())
    }

    /// Ändra valda fält; nytt datum måste finnas i databasens kalender
    pub fn edit_entry(&mut self, id: i64, changes: EntryChanges) -> AppResult<Problem> {
        let mut problem = self.track(self.db.problems().get(id))?;

        if let Some(date) = changes.date {
            let calendar = self.db.calendar();
            if !calendar.is_valid_date(&date) {
                return self.track(Err(AppError::validation(format!(
                    "{} är inget giltigt {}-datum (YYYY-MM-DD)",
                    date.trim(),
                    calendar
                ))));
            }
            problem.date = date.trim().to_string();
        }
        if let Some(subject) = changes.subject {
            problem.subject = subject;
        }
        if let Some(text) = changes.problem {
            problem.problem = text;
        }
        if let Some(solution) = changes.solution {
            problem.solution = solution;
        }

        self.save_entry(&problem)?;
        Ok(problem)
    }

    pub fn delete_entry(&mut self, id: i64) -> AppResult<()> {
        self.track(self.db.problems().delete(id))?;

        self.load_entries(None)?;
        self.set_success("Ärendet borttaget");
        Ok(())
    }

    /// Exportera till fil; utan sökväg används `backup.bak` i aktuell katalog
    pub fn export_backup(&mut self, path: Option<&Path>) -> AppResult<BackupResult> {
        let path = path
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(crate::utils::path::DEFAULT_BACKUP_FILENAME));

        let result = self.track(BackupService::new(&self.db).export_to_file(&path))?;

        self.set_success(format!("Backup sparad som {}", result.path.display()));
        Ok(result)
    }

    pub fn preview_backup(&self, bytes: &[u8]) -> AppResult<RestorePreview> {
        Ok(RestoreService::new(&self.db).preview(bytes)?)
    }

    /// Återställ från fil och ladda om listan
    pub fn import_and_refresh(&mut self, path: &Path) -> AppResult<usize> {
        let imported = RestoreService::new(&self.db).import_from_file(path);
        let count = self.track(imported.map_err(AppError::from))?;

        self.load_entries(None)?;
        self.set_success(format!("Databasen återställd från {}", path.display()));
        Ok(count)
    }

    fn set_info(&mut self, msg: impl Into<String>) {
        self.status = Some(StatusMessage::Info(msg.into()));
    }

    fn set_success(&mut self, msg: impl Into<String>) {
        self.status = Some(StatusMessage::Success(msg.into()));
    }

    /// Fel visas i statusraden och skickas vidare
    fn track<T>(&mut self, result: AppResult<T>) -> AppResult<T> {
        if let Err(e) = &result {
            self.status = Some(StatusMessage::Error(e.to_string()));
        }
        result
    }
}
