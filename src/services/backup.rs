//! Backup-service för att exportera alla ärenden

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Local;
use tracing::info;

use crate::db::Database;
use crate::services::snapshot;
use crate::utils::error::AppResult;

/// Resultat av en backup-operation
#[derive(Debug, Clone)]
pub struct BackupResult {
    /// Sökväg till backup-filen
    pub path: PathBuf,
    /// Storlek i bytes
    pub size: u64,
    /// Antal exporterade ärenden
    pub record_count: usize,
    /// Datum för backup
    pub created_at: String,
}

impl BackupResult {
    /// Formatera storlek för visning
    pub fn size_display(&self) -> String {
        format_size(self.size)
    }
}

pub(crate) fn format_size(size: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    match size {
        b if b >= GB => format!("{:.1} GB", b as f64 / GB as f64),
        b if b >= MB => format!("{:.1} MB", b as f64 / MB as f64),
        b if b >= KB => format!("{:.1} KB", b as f64 / KB as f64),
        b => format!("{} B", b),
    }
}

/// Backup-service
pub struct BackupService<'a> {
    db: &'a Database,
}

impl<'a> BackupService<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Hela tabellen som backupbytes, i ID-ordning
    pub fn export_snapshot(&self) -> AppResult<Vec<u8>> {
        let problems = self.db.problems().find_all()?;
        let bytes = snapshot::encode(&problems)?;

        info!("Exporterade {} ärenden ({} bytes)", problems.len(), bytes.len());
        Ok(bytes)
    }

    /// Skriv en backup till fil
    pub fn export_to_file(&self, path: &Path) -> AppResult<BackupResult> {
        let problems = self.db.problems().find_all()?;
        let bytes = snapshot::encode(&problems)?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, &bytes)?;

        info!("Backup sparad: {:?} ({} ärenden)", path, problems.len());

        Ok(BackupResult {
            path: path.to_path_buf(),
            size: bytes.len() as u64,
            record_count: problems.len(),
            created_at: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
        })
    }
}
