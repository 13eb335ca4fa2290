//! Restore-service för att återställa från backup

use std::fs;
use std::path::Path;

use tracing::{info, warn};

use crate::db::Database;
use crate::services::backup::format_size;
use crate::services::snapshot;
use crate::utils::error::ImportError;

/// Förhandsgranskning av restore
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestorePreview {
    /// Antal ärenden i backup
    pub record_count: usize,
    /// Lägsta och högsta ID
    pub id_range: Option<(i64, i64)>,
    /// Storlek i bytes
    pub total_size: u64,
}

impl RestorePreview {
    /// Formatera total storlek för visning
    pub fn size_display(&self) -> String {
        format_size(self.total_size)
    }
}

/// Restore-service
pub struct RestoreService<'a> {
    db: &'a Database,
}

impl<'a> RestoreService<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Förhandsgranska en backup utan att röra databasen
    pub fn preview(&self, bytes: &[u8]) -> Result<RestorePreview, ImportError> {
        let problems = snapshot::decode(bytes)?;

        let id_range = problems
            .iter()
            .map(|p| p.id)
            .fold(None, |range: Option<(i64, i64)>, id| match range {
                Some((lo, hi)) => Some((lo.min(id), hi.max(id))),
                None => Some((id, id)),
            });

        Ok(RestorePreview {
            record_count: problems.len(),
            id_range,
            total_size: bytes.len() as u64,
        })
    }

    /// Ersätt alla ärenden med innehållet i en backup
    ///
    /// Destruktivt. Vid fel lämnas befintliga ärenden orörda.
    pub fn import_snapshot(&self, bytes: &[u8]) -> Result<usize, ImportError> {
        let problems = match snapshot::decode(bytes) {
            Ok(problems) => problems,
            Err(e) => {
                warn!("Ogiltig backup: {}", e);
                return Err(e);
            }
        };

        let count = self.db.problems().replace_all(&problems)?;
        info!("Återställde {} ärenden från backup", count);

        Ok(count)
    }

    /// Återställ från backup-fil
    pub fn import_from_file(&self, path: &Path) -> Result<usize, ImportError> {
        let bytes = fs::read(path)?;
        self.import_snapshot(&bytes)
    }
}
