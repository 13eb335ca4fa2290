use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::utils::date::Calendar;
use crate::utils::path::{get_config_path, DataLocation};

/// Standardantal ärenden i listvyn
pub const DEFAULT_RECENT_LIMIT: u32 = 20;

/// Användarinställningar (settings.toml)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    /// Explicit datakatalog, går före `portable`
    pub data_dir: Option<PathBuf>,
    /// Lägg databasen bredvid programfilen
    pub portable: bool,
    pub recent_limit: u32,
    /// Max antal tecken av problem/lösning i listvyn
    pub preview_length: usize,
    pub calendar: Calendar,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            data_dir: None,
            portable: false,
            recent_limit: DEFAULT_RECENT_LIMIT,
            preview_length: 100,
            calendar: Calendar::default(),
        }
    }
}

impl AppSettings {
    pub fn load() -> Self {
        Self::load_from(&get_config_path())
    }

    /// Ladda från fil; saknad eller trasig fil ger standardvärden
    pub fn load_from(path: &Path) -> Self {
        let Ok(content) = std::fs::read_to_string(path) else {
            return Self::default();
        };

        match toml::from_str::<Self>(&content) {
            Ok(mut settings) => {
                if settings.recent_limit == 0 {
                    settings.recent_limit = DEFAULT_RECENT_LIMIT;
                }
                settings
            }
            Err(e) => {
                tracing::warn!("Ogiltig inställningsfil {:?}: {}", path, e);
                Self::default()
            }
        }
    }

    pub fn save(&self) -> anyhow::Result<()> {
        self.save_to(&get_config_path())
    }

    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, self.to_toml()?)?;

        Ok(())
    }

    /// Kommandoradens val går före inställningsfilen
    pub fn apply_overrides(
        &mut self,
        data_dir: Option<PathBuf>,
        portable: bool,
        calendar: Option<Calendar>,
    ) {
        if let Some(dir) = data_dir {
            self.data_dir = Some(dir);
        }
        if portable {
            self.portable = true;
        }
        if let Some(calendar) = calendar {
            self.calendar = calendar;
        }
    }

    pub fn to_toml(&self) -> anyhow::Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Var databasen ska ligga enligt inställningarna
    pub fn data_location(&self) -> DataLocation {
        match (&self.data_dir, self.portable) {
            (Some(dir), _) => DataLocation::Override(dir.clone()),
            (None, true) => DataLocation::Portable,
            (None, false) => DataLocation::Platform,
        }
    }
}
