use std::path::{Path, PathBuf};

/// Databasens filnamn i datakatalogen
pub const DATABASE_FILENAME: &str = "problems.db";

/// Standardnamn för exporterade backuper
pub const DEFAULT_BACKUP_FILENAME: &str = "backup.bak";

/// Katalognamn under plattformens datakatalog
pub fn app_dir_name() -> &'static str {
    if cfg!(any(target_os = "macos", target_os = "windows")) {
        "IT_Problem_Tracker"
    } else {
        "it_problem_tracker"
    }
}

/// Var datafilen ska ligga
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataLocation {
    /// Plattformens applikationsdatakatalog (installerad app)
    Platform,
    /// Bredvid den körbara filen (ej paketerad körning)
    Portable,
    /// Explicit katalog från inställningar eller kommandorad
    Override(PathBuf),
}

impl DataLocation {
    /// Lös upp datakatalogen
    ///
    /// Ren funktion av miljön: samma plattform och paketering ger samma sökväg.
    pub fn resolve(&self) -> PathBuf {
        match self {
            Self::Override(dir) => dir.clone(),
            Self::Portable => executable_dir(),
            Self::Platform => platform_data_dir(),
        }
    }
}

/// `~/Library/Application Support`, `%APPDATA%` eller `~/.local/share`
pub fn platform_data_dir() -> PathBuf {
    let base = if cfg!(any(target_os = "macos", target_os = "windows")) {
        dirs::data_dir()
    } else {
        // Alltid ~/.local/share, oberoende av XDG_DATA_HOME
        dirs::home_dir().map(|home| home.join(".local").join("share"))
    };

    base.map(|base| base.join(app_dir_name()))
        .unwrap_or_else(executable_dir)
}

/// Katalogen där programfilen ligger
pub fn executable_dir() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Hämta databassökväg i en datakatalog
pub fn get_database_path(data_dir: &Path) -> PathBuf {
    data_dir.join(DATABASE_FILENAME)
}

/// Hämta konfigurationssökväg
pub fn get_config_path() -> PathBuf {
    directories::ProjectDirs::from("", "", "IT_Problem_Tracker")
        .map(|dirs| dirs.config_dir().join("settings.toml"))
        .unwrap_or_else(|| PathBuf::from("settings.toml"))
}

/// Normalisera sökväg för visning
pub fn display_path(path: &Path) -> String {
    // Förkorta hemkatalogen till ~
    if let Some(home) = dirs::home_dir() {
        if let Ok(stripped) = path.strip_prefix(&home) {
            return format!("~/{}", stripped.display());
        }
    }
    path.display().to_string()
}
