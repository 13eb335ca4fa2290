use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Databasfel: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("IO-fel: {0}")]
    Io(#[from] std::io::Error),

    #[error("Valideringsfel: {0}")]
    Validation(String),

    #[error("Ärende med ID {0} hittades inte")]
    NotFound(i64),

    #[error("Kunde inte serialisera backup: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Import misslyckades: {0}")]
    Import(#[from] ImportError),

    #[error("Databasanslutningen är låst av en avbruten operation")]
    LockPoisoned,
}

impl AppError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

/// Orsak till att en backup inte kunde läsas in
#[derive(Error, Debug)]
pub enum ImportError {
    #[error("ogiltig JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("post {index}: {reason}")]
    Shape { index: usize, reason: String },

    #[error("databasfel under import: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("kunde inte läsa backup-fil: {0}")]
    Io(#[from] std::io::Error),

    #[error("databasanslutningen är låst av en avbruten operation")]
    LockPoisoned,
}

impl ImportError {
    pub fn shape(index: usize, reason: impl Into<String>) -> Self {
        Self::Shape {
            index,
            reason: reason.into(),
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;
