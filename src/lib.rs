//! IT Problem Tracker - ärendelogg för IT-support
//!
//! Ärenden (datum, ämne, problem, lösning) lagras i en lokal SQLite-fil
//! och kan exporteras till och återställas från en JSON-backup.

pub mod app;
pub mod db;
pub mod models;
pub mod services;
pub mod utils;

// Re-exports
pub use app::{EntryChanges, StatusMessage, TrackerApp};
pub use db::Database;
pub use models::*;
pub use utils::error::{AppError, AppResult, ImportError};
