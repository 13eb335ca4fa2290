//! Hjälpfunktioner: fel, datum och sökvägar

pub mod date;
pub mod error;
pub mod path;

pub use date::{Calendar, JalaliDate};
pub use error::{AppError, AppResult, ImportError};
