//! Tjänster för ärendeloggen
//!
//! Backup och återställning ovanpå databaslagret.

pub mod backup;
pub mod restore;
pub mod snapshot;

pub use backup::{BackupResult, BackupService};
pub use restore::{RestorePreview, RestoreService};
