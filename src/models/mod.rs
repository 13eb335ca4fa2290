pub mod problem;
pub mod config;

pub use problem::*;
pub use config::*;
