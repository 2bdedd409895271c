//! pomo-core - Shared functionality for the pomo timer
//!
//! Standard paths, the settings file and clock formatting.

pub mod config;
pub mod format;
pub mod paths;

pub use config::{ConfigError, Settings};
pub use paths::Paths;
