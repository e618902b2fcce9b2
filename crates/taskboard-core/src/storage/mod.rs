mod config;
pub mod database;
pub mod migrations;
mod repository;

pub use config::{Config, TaskDefaults, UiConfig};
pub use database::Database;
pub use repository::Repository;

use std::path::PathBuf;

use crate::error::ConfigError;

/// Returns the directory holding `taskboard.db` and `config.toml`.
///
/// `TASKBOARD_HOME` wins when set. Otherwise `~/.config/taskboard[-dev]/`,
/// picked by `TASKBOARD_ENV=dev`. The directory is created if missing.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let dir = match std::env::var_os("TASKBOARD_HOME") {
        Some(home) => PathBuf::from(home),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("TASKBOARD_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("taskboard-dev")
            } else {
                base_dir.join("taskboard")
            }
        }
    };

    std::fs::create_dir_all(&dir).map_err(|e| ConfigError::DataDir {
        path: dir.clone(),
        message: e.to_string(),
    })?;
    Ok(dir)
}
