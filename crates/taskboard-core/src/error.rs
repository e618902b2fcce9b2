//! Core error types for taskboard-core.
//!
//! This module defines the error hierarchy using thiserror. Storage
//! failures, configuration problems and rejected user input each get
//! their own enum, and everything funnels into [`CoreError`].

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for taskboard-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Database-related errors
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Database-specific errors.
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Failed to open database connection
    #[error("Failed to open database at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Migration failed
    #[error("Database migration failed: {0}")]
    MigrationFailed(String),

    /// A stored row could not be decoded into a domain value
    #[error("Corrupt row in {table}: {message}")]
    CorruptRow { table: &'static str, message: String },

    /// Database is locked
    #[error("Database is locked")]
    Locked,
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Unknown configuration key
    #[error("unknown config key: {0}")]
    UnknownKey(String),

    /// Data directory could not be located or created
    #[error("Cannot prepare data directory {path}: {message}")]
    DataDir { path: PathBuf, message: String },
}

/// Validation errors.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ValidationError {
    /// Task text is empty after trimming
    #[error("Task cannot be empty")]
    EmptyTaskText,

    /// Priority string is not one of High, Medium, Low
    #[error("Unknown priority '{0}' (expected High, Medium or Low)")]
    UnknownPriority(String),

    /// Visibility filter string is not recognised
    #[error("Unknown visibility filter '{0}'")]
    UnknownVisibility(String),

    /// Theme name is not recognised
    #[error("Unknown theme '{0}'")]
    UnknownTheme(String),

    /// Profile age outside 0..=120
    #[error("Age must be between 0 and 120, got {0}")]
    AgeOutOfRange(u32),

    /// Gender string is not one of the profile choices
    #[error("Unknown gender '{0}'")]
    UnknownGender(String),

    /// Login attempted without both email and password
    #[error("Please enter both email & password.")]
    MissingCredentials,

    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

impl From<rusqlite::Error> for DatabaseError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(e, _msg) => {
                if e.code == rusqlite::ErrorCode::DatabaseLocked
                    || e.code == rusqlite::ErrorCode::DatabaseBusy
                {
                    DatabaseError::Locked
                } else {
                    DatabaseError::QueryFailed(err.to_string())
                }
            }
            _ => DatabaseError::QueryFailed(err.to_string()),
        }
    }
}

impl From<rusqlite::Error> for CoreError {
    fn from(err: rusqlite::Error) -> Self {
        CoreError::Database(err.into())
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rusqlite_errors_become_query_failures() {
        let err: DatabaseError = rusqlite::Error::QueryReturnedNoRows.into();
        assert!(matches!(err, DatabaseError::QueryFailed(_)));
    }

    #[test]
    fn validation_messages_are_user_facing() {
        assert_eq!(ValidationError::EmptyTaskText.to_string(), "Task cannot be empty");
        let err = CoreError::from(ValidationError::UnknownPriority("Urgent".into()));
        assert_eq!(
            err.to_string(),
            "Validation error: Unknown priority 'Urgent' (expected High, Medium or Low)"
        );
    }
}
