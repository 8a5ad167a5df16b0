//! Error types for grainview.
//!
//! This module defines all error types used throughout the grainview crate,
//! providing detailed context for debugging and user-friendly error messages.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for grainview operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Dataset Errors ===
    /// The sample dataset could not be read.
    #[error("failed to read dataset at {path}: {source}")]
    DatasetRead {
        /// Path to the dataset file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The sample dataset is not a valid JSON array of samples.
    #[error("failed to parse dataset at {path}: {source}")]
    DatasetParse {
        /// Path to the dataset file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: serde_json::Error,
    },

    // === Storage Errors ===
    /// Failed to open or create the local store.
    #[error("failed to open local store at {path}: {source}")]
    DatabaseOpen {
        /// Path to the database file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: rusqlite::Error,
    },

    /// A database query failed.
    #[error("database query failed: {0}")]
    DatabaseQuery(#[from] rusqlite::Error),

    /// Failed to run database migrations.
    #[error("database migration failed: {message}")]
    DatabaseMigration {
        /// Description of what went wrong.
        message: String,
    },

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === Device Registry Errors ===
    /// No device with the given id exists.
    #[error("device not found: {id}")]
    DeviceNotFound {
        /// The id that was looked up.
        id: String,
    },

    /// A device form was rejected.
    #[error("invalid device: {message}")]
    InvalidDevice {
        /// Description of the problem.
        message: String,
    },

    // === Settings Errors ===
    /// A settings key or value was rejected.
    #[error("invalid setting '{key}': {message}")]
    InvalidSetting {
        /// The settings key.
        key: String,
        /// Description of the problem.
        message: String,
    },

    // === I/O Errors ===
    /// File system operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to create a required directory.
    #[error("failed to create directory {path}: {source}")]
    DirectoryCreate {
        /// Path that couldn't be created.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === Serialization Errors ===
    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // === Generic Errors ===
    /// An internal error occurred (bug).
    #[error("internal error: {0}")]
    Internal(String),
}

/// A specialized Result type for grainview operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a new internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Create a device-not-found error.
    #[must_use]
    pub fn device_not_found(id: impl Into<String>) -> Self {
        Self::DeviceNotFound { id: id.into() }
    }

    /// Create an invalid device error.
    #[must_use]
    pub fn invalid_device(message: impl Into<String>) -> Self {
        Self::InvalidDevice {
            message: message.into(),
        }
    }

    /// Create an invalid setting error.
    #[must_use]
    pub fn invalid_setting(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidSetting {
            key: key.into(),
            message: message.into(),
        }
    }

    /// Check if this error came from loading the sample dataset.
    #[must_use]
    pub fn is_dataset_error(&self) -> bool {
        matches!(self, Self::DatasetRead { .. } | Self::DatasetParse { .. })
    }

    /// Check if this error is a missing device.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::DeviceNotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::device_not_found("D42");
        assert_eq!(err.to_string(), "device not found: D42");

        let err = Error::internal("test error");
        assert_eq!(err.to_string(), "internal error: test error");
    }

    #[test]
    fn test_is_not_found() {
        assert!(Error::device_not_found("x").is_not_found());
        assert!(!Error::internal("x").is_not_found());
    }

    #[test]
    fn test_is_dataset_error() {
        let err = Error::DatasetRead {
            path: PathBuf::from("/data/samples.json"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        };
        assert!(err.is_dataset_error());
        assert!(!Error::invalid_device("blank").is_dataset_error());
    }

    #[test]
    fn test_dataset_read_display() {
        let err = Error::DatasetRead {
            path: PathBuf::from("/data/samples.json"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        };
        let msg = err.to_string();
        assert!(msg.contains("/data/samples.json"));
        assert!(msg.contains("missing"));
    }

    #[test]
    fn test_dataset_parse_display() {
        let source = serde_json::from_str::<Vec<i32>>("{").unwrap_err();
        let err = Error::DatasetParse {
            path: PathBuf::from("samples.json"),
            source,
        };
        assert!(err.to_string().starts_with("failed to parse dataset at samples.json"));
        assert!(err.is_dataset_error());
    }

    #[test]
    fn test_invalid_setting_display() {
        let err = Error::invalid_setting("language", "unknown language 'fr'");
        assert_eq!(
            err.to_string(),
            "invalid setting 'language': unknown language 'fr'"
        );
    }

    #[test]
    fn test_invalid_device_display() {
        let err = Error::invalid_device("device id is required");
        assert!(err.to_string().contains("device id is required"));
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_from_json_error() {
        let json_result: std::result::Result<i32, serde_json::Error> =
            serde_json::from_str("not valid json");
        if let Err(json_err) = json_result {
            let err: Error = json_err.into();
            assert!(matches!(err, Error::Json(_)));
        }
    }

    #[test]
    fn test_from_rusqlite_error() {
        let result = rusqlite::Connection::open_with_flags(
            "/nonexistent/path/db.sqlite",
            rusqlite::OpenFlags::SQLITE_OPEN_READ_ONLY,
        );
        if let Err(sqlite_err) = result {
            let err: Error = sqlite_err.into();
            assert!(matches!(err, Error::DatabaseQuery(_)));
        }
    }

    #[test]
    fn test_database_migration_error_display() {
        let err = Error::DatabaseMigration {
            message: "version mismatch".to_string(),
        };
        assert!(err.to_string().contains("version mismatch"));
    }

    #[test]
    fn test_config_validation_error_display() {
        let err = Error::ConfigValidation {
            message: "page_size must be greater than 0".to_string(),
        };
        assert!(err.to_string().contains("page_size"));
    }

    #[test]
    fn test_directory_create_error_display() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let err = Error::DirectoryCreate {
            path: PathBuf::from("/root/forbidden"),
            source: io_err,
        };
        assert!(err.to_string().contains("/root/forbidden"));
    }
}
