//! Error types and handling for the Travel Essence core

use std::collections::BTreeMap;

use thiserror::Error;

/// Main error type for the booking and weather core
#[derive(Error, Debug)]
pub enum TravelError {
    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Input validation errors
    #[error("Invalid input: {message}")]
    Validation { message: String },

    /// One or more form fields failed their rule chain
    #[error("{} field(s) failed validation", errors.len())]
    InvalidFields { errors: BTreeMap<String, String> },

    /// Durable store errors
    #[error("Storage error: {message}")]
    Storage { message: String },

    /// Booking submission errors
    #[error("Submission error: {message}")]
    Submission { message: String },

    /// I/O operation errors
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl TravelError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn invalid_fields(errors: BTreeMap<String, String>) -> Self {
        Self::InvalidFields { errors }
    }

    /// Create a new storage error
    pub fn storage<S: Into<String>>(message: S) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    /// Create a new submission error
    pub fn submission<S: Into<String>>(message: S) -> Self {
        Self::Submission {
            message: message.into(),
        }
    }

    /// Per-field messages when this is an `InvalidFields` error
    #[must_use]
    pub fn field_errors(&self) -> Option<&BTreeMap<String, String>> {
        match self {
            TravelError::InvalidFields { errors } => Some(errors),
            _ => None,
        }
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            TravelError::Config { .. } => {
                "Configuration error. Please check your config file and API keys.".to_string()
            }
            TravelError::Validation { message } => format!("Invalid input: {message}"),
            TravelError::InvalidFields { .. } => {
                "Please correct the errors in the form".to_string()
            }
            TravelError::Storage { .. } => {
                "Saved booking data could not be accessed.".to_string()
            }
            TravelError::Submission { .. } => {
                "Booking submission failed. Please try again.".to_string()
            }
            TravelError::Io { .. } => {
                "File operation failed. Please check file permissions.".to_string()
            }
        }
    }
}

impl From<anyhow::Error> for TravelError {
    fn from(err: anyhow::Error) -> Self {
        TravelError::storage(format!("{err:#}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let config_err = TravelError::config("missing API key");
        assert!(matches!(config_err, TravelError::Config { .. }));

        let validation_err = TravelError::validation("step 9 does not exist");
        assert!(matches!(validation_err, TravelError::Validation { .. }));

        let storage_err = TravelError::storage("disk full");
        assert!(matches!(storage_err, TravelError::Storage { .. }));
    }

    #[test]
    fn test_user_messages() {
        let config_err = TravelError::config("test");
        assert!(config_err.user_message().contains("Configuration error"));

        let submission_err = TravelError::submission("timeout");
        assert!(submission_err.user_message().contains("try again"));

        let validation_err = TravelError::validation("test input");
        assert!(validation_err.user_message().contains("test input"));
    }

    #[test]
    fn test_invalid_fields_exposes_messages() {
        let mut errors = BTreeMap::new();
        errors.insert("email".to_string(), "Please enter a valid email address".to_string());
        let err = TravelError::invalid_fields(errors);

        assert_eq!(err.to_string(), "1 field(s) failed validation");
        assert_eq!(
            err.field_errors().and_then(|e| e.get("email")).map(String::as_str),
            Some("Please enter a valid email address")
        );
        assert!(TravelError::config("x").field_errors().is_none());
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: TravelError = io_err.into();
        assert!(matches!(err, TravelError::Io { .. }));
    }
}
