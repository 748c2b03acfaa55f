//! Error types and handling for the `CityGuide` data services

use thiserror::Error;

/// Main error type for the `CityGuide` library
#[derive(Error, Debug)]
pub enum GuideError {
    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Network communication errors (transport failures, non-2xx responses)
    #[error("Network error: {message}")]
    Network { message: String },

    /// Payload decoding errors (malformed JSON, unexpected shape)
    #[error("Parse error: {message}")]
    Parse { message: String },

    /// Key-value storage errors
    #[error("Storage error: {message}")]
    Storage { message: String },

    /// Input validation errors
    #[error("Invalid input: {message}")]
    Validation { message: String },

    /// I/O operation errors
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl GuideError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new network error
    pub fn network<S: Into<String>>(message: S) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    /// Create a new parse error
    pub fn parse<S: Into<String>>(message: S) -> Self {
        Self::Parse {
            message: message.into(),
        }
    }

    /// Create a new storage error
    pub fn storage<S: Into<String>>(message: S) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            GuideError::Config { .. } => {
                "Configuration error. Please check your config file.".to_string()
            }
            GuideError::Network { .. } => {
                "Unable to reach the guide service. Please check your internet connection."
                    .to_string()
            }
            GuideError::Parse { .. } => {
                "Received unreadable guide data. Please try again later.".to_string()
            }
            GuideError::Storage { .. } => {
                "Local guide storage failed. You may need to clear the app's data.".to_string()
            }
            GuideError::Validation { message } => {
                format!("Invalid input: {message}")
            }
            GuideError::Io { .. } => {
                "File operation failed. Please check file permissions.".to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let config_err = GuideError::config("missing base URL");
        assert!(matches!(config_err, GuideError::Config { .. }));

        let network_err = GuideError::network("connection refused");
        assert!(matches!(network_err, GuideError::Network { .. }));

        let validation_err = GuideError::validation("unknown city");
        assert!(matches!(validation_err, GuideError::Validation { .. }));
    }

    #[test]
    fn test_user_messages() {
        let config_err = GuideError::config("test");
        assert!(config_err.user_message().contains("Configuration error"));

        let network_err = GuideError::network("test");
        assert!(network_err.user_message().contains("Unable to reach"));

        let validation_err = GuideError::validation("test input");
        assert!(validation_err.user_message().contains("test input"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let guide_err: GuideError = io_err.into();
        assert!(matches!(guide_err, GuideError::Io { .. }));
    }
}
