//! Error types for the Rulenav application.

use serde::Serialize;
use thiserror::Error;

/// A shared error type for the entire Rulenav application.
///
/// This provides typed, structured error variants with automatic conversion
/// from common error types via the `From` trait.
#[derive(Error, Debug, Clone, Serialize)]
pub enum NavigatorError {
    /// Entity not found error with type information
    #[error("Entity not found: {entity_type} '{id}'")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// Backend request failed (connection error or non-2xx status)
    #[error("Backend error{}: {message}", .status_code.map(|s| format!(" ({s})")).unwrap_or_default())]
    Backend {
        status_code: Option<u16>,
        message: String,
    },

    /// Event stream error (malformed event or broken stream)
    #[error("Stream error: {0}")]
    Stream(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization { format: String, message: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl NavigatorError {
    /// Creates a NotFound error
    pub fn not_found(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type,
            id: id.into(),
        }
    }

    /// Creates a Backend error without an HTTP status (connection-level failure)
    pub fn unreachable(message: impl Into<String>) -> Self {
        Self::Backend {
            status_code: None,
            message: message.into(),
        }
    }

    /// Creates a Backend error carrying an HTTP status code
    pub fn backend(status_code: u16, message: impl Into<String>) -> Self {
        Self::Backend {
            status_code: Some(status_code),
            message: message.into(),
        }
    }

    /// Creates a Stream error
    pub fn stream(message: impl Into<String>) -> Self {
        Self::Stream(message.into())
    }

    /// Creates a JSON Serialization error
    pub fn json(message: impl Into<String>) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: message.into(),
        }
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Check if this is a NotFound error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a backend-side failure (unreachable or error status).
    ///
    /// The dispatch pipeline uses this to decide whether the fallback
    /// responder should take over.
    pub fn is_backend(&self) -> bool {
        matches!(self, Self::Backend { .. } | Self::Stream(_))
    }
}

impl From<serde_json::Error> for NavigatorError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

/// Conversion from String (for error messages)
impl From<String> for NavigatorError {
    fn from(err: String) -> Self {
        Self::Internal(err)
    }
}

/// A type alias for `Result<T, NavigatorError>`.
pub type Result<T> = std::result::Result<T, NavigatorError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_constructor_is_a_serialization_error() {
        let err = NavigatorError::json("unexpected field");
        assert!(matches!(
            err,
            NavigatorError::Serialization { ref format, .. } if format == "JSON"
        ));
        // Decode failures are not stream or backend failures.
        assert!(!matches!(err, NavigatorError::Stream(_)));
        assert_eq!(
            err.to_string(),
            "Serialization error: JSON - unexpected field"
        );
    }

    #[test]
    fn backend_error_display_includes_status_when_present() {
        let with_status = NavigatorError::backend(503, "unavailable");
        assert_eq!(with_status.to_string(), "Backend error (503): unavailable");

        let without_status = NavigatorError::unreachable("connection refused");
        assert_eq!(
            without_status.to_string(),
            "Backend error: connection refused"
        );
    }
}
