//! Error types for VeilMarket
//!
//! One enum is the common base of the whole taxonomy: callers can always
//! tell a known, named failure of this system apart from an unexpected
//! underlying error, and the action surface renders every variant into a
//! one-line `Error: <description>` string.

use crate::SchemaKind;
use thiserror::Error;

/// Result type for VeilMarket operations
pub type Result<T> = std::result::Result<T, VeilMarketError>;

/// VeilMarket error types
#[derive(Debug, Clone, Error)]
pub enum VeilMarketError {
    // ========================================================================
    // Storage Cluster Errors
    // ========================================================================

    /// Could not establish the connection to the storage cluster
    #[error("Failed to initialize storage cluster connection: {message}")]
    Initialization { message: String },

    /// Registering a structural schema with the cluster failed
    #[error("Failed to create {kind} schema: {message}")]
    SchemaCreation { kind: SchemaKind, message: String },

    /// Writing a record batch failed
    #[error("Failed to write records: {message}")]
    Write { message: String },

    /// Reading records failed
    #[error("Failed to read records: {message}")]
    Read { message: String },

    // ========================================================================
    // Boundary Errors
    // ========================================================================

    /// Malformed request data
    #[error("Invalid input: {field} - {reason}")]
    InvalidInput { field: String, reason: String },

    /// An action requires a remote schema that has not been provisioned
    #[error("No remote schema configured for {kind} records; run create_remote_schema first")]
    MissingSchema { kind: SchemaKind },

    /// Bad node list or credentials
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    // ========================================================================
    // Domain Errors
    // ========================================================================

    /// Booking-related failure
    #[error("Booking {booking_id} failed: {reason}")]
    Booking { booking_id: String, reason: String },

    /// Feedback-related failure
    #[error("Feedback {feedback_id} failed: {reason}")]
    Feedback {
        feedback_id: String,
        reason: String,
    },

    // ========================================================================
    // General Errors
    // ========================================================================

    /// Internal error
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl VeilMarketError {
    /// Create an initialization error
    pub fn initialization(message: impl Into<String>) -> Self {
        Self::Initialization {
            message: message.into(),
        }
    }

    /// Create a write error
    pub fn write(message: impl Into<String>) -> Self {
        Self::Write {
            message: message.into(),
        }
    }

    /// Create a read error
    pub fn read(message: impl Into<String>) -> Self {
        Self::Read {
            message: message.into(),
        }
    }

    /// Create an invalid input error
    pub fn invalid_input(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Get an error code for logs and host responses
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Initialization { .. } => "INITIALIZATION_FAILED",
            Self::SchemaCreation { .. } => "SCHEMA_CREATION_FAILED",
            Self::Write { .. } => "WRITE_FAILED",
            Self::Read { .. } => "READ_FAILED",
            Self::InvalidInput { .. } => "INVALID_INPUT",
            Self::MissingSchema { .. } => "MISSING_SCHEMA",
            Self::Configuration { .. } => "CONFIGURATION_FAILED",
            Self::Booking { .. } => "BOOKING_FAILED",
            Self::Feedback { .. } => "FEEDBACK_FAILED",
            Self::Internal { .. } => "INTERNAL_ERROR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        let err = VeilMarketError::MissingSchema {
            kind: SchemaKind::Booking,
        };
        assert_eq!(err.error_code(), "MISSING_SCHEMA");
    }

    #[test]
    fn test_missing_schema_names_the_kind() {
        let err = VeilMarketError::MissingSchema {
            kind: SchemaKind::Feedback,
        };
        assert!(err.to_string().contains("feedback"));
    }

    #[test]
    fn test_invalid_input_constructor() {
        let err = VeilMarketError::invalid_input("duration_minutes", "below minimum");
        assert_eq!(err.error_code(), "INVALID_INPUT");
        assert!(err.to_string().contains("duration_minutes"));
    }

    #[test]
    fn test_domain_wrappers_carry_their_identifier() {
        let err = VeilMarketError::Booking {
            booking_id: "booking-1".to_string(),
            reason: "cluster rejected the batch".to_string(),
        };
        assert_eq!(err.error_code(), "BOOKING_FAILED");
        assert!(err.to_string().contains("booking-1"));

        let err = VeilMarketError::Feedback {
            feedback_id: "fb-1".to_string(),
            reason: "cluster rejected the batch".to_string(),
        };
        assert_eq!(err.error_code(), "FEEDBACK_FAILED");
    }
}
