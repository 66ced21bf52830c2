//! Typed error handling for the vouch validation engine
//!
//! Data-shape problems never surface here: failed constraints, unknown values
//! and disallowed properties are all recorded in the returned
//! [`ValidationError`] tree. [`ValidatorError`] is reserved for problems the
//! caller has to fix in code or configuration.
//!
//! # Example
//!
//! ```rust,ignore
//! match validator.validate_or_reject(&payload, "user", &options).await {
//!     Ok(cleaned) => save(cleaned),
//!     Err(ValidatorError::Rejected(errors)) => respond_unprocessable(errors),
//!     Err(e) => panic!("validator misconfigured: {}", e),
//! }
//! ```

use crate::core::validation::ValidationError;
use thiserror::Error;

/// Hard failures of a validation call
#[derive(Debug, Error)]
pub enum ValidatorError {
    /// The options bundle is malformed (e.g. a blank group name)
    #[error("Invalid validator options: {message}")]
    InvalidOptions { message: String },

    /// The metadata store could not be read
    #[error("Metadata store unavailable: {message}")]
    MetadataUnavailable { message: String },

    /// Registered metadata is inconsistent (e.g. an inheritance cycle)
    #[error("Invalid metadata for class '{class_name}': {message}")]
    InvalidMetadata { class_name: String, message: String },

    /// The object failed validation (only produced by `validate_or_reject`)
    #[error("Validation failed for {} propert(ies)", .0.len())]
    Rejected(Vec<ValidationError>),
}

impl ValidatorError {
    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            ValidatorError::InvalidOptions { .. } => "INVALID_OPTIONS",
            ValidatorError::MetadataUnavailable { .. } => "METADATA_UNAVAILABLE",
            ValidatorError::InvalidMetadata { .. } => "INVALID_METADATA",
            ValidatorError::Rejected(_) => "VALIDATION_REJECTED",
        }
    }

    /// The validation errors carried by a rejection, if any
    pub fn validation_errors(&self) -> Option<&[ValidationError]> {
        match self {
            ValidatorError::Rejected(errors) => Some(errors),
            _ => None,
        }
    }

    /// Get additional details for the error
    pub fn details(&self) -> Option<serde_json::Value> {
        match self {
            ValidatorError::InvalidMetadata { class_name, .. } => {
                Some(serde_json::json!({ "class_name": class_name }))
            }
            ValidatorError::Rejected(errors) => Some(serde_json::json!({ "errors": errors })),
            _ => None,
        }
    }

    pub(crate) fn lock_poisoned(err: impl std::fmt::Display) -> Self {
        ValidatorError::MetadataUnavailable {
            message: format!("Failed to acquire lock: {}", err),
        }
    }
}
