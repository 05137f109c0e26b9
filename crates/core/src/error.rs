//! Error types for Civic Ledger forms
//!
//! Field validation problems are *not* errors: they are returned as values
//! from the validation engine. This type covers everything else: misuse of
//! the form API, schema files, attachment bookkeeping and submit failures.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for the form engine
#[derive(Debug, Error)]
pub enum FormError {
    // ========================================================================
    // Validation Errors
    // ========================================================================
    /// General validation error (used when a whole form must be rejected)
    #[error("Validation error: {0}")]
    Validation(String),

    /// A single field failed validation outside of the normal blur/submit flow
    #[error("Field validation failed for '{field}': {message}")]
    FieldValidation { field: String, message: String },

    // ========================================================================
    // Form API Errors
    // ========================================================================
    /// Field name is not part of the form
    #[error("Unknown field: '{0}'")]
    UnknownField(String),

    /// Operation does not apply to this kind of field
    #[error("Field '{field}' is a {kind} field, expected {expected}")]
    WrongKind {
        field: String,
        kind: String,
        expected: String,
    },

    /// Duplicate field name in a descriptor list
    #[error("Duplicate field name: '{0}' already exists")]
    DuplicateField(String),

    /// Attachment index out of range
    #[error("Attachment index {index} out of range for '{field}' ({len} entries)")]
    AttachmentIndex {
        field: String,
        index: usize,
        len: usize,
    },

    /// Attachment rejected before it reached the form
    #[error("Attachment '{file_name}' rejected: {message}")]
    AttachmentRejected { file_name: String, message: String },

    /// Line-item row index out of range
    #[error("Row {index} out of range for '{prefix}' ({len} rows)")]
    RowIndex {
        prefix: String,
        index: usize,
        len: usize,
    },

    // ========================================================================
    // Submit Errors
    // ========================================================================
    /// The submit callback rejected
    #[error("Submit failed: {0}")]
    Submit(String),

    /// Operation cancelled by user
    #[error("Operation cancelled")]
    Cancelled,

    // ========================================================================
    // Schema / IO Errors
    // ========================================================================
    /// Invalid schema definition
    #[error("Invalid form schema: {0}")]
    InvalidSchema(String),

    /// Schema file not found
    #[error("Schema not found at path: {0}")]
    SchemaNotFound(PathBuf),

    /// Schema version mismatch
    #[error("Schema version mismatch: expected {expected}, found {found}")]
    SchemaVersionMismatch { expected: u32, found: u32 },

    /// File IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// File read error
    #[error("Failed to read file '{path}': {message}")]
    FileRead { path: PathBuf, message: String },

    /// File write error
    #[error("Failed to write file '{path}': {message}")]
    FileWrite { path: PathBuf, message: String },

    /// JSON serialization error
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parse error
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ========================================================================
    // Generic Errors
    // ========================================================================
    /// Internal error (should not happen)
    #[error("Internal error: {0}")]
    Internal(String),

    /// Generic error with context
    #[error("{context}: {message}")]
    WithContext { context: String, message: String },
}

impl FormError {
    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        FormError::Validation(msg.into())
    }

    /// Create a field validation error
    pub fn field_validation(field: impl Into<String>, msg: impl Into<String>) -> Self {
        FormError::FieldValidation {
            field: field.into(),
            message: msg.into(),
        }
    }

    /// Create a submit error from anything displayable
    pub fn submit(msg: impl std::fmt::Display) -> Self {
        FormError::Submit(msg.to_string())
    }

    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        FormError::Internal(msg.into())
    }

    /// Create an error with context
    pub fn with_context(context: impl Into<String>, msg: impl Into<String>) -> Self {
        FormError::WithContext {
            context: context.into(),
            message: msg.into(),
        }
    }

    /// Check if this error is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            FormError::Validation(_) | FormError::FieldValidation { .. }
        )
    }

    /// Check if this error comes from misusing the form API
    pub fn is_usage(&self) -> bool {
        matches!(
            self,
            FormError::UnknownField(_)
                | FormError::WrongKind { .. }
                | FormError::DuplicateField(_)
                | FormError::AttachmentIndex { .. }
                | FormError::RowIndex { .. }
        )
    }

    /// Check if this error is an IO error
    pub fn is_io(&self) -> bool {
        matches!(
            self,
            FormError::Io(_)
                | FormError::FileRead { .. }
                | FormError::FileWrite { .. }
                | FormError::SchemaNotFound(_)
        )
    }
}

/// Result type alias using FormError
pub type FormResult<T> = Result<T, FormError>;

/// Extension trait for adding context to errors
pub trait ResultExt<T> {
    /// Add context to an error
    fn with_context<C: Into<String>>(self, context: C) -> FormResult<T>;
}

impl<T, E: Into<FormError>> ResultExt<T> for Result<T, E> {
    fn with_context<C: Into<String>>(self, context: C) -> FormResult<T> {
        self.map_err(|e| {
            let err: FormError = e.into();
            FormError::WithContext {
                context: context.into(),
                message: err.to_string(),
            }
        })
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_validation_error() {
        let err = FormError::validation("Form has errors");
        assert!(err.is_validation());
        assert!(!err.is_usage());
        assert_eq!(err.to_string(), "Validation error: Form has errors");
    }

    #[test]
    fn test_field_validation_error() {
        let err = FormError::field_validation("amount", "Amount must be a number");
        assert!(err.is_validation());
        assert_eq!(
            err.to_string(),
            "Field validation failed for 'amount': Amount must be a number"
        );
    }

    #[test]
    fn test_usage_errors() {
        let err = FormError::UnknownField("payee".to_string());
        assert!(err.is_usage());
        assert_eq!(err.to_string(), "Unknown field: 'payee'");

        let err = FormError::AttachmentIndex {
            field: "files".to_string(),
            index: 4,
            len: 2,
        };
        assert!(err.is_usage());
        assert_eq!(
            err.to_string(),
            "Attachment index 4 out of range for 'files' (2 entries)"
        );
    }

    #[test]
    fn test_wrong_kind_message() {
        let err = FormError::WrongKind {
            field: "remarks".to_string(),
            kind: "textarea".to_string(),
            expected: "fileArray".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Field 'remarks' is a textarea field, expected fileArray"
        );
    }

    #[test]
    fn test_submit_error() {
        let err = FormError::submit("503 Service Unavailable");
        assert!(!err.is_validation());
        assert_eq!(err.to_string(), "Submit failed: 503 Service Unavailable");
    }

    #[test]
    fn test_error_with_context() {
        let res: Result<(), std::io::Error> = Err(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "denied",
        ));
        let err = res.with_context("Loading schema").unwrap_err();
        assert_eq!(err.to_string(), "Loading schema: IO error: denied");
    }

    #[test]
    fn test_io_error_classification() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: FormError = io_err.into();
        assert!(err.is_io());
    }
}
