//! Core traits for Civic Ledger forms
//!
//! These traits give descriptors and schema files consistent behaviour for
//! structural checks and persistence.

use crate::error::{FormError, FormResult};
use serde::{Serialize, de::DeserializeOwned};

// ============================================================================
// Validatable Trait
// ============================================================================

/// Trait for types whose *structure* can be checked
///
/// This is for configuration-style objects such as descriptors and schemas.
/// User input is validated by the validation engine, which reports problems
/// as values instead of errors.
///
/// # Example
///
/// ```rust,ignore
/// use civic_core::{Validatable, FormResult, FormError};
///
/// struct Column {
///     name: String,
/// }
///
/// impl Validatable for Column {
///     fn validate(&self) -> FormResult<()> {
///         if self.name.is_empty() {
///             return Err(FormError::validation("Column name cannot be empty"));
///         }
///         Ok(())
///     }
/// }
/// ```
pub trait Validatable {
    /// Validate the current state of the object
    fn validate(&self) -> FormResult<()>;

    /// Check if the object is valid without returning error details
    fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    /// Get all validation errors (for types that can have multiple errors)
    fn validation_errors(&self) -> Vec<String> {
        match self.validate() {
            Ok(()) => vec![],
            Err(e) => vec![e.to_string()],
        }
    }
}

// ============================================================================
// Persistable Trait
// ============================================================================

/// Trait for types that can be saved to and loaded from files
///
/// JSON is the canonical on-disk format; TOML is accepted on load for
/// hand-written files.
pub trait Persistable: Serialize + DeserializeOwned + Sized {
    /// Get the file extension for this type (without the dot)
    fn file_extension() -> &'static str;

    /// Get the schema version for migration purposes
    fn schema_version() -> u32 {
        1
    }

    /// Save to a JSON string
    fn to_json(&self) -> FormResult<String> {
        serde_json::to_string_pretty(self).map_err(Into::into)
    }

    /// Load from a JSON string
    fn from_json(json: &str) -> FormResult<Self> {
        serde_json::from_str(json).map_err(Into::into)
    }

    /// Load from a TOML string
    fn from_toml(text: &str) -> FormResult<Self> {
        toml::from_str(text).map_err(Into::into)
    }

    /// Save to a file
    fn save_to_file(&self, path: &std::path::Path) -> FormResult<()> {
        let json = self.to_json()?;
        std::fs::write(path, json).map_err(|e| FormError::FileWrite {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Load from a file, choosing the format by extension
    fn load_from_file(path: &std::path::Path) -> FormResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| FormError::FileRead {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => Self::from_toml(&text),
            _ => Self::from_json(&text),
        }
    }
}

// ============================================================================
// Named Trait
// ============================================================================

/// Trait for types that have a name
pub trait Named {
    /// Get the name
    fn name(&self) -> &str;

    /// Check if the name matches (case-insensitive)
    fn name_matches(&self, other: &str) -> bool {
        self.name().eq_ignore_ascii_case(other)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Sample {
        name: String,
        rows: u32,
    }

    impl Validatable for Sample {
        fn validate(&self) -> FormResult<()> {
            if self.name.is_empty() {
                return Err(FormError::validation("Name cannot be empty"));
            }
            Ok(())
        }
    }

    impl Persistable for Sample {
        fn file_extension() -> &'static str {
            "sample"
        }
    }

    impl Named for Sample {
        fn name(&self) -> &str {
            &self.name
        }
    }

    #[test]
    fn test_validatable_defaults() {
        let ok = Sample {
            name: "voucher".into(),
            rows: 3,
        };
        let bad = Sample {
            name: String::new(),
            rows: 3,
        };
        assert!(ok.is_valid());
        assert!(ok.validation_errors().is_empty());
        assert!(!bad.is_valid());
        assert_eq!(
            bad.validation_errors(),
            vec!["Validation error: Name cannot be empty".to_string()]
        );
    }

    #[test]
    fn test_persistable_json_and_toml() {
        let sample = Sample {
            name: "voucher".into(),
            rows: 3,
        };
        let json = sample.to_json().unwrap();
        assert_eq!(Sample::from_json(&json).unwrap(), sample);

        let from_toml = Sample::from_toml("name = \"voucher\"\nrows = 3\n").unwrap();
        assert_eq!(from_toml, sample);
        assert_eq!(Sample::schema_version(), 1);
    }

    #[test]
    fn test_named() {
        let sample = Sample {
            name: "Voucher".into(),
            rows: 1,
        };
        assert!(sample.name_matches("voucher"));
    }
}
