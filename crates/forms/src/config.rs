//! Engine configuration
//!
//! Display strings and numeric limits shared by every form. Loaded from a
//! TOML file by the CLI and the desktop shell; every key is optional.

use civic_core::{FormError, FormResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default number of rows for textarea fields
pub const DEFAULT_TEXTAREA_ROWS: usize = 3;

/// Default maximum size of one pending attachment (10 MiB)
pub const DEFAULT_MAX_ATTACHMENT_BYTES: usize = 10 * 1024 * 1024;

/// Configuration for the form engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Label of the synthetic empty choice in selects
    pub select_placeholder: String,
    /// Shown by the searchable select when a query matches nothing
    pub no_results_text: String,
    /// Rows used by textareas that do not set their own
    pub default_textarea_rows: usize,
    /// Largest allowed difference between debit and credit totals
    pub balance_tolerance: f64,
    /// Form-level message for unbalanced line items
    pub balance_message: String,
    /// Maximum size of one pending attachment; 0 disables the check
    pub max_attachment_bytes: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            select_placeholder: "Select…".to_string(),
            no_results_text: "No results found".to_string(),
            default_textarea_rows: DEFAULT_TEXTAREA_ROWS,
            balance_tolerance: 0.005,
            balance_message: "Total Debit must equal Total Credit".to_string(),
            max_attachment_bytes: DEFAULT_MAX_ATTACHMENT_BYTES,
        }
    }
}

impl EngineConfig {
    /// Parse configuration from TOML text
    pub fn from_toml_str(text: &str) -> FormResult<Self> {
        let config: EngineConfig = toml::from_str(text)?;
        config.check()?;
        Ok(config)
    }

    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> FormResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| FormError::FileRead {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let config = Self::from_toml_str(&text)?;
        tracing::info!(path = %path.display(), "loaded engine config");
        Ok(config)
    }

    /// Whether a pending file of `size` bytes is accepted
    pub fn accepts_attachment_size(&self, size: usize) -> bool {
        self.max_attachment_bytes == 0 || size <= self.max_attachment_bytes
    }

    fn check(&self) -> FormResult<()> {
        if self.default_textarea_rows == 0 {
            return Err(FormError::InvalidConfig(
                "default_textarea_rows must be at least 1".to_string(),
            ));
        }
        if !self.balance_tolerance.is_finite() || self.balance_tolerance < 0.0 {
            return Err(FormError::InvalidConfig(
                "balance_tolerance must be a non-negative number".to_string(),
            ));
        }
        Ok(())
    }
}
