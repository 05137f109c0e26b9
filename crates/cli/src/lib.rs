//! # Civic CLI
//!
//! Command-line interface for Civic Ledger form schemas.
//!
//! Checks schema files before they ship with the desktop app and runs the
//! engine's validation against recorded values without opening a window.
//!
//! ## Commands
//!
//! - `check` - Check schema files or directories of them
//! - `validate` - Validate a values file against a schema
//! - `info` - Display the fields and rules of a schema
//!

pub mod commands;
pub mod output;

// Re-export dependencies for use in main.rs
pub use civic_core;
pub use civic_forms;

use anyhow::Context;
use civic_forms::EngineConfig;
use std::path::Path;

/// CLI version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// CLI name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Load the engine configuration, or the defaults when no file is given
pub fn load_config(path: Option<&Path>) -> anyhow::Result<EngineConfig> {
    match path {
        Some(path) => EngineConfig::load(path)
            .with_context(|| format!("Cannot load configuration {}", path.display())),
        None => Ok(EngineConfig::default()),
    }
}
