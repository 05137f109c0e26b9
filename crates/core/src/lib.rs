//! # Civic Core
//!
//! Core types, traits, and error handling for Civic Ledger forms.
//!
//! This crate provides the foundational building blocks shared by the form
//! engine, the desktop UI and the CLI:
//!
//! - **Types**: field kinds, select options, field values, attachment references
//! - **Traits**: `Validatable` and `Persistable`
//! - **Errors**: unified error handling with `FormError` and `FormResult`
//!

pub mod error;
pub mod traits;
pub mod types;

// Re-export commonly used items at crate root
pub use error::{FormError, FormResult, ResultExt};
pub use traits::{Named, Persistable, Validatable};
pub use types::{
    AttachmentRef, DATE_FORMAT, FieldKind, FieldValue, FormId, PendingFile, SelectOption,
    format_number,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
