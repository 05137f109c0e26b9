//! # Civic Forms
//!
//! Headless declarative form engine for Civic Ledger.
//!
//! A page describes its form as a list of [`FieldDescriptor`]s plus a
//! [`ValidationSchema`], hands both to a [`FormState`] together with the
//! initial values, and then drives the state from user interaction:
//!
//! ```rust,ignore
//! use civic_forms::prelude::*;
//!
//! let fields = vec![
//!     FieldDescriptor::date("from_date").required(),
//!     FieldDescriptor::date("to_date").required(),
//! ];
//! let rules = ValidationSchema::new().date_order("from_date", "to_date");
//! let mut form = FormState::new(fields, rules, FormValues::new())?;
//!
//! form.set_field_and_validate_dependents("from_date", "2024-06-01")?;
//! form.blur("from_date")?;
//! ```
//!
//! ## Modules
//!
//! - [`descriptor`]: field descriptors
//! - [`values`]: the value map and dot-path helpers
//! - [`validation`]: field and cross-field rules
//! - [`state`]: the form state container and submit flow
//! - [`selector`]: option filtering for searchable selects
//! - [`attachments`]: attachment list operations
//! - [`render`]: widget selection, input coercion and feedback
//! - [`payload`]: multipart transport payload
//! - [`schema`]: schema files
//! - [`config`]: engine configuration

pub mod attachments;
pub mod config;
pub mod descriptor;
pub mod payload;
pub mod render;
pub mod schema;
pub mod selector;
pub mod state;
pub mod validation;
pub mod values;

pub use attachments::AttachmentList;
pub use config::EngineConfig;
pub use descriptor::{FieldDescriptor, check_descriptors};
pub use payload::{FilePart, MultipartPayload};
pub use render::{Choice, Feedback, InputType, WidgetKind};
pub use schema::{
    FormSchema, RuleSpec, SCHEMA_VERSION, SchemaFile, SchemaFormat, load_schema,
    load_schema_from_str, save_schema,
};
pub use selector::{OptionMatches, SelectorState, filter_options};
pub use state::{FormState, Notice, NoticeLevel, SubmitGate, SubmitOutcome};
pub use validation::{CrossFieldRule, FieldRule, ValidationErrors, ValidationSchema};
pub use values::FormValues;

/// Prelude for pages building forms
pub mod prelude {
    pub use crate::{
        AttachmentList, EngineConfig, Feedback, FieldDescriptor, FieldRule, FormSchema,
        FormState, FormValues, Notice, NoticeLevel, SubmitGate, SubmitOutcome,
        ValidationErrors, ValidationSchema, WidgetKind,
    };
    pub use civic_core::{
        AttachmentRef, FieldKind, FieldValue, FormError, FormResult, PendingFile,
        SelectOption,
    };
}
