//! # UI Components
//!
//! Dioxus components of the form engine.
//!
//! ```text
//! DynamicForm
//! └── BoundField
//!     └── FormFieldView
//!         ├── TextInput / TextArea / Select / MultiSelect
//!         ├── Checkbox / RadioGroup
//!         ├── SearchableSelect
//!         └── AttachmentListView
//! ```

// ============================================================================
// Module Declarations
// ============================================================================

pub mod attachment_list;
pub mod field;
pub mod form;
pub mod inputs;
pub mod option_selector;

// ============================================================================
// Re-exports
// ============================================================================

pub use attachment_list::AttachmentListView;
pub use field::FormFieldView;
pub use form::{BoundField, DynamicForm, SubmitHandler};
pub use inputs::{Checkbox, MultiSelect, RadioGroup, Select, TextArea, TextInput};
pub use option_selector::SearchableSelect;
