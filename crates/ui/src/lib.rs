//! # Civic UI
//!
//! Dioxus Desktop UI for Civic Ledger.
//!
//! This crate renders forms described by `civic_forms` and hosts the
//! accounting pages built on them.
//!
//! ## Features
//!
//! - Field renderer covering every field kind
//! - Searchable option selector with keyboard navigation
//! - Attachment list with file picking and removal
//! - Submit flow with busy state, notices and error mapping
//! - Journal entry voucher and burial permit pages
//!

// ============================================================================
// Modules
// ============================================================================

pub mod app;
pub mod components;
pub mod file_ops;
pub mod pages;
pub mod state;

// ============================================================================
// Re-exports
// ============================================================================

// Re-export internal crates for convenience
pub use civic_core;
pub use civic_forms;

// Re-export main components
pub use app::App;
pub use file_ops::{export_record, pick_attachments, write_record};
pub use pages::{BurialPermitPage, JournalEntryPage, RecordsPage};
pub use state::{
    APP_STATE, AppState, Page, SavedRecord, StatusLevel, StatusMessage, UiState, init_app_state,
};

// Re-export components
pub use components::{
    AttachmentListView, BoundField, Checkbox, DynamicForm, FormFieldView, MultiSelect, RadioGroup,
    SearchableSelect, Select, SubmitHandler, TextArea, TextInput,
};

use civic_forms::EngineConfig;

// ============================================================================
// Constants
// ============================================================================

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const NAME: &str = "Civic Ledger";

/// Application display title
pub const TITLE: &str = "Civic Ledger - Local Government Accounting";

/// CSS styles for the application
const STYLES: &str = include_str!("../../../assets/styles/main.css");

// ============================================================================
// Launch Function
// ============================================================================

/// Launch the desktop application with the default engine configuration
///
/// # Example
///
/// ```rust,ignore
/// fn main() {
///     civic_ui::launch();
/// }
/// ```
pub fn launch() {
    launch_with_config(EngineConfig::default());
}

/// Launch with an engine configuration, e.g. one loaded from disk
pub fn launch_with_config(config: EngineConfig) {
    tracing::info!("Starting {} v{}", NAME, VERSION);

    init_app_state(config);

    let custom_head = format!(r#"<style type="text/css">{}</style>"#, STYLES);

    dioxus::LaunchBuilder::desktop()
        .with_cfg(
            dioxus::desktop::Config::new()
                .with_window(
                    dioxus::desktop::WindowBuilder::new()
                        .with_title(TITLE)
                        .with_resizable(true)
                        .with_inner_size(dioxus::desktop::LogicalSize::new(1280.0, 860.0))
                        .with_min_inner_size(dioxus::desktop::LogicalSize::new(800.0, 600.0)),
                )
                .with_menu(None)
                .with_custom_head(custom_head),
        )
        .launch(App);
}

/// Get the embedded CSS styles
pub fn get_styles() -> &'static str {
    STYLES
}

// ============================================================================
// Tests
// ============================================================================
