//! Application State Management for Civic Ledger
//!
//! Centralized state using Dioxus 0.7 Signals: navigation, the status bar,
//! the engine configuration and the records saved by the demo pages. Each
//! page owns its own `FormState`; only results flow back here.

use chrono::{DateTime, Local};
use civic_forms::{EngineConfig, FormValues, Notice, NoticeLevel};
use dioxus::prelude::*;
use uuid::Uuid;

// ============================================================================
// Page Navigation
// ============================================================================

/// Application pages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Page {
    /// Journal entry voucher with debit/credit line items
    #[default]
    JournalEntry,
    /// Burial permit application with attachments
    BurialPermit,
    /// Saved records
    Records,
}

impl Page {
    /// All pages in sidebar order
    pub const ALL: [Page; 3] = [Page::JournalEntry, Page::BurialPermit, Page::Records];

    /// Get the display name for this page
    pub fn display_name(&self) -> &'static str {
        match self {
            Page::JournalEntry => "Journal Entry",
            Page::BurialPermit => "Burial Permit",
            Page::Records => "Saved Records",
        }
    }

    /// Get the icon for this page (for UI display)
    pub fn icon(&self) -> &'static str {
        match self {
            Page::JournalEntry => "📒",
            Page::BurialPermit => "📜",
            Page::Records => "🗂️",
        }
    }
}

// ============================================================================
// Status Messages
// ============================================================================

/// Status message for the status bar
#[derive(Debug, Clone, PartialEq)]
pub struct StatusMessage {
    pub text: String,
    pub level: StatusLevel,
}

/// Status message severity level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Success,
    Warning,
    Error,
}

impl StatusLevel {
    /// Text colour class for the status bar
    pub fn text_class(&self) -> &'static str {
        match self {
            StatusLevel::Info => "text-slate-400",
            StatusLevel::Success => "text-green-400",
            StatusLevel::Warning => "text-amber-400",
            StatusLevel::Error => "text-red-400",
        }
    }
}

impl From<NoticeLevel> for StatusLevel {
    fn from(level: NoticeLevel) -> Self {
        match level {
            NoticeLevel::Info => StatusLevel::Info,
            NoticeLevel::Success => StatusLevel::Success,
            NoticeLevel::Warning => StatusLevel::Warning,
            NoticeLevel::Error => StatusLevel::Error,
        }
    }
}

impl From<&Notice> for StatusMessage {
    fn from(notice: &Notice) -> Self {
        Self {
            text: notice.text.clone(),
            level: notice.level.into(),
        }
    }
}

// ============================================================================
// UI State
// ============================================================================

/// General UI state
#[derive(Debug, Clone, PartialEq, Default)]
pub struct UiState {
    /// Whether the sidebar is collapsed
    pub sidebar_collapsed: bool,
    /// Currently active page
    pub active_page: Page,
    /// Status bar message
    pub status_message: Option<StatusMessage>,
}

impl UiState {
    /// Create new UI state
    pub fn new() -> Self {
        Self::default()
    }

    /// Navigate to a page
    pub fn navigate(&mut self, page: Page) {
        self.active_page = page;
    }

    /// Set status message
    pub fn set_status(&mut self, message: impl Into<String>, level: StatusLevel) {
        self.status_message = Some(StatusMessage {
            text: message.into(),
            level,
        });
    }

    /// Clear status message
    pub fn clear_status(&mut self) {
        self.status_message = None;
    }

    /// Toggle sidebar
    pub fn toggle_sidebar(&mut self) {
        self.sidebar_collapsed = !self.sidebar_collapsed;
    }
}

// ============================================================================
// Saved Records
// ============================================================================

/// A record accepted by a demo page's submit handler
#[derive(Debug, Clone, PartialEq)]
pub struct SavedRecord {
    /// Record identity; forms reinitialize when it changes
    pub id: String,
    /// Page the record belongs to
    pub page: Page,
    /// One-line description
    pub summary: String,
    /// Submitted values
    pub values: FormValues,
    /// When it was saved
    pub saved_at: DateTime<Local>,
}

impl SavedRecord {
    pub fn new(page: Page, summary: impl Into<String>, values: FormValues) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            page,
            summary: summary.into(),
            values,
            saved_at: Local::now(),
        }
    }

    /// Save time for lists
    pub fn saved_at_label(&self) -> String {
        self.saved_at.format("%Y-%m-%d %H:%M").to_string()
    }

    /// Keep an existing record's id, e.g. when saving an edit
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }
}

// ============================================================================
// App State
// ============================================================================

/// Root application state
#[derive(Debug, Clone, Default)]
pub struct AppState {
    /// UI state
    pub ui: UiState,
    /// Engine configuration shared by every form
    pub config: EngineConfig,
    /// Records saved this session, newest last
    pub records: Vec<SavedRecord>,
    /// Record currently opened for editing, by page
    pub editing: Option<(Page, String)>,
}

impl AppState {
    /// Create new app state
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a saved record, replacing one with the same id
    pub fn save_record(&mut self, record: SavedRecord) {
        match self.records.iter_mut().find(|r| r.id == record.id) {
            Some(existing) => *existing = record,
            None => self.records.push(record),
        }
    }

    /// Look up a record
    pub fn record(&self, id: &str) -> Option<&SavedRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    /// Open a record in its page
    pub fn edit_record(&mut self, id: &str) -> bool {
        let Some(page) = self.record(id).map(|r| r.page) else {
            return false;
        };
        self.editing = Some((page, id.to_string()));
        self.ui.navigate(page);
        true
    }

    /// The record being edited on `page`, if any
    pub fn editing_on(&self, page: Page) -> Option<&SavedRecord> {
        match &self.editing {
            Some((p, id)) if *p == page => self.record(id),
            _ => None,
        }
    }

    /// Stop editing on `page`
    pub fn stop_editing(&mut self, page: Page) {
        if matches!(&self.editing, Some((p, _)) if *p == page) {
            self.editing = None;
        }
    }

    /// Show a form notice in the status bar
    pub fn show_notice(&mut self, notice: &Notice) {
        self.ui.status_message = Some(notice.into());
    }
}

// ============================================================================
// Global State Context
// ============================================================================

/// Global application state signal
pub static APP_STATE: GlobalSignal<AppState> = Signal::global(AppState::new);

/// Initialize the global app state with a configuration
pub fn init_app_state(config: EngineConfig) {
    APP_STATE.write().config = config;
}

/// Hook to access the current page
pub fn use_current_page() -> Page {
    APP_STATE.read().ui.active_page
}

/// Hook to read the engine configuration
pub fn use_engine_config() -> EngineConfig {
    APP_STATE.read().config.clone()
}

// ============================================================================
// Tests
// ============================================================================
