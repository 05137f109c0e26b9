//! Page Components for Civic Ledger
//!
//! Each page owns one form and supplies its own submit handler.
//!
//! ## Available Pages
//!
//! - **JournalEntryPage**: journal entry voucher with balanced line items
//! - **BurialPermitPage**: burial permit application with attachments
//! - **RecordsPage**: records saved this session
//!

pub mod burial_permit;
pub mod journal_entry;
pub mod records;

// Re-export page components for convenience
pub use burial_permit::BurialPermitPage;
pub use journal_entry::JournalEntryPage;
pub use records::RecordsPage;
