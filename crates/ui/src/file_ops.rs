//! File Operations for Civic Ledger
//!
//! Native file dialogs via the `rfd` crate: picking attachment files for
//! `file_array` fields and exporting a saved record as JSON.

use civic_core::{FormError, FormResult, PendingFile};
use civic_forms::{FormValues, MultipartPayload};
use rfd::AsyncFileDialog;
use std::path::{Path, PathBuf};

// ============================================================================
// File Filter Constants
// ============================================================================

/// Extensions offered first in the attachment picker
pub const DOCUMENT_EXTENSIONS: &[&str] = &["pdf", "jpg", "jpeg", "png", "doc", "docx"];

/// Display name for the document filter
pub const DOCUMENT_TYPE_NAME: &str = "Supporting Documents";

// ============================================================================
// Attachment Picker
// ============================================================================

/// Let the user pick one or more files to attach
///
/// Returns `FormError::Cancelled` when the dialog is dismissed.
pub async fn pick_attachments() -> FormResult<Vec<PendingFile>> {
    let handles = AsyncFileDialog::new()
        .set_title("Attach Files")
        .add_filter(DOCUMENT_TYPE_NAME, DOCUMENT_EXTENSIONS)
        .add_filter("All Files", &["*"])
        .pick_files()
        .await
        .ok_or(FormError::Cancelled)?;

    let mut files = Vec::with_capacity(handles.len());
    for handle in handles {
        let file_name = handle.file_name();
        let bytes = handle.read().await;
        let mut file = PendingFile::new(file_name.clone(), bytes);
        if let Some(content_type) = content_type_for(&file_name) {
            file = file.with_content_type(content_type);
        }
        files.push(file);
    }

    tracing::debug!(count = files.len(), "picked attachment files");
    Ok(files)
}

/// MIME type guessed from a file name's extension
pub fn content_type_for(file_name: &str) -> Option<&'static str> {
    let extension = Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())?
        .to_ascii_lowercase();

    match extension.as_str() {
        "pdf" => Some("application/pdf"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "doc" => Some("application/msword"),
        "docx" => Some("application/vnd.openxmlformats-officedocument.wordprocessingml.document"),
        "txt" => Some("text/plain"),
        _ => None,
    }
}

// ============================================================================
// Record Export
// ============================================================================

/// Ask where to save a record and write its data part as pretty JSON
pub async fn export_record(values: &FormValues, suggested_name: &str) -> FormResult<PathBuf> {
    let file = AsyncFileDialog::new()
        .set_title("Export Record")
        .add_filter("JSON", &["json"])
        .set_file_name(export_file_name(suggested_name))
        .save_file()
        .await
        .ok_or(FormError::Cancelled)?;

    let path = file.path().to_path_buf();
    write_record(values, &path)?;
    Ok(path)
}

/// Write a record's data part to `path`
pub fn write_record(values: &FormValues, path: &Path) -> FormResult<()> {
    let payload = MultipartPayload::from_values(values)?;
    let json = serde_json::to_string_pretty(&payload.data)?;
    std::fs::write(path, json).map_err(|e| FormError::FileWrite {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    tracing::info!(path = %path.display(), "exported record");
    Ok(())
}

/// File name for an exported record
fn export_file_name(name: &str) -> String {
    let stem: String = name
        .trim()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '_' })
        .collect();
    let stem = stem.trim_matches('_');
    if stem.is_empty() {
        "record.json".to_string()
    } else {
        format!("{}.json", stem)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_type_for() {
        assert_eq!(content_type_for("death-cert.PDF"), Some("application/pdf"));
        assert_eq!(content_type_for("photo.jpeg"), Some("image/jpeg"));
        assert_eq!(content_type_for("archive.zip"), None);
        assert_eq!(content_type_for("README"), None);
    }

    #[test]
    fn test_export_file_name() {
        assert_eq!(export_file_name("Permit for Maria Santos"), "permit_for_maria_santos.json");
        assert_eq!(export_file_name("  "), "record.json");
    }

    #[test]
    fn test_write_record() {
        let dir = std::env::temp_dir().join(format!("civic-export-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("jev.json");

        let values = FormValues::new().with("payee", "Municipal Treasurer");
        write_record(&values, &path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("Municipal Treasurer"));
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
