//! Multipart transport payload
//!
//! Pages that upload files send the value map as one JSON `data` part plus
//! one binary part per pending file. Attachment fields appear in `data` as
//! the list of persisted ids still kept; the pending files of field `docs`
//! are keyed `docs[0]`, `docs[1]`, ...

use crate::values::FormValues;
use civic_core::{AttachmentRef, FieldValue, FormResult};
use serde_json::{Map, Value};

/// Name of the JSON part
pub const DATA_PART: &str = "data";

/// One binary part
#[derive(Debug, Clone, PartialEq)]
pub struct FilePart {
    pub key: String,
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// A value map split into JSON data and file parts
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MultipartPayload {
    pub data: Map<String, Value>,
    pub files: Vec<FilePart>,
}

impl MultipartPayload {
    /// Split `values` into a JSON object and file parts
    pub fn from_values(values: &FormValues) -> FormResult<Self> {
        let mut payload = Self::default();
        for (name, value) in values.iter() {
            match value {
                FieldValue::Attachments(items) => payload.push_attachments(name, items),
                other => {
                    payload.data.insert(name.clone(), serde_json::to_value(other)?);
                }
            }
        }
        tracing::debug!(
            fields = payload.data.len(),
            files = payload.files.len(),
            "built multipart payload"
        );
        Ok(payload)
    }

    fn push_attachments(&mut self, name: &str, items: &[AttachmentRef]) {
        let mut kept = Vec::new();
        let mut pending = 0;
        for item in items {
            match item {
                AttachmentRef::Existing { existing_id, .. } => {
                    kept.push(Value::String(existing_id.clone()));
                }
                AttachmentRef::New(file) => {
                    self.files.push(FilePart {
                        key: format!("{}[{}]", name, pending),
                        file_name: file.file_name.clone(),
                        content_type: file
                            .content_type
                            .clone()
                            .unwrap_or_else(|| "application/octet-stream".to_string()),
                        bytes: file.bytes.clone(),
                    });
                    pending += 1;
                }
            }
        }
        self.data.insert(name.to_string(), Value::Array(kept));
    }

    /// The `data` part as JSON text
    pub fn data_json(&self) -> FormResult<String> {
        Ok(serde_json::to_string(&self.data)?)
    }

    /// Total size of all file parts
    pub fn file_bytes(&self) -> usize {
        self.files.iter().map(|f| f.bytes.len()).sum()
    }
}
