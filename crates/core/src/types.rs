//! Core types used throughout Civic Ledger forms
//!
//! This module contains the value types the form engine moves around:
//! field kinds, select options, field values and attachment references.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

// ============================================================================
// Identifiers
// ============================================================================

/// Type alias for form instance identifiers
pub type FormId = uuid::Uuid;

/// Date format used by `date` fields (ISO 8601 calendar date)
pub const DATE_FORMAT: &str = "%Y-%m-%d";

// ============================================================================
// Field Kinds
// ============================================================================

/// Semantic kind of a form field; decides which control renders it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FieldKind {
    /// Single-line text input
    #[default]
    Text,
    /// Numeric input
    Number,
    /// Email address input
    Email,
    /// Calendar date input (YYYY-MM-DD)
    Date,
    /// Masked text input with a show/hide toggle
    Password,
    /// Multi-line text input
    TextArea,
    /// Single choice from a list of options
    Select,
    /// Multiple choices from a list of options
    MultiSelect,
    /// Boolean toggle
    Checkbox,
    /// Exclusive choice rendered as one control per option
    Radio,
    /// List of persisted references and newly selected files
    FileArray,
}

impl FieldKind {
    /// All kinds, in declaration order
    pub const ALL: [FieldKind; 11] = [
        FieldKind::Text,
        FieldKind::Number,
        FieldKind::Email,
        FieldKind::Date,
        FieldKind::Password,
        FieldKind::TextArea,
        FieldKind::Select,
        FieldKind::MultiSelect,
        FieldKind::Checkbox,
        FieldKind::Radio,
        FieldKind::FileArray,
    ];

    /// Tag used in schema files
    pub fn as_tag(&self) -> &'static str {
        match self {
            FieldKind::Text => "text",
            FieldKind::Number => "number",
            FieldKind::Email => "email",
            FieldKind::Date => "date",
            FieldKind::Password => "password",
            FieldKind::TextArea => "textarea",
            FieldKind::Select => "select",
            FieldKind::MultiSelect => "multiselect",
            FieldKind::Checkbox => "checkbox",
            FieldKind::Radio => "radio",
            FieldKind::FileArray => "fileArray",
        }
    }

    /// Parse a kind tag; `None` for tags this engine does not know
    pub fn from_tag(tag: &str) -> Option<Self> {
        let kind = match tag.trim() {
            "text" => FieldKind::Text,
            "number" => FieldKind::Number,
            "email" => FieldKind::Email,
            "date" => FieldKind::Date,
            "password" => FieldKind::Password,
            "textarea" => FieldKind::TextArea,
            "select" => FieldKind::Select,
            "multiselect" => FieldKind::MultiSelect,
            "checkbox" => FieldKind::Checkbox,
            "radio" => FieldKind::Radio,
            "fileArray" | "file_array" => FieldKind::FileArray,
            _ => return None,
        };
        Some(kind)
    }

    /// Parse a kind tag, treating unknown legacy tags as plain text
    pub fn from_tag_lossy(tag: &str) -> Self {
        Self::from_tag(tag).unwrap_or_else(|| {
            tracing::warn!(tag, "unknown field kind, rendering as text");
            FieldKind::Text
        })
    }

    /// Get the display name for this kind
    pub fn display_name(&self) -> &'static str {
        match self {
            FieldKind::Text => "Text",
            FieldKind::Number => "Number",
            FieldKind::Email => "Email",
            FieldKind::Date => "Date",
            FieldKind::Password => "Password",
            FieldKind::TextArea => "Text Area",
            FieldKind::Select => "Select",
            FieldKind::MultiSelect => "Multi-select",
            FieldKind::Checkbox => "Checkbox",
            FieldKind::Radio => "Radio",
            FieldKind::FileArray => "Attachments",
        }
    }

    /// Whether this kind chooses among `options`
    pub fn is_choice(&self) -> bool {
        matches!(
            self,
            FieldKind::Select | FieldKind::MultiSelect | FieldKind::Radio
        )
    }

    /// Whether this kind holds a number
    pub fn is_numeric(&self) -> bool {
        matches!(self, FieldKind::Number)
    }

    /// Whether values of this kind are free text typed by the user
    pub fn is_textual(&self) -> bool {
        matches!(
            self,
            FieldKind::Text
                | FieldKind::Email
                | FieldKind::Password
                | FieldKind::TextArea
                | FieldKind::Date
        )
    }

    /// The value a fresh form holds for a field of this kind
    pub fn empty_value(&self) -> FieldValue {
        match self {
            FieldKind::Number => FieldValue::Null,
            FieldKind::Checkbox => FieldValue::Bool(false),
            FieldKind::MultiSelect => FieldValue::List(Vec::new()),
            FieldKind::FileArray => FieldValue::Attachments(Vec::new()),
            FieldKind::Text
            | FieldKind::Email
            | FieldKind::Date
            | FieldKind::Password
            | FieldKind::TextArea
            | FieldKind::Select
            | FieldKind::Radio => FieldValue::Text(String::new()),
        }
    }
}

impl From<String> for FieldKind {
    fn from(tag: String) -> Self {
        FieldKind::from_tag_lossy(&tag)
    }
}

impl From<FieldKind> for String {
    fn from(kind: FieldKind) -> Self {
        kind.as_tag().to_string()
    }
}

impl std::fmt::Display for FieldKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_tag())
    }
}

// ============================================================================
// Select Options
// ============================================================================

/// One `{value, label}` choice for select-like fields
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SelectOption {
    /// Option value (numeric ids are kept in their string form)
    #[serde(deserialize_with = "value_as_string")]
    pub value: String,
    /// Display label
    pub label: String,
    /// Whether the option can be chosen
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub disabled: bool,
}

impl SelectOption {
    /// Create a new select option
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
            disabled: false,
        }
    }

    /// Create a disabled option
    pub fn disabled(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
            disabled: true,
        }
    }

    /// Create an option whose value and label are the same text
    pub fn plain(text: impl Into<String>) -> Self {
        let text = text.into();
        Self::new(text.clone(), text)
    }
}

fn value_as_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawValue {
        Text(String),
        Int(i64),
        Float(f64),
        Bool(bool),
    }

    Ok(match RawValue::deserialize(deserializer)? {
        RawValue::Text(s) => s,
        RawValue::Int(n) => n.to_string(),
        RawValue::Float(n) => format_number(n),
        RawValue::Bool(b) => b.to_string(),
    })
}

// ============================================================================
// Attachments
// ============================================================================

/// A file chosen by the user that has not been uploaded yet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingFile {
    /// Original file name
    pub file_name: String,
    /// MIME type if known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    /// File contents
    #[serde(default)]
    pub bytes: Vec<u8>,
}

impl PendingFile {
    /// Create a pending file from a name and its contents
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: None,
            bytes,
        }
    }

    /// Set the MIME type
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Size in bytes
    pub fn size(&self) -> usize {
        self.bytes.len()
    }
}

/// One entry of an attachment list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum AttachmentRef {
    /// Already persisted on the server; rendered as a link
    Existing {
        existing_id: String,
        stored_name: String,
    },
    /// Newly selected file, uploaded with the next submission
    New(PendingFile),
}

impl AttachmentRef {
    /// Reference an already persisted file
    pub fn existing(existing_id: impl Into<String>, stored_name: impl Into<String>) -> Self {
        AttachmentRef::Existing {
            existing_id: existing_id.into(),
            stored_name: stored_name.into(),
        }
    }

    /// Wrap a newly selected file
    pub fn pending(file: PendingFile) -> Self {
        AttachmentRef::New(file)
    }

    /// Whether this entry is already persisted
    pub fn is_existing(&self) -> bool {
        matches!(self, AttachmentRef::Existing { .. })
    }

    /// Name shown to the user
    pub fn display_name(&self) -> &str {
        match self {
            AttachmentRef::Existing { stored_name, .. } => stored_name,
            AttachmentRef::New(file) => &file.file_name,
        }
    }
}

// ============================================================================
// Field Values
// ============================================================================

/// The value bound to one field name
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// No value (empty numeric input, missing hydration data)
    #[default]
    Null,
    /// Checkbox state
    Bool(bool),
    /// Parsed number
    Number(f64),
    /// Text, dates, single choices; also unparsed numeric input
    Text(String),
    /// Multi-select choices in option order
    List(Vec<String>),
    /// Attachment list
    Attachments(Vec<AttachmentRef>),
}

impl FieldValue {
    /// Whether the value counts as "not filled in"
    ///
    /// `''`, `Null` and empty lists are all unset; `false` and `0` are set.
    pub fn is_unset(&self) -> bool {
        match self {
            FieldValue::Null => true,
            FieldValue::Text(s) => s.trim().is_empty(),
            FieldValue::List(items) => items.is_empty(),
            FieldValue::Attachments(items) => items.is_empty(),
            FieldValue::Bool(_) | FieldValue::Number(_) => false,
        }
    }

    /// Try to get as text
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Try to get as number; text that parses as a number counts
    pub fn as_number(&self) -> Option<f64> {
        match self {
            FieldValue::Number(n) => Some(*n).filter(|n| n.is_finite()),
            FieldValue::Text(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
            _ => None,
        }
    }

    /// Number for arithmetic over optional amounts: unset counts as zero
    pub fn amount(&self) -> f64 {
        if self.is_unset() {
            0.0
        } else {
            self.as_number().unwrap_or(0.0)
        }
    }

    /// Try to get as boolean
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FieldValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Try to get as a list of choices
    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            FieldValue::List(items) => Some(items),
            _ => None,
        }
    }

    /// Try to get as an attachment list
    pub fn as_attachments(&self) -> Option<&[AttachmentRef]> {
        match self {
            FieldValue::Attachments(items) => Some(items),
            FieldValue::List(items) if items.is_empty() => Some(&[]),
            _ => None,
        }
    }

    /// Try to get as a calendar date
    pub fn as_date(&self) -> Option<NaiveDate> {
        self.as_text()
            .and_then(|s| NaiveDate::parse_from_str(s.trim(), DATE_FORMAT).ok())
    }

    /// Text shown inside a single-value input
    pub fn to_input_string(&self) -> String {
        match self {
            FieldValue::Null => String::new(),
            FieldValue::Bool(b) => b.to_string(),
            FieldValue::Number(n) => format_number(*n),
            FieldValue::Text(s) => s.clone(),
            FieldValue::List(items) => items.join(", "),
            FieldValue::Attachments(items) => items
                .iter()
                .map(AttachmentRef::display_name)
                .collect::<Vec<_>>()
                .join(", "),
        }
    }

    /// Short name of the variant (for logs and error messages)
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldValue::Null => "null",
            FieldValue::Bool(_) => "bool",
            FieldValue::Number(_) => "number",
            FieldValue::Text(_) => "text",
            FieldValue::List(_) => "list",
            FieldValue::Attachments(_) => "attachments",
        }
    }
}

impl From<bool> for FieldValue {
    fn from(v: bool) -> Self {
        FieldValue::Bool(v)
    }
}

impl From<i32> for FieldValue {
    fn from(v: i32) -> Self {
        FieldValue::Number(v as f64)
    }
}

impl From<i64> for FieldValue {
    fn from(v: i64) -> Self {
        FieldValue::Number(v as f64)
    }
}

impl From<f64> for FieldValue {
    fn from(v: f64) -> Self {
        FieldValue::Number(v)
    }
}

impl From<String> for FieldValue {
    fn from(v: String) -> Self {
        FieldValue::Text(v)
    }
}

impl From<&str> for FieldValue {
    fn from(v: &str) -> Self {
        FieldValue::Text(v.to_string())
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(v: Vec<String>) -> Self {
        FieldValue::List(v)
    }
}

impl From<Vec<AttachmentRef>> for FieldValue {
    fn from(v: Vec<AttachmentRef>) -> Self {
        FieldValue::Attachments(v)
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(FieldValue::Null)
    }
}

/// Format a number without a trailing `.0` for whole values
pub fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_kind_tags() {
        for kind in FieldKind::ALL {
            assert_eq!(FieldKind::from_tag(kind.as_tag()), Some(kind));
        }
        assert_eq!(FieldKind::from_tag("file_array"), Some(FieldKind::FileArray));
        assert_eq!(FieldKind::from_tag("colour"), None);
    }

    #[test]
    fn test_unknown_kind_falls_back_to_text() {
        let kind: FieldKind = serde_json::from_str("\"signature-pad\"").unwrap();
        assert_eq!(kind, FieldKind::Text);

        let kind: FieldKind = serde_json::from_str("\"multiselect\"").unwrap();
        assert_eq!(kind, FieldKind::MultiSelect);
    }

    #[test]
    fn test_kind_serializes_as_tag() {
        let json = serde_json::to_string(&FieldKind::FileArray).unwrap();
        assert_eq!(json, "\"fileArray\"");
    }

    #[test]
    fn test_empty_values() {
        assert_eq!(FieldKind::Select.empty_value(), FieldValue::Text(String::new()));
        assert_eq!(FieldKind::Number.empty_value(), FieldValue::Null);
        assert_eq!(FieldKind::Checkbox.empty_value(), FieldValue::Bool(false));
        assert!(FieldKind::FileArray.empty_value().is_unset());
    }

    #[test]
    fn test_option_numeric_value() {
        let opt: SelectOption =
            serde_json::from_str(r#"{"value": 1042, "label": "Cash in Vault"}"#).unwrap();
        assert_eq!(opt.value, "1042");
        assert_eq!(opt.label, "Cash in Vault");
        assert!(!opt.disabled);
    }

    #[test]
    fn test_option_constructors() {
        let opt = SelectOption::new("inter", "Interment");
        assert_eq!(opt.value, "inter");
        assert!(!opt.disabled);
        assert!(SelectOption::disabled("x", "X").disabled);
        assert_eq!(SelectOption::plain("2025").label, "2025");
    }

    #[test]
    fn test_is_unset() {
        assert!(FieldValue::Null.is_unset());
        assert!(FieldValue::from("").is_unset());
        assert!(FieldValue::from("   ").is_unset());
        assert!(FieldValue::List(vec![]).is_unset());
        assert!(!FieldValue::Bool(false).is_unset());
        assert!(!FieldValue::Number(0.0).is_unset());
    }

    #[test]
    fn test_as_number() {
        assert_eq!(FieldValue::Number(12.5).as_number(), Some(12.5));
        assert_eq!(FieldValue::from(" 100 ").as_number(), Some(100.0));
        assert_eq!(FieldValue::from("abc").as_number(), None);
        assert_eq!(FieldValue::Number(f64::NAN).as_number(), None);
        assert_eq!(FieldValue::Number(f64::INFINITY).as_number(), None);
        assert_eq!(FieldValue::Null.amount(), 0.0);
        assert_eq!(FieldValue::from("").amount(), 0.0);
    }

    #[test]
    fn test_as_date() {
        let d = FieldValue::from("2024-06-01").as_date().unwrap();
        assert_eq!(d, NaiveDate::from_ymd_opt(2024, 6, 1).unwrap());
        assert!(FieldValue::from("06/01/2024").as_date().is_none());
    }

    #[test]
    fn test_value_untagged_json() {
        let v: FieldValue = serde_json::from_str("null").unwrap();
        assert_eq!(v, FieldValue::Null);
        let v: FieldValue = serde_json::from_str("250").unwrap();
        assert_eq!(v, FieldValue::Number(250.0));
        let v: FieldValue = serde_json::from_str(r#"["a","b"]"#).unwrap();
        assert_eq!(v, FieldValue::List(vec!["a".into(), "b".into()]));

        let v: FieldValue = serde_json::from_str(
            r#"[{"source":"existing","existing_id":"77","stored_name":"or-2024.pdf"}]"#,
        )
        .unwrap();
        assert_eq!(
            v,
            FieldValue::Attachments(vec![AttachmentRef::existing("77", "or-2024.pdf")])
        );
    }

    #[test]
    fn test_input_string() {
        assert_eq!(FieldValue::Number(100.0).to_input_string(), "100");
        assert_eq!(FieldValue::Number(0.25).to_input_string(), "0.25");
        assert_eq!(FieldValue::Null.to_input_string(), "");
    }

    #[test]
    fn test_attachment_display_name() {
        let existing = AttachmentRef::existing("1", "deed.pdf");
        let pending = AttachmentRef::pending(PendingFile::new("scan.png", vec![1, 2, 3]));
        assert!(existing.is_existing());
        assert!(!pending.is_existing());
        assert_eq!(existing.display_name(), "deed.pdf");
        assert_eq!(pending.display_name(), "scan.png");
    }
}
