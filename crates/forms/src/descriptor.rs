//! Field descriptors
//!
//! A `FieldDescriptor` is the declarative description of one form field:
//! its binding name, kind, label and constraints. Pages build descriptor
//! lists in code or load them from schema files.

use crate::config::DEFAULT_TEXTAREA_ROWS;
use civic_core::{
    FieldKind, FieldValue, FormError, FormResult, Named, SelectOption, Validatable,
    format_number,
};
use heck::ToTitleCase;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashSet;

// ============================================================================
// FieldDescriptor
// ============================================================================

/// Declarative description of one form field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDescriptor {
    /// Binding key into the value map (dot paths allowed)
    pub name: String,

    /// Display label; derived from the name when empty
    #[serde(default)]
    pub label: String,

    /// Field kind
    #[serde(default)]
    pub kind: FieldKind,

    /// Whether a value is required
    #[serde(default)]
    pub required: bool,

    /// Choices for select, multiselect and radio fields
    #[serde(default, deserialize_with = "lenient_options")]
    pub options: Vec<SelectOption>,

    /// Placeholder text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,

    /// Help text shown below the control when there is no error
    #[serde(
        default,
        rename = "helperText",
        alias = "helpText",
        skip_serializing_if = "Option::is_none"
    )]
    pub help_text: Option<String>,

    /// Shown but not editable
    #[serde(default)]
    pub read_only: bool,

    /// Shown greyed out and not editable
    #[serde(default)]
    pub disabled: bool,

    /// Visible rows for textareas
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rows: Option<usize>,

    /// Numeric fields reject negative values unless this is set
    #[serde(default)]
    pub allow_negative: bool,

    /// Minimum numeric value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,

    /// Maximum numeric value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,

    /// Minimum text length (characters)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<usize>,

    /// Maximum text length (characters)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,

    /// Value used when the form starts without hydration data
    #[serde(default, rename = "default", skip_serializing_if = "Option::is_none")]
    pub default_value: Option<FieldValue>,
}

impl FieldDescriptor {
    /// Create a new descriptor with the given name and kind
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            label: String::new(),
            kind,
            required: false,
            options: Vec::new(),
            placeholder: None,
            help_text: None,
            read_only: false,
            disabled: false,
            rows: None,
            allow_negative: false,
            min: None,
            max: None,
            min_length: None,
            max_length: None,
            default_value: None,
        }
    }

    /// Create a text field
    pub fn text(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Text)
    }

    /// Create a numeric field
    pub fn number(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Number)
    }

    /// Create a date field
    pub fn date(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Date)
    }

    /// Create a select field with its options
    pub fn select(name: impl Into<String>, options: Vec<SelectOption>) -> Self {
        Self::new(name, FieldKind::Select).with_options(options)
    }

    /// Create an attachment list field
    pub fn files(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::FileArray)
    }

    // ========================================================================
    // Builder methods
    // ========================================================================

    /// Mark the field as required
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Set the label
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Set the options
    pub fn with_options(mut self, options: Vec<SelectOption>) -> Self {
        self.options = options;
        self
    }

    /// Set the placeholder text
    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    /// Set the help text
    pub fn with_help_text(mut self, help: impl Into<String>) -> Self {
        self.help_text = Some(help.into());
        self
    }

    /// Mark the field as read-only
    pub fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }

    /// Mark the field as disabled
    pub fn disabled(mut self) -> Self {
        self.disabled = true;
        self
    }

    /// Set the textarea row count
    pub fn with_rows(mut self, rows: usize) -> Self {
        self.rows = Some(rows);
        self
    }

    /// Accept negative numbers
    pub fn allow_negative(mut self) -> Self {
        self.allow_negative = true;
        self
    }

    /// Set the minimum numeric value
    pub fn with_min(mut self, min: f64) -> Self {
        self.min = Some(min);
        self
    }

    /// Set the maximum numeric value
    pub fn with_max(mut self, max: f64) -> Self {
        self.max = Some(max);
        self
    }

    /// Set the minimum text length
    pub fn with_min_length(mut self, len: usize) -> Self {
        self.min_length = Some(len);
        self
    }

    /// Set the maximum text length
    pub fn with_max_length(mut self, len: usize) -> Self {
        self.max_length = Some(len);
        self
    }

    /// Set the default value
    pub fn with_default(mut self, value: impl Into<FieldValue>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    // ========================================================================
    // Utility methods
    // ========================================================================

    /// Get the display label (falls back to the title-cased last path segment)
    pub fn display_label(&self) -> String {
        if !self.label.trim().is_empty() {
            return self.label.clone();
        }
        let last = self.name.rsplit('.').next().unwrap_or(&self.name);
        last.to_title_case()
    }

    /// Textarea rows, falling back to the engine default
    pub fn rows_or_default(&self) -> usize {
        self.rows.unwrap_or(DEFAULT_TEXTAREA_ROWS)
    }

    /// Whether the user may edit the field
    pub fn is_editable(&self) -> bool {
        !self.read_only && !self.disabled
    }

    /// Look up an option by value
    pub fn option(&self, value: &str) -> Option<&SelectOption> {
        self.options.iter().find(|o| o.value == value)
    }

    /// The value a fresh form holds for this field
    pub fn initial_value(&self) -> FieldValue {
        self.default_value
            .clone()
            .map(|v| self.normalize(v))
            .unwrap_or_else(|| self.kind.empty_value())
    }

    /// Bring hydrated data into the shape this kind stores
    ///
    /// Choice fields hold text, so numeric ids from records become strings;
    /// `Null` becomes the kind's empty value except for numbers, where
    /// `Null` already is the empty value.
    pub fn normalize(&self, value: FieldValue) -> FieldValue {
        match (self.kind, value) {
            (FieldKind::Select | FieldKind::Radio, FieldValue::Number(n)) => {
                FieldValue::Text(format_number(n))
            }
            (FieldKind::MultiSelect, FieldValue::Text(s)) if s.is_empty() => {
                FieldValue::List(Vec::new())
            }
            (FieldKind::MultiSelect, FieldValue::Text(s)) => FieldValue::List(vec![s]),
            (FieldKind::FileArray, FieldValue::List(items)) if items.is_empty() => {
                FieldValue::Attachments(Vec::new())
            }
            (FieldKind::Number, FieldValue::Text(s)) if s.trim().is_empty() => FieldValue::Null,
            (kind, FieldValue::Null) => kind.empty_value(),
            (_, value) => value,
        }
    }

    /// Copy of this descriptor bound to another name (for line-item rows)
    pub fn renamed(&self, name: impl Into<String>) -> Self {
        let mut copy = self.clone();
        if copy.label.trim().is_empty() {
            copy.label = self.display_label();
        }
        copy.name = name.into();
        copy
    }
}

impl Named for FieldDescriptor {
    fn name(&self) -> &str {
        &self.name
    }
}

impl Validatable for FieldDescriptor {
    fn validate(&self) -> FormResult<()> {
        if self.name.trim().is_empty() {
            return Err(FormError::InvalidSchema(
                "Field name cannot be empty".to_string(),
            ));
        }

        if self.name.chars().any(char::is_whitespace)
            || self.name.split('.').any(|segment| segment.is_empty() || segment == "*")
        {
            return Err(FormError::InvalidSchema(format!(
                "Field name '{}' is not a valid path",
                self.name
            )));
        }

        if let (Some(min), Some(max)) = (self.min, self.max) {
            if min > max {
                return Err(FormError::InvalidSchema(format!(
                    "Field '{}' has min {} greater than max {}",
                    self.name, min, max
                )));
            }
        }

        if let (Some(min), Some(max)) = (self.min_length, self.max_length) {
            if min > max {
                return Err(FormError::InvalidSchema(format!(
                    "Field '{}' has min length {} greater than max length {}",
                    self.name, min, max
                )));
            }
        }

        if self.rows == Some(0) {
            return Err(FormError::InvalidSchema(format!(
                "Field '{}' must have at least one row",
                self.name
            )));
        }

        Ok(())
    }
}

/// Check a descriptor list: every descriptor valid, names unique
pub fn check_descriptors(descriptors: &[FieldDescriptor]) -> FormResult<()> {
    let mut seen = HashSet::new();
    for descriptor in descriptors {
        descriptor.validate()?;
        if !seen.insert(descriptor.name.as_str()) {
            return Err(FormError::DuplicateField(descriptor.name.clone()));
        }
    }
    Ok(())
}

/// Accept anything for `options`; non-lists degrade to no options
fn lenient_options<'de, D>(deserializer: D) -> Result<Vec<SelectOption>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawOptions {
        List(Vec<SelectOption>),
        Other(serde::de::IgnoredAny),
    }

    Ok(match RawOptions::deserialize(deserializer)? {
        RawOptions::List(options) => options,
        RawOptions::Other(_) => {
            tracing::warn!("ignoring malformed options list");
            Vec::new()
        }
    })
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_builder() {
        let field = FieldDescriptor::number("amount")
            .required()
            .with_label("Amount")
            .with_min(1.0)
            .with_help_text("Peso amount");
        assert_eq!(field.kind, FieldKind::Number);
        assert!(field.required);
        assert_eq!(field.min, Some(1.0));
        assert_eq!(field.display_label(), "Amount");
    }

    #[test]
    fn test_display_label_fallback() {
        assert_eq!(FieldDescriptor::date("from_date").display_label(), "From Date");
        assert_eq!(
            FieldDescriptor::number("entries.0.debit").display_label(),
            "Debit"
        );
    }

    #[test]
    fn test_textarea_rows_default() {
        let field = FieldDescriptor::new("remarks", FieldKind::TextArea);
        assert_eq!(field.rows_or_default(), 3);
        assert_eq!(field.with_rows(6).rows_or_default(), 6);
    }

    #[test]
    fn test_normalize_hydrated_values() {
        let select = FieldDescriptor::select("account", vec![]);
        assert_eq!(
            select.normalize(FieldValue::Number(1042.0)),
            FieldValue::Text("1042".to_string())
        );
        assert_eq!(select.normalize(FieldValue::Null), FieldValue::Text(String::new()));

        let amount = FieldDescriptor::number("amount");
        assert_eq!(amount.normalize(FieldValue::from("")), FieldValue::Null);
        assert_eq!(amount.normalize(FieldValue::Null), FieldValue::Null);
    }

    #[test]
    fn test_initial_value_uses_default() {
        let field = FieldDescriptor::select("service", vec![]).with_default("inter");
        assert_eq!(field.initial_value(), FieldValue::from("inter"));
        assert_eq!(
            FieldDescriptor::number("amount").initial_value(),
            FieldValue::Null
        );
    }

    #[test]
    fn test_validate_names() {
        assert!(FieldDescriptor::text("payee").validate().is_ok());
        assert!(FieldDescriptor::text("entries.0.debit").validate().is_ok());
        assert!(FieldDescriptor::text("").validate().is_err());
        assert!(FieldDescriptor::text("bad name").validate().is_err());
        assert!(FieldDescriptor::text("entries..debit").validate().is_err());
        assert!(FieldDescriptor::text("entries.*.debit").validate().is_err());
    }

    #[test]
    fn test_validate_ranges() {
        let field = FieldDescriptor::number("qty").with_min(10.0).with_max(1.0);
        assert!(field.validate().is_err());
        let field = FieldDescriptor::text("code")
            .with_min_length(5)
            .with_max_length(2);
        assert!(field.validate().is_err());
    }

    #[test]
    fn test_check_descriptors_duplicates() {
        let fields = vec![FieldDescriptor::text("payee"), FieldDescriptor::text("payee")];
        let err = check_descriptors(&fields).unwrap_err();
        assert!(matches!(err, FormError::DuplicateField(name) if name == "payee"));
    }

    #[test]
    fn test_deserialize_camel_case() {
        let json = r#"{
            "name": "remarks",
            "kind": "textarea",
            "readOnly": true,
            "helperText": "Optional",
            "rows": 5
        }"#;
        let field: FieldDescriptor = serde_json::from_str(json).unwrap();
        assert_eq!(field.kind, FieldKind::TextArea);
        assert!(field.read_only);
        assert_eq!(field.help_text.as_deref(), Some("Optional"));
        assert_eq!(field.rows_or_default(), 5);
    }

    #[test]
    fn test_malformed_options_degrade() {
        let json = r#"{"name": "fund", "kind": "select", "options": "General Fund"}"#;
        let field: FieldDescriptor = serde_json::from_str(json).unwrap();
        assert!(field.options.is_empty());
    }

    #[test]
    fn test_unknown_kind_renders_as_text() {
        let json = r#"{"name": "sig", "kind": "signature"}"#;
        let field: FieldDescriptor = serde_json::from_str(json).unwrap();
        assert_eq!(field.kind, FieldKind::Text);
    }

    #[test]
    fn test_renamed_keeps_label() {
        let template = FieldDescriptor::number("debit");
        let cell = template.renamed("entries.2.debit");
        assert_eq!(cell.name, "entries.2.debit");
        assert_eq!(cell.label, "Debit");
    }
}
