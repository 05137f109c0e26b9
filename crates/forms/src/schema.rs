//! Schema files
//!
//! A form schema is the serialisable description of one form: its fields
//! and the cross-field rules between them. Schemas are stored as JSON or
//! TOML, wrapped in a versioned `SchemaFile`; bare schemas without the
//! wrapper are accepted for hand-written files.

use crate::config::EngineConfig;
use crate::descriptor::{FieldDescriptor, check_descriptors};
use crate::state::FormState;
use crate::validation::{FieldRule, ValidationSchema};
use crate::values::{FormValues, is_pattern};
use civic_core::{FormError, FormResult, Persistable, Validatable};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Current schema file version
pub const SCHEMA_VERSION: u32 = 1;

// ============================================================================
// Rule specifications
// ============================================================================

/// Serialisable form of the cross-field and pattern rules
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum RuleSpec {
    DateOrder {
        from: String,
        to: String,
    },
    NotEqual {
        left: String,
        right: String,
    },
    RequiredIfEmpty {
        field: String,
        other: String,
    },
    RequiredWhenIn {
        field: String,
        sibling: String,
        values: Vec<String>,
    },
    Balanced {
        rows: String,
        left: String,
        right: String,
    },
    Pattern {
        field: String,
        pattern: String,
        message: String,
    },
}

impl RuleSpec {
    /// Tag used in schema files
    pub fn tag(&self) -> &'static str {
        match self {
            RuleSpec::DateOrder { .. } => "date_order",
            RuleSpec::NotEqual { .. } => "not_equal",
            RuleSpec::RequiredIfEmpty { .. } => "required_if_empty",
            RuleSpec::RequiredWhenIn { .. } => "required_when_in",
            RuleSpec::Balanced { .. } => "balanced",
            RuleSpec::Pattern { .. } => "pattern",
        }
    }

    /// Field names or patterns this rule mentions
    pub fn fields(&self) -> Vec<String> {
        match self {
            RuleSpec::DateOrder { from, to } => vec![from.clone(), to.clone()],
            RuleSpec::NotEqual { left, right } => vec![left.clone(), right.clone()],
            RuleSpec::RequiredIfEmpty { field, other } => vec![field.clone(), other.clone()],
            RuleSpec::RequiredWhenIn { field, sibling, .. } => {
                vec![field.clone(), sibling.clone()]
            }
            RuleSpec::Balanced { rows, left, right } => {
                vec![format!("{}.*.{}", rows, left), format!("{}.*.{}", rows, right)]
            }
            RuleSpec::Pattern { field, .. } => vec![field.clone()],
        }
    }

    fn apply(&self, schema: ValidationSchema) -> FormResult<ValidationSchema> {
        Ok(match self {
            RuleSpec::DateOrder { from, to } => schema.date_order(from, to),
            RuleSpec::NotEqual { left, right } => schema.not_equal(left, right),
            RuleSpec::RequiredIfEmpty { field, other } => schema.required_if_empty(field, other),
            RuleSpec::RequiredWhenIn {
                field,
                sibling,
                values,
            } => {
                let values: Vec<&str> = values.iter().map(String::as_str).collect();
                schema.required_when_in(field, sibling, &values)
            }
            RuleSpec::Balanced { rows, left, right } => schema.balanced(rows, left, right),
            RuleSpec::Pattern {
                field,
                pattern,
                message,
            } => schema.rule(field, FieldRule::pattern(pattern, message)?),
        })
    }
}

// ============================================================================
// FormSchema
// ============================================================================

/// Fields and rules of one form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormSchema {
    /// Machine name
    pub name: String,

    /// Heading shown above the form
    #[serde(default)]
    pub title: String,

    /// Fields in display order
    #[serde(default)]
    pub fields: Vec<FieldDescriptor>,

    /// Cross-field and pattern rules
    #[serde(default)]
    pub rules: Vec<RuleSpec>,
}

impl FormSchema {
    /// Create an empty schema
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            title: String::new(),
            fields: Vec::new(),
            rules: Vec::new(),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_field(mut self, field: FieldDescriptor) -> Self {
        self.fields.push(field);
        self
    }

    pub fn with_rule(mut self, rule: RuleSpec) -> Self {
        self.rules.push(rule);
        self
    }

    /// Build the validation schema for these rules
    pub fn validation_schema(&self, config: &EngineConfig) -> FormResult<ValidationSchema> {
        self.rules
            .iter()
            .try_fold(ValidationSchema::new().with_config(config.clone()), |schema, rule| {
                rule.apply(schema)
            })
    }

    /// Create a form state from this schema
    pub fn build_form(&self, config: &EngineConfig, initial: FormValues) -> FormResult<FormState> {
        FormState::new(self.fields.clone(), self.validation_schema(config)?, initial)
    }

    /// Non-fatal problems: choice fields without options, rules naming no field
    pub fn warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        for field in &self.fields {
            if field.kind.is_choice() && field.options.is_empty() {
                warnings.push(format!(
                    "Field '{}' is a {} field with no options",
                    field.name, field.kind
                ));
            }
        }
        for rule in &self.rules {
            // Row patterns may only match rows added at runtime
            for name in rule.fields().into_iter().filter(|n| !is_pattern(n)) {
                if !self.fields.iter().any(|f| f.name == name) {
                    warnings.push(format!("Rule refers to unknown field '{}'", name));
                }
            }
        }
        warnings
    }
}

impl Validatable for FormSchema {
    fn validate(&self) -> FormResult<()> {
        if self.name.trim().is_empty() {
            return Err(FormError::InvalidSchema(
                "Schema name cannot be empty".to_string(),
            ));
        }
        check_descriptors(&self.fields)?;
        for rule in &self.rules {
            if rule.fields().iter().any(|f| f.trim().is_empty()) {
                return Err(FormError::InvalidSchema(format!(
                    "Rule {:?} has an empty field name",
                    rule
                )));
            }
        }
        self.validation_schema(&EngineConfig::default())?;
        Ok(())
    }

    fn validation_errors(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if self.name.trim().is_empty() {
            errors.push("Schema name cannot be empty".to_string());
        }
        for field in &self.fields {
            errors.extend(field.validation_errors());
        }
        if let Err(e) = check_descriptors(&self.fields) {
            if matches!(e, FormError::DuplicateField(_)) {
                errors.push(e.to_string());
            }
        }
        if let Err(e) = self.validation_schema(&EngineConfig::default()) {
            errors.push(e.to_string());
        }
        errors
    }
}

// ============================================================================
// Schema File Wrapper
// ============================================================================

/// Versioned wrapper stored on disk
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemaFile {
    /// Schema version for migration purposes
    pub schema_version: u32,

    /// The form schema
    pub schema: FormSchema,
}

impl SchemaFile {
    pub fn new(schema: FormSchema) -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            schema,
        }
    }

    fn into_current(self) -> FormResult<FormSchema> {
        if self.schema_version > Self::schema_version() {
            return Err(FormError::SchemaVersionMismatch {
                expected: Self::schema_version(),
                found: self.schema_version,
            });
        }
        Ok(self.schema)
    }
}

impl Persistable for SchemaFile {
    fn file_extension() -> &'static str {
        "json"
    }

    fn schema_version() -> u32 {
        SCHEMA_VERSION
    }
}

/// On-disk format of a schema
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaFormat {
    Json,
    Toml,
}

impl SchemaFormat {
    /// Pick the format from a file extension (JSON unless `.toml`)
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("toml") => SchemaFormat::Toml,
            _ => SchemaFormat::Json,
        }
    }
}

// ============================================================================
// Load / Save
// ============================================================================

/// Parse a schema from text, with or without the version wrapper
pub fn load_schema_from_str(text: &str, format: SchemaFormat) -> FormResult<FormSchema> {
    match format {
        SchemaFormat::Json => {
            let value: serde_json::Value = serde_json::from_str(text)?;
            if value.get("schema_version").is_some() {
                serde_json::from_value::<SchemaFile>(value)?.into_current()
            } else {
                Ok(serde_json::from_value(value)?)
            }
        }
        SchemaFormat::Toml => {
            let table: toml::Table = text.parse()?;
            if table.contains_key("schema_version") {
                toml::from_str::<SchemaFile>(text)?.into_current()
            } else {
                Ok(toml::from_str(text)?)
            }
        }
    }
}

/// Load a schema file
pub fn load_schema(path: impl AsRef<Path>) -> FormResult<FormSchema> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(FormError::SchemaNotFound(path.to_path_buf()));
    }
    let text = std::fs::read_to_string(path).map_err(|e| FormError::FileRead {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let schema = load_schema_from_str(&text, SchemaFormat::from_path(path)).map_err(|e| match e {
        FormError::Json(je) => FormError::FileRead {
            path: path.to_path_buf(),
            message: format!("Invalid schema file: {}", je),
        },
        FormError::Toml(te) => FormError::FileRead {
            path: path.to_path_buf(),
            message: format!("Invalid schema file: {}", te),
        },
        other => other,
    })?;

    tracing::info!(path = %path.display(), schema = %schema.name, fields = schema.fields.len(), "loaded schema");
    Ok(schema)
}

/// Save a schema with the version wrapper, in the format the extension names
pub fn save_schema(schema: &FormSchema, path: impl AsRef<Path>) -> FormResult<()> {
    let path = path.as_ref();
    let file = SchemaFile::new(schema.clone());

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }

    match SchemaFormat::from_path(path) {
        SchemaFormat::Json => file.save_to_file(path),
        SchemaFormat::Toml => {
            let text = toml::to_string_pretty(&file).map_err(|e| FormError::FileWrite {
                path: path.to_path_buf(),
                message: format!("Failed to serialize schema: {}", e),
            })?;
            std::fs::write(path, text).map_err(|e| FormError::FileWrite {
                path: path.to_path_buf(),
                message: e.to_string(),
            })
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use civic_core::{FieldKind, SelectOption};
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    fn permit_schema() -> FormSchema {
        FormSchema::new("burial_permit")
            .with_title("Burial Permit")
            .with_field(FieldDescriptor::text("deceased_name").required())
            .with_field(
                FieldDescriptor::select(
                    "service_type",
                    vec![
                        SelectOption::new("inter", "Interment"),
                        SelectOption::new("disinter", "Disinterment"),
                    ],
                )
                .required(),
            )
            .with_field(FieldDescriptor::text("disposition"))
            .with_field(FieldDescriptor::date("permit_date"))
            .with_field(FieldDescriptor::date("burial_date"))
            .with_rule(RuleSpec::RequiredWhenIn {
                field: "disposition".into(),
                sibling: "service_type".into(),
                values: vec!["disinter".into()],
            })
            .with_rule(RuleSpec::DateOrder {
                from: "permit_date".into(),
                to: "burial_date".into(),
            })
    }

    #[test]
    fn test_json_roundtrip_through_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("permit.json");
        let schema = permit_schema();
        save_schema(&schema, &path).unwrap();
        let loaded = load_schema(&path).unwrap();
        assert_eq!(loaded, schema);
    }

    #[test]
    fn test_toml_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("permit.toml");
        save_schema(&permit_schema(), &path).unwrap();
        let loaded = load_schema(&path).unwrap();
        assert_eq!(loaded.fields.len(), 5);
        assert_eq!(loaded.rules.len(), 2);
    }

    #[test]
    fn test_bare_toml_schema() {
        let text = r#"
name = "journal_entry"
title = "Journal Entry"

[[fields]]
name = "particulars"
kind = "textarea"
required = true

[[fields]]
name = "entries.0.debit"
kind = "number"

[[fields]]
name = "entries.0.credit"
kind = "number"

[[rules]]
rule = "balanced"
rows = "entries"
left = "debit"
right = "credit"
"#;
        let schema = load_schema_from_str(text, SchemaFormat::Toml).unwrap();
        assert_eq!(schema.fields[0].kind, FieldKind::TextArea);
        assert!(schema.is_valid());
        assert!(schema.warnings().is_empty());
    }

    #[test]
    fn test_newer_version_rejected() {
        let json = r#"{"schema_version": 99, "schema": {"name": "x"}}"#;
        let err = load_schema_from_str(json, SchemaFormat::Json).unwrap_err();
        assert!(matches!(
            err,
            FormError::SchemaVersionMismatch { expected: 1, found: 99 }
        ));
    }

    #[test]
    fn test_missing_file() {
        let err = load_schema("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, FormError::SchemaNotFound(_)));
    }

    #[test]
    fn test_warnings() {
        let schema = FormSchema::new("voucher")
            .with_field(FieldDescriptor::select("fund", vec![]))
            .with_rule(RuleSpec::NotEqual {
                left: "fund".into(),
                right: "payee".into(),
            });
        let warnings = schema.warnings();
        assert_eq!(warnings.len(), 2);
        assert!(warnings[0].contains("no options"));
        assert!(warnings[1].contains("payee"));
        assert!(schema.is_valid());
    }

    #[test]
    fn test_invalid_schema() {
        let schema = FormSchema::new("voucher")
            .with_field(FieldDescriptor::text("payee"))
            .with_field(FieldDescriptor::text("payee"));
        assert!(!schema.is_valid());
        assert_eq!(schema.validation_errors().len(), 1);

        let bad_pattern = FormSchema::new("voucher").with_rule(RuleSpec::Pattern {
            field: "or_number".into(),
            pattern: "(".into(),
            message: "bad".into(),
        });
        assert!(bad_pattern.validate().is_err());
    }

    #[test]
    fn test_build_form_applies_rules() {
        let schema = permit_schema();
        let mut form = schema
            .build_form(&EngineConfig::default(), FormValues::new())
            .unwrap();
        form.set_field("deceased_name", "Pedro Reyes").unwrap();
        form.set_field("service_type", "disinter").unwrap();
        let errors = form.validate_all().unwrap_err();
        assert_eq!(errors.get("disposition"), Some("Disposition is required"));
    }
}
