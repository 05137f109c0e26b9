//! Validation for form values
//!
//! A `ValidationSchema` combines the rules implied by field descriptors
//! (required, numeric, ranges, lengths, email, option membership) with
//! extra per-field rules registered by name pattern and cross-field rules
//! such as date ordering and debit/credit balance.
//!
//! Validation failures are values, never errors: `validate` returns a
//! `ValidationErrors` map and `validate_field` returns the message for one
//! field.

use crate::config::EngineConfig;
use crate::descriptor::FieldDescriptor;
use crate::values::{FormValues, fill_pattern, is_pattern, match_pattern};
use civic_core::{FieldKind, FieldValue, FormError, FormResult, format_number};
use heck::ToTitleCase;
use regex::Regex;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, LazyLock};

static EMAIL_RE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").ok());

/// Predicate over the whole value map
pub type Predicate = Arc<dyn Fn(&FormValues) -> bool + Send + Sync>;

// ============================================================================
// ValidationErrors
// ============================================================================

/// Result of validating a whole form
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationErrors {
    /// Per-field messages; a missing key means the field is valid
    pub fields: BTreeMap<String, String>,
    /// Errors that belong to no single field
    pub form: Vec<String>,
}

impl ValidationErrors {
    /// Create an empty error set
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether there are no errors at all
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.form.is_empty()
    }

    /// Total number of errors
    pub fn len(&self) -> usize {
        self.fields.len() + self.form.len()
    }

    /// Message for one field
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    /// Record a field error
    pub fn insert(&mut self, name: impl Into<String>, message: impl Into<String>) {
        self.fields.insert(name.into(), message.into());
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for message in self.form.iter().chain(self.fields.values()) {
            if !first {
                write!(f, "; ")?;
            }
            write!(f, "{}", message)?;
            first = false;
        }
        Ok(())
    }
}

// ============================================================================
// Field Rules
// ============================================================================

/// A rule checked against the value of one field
#[derive(Debug, Clone)]
pub enum FieldRule {
    /// Must be set; a checkbox must be checked
    Required,
    /// Must parse as a number
    Numeric,
    /// Must not be below zero
    NonNegative,
    /// Numeric lower bound
    Min(f64),
    /// Numeric upper bound
    Max(f64),
    /// Minimum number of characters
    MinLength(usize),
    /// Maximum number of characters
    MaxLength(usize),
    /// Must look like an email address
    Email,
    /// Must be a calendar date in `YYYY-MM-DD` form
    Date,
    /// Must match a regular expression
    Pattern { regex: Regex, message: String },
    /// Must be one of the given values (every item, for lists)
    OneOf(Vec<String>),
}

impl FieldRule {
    /// Build a pattern rule
    pub fn pattern(pattern: &str, message: impl Into<String>) -> FormResult<Self> {
        let regex = Regex::new(pattern)
            .map_err(|e| FormError::InvalidSchema(format!("Invalid pattern '{}': {}", pattern, e)))?;
        Ok(FieldRule::Pattern {
            regex,
            message: message.into(),
        })
    }

    /// Check a value; `Some(message)` when the rule fails
    ///
    /// Only `Required` looks at unset values; every other rule passes them.
    pub fn check(&self, label: &str, value: &FieldValue) -> Option<String> {
        if let FieldRule::Required = self {
            let missing = value.is_unset() || value.as_bool() == Some(false);
            return missing.then(|| format!("{} is required", label));
        }
        if value.is_unset() {
            return None;
        }

        match self {
            FieldRule::Required => None,
            FieldRule::Numeric => value
                .as_number()
                .is_none()
                .then(|| format!("{} must be a number", label)),
            FieldRule::NonNegative => value
                .as_number()
                .filter(|n| *n < 0.0)
                .map(|_| format!("{} cannot be negative", label)),
            FieldRule::Min(min) => value
                .as_number()
                .filter(|n| n < min)
                .map(|_| format!("{} must be at least {}", label, format_number(*min))),
            FieldRule::Max(max) => value
                .as_number()
                .filter(|n| n > max)
                .map(|_| format!("{} must be at most {}", label, format_number(*max))),
            FieldRule::MinLength(len) => value
                .as_text()
                .filter(|s| s.chars().count() < *len)
                .map(|_| format!("{} must be at least {} characters", label, len)),
            FieldRule::MaxLength(len) => value
                .as_text()
                .filter(|s| s.chars().count() > *len)
                .map(|_| format!("{} must be at most {} characters", label, len)),
            FieldRule::Email => {
                let text = value.as_text().unwrap_or_default().trim();
                let valid = EMAIL_RE.as_ref().is_some_and(|re| re.is_match(text));
                (!valid).then(|| format!("{} must be a valid email address", label))
            }
            FieldRule::Date => value
                .as_date()
                .is_none()
                .then(|| format!("{} must be a valid date (YYYY-MM-DD)", label)),
            FieldRule::Pattern { regex, message } => {
                let text = value.to_input_string();
                (!regex.is_match(&text)).then(|| message.clone())
            }
            FieldRule::OneOf(allowed) => {
                let ok = match value {
                    FieldValue::List(items) => items.iter().all(|item| allowed.contains(item)),
                    other => allowed.contains(&other.to_input_string()),
                };
                (!ok).then(|| format!("{} has an invalid selection", label))
            }
        }
    }

    /// Rules implied by a descriptor, in checking order
    pub fn from_descriptor(descriptor: &FieldDescriptor) -> Vec<FieldRule> {
        let mut rules = Vec::new();
        if descriptor.required {
            rules.push(FieldRule::Required);
        }

        match descriptor.kind {
            FieldKind::Number => {
                rules.push(FieldRule::Numeric);
                if !descriptor.allow_negative {
                    rules.push(FieldRule::NonNegative);
                }
                rules.extend(descriptor.min.map(FieldRule::Min));
                rules.extend(descriptor.max.map(FieldRule::Max));
            }
            FieldKind::Email => rules.push(FieldRule::Email),
            FieldKind::Date => rules.push(FieldRule::Date),
            FieldKind::Select | FieldKind::MultiSelect | FieldKind::Radio => {
                if !descriptor.options.is_empty() {
                    rules.push(FieldRule::OneOf(
                        descriptor.options.iter().map(|o| o.value.clone()).collect(),
                    ));
                }
            }
            FieldKind::Text
            | FieldKind::Password
            | FieldKind::TextArea
            | FieldKind::Checkbox
            | FieldKind::FileArray => {}
        }

        if descriptor.kind.is_textual() {
            rules.extend(descriptor.min_length.map(FieldRule::MinLength));
            rules.extend(descriptor.max_length.map(FieldRule::MaxLength));
        }
        rules
    }
}

// ============================================================================
// Cross-field Rules
// ============================================================================

/// A rule relating several fields
///
/// Names may contain `*` in place of a row index; all participants of one
/// evaluation share the same index.
#[derive(Clone)]
pub enum CrossFieldRule {
    /// `from` must not be after `to`; the error goes on `to`
    DateOrder { from: String, to: String },
    /// `left` and `right` must differ; the error goes on `right`
    NotEqual { left: String, right: String },
    /// `field` is required when `other` is empty
    RequiredIfEmpty { field: String, other: String },
    /// `field` is required when `sibling` holds one of `values`
    RequiredWhenIn {
        field: String,
        sibling: String,
        values: Vec<String>,
    },
    /// `field` is required while `predicate` holds over the whole map
    RequiredWhen {
        field: String,
        watches: Vec<String>,
        predicate: Predicate,
    },
    /// Sum of `rows.*.left` must equal sum of `rows.*.right`; form-level
    Balanced {
        rows: String,
        left: String,
        right: String,
    },
    /// `predicate` must hold; the error goes on `target` or the form
    Custom {
        fields: Vec<String>,
        target: Option<String>,
        predicate: Predicate,
        message: String,
    },
}

impl fmt::Debug for CrossFieldRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DateOrder { from, to } => write!(f, "DateOrder({} <= {})", from, to),
            Self::NotEqual { left, right } => write!(f, "NotEqual({} != {})", left, right),
            Self::RequiredIfEmpty { field, other } => {
                write!(f, "RequiredIfEmpty({} if {} empty)", field, other)
            }
            Self::RequiredWhenIn {
                field,
                sibling,
                values,
            } => write!(f, "RequiredWhenIn({} if {} in {:?})", field, sibling, values),
            Self::RequiredWhen { field, watches, .. } => {
                write!(f, "RequiredWhen({} watching {:?})", field, watches)
            }
            Self::Balanced { rows, left, right } => {
                write!(f, "Balanced({}.*.{} = {}.*.{})", rows, left, rows, right)
            }
            Self::Custom { fields, target, .. } => {
                write!(f, "Custom({:?} -> {:?})", fields, target)
            }
        }
    }
}

impl CrossFieldRule {
    /// Field pattern that receives this rule's error, if any
    pub fn target(&self) -> Option<&str> {
        match self {
            Self::DateOrder { to, .. } => Some(to),
            Self::NotEqual { right, .. } => Some(right),
            Self::RequiredIfEmpty { field, .. }
            | Self::RequiredWhenIn { field, .. }
            | Self::RequiredWhen { field, .. } => Some(field),
            Self::Balanced { .. } => None,
            Self::Custom { target, .. } => target.as_deref(),
        }
    }

    /// Every field pattern whose value this rule reads
    pub fn participants(&self) -> Vec<String> {
        match self {
            Self::DateOrder { from, to } => vec![from.clone(), to.clone()],
            Self::NotEqual { left, right } => vec![left.clone(), right.clone()],
            Self::RequiredIfEmpty { field, other } => vec![field.clone(), other.clone()],
            Self::RequiredWhenIn { field, sibling, .. } => vec![field.clone(), sibling.clone()],
            Self::RequiredWhen { field, watches, .. } => {
                let mut all = vec![field.clone()];
                all.extend(watches.iter().cloned());
                all
            }
            Self::Balanced { rows, left, right } => {
                vec![format!("{}.*.{}", rows, left), format!("{}.*.{}", rows, right)]
            }
            Self::Custom { fields, target, .. } => {
                let mut all = fields.clone();
                all.extend(target.iter().cloned());
                all
            }
        }
    }

    /// Evaluate for one concrete target, `captures` binding the wildcards
    fn check_target(
        &self,
        captures: &[&str],
        values: &FormValues,
        label_of: &dyn Fn(&str) -> String,
    ) -> Option<String> {
        let bind = |pattern: &String| fill_pattern(pattern, captures);
        match self {
            Self::DateOrder { from, to } => {
                let (from, to) = (bind(from), bind(to));
                let start = values.date(&from)?;
                let end = values.date(&to)?;
                (start > end).then(|| {
                    format!("{} cannot be earlier than {}", label_of(&to), label_of(&from))
                })
            }
            Self::NotEqual { left, right } => {
                let (left, right) = (bind(left), bind(right));
                if values.is_unset(&left) || values.is_unset(&right) {
                    return None;
                }
                let same = values.value(&left).to_input_string().trim()
                    == values.value(&right).to_input_string().trim();
                same.then(|| format!("{} must differ from {}", label_of(&right), label_of(&left)))
            }
            Self::RequiredIfEmpty { field, other } => {
                let (field, other) = (bind(field), bind(other));
                (values.is_unset(&field) && values.is_unset(&other)).then(|| {
                    format!("{} is required when {} is empty", label_of(&field), label_of(&other))
                })
            }
            Self::RequiredWhenIn {
                field,
                sibling,
                values: triggers,
            } => {
                let (field, sibling) = (bind(field), bind(sibling));
                let current = values.value(&sibling).to_input_string();
                (triggers.iter().any(|t| *t == current) && values.is_unset(&field))
                    .then(|| format!("{} is required", label_of(&field)))
            }
            Self::RequiredWhen {
                field, predicate, ..
            } => {
                let field = bind(field);
                (values.is_unset(&field) && predicate(values))
                    .then(|| format!("{} is required", label_of(&field)))
            }
            Self::Custom {
                predicate, message, ..
            } => (!predicate(values)).then(|| message.clone()),
            Self::Balanced { .. } => None,
        }
    }
}

// ============================================================================
// ValidationSchema
// ============================================================================

/// Extra rules and cross-field rules for one form
#[derive(Debug, Clone, Default)]
pub struct ValidationSchema {
    field_rules: Vec<(String, FieldRule)>,
    cross_rules: Vec<CrossFieldRule>,
    config: EngineConfig,
}

impl ValidationSchema {
    /// Create an empty schema: only descriptor-implied rules apply
    pub fn new() -> Self {
        Self::default()
    }

    /// Use the given engine configuration (balance tolerance and message)
    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// The engine configuration in use
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Register an extra rule for every field matching `pattern`
    pub fn rule(mut self, pattern: impl Into<String>, rule: FieldRule) -> Self {
        self.field_rules.push((pattern.into(), rule));
        self
    }

    /// Register a cross-field rule
    pub fn cross(mut self, rule: CrossFieldRule) -> Self {
        self.cross_rules.push(rule);
        self
    }

    /// `from` must not be later than `to`
    pub fn date_order(self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.cross(CrossFieldRule::DateOrder {
            from: from.into(),
            to: to.into(),
        })
    }

    /// `left` and `right` must not hold the same value
    pub fn not_equal(self, left: impl Into<String>, right: impl Into<String>) -> Self {
        self.cross(CrossFieldRule::NotEqual {
            left: left.into(),
            right: right.into(),
        })
    }

    /// `field` is required when `other` is empty
    pub fn required_if_empty(self, field: impl Into<String>, other: impl Into<String>) -> Self {
        self.cross(CrossFieldRule::RequiredIfEmpty {
            field: field.into(),
            other: other.into(),
        })
    }

    /// `field` is required while `predicate` holds
    pub fn required_when<F>(self, field: impl Into<String>, watches: &[&str], predicate: F) -> Self
    where
        F: Fn(&FormValues) -> bool + Send + Sync + 'static,
    {
        self.cross(CrossFieldRule::RequiredWhen {
            field: field.into(),
            watches: watches.iter().map(|w| w.to_string()).collect(),
            predicate: Arc::new(predicate),
        })
    }

    /// `field` is required when `sibling` holds one of `values`
    pub fn required_when_in(
        self,
        field: impl Into<String>,
        sibling: impl Into<String>,
        values: &[&str],
    ) -> Self {
        self.cross(CrossFieldRule::RequiredWhenIn {
            field: field.into(),
            sibling: sibling.into(),
            values: values.iter().map(|v| v.to_string()).collect(),
        })
    }

    /// Totals of two line-item columns must match
    pub fn balanced(
        self,
        rows: impl Into<String>,
        left: impl Into<String>,
        right: impl Into<String>,
    ) -> Self {
        self.cross(CrossFieldRule::Balanced {
            rows: rows.into(),
            left: left.into(),
            right: right.into(),
        })
    }

    /// Arbitrary check; `predicate` returns `true` when the form is valid
    pub fn custom<F>(
        self,
        fields: &[&str],
        target: Option<&str>,
        message: impl Into<String>,
        predicate: F,
    ) -> Self
    where
        F: Fn(&FormValues) -> bool + Send + Sync + 'static,
    {
        self.cross(CrossFieldRule::Custom {
            fields: fields.iter().map(|f| f.to_string()).collect(),
            target: target.map(str::to_string),
            predicate: Arc::new(predicate),
            message: message.into(),
        })
    }

    /// Registered cross-field rules
    pub fn cross_rules(&self) -> &[CrossFieldRule] {
        &self.cross_rules
    }

    /// Number of registered rules (extra field rules plus cross rules)
    pub fn rule_count(&self) -> usize {
        self.field_rules.len() + self.cross_rules.len()
    }

    // ========================================================================
    // Evaluation
    // ========================================================================

    /// Error for one field against the current values, if any
    pub fn validate_field(
        &self,
        descriptors: &[FieldDescriptor],
        name: &str,
        values: &FormValues,
    ) -> Option<String> {
        let descriptor = descriptors.iter().find(|d| d.name == name);
        let label = match descriptor {
            Some(d) => d.display_label(),
            None => fallback_label(name),
        };
        let value = values.value(name);

        let implied = descriptor.map(FieldRule::from_descriptor).unwrap_or_default();
        let extra = self
            .field_rules
            .iter()
            .filter(|(pattern, _)| match_pattern(pattern, name).is_some())
            .map(|(_, rule)| rule);

        for rule in implied.iter().chain(extra) {
            if let Some(message) = rule.check(&label, value) {
                return Some(message);
            }
        }

        let label_of = |n: &str| label_for(descriptors, n);
        self.cross_rules.iter().find_map(|rule| {
            let target = rule.target()?;
            let captures = match_pattern(target, name)?;
            rule.check_target(&captures, values, &label_of)
        })
    }

    /// Errors that belong to the form rather than a field
    pub fn form_errors(&self, values: &FormValues) -> Vec<String> {
        self.cross_rules
            .iter()
            .filter_map(|rule| match rule {
                CrossFieldRule::Balanced { rows, left, right } => {
                    let debit = values.column_total(rows, left);
                    let credit = values.column_total(rows, right);
                    ((debit - credit).abs() > self.config.balance_tolerance)
                        .then(|| self.config.balance_message.clone())
                }
                CrossFieldRule::Custom {
                    target: None,
                    predicate,
                    message,
                    ..
                } => (!predicate(values)).then(|| message.clone()),
                _ => None,
            })
            .collect()
    }

    /// Validate every described field plus the form-level rules
    pub fn validate(
        &self,
        descriptors: &[FieldDescriptor],
        values: &FormValues,
    ) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        for descriptor in descriptors {
            if let Some(message) = self.validate_field(descriptors, &descriptor.name, values) {
                errors.insert(descriptor.name.clone(), message);
            }
        }
        errors.form = self.form_errors(values);

        tracing::debug!(
            fields = descriptors.len(),
            errors = errors.len(),
            "validated form"
        );

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Fields whose result can change when `name` changes, `name` first
    pub fn dependents_of(&self, name: &str) -> Vec<String> {
        let mut dependents = vec![name.to_string()];
        for rule in &self.cross_rules {
            let Some(target) = rule.target() else {
                continue;
            };
            for participant in rule.participants() {
                if let Some(captures) = match_pattern(&participant, name) {
                    let bound = fill_pattern(target, &captures);
                    if !is_pattern(&bound) && !dependents.contains(&bound) {
                        dependents.push(bound);
                    }
                }
            }
        }
        dependents
    }
}

fn fallback_label(name: &str) -> String {
    name.rsplit('.').next().unwrap_or(name).to_title_case()
}

fn label_for(descriptors: &[FieldDescriptor], name: &str) -> String {
    descriptors
        .iter()
        .find(|d| d.name == name)
        .map(FieldDescriptor::display_label)
        .unwrap_or_else(|| fallback_label(name))
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use civic_core::SelectOption;
    use pretty_assertions::assert_eq;

    fn journal_fields(rows: usize) -> Vec<FieldDescriptor> {
        let mut fields = vec![FieldDescriptor::text("particulars").required()];
        for i in 0..rows {
            fields.push(FieldDescriptor::number(format!("entries.{}.debit", i)).with_label("Debit"));
            fields.push(
                FieldDescriptor::number(format!("entries.{}.credit", i)).with_label("Credit"),
            );
        }
        fields
    }

    fn journal_schema() -> ValidationSchema {
        ValidationSchema::new()
            .required_if_empty("entries.*.credit", "entries.*.debit")
            .balanced("entries", "debit", "credit")
    }

    #[test]
    fn test_required_and_type_errors_differ() {
        let fields = vec![FieldDescriptor::number("amount").required()];
        let schema = ValidationSchema::new();

        let empty = FormValues::new();
        assert_eq!(
            schema.validate_field(&fields, "amount", &empty).as_deref(),
            Some("Amount is required")
        );

        let garbage = FormValues::new().with("amount", "12abc");
        assert_eq!(
            schema.validate_field(&fields, "amount", &garbage).as_deref(),
            Some("Amount must be a number")
        );
    }

    #[test]
    fn test_non_finite_numbers_rejected() {
        let fields = vec![FieldDescriptor::number("amount").with_min(0.0).with_max(1000.0)];
        let schema = ValidationSchema::new();

        for bad in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let values = FormValues::new().with("amount", bad);
            assert_eq!(
                schema.validate_field(&fields, "amount", &values).as_deref(),
                Some("Amount must be a number")
            );
        }
    }

    #[test]
    fn test_empty_optional_number_is_valid() {
        let fields = vec![FieldDescriptor::number("discount")];
        let values = FormValues::new().with("discount", FieldValue::Null);
        assert!(ValidationSchema::new().validate(&fields, &values).is_ok());
    }

    #[test]
    fn test_negative_numbers() {
        let fields = vec![
            FieldDescriptor::number("amount"),
            FieldDescriptor::number("adjustment").allow_negative(),
        ];
        let values = FormValues::new().with("amount", -5.0).with("adjustment", -5.0);
        let errors = ValidationSchema::new().validate(&fields, &values).unwrap_err();
        assert_eq!(errors.get("amount"), Some("Amount cannot be negative"));
        assert_eq!(errors.get("adjustment"), None);
    }

    #[test]
    fn test_email_and_length() {
        let fields = vec![
            FieldDescriptor::new("email", FieldKind::Email),
            FieldDescriptor::text("code").with_min_length(3),
        ];
        let values = FormValues::new().with("email", "treasurer@lgu").with("code", "ab");
        let errors = ValidationSchema::new().validate(&fields, &values).unwrap_err();
        assert_eq!(errors.get("email"), Some("Email must be a valid email address"));
        assert_eq!(errors.get("code"), Some("Code must be at least 3 characters"));

        let values = FormValues::new()
            .with("email", "treasurer@lgu.gov.ph")
            .with("code", "abc");
        assert!(ValidationSchema::new().validate(&fields, &values).is_ok());
    }

    #[test]
    fn test_required_checkbox_must_be_checked() {
        let fields = vec![FieldDescriptor::new("certify", FieldKind::Checkbox).required()];
        let schema = ValidationSchema::new();
        let unchecked = FormValues::new().with("certify", false);
        assert!(schema.validate_field(&fields, "certify", &unchecked).is_some());
        let checked = FormValues::new().with("certify", true);
        assert!(schema.validate_field(&fields, "certify", &checked).is_none());
    }

    #[test]
    fn test_option_membership() {
        let fields = vec![FieldDescriptor::select(
            "fund",
            vec![SelectOption::new("gf", "General Fund"), SelectOption::new("sef", "SEF")],
        )];
        let schema = ValidationSchema::new();
        let stale = FormValues::new().with("fund", "trust");
        assert_eq!(
            schema.validate_field(&fields, "fund", &stale).as_deref(),
            Some("Fund has an invalid selection")
        );
        let blank = FormValues::new().with("fund", "");
        assert!(schema.validate_field(&fields, "fund", &blank).is_none());
    }

    #[test]
    fn test_select_without_options_accepts_anything() {
        let fields = vec![FieldDescriptor::select("account", vec![])];
        let values = FormValues::new().with("account", "1042");
        assert!(ValidationSchema::new().validate(&fields, &values).is_ok());
    }

    #[test]
    fn test_date_order() {
        let fields = vec![FieldDescriptor::date("from_date"), FieldDescriptor::date("to_date")];
        let schema = ValidationSchema::new().date_order("from_date", "to_date");

        let ok = FormValues::new()
            .with("from_date", "2024-01-01")
            .with("to_date", "2024-06-01");
        assert!(schema.validate(&fields, &ok).is_ok());

        let same = FormValues::new()
            .with("from_date", "2024-01-01")
            .with("to_date", "2024-01-01");
        assert!(schema.validate(&fields, &same).is_ok());

        let reversed = FormValues::new()
            .with("from_date", "2024-06-01")
            .with("to_date", "2024-01-01");
        let errors = schema.validate(&fields, &reversed).unwrap_err();
        assert_eq!(errors.fields.len(), 1);
        assert_eq!(
            errors.get("to_date"),
            Some("To Date cannot be earlier than From Date")
        );
    }

    #[test]
    fn test_not_equal() {
        let fields = vec![
            FieldDescriptor::text("debit_account"),
            FieldDescriptor::text("credit_account"),
        ];
        let schema = ValidationSchema::new().not_equal("debit_account", "credit_account");
        let values = FormValues::new()
            .with("debit_account", "1010")
            .with("credit_account", "1010");
        let errors = schema.validate(&fields, &values).unwrap_err();
        assert_eq!(
            errors.get("credit_account"),
            Some("Credit Account must differ from Debit Account")
        );
    }

    #[test]
    fn test_credit_required_only_if_debit_empty() {
        let fields = journal_fields(1);
        let schema = journal_schema();

        let neither = FormValues::new().with("particulars", "x");
        assert_eq!(
            schema.validate_field(&fields, "entries.0.credit", &neither).as_deref(),
            Some("Credit is required when Debit is empty")
        );

        let debit_only = FormValues::new().with("entries.0.debit", 100.0);
        assert!(schema.validate_field(&fields, "entries.0.credit", &debit_only).is_none());
    }

    #[test]
    fn test_balanced_rows() {
        let fields = journal_fields(2);
        let schema = journal_schema();

        let mut values = FormValues::new()
            .with("particulars", "Payment of electricity")
            .with("entries.0.debit", 100.0)
            .with("entries.0.credit", 0.0)
            .with("entries.1.debit", 0.0)
            .with("entries.1.credit", 100.0);
        assert!(schema.validate(&fields, &values).is_ok());

        values.set("entries.1.credit", 50.0);
        let errors = schema.validate(&fields, &values).unwrap_err();
        assert!(errors.fields.is_empty());
        assert_eq!(errors.form, vec!["Total Debit must equal Total Credit".to_string()]);
    }

    #[test]
    fn test_balance_tolerance() {
        let fields = journal_fields(1);
        let schema = journal_schema();
        let values = FormValues::new()
            .with("particulars", "Rounding")
            .with("entries.0.debit", 100.001)
            .with("entries.0.credit", 100.0);
        assert!(schema.validate(&fields, &values).is_ok());
    }

    #[test]
    fn test_required_when_in() {
        let fields = vec![
            FieldDescriptor::select(
                "service_type",
                vec![
                    SelectOption::new("inter", "Interment"),
                    SelectOption::new("disinter", "Disinterment"),
                    SelectOption::new("remove", "Removal"),
                ],
            ),
            FieldDescriptor::text("disposition"),
        ];
        let schema =
            ValidationSchema::new().required_when_in("disposition", "service_type", &["disinter", "remove"]);

        for (service, expect_error) in [("inter", false), ("disinter", true), ("remove", true)] {
            let values = FormValues::new().with("service_type", service);
            assert_eq!(
                schema.validate_field(&fields, "disposition", &values).is_some(),
                expect_error,
                "service {}",
                service
            );
        }
    }

    #[test]
    fn test_required_when_predicate() {
        let fields = vec![
            FieldDescriptor::new("is_senior", FieldKind::Checkbox),
            FieldDescriptor::text("senior_id"),
        ];
        let schema = ValidationSchema::new().required_when("senior_id", &["is_senior"], |v| {
            v.value("is_senior").as_bool() == Some(true)
        });
        let values = FormValues::new().with("is_senior", true);
        assert_eq!(
            schema.validate_field(&fields, "senior_id", &values).as_deref(),
            Some("Senior Id is required")
        );
        let values = FormValues::new().with("is_senior", false);
        assert!(schema.validate_field(&fields, "senior_id", &values).is_none());
    }

    #[test]
    fn test_custom_form_level_rule() {
        let fields = vec![FieldDescriptor::number("amount")];
        let schema = ValidationSchema::new().custom(
            &["amount"],
            None,
            "Amount exceeds the appropriation",
            |v| v.number("amount").unwrap_or(0.0) <= 1000.0,
        );
        let values = FormValues::new().with("amount", 5000.0);
        let errors = schema.validate(&fields, &values).unwrap_err();
        assert_eq!(errors.form, vec!["Amount exceeds the appropriation".to_string()]);
    }

    #[test]
    fn test_extra_pattern_rule() {
        let fields = vec![FieldDescriptor::text("or_number")];
        let schema = ValidationSchema::new().rule(
            "or_number",
            FieldRule::pattern(r"^\d{7}$", "OR number must be 7 digits").unwrap(),
        );
        let values = FormValues::new().with("or_number", "12A");
        assert_eq!(
            schema.validate_field(&fields, "or_number", &values).as_deref(),
            Some("OR number must be 7 digits")
        );
        assert!(FieldRule::pattern("(", "bad").is_err());
    }

    #[test]
    fn test_dependents_of() {
        let schema = journal_schema().date_order("from_date", "to_date");
        assert_eq!(
            schema.dependents_of("entries.3.debit"),
            vec!["entries.3.debit".to_string(), "entries.3.credit".to_string()]
        );
        assert_eq!(
            schema.dependents_of("from_date"),
            vec!["from_date".to_string(), "to_date".to_string()]
        );
        assert_eq!(schema.dependents_of("particulars"), vec!["particulars".to_string()]);
    }

    #[test]
    fn test_errors_display() {
        let mut errors = ValidationErrors::new();
        errors.form.push("Unbalanced".into());
        errors.insert("payee", "Payee is required");
        assert_eq!(errors.to_string(), "Unbalanced; Payee is required");
    }
}
