//! Form state container
//!
//! `FormState` owns everything one mounted form needs: the descriptors, the
//! validation schema, the current value map, per-field errors, the touched
//! set, form-level errors, the submitting flag and the last notice.
//!
//! The container is synchronous apart from `submit_with`, which awaits the
//! caller's submit future. UI code that cannot hold a mutable borrow across
//! an await uses the two halves `begin_submit` / `finish_submit` instead.

use crate::attachments::AttachmentList;
use crate::config::EngineConfig;
use crate::descriptor::{FieldDescriptor, check_descriptors};
use crate::validation::{ValidationErrors, ValidationSchema};
use crate::values::{FormValues, parse_row_path, row_path};
use civic_core::{
    AttachmentRef, FieldKind, FieldValue, FormError, FormId, FormResult, PendingFile,
};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::future::Future;

// ============================================================================
// Notices and submit results
// ============================================================================

/// Severity of a notice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// A message for the user about the last form-wide action
#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub text: String,
    pub level: NoticeLevel,
}

impl Notice {
    pub fn new(text: impl Into<String>, level: NoticeLevel) -> Self {
        Self {
            text: text.into(),
            level,
        }
    }

    pub fn success(text: impl Into<String>) -> Self {
        Self::new(text, NoticeLevel::Success)
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self::new(text, NoticeLevel::Error)
    }

    /// Notice for a finished submit callback
    pub fn for_result<E: fmt::Display>(success_message: &str, result: &Result<(), E>) -> Self {
        match result {
            Ok(()) => Self::success(success_message),
            Err(err) => Self::error(err.to_string()),
        }
    }
}

/// What `begin_submit` decided
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitGate {
    /// Valid; the submitting flag is now set. Carries the values to send.
    Ready(FormValues),
    /// A submission is already in flight; nothing happened
    Busy,
    /// Validation failed; every field is now touched
    Invalid(ValidationErrors),
}

/// How a full submit attempt ended
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    Submitted,
    Busy,
    Invalid(ValidationErrors),
    /// The callback failed; the message is also in the notice
    Rejected(String),
}

impl SubmitOutcome {
    pub fn is_submitted(&self) -> bool {
        matches!(self, SubmitOutcome::Submitted)
    }
}

const DEFAULT_SUCCESS_MESSAGE: &str = "Saved successfully";

// ============================================================================
// FormState
// ============================================================================

/// State of one mounted form
#[derive(Debug, Clone)]
pub struct FormState {
    id: FormId,
    descriptors: Vec<FieldDescriptor>,
    validation: ValidationSchema,
    values: FormValues,
    initial: FormValues,
    errors: BTreeMap<String, String>,
    form_errors: Vec<String>,
    touched: BTreeSet<String>,
    submitting: bool,
    identity: Option<String>,
    notice: Option<Notice>,
    success_message: String,
    submit_count: u32,
}

impl FormState {
    /// Create a form from its descriptors, rules and initial values
    ///
    /// Fields missing from `initial` start at their default; keys in
    /// `initial` that no descriptor binds are dropped.
    pub fn new(
        descriptors: Vec<FieldDescriptor>,
        validation: ValidationSchema,
        initial: FormValues,
    ) -> FormResult<Self> {
        check_descriptors(&descriptors)?;
        let values = seed_values(&descriptors, &initial);
        let id = FormId::new_v4();
        tracing::debug!(form = %id, fields = descriptors.len(), "created form state");

        Ok(Self {
            id,
            descriptors,
            validation,
            initial: values.clone(),
            values,
            errors: BTreeMap::new(),
            form_errors: Vec::new(),
            touched: BTreeSet::new(),
            submitting: false,
            identity: None,
            notice: None,
            success_message: DEFAULT_SUCCESS_MESSAGE.to_string(),
            submit_count: 0,
        })
    }

    /// Set the identity of the record the form was hydrated from
    pub fn with_identity(mut self, identity: impl Into<String>) -> Self {
        self.identity = Some(identity.into());
        self
    }

    /// Set the notice text shown after a successful submit
    pub fn with_success_message(mut self, message: impl Into<String>) -> Self {
        self.success_message = message.into();
        self
    }

    pub fn success_message(&self) -> &str {
        &self.success_message
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn id(&self) -> FormId {
        self.id
    }

    pub fn descriptors(&self) -> &[FieldDescriptor] {
        &self.descriptors
    }

    pub fn descriptor(&self, name: &str) -> Option<&FieldDescriptor> {
        self.descriptors.iter().find(|d| d.name == name)
    }

    pub fn validation(&self) -> &ValidationSchema {
        &self.validation
    }

    pub fn config(&self) -> &EngineConfig {
        self.validation.config()
    }

    pub fn values(&self) -> &FormValues {
        &self.values
    }

    /// Current value of a field (`Null` if unknown)
    pub fn value(&self, name: &str) -> &FieldValue {
        self.values.value(name)
    }

    /// All recorded field errors, whether shown or not
    pub fn errors(&self) -> &BTreeMap<String, String> {
        &self.errors
    }

    pub fn error(&self, name: &str) -> Option<&str> {
        self.errors.get(name).map(String::as_str)
    }

    pub fn form_errors(&self) -> &[String] {
        &self.form_errors
    }

    pub fn is_touched(&self, name: &str) -> bool {
        self.touched.contains(name)
    }

    /// Error to display: only for touched fields
    pub fn visible_error(&self, name: &str) -> Option<&str> {
        if self.is_touched(name) {
            self.error(name)
        } else {
            None
        }
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn identity(&self) -> Option<&str> {
        self.identity.as_deref()
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn clear_notice(&mut self) {
        self.notice = None;
    }

    /// Number of submissions that passed validation
    pub fn submit_count(&self) -> u32 {
        self.submit_count
    }

    /// Whether any value differs from the last initial map
    pub fn is_dirty(&self) -> bool {
        self.values != self.initial
    }

    // ========================================================================
    // Field interaction
    // ========================================================================

    /// Set one field's value
    ///
    /// Read-only and disabled fields are still settable from code.
    pub fn set_field(&mut self, name: &str, value: impl Into<FieldValue>) -> FormResult<()> {
        let descriptor = self
            .descriptor(name)
            .ok_or_else(|| FormError::UnknownField(name.to_string()))?;
        let value = descriptor.normalize(value.into());
        tracing::debug!(field = name, kind = value.type_name(), "set field");
        self.values.set(name, value);
        Ok(())
    }

    /// Set a field and re-check it plus every field whose rules read it
    pub fn set_field_and_validate_dependents(
        &mut self,
        name: &str,
        value: impl Into<FieldValue>,
    ) -> FormResult<()> {
        self.set_field(name, value)?;
        for dependent in self.validation.dependents_of(name) {
            if self.descriptor(&dependent).is_some() {
                self.revalidate(&dependent);
            }
        }
        if !self.form_errors.is_empty() {
            self.form_errors = self.validation.form_errors(&self.values);
        }
        Ok(())
    }

    /// Mark a field touched and check it against the current values
    pub fn blur(&mut self, name: &str) -> FormResult<()> {
        if self.descriptor(name).is_none() {
            return Err(FormError::UnknownField(name.to_string()));
        }
        self.touched.insert(name.to_string());
        self.revalidate(name);
        Ok(())
    }

    /// Mark every field touched
    pub fn touch_all(&mut self) {
        self.touched = self.descriptors.iter().map(|d| d.name.clone()).collect();
    }

    /// Run the full validation and store the result
    pub fn validate_all(&mut self) -> Result<(), ValidationErrors> {
        let result = self.validation.validate(&self.descriptors, &self.values);
        match &result {
            Ok(()) => {
                self.errors.clear();
                self.form_errors.clear();
            }
            Err(errors) => {
                self.errors = errors.fields.clone();
                self.form_errors = errors.form.clone();
            }
        }
        result
    }

    fn revalidate(&mut self, name: &str) {
        match self
            .validation
            .validate_field(&self.descriptors, name, &self.values)
        {
            Some(message) => {
                self.errors.insert(name.to_string(), message);
            }
            None => {
                self.errors.remove(name);
            }
        }
    }

    // ========================================================================
    // Submission
    // ========================================================================

    /// Start a submission
    pub fn begin_submit(&mut self) -> SubmitGate {
        if self.submitting {
            tracing::debug!(form = %self.id, "submit ignored, already submitting");
            return SubmitGate::Busy;
        }

        if let Err(errors) = self.validate_all() {
            self.touch_all();
            tracing::debug!(form = %self.id, errors = errors.len(), "submit blocked by validation");
            return SubmitGate::Invalid(errors);
        }

        self.submitting = true;
        self.submit_count += 1;
        self.notice = None;
        tracing::info!(form = %self.id, "submitting form");
        SubmitGate::Ready(self.values.clone())
    }

    /// Finish a submission with the callback's result
    ///
    /// A rejection keeps every value and becomes an error notice.
    pub fn finish_submit<E: fmt::Display>(&mut self, result: Result<(), E>) -> SubmitOutcome {
        self.submitting = false;
        let notice = Notice::for_result(&self.success_message, &result);
        let outcome = match result {
            Ok(()) => {
                tracing::info!(form = %self.id, "form submitted");
                SubmitOutcome::Submitted
            }
            Err(_) => {
                tracing::error!(form = %self.id, error = %notice.text, "submit rejected");
                SubmitOutcome::Rejected(notice.text.clone())
            }
        };
        self.notice = Some(notice);
        outcome
    }

    /// Validate, run `callback` with the values, and record the outcome
    pub async fn submit_with<F, Fut, E>(&mut self, callback: F) -> SubmitOutcome
    where
        F: FnOnce(FormValues) -> Fut,
        Fut: Future<Output = Result<(), E>>,
        E: fmt::Display,
    {
        let values = match self.begin_submit() {
            SubmitGate::Ready(values) => values,
            SubmitGate::Busy => return SubmitOutcome::Busy,
            SubmitGate::Invalid(errors) => return SubmitOutcome::Invalid(errors),
        };
        let result = callback(values).await;
        self.finish_submit(result)
    }

    // ========================================================================
    // Reset
    // ========================================================================

    /// Replace the whole value map and clear errors, touched state and notice
    pub fn reset(&mut self, new_initial: FormValues) {
        self.values = seed_values(&self.descriptors, &new_initial);
        self.initial = self.values.clone();
        self.errors.clear();
        self.form_errors.clear();
        self.touched.clear();
        self.notice = None;
        tracing::info!(form = %self.id, "form reset");
    }

    /// Reset from a record only when its identity differs from the current one
    ///
    /// Returns whether a reset happened.
    pub fn reinitialize(&mut self, identity: Option<String>, record: FormValues) -> bool {
        if identity == self.identity {
            return false;
        }
        self.identity = identity;
        self.reset(record);
        true
    }

    // ========================================================================
    // Attachments
    // ========================================================================

    /// Attachment list of a file field
    pub fn attachments(&self, name: &str) -> FormResult<AttachmentList> {
        self.require_kind(name, FieldKind::FileArray)?;
        Ok(AttachmentList::from_value(name, self.values.value(name)))
    }

    /// Append files to an attachment field
    pub fn add_attachments(&mut self, name: &str, files: Vec<PendingFile>) -> FormResult<()> {
        let mut list = self.attachments(name)?;
        if let Some(file) = files
            .iter()
            .find(|f| !self.config().accepts_attachment_size(f.size()))
        {
            return Err(FormError::AttachmentRejected {
                file_name: file.file_name.clone(),
                message: format!(
                    "file is larger than {} bytes",
                    self.config().max_attachment_bytes
                ),
            });
        }
        tracing::debug!(field = name, count = files.len(), "adding attachments");
        list.add(files);
        self.store_attachments(name, list);
        Ok(())
    }

    /// Remove the attachment at `index`
    pub fn remove_attachment(&mut self, name: &str, index: usize) -> FormResult<AttachmentRef> {
        let mut list = self.attachments(name)?;
        let removed = list.remove(index)?;
        tracing::debug!(field = name, index, "removed attachment");
        self.store_attachments(name, list);
        Ok(removed)
    }

    /// Persisted attachment ids removed since the form was last initialised
    pub fn removed_attachment_ids(&self, name: &str) -> FormResult<Vec<String>> {
        let current = self.attachments(name)?;
        let original = AttachmentList::from_value(name, self.initial.value(name));
        Ok(current.removed_since(&original))
    }

    fn store_attachments(&mut self, name: &str, list: AttachmentList) {
        self.values.set(name, list.into_value());
        self.touched.insert(name.to_string());
        self.revalidate(name);
    }

    fn require_kind(&self, name: &str, expected: FieldKind) -> FormResult<()> {
        let descriptor = self
            .descriptor(name)
            .ok_or_else(|| FormError::UnknownField(name.to_string()))?;
        if descriptor.kind != expected {
            return Err(FormError::WrongKind {
                field: name.to_string(),
                kind: descriptor.kind.to_string(),
                expected: expected.to_string(),
            });
        }
        Ok(())
    }

    // ========================================================================
    // Line-item rows
    // ========================================================================

    /// Row indices present under `prefix`, ascending
    pub fn row_indices(&self, prefix: &str) -> Vec<usize> {
        let indices: BTreeSet<usize> = self
            .descriptors
            .iter()
            .filter_map(|d| parse_row_path(prefix, &d.name).map(|(i, _)| i))
            .collect();
        indices.into_iter().collect()
    }

    /// Number of rows under `prefix`
    pub fn row_count(&self, prefix: &str) -> usize {
        self.row_indices(prefix).len()
    }

    /// Append a row built from column templates; returns its index
    ///
    /// Template names are column names (`debit`), bound to
    /// `prefix.index.column`.
    pub fn add_row(&mut self, prefix: &str, template: &[FieldDescriptor]) -> FormResult<usize> {
        let index = self.row_indices(prefix).last().map_or(0, |last| last + 1);
        let cells: Vec<FieldDescriptor> = template
            .iter()
            .map(|column| column.renamed(row_path(prefix, index, &column.name)))
            .collect();

        let mut combined = self.descriptors.clone();
        combined.extend(cells.iter().cloned());
        check_descriptors(&combined)?;

        for cell in &cells {
            self.values.set(cell.name.clone(), cell.initial_value());
        }
        self.descriptors = combined;
        tracing::debug!(prefix, index, "added row");
        Ok(index)
    }

    /// Remove row `index` under `prefix`; later rows move down by one
    pub fn remove_row(&mut self, prefix: &str, index: usize) -> FormResult<()> {
        let rows = self.row_indices(prefix);
        if !rows.contains(&index) {
            return Err(FormError::RowIndex {
                prefix: prefix.to_string(),
                index,
                len: rows.len(),
            });
        }

        let shift = |name: &str| -> Option<String> {
            match parse_row_path(prefix, name) {
                Some((i, _)) if i == index => None,
                Some((i, rest)) if i > index => Some(row_path(prefix, i - 1, rest)),
                _ => Some(name.to_string()),
            }
        };

        self.descriptors = std::mem::take(&mut self.descriptors)
            .into_iter()
            .filter_map(|mut d| {
                d.name = shift(&d.name)?;
                Some(d)
            })
            .collect();
        self.values = std::mem::take(&mut self.values)
            .into_inner()
            .into_iter()
            .filter_map(|(name, value)| shift(&name).map(|n| (n, value)))
            .collect();
        self.errors = std::mem::take(&mut self.errors)
            .into_iter()
            .filter_map(|(name, message)| shift(&name).map(|n| (n, message)))
            .collect();
        self.touched = std::mem::take(&mut self.touched)
            .into_iter()
            .filter_map(|name| shift(&name))
            .collect();

        if !self.form_errors.is_empty() {
            self.form_errors = self.validation.form_errors(&self.values);
        }
        tracing::debug!(prefix, index, "removed row");
        Ok(())
    }
}

/// Values for every descriptor: hydrated where present, defaults elsewhere
fn seed_values(descriptors: &[FieldDescriptor], initial: &FormValues) -> FormValues {
    for name in initial.keys() {
        if !descriptors.iter().any(|d| &d.name == name) {
            tracing::debug!(field = %name, "dropping value with no field");
        }
    }
    descriptors
        .iter()
        .map(|d| {
            let value = match initial.get(&d.name) {
                Some(value) => d.normalize(value.clone()),
                None => d.initial_value(),
            };
            (d.name.clone(), value)
        })
        .collect()
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use civic_core::SelectOption;
    use pretty_assertions::assert_eq;
    use std::cell::Cell;

    fn permit_fields() -> Vec<FieldDescriptor> {
        vec![
            FieldDescriptor::text("deceased_name").required(),
            FieldDescriptor::select(
                "service_type",
                vec![
                    SelectOption::new("inter", "Interment"),
                    SelectOption::new("disinter", "Disinterment"),
                    SelectOption::new("remove", "Removal"),
                ],
            )
            .required(),
            FieldDescriptor::text("disposition"),
            FieldDescriptor::number("fee"),
            FieldDescriptor::files("documents"),
        ]
    }

    fn permit_form() -> FormState {
        let schema = ValidationSchema::new().required_when_in(
            "disposition",
            "service_type",
            &["disinter", "remove"],
        );
        FormState::new(permit_fields(), schema, FormValues::new()).unwrap()
    }

    fn journal_form() -> FormState {
        let fields = vec![
            FieldDescriptor::text("particulars").required(),
            FieldDescriptor::number("entries.0.debit").with_label("Debit"),
            FieldDescriptor::number("entries.0.credit").with_label("Credit"),
            FieldDescriptor::number("entries.1.debit").with_label("Debit"),
            FieldDescriptor::number("entries.1.credit").with_label("Credit"),
        ];
        let schema = ValidationSchema::new()
            .required_if_empty("entries.*.credit", "entries.*.debit")
            .balanced("entries", "debit", "credit");
        let initial = FormValues::new()
            .with("particulars", "Payment of water bill")
            .with("entries.0.debit", 100.0)
            .with("entries.0.credit", 0.0)
            .with("entries.1.debit", 0.0)
            .with("entries.1.credit", 100.0);
        FormState::new(fields, schema, initial).unwrap()
    }

    fn file(name: &str) -> PendingFile {
        PendingFile::new(name, vec![0; 16])
    }

    #[test]
    fn test_seeded_defaults() {
        let form = permit_form();
        assert_eq!(form.value("service_type"), &FieldValue::Text(String::new()));
        assert_eq!(form.value("fee"), &FieldValue::Null);
        assert_eq!(form.value("documents"), &FieldValue::Attachments(vec![]));
        assert!(!form.is_dirty());
    }

    #[test]
    fn test_hydration_drops_unknown_and_normalizes() {
        let initial = FormValues::new()
            .with("service_type", "inter")
            .with("not_a_field", "x");
        let form = FormState::new(permit_fields(), ValidationSchema::new(), initial).unwrap();
        assert_eq!(form.value("service_type"), &FieldValue::from("inter"));
        assert!(!form.values().contains("not_a_field"));
    }

    #[test]
    fn test_duplicate_descriptors_rejected() {
        let fields = vec![FieldDescriptor::text("payee"), FieldDescriptor::text("payee")];
        assert!(FormState::new(fields, ValidationSchema::new(), FormValues::new()).is_err());
    }

    #[test]
    fn test_set_unknown_field() {
        let mut form = permit_form();
        let err = form.set_field("nope", "x").unwrap_err();
        assert!(matches!(err, FormError::UnknownField(name) if name == "nope"));
    }

    #[test]
    fn test_error_visible_only_after_touch() {
        let mut form = permit_form();
        form.set_field_and_validate_dependents("deceased_name", "").unwrap();
        assert_eq!(form.error("deceased_name"), Some("Deceased Name is required"));
        assert_eq!(form.visible_error("deceased_name"), None);

        form.blur("deceased_name").unwrap();
        assert_eq!(
            form.visible_error("deceased_name"),
            Some("Deceased Name is required")
        );

        form.set_field_and_validate_dependents("deceased_name", "Juan Dela Cruz")
            .unwrap();
        assert_eq!(form.visible_error("deceased_name"), None);
    }

    #[test]
    fn test_disposition_required_only_for_disinter_or_remove() {
        let mut form = permit_form();
        form.set_field("deceased_name", "Juan Dela Cruz").unwrap();

        form.set_field_and_validate_dependents("service_type", "inter").unwrap();
        assert_eq!(form.error("disposition"), None);

        form.set_field_and_validate_dependents("service_type", "disinter")
            .unwrap();
        assert_eq!(form.error("disposition"), Some("Disposition is required"));

        form.set_field_and_validate_dependents("service_type", "remove").unwrap();
        assert!(matches!(form.begin_submit(), SubmitGate::Invalid(_)));

        form.set_field_and_validate_dependents("disposition", "Transfer to ossuary")
            .unwrap();
        assert!(matches!(form.begin_submit(), SubmitGate::Ready(_)));
    }

    #[test]
    fn test_moving_from_date_revalidates_to_date() {
        let fields = vec![FieldDescriptor::date("from_date"), FieldDescriptor::date("to_date")];
        let schema = ValidationSchema::new().date_order("from_date", "to_date");
        let mut form = FormState::new(fields, schema, FormValues::new()).unwrap();

        form.set_field_and_validate_dependents("from_date", "2024-01-01").unwrap();
        form.set_field_and_validate_dependents("to_date", "2024-06-01").unwrap();
        assert_eq!(form.error("to_date"), None);

        form.set_field_and_validate_dependents("from_date", "2024-09-01").unwrap();
        assert_eq!(
            form.error("to_date"),
            Some("To Date cannot be earlier than From Date")
        );

        form.set_field_and_validate_dependents("from_date", "2024-01-01").unwrap();
        assert_eq!(form.error("to_date"), None);
    }

    #[test]
    fn test_invalid_submit_touches_everything() {
        let mut form = permit_form();
        match form.begin_submit() {
            SubmitGate::Invalid(errors) => {
                assert!(errors.get("deceased_name").is_some());
                assert!(errors.get("service_type").is_some());
            }
            other => panic!("expected Invalid, got {:?}", other),
        }
        assert!(!form.is_submitting());
        assert!(form.is_touched("fee"));
        assert_eq!(
            form.visible_error("service_type"),
            Some("Service Type is required")
        );
    }

    #[test]
    fn test_second_submit_while_pending_is_ignored() {
        let mut form = journal_form();
        let calls = Cell::new(0);

        if let SubmitGate::Ready(_) = form.begin_submit() {
            calls.set(calls.get() + 1);
        }
        if let SubmitGate::Ready(_) = form.begin_submit() {
            calls.set(calls.get() + 1);
        }
        assert_eq!(calls.get(), 1);
        assert!(form.is_submitting());

        form.finish_submit(Ok::<(), FormError>(()));
        assert!(!form.is_submitting());
        assert_eq!(form.submit_count(), 1);
    }

    #[test]
    fn test_submit_with_success() {
        let mut form = journal_form();
        let outcome = tokio_test::block_on(form.submit_with(|values| async move {
            assert_eq!(values.number("entries.0.debit"), Some(100.0));
            Ok::<(), FormError>(())
        }));
        assert!(outcome.is_submitted());
        assert_eq!(form.notice().map(|n| n.level), Some(NoticeLevel::Success));
    }

    #[test]
    fn test_submit_rejection_keeps_values() {
        let mut form = journal_form();
        let before = form.values().clone();
        let outcome = tokio_test::block_on(
            form.submit_with(|_| async { Err(FormError::submit("Server returned 500")) }),
        );
        assert_eq!(
            outcome,
            SubmitOutcome::Rejected("Submit failed: Server returned 500".to_string())
        );
        assert!(!form.is_submitting());
        assert_eq!(form.values(), &before);
        let notice = form.notice().unwrap();
        assert_eq!(notice.level, NoticeLevel::Error);
    }

    #[test]
    fn test_notice_for_result() {
        let saved = Notice::for_result("Permit saved", &Ok::<(), FormError>(()));
        assert_eq!(saved, Notice::success("Permit saved"));

        let failed = Notice::for_result("Permit saved", &Err(FormError::submit("offline")));
        assert_eq!(failed.level, NoticeLevel::Error);
        assert_eq!(failed.text, "Submit failed: offline");

        let form = journal_form().with_success_message("Voucher recorded");
        assert_eq!(form.success_message(), "Voucher recorded");
    }

    #[test]
    fn test_unbalanced_journal_blocks_submit() {
        let mut form = journal_form();
        form.set_field_and_validate_dependents("entries.1.credit", 50.0)
            .unwrap();
        match form.begin_submit() {
            SubmitGate::Invalid(errors) => {
                assert_eq!(errors.form, vec!["Total Debit must equal Total Credit".to_string()]);
            }
            other => panic!("expected Invalid, got {:?}", other),
        }
        assert_eq!(form.form_errors().len(), 1);

        form.set_field_and_validate_dependents("entries.1.credit", 100.0)
            .unwrap();
        assert!(form.form_errors().is_empty());
    }

    #[test]
    fn test_reset_replaces_everything() {
        let mut form = permit_form();
        form.set_field("disposition", "old").unwrap();
        form.blur("deceased_name").unwrap();

        form.reset(FormValues::new().with("deceased_name", "Maria Santos"));
        assert_eq!(form.value("deceased_name"), &FieldValue::from("Maria Santos"));
        assert_eq!(form.value("disposition"), &FieldValue::from(""));
        assert!(form.errors().is_empty());
        assert!(!form.is_touched("deceased_name"));
    }

    #[test]
    fn test_reinitialize_is_idempotent() {
        let record = FormValues::new()
            .with("deceased_name", "Maria Santos")
            .with("service_type", "inter");

        let mut once = permit_form();
        assert!(once.reinitialize(Some("permit-12".into()), record.clone()));

        let mut twice = permit_form();
        twice.reinitialize(Some("permit-12".into()), record.clone());
        twice.set_field("disposition", "edited").unwrap();
        assert!(!twice.reinitialize(Some("permit-12".into()), record.clone()));
        assert_eq!(twice.value("disposition"), &FieldValue::from("edited"));

        twice.set_field("disposition", "").unwrap();
        assert_eq!(once.values(), twice.values());
        assert_eq!(twice.identity(), Some("permit-12"));
    }

    #[test]
    fn test_attachments_add_and_remove() {
        let mut form = permit_form();
        form.add_attachments("documents", vec![file("a.pdf"), file("b.pdf")])
            .unwrap();
        form.add_attachments("documents", vec![file("c.pdf")]).unwrap();
        let removed = form.remove_attachment("documents", 1).unwrap();
        assert_eq!(removed.display_name(), "b.pdf");

        let list = form.attachments("documents").unwrap();
        let names: Vec<_> = list.items().iter().map(AttachmentRef::display_name).collect();
        assert_eq!(names, vec!["a.pdf", "c.pdf"]);

        assert!(matches!(
            form.remove_attachment("documents", 5),
            Err(FormError::AttachmentIndex { index: 5, len: 2, .. })
        ));
    }

    #[test]
    fn test_attachments_on_wrong_kind() {
        let mut form = permit_form();
        let err = form.add_attachments("fee", vec![file("a.pdf")]).unwrap_err();
        assert!(matches!(err, FormError::WrongKind { .. }));
    }

    #[test]
    fn test_oversized_attachment_rejected() {
        let config = EngineConfig {
            max_attachment_bytes: 8,
            ..EngineConfig::default()
        };
        let schema = ValidationSchema::new().with_config(config);
        let mut form = FormState::new(permit_fields(), schema, FormValues::new()).unwrap();
        let err = form
            .add_attachments("documents", vec![file("big.pdf")])
            .unwrap_err();
        assert!(matches!(err, FormError::AttachmentRejected { file_name, .. } if file_name == "big.pdf"));
        assert!(form.attachments("documents").unwrap().is_empty());
    }

    #[test]
    fn test_removed_persisted_attachment() {
        let initial = FormValues::new().with(
            "documents",
            vec![
                AttachmentRef::existing("31", "death-cert.pdf"),
                AttachmentRef::existing("32", "id.jpg"),
            ],
        );
        let mut form = FormState::new(permit_fields(), ValidationSchema::new(), initial).unwrap();
        form.remove_attachment("documents", 0).unwrap();
        assert_eq!(
            form.removed_attachment_ids("documents").unwrap(),
            vec!["31".to_string()]
        );
        assert_eq!(form.attachments("documents").unwrap().kept_ids(), vec!["32"]);
    }

    #[test]
    fn test_add_and_remove_rows() {
        let mut form = journal_form();
        let template = vec![
            FieldDescriptor::number("debit"),
            FieldDescriptor::number("credit"),
        ];
        assert_eq!(form.add_row("entries", &template).unwrap(), 2);
        assert_eq!(form.row_count("entries"), 3);
        assert_eq!(form.value("entries.2.debit"), &FieldValue::Null);
        assert_eq!(
            form.descriptor("entries.2.debit").map(FieldDescriptor::display_label),
            Some("Debit".to_string())
        );

        form.set_field("entries.2.debit", 25.0).unwrap();
        form.blur("entries.2.debit").unwrap();
        form.remove_row("entries", 1).unwrap();

        assert_eq!(form.row_count("entries"), 2);
        assert_eq!(form.value("entries.1.debit"), &FieldValue::Number(25.0));
        assert!(form.is_touched("entries.1.debit"));
        assert!(form.descriptor("entries.2.debit").is_none());
        assert!(!form.values().contains("entries.2.credit"));

        assert!(matches!(
            form.remove_row("entries", 7),
            Err(FormError::RowIndex { index: 7, len: 2, .. })
        ));
    }
}
