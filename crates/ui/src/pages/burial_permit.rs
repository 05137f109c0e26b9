//! Burial Permit Page
//!
//! Permit application with supporting documents. The disposition field only
//! appears, and is only required, for disinterment and removal services.
//! Saved permits can be reopened from the records page; the form reloads
//! whenever the opened record changes.

use civic_core::{AttachmentRef, FieldKind, FieldValue, FormError, FormResult, SelectOption};
use civic_forms::{
    EngineConfig, FieldDescriptor, FormState, FormValues, MultipartPayload, ValidationSchema,
};
use dioxus::prelude::*;
use uuid::Uuid;

use crate::components::{DynamicForm, SubmitHandler};
use crate::state::{APP_STATE, Page, SavedRecord};

/// Service types that need a disposition
pub const DISPOSITION_SERVICES: &[&str] = &["disinter", "remove"];

/// Attachment field
pub const DOCUMENTS: &str = "documents";

// ============================================================================
// Form Definition
// ============================================================================

pub fn permit_fields() -> Vec<FieldDescriptor> {
    vec![
        FieldDescriptor::text("deceased_name")
            .with_label("Name of Deceased")
            .with_max_length(120)
            .required(),
        FieldDescriptor::date("date_of_death").required(),
        FieldDescriptor::date("burial_date")
            .with_label("Date of Burial")
            .required(),
        FieldDescriptor::select(
            "cemetery",
            vec![
                SelectOption::new("municipal", "Municipal Cemetery"),
                SelectOption::new("catholic", "Catholic Cemetery"),
                SelectOption::new("memorial", "Memorial Park"),
                SelectOption::disabled("old_public", "Old Public Cemetery (closed)"),
            ],
        )
        .required(),
        FieldDescriptor::new("service_type", FieldKind::Radio)
            .with_options(vec![
                SelectOption::new("inter", "Interment"),
                SelectOption::new("disinter", "Disinterment"),
                SelectOption::new("remove", "Removal"),
            ])
            .required(),
        FieldDescriptor::select(
            "disposition",
            vec![
                SelectOption::new("transfer", "Transfer to another cemetery"),
                SelectOption::new("cremation", "Cremation"),
                SelectOption::new("ossuary", "Ossuary"),
            ],
        )
        .with_help_text("Where the remains will go"),
        FieldDescriptor::text("applicant_name").required(),
        FieldDescriptor::new("applicant_email", FieldKind::Email)
            .with_placeholder("name@example.com"),
        FieldDescriptor::number("fee")
            .with_label("Permit Fee")
            .with_min(0.0)
            .required(),
        FieldDescriptor::new("notify_applicant", FieldKind::Checkbox)
            .with_label("Email the applicant when approved"),
        FieldDescriptor::new("remarks", FieldKind::TextArea)
            .with_rows(4)
            .with_max_length(500),
        FieldDescriptor::files(DOCUMENTS)
            .with_label("Supporting Documents")
            .with_help_text("Death certificate and applicant ID")
            .required(),
    ]
}

pub fn permit_validation(config: &EngineConfig) -> ValidationSchema {
    ValidationSchema::new()
        .with_config(config.clone())
        .date_order("date_of_death", "burial_date")
        .required_when_in("disposition", "service_type", DISPOSITION_SERVICES)
        .required_when(
            "applicant_email",
            &["notify_applicant"],
            |values: &FormValues| values.value("notify_applicant").as_bool() == Some(true),
        )
}

pub fn permit_form(config: &EngineConfig) -> FormResult<FormState> {
    Ok(FormState::new(
        permit_fields(),
        permit_validation(config),
        FormValues::new().with("fee", 350.0),
    )?
    .with_success_message("Burial permit saved"))
}

/// Whether the disposition field is shown for the current values
pub fn shows_disposition(values: &FormValues) -> bool {
    values
        .text("service_type")
        .is_some_and(|service| DISPOSITION_SERVICES.contains(&service))
}

/// Fields rendered for the current values
fn visible_fields(form: &FormState) -> Vec<String> {
    let show_disposition = shows_disposition(form.values());
    form.descriptors()
        .iter()
        .filter(|d| show_disposition || d.name != "disposition")
        .map(|d| d.name.clone())
        .collect()
}

/// Replace pending files with persisted references, as the records
/// service would after upload
pub fn persist_attachments(mut values: FormValues, field: &str) -> FormValues {
    let stored: Vec<AttachmentRef> = values
        .value(field)
        .as_attachments()
        .unwrap_or_default()
        .iter()
        .map(|item| match item {
            AttachmentRef::New(file) => {
                AttachmentRef::existing(Uuid::new_v4().to_string(), file.file_name.clone())
            }
            existing => existing.clone(),
        })
        .collect();
    values.set(field, FieldValue::Attachments(stored));
    values
}

/// Stand-in for the permits service
async fn save_permit(values: FormValues, record_id: Option<String>, removed: Vec<String>) -> FormResult<()> {
    let payload = MultipartPayload::from_values(&values)?;
    tracing::info!(
        files = payload.files.len(),
        bytes = payload.file_bytes(),
        removed = removed.len(),
        "uploading burial permit"
    );
    tokio::time::sleep(std::time::Duration::from_millis(800)).await;

    if values.text("cemetery") == Some("catholic") && values.text("service_type") == Some("remove") {
        return Err(FormError::submit(
            "Removal from the Catholic Cemetery needs a parish clearance",
        ));
    }

    let name = values.text("deceased_name").unwrap_or_default().to_string();
    let mut record = SavedRecord::new(
        Page::BurialPermit,
        format!("Burial permit for {}", name),
        persist_attachments(values, DOCUMENTS),
    );
    if let Some(id) = record_id {
        record = record.with_id(id);
    }
    APP_STATE.write().save_record(record);
    Ok(())
}

// ============================================================================
// Burial Permit Page Component
// ============================================================================

#[component]
pub fn BurialPermitPage() -> Element {
    let config = APP_STATE.read().config.clone();
    let built = use_hook(move || permit_form(&config).map(Signal::new).map_err(|e| e.to_string()));

    match built {
        Ok(form) => rsx! { BurialPermitForm { form } },
        Err(message) => rsx! {
            div {
                class: "p-6 text-rose-400",
                "Could not load the burial permit form: {message}"
            }
        },
    }
}

#[component]
fn BurialPermitForm(mut form: Signal<FormState>) -> Element {
    // Reload whenever a different saved permit is opened
    use_effect(move || {
        let editing = APP_STATE
            .read()
            .editing_on(Page::BurialPermit)
            .map(|record| (record.id.clone(), record.values.clone()));
        if let Some((id, values)) = editing {
            if form.write().reinitialize(Some(id), values) {
                tracing::info!("opened saved burial permit");
            }
        }
    });

    let fields = visible_fields(&form.read());
    let editing_id = form.read().identity().map(str::to_string);

    let on_submit = use_hook(|| {
        SubmitHandler::new(move |values: FormValues| {
            let record_id = form.read().identity().map(str::to_string);
            let removed = form.read().removed_attachment_ids(DOCUMENTS).unwrap_or_default();
            save_permit(values, record_id, removed)
        })
    });

    rsx! {
        div {
            class: "page burial-permit-page p-6 max-w-4xl mx-auto space-y-6",

            header {
                class: "flex items-start justify-between",
                div {
                    h1 { class: "text-2xl font-semibold text-white", "Burial Permit" }
                    if editing_id.is_some() {
                        p { class: "text-sm text-slate-400", "Editing a saved permit" }
                    } else {
                        p { class: "text-sm text-slate-400", "New application" }
                    }
                }
                if editing_id.is_some() {
                    button {
                        r#type: "button",
                        class: "px-3 py-1.5 rounded-lg border border-slate-600 text-sm text-slate-300 hover:bg-slate-800",
                        disabled: form.read().is_submitting(),
                        onclick: move |_| {
                            APP_STATE.write().stop_editing(Page::BurialPermit);
                            form.write().reinitialize(None, FormValues::new().with("fee", 350.0));
                        },
                        "New application"
                    }
                }
            }

            DynamicForm {
                form,
                on_submit,
                fields: Some(fields),
                submit_label: "Save Permit",
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use civic_core::PendingFile;
    use civic_forms::SubmitGate;

    fn complete_values() -> FormValues {
        FormValues::new()
            .with("deceased_name", "Maria Santos")
            .with("date_of_death", "2024-03-02")
            .with("burial_date", "2024-03-06")
            .with("cemetery", "municipal")
            .with("service_type", "inter")
            .with("applicant_name", "Jose Santos")
            .with("fee", 350.0)
            .with(DOCUMENTS, vec![AttachmentRef::existing("31", "death-cert.pdf")])
    }

    fn form_with(values: FormValues) -> FormState {
        FormState::new(permit_fields(), permit_validation(&EngineConfig::default()), values).unwrap()
    }

    #[test]
    fn test_interment_needs_no_disposition() {
        let mut form = form_with(complete_values());
        assert!(matches!(form.begin_submit(), SubmitGate::Ready(_)));
        assert!(!shows_disposition(form.values()));
        assert!(!visible_fields(&form).contains(&"disposition".to_string()));
    }

    #[test]
    fn test_disinterment_requires_disposition() {
        let mut form = form_with(complete_values());
        form.set_field_and_validate_dependents("service_type", "disinter").unwrap();
        assert!(shows_disposition(form.values()));
        assert!(matches!(form.begin_submit(), SubmitGate::Invalid(_)));
        assert_eq!(form.error("disposition"), Some("Disposition is required"));

        form.set_field("disposition", "cremation").unwrap();
        assert!(matches!(form.begin_submit(), SubmitGate::Ready(_)));
    }

    #[test]
    fn test_burial_before_death_rejected() {
        let mut form = form_with(complete_values().with("burial_date", "2024-03-01"));
        assert!(matches!(form.begin_submit(), SubmitGate::Invalid(_)));
        assert!(form.error("burial_date").is_some());
        assert!(form.error("date_of_death").is_none());
    }

    #[test]
    fn test_email_required_when_notifying() {
        let mut form = form_with(complete_values());
        form.set_field_and_validate_dependents("notify_applicant", true).unwrap();
        assert!(matches!(form.begin_submit(), SubmitGate::Invalid(_)));
        assert!(form.error("applicant_email").is_some());
    }

    #[test]
    fn test_persist_attachments() {
        let values = FormValues::new().with(
            DOCUMENTS,
            vec![
                AttachmentRef::existing("31", "death-cert.pdf"),
                AttachmentRef::pending(PendingFile::new("id.jpg", vec![1, 2])),
            ],
        );
        let stored = persist_attachments(values, DOCUMENTS);
        let items = stored.value(DOCUMENTS).as_attachments().unwrap();
        assert_eq!(items.len(), 2);
        assert!(items.iter().all(AttachmentRef::is_existing));
        assert_eq!(items[1].display_name(), "id.jpg");
    }

    #[test]
    fn test_rejected_removal_keeps_values() {
        let values = complete_values()
            .with("cemetery", "catholic")
            .with("service_type", "remove")
            .with("disposition", "ossuary");
        let mut form = form_with(values.clone());
        let outcome = tokio_test::block_on(
            form.submit_with(|v| save_permit(v, None, Vec::new())),
        );
        assert!(!outcome.is_submitted());
        assert_eq!(form.values().text("deceased_name"), Some("Maria Santos"));
        assert!(form.notice().is_some());
    }
}
