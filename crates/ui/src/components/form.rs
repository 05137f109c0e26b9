//! # Dynamic Form
//!
//! Binds a `FormState` held in a `Signal` to rendered fields and runs the
//! submit flow: validate, call the page's handler, record the outcome.
//!
//! ```text
//! DynamicForm
//! ├── BoundField (one per descriptor, or the `fields` subset)
//! ├── children (page-specific sections, e.g. line items)
//! ├── form-level errors
//! └── submit button
//! ```

use super::field::FormFieldView;
use crate::state::{APP_STATE, StatusLevel};
use civic_core::{FieldValue, FormResult, PendingFile};
use civic_forms::{FormState, FormValues, Notice, NoticeLevel, SubmitGate, SubmitOutcome};
use dioxus::core::spawn_forever;
use dioxus::prelude::*;
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;

// ============================================================================
// Submit Handler
// ============================================================================

/// Future returned by a submit handler
pub type SubmitFuture = Pin<Box<dyn Future<Output = FormResult<()>>>>;

/// Page-supplied submit callback
///
/// Compares by pointer so it can live in props.
#[derive(Clone)]
pub struct SubmitHandler(Rc<dyn Fn(FormValues) -> SubmitFuture>);

impl SubmitHandler {
    pub fn new<F, Fut>(handler: F) -> Self
    where
        F: Fn(FormValues) -> Fut + 'static,
        Fut: Future<Output = FormResult<()>> + 'static,
    {
        Self(Rc::new(move |values| Box::pin(handler(values))))
    }

    pub fn call(&self, values: FormValues) -> SubmitFuture {
        (self.0)(values)
    }
}

impl PartialEq for SubmitHandler {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

/// Run a submit handler and build the notice for its result
///
/// Needs no form, so the result still reaches the user after the page is gone.
pub async fn run_submit(
    handler: SubmitHandler,
    values: FormValues,
    success_message: String,
) -> (FormResult<()>, Notice) {
    let result = handler.call(values).await;
    let notice = Notice::for_result(&success_message, &result);
    (result, notice)
}

// ============================================================================
// Bound Field
// ============================================================================

/// A field wired to a form signal by name
#[component]
pub fn BoundField(
    mut form: Signal<FormState>,
    name: String,
    #[props(default)] searchable: bool,
) -> Element {
    let state = form.read();
    let Some(descriptor) = state.descriptor(&name).cloned() else {
        tracing::warn!(field = %name, "no descriptor for bound field");
        return rsx! {};
    };
    let value = state.value(&name).clone();
    let error = state.error(&name).map(str::to_string);
    let touched = state.is_touched(&name);
    let submitting = state.is_submitting();
    let config = state.config().clone();
    drop(state);

    let change_name = name.clone();
    let blur_name = name.clone();
    let add_name = name.clone();
    let remove_name = name;

    rsx! {
        FormFieldView {
            descriptor,
            value,
            error,
            touched,
            disabled: submitting,
            searchable,
            select_placeholder: config.select_placeholder,
            no_results_text: config.no_results_text,
            default_rows: config.default_textarea_rows,
            on_change: move |value: FieldValue| {
                if let Err(e) = form.write().set_field_and_validate_dependents(&change_name, value) {
                    tracing::warn!(error = %e, "field change rejected");
                }
            },
            on_blur: move |_| {
                if let Err(e) = form.write().blur(&blur_name) {
                    tracing::warn!(error = %e, "field blur rejected");
                }
            },
            on_add_files: move |files: Vec<PendingFile>| {
                if let Err(e) = form.write().add_attachments(&add_name, files) {
                    APP_STATE.write().ui.set_status(e.to_string(), StatusLevel::Warning);
                }
            },
            on_remove_file: move |index: usize| {
                if let Err(e) = form.write().remove_attachment(&remove_name, index) {
                    tracing::warn!(error = %e, "attachment removal rejected");
                }
            },
        }
    }
}

// ============================================================================
// Dynamic Form
// ============================================================================

#[derive(Props, Clone, PartialEq)]
pub struct DynamicFormProps {
    /// Form state owned by the page
    pub form: Signal<FormState>,

    /// Called with the values once validation passes
    pub on_submit: SubmitHandler,

    /// Only render these fields; `None` renders every descriptor
    #[props(default)]
    pub fields: Option<Vec<String>>,

    /// Fields drawn as searchable selects
    #[props(default)]
    pub searchable_fields: Vec<String>,

    #[props(default = "Submit".to_string())]
    pub submit_label: String,

    /// Grid columns for the field layout
    #[props(default = 2)]
    pub columns: usize,

    /// Receives each submit attempt's outcome
    #[props(default)]
    pub on_outcome: EventHandler<SubmitOutcome>,

    /// Extra sections rendered after the fields
    #[props(default)]
    pub children: Element,
}

/// Form rendered from descriptors
#[component]
pub fn DynamicForm(props: DynamicFormProps) -> Element {
    let mut form = props.form;

    let (names, submitting, form_errors, notice, dirty) = {
        let state = form.read();
        let names: Vec<String> = match &props.fields {
            Some(fields) => fields.clone(),
            None => state.descriptors().iter().map(|d| d.name.clone()).collect(),
        };
        (
            names,
            state.is_submitting(),
            state.form_errors().to_vec(),
            state.notice().cloned(),
            state.is_dirty(),
        )
    };

    let handle_submit = {
        let handler = props.on_submit.clone();
        let on_outcome = props.on_outcome;
        move |e: FormEvent| {
            e.prevent_default();
            let gate = form.write().begin_submit();
            match gate {
                SubmitGate::Ready(values) => {
                    let handler = handler.clone();
                    let success_message = form.read().success_message().to_string();
                    // Outlives the page so leaving it does not abort the submit
                    spawn_forever(async move {
                        let (result, notice) = run_submit(handler, values, success_message).await;
                        APP_STATE.write().show_notice(&notice);
                        let Ok(mut state) = form.try_write() else {
                            tracing::info!("form closed before its submit finished");
                            return;
                        };
                        let outcome = state.finish_submit(result);
                        drop(state);
                        on_outcome.call(outcome);
                    });
                }
                SubmitGate::Busy => on_outcome.call(SubmitOutcome::Busy),
                SubmitGate::Invalid(errors) => {
                    APP_STATE.write().ui.set_status(
                        invalid_summary(errors.len()),
                        StatusLevel::Warning,
                    );
                    on_outcome.call(SubmitOutcome::Invalid(errors));
                }
            }
        }
    };

    let grid = match props.columns {
        0 | 1 => "grid grid-cols-1 gap-4",
        2 => "grid grid-cols-1 md:grid-cols-2 gap-4",
        _ => "grid grid-cols-1 md:grid-cols-3 gap-4",
    };

    rsx! {
        form {
            class: "dynamic-form space-y-6",
            novalidate: true,
            onsubmit: handle_submit,

            fieldset {
                class: "space-y-6",
                disabled: submitting,

                div {
                    class: "{grid}",
                    for name in names.iter() {
                        BoundField {
                            key: "{name}",
                            form,
                            name: name.clone(),
                            searchable: props.searchable_fields.contains(name),
                        }
                    }
                }

                {props.children}
            }

            if !form_errors.is_empty() {
                div {
                    class: "rounded-lg border border-rose-500/40 bg-rose-500/10 px-4 py-3",
                    role: "alert",
                    for message in form_errors.iter() {
                        p { class: "text-sm text-rose-300", "{message}" }
                    }
                }
            }

            if let Some(notice) = &notice {
                div {
                    class: "rounded-lg px-4 py-3 text-sm {notice_class(notice.level)}",
                    "{notice.text}"
                }
            }

            div {
                class: "flex items-center justify-end gap-3",
                if dirty && !submitting {
                    span { class: "text-xs text-slate-500", "Unsaved changes" }
                }
                button {
                    r#type: "submit",
                    class: "px-4 py-2 rounded-lg bg-indigo-600 text-sm font-medium text-white hover:bg-indigo-500 transition-colors disabled:opacity-50 disabled:cursor-not-allowed",
                    disabled: submitting,
                    if submitting { "Saving…" } else { "{props.submit_label}" }
                }
            }
        }
    }
}

/// Status text after a blocked submit
fn invalid_summary(count: usize) -> String {
    match count {
        1 => "Please fix 1 error before submitting".to_string(),
        n => format!("Please fix {} errors before submitting", n),
    }
}

fn notice_class(level: NoticeLevel) -> &'static str {
    match level {
        NoticeLevel::Info => "bg-slate-700/60 text-slate-200",
        NoticeLevel::Success => "bg-green-500/10 text-green-300 border border-green-500/30",
        NoticeLevel::Warning => "bg-amber-500/10 text-amber-300 border border-amber-500/30",
        NoticeLevel::Error => "bg-rose-500/10 text-rose-300 border border-rose-500/30",
    }
}
