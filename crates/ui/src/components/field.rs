//! # Field Renderer
//!
//! Draws one `FieldDescriptor` as exactly one control. The renderer holds
//! no form state: it reads `value`, `error` and `touched`, and reports
//! through `on_change` and `on_blur`.

use super::attachment_list::AttachmentListView;
use super::inputs::{Checkbox, FieldFeedback, MultiSelect, RadioGroup, Select, TextArea, TextInput};
use super::option_selector::SearchableSelect;
use civic_core::{FieldValue, PendingFile};
use civic_forms::render::coerce_input;
use civic_forms::{Feedback, FieldDescriptor, WidgetKind};
use dioxus::prelude::*;

#[derive(Props, Clone, PartialEq)]
pub struct FormFieldViewProps {
    /// The field to render
    pub descriptor: FieldDescriptor,

    /// Current value
    pub value: FieldValue,

    /// Validation message, shown once the field is touched
    #[props(default)]
    pub error: Option<String>,

    #[props(default = false)]
    pub touched: bool,

    /// Form-level disable, e.g. while submitting
    #[props(default = false)]
    pub disabled: bool,

    /// Render single selects with a search box
    #[props(default = false)]
    pub searchable: bool,

    #[props(default = "Select…".to_string())]
    pub select_placeholder: String,

    #[props(default = "No results found".to_string())]
    pub no_results_text: String,

    /// Rows for textareas without their own
    #[props(default = 3)]
    pub default_rows: usize,

    pub on_change: EventHandler<FieldValue>,

    #[props(default)]
    pub on_blur: EventHandler<()>,

    #[props(default)]
    pub on_add_files: EventHandler<Vec<PendingFile>>,

    #[props(default)]
    pub on_remove_file: EventHandler<usize>,
}

/// One form field
#[component]
pub fn FormFieldView(props: FormFieldViewProps) -> Element {
    let descriptor = &props.descriptor;
    let kind = descriptor.kind;
    let label = descriptor.display_label();
    let id = field_dom_id(&descriptor.name);

    let feedback = Feedback::resolve(
        props.error.as_deref(),
        props.touched,
        descriptor.help_text.as_deref(),
    );
    let (error, help_text) = match feedback {
        Feedback::Error(message) => (Some(message), None),
        Feedback::Helper(help) => (None, Some(help)),
        Feedback::None => (None, None),
    };

    let disabled = props.disabled || descriptor.disabled;
    let locked = disabled || descriptor.read_only;
    let on_change = props.on_change;
    let on_blur = props.on_blur;

    let control = match WidgetKind::for_kind(kind) {
        WidgetKind::Input(input_type) => rsx! {
            TextInput {
                id: id.clone(),
                value: props.value.to_input_string(),
                label: label.clone(),
                placeholder: descriptor.placeholder.clone(),
                help_text: help_text.clone(),
                error: error.clone(),
                required: descriptor.required,
                disabled,
                readonly: descriptor.read_only,
                input_type,
                min: descriptor.min,
                max: descriptor.max,
                max_length: descriptor.max_length,
                on_change: move |raw: String| on_change.call(coerce_input(kind, &raw)),
                on_blur: move |_| on_blur.call(()),
            }
        },
        WidgetKind::TextArea => rsx! {
            TextArea {
                id: id.clone(),
                value: props.value.to_input_string(),
                label: label.clone(),
                placeholder: descriptor.placeholder.clone(),
                help_text: help_text.clone(),
                error: error.clone(),
                required: descriptor.required,
                disabled,
                readonly: descriptor.read_only,
                rows: descriptor.rows.unwrap_or(props.default_rows),
                max_length: descriptor.max_length,
                on_change: move |raw: String| on_change.call(coerce_input(kind, &raw)),
                on_blur: move |_| on_blur.call(()),
            }
        },
        WidgetKind::Select if props.searchable => rsx! {
            SearchableSelect {
                value: props.value.to_input_string(),
                options: Some(descriptor.options.clone()),
                label: label.clone(),
                placeholder: descriptor.placeholder.clone().unwrap_or_else(|| props.select_placeholder.clone()),
                no_results_text: props.no_results_text.clone(),
                help_text: help_text.clone(),
                error: error.clone(),
                required: descriptor.required,
                disabled: locked,
                on_select: move |raw: String| on_change.call(coerce_input(kind, &raw)),
                on_blur: move |_| on_blur.call(()),
            }
        },
        WidgetKind::Select => rsx! {
            Select {
                id: id.clone(),
                value: props.value.to_input_string(),
                options: descriptor.options.clone(),
                label: label.clone(),
                placeholder: props.select_placeholder.clone(),
                help_text: help_text.clone(),
                error: error.clone(),
                required: descriptor.required,
                disabled: locked,
                on_change: move |raw: String| on_change.call(coerce_input(kind, &raw)),
                on_blur: move |_| on_blur.call(()),
            }
        },
        WidgetKind::MultiSelect => rsx! {
            MultiSelect {
                value: props.value.clone(),
                options: descriptor.options.clone(),
                label: label.clone(),
                help_text: help_text.clone(),
                error: error.clone(),
                required: descriptor.required,
                disabled: locked,
                on_change: move |selection: FieldValue| on_change.call(selection),
                on_blur: move |_| on_blur.call(()),
            }
        },
        WidgetKind::Checkbox => rsx! {
            div {
                class: "input-group",
                Checkbox {
                    checked: props.value.as_bool().unwrap_or(false),
                    label: label.clone(),
                    disabled: locked,
                    on_change: move |checked: bool| {
                        on_change.call(FieldValue::Bool(checked));
                        on_blur.call(());
                    },
                }
                FieldFeedback { error: error.clone(), help_text: help_text.clone() }
            }
        },
        WidgetKind::RadioGroup => rsx! {
            RadioGroup {
                name: descriptor.name.clone(),
                value: props.value.to_input_string(),
                options: descriptor.options.clone(),
                label: label.clone(),
                help_text: help_text.clone(),
                error: error.clone(),
                required: descriptor.required,
                disabled: locked,
                on_change: move |raw: String| on_change.call(coerce_input(kind, &raw)),
                on_blur: move |_| on_blur.call(()),
            }
        },
        WidgetKind::FileList => rsx! {
            AttachmentListView {
                items: props.value.as_attachments().map(<[_]>::to_vec).unwrap_or_default(),
                label: label.clone(),
                help_text: help_text.clone(),
                error: error.clone(),
                required: descriptor.required,
                disabled: locked,
                on_add: props.on_add_files,
                on_remove: props.on_remove_file,
                on_blur: move |_| on_blur.call(()),
            }
        },
    };

    rsx! {
        div {
            class: "form-field",
            "data-field": "{descriptor.name}",
            {control}
        }
    }
}

/// DOM id for a field name; dots in row paths become dashes
pub fn field_dom_id(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '-' })
        .collect();
    format!("field-{}", cleaned)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_dom_id() {
        assert_eq!(field_dom_id("payee"), "field-payee");
        assert_eq!(field_dom_id("entries.0.debit"), "field-entries-0-debit");
    }
}
