//! # Input Components
//!
//! Styled controls the field renderer draws from:
//! - **TextInput**: single-line input, with a show/hide toggle for passwords
//! - **TextArea**: multi-line input
//! - **Select**: native dropdown led by an empty placeholder choice
//! - **MultiSelect**: checkbox list emitting the full selection
//! - **Checkbox**: boolean checkbox
//! - **RadioGroup**: one radio button per option
//!
//! Controls know nothing about validation; they receive an already
//! resolved error or help text.

use civic_core::{FieldValue, SelectOption};
use civic_forms::render::{InputType, is_selected, select_choices, toggle_multiselect};
use dioxus::prelude::*;

// ============================================================================
// Shared Pieces
// ============================================================================

/// Label with the required marker
#[component]
pub fn FieldLabel(text: String, #[props(default)] required: bool, #[props(default)] for_id: Option<String>) -> Element {
    rsx! {
        label {
            class: "block text-sm font-medium text-slate-300 mb-1.5",
            r#for: for_id,
            "{text}"
            if required {
                span { class: "text-rose-400 ml-0.5", "*" }
            }
        }
    }
}

/// Error or help text under a control
#[component]
pub fn FieldFeedback(#[props(default)] error: Option<String>, #[props(default)] help_text: Option<String>) -> Element {
    rsx! {
        if let Some(error) = &error {
            p {
                class: "mt-1 text-xs text-rose-400",
                role: "alert",
                "{error}"
            }
        } else if let Some(help) = &help_text {
            p {
                class: "mt-1 text-xs text-slate-500",
                "{help}"
            }
        }
    }
}

// ============================================================================
// Text Input Component
// ============================================================================

/// Properties for TextInput component
#[derive(Props, Clone, PartialEq)]
pub struct TextInputProps {
    /// Input value
    pub value: String,

    /// Element id, also used by the label
    #[props(default)]
    pub id: Option<String>,

    /// Label text (optional)
    #[props(default)]
    pub label: Option<String>,

    /// Placeholder text
    #[props(default)]
    pub placeholder: Option<String>,

    /// Help text shown below input
    #[props(default)]
    pub help_text: Option<String>,

    /// Error message (shows error state)
    #[props(default)]
    pub error: Option<String>,

    /// Whether the input is required
    #[props(default = false)]
    pub required: bool,

    /// Whether the input is disabled
    #[props(default = false)]
    pub disabled: bool,

    /// Whether the input is readonly
    #[props(default = false)]
    pub readonly: bool,

    /// Input type
    #[props(default = InputType::Text)]
    pub input_type: InputType,

    /// Bounds forwarded to numeric inputs
    #[props(default)]
    pub min: Option<f64>,
    #[props(default)]
    pub max: Option<f64>,

    /// Maximum length
    #[props(default)]
    pub max_length: Option<usize>,

    /// Additional CSS classes
    #[props(default)]
    pub class: Option<String>,

    /// Change handler
    #[props(default)]
    pub on_change: EventHandler<String>,

    /// Blur handler
    #[props(default)]
    pub on_blur: EventHandler<()>,
}

/// Single-line text input component
#[component]
pub fn TextInput(props: TextInputProps) -> Element {
    let mut show_password = use_signal(|| false);

    let has_error = props.error.is_some();
    let input_class = build_input_class(has_error, props.disabled, &props.class);
    let is_password = props.input_type == InputType::Password;
    let input_type = props.input_type.revealed(show_password());
    let step = (props.input_type == InputType::Number).then_some("any");

    rsx! {
        div {
            class: "input-group",

            if let Some(label) = &props.label {
                FieldLabel { text: label.clone(), required: props.required, for_id: props.id.clone() }
            }

            div {
                class: "relative flex items-center",

                input {
                    id: props.id.clone(),
                    class: "{input_class}",
                    class: if is_password { "pr-16" } else { "" },
                    r#type: "{input_type.as_str()}",
                    value: "{props.value}",
                    placeholder: props.placeholder.as_deref().unwrap_or(""),
                    disabled: props.disabled,
                    readonly: props.readonly,
                    min: props.min.map(|m| m.to_string()),
                    max: props.max.map(|m| m.to_string()),
                    step,
                    maxlength: props.max_length.map(|l| l.to_string()),
                    aria_invalid: has_error,
                    oninput: move |e| props.on_change.call(e.value()),
                    onblur: move |_| props.on_blur.call(()),
                }

                if is_password {
                    button {
                        class: "absolute right-2 px-2 text-xs text-slate-400 hover:text-slate-200",
                        r#type: "button",
                        tabindex: "-1",
                        disabled: props.disabled,
                        onclick: move |_| show_password.toggle(),
                        if show_password() { "Hide" } else { "Show" }
                    }
                }
            }

            FieldFeedback { error: props.error.clone(), help_text: props.help_text.clone() }
        }
    }
}

// ============================================================================
// Text Area Component
// ============================================================================

/// Properties for TextArea component
#[derive(Props, Clone, PartialEq)]
pub struct TextAreaProps {
    /// Input value
    pub value: String,

    #[props(default)]
    pub id: Option<String>,

    /// Label text
    #[props(default)]
    pub label: Option<String>,

    /// Placeholder text
    #[props(default)]
    pub placeholder: Option<String>,

    /// Help text shown below textarea
    #[props(default)]
    pub help_text: Option<String>,

    /// Error message
    #[props(default)]
    pub error: Option<String>,

    #[props(default = false)]
    pub required: bool,

    #[props(default = false)]
    pub disabled: bool,

    #[props(default = false)]
    pub readonly: bool,

    /// Visible rows
    #[props(default = 3)]
    pub rows: usize,

    /// Maximum length, shows a counter when set
    #[props(default)]
    pub max_length: Option<usize>,

    #[props(default)]
    pub class: Option<String>,

    #[props(default)]
    pub on_change: EventHandler<String>,

    #[props(default)]
    pub on_blur: EventHandler<()>,
}

/// Multi-line text input component
#[component]
pub fn TextArea(props: TextAreaProps) -> Element {
    let has_error = props.error.is_some();
    let textarea_class = build_textarea_class(has_error, props.disabled, &props.class);
    let char_count = props.value.chars().count();

    rsx! {
        div {
            class: "input-group",

            if let Some(label) = &props.label {
                FieldLabel { text: label.clone(), required: props.required, for_id: props.id.clone() }
            }

            textarea {
                id: props.id.clone(),
                class: "{textarea_class}",
                value: "{props.value}",
                placeholder: props.placeholder.as_deref().unwrap_or(""),
                disabled: props.disabled,
                readonly: props.readonly,
                rows: "{props.rows}",
                maxlength: props.max_length.map(|l| l.to_string()),
                aria_invalid: has_error,
                oninput: move |e| props.on_change.call(e.value()),
                onblur: move |_| props.on_blur.call(()),
            }

            div {
                class: "flex justify-between items-start",
                FieldFeedback { error: props.error.clone(), help_text: props.help_text.clone() }
                if let Some(max) = props.max_length {
                    span {
                        class: "mt-1 text-xs text-slate-500",
                        "{char_count}/{max}"
                    }
                }
            }
        }
    }
}

// ============================================================================
// Select Component
// ============================================================================

/// Properties for Select component
#[derive(Props, Clone, PartialEq)]
pub struct SelectProps {
    /// Selected value, empty for none
    pub value: String,

    /// Options to show
    pub options: Vec<SelectOption>,

    #[props(default)]
    pub id: Option<String>,

    #[props(default)]
    pub label: Option<String>,

    /// Text of the empty leading choice
    #[props(default = "Select…".to_string())]
    pub placeholder: String,

    #[props(default)]
    pub help_text: Option<String>,

    #[props(default)]
    pub error: Option<String>,

    #[props(default = false)]
    pub required: bool,

    #[props(default = false)]
    pub disabled: bool,

    #[props(default)]
    pub on_change: EventHandler<String>,

    #[props(default)]
    pub on_blur: EventHandler<()>,
}

/// Dropdown select component
#[component]
pub fn Select(props: SelectProps) -> Element {
    let has_error = props.error.is_some();
    let select_class = build_select_class(has_error, props.disabled);
    let choices = select_choices(&props.options, &props.placeholder);
    let current = FieldValue::Text(props.value.clone());

    rsx! {
        div {
            class: "input-group",

            if let Some(label) = &props.label {
                FieldLabel { text: label.clone(), required: props.required, for_id: props.id.clone() }
            }

            div {
                class: "relative",

                select {
                    id: props.id.clone(),
                    class: "{select_class}",
                    disabled: props.disabled,
                    aria_invalid: has_error,
                    onchange: move |e| props.on_change.call(e.value()),
                    onblur: move |_| props.on_blur.call(()),

                    for (index, choice) in choices.iter().enumerate() {
                        option {
                            key: "{index}",
                            value: "{choice.value}",
                            disabled: choice.disabled,
                            selected: is_selected(&current, &choice.value),
                            class: if choice.value.is_empty() { "text-slate-400" } else { "text-slate-100" },
                            "{choice.label}"
                        }
                    }
                }
            }

            FieldFeedback { error: props.error.clone(), help_text: props.help_text.clone() }
        }
    }
}

// ============================================================================
// Multi Select Component
// ============================================================================

/// Properties for MultiSelect component
#[derive(Props, Clone, PartialEq)]
pub struct MultiSelectProps {
    /// Current selection
    pub value: FieldValue,

    pub options: Vec<SelectOption>,

    #[props(default)]
    pub label: Option<String>,

    #[props(default)]
    pub help_text: Option<String>,

    #[props(default)]
    pub error: Option<String>,

    #[props(default = false)]
    pub required: bool,

    #[props(default = false)]
    pub disabled: bool,

    /// Receives the complete selection, in option order
    #[props(default)]
    pub on_change: EventHandler<FieldValue>,

    #[props(default)]
    pub on_blur: EventHandler<()>,
}

/// Checkbox list for multi-valued choices
#[component]
pub fn MultiSelect(props: MultiSelectProps) -> Element {
    let has_error = props.error.is_some();
    let border = if has_error { "border-rose-500" } else { "border-slate-700" };

    rsx! {
        div {
            class: "input-group",

            if let Some(label) = &props.label {
                FieldLabel { text: label.clone(), required: props.required }
            }

            div {
                class: "flex flex-col gap-1.5 p-3 bg-slate-800 border rounded-lg {border}",
                role: "group",
                onfocusout: move |_| props.on_blur.call(()),

                if props.options.is_empty() {
                    span { class: "text-xs text-slate-500", "No options available" }
                }

                for option in props.options.iter() {
                    Checkbox {
                        key: "{option.value}",
                        checked: is_selected(&props.value, &option.value),
                        label: option.label.clone(),
                        disabled: props.disabled || option.disabled,
                        on_change: {
                            let options = props.options.clone();
                            let current = props.value.clone();
                            let value = option.value.clone();
                            move |_| props.on_change.call(toggle_multiselect(&options, &current, &value))
                        },
                    }
                }
            }

            FieldFeedback { error: props.error.clone(), help_text: props.help_text.clone() }
        }
    }
}

// ============================================================================
// Checkbox Component
// ============================================================================

/// Properties for Checkbox component
#[derive(Props, Clone, PartialEq)]
pub struct CheckboxProps {
    /// Whether checked
    pub checked: bool,

    /// Label text
    #[props(default)]
    pub label: Option<String>,

    /// Help text
    #[props(default)]
    pub help_text: Option<String>,

    #[props(default = false)]
    pub disabled: bool,

    /// Change handler, receives the new checked state
    #[props(default)]
    pub on_change: EventHandler<bool>,

    #[props(default)]
    pub on_blur: EventHandler<()>,
}

/// Checkbox input component
#[component]
pub fn Checkbox(props: CheckboxProps) -> Element {
    let checkbox_class = build_checkbox_class(props.disabled);

    rsx! {
        label {
            class: "checkbox-wrapper inline-flex items-start gap-2 cursor-pointer",
            class: if props.disabled { "opacity-50 cursor-not-allowed" } else { "" },

            div {
                class: "relative flex items-center justify-center mt-0.5",

                input {
                    class: "sr-only peer",
                    r#type: "checkbox",
                    checked: props.checked,
                    disabled: props.disabled,
                    onchange: move |_| {
                        if !props.disabled {
                            props.on_change.call(!props.checked);
                        }
                    },
                    onblur: move |_| props.on_blur.call(()),
                }

                div {
                    class: "{checkbox_class}",
                    if props.checked {
                        svg {
                            class: "w-3 h-3 text-white",
                            fill: "none",
                            stroke: "currentColor",
                            stroke_width: "2.5",
                            view_box: "0 0 24 24",
                            path { d: "M5 13l4 4L19 7" }
                        }
                    }
                }
            }

            if props.label.is_some() || props.help_text.is_some() {
                div {
                    class: "flex flex-col",
                    if let Some(label) = &props.label {
                        span { class: "text-sm text-slate-200", "{label}" }
                    }
                    if let Some(help) = &props.help_text {
                        span { class: "text-xs text-slate-500 mt-0.5", "{help}" }
                    }
                }
            }
        }
    }
}

// ============================================================================
// Radio Group Component
// ============================================================================

/// Properties for RadioGroup component
#[derive(Props, Clone, PartialEq)]
pub struct RadioGroupProps {
    /// Group name shared by every button
    pub name: String,

    /// Selected value
    pub value: String,

    pub options: Vec<SelectOption>,

    #[props(default)]
    pub label: Option<String>,

    #[props(default)]
    pub help_text: Option<String>,

    #[props(default)]
    pub error: Option<String>,

    #[props(default = false)]
    pub required: bool,

    #[props(default = false)]
    pub disabled: bool,

    /// Lay the buttons out in a row
    #[props(default = true)]
    pub inline: bool,

    #[props(default)]
    pub on_change: EventHandler<String>,

    #[props(default)]
    pub on_blur: EventHandler<()>,
}

/// One radio button per option
#[component]
pub fn RadioGroup(props: RadioGroupProps) -> Element {
    let layout = if props.inline { "flex flex-wrap gap-4" } else { "flex flex-col gap-2" };

    rsx! {
        div {
            class: "input-group",

            if let Some(label) = &props.label {
                FieldLabel { text: label.clone(), required: props.required }
            }

            div {
                class: "{layout}",
                role: "radiogroup",
                onfocusout: move |_| props.on_blur.call(()),

                for option in props.options.iter() {
                    label {
                        key: "{option.value}",
                        class: "inline-flex items-center gap-2 text-sm text-slate-200 cursor-pointer",
                        class: if props.disabled || option.disabled { "opacity-50 cursor-not-allowed" } else { "" },
                        input {
                            class: "accent-indigo-600",
                            r#type: "radio",
                            name: "{props.name}",
                            value: "{option.value}",
                            checked: props.value == option.value,
                            disabled: props.disabled || option.disabled,
                            onchange: {
                                let value = option.value.clone();
                                move |_| props.on_change.call(value.clone())
                            },
                        }
                        "{option.label}"
                    }
                }
            }

            FieldFeedback { error: props.error.clone(), help_text: props.help_text.clone() }
        }
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Build input class string
pub(crate) fn build_input_class(has_error: bool, disabled: bool, extra: &Option<String>) -> String {
    let mut classes = vec![
        "w-full",
        "px-3",
        "py-2",
        "bg-slate-800",
        "border",
        "rounded-lg",
        "text-sm",
        "text-slate-100",
        "placeholder-slate-500",
        "transition-colors",
        "focus:outline-none",
        "focus:ring-2",
    ];

    if has_error {
        classes.extend(["border-rose-500", "focus:ring-rose-500/30", "focus:border-rose-500"]);
    } else {
        classes.extend(["border-slate-700", "focus:ring-indigo-500/30", "focus:border-indigo-500"]);
    }

    if disabled {
        classes.extend(["opacity-50", "cursor-not-allowed"]);
    }

    let mut class = classes.join(" ");
    if let Some(extra) = extra {
        class.push(' ');
        class.push_str(extra);
    }
    class
}

/// Build textarea class string
fn build_textarea_class(has_error: bool, disabled: bool, extra: &Option<String>) -> String {
    let mut class = build_input_class(has_error, disabled, extra);
    class.push_str(" resize-y");
    class
}

/// Build select class string
fn build_select_class(has_error: bool, disabled: bool) -> String {
    let mut class = build_input_class(has_error, disabled, &None);
    class.push_str(" select-chevron appearance-none pr-10");
    if !disabled {
        class.push_str(" cursor-pointer");
    }
    class
}

/// Build checkbox class string
fn build_checkbox_class(disabled: bool) -> String {
    let mut classes = vec![
        "w-4",
        "h-4",
        "rounded",
        "border-2",
        "transition-colors",
        "flex",
        "items-center",
        "justify-center",
        "peer-checked:bg-indigo-600",
        "peer-checked:border-indigo-600",
        "peer-focus:ring-2",
        "peer-focus:ring-indigo-500/30",
    ];

    if disabled {
        classes.extend(["border-slate-600", "bg-slate-700"]);
    } else {
        classes.extend(["border-slate-500", "bg-slate-800", "hover:border-slate-400"]);
    }

    classes.join(" ")
}

// ============================================================================
// Tests
// ============================================================================
