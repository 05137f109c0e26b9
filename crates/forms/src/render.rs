//! Render model for the field renderer
//!
//! Everything the UI needs to decide *which* control to draw for a field
//! and how raw widget input becomes a `FieldValue`, without depending on a
//! UI framework.

use civic_core::{FieldKind, FieldValue, SelectOption};

// ============================================================================
// Widget selection
// ============================================================================

/// `type` attribute of a single-line input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputType {
    Text,
    Number,
    Email,
    Date,
    Password,
}

impl InputType {
    pub fn as_str(&self) -> &'static str {
        match self {
            InputType::Text => "text",
            InputType::Number => "number",
            InputType::Email => "email",
            InputType::Date => "date",
            InputType::Password => "password",
        }
    }

    /// Input type after the password show/hide toggle
    pub fn revealed(self, show: bool) -> Self {
        match (self, show) {
            (InputType::Password, true) => InputType::Text,
            (other, _) => other,
        }
    }
}

/// The one control a field kind renders as
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WidgetKind {
    Input(InputType),
    TextArea,
    Select,
    MultiSelect,
    Checkbox,
    RadioGroup,
    FileList,
}

impl WidgetKind {
    pub fn for_kind(kind: FieldKind) -> Self {
        match kind {
            FieldKind::Text => WidgetKind::Input(InputType::Text),
            FieldKind::Number => WidgetKind::Input(InputType::Number),
            FieldKind::Email => WidgetKind::Input(InputType::Email),
            FieldKind::Date => WidgetKind::Input(InputType::Date),
            FieldKind::Password => WidgetKind::Input(InputType::Password),
            FieldKind::TextArea => WidgetKind::TextArea,
            FieldKind::Select => WidgetKind::Select,
            FieldKind::MultiSelect => WidgetKind::MultiSelect,
            FieldKind::Checkbox => WidgetKind::Checkbox,
            FieldKind::Radio => WidgetKind::RadioGroup,
            FieldKind::FileArray => WidgetKind::FileList,
        }
    }
}

// ============================================================================
// Choices
// ============================================================================

/// One entry of a rendered select
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Choice {
    pub value: String,
    pub label: String,
    pub disabled: bool,
}

/// Options for a single select, led by the empty placeholder choice
pub fn select_choices(options: &[SelectOption], placeholder: &str) -> Vec<Choice> {
    std::iter::once(Choice {
        value: String::new(),
        label: placeholder.to_string(),
        disabled: false,
    })
    .chain(options.iter().map(|o| Choice {
        value: o.value.clone(),
        label: o.label.clone(),
        disabled: o.disabled,
    }))
    .collect()
}

/// Whether `choice` is the selected one for `value`
pub fn is_selected(value: &FieldValue, choice: &str) -> bool {
    match value {
        FieldValue::List(items) => items.iter().any(|item| item == choice),
        FieldValue::Null => choice.is_empty(),
        other => other.to_input_string() == choice,
    }
}

// ============================================================================
// Input coercion
// ============================================================================

/// Turn raw widget text into a value for `kind`
///
/// Empty numeric input is `Null`; unparsable numeric input stays text so
/// validation can report it.
pub fn coerce_input(kind: FieldKind, raw: &str) -> FieldValue {
    match kind {
        FieldKind::Number => {
            let trimmed = raw.trim();
            if trimmed.is_empty() {
                FieldValue::Null
            } else {
                match trimmed.parse::<f64>() {
                    Ok(n) if n.is_finite() => FieldValue::Number(n),
                    _ => FieldValue::Text(raw.to_string()),
                }
            }
        }
        FieldKind::Checkbox => FieldValue::Bool(matches!(raw, "true" | "on" | "1")),
        FieldKind::MultiSelect => {
            if raw.is_empty() {
                FieldValue::List(Vec::new())
            } else {
                FieldValue::List(vec![raw.to_string()])
            }
        }
        FieldKind::FileArray => FieldValue::Attachments(Vec::new()),
        FieldKind::Text
        | FieldKind::Email
        | FieldKind::Date
        | FieldKind::Password
        | FieldKind::TextArea
        | FieldKind::Select
        | FieldKind::Radio => FieldValue::Text(raw.to_string()),
    }
}

/// Full multi-select selection in option order
pub fn collect_multiselect<F>(options: &[SelectOption], selected: F) -> FieldValue
where
    F: Fn(&SelectOption) -> bool,
{
    FieldValue::List(
        options
            .iter()
            .filter(|o| selected(*o))
            .map(|o| o.value.clone())
            .collect(),
    )
}

/// Selection after toggling one option, still in option order
pub fn toggle_multiselect(options: &[SelectOption], current: &FieldValue, value: &str) -> FieldValue {
    let selected = current.as_list().unwrap_or_default();
    collect_multiselect(options, |o| {
        let was = selected.iter().any(|s| *s == o.value);
        if o.value == value { !was } else { was }
    })
}

// ============================================================================
// Feedback
// ============================================================================

/// Text shown below a control
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Feedback {
    Error(String),
    Helper(String),
    None,
}

impl Feedback {
    /// Error when touched and failing, else helper text, else nothing
    pub fn resolve(error: Option<&str>, touched: bool, helper_text: Option<&str>) -> Self {
        match (error, touched, helper_text) {
            (Some(message), true, _) => Feedback::Error(message.to_string()),
            (_, _, Some(help)) if !help.is_empty() => Feedback::Helper(help.to_string()),
            _ => Feedback::None,
        }
    }

    /// Whether the control should show its invalid state
    pub fn is_error(&self) -> bool {
        matches!(self, Feedback::Error(_))
    }

    pub fn text(&self) -> Option<&str> {
        match self {
            Feedback::Error(text) | Feedback::Helper(text) => Some(text),
            Feedback::None => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn services() -> Vec<SelectOption> {
        vec![
            SelectOption::new("inter", "Interment"),
            SelectOption::new("disinter", "Disinterment"),
            SelectOption::new("remove", "Removal"),
        ]
    }

    #[test]
    fn test_every_kind_has_one_widget() {
        for kind in FieldKind::ALL {
            let widget = WidgetKind::for_kind(kind);
            if kind == FieldKind::Password {
                assert_eq!(widget, WidgetKind::Input(InputType::Password));
            }
        }
        assert_eq!(WidgetKind::for_kind(FieldKind::Radio), WidgetKind::RadioGroup);
        assert_eq!(WidgetKind::for_kind(FieldKind::FileArray), WidgetKind::FileList);
    }

    #[test]
    fn test_password_reveal_changes_type_only() {
        assert_eq!(InputType::Password.revealed(true), InputType::Text);
        assert_eq!(InputType::Password.revealed(false), InputType::Password);
        assert_eq!(InputType::Email.revealed(true), InputType::Email);
    }

    #[test]
    fn test_select_choices_start_with_placeholder() {
        let choices = select_choices(&services(), "Select…");
        assert_eq!(choices.len(), 4);
        assert_eq!(choices[0].value, "");
        assert_eq!(choices[0].label, "Select…");
        assert!(is_selected(&FieldValue::from(""), &choices[0].value));
        assert!(!is_selected(&FieldValue::from(""), &choices[1].value));
    }

    #[test]
    fn test_select_without_options() {
        let choices = select_choices(&[], "Select…");
        assert_eq!(choices.len(), 1);
    }

    #[test]
    fn test_coerce_number() {
        assert_eq!(coerce_input(FieldKind::Number, "250.75"), FieldValue::Number(250.75));
        assert_eq!(coerce_input(FieldKind::Number, ""), FieldValue::Null);
        assert_eq!(coerce_input(FieldKind::Number, "  "), FieldValue::Null);
        assert_eq!(coerce_input(FieldKind::Number, "1,000"), FieldValue::from("1,000"));
    }

    #[test]
    fn test_coerce_other_kinds() {
        assert_eq!(coerce_input(FieldKind::Select, "1042"), FieldValue::from("1042"));
        assert_eq!(coerce_input(FieldKind::Radio, "inter"), FieldValue::from("inter"));
        assert_eq!(coerce_input(FieldKind::Checkbox, "true"), FieldValue::Bool(true));
        assert_eq!(coerce_input(FieldKind::Checkbox, "false"), FieldValue::Bool(false));
    }

    #[test]
    fn test_multiselect_emits_full_set_in_option_order() {
        let options = services();
        let picked = collect_multiselect(&options, |o| o.value != "disinter");
        assert_eq!(
            picked,
            FieldValue::List(vec!["inter".to_string(), "remove".to_string()])
        );

        let again = collect_multiselect(&options, |o| o.value != "disinter");
        assert_eq!(picked, again);
    }

    #[test]
    fn test_toggle_multiselect() {
        let options = services();
        let current = FieldValue::List(vec!["remove".to_string()]);
        let next = toggle_multiselect(&options, &current, "inter");
        assert_eq!(
            next,
            FieldValue::List(vec!["inter".to_string(), "remove".to_string()])
        );
        let back = toggle_multiselect(&options, &next, "inter");
        assert_eq!(back, current);
    }

    #[test]
    fn test_feedback_resolution() {
        assert_eq!(
            Feedback::resolve(Some("Payee is required"), true, Some("Name of payee")),
            Feedback::Error("Payee is required".to_string())
        );
        assert_eq!(
            Feedback::resolve(Some("Payee is required"), false, Some("Name of payee")),
            Feedback::Helper("Name of payee".to_string())
        );
        assert_eq!(Feedback::resolve(None, true, None), Feedback::None);
        assert!(Feedback::resolve(Some("x"), true, None).is_error());
    }
}
