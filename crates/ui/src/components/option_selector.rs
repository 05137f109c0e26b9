//! # Searchable Select
//!
//! Dropdown with a search box over an injected option list. Used for long
//! reference lists such as the chart of accounts. `options: None` means the
//! list is still loading.

use super::inputs::{FieldFeedback, FieldLabel};
use civic_core::SelectOption;
use civic_forms::selector::{SelectorState, display_label, filter_options};
use dioxus::prelude::*;

// ============================================================================
// Component Props
// ============================================================================

#[derive(Props, Clone, PartialEq)]
pub struct SearchableSelectProps {
    /// Selected option value, empty for none
    pub value: String,

    /// Options to choose from; `None` while loading
    pub options: Option<Vec<SelectOption>>,

    #[props(default)]
    pub label: Option<String>,

    /// Shown on the trigger when nothing is selected
    #[props(default = "Select…".to_string())]
    pub placeholder: String,

    /// Shown when the query matches nothing
    #[props(default = "No results found".to_string())]
    pub no_results_text: String,

    #[props(default)]
    pub help_text: Option<String>,

    #[props(default)]
    pub error: Option<String>,

    #[props(default = false)]
    pub required: bool,

    #[props(default = false)]
    pub disabled: bool,

    /// Show the clear button while a value is selected
    #[props(default = true)]
    pub clearable: bool,

    /// Receives the chosen value, `""` when cleared
    pub on_select: EventHandler<String>,

    #[props(default)]
    pub on_blur: EventHandler<()>,
}

// ============================================================================
// Main Component
// ============================================================================

/// Select with type-to-filter search
#[component]
pub fn SearchableSelect(props: SearchableSelectProps) -> Element {
    let mut selector = use_signal(SelectorState::new);
    let mut highlighted_index = use_signal(|| 0usize);

    let options = props.options.as_deref();
    let query = selector.read().query.clone();
    let is_open = selector.read().open;
    let matches = filter_options(options, &query);
    let visible: Vec<SelectOption> = matches.options().iter().map(|o| (*o).clone()).collect();
    let no_results = matches.is_no_results();
    let is_loading = options.is_none();

    let selected_label = display_label(options, &props.value).to_string();
    let has_value = !selected_label.is_empty();
    let has_error = props.error.is_some();

    let mut choose = move |option: SelectOption| {
        if let Some(value) = selector.write().choose(&option) {
            props.on_select.call(value);
            props.on_blur.call(());
        }
    };

    let mut close = move || {
        selector.write().close();
        props.on_blur.call(());
    };

    let handle_keydown = {
        let visible = visible.clone();
        move |e: KeyboardEvent| match e.key() {
            Key::ArrowDown => {
                e.prevent_default();
                highlighted_index.set(step_highlight(highlighted_index(), visible.len(), true));
            }
            Key::ArrowUp => {
                e.prevent_default();
                highlighted_index.set(step_highlight(highlighted_index(), visible.len(), false));
            }
            Key::Enter => {
                e.prevent_default();
                if let Some(option) = visible.get(highlighted_index()) {
                    choose(option.clone());
                }
            }
            Key::Escape => {
                e.prevent_default();
                close();
            }
            _ => {}
        }
    };

    let trigger_border = if is_open {
        "border-indigo-500 ring-1 ring-indigo-500"
    } else if has_error {
        "border-rose-500"
    } else {
        "border-slate-700 hover:border-slate-500"
    };
    let trigger_state = if props.disabled { "opacity-50 cursor-not-allowed" } else { "cursor-pointer" };

    rsx! {
        div {
            class: "searchable-select relative input-group",

            if let Some(label) = &props.label {
                FieldLabel { text: label.clone(), required: props.required }
            }

            div {
                class: "relative flex items-center",

                button {
                    r#type: "button",
                    class: "w-full flex items-center gap-2 px-3 py-2 bg-slate-800 border rounded-lg text-left text-sm transition-colors {trigger_border} {trigger_state}",
                    disabled: props.disabled,
                    aria_invalid: has_error,
                    aria_expanded: is_open,
                    onclick: move |_| {
                        if !props.disabled {
                            selector.write().toggle();
                            highlighted_index.set(0);
                        }
                    },

                    if has_value {
                        span { class: "flex-1 text-slate-100 truncate", "{selected_label}" }
                    } else {
                        span { class: "flex-1 text-slate-500", "{props.placeholder}" }
                    }

                    span {
                        class: "text-slate-400 transition-transform",
                        class: if is_open { "rotate-180" } else { "" },
                        "▼"
                    }
                }

                if props.clearable && has_value && !props.disabled {
                    button {
                        r#type: "button",
                        class: "absolute right-8 px-1 text-slate-400 hover:text-slate-200",
                        title: "Clear selection",
                        onclick: move |e| {
                            e.stop_propagation();
                            let cleared = selector.write().clear();
                            props.on_select.call(cleared);
                        },
                        "✕"
                    }
                }
            }

            FieldFeedback { error: props.error.clone(), help_text: props.help_text.clone() }

            if is_open {
                div {
                    class: "absolute z-50 w-full mt-1 bg-slate-800 border border-slate-700 rounded-lg shadow-xl overflow-hidden",

                    div {
                        class: "p-2 border-b border-slate-700",
                        input {
                            r#type: "text",
                            class: "w-full px-3 py-2 bg-slate-700 border border-slate-600 rounded text-sm text-white placeholder-slate-500 focus:outline-none focus:border-indigo-500",
                            placeholder: "Search…",
                            value: "{query}",
                            autofocus: true,
                            oninput: move |e| {
                                selector.write().search(e.value());
                                highlighted_index.set(0);
                            },
                            onkeydown: handle_keydown,
                        }
                    }

                    div {
                        class: "overflow-y-auto",
                        style: "max-height: 280px;",
                        role: "listbox",

                        if no_results {
                            div {
                                class: "p-4 text-center text-sm text-slate-500",
                                "{props.no_results_text}"
                            }
                        } else if is_loading {
                            div {
                                class: "p-4 text-center text-sm text-slate-500",
                                "Loading options…"
                            }
                        } else {
                            for (index, option) in visible.iter().enumerate() {
                                button {
                                    key: "{option.value}",
                                    r#type: "button",
                                    role: "option",
                                    class: "w-full px-3 py-2 text-left text-sm transition-colors",
                                    class: if option.value == props.value { "text-indigo-300" } else { "text-slate-200" },
                                    class: if index == highlighted_index() { "bg-slate-700" } else { "hover:bg-slate-700/60" },
                                    class: if option.disabled { "opacity-50 cursor-not-allowed" } else { "" },
                                    disabled: option.disabled,
                                    aria_selected: option.value == props.value,
                                    onmouseenter: move |_| highlighted_index.set(index),
                                    onclick: {
                                        let option = option.clone();
                                        move |_| choose(option.clone())
                                    },
                                    "{option.label}"
                                }
                            }
                        }
                    }
                }

                // Backdrop to close dropdown
                div {
                    class: "fixed inset-0 z-40",
                    onclick: move |_| close(),
                }
            }
        }
    }
}

/// Next highlighted row, wrapping at both ends
fn step_highlight(current: usize, len: usize, down: bool) -> usize {
    if len == 0 {
        return 0;
    }
    if down {
        (current + 1) % len
    } else {
        current.checked_sub(1).unwrap_or(len - 1).min(len - 1)
    }
}

// ============================================================================
// Tests
// ============================================================================
