//! # Attachment List
//!
//! Renders a `file_array` field: persisted files as links, newly picked
//! files as plain names, each removable by position. New files come from
//! the native picker and are appended through `on_add`.

use super::inputs::{FieldFeedback, FieldLabel};
use crate::file_ops::pick_attachments;
use civic_core::{AttachmentRef, FormError, FormResult, PendingFile};
use dioxus::core::spawn_forever;
use dioxus::prelude::*;

/// Link prefix for persisted attachments
pub const DEFAULT_LINK_BASE: &str = "/attachments/";

#[derive(Props, Clone, PartialEq)]
pub struct AttachmentListViewProps {
    /// Current entries in display order
    pub items: Vec<AttachmentRef>,

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

    /// Prefix joined with a persisted file's id to form its link
    #[props(default = DEFAULT_LINK_BASE.to_string())]
    pub link_base: String,

    /// Receives files chosen in the picker
    pub on_add: EventHandler<Vec<PendingFile>>,

    /// Receives the position of the entry to remove
    pub on_remove: EventHandler<usize>,

    #[props(default)]
    pub on_blur: EventHandler<()>,
}

/// Attachment list with add and remove controls
#[component]
pub fn AttachmentListView(props: AttachmentListViewProps) -> Element {
    let mut picking = use_signal(|| false);
    let mut picked = use_signal(|| None::<Vec<PendingFile>>);
    let border = if props.error.is_some() { "border-rose-500" } else { "border-slate-700" };

    let on_add = props.on_add;
    let on_blur = props.on_blur;
    use_effect(move || {
        if picked().is_none() {
            return;
        }
        let Some(files) = picked.write().take() else {
            return;
        };
        if !files.is_empty() {
            on_add.call(files);
        }
        on_blur.call(());
    });

    let open_picker = move |_: MouseEvent| {
        if picking() {
            return;
        }
        picking.set(true);
        // The dialog can stay open across re-renders of the list
        spawn_forever(async move {
            let files = accepted_files(pick_attachments().await);
            let Ok(mut flag) = picking.try_write() else {
                tracing::info!("attachment list closed before files were picked");
                return;
            };
            *flag = false;
            drop(flag);
            if let Ok(mut slot) = picked.try_write() {
                *slot = Some(files);
            }
        });
    };

    rsx! {
        div {
            class: "input-group",

            if let Some(label) = &props.label {
                FieldLabel { text: label.clone(), required: props.required }
            }

            div {
                class: "rounded-lg border bg-slate-800 {border}",

                if props.items.is_empty() {
                    p { class: "px-3 py-2 text-sm text-slate-500", "No files attached" }
                }

                ul {
                    class: "divide-y divide-slate-700",
                    for (index, item) in props.items.iter().enumerate() {
                        li {
                            key: "{index}-{item.display_name()}",
                            class: "flex items-center gap-2 px-3 py-2 text-sm",

                            {match item {
                                AttachmentRef::Existing { existing_id, stored_name } => rsx! {
                                    span { class: "text-slate-400", "📎" }
                                    a {
                                        class: "flex-1 truncate text-indigo-300 hover:underline",
                                        href: attachment_href(&props.link_base, existing_id),
                                        target: "_blank",
                                        "{stored_name}"
                                    }
                                },
                                AttachmentRef::New(file) => rsx! {
                                    span { class: "text-slate-400", "⬆" }
                                    span { class: "flex-1 truncate text-slate-200", "{file.file_name}" }
                                    span { class: "text-xs text-slate-500", "{format_size(file.size())}" }
                                },
                            }}

                            if !props.disabled {
                                button {
                                    r#type: "button",
                                    class: "px-2 text-slate-400 hover:text-rose-400",
                                    title: "Remove",
                                    onclick: move |_| props.on_remove.call(index),
                                    "✕"
                                }
                            }
                        }
                    }
                }

                div {
                    class: "px-3 py-2 border-t border-slate-700",
                    button {
                        r#type: "button",
                        class: "text-sm text-indigo-300 hover:text-indigo-200 disabled:opacity-50 disabled:cursor-not-allowed",
                        disabled: props.disabled || picking(),
                        onclick: open_picker,
                        if picking() { "Opening…" } else { "+ Add files" }
                    }
                }
            }

            FieldFeedback { error: props.error.clone(), help_text: props.help_text.clone() }
        }
    }
}

/// Files to hand to the field from a picker result
fn accepted_files(result: FormResult<Vec<PendingFile>>) -> Vec<PendingFile> {
    match result {
        Ok(files) => files,
        Err(FormError::Cancelled) => Vec::new(),
        Err(e) => {
            tracing::warn!(error = %e, "could not read picked files");
            Vec::new()
        }
    }
}

/// Link for a persisted attachment
pub fn attachment_href(base: &str, existing_id: &str) -> String {
    if base.ends_with('/') {
        format!("{}{}", base, existing_id)
    } else {
        format!("{}/{}", base, existing_id)
    }
}

/// Human readable file size
pub fn format_size(bytes: usize) -> String {
    const KIB: f64 = 1024.0;
    let bytes = bytes as f64;
    if bytes < KIB {
        format!("{} B", bytes)
    } else if bytes < KIB * KIB {
        format!("{:.1} KB", bytes / KIB)
    } else {
        format!("{:.1} MB", bytes / (KIB * KIB))
    }
}
