//! Saved Records Page
//!
//! Lists what the demo pages saved this session. Burial permits can be
//! reopened for editing; any record can be exported as JSON.

use dioxus::prelude::*;

use crate::file_ops;
use crate::state::{APP_STATE, Page, StatusLevel};
use civic_core::FormError;

#[component]
pub fn RecordsPage() -> Element {
    let records: Vec<_> = APP_STATE.read().records.iter().rev().cloned().collect();

    rsx! {
        div {
            class: "page records-page p-6 max-w-4xl mx-auto space-y-6",

            h1 { class: "text-2xl font-semibold text-white", "Saved Records" }

            if records.is_empty() {
                p { class: "text-sm text-slate-500", "Nothing saved yet." }
            }

            ul {
                class: "divide-y divide-slate-700 rounded-lg border border-slate-700",
                for record in records {
                    li {
                        key: "{record.id}",
                        class: "flex items-center gap-4 px-4 py-3",

                        span { class: "text-lg", "{record.page.icon()}" }
                        div {
                            class: "flex-1 min-w-0",
                            p { class: "text-sm text-slate-100 truncate", "{record.summary}" }
                            p {
                                class: "text-xs text-slate-500",
                                "{record.page.display_name()} · {record.saved_at_label()}"
                            }
                        }

                        if record.page == Page::BurialPermit {
                            button {
                                r#type: "button",
                                class: "text-sm text-indigo-300 hover:text-indigo-200",
                                onclick: {
                                    let id = record.id.clone();
                                    move |_| {
                                        APP_STATE.write().edit_record(&id);
                                    }
                                },
                                "Open"
                            }
                        }

                        button {
                            r#type: "button",
                            class: "text-sm text-slate-300 hover:text-white",
                            onclick: {
                                let values = record.values.clone();
                                let summary = record.summary.clone();
                                move |_| {
                                    let values = values.clone();
                                    let summary = summary.clone();
                                    spawn(async move {
                                        match file_ops::export_record(&values, &summary).await {
                                            Ok(path) => APP_STATE.write().ui.set_status(
                                                format!("Exported to {}", path.display()),
                                                StatusLevel::Success,
                                            ),
                                            Err(FormError::Cancelled) => {}
                                            Err(e) => APP_STATE
                                                .write()
                                                .ui
                                                .set_status(e.to_string(), StatusLevel::Error),
                                        }
                                    });
                                }
                            },
                            "Export"
                        }
                    }
                }
            }
        }
    }
}
