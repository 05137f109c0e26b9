//! Main Application Component for Civic Ledger
//!
//! Root Dioxus component: a header, the page sidebar, the active page and
//! the status bar.

use dioxus::prelude::*;

use crate::pages::{BurialPermitPage, JournalEntryPage, RecordsPage};
use crate::state::{APP_STATE, Page};

// ============================================================================
// Main App Component
// ============================================================================

/// Root application component
#[component]
pub fn App() -> Element {
    use_effect(|| {
        tracing::info!("Civic Ledger UI initialized");
    });

    rsx! {
        div {
            class: "app-container h-screen w-screen flex flex-col bg-slate-900 text-slate-100 overflow-hidden",

            Header {}

            div {
                class: "flex flex-1 overflow-hidden",
                Sidebar {}
                MainContent {}
            }

            StatusBar {}
        }
    }
}

// ============================================================================
// Header Component
// ============================================================================

#[component]
fn Header() -> Element {
    rsx! {
        header {
            class: "toolbar h-12 bg-slate-800 border-b border-slate-700 flex items-center px-4 gap-2 shrink-0",
            span { class: "text-xl", "🏛️" }
            span { class: "font-semibold text-sm", "{crate::NAME}" }
            span { class: "text-xs text-slate-400 ml-2 hidden sm:inline", "Local Government Accounting" }
        }
    }
}

// ============================================================================
// Sidebar Component
// ============================================================================

/// Left sidebar with navigation
#[component]
fn Sidebar() -> Element {
    let state = APP_STATE.read();
    let collapsed = state.ui.sidebar_collapsed;
    let current_page = state.ui.active_page;
    drop(state);

    rsx! {
        aside {
            class: "sidebar flex flex-col shrink-0 bg-slate-800 border-r border-slate-700 transition-all duration-200",
            style: if collapsed { "width: 60px;" } else { "width: 220px;" },

            div {
                class: "h-12 flex items-center justify-between px-3 border-b border-slate-700",

                if !collapsed {
                    span { class: "text-sm font-semibold text-slate-300", "Forms" }
                }

                button {
                    class: "w-8 h-8 flex items-center justify-center rounded hover:bg-slate-700 text-slate-400 hover:text-slate-200 transition-colors",
                    title: if collapsed { "Expand sidebar" } else { "Collapse sidebar" },
                    onclick: move |_| {
                        APP_STATE.write().ui.toggle_sidebar();
                    },
                    if collapsed { "☰" } else { "✕" }
                }
            }

            nav {
                class: "flex-1 py-4 overflow-y-auto",
                for page in Page::ALL {
                    SidebarItem {
                        key: "{page.display_name()}",
                        page,
                        current: current_page,
                        collapsed,
                    }
                }
            }
        }
    }
}

/// Sidebar navigation item
#[component]
fn SidebarItem(page: Page, current: Page, collapsed: bool) -> Element {
    let name = page.display_name();
    let layout = if collapsed {
        "w-11 h-11 mx-auto my-1 justify-center"
    } else {
        "mx-2 my-0.5 px-4 py-2.5 gap-3 text-left"
    };

    rsx! {
        button {
            class: "sidebar-item flex items-center rounded-lg transition-colors {layout} {sidebar_item_class(page == current)}",
            style: if collapsed { "" } else { "width: calc(100% - 16px);" },
            title: "{name}",
            onclick: move |_| {
                APP_STATE.write().ui.navigate(page);
            },
            span { class: "text-xl leading-none", "{page.icon()}" }
            if !collapsed {
                span { class: "text-sm font-medium", "{name}" }
            }
        }
    }
}

fn sidebar_item_class(active: bool) -> &'static str {
    if active {
        "bg-indigo-600 text-white"
    } else {
        "text-slate-300 hover:bg-slate-700"
    }
}

// ============================================================================
// Main Content Component
// ============================================================================

/// Main content area that renders the active page
#[component]
fn MainContent() -> Element {
    let current_page = APP_STATE.read().ui.active_page;

    rsx! {
        main {
            class: "main-content flex-1 overflow-auto",
            match current_page {
                Page::JournalEntry => rsx! { JournalEntryPage {} },
                Page::BurialPermit => rsx! { BurialPermitPage {} },
                Page::Records => rsx! { RecordsPage {} },
            }
        }
    }
}

// ============================================================================
// Status Bar Component
// ============================================================================

/// Bottom status bar
#[component]
fn StatusBar() -> Element {
    let state = APP_STATE.read();
    let status = state.ui.status_message.clone();
    let record_count = state.records.len();
    drop(state);

    rsx! {
        footer {
            class: "status-bar h-6 bg-slate-800 border-t border-slate-700 flex items-center px-4 text-xs text-slate-400 shrink-0",

            if let Some(msg) = status {
                span { class: msg.level.text_class(), "{msg.text}" }
                button {
                    class: "ml-2 text-slate-500 hover:text-slate-300",
                    title: "Dismiss",
                    onclick: move |_| APP_STATE.write().ui.clear_status(),
                    "✕"
                }
            } else {
                span { "Ready" }
            }

            div { class: "flex-1" }

            span { "{records_label(record_count)}" }
        }
    }
}

fn records_label(count: usize) -> String {
    match count {
        1 => "1 record saved".to_string(),
        n => format!("{} records saved", n),
    }
}

// ============================================================================
// Tests
// ============================================================================
