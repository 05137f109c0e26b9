//! Journal Entry Page
//!
//! Journal entry voucher: header fields come from the bundled schema file,
//! line items are debit/credit rows added and removed at runtime. Debit and
//! credit totals must balance before the voucher can be posted.

use chrono::{Datelike, Local};
use civic_core::{FormError, FormResult, SelectOption, format_number};
use civic_forms::{
    EngineConfig, FieldDescriptor, FormState, FormValues, SchemaFormat, load_schema_from_str,
};
use dioxus::prelude::*;

use crate::components::{BoundField, DynamicForm, SubmitHandler};
use crate::state::{APP_STATE, Page, SavedRecord};

/// Bundled voucher schema
const JOURNAL_SCHEMA: &str = include_str!("../../../../assets/forms/journal_entry.toml");

/// Value-map prefix of the line items
pub const ENTRIES: &str = "entries";

/// Rows a new voucher starts with
const STARTING_ROWS: usize = 2;

// ============================================================================
// Form Definition
// ============================================================================

/// Chart of accounts offered in each line item
pub fn chart_of_accounts() -> Vec<SelectOption> {
    [
        ("10101010", "Cash - Local Treasury"),
        ("10102020", "Cash in Bank - Local Currency, Current Account"),
        ("10301010", "Accounts Receivable"),
        ("10404010", "Office Supplies Inventory"),
        ("10605030", "Information and Communication Technology Equipment"),
        ("20101010", "Accounts Payable"),
        ("20201010", "Due to BIR"),
        ("40101010", "Real Property Tax - Basic"),
        ("40201010", "Permit Fees"),
        ("50101010", "Salaries and Wages - Regular"),
        ("50203010", "Office Supplies Expenses"),
        ("50299990", "Other Maintenance and Operating Expenses"),
    ]
    .into_iter()
    .map(|(code, title)| SelectOption::new(code, format!("{} {}", code, title)))
    .collect()
}

/// Column templates of one line item
pub fn line_template() -> Vec<FieldDescriptor> {
    vec![
        FieldDescriptor::select("account", chart_of_accounts())
            .with_label("Account")
            .required(),
        FieldDescriptor::number("debit").with_label("Debit"),
        FieldDescriptor::number("credit").with_label("Credit"),
    ]
}

/// Header values for a new voucher
pub fn new_voucher_values() -> FormValues {
    let today = Local::now().date_naive();
    FormValues::new()
        .with("date", today.format(civic_core::DATE_FORMAT).to_string())
        .with("jev_no", format!("{}-{:02}-", today.year(), today.month()))
        .with("fund", "01")
}

/// Build the voucher form with its starting rows
pub fn journal_form(config: &EngineConfig) -> FormResult<FormState> {
    let schema = load_schema_from_str(JOURNAL_SCHEMA, SchemaFormat::Toml)?;
    let mut form = schema
        .build_form(config, new_voucher_values())?
        .with_success_message("Journal entry posted");
    let template = line_template();
    for _ in 0..STARTING_ROWS {
        form.add_row(ENTRIES, &template)?;
    }
    Ok(form)
}

/// Clear the form for the next voucher, back to the starting rows
pub fn start_new_voucher(form: &mut FormState) -> FormResult<()> {
    while form.row_count(ENTRIES) > STARTING_ROWS {
        let last = form.row_count(ENTRIES) - 1;
        form.remove_row(ENTRIES, last)?;
    }
    let template = line_template();
    while form.row_count(ENTRIES) < STARTING_ROWS {
        form.add_row(ENTRIES, &template)?;
    }
    form.reset(new_voucher_values());
    Ok(())
}

/// Header field names, in schema order
fn header_fields(form: &FormState) -> Vec<String> {
    form.descriptors()
        .iter()
        .filter(|d| !d.name.starts_with(&format!("{}.", ENTRIES)))
        .map(|d| d.name.clone())
        .collect()
}

/// Stand-in for the posting service
async fn post_voucher(values: FormValues) -> FormResult<()> {
    tokio::time::sleep(std::time::Duration::from_millis(600)).await;

    check_posting_period(&values)?;

    let jev_no = values.text("jev_no").unwrap_or_default().to_string();
    let total = values.column_total(ENTRIES, "debit");
    let summary = format!("JEV {} · {}", jev_no, format_number(total));
    APP_STATE
        .write()
        .save_record(SavedRecord::new(Page::JournalEntry, summary, values));
    tracing::info!(jev_no = %jev_no, "journal entry posted");
    Ok(())
}

/// Vouchers dated before the current year fall in a closed period
pub fn check_posting_period(values: &FormValues) -> FormResult<()> {
    let current_year = Local::now().year();
    match values.date("date") {
        Some(date) if date.year() < current_year => Err(FormError::submit(format!(
            "Posting period {} is closed",
            date.year()
        ))),
        _ => Ok(()),
    }
}

// ============================================================================
// Journal Entry Page Component
// ============================================================================

#[component]
pub fn JournalEntryPage() -> Element {
    let config = APP_STATE.read().config.clone();
    let built = use_hook(move || journal_form(&config).map(Signal::new).map_err(|e| e.to_string()));

    match built {
        Ok(form) => rsx! { JournalEntryForm { form } },
        Err(message) => rsx! {
            div {
                class: "p-6 text-rose-400",
                "Could not load the journal entry form: {message}"
            }
        },
    }
}

#[component]
fn JournalEntryForm(mut form: Signal<FormState>) -> Element {
    let header = header_fields(&form.read());
    let on_submit = use_hook(|| SubmitHandler::new(post_voucher));

    rsx! {
        div {
            class: "page journal-entry-page p-6 max-w-5xl mx-auto space-y-6",

            header {
                class: "flex items-start justify-between",
                div {
                    h1 { class: "text-2xl font-semibold text-white", "Journal Entry Voucher" }
                    p { class: "text-sm text-slate-400", "Debits and credits must balance before posting." }
                }
                button {
                    r#type: "button",
                    class: "px-3 py-1.5 rounded-lg border border-slate-600 text-sm text-slate-300 hover:bg-slate-800",
                    disabled: form.read().is_submitting(),
                    onclick: move |_| {
                        if let Err(e) = start_new_voucher(&mut form.write()) {
                            tracing::warn!(error = %e, "could not start a new voucher");
                        }
                    },
                    "New voucher"
                }
            }

            DynamicForm {
                form,
                on_submit,
                fields: Some(header),
                submit_label: "Post Entry",
                LineItems { form }
            }
        }
    }
}

// ============================================================================
// Line Items
// ============================================================================

#[component]
fn LineItems(mut form: Signal<FormState>) -> Element {
    let (rows, total_debit, total_credit) = {
        let state = form.read();
        (
            state.row_indices(ENTRIES),
            state.values().column_total(ENTRIES, "debit"),
            state.values().column_total(ENTRIES, "credit"),
        )
    };
    let can_remove = rows.len() > 1;
    let difference = (total_debit - total_credit).abs();
    let tolerance = form.read().config().balance_tolerance;
    let balanced = difference <= tolerance;

    rsx! {
        section {
            class: "space-y-3",

            div {
                class: "flex items-center justify-between",
                h2 { class: "text-sm font-semibold uppercase tracking-wider text-slate-400", "Accounting Entries" }
                button {
                    r#type: "button",
                    class: "text-sm text-indigo-300 hover:text-indigo-200",
                    onclick: move |_| {
                        if let Err(e) = form.write().add_row(ENTRIES, &line_template()) {
                            tracing::warn!(error = %e, "could not add line item");
                        }
                    },
                    "+ Add line"
                }
            }

            div {
                class: "rounded-lg border border-slate-700 divide-y divide-slate-700",

                div {
                    class: "grid grid-cols-12 gap-3 px-3 py-2 text-xs font-semibold text-slate-400",
                    span { class: "col-span-6", "Account" }
                    span { class: "col-span-2 text-right", "Debit" }
                    span { class: "col-span-2 text-right", "Credit" }
                }

                for index in rows.iter().copied() {
                    div {
                        key: "{index}",
                        class: "grid grid-cols-12 gap-3 px-3 py-2 items-start",
                        div {
                            class: "col-span-6",
                            BoundField { form, name: row_field(index, "account"), searchable: true }
                        }
                        div {
                            class: "col-span-2",
                            BoundField { form, name: row_field(index, "debit") }
                        }
                        div {
                            class: "col-span-2",
                            BoundField { form, name: row_field(index, "credit") }
                        }
                        div {
                            class: "col-span-2 flex justify-end pt-7",
                            button {
                                r#type: "button",
                                class: "text-xs text-slate-400 hover:text-rose-400 disabled:opacity-40",
                                disabled: !can_remove,
                                onclick: move |_| {
                                    if let Err(e) = form.write().remove_row(ENTRIES, index) {
                                        tracing::warn!(error = %e, "could not remove line item");
                                    }
                                },
                                "Remove"
                            }
                        }
                    }
                }

                div {
                    class: "grid grid-cols-12 gap-3 px-3 py-2 text-sm font-semibold",
                    span { class: "col-span-6 text-slate-300", "Total" }
                    span { class: "col-span-2 text-right text-slate-100", "{format_amount(total_debit)}" }
                    span { class: "col-span-2 text-right text-slate-100", "{format_amount(total_credit)}" }
                    span {
                        class: "col-span-2 text-right text-xs",
                        class: if balanced { "text-green-400" } else { "text-amber-400" },
                        if balanced { "Balanced" } else { "Off by {format_amount(difference)}" }
                    }
                }
            }
        }
    }
}

fn row_field(index: usize, column: &str) -> String {
    civic_forms::values::row_path(ENTRIES, index, column)
}

/// Amount with two decimals and thousands separators
pub fn format_amount(amount: f64) -> String {
    let fixed = format!("{:.2}", amount.abs());
    let (whole, cents) = fixed.split_once('.').unwrap_or((&fixed, "00"));
    let mut grouped = String::new();
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    let sign = if amount < 0.0 { "-" } else { "" };
    format!("{}{}.{}", sign, grouped, cents)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use civic_forms::SubmitGate;

    fn filled_form() -> FormState {
        let mut form = journal_form(&EngineConfig::default()).unwrap();
        form.set_field("jev_no", "2024-06-0012").unwrap();
        form.set_field("particulars", "Payment of office supplies").unwrap();
        form.set_field("entries.0.account", "50203010").unwrap();
        form.set_field("entries.0.debit", 100.0).unwrap();
        form.set_field("entries.0.credit", 0.0).unwrap();
        form.set_field("entries.1.account", "10101010").unwrap();
        form.set_field("entries.1.debit", 0.0).unwrap();
        form.set_field("entries.1.credit", 100.0).unwrap();
        form
    }

    #[test]
    fn test_bundled_schema_loads() {
        let form = journal_form(&EngineConfig::default()).unwrap();
        assert_eq!(form.row_count(ENTRIES), STARTING_ROWS);
        assert!(form.descriptor("particulars").is_some());
        assert!(form.descriptor("entries.1.credit").is_some());
        assert_eq!(header_fields(&form).len(), 5);
    }

    #[test]
    fn test_new_voucher_drops_added_rows() {
        let mut form = filled_form();
        for _ in 0..4 {
            form.add_row(ENTRIES, &line_template()).unwrap();
        }
        form.set_field("entries.5.debit", 25.0).unwrap();
        assert_eq!(form.row_count(ENTRIES), 6);

        start_new_voucher(&mut form).unwrap();
        assert_eq!(form.row_count(ENTRIES), STARTING_ROWS);
        assert!(form.descriptor("entries.5.debit").is_none());
        assert!(form.descriptor("entries.1.credit").is_some());
        assert!(form.value("entries.0.debit").is_unset());
        assert_eq!(form.value("fund"), &civic_core::FieldValue::from("01"));
        assert!(!form.is_dirty());
    }

    #[test]
    fn test_balanced_voucher_submits() {
        let mut form = filled_form();
        assert!(matches!(form.begin_submit(), SubmitGate::Ready(_)));
    }

    #[test]
    fn test_unbalanced_voucher_blocked() {
        let mut form = filled_form();
        form.set_field("entries.1.credit", 50.0).unwrap();
        assert!(matches!(form.begin_submit(), SubmitGate::Invalid(_)));
        assert_eq!(form.form_errors(), ["Total Debit must equal Total Credit"]);
    }

    #[test]
    fn test_jev_number_pattern() {
        let mut form = filled_form();
        form.set_field("jev_no", "JEV-12").unwrap();
        assert!(matches!(form.begin_submit(), SubmitGate::Invalid(_)));
        assert_eq!(form.error("jev_no"), Some("JEV No. must look like 2024-01-0001"));
    }

    #[test]
    fn test_closed_posting_period() {
        let old = FormValues::new().with("date", "2019-12-31");
        assert!(check_posting_period(&old).is_err());
        assert!(check_posting_period(&new_voucher_values()).is_ok());
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(0.0), "0.00");
        assert_eq!(format_amount(1234567.5), "1,234,567.50");
        assert_eq!(format_amount(-950.0), "-950.00");
    }
}
