//! Searchable option selection
//!
//! Option lists come from the page (usually fetched reference data such as
//! the chart of accounts). `None` means the list is still loading.

use civic_core::SelectOption;

/// Result of filtering options by a query
#[derive(Debug, Clone, PartialEq)]
pub enum OptionMatches<'a> {
    /// Matching options in their original order (possibly empty while loading)
    Options(Vec<&'a SelectOption>),
    /// The query matched nothing
    NoResults,
}

impl<'a> OptionMatches<'a> {
    /// Matching options; empty for `NoResults`
    pub fn options(&self) -> &[&'a SelectOption] {
        match self {
            OptionMatches::Options(options) => options,
            OptionMatches::NoResults => &[],
        }
    }

    pub fn is_no_results(&self) -> bool {
        matches!(self, OptionMatches::NoResults)
    }
}

/// Case-insensitive substring match on labels
///
/// An empty query returns every option in order; whitespace counts as
/// query text. A missing list yields no options without reporting
/// "no results".
pub fn filter_options<'a>(options: Option<&'a [SelectOption]>, query: &str) -> OptionMatches<'a> {
    let Some(options) = options else {
        return OptionMatches::Options(Vec::new());
    };

    let needle = query.to_lowercase();
    if needle.is_empty() {
        return OptionMatches::Options(options.iter().collect());
    }

    let matches: Vec<&SelectOption> = options
        .iter()
        .filter(|o| o.label.to_lowercase().contains(&needle))
        .collect();

    if matches.is_empty() {
        OptionMatches::NoResults
    } else {
        OptionMatches::Options(matches)
    }
}

/// Label of the option holding `selected`, or `""` when none does
pub fn display_label<'a>(options: Option<&'a [SelectOption]>, selected: &str) -> &'a str {
    if selected.is_empty() {
        return "";
    }
    match options.and_then(|opts| opts.iter().find(|o| o.value == selected)) {
        Some(option) => option.label.as_str(),
        None => {
            if options.is_some() {
                tracing::warn!(value = selected, "selected value has no matching option");
            }
            ""
        }
    }
}

/// Query text and open flag of one searchable select
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectorState {
    pub query: String,
    pub open: bool,
}

impl SelectorState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Update the query and open the list
    pub fn search(&mut self, query: impl Into<String>) {
        self.query = query.into();
        self.open = true;
    }

    /// Pick an option: close the list and return its value
    pub fn choose(&mut self, option: &SelectOption) -> Option<String> {
        if option.disabled {
            return None;
        }
        self.query.clear();
        self.open = false;
        Some(option.value.clone())
    }

    /// Clear the query; the returned empty string is the new selection
    pub fn clear(&mut self) -> String {
        self.query.clear();
        self.open = false;
        String::new()
    }

    pub fn toggle(&mut self) {
        self.open = !self.open;
    }

    pub fn close(&mut self) {
        self.open = false;
    }
}
