//! Form value map and dot-path helpers
//!
//! Field names double as paths: `payee`, `entries.0.debit`. Line-item rows
//! live under a prefix and a numeric segment; rule patterns may use `*` in
//! place of that segment.

use civic_core::FieldValue;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

static NULL_VALUE: FieldValue = FieldValue::Null;

// ============================================================================
// FormValues
// ============================================================================

/// Mapping from field name to its current value
///
/// Lookup is by key; iteration order is the key order and carries no
/// meaning for the form.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormValues(BTreeMap<String, FieldValue>);

impl FormValues {
    /// Create an empty value map
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.0.insert(name.into(), value.into());
        self
    }

    /// Get a value if the key exists
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.0.get(name)
    }

    /// Get a value, treating missing keys as `Null`
    pub fn value(&self, name: &str) -> &FieldValue {
        self.0.get(name).unwrap_or(&NULL_VALUE)
    }

    /// Get a mutable value
    pub fn get_mut(&mut self, name: &str) -> Option<&mut FieldValue> {
        self.0.get_mut(name)
    }

    /// Set a value, returning the previous one
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Option<FieldValue> {
        self.0.insert(name.into(), value.into())
    }

    /// Remove a value
    pub fn remove(&mut self, name: &str) -> Option<FieldValue> {
        self.0.remove(name)
    }

    /// Check whether a key exists
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    /// Whether the field is missing or holds an unset value
    pub fn is_unset(&self, name: &str) -> bool {
        self.value(name).is_unset()
    }

    /// Text value of a field
    pub fn text(&self, name: &str) -> Option<&str> {
        self.value(name).as_text()
    }

    /// Numeric value of a field
    pub fn number(&self, name: &str) -> Option<f64> {
        self.value(name).as_number()
    }

    /// Date value of a field
    pub fn date(&self, name: &str) -> Option<NaiveDate> {
        self.value(name).as_date()
    }

    /// Iterate over `(name, value)` pairs
    pub fn iter(&self) -> impl Iterator<Item = (&String, &FieldValue)> {
        self.0.iter()
    }

    /// Iterate over field names
    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.0.keys()
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the map is empty
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Consume into the underlying map
    pub fn into_inner(self) -> BTreeMap<String, FieldValue> {
        self.0
    }

    /// Row indices present under `prefix`, ascending
    pub fn row_indices(&self, prefix: &str) -> Vec<usize> {
        self.0
            .keys()
            .filter_map(|name| parse_row_path(prefix, name).map(|(index, _)| index))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Sum of `prefix.*.column` over all rows; unset cells count as zero
    pub fn column_total(&self, prefix: &str, column: &str) -> f64 {
        self.0
            .iter()
            .filter(|(name, _)| {
                parse_row_path(prefix, name).is_some_and(|(_, rest)| rest == column)
            })
            .map(|(_, value)| value.amount())
            .sum()
    }
}

impl<K: Into<String>, V: Into<FieldValue>> FromIterator<(K, V)> for FormValues {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl From<BTreeMap<String, FieldValue>> for FormValues {
    fn from(map: BTreeMap<String, FieldValue>) -> Self {
        Self(map)
    }
}

// ============================================================================
// Path Helpers
// ============================================================================

/// Build the name of one line-item cell: `prefix.index.column`
pub fn row_path(prefix: &str, index: usize, column: &str) -> String {
    format!("{}.{}.{}", prefix, index, column)
}

/// Split `prefix.index.rest` into `(index, rest)`
pub fn parse_row_path<'a>(prefix: &str, name: &'a str) -> Option<(usize, &'a str)> {
    let tail = name.strip_prefix(prefix)?.strip_prefix('.')?;
    let (index, rest) = tail.split_once('.')?;
    let index = index.parse::<usize>().ok()?;
    (!rest.is_empty()).then_some((index, rest))
}

/// Match a concrete name against a pattern where `*` stands for one segment
///
/// Returns the segments captured by each `*`, in order.
pub fn match_pattern<'a>(pattern: &str, name: &'a str) -> Option<Vec<&'a str>> {
    let mut captures = Vec::new();
    let mut pattern_segments = pattern.split('.');
    let mut name_segments = name.split('.');
    loop {
        match (pattern_segments.next(), name_segments.next()) {
            (None, None) => return Some(captures),
            (Some("*"), Some(segment)) => captures.push(segment),
            (Some(p), Some(segment)) if p == segment => {}
            _ => return None,
        }
    }
}

/// Replace each `*` in `pattern` with the next capture
///
/// Patterns with more wildcards than captures keep the extra `*` segments.
pub fn fill_pattern(pattern: &str, captures: &[&str]) -> String {
    let mut remaining = captures.iter();
    pattern
        .split('.')
        .map(|segment| {
            if segment == "*" {
                remaining.next().copied().unwrap_or("*")
            } else {
                segment
            }
        })
        .collect::<Vec<_>>()
        .join(".")
}

/// Whether a pattern still contains wildcards
pub fn is_pattern(name: &str) -> bool {
    name.split('.').any(|segment| segment == "*")
}

// ============================================================================
// Tests
// ============================================================================
