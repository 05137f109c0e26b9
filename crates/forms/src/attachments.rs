//! Attachment list
//!
//! An attachment field holds persisted references and newly selected files
//! side by side. New files are appended, never replacing earlier entries;
//! removal is by index and shifts later entries down.

use civic_core::{AttachmentRef, FieldValue, FormError, FormResult, PendingFile};

/// Ordered attachment entries of one field
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AttachmentList {
    field: String,
    items: Vec<AttachmentRef>,
}

impl AttachmentList {
    /// Create an empty list for `field`
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            items: Vec::new(),
        }
    }

    /// Build from entries
    pub fn with_items(field: impl Into<String>, items: Vec<AttachmentRef>) -> Self {
        Self {
            field: field.into(),
            items,
        }
    }

    /// Read the list out of a field value; other variants read as empty
    pub fn from_value(field: impl Into<String>, value: &FieldValue) -> Self {
        let items = value.as_attachments().map(<[_]>::to_vec).unwrap_or_default();
        Self::with_items(field, items)
    }

    /// Field this list belongs to
    pub fn field(&self) -> &str {
        &self.field
    }

    /// Append newly selected files after the current entries
    pub fn add(&mut self, files: impl IntoIterator<Item = PendingFile>) {
        self.items.extend(files.into_iter().map(AttachmentRef::New));
    }

    /// Append already persisted references
    pub fn add_existing(&mut self, refs: impl IntoIterator<Item = AttachmentRef>) {
        self.items.extend(refs);
    }

    /// Remove the entry at `index`
    pub fn remove(&mut self, index: usize) -> FormResult<AttachmentRef> {
        if index >= self.items.len() {
            return Err(FormError::AttachmentIndex {
                field: self.field.clone(),
                index,
                len: self.items.len(),
            });
        }
        Ok(self.items.remove(index))
    }

    /// All entries in order
    pub fn items(&self) -> &[AttachmentRef] {
        &self.items
    }

    /// Persisted entries
    pub fn existing(&self) -> Vec<&AttachmentRef> {
        self.items.iter().filter(|a| a.is_existing()).collect()
    }

    /// Files waiting to be uploaded
    pub fn pending(&self) -> Vec<&PendingFile> {
        self.items
            .iter()
            .filter_map(|a| match a {
                AttachmentRef::New(file) => Some(file),
                AttachmentRef::Existing { .. } => None,
            })
            .collect()
    }

    /// Ids of persisted entries still in the list
    pub fn kept_ids(&self) -> Vec<&str> {
        self.items
            .iter()
            .filter_map(|a| match a {
                AttachmentRef::Existing { existing_id, .. } => Some(existing_id.as_str()),
                AttachmentRef::New(_) => None,
            })
            .collect()
    }

    /// Ids present in `original` but no longer in this list
    pub fn removed_since(&self, original: &AttachmentList) -> Vec<String> {
        let kept = self.kept_ids();
        original
            .kept_ids()
            .into_iter()
            .filter(|id| !kept.contains(id))
            .map(str::to_string)
            .collect()
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the list is empty
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Convert back into a field value
    pub fn into_value(self) -> FieldValue {
        FieldValue::Attachments(self.items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(name: &str) -> PendingFile {
        PendingFile::new(name, name.as_bytes().to_vec())
    }

    #[test]
    fn test_add_appends() {
        let mut list = AttachmentList::with_items(
            "documents",
            vec![AttachmentRef::existing("9", "death-certificate.pdf")],
        );
        list.add(vec![file("a.png")]);
        list.add(vec![file("b.png")]);
        let names: Vec<_> = list.items().iter().map(AttachmentRef::display_name).collect();
        assert_eq!(names, vec!["death-certificate.pdf", "a.png", "b.png"]);
    }

    #[test]
    fn test_remove_middle_keeps_order() {
        let mut list = AttachmentList::new("documents");
        list.add(vec![file("first"), file("second"), file("third")]);
        let removed = list.remove(1).unwrap();
        assert_eq!(removed.display_name(), "second");
        let names: Vec<_> = list.items().iter().map(AttachmentRef::display_name).collect();
        assert_eq!(names, vec!["first", "third"]);
    }

    #[test]
    fn test_remove_out_of_range() {
        let mut list = AttachmentList::new("documents");
        let err = list.remove(0).unwrap_err();
        assert!(matches!(
            err,
            FormError::AttachmentIndex { index: 0, len: 0, .. }
        ));
    }

    #[test]
    fn test_existing_and_pending_views() {
        let mut list = AttachmentList::with_items(
            "documents",
            vec![
                AttachmentRef::existing("1", "deed.pdf"),
                AttachmentRef::existing("2", "tax-dec.pdf"),
            ],
        );
        list.add(vec![file("scan.jpg")]);
        assert_eq!(list.existing().len(), 2);
        assert_eq!(list.pending().len(), 1);
        assert_eq!(list.kept_ids(), vec!["1", "2"]);

        let original = list.clone();
        list.remove(0).unwrap();
        assert_eq!(list.kept_ids(), vec!["2"]);
        assert_eq!(list.removed_since(&original), vec!["1".to_string()]);
    }

    #[test]
    fn test_from_value_tolerates_other_variants() {
        let list = AttachmentList::from_value("documents", &FieldValue::Null);
        assert!(list.is_empty());
        let list = AttachmentList::from_value("documents", &FieldValue::List(vec![]));
        assert!(list.is_empty());
    }
}
