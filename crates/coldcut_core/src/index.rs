//! Reverse index from media identity to referencing objects.

use crate::ObjectRef;
use std::collections::HashMap;

/// Mapping from media id to the objects that reference it.
///
/// Each object appears at most once per media id, in first-seen order.
///
/// # Examples
///
/// ```
/// use coldcut_core::{ObjectRef, ReferenceIndex};
///
/// let episode = ObjectRef {
///     id: "ep-1".into(),
///     slug: "late-night".into(),
///     title: "Late Night".into(),
///     object_type: "episodes".into(),
///     field: "image".into(),
///     external_url: None,
/// };
///
/// let mut index = ReferenceIndex::default();
/// assert!(index.insert("media-1", episode.clone()));
/// assert!(!index.insert("media-1", episode));
/// assert_eq!(index.references("media-1").len(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReferenceIndex {
    entries: HashMap<String, Vec<ObjectRef>>,
}

impl ReferenceIndex {
    /// Record that `object` references `media_id`.
    ///
    /// Returns false when the object was already recorded for that media.
    pub fn insert(&mut self, media_id: &str, object: ObjectRef) -> bool {
        let refs = self.entries.entry(media_id.to_string()).or_default();
        if refs.iter().any(|existing| existing.id == object.id) {
            return false;
        }
        refs.push(object);
        true
    }

    /// Objects referencing the given media, empty when none do.
    pub fn references(&self, media_id: &str) -> &[ObjectRef] {
        self.entries.get(media_id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of media items with at least one reference.
    pub fn referenced_media(&self) -> usize {
        self.entries.values().filter(|refs| !refs.is_empty()).count()
    }

    /// Total number of (media, object) pairs.
    pub fn total_references(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    /// True when nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.total_references() == 0
    }
}
