#![forbid(unsafe_code)]

//! The backing array.
//!
//! An ordered sequence of optional records. Splices grow the array lazily;
//! released entries become `None` while the array keeps its length, so
//! index meaning is preserved across garbage collection.

use std::ops::Range;

use crate::source::{Cursor, LogicalItem};

/// Backing array of logical items, indexed by logical position.
#[derive(Debug, Clone, Default)]
pub struct BackingStore<T> {
    entries: Vec<Option<LogicalItem<T>>>,
}

impl<T> BackingStore<T> {
    /// An empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Current array length, including released (`None`) entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no entry has ever been spliced in.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of live (non-released) entries.
    #[must_use]
    pub fn loaded_count(&self) -> usize {
        self.entries.iter().filter(|e| e.is_some()).count()
    }

    /// The raw entries, for window derivation.
    #[must_use]
    pub fn entries(&self) -> &[Option<LogicalItem<T>>] {
        &self.entries
    }

    /// The record at `index`, if loaded.
    #[must_use = "use the returned record (if any)"]
    pub fn get(&self, index: usize) -> Option<&LogicalItem<T>> {
        self.entries.get(index).and_then(|e| e.as_ref())
    }

    /// The cursor of the record at `index`, if loaded.
    #[must_use = "use the returned cursor (if any)"]
    pub fn cursor_at(&self, index: usize) -> Option<&Cursor> {
        self.get(index).and_then(|item| item.cursor.as_ref())
    }

    /// The loaded cursor-bearing record nearest to `index`, with its
    /// position. Ties resolve to the lower index.
    #[must_use = "use the returned cursor (if any)"]
    pub fn nearest_cursor(&self, index: usize) -> Option<(usize, &Cursor)> {
        self.entries
            .iter()
            .enumerate()
            .filter_map(|(i, entry)| {
                entry
                    .as_ref()
                    .and_then(|item| item.cursor.as_ref())
                    .map(|cursor| (i, cursor))
            })
            .min_by_key(|&(i, _)| (i.abs_diff(index), i))
    }

    /// Splice `items` into the array starting at `start`.
    ///
    /// The array grows with `None` entries as needed; existing entries in
    /// the spliced range are overwritten in place.
    pub fn splice(&mut self, start: usize, items: Vec<LogicalItem<T>>) {
        if items.is_empty() {
            return;
        }
        let end = start + items.len();
        if end > self.entries.len() {
            self.entries.resize_with(end, || None);
        }
        for (slot, item) in self.entries[start..end].iter_mut().zip(items) {
            *slot = Some(item);
        }
    }

    /// Release the entries in `range`, clamped to the array bounds.
    ///
    /// Array length and index meaning are preserved. Returns the number of
    /// live entries released; an empty or out-of-bounds range is a no-op.
    pub fn release_range(&mut self, range: Range<usize>) -> usize {
        let start = range.start.min(self.entries.len());
        let end = range.end.min(self.entries.len());
        let mut released = 0;
        for entry in &mut self.entries[start..end] {
            if entry.take().is_some() {
                released += 1;
            }
        }
        released
    }

    /// Reset the array to empty.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(n: u32) -> LogicalItem<u32> {
        LogicalItem::new(n, Cursor::new(format!("c{n}")))
    }

    #[test]
    fn splice_grows_with_nulls() {
        let mut store = BackingStore::new();
        store.splice(3, vec![item(3), item(4)]);
        assert_eq!(store.len(), 5);
        assert!(store.get(0).is_none());
        assert_eq!(store.get(3).unwrap().payload, 3);
        assert_eq!(store.loaded_count(), 2);
    }

    #[test]
    fn splice_overwrites_in_place() {
        let mut store = BackingStore::new();
        store.splice(0, vec![item(0), item(1), item(2)]);
        store.splice(1, vec![item(10)]);
        assert_eq!(store.len(), 3);
        assert_eq!(store.get(1).unwrap().payload, 10);
        assert_eq!(store.get(2).unwrap().payload, 2);
    }

    #[test]
    fn empty_splice_is_noop() {
        let mut store: BackingStore<u32> = BackingStore::new();
        store.splice(10, Vec::new());
        assert_eq!(store.len(), 0);
    }

    #[test]
    fn release_preserves_length_and_indices() {
        let mut store = BackingStore::new();
        store.splice(0, (0..10).map(item).collect());
        let released = store.release_range(2..5);
        assert_eq!(released, 3);
        assert_eq!(store.len(), 10);
        assert!(store.get(2).is_none());
        assert!(store.get(4).is_none());
        assert_eq!(store.get(5).unwrap().payload, 5);
    }

    #[test]
    fn release_out_of_bounds_is_clamped() {
        let mut store = BackingStore::new();
        store.splice(0, (0..4).map(item).collect());
        assert_eq!(store.release_range(2..100), 2);
        assert_eq!(store.release_range(50..60), 0);
        assert_eq!(store.len(), 4);
    }

    #[test]
    fn release_already_released_counts_zero() {
        let mut store = BackingStore::new();
        store.splice(0, (0..4).map(item).collect());
        assert_eq!(store.release_range(0..2), 2);
        assert_eq!(store.release_range(0..2), 0);
    }

    #[test]
    fn nearest_cursor_skips_released_entries() {
        let mut store = BackingStore::new();
        store.splice(0, (0..20).map(item).collect());
        store.splice(59, vec![item(59)]);
        store.release_range(10..20);
        // 57 is unloaded; 59 (distance 2) beats 9 (distance 48).
        let (near, cursor) = store.nearest_cursor(57).unwrap();
        assert_eq!(near, 59);
        assert_eq!(cursor.as_str(), "c59");
        // Ties resolve low.
        let (near, _) = store.nearest_cursor(34).unwrap();
        assert_eq!(near, 9);
        store.clear();
        assert!(store.nearest_cursor(0).is_none());
    }

    #[test]
    fn cursor_at_released_entry_is_none() {
        let mut store = BackingStore::new();
        store.splice(0, (0..4).map(item).collect());
        assert!(store.cursor_at(1).is_some());
        store.release_range(1..2);
        assert!(store.cursor_at(1).is_none());
    }
}
