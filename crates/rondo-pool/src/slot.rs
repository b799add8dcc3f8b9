#![forbid(unsafe_code)]

//! Slot identity and per-slot state.
//!
//! The pool owns all transient slot state in a flat vector keyed by
//! [`SlotId`]; the rendered container itself is an opaque handle the pool
//! never touches.

use rondo_core::geometry::{Offset, Rect};

/// Stable identity of a visual slot: its position within the pool.
///
/// Assigned once when the pool is sized and stable for the slot's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SlotId(pub usize);

/// Visibility classification reported by geometry feedback for one slot.
///
/// The pre-load margin widens the region treated as still visible ahead of
/// the viewport, so `Visible` here may extend past the literal viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SlotVisibility {
    /// Inside the (margin-widened) viewport.
    Visible,
    /// Fully outside it.
    #[default]
    Hidden,
}

/// Pool-owned state for one visual slot.
#[derive(Debug, Clone, Default)]
pub struct SlotRecord {
    /// Logical index into the master sequence this slot currently displays.
    pub logical_index: usize,
    /// Last applied screen-space translation.
    pub previous_offset: Offset,
    /// Cached bounding rectangle from the latest geometry sample.
    pub size_box: Rect,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slot_ids_order_by_pool_position() {
        let mut ids = vec![SlotId(3), SlotId(0), SlotId(2)];
        ids.sort();
        assert_eq!(ids, vec![SlotId(0), SlotId(2), SlotId(3)]);
    }

    #[test]
    fn default_visibility_is_hidden() {
        assert_eq!(SlotVisibility::default(), SlotVisibility::Hidden);
    }
}
