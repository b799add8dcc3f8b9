#![forbid(unsafe_code)]

//! Events emitted toward the embedding component.

use crate::geometry::Rect;
use crate::viewport::ScrollDirection;

/// Hint for external pagination UIs.
///
/// Fired whenever the virtual index or pool size changes.
#[derive(Debug, Clone, PartialEq)]
pub struct PaginationHint {
    /// Number of slots in the pool.
    pub count: usize,
    /// Current scroll direction, if known.
    pub direction: Option<ScrollDirection>,
    /// Current virtual index.
    pub index: usize,
    /// Bounding box of a representative item.
    pub item_box: Rect,
    /// Bounding box of the host viewport.
    pub host_box: Rect,
    /// Items per line.
    pub per_line: usize,
}

/// Event produced by the feed toward its consumer.
#[derive(Debug, Clone, PartialEq)]
pub enum FeedEvent<I> {
    /// The live window slice changed; `items` drives external rendering.
    CurrentItemsChanged {
        /// The window slice, in display order.
        items: Vec<I>,
    },
    /// Virtual index or pool size changed.
    PaginationChanged(PaginationHint),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_compare_by_value() {
        let a: FeedEvent<u32> = FeedEvent::CurrentItemsChanged {
            items: vec![1, 2, 3],
        };
        let b = FeedEvent::CurrentItemsChanged {
            items: vec![1, 2, 3],
        };
        assert_eq!(a, b);
    }
}
