#![forbid(unsafe_code)]

//! Viewport state and the virtual index calculation.
//!
//! The virtual index is the logical position in the full collection that is
//! currently aligned with the viewport's leading edge. It is derived, never
//! stored authoritatively: [`virtual_index`] is pure and safe to call every
//! frame.

use crate::geometry::{Axis, Rect};

/// Direction of travel along the scroll axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollDirection {
    /// Toward larger offsets (down/right).
    Forward,
    /// Toward smaller offsets (up/left).
    Reverse,
}

impl ScrollDirection {
    /// The opposite direction.
    #[must_use]
    pub fn opposite(self) -> Self {
        match self {
            Self::Forward => Self::Reverse,
            Self::Reverse => Self::Forward,
        }
    }
}

/// Convert a scroll offset into a logical index into the master sequence.
///
/// `item_start` is the leading-edge coordinate of the first item. Returns 0
/// when `item_size` is zero, negative, or not yet measured (NaN) — missing
/// geometry is never an error here, dependents simply see index 0.
#[must_use]
pub fn virtual_index(
    scroll_offset: f64,
    item_start: f64,
    item_size: f64,
    items_per_line: usize,
) -> usize {
    if !(item_size.is_finite() && item_size > 0.0) || !scroll_offset.is_finite() {
        return 0;
    }
    let rows = ((scroll_offset - item_start).abs() / item_size).floor();
    (rows as usize).saturating_mul(items_per_line.max(1))
}

/// Per-tick viewport snapshot.
///
/// Recomputed on every scroll/resize tick by the orchestrator; ephemeral.
/// `direction` transitions only on an actual scroll-offset delta.
#[derive(Debug, Clone, Default)]
pub struct ViewportState {
    /// Current scroll offset along the axis, px.
    pub scroll_offset: f64,
    /// Direction of the most recent offset delta; `None` until first scroll.
    pub direction: Option<ScrollDirection>,
    /// Host viewport extent along the axis, px.
    pub host_size: f64,
    /// Uniform item extent along the axis, px. 0 until measured.
    pub item_size: f64,
    /// Items per line across the axis (1 for a plain list).
    pub items_per_line: usize,
}

impl ViewportState {
    /// Create an unmeasured viewport state.
    #[must_use]
    pub fn new() -> Self {
        Self {
            items_per_line: 1,
            ..Self::default()
        }
    }

    /// Absorb measured geometry from a feedback sample.
    pub fn apply_geometry(&mut self, host_box: &Rect, item_box: &Rect, axis: Axis) {
        self.host_size = host_box.extent(axis);
        if !item_box.is_empty() {
            self.item_size = item_box.extent(axis);
        }
    }

    /// Record a new scroll offset, updating `direction` only on a delta.
    pub fn observe_scroll(&mut self, offset: f64) {
        if !offset.is_finite() {
            return;
        }
        let next = if offset > self.scroll_offset {
            Some(ScrollDirection::Forward)
        } else if offset < self.scroll_offset {
            Some(ScrollDirection::Reverse)
        } else {
            None
        };
        if let Some(direction) = next {
            #[cfg(feature = "tracing")]
            if self.direction != Some(direction) {
                tracing::trace!(offset, ?direction, "scroll direction changed");
            }
            self.direction = Some(direction);
        }
        self.scroll_offset = offset;
    }

    /// Virtual index at the current scroll position.
    ///
    /// `item_start` is the leading edge of the first item in host space.
    #[must_use]
    pub fn virtual_index(&self, item_start: f64) -> usize {
        virtual_index(
            self.scroll_offset,
            item_start,
            self.item_size,
            self.items_per_line,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn zero_item_size_yields_zero() {
        assert_eq!(virtual_index(900.0, 0.0, 0.0, 1), 0);
        assert_eq!(virtual_index(900.0, 0.0, -5.0, 1), 0);
        assert_eq!(virtual_index(900.0, 0.0, f64::NAN, 1), 0);
    }

    #[test]
    fn offset_900_maps_to_index_6() {
        // 100 items, 150px each, one per line: offset 900 → index 6.
        assert_eq!(virtual_index(900.0, 0.0, 150.0, 1), 6);
    }

    #[test]
    fn items_per_line_scales_index() {
        assert_eq!(virtual_index(900.0, 0.0, 150.0, 3), 18);
    }

    #[test]
    fn item_start_shifts_origin() {
        assert_eq!(virtual_index(900.0, 300.0, 150.0, 1), 4);
    }

    #[test]
    fn items_per_line_zero_treated_as_one() {
        assert_eq!(virtual_index(450.0, 0.0, 150.0, 0), 3);
    }

    #[test]
    fn direction_updates_only_on_delta() {
        let mut vp = ViewportState::new();
        assert_eq!(vp.direction, None);
        vp.observe_scroll(0.0);
        assert_eq!(vp.direction, None);
        vp.observe_scroll(10.0);
        assert_eq!(vp.direction, Some(ScrollDirection::Forward));
        vp.observe_scroll(10.0);
        assert_eq!(vp.direction, Some(ScrollDirection::Forward));
        vp.observe_scroll(5.0);
        assert_eq!(vp.direction, Some(ScrollDirection::Reverse));
    }

    #[test]
    fn non_finite_scroll_is_ignored() {
        let mut vp = ViewportState::new();
        vp.observe_scroll(100.0);
        vp.observe_scroll(f64::NAN);
        assert_eq!(vp.scroll_offset, 100.0);
    }

    #[test]
    fn apply_geometry_skips_empty_item_box() {
        let mut vp = ViewportState::new();
        vp.apply_geometry(
            &Rect::new(0.0, 0.0, 400.0, 600.0),
            &Rect::default(),
            Axis::Vertical,
        );
        assert_eq!(vp.host_size, 600.0);
        assert_eq!(vp.item_size, 0.0);
        vp.apply_geometry(
            &Rect::new(0.0, 0.0, 400.0, 600.0),
            &Rect::new(0.0, 0.0, 400.0, 150.0),
            Axis::Vertical,
        );
        assert_eq!(vp.item_size, 150.0);
    }

    proptest! {
        // virtual_index is monotonically non-decreasing in scroll_offset.
        #[test]
        fn monotone_in_scroll_offset(
            a in 0.0f64..1_000_000.0,
            delta in 0.0f64..1_000_000.0,
            item_size in 1.0f64..10_000.0,
            per_line in 1usize..8,
        ) {
            let lo = virtual_index(a, 0.0, item_size, per_line);
            let hi = virtual_index(a + delta, 0.0, item_size, per_line);
            prop_assert!(hi >= lo);
        }

        // Index is always a multiple of items_per_line.
        #[test]
        fn index_aligned_to_line(
            offset in 0.0f64..1_000_000.0,
            item_size in 1.0f64..10_000.0,
            per_line in 1usize..8,
        ) {
            let idx = virtual_index(offset, 0.0, item_size, per_line);
            prop_assert_eq!(idx % per_line, 0);
        }
    }
}
