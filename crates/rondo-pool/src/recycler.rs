#![forbid(unsafe_code)]

//! The per-tick recycling algorithm and the full reposition.
//!
//! Recycling moves only the slots that have unambiguously left the viewport
//! in the direction of travel, translating each by one full pool section so
//! it rejoins the sequence on the far side. Reposition lays out every slot
//! from scratch; it is used on resize and after a programmatic jump, where
//! incremental recycling cannot self-correct drift.

use smallvec::SmallVec;
use tracing::{debug, trace};

use rondo_core::geometry::{Axis, Offset, Rect};
use rondo_core::viewport::ScrollDirection;

use crate::slot::{SlotId, SlotRecord, SlotVisibility};

/// Inline capacity for the per-tick move set. Slow scrolling recycles 0–2
/// slots per tick; fast flings a handful.
const MOVE_SET_INLINE: usize = 8;

/// One slot movement produced by recycling or reposition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlotMove {
    /// Which slot to move.
    pub slot: SlotId,
    /// The new translation to apply to the container.
    pub offset: Offset,
    /// The logical index the slot now represents.
    pub logical_index: usize,
}

/// Per-tick input assembled by the orchestrator from geometry feedback.
#[derive(Debug, Clone, Copy)]
pub struct PoolTick<'a> {
    /// Host viewport bounding box.
    pub host_box: Rect,
    /// Per-slot visibility classification, indexed by pool position.
    pub visibility: &'a [SlotVisibility],
    /// Per-slot bounding boxes, indexed by pool position.
    pub slot_boxes: &'a [Rect],
    /// Direction of travel, if known.
    pub direction: Option<ScrollDirection>,
    /// Backing collection length, when finite. `None` means unbounded.
    pub backing_len: Option<usize>,
}

/// The fixed set of reusable visual slots.
///
/// Pool size is fixed once computed from geometry; it changes only through
/// [`ContainerPool::resize`], which invalidates incremental state and must
/// be followed by a [`ContainerPool::reposition`].
#[derive(Debug, Clone)]
pub struct ContainerPool {
    axis: Axis,
    infinite: bool,
    item_size: f64,
    item_cross: f64,
    items_per_line: usize,
    slots: Vec<SlotRecord>,
    last_direction: Option<ScrollDirection>,
    direction_settled: bool,
    moved_last_tick: usize,
    reposition_count: u64,
}

impl ContainerPool {
    /// Create an empty pool for the given axis.
    #[must_use]
    pub fn new(axis: Axis, infinite: bool) -> Self {
        Self {
            axis,
            infinite,
            item_size: 0.0,
            item_cross: 0.0,
            items_per_line: 1,
            slots: Vec::new(),
            last_direction: None,
            direction_settled: false,
            moved_last_tick: 0,
            reposition_count: 0,
        }
    }

    /// Set items per line (1 for a plain list).
    #[must_use]
    pub fn with_items_per_line(mut self, per_line: usize) -> Self {
        self.items_per_line = per_line.max(1);
        self
    }

    /// Number of slots in the pool.
    #[must_use]
    pub fn pool_size(&self) -> usize {
        self.slots.len()
    }

    /// Slots moved by the most recent recycle tick.
    #[must_use]
    pub fn moved_last_tick(&self) -> usize {
        self.moved_last_tick
    }

    /// Number of full repositions performed.
    #[must_use]
    pub fn reposition_count(&self) -> u64 {
        self.reposition_count
    }

    /// The pool-owned slot records, indexed by pool position.
    #[must_use]
    pub fn records(&self) -> &[SlotRecord] {
        &self.slots
    }

    /// Logical indices currently assigned across the pool, in pool order.
    #[must_use]
    pub fn logical_indices(&self) -> Vec<usize> {
        self.slots.iter().map(|s| s.logical_index).collect()
    }

    /// Absorb the latest item metrics from geometry feedback.
    ///
    /// An empty item box leaves the previous measurement in place.
    pub fn set_metrics(&mut self, item_box: &Rect) {
        if item_box.is_empty() {
            return;
        }
        self.item_size = item_box.extent(self.axis);
        self.item_cross = item_box.cross_extent(self.axis);
    }

    /// Size (or re-size) the pool.
    ///
    /// Slot records are created once here and never recreated while the
    /// size is stable. A size change discards incremental state; the caller
    /// must follow up with [`reposition`](Self::reposition) — resizing
    /// forces a full layout, never incremental recycling.
    pub fn resize(&mut self, pool_size: usize) {
        if pool_size == self.slots.len() {
            return;
        }
        debug!(
            from = self.slots.len(),
            to = pool_size,
            "container pool resized"
        );
        self.slots = (0..pool_size)
            .map(|p| SlotRecord {
                logical_index: p,
                ..SlotRecord::default()
            })
            .collect();
        self.last_direction = None;
        self.direction_settled = false;
        self.moved_last_tick = 0;
    }

    /// Run one recycling cycle against the latest geometry classification.
    ///
    /// Returns the (usually empty or tiny) set of slot moves to apply.
    /// No-ops when direction is unknown, on the deferred frame after a
    /// direction flip, when nothing is hidden, or when no hidden slot has
    /// fully crossed the reference edge.
    pub fn recycle(&mut self, tick: &PoolTick<'_>) -> SmallVec<[SlotMove; MOVE_SET_INLINE]> {
        self.moved_last_tick = 0;
        let mut moves = SmallVec::new();

        let Some(direction) = tick.direction else {
            return moves;
        };
        if self.slots.is_empty() || self.item_size <= 0.0 {
            return moves;
        }

        // Single-frame deferred lock: a flip is observed this tick and
        // acted on the next, so the pool finishes reconciling the previous
        // direction first.
        if self.last_direction != Some(direction) {
            self.last_direction = Some(direction);
            self.direction_settled = false;
            trace!(?direction, "direction flip observed, deferring one tick");
            return moves;
        }
        if !self.direction_settled {
            self.direction_settled = true;
        }

        // Refresh cached boxes and partition by visibility.
        let mut visible: SmallVec<[usize; MOVE_SET_INLINE]> = SmallVec::new();
        let mut hidden: SmallVec<[usize; MOVE_SET_INLINE]> = SmallVec::new();
        for p in 0..self.slots.len() {
            if let Some(rect) = tick.slot_boxes.get(p) {
                self.slots[p].size_box = *rect;
            }
            match tick.visibility.get(p).copied().unwrap_or_default() {
                SlotVisibility::Visible => visible.push(p),
                SlotVisibility::Hidden => hidden.push(p),
            }
        }
        if hidden.is_empty() || visible.is_empty() {
            return moves;
        }

        let axis = self.axis;
        // Reference edge: the visible slot closest to the viewport's
        // leading edge (forward) or trailing edge (reverse).
        let reference = match direction {
            ScrollDirection::Forward => {
                let lead = tick.host_box.leading(axis);
                visible
                    .iter()
                    .map(|&p| self.slots[p].size_box.leading(axis))
                    .min_by(|a, b| {
                        (a - lead)
                            .abs()
                            .partial_cmp(&(b - lead).abs())
                            .unwrap_or(std::cmp::Ordering::Equal)
                    })
            }
            ScrollDirection::Reverse => {
                let trail = tick.host_box.trailing(axis);
                visible
                    .iter()
                    .map(|&p| self.slots[p].size_box.trailing(axis))
                    .min_by(|a, b| {
                        (a - trail)
                            .abs()
                            .partial_cmp(&(b - trail).abs())
                            .unwrap_or(std::cmp::Ordering::Equal)
                    })
            }
        };
        let Some(reference) = reference else {
            return moves;
        };

        // Only slots that have fully crossed the reference edge in the
        // direction of travel qualify — not the ones merely about to.
        let mut qualifying: SmallVec<[usize; MOVE_SET_INLINE]> = hidden
            .iter()
            .copied()
            .filter(|&p| {
                let rect = &self.slots[p].size_box;
                match direction {
                    ScrollDirection::Forward => rect.trailing(axis) <= reference,
                    ScrollDirection::Reverse => rect.leading(axis) >= reference,
                }
            })
            .collect();
        if qualifying.is_empty() {
            // The common case on slow scroll.
            return moves;
        }

        // Stack in scroll order so simultaneously recycled slots land in
        // distinct positions contiguous with the rest of the sequence.
        qualifying.sort_by(|&a, &b| {
            let la = self.slots[a].size_box.leading(axis);
            let lb = self.slots[b].size_box.leading(axis);
            let ord = la.partial_cmp(&lb).unwrap_or(std::cmp::Ordering::Equal);
            match direction {
                ScrollDirection::Forward => ord,
                ScrollDirection::Reverse => ord.reverse(),
            }
        });

        let pool_size = self.slots.len();
        let sections = pool_size.div_ceil(self.items_per_line);
        let travel = self.item_size * sections as f64;
        let max_extent = tick
            .backing_len
            .filter(|_| !self.infinite)
            .map(|len| self.item_size * len.div_ceil(self.items_per_line) as f64);

        for &p in &qualifying {
            let record = &self.slots[p];
            let (new_main, new_logical) = match direction {
                ScrollDirection::Forward => {
                    let main = record.previous_offset.main(axis) + travel;
                    // Finite bound: never place a slot beyond the maximum
                    // extent of the collection.
                    if let Some(max) = max_extent
                        && main + self.item_size > max
                    {
                        continue;
                    }
                    let logical = record.logical_index + pool_size;
                    let logical = match tick.backing_len.filter(|_| self.infinite) {
                        Some(len) if len > 0 => logical % len,
                        _ => logical,
                    };
                    (main, logical)
                }
                ScrollDirection::Reverse => {
                    let main = record.previous_offset.main(axis) - travel;
                    // Reverse moves are clamped at offset 0.
                    if main < 0.0 {
                        continue;
                    }
                    let wrapped = tick.backing_len.filter(|_| self.infinite).and_then(|len| {
                        (len > 0)
                            .then(|| (record.logical_index + len - pool_size % len) % len)
                    });
                    let logical = match wrapped {
                        Some(l) => l,
                        None => match record.logical_index.checked_sub(pool_size) {
                            Some(l) => l,
                            None => continue,
                        },
                    };
                    (main, logical)
                }
            };
            let offset = Offset::from_axis(
                axis,
                new_main,
                record.previous_offset.cross(axis),
            );
            self.apply_move(p, offset, new_logical, &mut moves);
        }

        self.moved_last_tick = moves.len();
        if !moves.is_empty() {
            debug!(
                moved = moves.len(),
                ?direction,
                "recycled slots across the pool section"
            );
        }
        moves
    }

    fn apply_move(
        &mut self,
        pool_pos: usize,
        offset: Offset,
        logical: usize,
        moves: &mut SmallVec<[SlotMove; MOVE_SET_INLINE]>,
    ) {
        let record = &mut self.slots[pool_pos];
        record.previous_offset = offset;
        record.logical_index = logical;
        moves.push(SlotMove {
            slot: SlotId(pool_pos),
            offset,
            logical_index: logical,
        });
    }

    /// Recompute every slot's offset and logical index from scratch.
    ///
    /// Used on resize/orientation change and after a programmatic jump, to
    /// eliminate drift incremental recycling cannot self-correct.
    /// Idempotent: repeated calls from the same `virtual_index` produce the
    /// same layout. A zero-sized pool or unmeasured item is a no-op.
    pub fn reposition(&mut self, virtual_index: usize, backing_len: Option<usize>) -> Vec<SlotMove> {
        if self.slots.is_empty() || self.item_size <= 0.0 {
            return Vec::new();
        }
        let per_line = self.items_per_line;
        let pool_size = self.slots.len();

        let mut base = (virtual_index / per_line) * per_line;
        if let Some(len) = backing_len.filter(|_| !self.infinite) {
            let max_base = len.saturating_sub(pool_size);
            let max_base = (max_base / per_line) * per_line;
            base = base.min(max_base);
        }

        let mut moves = Vec::with_capacity(pool_size);
        for p in 0..pool_size {
            let mut logical = base + p;
            if self.infinite
                && let Some(len) = backing_len.filter(|&l| l > 0)
            {
                logical %= len;
            }
            let row = (base + p) / per_line;
            let col = (base + p) % per_line;
            let offset = Offset::from_axis(
                self.axis,
                self.item_size * row as f64,
                self.item_cross * col as f64,
            );
            let record = &mut self.slots[p];
            record.previous_offset = offset;
            record.logical_index = logical;
            moves.push(SlotMove {
                slot: SlotId(p),
                offset,
                logical_index: logical,
            });
        }
        self.reposition_count += 1;
        debug!(virtual_index, pool_size, "repositioned pool");
        moves
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const ITEM: f64 = 150.0;

    fn item_box() -> Rect {
        Rect::new(0.0, 0.0, 400.0, ITEM)
    }

    fn host_box() -> Rect {
        // Four items visible.
        Rect::new(0.0, 0.0, 400.0, 600.0)
    }

    /// Pool of 6 slots tiled from row 0, already settled on `direction`.
    fn settled_pool(direction: ScrollDirection) -> ContainerPool {
        let mut pool = ContainerPool::new(Axis::Vertical, false);
        pool.set_metrics(&item_box());
        pool.resize(6);
        pool.reposition(0, None);
        // First tick observes the direction, second acts on it.
        let boxes = tiled_boxes(0.0, 6);
        let vis = vec![SlotVisibility::Visible; 6];
        let tick = PoolTick {
            host_box: host_box(),
            visibility: &vis,
            slot_boxes: &boxes,
            direction: Some(direction),
            backing_len: None,
        };
        assert!(pool.recycle(&tick).is_empty());
        pool
    }

    /// Viewport-space boxes for 6 slots stacked from `first_top`.
    fn tiled_boxes(first_top: f64, count: usize) -> Vec<Rect> {
        (0..count)
            .map(|p| Rect::new(0.0, first_top + ITEM * p as f64, 400.0, ITEM))
            .collect()
    }

    #[test]
    fn no_direction_is_noop() {
        let mut pool = ContainerPool::new(Axis::Vertical, false);
        pool.set_metrics(&item_box());
        pool.resize(6);
        pool.reposition(0, None);
        let boxes = tiled_boxes(0.0, 6);
        let vis = vec![SlotVisibility::Hidden; 6];
        let tick = PoolTick {
            host_box: host_box(),
            visibility: &vis,
            slot_boxes: &boxes,
            direction: None,
            backing_len: None,
        };
        assert!(pool.recycle(&tick).is_empty());
    }

    #[test]
    fn direction_flip_defers_one_tick() {
        let mut pool = settled_pool(ScrollDirection::Forward);
        // Slot 0 scrolled fully out above.
        let boxes = tiled_boxes(-ITEM, 6);
        let mut vis = vec![SlotVisibility::Visible; 6];
        vis[0] = SlotVisibility::Hidden;
        let tick = PoolTick {
            host_box: host_box(),
            visibility: &vis,
            slot_boxes: &boxes,
            direction: Some(ScrollDirection::Reverse),
            backing_len: None,
        };
        // Flip observed: deferred.
        assert!(pool.recycle(&tick).is_empty());
    }

    #[test]
    fn forward_recycle_moves_crossed_slot_by_one_section() {
        let mut pool = settled_pool(ScrollDirection::Forward);
        // Scrolled one item: slot 0's box is fully above the viewport, and
        // the reference edge is slot 1's leading edge at y=0.
        let boxes = tiled_boxes(-ITEM, 6);
        let mut vis = vec![SlotVisibility::Visible; 6];
        vis[0] = SlotVisibility::Hidden;
        let tick = PoolTick {
            host_box: host_box(),
            visibility: &vis,
            slot_boxes: &boxes,
            direction: Some(ScrollDirection::Forward),
            backing_len: None,
        };
        let moves = pool.recycle(&tick);
        assert_eq!(moves.len(), 1);
        assert_eq!(moves[0].slot, SlotId(0));
        // travel = item_size * sections = 150 * 6 = 900
        assert_eq!(moves[0].offset.main(Axis::Vertical), 900.0);
        assert_eq!(moves[0].logical_index, 6);
        assert_eq!(pool.moved_last_tick(), 1);
        // Assigned set stays contiguous: {6,1,2,3,4,5} covers 1..=6.
        let mut indices = pool.logical_indices();
        indices.sort_unstable();
        assert_eq!(indices, vec![1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn hidden_but_not_crossed_is_noop() {
        let mut pool = settled_pool(ScrollDirection::Forward);
        // The classifier's pre-load margin reports slot 0 hidden early,
        // while its trailing edge (85) still overlaps the reference edge
        // (slot 1's leading edge at 75). Not fully crossed, so no move.
        let mut boxes = tiled_boxes(-ITEM / 2.0, 6);
        boxes[0] = Rect::new(0.0, -65.0, 400.0, ITEM);
        let mut vis = vec![SlotVisibility::Visible; 6];
        vis[0] = SlotVisibility::Hidden;
        let tick = PoolTick {
            host_box: host_box(),
            visibility: &vis,
            slot_boxes: &boxes,
            direction: Some(ScrollDirection::Forward),
            backing_len: None,
        };
        assert!(pool.recycle(&tick).is_empty());
    }

    #[test]
    fn all_visible_is_noop() {
        let mut pool = settled_pool(ScrollDirection::Forward);
        let boxes = tiled_boxes(0.0, 6);
        let vis = vec![SlotVisibility::Visible; 6];
        let tick = PoolTick {
            host_box: host_box(),
            visibility: &vis,
            slot_boxes: &boxes,
            direction: Some(ScrollDirection::Forward),
            backing_len: None,
        };
        assert!(pool.recycle(&tick).is_empty());
    }

    #[test]
    fn multiple_crossed_slots_stack_in_scroll_order() {
        let mut pool = settled_pool(ScrollDirection::Forward);
        // Fast fling: slots 0 and 1 both fully above the viewport.
        let boxes = tiled_boxes(-2.0 * ITEM, 6);
        let mut vis = vec![SlotVisibility::Visible; 6];
        vis[0] = SlotVisibility::Hidden;
        vis[1] = SlotVisibility::Hidden;
        let tick = PoolTick {
            host_box: host_box(),
            visibility: &vis,
            slot_boxes: &boxes,
            direction: Some(ScrollDirection::Forward),
            backing_len: None,
        };
        let moves = pool.recycle(&tick);
        assert_eq!(moves.len(), 2);
        // Scroll order: slot 0 first (topmost), lands at 900; slot 1 at 1050.
        assert_eq!(moves[0].slot, SlotId(0));
        assert_eq!(moves[0].offset.main(Axis::Vertical), 900.0);
        assert_eq!(moves[1].slot, SlotId(1));
        assert_eq!(moves[1].offset.main(Axis::Vertical), 1050.0);
        let mut indices = pool.logical_indices();
        indices.sort_unstable();
        assert_eq!(indices, vec![2, 3, 4, 5, 6, 7]);
    }

    #[test]
    fn forward_recycle_clamped_at_backing_extent() {
        let mut pool = settled_pool(ScrollDirection::Forward);
        let boxes = tiled_boxes(-ITEM, 6);
        let mut vis = vec![SlotVisibility::Visible; 6];
        vis[0] = SlotVisibility::Hidden;
        // Backing has only 6 items: max extent 900, so a move to 900 would
        // end at 1050 > 900 and must be suppressed.
        let tick = PoolTick {
            host_box: host_box(),
            visibility: &vis,
            slot_boxes: &boxes,
            direction: Some(ScrollDirection::Forward),
            backing_len: Some(6),
        };
        assert!(pool.recycle(&tick).is_empty());
        // With 7 items (max extent 1050) the same move fits exactly.
        let tick = PoolTick {
            backing_len: Some(7),
            ..tick
        };
        let moves = pool.recycle(&tick);
        assert_eq!(moves.len(), 1);
        assert_eq!(moves[0].offset.main(Axis::Vertical), 900.0);
    }

    #[test]
    fn reverse_recycle_moves_trailing_slot_back() {
        let mut pool = settled_pool(ScrollDirection::Reverse);
        // Pool shifted to rows 6..11 first.
        pool.reposition(6, None);
        // Scrolled back up: the last slot sits fully below every visible
        // trailing edge.
        let boxes = tiled_boxes(-3.0 * ITEM, 6);
        let mut vis = vec![SlotVisibility::Visible; 6];
        vis[5] = SlotVisibility::Hidden;
        let tick = PoolTick {
            host_box: host_box(),
            visibility: &vis,
            slot_boxes: &boxes,
            direction: Some(ScrollDirection::Reverse),
            backing_len: None,
        };
        let moves = pool.recycle(&tick);
        assert_eq!(moves.len(), 1);
        assert_eq!(moves[0].slot, SlotId(5));
        // prev offset was 11*150 = 1650; minus travel 900 → 750.
        assert_eq!(moves[0].offset.main(Axis::Vertical), 750.0);
        assert_eq!(moves[0].logical_index, 5);
        let mut indices = pool.logical_indices();
        indices.sort_unstable();
        assert_eq!(indices, vec![5, 6, 7, 8, 9, 10]);
    }

    #[test]
    fn reverse_recycle_clamped_at_zero() {
        let mut pool = settled_pool(ScrollDirection::Reverse);
        // Pool at rows 0..5; a reverse move would go negative.
        let boxes = tiled_boxes(0.0, 6);
        let mut vis = vec![SlotVisibility::Visible; 6];
        vis[5] = SlotVisibility::Hidden;
        let tick = PoolTick {
            host_box: host_box(),
            visibility: &vis,
            slot_boxes: &boxes,
            direction: Some(ScrollDirection::Reverse),
            backing_len: None,
        };
        assert!(pool.recycle(&tick).is_empty());
    }

    #[test]
    fn infinite_forward_wraps_logical_index() {
        let mut pool = ContainerPool::new(Axis::Vertical, true);
        pool.set_metrics(&item_box());
        pool.resize(6);
        pool.reposition(8, Some(10));
        // Settle direction.
        let boxes = tiled_boxes(0.0, 6);
        let vis = vec![SlotVisibility::Visible; 6];
        let settle = PoolTick {
            host_box: host_box(),
            visibility: &vis,
            slot_boxes: &boxes,
            direction: Some(ScrollDirection::Forward),
            backing_len: Some(10),
        };
        assert!(pool.recycle(&settle).is_empty());

        let boxes = tiled_boxes(-ITEM, 6);
        let mut vis = vec![SlotVisibility::Visible; 6];
        vis[0] = SlotVisibility::Hidden;
        let tick = PoolTick {
            host_box: host_box(),
            visibility: &vis,
            slot_boxes: &boxes,
            direction: Some(ScrollDirection::Forward),
            backing_len: Some(10),
        };
        let moves = pool.recycle(&tick);
        assert_eq!(moves.len(), 1);
        // Slot 0 displayed logical 8; 8 + 6 wraps to 4 in a 10-item loop.
        assert_eq!(moves[0].logical_index, 4);
    }

    #[test]
    fn reposition_is_idempotent() {
        let mut pool = ContainerPool::new(Axis::Vertical, false);
        pool.set_metrics(&item_box());
        pool.resize(6);
        let first = pool.reposition(6, Some(100));
        let second = pool.reposition(6, Some(100));
        assert_eq!(first, second);
    }

    #[test]
    fn reposition_lays_out_contiguous_rows() {
        let mut pool = ContainerPool::new(Axis::Vertical, false);
        pool.set_metrics(&item_box());
        pool.resize(6);
        let moves = pool.reposition(6, Some(100));
        assert_eq!(moves.len(), 6);
        for (p, mv) in moves.iter().enumerate() {
            assert_eq!(mv.logical_index, 6 + p);
            assert_eq!(mv.offset.main(Axis::Vertical), ITEM * (6 + p) as f64);
        }
    }

    #[test]
    fn reposition_clamps_near_finite_tail() {
        let mut pool = ContainerPool::new(Axis::Vertical, false);
        pool.set_metrics(&item_box());
        pool.resize(6);
        // 10 items, pool 6: base clamps to 4 so the pool covers 4..10.
        let moves = pool.reposition(8, Some(10));
        assert_eq!(moves[0].logical_index, 4);
        assert_eq!(moves[5].logical_index, 9);
    }

    #[test]
    fn reposition_on_unmeasured_pool_is_noop() {
        let mut pool = ContainerPool::new(Axis::Vertical, false);
        pool.resize(6);
        assert!(pool.reposition(0, None).is_empty());
        assert_eq!(pool.reposition_count(), 0);
    }

    #[test]
    fn reposition_two_columns() {
        let mut pool = ContainerPool::new(Axis::Vertical, false).with_items_per_line(2);
        pool.set_metrics(&Rect::new(0.0, 0.0, 200.0, ITEM));
        pool.resize(6);
        let moves = pool.reposition(0, None);
        // Rows of two: (0,1) on row 0, (2,3) on row 1, (4,5) on row 2.
        assert_eq!(moves[0].offset.main(Axis::Vertical), 0.0);
        assert_eq!(moves[1].offset.main(Axis::Vertical), 0.0);
        assert_eq!(moves[1].offset.cross(Axis::Vertical), 200.0);
        assert_eq!(moves[4].offset.main(Axis::Vertical), 2.0 * ITEM);
    }

    #[test]
    fn resize_resets_incremental_state() {
        let mut pool = settled_pool(ScrollDirection::Forward);
        pool.resize(8);
        assert_eq!(pool.pool_size(), 8);
        // Direction must settle again after a resize.
        let boxes = tiled_boxes(-ITEM, 8);
        let mut vis = vec![SlotVisibility::Visible; 8];
        vis[0] = SlotVisibility::Hidden;
        let tick = PoolTick {
            host_box: host_box(),
            visibility: &vis,
            slot_boxes: &boxes,
            direction: Some(ScrollDirection::Forward),
            backing_len: None,
        };
        assert!(pool.recycle(&tick).is_empty());
    }

    #[test]
    fn visibility_shorter_than_pool_defaults_hidden() {
        let mut pool = settled_pool(ScrollDirection::Forward);
        let boxes = tiled_boxes(-ITEM, 6);
        // Only 2 entries supplied: the rest default to hidden, but none of
        // the defaults have crossed the reference edge.
        let vis = vec![SlotVisibility::Hidden, SlotVisibility::Visible];
        let tick = PoolTick {
            host_box: host_box(),
            visibility: &vis,
            slot_boxes: &boxes,
            direction: Some(ScrollDirection::Forward),
            backing_len: None,
        };
        let moves = pool.recycle(&tick);
        assert_eq!(moves.len(), 1);
        assert_eq!(moves[0].slot, SlotId(0));
    }

    proptest! {
        // After any number of forward recycle steps the assigned set is
        // exactly pool_size contiguous integers.
        #[test]
        fn contiguity_preserved_under_forward_recycling(steps in 1usize..40) {
            let mut pool = settled_pool(ScrollDirection::Forward);
            for step in 0..steps {
                let first_top = -ITEM * (step as f64 + 1.0);
                // Which pool positions are above the viewport now?
                let boxes: Vec<Rect> = (0..6)
                    .map(|p| {
                        let row = pool.records()[p].previous_offset.main(Axis::Vertical) / ITEM;
                        Rect::new(0.0, first_top + ITEM * row, 400.0, ITEM)
                    })
                    .collect();
                let vis: Vec<SlotVisibility> = boxes
                    .iter()
                    .map(|b| {
                        if b.trailing(Axis::Vertical) <= 0.0 || b.leading(Axis::Vertical) >= 600.0 {
                            SlotVisibility::Hidden
                        } else {
                            SlotVisibility::Visible
                        }
                    })
                    .collect();
                let tick = PoolTick {
                    host_box: host_box(),
                    visibility: &vis,
                    slot_boxes: &boxes,
                    direction: Some(ScrollDirection::Forward),
                    backing_len: None,
                };
                pool.recycle(&tick);

                let mut indices = pool.logical_indices();
                indices.sort_unstable();
                for pair in indices.windows(2) {
                    prop_assert_eq!(pair[1], pair[0] + 1);
                }
            }
        }

        // Reposition is idempotent for arbitrary inputs.
        #[test]
        fn reposition_idempotent_property(
            vi in 0usize..10_000,
            pool_size in 1usize..32,
            len in prop::option::of(0usize..10_000),
        ) {
            let mut pool = ContainerPool::new(Axis::Vertical, false);
            pool.set_metrics(&item_box());
            pool.resize(pool_size);
            let first = pool.reposition(vi, len);
            let second = pool.reposition(vi, len);
            prop_assert_eq!(first, second);
        }
    }
}
