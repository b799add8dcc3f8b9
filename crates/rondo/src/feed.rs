#![forbid(unsafe_code)]

//! The orchestrator.
//!
//! [`VirtualFeed`] wires the pipeline together as an explicit,
//! topologically ordered dataflow, recomputed per tick: geometry sample →
//! viewport state → virtual index → pool recycle → window slice → pager
//! decision. There is no reactive runtime; every derived value is a pure
//! function of its declared inputs.
//!
//! Geometry arrives through an injected [`GeometrySource`] that the feed
//! drains once per tick — multiple samples queued between ticks coalesce
//! into a single recycling cycle — and disposes of deterministically on
//! [`VirtualFeed::detach`].

use tracing::{debug, debug_span, trace};

use rondo_core::error::FeedError;
use rondo_core::event::{FeedEvent, PaginationHint};
use rondo_core::geometry::{Axis, Rect};
use rondo_core::viewport::{ScrollDirection, ViewportState};
use rondo_core::window::{WindowState, compute_window, virtual_start_for};
use rondo_paging::controller::{Pager, PagerConfig, PaginationRequest};
use rondo_paging::source::{LogicalItem, RemoteSource};
use rondo_pool::recycler::{ContainerPool, PoolTick, SlotMove};
use rondo_pool::slot::SlotVisibility;

/// One viewport-feedback sample.
///
/// The producer reports the host bounding box, one representative item's
/// bounding box, the current scroll offset, and a per-slot visible/hidden
/// classification (widened by whatever pre-load margin the producer
/// applies). All boxes share one coordinate space.
#[derive(Debug, Clone, PartialEq)]
pub struct GeometrySample {
    /// Host viewport bounding box.
    pub host_box: Rect,
    /// Bounding box of a representative item.
    pub item_box: Rect,
    /// Scroll offset along the feed's axis.
    pub scroll_offset: f64,
    /// Per-slot bounding boxes, indexed by pool position.
    pub slot_boxes: Vec<Rect>,
    /// Per-slot classification, indexed by pool position.
    pub visibility: Vec<SlotVisibility>,
}

/// An injected viewport-event source.
///
/// The feed polls it each tick and never installs listeners of its own;
/// teardown is explicit via [`GeometrySource::dispose`].
pub trait GeometrySource {
    /// Next queued sample, if any. Never blocks.
    fn poll_sample(&mut self) -> Option<GeometrySample>;

    /// Release any underlying observers. Called exactly once, on detach.
    fn dispose(&mut self) {}
}

/// Output of one [`VirtualFeed::tick`].
#[derive(Debug, Clone, PartialEq)]
pub struct TickOutcome<T> {
    /// Slot moves to apply to the rendered containers.
    pub moves: Vec<SlotMove>,
    /// Events for the embedding component. Window items are `None` where
    /// the backing entry is not (or no longer) loaded.
    pub events: Vec<FeedEvent<Option<LogicalItem<T>>>>,
}

impl<T> Default for TickOutcome<T> {
    fn default() -> Self {
        Self {
            moves: Vec::new(),
            events: Vec::new(),
        }
    }
}

/// The orchestrating component: a virtualized view over a remote feed.
pub struct VirtualFeed<T, G: GeometrySource> {
    axis: Axis,
    infinite: bool,
    items_per_line: usize,
    /// Extra pool sections beyond what the host extent requires.
    overscan_sections: usize,
    geometry: G,
    pool: ContainerPool,
    pager: Pager<T>,
    viewport: ViewportState,
    /// Leading edge of the first item, captured from the first measured
    /// sample; the origin the virtual index is computed against.
    item_origin: Option<f64>,
    host_box: Rect,
    item_box: Rect,
    visible_count: usize,
    last_items: Vec<Option<LogicalItem<T>>>,
    last_hint: Option<(usize, usize)>,
    detached: bool,
}

impl<T, G: GeometrySource> std::fmt::Debug for VirtualFeed<T, G> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VirtualFeed")
            .field("axis", &self.axis)
            .field("infinite", &self.infinite)
            .field("pool_size", &self.pool.pool_size())
            .field("viewport", &self.viewport)
            .field("detached", &self.detached)
            .finish_non_exhaustive()
    }
}

impl<T, G: GeometrySource> VirtualFeed<T, G> {
    /// Create a vertical, finite feed over `geometry` and `source`.
    #[must_use]
    pub fn new(geometry: G, source: Box<dyn RemoteSource<T>>) -> Self {
        Self::with_config(geometry, source, PagerConfig::default())
    }

    /// Create a feed with a non-default pager configuration.
    #[must_use]
    pub fn with_config(
        geometry: G,
        source: Box<dyn RemoteSource<T>>,
        config: PagerConfig,
    ) -> Self {
        Self {
            axis: Axis::Vertical,
            infinite: false,
            items_per_line: 1,
            overscan_sections: 2,
            geometry,
            pool: ContainerPool::new(Axis::Vertical, false),
            pager: Pager::new(source, config),
            viewport: ViewportState::new(),
            item_origin: None,
            host_box: Rect::default(),
            item_box: Rect::default(),
            visible_count: 0,
            last_items: Vec::new(),
            last_hint: None,
            detached: false,
        }
    }

    /// Set the scroll axis.
    #[must_use]
    pub fn with_axis(mut self, axis: Axis) -> Self {
        self.axis = axis;
        self.pool = ContainerPool::new(axis, self.infinite).with_items_per_line(self.items_per_line);
        self
    }

    /// Treat the collection as wrapping (infinite carousel mode).
    #[must_use]
    pub fn with_infinite(mut self, infinite: bool) -> Self {
        self.infinite = infinite;
        self.pool = ContainerPool::new(self.axis, infinite).with_items_per_line(self.items_per_line);
        self
    }

    /// Set items per line (1 for a plain list).
    #[must_use]
    pub fn with_items_per_line(mut self, per_line: usize) -> Self {
        self.items_per_line = per_line.max(1);
        self.viewport.items_per_line = self.items_per_line;
        self.pool = ContainerPool::new(self.axis, self.infinite).with_items_per_line(per_line);
        self
    }

    /// Set extra pool sections kept beyond the visible extent.
    #[must_use]
    pub fn with_overscan(mut self, sections: usize) -> Self {
        self.overscan_sections = sections;
        self
    }

    /// Current viewport snapshot.
    #[must_use]
    pub fn viewport(&self) -> &ViewportState {
        &self.viewport
    }

    /// The slot pool.
    #[must_use]
    pub fn pool(&self) -> &ContainerPool {
        &self.pool
    }

    /// The pagination controller.
    #[must_use]
    pub fn pager(&self) -> &Pager<T> {
        &self.pager
    }

    /// Current window state.
    #[must_use]
    pub fn window_state(&self) -> WindowState {
        WindowState {
            virtual_start: self.virtual_start(),
            pool_size: self.pool.pool_size(),
            infinite: self.infinite,
        }
    }

    fn current_virtual_index(&self) -> usize {
        self.viewport.virtual_index(self.item_origin.unwrap_or(0.0))
    }

    fn virtual_start(&self) -> usize {
        virtual_start_for(
            self.current_virtual_index(),
            self.pager.store().len(),
            self.infinite,
        )
    }

    /// Backing length for pool clamping; `None` until anything is loaded.
    fn backing_len(&self) -> Option<usize> {
        let len = self.pager.store().len();
        (len > 0).then_some(len)
    }

    /// Pool size from measured geometry: enough sections to tile the host
    /// extent, plus overscan.
    fn desired_pool_size(&self) -> usize {
        if self.viewport.item_size <= 0.0 {
            return 0;
        }
        let sections = (self.viewport.host_size / self.viewport.item_size).ceil() as usize;
        (sections + self.overscan_sections) * self.items_per_line
    }
}

impl<T: Clone + PartialEq, G: GeometrySource> VirtualFeed<T, G> {
    /// Run one cycle of the pipeline.
    ///
    /// Resolves any pending fetch deliveries, folds queued geometry samples
    /// into a single recycling cycle, derives the window slice, and decides
    /// whether to paginate. Call once per frame.
    pub fn tick(&mut self) -> Result<TickOutcome<T>, FeedError> {
        if self.detached {
            return Err(FeedError::Detached);
        }
        let _span = debug_span!("feed_tick").entered();

        let mut outcome = TickOutcome::default();

        // Splices land before the window is derived.
        self.pager.poll()?;

        // Collapse everything queued since the last tick into one sample.
        let mut sample = None;
        let mut queued = 0usize;
        while let Some(s) = self.geometry.poll_sample() {
            sample = Some(s);
            queued += 1;
        }
        if queued > 1 {
            trace!(queued, "coalesced geometry samples into one cycle");
        }

        if let Some(sample) = sample {
            self.viewport
                .apply_geometry(&sample.host_box, &sample.item_box, self.axis);
            self.viewport.observe_scroll(sample.scroll_offset);
            if self.item_origin.is_none() && !sample.item_box.is_empty() {
                self.item_origin = Some(sample.item_box.leading(self.axis));
            }
            self.host_box = sample.host_box;
            self.item_box = sample.item_box;
            self.visible_count = sample
                .visibility
                .iter()
                .filter(|v| **v == SlotVisibility::Visible)
                .count();
            self.pool.set_metrics(&sample.item_box);

            let desired = self.desired_pool_size();
            if desired > 0 && desired != self.pool.pool_size() {
                // A pool-size change forces a full layout.
                self.pool.resize(desired);
                outcome.moves = self
                    .pool
                    .reposition(self.current_virtual_index(), self.backing_len());
            } else {
                let tick = PoolTick {
                    host_box: sample.host_box,
                    visibility: &sample.visibility,
                    slot_boxes: &sample.slot_boxes,
                    direction: self.viewport.direction,
                    backing_len: self.backing_len(),
                };
                outcome.moves = self.pool.recycle(&tick).into_vec();
            }
        }

        let virtual_index = self.current_virtual_index();
        let pool_size = self.pool.pool_size();
        let virtual_start = self.virtual_start();
        let items = compute_window(
            self.infinite,
            self.pager.store().entries(),
            pool_size,
            virtual_start,
        );
        if items != self.last_items {
            self.last_items = items.clone();
            outcome.events.push(FeedEvent::CurrentItemsChanged { items });
        }

        if pool_size > 0 && self.last_hint != Some((virtual_index, pool_size)) {
            self.last_hint = Some((virtual_index, pool_size));
            debug!(virtual_index, pool_size, "pagination hint");
            outcome
                .events
                .push(FeedEvent::PaginationChanged(PaginationHint {
                    count: pool_size,
                    direction: self.viewport.direction,
                    index: virtual_index,
                    item_box: self.item_box,
                    host_box: self.host_box,
                    per_line: self.items_per_line,
                }));
            // Before the first scroll the feed still needs its initial
            // page; treat the unknown direction as forward.
            let direction = self
                .viewport
                .direction
                .unwrap_or(ScrollDirection::Forward);
            self.pager.request(PaginationRequest {
                index: virtual_index,
                visible_count: self.visible_count,
                direction,
                window_start: virtual_start,
                window_len: pool_size,
            });
        }

        Ok(outcome)
    }

    /// Jump the viewport to an arbitrary logical index.
    ///
    /// When the target is far from any loaded cursor, pass placeholder
    /// records bearing the needed anchor cursors as
    /// `(splice_start, records)` so the next fetch can anchor correctly.
    /// The jump updates the scroll position and recomputes every slot
    /// offset from scratch.
    pub fn move_to_index(
        &mut self,
        index: usize,
        placeholders: Option<(usize, Vec<LogicalItem<T>>)>,
    ) -> Result<Vec<SlotMove>, FeedError> {
        if self.detached {
            return Err(FeedError::Detached);
        }
        if let Some((start, records)) = placeholders {
            debug!(start, count = records.len(), "splicing placeholder records");
            self.pager.store_mut().splice(start, records);
        }
        let rows = index / self.items_per_line.max(1);
        let target = self.item_origin.unwrap_or(0.0) + rows as f64 * self.viewport.item_size;
        self.viewport.observe_scroll(target);
        debug!(index, target, "jumping viewport");
        Ok(self.pool.reposition(index, self.backing_len()))
    }

    /// Tear the feed down: dispose the geometry source, cancel any
    /// in-flight fetch, and release the backing store. Idempotent; every
    /// operation afterwards reports [`FeedError::Detached`].
    pub fn detach(&mut self) {
        if self.detached {
            return;
        }
        self.geometry.dispose();
        self.pager.reset();
        self.detached = true;
    }
}

impl<T, G: GeometrySource> Drop for VirtualFeed<T, G> {
    fn drop(&mut self) {
        if !self.detached {
            // Geometry observers must not outlive the feed.
            self.geometry.dispose();
            self.detached = true;
        }
    }
}
