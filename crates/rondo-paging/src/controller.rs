#![forbid(unsafe_code)]

//! The pagination and garbage-collection controller.
//!
//! The pager anchors fetches at a lagged index so a buffer of records sits
//! opposite the direction of travel, throttles fetch decisions to every
//! resolution-th index change, keeps at most one subscription in flight,
//! and nulls out far-off entries before each new fetch.
//!
//! There is no timeout on remote fetches: a non-responding source leaves
//! the pager busy until [`Pager::reset`]. The embedding application owns
//! the event loop and decides whether to layer a timeout on top.

use tracing::{debug, trace};

use rondo_core::error::FeedError;
use rondo_core::viewport::ScrollDirection;

use crate::source::{Cursor, Query, RemoteSource, SourceError, Subscription};
use crate::store::BackingStore;

/// Pager configuration.
#[derive(Debug, Clone)]
pub struct PagerConfig {
    /// Lower bound for the batch size; the effective batch is
    /// `max(min_batch, pool_hint)`.
    pub min_batch: usize,
    /// Constraints applied to forward queries.
    pub forward_constraints: Vec<crate::source::Constraint>,
    /// Constraints applied to reverse queries. Reverse ordering is not
    /// assumed symmetric to forward.
    pub reverse_constraints: Vec<crate::source::Constraint>,
}

impl Default for PagerConfig {
    fn default() -> Self {
        Self {
            min_batch: 20,
            forward_constraints: Vec::new(),
            reverse_constraints: Vec::new(),
        }
    }
}

/// Live pagination state, exposed for inspection.
#[derive(Debug, Clone, Default)]
pub struct PagerState {
    /// Effective batch size of the most recent fetch decision.
    pub batch_size: usize,
    /// Cursor of the current anchor record, if any.
    pub cursor: Option<Cursor>,
    /// Direction of the most recent request.
    pub direction: Option<ScrollDirection>,
    /// Whether a fetch is in flight. At most one at a time.
    pub busy: bool,
    /// End-of-data detected on the forward edge. Monotone until a forward
    /// fetch comes back non-decreasing.
    pub end_detected: bool,
    /// Signed anchor offset of the most recent fetch decision.
    pub lag: i64,
}

/// A pagination request derived from the current virtual index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationRequest {
    /// Current virtual index.
    pub index: usize,
    /// Number of currently visible items.
    pub visible_count: usize,
    /// Direction of travel.
    pub direction: ScrollDirection,
    /// First index of the live window.
    pub window_start: usize,
    /// Length of the live window (the pool size; also the pool hint for
    /// batch sizing).
    pub window_len: usize,
}

/// Outcome of draining pending subscription deliveries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PagerPoll {
    /// A batch was spliced into the backing array.
    pub spliced: bool,
    /// An in-flight fetch resolved (including discarded/benign outcomes).
    pub resolved: bool,
}

#[derive(Debug, Clone, Copy)]
struct InFlight {
    /// The virtual index the request was issued for.
    request_index: usize,
    /// The lagged anchor index the query was anchored at.
    anchor: usize,
    direction: ScrollDirection,
}

/// Drives a cursor-paginated remote source keyed off the virtual index.
pub struct Pager<T> {
    config: PagerConfig,
    state: PagerState,
    store: BackingStore<T>,
    source: Box<dyn RemoteSource<T>>,
    subscription: Subscription<T>,
    in_flight: Option<InFlight>,
    pending: Option<PaginationRequest>,
    last_forward_count: Option<usize>,
    end_at: Option<usize>,
    last_bucket: Option<usize>,
    current_index: usize,
}

impl<T> std::fmt::Debug for Pager<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pager")
            .field("state", &self.state)
            .field("store_len", &self.store.len())
            .field("pending", &self.pending)
            .finish_non_exhaustive()
    }
}

impl<T> Pager<T> {
    /// Create a pager over `source`.
    #[must_use]
    pub fn new(source: Box<dyn RemoteSource<T>>, config: PagerConfig) -> Self {
        let state = PagerState {
            batch_size: config.min_batch,
            ..PagerState::default()
        };
        Self {
            config,
            state,
            store: BackingStore::new(),
            source,
            subscription: Subscription::idle(),
            in_flight: None,
            pending: None,
            last_forward_count: None,
            end_at: None,
            last_bucket: None,
            current_index: 0,
        }
    }

    /// Live pagination state.
    #[must_use]
    pub fn state(&self) -> &PagerState {
        &self.state
    }

    /// The backing array.
    #[must_use]
    pub fn store(&self) -> &BackingStore<T> {
        &self.store
    }

    /// Mutable backing array, for placeholder splices ahead of a jump.
    pub fn store_mut(&mut self) -> &mut BackingStore<T> {
        &mut self.store
    }

    /// Consider a fetch for the given index change.
    ///
    /// Only every resolution-th index change is evaluated; requests
    /// arriving while a fetch is in flight replace any earlier pending
    /// request (last-write-wins) and run once the fetch resolves.
    pub fn request(&mut self, req: PaginationRequest) {
        let batch = self.config.min_batch.max(req.window_len);
        let resolution = (batch / 4).max(1);
        let bucket = req.index / resolution;
        if self.last_bucket == Some(bucket) {
            trace!(index = req.index, bucket, "index change below resolution");
            return;
        }
        self.last_bucket = Some(bucket);
        self.current_index = req.index;
        self.state.direction = Some(req.direction);

        if self.state.busy {
            trace!(index = req.index, "fetch in flight, storing pending request");
            self.pending = Some(req);
            return;
        }
        self.dispatch(req);
    }

    /// Drain pending subscription deliveries.
    ///
    /// Stale responses are discarded without side effects; a missing
    /// anchor record is ignored; any other source error resets the
    /// backing array and is surfaced to the caller.
    pub fn poll(&mut self) -> Result<PagerPoll, FeedError> {
        let mut outcome = PagerPoll::default();
        while let Some(delivery) = self.subscription.try_next() {
            match delivery {
                Ok(records) => {
                    outcome.resolved = true;
                    if self.resolve_batch(records) {
                        outcome.spliced = true;
                    }
                }
                Err(SourceError::AnchorMissing) => {
                    // The anchor was deleted between scroll and fetch;
                    // benign transient, keep the array intact.
                    debug!("anchor record missing, ignoring fetch");
                    outcome.resolved = true;
                    self.finish_fetch();
                }
                Err(err) => {
                    debug!(%err, "remote fetch failed, resetting backing array");
                    self.store.clear();
                    self.subscription.cancel();
                    self.in_flight = None;
                    self.pending = None;
                    self.state.busy = false;
                    return Err(FeedError::Source(err.to_string()));
                }
            }
        }
        Ok(outcome)
    }

    /// Cancel any in-flight fetch and reset all pagination state.
    pub fn reset(&mut self) {
        self.subscription.cancel();
        self.store.clear();
        self.in_flight = None;
        self.pending = None;
        self.last_forward_count = None;
        self.end_at = None;
        self.last_bucket = None;
        self.state = PagerState {
            batch_size: self.config.min_batch,
            ..PagerState::default()
        };
    }

    fn dispatch(&mut self, req: PaginationRequest) {
        let batch = self.config.min_batch.max(req.window_len);
        self.state.batch_size = batch;

        // While the forward end is detected, forward requests at or beyond
        // the index where it was seen are suppressed.
        if self.state.end_detected
            && req.direction == ScrollDirection::Forward
            && self.end_at.is_some_and(|at| req.index >= at)
        {
            trace!(index = req.index, "forward fetch suppressed past detected end");
            return;
        }

        let lag = req.visible_count.div_ceil(2);
        let (anchor, signed_lag) = match req.direction {
            ScrollDirection::Forward => (req.index.saturating_sub(lag), -(lag as i64)),
            ScrollDirection::Reverse => (
                req.index + lag + req.visible_count,
                (lag + req.visible_count) as i64,
            ),
        };
        self.state.lag = signed_lag;

        self.collect_garbage(anchor, req.direction, req.window_start, req.window_len);

        // Anchor cursor is absent at the very start of the collection. An
        // unanchored query is only valid there: when the record at the
        // anchor is not loaded, re-anchor on the nearest loaded cursor so
        // the batch splices at the record it was actually anchored to;
        // with nothing loaded at all, fall back to the start.
        let (anchor, cursor) = if anchor == 0 {
            (0, None)
        } else if let Some(cursor) = self.store.cursor_at(anchor) {
            (anchor, Some(cursor.clone()))
        } else if let Some((near, cursor)) = self.store.nearest_cursor(anchor) {
            debug!(requested = anchor, anchored = near, "anchor unloaded, using nearest cursor");
            (near, Some(cursor.clone()))
        } else {
            debug!(requested = anchor, "anchor unloaded and store empty, fetching from start");
            (0, None)
        };
        self.state.cursor = cursor;

        let query = Query {
            constraints: match req.direction {
                ScrollDirection::Forward => self.config.forward_constraints.clone(),
                ScrollDirection::Reverse => self.config.reverse_constraints.clone(),
            },
            anchor: self.state.cursor.clone(),
            limit: batch,
            direction: req.direction,
        };

        // One fetch at a time: always unsubscribe the previous stream
        // before opening the next.
        self.subscription.cancel();
        self.state.busy = true;
        self.in_flight = Some(InFlight {
            request_index: req.index,
            anchor,
            direction: req.direction,
        });
        debug!(
            index = req.index,
            anchor,
            limit = batch,
            direction = ?req.direction,
            "subscribing for batch"
        );
        self.subscription = self.source.subscribe(query);
    }

    fn resolve_batch(&mut self, mut records: Vec<crate::source::LogicalItem<T>>) -> bool {
        let Some(fl) = self.in_flight else {
            // Unsolicited delivery after cancel/reset.
            return false;
        };

        // A late response for an index the controller has moved past.
        if fl.request_index != self.current_index {
            trace!(
                response = fl.request_index,
                current = self.current_index,
                "discarding stale fetch response"
            );
            self.finish_fetch();
            return false;
        }

        // Drop invalid/orphaned records.
        records.retain(|r| r.cursor.is_some());
        if fl.direction == ScrollDirection::Reverse {
            // Reverse batches arrive in descending order; restore
            // ascending array order before splicing.
            records.reverse();
        }
        let count = records.len();

        let spliced = if count > 0 {
            let start = match fl.direction {
                ScrollDirection::Forward => fl.anchor,
                ScrollDirection::Reverse => fl.anchor.saturating_sub(count - 1),
            };
            self.store.splice(start, records);
            trace!(start, count, "spliced batch into backing array");
            true
        } else {
            false
        };

        if fl.direction == ScrollDirection::Forward {
            // A shrinking forward batch means the end of the collection;
            // any non-decreasing batch clears the flag.
            if let Some(prev) = self.last_forward_count {
                if count < prev {
                    debug!(count, prev, "forward end detected");
                    self.state.end_detected = true;
                    self.end_at = Some(fl.request_index);
                } else {
                    self.state.end_detected = false;
                    self.end_at = None;
                }
            }
            self.last_forward_count = Some(count);
        }

        self.finish_fetch();
        spliced
    }

    /// Clear the busy flag and run the pending request, if one arrived
    /// while the fetch was in flight.
    fn finish_fetch(&mut self) {
        self.state.busy = false;
        self.in_flight = None;
        if let Some(req) = self.pending.take() {
            self.dispatch(req);
        }
    }

    /// Null out entries far behind (forward) or far ahead (reverse) of the
    /// anchor, never touching the live window or one batch on either side
    /// of it.
    fn collect_garbage(
        &mut self,
        anchor: usize,
        direction: ScrollDirection,
        window_start: usize,
        window_len: usize,
    ) {
        let batch = self.state.batch_size;
        let span = batch * 2;
        let released = match direction {
            ScrollDirection::Forward => {
                let gc_end = anchor
                    .saturating_sub(span)
                    .min(window_start.saturating_sub(batch));
                self.store.release_range(0..gc_end)
            }
            ScrollDirection::Reverse => {
                let gc_start = (anchor + span).max(window_start + window_len + batch);
                self.store.release_range(gc_start..self.store.len())
            }
        };
        if released > 0 {
            debug!(released, anchor, ?direction, "released far-off entries");
        }
    }
}
