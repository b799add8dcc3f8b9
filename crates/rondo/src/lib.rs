#![forbid(unsafe_code)]

//! rondo: a container-recycling virtual scroller backed by a
//! cursor-paginated remote window.
//!
//! A fixed pool of visual slots displays an unbounded (or very large)
//! ordered collection inside a fixed-size viewport. Each tick, the engine
//! decides which of the pooled containers must move to a new screen
//! position and which logical index each one now represents; a pagination
//! controller keeps a sliding window of remote records synchronized with
//! the current index and reclaims memory far from it.
//!
//! # Crate map
//! - [`rondo_core`] — geometry, viewport math, window derivation, events.
//! - [`rondo_pool`] — the slot recycler.
//! - [`rondo_paging`] — the remote-source contract, backing store, pager.
//! - [`feed`] (here) — the orchestrator wiring them together.
//!
//! # Quick start
//! Implement [`GeometrySource`] over your layout system's viewport events,
//! pick a [`RemoteSource`] (or [`MemorySource`] for local data), then drive
//! [`VirtualFeed::tick`] once per frame and apply the returned slot moves
//! and events.

pub mod feed;

pub use feed::{GeometrySample, GeometrySource, TickOutcome, VirtualFeed};

pub use rondo_core::{
    Axis, FeedError, FeedEvent, Offset, PaginationHint, Rect, ScrollDirection, ViewportState,
    WindowState, compute_window, virtual_index, virtual_start_for,
};
pub use rondo_paging::{
    BackingStore, BatchResult, Constraint, Cursor, LogicalItem, MemorySource, Pager, PagerConfig,
    PagerState, PaginationRequest, Query, RemoteSource, SourceError, Subscription,
};
pub use rondo_pool::{ContainerPool, PoolTick, SlotId, SlotMove, SlotRecord, SlotVisibility};
