#![forbid(unsafe_code)]

//! Core: geometry, viewport math, and window derivation for rondo.
//!
//! # Role in rondo
//! `rondo-core` is the math layer. It owns the pixel-space geometry types,
//! the virtual index calculation, and the data-window derivation that the
//! pool (`rondo-pool`) and pager (`rondo-paging`) consume.
//!
//! # Primary responsibilities
//! - **Geometry**: pixel-space rectangles, offsets, and the scroll axis.
//! - **ViewportState**: scroll offset, direction tracking, item metrics.
//! - **Virtual index**: pure scroll-offset → logical-index mapping.
//! - **Data window**: the (possibly wrapped) slice of the backing
//!   collection currently on screen.
//!
//! # How it fits in the system
//! Everything here is pure and per-frame safe: the orchestrator (`rondo`)
//! recomputes these values in dependency order on every geometry tick and
//! feeds the results to the container pool and the pagination controller.

pub mod error;
pub mod event;
pub mod geometry;
pub mod viewport;
pub mod window;

pub use error::FeedError;
pub use event::{FeedEvent, PaginationHint};
pub use geometry::{Axis, Offset, Rect};
pub use viewport::{ScrollDirection, ViewportState, virtual_index};
pub use window::{WindowState, compute_window, virtual_start_for};
