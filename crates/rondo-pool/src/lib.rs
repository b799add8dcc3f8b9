#![forbid(unsafe_code)]

//! Container pool: fixed-slot recycling for the rondo virtual scroller.
//!
//! # Role in rondo
//! `rondo-pool` keeps exactly `pool_size` visual slots positioned so that,
//! together, they always display a contiguous (or wrapped) run of logical
//! indices aligned with the scroll position, while moving the minimum
//! number of slots per geometry tick.
//!
//! # Primary responsibilities
//! - **SlotRecord**: per-slot offset/index bookkeeping, owned by the pool —
//!   transient state never lives on the rendered handle.
//! - **Recycling**: the per-tick move computation driven by visibility
//!   classification and direction of travel.
//! - **Reposition**: the from-scratch, idempotent layout used after resize
//!   or a programmatic jump.

pub mod recycler;
pub mod slot;

pub use recycler::{ContainerPool, PoolTick, SlotMove};
pub use slot::{SlotId, SlotRecord, SlotVisibility};
