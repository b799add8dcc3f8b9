#![forbid(unsafe_code)]

//! Pagination: windowed remote data and memory reclamation for rondo.
//!
//! # Role in rondo
//! `rondo-paging` makes the backing array behave as a live view over a
//! remote, cursor-paginated, unbounded collection. The pager issues
//! cursor-anchored fetches keyed off the virtual index, splices result
//! batches into the backing store, detects end-of-data, and nulls out
//! far-off entries to bound memory.
//!
//! # Primary responsibilities
//! - **RemoteSource**: the consumed subscription contract — ordered
//!   batches of records, each carrying an opaque cursor.
//! - **BackingStore**: splice-in and explicit nulling that preserve array
//!   length and index meaning.
//! - **Pager**: lag buffer, resolution throttle, busy/pending discipline,
//!   end detection, garbage collection.

pub mod controller;
pub mod memory;
pub mod source;
pub mod store;

pub use controller::{Pager, PagerConfig, PagerPoll, PagerState, PaginationRequest};
pub use memory::MemorySource;
pub use source::{BatchResult, Constraint, Cursor, LogicalItem, Query, RemoteSource, SourceError, Subscription};
pub use store::BackingStore;
