#![forbid(unsafe_code)]

//! Data window derivation.
//!
//! The window is the slice of the backing collection currently mapped into
//! the container pool. In finite mode an over-run is clamped by the slice,
//! never rejected; in infinite mode the slice wraps around the end of the
//! collection.

/// State of the window mapped into the pool.
///
/// Invariant: `0 <= virtual_start`. When not infinite,
/// `virtual_start + pool_size <= backing_len` is *not* enforced here; the
/// over-run is clamped by [`compute_window`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WindowState {
    /// Index of the first item mapped into the pool.
    pub virtual_start: usize,
    /// Number of visual slots in the pool.
    pub pool_size: usize,
    /// Whether the master collection wraps (infinite carousel mode).
    pub infinite: bool,
}

/// Derive `virtual_start` from the instantaneous virtual index.
///
/// Infinite collections modulo-reduce; finite collections clamp to the
/// collection length so the window can run up to (and past) the tail, where
/// the slice clamp takes over.
#[must_use]
pub fn virtual_start_for(virtual_index: usize, backing_len: usize, infinite: bool) -> usize {
    if backing_len == 0 {
        return 0;
    }
    if infinite {
        virtual_index % backing_len
    } else {
        virtual_index.min(backing_len)
    }
}

/// Compute the window slice of `backing` for the current pool.
///
/// Finite mode returns `backing[virtual_start..virtual_start + pool_size]`
/// clamped to the array. Infinite mode wraps: when the slice would run past
/// the end, the tail is concatenated with a head slice of the remaining
/// count.
#[must_use]
pub fn compute_window<T: Clone>(
    infinite: bool,
    backing: &[T],
    pool_size: usize,
    virtual_start: usize,
) -> Vec<T> {
    if backing.is_empty() || pool_size == 0 {
        return Vec::new();
    }
    if !infinite {
        let start = virtual_start.min(backing.len());
        let end = start.saturating_add(pool_size).min(backing.len());
        return backing[start..end].to_vec();
    }
    let start = virtual_start % backing.len();
    if start + pool_size <= backing.len() {
        return backing[start..start + pool_size].to_vec();
    }
    let tail = &backing[start..];
    let head_count = (pool_size - tail.len()).min(backing.len());
    let mut window = Vec::with_capacity(tail.len() + head_count);
    window.extend_from_slice(tail);
    window.extend_from_slice(&backing[..head_count]);
    window
}
