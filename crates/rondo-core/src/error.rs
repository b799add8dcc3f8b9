#![forbid(unsafe_code)]

//! Error types shared across the rondo crates.

/// Errors surfaced by the feed and its collaborators.
///
/// Missing geometry is never an error (dependents see zeroed values); these
/// variants cover the remote source and lifecycle misuse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedError {
    /// The remote source reported a non-recoverable fetch error. The
    /// backing array has been reset; no automatic retry is attempted.
    Source(String),
    /// An operation was attempted after the feed was detached from its
    /// geometry source.
    Detached,
}

impl std::fmt::Display for FeedError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Source(msg) => write!(f, "remote source error: {msg}"),
            Self::Detached => write!(f, "feed is detached from its geometry source"),
        }
    }
}

impl std::error::Error for FeedError {}
