#![forbid(unsafe_code)]

//! The remote source contract.
//!
//! A source delivers ordered batches over a plain `mpsc` channel: the
//! producer may run anywhere (a background thread, a network callback),
//! while the pager drains results on the single owning task. Reverse
//! traversal carries its own constraint set — reverse ordering is not
//! assumed symmetric to forward.

use std::sync::mpsc::{Receiver, TryRecvError};

use rondo_core::viewport::ScrollDirection;

/// Opaque pagination anchor derived from a specific record.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Cursor(String);

impl Cursor {
    /// Wrap an opaque cursor token.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// The raw token.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// One record of the master collection.
#[derive(Debug, Clone, PartialEq)]
pub struct LogicalItem<T> {
    /// Arbitrary payload rendered by the consumer.
    pub payload: T,
    /// Cursor usable as a future fetch anchor. Records without a cursor
    /// are orphaned and are dropped at splice time.
    pub cursor: Option<Cursor>,
}

impl<T> LogicalItem<T> {
    /// A record with a cursor.
    #[must_use]
    pub fn new(payload: T, cursor: Cursor) -> Self {
        Self {
            payload,
            cursor: Some(cursor),
        }
    }

    /// A placeholder record carrying only an anchor cursor reference.
    #[must_use]
    pub fn placeholder(payload: T, cursor: Cursor) -> Self {
        Self::new(payload, cursor)
    }
}

/// A single query constraint, opaque to the pager.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Constraint {
    /// Constraint key (field path, operator — source-defined).
    pub field: String,
    /// Constraint value.
    pub value: String,
}

impl Constraint {
    /// Create a constraint.
    #[must_use]
    pub fn new(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
        }
    }
}

/// A cursor-anchored batch query.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    /// Direction-specific constraint set.
    pub constraints: Vec<Constraint>,
    /// Anchor record cursor; absent when anchored at the very start.
    pub anchor: Option<Cursor>,
    /// Maximum records per batch.
    pub limit: usize,
    /// Traversal direction.
    pub direction: ScrollDirection,
}

/// Errors a source can report for a subscription.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceError {
    /// The anchor record no longer exists (deleted between scroll and
    /// fetch). Benign; the pager ignores it.
    AnchorMissing,
    /// Any other fetch failure. The pager resets the backing array and
    /// surfaces this to the caller.
    Other(String),
}

impl std::fmt::Display for SourceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AnchorMissing => write!(f, "anchor record not found"),
            Self::Other(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for SourceError {}

/// One delivery on a subscription: an ordered batch or an error.
pub type BatchResult<T> = Result<Vec<LogicalItem<T>>, SourceError>;

/// A remote, cursor-paginated collection.
pub trait RemoteSource<T> {
    /// Open a live subscription for `query`. Batches arrive on the
    /// returned subscription until it is cancelled or the source ends it.
    fn subscribe(&mut self, query: Query) -> Subscription<T>;
}

/// Receiving half of one subscription.
///
/// Cancellation is idempotent and safe to call when nothing is subscribed:
/// the pager always cancels the previous subscription before opening the
/// next one.
#[derive(Debug)]
pub struct Subscription<T> {
    receiver: Option<Receiver<BatchResult<T>>>,
}

impl<T> Subscription<T> {
    /// A live subscription draining `receiver`.
    #[must_use]
    pub fn new(receiver: Receiver<BatchResult<T>>) -> Self {
        Self {
            receiver: Some(receiver),
        }
    }

    /// A subscription that was never opened (or already cancelled).
    #[must_use]
    pub fn idle() -> Self {
        Self { receiver: None }
    }

    /// Whether the subscription can still deliver.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.receiver.is_some()
    }

    /// Next pending delivery, if any. Never blocks. A disconnected
    /// producer deactivates the subscription.
    pub fn try_next(&mut self) -> Option<BatchResult<T>> {
        let receiver = self.receiver.as_ref()?;
        match receiver.try_recv() {
            Ok(batch) => Some(batch),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                self.receiver = None;
                None
            }
        }
    }

    /// Stop receiving. Idempotent.
    pub fn cancel(&mut self) {
        self.receiver = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    #[test]
    fn cancel_is_idempotent() {
        let mut sub: Subscription<u32> = Subscription::idle();
        sub.cancel();
        sub.cancel();
        assert!(!sub.is_active());
    }

    #[test]
    fn try_next_drains_in_order() {
        let (tx, rx) = mpsc::channel();
        let mut sub: Subscription<u32> = Subscription::new(rx);
        tx.send(Ok(vec![LogicalItem::new(1, Cursor::new("a"))]))
            .unwrap();
        tx.send(Ok(vec![LogicalItem::new(2, Cursor::new("b"))]))
            .unwrap();
        let first = sub.try_next().unwrap().unwrap();
        assert_eq!(first[0].payload, 1);
        let second = sub.try_next().unwrap().unwrap();
        assert_eq!(second[0].payload, 2);
        assert!(sub.try_next().is_none());
        assert!(sub.is_active());
    }

    #[test]
    fn disconnected_producer_deactivates() {
        let (tx, rx) = mpsc::channel::<BatchResult<u32>>();
        let mut sub = Subscription::new(rx);
        drop(tx);
        assert!(sub.try_next().is_none());
        assert!(!sub.is_active());
    }

    #[test]
    fn cancelled_subscription_ignores_pending() {
        let (tx, rx) = mpsc::channel();
        let mut sub: Subscription<u32> = Subscription::new(rx);
        tx.send(Ok(vec![LogicalItem::new(9, Cursor::new("z"))]))
            .unwrap();
        sub.cancel();
        assert!(sub.try_next().is_none());
    }
}
