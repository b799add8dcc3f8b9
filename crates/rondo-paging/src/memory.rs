#![forbid(unsafe_code)]

//! An in-memory source, for demos and tests.
//!
//! Batches resolve synchronously on subscribe. Cursors are the item's
//! position at construction time, so deletions after construction are not
//! modelled; use a scripted source for anchor-loss scenarios.

use std::sync::mpsc;

use rondo_core::viewport::ScrollDirection;

use crate::source::{Cursor, LogicalItem, Query, RemoteSource, SourceError, Subscription};

/// A cursor-paginated view over a fixed in-memory collection.
#[derive(Debug, Clone)]
pub struct MemorySource<T> {
    items: Vec<LogicalItem<T>>,
    fail_next: Option<SourceError>,
}

impl<T: Clone> MemorySource<T> {
    /// A source over pre-built records.
    #[must_use]
    pub fn new(items: Vec<LogicalItem<T>>) -> Self {
        Self {
            items,
            fail_next: None,
        }
    }

    /// A source over bare payloads, with positional cursors.
    #[must_use]
    pub fn from_payloads(payloads: impl IntoIterator<Item = T>) -> Self {
        let items = payloads
            .into_iter()
            .enumerate()
            .map(|(i, payload)| LogicalItem::new(payload, Cursor::new(format!("mem-{i}"))))
            .collect();
        Self::new(items)
    }

    /// Total number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the collection is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Make the next subscription deliver `error` instead of a batch.
    pub fn fail_next(&mut self, error: SourceError) {
        self.fail_next = Some(error);
    }

    fn position_of(&self, cursor: &Cursor) -> Option<usize> {
        self.items
            .iter()
            .position(|item| item.cursor.as_ref() == Some(cursor))
    }

    fn batch_for(&self, query: &Query) -> Result<Vec<LogicalItem<T>>, SourceError> {
        if self.items.is_empty() {
            return Ok(Vec::new());
        }
        let anchor_pos = match &query.anchor {
            Some(cursor) => self.position_of(cursor).ok_or(SourceError::AnchorMissing)?,
            None => match query.direction {
                ScrollDirection::Forward => 0,
                ScrollDirection::Reverse => self.items.len() - 1,
            },
        };
        let batch = match query.direction {
            // Anchor-inclusive, ascending.
            ScrollDirection::Forward => {
                let end = (anchor_pos + query.limit).min(self.items.len());
                self.items[anchor_pos..end].to_vec()
            }
            // Anchor-inclusive, descending.
            ScrollDirection::Reverse => {
                let start = (anchor_pos + 1).saturating_sub(query.limit);
                let mut records = self.items[start..=anchor_pos].to_vec();
                records.reverse();
                records
            }
        };
        Ok(batch)
    }
}

impl<T: Clone> RemoteSource<T> for MemorySource<T> {
    fn subscribe(&mut self, query: Query) -> Subscription<T> {
        let (tx, rx) = mpsc::channel();
        let delivery = match self.fail_next.take() {
            Some(error) => Err(error),
            None => self.batch_for(&query),
        };
        // Delivery is buffered in the channel; a dropped sender still
        // hands out what it sent.
        let _ = tx.send(delivery);
        Subscription::new(rx)
    }
}
