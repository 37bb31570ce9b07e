//! Items produced by ledger host reads and scans.

use std::fmt;

use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::HostResult;

/// Identifier of the ledger transaction that produced a modification.
///
/// Generated ids are UUID v7 values rendered as 32 lowercase hex digits, so
/// they sort in issue order.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TxId(String);

impl TxId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Issue a fresh, time-ordered transaction id.
    pub fn generate() -> Self {
        Self(uuid::Uuid::now_v7().simple().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One item of a range scan: a key and its current raw value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyValue {
    /// Ledger key.
    pub key: String,
    /// Current raw value, exactly as it was put.
    pub value: Bytes,
}

/// One historical write or deletion of a single key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyModification {
    /// Transaction that made the change.
    pub tx_id: TxId,
    /// When the host committed the change.
    pub timestamp: DateTime<Utc>,
    /// `None` marks a deletion.
    pub value: Option<Bytes>,
}

impl KeyModification {
    /// A write stamped with a fresh transaction id and the current time.
    pub fn write(value: Bytes) -> Self {
        Self {
            tx_id: TxId::generate(),
            timestamp: Utc::now(),
            value: Some(value),
        }
    }

    /// A deletion stamped with a fresh transaction id and the current time.
    pub fn delete() -> Self {
        Self {
            tx_id: TxId::generate(),
            timestamp: Utc::now(),
            value: None,
        }
    }

    pub fn is_delete(&self) -> bool {
        self.value.is_none()
    }
}

/// A lazy, finite, non-restartable scan over host state.
///
/// The host-side resource behind a cursor is released exactly once, either
/// by [`Cursor::close`] or when the cursor is dropped, so an early return
/// through `?` cannot leak it. After the first error the cursor yields
/// nothing further.
pub struct Cursor<'a, T> {
    items: Box<dyn Iterator<Item = HostResult<T>> + Send + 'a>,
    release: Option<Box<dyn FnOnce() + Send + 'a>>,
    failed: bool,
}

/// Cursor over `(key, value)` pairs of a range scan.
pub type StateCursor<'a> = Cursor<'a, KeyValue>;

/// Cursor over the modifications of one key, oldest first.
pub type HistoryCursor<'a> = Cursor<'a, KeyModification>;

impl<'a, T> Cursor<'a, T> {
    pub fn new<I>(items: I) -> Self
    where
        I: Iterator<Item = HostResult<T>> + Send + 'a,
    {
        Self {
            items: Box::new(items),
            release: None,
            failed: false,
        }
    }

    /// Cursor over items that are already materialized.
    pub fn from_items(items: Vec<T>) -> Self
    where
        T: Send + 'a,
    {
        Self::new(items.into_iter().map(Ok))
    }

    /// Run `release` when the cursor is closed or dropped.
    pub fn on_release<F>(mut self, release: F) -> Self
    where
        F: FnOnce() + Send + 'a,
    {
        self.release = Some(Box::new(release));
        self
    }

    /// Release the cursor now.
    pub fn close(mut self) {
        self.release_once();
    }

    fn release_once(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl<T> Iterator for Cursor<'_, T> {
    type Item = HostResult<T>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        let item = self.items.next()?;
        if item.is_err() {
            self.failed = true;
        }
        Some(item)
    }
}

impl<T> Drop for Cursor<'_, T> {
    fn drop(&mut self) {
        self.release_once();
    }
}

impl<T> fmt::Debug for Cursor<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cursor")
            .field("open", &self.release.is_some())
            .field("failed", &self.failed)
            .finish()
    }
}
