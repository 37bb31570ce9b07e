//! The [`LedgerHost`] trait: the primitives the messaging chaincode consumes.

use std::sync::Arc;

use bytes::Bytes;

use crate::error::HostResult;
use crate::types::{HistoryCursor, StateCursor};

/// A versioned, ordered key-value store that owns durability and the
/// serialization of concurrent writes.
///
/// All implementations must satisfy these rules:
/// - Keys are non-empty; an empty key fails with `HostError::EmptyKey`.
/// - Every put and every delete is its own transaction and appears in the
///   key's history, including deletes of keys that are not present.
/// - Range scans order keys lexically by their bytes.
/// - Cursors hold host-side state until closed or dropped.
pub trait LedgerHost: Send + Sync {
    /// Read the current value of `key`.
    ///
    /// Returns `Ok(None)` if the key has never been written or was deleted.
    fn get_state(&self, key: &str) -> HostResult<Option<Bytes>>;

    /// Write `value` at `key`, replacing any current value.
    fn put_state(&self, key: &str, value: &[u8]) -> HostResult<()>;

    /// Remove `key` from the current state.
    fn delete_state(&self, key: &str) -> HostResult<()>;

    /// Scan current state for keys in `[start, end)`.
    ///
    /// An empty `start` or `end` leaves that side unbounded.
    fn range_scan(&self, start: &str, end: &str) -> HostResult<StateCursor<'_>>;

    /// Scan every modification of `key`, oldest first.
    fn history_scan(&self, key: &str) -> HostResult<HistoryCursor<'_>>;
}

impl<T: LedgerHost + ?Sized> LedgerHost for &T {
    fn get_state(&self, key: &str) -> HostResult<Option<Bytes>> {
        (**self).get_state(key)
    }

    fn put_state(&self, key: &str, value: &[u8]) -> HostResult<()> {
        (**self).put_state(key, value)
    }

    fn delete_state(&self, key: &str) -> HostResult<()> {
        (**self).delete_state(key)
    }

    fn range_scan(&self, start: &str, end: &str) -> HostResult<StateCursor<'_>> {
        (**self).range_scan(start, end)
    }

    fn history_scan(&self, key: &str) -> HostResult<HistoryCursor<'_>> {
        (**self).history_scan(key)
    }
}

impl<T: LedgerHost + ?Sized> LedgerHost for Arc<T> {
    fn get_state(&self, key: &str) -> HostResult<Option<Bytes>> {
        (**self).get_state(key)
    }

    fn put_state(&self, key: &str, value: &[u8]) -> HostResult<()> {
        (**self).put_state(key, value)
    }

    fn delete_state(&self, key: &str) -> HostResult<()> {
        (**self).delete_state(key)
    }

    fn range_scan(&self, start: &str, end: &str) -> HostResult<StateCursor<'_>> {
        (**self).range_scan(start, end)
    }

    fn history_scan(&self, key: &str) -> HostResult<HistoryCursor<'_>> {
        (**self).history_scan(key)
    }
}

pub(crate) fn check_key(key: &str) -> HostResult<()> {
    if key.is_empty() {
        return Err(crate::error::HostError::EmptyKey);
    }
    Ok(())
}
