//! Test doubles shared by the chaincode unit tests.

use std::iter;
use std::sync::atomic::{AtomicUsize, Ordering};

use bytes::Bytes;
use msgl_host::{
    Cursor, HistoryCursor, HostError, HostResult, InMemoryLedgerHost, LedgerHost, StateCursor,
};

/// In-memory host with injectable failures and an access counter.
#[derive(Default)]
pub(crate) struct FaultyHost {
    pub inner: InMemoryLedgerHost,
    pub fail_get: bool,
    pub fail_put: bool,
    /// Scans yield this many items, then an iterator error.
    pub fail_scan_after: Option<usize>,
    pub(crate) accesses: AtomicUsize,
}

impl FaultyHost {
    pub fn accesses(&self) -> usize {
        self.accesses.load(Ordering::SeqCst)
    }

    fn touch(&self) {
        self.accesses.fetch_add(1, Ordering::SeqCst);
    }

    fn interrupt<'a, T: Send + 'a>(&self, cursor: Cursor<'a, T>) -> Cursor<'a, T> {
        match self.fail_scan_after {
            None => cursor,
            Some(n) => Cursor::new(cursor.take(n).chain(iter::once(Err(HostError::Iterator(
                "injected scan failure".into(),
            ))))),
        }
    }
}

impl LedgerHost for FaultyHost {
    fn get_state(&self, key: &str) -> HostResult<Option<Bytes>> {
        self.touch();
        if self.fail_get {
            return Err(HostError::Unavailable("injected get failure".into()));
        }
        self.inner.get_state(key)
    }

    fn put_state(&self, key: &str, value: &[u8]) -> HostResult<()> {
        self.touch();
        if self.fail_put {
            return Err(HostError::Unavailable("injected put failure".into()));
        }
        self.inner.put_state(key, value)
    }

    fn delete_state(&self, key: &str) -> HostResult<()> {
        self.touch();
        self.inner.delete_state(key)
    }

    fn range_scan(&self, start: &str, end: &str) -> HostResult<StateCursor<'_>> {
        self.touch();
        let cursor = self.inner.range_scan(start, end)?;
        Ok(self.interrupt(cursor))
    }

    fn history_scan(&self, key: &str) -> HostResult<HistoryCursor<'_>> {
        self.touch();
        let cursor = self.inner.history_scan(key)?;
        Ok(self.interrupt(cursor))
    }
}
