use std::collections::{BTreeMap, HashMap};
use std::ops::Bound;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use bytes::Bytes;

use crate::error::{HostError, HostResult};
use crate::traits::{check_key, LedgerHost};
use crate::types::{Cursor, HistoryCursor, KeyModification, KeyValue, StateCursor};

/// In-memory ledger host for tests, local demos, and embedding.
///
/// Current state lives in an ordered map so range scans come out in key
/// order; every modification is also appended to a per-key log that backs
/// history scans. Cursors snapshot their items when opened and are counted
/// until released.
pub struct InMemoryLedgerHost {
    inner: RwLock<HostState>,
    open_cursors: Arc<AtomicUsize>,
}

#[derive(Default)]
struct HostState {
    current: BTreeMap<String, Bytes>,
    history: HashMap<String, Vec<KeyModification>>,
}

impl InMemoryLedgerHost {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(HostState::default()),
            open_cursors: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Number of keys currently holding a value.
    pub fn len(&self) -> usize {
        self.read_state().map(|s| s.current.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Cursors opened by this host and not yet closed or dropped.
    pub fn open_cursors(&self) -> usize {
        self.open_cursors.load(Ordering::SeqCst)
    }

    /// Apply one modification to current state and to the key's history.
    pub(crate) fn apply(&self, key: &str, modification: KeyModification) -> HostResult<()> {
        let mut state = self.write_state()?;
        match &modification.value {
            Some(value) => {
                state.current.insert(key.to_string(), value.clone());
            }
            None => {
                state.current.remove(key);
            }
        }
        state
            .history
            .entry(key.to_string())
            .or_default()
            .push(modification);
        Ok(())
    }

    fn read_state(&self) -> HostResult<RwLockReadGuard<'_, HostState>> {
        self.inner.read().map_err(|_| HostError::LockPoisoned)
    }

    fn write_state(&self) -> HostResult<RwLockWriteGuard<'_, HostState>> {
        self.inner.write().map_err(|_| HostError::LockPoisoned)
    }

    fn tracked_cursor<T: Send + 'static>(&self, items: Vec<T>) -> Cursor<'static, T> {
        self.open_cursors.fetch_add(1, Ordering::SeqCst);
        let open = Arc::clone(&self.open_cursors);
        Cursor::from_items(items).on_release(move || {
            open.fetch_sub(1, Ordering::SeqCst);
        })
    }
}

impl Default for InMemoryLedgerHost {
    fn default() -> Self {
        Self::new()
    }
}

impl LedgerHost for InMemoryLedgerHost {
    fn get_state(&self, key: &str) -> HostResult<Option<Bytes>> {
        check_key(key)?;
        Ok(self.read_state()?.current.get(key).cloned())
    }

    fn put_state(&self, key: &str, value: &[u8]) -> HostResult<()> {
        check_key(key)?;
        self.apply(key, KeyModification::write(Bytes::copy_from_slice(value)))
    }

    fn delete_state(&self, key: &str) -> HostResult<()> {
        check_key(key)?;
        self.apply(key, KeyModification::delete())
    }

    fn range_scan(&self, start: &str, end: &str) -> HostResult<StateCursor<'_>> {
        let lower = if start.is_empty() {
            Bound::Unbounded
        } else {
            Bound::Included(start)
        };
        let upper = if end.is_empty() {
            Bound::Unbounded
        } else {
            Bound::Excluded(end)
        };

        let items = if !start.is_empty() && !end.is_empty() && start >= end {
            Vec::new()
        } else {
            self.read_state()?
                .current
                .range::<str, _>((lower, upper))
                .map(|(key, value)| KeyValue {
                    key: key.clone(),
                    value: value.clone(),
                })
                .collect()
        };

        Ok(self.tracked_cursor(items))
    }

    fn history_scan(&self, key: &str) -> HostResult<HistoryCursor<'_>> {
        check_key(key)?;
        let items = self
            .read_state()?
            .history
            .get(key)
            .cloned()
            .unwrap_or_default();
        Ok(self.tracked_cursor(items))
    }
}

impl std::fmt::Debug for InMemoryLedgerHost {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryLedgerHost")
            .field("key_count", &self.len())
            .field("open_cursors", &self.open_cursors())
            .finish()
    }
}
