//! A ledger host persisted as an append-only journal.

use std::path::Path;
use std::sync::Mutex;

use bytes::Bytes;
use tracing::{info, warn};

use crate::error::{HostError, HostResult};
use crate::journal::{Journal, JournalConfig, JournalEntry};
use crate::memory::InMemoryLedgerHost;
use crate::traits::{check_key, LedgerHost};
use crate::types::{HistoryCursor, KeyModification, StateCursor};

/// File-backed ledger host.
///
/// State and history are held by an [`InMemoryLedgerHost`] that is rebuilt
/// at open time by replaying the journal. Each mutation is journaled before
/// it is applied, under a single commit lock, so journal order and history
/// order agree.
pub struct FileLedgerHost {
    state: InMemoryLedgerHost,
    journal: Journal,
    commit: Mutex<()>,
}

impl FileLedgerHost {
    /// Open the journal at `path` (creating it if needed) and replay it.
    ///
    /// A torn tail left by an interrupted append is cut off before the host
    /// accepts new writes.
    pub fn open(path: &Path, config: JournalConfig) -> HostResult<Self> {
        let journal = Journal::open(path, config)?;
        let state = InMemoryLedgerHost::new();

        let recovery = journal.recover()?;
        if recovery.has_torn_tail() {
            warn!(
                path = %path.display(),
                valid_len = recovery.valid_len,
                file_len = recovery.file_len,
                "dropping torn journal tail"
            );
            journal.truncate_to(recovery.valid_len)?;
        }

        let replayed = recovery.entries.len();
        for entry in recovery.entries {
            let (key, modification) = entry.into_modification();
            state.apply(&key, modification)?;
        }

        info!(path = %path.display(), replayed, keys = state.len(), "ledger host opened");
        Ok(Self {
            state,
            journal,
            commit: Mutex::new(()),
        })
    }

    /// Cursors opened by this host and not yet closed or dropped.
    pub fn open_cursors(&self) -> usize {
        self.state.open_cursors()
    }

    fn commit(&self, key: &str, modification: KeyModification) -> HostResult<()> {
        let _guard = self.commit.lock().map_err(|_| HostError::LockPoisoned)?;
        self.journal.append(&JournalEntry::new(key, &modification))?;
        self.state.apply(key, modification)
    }
}

impl LedgerHost for FileLedgerHost {
    fn get_state(&self, key: &str) -> HostResult<Option<Bytes>> {
        self.state.get_state(key)
    }

    fn put_state(&self, key: &str, value: &[u8]) -> HostResult<()> {
        check_key(key)?;
        self.commit(key, KeyModification::write(Bytes::copy_from_slice(value)))
    }

    fn delete_state(&self, key: &str) -> HostResult<()> {
        check_key(key)?;
        self.commit(key, KeyModification::delete())
    }

    fn range_scan(&self, start: &str, end: &str) -> HostResult<StateCursor<'_>> {
        self.state.range_scan(start, end)
    }

    fn history_scan(&self, key: &str) -> HostResult<HistoryCursor<'_>> {
        self.state.history_scan(key)
    }
}

impl std::fmt::Debug for FileLedgerHost {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileLedgerHost")
            .field("journal", &self.journal)
            .field("state", &self.state)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn open(dir: &TempDir) -> FileLedgerHost {
        FileLedgerHost::open(&dir.path().join("ledger.journal"), JournalConfig::default())
            .unwrap()
    }

    #[test]
    fn state_survives_reopen() {
        let dir = TempDir::new().unwrap();
        {
            let host = open(&dir);
            host.put_state("o1", b"{\"id\":\"o1\"}").unwrap();
            host.put_state("m1", b"{\"id\":\"m1\"}").unwrap();
            host.delete_state("m1").unwrap();
        }

        let host = open(&dir);
        assert_eq!(
            host.get_state("o1").unwrap(),
            Some(Bytes::from_static(b"{\"id\":\"o1\"}"))
        );
        assert_eq!(host.get_state("m1").unwrap(), None);
    }

    #[test]
    fn history_survives_reopen_with_tx_ids() {
        let dir = TempDir::new().unwrap();
        let before: Vec<_> = {
            let host = open(&dir);
            host.put_state("m1", b"a").unwrap();
            host.delete_state("m1").unwrap();
            host.history_scan("m1").unwrap().map(|m| m.unwrap()).collect()
        };

        let host = open(&dir);
        let after: Vec<_> = host.history_scan("m1").unwrap().map(|m| m.unwrap()).collect();
        assert_eq!(after.len(), 2);
        assert_eq!(after[0].tx_id, before[0].tx_id);
        assert_eq!(after[0].value, Some(Bytes::from_static(b"a")));
        assert!(after[1].is_delete());
    }

    #[test]
    fn empty_key_is_not_journaled() {
        let dir = TempDir::new().unwrap();
        let host = open(&dir);
        assert!(matches!(host.put_state("", b"x"), Err(HostError::EmptyKey)));
        drop(host);
        assert!(open(&dir).state.is_empty());
    }

    #[test]
    fn writes_after_a_torn_tail_survive_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("ledger.journal");
        {
            let host = open(&dir);
            host.put_state("o1", b"one").unwrap();
            host.put_state("o2", b"two").unwrap();
        }
        let bytes = std::fs::read(&path).unwrap();
        std::fs::write(&path, &bytes[..bytes.len() - 3]).unwrap();

        {
            let host = open(&dir);
            assert_eq!(host.get_state("o2").unwrap(), None);
            host.put_state("o3", b"three").unwrap();
            host.put_state("o4", b"four").unwrap();
        }

        let host = open(&dir);
        assert_eq!(host.get_state("o1").unwrap(), Some(Bytes::from_static(b"one")));
        assert_eq!(host.get_state("o3").unwrap(), Some(Bytes::from_static(b"three")));
        assert_eq!(host.get_state("o4").unwrap(), Some(Bytes::from_static(b"four")));
        assert_eq!(host.history_scan("o3").unwrap().count(), 1);
    }

    #[test]
    fn range_scan_after_reopen_is_ordered() {
        let dir = TempDir::new().unwrap();
        {
            let host = open(&dir);
            for key in ["o2", "m2", "o1", "m1"] {
                host.put_state(key, b"{}").unwrap();
            }
        }
        let host = open(&dir);
        let keys: Vec<_> = host
            .range_scan("o0", "o9999999999999999999")
            .unwrap()
            .map(|kv| kv.unwrap().key)
            .collect();
        assert_eq!(keys, vec!["o1", "o2"]);
        assert_eq!(host.open_cursors(), 0);
    }
}
