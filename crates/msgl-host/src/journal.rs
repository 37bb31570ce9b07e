use std::fs::{self, File, OpenOptions};
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use bytes::Bytes;
use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{HostError, HostResult};
use crate::types::{KeyModification, TxId};

/// One journaled ledger modification.
///
/// On-disk format:
/// ```text
/// [4 bytes: payload length (little-endian u32)]
/// [4 bytes: CRC32 of payload (little-endian u32)]
/// [N bytes: payload (bincode-serialized JournalEntry)]
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalEntry {
    /// Transaction id, as rendered by [`TxId`].
    pub tx_id: String,
    /// Commit time in milliseconds since the Unix epoch.
    pub timestamp_ms: i64,
    /// Key the modification applies to.
    pub key: String,
    /// `None` records a deletion.
    pub value: Option<Vec<u8>>,
}

impl JournalEntry {
    pub fn new(key: &str, modification: &KeyModification) -> Self {
        Self {
            tx_id: modification.tx_id.as_str().to_string(),
            timestamp_ms: modification.timestamp.timestamp_millis(),
            key: key.to_string(),
            value: modification.value.as_ref().map(|v| v.to_vec()),
        }
    }

    /// Split back into the key and the modification it recorded.
    pub fn into_modification(self) -> (String, KeyModification) {
        let timestamp: DateTime<Utc> = Utc
            .timestamp_millis_opt(self.timestamp_ms)
            .single()
            .unwrap_or_default();
        let modification = KeyModification {
            tx_id: TxId::new(self.tx_id),
            timestamp,
            value: self.value.map(Bytes::from),
        };
        (self.key, modification)
    }
}

/// Flush/sync strategy for the journal.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncMode {
    /// `fsync` after every append.
    EveryWrite,
    /// Flush to the OS and let it decide when to persist.
    #[default]
    OsDefault,
}

/// Configuration for the journal.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct JournalConfig {
    /// When appends are forced to stable storage.
    pub sync_mode: SyncMode,
}

/// Header size: 4 bytes length + 4 bytes CRC.
const HEADER_SIZE: usize = 8;

/// Append-only journal of ledger modifications.
///
/// Entries are serialized with bincode, framed with a length prefix and a
/// CRC32 checksum. Recovery reads the file front to back; an entry that
/// fails its checksum is skipped and a truncated tail ends recovery.
pub struct Journal {
    path: PathBuf,
    writer: Mutex<BufWriter<File>>,
    config: JournalConfig,
}

impl Journal {
    /// Open (or create) the journal file at `path`.
    pub fn open(path: &Path, config: JournalConfig) -> HostResult<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let file = OpenOptions::new()
            .create(true)
            .read(true)
            .append(true)
            .open(path)?;

        Ok(Self {
            path: path.to_path_buf(),
            writer: Mutex::new(BufWriter::new(file)),
            config,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one entry and flush it according to the sync mode.
    pub fn append(&self, entry: &JournalEntry) -> HostResult<()> {
        let payload =
            bincode::serialize(entry).map_err(|e| HostError::Serialization(e.to_string()))?;
        let length = u32::try_from(payload.len())
            .map_err(|_| HostError::Serialization("journal entry exceeds 4 GiB".into()))?;
        let crc = crc32fast::hash(&payload);

        let mut writer = self.writer.lock().map_err(|_| HostError::LockPoisoned)?;
        writer.write_all(&length.to_le_bytes())?;
        writer.write_all(&crc.to_le_bytes())?;
        writer.write_all(&payload)?;
        writer.flush()?;
        if self.config.sync_mode == SyncMode::EveryWrite {
            writer.get_ref().sync_all()?;
        }

        debug!(key = %entry.key, tx_id = %entry.tx_id, len = payload.len(), "journal append");
        Ok(())
    }

    /// Read back every intact entry, in append order.
    ///
    /// The returned [`Recovery`] also records where the last well-framed
    /// entry ends; bytes past that point are a torn write.
    pub fn recover(&self) -> HostResult<Recovery> {
        let file = File::open(&self.path)?;
        let file_len = file.metadata()?.len();
        let mut reader = BufReader::new(file);
        let mut entries = Vec::new();
        let mut offset: u64 = 0;

        while offset + HEADER_SIZE as u64 <= file_len {
            let mut header = [0u8; HEADER_SIZE];
            match reader.read_exact(&mut header) {
                Ok(()) => {}
                Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => break,
                Err(e) => return Err(e.into()),
            }

            let length = u32::from_le_bytes([header[0], header[1], header[2], header[3]]);
            let expected_crc = u32::from_le_bytes([header[4], header[5], header[6], header[7]]);
            let end = offset + HEADER_SIZE as u64 + u64::from(length);
            if length == 0 || end > file_len {
                warn!(offset, length, file_len, "invalid journal entry length; stopping recovery");
                break;
            }

            let mut payload = vec![0u8; length as usize];
            match reader.read_exact(&mut payload) {
                Ok(()) => {}
                Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => {
                    warn!(offset, length, "truncated journal entry; stopping recovery");
                    break;
                }
                Err(e) => return Err(e.into()),
            }
            let entry_offset = offset;
            offset = end;

            let actual_crc = crc32fast::hash(&payload);
            if actual_crc != expected_crc {
                warn!(
                    offset = entry_offset,
                    expected = expected_crc,
                    actual = actual_crc,
                    "CRC mismatch; skipping journal entry"
                );
                continue;
            }

            match bincode::deserialize::<JournalEntry>(&payload) {
                Ok(entry) => entries.push(entry),
                Err(e) => {
                    warn!(offset = entry_offset, error = %e, "undecodable journal entry; skipping");
                }
            }
        }

        debug!(recovered = entries.len(), valid_len = offset, file_len, "journal recovery complete");
        Ok(Recovery {
            entries,
            valid_len: offset,
            file_len,
        })
    }

    /// Cut the file back to `len` bytes so later appends follow the last
    /// intact entry.
    pub fn truncate_to(&self, len: u64) -> HostResult<()> {
        let mut writer = self.writer.lock().map_err(|_| HostError::LockPoisoned)?;
        writer.flush()?;
        writer.get_ref().set_len(len)?;
        writer.get_ref().sync_all()?;
        debug!(len, "journal truncated");
        Ok(())
    }
}

/// Result of reading a journal back.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Recovery {
    /// Intact entries, in append order.
    pub entries: Vec<JournalEntry>,
    /// Byte length of the well-framed prefix of the file.
    pub valid_len: u64,
    /// Byte length of the file when it was read.
    pub file_len: u64,
}

impl Recovery {
    /// True if the file ends in bytes that do not frame a whole entry.
    pub fn has_torn_tail(&self) -> bool {
        self.valid_len < self.file_len
    }
}

impl std::fmt::Debug for Journal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Journal")
            .field("path", &self.path)
            .field("config", &self.config)
            .finish()
    }
}
