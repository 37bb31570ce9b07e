//! Ledger host boundary for the messaging ledger.
//!
//! The messaging chaincode never touches storage directly. It consumes the
//! five primitives of the [`LedgerHost`] trait: point read, put, delete,
//! lexical range scan, and per-key history scan. The host owns durability
//! and the serialization of concurrent writes.
//!
//! # Hosts
//!
//! - [`InMemoryLedgerHost`] -- ordered map plus per-key modification log,
//!   for tests and embedding
//! - [`FileLedgerHost`] -- the in-memory host rebuilt from, and kept in step
//!   with, an append-only [`Journal`] file
//!
//! # Design Rules
//!
//! 1. A missing key reads as `Ok(None)`, never as an error.
//! 2. Every put and delete is one transaction with its own [`TxId`].
//! 3. Deletions stay visible in history as value-less modifications.
//! 4. Scans are [`Cursor`]s that release host state when closed or dropped.

pub mod error;
pub mod file;
pub mod journal;
pub mod memory;
pub mod traits;
pub mod types;

pub use error::{HostError, HostResult};
pub use file::FileLedgerHost;
pub use journal::{Journal, JournalConfig, JournalEntry, Recovery, SyncMode};
pub use memory::InMemoryLedgerHost;
pub use traits::LedgerHost;
pub use types::{Cursor, HistoryCursor, KeyModification, KeyValue, StateCursor, TxId};
