//! Messaging chaincode over a [`msgl_host::LedgerHost`].
//!
//! Manages two asset types: messengers (registered senders) and messages
//! (records a messenger sends, embedding a snapshot of the sender). Writes
//! enforce uniqueness, referential integrity and company authorization
//! before their single mutation. Reads assemble range scans, key histories
//! and a snapshot of both asset types into JSON.
//!
//! Callers either use the typed operations on [`Chaincode`] directly or go
//! through [`Chaincode::invoke`] with a command name and string arguments.

mod accessors;
pub mod chaincode;
pub mod config;
pub mod dispatch;
pub mod error;
mod query;
pub mod records;
pub mod response;
pub mod validation;
mod write;

#[cfg(test)]
mod testutil;

pub use chaincode::Chaincode;
pub use config::{ChaincodeConfig, KeyRange};
pub use dispatch::Command;
pub use error::{ChaincodeError, ChaincodeResult, EntityKind, ErrorKind};
pub use records::{AuditEntry, Everything, Message, Messenger, MessengerSnapshot};
pub use response::Response;
pub use validation::{sanitize_arguments, Arity};

// Re-export the host boundary so embedders need one dependency.
pub use msgl_host::{FileLedgerHost, InMemoryLedgerHost, LedgerHost};
