//! Stored asset records and the composite read results built from them.
//!
//! Records are stored as JSON. Decoding is lenient: bytes that are empty or
//! do not parse decode to the all-empty record, which the accessors then
//! classify as absent.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ChaincodeError, ChaincodeResult};

/// `docType` tag of stored messengers.
pub const MESSENGER_DOC_TYPE: &str = "message_messenger";

/// `docType` tag of stored messages.
pub const MESSAGE_DOC_TYPE: &str = "message";

/// A registered sender.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Messenger {
    /// Always [`MESSENGER_DOC_TYPE`] for records this crate writes.
    #[serde(rename = "docType")]
    pub object_type: String,
    /// Ledger key, `o` plus digits by convention.
    pub id: String,
    /// Lowercased; empty means the record is absent.
    pub username: String,
    /// Never populated by `createMessenger`.
    pub company: String,
}

impl Messenger {
    /// A new messenger record; `username` is stored lowercased.
    pub fn new(id: impl Into<String>, username: &str) -> Self {
        Self {
            object_type: MESSENGER_DOC_TYPE.to_string(),
            id: id.into(),
            username: username.to_lowercase(),
            company: String::new(),
        }
    }

    /// Copy of the identity fields a message embeds at creation time.
    pub fn snapshot(&self) -> MessengerSnapshot {
        MessengerSnapshot {
            id: self.id.clone(),
            username: self.username.clone(),
            company: String::new(),
        }
    }
}

/// The sender identity embedded in a message: a value copy taken when the
/// message was created, not a reference to the messenger record.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MessengerSnapshot {
    /// Id of the sending messenger.
    pub id: String,
    /// Sender's username at send time.
    pub username: String,
    /// The company `deleteMessage` authorizes against.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub company: String,
}

/// A record a messenger sends.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Message {
    /// Always [`MESSAGE_DOC_TYPE`] for records this crate writes.
    #[serde(rename = "docType")]
    pub doc_type: String,
    /// Ledger key, `m` plus digits by convention; must match the key it is
    /// stored under.
    pub id: String,
    pub text: String,
    pub priority: i64,
    /// Sender identity copied at creation.
    pub messenger: MessengerSnapshot,
}

impl Message {
    pub fn new(
        id: impl Into<String>,
        text: impl Into<String>,
        priority: i64,
        messenger: MessengerSnapshot,
    ) -> Self {
        Self {
            doc_type: MESSAGE_DOC_TYPE.to_string(),
            id: id.into(),
            text: text.into(),
            priority,
            messenger,
        }
    }
}

/// One entry of a key's audit trail.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEntry {
    /// Transaction that wrote or deleted the key.
    #[serde(rename = "txId")]
    pub tx_id: String,
    /// The value written by the transaction, or the empty record for a
    /// deletion.
    pub value: Message,
}

/// Every messenger and every message on the ledger.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Everything {
    pub messengers: Vec<Messenger>,
    pub messages: Vec<Message>,
}

/// Decode a stored record, falling back to the empty record.
pub fn decode_lenient<T: DeserializeOwned + Default>(bytes: &[u8]) -> T {
    if bytes.is_empty() {
        return T::default();
    }
    serde_json::from_slice(bytes).unwrap_or_else(|e| {
        debug!(error = %e, "stored value does not decode; using empty record");
        T::default()
    })
}

pub fn encode<T: Serialize>(value: &T) -> ChaincodeResult<Vec<u8>> {
    serde_json::to_vec(value).map_err(|e| ChaincodeError::Serialization(e.to_string()))
}
