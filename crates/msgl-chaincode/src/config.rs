use serde::{Deserialize, Serialize};

/// A lexical key range, start inclusive and end exclusive.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyRange {
    pub start: String,
    pub end: String,
}

impl KeyRange {
    pub fn new(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
        }
    }
}

/// Configuration for the messaging chaincode.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChaincodeConfig {
    /// Longest accepted positional argument, in characters.
    pub max_argument_len: usize,
    /// Key space holding every messenger; ids are `o` plus digits.
    pub messenger_keys: KeyRange,
    /// Key space holding every message; ids are `m` plus digits.
    pub message_keys: KeyRange,
}

impl Default for ChaincodeConfig {
    fn default() -> Self {
        Self {
            max_argument_len: 32,
            messenger_keys: KeyRange::new("o0", "o9999999999999999999"),
            message_keys: KeyRange::new("m0", "m9999999999999999999"),
        }
    }
}
