/// Errors produced by a ledger host.
#[derive(Debug, thiserror::Error)]
pub enum HostError {
    /// The host refuses empty keys.
    #[error("key must not be an empty string")]
    EmptyKey,

    /// I/O error from the journal or another backing file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization or deserialization failure.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// A host state lock was poisoned by a panicking writer.
    #[error("host state lock poisoned")]
    LockPoisoned,

    /// A range or history scan failed part-way through.
    #[error("iterator error: {0}")]
    Iterator(String),

    /// The host cannot serve the request at all.
    #[error("host unavailable: {0}")]
    Unavailable(String),
}

/// Result alias for host operations.
pub type HostResult<T> = Result<T, HostError>;
