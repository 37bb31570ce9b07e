use std::fmt;

use msgl_host::HostError;

use crate::validation::Arity;

/// The two asset types the chaincode manages.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntityKind {
    Messenger,
    Message,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKind::Messenger => f.write_str("messenger"),
            EntityKind::Message => f.write_str("message"),
        }
    }
}

/// Coarse classification of a [`ChaincodeError`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed, oversized, missing or surplus argument.
    Validation,
    /// Entity absent, or its fetch failed.
    NotFound,
    /// Duplicate id on create.
    Conflict,
    /// Company mismatch on delete.
    Authorization,
    /// Underlying store or iterator failure.
    Host,
    /// Encoding failure of a record this crate built itself.
    Internal,
}

/// Errors produced by chaincode operations. All are terminal for the
/// operation that raised them.
#[derive(Debug, thiserror::Error)]
pub enum ChaincodeError {
    #[error("incorrect number of arguments: expecting {expected}, got {actual}")]
    ArgumentCount { expected: Arity, actual: usize },

    #[error("argument {position} must be a non-empty string")]
    EmptyArgument { position: usize },

    #[error("argument {position} must be <= {max} characters")]
    ArgumentTooLong { position: usize, max: usize },

    #[error("argument {position} must be a numeric string, got {value:?}")]
    NotNumeric { position: usize, value: String },

    #[error("received unknown function name - '{0}'")]
    UnknownFunction(String),

    #[error("{kind} does not exist - {id}")]
    NotFound { kind: EntityKind, id: String },

    /// The host failed the point read; the entity is treated as absent.
    #[error("failed to get {kind} - {id}: {source}")]
    FetchFailed {
        kind: EntityKind,
        id: String,
        #[source]
        source: HostError,
    },

    #[error("this {kind} already exists - {id}")]
    AlreadyExists { kind: EntityKind, id: String },

    #[error("the company '{company}' cannot authorize deletion for '{owner}'")]
    Unauthorized { company: String, owner: String },

    #[error("failed to get state for {key}: {source}")]
    StateUnavailable {
        key: String,
        #[source]
        source: HostError,
    },

    #[error("host error: {0}")]
    Host(#[from] HostError),

    #[error("serialization error: {0}")]
    Serialization(String),
}

impl ChaincodeError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ChaincodeError::ArgumentCount { .. }
            | ChaincodeError::EmptyArgument { .. }
            | ChaincodeError::ArgumentTooLong { .. }
            | ChaincodeError::NotNumeric { .. }
            | ChaincodeError::UnknownFunction(_) => ErrorKind::Validation,
            ChaincodeError::NotFound { .. } | ChaincodeError::FetchFailed { .. } => {
                ErrorKind::NotFound
            }
            ChaincodeError::AlreadyExists { .. } => ErrorKind::Conflict,
            ChaincodeError::Unauthorized { .. } => ErrorKind::Authorization,
            ChaincodeError::StateUnavailable { .. } | ChaincodeError::Host(_) => ErrorKind::Host,
            ChaincodeError::Serialization(_) => ErrorKind::Internal,
        }
    }
}

/// Result alias for chaincode operations.
pub type ChaincodeResult<T> = Result<T, ChaincodeError>;
