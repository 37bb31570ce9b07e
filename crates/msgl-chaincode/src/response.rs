use serde::{Deserialize, Serialize};

use crate::error::{ChaincodeResult, ErrorKind};

/// Status of a successful invocation.
pub const OK: u16 = 200;

/// Status of a failed invocation.
pub const ERROR: u16 = 500;

/// Outcome of one dispatched invocation: a payload on success, a message on
/// failure.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    /// [`OK`] or [`ERROR`].
    pub status: u16,
    /// Error message; empty on success.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub message: String,
    /// Operation output; empty for writes and failures.
    #[serde(default)]
    pub payload: Vec<u8>,
    /// Taxonomy of the failure; not part of the wire envelope.
    #[serde(skip)]
    pub kind: Option<ErrorKind>,
}

impl Response {
    pub fn success(payload: Vec<u8>) -> Self {
        Self {
            status: OK,
            message: String::new(),
            payload,
            kind: None,
        }
    }

    pub fn error(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            status: ERROR,
            message: message.into(),
            payload: Vec::new(),
            kind: Some(kind),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == OK
    }
}

impl From<ChaincodeResult<Vec<u8>>> for Response {
    fn from(result: ChaincodeResult<Vec<u8>>) -> Self {
        match result {
            Ok(payload) => Self::success(payload),
            Err(e) => Self::error(e.kind(), e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ChaincodeError;

    #[test]
    fn from_result() {
        let result: ChaincodeResult<Vec<u8>> = Ok(b"x".to_vec());
        let ok = Response::from(result);
        assert!(ok.is_ok());
        assert_eq!(ok.payload, b"x");

        let result: ChaincodeResult<Vec<u8>> = Err(ChaincodeError::UnknownFunction("nope".into()));
        let err = Response::from(result);
        assert_eq!(err.status, ERROR);
        assert_eq!(err.kind, Some(ErrorKind::Validation));
        assert_eq!(err.message, "received unknown function name - 'nope'");
        assert!(err.payload.is_empty());
    }
}
