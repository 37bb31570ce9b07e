//! Fetch-and-decode of the two asset types.
//!
//! The host gives no not-found signal of its own: an unknown key and an
//! empty value both come back as nothing. Presence is therefore inferred
//! from a required field of the decoded record, and a failed fetch counts
//! as absence.

use msgl_host::LedgerHost;
use tracing::{debug, warn};

use crate::chaincode::Chaincode;
use crate::error::{ChaincodeError, ChaincodeResult, EntityKind};
use crate::records::{decode_lenient, Message, Messenger};

impl<H: LedgerHost> Chaincode<H> {
    /// Look up a messenger. `Ok(None)` when the stored record has no
    /// username.
    pub fn find_messenger(&self, id: &str) -> ChaincodeResult<Option<Messenger>> {
        let bytes = self.fetch(EntityKind::Messenger, id)?;
        let messenger: Messenger = decode_lenient(bytes.as_deref().unwrap_or_default());
        Ok((!messenger.username.is_empty()).then_some(messenger))
    }

    /// Look up a message. `Ok(None)` when the stored record's id differs
    /// from `id`.
    pub fn find_message(&self, id: &str) -> ChaincodeResult<Option<Message>> {
        let bytes = self.fetch(EntityKind::Message, id)?;
        let message: Message = decode_lenient(bytes.as_deref().unwrap_or_default());
        Ok((message.id == id).then_some(message))
    }

    pub fn get_messenger(&self, id: &str) -> ChaincodeResult<Messenger> {
        self.find_messenger(id)?
            .ok_or_else(|| not_found(EntityKind::Messenger, id))
    }

    pub fn get_message(&self, id: &str) -> ChaincodeResult<Message> {
        self.find_message(id)?
            .ok_or_else(|| not_found(EntityKind::Message, id))
    }

    fn fetch(&self, kind: EntityKind, id: &str) -> ChaincodeResult<Option<bytes::Bytes>> {
        debug!(%kind, id, "fetching");
        self.host.get_state(id).map_err(|source| {
            warn!(%kind, id, error = %source, "fetch failed, treating as absent");
            ChaincodeError::FetchFailed {
                kind,
                id: id.to_string(),
                source,
            }
        })
    }
}

fn not_found(kind: EntityKind, id: &str) -> ChaincodeError {
    ChaincodeError::NotFound {
        kind,
        id: id.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use msgl_host::InMemoryLedgerHost;

    use super::*;
    use crate::error::ErrorKind;
    use crate::records::{encode, MessengerSnapshot};
    use crate::testutil::FaultyHost;

    #[test]
    fn absent_messenger_is_not_found() {
        let cc = Chaincode::new(InMemoryLedgerHost::new());
        assert!(cc.find_messenger("o1").unwrap().is_none());
        let err = cc.get_messenger("o1").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(err.to_string(), "messenger does not exist - o1");
    }

    #[test]
    fn stored_messenger_decodes() {
        let host = InMemoryLedgerHost::new();
        host.put_state("o1", &encode(&Messenger::new("o1", "Dana")).unwrap())
            .unwrap();
        let cc = Chaincode::new(&host);
        let m = cc.get_messenger("o1").unwrap();
        assert_eq!(m.username, "dana");
    }

    #[test]
    fn messenger_without_username_is_absent() {
        let host = InMemoryLedgerHost::new();
        host.put_state("o1", br#"{"id":"o1","username":""}"#).unwrap();
        host.put_state("o2", b"garbage").unwrap();
        let cc = Chaincode::new(&host);
        assert!(cc.find_messenger("o1").unwrap().is_none());
        assert!(cc.find_messenger("o2").unwrap().is_none());
    }

    #[test]
    fn message_with_mismatched_id_is_absent() {
        let host = InMemoryLedgerHost::new();
        let stored = Message::new("m2", "hello", 1, MessengerSnapshot::default());
        host.put_state("m1", &encode(&stored).unwrap()).unwrap();
        host.put_state("m2", &encode(&stored).unwrap()).unwrap();
        let cc = Chaincode::new(&host);
        assert!(cc.find_message("m1").unwrap().is_none());
        assert_eq!(cc.get_message("m2").unwrap().text, "hello");
    }

    #[test]
    fn fetch_failure_is_not_found() {
        let host = FaultyHost {
            fail_get: true,
            ..FaultyHost::default()
        };
        let cc = Chaincode::new(&host);
        let err = cc.get_message("m1").unwrap_err();
        assert!(matches!(err, ChaincodeError::FetchFailed { .. }));
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }
}
