//! Read assemblers: point read, range query, key history and the full
//! snapshot of both asset types.
//!
//! Every assembler consumes its cursor inside the call. An iteration error
//! aborts the whole read; the cursor is released when it goes out of scope
//! on that path as on every other.

use msgl_host::{KeyValue, LedgerHost};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::chaincode::Chaincode;
use crate::config::KeyRange;
use crate::error::{ChaincodeError, ChaincodeResult};
use crate::records::{decode_lenient, encode, AuditEntry, Everything, Message};
use crate::validation::sanitize_arguments;

impl<H: LedgerHost> Chaincode<H> {
    /// Raw bytes stored at `key`; empty if the key is absent.
    pub fn read_value(&self, key: &str) -> ChaincodeResult<Vec<u8>> {
        sanitize_arguments(&[key], self.config.max_argument_len)?;
        let value = self
            .host
            .get_state(key)
            .map_err(|source| ChaincodeError::StateUnavailable {
                key: key.to_string(),
                source,
            })?;
        Ok(value.map(|v| v.to_vec()).unwrap_or_default())
    }

    /// JSON array of `{"Key": .., "Record": ..}` for every key in
    /// `[start, end)`, in key order.
    ///
    /// Stored values are spliced in as they are, so they must already be
    /// JSON. An empty value is written as `null`.
    pub fn range_query(&self, start: &str, end: &str) -> ChaincodeResult<Vec<u8>> {
        debug!(start, end, "range_query");
        let mut out = vec![b'['];
        let mut count = 0usize;
        for item in self.host.range_scan(start, end)? {
            let kv = item?;
            if count > 0 {
                out.push(b',');
            }
            write_range_entry(&mut out, &kv)?;
            count += 1;
        }
        out.push(b']');
        debug!(start, end, count, "range_query done");
        Ok(out)
    }

    /// Every write and deletion of `key`, oldest first, each value decoded
    /// as a message. Deletions carry the empty message.
    pub fn history(&self, key: &str) -> ChaincodeResult<Vec<AuditEntry>> {
        sanitize_arguments(&[key], self.config.max_argument_len)?;
        let mut entries = Vec::new();
        for item in self.host.history_scan(key)? {
            let modification = item?;
            let value = modification
                .value
                .as_deref()
                .map(decode_lenient::<Message>)
                .unwrap_or_default();
            entries.push(AuditEntry {
                tx_id: modification.tx_id.to_string(),
                value,
            });
        }
        debug!(key, entries = entries.len(), "history");
        Ok(entries)
    }

    /// All messengers and all messages, each list in key order.
    pub fn read_everything(&self) -> ChaincodeResult<Everything> {
        let messengers = self.scan_records(&self.config.messenger_keys)?;
        let messages = self.scan_records(&self.config.message_keys)?;
        debug!(
            messengers = messengers.len(),
            messages = messages.len(),
            "read_everything"
        );
        Ok(Everything {
            messengers,
            messages,
        })
    }

    fn scan_records<T: DeserializeOwned + Default>(
        &self,
        range: &KeyRange,
    ) -> ChaincodeResult<Vec<T>> {
        let mut records = Vec::new();
        for item in self.host.range_scan(&range.start, &range.end)? {
            let kv = item?;
            records.push(decode_lenient(&kv.value));
        }
        Ok(records)
    }
}

fn write_range_entry(out: &mut Vec<u8>, kv: &KeyValue) -> ChaincodeResult<()> {
    out.extend_from_slice(b"{\"Key\":");
    out.extend(encode(&kv.key)?);
    out.extend_from_slice(b",\"Record\":");
    if kv.value.is_empty() {
        out.extend_from_slice(b"null");
    } else {
        out.extend_from_slice(&kv.value);
    }
    out.push(b'}');
    Ok(())
}

#[cfg(test)]
mod tests {
    use msgl_host::InMemoryLedgerHost;
    use serde_json::{json, Value};

    use super::*;
    use crate::error::ErrorKind;
    use crate::testutil::FaultyHost;

    fn seeded() -> Chaincode<InMemoryLedgerHost> {
        let cc = Chaincode::new(InMemoryLedgerHost::new());
        cc.create_messenger("o1", "Amy").unwrap();
        cc.create_message("m2", "second", "2", "o1", None).unwrap();
        cc.create_message("m1", "first", "1", "o1", None).unwrap();
        cc
    }

    #[test]
    fn read_returns_exact_bytes() {
        let cc = Chaincode::new(InMemoryLedgerHost::new());
        cc.write_value("k1", "not { json").unwrap();
        assert_eq!(cc.read_value("k1").unwrap(), b"not { json");
    }

    #[test]
    fn read_of_missing_key_is_empty() {
        let cc = Chaincode::new(InMemoryLedgerHost::new());
        assert!(cc.read_value("nothing").unwrap().is_empty());
    }

    #[test]
    fn read_host_failure_names_the_key() {
        let host = FaultyHost {
            fail_get: true,
            ..FaultyHost::default()
        };
        let err = Chaincode::new(&host).read_value("k1").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Host);
        assert!(err.to_string().starts_with("failed to get state for k1"));
    }

    #[test]
    fn range_lists_messages_in_key_order() {
        let cc = seeded();
        let out = cc.range_query("m0", "m9999999999999999999").unwrap();
        let v: Value = serde_json::from_slice(&out).unwrap();
        let items = v.as_array().unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0]["Key"], "m1");
        assert_eq!(items[1]["Key"], "m2");
        assert_eq!(items[0]["Record"]["text"], "first");
        assert_eq!(items[1]["Record"]["messenger"]["username"], "amy");
    }

    #[test]
    fn range_embeds_records_verbatim() {
        let cc = Chaincode::new(InMemoryLedgerHost::new());
        cc.write_value("a", r#"{"z":1,  "a":2}"#).unwrap();
        let out = cc.range_query("a", "b").unwrap();
        assert_eq!(out, br#"[{"Key":"a","Record":{"z":1,  "a":2}}]"#.to_vec());
    }

    #[test]
    fn empty_range_is_empty_array() {
        let cc = seeded();
        assert_eq!(cc.range_query("x0", "x9").unwrap(), b"[]".to_vec());
    }

    #[test]
    fn range_error_aborts_and_releases_cursor() {
        let host = FaultyHost {
            fail_scan_after: Some(1),
            ..FaultyHost::default()
        };
        let cc = Chaincode::new(&host);
        cc.write_value("m1", "1").unwrap();
        cc.write_value("m2", "2").unwrap();

        let err = cc.range_query("m0", "m9").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Host);
        assert_eq!(host.inner.open_cursors(), 0);
    }

    #[test]
    fn history_shows_creation_then_deletion() {
        let host = InMemoryLedgerHost::new();
        let cc = Chaincode::new(&host);
        cc.create_messenger("o1", "amy").unwrap();
        let created = cc.create_message("m1", "hi", "1", "o1", None).unwrap();
        host.delete_state("m1").unwrap();

        let entries = cc.history("m1").unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].value, created);
        assert_eq!(entries[1].value, Message::default());
        assert_ne!(entries[0].tx_id, entries[1].tx_id);
        assert_eq!(host.open_cursors(), 0);
    }

    #[test]
    fn history_of_unknown_key_is_empty() {
        let cc = Chaincode::new(InMemoryLedgerHost::new());
        assert!(cc.history("m404").unwrap().is_empty());
    }

    #[test]
    fn history_error_aborts_and_releases_cursor() {
        let host = FaultyHost {
            fail_scan_after: Some(1),
            ..FaultyHost::default()
        };
        let cc = Chaincode::new(&host);
        cc.write_value("k", "1").unwrap();
        cc.write_value("k", "2").unwrap();

        assert!(cc.history("k").is_err());
        assert_eq!(host.inner.open_cursors(), 0);
    }

    #[test]
    fn read_everything_keeps_types_apart() {
        let cc = Chaincode::new(InMemoryLedgerHost::new());
        cc.create_messenger("o1", "amy").unwrap();
        cc.create_message("m1", "hi", "5", "o1", None).unwrap();

        let all = cc.read_everything().unwrap();
        assert_eq!(all.messengers.len(), 1);
        assert_eq!(all.messengers[0].id, "o1");
        assert_eq!(all.messages.len(), 1);
        assert_eq!(all.messages[0].id, "m1");

        let v = serde_json::to_value(&all).unwrap();
        assert_eq!(v["messages"][0]["priority"], json!(5));
    }

    #[test]
    fn read_everything_fails_if_a_scan_fails() {
        let host = FaultyHost {
            fail_scan_after: Some(0),
            ..FaultyHost::default()
        };
        let cc = Chaincode::new(&host);
        cc.write_value("m1", "{}").unwrap();
        assert!(cc.read_everything().is_err());
        assert_eq!(host.inner.open_cursors(), 0);
    }
}
