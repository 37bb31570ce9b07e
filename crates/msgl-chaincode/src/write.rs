//! Write operations. Each performs its checks first and then exactly one
//! put or delete.

use msgl_host::LedgerHost;
use tracing::{debug, info, warn};

use crate::chaincode::Chaincode;
use crate::error::{ChaincodeError, ChaincodeResult, EntityKind};
use crate::records::{encode, Message, Messenger};
use crate::validation::{parse_integer, sanitize_arguments};

impl<H: LedgerHost> Chaincode<H> {
    /// Register a messenger under `id`.
    ///
    /// Fails with a conflict if a messenger already decodes at `id`.
    pub fn create_messenger(&self, id: &str, username: &str) -> ChaincodeResult<Messenger> {
        sanitize_arguments(&[id, username], self.config.max_argument_len)?;
        debug!(id, "create_messenger");

        let messenger = Messenger::new(id, username);
        if self.get_messenger(id).is_ok() {
            return Err(ChaincodeError::AlreadyExists {
                kind: EntityKind::Messenger,
                id: id.to_string(),
            });
        }

        self.host.put_state(id, &encode(&messenger)?)?;
        info!(id, username = %messenger.username, "messenger created");
        Ok(messenger)
    }

    /// Create a message sent by `messenger_id`.
    ///
    /// The message embeds a snapshot of the sender taken now. `recipient_id`
    /// is validated but not stored.
    pub fn create_message(
        &self,
        id: &str,
        text: &str,
        priority: &str,
        messenger_id: &str,
        recipient_id: Option<&str>,
    ) -> ChaincodeResult<Message> {
        let mut args = vec![id, text, priority, messenger_id];
        args.extend(recipient_id);
        sanitize_arguments(&args, self.config.max_argument_len)?;
        debug!(id, messenger_id, "create_message");

        let priority = parse_integer(priority, 2)?;
        let sender = self.get_messenger(messenger_id)?;
        if self.get_message(id).is_ok() {
            return Err(ChaincodeError::AlreadyExists {
                kind: EntityKind::Message,
                id: id.to_string(),
            });
        }

        let message = Message::new(id, text, priority, sender.snapshot());
        self.host.put_state(id, &encode(&message)?)?;
        if let Some(recipient) = recipient_id {
            debug!(id, recipient, "recipient not persisted");
        }
        info!(id, messenger_id, priority, "message created");
        Ok(message)
    }

    /// Delete a message on behalf of `company`.
    pub fn delete_message(&self, id: &str, company: &str) -> ChaincodeResult<()> {
        sanitize_arguments(&[id, company], self.config.max_argument_len)?;
        debug!(id, company, "delete_message");

        let message = self.get_message(id)?;
        let owner = &message.messenger.company;
        if owner.is_empty() {
            warn!(id, "message records no owning company, deletion cannot be authorized");
        }
        if owner != company {
            return Err(ChaincodeError::Unauthorized {
                company: company.to_string(),
                owner: owner.clone(),
            });
        }

        self.host.delete_state(id)?;
        info!(id, "message deleted");
        Ok(())
    }

    /// Store `value` at `key` verbatim, with no type or existence checks.
    pub fn write_value(&self, key: &str, value: &str) -> ChaincodeResult<()> {
        sanitize_arguments(&[key, value], self.config.max_argument_len)?;
        debug!(key, len = value.len(), "write");
        self.host.put_state(key, value.as_bytes())?;
        Ok(())
    }
}
