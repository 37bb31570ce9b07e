//! Command routing: a command name plus string arguments in, a
//! [`Response`] out.

use std::fmt;
use std::str::FromStr;

use msgl_host::LedgerHost;
use tracing::{debug, info};

use crate::chaincode::Chaincode;
use crate::error::{ChaincodeError, ChaincodeResult};
use crate::records::encode;
use crate::response::Response;
use crate::validation::{check_arity, Arity};

/// Every operation reachable through [`Chaincode::invoke`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Command {
    Read,
    Write,
    CreateMessenger,
    CreateMessage,
    DeleteMessage,
    RangeQuery,
    History,
    ReadAll,
}

impl Command {
    pub const ALL: [Command; 8] = [
        Command::Read,
        Command::Write,
        Command::CreateMessenger,
        Command::CreateMessage,
        Command::DeleteMessage,
        Command::RangeQuery,
        Command::History,
        Command::ReadAll,
    ];

    /// Resolve a command name. Legacy names are accepted as aliases.
    pub fn from_name(name: &str) -> Option<Self> {
        let command = match name {
            "read" => Command::Read,
            "write" => Command::Write,
            "createMessenger" | "init_messenger" => Command::CreateMessenger,
            "createMessage" | "init_message" => Command::CreateMessage,
            "deleteMessage" | "delete_message" => Command::DeleteMessage,
            "rangeQuery" | "getMessagesByRange" => Command::RangeQuery,
            "history" | "getHistory" => Command::History,
            "readAll" | "read_everything" => Command::ReadAll,
            _ => return None,
        };
        Some(command)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Command::Read => "read",
            Command::Write => "write",
            Command::CreateMessenger => "createMessenger",
            Command::CreateMessage => "createMessage",
            Command::DeleteMessage => "deleteMessage",
            Command::RangeQuery => "rangeQuery",
            Command::History => "history",
            Command::ReadAll => "readAll",
        }
    }

    pub fn arity(&self) -> Arity {
        match self {
            Command::Read | Command::History => Arity::exactly(1),
            Command::Write
            | Command::CreateMessenger
            | Command::DeleteMessage
            | Command::RangeQuery => Arity::exactly(2),
            Command::CreateMessage => Arity::between(4, 5),
            Command::ReadAll => Arity::exactly(0),
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Command {
    type Err = ChaincodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| ChaincodeError::UnknownFunction(s.to_string()))
    }
}

impl<H: LedgerHost> Chaincode<H> {
    /// Run `function` with `args` and wrap the outcome in a [`Response`].
    pub fn invoke<S: AsRef<str>>(&self, function: &str, args: &[S]) -> Response {
        debug!(function, args = args.len(), "invoke");
        let response = Response::from(self.execute(function, args));
        if response.is_ok() {
            debug!(function, payload_len = response.payload.len(), "invoke ok");
        } else {
            info!(function, error = %response.message, "invoke failed");
        }
        response
    }

    /// Run `function` with `args`, returning the success payload.
    ///
    /// Write commands succeed with an empty payload.
    pub fn execute<S: AsRef<str>>(&self, function: &str, args: &[S]) -> ChaincodeResult<Vec<u8>> {
        let command: Command = function.parse()?;
        check_arity(args, command.arity())?;
        let arg = |i: usize| args[i].as_ref();

        match command {
            Command::Read => self.read_value(arg(0)),
            Command::Write => self.write_value(arg(0), arg(1)).map(|()| Vec::new()),
            Command::CreateMessenger => self
                .create_messenger(arg(0), arg(1))
                .map(|_| Vec::new()),
            Command::CreateMessage => {
                let recipient = args.get(4).map(|s| s.as_ref());
                self.create_message(arg(0), arg(1), arg(2), arg(3), recipient)
                    .map(|_| Vec::new())
            }
            Command::DeleteMessage => self.delete_message(arg(0), arg(1)).map(|()| Vec::new()),
            Command::RangeQuery => self.range_query(arg(0), arg(1)),
            Command::History => encode(&self.history(arg(0))?),
            Command::ReadAll => encode(&self.read_everything()?),
        }
    }
}
