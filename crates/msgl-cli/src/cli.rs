use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "msgl",
    about = "Messaging ledger: messengers, messages and their audit trail",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Settings file (TOML)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Ledger journal, overriding the settings file
    #[arg(long, global = true)]
    pub ledger: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Print the raw value stored at a key
    Read(KeyArgs),
    /// Store a raw value at a key
    Write(WriteArgs),
    /// Register a messenger
    CreateMessenger(CreateMessengerArgs),
    /// Send a message from an existing messenger
    CreateMessage(CreateMessageArgs),
    /// Delete a message on behalf of a company
    DeleteMessage(DeleteMessageArgs),
    /// List every key in [start, end) with its record
    RangeQuery(RangeArgs),
    /// Show every write and deletion of a key
    History(KeyArgs),
    /// Dump all messengers and all messages
    ReadAll(ReadAllArgs),
    /// Call a chaincode function by name
    Invoke(InvokeArgs),
}

#[derive(Args)]
pub struct KeyArgs {
    pub key: String,
}

#[derive(Args)]
pub struct WriteArgs {
    pub key: String,
    pub value: String,
}

#[derive(Args)]
pub struct CreateMessengerArgs {
    pub id: String,
    pub username: String,
}

#[derive(Args)]
pub struct CreateMessageArgs {
    pub id: String,
    pub text: String,
    #[arg(allow_hyphen_values = true)]
    pub priority: String,
    pub messenger: String,
    /// Accepted and validated, not stored
    pub recipient: Option<String>,
}

#[derive(Args)]
pub struct DeleteMessageArgs {
    pub id: String,
    pub company: String,
}

#[derive(Args)]
pub struct RangeArgs {
    pub start: String,
    pub end: String,
}

#[derive(Args)]
pub struct ReadAllArgs {}

#[derive(Args)]
pub struct InvokeArgs {
    pub function: String,
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub args: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_read() {
        let cli = Cli::try_parse_from(["msgl", "read", "o1"]).unwrap();
        if let Command::Read(args) = cli.command {
            assert_eq!(args.key, "o1");
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_create_messenger() {
        let cli = Cli::try_parse_from(["msgl", "create-messenger", "o1", "Amy"]).unwrap();
        if let Command::CreateMessenger(args) = cli.command {
            assert_eq!(args.id, "o1");
            assert_eq!(args.username, "Amy");
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_create_message_with_recipient() {
        let cli = Cli::try_parse_from(["msgl", "create-message", "m1", "hi", "-2", "o1", "o2"]).unwrap();
        if let Command::CreateMessage(args) = cli.command {
            assert_eq!(args.priority, "-2");
            assert_eq!(args.recipient, Some("o2".into()));
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_create_message_requires_messenger() {
        assert!(Cli::try_parse_from(["msgl", "create-message", "m1", "hi", "1"]).is_err());
    }

    #[test]
    fn parse_range_query() {
        let cli = Cli::try_parse_from(["msgl", "range-query", "m0", "m9"]).unwrap();
        if let Command::RangeQuery(args) = cli.command {
            assert_eq!(args.start, "m0");
            assert_eq!(args.end, "m9");
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_read_all() {
        let cli = Cli::try_parse_from(["msgl", "read-all"]).unwrap();
        assert!(matches!(cli.command, Command::ReadAll(_)));
    }

    #[test]
    fn parse_invoke_passes_arguments_through() {
        let cli = Cli::try_parse_from(["msgl", "invoke", "init_message", "m1", "hi", "-1", "o1"]).unwrap();
        if let Command::Invoke(args) = cli.command {
            assert_eq!(args.function, "init_message");
            assert_eq!(args.args, vec!["m1", "hi", "-1", "o1"]);
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_global_flags() {
        let cli = Cli::try_parse_from([
            "msgl", "--verbose", "--format", "json", "--ledger", "/tmp/l.journal", "read-all",
        ])
        .unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.format, OutputFormat::Json);
        assert_eq!(cli.ledger, Some(PathBuf::from("/tmp/l.journal")));
        assert!(cli.config.is_none());
    }
}
