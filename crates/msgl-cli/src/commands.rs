use std::fs;
use std::io::Write;

use anyhow::Context;
use colored::Colorize;
use msgl_chaincode::{Chaincode, Response};
use msgl_host::FileLedgerHost;
use tracing::debug;

use crate::cli::*;
use crate::config::Settings;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let format = cli.format;
    let (function, response) = execute(cli)?;
    if !response.is_ok() {
        anyhow::bail!("{function}: {}", response.message);
    }
    match format {
        OutputFormat::Json => {
            let mut out = std::io::stdout().lock();
            out.write_all(&response.payload)?;
            if !response.payload.is_empty() {
                writeln!(out)?;
            }
        }
        OutputFormat::Text => println!("{}", render_text(&function, &response)),
    }
    Ok(())
}

/// Open the ledger and route the subcommand through the dispatcher.
pub fn execute(cli: Cli) -> anyhow::Result<(String, Response)> {
    let settings = Settings::load(cli.config.as_deref())?;
    let ledger_path = cli.ledger.unwrap_or(settings.ledger_path);
    if let Some(parent) = ledger_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating {}", parent.display()))?;
    }
    let host = FileLedgerHost::open(&ledger_path, settings.journal)
        .with_context(|| format!("opening ledger {}", ledger_path.display()))?;
    let chaincode = Chaincode::with_config(host, settings.chaincode);

    let (function, args) = invocation(cli.command);
    debug!(function = %function, ledger = %ledger_path.display(), "dispatching");
    let response = chaincode.invoke(&function, &args);
    Ok((function, response))
}

/// Lower a subcommand to a dispatcher function name and its arguments.
pub fn invocation(command: Command) -> (String, Vec<String>) {
    let (function, args) = match command {
        Command::Read(a) => ("read", vec![a.key]),
        Command::Write(a) => ("write", vec![a.key, a.value]),
        Command::CreateMessenger(a) => ("createMessenger", vec![a.id, a.username]),
        Command::CreateMessage(a) => {
            let mut args = vec![a.id, a.text, a.priority, a.messenger];
            args.extend(a.recipient);
            ("createMessage", args)
        }
        Command::DeleteMessage(a) => ("deleteMessage", vec![a.id, a.company]),
        Command::RangeQuery(a) => ("rangeQuery", vec![a.start, a.end]),
        Command::History(a) => ("history", vec![a.key]),
        Command::ReadAll(_) => ("readAll", vec![]),
        Command::Invoke(a) => return (a.function, a.args),
    };
    (function.to_string(), args)
}

fn render_text(function: &str, response: &Response) -> String {
    let mut out = format!("{} {}", "✓".green().bold(), function.yellow());
    if response.payload.is_empty() {
        return out;
    }
    let body = match serde_json::from_slice::<serde_json::Value>(&response.payload) {
        Ok(value) => serde_json::to_string_pretty(&value)
            .unwrap_or_else(|_| String::from_utf8_lossy(&response.payload).into_owned()),
        Err(_) => String::from_utf8_lossy(&response.payload).into_owned(),
    };
    out.push('\n');
    out.push_str(&body);
    out
}
