mod cli;
mod config;
mod logging;
mod mail;
mod pop3;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use config::Config;
use pop3::MessageNumber;

/// Inspect and fetch mail from a POP3 maildrop.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Config file, defaults to `$XDG_CONFIG_HOME/popmail/config.toml`.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Account section of the config to use.
    #[arg(short, long)]
    account: String,

    #[command(subcommand)]
    action: Action,
}

#[derive(Debug, Subcommand)]
enum Action {
    /// Print number and size of every message.
    List,
    /// Print message count and total size.
    Stat,
    /// Print the unique id of a message.
    Uid { number: MessageNumber },
    /// Retrieve a message.
    Fetch {
        number: MessageNumber,
        /// Write the message here instead of stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Delete messages.
    Delete {
        #[arg(required = true)]
        numbers: Vec<MessageNumber>,
        /// Unmark the messages again before logging out.
        #[arg(long)]
        dry_run: bool,
    },
    /// Log in and out again.
    Check,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();
    logging::init(Some(&args.account));

    let config = Config::load_from_file(args.config.clone())?;

    cli::run(&args, &config).await
}
