//! Commentseal - private messages in public comment threads
//!
//! A CLI for sealing messages into encrypted comment-sized items and
//! reassembling them from whatever a thread currently holds.

mod commands;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{
    CommandExecutor, OpenCommand, PassphraseCommand, PostCommand, ReadCommand, SealCommand,
};
use commentseal::Settings;

/// Commentseal - private messages in public comment threads
///
/// Messages are split into frames, each encrypted into one comment. Comments
/// can be posted in any order, lost or duplicated; readers reassemble what
/// they fetch and see everything else as "** ENCRYPTED **".
#[derive(Parser)]
#[command(name = "commentseal")]
#[command(version)]
#[command(about = "Private messages carried in public comment threads")]
#[command(long_about = None)]
struct Cli {
    /// Config file (default: ~/.commentseal/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Verbose logging (same as RUST_LOG=commentseal=debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a passphrase for a new group
    Passphrase(PassphraseCommand),

    /// Split and encrypt a message, printing one item per line
    Seal(SealCommand),

    /// Reassemble messages from a file of item bodies
    Open(OpenCommand),

    /// Seal a message and post it to a channel file
    Post(PostCommand),

    /// Read and reassemble a channel file
    Read(ReadCommand),
}

impl Commands {
    fn executor(&self) -> &dyn CommandExecutor {
        match self {
            Commands::Passphrase(cmd) => cmd,
            Commands::Seal(cmd) => cmd,
            Commands::Open(cmd) => cmd,
            Commands::Post(cmd) => cmd,
            Commands::Read(cmd) => cmd,
        }
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("commentseal=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let settings = Settings::load(cli.config.as_deref()).context("Failed to load config")?;

    cli.command.executor().execute(&settings)
}
