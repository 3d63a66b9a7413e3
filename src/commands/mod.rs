//! Command module - Strategy pattern for CLI commands.
//!
//! Each command is a separate module implementing the `CommandExecutor` trait.

mod open;
mod passphrase;
mod post;
mod read;
mod seal;

pub use open::OpenCommand;
pub use passphrase::PassphraseCommand;
pub use post::PostCommand;
pub use read::ReadCommand;
pub use seal::SealCommand;

use std::io::{self, Read};

use anyhow::{Context, Result};
use clap::Args;

use commentseal::{CipherScheme, Feed, FeedEntry, SealConfig, Settings};

/// Trait for command execution - Strategy pattern.
///
/// Each command struct holds its parsed arguments and implements
/// this trait to define its execution logic.
pub trait CommandExecutor {
    /// Executes the command with its parsed arguments and the loaded settings.
    fn execute(&self, settings: &Settings) -> Result<()>;
}

/// Cipher and framing flags shared by every command that seals or opens items.
#[derive(Args, Debug, Clone)]
pub struct CipherArgs {
    /// Use the legacy AES-256-CBC items (threads shared with earlier clients)
    #[arg(long)]
    pub legacy: bool,

    /// Payload bytes per frame (overrides the config file)
    #[arg(long)]
    pub max_payload: Option<usize>,

    /// Do not check items against the channel size limit
    #[arg(long)]
    pub no_limit: bool,
}

impl CipherArgs {
    /// Applies command-line overrides on top of the configured values.
    pub fn resolve(&self, base: &SealConfig) -> Result<SealConfig> {
        let mut config = base.clone();
        if self.legacy {
            config.scheme = CipherScheme::Legacy;
        }
        if let Some(max_payload) = self.max_payload {
            config.max_payload = max_payload;
        }
        if self.no_limit {
            config.max_item_len = None;
        }
        config.validate().context("Invalid sealing options")?;
        Ok(config)
    }
}

/// Returns `message`, or reads it from stdin when absent.
pub fn message_or_stdin(message: &Option<String>) -> Result<String> {
    match message {
        Some(m) => Ok(m.clone()),
        None => {
            eprintln!("Reading message from stdin (Ctrl+D to finish):");
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .context("Failed to read message from stdin")?;
            Ok(buffer.trim_end_matches('\n').to_string())
        }
    }
}

/// Prints a feed oldest first, one line per entry.
pub fn print_feed(feed: &Feed, with_time: bool) {
    println!("[comments]");
    for entry in feed.oldest_first() {
        let prefix = if with_time {
            format!(
                "[{}] {}",
                entry.timestamp().format("%Y-%m-%d %H:%M:%S"),
                entry.author()
            )
        } else {
            entry.author().to_string()
        };

        match entry {
            FeedEntry::Message { message, .. } => match message.text() {
                Some(text) => println!("{}: {}", prefix, text),
                None => println!(
                    "{}: ** INCOMPLETE {}/{} ** {}",
                    prefix,
                    message.received(),
                    message.total(),
                    message.render("[...]")
                ),
            },
            FeedEntry::Opaque { .. } => println!("{}: ** ENCRYPTED **", prefix),
        }
    }
}
