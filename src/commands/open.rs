//! Open command: reassemble items pasted into a file.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::Args;

use commentseal::{reassemble, ChannelItem, Settings};

use super::{print_feed, CipherArgs, CommandExecutor};

/// Reassemble messages from a file of item bodies (one per line, newest first).
#[derive(Args, Debug)]
pub struct OpenCommand {
    /// File with one item body per line
    #[arg(short, long)]
    pub input: PathBuf,

    /// Group passphrase
    #[arg(short, long)]
    pub passphrase: String,

    #[command(flatten)]
    pub cipher: CipherArgs,
}

impl CommandExecutor for OpenCommand {
    fn execute(&self, settings: &Settings) -> Result<()> {
        let config = self.cipher.resolve(&settings.seal)?;
        let content = fs::read_to_string(&self.input)
            .with_context(|| format!("Failed to read {}", self.input.display()))?;

        let items: Vec<ChannelItem> = content
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .map(|(n, line)| {
                ChannelItem::new(line, format!("line {}", n + 1), DateTime::<Utc>::UNIX_EPOCH)
            })
            .collect();

        let feed = reassemble(&items, &self.passphrase, config.scheme);
        print_feed(&feed, false);
        Ok(())
    }
}
