//! Seal command: print the items for a message without posting them.

use anyhow::{Context, Result};
use clap::Args;

use commentseal::{seal_with_config, Settings};

use super::{message_or_stdin, CipherArgs, CommandExecutor};

/// Split and encrypt a message into channel items, one per line.
#[derive(Args, Debug)]
pub struct SealCommand {
    /// Message to seal (reads from stdin if not provided)
    #[arg(short, long)]
    pub message: Option<String>,

    /// Group passphrase
    #[arg(short, long)]
    pub passphrase: String,

    #[command(flatten)]
    pub cipher: CipherArgs,
}

impl CommandExecutor for SealCommand {
    fn execute(&self, settings: &Settings) -> Result<()> {
        let config = self.cipher.resolve(&settings.seal)?;
        let message = message_or_stdin(&self.message)?;

        let sealed = seal_with_config(&message, &self.passphrase, &config)
            .context("Failed to seal message")?;

        for item in sealed.items() {
            println!("{}", item);
        }
        eprintln!(
            "Group {}: {} item(s), post them in any order",
            sealed.group_id(),
            sealed.len()
        );
        Ok(())
    }
}
