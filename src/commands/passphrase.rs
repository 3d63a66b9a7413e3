//! Group passphrase generation command.

use anyhow::Result;
use clap::Args;

use commentseal::crypto::{generate_passphrase, DEFAULT_PASSPHRASE_LEN};
use commentseal::Settings;

use super::CommandExecutor;

/// Generate a random passphrase for a new group.
#[derive(Args, Debug)]
pub struct PassphraseCommand {
    /// Passphrase length in characters
    #[arg(short, long, default_value_t = DEFAULT_PASSPHRASE_LEN as u16,
          value_parser = clap::value_parser!(u16).range(16..=256))]
    pub length: u16,
}

impl CommandExecutor for PassphraseCommand {
    fn execute(&self, _settings: &Settings) -> Result<()> {
        println!("{}", generate_passphrase(usize::from(self.length)));
        eprintln!("Share this passphrase with group members over a private channel.");
        Ok(())
    }
}
