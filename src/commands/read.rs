//! Read command: fetch a file channel and show the group's feed.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use commentseal::channel::FileChannel;
use commentseal::{GroupSession, Settings};

use super::{print_feed, CipherArgs, CommandExecutor};

/// Fetch a local channel file and print the reassembled feed.
#[derive(Args, Debug)]
pub struct ReadCommand {
    /// Group passphrase
    #[arg(short, long)]
    pub passphrase: String,

    /// Channel file (JSON lines)
    #[arg(short, long)]
    pub channel: PathBuf,

    #[command(flatten)]
    pub cipher: CipherArgs,
}

impl CommandExecutor for ReadCommand {
    fn execute(&self, settings: &Settings) -> Result<()> {
        let config = self.cipher.resolve(&settings.seal)?;
        // Reading never posts, so the author is irrelevant here.
        let session = GroupSession::new("", &self.passphrase, config);
        let channel = FileChannel::new(&self.channel);

        let rt = tokio::runtime::Runtime::new().context("Failed to create tokio runtime")?;
        let feed = rt
            .block_on(session.read(&channel))
            .with_context(|| format!("Failed to read {}", self.channel.display()))?;

        print_feed(&feed, true);
        Ok(())
    }
}
