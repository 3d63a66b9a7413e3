//! Post command: seal a message and append it to a file channel.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use commentseal::channel::FileChannel;
use commentseal::{GroupSession, Settings};

use super::{message_or_stdin, CipherArgs, CommandExecutor};

/// Seal a message and post every item to a local channel file.
#[derive(Args, Debug)]
pub struct PostCommand {
    /// Message to post (reads from stdin if not provided)
    #[arg(short, long)]
    pub message: Option<String>,

    /// Group passphrase
    #[arg(short, long)]
    pub passphrase: String,

    /// Channel file (JSON lines, created if missing)
    #[arg(short, long)]
    pub channel: PathBuf,

    /// Name the items are posted under
    #[arg(short, long)]
    pub author: String,

    #[command(flatten)]
    pub cipher: CipherArgs,
}

impl CommandExecutor for PostCommand {
    fn execute(&self, settings: &Settings) -> Result<()> {
        let config = self.cipher.resolve(&settings.seal)?;
        let message = message_or_stdin(&self.message)?;

        let session = GroupSession::new(&self.author, &self.passphrase, config);
        let channel = FileChannel::new(&self.channel);

        let rt = tokio::runtime::Runtime::new().context("Failed to create tokio runtime")?;
        let report = rt
            .block_on(session.post(&channel, &message))
            .context("Failed to seal message")?;

        println!(
            "Posted {} item(s) to {}",
            report.posted,
            channel.path().display()
        );
        if !report.is_complete() {
            for (index, error) in &report.failed {
                eprintln!("  frame {} not posted: {}", index, error);
            }
            anyhow::bail!("{} item(s) could not be posted", report.failed.len());
        }
        Ok(())
    }
}
