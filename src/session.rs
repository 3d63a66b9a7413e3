//! Explicit group context.
//!
//! A [`GroupSession`] carries everything an operation needs (who is posting,
//! the group passphrase and the sealing config) so nothing depends on ambient
//! "current user" or "current group" state. Several sessions for different
//! groups can be used side by side on the same channel.

use zeroize::Zeroizing;

use crate::channel::{post_sealed, Channel, ChannelError, ChannelItem, PostReport};
use crate::config::SealConfig;
use crate::encoder::{seal_with_config, SealError, SealedMessage};
use crate::reassembly::{reassemble, Feed};

/// One member's view of one group.
pub struct GroupSession {
    author: String,
    passphrase: Zeroizing<String>,
    config: SealConfig,
}

impl GroupSession {
    pub fn new(author: impl Into<String>, passphrase: impl Into<String>, config: SealConfig) -> Self {
        Self {
            author: author.into(),
            passphrase: Zeroizing::new(passphrase.into()),
            config,
        }
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn config(&self) -> &SealConfig {
        &self.config
    }

    /// Frames and encrypts a message without posting it.
    pub fn seal(&self, message: &str) -> Result<SealedMessage, SealError> {
        seal_with_config(message, &self.passphrase, &self.config)
    }

    /// Reassembles a batch fetched elsewhere.
    pub fn open(&self, items: &[ChannelItem]) -> Feed {
        reassemble(items, &self.passphrase, self.config.scheme)
    }

    /// Seals and posts a message.
    ///
    /// Sealing errors are returned before anything is posted; per-item post
    /// failures are in the report.
    pub async fn post<C: Channel + ?Sized>(
        &self,
        channel: &C,
        message: &str,
    ) -> Result<PostReport, SealError> {
        let sealed = self.seal(message)?;
        let report = post_sealed(channel, &self.author, &sealed).await;
        tracing::info!(
            group = %sealed.group_id(),
            posted = report.posted,
            failed = report.failed.len(),
            "posted message"
        );
        Ok(report)
    }

    /// Fetches the channel and reassembles it for this group.
    pub async fn read<C: Channel + ?Sized>(&self, channel: &C) -> Result<Feed, ChannelError> {
        let items = channel.fetch().await?;
        Ok(self.open(&items))
    }
}

impl std::fmt::Debug for GroupSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GroupSession")
            .field("author", &self.author)
            .field("passphrase", &"<redacted>")
            .field("config", &self.config)
            .finish()
    }
}
