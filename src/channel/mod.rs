//! Channel adapter interface.
//!
//! A channel is any public, lossy, unordered item stream (a comment thread).
//! The crate never talks to a real service: it posts and fetches through the
//! [`Channel`] trait and treats loss, duplication, reordering and foreign
//! items as normal channel behavior.

pub mod file;
pub mod memory;

pub use file::FileChannel;
pub use memory::{ChannelBehavior, MemoryChannel};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::encoder::SealedMessage;

/// Errors reported by channel adapters.
#[derive(Error, Debug)]
pub enum ChannelError {
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization failed: {0}")]
    SerializationFailed(#[from] serde_json::Error),

    #[error("Channel rejected item: {0}")]
    Rejected(String),
}

/// One item as the channel returns it. Read-only to this crate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelItem {
    /// Item text: an encrypted frame, or anything else people posted.
    pub body: String,
    /// Account that posted the item.
    pub author: String,
    /// When the channel recorded the item.
    pub timestamp: DateTime<Utc>,
}

impl ChannelItem {
    pub fn new(body: impl Into<String>, author: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            body: body.into(),
            author: author.into(),
            timestamp,
        }
    }
}

/// A public item stream.
#[async_trait]
pub trait Channel: Send + Sync {
    /// Posts one item as `author`. No ordering or delivery guarantee.
    async fn post(&self, author: &str, body: &str) -> Result<(), ChannelError>;

    /// Fetches the current items, newest first.
    async fn fetch(&self) -> Result<Vec<ChannelItem>, ChannelError>;
}

/// Outcome of posting every item of a sealed message.
#[derive(Debug, Default)]
pub struct PostReport {
    /// Number of items the channel accepted.
    pub posted: usize,
    /// Frame index and error for every item the channel refused.
    pub failed: Vec<(usize, ChannelError)>,
}

impl PostReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Posts every item of `sealed` independently and concurrently.
///
/// A failed post never stops the others; failures are collected in the report.
pub async fn post_sealed<C: Channel + ?Sized>(
    channel: &C,
    author: &str,
    sealed: &SealedMessage,
) -> PostReport {
    let posts = sealed
        .items()
        .iter()
        .map(|item| channel.post(author, item));
    let results = join_all(posts).await;

    let mut report = PostReport::default();
    for (index, result) in results.into_iter().enumerate() {
        match result {
            Ok(()) => report.posted += 1,
            Err(e) => {
                tracing::warn!(group = %sealed.group_id(), index, error = %e, "item post failed");
                report.failed.push((index, e));
            }
        }
    }
    report
}
