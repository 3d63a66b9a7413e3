//! JSON-lines file used as a local channel.
//!
//! Each line is one [`ChannelItem`]. Posts are appended; fetches return the
//! file newest first. Lines that do not parse are skipped, the same way a
//! reader skips comments it cannot use.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::Utc;
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;

use super::{Channel, ChannelError, ChannelItem};

/// Channel stored in a local JSON-lines file.
#[derive(Debug, Clone)]
pub struct FileChannel {
    path: PathBuf,
}

impl FileChannel {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl Channel for FileChannel {
    async fn post(&self, author: &str, body: &str) -> Result<(), ChannelError> {
        let item = ChannelItem::new(body, author, Utc::now());
        let mut line = serde_json::to_string(&item)?;
        line.push('\n');

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(line.as_bytes()).await?;
        file.flush().await?;
        Ok(())
    }

    async fn fetch(&self) -> Result<Vec<ChannelItem>, ChannelError> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut items = Vec::new();
        for (number, line) in content.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<ChannelItem>(line) {
                Ok(item) => items.push(item),
                Err(e) => {
                    tracing::warn!(line = number + 1, error = %e, "skipping unreadable channel line");
                }
            }
        }
        items.reverse();
        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_missing_file_is_empty_channel() {
        let dir = tempdir().unwrap();
        let channel = FileChannel::new(dir.path().join("thread.jsonl"));
        assert!(channel.fetch().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_post_then_fetch_newest_first() {
        let dir = tempdir().unwrap();
        let channel = FileChannel::new(dir.path().join("thread.jsonl"));

        channel.post("alice", "one").await.unwrap();
        channel.post("bob", "two").await.unwrap();

        let items = channel.fetch().await.unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].body, "two");
        assert_eq!(items[0].author, "bob");
        assert_eq!(items[1].body, "one");
    }

    #[tokio::test]
    async fn test_unreadable_lines_are_skipped() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("thread.jsonl");
        let channel = FileChannel::new(&path);

        channel.post("alice", "kept").await.unwrap();
        let mut content = std::fs::read_to_string(&path).unwrap();
        content.push_str("this is not json\n\n");
        std::fs::write(&path, content).unwrap();

        let items = channel.fetch().await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].body, "kept");
    }
}
