//! Outbound pipeline: message to channel items.
//!
//! 1. Split the message into frames (one fresh group id)
//! 2. Encode each frame into its fixed-width body
//! 3. Encrypt each body into one printable item
//! 4. Check every item against the channel's size limit
//!
//! Every step runs before anything is handed to a channel, so a message that
//! cannot be sent is rejected whole instead of being half-posted.

use thiserror::Error;

use crate::config::SealConfig;
use crate::crypto::{encrypt_item, CipherError};
use crate::frame::{self, FrameError, GroupId};

/// Errors that can occur while sealing a message.
#[derive(Error, Debug)]
pub enum SealError {
    #[error("Framing error: {0}")]
    Frame(#[from] FrameError),

    #[error("Encryption error: {0}")]
    Cipher(#[from] CipherError),

    #[error("Frame {index} encrypts to {len} characters, channel limit is {max}")]
    ItemTooLarge { index: usize, len: usize, max: usize },
}

/// A message ready to post: one printable item per frame.
#[derive(Debug, Clone)]
pub struct SealedMessage {
    group_id: GroupId,
    items: Vec<String>,
}

impl SealedMessage {
    pub fn group_id(&self) -> GroupId {
        self.group_id
    }

    /// Items in frame order. Posting order does not matter.
    pub fn items(&self) -> &[String] {
        &self.items
    }

    pub fn into_items(self) -> Vec<String> {
        self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Seals a message with the default configuration.
pub fn seal(message: &str, passphrase: &str) -> Result<SealedMessage, SealError> {
    seal_with_config(message, passphrase, &SealConfig::default())
}

/// Seals a message into channel items.
pub fn seal_with_config(
    message: &str,
    passphrase: &str,
    config: &SealConfig,
) -> Result<SealedMessage, SealError> {
    let frames = frame::split(message, config.max_payload)?;
    let group_id = frames[0].group_id();

    let mut items = Vec::with_capacity(frames.len());
    for frame in &frames {
        let item = encrypt_item(&frame::encode(frame), passphrase, config.scheme)?;

        if let Some(max) = config.item_limit() {
            if item.len() > max {
                return Err(SealError::ItemTooLarge {
                    index: frame.index(),
                    len: item.len(),
                    max,
                });
            }
        }
        items.push(item);
    }

    tracing::info!(
        group = %group_id,
        frames = items.len(),
        scheme = ?config.scheme,
        "sealed message"
    );

    Ok(SealedMessage { group_id, items })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::{decrypt_item, CipherScheme};
    use crate::frame::{decode, MAX_FRAMES};

    #[test]
    fn test_seal_produces_one_item_per_frame() {
        let message = "m".repeat(100);
        let sealed = seal(&message, "pass").unwrap();
        assert_eq!(sealed.len(), 3);

        for (i, item) in sealed.items().iter().enumerate() {
            let body = decrypt_item(item, "pass", CipherScheme::Sealed).unwrap();
            let frame = decode(&body).unwrap();
            assert_eq!(frame.index(), i);
            assert_eq!(frame.total(), 3);
            assert_eq!(frame.group_id(), sealed.group_id());
        }
    }

    #[test]
    fn test_items_fit_default_limit() {
        let sealed = seal(&"a".repeat(500), "pass").unwrap();
        assert!(sealed.items().iter().all(|i| i.len() <= 140));

        let sealed = seal_with_config(&"a".repeat(500), "pass", &SealConfig::legacy()).unwrap();
        assert!(sealed.items().iter().all(|i| i.len() <= 128));

        // Full frames are exactly one 60-byte body.
        let sealed = seal(&"a".repeat(48 * 4), "pass").unwrap();
        assert!(sealed.items().iter().all(|i| i.len() == 120));
        let sealed = seal_with_config(&"a".repeat(48 * 4), "pass", &SealConfig::legacy()).unwrap();
        assert!(sealed.items().iter().all(|i| i.len() == 128));
    }

    #[test]
    fn test_too_many_frames_rejected_before_encryption() {
        let message = "x".repeat(48 * MAX_FRAMES + 1);
        let err = seal(&message, "pass").unwrap_err();
        assert!(matches!(
            err,
            SealError::Frame(FrameError::TooManyFrames { required: 1001, .. })
        ));
    }

    #[test]
    fn test_non_ascii_fits_default_limit() {
        for message in ["é".repeat(48), "😀".repeat(48), "日本語".repeat(16)] {
            for config in [SealConfig::default(), SealConfig::legacy()] {
                let sealed = seal_with_config(&message, "pass", &config).unwrap();
                assert!(sealed.items().iter().all(|i| i.len() <= 140));

                let mut joined = String::new();
                for item in sealed.items() {
                    let body = decrypt_item(item, "pass", config.scheme).unwrap();
                    assert!(body.len() <= 60);
                    joined.push_str(decode(&body).unwrap().payload());
                }
                assert_eq!(joined, message);
            }
        }
    }

    #[test]
    fn test_item_limit_zero_disables_check() {
        let wide = SealConfig {
            max_payload: 100,
            ..Default::default()
        };
        let message = "w".repeat(100);
        assert!(matches!(
            seal_with_config(&message, "pass", &wide),
            Err(SealError::ItemTooLarge { index: 0, max: 140, .. })
        ));

        let unlimited = SealConfig {
            max_item_len: Some(0),
            ..wide
        };
        assert!(seal_with_config(&message, "pass", &unlimited).is_ok());
    }

    #[test]
    fn test_smaller_payload_for_tighter_channel() {
        let config = SealConfig {
            max_payload: 20,
            max_item_len: Some(80),
            ..Default::default()
        };
        let sealed = seal_with_config(&"b".repeat(45), "pass", &config).unwrap();
        assert_eq!(sealed.len(), 3);
        assert!(sealed.items().iter().all(|i| i.len() <= 80));
    }
}
