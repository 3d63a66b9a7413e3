//! Self-describing message frames.
//!
//! A message is cut into payload chunks; each chunk travels as one frame
//! carrying the message's random group id, its position and the frame count.
//! The encoded body is fixed-width text:
//!
//! ```text
//! +--------+-------+------------+------------------+
//! | id (6) | index | total - 1  | payload          |
//! |        | (3)   | (3)        | (<= max_payload) |
//! +--------+-------+------------+------------------+
//! ```
//!
//! Index fields are zero-padded decimal, so one message holds at most
//! [`MAX_FRAMES`] frames.

pub mod codec;
pub mod split;

pub use codec::{decode, encode};
pub use split::{frame_count, split};

use std::fmt;

use thiserror::Error;

use crate::crypto::{random_token, ALPHABET};

/// Length of a group id in symbols.
pub const GROUP_ID_LEN: usize = 6;

/// Width of each zero-padded decimal field.
pub const INDEX_WIDTH: usize = 3;

/// Length of the fixed header (id + index + total-1).
pub const HEADER_LEN: usize = GROUP_ID_LEN + 2 * INDEX_WIDTH;

/// Default payload size per frame, in UTF-8 bytes.
pub const DEFAULT_MAX_PAYLOAD: usize = 48;

/// Largest frame count the three-digit fields can express.
pub const MAX_FRAMES: usize = 1000;

/// Errors raised while building frames. These are send-side preconditions:
/// they are reported before anything reaches a channel.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FrameError {
    #[error("Message needs {required} frames, at most {max} fit the index field")]
    TooManyFrames { required: usize, max: usize },

    #[error("Payload size must be at least one byte")]
    InvalidMaxPayload,

    #[error("Frame index {index} is outside 0..{total}")]
    IndexOutOfRange { index: usize, total: usize },
}

/// Why a decrypted body is not a frame.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseFailure {
    #[error("body is {len} bytes, header needs {HEADER_LEN}")]
    TooShort { len: usize },

    #[error("group id contains symbols outside the id alphabet")]
    InvalidGroupId,

    #[error("index fields are not decimal digits")]
    InvalidDigits,

    #[error("index {index} is outside 0..{total}")]
    IndexOutOfRange { index: usize, total: usize },

    #[error("payload is not valid UTF-8")]
    InvalidPayload,
}

/// Random identifier shared by all frames of one message.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GroupId([u8; GROUP_ID_LEN]);

impl GroupId {
    /// Draws a fresh id from the 62-symbol alphabet.
    pub fn random() -> Self {
        let token = random_token(GROUP_ID_LEN);
        let mut id = [0u8; GROUP_ID_LEN];
        id.copy_from_slice(token.as_bytes());
        Self(id)
    }

    /// Parses an id from exactly [`GROUP_ID_LEN`] alphabet bytes.
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.len() != GROUP_ID_LEN || !bytes.iter().all(|b| ALPHABET.contains(b)) {
            return None;
        }
        let mut id = [0u8; GROUP_ID_LEN];
        id.copy_from_slice(bytes);
        Some(Self(id))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn as_str(&self) -> &str {
        // Only alphabet (ASCII) bytes are ever stored.
        std::str::from_utf8(&self.0).unwrap_or_default()
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Debug for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GroupId({})", self.as_str())
    }
}

impl std::str::FromStr for GroupId {
    type Err = ParseFailure;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_bytes(s.as_bytes()).ok_or(ParseFailure::InvalidGroupId)
    }
}

/// One chunk of a message, addressed by group id and position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    group_id: GroupId,
    index: usize,
    total: usize,
    payload: String,
}

impl Frame {
    /// Builds a frame, checking `index < total <= MAX_FRAMES`.
    pub fn new(
        group_id: GroupId,
        index: usize,
        total: usize,
        payload: impl Into<String>,
    ) -> Result<Self, FrameError> {
        if total == 0 || total > MAX_FRAMES {
            return Err(FrameError::TooManyFrames {
                required: total,
                max: MAX_FRAMES,
            });
        }
        if index >= total {
            return Err(FrameError::IndexOutOfRange { index, total });
        }
        Ok(Self {
            group_id,
            index,
            total,
            payload: payload.into(),
        })
    }

    pub fn group_id(&self) -> GroupId {
        self.group_id
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn payload(&self) -> &str {
        &self.payload
    }

    pub fn into_payload(self) -> String {
        self.payload
    }

    pub fn is_last(&self) -> bool {
        self.index + 1 == self.total
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_group_ids_use_alphabet() {
        let id = GroupId::random();
        assert_eq!(id.as_str().len(), GROUP_ID_LEN);
        assert!(id.as_bytes().iter().all(|b| ALPHABET.contains(b)));
    }

    #[test]
    fn test_group_id_parse() {
        let id: GroupId = "Zq81Xa".parse().unwrap();
        assert_eq!(id.to_string(), "Zq81Xa");
        assert_eq!(format!("{:?}", id), "GroupId(Zq81Xa)");

        assert!("Zq81X".parse::<GroupId>().is_err());
        assert!("Zq81X-".parse::<GroupId>().is_err());
    }

    #[test]
    fn test_frame_new_validates_position() {
        let id = GroupId::random();
        assert!(Frame::new(id, 0, 1, "").is_ok());
        assert!(Frame::new(id, 999, MAX_FRAMES, "").is_ok());

        assert_eq!(
            Frame::new(id, 1, 1, ""),
            Err(FrameError::IndexOutOfRange { index: 1, total: 1 })
        );
        assert_eq!(
            Frame::new(id, 0, MAX_FRAMES + 1, ""),
            Err(FrameError::TooManyFrames { required: 1001, max: 1000 })
        );
        assert!(Frame::new(id, 0, 0, "").is_err());
    }

    #[test]
    fn test_is_last() {
        let id = GroupId::random();
        assert!(Frame::new(id, 2, 3, "x").unwrap().is_last());
        assert!(!Frame::new(id, 1, 3, "x").unwrap().is_last());
    }
}
