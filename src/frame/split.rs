//! Message chunking.
//!
//! Payloads are bounded in UTF-8 bytes and always cut on a character
//! boundary, so a multi-byte character is never split across frames and
//! every frame body stays within `HEADER_LEN + max_payload` bytes.

use super::{Frame, FrameError, GroupId, MAX_FRAMES};

/// Greedy byte-bounded chunks of `message`.
///
/// A chunk holds at least one character, so a `max_payload` smaller than a
/// single character still makes progress.
fn chunks(message: &str, max_payload: usize) -> impl Iterator<Item = &str> + '_ {
    let mut rest = message;
    std::iter::from_fn(move || {
        if rest.is_empty() {
            return None;
        }
        let mut end = max_payload.min(rest.len());
        while !rest.is_char_boundary(end) {
            end -= 1;
        }
        if end == 0 {
            end = rest.chars().next().map_or(rest.len(), char::len_utf8);
        }
        let (head, tail) = rest.split_at(end);
        rest = tail;
        Some(head)
    })
}

/// Number of frames `message` needs at `max_payload` bytes per frame.
///
/// An empty message still needs one (empty) frame.
pub fn frame_count(message: &str, max_payload: usize) -> Result<usize, FrameError> {
    if max_payload == 0 {
        return Err(FrameError::InvalidMaxPayload);
    }
    Ok(chunks(message, max_payload).count().max(1))
}

/// Splits a message into frames sharing one fresh random group id.
///
/// Each payload is the longest run of whole characters that fits in
/// `max_payload` bytes; for ASCII, frame `i` carries characters
/// `[i * max_payload, min((i + 1) * max_payload, len))`. Fails before
/// producing anything if the message needs more than [`MAX_FRAMES`] frames.
pub fn split(message: &str, max_payload: usize) -> Result<Vec<Frame>, FrameError> {
    let total = frame_count(message, max_payload)?;
    if total > MAX_FRAMES {
        return Err(FrameError::TooManyFrames {
            required: total,
            max: MAX_FRAMES,
        });
    }

    let group_id = GroupId::random();

    if message.is_empty() {
        return Ok(vec![Frame::new(group_id, 0, 1, String::new())?]);
    }

    chunks(message, max_payload)
        .enumerate()
        .map(|(index, chunk)| Frame::new(group_id, index, total, chunk.to_owned()))
        .collect()
}
