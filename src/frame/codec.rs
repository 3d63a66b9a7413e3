//! Fixed-width frame body encoding.

use super::{Frame, GroupId, ParseFailure, GROUP_ID_LEN, HEADER_LEN, INDEX_WIDTH};

/// Serializes a frame: id, zero-padded index, zero-padded `total - 1`, payload.
pub fn encode(frame: &Frame) -> Vec<u8> {
    let mut body = Vec::with_capacity(HEADER_LEN + frame.payload().len());
    body.extend_from_slice(frame.group_id().as_bytes());
    body.extend_from_slice(
        format!(
            "{:0width$}{:0width$}",
            frame.index(),
            frame.total() - 1,
            width = INDEX_WIDTH
        )
        .as_bytes(),
    );
    body.extend_from_slice(frame.payload().as_bytes());
    body
}

/// Parses a three-digit decimal field.
fn parse_field(bytes: &[u8]) -> Result<usize, ParseFailure> {
    if !bytes.iter().all(u8::is_ascii_digit) {
        return Err(ParseFailure::InvalidDigits);
    }
    Ok(bytes
        .iter()
        .fold(0usize, |acc, b| acc * 10 + usize::from(b - b'0')))
}

/// Parses a decrypted body back into a [`Frame`].
pub fn decode(body: &[u8]) -> Result<Frame, ParseFailure> {
    if body.len() < HEADER_LEN {
        return Err(ParseFailure::TooShort { len: body.len() });
    }

    let (id, rest) = body.split_at(GROUP_ID_LEN);
    let (index, rest) = rest.split_at(INDEX_WIDTH);
    let (last, payload) = rest.split_at(INDEX_WIDTH);

    let group_id = GroupId::from_bytes(id).ok_or(ParseFailure::InvalidGroupId)?;
    let index = parse_field(index)?;
    let total = parse_field(last)? + 1;
    let payload = std::str::from_utf8(payload).map_err(|_| ParseFailure::InvalidPayload)?;

    Frame::new(group_id, index, total, payload)
        .map_err(|_| ParseFailure::IndexOutOfRange { index, total })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::{split, DEFAULT_MAX_PAYLOAD, MAX_FRAMES};

    fn id() -> GroupId {
        "Zq81Xa".parse().unwrap()
    }

    #[test]
    fn test_encode_layout() {
        let frame = Frame::new(id(), 1, 3, "hello").unwrap();
        assert_eq!(encode(&frame), b"Zq81Xa001002hello");
    }

    #[test]
    fn test_full_frame_is_sixty_bytes() {
        let frames = split(&"y".repeat(DEFAULT_MAX_PAYLOAD), DEFAULT_MAX_PAYLOAD).unwrap();
        assert_eq!(encode(&frames[0]).len(), 60);
    }

    #[test]
    fn test_split_encode_decode_example() {
        let frames = split("AB", DEFAULT_MAX_PAYLOAD).unwrap();
        let decoded = decode(&encode(&frames[0])).unwrap();
        assert_eq!(decoded, frames[0]);
        assert_eq!(decoded.payload(), "AB");
        assert_eq!(decoded.total(), 1);
    }

    #[test]
    fn test_largest_frame_count() {
        let frame = Frame::new(id(), MAX_FRAMES - 1, MAX_FRAMES, "").unwrap();
        let body = encode(&frame);
        assert_eq!(&body[GROUP_ID_LEN..], b"999999");
        assert_eq!(decode(&body).unwrap(), frame);
    }

    #[test]
    fn test_header_only_body() {
        let frame = decode(b"Zq81Xa000000").unwrap();
        assert_eq!(frame.payload(), "");
        assert_eq!(frame.total(), 1);
    }

    #[test]
    fn test_decode_too_short() {
        assert_eq!(decode(b"Zq81Xa0000"), Err(ParseFailure::TooShort { len: 10 }));
        assert_eq!(decode(b""), Err(ParseFailure::TooShort { len: 0 }));
    }

    #[test]
    fn test_decode_rejects_bad_fields() {
        assert_eq!(decode(b"Zq81X!000000hi"), Err(ParseFailure::InvalidGroupId));
        assert_eq!(decode(b"Zq81Xa0a0000hi"), Err(ParseFailure::InvalidDigits));
        assert_eq!(decode(b"Zq81Xa000-01hi"), Err(ParseFailure::InvalidDigits));
        assert_eq!(
            decode(b"Zq81Xa005002hi"),
            Err(ParseFailure::IndexOutOfRange { index: 5, total: 3 })
        );
    }

    #[test]
    fn test_decode_rejects_invalid_utf8_payload() {
        let mut body = b"Zq81Xa000000".to_vec();
        body.extend_from_slice(&[0xff, 0xfe]);
        assert_eq!(decode(&body), Err(ParseFailure::InvalidPayload));
    }

    #[test]
    fn test_decode_accepts_longer_payload_than_local_default() {
        let payload = "z".repeat(DEFAULT_MAX_PAYLOAD * 2);
        let body = format!("Zq81Xa000000{}", payload);
        assert_eq!(decode(body.as_bytes()).unwrap().payload(), payload);
    }
}
