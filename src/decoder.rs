//! Per-item inbound classification.
//!
//! NOTE: decoding NEVER fails. Every item becomes either a [`Frame`] or an
//! opaque item with the reason it could not be read. Items of other groups,
//! ordinary comments and damaged items all land in the second bucket.

use std::fmt;

use crate::crypto::{decrypt_item, CipherScheme, DecryptFailure};
use crate::frame::{self, Frame, ParseFailure};

/// Why an item is opaque to the current group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OpaqueReason {
    /// The item did not decrypt under this passphrase.
    Decrypt(DecryptFailure),
    /// The item decrypted but is not a well-formed frame.
    Parse(ParseFailure),
    /// The frame's total disagrees with earlier frames of its group.
    Conflict { declared: usize, expected: usize },
}

impl fmt::Display for OpaqueReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OpaqueReason::Decrypt(e) => write!(f, "decrypt: {}", e),
            OpaqueReason::Parse(e) => write!(f, "parse: {}", e),
            OpaqueReason::Conflict { declared, expected } => write!(
                f,
                "conflict: frame declares {} frames, group has {}",
                declared, expected
            ),
        }
    }
}

/// What one channel item turned out to be.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemOutcome {
    Frame(Frame),
    Opaque(OpaqueReason),
}

impl ItemOutcome {
    pub fn frame(&self) -> Option<&Frame> {
        match self {
            ItemOutcome::Frame(frame) => Some(frame),
            ItemOutcome::Opaque(_) => None,
        }
    }

    pub fn is_opaque(&self) -> bool {
        matches!(self, ItemOutcome::Opaque(_))
    }
}

/// Decrypts and parses one item body.
pub fn decode_item(body: &str, passphrase: &str, scheme: CipherScheme) -> ItemOutcome {
    let plaintext = match decrypt_item(body, passphrase, scheme) {
        Ok(plaintext) => plaintext,
        Err(e) => return ItemOutcome::Opaque(OpaqueReason::Decrypt(e)),
    };

    match frame::decode(&plaintext) {
        Ok(frame) => ItemOutcome::Frame(frame),
        Err(e) => ItemOutcome::Opaque(OpaqueReason::Parse(e)),
    }
}

/// Classifies every body. Items are independent, so callers may also run
/// [`decode_item`] on separate threads and pass the results to
/// [`crate::reassembly::reassemble_outcomes`].
pub fn decode_items<'a, I>(bodies: I, passphrase: &str, scheme: CipherScheme) -> Vec<ItemOutcome>
where
    I: IntoIterator<Item = &'a str>,
{
    bodies
        .into_iter()
        .map(|body| decode_item(body, passphrase, scheme))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::encrypt_item;
    use crate::frame::{encode, split};

    #[test]
    fn test_decode_own_item() {
        let frames = split("hi there", 48).unwrap();
        let item = encrypt_item(&encode(&frames[0]), "pass", CipherScheme::Sealed).unwrap();

        let outcome = decode_item(&item, "pass", CipherScheme::Sealed);
        assert_eq!(outcome.frame(), Some(&frames[0]));
    }

    #[test]
    fn test_foreign_comment_is_opaque() {
        let outcome = decode_item("lol what is this", "pass", CipherScheme::Sealed);
        assert_eq!(
            outcome,
            ItemOutcome::Opaque(OpaqueReason::Decrypt(DecryptFailure::NotPrintable))
        );
    }

    #[test]
    fn test_other_group_is_opaque() {
        let frames = split("not for you", 48).unwrap();
        let item = encrypt_item(&encode(&frames[0]), "theirs", CipherScheme::Sealed).unwrap();

        let outcome = decode_item(&item, "ours", CipherScheme::Sealed);
        assert_eq!(
            outcome,
            ItemOutcome::Opaque(OpaqueReason::Decrypt(DecryptFailure::Rejected))
        );
    }

    #[test]
    fn test_decrypted_non_frame_is_parse_failure() {
        let item = encrypt_item(b"short", "pass", CipherScheme::Sealed).unwrap();
        let outcome = decode_item(&item, "pass", CipherScheme::Sealed);
        assert_eq!(
            outcome,
            ItemOutcome::Opaque(OpaqueReason::Parse(ParseFailure::TooShort { len: 5 }))
        );
    }

    #[test]
    fn test_decode_items_preserves_order() {
        let frames = split("abc", 1).unwrap();
        let mut bodies: Vec<String> = frames
            .iter()
            .map(|f| encrypt_item(&encode(f), "pass", CipherScheme::Legacy).unwrap())
            .collect();
        bodies.insert(1, "noise".to_string());

        let outcomes = decode_items(bodies.iter().map(String::as_str), "pass", CipherScheme::Legacy);
        assert_eq!(outcomes.len(), 4);
        assert_eq!(outcomes[0].frame().map(|f| f.index()), Some(0));
        assert!(outcomes[1].is_opaque());
        assert_eq!(outcomes[3].frame().map(|f| f.index()), Some(2));
    }

    #[test]
    fn test_reason_display() {
        let reason = OpaqueReason::Conflict {
            declared: 3,
            expected: 2,
        };
        assert_eq!(
            reason.to_string(),
            "conflict: frame declares 3 frames, group has 2"
        );
    }
}
