//! Cipher wrapper for channel items.
//!
//! This module provides:
//! - Passphrase-keyed encryption of one frame body into one printable item
//! - Decryption that reports failure as a value ([`DecryptFailure`]), never a panic
//! - Random group passphrases drawn from the same 62-symbol alphabet as group ids
//!
//! Two schemes are available, see [`CipherScheme`].

pub mod legacy;
pub mod symmetric;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Symbols used for group ids and generated passphrases.
pub const ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Default length of a generated group passphrase.
pub const DEFAULT_PASSPHRASE_LEN: usize = 32;

/// How frame bodies are turned into channel items.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CipherScheme {
    /// HKDF-SHA256 + ChaCha20-Poly1305, random nonce per item, base64 text.
    #[default]
    Sealed,

    /// AES-256-CBC, key and IV from the passphrase only, hex text.
    /// Reads and writes threads shared with earlier clients.
    Legacy,
}

impl CipherScheme {
    /// Printable length of an item carrying `plaintext_len` bytes.
    pub fn item_len(self, plaintext_len: usize) -> usize {
        match self {
            CipherScheme::Sealed => {
                let raw = symmetric::sealed_len(plaintext_len);
                raw.div_ceil(3) * 4
            }
            CipherScheme::Legacy => legacy::sealed_len(plaintext_len) * 2,
        }
    }
}

/// Errors that can occur while encrypting an item.
#[derive(Error, Debug)]
pub enum CipherError {
    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    #[error("Key derivation failed")]
    KeyDerivationFailed,
}

/// Why an item could not be decrypted.
///
/// This is an expected outcome: foreign comments and items for other groups
/// all end up here.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecryptFailure {
    #[error("item text is not in the scheme's printable encoding")]
    NotPrintable,

    #[error("item too short: {len} bytes")]
    TooShort { len: usize },

    #[error("item rejected by cipher")]
    Rejected,
}

/// Encrypts one frame body into the printable text of one channel item.
pub fn encrypt_item(
    plaintext: &[u8],
    passphrase: &str,
    scheme: CipherScheme,
) -> Result<String, CipherError> {
    match scheme {
        CipherScheme::Sealed => Ok(BASE64.encode(symmetric::seal(plaintext, passphrase)?)),
        CipherScheme::Legacy => Ok(hex::encode(legacy::encrypt(plaintext, passphrase)?)),
    }
}

/// Decrypts the printable text of one channel item.
pub fn decrypt_item(
    text: &str,
    passphrase: &str,
    scheme: CipherScheme,
) -> Result<Vec<u8>, DecryptFailure> {
    let text = text.trim();
    match scheme {
        CipherScheme::Sealed => {
            let raw = BASE64
                .decode(text)
                .map_err(|_| DecryptFailure::NotPrintable)?;
            symmetric::open(&raw, passphrase)
        }
        CipherScheme::Legacy => {
            let raw = hex::decode(text).map_err(|_| DecryptFailure::NotPrintable)?;
            legacy::decrypt(&raw, passphrase)
        }
    }
}

/// Random string of `len` symbols from [`ALPHABET`].
pub fn random_token(len: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..len)
        .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
        .collect()
}

/// Generates a fresh passphrase for a new group.
pub fn generate_passphrase(len: usize) -> String {
    random_token(len)
}
