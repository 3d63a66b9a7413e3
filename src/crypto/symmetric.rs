//! Default item cipher: passphrase-keyed authenticated encryption.
//!
//! - HKDF-SHA256 derives the key from the group passphrase
//! - a fresh random nonce is generated for every item and prepended
//! - ChaCha20-Poly1305 seals the frame body
//!
//! Two items carrying the same frame body never share a nonce, and any item
//! that was not sealed under this passphrase fails authentication instead of
//! decrypting to garbage.

use chacha20poly1305::{
    aead::{Aead, KeyInit},
    ChaCha20Poly1305, Nonce,
};
use hkdf::Hkdf;
use rand::rngs::OsRng;
use sha2::Sha256;
use zeroize::Zeroizing;

use super::{CipherError, DecryptFailure};

/// HKDF info string for passphrase-based key derivation.
const HKDF_INFO: &[u8] = b"COMMENTSEAL-V1-ITEM-KEY";

/// Salt for HKDF (fixed so every group member derives the same key).
const HKDF_SALT: &[u8] = b"COMMENTSEAL-V1-SALT";

/// Nonce size for ChaCha20Poly1305.
pub const NONCE_SIZE: usize = 12;

/// Poly1305 authentication tag size.
pub const TAG_SIZE: usize = 16;

/// Derives a 256-bit item key from a passphrase.
fn derive_key(passphrase: &str) -> Result<Zeroizing<[u8; 32]>, CipherError> {
    let hk = Hkdf::<Sha256>::new(Some(HKDF_SALT), passphrase.as_bytes());
    let mut key = Zeroizing::new([0u8; 32]);
    hk.expand(HKDF_INFO, &mut key[..])
        .map_err(|_| CipherError::KeyDerivationFailed)?;
    Ok(key)
}

/// Size of a sealed item for a plaintext of `plaintext_len` bytes.
pub fn sealed_len(plaintext_len: usize) -> usize {
    NONCE_SIZE + plaintext_len + TAG_SIZE
}

/// Seals a frame body under a passphrase.
///
/// The output format is: nonce (12 bytes) || ciphertext (variable, includes auth tag)
pub fn seal(plaintext: &[u8], passphrase: &str) -> Result<Vec<u8>, CipherError> {
    let key = derive_key(passphrase)?;

    let mut nonce_bytes = [0u8; NONCE_SIZE];
    rand::RngCore::fill_bytes(&mut OsRng, &mut nonce_bytes);
    let nonce = Nonce::from_slice(&nonce_bytes);

    let cipher = ChaCha20Poly1305::new_from_slice(&key[..])
        .map_err(|e| CipherError::EncryptionFailed(e.to_string()))?;

    let ciphertext = cipher
        .encrypt(nonce, plaintext)
        .map_err(|e| CipherError::EncryptionFailed(e.to_string()))?;

    let mut result = Vec::with_capacity(NONCE_SIZE + ciphertext.len());
    result.extend_from_slice(&nonce_bytes);
    result.extend_from_slice(&ciphertext);

    Ok(result)
}

/// Opens a sealed item.
///
/// Expects input format: nonce (12 bytes) || ciphertext (variable, includes auth tag)
pub fn open(data: &[u8], passphrase: &str) -> Result<Vec<u8>, DecryptFailure> {
    if data.len() < NONCE_SIZE + TAG_SIZE {
        return Err(DecryptFailure::TooShort { len: data.len() });
    }

    let (nonce_bytes, ciphertext) = data.split_at(NONCE_SIZE);

    let key = derive_key(passphrase).map_err(|_| DecryptFailure::Rejected)?;
    let cipher =
        ChaCha20Poly1305::new_from_slice(&key[..]).map_err(|_| DecryptFailure::Rejected)?;

    cipher
        .decrypt(Nonce::from_slice(nonce_bytes), ciphertext)
        .map_err(|_| DecryptFailure::Rejected)
}
