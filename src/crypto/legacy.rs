//! Compatibility item cipher for threads written by earlier clients.
//!
//! AES-256-CBC with PKCS#7 padding. Key and IV come from the passphrase
//! alone through OpenSSL's `EVP_BytesToKey` (MD5, one round, no salt), so the
//! same frame body under the same passphrase always produces the same item.
//! Prefer [`super::CipherScheme::Sealed`] for new groups.

use aes::Aes256;
use cbc::cipher::{block_padding::Pkcs7, BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use md5::{Digest, Md5};
use zeroize::Zeroizing;

use super::{CipherError, DecryptFailure};

type Aes256CbcEnc = cbc::Encryptor<Aes256>;
type Aes256CbcDec = cbc::Decryptor<Aes256>;

/// AES-256 key length.
const KEY_LEN: usize = 32;

/// CBC initialization vector length (one AES block).
pub const BLOCK_LEN: usize = 16;

/// Derives key and IV exactly like `EVP_BytesToKey(aes-256-cbc, md5, NULL, pass, 1)`.
fn derive_key_iv(passphrase: &str) -> Zeroizing<[u8; KEY_LEN + BLOCK_LEN]> {
    let mut material = Zeroizing::new([0u8; KEY_LEN + BLOCK_LEN]);
    let mut previous: Option<Vec<u8>> = None;
    let mut filled = 0;

    while filled < material.len() {
        let mut hasher = Md5::new();
        if let Some(prev) = &previous {
            hasher.update(prev);
        }
        hasher.update(passphrase.as_bytes());
        let digest = hasher.finalize();

        let take = (material.len() - filled).min(digest.len());
        material[filled..filled + take].copy_from_slice(&digest[..take]);
        filled += take;
        previous = Some(digest.to_vec());
    }

    material
}

/// Size of a legacy item for a plaintext of `plaintext_len` bytes.
pub fn sealed_len(plaintext_len: usize) -> usize {
    (plaintext_len / BLOCK_LEN + 1) * BLOCK_LEN
}

/// Encrypts a frame body with the passphrase-derived key and IV.
pub fn encrypt(plaintext: &[u8], passphrase: &str) -> Result<Vec<u8>, CipherError> {
    let material = derive_key_iv(passphrase);
    let (key, iv) = material.split_at(KEY_LEN);

    let cipher = Aes256CbcEnc::new_from_slices(key, iv)
        .map_err(|e| CipherError::EncryptionFailed(e.to_string()))?;

    Ok(cipher.encrypt_padded_vec_mut::<Pkcs7>(plaintext))
}

/// Decrypts a legacy item. Bad length or bad padding is a [`DecryptFailure`].
pub fn decrypt(ciphertext: &[u8], passphrase: &str) -> Result<Vec<u8>, DecryptFailure> {
    if ciphertext.is_empty() {
        return Err(DecryptFailure::TooShort { len: 0 });
    }
    if ciphertext.len() % BLOCK_LEN != 0 {
        return Err(DecryptFailure::Rejected);
    }

    let material = derive_key_iv(passphrase);
    let (key, iv) = material.split_at(KEY_LEN);

    let cipher = Aes256CbcDec::new_from_slices(key, iv).map_err(|_| DecryptFailure::Rejected)?;

    cipher
        .decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
        .map_err(|_| DecryptFailure::Rejected)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_iv_matches_openssl() {
        // openssl enc -aes-256-cbc -md md5 -nosalt -k password -P
        let material = derive_key_iv("password");
        assert_eq!(
            hex::encode(&material[..KEY_LEN]),
            "5f4dcc3b5aa765d61d8327deb882cf992b95990a9151374abd8ff8c5a7a0fe08"
        );
        assert_eq!(
            hex::encode(&material[KEY_LEN..]),
            "b7b4372cdfbcb3d16a2631b59b509e94"
        );
    }

    #[test]
    fn test_known_ciphertext() {
        let ciphertext = encrypt(b"abcdef000000AB", "password").unwrap();
        assert_eq!(hex::encode(&ciphertext), "f30b05ca2b936e4c562d65415ca4945b");
    }

    #[test]
    fn test_decrypt_item_from_earlier_client() {
        let item = hex::decode("e875d68f7f85b16de1cf5304465f8c477764e6c21878a0fc63bd446249bd7fd8")
            .unwrap();
        let plaintext = decrypt(&item, "s3cret").unwrap();
        assert_eq!(plaintext, b"Zq81Xa001002hello world");
    }

    #[test]
    fn test_same_body_same_item() {
        let a = encrypt(b"Zq81Xa000000same", "pass").unwrap();
        let b = encrypt(b"Zq81Xa000000same", "pass").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_frame_body_fits_four_blocks() {
        assert_eq!(sealed_len(60), 64);
        assert_eq!(encrypt(&[b'x'; 60], "pass").unwrap().len(), 64);
        assert_eq!(sealed_len(0), 16);
    }

    #[test]
    fn test_partial_block_is_rejected() {
        assert_eq!(decrypt(&[0u8; 17], "pass"), Err(DecryptFailure::Rejected));
        assert_eq!(decrypt(&[], "pass"), Err(DecryptFailure::TooShort { len: 0 }));
    }

    #[test]
    fn test_wrong_passphrase_never_panics() {
        let ciphertext = encrypt(b"Zq81Xa000000secret words", "right").unwrap();
        // CBC has no authentication: a wrong key usually breaks padding but may
        // occasionally yield garbage. Either way it must be a value, not a panic.
        if let Ok(garbage) = decrypt(&ciphertext, "wrong") {
            assert_ne!(garbage, b"Zq81Xa000000secret words");
        }
    }
}
