//! AES-256-GCM sealing of the whole vault.
//!
//! A sealed blob is self-contained:
//!   [ 12-byte nonce | ciphertext | 16-byte auth tag ]
//!
//! The nonce is fresh for every seal.  Opening fails with
//! `AuthenticationFailure` for any defect (short input, wrong key,
//! flipped bit), so a caller cannot tell a wrong password from a
//! damaged file.

use aes_gcm::aead::{AeadInPlace, KeyInit, OsRng};
use aes_gcm::{AeadCore, Aes256Gcm, Nonce, Tag};

use super::kdf::KEY_LEN;
use crate::errors::{CerberoError, Result};

/// Size of the AES-256-GCM nonce in bytes.
pub const NONCE_LEN: usize = 12;

/// Size of the GCM authentication tag in bytes.
pub const TAG_LEN: usize = 16;

fn cipher(key: &[u8; KEY_LEN]) -> Aes256Gcm {
    Aes256Gcm::new(key.into())
}

/// Seal `plaintext` under `key` into `nonce | ciphertext | tag`.
pub fn encrypt(key: &[u8; KEY_LEN], plaintext: &[u8]) -> Result<Vec<u8>> {
    let nonce = Aes256Gcm::generate_nonce(&mut OsRng);

    let mut blob = Vec::with_capacity(NONCE_LEN + plaintext.len() + TAG_LEN);
    blob.extend_from_slice(&nonce);
    blob.extend_from_slice(plaintext);

    let tag = cipher(key)
        .encrypt_in_place_detached(&nonce, b"", &mut blob[NONCE_LEN..])
        .map_err(|e| CerberoError::EncryptionFailed(e.to_string()))?;
    blob.extend_from_slice(&tag);
    Ok(blob)
}

/// Open a blob produced by `encrypt`.
pub fn decrypt(key: &[u8; KEY_LEN], blob: &[u8]) -> Result<Vec<u8>> {
    if blob.len() < NONCE_LEN + TAG_LEN {
        return Err(CerberoError::AuthenticationFailure);
    }

    let (nonce, sealed) = blob.split_at(NONCE_LEN);
    let (body, tag) = sealed.split_at(sealed.len() - TAG_LEN);

    // The tag is checked before the buffer is decrypted, so a failure
    // leaves only ciphertext behind.
    let mut plaintext = body.to_vec();
    cipher(key)
        .decrypt_in_place_detached(
            Nonce::from_slice(nonce),
            b"",
            &mut plaintext,
            Tag::from_slice(tag),
        )
        .map_err(|_| CerberoError::AuthenticationFailure)?;
    Ok(plaintext)
}
