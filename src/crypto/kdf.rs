//! Password-based key derivation using PBKDF2-HMAC-SHA256.
//!
//! The iteration count is a compiled constant so every vault written by
//! any build of Cerbero can be opened by any other.  `derive_key` takes
//! the count explicitly for callers (and tests) that need it, but refuses
//! anything below `MIN_ITERATIONS`.

use pbkdf2::pbkdf2_hmac;
use rand::RngCore;
use sha2::Sha256;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::errors::{CerberoError, Result};

/// Length of the salt in bytes (128 bits).
pub const SALT_LEN: usize = 16;

/// Length of the derived key in bytes (256 bits, for AES-256).
pub const KEY_LEN: usize = 32;

/// Iteration count used for every vault.
pub const PBKDF2_ITERATIONS: u32 = 480_000;

/// Lowest iteration count `derive_key` accepts.
pub const MIN_ITERATIONS: u32 = 100_000;

/// Derive a 32-byte key from a password and a 16-byte salt.
///
/// The same password + salt + iterations always produce the same key.
pub fn derive_key(password: &[u8], salt: &[u8], iterations: u32) -> Result<[u8; KEY_LEN]> {
    if salt.len() != SALT_LEN {
        return Err(CerberoError::InvalidInput(format!(
            "salt must be {SALT_LEN} bytes (got {})",
            salt.len()
        )));
    }
    if iterations < MIN_ITERATIONS {
        return Err(CerberoError::InvalidInput(format!(
            "PBKDF2 iterations must be at least {MIN_ITERATIONS} (got {iterations})"
        )));
    }

    let mut key = [0u8; KEY_LEN];
    pbkdf2_hmac::<Sha256>(password, salt, iterations, &mut key);
    Ok(key)
}

/// Derive the vault master key with the fixed iteration count.
pub fn derive_master_key(password: &[u8], salt: &[u8]) -> Result<MasterKey> {
    let mut bytes = derive_key(password, salt, PBKDF2_ITERATIONS)?;
    let key = MasterKey::new(bytes);
    bytes.zeroize();
    Ok(key)
}

/// Generate a cryptographically random 16-byte salt.
pub fn generate_salt() -> [u8; SALT_LEN] {
    let mut salt = [0u8; SALT_LEN];
    rand::rng().fill_bytes(&mut salt);
    salt
}

/// A 32-byte master key that zeroes its memory when dropped.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct MasterKey {
    bytes: [u8; KEY_LEN],
}

impl MasterKey {
    /// Wrap raw key bytes.
    pub fn new(bytes: [u8; KEY_LEN]) -> Self {
        Self { bytes }
    }

    /// Access the raw key bytes (e.g. to pass to `encrypt`).
    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.bytes
    }
}

impl std::fmt::Debug for MasterKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("MasterKey([REDACTED])")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_short_salt() {
        let result = derive_key(b"password", &[0u8; 8], MIN_ITERATIONS);
        assert!(matches!(result, Err(CerberoError::InvalidInput(_))));
    }

    #[test]
    fn rejects_low_iteration_count() {
        let result = derive_key(b"password", &[0u8; SALT_LEN], 1_000);
        assert!(matches!(result, Err(CerberoError::InvalidInput(_))));
    }

    #[test]
    fn salts_are_random() {
        assert_ne!(generate_salt(), generate_salt());
    }

    #[test]
    fn master_key_debug_is_redacted() {
        let key = MasterKey::new([7u8; KEY_LEN]);
        assert_eq!(format!("{key:?}"), "MasterKey([REDACTED])");
    }
}
