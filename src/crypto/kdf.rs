//! Master-password key derivation.
//!
//! The key is a plain SHA-256 digest of the UTF-8 password bytes.  No
//! salt is mixed in: the same password always yields the same key, in
//! every vault file.  Existing vault files depend on this, so the scheme
//! can only change together with a versioned file format.

use sha2::{Digest, Sha256};
use zeroize::Zeroize;

use crate::errors::{Result, VaultKeepError};

/// Length of the derived key in bytes (256 bits, for AES-256).
pub const KEY_LEN: usize = 32;

/// Derive a 32-byte key from a master password.
///
/// Fails with `InvalidInput` if the password is empty.
pub fn derive_key(password: &str) -> Result<[u8; KEY_LEN]> {
    if password.is_empty() {
        return Err(VaultKeepError::InvalidInput(
            "password cannot be empty".into(),
        ));
    }

    let digest = Sha256::digest(password.as_bytes());

    let mut key = [0u8; KEY_LEN];
    key.copy_from_slice(&digest);
    Ok(key)
}

/// A wrapper around a derived key that automatically zeroes its memory
/// when dropped.
///
/// Keys are recomputed from the password whenever they are needed; a
/// `MasterKey` lives only for the duration of one load or save.
#[derive(Zeroize)]
#[zeroize(drop)]
pub struct MasterKey {
    bytes: [u8; KEY_LEN],
}

impl MasterKey {
    /// Derive a `MasterKey` from a master password.
    pub fn from_password(password: &str) -> Result<Self> {
        let mut bytes = derive_key(password)?;
        let key = Self { bytes };
        bytes.zeroize();
        Ok(key)
    }

    /// Access the raw key bytes (e.g. to pass to encryption).
    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.bytes
    }
}

impl std::fmt::Debug for MasterKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("MasterKey(..)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derive_key_is_deterministic() {
        let k1 = derive_key("Correct-Horse-9").unwrap();
        let k2 = derive_key("Correct-Horse-9").unwrap();
        assert_eq!(k1, k2);
    }

    #[test]
    fn derive_key_matches_sha256_of_password() {
        // sha256("abc")
        let expected: [u8; 32] = [
            0xba, 0x78, 0x16, 0xbf, 0x8f, 0x01, 0xcf, 0xea, 0x41, 0x41, 0x40, 0xde, 0x5d, 0xae,
            0x22, 0x23, 0xb0, 0x03, 0x61, 0xa3, 0x96, 0x17, 0x7a, 0x9c, 0xb4, 0x10, 0xff, 0x61,
            0xf2, 0x00, 0x15, 0xad,
        ];
        assert_eq!(derive_key("abc").unwrap(), expected);
    }

    #[test]
    fn derive_key_rejects_empty_password() {
        let err = derive_key("").unwrap_err();
        assert!(matches!(err, VaultKeepError::InvalidInput(_)));
    }

    #[test]
    fn master_key_debug_hides_bytes() {
        let key = MasterKey::from_password("secret").unwrap();
        assert_eq!(format!("{key:?}"), "MasterKey(..)");
    }
}
