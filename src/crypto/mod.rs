//! Cryptographic primitives for VaultKeep.
//!
//! This module provides:
//! - SHA-256 master-password key derivation (`kdf`)
//! - AES-256-GCM encryption and decryption (`encryption`)
//!
//! Both are a stable contract: the vault file and the `.locked` file
//! utility are built on exactly these two functions.

pub mod encryption;
pub mod kdf;

// Re-export the most commonly used items so callers can write:
//   use crate::crypto::{encrypt, decrypt, derive_key, ...};
pub use encryption::{decrypt, encrypt, NONCE_LEN};
pub use kdf::{derive_key, MasterKey, KEY_LEN};
