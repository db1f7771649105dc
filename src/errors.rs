use std::path::PathBuf;
use thiserror::Error;

use crate::policy::PolicyViolation;

/// All errors that can occur in VaultKeep.
#[derive(Debug, Error)]
pub enum VaultKeepError {
    // --- Crypto errors ---
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    #[error("Authentication failed — wrong key or tampered data")]
    AuthenticationFailure,

    // --- Vault errors ---
    #[error("Wrong password or corrupted vault file")]
    WrongPasswordOrCorrupt,

    #[error("Invalid vault payload: {0}")]
    FormatError(String),

    #[error("Vault not found at {0}")]
    VaultNotFound(PathBuf),

    #[error("Vault already exists at {0}")]
    VaultAlreadyExists(PathBuf),

    #[error("Secret '{0}' not found")]
    SecretNotFound(String),

    // --- Password errors ---
    #[error("{0}")]
    PasswordPolicy(#[from] PolicyViolation),

    #[error("Passwords do not match")]
    PasswordMismatch,

    #[error("Too many failed password attempts ({0}), operation cancelled")]
    TooManyAttempts(u32),

    // --- File encryption errors ---
    #[error("File encryption error: {0}")]
    FileCrypt(String),

    // --- Config errors ---
    #[error("Config file error: {0}")]
    ConfigError(String),

    // --- IO errors ---
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // --- Serialization errors ---
    #[error("Serialization error: {0}")]
    SerializationError(String),

    // --- CLI errors ---
    #[error("Audit error: {0}")]
    AuditError(String),

    #[error("Command failed: {0}")]
    CommandFailed(String),

    #[error("User cancelled operation")]
    UserCancelled,
}

impl VaultKeepError {
    /// `true` for failures that present as a bad master password.
    ///
    /// An empty entry cannot derive a key, so it counts the same as a
    /// wrong one when verifying a password.
    pub fn is_bad_password(&self) -> bool {
        matches!(self, Self::WrongPasswordOrCorrupt | Self::InvalidInput(_))
    }
}

/// Convenience type alias for VaultKeep results.
pub type Result<T> = std::result::Result<T, VaultKeepError>;
