//! Vault module — encrypted secret storage.
//!
//! This module provides:
//! - The in-memory `Vault` secret map (`store`)
//! - Fuzzy name search (`search`)
//! - The encrypted vault file and its load / save protocol (`format`)

pub mod format;
pub mod search;
pub mod store;

// Re-export the most commonly used items.
pub use format::VaultFile;
pub use store::Vault;
