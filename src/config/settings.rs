use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::errors::{Result, VaultKeepError};

/// User configuration, loaded from `.vaultkeep.toml`.
///
/// Every field has a sensible default so VaultKeep works out-of-the-box
/// without any config file at all.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Vault file path, relative to the working directory.
    #[serde(default = "default_vault_file")]
    pub vault_file: String,

    /// Directory holding the audit database.
    #[serde(default = "default_audit_dir")]
    pub audit_dir: String,

    /// Audit entries older than this many days are pruned at startup.
    #[serde(default = "default_audit_retention_days")]
    pub audit_retention_days: u32,

    /// Result cap for `search` when `--limit` is not given.
    #[serde(default = "default_max_search_results")]
    pub max_search_results: usize,

    /// Attempts allowed when re-entering the current master password.
    #[serde(default = "default_max_password_attempts")]
    pub max_password_attempts: u32,
}

// ── Serde default helpers ────────────────────────────────────────────

fn default_vault_file() -> String {
    "vault.dat".to_string()
}

fn default_audit_dir() -> String {
    "logs".to_string()
}

fn default_audit_retention_days() -> u32 {
    7
}

fn default_max_search_results() -> usize {
    10
}

fn default_max_password_attempts() -> u32 {
    3
}

// ── Implementation ───────────────────────────────────────────────────

impl Default for Settings {
    fn default() -> Self {
        Self {
            vault_file: default_vault_file(),
            audit_dir: default_audit_dir(),
            audit_retention_days: default_audit_retention_days(),
            max_search_results: default_max_search_results(),
            max_password_attempts: default_max_password_attempts(),
        }
    }
}

impl Settings {
    /// Name of the config file we look for in the working directory.
    const FILE_NAME: &'static str = ".vaultkeep.toml";

    /// Load settings from `<dir>/.vaultkeep.toml`.
    ///
    /// If the file does not exist, sensible defaults are returned.
    /// If the file exists but cannot be parsed, an error is returned.
    pub fn load(dir: &Path) -> Result<Self> {
        let config_path = dir.join(Self::FILE_NAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&config_path)?;

        let settings: Settings = toml::from_str(&contents).map_err(|e| {
            VaultKeepError::ConfigError(format!("Failed to parse {}: {e}", config_path.display()))
        })?;

        if settings.max_password_attempts == 0 {
            return Err(VaultKeepError::ConfigError(
                "max_password_attempts must be at least 1".into(),
            ));
        }

        Ok(settings)
    }

    /// Full path to the vault file.
    pub fn vault_path(&self, dir: &Path) -> PathBuf {
        dir.join(&self.vault_file)
    }

    /// Full path to the audit directory.
    pub fn audit_path(&self, dir: &Path) -> PathBuf {
        dir.join(&self.audit_dir)
    }
}

// ── Tests ────────────────────────────────────────────────────────────
