//! CLI module — Clap argument parser, output helpers, and command implementations.

pub mod commands;
pub mod output;

use std::path::PathBuf;
use std::rc::Rc;

use clap::Parser;
use zeroize::Zeroizing;

use crate::audit::{self, AuditSink};
use crate::config::Settings;
use crate::errors::{Result, VaultKeepError};
use crate::policy::{validate_password, PASSWORD_REQUIREMENTS};
use crate::session::{CredentialPrompt, Rejection, Session};
use crate::vault::VaultFile;

/// Environment variable holding the master password (scripts/CI).
pub const PASSWORD_ENV: &str = "VAULTKEEP_PASSWORD";

/// Environment variable holding the replacement password for `passwd`.
pub const NEW_PASSWORD_ENV: &str = "VAULTKEEP_NEW_PASSWORD";

/// VaultKeep CLI: local encrypted secret vault.
#[derive(Parser)]
#[command(
    name = "vaultkeep",
    about = "Local encrypted secret vault with fuzzy search",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Vault file (default: vault.dat, or `vault_file` in .vaultkeep.toml)
    #[arg(long, global = true)]
    pub vault: Option<PathBuf>,

    /// Audit log directory (default: logs)
    #[arg(long, global = true)]
    pub audit_dir: Option<PathBuf>,

    /// Do not write audit log entries
    #[arg(long, global = true)]
    pub no_audit: bool,
}

/// All available subcommands.
#[derive(clap::Subcommand)]
pub enum Commands {
    /// Create a new vault protected by a master password
    Init,

    /// Add a secret (overwrites an existing one)
    Add {
        /// Secret name (e.g. Gmail)
        name: String,
        /// Secret value (omit for interactive prompt)
        value: Option<String>,
    },

    /// Show a secret's value
    Get {
        /// Secret name
        name: String,
        /// Copy the value to the clipboard instead of printing it
        #[arg(short, long)]
        copy: bool,
    },

    /// Change the value of an existing secret
    Update {
        /// Secret name
        name: String,
        /// New value (omit for interactive prompt)
        value: Option<String>,
    },

    /// Delete a secret
    Delete {
        /// Secret name
        name: String,
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },

    /// List all secret names
    List,

    /// Find secrets by approximate name
    Search {
        /// Search pattern (case-insensitive, typo tolerant)
        pattern: String,
        /// Maximum number of results
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Change the master password
    Passwd,

    /// Encrypt a file to <file>.locked and remove the original
    Lock {
        /// File to encrypt
        file: PathBuf,
    },

    /// Decrypt a .locked file and remove the encrypted copy
    Unlock {
        /// File ending in .locked
        file: PathBuf,
    },

    /// Interactive menu
    Shell,

    /// View the audit log
    Audit {
        /// Number of entries to show (default: 50)
        #[arg(long, default_value = "50")]
        last: usize,
        /// Show entries since a duration ago (e.g. 7d, 24h, 30m)
        #[arg(long)]
        since: Option<String>,
    },

    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for (bash, zsh, fish, powershell)
        shell: String,
    },
}

// ---------------------------------------------------------------------------
// Shared context
// ---------------------------------------------------------------------------

/// Everything a command needs besides its own arguments: resolved
/// settings, paths, and the audit sink built once for this process.
pub struct Context {
    pub settings: Settings,
    pub vault_path: PathBuf,
    pub audit_dir: PathBuf,
    pub audit: Rc<dyn AuditSink>,
}

impl Context {
    /// Resolve settings and paths from the working directory and flags.
    pub fn load(cli: &Cli) -> Result<Self> {
        let cwd = std::env::current_dir()?;
        let settings = Settings::load(&cwd)?;

        let vault_path = match &cli.vault {
            Some(p) => cwd.join(p),
            None => settings.vault_path(&cwd),
        };
        let audit_dir = match &cli.audit_dir {
            Some(p) => cwd.join(p),
            None => settings.audit_path(&cwd),
        };

        let audit: Rc<dyn AuditSink> = if cli.no_audit {
            Rc::new(audit::NullAudit)
        } else {
            audit::open_sink(&audit_dir, settings.audit_retention_days)
        };

        Ok(Self {
            settings,
            vault_path,
            audit_dir,
            audit,
        })
    }

    /// The vault file, wired to this context's audit sink.
    pub fn vault_file(&self) -> VaultFile {
        VaultFile::new(&self.vault_path).with_audit(Rc::clone(&self.audit))
    }

    /// Prompt for the master password and unlock the vault.
    pub fn open_session(&self) -> Result<Session> {
        let file = self.vault_file();
        if !file.exists_on_disk() {
            output::tip("Run `vaultkeep init` to create a vault first.");
            return Err(VaultKeepError::VaultNotFound(self.vault_path.clone()));
        }

        let password = prompt_password()?;
        Ok(Session::open(file, password)?.with_max_attempts(self.settings.max_password_attempts))
    }
}

// ---------------------------------------------------------------------------
// Password prompts
// ---------------------------------------------------------------------------

fn password_from_env(var: &str) -> Option<Zeroizing<String>> {
    match std::env::var(var) {
        Ok(pw) if !pw.is_empty() => Some(Zeroizing::new(pw)),
        _ => None,
    }
}

fn read_hidden(prompt: &str) -> Result<Zeroizing<String>> {
    let pw = dialoguer::Password::new()
        .with_prompt(prompt)
        .allow_empty_password(true)
        .interact()
        .map_err(|e| VaultKeepError::CommandFailed(format!("password prompt: {e}")))?;
    Ok(Zeroizing::new(pw))
}

/// Get the master password, trying in order:
/// 1. `VAULTKEEP_PASSWORD` env var (CI/CD)
/// 2. Interactive prompt
///
/// Returns `Zeroizing<String>` so the password is wiped from memory on drop.
pub fn prompt_password() -> Result<Zeroizing<String>> {
    if let Some(pw) = password_from_env(PASSWORD_ENV) {
        return Ok(pw);
    }
    read_hidden("Master password")
}

/// Prompt for a new master password with confirmation (used by `init`).
///
/// Also respects `VAULTKEEP_PASSWORD` for scripted usage, in which case a
/// policy violation is an error instead of a retry.
pub fn prompt_new_password() -> Result<Zeroizing<String>> {
    if let Some(pw) = password_from_env(PASSWORD_ENV) {
        validate_password(&pw)?;
        return Ok(pw);
    }

    println!("{PASSWORD_REQUIREMENTS}\n");

    loop {
        let password = read_hidden("Choose master password")?;

        if let Err(violation) = validate_password(&password) {
            output::warning(&format!("{violation}. Try again."));
            continue;
        }

        let confirmation = read_hidden("Confirm master password")?;
        if *password != *confirmation {
            return Err(VaultKeepError::PasswordMismatch);
        }

        return Ok(password);
    }
}

/// `CredentialPrompt` backed by the terminal, with environment-variable
/// overrides for non-interactive use.
#[derive(Debug, Default)]
pub struct TerminalPrompt {
    env_rejection: Option<Rejection>,
}

impl CredentialPrompt for TerminalPrompt {
    fn current_password(&mut self, remaining: u32) -> Result<Zeroizing<String>> {
        if let Some(pw) = password_from_env(PASSWORD_ENV) {
            return Ok(pw);
        }
        read_hidden(&format!("Current master password ({remaining} attempts left)"))
    }

    fn new_password(&mut self) -> Result<Zeroizing<String>> {
        if let Some(pw) = password_from_env(NEW_PASSWORD_ENV) {
            // A rejected value from the environment would be rejected forever.
            if let Some(reason) = self.env_rejection {
                return Err(VaultKeepError::CommandFailed(format!(
                    "{NEW_PASSWORD_ENV} was rejected: {reason}"
                )));
            }
            return Ok(pw);
        }
        read_hidden("New master password")
    }

    fn confirm_password(&mut self) -> Result<Zeroizing<String>> {
        if let Some(pw) = password_from_env(NEW_PASSWORD_ENV) {
            return Ok(pw);
        }
        read_hidden("Confirm new master password")
    }

    fn rejected(&mut self, reason: Rejection) {
        if password_from_env(NEW_PASSWORD_ENV).is_some() {
            self.env_rejection = Some(reason);
        } else {
            output::warning(&format!("{reason}. Try again."));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // The only test in this binary that touches NEW_PASSWORD_ENV.
    #[test]
    fn empty_new_password_env_counts_as_unset() {
        std::env::set_var(NEW_PASSWORD_ENV, "");
        let mut prompt = TerminalPrompt::default();
        prompt.rejected(Rejection::SameAsCurrent);
        assert_eq!(prompt.env_rejection, None);

        std::env::set_var(NEW_PASSWORD_ENV, "Battery-Staple2");
        prompt.rejected(Rejection::SameAsCurrent);
        assert_eq!(prompt.env_rejection, Some(Rejection::SameAsCurrent));

        std::env::remove_var(NEW_PASSWORD_ENV);
    }
}
