//! An unlocked vault and the master password that opened it.
//!
//! `Session` is the single owner of the active password.  The password
//! only changes through `change_master_password`, and only after the
//! vault has been saved under the new one.

use subtle::ConstantTimeEq;
use zeroize::Zeroizing;

use crate::audit::AuditKind;
use crate::errors::{Result, VaultKeepError};
use crate::policy::{validate_password, PolicyViolation};
use crate::vault::{Vault, VaultFile};

/// Default number of tries for re-entering the current password.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Why a proposed new password was turned down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// Same as the password currently protecting the vault.
    SameAsCurrent,
    /// Breaks the complexity policy.
    Policy(PolicyViolation),
}

impl std::fmt::Display for Rejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SameAsCurrent => {
                f.write_str("The new password cannot be the same as the current one")
            }
            Self::Policy(v) => write!(f, "{v}"),
        }
    }
}

/// Source of passwords for the change-password workflow.
///
/// The CLI implements this with terminal prompts; tests use scripted
/// answers.  Returning an error from any method aborts the workflow.
pub trait CredentialPrompt {
    /// Ask for the current master password.  `remaining` counts this try.
    fn current_password(&mut self, remaining: u32) -> Result<Zeroizing<String>>;

    /// Ask for a new master password.
    fn new_password(&mut self) -> Result<Zeroizing<String>>;

    /// Ask for the new password again.
    fn confirm_password(&mut self) -> Result<Zeroizing<String>>;

    /// Tell the user a proposed password was refused.
    fn rejected(&mut self, reason: Rejection);
}

/// An open vault.
pub struct Session {
    file: VaultFile,
    vault: Vault,
    password: Zeroizing<String>,
    max_attempts: u32,
}

impl Session {
    // ------------------------------------------------------------------
    // Construction
    // ------------------------------------------------------------------

    /// Create a new, empty vault protected by `password`.
    ///
    /// The password must satisfy the policy.  Refuses to overwrite an
    /// existing vault file.
    pub fn create(file: VaultFile, password: Zeroizing<String>) -> Result<Self> {
        if file.exists_on_disk() {
            return Err(VaultKeepError::VaultAlreadyExists(file.path().to_path_buf()));
        }
        validate_password(&password)?;

        let vault = Vault::new();
        file.save(&vault, &password)?;
        file.audit().record(AuditKind::VaultCreated, "new vault created");

        Ok(Self {
            file,
            vault,
            password,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        })
    }

    /// Unlock an existing vault.
    pub fn open(file: VaultFile, password: Zeroizing<String>) -> Result<Self> {
        let vault = file.load(&password)?;
        Ok(Self {
            file,
            vault,
            password,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        })
    }

    /// Allow `attempts` tries when verifying the current password.
    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts.max(1);
        self
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn vault(&self) -> &Vault {
        &self.vault
    }

    /// Mutable access to the secrets.  Changes are lost unless `save`
    /// is called.
    pub fn vault_mut(&mut self) -> &mut Vault {
        &mut self.vault
    }

    pub fn file(&self) -> &VaultFile {
        &self.file
    }

    /// The password currently protecting the vault.
    pub fn password(&self) -> &str {
        &self.password
    }

    /// Record an event on the vault file's audit sink.
    pub fn audit(&self, kind: AuditKind, description: &str) {
        self.file.audit().record(kind, description);
    }

    // ------------------------------------------------------------------
    // Persistence
    // ------------------------------------------------------------------

    /// Commit the in-memory vault under the active password.
    pub fn save(&self) -> Result<()> {
        self.file.save(&self.vault, &self.password)
    }

    // ------------------------------------------------------------------
    // Re-key
    // ------------------------------------------------------------------

    /// Change the master password.
    ///
    /// 1. Verify the current password by decrypting the vault file, up
    ///    to `max_attempts` times.
    /// 2. Ask for a new password until it differs from the current one
    ///    and satisfies the policy.
    /// 3. Ask for it again; a mismatch aborts.
    /// 4. Save the unchanged secrets under the new password, then swap
    ///    the active password.
    ///
    /// Any failure leaves the session and the file exactly as they were.
    pub fn change_master_password<P: CredentialPrompt>(&mut self, prompt: &mut P) -> Result<()> {
        self.verify_current_password(prompt)?;

        let new_password = loop {
            let candidate = prompt.new_password()?;

            if ct_eq(&candidate, &self.password) {
                prompt.rejected(Rejection::SameAsCurrent);
                continue;
            }
            if let Err(violation) = validate_password(&candidate) {
                prompt.rejected(Rejection::Policy(violation));
                continue;
            }
            break candidate;
        };

        let confirmation = prompt.confirm_password()?;
        if !ct_eq(&new_password, &confirmation) {
            return Err(VaultKeepError::PasswordMismatch);
        }

        self.file.save(&self.vault, &new_password)?;
        self.password = new_password;

        self.audit(AuditKind::PasswordChanged, "master password changed");
        Ok(())
    }

    fn verify_current_password<P: CredentialPrompt>(&self, prompt: &mut P) -> Result<()> {
        for attempt in 0..self.max_attempts {
            let candidate = prompt.current_password(self.max_attempts - attempt)?;

            // The decrypted copy is only a proof of the password; the
            // in-memory vault stays as it is.
            match self.file.load(&candidate) {
                Ok(_) => return Ok(()),
                Err(e) if e.is_bad_password() => continue,
                Err(e) => return Err(e),
            }
        }

        Err(VaultKeepError::TooManyAttempts(self.max_attempts))
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("file", &self.file)
            .field("vault", &self.vault)
            .finish_non_exhaustive()
    }
}

fn ct_eq(a: &str, b: &str) -> bool {
    a.as_bytes().ct_eq(b.as_bytes()).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ct_eq_compares_contents() {
        assert!(ct_eq("Pass-word1", "Pass-word1"));
        assert!(!ct_eq("Pass-word1", "Pass-word2"));
        assert!(!ct_eq("short", "longer"));
    }

    #[test]
    fn rejection_messages() {
        assert!(Rejection::SameAsCurrent.to_string().contains("same"));
        assert_eq!(
            Rejection::Policy(PolicyViolation::MissingDigit).to_string(),
            PolicyViolation::MissingDigit.to_string()
        );
    }
}
