//! On-disk vault file and the load / save protocol.
//!
//! A vault file is a single encrypted blob:
//!
//! ```text
//! [nonce: 12 bytes][AES-256-GCM ciphertext of the JSON secret map + 16-byte tag]
//! ```
//!
//! There is no magic number or version byte; a file is only recognised
//! by decrypting successfully.  A future layout change must add an
//! explicit version tag in front of the nonce.

use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use zeroize::Zeroize;

use crate::audit::{AuditKind, AuditSink, NullAudit};
use crate::crypto::{decrypt, encrypt, MasterKey};
use crate::errors::{Result, VaultKeepError};

use super::store::Vault;

/// Handle to the vault file at a fixed path.
///
/// Holds no key material.  Every `load` and `save` re-derives the key
/// from the password it is given.
pub struct VaultFile {
    path: PathBuf,
    audit: Rc<dyn AuditSink>,
}

impl VaultFile {
    /// A vault file at `path` with auditing disabled.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            audit: Rc::new(NullAudit),
        }
    }

    /// Report load / save outcomes to `audit`.
    pub fn with_audit(mut self, audit: Rc<dyn AuditSink>) -> Self {
        self.audit = audit;
        self
    }

    /// Returns the path to the vault file on disk.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The sink this file reports to.
    pub fn audit(&self) -> &Rc<dyn AuditSink> {
        &self.audit
    }

    /// Returns `true` if a vault file is present.
    pub fn exists_on_disk(&self) -> bool {
        self.path.is_file()
    }

    /// Read, decrypt and deserialize the vault.
    ///
    /// A bad tag and an undecodable payload both come back as
    /// `WrongPasswordOrCorrupt`; the two are deliberately not told apart.
    /// Storage failures are reported as `VaultNotFound` or `Io`.
    pub fn load(&self, password: &str) -> Result<Vault> {
        if !self.path.exists() {
            return Err(VaultKeepError::VaultNotFound(self.path.clone()));
        }

        let blob = fs::read(&self.path)?;
        let key = MasterKey::from_password(password)?;

        let mut plaintext = match decrypt(key.as_bytes(), &blob) {
            Ok(bytes) => bytes,
            Err(VaultKeepError::AuthenticationFailure) => {
                self.audit
                    .record(AuditKind::WrongPassword, "failed attempt to decrypt the vault");
                return Err(VaultKeepError::WrongPasswordOrCorrupt);
            }
            Err(e) => return Err(e),
        };

        let vault = Vault::deserialize(&plaintext);
        plaintext.zeroize();

        match vault {
            Ok(vault) => {
                self.audit.record(
                    AuditKind::LoadSucceeded,
                    &format!("vault loaded ({} secrets)", vault.len()),
                );
                Ok(vault)
            }
            Err(_) => {
                self.audit
                    .record(AuditKind::WrongPassword, "vault decrypted to an invalid payload");
                Err(VaultKeepError::WrongPasswordOrCorrupt)
            }
        }
    }

    /// Serialize, encrypt and atomically replace the vault file.
    ///
    /// `vault` is only borrowed; a failed save changes nothing in memory
    /// and leaves the previous file intact.
    pub fn save(&self, vault: &Vault, password: &str) -> Result<()> {
        let key = MasterKey::from_password(password)?;

        let mut plaintext = vault.serialize()?;
        let blob = encrypt(key.as_bytes(), &plaintext);
        plaintext.zeroize();
        let blob = blob?;

        write_atomic(&self.path, &blob)?;

        self.audit.record(
            AuditKind::SaveSucceeded,
            &format!("vault saved ({} secrets)", vault.len()),
        );
        Ok(())
    }
}

impl std::fmt::Debug for VaultFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VaultFile").field("path", &self.path).finish()
    }
}

/// Write `data` to `path` **atomically**.
///
/// 1. Write to a temp file in the same directory.
/// 2. Flush it to disk.
/// 3. Rename the temp file over the target path.
///
/// The rename ensures readers never see a half-written file.  On any
/// failure the temp file is removed and the target is left as it was.
pub fn write_atomic(path: &Path, data: &[u8]) -> Result<()> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    if !parent.exists() {
        fs::create_dir_all(parent)?;
    }

    let tmp_path = parent.join(format!(
        ".{}.tmp",
        path.file_name().unwrap_or_default().to_string_lossy()
    ));

    if let Err(e) = write_then_rename(&tmp_path, path, data) {
        let _ = fs::remove_file(&tmp_path);
        return Err(e.into());
    }

    Ok(())
}

fn write_then_rename(tmp_path: &Path, path: &Path, data: &[u8]) -> std::io::Result<()> {
    use std::io::Write;

    let mut file = fs::File::create(tmp_path)?;
    file.write_all(data)?;
    file.sync_all()?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(tmp_path, fs::Permissions::from_mode(0o600))?;
    }

    fs::rename(tmp_path, path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn write_atomic_replaces_contents_and_cleans_up() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("vault.dat");

        write_atomic(&path, b"first").unwrap();
        write_atomic(&path, b"second").unwrap();

        assert_eq!(fs::read(&path).unwrap(), b"second");
        assert!(!dir.path().join(".vault.dat.tmp").exists());
    }

    #[test]
    fn write_atomic_creates_missing_parent() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested/dir/vault.dat");

        write_atomic(&path, b"data").unwrap();
        assert!(path.exists());
    }

    #[cfg(unix)]
    #[test]
    fn saved_vault_has_restrictive_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let file = VaultFile::new(dir.path().join("vault.dat"));
        file.save(&Vault::new(), "Password1!").unwrap();

        let mode = fs::metadata(file.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn blob_layout_is_nonce_then_ciphertext() {
        let dir = TempDir::new().unwrap();
        let file = VaultFile::new(dir.path().join("vault.dat"));

        let vault = Vault::new();
        file.save(&vault, "Password1!").unwrap();

        // "{}" is 2 bytes of plaintext.
        let blob = fs::read(file.path()).unwrap();
        assert_eq!(blob.len(), crate::crypto::NONCE_LEN + 2 + 16);
    }
}
