//! Encrypt and decrypt arbitrary files with the master password.
//!
//! `lock_file` turns `report.pdf` into `report.pdf.locked` and removes
//! the original; `unlock_file` reverses it.  The `.locked` file uses the
//! same blob layout as the vault file (nonce || ciphertext + tag), so a
//! file locked under an old master password needs that old password to
//! unlock.

use std::fs;
use std::path::{Path, PathBuf};

use zeroize::Zeroize;

use crate::crypto::{decrypt, encrypt, MasterKey};
use crate::errors::{Result, VaultKeepError};
use crate::vault::format::write_atomic;

/// Extension appended to encrypted files.
pub const LOCKED_EXTENSION: &str = "locked";

/// Returns `true` if `path` ends in `.locked`.
pub fn is_locked(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == LOCKED_EXTENSION)
}

/// Encrypt `path` into `<path>.locked` and delete the original.
///
/// Returns the path of the new `.locked` file.
pub fn lock_file(path: &Path, password: &str) -> Result<PathBuf> {
    check_regular_file(path)?;
    if is_locked(path) {
        return Err(VaultKeepError::FileCrypt(format!(
            "{} already has the .{LOCKED_EXTENSION} extension",
            path.display()
        )));
    }

    let mut target = path.as_os_str().to_os_string();
    target.push(".");
    target.push(LOCKED_EXTENSION);
    let target = PathBuf::from(target);
    check_target_free(&target)?;

    let key = MasterKey::from_password(password)?;
    let mut plaintext = fs::read(path)?;
    let blob = encrypt(key.as_bytes(), &plaintext);
    plaintext.zeroize();
    let blob = blob?;

    write_atomic(&target, &blob)?;
    fs::remove_file(path)?;

    Ok(target)
}

/// Decrypt a `.locked` file back to its original name and delete the
/// `.locked` file.
///
/// A wrong password or a damaged file is `WrongPasswordOrCorrupt`; in
/// that case nothing on disk changes.
pub fn unlock_file(path: &Path, password: &str) -> Result<PathBuf> {
    check_regular_file(path)?;
    if !is_locked(path) {
        return Err(VaultKeepError::FileCrypt(format!(
            "{} does not end in .{LOCKED_EXTENSION}",
            path.display()
        )));
    }

    let target = path.with_extension("");
    check_target_free(&target)?;

    let key = MasterKey::from_password(password)?;
    let blob = fs::read(path)?;
    let mut plaintext = decrypt(key.as_bytes(), &blob).map_err(|e| match e {
        VaultKeepError::AuthenticationFailure => VaultKeepError::WrongPasswordOrCorrupt,
        other => other,
    })?;

    let written = write_atomic(&target, &plaintext);
    plaintext.zeroize();
    written?;

    fs::remove_file(path)?;

    Ok(target)
}

/// Neither direction may replace an existing file.
fn check_target_free(target: &Path) -> Result<()> {
    if target.exists() {
        return Err(VaultKeepError::FileCrypt(format!(
            "{} already exists",
            target.display()
        )));
    }
    Ok(())
}

fn check_regular_file(path: &Path) -> Result<()> {
    if !path.exists() {
        return Err(VaultKeepError::FileCrypt(format!(
            "file not found: {}",
            path.display()
        )));
    }
    if path.is_dir() {
        return Err(VaultKeepError::FileCrypt(format!(
            "{} is a directory, not a file",
            path.display()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const PASSWORD: &str = "Master-Pass1";

    #[test]
    fn lock_then_unlock_restores_original() {
        let dir = TempDir::new().unwrap();
        let original = dir.path().join("notes.txt");
        fs::write(&original, b"meeting at noon").unwrap();

        let locked = lock_file(&original, PASSWORD).unwrap();
        assert_eq!(locked, dir.path().join("notes.txt.locked"));
        assert!(!original.exists());
        assert_ne!(fs::read(&locked).unwrap(), b"meeting at noon");

        let restored = unlock_file(&locked, PASSWORD).unwrap();
        assert_eq!(restored, original);
        assert!(!locked.exists());
        assert_eq!(fs::read(&original).unwrap(), b"meeting at noon");
    }

    #[test]
    fn lock_refuses_already_locked_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("data.locked");
        fs::write(&path, b"x").unwrap();

        assert!(matches!(
            lock_file(&path, PASSWORD),
            Err(VaultKeepError::FileCrypt(_))
        ));
        assert!(path.exists());
    }

    #[test]
    fn unlock_requires_locked_extension() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("plain.txt");
        fs::write(&path, b"x").unwrap();

        assert!(matches!(
            unlock_file(&path, PASSWORD),
            Err(VaultKeepError::FileCrypt(_))
        ));
    }

    #[test]
    fn unlock_with_wrong_password_keeps_locked_file() {
        let dir = TempDir::new().unwrap();
        let original = dir.path().join("id.txt");
        fs::write(&original, b"secret").unwrap();
        let locked = lock_file(&original, PASSWORD).unwrap();

        let err = unlock_file(&locked, "Other-Pass2").unwrap_err();
        assert!(matches!(err, VaultKeepError::WrongPasswordOrCorrupt));
        assert!(locked.exists());
        assert!(!original.exists());
    }

    #[test]
    fn lock_keeps_existing_locked_file() {
        let dir = TempDir::new().unwrap();
        let original = dir.path().join("notes.txt");
        fs::write(&original, b"FIRST").unwrap();
        let locked = lock_file(&original, PASSWORD).unwrap();

        fs::write(&original, b"SECOND").unwrap();
        let err = lock_file(&original, PASSWORD).unwrap_err();
        assert!(matches!(err, VaultKeepError::FileCrypt(ref m) if m.contains("already exists")));
        assert_eq!(fs::read(&original).unwrap(), b"SECOND");

        fs::remove_file(&original).unwrap();
        unlock_file(&locked, PASSWORD).unwrap();
        assert_eq!(fs::read(&original).unwrap(), b"FIRST");
    }

    #[test]
    fn unlock_keeps_existing_plain_file() {
        let dir = TempDir::new().unwrap();
        let original = dir.path().join("notes.txt");
        fs::write(&original, b"OLD").unwrap();
        let locked = lock_file(&original, PASSWORD).unwrap();

        fs::write(&original, b"NEWER EDITS").unwrap();
        let err = unlock_file(&locked, PASSWORD).unwrap_err();
        assert!(matches!(err, VaultKeepError::FileCrypt(ref m) if m.contains("already exists")));
        assert_eq!(fs::read(&original).unwrap(), b"NEWER EDITS");
        assert!(locked.exists());
    }

    #[test]
    fn missing_file_and_directory_are_rejected() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            lock_file(&dir.path().join("ghost.txt"), PASSWORD),
            Err(VaultKeepError::FileCrypt(_))
        ));
        assert!(matches!(
            lock_file(dir.path(), PASSWORD),
            Err(VaultKeepError::FileCrypt(_))
        ));
    }
}
