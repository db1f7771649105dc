//! `vaultkeep lock` / `vaultkeep unlock` — encrypt arbitrary files with
//! the master password.
//!
//! The vault is unlocked first so only the current master password can
//! be used to lock or unlock files.

use std::path::Path;

use crate::audit::AuditKind;
use crate::cli::output;
use crate::cli::Context;
use crate::errors::Result;
use crate::files;

/// Execute the `lock` command.
pub fn execute_lock(ctx: &Context, file: &Path) -> Result<()> {
    let session = ctx.open_session()?;
    lock_with(&session, file)
}

/// Execute the `unlock` command.
pub fn execute_unlock(ctx: &Context, file: &Path) -> Result<()> {
    let session = ctx.open_session()?;
    unlock_with(&session, file)
}

pub(crate) fn lock_with(session: &crate::session::Session, file: &Path) -> Result<()> {
    let name = display_name(file);
    match files::lock_file(file, session.password()) {
        Ok(locked) => {
            session.audit(AuditKind::FileLocked, &format!("file '{name}' locked"));
            output::success("Encrypted. Original file removed.");
            output::info(&format!("New file: {}", locked.display()));
            Ok(())
        }
        Err(e) => {
            session.audit(AuditKind::OperationFailed, &format!("lock '{name}' failed: {e}"));
            Err(e)
        }
    }
}

pub(crate) fn unlock_with(session: &crate::session::Session, file: &Path) -> Result<()> {
    let name = display_name(file);
    match files::unlock_file(file, session.password()) {
        Ok(restored) => {
            session.audit(AuditKind::FileUnlocked, &format!("file '{name}' unlocked"));
            output::success("Decrypted. Encrypted copy removed.");
            output::info(&format!("Restored file: {}", restored.display()));
            Ok(())
        }
        Err(e) => {
            session.audit(AuditKind::OperationFailed, &format!("unlock '{name}' failed: {e}"));
            Err(e)
        }
    }
}

/// File name only; full paths stay out of the audit log.
fn display_name(file: &Path) -> String {
    file.file_name()
        .map_or_else(|| file.display().to_string(), |n| n.to_string_lossy().into_owned())
}
