//! `vaultkeep init` — create a new, empty vault.

use crate::audit::AuditKind;
use crate::cli::output;
use crate::cli::{prompt_new_password, Context};
use crate::errors::{Result, VaultKeepError};
use crate::session::Session;

/// Execute the `init` command.
pub fn execute(ctx: &Context) -> Result<()> {
    let file = ctx.vault_file();

    if file.exists_on_disk() {
        output::tip("Use `vaultkeep add` to store secrets in the existing vault.");
        return Err(VaultKeepError::VaultAlreadyExists(ctx.vault_path.clone()));
    }

    let password = match prompt_new_password() {
        Ok(pw) => pw,
        Err(e) => {
            ctx.audit
                .record(AuditKind::OperationFailed, &format!("vault creation cancelled: {e}"));
            return Err(e);
        }
    };

    Session::create(file, password)?;

    output::success(&format!("Vault created at {}", ctx.vault_path.display()));
    output::tip("Run `vaultkeep add <NAME>` to add a secret.");
    output::tip("Run `vaultkeep search <PATTERN>` to find one later.");

    Ok(())
}
