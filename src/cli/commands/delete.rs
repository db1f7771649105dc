//! `vaultkeep delete` — remove a secret from the vault.

use dialoguer::Confirm;

use crate::audit::AuditKind;
use crate::cli::output;
use crate::cli::Context;
use crate::errors::{Result, VaultKeepError};

/// Execute the `delete` command.
pub fn execute(ctx: &Context, name: &str, force: bool) -> Result<()> {
    let mut session = ctx.open_session()?;

    // Check first so the user is not asked to confirm a no-op.
    if !session.vault().exists(name) {
        return Err(VaultKeepError::SecretNotFound(name.to_string()));
    }

    // Unless --force is set, ask for confirmation before deleting.
    if !force {
        let confirmed = Confirm::new()
            .with_prompt(format!("Delete secret '{name}'?"))
            .default(false)
            .interact()
            .map_err(|e| VaultKeepError::CommandFailed(format!("confirm prompt: {e}")))?;

        if !confirmed {
            output::info("Cancelled.");
            return Ok(());
        }
    }

    session.vault_mut().delete(name)?;
    session.save()?;

    session.audit(AuditKind::SecretDeleted, &format!("secret '{name}' deleted"));
    output::success(&format!("Deleted secret '{name}'"));

    Ok(())
}
