//! `vaultkeep update` — change the value of an existing secret.

use crate::audit::AuditKind;
use crate::cli::commands::add::read_value;
use crate::cli::output;
use crate::cli::Context;
use crate::errors::{Result, VaultKeepError};

/// Execute the `update` command.
pub fn execute(ctx: &Context, name: &str, value: Option<&str>) -> Result<()> {
    let mut session = ctx.open_session()?;

    // Fail before asking for a value the vault has no slot for.
    if !session.vault().exists(name) {
        let suggestions = session.vault().search(name, 3);
        if !suggestions.is_empty() {
            output::tip(&format!("Did you mean: {}?", suggestions.join(", ")));
        }
        return Err(VaultKeepError::SecretNotFound(name.to_string()));
    }

    let new_value = read_value(name, value)?;
    session.vault_mut().update(name, &new_value)?;
    session.save()?;

    session.audit(AuditKind::SecretUpdated, &format!("secret '{name}' updated"));
    output::success(&format!("Secret '{name}' updated"));

    Ok(())
}
