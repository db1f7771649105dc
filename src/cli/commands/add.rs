//! `vaultkeep add` — add a secret, overwriting any existing value.

use std::io::{self, IsTerminal, Read};

use zeroize::Zeroizing;

use crate::audit::AuditKind;
use crate::cli::output;
use crate::cli::Context;
use crate::errors::{Result, VaultKeepError};

/// Execute the `add` command.
pub fn execute(ctx: &Context, name: &str, value: Option<&str>) -> Result<()> {
    let secret_value = read_value(name, value)?;

    let mut session = ctx.open_session()?;
    let existed = session.vault().exists(name);
    session.vault_mut().add(name, &secret_value)?;
    session.save()?;

    let total = session.vault().len();
    if existed {
        session.audit(AuditKind::SecretUpdated, &format!("secret '{name}' overwritten"));
        output::success(&format!("Secret '{name}' overwritten ({total} total)"));
    } else {
        session.audit(AuditKind::SecretAdded, &format!("secret '{name}' added"));
        output::success(&format!("Secret '{name}' added ({total} total)"));
    }

    Ok(())
}

/// Determine a secret value from one of three sources: the command
/// line, piped stdin, or a hidden interactive prompt.
pub(crate) fn read_value(name: &str, value: Option<&str>) -> Result<Zeroizing<String>> {
    if let Some(v) = value {
        output::warning("Value provided on command line — it may appear in shell history.");
        return Ok(Zeroizing::new(v.to_string()));
    }

    if !io::stdin().is_terminal() {
        let mut buf = Zeroizing::new(String::new());
        io::stdin().read_to_string(&mut buf)?;
        let trimmed = buf.trim_end_matches(['\r', '\n']).len();
        buf.truncate(trimmed);
        return Ok(buf);
    }

    let v = dialoguer::Password::new()
        .with_prompt(format!("Value for {name}"))
        .allow_empty_password(true)
        .interact()
        .map_err(|e| VaultKeepError::CommandFailed(format!("input prompt: {e}")))?;
    Ok(Zeroizing::new(v))
}
