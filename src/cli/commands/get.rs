//! `vaultkeep get` — show or copy a single secret's value.

use crate::cli::output;
use crate::cli::Context;
use crate::errors::{Result, VaultKeepError};

/// Execute the `get` command.
pub fn execute(ctx: &Context, name: &str, copy: bool) -> Result<()> {
    let session = ctx.open_session()?;
    let vault = session.vault();

    let value = match vault.get(name) {
        Ok(v) => v,
        Err(e) => {
            let suggestions = vault.search(name, 3);
            if !suggestions.is_empty() {
                output::tip(&format!("Did you mean: {}?", suggestions.join(", ")));
            }
            return Err(e);
        }
    };

    if copy {
        let mut clipboard = arboard::Clipboard::new()
            .map_err(|e| VaultKeepError::CommandFailed(format!("clipboard unavailable: {e}")))?;
        clipboard
            .set_text(value.to_string())
            .map_err(|e| VaultKeepError::CommandFailed(format!("clipboard write: {e}")))?;
        output::success(&format!("Secret '{name}' copied to the clipboard"));
    } else {
        println!("{value}");
    }

    Ok(())
}
