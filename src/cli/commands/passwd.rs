//! `vaultkeep passwd` — change the master password.
//!
//! Verifies the current password against the vault file, asks for a
//! compliant new one twice, and re-encrypts the unchanged secrets under
//! it.  The vault file is replaced atomically.

use crate::cli::output;
use crate::cli::{Context, TerminalPrompt};
use crate::errors::Result;
use crate::policy::PASSWORD_REQUIREMENTS;
use crate::session::Session;

/// Execute the `passwd` command.
pub fn execute(ctx: &Context) -> Result<()> {
    let mut session = ctx.open_session()?;
    run(&mut session)
}

/// Run the change-password workflow on an already open session.
pub(crate) fn run(session: &mut Session) -> Result<()> {
    output::info(&format!("{PASSWORD_REQUIREMENTS}\n"));
    output::warning(
        "Files locked with `vaultkeep lock` keep using the old password. \
         Unlock them first or remember the old password.",
    );

    let mut prompt = TerminalPrompt::default();
    if let Err(e) = session.change_master_password(&mut prompt) {
        output::warning("The master password was NOT changed.");
        return Err(e);
    }

    output::success(&format!(
        "Master password changed ({} secrets re-encrypted)",
        session.vault().len()
    ));
    Ok(())
}
