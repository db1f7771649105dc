//! `vaultkeep list` — display all secret names in a table.

use crate::cli::output;
use crate::cli::Context;
use crate::errors::Result;

/// Execute the `list` command.
pub fn execute(ctx: &Context) -> Result<()> {
    let session = ctx.open_session()?;
    let names = session.vault().list_names();

    output::info(&format!("{} secret(s)", names.len()));
    output::print_names_table(&names);

    Ok(())
}
