//! `vaultkeep search` — find secrets by approximate name.

use crate::cli::output;
use crate::cli::Context;
use crate::errors::Result;

/// Execute the `search` command.
pub fn execute(ctx: &Context, pattern: &str, limit: Option<usize>) -> Result<()> {
    let session = ctx.open_session()?;
    let max_results = limit.unwrap_or(ctx.settings.max_search_results);

    let hits = session.vault().search(pattern, max_results);
    output::print_search_results(pattern.trim(), &hits);

    Ok(())
}
