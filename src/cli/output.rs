//! Colored terminal output helpers.
//!
//! All user-facing output goes through these functions so we get
//! consistent styling across every command.

use comfy_table::{ContentArrangement, Table};
use console::style;

/// Print a green success message: "check_mark {msg}"
pub fn success(msg: &str) {
    println!("{} {}", style("\u{2713}").green().bold(), msg);
}

/// Print a red error message: "x_mark {msg}"
pub fn error(msg: &str) {
    eprintln!("{} {}", style("\u{2717}").red().bold(), msg);
}

/// Print a yellow warning: "warning_sign {msg}"
pub fn warning(msg: &str) {
    eprintln!("{} {}", style("\u{26a0}").yellow().bold(), msg);
}

/// Print a blue info message: "info_sign {msg}"
pub fn info(msg: &str) {
    println!("{} {}", style("\u{2139}").blue().bold(), msg);
}

/// Print a dim tip/hint: "arrow {msg}"
pub fn tip(msg: &str) {
    println!("{} {}", style("\u{2192}").dim(), style(msg).dim());
}

/// Print a table of secret names.
pub fn print_names_table(names: &[&str]) {
    if names.is_empty() {
        info("No secrets in this vault yet.");
        tip("Run `vaultkeep add <NAME>` to add your first secret.");
        return;
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["#", "Name"]);

    for (i, name) in names.iter().enumerate() {
        table.add_row(vec![(i + 1).to_string(), (*name).to_string()]);
    }

    println!("{table}");
}

/// Print ranked search hits, best first.
pub fn print_search_results(pattern: &str, hits: &[&str]) {
    if hits.is_empty() {
        info(&format!("No secrets match '{pattern}'."));
        return;
    }

    info(&format!("{} match(es) for '{pattern}':", hits.len()));
    for (i, name) in hits.iter().enumerate() {
        println!("  {}. {}", style(i + 1).dim(), style(name).cyan());
    }
}
