//! `vaultkeep shell` — interactive menu over an unlocked vault.
//!
//! The main menu offers two modules, the secret manager and the file
//! locker.  Both work on the same `Session`, so a password changed in
//! the secret manager is the one the file locker uses afterwards.

use std::path::PathBuf;

use dialoguer::{Input, Select};
use zeroize::Zeroizing;

use crate::audit::AuditKind;
use crate::cli::commands::{lock, passwd};
use crate::cli::output;
use crate::cli::Context;
use crate::errors::{Result, VaultKeepError};
use crate::session::Session;

/// A top-level menu entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Module {
    Vault,
    Files,
}

impl Module {
    pub const ALL: [Module; 2] = [Module::Vault, Module::Files];

    pub fn name(self) -> &'static str {
        match self {
            Self::Vault => "Secret manager",
            Self::Files => "File locker",
        }
    }

    /// Run the module's menu until the user backs out.
    pub fn run(self, session: &mut Session, max_results: usize) -> Result<()> {
        match self {
            Self::Vault => run_vault(session, max_results),
            Self::Files => run_files(session),
        }
    }
}

/// Entries of the secret manager menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum VaultAction {
    Add,
    View,
    Search,
    List,
    Update,
    Delete,
    ChangePassword,
    SaveAndReturn,
}

impl VaultAction {
    fn label(self) -> &'static str {
        match self {
            Self::Add => "Add secret",
            Self::View => "View secret",
            Self::Search => "Search secrets",
            Self::List => "List secrets",
            Self::Update => "Update secret",
            Self::Delete => "Delete secret",
            Self::ChangePassword => "Change master password",
            Self::SaveAndReturn => "Save and return",
        }
    }

    /// Actions that make sense for the current vault.  An empty vault
    /// has nothing to view, list or delete.
    fn available(vault_is_empty: bool) -> &'static [VaultAction] {
        if vault_is_empty {
            &[Self::Add, Self::ChangePassword, Self::SaveAndReturn]
        } else {
            &[
                Self::Add,
                Self::View,
                Self::Search,
                Self::List,
                Self::Update,
                Self::Delete,
                Self::ChangePassword,
                Self::SaveAndReturn,
            ]
        }
    }
}

/// Execute the `shell` command.
pub fn execute(ctx: &Context) -> Result<()> {
    let mut session = ctx.open_session()?;
    output::success("Access granted.");

    let mut labels: Vec<&str> = Module::ALL.iter().map(|m| m.name()).collect();
    labels.push("Exit");

    loop {
        let choice = select("Main menu", &labels)?;
        let Some(module) = Module::ALL.get(choice).copied() else {
            session.audit(AuditKind::SessionClosed, "interactive session closed by the user");
            output::info("Goodbye!");
            return Ok(());
        };

        let password_before = Zeroizing::new(session.password().to_string());
        if let Err(e) = module.run(&mut session, ctx.settings.max_search_results) {
            output::error(&e.to_string());
        }
        if session.password() != password_before.as_str() {
            output::info("The file locker now uses the new master password.");
        }
    }
}

fn run_vault(session: &mut Session, max_results: usize) -> Result<()> {
    loop {
        let actions = VaultAction::available(session.vault().is_empty());
        let labels: Vec<&str> = actions.iter().map(|a| a.label()).collect();
        let action = actions[select("Secret manager", &labels)?];

        if action == VaultAction::SaveAndReturn {
            session.save()?;
            output::success("Saved.");
            return Ok(());
        }

        // A failed action is reported and the menu continues.
        if let Err(e) = run_vault_action(session, action, max_results) {
            output::error(&e.to_string());
        }
    }
}

fn run_vault_action(session: &mut Session, action: VaultAction, max_results: usize) -> Result<()> {
    match action {
        VaultAction::Add => {
            let name = ask("Secret name")?;
            let value = ask_hidden(&format!("Value for {name}"))?;
            session.vault_mut().add(&name, &value)?;
            session.audit(AuditKind::SecretAdded, &format!("secret '{name}' added"));
            output::success(&format!("Secret '{name}' added (not saved yet)."));
        }
        VaultAction::View => {
            let name = ask("Secret name")?;
            match session.vault().get(&name) {
                Ok(value) => println!("Value: {value}"),
                Err(e) => {
                    let hits = session.vault().search(&name, max_results);
                    if !hits.is_empty() {
                        output::tip(&format!("Did you mean: {}?", hits.join(", ")));
                    }
                    return Err(e);
                }
            }
        }
        VaultAction::Search => {
            let pattern = ask("Search for")?;
            let hits = session.vault().search(&pattern, max_results);
            output::print_search_results(&pattern, &hits);
        }
        VaultAction::List => {
            output::print_names_table(&session.vault().list_names());
        }
        VaultAction::Update => {
            let name = ask("Secret name")?;
            if !session.vault().exists(&name) {
                return Err(VaultKeepError::SecretNotFound(name));
            }
            let value = ask_hidden(&format!("New value for {name}"))?;
            session.vault_mut().update(&name, &value)?;
            session.audit(AuditKind::SecretUpdated, &format!("secret '{name}' updated"));
            output::success(&format!("Secret '{name}' updated (not saved yet)."));
        }
        VaultAction::Delete => {
            let name = ask("Secret name")?;
            session.vault_mut().delete(&name)?;
            session.audit(AuditKind::SecretDeleted, &format!("secret '{name}' deleted"));
            output::success(&format!("Secret '{name}' deleted (not saved yet)."));
        }
        VaultAction::ChangePassword => passwd::run(session)?,
        VaultAction::SaveAndReturn => {}
    }
    Ok(())
}

fn run_files(session: &mut Session) -> Result<()> {
    const LABELS: [&str; 3] = ["Lock a file", "Unlock a file", "Back"];

    loop {
        let choice = select("File locker", &LABELS)?;
        if choice == 2 {
            return Ok(());
        }

        let path = PathBuf::from(strip_quotes(&ask("File path")?));
        let result = if choice == 0 {
            lock::lock_with(session, &path)
        } else {
            lock::unlock_with(session, &path)
        };
        if let Err(e) = result {
            output::error(&e.to_string());
        }
    }
}

// ---------------------------------------------------------------------------
// Prompt helpers
// ---------------------------------------------------------------------------

fn select(title: &str, items: &[&str]) -> Result<usize> {
    Select::new()
        .with_prompt(title)
        .items(items)
        .default(0)
        .interact()
        .map_err(|e| VaultKeepError::CommandFailed(format!("menu: {e}")))
}

fn ask(prompt: &str) -> Result<String> {
    let answer: String = Input::new()
        .with_prompt(prompt)
        .interact_text()
        .map_err(|e| VaultKeepError::CommandFailed(format!("input prompt: {e}")))?;
    Ok(answer.trim().to_string())
}

fn ask_hidden(prompt: &str) -> Result<Zeroizing<String>> {
    let answer = dialoguer::Password::new()
        .with_prompt(prompt)
        .allow_empty_password(true)
        .interact()
        .map_err(|e| VaultKeepError::CommandFailed(format!("input prompt: {e}")))?;
    Ok(Zeroizing::new(answer))
}

/// Paths pasted from a file manager often arrive quoted.
fn strip_quotes(input: &str) -> &str {
    let trimmed = input.trim();
    for quote in ['"', '\''] {
        if let Some(inner) = trimmed
            .strip_prefix(quote)
            .and_then(|s| s.strip_suffix(quote))
        {
            return inner;
        }
    }
    trimmed
}
