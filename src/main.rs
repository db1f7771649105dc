use clap::Parser;
use vaultkeep::cli::commands;
use vaultkeep::cli::{Cli, Commands, Context};

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(&cli) {
        vaultkeep::cli::output::error(&e.to_string());
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> vaultkeep::errors::Result<()> {
    // Completions need neither config nor audit log.
    if let Commands::Completions { ref shell } = cli.command {
        return commands::completions::execute(shell);
    }

    let ctx = Context::load(cli)?;

    match cli.command {
        Commands::Init => commands::init::execute(&ctx),
        Commands::Add {
            ref name,
            ref value,
        } => commands::add::execute(&ctx, name, value.as_deref()),
        Commands::Get { ref name, copy } => commands::get::execute(&ctx, name, copy),
        Commands::Update {
            ref name,
            ref value,
        } => commands::update::execute(&ctx, name, value.as_deref()),
        Commands::Delete { ref name, force } => commands::delete::execute(&ctx, name, force),
        Commands::List => commands::list::execute(&ctx),
        Commands::Search { ref pattern, limit } => {
            commands::search::execute(&ctx, pattern, limit)
        }
        Commands::Passwd => commands::passwd::execute(&ctx),
        Commands::Lock { ref file } => commands::lock::execute_lock(&ctx, file),
        Commands::Unlock { ref file } => commands::lock::execute_unlock(&ctx, file),
        Commands::Shell => commands::shell::execute(&ctx),
        Commands::Audit { last, ref since } => {
            commands::audit_cmd::execute(&ctx, last, since.as_deref())
        }
        Commands::Completions { .. } => Ok(()),
    }
}
