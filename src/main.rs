use cerbero::cli::commands;
use cerbero::cli::prompt::TerminalPrompter;
use cerbero::cli::{output, Cli, Commands};
use clap::Parser;
use tracing_subscriber::EnvFilter;

fn main() {
    // CERBERO_LOG=cerbero=debug for verbose output; secrets are never logged.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("CERBERO_LOG")
                .unwrap_or_else(|_| EnvFilter::new("cerbero=warn")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut prompter = TerminalPrompter;

    let result = match cli.command {
        None | Some(Commands::Shell) => commands::shell::execute(&cli, &mut prompter),
        Some(Commands::Setup) => commands::setup::execute(&cli, &mut prompter),
        Some(Commands::Add {
            ref site,
            ref username,
            ref password,
            ref label,
        }) => commands::add::execute(
            &cli,
            &mut prompter,
            site,
            username,
            password,
            label.as_deref(),
        ),
        Some(Commands::Get {
            ref site,
            ref identifier,
            show,
        }) => commands::get::execute(&cli, &mut prompter, site, identifier.as_deref(), show),
        Some(Commands::List) => commands::list::execute(&cli),
        Some(Commands::Delete {
            ref site,
            ref identifier,
            force,
        }) => commands::delete::execute(&cli, &mut prompter, site, identifier.as_deref(), force),
    };

    if let Err(e) = result {
        output::error(&e.to_string());
        std::process::exit(1);
    }
}
