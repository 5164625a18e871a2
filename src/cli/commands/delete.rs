//! `cerbero delete`: remove a credential from the vault.

use crate::cli::output;
use crate::cli::{load_settings, unlocked_session, Cli};
use crate::errors::Result;
use crate::vault::{Prompter, VaultSession};

/// Execute the `delete` command.
pub fn execute(
    cli: &Cli,
    prompter: &mut dyn Prompter,
    site: &str,
    identifier: Option<&str>,
    force: bool,
) -> Result<()> {
    let settings = load_settings(cli)?;
    let mut session = unlocked_session(&settings)?;
    run(&mut session, prompter, site, identifier, force)
}

/// Resolve, confirm (unless `force`) and delete.
pub fn run(
    session: &mut VaultSession,
    prompter: &mut dyn Prompter,
    site: &str,
    identifier: Option<&str>,
    force: bool,
) -> Result<()> {
    match session.delete(site, identifier, prompter, force)? {
        Some(removed) => output::success(&format!(
            "Deleted credential '{}' from '{site}'.",
            removed.display_name()
        )),
        None => output::info("Cancelled."),
    }
    Ok(())
}
