//! `cerbero add`: store a credential (or update its password).

use crate::cli::output;
use crate::cli::{load_settings, unlocked_session, Cli};
use crate::errors::Result;
use crate::vault::credential::display_name;
use crate::vault::{AddOutcome, Prompter, VaultSession};

/// Execute the `add` command.
pub fn execute(
    cli: &Cli,
    prompter: &mut dyn Prompter,
    site: &str,
    username: &str,
    password: &str,
    label: Option<&str>,
) -> Result<()> {
    output::warning("Password provided on command line; it may appear in shell history.");

    let settings = load_settings(cli)?;
    let mut session = unlocked_session(&settings)?;
    run(&mut session, prompter, site, username, password, label)
}

/// Add the credential to an unlocked session.
pub fn run(
    session: &mut VaultSession,
    prompter: &mut dyn Prompter,
    site: &str,
    username: &str,
    password: &str,
    label: Option<&str>,
) -> Result<()> {
    let who = display_name(username, label);
    match session.add(site, username, password, label, prompter)? {
        Some(AddOutcome::Added) => {
            output::success(&format!("Credential '{who}' added to '{site}'."))
        }
        Some(AddOutcome::Updated) => {
            output::success(&format!("Credential '{who}' updated in '{site}'."))
        }
        None => output::info("Cancelled."),
    }
    Ok(())
}
