//! `cerbero list`: show every site and account (never passwords).

use crate::cli::output;
use crate::cli::{load_settings, unlocked_session, Cli};
use crate::errors::Result;
use crate::vault::VaultSession;

/// Execute the `list` command.
pub fn execute(cli: &Cli) -> Result<()> {
    let settings = load_settings(cli)?;
    let session = unlocked_session(&settings)?;
    run(&session)
}

pub fn run(session: &VaultSession) -> Result<()> {
    let sites = session.list()?;
    output::print_credentials_table(&sites);
    Ok(())
}
