//! `cerbero setup`: create a new vault (salt + empty encrypted store).

use crate::cli::output;
use crate::cli::{load_settings, open_session, prompt_new_password, Cli};
use crate::errors::Result;
use crate::vault::{Prompter, VaultSession};

/// Execute the `setup` command.
pub fn execute(cli: &Cli, prompter: &mut dyn Prompter) -> Result<()> {
    let settings = load_settings(cli)?;
    let mut session = open_session(&settings)?;
    run(&mut session, prompter)?;
    Ok(())
}

/// Run setup on `session`.  Returns `false` if the user kept the old vault.
///
/// The overwrite question comes before the password prompt so a user
/// who declines is not asked for a password first.
pub fn run(session: &mut VaultSession, prompter: &mut dyn Prompter) -> Result<bool> {
    let overwrite = session.file().exists_any();
    if overwrite
        && !prompter.confirm(&format!(
            "A vault already exists at {}. Overwrite it? Every stored credential will be lost",
            session.file().vault_path().display()
        ))?
    {
        output::info("Setup cancelled.");
        return Ok(false);
    }

    let password = prompt_new_password()?;
    session.setup(&password, overwrite)?;

    let file = session.file();
    output::success("Vault created.");
    output::info(&format!(
        "Files: {}, {}",
        file.vault_path().display(),
        file.salt_path().display()
    ));
    output::tip("Run `cerbero add <site> <user> <password> [label]` to add a credential.");
    Ok(true)
}
