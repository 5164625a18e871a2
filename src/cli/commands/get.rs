//! `cerbero get`: resolve one credential and hand over its password.

use crate::cli::{clipboard, output};
use crate::cli::{load_settings, open_clipboard, unlocked_session, Cli};
use crate::config::Settings;
use crate::errors::Result;
use crate::vault::{reveal, Clipboard, Prompter, Reveal, VaultSession};

/// Execute the `get` command.
pub fn execute(
    cli: &Cli,
    prompter: &mut dyn Prompter,
    site: &str,
    identifier: Option<&str>,
    show: bool,
) -> Result<()> {
    let settings = load_settings(cli)?;
    let session = unlocked_session(&settings)?;

    let wanted = !show && settings.clipboard;
    let copy = wants_clipboard(show, &settings, clipboard::OUTLIVES_PROCESS);
    let mut system = if copy { open_clipboard(&settings) } else { None };
    run(
        &session,
        prompter,
        system.as_mut().map(|cb| cb as &mut dyn Clipboard),
        site,
        identifier,
    )?;

    if wanted && !copy {
        output::tip(
            "The clipboard does not keep copies after Cerbero exits here; \
             use `cerbero shell` to copy instead.",
        );
    }
    Ok(())
}

/// A one-shot `get` only copies when the copy outlives the process.
fn wants_clipboard(show: bool, settings: &Settings, outlives_process: bool) -> bool {
    !show && settings.clipboard && outlives_process
}

/// Look the credential up and copy (or print) its password.
pub fn run(
    session: &VaultSession,
    prompter: &mut dyn Prompter,
    clipboard: Option<&mut dyn Clipboard>,
    site: &str,
    identifier: Option<&str>,
) -> Result<()> {
    let Some(credential) = session.get(site, identifier, prompter)? else {
        output::info("Cancelled.");
        return Ok(());
    };

    let had_clipboard = clipboard.is_some();
    let revealed = reveal(&credential, clipboard);
    output::print_credential(site, &credential, &revealed);

    if had_clipboard && matches!(revealed, Reveal::Shown(_)) {
        output::warning("Could not copy to the clipboard.");
    }
    Ok(())
}
