//! CLI module: Clap argument parser, prompts, clipboard, output helpers
//! and command implementations.

pub mod clipboard;
pub mod commands;
pub mod output;
pub mod prompt;

use clap::Parser;
use tracing::debug;
use zeroize::Zeroizing;

use crate::config::Settings;
use crate::errors::{CerberoError, Result};
use crate::vault::session::validate_master_password;
use crate::vault::{VaultFile, VaultSession, MIN_PASSWORD_LEN};

use self::clipboard::SystemClipboard;

/// Environment variable that supplies the master password (scripts/CI).
pub const PASSWORD_ENV: &str = "CERBERO_PASSWORD";

/// Cerbero CLI: local encrypted password manager.
#[derive(Parser)]
#[command(
    name = "cerbero",
    about = "Local encrypted password manager",
    long_about = "Local encrypted password manager.\n\n\
        Run without a subcommand to open the interactive shell.",
    after_help = "Examples:\n  \
        cerbero add gmail juan@work.com pass123 work\n  \
        cerbero add gmail juan@personal.com pass456 personal\n  \
        cerbero get gmail work\n  \
        cerbero get gmail juan@work.com\n  \
        cerbero delete gmail personal",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Directory holding the vault files (overrides .cerbero.toml)
    #[arg(long, global = true, env = "CERBERO_VAULT_DIR")]
    pub vault_dir: Option<String>,

    /// Print passwords instead of copying them to the clipboard
    #[arg(long, global = true)]
    pub no_clipboard: bool,
}

/// All available subcommands.
#[derive(clap::Subcommand)]
pub enum Commands {
    /// Create a new vault (asks before replacing an existing one)
    Setup,

    /// Add a credential, or update the password of an existing one
    Add {
        /// Site the credential belongs to (e.g. gmail)
        site: String,
        /// Username for the site
        username: String,
        /// Password to store
        password: String,
        /// Optional account label to tell several accounts apart
        label: Option<String>,
    },

    /// Retrieve a credential and copy its password to the clipboard
    Get {
        /// Site to look up
        site: String,
        /// Username or account label, when the site has several accounts
        identifier: Option<String>,
        /// Print the password instead of copying it
        #[arg(long)]
        show: bool,
    },

    /// List all stored sites and accounts
    List,

    /// Delete a credential
    Delete {
        /// Site to delete from
        site: String,
        /// Username or account label, when the site has several accounts
        identifier: Option<String>,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        force: bool,
    },

    /// Open the interactive shell (default when no subcommand is given)
    Shell,
}

// ---------------------------------------------------------------------------
// Shared helpers used by multiple commands
// ---------------------------------------------------------------------------

/// Load `.cerbero.toml` from the working directory and apply CLI overrides.
pub fn load_settings(cli: &Cli) -> Result<Settings> {
    let cwd = std::env::current_dir()?;
    let mut settings = Settings::load(&cwd)?;

    if let Some(dir) = &cli.vault_dir {
        settings.vault_dir = dir.clone();
    }
    if cli.no_clipboard {
        settings.clipboard = false;
    }
    Ok(settings)
}

/// Build a (still locked) session over the configured vault files.
pub fn open_session(settings: &Settings) -> Result<VaultSession> {
    let cwd = std::env::current_dir()?;
    Ok(VaultSession::open(VaultFile::from_settings(settings, &cwd)))
}

/// Prompt for the master password and unlock `session`.
pub fn unlock_session(session: &mut VaultSession) -> Result<()> {
    ensure_configured(session)?;
    let password = prompt_password()?;
    session.unlock(&password)
}

/// Open and unlock the vault in one step (used by one-shot commands).
pub fn unlocked_session(settings: &Settings) -> Result<VaultSession> {
    let mut session = open_session(settings)?;
    unlock_session(&mut session)?;
    Ok(session)
}

/// Fail with `NotConfigured` before asking for a password we can't use.
pub fn ensure_configured(session: &VaultSession) -> Result<()> {
    let file = session.file();
    if !file.salt_path().exists() {
        return Err(CerberoError::NotConfigured(file.salt_path().to_path_buf()));
    }
    if !file.vault_path().exists() {
        return Err(CerberoError::NotConfigured(file.vault_path().to_path_buf()));
    }
    Ok(())
}

/// Open the system clipboard if the settings allow it.
///
/// Returns `None` when disabled or unavailable (headless sessions).
pub fn open_clipboard(settings: &Settings) -> Option<SystemClipboard> {
    if !settings.clipboard {
        return None;
    }
    match SystemClipboard::new() {
        Ok(cb) => Some(cb),
        Err(e) => {
            debug!(error = %e, "clipboard unavailable");
            None
        }
    }
}

/// Get the master password, trying in order:
/// 1. `CERBERO_PASSWORD` env var (scripts/CI)
/// 2. Interactive prompt without echo
///
/// Returns `Zeroizing<String>` so the password is wiped from memory on drop.
pub fn prompt_password() -> Result<Zeroizing<String>> {
    if let Some(pw) = password_from_env() {
        return Ok(pw);
    }

    let pw = dialoguer::Password::new()
        .with_prompt("Enter master password")
        .interact()
        .map_err(|e| CerberoError::Prompt(format!("password prompt: {e}")))?;
    Ok(Zeroizing::new(pw))
}

/// Prompt for a new master password with confirmation (used by `setup`).
///
/// Also respects `CERBERO_PASSWORD` for scripted usage.
/// Enforces the minimum password length.
pub fn prompt_new_password() -> Result<Zeroizing<String>> {
    if let Some(pw) = password_from_env() {
        validate_master_password(&pw)?;
        return Ok(pw);
    }

    loop {
        let password = Zeroizing::new(
            dialoguer::Password::new()
                .with_prompt("Create your master password")
                .with_confirmation(
                    "Confirm your master password",
                    "Passwords do not match, try again",
                )
                .interact()
                .map_err(|e| CerberoError::Prompt(format!("password prompt: {e}")))?,
        );

        if validate_master_password(&password).is_err() {
            output::warning(&format!(
                "Password must be at least {MIN_PASSWORD_LEN} characters. Try again."
            ));
            continue;
        }

        return Ok(password);
    }
}

/// `true` when the master password comes from the environment, so
/// retrying an unlock would just repeat the same mistake.
pub fn password_is_scripted() -> bool {
    password_from_env().is_some()
}

fn password_from_env() -> Option<Zeroizing<String>> {
    match std::env::var(PASSWORD_ENV) {
        Ok(pw) if !pw.is_empty() => Some(Zeroizing::new(pw)),
        _ => None,
    }
}
