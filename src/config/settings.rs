use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::errors::{CerberoError, Result};
use crate::vault::file::{SALT_FILE, VAULT_FILE};

/// Local configuration, loaded from `.cerbero.toml`.
///
/// Every field has a sensible default so Cerbero works out-of-the-box
/// without any config file at all.  The KDF iteration count is not
/// configurable: every vault uses the same one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Directory (relative to the working directory) holding the vault files.
    #[serde(default = "default_vault_dir")]
    pub vault_dir: String,

    /// File name of the raw salt.
    #[serde(default = "default_salt_file")]
    pub salt_file: String,

    /// File name of the encrypted vault blob.
    #[serde(default = "default_vault_file")]
    pub vault_file: String,

    /// Copy revealed passwords to the clipboard instead of printing them.
    #[serde(default = "default_clipboard")]
    pub clipboard: bool,
}

// ── Serde default helpers ────────────────────────────────────────────

fn default_vault_dir() -> String {
    ".".to_string()
}

fn default_salt_file() -> String {
    SALT_FILE.to_string()
}

fn default_vault_file() -> String {
    VAULT_FILE.to_string()
}

fn default_clipboard() -> bool {
    true
}

// ── Implementation ───────────────────────────────────────────────────

impl Default for Settings {
    fn default() -> Self {
        Self {
            vault_dir: default_vault_dir(),
            salt_file: default_salt_file(),
            vault_file: default_vault_file(),
            clipboard: default_clipboard(),
        }
    }
}

impl Settings {
    /// Name of the config file we look for in the working directory.
    pub const FILE_NAME: &'static str = ".cerbero.toml";

    /// Load settings from `<dir>/.cerbero.toml`.
    ///
    /// If the file does not exist, defaults are returned.
    /// If the file exists but cannot be parsed, an error is returned.
    pub fn load(dir: &Path) -> Result<Self> {
        let config_path = dir.join(Self::FILE_NAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&config_path)?;

        let settings: Settings = toml::from_str(&contents).map_err(|e| {
            CerberoError::Config(format!("Failed to parse {}: {e}", config_path.display()))
        })?;

        if settings.salt_file == settings.vault_file {
            return Err(CerberoError::Config(format!(
                "salt_file and vault_file must differ (both are '{}')",
                settings.salt_file
            )));
        }

        Ok(settings)
    }

    /// Directory holding the vault files, resolved against `base_dir`.
    pub fn vault_dir(&self, base_dir: &Path) -> PathBuf {
        base_dir.join(&self.vault_dir)
    }
}

// ── Tests ────────────────────────────────────────────────────────────
