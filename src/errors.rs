use std::path::PathBuf;
use thiserror::Error;

/// All errors that can occur in Cerbero.
#[derive(Debug, Error)]
pub enum CerberoError {
    // --- Vault state errors ---
    #[error("Vault not configured: {0} is missing (run `cerbero setup` first)")]
    NotConfigured(PathBuf),

    #[error("A vault already exists at {0}")]
    AlreadyExists(PathBuf),

    #[error("Incorrect password or corrupted vault")]
    AuthenticationFailure,

    #[error("Vault is locked; unlock it with the master password first")]
    VaultLocked,

    // --- Lookup errors ---
    #[error("No credential found for {0}")]
    NotFound(String),

    // --- Input errors ---
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    // --- Crypto errors ---
    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    // --- Serialization errors ---
    #[error("Serialization error: {0}")]
    Serialization(String),

    // --- Config errors ---
    #[error("Config file error: {0}")]
    Config(String),

    // --- Collaborator errors ---
    #[error("Prompt failed: {0}")]
    Prompt(String),

    #[error("Clipboard unavailable: {0}")]
    Clipboard(String),

    // --- IO errors ---
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Cerbero results.
pub type Result<T> = std::result::Result<T, CerberoError>;
