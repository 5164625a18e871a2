//! Vault module: the encrypted credential store.
//!
//! This module provides:
//! - `Credential` records (`credential`)
//! - The in-memory site -> credentials map (`store`)
//! - Salt and blob files on disk (`file`)
//! - Credential disambiguation (`resolver`)
//! - Prompt and clipboard interfaces (`collab`)
//! - The locked/unlocked session tying it all together (`session`)

pub mod collab;
pub mod credential;
pub mod file;
pub mod resolver;
pub mod session;
pub mod store;

// Re-export the most commonly used items.
pub use collab::{reveal, Clipboard, Prompter, Reveal, ScriptedPrompter};
pub use credential::{Credential, CredentialSummary};
pub use file::VaultFile;
pub use resolver::{choose, resolve, Resolution};
pub use session::{SessionState, VaultSession, MIN_PASSWORD_LEN};
pub use store::{AddOutcome, VaultStore};
