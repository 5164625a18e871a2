//! Interfaces to the interactive world: prompts and the clipboard.
//!
//! The session calls a `Prompter` only at its decision points
//! (overwrite a credential, overwrite a configuration, pick one of
//! several credentials, confirm a deletion).  A declined confirmation or
//! a cancelled selection leaves the vault untouched.

use std::collections::VecDeque;

use tracing::warn;

use crate::errors::Result;

use super::credential::Credential;

/// Yes/no confirmations and numbered selections.
pub trait Prompter {
    /// Ask a yes/no question.  `false` means "decline".
    fn confirm(&mut self, message: &str) -> Result<bool>;

    /// Ask the user to pick one of `options` (0-based).  `None` means "cancel".
    fn select(&mut self, message: &str, options: &[String]) -> Result<Option<usize>>;
}

/// Destination for a revealed password.
pub trait Clipboard {
    fn copy(&mut self, text: &str) -> Result<()>;
}

/// How a password was handed to the user.
#[derive(Debug, PartialEq, Eq)]
pub enum Reveal {
    /// The password is on the clipboard.
    Copied,
    /// No clipboard; the caller must print this password.
    Shown(String),
}

/// Copy the credential's password to `clipboard`, falling back to
/// returning it for display when the clipboard is missing or fails.
pub fn reveal(credential: &Credential, clipboard: Option<&mut dyn Clipboard>) -> Reveal {
    match clipboard {
        Some(cb) => match cb.copy(&credential.password) {
            Ok(()) => Reveal::Copied,
            Err(e) => {
                warn!(error = %e, "clipboard copy failed; showing password instead");
                Reveal::Shown(credential.password.clone())
            }
        },
        None => Reveal::Shown(credential.password.clone()),
    }
}

/// A `Prompter` that answers from pre-recorded replies.
///
/// Used for non-interactive runs and tests.  Once a queue is exhausted,
/// confirmations decline and selections cancel.
#[derive(Debug, Default)]
pub struct ScriptedPrompter {
    confirms: VecDeque<bool>,
    selects: VecDeque<Option<usize>>,
    prompts: usize,
    messages: Vec<String>,
    last_options: Vec<String>,
}

impl ScriptedPrompter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an answer for the next `confirm`.
    pub fn with_confirm(mut self, answer: bool) -> Self {
        self.confirms.push_back(answer);
        self
    }

    /// Queue an answer for the next `select`.
    pub fn with_select(mut self, answer: Option<usize>) -> Self {
        self.selects.push_back(answer);
        self
    }

    /// Number of questions asked so far.
    pub fn prompts(&self) -> usize {
        self.prompts
    }

    /// Every message shown, in order.
    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    /// Options offered by the most recent `select`.
    pub fn last_options(&self) -> &[String] {
        &self.last_options
    }
}

impl Prompter for ScriptedPrompter {
    fn confirm(&mut self, message: &str) -> Result<bool> {
        self.prompts += 1;
        self.messages.push(message.to_string());
        Ok(self.confirms.pop_front().unwrap_or(false))
    }

    fn select(&mut self, message: &str, options: &[String]) -> Result<Option<usize>> {
        self.prompts += 1;
        self.messages.push(message.to_string());
        self.last_options = options.to_vec();
        Ok(self.selects.pop_front().flatten())
    }
}
