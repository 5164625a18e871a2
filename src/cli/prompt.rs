//! Terminal `Prompter` backed by dialoguer.

use dialoguer::{Confirm, Select};

use crate::errors::{CerberoError, Result};
use crate::vault::Prompter;

/// Asks confirmations and selections on the terminal.
///
/// Confirmations default to "no"; Esc or `q` cancels a selection.
#[derive(Debug, Default)]
pub struct TerminalPrompter;

impl Prompter for TerminalPrompter {
    fn confirm(&mut self, message: &str) -> Result<bool> {
        Confirm::new()
            .with_prompt(message)
            .default(false)
            .interact()
            .map_err(|e| CerberoError::Prompt(format!("confirm prompt: {e}")))
    }

    fn select(&mut self, message: &str, options: &[String]) -> Result<Option<usize>> {
        Select::new()
            .with_prompt(format!("{message} (Esc to cancel)"))
            .items(options)
            .default(0)
            .interact_opt()
            .map_err(|e| CerberoError::Prompt(format!("selection prompt: {e}")))
    }
}
