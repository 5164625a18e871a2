//! `cerbero shell`: unlock once, then run commands interactively.
//!
//! This is also what runs when no subcommand is given.  An unconfigured
//! vault is set up first.  Command errors are reported and the loop
//! keeps going; Ctrl-C, Ctrl-D, `exit` and `quit` leave it.

use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use tracing::debug;

use crate::cli::commands::{add, delete, get, list, setup};
use crate::cli::{
    load_settings, open_clipboard, open_session, output, password_is_scripted, unlock_session,
    Cli,
};
use crate::errors::{CerberoError, Result};
use crate::vault::{Clipboard, Prompter, SessionState, VaultSession};

/// Unlock attempts allowed when the password is typed interactively.
const MAX_UNLOCK_ATTEMPTS: usize = 3;

const PROMPT: &str = "cerbero> ";

/// One line of shell input, parsed.
#[derive(Debug, PartialEq, Eq)]
pub enum ShellCommand<'a> {
    Add {
        site: &'a str,
        username: &'a str,
        password: &'a str,
        label: Option<&'a str>,
    },
    Get {
        site: &'a str,
        identifier: Option<&'a str>,
    },
    Delete {
        site: &'a str,
        identifier: Option<&'a str>,
    },
    List,
    Setup,
    Help,
    Exit,
    Empty,
}

/// Parse one input line; the error is the message to show the user.
pub fn parse_line(line: &str) -> std::result::Result<ShellCommand<'_>, String> {
    let words: Vec<&str> = line.split_whitespace().collect();
    let Some((cmd, args)) = words.split_first() else {
        return Ok(ShellCommand::Empty);
    };

    match (cmd.to_lowercase().as_str(), args) {
        ("add", &[site, username, password]) => Ok(ShellCommand::Add {
            site,
            username,
            password,
            label: None,
        }),
        ("add", &[site, username, password, label]) => Ok(ShellCommand::Add {
            site,
            username,
            password,
            label: Some(label),
        }),
        ("add", _) => Err("Usage: add <site> <user> <password> [label]".into()),
        ("get", &[site]) => Ok(ShellCommand::Get {
            site,
            identifier: None,
        }),
        ("get", &[site, id]) => Ok(ShellCommand::Get {
            site,
            identifier: Some(id),
        }),
        ("get", _) => Err("Usage: get <site> [user_or_label]".into()),
        ("delete", &[site]) => Ok(ShellCommand::Delete {
            site,
            identifier: None,
        }),
        ("delete", &[site, id]) => Ok(ShellCommand::Delete {
            site,
            identifier: Some(id),
        }),
        ("delete", _) => Err("Usage: delete <site> [user_or_label]".into()),
        ("list", &[]) => Ok(ShellCommand::List),
        ("setup", &[]) => Ok(ShellCommand::Setup),
        ("help", _) => Ok(ShellCommand::Help),
        ("exit" | "quit", _) => Ok(ShellCommand::Exit),
        (other, _) => Err(format!(
            "Unknown command: {other}. Type 'help' for the list of commands."
        )),
    }
}

/// Execute the `shell` command.
pub fn execute(cli: &Cli, prompter: &mut dyn Prompter) -> Result<()> {
    let settings = load_settings(cli)?;
    let mut session = open_session(&settings)?;

    if session.state() == SessionState::Uninitialized {
        output::info("No vault configured yet. Running initial setup...");
        if !setup::run(&mut session, prompter)? {
            return Ok(());
        }
    } else {
        unlock_with_retries(&mut session)?;
        output::success("Vault unlocked.");
    }

    let mut clipboard = open_clipboard(&settings);
    let mut rl = DefaultEditor::new()
        .map_err(|e| CerberoError::Prompt(format!("failed to initialize readline: {e}")))?;

    output::info("Type 'help' to see the available commands.");

    loop {
        match rl.readline(PROMPT) {
            Ok(line) => {
                // Lines carry passwords (`add`), so they never go into history.
                let command = match parse_line(&line) {
                    Ok(cmd) => cmd,
                    Err(usage) => {
                        output::error(&usage);
                        continue;
                    }
                };
                if command == ShellCommand::Exit {
                    break;
                }
                let cb = clipboard.as_mut().map(|cb| cb as &mut dyn Clipboard);
                if let Err(e) = dispatch(&mut session, prompter, cb, command) {
                    output::error(&e.to_string());
                }
            }
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => break,
            Err(e) => {
                return Err(CerberoError::Prompt(format!("readline: {e}")));
            }
        }
    }

    session.lock();
    output::info("Goodbye!");
    Ok(())
}

fn dispatch(
    session: &mut VaultSession,
    prompter: &mut dyn Prompter,
    clipboard: Option<&mut dyn Clipboard>,
    command: ShellCommand<'_>,
) -> Result<()> {
    debug!(command = command_name(&command), "shell command");
    match command {
        ShellCommand::Add {
            site,
            username,
            password,
            label,
        } => add::run(session, prompter, site, username, password, label),
        ShellCommand::Get { site, identifier } => {
            get::run(session, prompter, clipboard, site, identifier)
        }
        ShellCommand::Delete { site, identifier } => {
            delete::run(session, prompter, site, identifier, false)
        }
        ShellCommand::List => list::run(session),
        ShellCommand::Setup => setup::run(session, prompter).map(|_| ()),
        ShellCommand::Help => {
            print_help();
            Ok(())
        }
        ShellCommand::Exit | ShellCommand::Empty => Ok(()),
    }
}

/// Unlock, retrying a few times when the password is typed by a person.
fn unlock_with_retries(session: &mut VaultSession) -> Result<()> {
    let attempts = if password_is_scripted() {
        1
    } else {
        MAX_UNLOCK_ATTEMPTS
    };

    let mut attempt = 1;
    loop {
        match unlock_session(session) {
            Err(CerberoError::AuthenticationFailure) if attempt < attempts => {
                output::error(&CerberoError::AuthenticationFailure.to_string());
                attempt += 1;
            }
            other => return other,
        }
    }
}

fn command_name(command: &ShellCommand<'_>) -> &'static str {
    match command {
        ShellCommand::Add { .. } => "add",
        ShellCommand::Get { .. } => "get",
        ShellCommand::Delete { .. } => "delete",
        ShellCommand::List => "list",
        ShellCommand::Setup => "setup",
        ShellCommand::Help => "help",
        ShellCommand::Exit => "exit",
        ShellCommand::Empty => "",
    }
}

fn print_help() {
    println!("Available commands:");
    println!("  setup                                  Initial configuration");
    println!("  add <site> <user> <password> [label]   Add a credential");
    println!("  get <site> [user_or_label]             Retrieve a credential");
    println!("  list                                   List all sites");
    println!("  delete <site> [user_or_label]          Delete a credential");
    println!("  help                                   Show this help");
    println!("  exit                                   Leave the shell");
    println!();
    println!("Examples:");
    println!("  add gmail juan@work.com pass123 work");
    println!("  add gmail juan@personal.com pass456 personal");
    println!("  get gmail work");
    println!("  get gmail juan@work.com");
    println!("  delete gmail personal");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_add_with_and_without_label() {
        assert_eq!(
            parse_line("add gmail juan pw").unwrap(),
            ShellCommand::Add {
                site: "gmail",
                username: "juan",
                password: "pw",
                label: None
            }
        );
        assert_eq!(
            parse_line("  ADD gmail juan pw work ").unwrap(),
            ShellCommand::Add {
                site: "gmail",
                username: "juan",
                password: "pw",
                label: Some("work")
            }
        );
    }

    #[test]
    fn wrong_arity_yields_usage() {
        assert!(parse_line("add gmail juan").unwrap_err().starts_with("Usage: add"));
        assert!(parse_line("get").unwrap_err().starts_with("Usage: get"));
        assert!(parse_line("delete a b c").unwrap_err().starts_with("Usage: delete"));
    }

    #[test]
    fn blank_line_is_empty() {
        assert_eq!(parse_line("   ").unwrap(), ShellCommand::Empty);
    }

    #[test]
    fn unknown_command_hints_at_help() {
        let err = parse_line("frobnicate").unwrap_err();
        assert!(err.contains("frobnicate"));
        assert!(err.contains("help"));
    }

    #[test]
    fn exit_and_quit_leave() {
        assert_eq!(parse_line("exit").unwrap(), ShellCommand::Exit);
        assert_eq!(parse_line("quit").unwrap(), ShellCommand::Exit);
    }
}
