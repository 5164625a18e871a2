//! One module per subcommand.
//!
//! Each module exposes `execute(&Cli, ..)` for one-shot invocations and
//! a `run(..)` over an existing session that the shell reuses.

pub mod add;
pub mod delete;
pub mod get;
pub mod list;
pub mod setup;
pub mod shell;
