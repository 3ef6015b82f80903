//! Command trait definition for CLI commands.
//!
//! Every subcommand implements [`Command`]; `enum_dispatch` forwards calls
//! from the subcommand enum in `main.rs` without boxing.

use anyhow::Result;
use enum_dispatch::enum_dispatch;

/// Trait implemented by all fgovl CLI commands.
///
/// `command_line` is the full invocation, as typed.
#[enum_dispatch]
pub trait Command {
    #[allow(clippy::missing_errors_doc)]
    fn execute(&self, command_line: &str) -> Result<()>;
}
