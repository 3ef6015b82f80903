//! Helper utilities for integration tests.

pub mod dazzler;

pub use dazzler::*;

use std::ffi::OsStr;
use std::process::{Command, Output};

/// Runs the `fgovl` binary with `args`.
pub fn run_fgovl<I, S>(args: I) -> Output
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    Command::new(env!("CARGO_BIN_EXE_fgovl"))
        .args(args)
        .output()
        .expect("Failed to execute fgovl")
}

/// Returns the process's stderr as a string, for assertion messages.
pub fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}
