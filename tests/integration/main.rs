//! Integration tests for fgovl.
//!
//! These tests build small Dazzler databases and LAS files on disk and run
//! the `fgovl` binary against them.

mod helpers;
mod test_error_paths;
mod test_falcon_command;
mod test_m4_command;
