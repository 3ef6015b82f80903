//! CLI command implementations for fgovl.
//!
//! ## Consensus
//! - [`falcon`] - Build consensus-caller input from overlaps
//!
//! ## Utilities
//! - [`m4`] - List overlaps in M4 format

pub mod command;
pub mod common;
pub mod falcon;
pub mod m4;
