//! Library side of the `sas-convert` command.
//!
//! Kept separate from `main.rs` so the command runners can be driven from
//! integration tests.

pub mod commands;
pub mod input;
pub mod logging;
