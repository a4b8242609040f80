//! Command-line interface for songspot.
//!
//! Runs the relay server, records and identifies from the microphone, and
//! offers a few credential diagnostics.

mod commands;

pub use commands::{Cli, run_command};
