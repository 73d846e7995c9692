//! Command-line interface module.
//!
//! This module provides the CLI commands and output formatting.

mod commands;
mod output;

pub use commands::{Cli, Commands, OutputFormat};
pub use output::OutputFormatter;
