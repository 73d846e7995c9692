//! CLI command definitions.
//!
//! This module defines all CLI commands and their arguments using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Plans and applies the initialization of deployed bridge channels.
#[derive(Parser, Debug)]
#[command(name = "channel-config")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the configuration file.
    #[arg(short, long, global = true, env = "CHANNEL_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format (text, json).
    #[arg(long, global = true, default_value = "text")]
    pub output: OutputFormat,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Validate the configuration file.
    Validate {
        /// Show warnings as well as errors.
        #[arg(short, long)]
        warnings: bool,
    },

    /// Build and display the invocation plan.
    Plan,

    /// Execute the invocation plan.
    Apply {
        /// Skip confirmation prompt.
        #[arg(short, long)]
        yes: bool,

        /// Execute even if the step already completed.
        #[arg(long)]
        force: bool,

        /// Append invocations to this JSON-lines file instead of a dry run.
        #[arg(long)]
        batch_file: Option<PathBuf>,
    },

    /// Show completed steps and run history.
    Status,

    /// Remove completion markers.
    Reset {
        /// Step to reset (defaults to the configured step).
        #[arg(long, conflicts_with = "all")]
        step: Option<String>,

        /// Delete the whole state file.
        #[arg(long)]
        all: bool,

        /// Skip confirmation prompt.
        #[arg(short, long)]
        yes: bool,
    },
}

/// Output format options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output.
    #[default]
    Text,
    /// JSON output for scripting.
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_apply() {
        let cli = Cli::try_parse_from([
            "channel-config",
            "--config",
            "deploy/channel-config.yaml",
            "apply",
            "--yes",
            "--batch-file",
            "out.jsonl",
        ])
        .expect("arguments should parse");

        assert_eq!(cli.config, Some(PathBuf::from("deploy/channel-config.yaml")));
        assert!(matches!(
            cli.command,
            Commands::Apply { yes: true, force: false, batch_file: Some(_) }
        ));
    }

    #[test]
    fn test_reset_step_conflicts_with_all() {
        let result = Cli::try_parse_from(["channel-config", "reset", "--step", "x", "--all"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_json_output() {
        let cli = Cli::try_parse_from(["channel-config", "--output", "json", "plan"])
            .expect("arguments should parse");
        assert_eq!(cli.output, OutputFormat::Json);
        assert!(matches!(cli.command, Commands::Plan));
    }
}
