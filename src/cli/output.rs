//! Output formatting for CLI commands.
//!
//! This module renders plans, execution results, completion state and
//! validation results as text tables or JSON.

use colored::Colorize;
use serde::Serialize;
use std::fmt::Write;
use tabled::{Table, Tabled};

use crate::config::{ConfigHasher, ValidationResult};
use crate::planner::{EntryOutcome, ExecutionResult, InvocationPlan};
use crate::state::CompletionState;

use super::commands::OutputFormat;

/// Output formatter for CLI.
#[derive(Debug)]
pub struct OutputFormatter {
    /// Output format.
    format: OutputFormat,
}

/// Plan entry row for table display.
#[derive(Tabled)]
struct PlanEntryRow {
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "Target")]
    target: String,
    #[tabled(rename = "Method")]
    method: String,
    #[tabled(rename = "Arguments")]
    arguments: String,
}

/// Execution row for table display.
#[derive(Tabled)]
struct ExecutionRow {
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "Target")]
    target: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Detail")]
    detail: String,
}

impl OutputFormatter {
    /// Creates a new output formatter.
    #[must_use]
    pub const fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Formats an invocation plan for display.
    #[must_use]
    pub fn format_plan(&self, plan: &InvocationPlan, plan_hash: &str) -> String {
        match self.format {
            OutputFormat::Json => to_json(&PlanJson { plan_hash, plan }),
            OutputFormat::Text => Self::format_plan_text(plan, plan_hash),
        }
    }

    fn format_plan_text(plan: &InvocationPlan, plan_hash: &str) -> String {
        if plan.is_empty() {
            return String::from("No invocations planned.\n");
        }

        let mut output = String::from("\nInvocation Plan\n");
        let _ = write!(
            output,
            "   Plan hash: {}\n\n",
            ConfigHasher::short_hash(plan_hash)
        );

        let rows: Vec<PlanEntryRow> = plan
            .iter()
            .enumerate()
            .map(|(i, e)| PlanEntryRow {
                index: i + 1,
                target: e.target.clone(),
                method: e.method.clone(),
                arguments: e
                    .args
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(", "),
            })
            .collect();

        output.push_str(&Table::new(rows).to_string());
        let _ = write!(
            output,
            "\n\nPlan: {} invocations\n",
            plan.len().to_string().green()
        );
        output
    }

    /// Formats the result of executing a plan.
    #[must_use]
    pub fn format_execution(&self, result: &ExecutionResult) -> String {
        match self.format {
            OutputFormat::Json => to_json(result),
            OutputFormat::Text => Self::format_execution_text(result),
        }
    }

    fn format_execution_text(result: &ExecutionResult) -> String {
        if result.already_applied {
            return format!("{} {result}\n", "✓".green());
        }

        let rows: Vec<ExecutionRow> = result
            .results
            .iter()
            .map(|r| {
                let (status, detail) = match &r.outcome {
                    EntryOutcome::Succeeded { reference } => {
                        ("ok".green().to_string(), reference.clone())
                    }
                    EntryOutcome::Failed { message } => {
                        ("failed".red().to_string(), truncate(message, 60))
                    }
                    EntryOutcome::Skipped => ("skipped".dimmed().to_string(), String::new()),
                };
                ExecutionRow {
                    index: r.index + 1,
                    target: r.target.clone(),
                    status,
                    detail,
                }
            })
            .collect();

        let mut output = Table::new(rows).to_string();
        let marker = if result.success {
            "✓".green()
        } else {
            "✗".red()
        };
        let _ = write!(output, "\n\n{marker} {result}\n");
        output
    }

    /// Formats the completion state.
    #[must_use]
    pub fn format_state(&self, state: &CompletionState) -> String {
        match self.format {
            OutputFormat::Json => to_json(state),
            OutputFormat::Text => {
                let mut output = format!("\nState: {}\n\n", state.network);
                let _ = writeln!(output, "   Version: {}", state.version);
                let _ = writeln!(output, "   Last updated: {}", state.last_updated);

                if state.steps.is_empty() {
                    output.push_str("   No completed steps.\n");
                } else {
                    output.push_str("\n   Completed steps:\n");
                    for step in state.steps.values() {
                        let _ = writeln!(
                            output,
                            "     {} {} ({}, plan {})",
                            "✓".green(),
                            step.step_id,
                            step.completed_at.format("%Y-%m-%d %H:%M"),
                            ConfigHasher::short_hash(&step.plan_hash)
                        );
                    }
                }

                if !state.history.is_empty() {
                    let _ = writeln!(output, "\n   Recent history ({}):", state.history.len());
                    for entry in state.history.iter().rev().take(5) {
                        let status = if entry.success { "✓".green() } else { "✗".red() };
                        let _ = write!(
                            output,
                            "     {status} {} - {} {}",
                            entry.timestamp.format("%Y-%m-%d %H:%M"),
                            entry.operation,
                            entry.step_id
                        );
                        if let Some(error) = &entry.error {
                            let _ = write!(output, ": {}", truncate(error, 60));
                        }
                        output.push('\n');
                    }
                }

                output
            }
        }
    }

    /// Formats a validation result.
    #[must_use]
    pub fn format_validation(&self, result: &ValidationResult, show_warnings: bool) -> String {
        match self.format {
            OutputFormat::Json => {
                let errors: Vec<String> = result.errors.iter().map(ToString::to_string).collect();
                let warnings: &[String] = if show_warnings { &result.warnings } else { &[] };
                to_json(&serde_json::json!({
                    "valid": result.is_valid(),
                    "errors": errors,
                    "warnings": warnings,
                }))
            }
            OutputFormat::Text => {
                let mut output = if result.is_valid() {
                    format!("{} Configuration is valid.\n", "✓".green())
                } else {
                    format!("{} Configuration is invalid:\n", "✗".red())
                };
                for error in &result.errors {
                    let _ = writeln!(output, "   - {error}");
                }
                if show_warnings && !result.warnings.is_empty() {
                    let _ = write!(output, "\n{} Warnings:\n", "⚠".yellow());
                    for warning in &result.warnings {
                        let _ = writeln!(output, "   - {warning}");
                    }
                }
                output
            }
        }
    }
}

#[derive(Serialize)]
struct PlanJson<'a> {
    plan_hash: &'a str,
    #[serde(flatten)]
    plan: &'a InvocationPlan,
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_default()
}

/// Truncates a string to a maximum number of characters.
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{head}...")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planner::{Argument, InvocationPlanEntry};

    fn plan() -> InvocationPlan {
        InvocationPlan::new(vec![InvocationPlanEntry::initialize(
            "IncentivizedInboundChannel",
            vec![Argument::address("0xOP"), Argument::address("0xAPP")],
        )])
    }

    #[test]
    fn test_plan_text_lists_targets() {
        colored::control::set_override(false);
        let output = OutputFormatter::new(OutputFormat::Text).format_plan(&plan(), "0123456789");

        assert!(output.contains("IncentivizedInboundChannel"));
        assert!(output.contains("0xOP, 0xAPP"));
        assert!(output.contains("Plan hash: 01234567"));
    }

    #[test]
    fn test_plan_json() {
        let output = OutputFormatter::new(OutputFormat::Json).format_plan(&plan(), "abc");
        let value: serde_json::Value = serde_json::from_str(&output).expect("valid JSON");

        assert_eq!(value["plan_hash"], "abc");
        assert_eq!(value["entries"][0]["target"], "IncentivizedInboundChannel");
        assert_eq!(value["entries"][0]["args"][1]["value"], "0xAPP");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("0123456789abc", 8), "01234...");
    }
}
