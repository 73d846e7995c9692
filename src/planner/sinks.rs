//! Local transaction executors.
//!
//! Signing and submitting transactions is left to external tooling. These
//! executors either only log the invocations or hand them over as a batch
//! file, one JSON object per line.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::Serialize;
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

use crate::error::{ExecuteError, Result};

use super::executor::{InvocationReceipt, TransactionExecutor};
use super::plan::InvocationPlanEntry;

/// Executor that logs invocations without performing them.
#[derive(Debug, Default, Clone, Copy)]
pub struct DryRunExecutor;

impl DryRunExecutor {
    /// Creates a dry-run executor.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

#[async_trait]
impl TransactionExecutor for DryRunExecutor {
    async fn execute(&self, index: usize, entry: &InvocationPlanEntry) -> Result<InvocationReceipt> {
        info!("[dry-run] {entry}");
        Ok(InvocationReceipt {
            reference: format!("dry-run:{index}"),
        })
    }

    fn executor_type(&self) -> &'static str {
        "dry-run"
    }
}

/// Executor that appends invocations to a JSON-lines batch file.
#[derive(Debug, Clone)]
pub struct BatchFileExecutor {
    /// Batch file path.
    path: PathBuf,
}

/// One line of a batch file.
#[derive(Debug, Serialize)]
struct BatchLine<'a> {
    index: usize,
    target: &'a str,
    method: &'a str,
    args: Vec<serde_json::Value>,
}

impl BatchFileExecutor {
    /// Creates an executor appending to `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the batch file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_error(&self, entry: &InvocationPlanEntry, message: String) -> ExecuteError {
        ExecuteError::InvocationFailed {
            target: entry.target.clone(),
            method: entry.method.clone(),
            message: format!("{}: {message}", self.path.display()),
        }
    }
}

#[async_trait]
impl TransactionExecutor for BatchFileExecutor {
    async fn execute(&self, index: usize, entry: &InvocationPlanEntry) -> Result<InvocationReceipt> {
        let line = BatchLine {
            index,
            target: &entry.target,
            method: &entry.method,
            args: entry.json_args(),
        };
        let mut content =
            serde_json::to_string(&line).map_err(|e| self.write_error(entry, e.to_string()))?;
        content.push('\n');

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .map_err(|e| self.write_error(entry, e.to_string()))?;

        file.write_all(content.as_bytes())
            .await
            .map_err(|e| self.write_error(entry, e.to_string()))?;
        file.flush()
            .await
            .map_err(|e| self.write_error(entry, e.to_string()))?;

        debug!("Appended {} to {}", entry.target, self.path.display());
        Ok(InvocationReceipt {
            reference: format!("batch:{}#{index}", self.path.display()),
        })
    }

    fn executor_type(&self) -> &'static str {
        "batch-file"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planner::Argument;
    use tempfile::TempDir;

    fn entry() -> InvocationPlanEntry {
        InvocationPlanEntry::initialize(
            "IncentivizedInboundChannel",
            vec![Argument::address("0xOP"), Argument::address("0xAPP")],
        )
    }

    #[tokio::test]
    async fn test_dry_run_receipt() {
        let receipt = DryRunExecutor::new()
            .execute(2, &entry())
            .await
            .expect("dry run should succeed");
        assert_eq!(receipt.reference, "dry-run:2");
    }

    #[tokio::test]
    async fn test_batch_file_appends_lines() {
        let temp = TempDir::new().expect("Failed to create temp dir");
        let executor = BatchFileExecutor::new(temp.path().join("batch.jsonl"));

        executor.execute(0, &entry()).await.expect("first append");
        let receipt = executor.execute(1, &entry()).await.expect("second append");
        assert_eq!(
            receipt.reference,
            format!("batch:{}#1", executor.path().display())
        );

        let content = std::fs::read_to_string(executor.path()).expect("Failed to read batch");
        let lines: Vec<serde_json::Value> = content
            .lines()
            .map(|l| serde_json::from_str(l).expect("valid JSON line"))
            .collect();

        assert_eq!(lines.len(), 2);
        assert_eq!(
            lines[0],
            serde_json::json!({
                "index": 0,
                "target": "IncentivizedInboundChannel",
                "method": "initialize",
                "args": ["0xOP", "0xAPP"],
            })
        );
        assert_eq!(lines[1]["index"], 1);
    }

    #[tokio::test]
    async fn test_batch_file_unwritable() {
        let temp = TempDir::new().expect("Failed to create temp dir");
        let executor = BatchFileExecutor::new(temp.path().join("missing").join("batch.jsonl"));

        assert!(executor.execute(0, &entry()).await.is_err());
    }
}
