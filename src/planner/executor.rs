//! Plan executor for applying invocation plans.
//!
//! This module walks an invocation plan in order, hands each entry to a
//! [`TransactionExecutor`], and records the outcome in the completion state.
//! Execution stops at the first failed invocation; nothing is retried or
//! rolled back.

use async_trait::async_trait;
use serde::Serialize;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::error::{ExecuteError, Result};
use crate::state::{CompletionState, RunHistoryEntry, RunOperation};

use super::plan::{InvocationPlan, InvocationPlanEntry};

/// Acknowledgement of a single executed invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InvocationReceipt {
    /// Opaque reference returned by the executor (transaction hash, batch
    /// line, ...).
    pub reference: String,
}

/// Sink that performs planned invocations.
#[async_trait]
pub trait TransactionExecutor: Send + Sync {
    /// Performs one invocation.
    async fn execute(&self, index: usize, entry: &InvocationPlanEntry) -> Result<InvocationReceipt>;

    /// Gets the executor type name.
    fn executor_type(&self) -> &'static str;
}

/// Executor for invocation plans.
pub struct PlanExecutor<'a> {
    /// Invocation sink.
    executor: &'a dyn TransactionExecutor,
    /// Identifier of the run-once marker.
    step_id: String,
    /// Whether to execute a step that already completed.
    force: bool,
}

/// Outcome of a single entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum EntryOutcome {
    /// The invocation went through.
    Succeeded {
        /// Executor reference.
        reference: String,
    },
    /// The invocation failed.
    Failed {
        /// Failure description.
        message: String,
    },
    /// Not attempted because an earlier entry failed.
    Skipped,
}

/// Result of executing a single entry.
#[derive(Debug, Clone, Serialize)]
pub struct EntryResult {
    /// Entry index in the plan.
    pub index: usize,
    /// Target record name.
    pub target: String,
    /// Invoked method.
    pub method: String,
    /// What happened.
    pub outcome: EntryOutcome,
}

/// Result of executing the entire plan.
#[derive(Debug, Clone, Serialize)]
pub struct ExecutionResult {
    /// Run identifier.
    pub run_id: Uuid,
    /// Individual entry results.
    pub results: Vec<EntryResult>,
    /// Number of successful entries.
    pub successful: usize,
    /// Number of failed entries.
    pub failed: usize,
    /// Number of skipped entries.
    pub skipped: usize,
    /// Whether the step was already complete and nothing ran.
    pub already_applied: bool,
    /// Whether the entire plan succeeded.
    pub success: bool,
}

impl<'a> PlanExecutor<'a> {
    /// Creates a new plan executor.
    #[must_use]
    pub fn new(executor: &'a dyn TransactionExecutor, step_id: impl Into<String>) -> Self {
        Self {
            executor,
            step_id: step_id.into(),
            force: false,
        }
    }

    /// Sets whether to re-run a completed step.
    #[must_use]
    pub const fn with_force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }

    /// Executes an invocation plan.
    ///
    /// A failed invocation does not return an error: it is reported in the
    /// [`ExecutionResult`], recorded in the history, and leaves the step
    /// marker unset.
    ///
    /// # Errors
    ///
    /// Returns an error if the plan is empty.
    pub async fn execute(
        &self,
        plan: &InvocationPlan,
        plan_hash: &str,
        state: &mut CompletionState,
    ) -> Result<ExecutionResult> {
        let run_id = Uuid::new_v4();
        let previously_complete = state.is_complete(&self.step_id);

        if previously_complete && !self.force {
            info!("Step '{}' already completed, skipping", self.step_id);
            return Ok(ExecutionResult::already_applied(run_id));
        }

        if plan.is_empty() {
            return Err(ExecuteError::Aborted {
                reason: String::from("Plan has no invocations"),
            }
            .into());
        }

        info!(
            "Executing step '{}' with {} invocations via {} executor",
            self.step_id,
            plan.len(),
            self.executor.executor_type()
        );

        let mut results = Vec::with_capacity(plan.len());
        let mut first_error: Option<String> = None;

        for (index, entry) in plan.iter().enumerate() {
            if first_error.is_some() {
                warn!("Skipping {} due to earlier failure", entry.target);
                results.push(EntryResult::new(index, entry, EntryOutcome::Skipped));
                continue;
            }

            info!("{}", entry.description());
            let outcome = match self.executor.execute(index, entry).await {
                Ok(receipt) => EntryOutcome::Succeeded {
                    reference: receipt.reference,
                },
                Err(e) => {
                    error!("Failed to configure {}: {e}", entry.target);
                    let message = e.to_string();
                    first_error = Some(message.clone());
                    EntryOutcome::Failed { message }
                }
            };
            results.push(EntryResult::new(index, entry, outcome));
        }

        let execution_result = ExecutionResult::from_results(run_id, results);

        let operation = if previously_complete {
            RunOperation::ForcedApply
        } else {
            RunOperation::Apply
        };
        let targets = plan.targets().into_iter().map(String::from).collect();
        let entry = RunHistoryEntry::new(run_id, operation, &self.step_id, plan_hash, targets);

        if let Some(message) = first_error {
            state.add_history(entry.with_error(&message));
        } else {
            state.mark_complete(&self.step_id, plan_hash, run_id);
            state.add_history(entry);
        }

        Ok(execution_result)
    }
}

impl EntryResult {
    fn new(index: usize, entry: &InvocationPlanEntry, outcome: EntryOutcome) -> Self {
        Self {
            index,
            target: entry.target.clone(),
            method: entry.method.clone(),
            outcome,
        }
    }
}

impl ExecutionResult {
    fn from_results(run_id: Uuid, results: Vec<EntryResult>) -> Self {
        let successful = results
            .iter()
            .filter(|r| matches!(r.outcome, EntryOutcome::Succeeded { .. }))
            .count();
        let failed = results
            .iter()
            .filter(|r| matches!(r.outcome, EntryOutcome::Failed { .. }))
            .count();
        let skipped = results.len() - successful - failed;

        Self {
            run_id,
            successful,
            failed,
            skipped,
            already_applied: false,
            success: failed == 0,
            results,
        }
    }

    fn already_applied(run_id: Uuid) -> Self {
        Self {
            run_id,
            results: vec![],
            successful: 0,
            failed: 0,
            skipped: 0,
            already_applied: true,
            success: true,
        }
    }

    /// Returns the number of attempted entries.
    #[must_use]
    pub const fn attempted(&self) -> usize {
        self.successful + self.failed
    }
}

impl std::fmt::Display for ExecutionResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.already_applied {
            return write!(f, "Step already applied, nothing executed");
        }
        write!(
            f,
            "Executed {} invocations: {} successful, {} failed, {} skipped",
            self.attempted(),
            self.successful,
            self.failed,
            self.skipped
        )
    }
}
