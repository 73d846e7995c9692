//! State types for tracking completed configuration steps.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Current version of the state format.
pub const STATE_VERSION: &str = "1.0";

/// Maximum number of history entries kept.
const MAX_HISTORY: usize = 100;

/// The complete completion state of a network.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionState {
    /// State format version.
    pub version: String,
    /// Network name.
    pub network: String,
    /// Completed steps keyed by step id.
    pub steps: BTreeMap<String, StepRecord>,
    /// When the state was last updated.
    pub last_updated: DateTime<Utc>,
    /// Run history (recent entries).
    #[serde(default)]
    pub history: Vec<RunHistoryEntry>,
}

/// Marker of a completed step.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StepRecord {
    /// Step identifier.
    pub step_id: String,
    /// Fingerprint of the plan that was executed.
    pub plan_hash: String,
    /// When the step completed.
    pub completed_at: DateTime<Utc>,
    /// Run that completed the step.
    pub run_id: Uuid,
}

/// A single entry in the run history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunHistoryEntry {
    /// When the run finished.
    pub timestamp: DateTime<Utc>,
    /// Run identifier.
    pub run_id: Uuid,
    /// Type of operation.
    pub operation: RunOperation,
    /// Step identifier.
    pub step_id: String,
    /// Fingerprint of the plan.
    pub plan_hash: String,
    /// Targets that were invoked.
    pub targets: Vec<String>,
    /// Whether the run succeeded.
    pub success: bool,
    /// Optional error message.
    #[serde(default)]
    pub error: Option<String>,
}

/// Types of recorded operations.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RunOperation {
    /// Plan executed.
    Apply,
    /// Plan executed again over a completed step.
    ForcedApply,
    /// Step marker removed.
    Reset,
}

impl CompletionState {
    /// Creates a new empty state.
    #[must_use]
    pub fn new(network: &str) -> Self {
        Self {
            version: STATE_VERSION.to_string(),
            network: network.to_string(),
            steps: BTreeMap::new(),
            last_updated: Utc::now(),
            history: Vec::new(),
        }
    }

    /// Returns true if the step has completed.
    #[must_use]
    pub fn is_complete(&self, step_id: &str) -> bool {
        self.steps.contains_key(step_id)
    }

    /// Gets the marker of a step.
    #[must_use]
    pub fn get_step(&self, step_id: &str) -> Option<&StepRecord> {
        self.steps.get(step_id)
    }

    /// Marks a step as complete.
    pub fn mark_complete(&mut self, step_id: &str, plan_hash: &str, run_id: Uuid) {
        self.steps.insert(
            step_id.to_string(),
            StepRecord {
                step_id: step_id.to_string(),
                plan_hash: plan_hash.to_string(),
                completed_at: Utc::now(),
                run_id,
            },
        );
        self.last_updated = Utc::now();
    }

    /// Removes a step marker.
    pub fn reset_step(&mut self, step_id: &str) -> Option<StepRecord> {
        let result = self.steps.remove(step_id);
        if result.is_some() {
            self.last_updated = Utc::now();
        }
        result
    }

    /// Adds a history entry.
    pub fn add_history(&mut self, entry: RunHistoryEntry) {
        if self.history.len() >= MAX_HISTORY {
            self.history.remove(0);
        }
        self.history.push(entry);
        self.last_updated = Utc::now();
    }
}

impl RunHistoryEntry {
    /// Creates a successful history entry.
    #[must_use]
    pub fn new(
        run_id: Uuid,
        operation: RunOperation,
        step_id: &str,
        plan_hash: &str,
        targets: Vec<String>,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            run_id,
            operation,
            step_id: step_id.to_string(),
            plan_hash: plan_hash.to_string(),
            targets,
            success: true,
            error: None,
        }
    }

    /// Marks the entry as failed.
    #[must_use]
    pub fn with_error(mut self, error: &str) -> Self {
        self.success = false;
        self.error = Some(error.to_string());
        self
    }
}

impl std::fmt::Display for RunOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let op = match self {
            Self::Apply => "apply",
            Self::ForcedApply => "forced apply",
            Self::Reset => "reset",
        };
        write!(f, "{op}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mark_and_reset() {
        let mut state = CompletionState::new("local");
        assert!(!state.is_complete("configure-channels"));

        state.mark_complete("configure-channels", "abc123", Uuid::new_v4());
        assert!(state.is_complete("configure-channels"));
        assert_eq!(
            state.get_step("configure-channels").map(|s| s.plan_hash.as_str()),
            Some("abc123")
        );

        assert!(state.reset_step("configure-channels").is_some());
        assert!(!state.is_complete("configure-channels"));
        assert!(state.reset_step("configure-channels").is_none());
    }

    #[test]
    fn test_history_is_bounded() {
        let mut state = CompletionState::new("local");
        for i in 0..(MAX_HISTORY + 5) {
            state.add_history(RunHistoryEntry::new(
                Uuid::new_v4(),
                RunOperation::Apply,
                "configure-channels",
                &i.to_string(),
                vec![],
            ));
        }

        assert_eq!(state.history.len(), MAX_HISTORY);
        assert_eq!(state.history[0].plan_hash, "5");
    }

    #[test]
    fn test_failed_entry() {
        let entry = RunHistoryEntry::new(
            Uuid::new_v4(),
            RunOperation::Apply,
            "configure-channels",
            "abc",
            vec![String::from("BasicOutboundChannel")],
        )
        .with_error("reverted");

        assert!(!entry.success);
        assert_eq!(entry.error.as_deref(), Some("reverted"));
    }
}
