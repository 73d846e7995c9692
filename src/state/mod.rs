//! Completion state module.
//!
//! This module persists the run-once markers of configuration steps, so that
//! re-running the deployment process does not re-issue invocations that
//! already went through, together with a short history of runs.

mod store;
mod local;
mod types;

pub use store::StateStore;
pub use local::{LocalStateStore, STATE_DIR};
pub use types::{CompletionState, RunHistoryEntry, RunOperation, StepRecord, STATE_VERSION};
