//! Planning module for channel configuration.
//!
//! This module validates the required parameters, resolves deployment
//! records, builds the ordered invocation plan, and executes plans through a
//! transaction executor.

mod configuration;
mod executor;
mod params;
mod plan;
mod resolve;
mod sinks;

pub use configuration::{plan_for_config, ConfigurationPlanner, PlanAttempt, PlanningStage};
pub use executor::{
    EntryOutcome, EntryResult, ExecutionResult, InvocationReceipt, PlanExecutor,
    TransactionExecutor,
};
pub use params::{validate_parameters, Environment, ValidatedParameters};
pub use plan::{Argument, InvocationPlan, InvocationPlanEntry, INITIALIZE};
pub use resolve::{resolve_records, ResolvedRecords};
pub use sinks::{BatchFileExecutor, DryRunExecutor};
