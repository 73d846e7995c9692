// ============================================================================
// Strict linting - Dangerous or non-idiomatic practices are forbidden
// ============================================================================

#![deny(unsafe_code)]                 // Unsafe code is forbidden
#![deny(missing_docs)]                // All public items must be documented
#![deny(dead_code)]                   // Unused code is forbidden
#![deny(non_camel_case_types)]        // Types must follow CamelCase convention

// Additional strictness - Leave nothing unchecked
#![deny(unused_imports)]              // Unused imports are forbidden
#![deny(unused_variables)]            // Unused variables are forbidden
#![deny(unused_must_use)]             // Must handle Result and Option explicitly
#![deny(non_snake_case)]              // Variables and functions must be snake_case
#![deny(non_upper_case_globals)]      // Constants must be UPPER_CASE
#![deny(nonstandard_style)]           // Non-standard code style is forbidden

// Clippy lints (warnings only)
#![warn(clippy::all)]                 // All standard Clippy lints
#![warn(clippy::pedantic)]            // Very strict Clippy lints
#![warn(clippy::nursery)]             // Experimental lints
#![warn(clippy::unwrap_used)]         // unwrap() warning
#![warn(clippy::expect_used)]         // expect() warning
#![warn(clippy::panic)]               // panic!() warning
#![warn(clippy::print_stdout)]        // println!() warning
#![warn(clippy::todo)]                // TODO warning
#![warn(clippy::unimplemented)]       // unimplemented!() warning
#![warn(clippy::unwrap_in_result)]    // unwrap() in Result warning
#![warn(clippy::redundant_clone)]     // Useless clones warning
#![warn(clippy::cognitive_complexity)] // Limit cognitive complexity

// ============================================================================
// Crate Documentation
// ============================================================================

//! # Bridge Channel Config
//!
//! A deterministic, run-once configuration planner for the messaging
//! channels of a two-chain bridge.
//!
//! ## Overview
//!
//! Once the channel contracts and the application that uses them are
//! deployed, each channel must be initialized exactly once with the
//! addresses of its peers. This crate:
//!
//! - Reads the deployment records of a network from artifact files
//! - Validates the required operator parameters (principal, fee)
//! - Builds the ordered list of `initialize` invocations
//! - Executes the list through a pluggable transaction executor
//! - Records a run-once marker so the step is not repeated
//!
//! ## Architecture
//!
//! Planning is a pure function of two snapshots:
//!
//! 1. **Environment**: captured once from the process (and `.env`)
//! 2. **Registry**: deployment records loaded from artifacts
//! 3. **Planner**: validates, resolves, then builds the plan, failing before
//!    any invocation exists
//!
//! Execution is separate: [`planner::PlanExecutor`] walks a finished plan
//! and hands each entry to a [`planner::TransactionExecutor`].
//!
//! ## Modules
//!
//! - [`config`]: Configuration parsing, validation and hashing
//! - [`registry`]: Deployment records and artifact loading
//! - [`planner`]: Plan construction and execution
//! - [`state`]: Run-once markers and history
//! - [`cli`]: Command-line interface
//!
//! ## Example
//!
//! ```yaml
//! network: sora-testnet
//! deployments_dir: deployments
//! operator: "0x90F8bf6A479f320ead074411a4B0e7944Ea8c9C1"
//! ```

// ============================================================================
// Modules
// ============================================================================

pub mod cli;
pub mod config;
pub mod error;
pub mod planner;
pub mod registry;
pub mod state;

// ============================================================================
// Re-exports
// ============================================================================

pub use cli::{Cli, Commands, OutputFormatter};
pub use config::{ChannelConfig, ConfigHasher, ConfigParser, ConfigValidator};
pub use error::{ChannelConfigError, Result};
pub use planner::{ConfigurationPlanner, InvocationPlan, PlanExecutor, TransactionExecutor};
pub use registry::{ArtifactLoader, DeploymentRecord, DeploymentRegistry, InMemoryRegistry};
pub use state::{CompletionState, LocalStateStore, StateStore};
