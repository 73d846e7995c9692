//! Deployment registry module.
//!
//! This module holds the read-only view of previously deployed contracts:
//! the record type, the lookup trait the planner consumes, an in-memory
//! snapshot and a loader for on-disk deployment artifacts.

mod record;
mod memory;
mod artifacts;

pub use record::{DeploymentRecord, DeploymentRegistry};
pub use memory::InMemoryRegistry;
pub use artifacts::ArtifactLoader;
