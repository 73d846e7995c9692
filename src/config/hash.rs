//! Configuration and plan hashing.
//!
//! This module provides deterministic fingerprints of a configuration and of
//! an invocation plan. The plan fingerprint is stored with the run-once
//! marker so that a later run can tell whether it would issue the same
//! invocations.

use sha2::{Digest, Sha256};

use crate::planner::{Argument, InvocationPlan};

use super::spec::ChannelConfig;

/// Hasher for computing configuration and plan fingerprints.
#[derive(Debug, Default)]
pub struct ConfigHasher;

impl ConfigHasher {
    /// Creates a new hasher.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Computes a hash of the configuration fields that shape a plan.
    #[must_use]
    pub fn hash_config(&self, config: &ChannelConfig) -> String {
        let mut hasher = Sha256::new();

        hasher.update(config.network.as_bytes());
        hasher.update([0u8]);
        hasher.update(config.step_id.as_bytes());
        hasher.update([0u8]);
        if let Some(operator) = &config.operator {
            hasher.update(operator.as_bytes());
        }
        hasher.update([0u8]);

        for key in config.parameters.required() {
            hasher.update(key.as_bytes());
            hasher.update([0u8]);
        }
        for name in config.records.record_names() {
            hasher.update(name.as_bytes());
            hasher.update([0u8]);
        }

        hex::encode(hasher.finalize())
    }

    /// Computes a hash of an invocation plan.
    ///
    /// Two plans hash equal iff they have the same entries in the same order
    /// with the same arguments.
    #[must_use]
    pub fn hash_plan(&self, plan: &InvocationPlan) -> String {
        let mut hasher = Sha256::new();

        for entry in plan {
            hasher.update(b"E");
            hasher.update(entry.target.as_bytes());
            hasher.update([0u8]);
            hasher.update(entry.method.as_bytes());
            hasher.update([0u8]);
            for arg in &entry.args {
                Self::hash_argument(&mut hasher, arg);
            }
        }

        hex::encode(hasher.finalize())
    }

    /// Returns the first 8 characters of a hash, for display.
    #[must_use]
    pub fn short_hash(hash: &str) -> &str {
        hash.get(..8).unwrap_or(hash)
    }

    fn hash_argument(hasher: &mut Sha256, arg: &Argument) {
        match arg {
            Argument::Literal(v) => {
                hasher.update(b"L");
                hasher.update(v.as_bytes());
                hasher.update([0u8]);
            }
            Argument::Address(v) => {
                hasher.update(b"A");
                hasher.update(v.as_bytes());
                hasher.update([0u8]);
            }
            Argument::List(items) => {
                hasher.update(b"[");
                for item in items {
                    Self::hash_argument(hasher, item);
                }
                hasher.update(b"]");
            }
        }
    }
}
