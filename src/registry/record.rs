//! Deployment record types and the registry lookup trait.

use serde::{Deserialize, Serialize};

/// An immutable name-to-address binding produced by a prior deployment.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DeploymentRecord {
    /// Unique record name within the registry.
    pub name: String,
    /// Deployed address. Treated as an opaque string.
    pub address: String,
}

impl DeploymentRecord {
    /// Creates a new deployment record.
    #[must_use]
    pub fn new(name: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            address: address.into(),
        }
    }
}

impl std::fmt::Display for DeploymentRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} @ {}", self.name, self.address)
    }
}

/// Read-only lookup of deployment records by name.
pub trait DeploymentRegistry: Send + Sync {
    /// Returns the record bound to `name`, if any.
    fn get(&self, name: &str) -> Option<DeploymentRecord>;
}

impl<R: DeploymentRegistry + ?Sized> DeploymentRegistry for &R {
    fn get(&self, name: &str) -> Option<DeploymentRecord> {
        (**self).get(name)
    }
}

impl DeploymentRegistry for Box<dyn DeploymentRegistry> {
    fn get(&self, name: &str) -> Option<DeploymentRecord> {
        (**self).get(name)
    }
}
