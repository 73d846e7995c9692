//! In-memory registry snapshot.

use std::collections::BTreeMap;

use super::record::{DeploymentRecord, DeploymentRegistry};

/// A registry snapshot held in memory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InMemoryRegistry {
    /// Records keyed by name.
    records: BTreeMap<String, DeploymentRecord>,
}

impl InMemoryRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            records: BTreeMap::new(),
        }
    }

    /// Builds a registry from a list of records.
    ///
    /// A later record with the same name replaces an earlier one.
    #[must_use]
    pub fn from_records(records: impl IntoIterator<Item = DeploymentRecord>) -> Self {
        let mut registry = Self::new();
        for record in records {
            registry.insert(record);
        }
        registry
    }

    /// Adds a record, returning the one it replaced.
    pub fn insert(&mut self, record: DeploymentRecord) -> Option<DeploymentRecord> {
        self.records.insert(record.name.clone(), record)
    }

    /// Returns the number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if the registry holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Returns record names in sorted order.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.records.keys().map(String::as_str).collect()
    }

    /// Iterates over all records in name order.
    pub fn records(&self) -> impl Iterator<Item = &DeploymentRecord> {
        self.records.values()
    }
}

impl DeploymentRegistry for InMemoryRegistry {
    fn get(&self, name: &str) -> Option<DeploymentRecord> {
        self.records.get(name).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_by_name() {
        let registry = InMemoryRegistry::from_records([
            DeploymentRecord::new("ETHApp", "0xAPP"),
            DeploymentRecord::new("BasicInboundChannel", "0xB1"),
        ]);

        assert_eq!(registry.len(), 2);
        assert_eq!(
            registry.get("ETHApp").map(|r| r.address),
            Some(String::from("0xAPP"))
        );
        assert!(registry.get("ERC20App").is_none());
        assert_eq!(registry.names(), vec!["BasicInboundChannel", "ETHApp"]);
    }

    #[test]
    fn test_insert_replaces_same_name() {
        let mut registry = InMemoryRegistry::new();
        assert!(registry.insert(DeploymentRecord::new("ETHApp", "0x1")).is_none());

        let replaced = registry.insert(DeploymentRecord::new("ETHApp", "0x2"));
        assert_eq!(replaced.map(|r| r.address), Some(String::from("0x1")));
        assert_eq!(registry.len(), 1);
    }
}
