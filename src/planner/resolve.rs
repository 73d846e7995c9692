//! Deployment record resolution.

use std::collections::BTreeMap;

use tracing::debug;

use crate::error::PlanError;
use crate::registry::{DeploymentRecord, DeploymentRegistry};

/// Records resolved from a registry, keyed by name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedRecords {
    records: BTreeMap<String, DeploymentRecord>,
}

impl ResolvedRecords {
    /// Returns a resolved record.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&DeploymentRecord> {
        self.records.get(name)
    }

    /// Returns the address of a resolved record.
    ///
    /// # Errors
    ///
    /// Returns `UnresolvedRecord` if `name` was not resolved.
    pub fn address(&self, name: &str) -> Result<&str, PlanError> {
        self.get(name)
            .map(|r| r.address.as_str())
            .ok_or_else(|| PlanError::unresolved_record(name))
    }

    /// Returns the number of resolved records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if nothing was resolved.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Looks up every name in `registry`.
///
/// # Errors
///
/// Returns `UnresolvedRecord` naming the first absent record. No partial
/// result is returned.
pub fn resolve_records<S, R>(names: &[S], registry: &R) -> Result<ResolvedRecords, PlanError>
where
    S: AsRef<str>,
    R: DeploymentRegistry + ?Sized,
{
    let mut records = BTreeMap::new();

    for name in names {
        let name = name.as_ref();
        let Some(record) = registry.get(name) else {
            debug!("Deployment record {name} is not in the registry");
            return Err(PlanError::unresolved_record(name));
        };
        records.insert(name.to_string(), record);
    }

    Ok(ResolvedRecords { records })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::InMemoryRegistry;

    fn registry() -> InMemoryRegistry {
        InMemoryRegistry::from_records([
            DeploymentRecord::new("BasicInboundChannel", "0xB1"),
            DeploymentRecord::new("ETHApp", "0xAPP"),
        ])
    }

    #[test]
    fn test_resolve_present_records() {
        let resolved = resolve_records(&["ETHApp", "BasicInboundChannel"], &registry())
            .expect("should resolve");

        assert_eq!(resolved.len(), 2);
        assert_eq!(resolved.address("ETHApp"), Ok("0xAPP"));
        assert_eq!(resolved.address("BasicInboundChannel"), Ok("0xB1"));
    }

    #[test]
    fn test_missing_record_reports_name() {
        let result = resolve_records(
            &["BasicInboundChannel", "IncentivizedInboundChannel", "ETHApp"],
            &registry(),
        );

        assert_eq!(
            result,
            Err(PlanError::unresolved_record("IncentivizedInboundChannel"))
        );
    }

    #[test]
    fn test_address_of_unresolved_name() {
        let resolved = resolve_records(&["ETHApp"], &registry()).expect("should resolve");
        assert_eq!(
            resolved.address("BasicInboundChannel"),
            Err(PlanError::unresolved_record("BasicInboundChannel"))
        );
    }
}
