//! Loader for on-disk deployment artifacts.
//!
//! Artifacts follow the hardhat-deploy layout: one JSON file per deployed
//! contract under `<deployments_dir>/<network>/<RecordName>.json`, each with
//! at least an `address` field. Dot files such as `.chainId` are bookkeeping
//! and are skipped. An artifact that cannot be read or has no address is
//! left out of the snapshot; a lookup of that name then fails as unresolved.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tokio::fs;
use tracing::{debug, info, warn};

use crate::error::{RegistryError, Result};

use super::memory::InMemoryRegistry;
use super::record::DeploymentRecord;

/// Subset of an artifact file the loader reads.
#[derive(Debug, Deserialize)]
struct ArtifactFile {
    #[serde(default)]
    address: Option<String>,
}

/// Reads deployment artifacts into a registry snapshot.
#[derive(Debug, Clone)]
pub struct ArtifactLoader {
    /// Root deployments directory.
    deployments_dir: PathBuf,
}

impl ArtifactLoader {
    /// Creates a loader rooted at the given deployments directory.
    #[must_use]
    pub fn new(deployments_dir: impl Into<PathBuf>) -> Self {
        Self {
            deployments_dir: deployments_dir.into(),
        }
    }

    /// Returns the artifact directory for a network.
    #[must_use]
    pub fn network_dir(&self, network: &str) -> PathBuf {
        self.deployments_dir.join(network)
    }

    /// Loads every artifact of `network` into a registry snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if the network directory is missing or cannot be
    /// listed.
    pub async fn load(&self, network: &str) -> Result<InMemoryRegistry> {
        let dir = self.network_dir(network);
        info!("Loading deployment records from: {}", dir.display());

        if !dir.is_dir() {
            return Err(RegistryError::DirectoryNotFound { path: dir }.into());
        }

        let mut entries = fs::read_dir(&dir).await.map_err(|e| RegistryError::Unreadable {
            path: dir.clone(),
            message: e.to_string(),
        })?;

        let mut registry = InMemoryRegistry::new();

        while let Some(entry) = entries.next_entry().await.map_err(|e| RegistryError::Unreadable {
            path: dir.clone(),
            message: e.to_string(),
        })? {
            let path = entry.path();
            let Some(name) = artifact_name(&path) else {
                debug!("Skipping non-artifact file: {}", path.display());
                continue;
            };

            match Self::read_artifact(&path, name).await {
                Ok(record) => {
                    debug!("Loaded deployment record {record}");
                    registry.insert(record);
                }
                Err(e) => warn!("Skipping artifact {name}: {e}"),
            }
        }

        info!("Loaded {} deployment records for {network}", registry.len());
        debug!("Deployment records: {}", registry.names().join(", "));
        Ok(registry)
    }

    /// Reads a single artifact file.
    async fn read_artifact(path: &Path, name: &str) -> Result<DeploymentRecord> {
        let content = fs::read_to_string(path).await.map_err(|e| RegistryError::Unreadable {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        let artifact: ArtifactFile =
            serde_json::from_str(&content).map_err(|e| RegistryError::InvalidArtifact {
                path: path.to_path_buf(),
                message: format!("invalid JSON: {e}"),
            })?;

        match artifact.address {
            Some(address) if !address.is_empty() => Ok(DeploymentRecord::new(name, address)),
            _ => Err(RegistryError::InvalidArtifact {
                path: path.to_path_buf(),
                message: String::from("missing address"),
            }
            .into()),
        }
    }
}

/// Returns the record name for an artifact path, or `None` for files that
/// are not artifacts.
fn artifact_name(path: &Path) -> Option<&str> {
    if path.extension().and_then(|e| e.to_str()) != Some("json") {
        return None;
    }
    let stem = path.file_stem()?.to_str()?;
    if stem.is_empty() || stem.starts_with('.') {
        return None;
    }
    Some(stem)
}
