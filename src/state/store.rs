//! State store trait definition.
//!
//! This module defines the common interface for completion state backends.

use async_trait::async_trait;

use crate::error::Result;
use super::types::CompletionState;

/// Trait for completion state backends.
#[async_trait]
pub trait StateStore: Send + Sync {
    /// Loads the completion state.
    ///
    /// Returns `None` if no state exists yet.
    async fn load(&self) -> Result<Option<CompletionState>>;

    /// Saves the completion state.
    async fn save(&self, state: &CompletionState) -> Result<()>;

    /// Deletes the completion state.
    async fn delete(&self) -> Result<()>;

    /// Checks if state exists.
    async fn exists(&self) -> Result<bool>;

    /// Gets the backend type name.
    fn backend_type(&self) -> &'static str;
}

#[async_trait]
impl StateStore for Box<dyn StateStore> {
    async fn load(&self) -> Result<Option<CompletionState>> {
        (**self).load().await
    }

    async fn save(&self, state: &CompletionState) -> Result<()> {
        (**self).save(state).await
    }

    async fn delete(&self) -> Result<()> {
        (**self).delete().await
    }

    async fn exists(&self) -> Result<bool> {
        (**self).exists().await
    }

    fn backend_type(&self) -> &'static str {
        (**self).backend_type()
    }
}
