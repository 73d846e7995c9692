//! Error types for the channel configuration planner.
//!
//! This module provides the error hierarchy for every stage of a
//! configuration run: loading configuration, reading deployment artifacts,
//! planning, executing invocations and persisting completion state.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for the channel configuration planner.
#[derive(Debug, Error)]
pub enum ChannelConfigError {
    /// Configuration-related errors.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Deployment registry errors.
    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),

    /// Planning errors.
    #[error("Planning error: {0}")]
    Plan(#[from] PlanError),

    /// Invocation execution errors.
    #[error("Execution error: {0}")]
    Execute(#[from] ExecuteError),

    /// Completion state errors.
    #[error("State error: {0}")]
    State(#[from] StateError),

    /// IO errors.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-related errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file was not found.
    #[error("Configuration file not found: {path}")]
    FileNotFound {
        /// Path to the missing file.
        path: PathBuf,
    },

    /// The configuration file could not be parsed.
    #[error("Failed to parse configuration: {message}")]
    ParseError {
        /// Description of the parse error.
        message: String,
        /// Optional source location.
        location: Option<String>,
    },

    /// Validation failed.
    #[error("Configuration validation failed: {message}")]
    ValidationError {
        /// Description of the validation error.
        message: String,
        /// Field that failed validation.
        field: Option<String>,
    },
}

/// Errors raised while loading deployment records.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// The artifact directory for the network does not exist.
    #[error("Deployment directory not found: {path}")]
    DirectoryNotFound {
        /// Path to the missing directory.
        path: PathBuf,
    },

    /// An artifact file could not be read.
    #[error("Failed to read deployment artifact {path}: {message}")]
    Unreadable {
        /// Path to the artifact.
        path: PathBuf,
        /// Underlying error.
        message: String,
    },

    /// An artifact file has no usable address.
    #[error("Deployment artifact {path} is invalid: {message}")]
    InvalidArtifact {
        /// Path to the artifact.
        path: PathBuf,
        /// Description of the problem.
        message: String,
    },
}

/// Planning errors.
///
/// Every planning failure is terminal for the attempt and is reported before
/// any invocation is issued.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PlanError {
    /// A required environment-supplied parameter is absent.
    #[error("Missing {name} in environment config")]
    MissingParameter {
        /// Name of the missing parameter.
        name: String,
    },

    /// A named prior deployment could not be found.
    #[error("Deployment record not found: {name}")]
    UnresolvedRecord {
        /// Name of the missing record.
        name: String,
    },
}

/// Errors raised while executing an invocation plan.
#[derive(Debug, Error)]
pub enum ExecuteError {
    /// A single invocation failed.
    #[error("Invocation {method} on {target} failed: {message}")]
    InvocationFailed {
        /// Target record name.
        target: String,
        /// Method that was invoked.
        method: String,
        /// Failure description.
        message: String,
    },

    /// Execution was aborted before completing.
    #[error("Execution aborted: {reason}")]
    Aborted {
        /// Reason for abort.
        reason: String,
    },
}

/// Completion state errors.
#[derive(Debug, Error)]
pub enum StateError {
    /// State is corrupted.
    #[error("State is corrupted: {message}")]
    Corrupted {
        /// Description of the corruption.
        message: String,
    },

    /// Serialization error.
    #[error("State serialization error: {message}")]
    SerializationError {
        /// Description of the serialization error.
        message: String,
    },

    /// The state file could not be written.
    #[error("Failed to write state: {message}")]
    WriteFailed {
        /// Description of the write failure.
        message: String,
    },

    /// State version mismatch.
    #[error("State version mismatch: expected {expected}, found {found}")]
    VersionMismatch {
        /// Expected state version.
        expected: String,
        /// Found state version.
        found: String,
    },
}

/// Result type alias for channel configuration operations.
pub type Result<T> = std::result::Result<T, ChannelConfigError>;

impl ChannelConfigError {
    /// Returns true if the failure happened before any invocation was issued.
    #[must_use]
    pub const fn is_pre_execution(&self) -> bool {
        matches!(
            self,
            Self::Config(_) | Self::Registry(_) | Self::Plan(_)
        )
    }
}

impl ConfigError {
    /// Creates a validation error for a specific field.
    #[must_use]
    pub fn validation(message: impl Into<String>, field: impl Into<String>) -> Self {
        Self::ValidationError {
            message: message.into(),
            field: Some(field.into()),
        }
    }
}

impl PlanError {
    /// Creates a missing parameter error.
    #[must_use]
    pub fn missing_parameter(name: impl Into<String>) -> Self {
        Self::MissingParameter { name: name.into() }
    }

    /// Creates an unresolved record error.
    #[must_use]
    pub fn unresolved_record(name: impl Into<String>) -> Self {
        Self::UnresolvedRecord { name: name.into() }
    }
}

impl StateError {
    /// Creates a serialization error with the given message.
    #[must_use]
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::SerializationError {
            message: message.into(),
        }
    }

    /// Creates a write error with the given message.
    #[must_use]
    pub fn write(message: impl Into<String>) -> Self {
        Self::WriteFailed {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_parameter_message_names_variable() {
        let err = PlanError::missing_parameter("INCENTIVIZED_CHANNEL_FEE");
        assert_eq!(
            err.to_string(),
            "Missing INCENTIVIZED_CHANNEL_FEE in environment config"
        );
    }

    #[test]
    fn test_plan_errors_are_pre_execution() {
        let err: ChannelConfigError = PlanError::unresolved_record("ETHApp").into();
        assert!(err.is_pre_execution());

        let err: ChannelConfigError = ExecuteError::Aborted {
            reason: String::from("interrupted"),
        }
        .into();
        assert!(!err.is_pre_execution());
    }
}
