//! Configuration validation.
//!
//! Checks a loaded configuration for values that would make planning
//! meaningless (empty or duplicated record names, malformed environment
//! keys) before any artifact is read.

use crate::error::{ChannelConfigError, ConfigError, Result};
use std::collections::HashSet;
use tracing::debug;

use super::spec::{ChannelConfig, ChannelLayout, ParameterNames};

/// Validator for channel configurations.
#[derive(Debug, Default)]
pub struct ConfigValidator;

/// Validation result containing all errors found.
#[derive(Debug, Default)]
pub struct ValidationResult {
    /// List of validation errors.
    pub errors: Vec<ValidationError>,
    /// List of warnings (non-fatal issues).
    pub warnings: Vec<String>,
}

/// A single validation error.
#[derive(Debug)]
pub struct ValidationError {
    /// The field path that failed validation.
    pub field: String,
    /// The error message.
    pub message: String,
}

impl ConfigValidator {
    /// Creates a new validator.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Validates a channel configuration.
    ///
    /// # Errors
    ///
    /// Returns the first validation error if any was found.
    pub fn validate(&self, config: &ChannelConfig) -> Result<ValidationResult> {
        let result = self.check(config);

        if let Some(first_error) = result.errors.first() {
            return Err(ChannelConfigError::Config(ConfigError::validation(
                first_error.message.clone(),
                first_error.field.clone(),
            )));
        }

        debug!("Configuration validation passed");
        Ok(result)
    }

    /// Collects every error and warning without failing.
    #[must_use]
    pub fn check(&self, config: &ChannelConfig) -> ValidationResult {
        let mut result = ValidationResult::default();

        Self::validate_identity(config, &mut result);
        Self::validate_parameters(&config.parameters, &mut result);
        Self::validate_records(&config.records, &mut result);

        if config.operator.is_none() {
            result.warnings.push(String::from(
                "operator: not set, OPERATOR_ADDRESS must be provided by the environment",
            ));
        }

        result
    }

    /// Validates network, step id and paths.
    fn validate_identity(config: &ChannelConfig, result: &mut ValidationResult) {
        if config.network.is_empty() {
            result.error("network", "Network cannot be empty");
        } else if !is_valid_network(&config.network) {
            result.error(
                "network",
                format!(
                    "Network '{}' is invalid. Must be a single directory name.",
                    config.network
                ),
            );
        }

        if !is_valid_name(&config.step_id) {
            result.error(
                "step_id",
                format!(
                    "Step id '{}' is invalid. Must be lowercase alphanumeric with hyphens.",
                    config.step_id
                ),
            );
        }

        if config.deployments_dir.is_empty() {
            result.error("deployments_dir", "Deployments directory cannot be empty");
        }

        if let Some(operator) = &config.operator
            && operator.is_empty()
        {
            result.error("operator", "Operator address cannot be empty");
        }
    }

    /// Validates parameter environment keys.
    fn validate_parameters(parameters: &ParameterNames, result: &mut ValidationResult) {
        let keys = [
            ("parameters.principal", parameters.principal.as_str()),
            ("parameters.fee", parameters.fee.as_str()),
        ];

        for (field, key) in keys {
            if !is_valid_env_key(key) {
                result.error(
                    field,
                    format!("'{key}' is not a valid environment variable name"),
                );
            }
        }

        if parameters.principal == parameters.fee {
            result.error(
                "parameters.fee",
                format!("Principal and fee share the key '{}'", parameters.fee),
            );
        }
    }

    /// Validates record names.
    fn validate_records(layout: &ChannelLayout, result: &mut ValidationResult) {
        let fields = [
            "records.basic_inbound",
            "records.basic_outbound",
            "records.incentivized_inbound",
            "records.incentivized_outbound",
            "records.app",
        ];
        let mut seen = HashSet::new();

        for (field, name) in fields.into_iter().zip(layout.record_names()) {
            if name.is_empty() {
                result.error(field, "Record name cannot be empty");
            } else if !seen.insert(name) {
                result.error(field, format!("Duplicate record name: {name}"));
            }
        }
    }
}

impl ValidationResult {
    fn error(&mut self, field: &str, message: impl Into<String>) {
        self.errors.push(ValidationError {
            field: field.to_string(),
            message: message.into(),
        });
    }

    /// Returns true if validation passed (no errors).
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Names must be lowercase alphanumeric with single hyphens, starting with a
/// letter.
fn is_valid_name(name: &str) -> bool {
    let mut chars = name.chars();

    let Some(first) = chars.next() else {
        return false;
    };
    if !first.is_ascii_lowercase() {
        return false;
    }

    chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
        && !name.ends_with('-')
        && !name.contains("--")
}

/// Network names are directory names under the deployments directory, so
/// any case and underscores are allowed but path components are not.
fn is_valid_network(network: &str) -> bool {
    !network.is_empty()
        && network != "."
        && !network.contains("..")
        && !network.contains(['/', '\\'])
}

/// Environment keys: letters, digits and underscores, not starting with a
/// digit.
fn is_valid_env_key(key: &str) -> bool {
    !key.is_empty()
        && !key.starts_with(|c: char| c.is_ascii_digit())
        && key.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_name() {
        assert!(is_valid_name("configure-channels"));
        assert!(is_valid_name("sora-testnet-2"));
        assert!(is_valid_name("local"));
    }

    #[test]
    fn test_invalid_name() {
        assert!(!is_valid_name(""));
        assert!(!is_valid_name("Local"));
        assert!(!is_valid_name("2net"));
        assert!(!is_valid_name("sora_testnet"));
        assert!(!is_valid_name("net-"));
        assert!(!is_valid_name("sora--net"));
    }

    #[test]
    fn test_network_names() {
        assert!(is_valid_network("sora-testnet"));
        assert!(is_valid_network("arbitrumOne"));
        assert!(is_valid_network("bsc_testnet"));
        assert!(!is_valid_network(""));
        assert!(!is_valid_network("."));
        assert!(!is_valid_network(".."));
        assert!(!is_valid_network("../mainnet"));
        assert!(!is_valid_network("nested/net"));
        assert!(!is_valid_network("nested\\net"));
    }

    #[test]
    fn test_hardhat_network_names_validate() {
        for network in ["arbitrumOne", "bsc_testnet", "sora-testnet"] {
            let result = ConfigValidator::new().check(&ChannelConfig::for_network(network));
            assert!(result.is_valid(), "{network} should be accepted");
        }

        let result = ConfigValidator::new().check(&ChannelConfig::for_network("../prod"));
        assert_eq!(result.errors[0].field, "network");
    }

    #[test]
    fn test_env_key() {
        assert!(is_valid_env_key("BASIC_CHANNEL_PRINCIPAL"));
        assert!(is_valid_env_key("_fee1"));
        assert!(!is_valid_env_key(""));
        assert!(!is_valid_env_key("1FEE"));
        assert!(!is_valid_env_key("FEE-AMOUNT"));
    }

    #[test]
    fn test_default_config_is_valid() {
        let mut config = ChannelConfig::for_network("local");
        config.operator = Some(String::from("0xOP"));

        let result = ConfigValidator::new()
            .validate(&config)
            .expect("default config should validate");
        assert!(result.is_valid());
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_missing_operator_warns() {
        let result = ConfigValidator::new()
            .validate(&ChannelConfig::for_network("local"))
            .expect("config should validate");
        assert_eq!(result.warnings.len(), 1);
    }

    #[test]
    fn test_duplicate_record_names() {
        let mut config = ChannelConfig::for_network("local");
        config.records.app = String::from("BasicInboundChannel");

        let result = ConfigValidator::new().check(&config);
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].field, "records.app");

        assert!(matches!(
            ConfigValidator::new().validate(&config),
            Err(ChannelConfigError::Config(ConfigError::ValidationError { .. }))
        ));
    }

    #[test]
    fn test_shared_parameter_key() {
        let mut config = ChannelConfig::for_network("local");
        config.parameters.fee = config.parameters.principal.clone();

        let result = ConfigValidator::new().check(&config);
        assert!(!result.is_valid());
        assert_eq!(result.errors[0].field, "parameters.fee");
    }
}
