//! Configuration parser for loading configuration files and environment.
//!
//! This module loads `channel-config.yaml`, the optional `.env` file, and
//! captures the process environment once into an immutable snapshot that
//! the rest of the crate reads from.

use crate::error::{ChannelConfigError, ConfigError, PlanError, Result};
use crate::planner::Environment;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::spec::{ChannelConfig, OPERATOR_ENV};

/// Configuration parser for loading channel configuration.
#[derive(Debug, Default)]
pub struct ConfigParser {
    /// Base path for resolving relative paths.
    base_path: Option<PathBuf>,
}

impl ConfigParser {
    /// Creates a new configuration parser.
    #[must_use]
    pub const fn new() -> Self {
        Self { base_path: None }
    }

    /// Sets the base path for resolving relative paths.
    #[must_use]
    pub fn with_base_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.base_path = Some(path.into());
        self
    }

    /// Resolves a path from the configuration against the base path.
    #[must_use]
    pub fn resolve_path(&self, path: impl AsRef<Path>) -> PathBuf {
        let path = path.as_ref();
        match &self.base_path {
            Some(base) if path.is_relative() => base.join(path),
            _ => path.to_path_buf(),
        }
    }

    /// Loads configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_file(&self, path: impl AsRef<Path>) -> Result<ChannelConfig> {
        let path = path.as_ref();
        info!("Loading configuration from: {}", path.display());

        if !path.exists() {
            return Err(ChannelConfigError::Config(ConfigError::FileNotFound {
                path: path.to_path_buf(),
            }));
        }

        let content = std::fs::read_to_string(path).map_err(|e| {
            ChannelConfigError::Config(ConfigError::ParseError {
                message: format!("Failed to read file: {e}"),
                location: Some(path.display().to_string()),
            })
        })?;

        self.parse_yaml(&content, Some(path))
    }

    /// Parses configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML is invalid.
    pub fn parse_yaml(&self, content: &str, source: Option<&Path>) -> Result<ChannelConfig> {
        debug!("Parsing YAML configuration");

        let config: ChannelConfig = serde_yaml::from_str(content).map_err(|e| {
            let location = source.map(|p| p.display().to_string());
            ChannelConfigError::Config(ConfigError::ParseError {
                message: format!("YAML parse error: {e}"),
                location,
            })
        })?;

        debug!("Successfully parsed configuration for network: {}", config.network);
        Ok(config)
    }

    /// Loads configuration with overrides from an environment snapshot.
    ///
    /// Overrides are read from `CHANNEL_CONFIG_NETWORK`,
    /// `CHANNEL_CONFIG_DEPLOYMENTS_DIR` and `CHANNEL_CONFIG_OPERATOR`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_with_env(&self, path: impl AsRef<Path>, env: &Environment) -> Result<ChannelConfig> {
        let mut config = self.load_file(path)?;
        Self::apply_env_overrides(&mut config, env);
        Ok(config)
    }

    /// Applies environment overrides to the configuration.
    fn apply_env_overrides(config: &mut ChannelConfig, env: &Environment) {
        if let Some(network) = env.get("CHANNEL_CONFIG_NETWORK") {
            debug!("Overriding network from environment");
            config.network.clone_from(network);
        }

        if let Some(dir) = env.get("CHANNEL_CONFIG_DEPLOYMENTS_DIR") {
            debug!("Overriding deployments_dir from environment");
            config.deployments_dir.clone_from(dir);
        }

        if let Some(operator) = env.get("CHANNEL_CONFIG_OPERATOR") {
            debug!("Overriding operator from environment");
            config.operator = Some(operator.clone());
        }
    }

    /// Loads the .env file if present.
    ///
    /// # Errors
    ///
    /// Returns an error if the .env file exists but cannot be loaded.
    pub fn load_dotenv(&self) -> Result<()> {
        let env_path = self
            .base_path
            .as_ref()
            .map_or_else(|| PathBuf::from(".env"), |p| p.join(".env"));

        if env_path.exists() {
            info!("Loading environment from: {}", env_path.display());
            dotenvy::from_path(&env_path).map_err(|e| {
                ChannelConfigError::Config(ConfigError::ParseError {
                    message: format!("Failed to load .env file: {e}"),
                    location: Some(env_path.display().to_string()),
                })
            })?;
        } else {
            debug!(".env file not found at: {}", env_path.display());
        }

        Ok(())
    }

    /// Captures the process environment into an immutable snapshot.
    ///
    /// Variables whose name or value is not valid unicode are left out.
    #[must_use]
    pub fn environment_snapshot() -> Environment {
        std::env::vars_os()
            .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
            .collect()
    }

    /// Resolves the operator address from the configuration, falling back to
    /// `OPERATOR_ADDRESS` in the environment snapshot.
    ///
    /// # Errors
    ///
    /// Returns `MissingParameter` if neither provides an operator.
    pub fn resolve_operator(config: &ChannelConfig, env: &Environment) -> Result<String> {
        config
            .operator
            .clone()
            .or_else(|| env.get(OPERATOR_ENV).cloned())
            .ok_or_else(|| PlanError::missing_parameter(OPERATOR_ENV).into())
    }
}

/// Default configuration file names to search for.
pub const DEFAULT_CONFIG_FILES: &[&str] = &[
    "channel-config.yaml",
    "channel-config.yml",
];

/// Finds the configuration file in the given directory or its parents.
///
/// # Errors
///
/// Returns an error if no configuration file is found.
pub fn find_config_file(start_dir: impl AsRef<Path>) -> Result<PathBuf> {
    let start = start_dir.as_ref();
    let mut current = start.to_path_buf();

    loop {
        for filename in DEFAULT_CONFIG_FILES {
            let config_path = current.join(filename);
            if config_path.exists() {
                info!("Found configuration file: {}", config_path.display());
                return Ok(config_path);
            }
        }

        if !current.pop() {
            break;
        }
    }

    Err(ChannelConfigError::Config(ConfigError::FileNotFound {
        path: start.join(DEFAULT_CONFIG_FILES[0]),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_minimal_config() {
        let yaml = "network: local\n";
        let config = ConfigParser::new()
            .parse_yaml(yaml, None)
            .expect("minimal config should parse");

        assert_eq!(config, ChannelConfig::for_network("local"));
        assert_eq!(config.step_id, "configure-channels");
        assert_eq!(config.parameters.principal, "BASIC_CHANNEL_PRINCIPAL");
        assert_eq!(config.records.app, "ETHApp");
    }

    #[test]
    fn test_parse_full_config() {
        let yaml = r#"
network: sora-testnet
deployments_dir: build/deployments
operator: "0xOPERATOR"
step_id: configure-channels-v2
parameters:
  principal: PRINCIPAL
  fee: FEE
records:
  app: ERC20App
state:
  path: state/channels.json
"#;
        let config = ConfigParser::new()
            .parse_yaml(yaml, None)
            .expect("full config should parse");

        assert_eq!(config.network, "sora-testnet");
        assert_eq!(config.deployments_dir, "build/deployments");
        assert_eq!(config.operator.as_deref(), Some("0xOPERATOR"));
        assert_eq!(config.parameters.fee, "FEE");
        assert_eq!(config.records.app, "ERC20App");
        assert_eq!(config.records.basic_outbound, "BasicOutboundChannel");
        assert_eq!(config.state.path.as_deref(), Some("state/channels.json"));
    }

    #[test]
    fn test_parse_invalid_yaml() {
        let result = ConfigParser::new().parse_yaml("network: [", None);
        assert!(matches!(
            result,
            Err(ChannelConfigError::Config(ConfigError::ParseError { .. }))
        ));
    }

    #[test]
    fn test_env_overrides() {
        let mut config = ChannelConfig::for_network("local");
        let env = Environment::from([
            (String::from("CHANNEL_CONFIG_NETWORK"), String::from("mainnet")),
            (String::from("CHANNEL_CONFIG_OPERATOR"), String::from("0xOP")),
        ]);

        ConfigParser::apply_env_overrides(&mut config, &env);

        assert_eq!(config.network, "mainnet");
        assert_eq!(config.operator.as_deref(), Some("0xOP"));
        assert_eq!(config.deployments_dir, "deployments");
    }

    #[test]
    fn test_resolve_operator() {
        let mut config = ChannelConfig::for_network("local");
        let env = Environment::from([(String::from(OPERATOR_ENV), String::from("0xENV"))]);

        assert_eq!(
            ConfigParser::resolve_operator(&config, &env).expect("operator from env"),
            "0xENV"
        );

        config.operator = Some(String::from("0xFILE"));
        assert_eq!(
            ConfigParser::resolve_operator(&config, &env).expect("operator from file"),
            "0xFILE"
        );

        config.operator = None;
        let result = ConfigParser::resolve_operator(&config, &Environment::new());
        assert!(matches!(
            result,
            Err(ChannelConfigError::Plan(PlanError::MissingParameter { .. }))
        ));
    }

    #[test]
    fn test_find_config_in_parent() {
        let temp = TempDir::new().expect("Failed to create temp dir");
        std::fs::write(temp.path().join("channel-config.yaml"), "network: local\n")
            .expect("Failed to write config");
        let nested = temp.path().join("a").join("b");
        std::fs::create_dir_all(&nested).expect("Failed to create dirs");

        let found = find_config_file(&nested).expect("config should be found");
        assert_eq!(found, temp.path().join("channel-config.yaml"));
    }

    #[test]
    fn test_resolve_path() {
        let parser = ConfigParser::new().with_base_path("/srv/bridge");
        assert_eq!(
            parser.resolve_path("deployments"),
            PathBuf::from("/srv/bridge/deployments")
        );
        assert_eq!(parser.resolve_path("/abs"), PathBuf::from("/abs"));
    }
}
