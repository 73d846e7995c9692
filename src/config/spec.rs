//! Configuration specification types.
//!
//! These types define the structure of `channel-config.yaml`: which network
//! to read deployment records for, which environment keys carry the required
//! parameters, and which record names make up the channel layout.

use serde::{Deserialize, Serialize};

/// Root configuration structure for a channel configuration run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChannelConfig {
    /// Network whose deployment records are configured.
    pub network: String,
    /// Root directory of deployment artifacts.
    #[serde(default = "default_deployments_dir")]
    pub deployments_dir: String,
    /// Address of the invoking operator account.
    #[serde(default)]
    pub operator: Option<String>,
    /// Identifier of the run-once marker.
    #[serde(default = "default_step_id")]
    pub step_id: String,
    /// Environment keys of the required parameters.
    #[serde(default)]
    pub parameters: ParameterNames,
    /// Record names of the channel layout.
    #[serde(default)]
    pub records: ChannelLayout,
    /// Completion state configuration.
    #[serde(default)]
    pub state: StateConfig,
}

/// Environment keys of the required parameters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ParameterNames {
    /// Key of the basic channel principal.
    pub principal: String,
    /// Key of the incentivized channel fee.
    pub fee: String,
}

/// Record names resolved by the planner.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ChannelLayout {
    /// Basic inbound channel record.
    pub basic_inbound: String,
    /// Basic outbound channel record.
    pub basic_outbound: String,
    /// Incentivized inbound channel record.
    pub incentivized_inbound: String,
    /// Incentivized outbound channel record.
    pub incentivized_outbound: String,
    /// Application that sends messages through the channels.
    pub app: String,
}

/// Completion state configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct StateConfig {
    /// Path of the state file (defaults next to the config file).
    #[serde(default)]
    pub path: Option<String>,
}

/// Environment key consulted for the operator when the config has none.
pub const OPERATOR_ENV: &str = "OPERATOR_ADDRESS";

fn default_deployments_dir() -> String {
    String::from("deployments")
}

fn default_step_id() -> String {
    String::from("configure-channels")
}

impl Default for ParameterNames {
    fn default() -> Self {
        Self {
            principal: String::from("BASIC_CHANNEL_PRINCIPAL"),
            fee: String::from("INCENTIVIZED_CHANNEL_FEE"),
        }
    }
}

impl ParameterNames {
    /// Returns the keys in validation order.
    #[must_use]
    pub fn required(&self) -> [&str; 2] {
        [self.principal.as_str(), self.fee.as_str()]
    }
}

impl Default for ChannelLayout {
    fn default() -> Self {
        Self {
            basic_inbound: String::from("BasicInboundChannel"),
            basic_outbound: String::from("BasicOutboundChannel"),
            incentivized_inbound: String::from("IncentivizedInboundChannel"),
            incentivized_outbound: String::from("IncentivizedOutboundChannel"),
            app: String::from("ETHApp"),
        }
    }
}

impl ChannelLayout {
    /// Returns all record names in resolution order.
    #[must_use]
    pub fn record_names(&self) -> [&str; 5] {
        [
            self.basic_inbound.as_str(),
            self.basic_outbound.as_str(),
            self.incentivized_inbound.as_str(),
            self.incentivized_outbound.as_str(),
            self.app.as_str(),
        ]
    }
}

impl ChannelConfig {
    /// Creates a configuration for a network with all defaults applied.
    #[must_use]
    pub fn for_network(network: impl Into<String>) -> Self {
        Self {
            network: network.into(),
            deployments_dir: default_deployments_dir(),
            operator: None,
            step_id: default_step_id(),
            parameters: ParameterNames::default(),
            records: ChannelLayout::default(),
            state: StateConfig::default(),
        }
    }
}
