//! Configuration module for the channel configuration planner.
//!
//! This module handles all configuration-related functionality:
//! - Parsing and deserializing `channel-config.yaml`
//! - Capturing the environment snapshot the planner reads from
//! - Validation of configuration values
//! - Computing configuration and plan fingerprints

mod spec;
mod parser;
mod validator;
mod hash;

pub use spec::{ChannelConfig, ChannelLayout, ParameterNames, StateConfig, OPERATOR_ENV};
pub use parser::{ConfigParser, find_config_file, DEFAULT_CONFIG_FILES};
pub use validator::{ConfigValidator, ValidationError, ValidationResult};
pub use hash::ConfigHasher;
