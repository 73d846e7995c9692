//! Required parameter validation.

use std::collections::BTreeMap;

use tracing::debug;

use crate::error::PlanError;

/// An immutable snapshot of environment-supplied values.
pub type Environment = BTreeMap<String, String>;

/// Parameters that passed validation, keyed by name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidatedParameters {
    values: BTreeMap<String, String>,
}

impl ValidatedParameters {
    /// Returns the value of a validated parameter.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    /// Returns the value of a validated parameter, or the error a missing
    /// one would have raised.
    ///
    /// # Errors
    ///
    /// Returns `MissingParameter` if `name` was not part of validation.
    pub fn require(&self, name: &str) -> Result<&str, PlanError> {
        self.get(name)
            .ok_or_else(|| PlanError::missing_parameter(name))
    }

    /// Returns the number of validated parameters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if nothing was validated.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Checks that every required name is present in `env`.
///
/// Presence is key existence: empty strings and `"0"` are present. Names
/// are checked in order and the first missing one is reported.
///
/// # Errors
///
/// Returns `MissingParameter` naming the first absent key.
pub fn validate_parameters<S: AsRef<str>>(
    names: &[S],
    env: &Environment,
) -> Result<ValidatedParameters, PlanError> {
    let mut values = BTreeMap::new();

    for name in names {
        let name = name.as_ref();
        let Some(value) = env.get(name) else {
            debug!("Required parameter {name} is missing");
            return Err(PlanError::missing_parameter(name));
        };
        values.insert(name.to_string(), value.clone());
    }

    Ok(ValidatedParameters { values })
}
