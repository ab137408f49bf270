//! Form-wide validation settings.

use crate::validation::RequiredPolicy;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur when loading a [`FormConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid form configuration: {0}")]
    Parse(String),
}

/// Settings shared by every field of one form.
///
/// Missing keys take their defaults, so `{}` is a valid configuration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormConfig {
    /// What happens to a required field's other rules when it is empty.
    pub required_policy: RequiredPolicy,

    /// Count whitespace-only text as empty for the required check.
    pub treat_blank_as_empty: bool,
}

impl FormConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        serde_json::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }
}
