//! Environment-driven defaults for clone options

use std::env;

use thiserror::Error;

/// Configuration errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("Invalid value for {field}: '{value}', expected {expected}")]
    InvalidValue {
        field: String,
        value: String,
        expected: String,
    },
}

/// Defaults applied to every clone built with `CloneOptions::from_config`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloneConfig {
    /// Allocate a fresh deduplication dictionary per clone
    pub use_dictionary: bool,
    /// Silently skip relationship names the model does not declare
    pub skip_missing_associations: bool,
    /// When false, copies are flagged to be saved without validations
    pub validate: bool,
}

impl Default for CloneConfig {
    fn default() -> Self {
        Self {
            use_dictionary: false,
            skip_missing_associations: false,
            validate: true,
        }
    }
}

impl CloneConfig {
    /// Load configuration from environment variables
    ///
    /// - `ELIF_CLONE_USE_DICTIONARY`
    /// - `ELIF_CLONE_SKIP_MISSING_ASSOCIATIONS`
    /// - `ELIF_CLONE_VALIDATE`
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        Ok(Self {
            use_dictionary: get_env_bool("ELIF_CLONE_USE_DICTIONARY", defaults.use_dictionary)?,
            skip_missing_associations: get_env_bool(
                "ELIF_CLONE_SKIP_MISSING_ASSOCIATIONS",
                defaults.skip_missing_associations,
            )?,
            validate: get_env_bool("ELIF_CLONE_VALIDATE", defaults.validate)?,
        })
    }
}

fn get_env_bool(key: &str, default: bool) -> Result<bool, ConfigError> {
    match env::var(key) {
        Ok(value) => parse_bool(key, &value),
        Err(_) => Ok(default),
    }
}

fn parse_bool(field: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            field: field.to_string(),
            value: value.to_string(),
            expected: "true/false, 1/0, yes/no or on/off".to_string(),
        }),
    }
}
