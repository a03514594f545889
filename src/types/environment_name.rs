// ABOUTME: Validated environment name used as the per-project uniqueness key.
// ABOUTME: Also derives the reserved project-token name for an environment.

use std::fmt;
use thiserror::Error;

/// Longest environment name Railway accepts in the dashboard.
pub const MAX_ENVIRONMENT_NAME_LEN: usize = 64;

/// Prefix for the project token railyard owns in each preview environment.
pub const TOKEN_NAME_PREFIX: &str = "railyard-";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EnvironmentNameError {
    #[error("environment name cannot be empty")]
    Empty,

    #[error("environment name exceeds maximum length of {MAX_ENVIRONMENT_NAME_LEN} characters")]
    TooLong,

    #[error("environment name cannot start or end with whitespace")]
    SurroundingWhitespace,

    #[error("invalid control character in environment name: {0:?}")]
    ControlChar(char),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EnvironmentName(String);

impl EnvironmentName {
    pub fn new(value: &str) -> Result<Self, EnvironmentNameError> {
        if value.is_empty() {
            return Err(EnvironmentNameError::Empty);
        }

        if value.chars().count() > MAX_ENVIRONMENT_NAME_LEN {
            return Err(EnvironmentNameError::TooLong);
        }

        if value.trim() != value {
            return Err(EnvironmentNameError::SurroundingWhitespace);
        }

        if let Some(c) = value.chars().find(|c| c.is_control()) {
            return Err(EnvironmentNameError::ControlChar(c));
        }

        Ok(Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Logical name of the project token bound to this environment.
    ///
    /// Deterministic so that a re-run finds and replaces the token a previous
    /// run created.
    pub fn token_name(&self) -> String {
        format!("{TOKEN_NAME_PREFIX}{}", self.0)
    }
}

impl fmt::Display for EnvironmentName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl PartialEq<str> for EnvironmentName {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for EnvironmentName {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}
