// ABOUTME: Application-wide error types for railyard.
// ABOUTME: Uses thiserror for ergonomic error handling.

use crate::api::ApiError;
use crate::promote::PromoteError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("file already exists: {0}")]
    AlreadyExists(PathBuf),

    #[error("configuration file not found: {0}")]
    ConfigNotFound(PathBuf),

    #[error("missing required input: {0}")]
    MissingInput(&'static str),

    #[error("invalid {input}: {message}")]
    InvalidInput {
        input: &'static str,
        message: String,
    },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Promote(#[from] PromoteError),
}

pub type Result<T> = std::result::Result<T, Error>;
