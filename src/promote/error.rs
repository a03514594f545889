// ABOUTME: Error types for the environment promotion workflow.
// ABOUTME: Covers resolution, integrity, deployment monitoring, and API failures.

use crate::api::{ApiError, ApiErrorKind};
use crate::types::{DeploymentId, EnvironmentId};
use std::time::Duration;

/// Fatal errors that abort a promotion run.
///
/// Failures of individual batch members are not errors at this level; they
/// are collected in a `BatchOutcome` and the run carries on.
#[derive(Debug, thiserror::Error)]
pub enum PromoteError {
    /// A remote call failed where the workflow cannot continue without it.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Source or destination could not be resolved.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A JSON input could not be parsed into the expected shape.
    #[error("invalid {input}: {message}")]
    InvalidInput {
        input: &'static str,
        message: String,
    },

    /// More than one environment carries the destination name.
    #[error(
        "found {} environments named '{name}' ({}); delete the duplicates via the Railway dashboard and retry",
        .ids.len(),
        join_ids(.ids)
    )]
    DuplicateEnvironment {
        name: String,
        ids: Vec<EnvironmentId>,
    },

    /// The reserved token name is held by a token bound somewhere else.
    #[error(
        "project token '{name}' ({token_id}) is bound to {}, expected environment {expected}; refusing to reuse or delete it",
        describe_binding(.bound_to.as_ref())
    )]
    TokenBoundElsewhere {
        name: String,
        token_id: String,
        bound_to: Option<EnvironmentId>,
        expected: EnvironmentId,
    },

    /// The watched deployment reported FAILED.
    #[error("deployment {deployment_id} failed; check the Railway dashboard for build logs")]
    DeploymentFailed { deployment_id: DeploymentId },

    /// The API answered with something the monitor cannot interpret.
    #[error("unexpected response: {0}")]
    UnexpectedResponse(String),

    /// The deployment did not reach a terminal status in time.
    #[error("deployment did not finish within {}ms", .0.as_millis())]
    MonitorTimeout(Duration),

    /// No service matched the domain rules and a domain is required.
    #[error("no service domain found in environment '{0}'")]
    MissingDomain(String),
}

/// Error kind for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromoteErrorKind {
    /// Network or authentication failure talking to the API.
    Transport,
    /// Missing, ambiguous, or malformed input.
    Configuration,
    /// Remote state breaks an invariant railyard relies on.
    IntegrityViolation,
    DeploymentFailed,
    UnexpectedResponse,
    MonitorTimeout,
    MissingDomain,
}

impl PromoteError {
    /// Returns the error kind for programmatic handling.
    pub fn kind(&self) -> PromoteErrorKind {
        match self {
            PromoteError::Api(err) => match err.kind() {
                ApiErrorKind::MalformedResponse => PromoteErrorKind::UnexpectedResponse,
                ApiErrorKind::Transport | ApiErrorKind::Unauthorized | ApiErrorKind::Remote => {
                    PromoteErrorKind::Transport
                }
            },
            PromoteError::Configuration(_) | PromoteError::InvalidInput { .. } => {
                PromoteErrorKind::Configuration
            }
            PromoteError::DuplicateEnvironment { .. } | PromoteError::TokenBoundElsewhere { .. } => {
                PromoteErrorKind::IntegrityViolation
            }
            PromoteError::DeploymentFailed { .. } => PromoteErrorKind::DeploymentFailed,
            PromoteError::UnexpectedResponse(_) => PromoteErrorKind::UnexpectedResponse,
            PromoteError::MonitorTimeout(_) => PromoteErrorKind::MonitorTimeout,
            PromoteError::MissingDomain(_) => PromoteErrorKind::MissingDomain,
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        PromoteError::Configuration(message.into())
    }
}

fn join_ids(ids: &[EnvironmentId]) -> String {
    ids.iter()
        .map(EnvironmentId::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

fn describe_binding(bound_to: Option<&EnvironmentId>) -> String {
    match bound_to {
        Some(id) => format!("environment {id}"),
        None => "the whole project".to_string(),
    }
}
