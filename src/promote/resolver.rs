// ABOUTME: Finds the destination environment or clones it from the source.
// ABOUTME: Enforces one environment per name before anything is mutated.

use super::error::PromoteError;
use crate::api::{Environment, EnvironmentOps};
use crate::types::{EnvironmentId, EnvironmentName, ProjectId};
use std::fmt;

/// Where a new preview environment is cloned from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnvironmentSource {
    /// Used verbatim, without checking it exists.
    Id(EnvironmentId),
    /// Must match exactly one environment in the project.
    Name(EnvironmentName),
}

impl fmt::Display for EnvironmentSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EnvironmentSource::Id(id) => write!(f, "environment id {id}"),
            EnvironmentSource::Name(name) => write!(f, "environment '{name}'"),
        }
    }
}

/// The destination environment and whether this run created it.
#[derive(Debug, Clone)]
pub struct Resolution {
    pub environment: Environment,
    pub created: bool,
}

/// Return the environment named `destination`, cloning it from `source` if
/// it does not exist.
///
/// # Errors
///
/// - `DuplicateEnvironment` if several environments share the destination name.
/// - `Configuration` if the source cannot be resolved to exactly one
///   environment, or if it is the destination itself.
///
/// Both are raised before the clone is issued.
pub async fn resolve_environment<A: EnvironmentOps>(
    api: &A,
    project: &ProjectId,
    destination: &EnvironmentName,
    source: &EnvironmentSource,
) -> Result<Resolution, PromoteError> {
    if let EnvironmentSource::Name(name) = source
        && name == destination
    {
        return Err(PromoteError::configuration(format!(
            "source and destination are both '{destination}'"
        )));
    }

    let environments = api.list_environments(project).await?;

    let mut matches: Vec<Environment> = environments
        .iter()
        .filter(|env| env.is_named(destination))
        .cloned()
        .collect();

    if matches.len() > 1 {
        return Err(PromoteError::DuplicateEnvironment {
            name: destination.to_string(),
            ids: matches.into_iter().map(|env| env.id).collect(),
        });
    }

    if let Some(existing) = matches.pop() {
        if let EnvironmentSource::Id(id) = source
            && &existing.id == id
        {
            return Err(PromoteError::configuration(format!(
                "destination '{destination}' is the source environment {id}"
            )));
        }

        tracing::info!(environment = %existing.id, name = %destination, "reusing existing environment");
        return Ok(Resolution {
            environment: existing,
            created: false,
        });
    }

    let source_id = source_environment_id(&environments, source)?;

    tracing::info!(name = %destination, source = %source_id, "cloning environment");
    let environment = api
        .create_environment(project, destination, &source_id)
        .await?;

    Ok(Resolution {
        environment,
        created: true,
    })
}

fn source_environment_id(
    environments: &[Environment],
    source: &EnvironmentSource,
) -> Result<EnvironmentId, PromoteError> {
    match source {
        EnvironmentSource::Id(id) => Ok(id.clone()),
        EnvironmentSource::Name(name) => {
            let candidates: Vec<&Environment> =
                environments.iter().filter(|env| env.is_named(name)).collect();
            match candidates.as_slice() {
                [single] => Ok(single.id.clone()),
                [] => Err(PromoteError::configuration(format!(
                    "source environment '{name}' not found"
                ))),
                several => Err(PromoteError::configuration(format!(
                    "source environment name '{name}' is ambiguous ({} matches)",
                    several.len()
                ))),
            }
        }
    }
}
