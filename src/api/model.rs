// ABOUTME: Typed records for the Railway resources the promotion workflow touches.
// ABOUTME: Environments, service instances, triggers, deployments, and project tokens.

use crate::types::{
    DeploymentId, EnvironmentId, EnvironmentName, ProjectId, Secret, ServiceId,
    ServiceInstanceId, TokenId, TriggerId,
};
use std::fmt;

/// An environment with everything the workflow needs eagerly loaded.
#[derive(Debug, Clone, PartialEq)]
pub struct Environment {
    pub id: EnvironmentId,
    pub name: String,
    pub service_instances: Vec<ServiceInstance>,
    pub deployment_triggers: Vec<DeploymentTrigger>,
    /// Most recent first, as the API returns them.
    pub deployments: Vec<Deployment>,
}

impl Environment {
    pub fn is_named(&self, name: &EnvironmentName) -> bool {
        self.name == name.as_str()
    }

    /// The deployment whose status decides whether the environment has settled.
    pub fn latest_deployment(&self) -> Option<&Deployment> {
        self.deployments.first()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ServiceInstance {
    pub id: ServiceInstanceId,
    pub service_id: ServiceId,
    pub start_command: Option<String>,
    pub domains: Vec<Domain>,
}

impl ServiceInstance {
    /// The domain reported as the public address. Index 0 is canonical.
    pub fn primary_domain(&self) -> Option<&str> {
        self.domains.first().map(|d| d.domain.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Domain {
    pub domain: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Service {
    pub id: ServiceId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentTrigger {
    pub id: TriggerId,
    pub environment_id: EnvironmentId,
    pub branch: Option<String>,
    pub project_id: ProjectId,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deployment {
    pub id: DeploymentId,
    pub status: DeploymentStatus,
}

/// Deployment lifecycle status as reported by Railway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeploymentStatus {
    Queued,
    Initializing,
    Waiting,
    Building,
    Deploying,
    Success,
    Failed,
    /// Anything else (`CRASHED`, `REMOVED`, `SKIPPED`, ...), kept verbatim.
    Other(String),
}

impl DeploymentStatus {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "QUEUED" => DeploymentStatus::Queued,
            "INITIALIZING" => DeploymentStatus::Initializing,
            "WAITING" => DeploymentStatus::Waiting,
            "BUILDING" => DeploymentStatus::Building,
            "DEPLOYING" => DeploymentStatus::Deploying,
            "SUCCESS" => DeploymentStatus::Success,
            "FAILED" => DeploymentStatus::Failed,
            other => DeploymentStatus::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            DeploymentStatus::Queued => "QUEUED",
            DeploymentStatus::Initializing => "INITIALIZING",
            DeploymentStatus::Waiting => "WAITING",
            DeploymentStatus::Building => "BUILDING",
            DeploymentStatus::Deploying => "DEPLOYING",
            DeploymentStatus::Success => "SUCCESS",
            DeploymentStatus::Failed => "FAILED",
            DeploymentStatus::Other(raw) => raw,
        }
    }

    pub fn is_in_progress(&self) -> bool {
        matches!(
            self,
            DeploymentStatus::Queued
                | DeploymentStatus::Initializing
                | DeploymentStatus::Waiting
                | DeploymentStatus::Building
                | DeploymentStatus::Deploying
        )
    }
}

impl fmt::Display for DeploymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A project token as listed. The secret value is never returned by listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectToken {
    pub id: TokenId,
    pub name: String,
    /// `None` for tokens scoped to the whole project.
    pub environment_id: Option<EnvironmentId>,
}

/// A freshly created token. This is the only time its value is visible.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub name: String,
    pub environment_id: EnvironmentId,
    pub token: Secret,
}
