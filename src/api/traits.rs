// ABOUTME: Composable capability traits over the Railway control-plane API.
// ABOUTME: Each workflow step depends only on the operations it issues.

use super::error::ApiError;
use super::model::{Environment, ProjectToken, Service};
use crate::types::{
    EnvironmentId, EnvironmentName, ProjectId, Secret, ServiceId, TokenId, TriggerId,
};
use async_trait::async_trait;
use std::collections::BTreeMap;

/// Environment listing and cloning.
#[async_trait]
pub trait EnvironmentOps: Send + Sync {
    /// List every environment in the project, with service instances,
    /// deployments, and deployment triggers included.
    async fn list_environments(&self, project: &ProjectId) -> Result<Vec<Environment>, ApiError>;

    /// Clone `source` into a new environment called `name`.
    ///
    /// Railway starts a deployment for each cloned service as a side effect.
    async fn create_environment(
        &self,
        project: &ProjectId,
        name: &EnvironmentName,
        source: &EnvironmentId,
    ) -> Result<Environment, ApiError>;
}

/// Service lookup and redeploys.
#[async_trait]
pub trait ServiceOps: Send + Sync {
    async fn get_service(&self, id: &ServiceId) -> Result<Service, ApiError>;

    async fn redeploy_service(
        &self,
        environment: &EnvironmentId,
        service: &ServiceId,
    ) -> Result<(), ApiError>;
}

/// Service variables.
#[async_trait]
pub trait VariableOps: Send + Sync {
    /// Upsert `variables` on one service instance. Variables not named are kept.
    async fn upsert_variables(
        &self,
        project: &ProjectId,
        environment: &EnvironmentId,
        service: &ServiceId,
        variables: &BTreeMap<String, String>,
    ) -> Result<(), ApiError>;
}

/// Deployment trigger updates.
#[async_trait]
pub trait TriggerOps: Send + Sync {
    async fn update_trigger_branch(&self, trigger: &TriggerId, branch: &str)
    -> Result<(), ApiError>;
}

/// Project token management.
#[async_trait]
pub trait TokenOps: Send + Sync {
    async fn list_project_tokens(&self, project: &ProjectId)
    -> Result<Vec<ProjectToken>, ApiError>;

    /// Create a token bound to `environment`. The returned value is not
    /// retrievable again.
    async fn create_project_token(
        &self,
        project: &ProjectId,
        environment: &EnvironmentId,
        name: &str,
    ) -> Result<Secret, ApiError>;

    async fn delete_project_token(&self, token: &TokenId) -> Result<(), ApiError>;
}

/// Everything a full promotion run needs.
///
/// Implemented automatically for any type providing all capabilities.
pub trait PlatformApi: EnvironmentOps + ServiceOps + VariableOps + TriggerOps + TokenOps {}

impl<T> PlatformApi for T where T: EnvironmentOps + ServiceOps + VariableOps + TriggerOps + TokenOps
{}
