// ABOUTME: Capability trait implementations for RailwayClient.
// ABOUTME: Maps each trait method onto one GraphQL operation.

use super::client::RailwayClient;
use super::error::ApiError;
use super::model::{Environment, ProjectToken, Service};
use super::operations::{
    self, EnvironmentCreateInput, IdVars, InputVars, ProjectTokenCreateInput, ProjectVars,
    RedeployVars, TriggerUpdateInput, TriggerUpdateVars, VariableCollectionUpsertInput,
};
use super::traits::{EnvironmentOps, ServiceOps, TokenOps, TriggerOps, VariableOps};
use super::wire::{
    EnvironmentCreateData, EnvironmentsData, ProjectTokenCreateData, ProjectTokensData,
    ServiceData,
};
use crate::types::{
    EnvironmentId, EnvironmentName, ProjectId, Secret, ServiceId, TokenId, TriggerId,
};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::BTreeMap;

#[async_trait]
impl EnvironmentOps for RailwayClient {
    async fn list_environments(&self, project: &ProjectId) -> Result<Vec<Environment>, ApiError> {
        let data: EnvironmentsData = self
            .call(
                &operations::ENVIRONMENTS,
                &ProjectVars {
                    project_id: project,
                },
            )
            .await?;
        Ok(data.environments.into_nodes().map(Into::into).collect())
    }

    async fn create_environment(
        &self,
        project: &ProjectId,
        name: &EnvironmentName,
        source: &EnvironmentId,
    ) -> Result<Environment, ApiError> {
        let input = EnvironmentCreateInput {
            name: name.as_str(),
            project_id: project,
            source_environment_id: source,
        };
        let data: EnvironmentCreateData = self
            .call(&operations::ENVIRONMENT_CREATE, &InputVars { input })
            .await?;
        Ok(data.environment_create.into())
    }
}

#[async_trait]
impl ServiceOps for RailwayClient {
    async fn get_service(&self, id: &ServiceId) -> Result<Service, ApiError> {
        let data: ServiceData = self
            .call(&operations::SERVICE, &IdVars { id: id.as_str() })
            .await?;
        Ok(data.service.into())
    }

    async fn redeploy_service(
        &self,
        environment: &EnvironmentId,
        service: &ServiceId,
    ) -> Result<(), ApiError> {
        let vars = RedeployVars {
            environment_id: environment,
            service_id: service,
        };
        let _: Value = self
            .call(&operations::SERVICE_INSTANCE_REDEPLOY, &vars)
            .await?;
        Ok(())
    }
}

#[async_trait]
impl VariableOps for RailwayClient {
    async fn upsert_variables(
        &self,
        project: &ProjectId,
        environment: &EnvironmentId,
        service: &ServiceId,
        variables: &BTreeMap<String, String>,
    ) -> Result<(), ApiError> {
        let input = VariableCollectionUpsertInput {
            project_id: project,
            environment_id: environment,
            service_id: service,
            variables,
            replace: false,
        };
        let _: Value = self
            .call(&operations::VARIABLE_COLLECTION_UPSERT, &InputVars { input })
            .await?;
        Ok(())
    }
}

#[async_trait]
impl TriggerOps for RailwayClient {
    async fn update_trigger_branch(
        &self,
        trigger: &TriggerId,
        branch: &str,
    ) -> Result<(), ApiError> {
        let vars = TriggerUpdateVars {
            id: trigger,
            input: TriggerUpdateInput { branch },
        };
        let _: Value = self
            .call(&operations::DEPLOYMENT_TRIGGER_UPDATE, &vars)
            .await?;
        Ok(())
    }
}

#[async_trait]
impl TokenOps for RailwayClient {
    async fn list_project_tokens(
        &self,
        project: &ProjectId,
    ) -> Result<Vec<ProjectToken>, ApiError> {
        let data: ProjectTokensData = self
            .call(
                &operations::PROJECT_TOKENS,
                &ProjectVars {
                    project_id: project,
                },
            )
            .await?;
        Ok(data.project_tokens.into_nodes().map(Into::into).collect())
    }

    async fn create_project_token(
        &self,
        project: &ProjectId,
        environment: &EnvironmentId,
        name: &str,
    ) -> Result<Secret, ApiError> {
        let input = ProjectTokenCreateInput {
            project_id: project,
            environment_id: environment,
            name,
        };
        let data: ProjectTokenCreateData = self
            .call(&operations::PROJECT_TOKEN_CREATE, &InputVars { input })
            .await?;
        Ok(Secret::new(data.project_token_create))
    }

    async fn delete_project_token(&self, token: &TokenId) -> Result<(), ApiError> {
        let _: Value = self
            .call(
                &operations::PROJECT_TOKEN_DELETE,
                &IdVars {
                    id: token.as_str(),
                },
            )
            .await?;
        Ok(())
    }
}
