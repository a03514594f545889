// ABOUTME: GraphQL documents and variable shapes for every Railway operation used.
// ABOUTME: Each Operation pairs an operation name with its query or mutation text.

use crate::types::{EnvironmentId, ProjectId, ServiceId, TriggerId};
use serde::Serialize;
use std::collections::BTreeMap;

/// A named GraphQL document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Operation {
    pub name: &'static str,
    pub document: &'static str,
}

// Selections shared by the environment listing and environmentCreate.
macro_rules! environment_fields {
    () => {
        r#"
        id
        name
        deployments {
            edges { node { id status } }
        }
        deploymentTriggers {
            edges { node { id environmentId branch projectId } }
        }
        serviceInstances {
            edges {
                node {
                    id
                    serviceId
                    startCommand
                    domains { serviceDomains { domain } }
                }
            }
        }
        "#
    };
}

pub const ENVIRONMENTS: Operation = Operation {
    name: "environments",
    document: concat!(
        "query environments($projectId: String!) {\n",
        "  environments(projectId: $projectId) { edges { node {",
        environment_fields!(),
        "} } }\n}"
    ),
};

pub const ENVIRONMENT_CREATE: Operation = Operation {
    name: "environmentCreate",
    document: concat!(
        "mutation environmentCreate($input: EnvironmentCreateInput!) {\n",
        "  environmentCreate(input: $input) {",
        environment_fields!(),
        "}\n}"
    ),
};

pub const SERVICE: Operation = Operation {
    name: "service",
    document: "query service($id: String!) {\n  service(id: $id) { id name }\n}",
};

pub const PROJECT_TOKENS: Operation = Operation {
    name: "projectTokens",
    document: "query projectTokens($projectId: String!) {\n  \
               projectTokens(projectId: $projectId) { edges { node { id name environmentId } } }\n}",
};

pub const PROJECT_TOKEN_CREATE: Operation = Operation {
    name: "projectTokenCreate",
    document: "mutation projectTokenCreate($input: ProjectTokenCreateInput!) {\n  \
               projectTokenCreate(input: $input)\n}",
};

pub const PROJECT_TOKEN_DELETE: Operation = Operation {
    name: "projectTokenDelete",
    document: "mutation projectTokenDelete($id: String!) {\n  projectTokenDelete(id: $id)\n}",
};

pub const VARIABLE_COLLECTION_UPSERT: Operation = Operation {
    name: "variableCollectionUpsert",
    document: "mutation variableCollectionUpsert($input: VariableCollectionUpsertInput!) {\n  \
               variableCollectionUpsert(input: $input)\n}",
};

pub const DEPLOYMENT_TRIGGER_UPDATE: Operation = Operation {
    name: "deploymentTriggerUpdate",
    document: "mutation deploymentTriggerUpdate($id: String!, $input: DeploymentTriggerUpdateInput!) {\n  \
               deploymentTriggerUpdate(id: $id, input: $input) { id }\n}",
};

pub const SERVICE_INSTANCE_REDEPLOY: Operation = Operation {
    name: "serviceInstanceRedeploy",
    document: "mutation serviceInstanceRedeploy($environmentId: String!, $serviceId: String!) {\n  \
               serviceInstanceRedeploy(environmentId: $environmentId, serviceId: $serviceId)\n}",
};

// Variables

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectVars<'a> {
    pub project_id: &'a ProjectId,
}

#[derive(Debug, Serialize)]
pub struct IdVars<'a> {
    pub id: &'a str,
}

#[derive(Debug, Serialize)]
pub struct InputVars<T> {
    pub input: T,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvironmentCreateInput<'a> {
    pub name: &'a str,
    pub project_id: &'a ProjectId,
    pub source_environment_id: &'a EnvironmentId,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VariableCollectionUpsertInput<'a> {
    pub project_id: &'a ProjectId,
    pub environment_id: &'a EnvironmentId,
    pub service_id: &'a ServiceId,
    pub variables: &'a BTreeMap<String, String>,
    /// `false` keeps variables that are not part of this collection.
    pub replace: bool,
}

#[derive(Debug, Serialize)]
pub struct TriggerUpdateVars<'a> {
    pub id: &'a TriggerId,
    pub input: TriggerUpdateInput<'a>,
}

#[derive(Debug, Serialize)]
pub struct TriggerUpdateInput<'a> {
    pub branch: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RedeployVars<'a> {
    pub environment_id: &'a EnvironmentId,
    pub service_id: &'a ServiceId,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectTokenCreateInput<'a> {
    pub project_id: &'a ProjectId,
    pub environment_id: &'a EnvironmentId,
    pub name: &'a str,
}
