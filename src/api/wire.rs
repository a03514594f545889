// ABOUTME: Raw GraphQL response shapes (edges/node connections) for Railway.
// ABOUTME: Decoded with serde, then flattened into the typed model records.

use super::model::{
    Deployment, DeploymentStatus, DeploymentTrigger, Domain, Environment, ProjectToken, Service,
    ServiceInstance,
};
use crate::types::{
    DeploymentId, EnvironmentId, ProjectId, ServiceId, ServiceInstanceId, TokenId, TriggerId,
};
use serde::Deserialize;

/// A Relay-style connection. Every connection the operations select is
/// required; an absent one is a decode failure, not an empty list.
#[derive(Debug, Deserialize)]
pub(crate) struct Connection<T> {
    edges: Vec<Edge<T>>,
}

#[derive(Debug, Deserialize)]
struct Edge<T> {
    node: T,
}

impl<T> Connection<T> {
    pub(crate) fn into_nodes(self) -> impl Iterator<Item = T> {
        self.edges.into_iter().map(|edge| edge.node)
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct EnvironmentsData {
    pub environments: Connection<EnvironmentNode>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct EnvironmentCreateData {
    pub environment_create: EnvironmentNode,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct EnvironmentNode {
    id: EnvironmentId,
    name: String,
    deployments: Connection<DeploymentNode>,
    deployment_triggers: Connection<TriggerNode>,
    service_instances: Connection<ServiceInstanceNode>,
}

#[derive(Debug, Deserialize)]
struct DeploymentNode {
    id: DeploymentId,
    status: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TriggerNode {
    id: TriggerId,
    environment_id: EnvironmentId,
    #[serde(default)]
    branch: Option<String>,
    project_id: ProjectId,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ServiceInstanceNode {
    id: ServiceInstanceId,
    service_id: ServiceId,
    #[serde(default)]
    start_command: Option<String>,
    domains: DomainsNode,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DomainsNode {
    service_domains: Vec<DomainNode>,
}

#[derive(Debug, Deserialize)]
struct DomainNode {
    domain: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ServiceData {
    pub service: ServiceNode,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ServiceNode {
    id: ServiceId,
    name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ProjectTokensData {
    pub project_tokens: Connection<TokenNode>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct TokenNode {
    id: TokenId,
    name: String,
    #[serde(default)]
    environment_id: Option<EnvironmentId>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ProjectTokenCreateData {
    pub project_token_create: String,
}

impl From<EnvironmentNode> for Environment {
    fn from(node: EnvironmentNode) -> Self {
        Environment {
            id: node.id,
            name: node.name,
            service_instances: node.service_instances.into_nodes().map(Into::into).collect(),
            deployment_triggers: node
                .deployment_triggers
                .into_nodes()
                .map(Into::into)
                .collect(),
            deployments: node.deployments.into_nodes().map(Into::into).collect(),
        }
    }
}

impl From<DeploymentNode> for Deployment {
    fn from(node: DeploymentNode) -> Self {
        Deployment {
            id: node.id,
            status: DeploymentStatus::parse(&node.status),
        }
    }
}

impl From<TriggerNode> for DeploymentTrigger {
    fn from(node: TriggerNode) -> Self {
        DeploymentTrigger {
            id: node.id,
            environment_id: node.environment_id,
            branch: node.branch,
            project_id: node.project_id,
        }
    }
}

impl From<ServiceInstanceNode> for ServiceInstance {
    fn from(node: ServiceInstanceNode) -> Self {
        ServiceInstance {
            id: node.id,
            service_id: node.service_id,
            start_command: node.start_command,
            domains: node
                .domains
                .service_domains
                .into_iter()
                .map(|d| Domain { domain: d.domain })
                .collect(),
        }
    }
}

impl From<ServiceNode> for Service {
    fn from(node: ServiceNode) -> Self {
        Service {
            id: node.id,
            name: node.name,
        }
    }
}

impl From<TokenNode> for ProjectToken {
    fn from(node: TokenNode) -> Self {
        ProjectToken {
            id: node.id,
            name: node.name,
            environment_id: node.environment_id,
        }
    }
}
