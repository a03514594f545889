// ABOUTME: In-memory stand-in for the Railway API that records every call.
// ABOUTME: Supports scripted deployment statuses and per-member failure injection.

use async_trait::async_trait;
use parking_lot::Mutex;
use railyard::api::{
    ApiError, Deployment, DeploymentStatus, DeploymentTrigger, Domain, Environment,
    EnvironmentOps, ProjectToken, Service, ServiceInstance, ServiceOps, TokenOps, TriggerOps,
    VariableOps,
};
use railyard::types::{
    DeploymentId, EnvironmentId, EnvironmentName, ProjectId, Secret, ServiceId,
    ServiceInstanceId, TokenId, TriggerId,
};
use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};

pub const PROJECT: &str = "proj-1";

/// One recorded API call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    ListEnvironments,
    CreateEnvironment { name: String, source: String },
    GetService(String),
    Redeploy { environment: String, service: String },
    UpsertVariables { service: String, variables: BTreeMap<String, String> },
    UpdateTrigger { trigger: String, branch: String },
    ListTokens,
    CreateToken { environment: String, name: String },
    DeleteToken(String),
}

impl Call {
    pub fn is_mutation(&self) -> bool {
        !matches!(
            self,
            Call::ListEnvironments | Call::GetService(_) | Call::ListTokens
        )
    }
}

#[derive(Default)]
struct State {
    environments: Vec<Environment>,
    services: HashMap<ServiceId, Service>,
    /// Statuses served to successive listings of `status_target`; the last one sticks.
    statuses: VecDeque<DeploymentStatus>,
    status_target: Option<String>,
    tokens: Vec<ProjectToken>,
    next_id: u32,
    failing: HashSet<String>,
    calls: Vec<Call>,
}

impl State {
    fn next_id(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{prefix}-{}", self.next_id)
    }

    fn check(&self, member: &str, operation: &str) -> Result<(), ApiError> {
        if self.failing.contains(member) {
            Err(ApiError::remote(operation, format!("injected failure for {member}")))
        } else {
            Ok(())
        }
    }

    fn current_status(&mut self) -> Option<DeploymentStatus> {
        if self.statuses.len() > 1 {
            self.statuses.pop_front()
        } else {
            self.statuses.front().cloned()
        }
    }
}

#[derive(Default)]
pub struct MockPlatform {
    state: Mutex<State>,
}

impl MockPlatform {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an environment whose services are `(name, domains)` pairs.
    ///
    /// Service IDs are `svc-<name>`; each service gets a trigger
    /// `trg-<env>-<name>` bound to `main`.
    pub fn add_environment(&self, id: &str, name: &str, services: &[(&str, &[&str])]) {
        let mut state = self.state.lock();
        let env_id = EnvironmentId::new(id);
        let mut instances = Vec::new();
        let mut triggers = Vec::new();

        for (service, domains) in services {
            let service_id = ServiceId::new(format!("svc-{service}"));
            state.services.insert(
                service_id.clone(),
                Service {
                    id: service_id.clone(),
                    name: service.to_string(),
                },
            );
            instances.push(ServiceInstance {
                id: ServiceInstanceId::new(format!("si-{id}-{service}")),
                service_id,
                start_command: None,
                domains: domains
                    .iter()
                    .map(|d| Domain {
                        domain: d.to_string(),
                    })
                    .collect(),
            });
            triggers.push(DeploymentTrigger {
                id: TriggerId::new(format!("trg-{id}-{service}")),
                environment_id: env_id.clone(),
                branch: Some("main".to_string()),
                project_id: ProjectId::new(PROJECT),
            });
        }

        state.environments.push(Environment {
            id: env_id,
            name: name.to_string(),
            service_instances: instances,
            deployment_triggers: triggers,
            deployments: Vec::new(),
        });
    }

    /// Serve `statuses` as the latest deployment of the environment named
    /// `environment`, one per listing. The last status repeats forever.
    pub fn script_statuses(&self, environment: &str, statuses: &[&str]) {
        let mut state = self.state.lock();
        state.status_target = Some(environment.to_string());
        state.statuses = statuses.iter().map(|s| DeploymentStatus::parse(s)).collect();
    }

    /// Make every call concerning `member` (a service, trigger, or token ID) fail.
    pub fn fail_for(&self, member: &str) {
        self.state.lock().failing.insert(member.to_string());
    }

    pub fn add_token(&self, id: &str, name: &str, environment: Option<&str>) {
        self.state.lock().tokens.push(ProjectToken {
            id: TokenId::new(id),
            name: name.to_string(),
            environment_id: environment.map(EnvironmentId::new),
        });
    }

    pub fn tokens(&self) -> Vec<ProjectToken> {
        self.state.lock().tokens.clone()
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().calls.clone()
    }

    pub fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.state.lock().calls.iter().filter(|c| pred(c)).count()
    }

    pub fn position(&self, pred: impl Fn(&Call) -> bool) -> Option<usize> {
        self.state.lock().calls.iter().position(pred)
    }
}

#[async_trait]
impl EnvironmentOps for MockPlatform {
    async fn list_environments(&self, _project: &ProjectId) -> Result<Vec<Environment>, ApiError> {
        let mut state = self.state.lock();
        state.calls.push(Call::ListEnvironments);

        let target = state.status_target.clone();
        let present = target
            .as_deref()
            .is_some_and(|t| state.environments.iter().any(|e| e.name == t));
        if present && let Some(status) = state.current_status() {
            for env in &mut state.environments {
                if Some(env.name.as_str()) == target.as_deref() {
                    env.deployments = vec![Deployment {
                        id: DeploymentId::new(format!("dep-{}", env.id)),
                        status: status.clone(),
                    }];
                }
            }
        }

        Ok(state.environments.clone())
    }

    async fn create_environment(
        &self,
        _project: &ProjectId,
        name: &EnvironmentName,
        source: &EnvironmentId,
    ) -> Result<Environment, ApiError> {
        let mut state = self.state.lock();
        state.calls.push(Call::CreateEnvironment {
            name: name.to_string(),
            source: source.to_string(),
        });

        let id = EnvironmentId::new(state.next_id("env"));
        let template = state
            .environments
            .iter()
            .find(|e| &e.id == source)
            .cloned()
            .ok_or_else(|| ApiError::remote("environmentCreate", "source environment not found"))?;

        let environment = Environment {
            id: id.clone(),
            name: name.to_string(),
            service_instances: template
                .service_instances
                .iter()
                .map(|si| ServiceInstance {
                    id: ServiceInstanceId::new(format!("si-{id}-{}", si.service_id)),
                    ..si.clone()
                })
                .collect(),
            deployment_triggers: template
                .deployment_triggers
                .iter()
                .map(|t| DeploymentTrigger {
                    id: TriggerId::new(format!("trg-{id}-{}", t.id)),
                    environment_id: id.clone(),
                    ..t.clone()
                })
                .collect(),
            deployments: Vec::new(),
        };
        state.environments.push(environment.clone());
        Ok(environment)
    }
}

#[async_trait]
impl ServiceOps for MockPlatform {
    async fn get_service(&self, id: &ServiceId) -> Result<Service, ApiError> {
        let mut state = self.state.lock();
        state.calls.push(Call::GetService(id.to_string()));
        state.services.get(id).cloned().ok_or_else(|| {
            ApiError::remote("service", format!("service {id} not found"))
        })
    }

    async fn redeploy_service(
        &self,
        environment: &EnvironmentId,
        service: &ServiceId,
    ) -> Result<(), ApiError> {
        let mut state = self.state.lock();
        state.calls.push(Call::Redeploy {
            environment: environment.to_string(),
            service: service.to_string(),
        });
        state.check(service.as_str(), "serviceInstanceRedeploy")
    }
}

#[async_trait]
impl VariableOps for MockPlatform {
    async fn upsert_variables(
        &self,
        _project: &ProjectId,
        _environment: &EnvironmentId,
        service: &ServiceId,
        variables: &BTreeMap<String, String>,
    ) -> Result<(), ApiError> {
        let mut state = self.state.lock();
        state.calls.push(Call::UpsertVariables {
            service: service.to_string(),
            variables: variables.clone(),
        });
        state.check(service.as_str(), "variableCollectionUpsert")
    }
}

#[async_trait]
impl TriggerOps for MockPlatform {
    async fn update_trigger_branch(
        &self,
        trigger: &TriggerId,
        branch: &str,
    ) -> Result<(), ApiError> {
        let mut state = self.state.lock();
        state.calls.push(Call::UpdateTrigger {
            trigger: trigger.to_string(),
            branch: branch.to_string(),
        });
        state.check(trigger.as_str(), "deploymentTriggerUpdate")?;
        for env in &mut state.environments {
            for t in &mut env.deployment_triggers {
                if &t.id == trigger {
                    t.branch = Some(branch.to_string());
                }
            }
        }
        Ok(())
    }
}

#[async_trait]
impl TokenOps for MockPlatform {
    async fn list_project_tokens(
        &self,
        _project: &ProjectId,
    ) -> Result<Vec<ProjectToken>, ApiError> {
        let mut state = self.state.lock();
        state.calls.push(Call::ListTokens);
        Ok(state.tokens.clone())
    }

    async fn create_project_token(
        &self,
        _project: &ProjectId,
        environment: &EnvironmentId,
        name: &str,
    ) -> Result<Secret, ApiError> {
        let mut state = self.state.lock();
        state.calls.push(Call::CreateToken {
            environment: environment.to_string(),
            name: name.to_string(),
        });
        let id = state.next_id("tok");
        state.tokens.push(ProjectToken {
            id: TokenId::new(id.clone()),
            name: name.to_string(),
            environment_id: Some(environment.clone()),
        });
        Ok(Secret::new(format!("secret-{id}")))
    }

    async fn delete_project_token(&self, token: &TokenId) -> Result<(), ApiError> {
        let mut state = self.state.lock();
        state.calls.push(Call::DeleteToken(token.to_string()));
        state.check(token.as_str(), "projectTokenDelete")?;
        state.tokens.retain(|t| &t.id != token);
        Ok(())
    }
}
