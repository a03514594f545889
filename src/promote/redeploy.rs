// ABOUTME: Chooses which services to redeploy and which domain to report.
// ABOUTME: Exclusion and domain selection are decided independently per service.

use super::batch::{BatchOutcome, fan_out};
use super::error::PromoteError;
use crate::api::{Service, ServiceInstance, ServiceOps};
use crate::types::{EnvironmentId, ServiceId};
use futures::future::join_all;
use std::collections::BTreeSet;

/// Service names tried, in order, when no override matches.
pub const DEFAULT_DOMAIN_FALLBACKS: [&str; 3] = ["app", "backend", "web"];

/// Rules for picking the service whose domain is reported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainRules {
    /// Preferred service name; beats every fallback.
    pub api_service: Option<String>,
    /// Conventional names, earlier entries win.
    pub fallbacks: Vec<String>,
}

impl Default for DomainRules {
    fn default() -> Self {
        Self {
            api_service: None,
            fallbacks: DEFAULT_DOMAIN_FALLBACKS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl DomainRules {
    /// Lower is better; `None` means the service is not a domain source.
    fn rank(&self, service_name: &str) -> Option<usize> {
        if self.api_service.as_deref() == Some(service_name) {
            return Some(0);
        }
        self.fallbacks
            .iter()
            .position(|name| name == service_name)
            .map(|i| i + 1)
    }
}

/// The domain reported for an environment and the service it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainSelection {
    pub service: String,
    pub domain: String,
}

/// Classification of every service in the environment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RedeployPlan {
    pub redeploy: Vec<ServiceId>,
    pub excluded: Vec<String>,
    pub domain: Option<DomainSelection>,
}

impl RedeployPlan {
    /// Classify resolved services. Pure; issues no calls.
    pub fn build(
        services: &[(&ServiceInstance, Service)],
        exclusions: &BTreeSet<String>,
        rules: &DomainRules,
    ) -> Self {
        let mut plan = RedeployPlan::default();
        let mut best: Option<(usize, DomainSelection)> = None;

        for (instance, service) in services {
            if exclusions.contains(&service.name) {
                plan.excluded.push(service.name.clone());
            } else {
                plan.redeploy.push(service.id.clone());
            }

            let (Some(rank), Some(domain)) = (rules.rank(&service.name), instance.primary_domain())
            else {
                continue;
            };
            if best.as_ref().is_none_or(|(current, _)| rank < *current) {
                best = Some((
                    rank,
                    DomainSelection {
                        service: service.name.clone(),
                        domain: domain.to_string(),
                    },
                ));
            }
        }

        plan.domain = best.map(|(_, selection)| selection);
        plan
    }
}

/// Result of the redeploy step.
#[derive(Debug)]
pub struct RedeployReport {
    pub plan: RedeployPlan,
    pub outcome: BatchOutcome<ServiceId>,
}

/// Resolve every instance's service, redeploy the non-excluded ones, and
/// pick the reported domain.
///
/// # Errors
///
/// Fails if any service lookup fails: classification would otherwise have to
/// guess. Redeploy failures are per-member and land in the outcome.
pub async fn coordinate_redeploys<A: ServiceOps>(
    api: &A,
    environment: &EnvironmentId,
    instances: &[ServiceInstance],
    exclusions: &BTreeSet<String>,
    rules: &DomainRules,
) -> Result<RedeployReport, PromoteError> {
    let lookups = join_all(
        instances
            .iter()
            .map(|instance| async move { (instance, api.get_service(&instance.service_id).await) }),
    )
    .await;

    let mut services = Vec::with_capacity(lookups.len());
    for (instance, lookup) in lookups {
        services.push((instance, lookup?));
    }

    let plan = RedeployPlan::build(&services, exclusions, rules);
    tracing::info!(
        redeploy = plan.redeploy.len(),
        excluded = ?plan.excluded,
        domain = plan.domain.as_ref().map(|d| d.domain.as_str()),
        "redeploying services"
    );

    let outcome = fan_out(plan.redeploy.clone(), |service| async move {
        api.redeploy_service(environment, &service).await
    })
    .await;

    Ok(RedeployReport { plan, outcome })
}
