// ABOUTME: The promotion workflow as a type-state machine over one environment.
// ABOUTME: Resolve, configure, settle, rebind, redeploy; each step consumes the last.

use super::credentials::rotate_token;
use super::error::{PromoteError, PromoteErrorKind};
use super::monitor::DeploymentMonitor;
use super::redeploy::coordinate_redeploys;
use super::resolver::{Resolution, resolve_environment};
use super::state::{Completed, Configured, Rebound, Resolved, Settled};
use super::triggers::rebind_triggers;
use super::variables::propagate_variables;
use crate::api::{
    Environment, EnvironmentOps, IssuedToken, PlatformApi, ServiceOps, TokenOps, TriggerOps,
    VariableOps,
};
use crate::config::PromotionConfig;
use crate::diagnostics::{Diagnostics, Warning};
use crate::types::EnvironmentId;

/// A promotion in progress, parameterized by its current state.
///
/// Trigger rebinding is only defined on `Promotion<Settled>`, and the only
/// way to reach `Settled` is a deployment monitor run that saw SUCCESS. The
/// required ordering is therefore checked by the compiler.
#[derive(Debug)]
pub struct Promotion<S> {
    pub(crate) environment: Environment,
    pub(crate) created: bool,
    pub(crate) state: S,
}

/// Everything a finished promotion hands back to the caller.
#[derive(Debug, Clone)]
pub struct PromotionReport {
    pub environment_id: EnvironmentId,
    pub environment_name: String,
    pub created: bool,
    pub service_domain: Option<String>,
    pub token: IssuedToken,
}

/// A run that stopped early, with the token it issued if it got that far.
///
/// Rotation deletes the previous token before the deployment is watched, so
/// a failure after `configure` must still hand the new one back.
#[derive(Debug, thiserror::Error)]
#[error("{error}")]
pub struct PromotionFailure {
    pub error: PromoteError,
    pub token: Option<IssuedToken>,
}

impl PromotionFailure {
    pub fn kind(&self) -> PromoteErrorKind {
        self.error.kind()
    }
}

impl From<PromoteError> for PromotionFailure {
    fn from(error: PromoteError) -> Self {
        Self { error, token: None }
    }
}

impl<S> Promotion<S> {
    fn transition<T>(self, state: T) -> Promotion<T> {
        Promotion {
            environment: self.environment,
            created: self.created,
            state,
        }
    }

    pub fn environment(&self) -> &Environment {
        &self.environment
    }

    /// Whether this run cloned the environment (as opposed to reusing it).
    pub fn created(&self) -> bool {
        self.created
    }
}

impl Promotion<Resolved> {
    /// Find or clone the destination environment.
    ///
    /// # Errors
    ///
    /// See [`resolve_environment`].
    pub async fn resolve<A: EnvironmentOps>(
        api: &A,
        config: &PromotionConfig,
    ) -> Result<Self, PromoteError> {
        let resolution =
            resolve_environment(api, &config.project_id, &config.destination, &config.source)
                .await?;
        Ok(Self::from(resolution))
    }

    /// Rotate the project token and propagate variables, concurrently.
    ///
    /// Failed variable upserts are recorded in `diag`; a failed rotation is
    /// fatal.
    #[must_use = "promotion state must be used"]
    pub async fn configure<A: VariableOps + TokenOps>(
        self,
        api: &A,
        config: &PromotionConfig,
        diag: &mut Diagnostics,
    ) -> Result<Promotion<Configured>, PromoteError> {
        let token_name = config.destination.token_name();

        let (token, upserts) = tokio::join!(
            rotate_token(api, &config.project_id, &self.environment.id, &token_name),
            propagate_variables(
                api,
                &config.project_id,
                &self.environment.id,
                &self.environment.service_instances,
                &config.variables,
            ),
        );

        upserts.report("variable upsert", diag);
        let token = token?;

        Ok(self.transition(Configured { token }))
    }
}

impl Promotion<Configured> {
    pub fn token(&self) -> &IssuedToken {
        &self.state.token
    }

    /// Wait for the environment's latest deployment to succeed.
    ///
    /// A freshly cloned environment gets `settle_delay` first so Railway has
    /// time to register the deployment it started on clone.
    #[must_use = "promotion state must be used"]
    pub async fn await_settled<A: EnvironmentOps>(
        self,
        api: &A,
        config: &PromotionConfig,
    ) -> Result<Promotion<Settled>, PromoteError> {
        if self.created && !config.timing.settle_delay.is_zero() {
            tracing::info!(
                wait_secs = config.timing.settle_delay.as_secs(),
                "waiting for initial deployment to register"
            );
            tokio::time::sleep(config.timing.settle_delay).await;
        }

        DeploymentMonitor::new(api, &config.project_id, &config.destination, config.timing)
            .watch()
            .await?;

        let token = self.state.token.clone();
        Ok(self.transition(Settled { token }))
    }
}

impl Promotion<Settled> {
    /// Point every deployment trigger at the configured branch.
    ///
    /// Individual failures are recorded in `diag`; this step never aborts.
    #[must_use = "promotion state must be used"]
    pub async fn rebind_triggers<A: TriggerOps>(
        self,
        api: &A,
        config: &PromotionConfig,
        diag: &mut Diagnostics,
    ) -> Promotion<Rebound> {
        let outcome =
            rebind_triggers(api, &self.environment.deployment_triggers, &config.branch).await;
        outcome.report("trigger rebind", diag);

        let token = self.state.token.clone();
        self.transition(Rebound { token })
    }
}

impl Promotion<Rebound> {
    /// Redeploy every non-excluded service and choose the reported domain.
    ///
    /// # Errors
    ///
    /// Fails if a service lookup fails, or if no domain was found while
    /// `require_domain` is set.
    #[must_use = "promotion state must be used"]
    pub async fn redeploy<A: ServiceOps>(
        self,
        api: &A,
        config: &PromotionConfig,
        diag: &mut Diagnostics,
    ) -> Result<Promotion<Completed>, PromoteError> {
        let report = coordinate_redeploys(
            api,
            &self.environment.id,
            &self.environment.service_instances,
            &config.ignore_services,
            &config.domain_rules,
        )
        .await?;
        report.outcome.report("redeploy", diag);

        let domain = report.plan.domain;
        if domain.is_none() {
            if config.require_domain {
                return Err(PromoteError::MissingDomain(self.environment.name.clone()));
            }
            diag.warn(Warning::missing_domain(format!(
                "no service in '{}' matched the domain rules; service_domain will be empty",
                self.environment.name
            )));
        }

        let token = self.state.token.clone();
        Ok(self.transition(Completed { token, domain }))
    }
}

impl Promotion<Completed> {
    pub fn domain(&self) -> Option<&str> {
        self.state.domain.as_ref().map(|d| d.domain.as_str())
    }

    pub fn token(&self) -> &IssuedToken {
        &self.state.token
    }

    pub fn finish(self) -> PromotionReport {
        PromotionReport {
            environment_id: self.environment.id,
            environment_name: self.environment.name,
            created: self.created,
            service_domain: self.state.domain.map(|d| d.domain),
            token: self.state.token,
        }
    }
}

impl From<Resolution> for Promotion<Resolved> {
    fn from(resolution: Resolution) -> Self {
        Promotion {
            environment: resolution.environment,
            created: resolution.created,
            state: Resolved,
        }
    }
}

/// Run every step in order.
///
/// # Errors
///
/// Any fatal step error. Once the token has been rotated, the failure
/// carries the newly issued token.
pub async fn promote<A: PlatformApi>(
    api: &A,
    config: &PromotionConfig,
    diag: &mut Diagnostics,
) -> Result<PromotionReport, PromotionFailure> {
    let promotion = Promotion::resolve(api, config).await?;
    let promotion = promotion.configure(api, config, diag).await?;

    let token = promotion.token().clone();
    let with_token = |error: PromoteError| PromotionFailure {
        error,
        token: Some(token.clone()),
    };

    let promotion = promotion
        .await_settled(api, config)
        .await
        .map_err(with_token)?;
    let promotion = promotion.rebind_triggers(api, config, diag).await;
    let promotion = promotion
        .redeploy(api, config, diag)
        .await
        .map_err(with_token)?;
    Ok(promotion.finish())
}
