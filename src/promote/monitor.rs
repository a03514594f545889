// ABOUTME: Bounded polling state machine over the destination's latest deployment.
// ABOUTME: Watches until SUCCESS, FAILED, an unknown status, or the deadline.

use super::error::PromoteError;
use crate::api::{Deployment, DeploymentStatus, EnvironmentOps};
use crate::types::{EnvironmentName, ProjectId};
use std::time::Duration;
use tokio::time::Instant;

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(20);
pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_secs(15);
pub const DEFAULT_MAX_TIMEOUT: Duration = Duration::from_millis(600_000);

/// Timing knobs for waiting on a deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonitorTiming {
    /// Sleep between polls while the deployment is in progress.
    pub poll_interval: Duration,
    /// Wait before the first poll of a freshly cloned environment, so the
    /// auto-created deployment shows up in the listing.
    pub settle_delay: Duration,
    /// Give up once this much time has passed since the first poll.
    pub max_timeout: Duration,
}

impl Default for MonitorTiming {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
            settle_delay: DEFAULT_SETTLE_DELAY,
            max_timeout: DEFAULT_MAX_TIMEOUT,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorState {
    Watching,
    Succeeded,
    Failed,
    TimedOut,
}

/// What one observed status means for the monitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Observation {
    Succeeded,
    Failed,
    InProgress,
    Unexpected,
}

impl Observation {
    pub fn of(status: &DeploymentStatus) -> Self {
        match status {
            DeploymentStatus::Success => Observation::Succeeded,
            DeploymentStatus::Failed => Observation::Failed,
            s if s.is_in_progress() => Observation::InProgress,
            _ => Observation::Unexpected,
        }
    }
}

/// Polls the environment listing until the latest deployment is terminal.
///
/// Railway only exposes deployment progress through status reads, so this
/// re-lists environments every `poll_interval`. Transport errors and
/// unrecognised responses end the watch immediately; nothing is retried.
pub struct DeploymentMonitor<'a, A> {
    api: &'a A,
    project: &'a ProjectId,
    environment: &'a EnvironmentName,
    timing: MonitorTiming,
    state: MonitorState,
    polls: u32,
    sleeps: u32,
}

impl<'a, A: EnvironmentOps> DeploymentMonitor<'a, A> {
    pub fn new(
        api: &'a A,
        project: &'a ProjectId,
        environment: &'a EnvironmentName,
        timing: MonitorTiming,
    ) -> Self {
        Self {
            api,
            project,
            environment,
            timing,
            state: MonitorState::Watching,
            polls: 0,
            sleeps: 0,
        }
    }

    pub fn state(&self) -> MonitorState {
        self.state
    }

    /// Number of status reads issued so far.
    pub fn polls(&self) -> u32 {
        self.polls
    }

    /// Number of poll-interval sleeps taken so far.
    pub fn sleeps(&self) -> u32 {
        self.sleeps
    }

    /// Watch until the latest deployment reaches a terminal status.
    ///
    /// # Errors
    ///
    /// - `DeploymentFailed` on a FAILED status.
    /// - `UnexpectedResponse` on an unknown status or a listing without the
    ///   environment or its deployment.
    /// - `MonitorTimeout` once `max_timeout` has elapsed.
    /// - `Api` if a status read fails.
    pub async fn watch(&mut self) -> Result<(), PromoteError> {
        let started = Instant::now();

        loop {
            if started.elapsed() > self.timing.max_timeout {
                self.state = MonitorState::TimedOut;
                tracing::warn!(
                    environment = %self.environment,
                    polls = self.polls,
                    "gave up waiting for deployment"
                );
                return Err(PromoteError::MonitorTimeout(self.timing.max_timeout));
            }

            let deployment = match self.latest_deployment().await {
                Ok(deployment) => deployment,
                Err(e) => {
                    self.state = MonitorState::Failed;
                    return Err(e);
                }
            };

            match Observation::of(&deployment.status) {
                Observation::Succeeded => {
                    self.state = MonitorState::Succeeded;
                    tracing::info!(deployment = %deployment.id, "deployment succeeded");
                    return Ok(());
                }
                Observation::Failed => {
                    self.state = MonitorState::Failed;
                    return Err(PromoteError::DeploymentFailed {
                        deployment_id: deployment.id,
                    });
                }
                Observation::InProgress => {
                    tracing::info!(
                        deployment = %deployment.id,
                        status = %deployment.status,
                        wait_secs = self.timing.poll_interval.as_secs(),
                        "deployment still in progress"
                    );
                    tokio::time::sleep(self.timing.poll_interval).await;
                    self.sleeps += 1;
                }
                Observation::Unexpected => {
                    self.state = MonitorState::Failed;
                    return Err(PromoteError::UnexpectedResponse(format!(
                        "unhandled status {} for deployment {}",
                        deployment.status, deployment.id
                    )));
                }
            }
        }
    }

    async fn latest_deployment(&mut self) -> Result<Deployment, PromoteError> {
        self.polls += 1;
        let environments = self.api.list_environments(self.project).await?;

        let environment = environments
            .into_iter()
            .find(|env| env.is_named(self.environment))
            .ok_or_else(|| {
                PromoteError::UnexpectedResponse(format!(
                    "environment '{}' missing from listing",
                    self.environment
                ))
            })?;

        environment
            .deployments
            .into_iter()
            .next()
            .ok_or_else(|| {
                PromoteError::UnexpectedResponse(format!(
                    "environment '{}' has no deployments",
                    self.environment
                ))
            })
    }
}
