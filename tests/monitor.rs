// ABOUTME: Tests for the deployment monitor polling loop.
// ABOUTME: Runs on a paused clock so poll intervals and deadlines are exact.

mod support;

use railyard::promote::{DeploymentMonitor, MonitorState, MonitorTiming, PromoteError, PromoteErrorKind};
use railyard::types::{EnvironmentName, ProjectId};
use std::time::Duration;
use support::mock_platform::{MockPlatform, PROJECT};
use tokio::time::Instant;

fn platform_with(statuses: &[&str]) -> MockPlatform {
    let platform = MockPlatform::new();
    platform.add_environment("env-pr", "pr-42", &[("web", &[])]);
    platform.script_statuses("pr-42", statuses);
    platform
}

fn timing(max_timeout: Duration) -> MonitorTiming {
    MonitorTiming {
        poll_interval: Duration::from_secs(20),
        settle_delay: Duration::from_secs(15),
        max_timeout,
    }
}

#[tokio::test(start_paused = true)]
async fn waits_through_in_progress_statuses_until_success() {
    support::init_tracing();
    let platform = platform_with(&["QUEUED", "BUILDING", "SUCCESS"]);
    let project = ProjectId::new(PROJECT);
    let name = EnvironmentName::new("pr-42").unwrap();

    let started = Instant::now();
    let mut monitor = DeploymentMonitor::new(&platform, &project, &name, timing(Duration::from_secs(600)));
    monitor.watch().await.unwrap();

    assert_eq!(monitor.state(), MonitorState::Succeeded);
    assert_eq!(monitor.polls(), 3);
    assert_eq!(monitor.sleeps(), 2);
    let elapsed = started.elapsed();
    assert!(elapsed >= Duration::from_secs(40) && elapsed < Duration::from_secs(41), "{elapsed:?}");
}

#[tokio::test(start_paused = true)]
async fn failed_status_aborts_on_first_poll() {
    let platform = platform_with(&["FAILED"]);
    let project = ProjectId::new(PROJECT);
    let name = EnvironmentName::new("pr-42").unwrap();

    let mut monitor = DeploymentMonitor::new(&platform, &project, &name, timing(Duration::from_secs(600)));
    let err = monitor.watch().await.unwrap_err();

    assert!(matches!(err, PromoteError::DeploymentFailed { .. }));
    assert_eq!(monitor.state(), MonitorState::Failed);
    assert_eq!(monitor.polls(), 1);
    assert_eq!(monitor.sleeps(), 0);
}

#[tokio::test(start_paused = true)]
async fn never_terminal_deployment_times_out() {
    let platform = platform_with(&["BUILDING"]);
    let project = ProjectId::new(PROJECT);
    let name = EnvironmentName::new("pr-42").unwrap();

    let mut monitor = DeploymentMonitor::new(&platform, &project, &name, timing(Duration::from_secs(60)));
    let err = monitor.watch().await.unwrap_err();

    assert_eq!(err.kind(), PromoteErrorKind::MonitorTimeout);
    assert_eq!(monitor.state(), MonitorState::TimedOut);
    // Polls at 0s, 20s, 40s and 60s; the deadline is exceeded at 80s.
    assert_eq!(monitor.polls(), 4);
    assert!(err.to_string().contains("60000ms"));
}

#[tokio::test(start_paused = true)]
async fn unknown_status_is_an_unexpected_response() {
    let platform = platform_with(&["CRASHED"]);
    let project = ProjectId::new(PROJECT);
    let name = EnvironmentName::new("pr-42").unwrap();

    let mut monitor = DeploymentMonitor::new(&platform, &project, &name, timing(Duration::from_secs(600)));
    let err = monitor.watch().await.unwrap_err();

    assert_eq!(err.kind(), PromoteErrorKind::UnexpectedResponse);
    assert!(err.to_string().contains("CRASHED"));
    assert_eq!(monitor.polls(), 1);
}

#[tokio::test(start_paused = true)]
async fn environment_without_deployments_is_an_unexpected_response() {
    let platform = MockPlatform::new();
    platform.add_environment("env-pr", "pr-42", &[]);
    let project = ProjectId::new(PROJECT);
    let name = EnvironmentName::new("pr-42").unwrap();

    let mut monitor = DeploymentMonitor::new(&platform, &project, &name, timing(Duration::from_secs(600)));
    let err = monitor.watch().await.unwrap_err();

    assert_eq!(err.kind(), PromoteErrorKind::UnexpectedResponse);
}
