// ABOUTME: End-to-end tests of the promotion workflow against the in-memory platform.
// ABOUTME: Checks step ordering, reuse, partial failures, and domain reporting.

mod support;

use railyard::diagnostics::{Diagnostics, WarningKind};
use railyard::promote::{
    Completed, Configured, PromoteError, PromoteErrorKind, Promotion, Rebound, Resolved, Settled,
    Variables, promote,
};
use std::time::Duration;
use support::mock_platform::{Call, MockPlatform};
use support::{promotion_config, source_named};
use tokio::time::Instant;

fn staging() -> MockPlatform {
    let platform = MockPlatform::new();
    platform.add_environment(
        "env-stg",
        "staging",
        &[("web", &["web-staging.up.railway.app"]), ("worker", &[])],
    );
    platform
}

// =============================================================================
// Type State Signatures
// =============================================================================

/// Test: every transition exists and returns the expected state type.
#[test]
fn transition_type_signatures_compile() {
    use railyard::api::PlatformApi;
    use railyard::config::PromotionConfig;
    use railyard::promote::PromotionReport;

    // Never called; it only has to compile.
    #[allow(dead_code)]
    async fn check_signatures<A: PlatformApi>(api: &A, config: &PromotionConfig) {
        let mut diag = Diagnostics::default();

        let p1: Result<Promotion<Resolved>, PromoteError> = Promotion::resolve(api, config).await;
        let p2: Result<Promotion<Configured>, PromoteError> =
            p1.unwrap().configure(api, config, &mut diag).await;
        let p3: Result<Promotion<Settled>, PromoteError> =
            p2.unwrap().await_settled(api, config).await;
        // Rebinding cannot fail the run.
        let p4: Promotion<Rebound> = p3.unwrap().rebind_triggers(api, config, &mut diag).await;
        let p5: Result<Promotion<Completed>, PromoteError> =
            p4.redeploy(api, config, &mut diag).await;
        let _report: PromotionReport = p5.unwrap().finish();
    }
}

// =============================================================================
// Full Runs
// =============================================================================

#[tokio::test(start_paused = true)]
async fn fresh_environment_is_cloned_configured_and_redeployed() {
    support::init_tracing();
    let platform = staging();
    platform.script_statuses("pr-42", &["QUEUED", "BUILDING", "SUCCESS"]);
    let mut config = promotion_config("pr-42", source_named("staging"));
    config.variables = Variables::parse(r#"{"PR_NUMBER": 42}"#).unwrap();
    let mut diag = Diagnostics::default();

    let report = promote(&platform, &config, &mut diag).await.unwrap();

    assert!(report.created);
    assert_eq!(report.environment_name, "pr-42");
    assert_eq!(report.service_domain.as_deref(), Some("web-staging.up.railway.app"));
    assert_eq!(report.token.name, "railyard-pr-42");
    assert!(!diag.has_warnings());

    assert_eq!(platform.count(|c| matches!(c, Call::CreateEnvironment { .. })), 1);
    assert_eq!(platform.count(|c| matches!(c, Call::UpsertVariables { .. })), 2);
    assert_eq!(platform.count(|c| matches!(c, Call::CreateToken { .. })), 1);
    assert_eq!(platform.count(|c| matches!(c, Call::UpdateTrigger { .. })), 2);
    assert_eq!(platform.count(|c| matches!(c, Call::Redeploy { .. })), 2);
}

#[tokio::test(start_paused = true)]
async fn triggers_are_rebound_only_after_the_deployment_succeeds() {
    let platform = staging();
    platform.script_statuses("pr-42", &["BUILDING", "DEPLOYING", "SUCCESS"]);
    let config = promotion_config("pr-42", source_named("staging"));

    promote(&platform, &config, &mut Diagnostics::default()).await.unwrap();

    let calls = platform.calls();
    let last_poll = calls
        .iter()
        .rposition(|c| matches!(c, Call::ListEnvironments))
        .unwrap();
    let first_rebind = platform
        .position(|c| matches!(c, Call::UpdateTrigger { .. }))
        .unwrap();
    assert!(last_poll < first_rebind, "{calls:#?}");

    // One listing to resolve, three polls to reach SUCCESS.
    assert_eq!(platform.count(|c| matches!(c, Call::ListEnvironments)), 4);
    let first_redeploy = platform
        .position(|c| matches!(c, Call::Redeploy { .. }))
        .unwrap();
    assert!(first_rebind < first_redeploy);
}

#[tokio::test(start_paused = true)]
async fn failed_deployment_leaves_triggers_and_services_untouched() {
    let platform = staging();
    platform.script_statuses("pr-42", &["BUILDING", "FAILED"]);
    let config = promotion_config("pr-42", source_named("staging"));

    let err = promote(&platform, &config, &mut Diagnostics::default())
        .await
        .unwrap_err();

    assert_eq!(err.kind(), PromoteErrorKind::DeploymentFailed);
    assert_eq!(platform.count(|c| matches!(c, Call::UpdateTrigger { .. })), 0);
    assert_eq!(platform.count(|c| matches!(c, Call::Redeploy { .. })), 0);
}

#[tokio::test(start_paused = true)]
async fn failed_deployment_still_hands_back_the_rotated_token() {
    let platform = staging();
    platform.add_environment("env-pr", "pr-42", &[("web", &[])]);
    platform.add_token("tok-old", "railyard-pr-42", Some("env-pr"));
    platform.script_statuses("pr-42", &["FAILED"]);
    let config = promotion_config("pr-42", source_named("staging"));

    let failure = promote(&platform, &config, &mut Diagnostics::default())
        .await
        .unwrap_err();

    assert_eq!(failure.kind(), PromoteErrorKind::DeploymentFailed);
    let token = failure.token.expect("rotated token is returned with the error");
    assert_eq!(token.name, "railyard-pr-42");

    // The old token is gone and the only remaining one is the one handed back.
    let remaining = platform.tokens();
    assert_eq!(remaining.len(), 1);
    assert_ne!(remaining[0].id.as_str(), "tok-old");
    assert_eq!(token.token.expose(), format!("secret-{}", remaining[0].id));
}

#[tokio::test(start_paused = true)]
async fn failure_before_rotation_carries_no_token() {
    let platform = MockPlatform::new();
    let config = promotion_config("pr-42", source_named("staging"));

    let failure = promote(&platform, &config, &mut Diagnostics::default())
        .await
        .unwrap_err();

    assert_eq!(failure.kind(), PromoteErrorKind::Configuration);
    assert!(failure.token.is_none());
    assert_eq!(platform.count(|c| matches!(c, Call::CreateToken { .. })), 0);
}

#[tokio::test(start_paused = true)]
async fn existing_environment_is_reused_and_still_monitored() {
    let platform = staging();
    platform.add_environment("env-pr", "pr-42", &[("web", &["pr-42.up.railway.app"])]);
    platform.add_token("tok-old", "railyard-pr-42", Some("env-pr"));
    platform.script_statuses("pr-42", &["SUCCESS"]);
    let config = promotion_config("pr-42", source_named("staging"));

    let started = Instant::now();
    let report = promote(&platform, &config, &mut Diagnostics::default())
        .await
        .unwrap();

    assert!(!report.created);
    assert_eq!(report.service_domain.as_deref(), Some("pr-42.up.railway.app"));
    assert_eq!(platform.count(|c| matches!(c, Call::CreateEnvironment { .. })), 0);
    assert_eq!(platform.count(|c| matches!(c, Call::DeleteToken(id) if id == "tok-old")), 1);
    assert_eq!(platform.tokens().len(), 1);
    // No settle delay for a reused environment.
    assert!(started.elapsed() < Duration::from_secs(15));
}

#[tokio::test(start_paused = true)]
async fn fresh_environment_waits_for_the_settle_delay() {
    let platform = staging();
    platform.script_statuses("pr-42", &["SUCCESS"]);
    let config = promotion_config("pr-42", source_named("staging"));

    let started = Instant::now();
    promote(&platform, &config, &mut Diagnostics::default())
        .await
        .unwrap();

    assert!(started.elapsed() >= Duration::from_secs(15));
}

#[tokio::test(start_paused = true)]
async fn partial_failures_become_warnings() {
    let platform = staging();
    platform.fail_for("svc-worker");
    platform.script_statuses("pr-42", &["SUCCESS"]);
    let mut config = promotion_config("pr-42", source_named("staging"));
    config.variables = Variables::parse(r#"{"PREVIEW": "1"}"#).unwrap();
    let mut diag = Diagnostics::default();

    let report = promote(&platform, &config, &mut diag).await.unwrap();

    // Upsert and redeploy both failed for worker.
    assert_eq!(diag.count(WarningKind::PartialBatch), 2);
    assert!(report.service_domain.is_some());
}

#[tokio::test(start_paused = true)]
async fn missing_domain_is_a_warning_by_default() {
    let platform = MockPlatform::new();
    platform.add_environment("env-stg", "staging", &[("worker", &["worker.up.railway.app"])]);
    platform.script_statuses("pr-42", &["SUCCESS"]);
    let config = promotion_config("pr-42", source_named("staging"));
    let mut diag = Diagnostics::default();

    let report = promote(&platform, &config, &mut diag).await.unwrap();

    assert_eq!(report.service_domain, None);
    assert_eq!(diag.count(WarningKind::MissingDomain), 1);
}

#[tokio::test(start_paused = true)]
async fn missing_domain_fails_when_required() {
    let platform = MockPlatform::new();
    platform.add_environment("env-stg", "staging", &[("worker", &[])]);
    platform.script_statuses("pr-42", &["SUCCESS"]);
    let mut config = promotion_config("pr-42", source_named("staging"));
    config.require_domain = true;

    let err = promote(&platform, &config, &mut Diagnostics::default())
        .await
        .unwrap_err();

    assert_eq!(err.kind(), PromoteErrorKind::MissingDomain);
}

#[tokio::test(start_paused = true)]
async fn duplicate_destination_stops_before_any_mutation() {
    let platform = staging();
    platform.add_environment("env-a", "pr-42", &[]);
    platform.add_environment("env-b", "pr-42", &[]);
    let config = promotion_config("pr-42", source_named("staging"));

    let err = promote(&platform, &config, &mut Diagnostics::default())
        .await
        .unwrap_err();

    assert_eq!(err.kind(), PromoteErrorKind::IntegrityViolation);
    assert_eq!(platform.count(Call::is_mutation), 0);
}
