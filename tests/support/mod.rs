// ABOUTME: Test support utilities.
// ABOUTME: Provides tracing setup and an in-memory Railway platform.

use std::sync::Once;

// Each test binary only uses some of these items, so allow dead_code.
#[allow(dead_code)]
pub mod mock_platform;

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for tests. Safe to call multiple times.
#[allow(dead_code)]
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::EnvFilter;
        let filter = EnvFilter::from_default_env().add_directive("railyard=debug".parse().unwrap());
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init()
            .ok();
    });
}

/// A promotion config against the mock project with default timing.
#[allow(dead_code)]
pub fn promotion_config(
    destination: &str,
    source: railyard::promote::EnvironmentSource,
) -> railyard::config::PromotionConfig {
    use railyard::promote::{DomainRules, MonitorTiming, Variables};
    use railyard::types::{EnvironmentName, ProjectId};

    railyard::config::PromotionConfig {
        project_id: ProjectId::new(mock_platform::PROJECT),
        destination: EnvironmentName::new(destination).unwrap(),
        source,
        variables: Variables::default(),
        ignore_services: Default::default(),
        domain_rules: DomainRules::default(),
        require_domain: false,
        branch: "feature/login".to_string(),
        timing: MonitorTiming::default(),
    }
}

/// Source given by name.
#[allow(dead_code)]
pub fn source_named(name: &str) -> railyard::promote::EnvironmentSource {
    railyard::promote::EnvironmentSource::Name(railyard::types::EnvironmentName::new(name).unwrap())
}
