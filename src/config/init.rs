// ABOUTME: Config scaffolding for new repositories.
// ABOUTME: Creates a commented railyard.yml listing every setting with its default.

use std::path::Path;
use std::time::Duration;

use crate::error::{Error, Result};

use super::{CONFIG_FILENAME, FileConfig};

pub fn init_config(dir: &Path, force: bool) -> Result<()> {
    let config_path = dir.join(CONFIG_FILENAME);

    if config_path.exists() && !force {
        return Err(Error::AlreadyExists(config_path));
    }

    let yaml = generate_template_yaml(&FileConfig::default());
    std::fs::write(&config_path, yaml)?;

    Ok(())
}

fn generate_template_yaml(config: &FileConfig) -> String {
    format!(
        r#"# railyard settings. Per-run inputs (project, environments, branch,
# variables) come from flags or the CI environment, not from this file.
endpoint: {}
request_timeout: {}
# How often to re-check the deployment, and how long to wait in total.
poll_interval: {}
settle_delay: {}
max_timeout: {}
# Services that are never redeployed.
ignore_services: []
# Service whose first domain is reported as service_domain.
# api_service_name: api
domain_fallbacks: [{}]
# Fail the run when no service domain can be reported.
require_domain: {}
"#,
        config.endpoint,
        secs(config.request_timeout),
        secs(config.poll_interval),
        secs(config.settle_delay),
        secs(config.max_timeout),
        config.domain_fallbacks.join(", "),
        config.require_domain,
    )
}

fn secs(duration: Duration) -> String {
    format!("{}s", duration.as_secs())
}
