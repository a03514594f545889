// ABOUTME: Per-run inputs from flags or the CI environment, merged with the file config.
// ABOUTME: Produces the immutable PromotionConfig and the API client settings.

use super::FileConfig;
use crate::api::ClientConfig;
use crate::diagnostics::Warning;
use crate::error::{Error, Result};
use crate::promote::{DomainRules, EnvironmentSource, MonitorTiming, Variables};
use crate::types::{EnvironmentId, EnvironmentName, ProjectId, Secret};
use std::collections::BTreeSet;
use std::time::Duration;

/// Everything one promotion run needs to know. Built once, never mutated.
#[derive(Debug, Clone)]
pub struct PromotionConfig {
    pub project_id: ProjectId,
    pub destination: EnvironmentName,
    pub source: EnvironmentSource,
    pub variables: Variables,
    pub ignore_services: BTreeSet<String>,
    pub domain_rules: DomainRules,
    pub require_domain: bool,
    pub branch: String,
    pub timing: MonitorTiming,
}

/// Raw per-run inputs as the CI host hands them over.
///
/// CI systems pass unset inputs as empty strings, so blank values are treated
/// the same as missing ones.
#[derive(Debug, Clone, Default)]
pub struct PromotionInputs {
    pub api_token: Option<String>,
    pub project_id: Option<String>,
    pub src_env_name: Option<String>,
    pub src_env_id: Option<String>,
    pub dest_env_name: Option<String>,
    pub env_vars: Option<String>,
    /// JSON array of service names.
    pub ignore_services: Option<String>,
    pub api_service_name: Option<String>,
    pub branch: Option<String>,
    /// Milliseconds.
    pub max_timeout: Option<String>,
}

/// Validated settings for one run.
#[derive(Debug, Clone)]
pub struct Settings {
    pub client: ClientConfig,
    pub promotion: PromotionConfig,
    /// Inputs that were supplied but had no effect.
    pub notes: Vec<Warning>,
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn required<'a>(value: &'a Option<String>, input: &'static str) -> Result<&'a str> {
    present(value).ok_or(Error::MissingInput(input))
}

fn parse_environment_name(raw: &str, input: &'static str) -> Result<EnvironmentName> {
    EnvironmentName::new(raw).map_err(|e| Error::InvalidInput {
        input,
        message: e.to_string(),
    })
}

fn parse_service_list(raw: &str) -> Result<Vec<String>> {
    let names: Vec<String> = serde_json::from_str(raw).map_err(|e| Error::InvalidInput {
        input: "IGNORE_SERVICE_REDEPLOY",
        message: format!("expected a JSON array of service names: {e}"),
    })?;
    Ok(names
        .into_iter()
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty())
        .collect())
}

fn parse_timeout_ms(raw: &str) -> Result<Duration> {
    raw.parse::<u64>()
        .map(Duration::from_millis)
        .map_err(|_| Error::InvalidInput {
            input: "MAX_TIMEOUT",
            message: format!("expected a whole number of milliseconds, got '{raw}'"),
        })
}

impl Settings {
    /// Validate inputs and merge them over the file config.
    ///
    /// Every input is checked here, before any remote call is made. Flags win
    /// over the file, the file wins over built-in defaults.
    pub fn build(inputs: &PromotionInputs, file: &FileConfig) -> Result<Self> {
        let mut notes = Vec::new();

        let token = required(&inputs.api_token, "RAILWAY_API_TOKEN")?;
        let project_id = ProjectId::new(required(&inputs.project_id, "PROJECT_ID")?);
        let destination =
            parse_environment_name(required(&inputs.dest_env_name, "DEST_ENV_NAME")?, "DEST_ENV_NAME")?;
        let branch = required(&inputs.branch, "BRANCH_NAME")?.to_string();

        let source = match (present(&inputs.src_env_id), present(&inputs.src_env_name)) {
            (Some(id), name) => {
                if let Some(name) = name {
                    notes.push(Warning::ignored_input(format!(
                        "SRC_ENVIRONMENT_NAME '{name}' ignored because SRC_ENVIRONMENT_ID is set"
                    )));
                }
                EnvironmentSource::Id(EnvironmentId::new(id))
            }
            (None, Some(name)) => EnvironmentSource::Name(parse_environment_name(
                name,
                "SRC_ENVIRONMENT_NAME",
            )?),
            (None, None) => {
                return Err(Error::MissingInput(
                    "SRC_ENVIRONMENT_NAME or SRC_ENVIRONMENT_ID",
                ));
            }
        };

        let variables = Variables::parse(present(&inputs.env_vars).unwrap_or_default())?;

        let mut ignore_services: BTreeSet<String> = file.ignore_services.iter().cloned().collect();
        if let Some(raw) = present(&inputs.ignore_services) {
            ignore_services.extend(parse_service_list(raw)?);
        }

        let api_service = present(&inputs.api_service_name)
            .map(str::to_string)
            .or_else(|| file.api_service_name.clone());

        let mut timing = file.timing();
        if let Some(raw) = present(&inputs.max_timeout) {
            timing.max_timeout = parse_timeout_ms(raw)?;
        }

        let client = ClientConfig::new(Secret::new(token))
            .endpoint(file.endpoint.clone())
            .request_timeout(file.request_timeout);

        let promotion = PromotionConfig {
            project_id,
            destination,
            source,
            variables,
            ignore_services,
            domain_rules: DomainRules {
                api_service,
                fallbacks: file.domain_fallbacks.clone(),
            },
            require_domain: file.require_domain,
            branch,
            timing,
        };

        Ok(Settings {
            client,
            promotion,
            notes,
        })
    }
}
