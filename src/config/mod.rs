// ABOUTME: Configuration types: the optional railyard.yml file and CI inputs.
// ABOUTME: Both merge into one immutable PromotionConfig handed to every step.

mod deserialize;
mod init;
mod promotion;

pub use init::init_config;
pub use promotion::{PromotionConfig, PromotionInputs, Settings};

use crate::api::{DEFAULT_ENDPOINT, DEFAULT_REQUEST_TIMEOUT};
use crate::error::{Error, Result};
use crate::promote::{
    DEFAULT_DOMAIN_FALLBACKS, DEFAULT_MAX_TIMEOUT, DEFAULT_POLL_INTERVAL, DEFAULT_SETTLE_DELAY,
    MonitorTiming,
};
use deserialize::deserialize_service_names;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

pub const CONFIG_FILENAME: &str = "railyard.yml";
pub const CONFIG_FILENAME_ALT: &str = "railyard.yaml";
pub const CONFIG_FILENAME_DIR: &str = ".railyard/config.yml";

/// Settings that rarely change between runs, read from `railyard.yml`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    #[serde(default = "default_request_timeout", with = "humantime_serde")]
    pub request_timeout: Duration,

    #[serde(default = "default_poll_interval", with = "humantime_serde")]
    pub poll_interval: Duration,

    #[serde(default = "default_settle_delay", with = "humantime_serde")]
    pub settle_delay: Duration,

    #[serde(default = "default_max_timeout", with = "humantime_serde")]
    pub max_timeout: Duration,

    #[serde(default, deserialize_with = "deserialize_service_names")]
    pub ignore_services: Vec<String>,

    #[serde(default)]
    pub api_service_name: Option<String>,

    #[serde(
        default = "default_domain_fallbacks",
        deserialize_with = "deserialize_service_names"
    )]
    pub domain_fallbacks: Vec<String>,

    #[serde(default)]
    pub require_domain: bool,
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_request_timeout() -> Duration {
    DEFAULT_REQUEST_TIMEOUT
}

fn default_poll_interval() -> Duration {
    DEFAULT_POLL_INTERVAL
}

fn default_settle_delay() -> Duration {
    DEFAULT_SETTLE_DELAY
}

fn default_max_timeout() -> Duration {
    DEFAULT_MAX_TIMEOUT
}

fn default_domain_fallbacks() -> Vec<String> {
    DEFAULT_DOMAIN_FALLBACKS
        .iter()
        .map(|s| s.to_string())
        .collect()
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            request_timeout: default_request_timeout(),
            poll_interval: default_poll_interval(),
            settle_delay: default_settle_delay(),
            max_timeout: default_max_timeout(),
            ignore_services: Vec::new(),
            api_service_name: None,
            domain_fallbacks: default_domain_fallbacks(),
            require_domain: false,
        }
    }
}

impl FileConfig {
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        // An empty file is a valid "all defaults" config.
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::ConfigNotFound(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Load the first config file found in `dir`, or defaults if there is none.
    pub fn discover(dir: &Path) -> Result<Self> {
        let candidates = [
            dir.join(CONFIG_FILENAME),
            dir.join(CONFIG_FILENAME_ALT),
            dir.join(CONFIG_FILENAME_DIR),
        ];

        for path in &candidates {
            if path.exists() {
                tracing::debug!(path = %path.display(), "loading config file");
                return Self::load(path);
            }
        }

        Ok(Self::default())
    }

    pub fn timing(&self) -> MonitorTiming {
        MonitorTiming {
            poll_interval: self.poll_interval,
            settle_delay: self.settle_delay,
            max_timeout: self.max_timeout,
        }
    }

    fn validate(&self) -> Result<()> {
        if self.poll_interval.is_zero() {
            return Err(Error::InvalidConfig(
                "poll_interval must be greater than zero".to_string(),
            ));
        }
        if !self.endpoint.starts_with("http://") && !self.endpoint.starts_with("https://") {
            return Err(Error::InvalidConfig(format!(
                "endpoint must be an http(s) URL, got '{}'",
                self.endpoint
            )));
        }
        Ok(())
    }
}
