// ABOUTME: Command-line interface definition using clap derive macros.
// ABOUTME: Every promote input can also come from the CI environment.

use clap::{Args, Parser, Subcommand};
use railyard::config::PromotionInputs;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "railyard")]
#[command(about = "Ephemeral preview environments for Railway projects")]
#[command(version)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only print the final result
    #[arg(short, long, global = true, conflicts_with = "json")]
    pub quiet: bool,

    /// Print JSON lines instead of text
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a railyard.yml template to the current directory
    Init {
        /// Overwrite an existing railyard.yml
        #[arg(short, long)]
        force: bool,
    },

    /// Create or reuse a preview environment and deploy a branch to it
    Promote(PromoteArgs),
}

#[derive(Args)]
pub struct PromoteArgs {
    /// Railway API token
    #[arg(long, env = "RAILWAY_API_TOKEN", hide_env_values = true)]
    pub api_token: Option<String>,

    /// Railway project ID
    #[arg(long, env = "PROJECT_ID")]
    pub project_id: Option<String>,

    /// Environment to clone from, by name
    #[arg(long, env = "SRC_ENVIRONMENT_NAME")]
    pub src_env_name: Option<String>,

    /// Environment to clone from, by ID (wins over the name)
    #[arg(long, env = "SRC_ENVIRONMENT_ID")]
    pub src_env_id: Option<String>,

    /// Name of the preview environment
    #[arg(long, env = "DEST_ENV_NAME")]
    pub dest_env_name: Option<String>,

    /// JSON object of variables to set on every service
    #[arg(long, env = "ENV_VARS")]
    pub env_vars: Option<String>,

    /// JSON array of service names that are not redeployed
    #[arg(long, env = "IGNORE_SERVICE_REDEPLOY")]
    pub ignore_services: Option<String>,

    /// Service whose domain is reported as service_domain
    #[arg(long, env = "API_SERVICE_NAME")]
    pub api_service_name: Option<String>,

    /// Branch the deployment triggers should follow
    #[arg(long, env = "BRANCH_NAME")]
    pub branch: Option<String>,

    /// Maximum time to wait for the deployment, in milliseconds
    #[arg(long, env = "MAX_TIMEOUT")]
    pub max_timeout: Option<String>,

    /// Config file (default: discover railyard.yml)
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

impl PromoteArgs {
    pub fn inputs(&self) -> PromotionInputs {
        PromotionInputs {
            api_token: self.api_token.clone(),
            project_id: self.project_id.clone(),
            src_env_name: self.src_env_name.clone(),
            src_env_id: self.src_env_id.clone(),
            dest_env_name: self.dest_env_name.clone(),
            env_vars: self.env_vars.clone(),
            ignore_services: self.ignore_services.clone(),
            api_service_name: self.api_service_name.clone(),
            branch: self.branch.clone(),
            max_timeout: self.max_timeout.clone(),
        }
    }
}
