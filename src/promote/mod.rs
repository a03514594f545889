// ABOUTME: Environment promotion workflow using the type state pattern.
// ABOUTME: Exports the Promotion struct, its states, and each workflow component.

mod batch;
mod credentials;
mod error;
mod monitor;
mod promotion;
mod redeploy;
mod resolver;
mod state;
mod triggers;
mod variables;

pub use batch::{BatchOutcome, MemberFailure, fan_out};
pub use credentials::rotate_token;
pub use error::{PromoteError, PromoteErrorKind};
pub use monitor::{
    DEFAULT_MAX_TIMEOUT, DEFAULT_POLL_INTERVAL, DEFAULT_SETTLE_DELAY, DeploymentMonitor,
    MonitorState, MonitorTiming, Observation,
};
pub use promotion::{Promotion, PromotionFailure, PromotionReport, promote};
pub use redeploy::{
    DEFAULT_DOMAIN_FALLBACKS, DomainRules, DomainSelection, RedeployPlan, RedeployReport,
    coordinate_redeploys,
};
pub use resolver::{EnvironmentSource, Resolution, resolve_environment};
pub use state::{Completed, Configured, Rebound, Resolved, Settled};
pub use triggers::rebind_triggers;
pub use variables::{Variables, propagate_variables};
