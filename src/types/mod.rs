// ABOUTME: Type-safe identifiers and validated domain types.
// ABOUTME: Uses phantom types to prevent ID confusion at compile time.

mod environment_name;
mod id;
mod secret;

pub use environment_name::{
    EnvironmentName, EnvironmentNameError, MAX_ENVIRONMENT_NAME_LEN, TOKEN_NAME_PREFIX,
};
pub use id::{
    DeploymentId, EnvironmentId, Id, ProjectId, ServiceId, ServiceInstanceId, TokenId, TriggerId,
};
pub use secret::Secret;
