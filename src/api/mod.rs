// ABOUTME: Railway control-plane API: GraphQL transport, typed records, capability traits.
// ABOUTME: RailwayClient implements every capability; tests substitute an in-memory platform.

mod client;
mod error;
pub mod model;
pub mod operations;
mod railway;
pub mod traits;
mod wire;

pub use client::{ClientConfig, DEFAULT_ENDPOINT, DEFAULT_REQUEST_TIMEOUT, RailwayClient};
pub use error::{ApiError, ApiErrorKind};
pub use model::{
    Deployment, DeploymentStatus, DeploymentTrigger, Domain, Environment, IssuedToken,
    ProjectToken, Service, ServiceInstance,
};
pub use traits::{EnvironmentOps, PlatformApi, ServiceOps, TokenOps, TriggerOps, VariableOps};
