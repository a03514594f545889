// ABOUTME: Environment-variable payload parsing and propagation to service instances.
// ABOUTME: One upsert per instance, all in flight at once, all awaited.

use super::batch::{BatchOutcome, fan_out};
use super::error::PromoteError;
use crate::api::{ServiceInstance, VariableOps};
use crate::types::{EnvironmentId, ProjectId, ServiceId};
use serde_json::Value;
use std::collections::BTreeMap;

/// Flat variable set parsed from a JSON object.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Variables(BTreeMap<String, String>);

impl Variables {
    /// Parse a JSON object of variable name to value.
    ///
    /// Blank input means no variables. Strings are taken verbatim, numbers
    /// and booleans are stringified. `null`, arrays, and nested objects are
    /// rejected so a malformed payload never half-applies.
    pub fn parse(raw: &str) -> Result<Self, PromoteError> {
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }

        let value: Value = serde_json::from_str(raw).map_err(|e| PromoteError::InvalidInput {
            input: "ENV_VARS",
            message: e.to_string(),
        })?;

        let Value::Object(object) = value else {
            return Err(PromoteError::InvalidInput {
                input: "ENV_VARS",
                message: "expected a JSON object of variable names to values".to_string(),
            });
        };

        let mut variables = BTreeMap::new();
        for (name, value) in object {
            let value = match value {
                Value::String(s) => s,
                Value::Number(n) => n.to_string(),
                Value::Bool(b) => b.to_string(),
                other => {
                    return Err(PromoteError::InvalidInput {
                        input: "ENV_VARS",
                        message: format!("variable '{name}' must be a string, number, or boolean, got {other}"),
                    });
                }
            };
            variables.insert(name, value);
        }

        Ok(Self(variables))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn as_map(&self) -> &BTreeMap<String, String> {
        &self.0
    }
}

impl FromIterator<(String, String)> for Variables {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Upsert `variables` on every service instance of the environment.
///
/// An empty variable set issues no calls. Re-upserting identical values is a
/// no-op on the platform, so a re-run after partial failure converges.
pub async fn propagate_variables<A: VariableOps>(
    api: &A,
    project: &ProjectId,
    environment: &EnvironmentId,
    instances: &[ServiceInstance],
    variables: &Variables,
) -> BatchOutcome<ServiceId> {
    if variables.is_empty() {
        tracing::debug!("no variables to propagate");
        return BatchOutcome::default();
    }

    let services: Vec<ServiceId> = instances.iter().map(|i| i.service_id.clone()).collect();
    tracing::info!(
        services = services.len(),
        variables = variables.len(),
        "propagating variables"
    );

    fan_out(services, |service| async move {
        api.upsert_variables(project, environment, &service, variables.as_map())
            .await
    })
    .await
}
