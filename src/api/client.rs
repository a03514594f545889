// ABOUTME: Authenticated GraphQL transport for the Railway public API.
// ABOUTME: One POST per operation; envelope errors become ApiError, nothing is retried.

use super::error::{
    ApiError, BuildSnafu, DecodeSnafu, HttpStatusSnafu, MissingDataSnafu, TransportSnafu,
    UnauthorizedSnafu,
};
use super::operations::Operation;
use crate::types::Secret;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use snafu::{OptionExt, ResultExt};
use std::time::Duration;

/// Railway's public GraphQL endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://backboard.railway.app/graphql/v2";

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Connection settings for [`RailwayClient`].
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub endpoint: String,
    pub token: Secret,
    pub request_timeout: Duration,
}

impl ClientConfig {
    pub fn new(token: Secret) -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            token,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}

/// Client for a single GraphQL endpoint, authenticated with a bearer token.
///
/// Cloning is cheap; clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct RailwayClient {
    http: reqwest::Client,
    endpoint: String,
    token: Secret,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Request<'a, V> {
    query: &'a str,
    operation_name: &'a str,
    variables: &'a V,
}

#[derive(Deserialize)]
struct Envelope {
    #[serde(default)]
    data: Option<serde_json::Value>,
    #[serde(default)]
    errors: Vec<GraphqlError>,
}

#[derive(Deserialize)]
struct GraphqlError {
    message: String,
}

impl RailwayClient {
    pub fn new(config: &ClientConfig) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .user_agent(concat!("railyard/", env!("CARGO_PKG_VERSION")))
            .build()
            .context(BuildSnafu)?;

        Ok(Self {
            http,
            endpoint: config.endpoint.clone(),
            token: config.token.clone(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Run one operation and decode its `data` into `R`.
    ///
    /// # Errors
    ///
    /// Fails on transport errors, HTTP 401/403, any other non-success status,
    /// a non-empty `errors` array, or `data` that does not decode into `R`.
    pub async fn call<V, R>(&self, operation: &Operation, variables: &V) -> Result<R, ApiError>
    where
        V: Serialize + Sync,
        R: DeserializeOwned,
    {
        tracing::debug!(operation = operation.name, "sending GraphQL request");

        let request = Request {
            query: operation.document,
            operation_name: operation.name,
            variables,
        };

        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(self.token.expose())
            .json(&request)
            .send()
            .await
            .context(TransportSnafu {
                operation: operation.name,
            })?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return UnauthorizedSnafu {
                operation: operation.name,
                status: status.as_u16(),
            }
            .fail();
        }

        let body = response.text().await.context(TransportSnafu {
            operation: operation.name,
        })?;

        if !status.is_success() {
            // GraphQL validation errors arrive as 400 with a normal envelope.
            if let Ok(envelope) = serde_json::from_str::<Envelope>(&body)
                && !envelope.errors.is_empty()
            {
                return Err(remote_error(operation.name, envelope.errors));
            }
            return HttpStatusSnafu {
                operation: operation.name,
                status: status.as_u16(),
                body,
            }
            .fail();
        }

        decode_envelope(operation.name, &body)
    }
}

fn remote_error(operation: &str, errors: Vec<GraphqlError>) -> ApiError {
    ApiError::Remote {
        operation: operation.to_string(),
        messages: errors.into_iter().map(|e| e.message).collect(),
    }
}

fn decode_envelope<R: DeserializeOwned>(operation: &str, body: &str) -> Result<R, ApiError> {
    let envelope: Envelope = serde_json::from_str(body).context(DecodeSnafu { operation })?;

    if !envelope.errors.is_empty() {
        return Err(remote_error(operation, envelope.errors));
    }

    let data = envelope
        .data
        .filter(|data| !data.is_null())
        .context(MissingDataSnafu { operation })?;

    serde_json::from_value(data).context(DecodeSnafu { operation })
}
