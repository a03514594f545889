// ABOUTME: Error types for the Railway GraphQL client, using the SNAFU pattern.
// ABOUTME: Transport, auth, envelope, and decode failures share one type.

use snafu::Snafu;

/// Failure of a single GraphQL operation.
///
/// The client never retries; callers decide per operation whether an error is
/// fatal or only spoils one member of a batch.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum ApiError {
    #[snafu(display("failed to build HTTP client: {source}"))]
    Build { source: reqwest::Error },

    #[snafu(display("{operation}: request failed: {source}"))]
    Transport {
        operation: String,
        source: reqwest::Error,
    },

    #[snafu(display("{operation}: credentials rejected (HTTP {status})"))]
    Unauthorized { operation: String, status: u16 },

    #[snafu(display("{operation}: unexpected HTTP status {status}: {body}"))]
    HttpStatus {
        operation: String,
        status: u16,
        body: String,
    },

    #[snafu(display("{operation}: {}", messages.join("; ")))]
    Remote {
        operation: String,
        messages: Vec<String>,
    },

    #[snafu(display("{operation}: response contained no data"))]
    MissingData { operation: String },

    #[snafu(display("{operation}: malformed response: {source}"))]
    Decode {
        operation: String,
        source: serde_json::Error,
    },
}

/// Error kind for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorKind {
    /// Network, TLS, or HTTP-level failure.
    Transport,
    /// The API token was rejected.
    Unauthorized,
    /// The server answered with a GraphQL error payload.
    Remote,
    /// The response did not have the shape the operation expects.
    MalformedResponse,
}

impl ApiError {
    /// Shorthand for the error a remote GraphQL `errors` array produces.
    pub fn remote(operation: impl Into<String>, message: impl Into<String>) -> Self {
        ApiError::Remote {
            operation: operation.into(),
            messages: vec![message.into()],
        }
    }

    /// Returns the error kind for programmatic handling.
    pub fn kind(&self) -> ApiErrorKind {
        match self {
            ApiError::Build { .. } | ApiError::Transport { .. } | ApiError::HttpStatus { .. } => {
                ApiErrorKind::Transport
            }
            ApiError::Unauthorized { .. } => ApiErrorKind::Unauthorized,
            ApiError::Remote { .. } => ApiErrorKind::Remote,
            ApiError::MissingData { .. } | ApiError::Decode { .. } => {
                ApiErrorKind::MalformedResponse
            }
        }
    }

    /// Name of the GraphQL operation that failed, if one was in flight.
    pub fn operation(&self) -> Option<&str> {
        match self {
            ApiError::Build { .. } => None,
            ApiError::Transport { operation, .. }
            | ApiError::Unauthorized { operation, .. }
            | ApiError::HttpStatus { operation, .. }
            | ApiError::Remote { operation, .. }
            | ApiError::MissingData { operation }
            | ApiError::Decode { operation, .. } => Some(operation),
        }
    }
}
