// ABOUTME: Idempotent rotation of the environment-scoped project token.
// ABOUTME: Deletes tokens holding the reserved name, then issues a fresh one.

use super::error::PromoteError;
use crate::api::{IssuedToken, TokenOps};
use crate::types::{EnvironmentId, ProjectId};

/// Replace the project token called `token_name` on `environment`.
///
/// Railway has no in-place token update, so rotation is delete-then-create.
/// Tokens are listed per project, which scopes the name to the project.
///
/// # Errors
///
/// `TokenBoundElsewhere` if a token with the reserved name is bound to a
/// different environment (or to the whole project). Nothing is deleted in
/// that case.
pub async fn rotate_token<A: TokenOps>(
    api: &A,
    project: &ProjectId,
    environment: &EnvironmentId,
    token_name: &str,
) -> Result<IssuedToken, PromoteError> {
    let tokens = api.list_project_tokens(project).await?;
    let named: Vec<_> = tokens.into_iter().filter(|t| t.name == token_name).collect();

    if let Some(foreign) = named
        .iter()
        .find(|t| t.environment_id.as_ref() != Some(environment))
    {
        return Err(PromoteError::TokenBoundElsewhere {
            name: token_name.to_string(),
            token_id: foreign.id.to_string(),
            bound_to: foreign.environment_id.clone(),
            expected: environment.clone(),
        });
    }

    if named.len() > 1 {
        tracing::warn!(
            token = token_name,
            count = named.len(),
            "several tokens share the reserved name; removing all of them"
        );
    }

    for stale in &named {
        tracing::info!(token = token_name, id = %stale.id, "deleting previous project token");
        api.delete_project_token(&stale.id).await?;
    }

    let token = api
        .create_project_token(project, environment, token_name)
        .await?;
    tracing::info!(token = token_name, environment = %environment, "issued project token");

    Ok(IssuedToken {
        name: token_name.to_string(),
        environment_id: environment.clone(),
        token,
    })
}
