// ABOUTME: Rebinds deployment triggers to the preview branch.
// ABOUTME: Concurrent updates; triggers already on the branch are left alone.

use super::batch::{BatchOutcome, fan_out};
use crate::api::{DeploymentTrigger, TriggerOps};
use crate::types::TriggerId;

/// Point every trigger at `branch`.
///
/// Must only run once the environment's initial deployment has finished;
/// moving a trigger under an in-flight build detaches the build from it.
/// `Promotion<Settled>` is the only caller in the workflow.
pub async fn rebind_triggers<A: TriggerOps>(
    api: &A,
    triggers: &[DeploymentTrigger],
    branch: &str,
) -> BatchOutcome<TriggerId> {
    let (current, stale): (Vec<_>, Vec<_>) = triggers
        .iter()
        .partition(|t| t.branch.as_deref() == Some(branch));

    let skipped: Vec<TriggerId> = current.into_iter().map(|t| t.id.clone()).collect();
    let to_update: Vec<TriggerId> = stale.into_iter().map(|t| t.id.clone()).collect();

    tracing::info!(
        branch,
        updating = to_update.len(),
        already_bound = skipped.len(),
        "rebinding deployment triggers"
    );

    fan_out(to_update, |trigger| async move {
        api.update_trigger_branch(&trigger, branch).await
    })
    .await
    .with_skipped(skipped)
}
