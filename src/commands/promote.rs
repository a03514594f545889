// ABOUTME: Promote command implementation.
// ABOUTME: Drives the promotion state machine and publishes its outputs.

use railyard::api::RailwayClient;
use railyard::config::Settings;
use railyard::diagnostics::Diagnostics;
use railyard::error::Result;
use railyard::output::{HostOutputs, Output};
use railyard::promote::Promotion;

/// Create or reuse the preview environment and deploy the branch to it.
pub async fn promote(settings: Settings, host: &HostOutputs, mut output: Output) -> Result<()> {
    output.start_timer();
    let mut diag = Diagnostics::default();
    for note in settings.notes {
        diag.warn(note);
    }

    let config = &settings.promotion;
    let api = RailwayClient::new(&settings.client)?;

    output.progress(&format!(
        "Promoting {} into '{}' on branch {}",
        config.source, config.destination, config.branch
    ));

    output.progress("  → Resolving environment...");
    let promotion = Promotion::resolve(&api, config).await?;
    if promotion.created() {
        output.progress(&format!(
            "  → Created environment {} ({} service(s))",
            promotion.environment().id,
            promotion.environment().service_instances.len()
        ));
    } else {
        output.progress(&format!(
            "  → Reusing environment {}",
            promotion.environment().id
        ));
    }

    output.progress("  → Rotating project token and setting variables...");
    let promotion = promotion.configure(&api, config, &mut diag).await?;
    // The previous token is gone now; publish the new one before anything else can fail.
    let token = promotion.token().token.expose();
    host.mask(token);
    host.set("project_token", token)?;

    output.progress("  → Waiting for deployment to finish...");
    let promotion = promotion.await_settled(&api, config).await?;

    output.progress(&format!(
        "  → Pointing deployment triggers at {}...",
        config.branch
    ));
    let promotion = promotion.rebind_triggers(&api, config, &mut diag).await;

    output.progress("  → Redeploying services...");
    let promotion = promotion.redeploy(&api, config, &mut diag).await?;
    let report = promotion.finish();

    host.set(
        "service_domain",
        report.service_domain.as_deref().unwrap_or_default(),
    )?;

    for warning in diag.warnings() {
        output.warning(&warning.message);
    }

    match &report.service_domain {
        Some(domain) => output.success(&format!(
            "Environment '{}' ready at {domain}",
            report.environment_name
        )),
        None => output.success(&format!(
            "Environment '{}' ready",
            report.environment_name
        )),
    }
    Ok(())
}
