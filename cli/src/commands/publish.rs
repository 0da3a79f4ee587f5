use anyhow::Context;
use hostmap_common::config::Config;
use hostmap_core::publish::{self, GitPublisher, Publisher, Snapshot};
use tracing::{debug, info};

/// Pushes the run's files when a credential is configured and the sample hits.
pub fn auto_publish(cfg: &Config, snapshot: &Snapshot<'_>) -> anyhow::Result<()> {
    let Some(publisher) = GitPublisher::from_env(&cfg.publish) else {
        debug!("Publishing skipped, ${} is not set", cfg.publish.credential_var);
        return Ok(());
    };

    if !publish::sampled(cfg.publish.sample) {
        info!("Publishing skipped this run (1 in {})", cfg.publish.sample);
        return Ok(());
    }

    publisher.publish(snapshot).context("publishing results")
}
