use std::io;
use std::time::Instant;

use anyhow::Context;
use hostmap_common::config::Config;
use hostmap_core::pipeline::{self, ResolveSummary, RunOutcome};
use hostmap_core::publish::Snapshot;
use hostmap_core::resolver::SystemResolver;
use hostmap_core::store::MappingStore;
use tracing::{Instrument, info, info_span};

use crate::commands::publish;
use crate::terminal::{print, spinner};

pub async fn resolve(cfg: &Config) -> anyhow::Result<()> {
    let store = MappingStore::new(&cfg.data_file);
    let mut mapping = store.load()?;
    info!("Loaded {} hosts from {}", mapping.len(), store.path().display());

    let span = info_span!("resolve", indicatif.pb_show = true);
    spinner::track(&span, mapping.len(), "Resolving hosts");

    let start_time: Instant = Instant::now();
    let outcome: RunOutcome<ResolveSummary> = pipeline::resolve_hosts(
        &mut mapping,
        SystemResolver,
        cfg,
        Some(spinner::progress(&span)),
    )
    .instrument(span)
    .await;

    store
        .save(&mapping)
        .context("saving the refreshed mapping")?;

    let RunOutcome { mut listing, summary } = outcome;
    let mut stdout = io::stdout().lock();
    listing.emit(cfg.sort_key, |line| print::row(&mut stdout, line));
    drop(stdout);

    print::summary(
        "Resolve",
        &[
            ("Hosts", summary.reconciled),
            ("Resolved", summary.resolved),
            ("New", summary.merged),
            ("Missing", summary.missing),
            ("Removed", summary.removed),
            ("Failed", summary.failed),
        ],
        start_time.elapsed(),
    );

    publish::auto_publish(
        cfg,
        &Snapshot {
            mapping: &cfg.data_file,
            listing: None,
        },
    )
}
