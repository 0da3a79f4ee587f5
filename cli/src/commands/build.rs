use std::io;
use std::time::Instant;

use anyhow::Context;
use hostmap_common::config::Config;
use hostmap_core::pipeline::{self, RunOutcome, ValidateSummary};
use hostmap_core::probe::TcpProber;
use hostmap_core::store::{self, MappingStore};
use tracing::{Instrument, info, info_span};

use crate::terminal::{print, spinner};

pub async fn build(cfg: &Config) -> anyhow::Result<()> {
    let store = MappingStore::new(&cfg.data_file);
    let mut mapping = store.load()?;
    info!(
        "Loaded {} addresses for {} hosts from {}",
        mapping.address_count(),
        mapping.len(),
        store.path().display()
    );

    let span = info_span!("build", indicatif.pb_show = true);
    spinner::track(&span, mapping.address_count(), "Probing addresses");

    let start_time: Instant = Instant::now();
    let outcome: RunOutcome<ValidateSummary> = pipeline::validate_hosts(
        &mut mapping,
        TcpProber::from_config(cfg),
        cfg,
        Some(spinner::progress(&span)),
    )
    .instrument(span)
    .await;

    store
        .save(&mapping)
        .context("saving the validated mapping")?;

    let RunOutcome { mut listing, summary } = outcome;
    let mut stdout = io::stdout().lock();
    let body: String = listing.emit(cfg.sort_key, |line| print::row(&mut stdout, line));
    drop(stdout);

    store::write_listing(&cfg.hosts_file, &body).context("writing the hosts file")?;

    print::summary(
        "Build",
        &[
            ("Probed", summary.reconciled),
            ("Reachable", summary.reachable),
            ("Unreachable", summary.unreachable),
            ("Evicted", summary.evicted),
            ("Rows", listing.len()),
        ],
        start_time.elapsed(),
    );
    Ok(())
}
