use std::sync::Arc;

use hostmap_common::config::Config;
use hostmap_common::listing::{Listing, ListingRow};
use hostmap_common::mapping::Mapping;
use hostmap_common::policy::MissingHostPolicy;
use tracing::{debug, info, warn};

use super::{ProgressFn, RunOutcome};
use crate::pool::WorkerPool;
use crate::resolver::{Lookup, Resolver, qualified};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolveSummary {
    pub dispatched: usize,
    pub reconciled: usize,
    /// Hosts whose lookup returned addresses.
    pub resolved: usize,
    /// Addresses that were not in the mapping before this run.
    pub merged: usize,
    /// Hosts the resolver reported as nonexistent.
    pub missing: usize,
    /// Missing hosts dropped from the mapping.
    pub removed: usize,
    pub failed: usize,
}

/// Looks up every hostname in `mapping` and set-adds the qualifying answers.
///
/// Existing addresses keep their failure counts. Every qualifying address,
/// new or not, yields a listing row.
pub async fn resolve_hosts<R>(
    mapping: &mut Mapping,
    resolver: R,
    cfg: &Config,
    on_progress: Option<ProgressFn>,
) -> RunOutcome<ResolveSummary>
where
    R: Resolver + 'static,
{
    let hosts: Vec<String> = mapping.hosts();
    let resolver: Arc<R> = Arc::new(resolver);
    let pool = WorkerPool::new(cfg.workers);
    info!("Resolving {} hosts with {} workers", hosts.len(), pool.limit());

    let mut listing = Listing::new();
    let mut summary = ResolveSummary::default();

    let report = pool
        .run(
            hosts,
            move |host: String| {
                let resolver = Arc::clone(&resolver);
                async move {
                    let lookup = resolver.lookup(&host).await;
                    (host, lookup)
                }
            },
            |(host, lookup): (String, Lookup)| {
                match &lookup {
                    Lookup::Found(addrs) => {
                        summary.resolved += 1;
                        for addr in qualified(addrs, cfg.address_filter) {
                            if mapping.insert_address(&host, addr) {
                                debug!("New address {addr} for {host}");
                                summary.merged += 1;
                            }
                            listing.push(ListingRow::new(addr, host.as_str()));
                        }
                    }
                    Lookup::NoSuchHost => {
                        summary.missing += 1;
                        if cfg.missing_hosts == MissingHostPolicy::Remove {
                            warn!("Removing {host}, it no longer resolves");
                            mapping.remove_host(&host);
                            summary.removed += 1;
                        }
                    }
                    Lookup::Failed(_) => summary.failed += 1,
                }

                summary.reconciled += 1;
                if let Some(callback) = &on_progress {
                    callback(summary.reconciled);
                }
            },
        )
        .await;

    summary.dispatched = report.dispatched;
    info!(
        "{} hosts resolved, {} new addresses, {} missing, {} failed",
        summary.resolved, summary.merged, summary.missing, summary.failed
    );

    RunOutcome { listing, summary }
}
