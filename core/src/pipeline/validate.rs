use std::sync::Arc;

use hostmap_common::config::Config;
use hostmap_common::listing::{Listing, ListingRow};
use hostmap_common::mapping::{FailureOutcome, Mapping};
use tracing::{debug, info};

use super::{ProgressFn, RunOutcome};
use crate::pool::WorkerPool;
use crate::probe::{CachedProber, Prober};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ValidateSummary {
    pub dispatched: usize,
    pub reconciled: usize,
    pub reachable: usize,
    pub unreachable: usize,
    pub evicted: usize,
    /// Distinct addresses actually dialled.
    pub probed: usize,
}

struct Probed {
    host: String,
    addr: String,
    reachable: bool,
}

/// Probes every `(host, address)` pair of `mapping` and applies the results.
///
/// A reachable address gets its failure count reset and a listing row; an
/// unreachable one is either evicted or has its count bumped, as decided by
/// `cfg.eviction` and `cfg.failure_threshold`. Verdicts are cached per address
/// for the duration of this call only.
pub async fn validate_hosts<P>(
    mapping: &mut Mapping,
    prober: P,
    cfg: &Config,
    on_progress: Option<ProgressFn>,
) -> RunOutcome<ValidateSummary>
where
    P: Prober + 'static,
{
    let pairs: Vec<(String, String)> = mapping.pairs();
    let prober: Arc<CachedProber<P>> = Arc::new(CachedProber::new(prober));
    let pool = WorkerPool::new(cfg.workers);
    info!(
        "Probing {} addresses of {} hosts with {} workers",
        pairs.len(),
        mapping.len(),
        pool.limit()
    );

    let mut listing = Listing::new();
    let mut summary = ValidateSummary::default();

    let worker_prober = Arc::clone(&prober);
    let report = pool
        .run(
            pairs,
            move |(host, addr): (String, String)| {
                let prober = Arc::clone(&worker_prober);
                async move {
                    let reachable = prober.probe(&addr).await;
                    Probed {
                        host,
                        addr,
                        reachable,
                    }
                }
            },
            |probed: Probed| {
                if probed.reachable {
                    mapping.record_success(&probed.host, &probed.addr);
                    listing.push(ListingRow::new(probed.addr, probed.host));
                    summary.reachable += 1;
                } else {
                    summary.unreachable += 1;
                    let outcome = mapping.record_failure(
                        &probed.host,
                        &probed.addr,
                        cfg.failure_threshold,
                        cfg.eviction,
                    );
                    match outcome {
                        FailureOutcome::Evicted => {
                            debug!("Evicted {} from {}", probed.addr, probed.host);
                            summary.evicted += 1;
                        }
                        FailureOutcome::Retained(failures) => {
                            debug!("{} of {} has failed {failures} times", probed.addr, probed.host);
                        }
                    }
                }

                summary.reconciled += 1;
                if let Some(callback) = &on_progress {
                    callback(summary.reconciled);
                }
            },
        )
        .await;

    summary.dispatched = report.dispatched;
    summary.probed = prober.cache().len();
    info!(
        "{} reachable, {} unreachable, {} evicted ({} distinct addresses probed)",
        summary.reachable, summary.unreachable, summary.evicted, summary.probed
    );

    RunOutcome { listing, summary }
}
