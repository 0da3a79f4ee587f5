//! # Pipelines
//!
//! The two runs over a [`Mapping`]:
//!
//! * [`resolve`]: look every hostname up again and merge new addresses.
//! * [`validate`]: probe every known address and apply the failure counter.
//!
//! Both hand their work to a [`WorkerPool`](crate::pool::WorkerPool) and mutate
//! the mapping only from the pool's reconciliation step, which receives the
//! mapping by `&mut`. Nothing else can touch it while a run is in progress.
//!
//! [`Mapping`]: hostmap_common::mapping::Mapping

use hostmap_common::listing::Listing;

mod resolve;
mod validate;

pub use resolve::{ResolveSummary, resolve_hosts};
pub use validate::{ValidateSummary, validate_hosts};

/// Called after each reconciliation with the number of items reconciled so far.
pub type ProgressFn = Box<dyn Fn(usize) + Send + Sync>;

/// Rows collected by a run plus its counters.
#[derive(Debug, Clone)]
pub struct RunOutcome<S> {
    pub listing: Listing,
    pub summary: S,
}
