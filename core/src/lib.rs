//! # Hostmap Core
//!
//! The concurrent probe-and-reconcile engine and the file/process collaborators
//! around it.
//!
//! * **[`pool`]**: bounded fan-out/fan-in with a single reconciliation consumer.
//! * **[`probe`]**: TCP reachability checks and the per-run verdict cache.
//! * **[`resolver`]**: hostname lookups through the platform resolver.
//! * **[`pipeline`]**: the `resolve` and `build` runs over a [`Mapping`].
//! * **[`store`]**, **[`import`]**, **[`publish`]**: persistence, manual imports
//!   and pushing the results to a remote repository.
//!
//! [`Mapping`]: hostmap_common::mapping::Mapping

pub mod import;
pub mod pipeline;
pub mod pool;
pub mod probe;
pub mod publish;
pub mod resolver;
pub mod store;
