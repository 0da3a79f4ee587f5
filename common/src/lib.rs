//! # Hostmap Common
//!
//! Shared data model for the hostmap workspace.
//!
//! * **[`mapping`]**: the persisted hostname to address set structure.
//! * **[`policy`]**: the retention, qualification and ordering knobs.
//! * **[`listing`]**: transient output rows and the hosts file emitter.
//! * **[`config`]**: runtime configuration shared by every command.
//! * **[`error`]**: error types for the file and process collaborators.

pub mod config;
pub mod error;
pub mod listing;
pub mod mapping;
pub mod policy;
