//! # Host Mapping Model
//!
//! The persisted `hostname -> { address -> failures }` structure.
//!
//! A [`Mapping`] is owned by exactly one writer during a run. The pipelines hand
//! it by `&mut` to their reconciliation step, so every mutation below happens
//! from a single task.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::policy::EvictionPolicy;

/// Address to consecutive probe failure count, for one hostname.
pub type AddressSet = BTreeMap<String, u32>;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Mapping {
    hosts: BTreeMap<String, AddressSet>,
}

/// What a failed probe did to an address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureOutcome {
    /// The address stays, now with this many failures.
    Retained(u32),
    Evicted,
}

impl Mapping {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hosts(&self) -> Vec<String> {
        self.hosts.keys().cloned().collect()
    }

    /// Every `(host, address)` pair currently tracked.
    pub fn pairs(&self) -> Vec<(String, String)> {
        self.hosts
            .iter()
            .flat_map(|(host, addrs)| addrs.keys().map(move |addr| (host.clone(), addr.clone())))
            .collect()
    }

    pub fn addresses(&self, host: &str) -> Option<&AddressSet> {
        self.hosts.get(host)
    }

    pub fn failures(&self, host: &str, addr: &str) -> Option<u32> {
        self.hosts.get(host)?.get(addr).copied()
    }

    /// Creates an empty address set for `host` if it has none yet.
    pub fn insert_host(&mut self, host: &str) {
        if !self.hosts.contains_key(host) {
            self.hosts.insert(host.to_string(), AddressSet::new());
        }
    }

    /// Set-add: inserts `addr` with zero failures, leaving an existing count alone.
    ///
    /// Returns `true` when the address was not known for this host before.
    pub fn insert_address(&mut self, host: &str, addr: &str) -> bool {
        let addrs = self.hosts.entry(host.to_string()).or_default();
        if addrs.contains_key(addr) {
            return false;
        }
        addrs.insert(addr.to_string(), 0);
        true
    }

    /// Resets the failure count after a successful probe.
    pub fn record_success(&mut self, host: &str, addr: &str) {
        self.hosts
            .entry(host.to_string())
            .or_default()
            .insert(addr.to_string(), 0);
    }

    /// Applies one failed probe: evicts the address if `policy` says its current
    /// count has run out, otherwise bumps the count by one.
    pub fn record_failure(
        &mut self,
        host: &str,
        addr: &str,
        threshold: u32,
        policy: EvictionPolicy,
    ) -> FailureOutcome {
        let addrs = self.hosts.entry(host.to_string()).or_default();
        let failures = addrs.get(addr).copied().unwrap_or(0);

        if policy.should_evict(failures, threshold) {
            addrs.remove(addr);
            return FailureOutcome::Evicted;
        }

        let bumped = failures.saturating_add(1);
        addrs.insert(addr.to_string(), bumped);
        FailureOutcome::Retained(bumped)
    }

    pub fn remove_host(&mut self, host: &str) -> Option<AddressSet> {
        self.hosts.remove(host)
    }

    /// Number of hostnames.
    pub fn len(&self) -> usize {
        self.hosts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hosts.is_empty()
    }

    /// Number of tracked `(host, address)` pairs.
    pub fn address_count(&self) -> usize {
        self.hosts.values().map(BTreeMap::len).sum()
    }
}

impl FromIterator<(String, AddressSet)> for Mapping {
    fn from_iter<I: IntoIterator<Item = (String, AddressSet)>>(iter: I) -> Self {
        Self {
            hosts: iter.into_iter().collect(),
        }
    }
}
