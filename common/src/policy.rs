//! # Run Policies
//!
//! The knobs that older and newer revisions of the tool disagree on. Each one is
//! a small `Copy` enum so commands can pick a variant from the command line and
//! tests can pin one down explicitly.
//!
//! * [`EvictionPolicy`]: when a failing address is dropped.
//! * [`AddressFilter`]: which resolved addresses are kept at all.
//! * [`SortKey`]: how hostnames are ordered in the listing.
//! * [`MissingHostPolicy`]: what happens to a host DNS no longer knows.

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

/// Comparison applied to an address's failure count when a probe fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EvictionPolicy {
    /// Evict once the count has reached the threshold (`failures >= threshold`).
    #[default]
    AtThreshold,
    /// Evict once the count has passed the threshold (`failures > threshold`).
    AboveThreshold,
}

impl EvictionPolicy {
    /// `failures` is the count recorded *before* the current failed probe.
    pub fn should_evict(self, failures: u32, threshold: u32) -> bool {
        match self {
            EvictionPolicy::AtThreshold => failures >= threshold,
            EvictionPolicy::AboveThreshold => failures > threshold,
        }
    }
}

/// Heuristic deciding whether a textual address is an IPv4 candidate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AddressFilter {
    /// Accept anything containing a `.`.
    #[default]
    ContainsDot,
    /// Accept anything shorter than 16 bytes, the longest dotted quad being 15.
    ShorterThan16,
}

impl AddressFilter {
    pub fn accepts(self, addr: &str) -> bool {
        match self {
            AddressFilter::ContainsDot => addr.contains('.'),
            AddressFilter::ShorterThan16 => !addr.is_empty() && addr.len() < 16,
        }
    }
}

/// Primary ordering of listing rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortKey {
    /// Plain byte-wise comparison of the hostname.
    Lexical,
    /// Compare hostnames with their labels reversed, grouping by TLD first.
    #[default]
    ReversedDomain,
}

impl SortKey {
    pub fn key<'a>(self, host: &'a str) -> Cow<'a, str> {
        match self {
            SortKey::Lexical => Cow::Borrowed(host),
            SortKey::ReversedDomain => Cow::Owned(reverse_domain(host)),
        }
    }
}

/// Reverses the dot separated labels of `host`: `a.b.com` becomes `com.b.a`.
pub fn reverse_domain(host: &str) -> String {
    host.rsplit('.').collect::<Vec<&str>>().join(".")
}

/// Treatment of a host whose lookup answers "no such host".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MissingHostPolicy {
    #[default]
    Keep,
    Remove,
}

impl FromStr for EvictionPolicy {
    type Err = String;

    /// Accepts `at` / `>=` and `above` / `>`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "at" | ">=" => Ok(EvictionPolicy::AtThreshold),
            "above" | ">" => Ok(EvictionPolicy::AboveThreshold),
            _ => Err(format!("invalid eviction policy: {s} (expected `at` or `above`)")),
        }
    }
}

impl FromStr for AddressFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "dot" => Ok(AddressFilter::ContainsDot),
            "short" => Ok(AddressFilter::ShorterThan16),
            _ => Err(format!("invalid address filter: {s} (expected `dot` or `short`)")),
        }
    }
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "lexical" => Ok(SortKey::Lexical),
            "reversed" => Ok(SortKey::ReversedDomain),
            _ => Err(format!("invalid sort key: {s} (expected `lexical` or `reversed`)")),
        }
    }
}

impl fmt::Display for EvictionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EvictionPolicy::AtThreshold => write!(f, ">="),
            EvictionPolicy::AboveThreshold => write!(f, ">"),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortKey::Lexical => write!(f, "lexical"),
            SortKey::ReversedDomain => write!(f, "reversed"),
        }
    }
}
