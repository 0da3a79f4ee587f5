//! Reachability probing.
//!
//! A probe is a plain TCP connect with a timeout: an established connection means
//! the address is alive, anything else (refusal, timeout, unroutable) means it is
//! not. Verdicts are memoised per run in a [`ProbeCache`] so an address shared by
//! several hosts is only dialled once.

use std::future::Future;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

use async_trait::async_trait;
use dashmap::DashMap;
use hostmap_common::config::Config;
use tokio::net::TcpStream;
use tokio::time::timeout;
use tracing::{debug, warn};

#[async_trait]
pub trait Prober: Send + Sync {
    /// Returns `true` when `addr` accepted a connection.
    async fn probe(&self, addr: &str) -> bool;
}

#[derive(Debug, Clone, Copy)]
pub struct TcpProber {
    port: u16,
    timeout: Duration,
}

impl TcpProber {
    pub fn new(port: u16, timeout: Duration) -> Self {
        Self { port, timeout }
    }

    pub fn from_config(cfg: &Config) -> Self {
        Self::new(cfg.probe_port, cfg.probe_timeout)
    }
}

#[async_trait]
impl Prober for TcpProber {
    async fn probe(&self, addr: &str) -> bool {
        let ip: Ipv4Addr = match addr.parse() {
            Ok(ip) => ip,
            Err(e) => {
                warn!("{addr} is not an IPv4 address: {e}");
                return false;
            }
        };
        let socket_addr: SocketAddr = SocketAddr::new(IpAddr::V4(ip), self.port);

        match timeout(self.timeout, TcpStream::connect(socket_addr)).await {
            Ok(Ok(_stream)) => true,
            Ok(Err(e)) => {
                warn!("{socket_addr} {e}");
                false
            }
            Err(_elapsed) => {
                warn!("{socket_addr} timed out after {:?}", self.timeout);
                false
            }
        }
    }
}

/// Last known verdict per address, for the lifetime of one run.
///
/// Backed by a [`DashMap`], separate from the mapping. [`ProbeCache::get_or_probe`]
/// computes at least once per key, not exactly once: two callers that miss at the
/// same moment both probe and the later insert wins.
#[derive(Debug, Default)]
pub struct ProbeCache {
    verdicts: DashMap<String, bool>,
}

impl ProbeCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, addr: &str) -> Option<bool> {
        self.verdicts.get(addr).map(|verdict| *verdict)
    }

    pub fn insert(&self, addr: &str, reachable: bool) {
        self.verdicts.insert(addr.to_string(), reachable);
    }

    pub async fn get_or_probe<F, Fut>(&self, addr: &str, probe: F) -> bool
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = bool>,
    {
        if let Some(reachable) = self.get(addr) {
            debug!("{addr} answered from probe cache: {reachable}");
            return reachable;
        }

        let reachable = probe().await;
        self.insert(addr, reachable);
        reachable
    }

    pub fn len(&self) -> usize {
        self.verdicts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.verdicts.is_empty()
    }
}

/// A [`Prober`] that consults a [`ProbeCache`] before delegating.
pub struct CachedProber<P> {
    inner: P,
    cache: ProbeCache,
}

impl<P: Prober> CachedProber<P> {
    pub fn new(inner: P) -> Self {
        Self {
            inner,
            cache: ProbeCache::new(),
        }
    }

    pub fn cache(&self) -> &ProbeCache {
        &self.cache
    }
}

#[async_trait]
impl<P: Prober> Prober for CachedProber<P> {
    async fn probe(&self, addr: &str) -> bool {
        self.cache
            .get_or_probe(addr, || self.inner.probe(addr))
            .await
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
