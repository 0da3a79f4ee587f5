use std::io;

use async_trait::async_trait;
use hostmap_common::policy::AddressFilter;
use tokio::net::lookup_host;
use tracing::warn;

/// Answer to one hostname lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup {
    /// Textual addresses in resolver order, duplicates removed.
    Found(Vec<String>),
    /// The resolver says the name does not exist.
    NoSuchHost,
    /// Any other failure; the host simply yields nothing this run.
    Failed(String),
}

#[async_trait]
pub trait Resolver: Send + Sync {
    async fn lookup(&self, host: &str) -> Lookup;
}

/// Resolves through the platform resolver (`getaddrinfo`) via tokio.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemResolver;

#[async_trait]
impl Resolver for SystemResolver {
    async fn lookup(&self, host: &str) -> Lookup {
        match lookup_host((host, 0)).await {
            Ok(addrs) => {
                let mut found: Vec<String> = Vec::new();
                for addr in addrs {
                    let text = addr.ip().to_string();
                    if !found.contains(&text) {
                        found.push(text);
                    }
                }
                Lookup::Found(found)
            }
            Err(e) if is_no_such_host(&e) => {
                warn!("{host} {e}");
                Lookup::NoSuchHost
            }
            Err(e) => {
                warn!("{host} {e}");
                Lookup::Failed(e.to_string())
            }
        }
    }
}

/// Matches the "name does not exist" wording of the common libc resolvers.
fn is_no_such_host(err: &io::Error) -> bool {
    const MARKERS: &[&str] = &[
        "no such host",
        "name or service not known",
        "nodename nor servname provided",
        "no address associated with hostname",
    ];
    let text = err.to_string().to_ascii_lowercase();
    MARKERS.iter().any(|marker| text.contains(marker))
}

/// Addresses accepted by `filter`, first occurrence only.
pub fn qualified(addrs: &[String], filter: AddressFilter) -> Vec<&str> {
    let mut out: Vec<&str> = Vec::with_capacity(addrs.len());
    for addr in addrs {
        if filter.accepts(addr) && !out.contains(&addr.as_str()) {
            out.push(addr);
        }
    }
    out
}
