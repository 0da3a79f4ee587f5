use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use hostmap_common::mapping::{AddressSet, Mapping};
use hostmap_core::probe::Prober;
use hostmap_core::resolver::{Lookup, Resolver};

/// Answers from a fixed table; unknown addresses are unreachable.
pub struct ScriptedProber {
    verdicts: HashMap<String, bool>,
    pub calls: AtomicUsize,
}

impl ScriptedProber {
    pub fn new<I, S>(verdicts: I) -> Self
    where
        I: IntoIterator<Item = (S, bool)>,
        S: Into<String>,
    {
        Self {
            verdicts: verdicts.into_iter().map(|(addr, ok)| (addr.into(), ok)).collect(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn all_down() -> Self {
        Self::new(Vec::<(String, bool)>::new())
    }
}

#[async_trait]
impl Prober for ScriptedProber {
    async fn probe(&self, addr: &str) -> bool {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::task::yield_now().await;
        self.verdicts.get(addr).copied().unwrap_or(false)
    }
}

/// Answers lookups from a table and records which hosts were asked.
pub struct StaticResolver {
    answers: HashMap<String, Lookup>,
    pub asked: Mutex<Vec<String>>,
}

impl StaticResolver {
    pub fn new(answers: &[(&str, &[&str])]) -> Self {
        Self {
            answers: answers
                .iter()
                .map(|(host, addrs)| {
                    let found = addrs.iter().map(|a| a.to_string()).collect();
                    (host.to_string(), Lookup::Found(found))
                })
                .collect(),
            asked: Mutex::new(Vec::new()),
        }
    }

    pub fn with(mut self, host: &str, lookup: Lookup) -> Self {
        self.answers.insert(host.to_string(), lookup);
        self
    }
}

#[async_trait]
impl Resolver for StaticResolver {
    async fn lookup(&self, host: &str) -> Lookup {
        self.asked.lock().unwrap().push(host.to_string());
        tokio::task::yield_now().await;
        self.answers
            .get(host)
            .cloned()
            .unwrap_or_else(|| Lookup::Failed(format!("no answer scripted for {host}")))
    }
}

/// Builds a mapping from `(host, [(address, failures)])` entries.
pub fn mapping(entries: &[(&str, &[(&str, u32)])]) -> Mapping {
    entries
        .iter()
        .map(|(host, addrs)| {
            let set: AddressSet = addrs.iter().map(|(addr, n)| (addr.to_string(), *n)).collect();
            (host.to_string(), set)
        })
        .collect()
}

/// `n` hosts with one distinct address each: `host{i}.test -> 10.x.y.z`.
pub fn synthetic(n: usize) -> Mapping {
    (0..n)
        .map(|i| {
            let addr = format!("10.{}.{}.{}", (i >> 16) & 0xff, (i >> 8) & 0xff, i & 0xff);
            (format!("host{i}.test"), AddressSet::from([(addr, 0)]))
        })
        .collect()
}
