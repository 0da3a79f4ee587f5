use std::collections::HashSet;
use std::time::Duration;

use hostmap_common::config::Config;
use hostmap_common::mapping::Mapping;
use hostmap_common::policy::{EvictionPolicy, SortKey};
use hostmap_core::pipeline::validate_hosts;
use hostmap_core::probe::TcpProber;
use tokio::net::TcpListener;

use crate::utils::{self, ScriptedProber};

fn threshold(n: u32, eviction: EvictionPolicy) -> Config {
    Config {
        failure_threshold: n,
        eviction,
        ..Config::default()
    }
}

#[tokio::test]
async fn failing_address_is_kept_at_threshold_then_evicted() {
    let cfg = threshold(3, EvictionPolicy::AtThreshold);
    let mut mapping = utils::mapping(&[("a.com", &[("1.1.1.1", 2)])]);

    validate_hosts(&mut mapping, ScriptedProber::all_down(), &cfg, None).await;
    assert_eq!(mapping, utils::mapping(&[("a.com", &[("1.1.1.1", 3)])]));

    validate_hosts(&mut mapping, ScriptedProber::all_down(), &cfg, None).await;
    assert_eq!(mapping, utils::mapping(&[("a.com", &[])]));
}

#[tokio::test]
async fn above_policy_needs_one_more_failure() {
    let cfg = threshold(3, EvictionPolicy::AboveThreshold);
    let mut mapping = utils::mapping(&[("a.com", &[("1.1.1.1", 2)])]);

    for expected in [3, 4] {
        validate_hosts(&mut mapping, ScriptedProber::all_down(), &cfg, None).await;
        assert_eq!(mapping.failures("a.com", "1.1.1.1"), Some(expected));
    }

    let outcome = validate_hosts(&mut mapping, ScriptedProber::all_down(), &cfg, None).await;
    assert_eq!(outcome.summary.evicted, 1);
    assert_eq!(mapping.failures("a.com", "1.1.1.1"), None);
}

#[tokio::test]
async fn counters_only_reset_or_step_by_one() {
    let cfg = threshold(10, EvictionPolicy::AtThreshold);
    let mut mapping = utils::mapping(&[
        ("a.com", &[("1.0.0.1", 0), ("1.0.0.2", 4)]),
        ("b.com", &[("2.0.0.1", 9), ("2.0.0.2", 1)]),
    ]);

    let rounds: [&[&str]; 4] = [&["1.0.0.1"], &["2.0.0.2"], &[], &["1.0.0.1", "1.0.0.2"]];
    for up in rounds {
        let before: Mapping = mapping.clone();
        let prober = ScriptedProber::new(up.iter().map(|addr| (*addr, true)));
        validate_hosts(&mut mapping, prober, &cfg, None).await;

        for (host, addr) in before.pairs() {
            let old = before.failures(&host, &addr).unwrap();
            match mapping.failures(&host, &addr) {
                Some(0) => assert!(up.contains(&addr.as_str()), "{addr} reset without success"),
                Some(new) => assert_eq!(new, old + 1, "{addr} moved from {old} to {new}"),
                None => assert!(old >= cfg.failure_threshold, "{addr} evicted early at {old}"),
            }
        }
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn thousand_pairs_with_eight_workers() {
    let cfg = Config {
        workers: 8,
        ..Config::default()
    };
    let mut mapping = utils::synthetic(1000);
    let up: Vec<(String, bool)> = mapping
        .pairs()
        .into_iter()
        .enumerate()
        .map(|(i, (_, addr))| (addr, i % 2 == 0))
        .collect();

    let outcome = validate_hosts(&mut mapping, ScriptedProber::new(up), &cfg, None).await;

    assert_eq!(outcome.summary.dispatched, 1000);
    assert_eq!(outcome.summary.reconciled, 1000);
    assert_eq!(outcome.summary.reachable, 500);
    assert_eq!(outcome.summary.unreachable, 500);
    assert_eq!(mapping.address_count(), 1000);

    let rows: HashSet<_> = outcome.listing.rows().iter().cloned().collect();
    assert_eq!(rows.len(), outcome.listing.len(), "duplicate listing rows");
    assert_eq!(rows.len(), 500);

    for row in outcome.listing.rows() {
        assert_eq!(mapping.failures(&row.host, &row.address), Some(0));
    }
    let failed: usize = mapping
        .pairs()
        .iter()
        .filter(|(host, addr)| mapping.failures(host, addr) == Some(1))
        .count();
    assert_eq!(failed, 500);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn shared_addresses_still_list_every_host() {
    let cfg = Config {
        workers: 8,
        ..Config::default()
    };
    let mut mapping = Mapping::new();
    for i in 0..200 {
        mapping.insert_address(&format!("site{i}.test"), &format!("192.0.2.{}", i % 20));
    }

    let prober = ScriptedProber::new((0..20).map(|i| (format!("192.0.2.{i}"), true)));
    let outcome = validate_hosts(&mut mapping, prober, &cfg, None).await;

    assert_eq!(outcome.listing.len(), 200);
    assert_eq!(outcome.summary.probed, 20);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn rendered_listing_is_stable_across_runs() {
    let cfg = Config {
        workers: 8,
        sort_key: SortKey::ReversedDomain,
        ..Config::default()
    };
    let base = utils::mapping(&[
        ("example.com", &[("93.184.216.1", 0)]),
        ("a.example.com", &[("1.2.3.4", 0)]),
        ("b.example.org", &[("5.6.7.8", 0), ("5.6.7.10", 0)]),
    ]);
    let up = [("93.184.216.1", true), ("1.2.3.4", true), ("5.6.7.8", true), ("5.6.7.10", true)];

    let mut bodies = Vec::new();
    for _ in 0..5 {
        let mut mapping = base.clone();
        let mut outcome = validate_hosts(&mut mapping, ScriptedProber::new(up), &cfg, None).await;
        bodies.push(outcome.listing.render(cfg.sort_key));
    }

    assert!(bodies.windows(2).all(|pair| pair[0] == pair[1]));
    assert_eq!(
        bodies[0],
        "93.184.216.1    example.com\n\
         1.2.3.4         a.example.com\n\
         5.6.7.10        b.example.org\n\
         5.6.7.8         b.example.org\n"
    );
}

#[tokio::test]
async fn tcp_prober_against_loopback() {
    let open = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = open.local_addr().unwrap().port();

    let cfg = Config {
        probe_port: port,
        probe_timeout: Duration::from_secs(1),
        ..Config::default()
    };
    let mut mapping = utils::mapping(&[("svc.local", &[("127.0.0.1", 2)]), ("bad.local", &[("not-an-ip", 0)])]);

    let outcome = validate_hosts(&mut mapping, TcpProber::from_config(&cfg), &cfg, None).await;

    assert_eq!(outcome.listing.clone().render(cfg.sort_key), "127.0.0.1       svc.local\n");
    assert_eq!(mapping.failures("svc.local", "127.0.0.1"), Some(0));
    assert_eq!(mapping.failures("bad.local", "not-an-ip"), Some(1));
}
