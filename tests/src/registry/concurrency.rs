use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use vpncheck_core::RangeRegistry;

use crate::fixtures::AlternatingSource;

const EVEN: &[&str] = &["10.0.0.0/8", "11.0.0.0/8", "12.0.0.0/8"];
const ODD: &[&str] = &[
    "172.16.0.0/12",
    "192.168.0.0/16",
    "100.64.0.0/10",
    "198.18.0.0/15",
];

fn first_host(cidr: &str) -> &str {
    cidr.split('/').next().unwrap_or(cidr)
}

/// Readers see one whole list or the other, and never "not loaded" mid refresh.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn lookups_never_see_a_mixed_set() {
    let source = Arc::new(AlternatingSource::new(EVEN, ODD));
    let registry = Arc::new(RangeRegistry::new(source));
    registry.refresh().await.unwrap();

    let done = Arc::new(AtomicBool::new(false));

    let mut readers = Vec::new();
    for _ in 0..4 {
        let registry = Arc::clone(&registry);
        let done = Arc::clone(&done);

        readers.push(tokio::spawn(async move {
            let mut observed = 0usize;
            while !done.load(Ordering::Acquire) {
                let count = registry.status().range_counts.ipv4;
                assert!(
                    count == EVEN.len() || count == ODD.len(),
                    "saw {count} IPv4 networks installed"
                );

                for host in EVEN.iter().chain(ODD).map(|c| first_host(c)) {
                    assert!(registry.lookup(host).is_ok(), "{host} not ready");
                }
                assert!(registry.lookup("8.8.8.8").is_ok());

                observed += 1;
                tokio::task::yield_now().await;
            }
            observed
        }));
    }

    for _ in 0..200 {
        registry.refresh().await.unwrap();
    }
    done.store(true, Ordering::Release);

    for reader in readers {
        assert!(reader.await.unwrap() > 0);
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_refreshes_are_serialised() {
    let source = Arc::new(AlternatingSource::new(EVEN, ODD));
    let registry = Arc::new(RangeRegistry::new(source));

    let mut handles = Vec::new();
    for _ in 0..16 {
        let registry = Arc::clone(&registry);
        handles.push(tokio::spawn(async move { registry.refresh().await }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    // Sixteen whole rounds: the last one installed was odd.
    assert_eq!(registry.status().range_counts.ipv4, ODD.len());
    for host in ODD.iter().map(|c| first_host(c)) {
        assert_eq!(registry.lookup(host), Ok(true));
    }
    for host in EVEN.iter().map(|c| first_host(c)) {
        assert_eq!(registry.lookup(host), Ok(false));
    }
}
