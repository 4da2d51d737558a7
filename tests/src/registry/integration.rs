use vpncheck_common::AddressFamily;
use vpncheck_core::{LookupError, RefreshError};

use crate::fixtures::ListFiles;

#[tokio::test]
async fn ipv4_scenario() {
    let files = ListFiles::new();
    files.write_ipv4(&["10.0.0.0/8"]);
    files.write_ipv6(&["2001:db8::/32"]);

    let registry = files.registry();
    registry.refresh().await.unwrap();

    assert_eq!(registry.lookup("10.5.5.5"), Ok(true));
    assert_eq!(registry.lookup("11.0.0.0"), Ok(false));
}

#[tokio::test]
async fn not_ready_before_first_refresh() {
    let files = ListFiles::new();
    let registry = files.registry();

    assert_eq!(
        registry.lookup("8.8.8.8"),
        Err(LookupError::NotReady {
            family: AddressFamily::Ipv4
        })
    );
    assert!(!registry.status().initialized);
}

#[tokio::test]
async fn override_suppresses_not_ready() {
    let files = ListFiles::new();
    let registry = files.registry();

    assert_eq!(registry.add_override("1.2.3.4"), Ok(true));
    assert_eq!(registry.lookup("1.2.3.4"), Ok(true));
}

#[tokio::test]
async fn invalid_input_leaves_state_alone() {
    let files = ListFiles::new();
    files.write_ipv4(&["10.0.0.0/8"]);
    files.write_ipv6(&["2001:db8::/32"]);

    let registry = files.registry();
    registry.refresh().await.unwrap();
    let before = registry.status();

    assert!(matches!(
        registry.lookup("not-an-ip"),
        Err(LookupError::InvalidAddress(_))
    ));
    assert_eq!(registry.status(), before);
}

#[tokio::test]
async fn ipv4_failure_keeps_previous_set() {
    let files = ListFiles::new();
    files.write_ipv4(&["10.0.0.0/8", "192.168.0.0/16"]);
    files.write_ipv6(&["2001:db8::/32"]);

    let registry = files.registry();
    registry.refresh().await.unwrap();
    let first_update = registry.status().last_updated;

    files.remove_ipv4();
    files.write_ipv6(&["2001:db8::/32", "fd00::/8"]);

    let err = registry.refresh().await.unwrap_err();
    assert!(err.is_partial());
    assert_eq!(err.failed_families(), vec![AddressFamily::Ipv4]);

    let summary = err.summary().unwrap();
    assert_eq!(summary.ipv4_count, 2);
    assert_eq!(summary.ipv6_count, 2);

    assert_eq!(registry.lookup("10.1.1.1"), Ok(true));
    assert_eq!(registry.lookup("192.168.1.1"), Ok(true));
    assert_eq!(registry.lookup("172.16.0.1"), Ok(false));
    assert_eq!(registry.lookup("fd00::1"), Ok(true));

    let status = registry.status();
    assert_eq!(status.range_counts.ipv4, 2);
    assert_eq!(status.range_counts.ipv6, 2);
    assert!(status.last_updated >= first_update);
}

#[tokio::test]
async fn ipv6_loads_when_ipv4_missing() {
    let files = ListFiles::new();
    files.write_ipv6(&["2001:db8::/32"]);

    let registry = files.registry();
    let err = registry.refresh().await.unwrap_err();
    assert!(matches!(err, RefreshError::Partial { .. }));

    let status = registry.status();
    assert!(status.initialized);
    assert_eq!(status.range_counts.ipv4, 0);
    assert_eq!(status.range_counts.ipv6, 1);

    assert_eq!(registry.lookup("2001:db8:1::1"), Ok(true));
    assert_eq!(
        registry.lookup("10.0.0.1"),
        Err(LookupError::NotReady {
            family: AddressFamily::Ipv4
        })
    );
}

#[tokio::test]
async fn total_failure_stays_uninitialized() {
    let files = ListFiles::new();
    let registry = files.registry();

    let err = registry.refresh().await.unwrap_err();
    assert!(matches!(err, RefreshError::Total { .. }));
    assert_eq!(err.failures().len(), 2);

    let status = registry.status();
    assert!(!status.initialized);
    assert_eq!(status.last_updated, None);
}

#[tokio::test]
async fn bad_lines_are_skipped() {
    let files = ListFiles::new();
    files.write_ipv4(&[
        "# comment",
        "10.0.0.5/24",
        "",
        "300.0.0.0/8",
        "172.16.0.0/33",
        "2001:db8::/32",
        "172.16.0.0/12",
    ]);
    files.write_ipv6(&["2001:db8::/32", "garbage"]);

    let registry = files.registry();
    let summary = registry.refresh().await.unwrap();

    assert_eq!(summary.ipv4_count, 2);
    assert_eq!(summary.ipv4_skipped, 4);
    assert_eq!(summary.ipv6_count, 1);
    assert_eq!(summary.ipv6_skipped, 1);

    // 10.0.0.5/24 is canonicalised to 10.0.0.0/24.
    assert_eq!(registry.lookup("10.0.0.200"), Ok(true));
    assert_eq!(registry.lookup("10.0.1.1"), Ok(false));
}

#[tokio::test]
async fn overrides_survive_refresh() {
    let files = ListFiles::new();
    files.write_ipv4(&["10.0.0.0/8"]);
    files.write_ipv6(&["2001:db8::/32"]);

    let registry = files.registry().with_overrides(["163.116.254.42"]);
    registry.add_override("8.8.8.8").unwrap();
    registry.refresh().await.unwrap();
    registry.refresh().await.unwrap();

    assert_eq!(
        registry.list_overrides(),
        vec!["163.116.254.42".to_string(), "8.8.8.8".to_string()]
    );
    assert_eq!(registry.lookup("8.8.8.8"), Ok(true));

    assert!(registry.remove_override("8.8.8.8"));
    assert!(!registry.remove_override("8.8.8.8"));
    assert_eq!(registry.lookup("8.8.8.8"), Ok(false));
}

#[tokio::test]
async fn empty_ipv6_list_still_refreshes() {
    let files = ListFiles::new();
    files.write_ipv4(&["10.0.0.0/8"]);
    files.write_ipv6(&[]);

    let registry = files.registry();
    let summary = registry.refresh().await.unwrap();
    assert_eq!(summary.ipv4_count, 1);
    assert_eq!(summary.ipv6_count, 0);

    assert!(registry.status().initialized);
    assert_eq!(registry.lookup("10.0.0.1"), Ok(true));
    assert_eq!(
        registry.lookup("2001:db8::1"),
        Err(LookupError::NotReady {
            family: AddressFamily::Ipv6
        })
    );
}
