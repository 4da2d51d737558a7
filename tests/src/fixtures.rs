use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tempfile::TempDir;
use vpncheck_common::AddressFamily;
use vpncheck_common::config::ListLocation;
use vpncheck_core::{FetchError, HttpListSource, ListSource, RangeRegistry, RawList};

/// A pair of list files on disk, served through the real [`HttpListSource`].
pub struct ListFiles {
    dir: TempDir,
}

impl ListFiles {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("tempdir"),
        }
    }

    pub fn ipv4_path(&self) -> PathBuf {
        self.dir.path().join("ipv4.txt")
    }

    pub fn ipv6_path(&self) -> PathBuf {
        self.dir.path().join("ipv6.json")
    }

    pub fn write_ipv4(&self, lines: &[&str]) {
        std::fs::write(self.ipv4_path(), lines.join("\n")).expect("write ipv4 list");
    }

    pub fn write_ipv6(&self, entries: &[&str]) {
        let body = serde_json::json!({
            "name": "List of known VPN IPv6 ranges",
            "type": "cidr",
            "list": entries,
        });
        std::fs::write(self.ipv6_path(), body.to_string()).expect("write ipv6 list");
    }

    pub fn remove_ipv4(&self) {
        std::fs::remove_file(self.ipv4_path()).expect("remove ipv4 list");
    }

    pub fn source(&self) -> Arc<dyn ListSource> {
        let source = HttpListSource::new(
            ListLocation::File(self.ipv4_path()),
            ListLocation::File(self.ipv6_path()),
            Duration::from_secs(5),
        )
        .expect("file source");
        Arc::new(source)
    }

    pub fn registry(&self) -> RangeRegistry {
        RangeRegistry::new(self.source())
    }
}

/// Alternates between two complete lists on every fetch round.
///
/// Round `n` serves `even` when `n` is even and `odd` otherwise. Both families
/// advance together, once per IPv4 fetch.
pub struct AlternatingSource {
    round: AtomicUsize,
    even: Vec<String>,
    odd: Vec<String>,
}

impl AlternatingSource {
    pub fn new(even: &[&str], odd: &[&str]) -> Self {
        Self {
            round: AtomicUsize::new(0),
            even: even.iter().map(|s| s.to_string()).collect(),
            odd: odd.iter().map(|s| s.to_string()).collect(),
        }
    }
}

#[async_trait]
impl ListSource for AlternatingSource {
    async fn fetch(&self, family: AddressFamily) -> Result<RawList, FetchError> {
        match family {
            AddressFamily::Ipv4 => {
                let round = self.round.fetch_add(1, Ordering::SeqCst);
                tokio::task::yield_now().await;
                let list = if round % 2 == 0 { &self.even } else { &self.odd };
                Ok(RawList::Entries(list.clone()))
            }
            AddressFamily::Ipv6 => Ok(RawList::Entries(vec!["2001:db8::/32".to_string()])),
        }
    }
}
