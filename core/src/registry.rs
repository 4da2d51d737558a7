//! # Range Registry
//!
//! The single owner of the live IPv4 and IPv6 range sets, the last refresh time
//! and the [`OverrideList`].
//!
//! ## Lifecycle
//! * **Uninitialized**: no refresh has ever installed a list, `last_updated` is
//!   absent and lookups report [`LookupError::NotReady`].
//! * **Ready**: at least one refresh installed something. Every later refresh keeps
//!   the registry Ready, whether it succeeds or not.
//!
//! ## Concurrency
//! Each family's set lives behind an [`ArcSwap`]. A refresh builds the new set
//! completely before a single `store`, and a lookup `load`s the current set once and
//! works on that snapshot, so readers never block on a refresh and never see a
//! half-built list. Refreshes themselves are serialised by an async mutex; a second
//! caller waits for the first to finish and then runs its own refresh.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use arc_swap::ArcSwap;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{info, warn};
use vpncheck_common::{Address, AddressFamily};

use crate::error::{FamilyFailure, FetchError, LookupError, OverrideError, RefreshError};
use crate::overrides::OverrideList;
use crate::ranges::RangeSet;
use crate::source::ListSource;

/// What a refresh left installed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RefreshSummary {
    pub ipv4_count: usize,
    pub ipv6_count: usize,
    pub ipv4_skipped: usize,
    pub ipv6_skipped: usize,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RangeCounts {
    pub ipv4: usize,
    pub ipv6: usize,
    pub total: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegistryStatus {
    pub initialized: bool,
    pub last_updated: Option<DateTime<Utc>>,
    pub range_counts: RangeCounts,
}

pub struct RangeRegistry {
    source: Arc<dyn ListSource>,
    ipv4: ArcSwap<RangeSet>,
    ipv6: ArcSwap<RangeSet>,
    last_updated: RwLock<Option<DateTime<Utc>>>,
    overrides: OverrideList,
    generation: AtomicU64,
    refresh_lock: Mutex<()>,
}

impl std::fmt::Debug for RangeRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RangeRegistry")
            .field("status", &self.status())
            .field("overrides", &self.overrides.len())
            .finish()
    }
}

impl RangeRegistry {
    /// Creates an empty, uninitialized registry that will pull lists from `source`.
    pub fn new(source: Arc<dyn ListSource>) -> Self {
        Self {
            source,
            ipv4: ArcSwap::from_pointee(RangeSet::empty(AddressFamily::Ipv4)),
            ipv6: ArcSwap::from_pointee(RangeSet::empty(AddressFamily::Ipv6)),
            last_updated: RwLock::new(None),
            overrides: OverrideList::new(),
            generation: AtomicU64::new(0),
            refresh_lock: Mutex::new(()),
        }
    }

    /// Seeds the override list.
    pub fn with_overrides<I, S>(mut self, entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.overrides = OverrideList::with_entries(entries);
        self
    }

    fn slot(&self, family: AddressFamily) -> &ArcSwap<RangeSet> {
        match family {
            AddressFamily::Ipv4 => &self.ipv4,
            AddressFamily::Ipv6 => &self.ipv6,
        }
    }

    /// Re-fetches and rebuilds both families.
    ///
    /// Each family stands alone: one that fails keeps its previous set while the
    /// other is still installed. A fetched list with no usable networks installs an
    /// empty set, and lookups for that family report not ready until a later refresh
    /// brings networks back. `last_updated` moves whenever at least one family was
    /// installed.
    ///
    /// # Errors
    /// * [`RefreshError::Partial`] when one family failed, carrying the summary of
    ///   what is installed now.
    /// * [`RefreshError::Total`] when both failed; nothing changed.
    pub async fn refresh(&self) -> Result<RefreshSummary, RefreshError> {
        let _guard = self.refresh_lock.lock().await;

        let (ipv4, ipv6) = tokio::join!(
            self.load(AddressFamily::Ipv4),
            self.load(AddressFamily::Ipv6)
        );

        let mut failures: Vec<FamilyFailure> = Vec::new();
        for (family, outcome) in [(AddressFamily::Ipv4, ipv4), (AddressFamily::Ipv6, ipv6)] {
            match outcome {
                Ok(set) => {
                    info!(
                        %family,
                        count = set.len(),
                        skipped = set.skipped(),
                        version = set.version(),
                        "installed range list"
                    );
                    if set.is_empty() {
                        warn!(%family, "installed an empty range list, lookups will report not ready");
                    }
                    self.slot(set.family()).store(Arc::new(set));
                }
                Err(error) => {
                    warn!(%family, "keeping previous range list: {error}");
                    failures.push(FamilyFailure { family, error });
                }
            }
        }

        if failures.len() == AddressFamily::ALL.len() {
            return Err(RefreshError::Total { failures });
        }

        let updated_at = Utc::now();
        *self.last_updated.write() = Some(updated_at);

        let ipv4 = self.ipv4.load();
        let ipv6 = self.ipv6.load();
        let summary = RefreshSummary {
            ipv4_count: ipv4.len(),
            ipv6_count: ipv6.len(),
            ipv4_skipped: ipv4.skipped(),
            ipv6_skipped: ipv6.skipped(),
            updated_at,
        };

        if failures.is_empty() {
            Ok(summary)
        } else {
            Err(RefreshError::Partial { summary, failures })
        }
    }

    async fn load(&self, family: AddressFamily) -> Result<RangeSet, FetchError> {
        let raw = self.source.fetch(family).await?;
        let version = self.generation.fetch_add(1, Ordering::Relaxed) + 1;
        let (set, _) = RangeSet::build(family, raw.entries(), version);
        Ok(set)
    }

    /// Classifies `input` as VPN (`true`) or not (`false`).
    ///
    /// The input is validated first. An override hit answers `true` without looking
    /// at any range list, even one that has never loaded.
    ///
    /// # Errors
    /// * [`LookupError::InvalidAddress`] if `input` is not a literal IP address.
    /// * [`LookupError::NotReady`] if the list for the address's family is empty.
    pub fn lookup(&self, input: &str) -> Result<bool, LookupError> {
        let address = Address::parse(input)?;

        if self.overrides.contains(input) {
            return Ok(true);
        }

        let family = address.family();
        let set = self.slot(family).load();
        if set.is_empty() {
            return Err(LookupError::NotReady { family });
        }

        Ok(set.contains(&address))
    }

    pub fn status(&self) -> RegistryStatus {
        let last_updated = *self.last_updated.read();
        let ipv4 = self.ipv4.load().len();
        let ipv6 = self.ipv6.load().len();

        RegistryStatus {
            initialized: last_updated.is_some(),
            last_updated,
            range_counts: RangeCounts {
                ipv4,
                ipv6,
                total: ipv4 + ipv6,
            },
        }
    }

    #[cfg(test)]
    pub(crate) fn snapshot(&self, family: AddressFamily) -> Arc<RangeSet> {
        self.slot(family).load_full()
    }

    pub fn add_override(&self, entry: &str) -> Result<bool, OverrideError> {
        let added = self.overrides.add(entry)?;
        if added {
            info!(entry, "override added");
        }
        Ok(added)
    }

    pub fn remove_override(&self, entry: &str) -> bool {
        let removed = self.overrides.remove(entry);
        if removed {
            info!(entry, "override removed");
        }
        removed
    }

    pub fn list_overrides(&self) -> Vec<String> {
        self.overrides.list()
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
