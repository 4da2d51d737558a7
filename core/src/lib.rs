//! # vpncheck core
//!
//! Holds the live VPN range lists and answers "is this address a VPN?".
//!
//! * `ranges`: one immutable, versioned list of networks per address family.
//! * [`overrides`]: operator-maintained addresses that always classify as VPN.
//! * [`registry`]: owns both lists and the overrides, refreshes and serves lookups.
//! * [`source`]: the seam through which raw lists are fetched, plus the HTTP/file
//!   implementation used in production.
//! * [`error`]: the failure taxonomy shared by all of the above.

pub mod error;
pub mod overrides;
mod ranges;
pub mod registry;
pub mod source;

pub use error::{FamilyFailure, FetchError, LookupError, OverrideError, RefreshError};
pub use overrides::OverrideList;
pub use registry::{RangeCounts, RangeRegistry, RefreshSummary, RegistryStatus};
pub use source::{HttpListSource, ListFormat, ListSource, RawList};
