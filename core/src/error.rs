//! # Failure Taxonomy
//!
//! * Single bad CIDR lines never reach this module; they are counted and dropped
//!   while a range set is built. A list with no usable networks at all is not an
//!   error either: it installs as an empty set.
//! * [`FetchError`] is one family's source failing. It travels exactly one level up,
//!   into the registry, and comes out wrapped in a [`FamilyFailure`].
//! * [`RefreshError`] aggregates those per-family failures and tells partial success
//!   apart from total failure.
//! * [`LookupError`] separates "bad input" from "list not loaded yet". Neither is
//!   ever collapsed into a plain `false`.

use std::fmt;

use thiserror::Error;
use vpncheck_common::{AddressError, AddressFamily};

use crate::registry::RefreshSummary;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to {location} failed: {message}")]
    Transport { location: String, message: String },
    #[error("{location} answered with HTTP {status}")]
    Status { location: String, status: u16 },
    #[error("could not read {location}: {source}")]
    Io {
        location: String,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed payload from {location}: {message}")]
    Payload { location: String, message: String },
}

/// One family's refresh that did not take effect.
#[derive(Debug)]
pub struct FamilyFailure {
    pub family: AddressFamily,
    pub error: FetchError,
}

impl fmt::Display for FamilyFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.family, self.error)
    }
}

#[derive(Debug, Error)]
pub enum RefreshError {
    /// At least one family was installed; the failed ones kept their previous list.
    #[error("refresh partially failed ({})", join(.failures))]
    Partial {
        summary: RefreshSummary,
        failures: Vec<FamilyFailure>,
    },
    /// Nothing was installed.
    #[error("refresh failed ({})", join(.failures))]
    Total { failures: Vec<FamilyFailure> },
}

impl RefreshError {
    pub fn failures(&self) -> &[FamilyFailure] {
        match self {
            RefreshError::Partial { failures, .. } | RefreshError::Total { failures } => failures,
        }
    }

    pub fn failed_families(&self) -> Vec<AddressFamily> {
        self.failures().iter().map(|f| f.family).collect()
    }

    /// The summary of what did get installed, if anything did.
    pub fn summary(&self) -> Option<&RefreshSummary> {
        match self {
            RefreshError::Partial { summary, .. } => Some(summary),
            RefreshError::Total { .. } => None,
        }
    }

    pub fn is_partial(&self) -> bool {
        matches!(self, RefreshError::Partial { .. })
    }
}

fn join(failures: &[FamilyFailure]) -> String {
    failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<String>>()
        .join("; ")
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    #[error(transparent)]
    InvalidAddress(#[from] AddressError),
    #[error("{family} VPN list not loaded")]
    NotReady { family: AddressFamily },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OverrideError {
    #[error("override entry cannot be empty")]
    Empty,
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
