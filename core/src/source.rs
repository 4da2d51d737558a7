//! The **seam** between the registry and wherever range lists actually come from.
//!
//! The registry only ever calls [`ListSource::fetch`], once per family per refresh,
//! and treats every call as a fresh, independent attempt. Timeouts, transports and
//! payload decoding belong to the implementation; the registry adds no retries.

use async_trait::async_trait;
use vpncheck_common::AddressFamily;

use crate::error::FetchError;

mod http;

pub use http::HttpListSource;

/// Raw, unparsed list entries as delivered by a source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawList {
    /// Newline separated text.
    Text(String),
    /// Entries already split out of a structured payload.
    Entries(Vec<String>),
}

impl RawList {
    pub fn entries(&self) -> Vec<&str> {
        match self {
            RawList::Text(text) => text.lines().collect(),
            RawList::Entries(entries) => entries.iter().map(String::as_str).collect(),
        }
    }
}

/// How a source payload is laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListFormat {
    /// One CIDR per line.
    PlainText,
    /// A MISP warning list: `{"list": ["2001:db8::/32", ...]}`.
    MispJson,
}

impl ListFormat {
    /// The layout used by the default public list for each family.
    pub fn default_for(family: AddressFamily) -> Self {
        match family {
            AddressFamily::Ipv4 => ListFormat::PlainText,
            AddressFamily::Ipv6 => ListFormat::MispJson,
        }
    }
}

#[async_trait]
pub trait ListSource: Send + Sync {
    /// Fetches the raw list for `family`.
    async fn fetch(&self, family: AddressFamily) -> Result<RawList, FetchError>;
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
