//! # Lookup Addresses
//!
//! A literal host address, validated and tagged with its [`AddressFamily`] before
//! it is allowed anywhere near a range list.

use std::fmt;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::str::FromStr;

use thiserror::Error;

use super::family::AddressFamily;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddressError {
    #[error("address is empty")]
    Empty,
    #[error("'{input}' is not a valid {family} address")]
    Malformed {
        input: String,
        family: AddressFamily,
    },
}

/// A single IPv4 or IPv6 host address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Address {
    V4(Ipv4Addr),
    V6(Ipv6Addr),
}

impl Address {
    /// Validates `text` as a literal address of the family its shape implies.
    ///
    /// Surrounding whitespace is ignored. Text containing a `:` must parse as
    /// IPv6, anything else must parse as dotted-quad IPv4.
    pub fn parse(text: &str) -> Result<Self, AddressError> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(AddressError::Empty);
        }

        let family = AddressFamily::detect(trimmed);
        let malformed = || AddressError::Malformed {
            input: trimmed.to_string(),
            family,
        };

        match family {
            AddressFamily::Ipv4 => trimmed
                .parse::<Ipv4Addr>()
                .map(Address::V4)
                .map_err(|_| malformed()),
            AddressFamily::Ipv6 => trimmed
                .parse::<Ipv6Addr>()
                .map(Address::V6)
                .map_err(|_| malformed()),
        }
    }

    pub fn family(&self) -> AddressFamily {
        match self {
            Address::V4(_) => AddressFamily::Ipv4,
            Address::V6(_) => AddressFamily::Ipv6,
        }
    }
}

impl From<IpAddr> for Address {
    fn from(ip: IpAddr) -> Self {
        match ip {
            IpAddr::V4(ipv4_addr) => Address::V4(ipv4_addr),
            IpAddr::V6(ipv6_addr) => Address::V6(ipv6_addr),
        }
    }
}

impl FromStr for Address {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Address::parse(s)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Address::V4(ipv4_addr) => ipv4_addr.fmt(f),
            Address::V6(ipv6_addr) => ipv6_addr.fmt(f),
        }
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
