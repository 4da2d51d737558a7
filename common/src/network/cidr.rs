//! # CIDR Networks
//!
//! Parsing of `address/prefix` notation and the prefix-masked containment test.
//!
//! A [`Network`] is always stored in canonical form: every bit of the base address
//! beyond the prefix is cleared, so `10.0.0.5/24` and `10.0.0.0/24` are the same
//! network. IPv4 networks are kept as `u32`, IPv6 networks as `u128`; the two never
//! compare against each other.

use std::fmt;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::str::FromStr;

use thiserror::Error;

use super::address::Address;
use super::family::AddressFamily;

/// Why a single CIDR entry was rejected.
///
/// Batch callers (range list builders) count these and move on; a bad line never
/// aborts the rest of the list.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("empty network entry")]
    Empty,
    #[error("'{input}' has no '/prefix' part")]
    MissingPrefix { input: String },
    #[error("'{input}' does not start with a valid {family} address")]
    InvalidAddress {
        input: String,
        family: AddressFamily,
    },
    #[error("'{input}' has a non-numeric prefix")]
    InvalidPrefix { input: String },
    #[error("prefix /{prefix} exceeds the {family} width of {}", .family.width())]
    PrefixOutOfRange { prefix: u32, family: AddressFamily },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Block {
    V4 { base: u32, prefix_len: u8 },
    V6 { base: u128, prefix_len: u8 },
}

/// A canonical CIDR block of one address family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Network(Block);

/// Netmask with the top `prefix_len` bits set. `prefix_len` must be `<= 32`.
pub fn ipv4_mask(prefix_len: u8) -> u32 {
    if prefix_len == 0 {
        0
    } else {
        u32::MAX << (32 - u32::from(prefix_len))
    }
}

/// Netmask with the top `prefix_len` bits set. `prefix_len` must be `<= 128`.
pub fn ipv6_mask(prefix_len: u8) -> u128 {
    if prefix_len == 0 {
        0
    } else {
        u128::MAX << (128 - u32::from(prefix_len))
    }
}

impl Network {
    /// Builds a network from an address and a prefix length, clearing host bits.
    pub fn new(ip: IpAddr, prefix_len: u8) -> Result<Self, ParseError> {
        let family = AddressFamily::of(&ip);
        if prefix_len > family.width() {
            return Err(ParseError::PrefixOutOfRange {
                prefix: u32::from(prefix_len),
                family,
            });
        }

        let block = match ip {
            IpAddr::V4(ipv4_addr) => Block::V4 {
                base: u32::from(ipv4_addr) & ipv4_mask(prefix_len),
                prefix_len,
            },
            IpAddr::V6(ipv6_addr) => Block::V6 {
                base: u128::from(ipv6_addr) & ipv6_mask(prefix_len),
                prefix_len,
            },
        };
        Ok(Network(block))
    }

    /// Parses `address/prefix` notation, e.g. `"192.168.1.0/24"` or `"2001:db8::/32"`.
    ///
    /// The family is decided by the presence of a `:` in the text, and the address
    /// part must then parse at exactly that family's width.
    pub fn parse(text: &str) -> Result<Self, ParseError> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(ParseError::Empty);
        }

        let family = AddressFamily::detect(trimmed);

        let Some((ip_str, prefix_str)) = trimmed.split_once('/') else {
            return Err(ParseError::MissingPrefix {
                input: trimmed.to_string(),
            });
        };

        let ip: IpAddr = match family {
            AddressFamily::Ipv4 => ip_str.parse::<Ipv4Addr>().map(IpAddr::V4).ok(),
            AddressFamily::Ipv6 => ip_str.parse::<Ipv6Addr>().map(IpAddr::V6).ok(),
        }
        .ok_or_else(|| ParseError::InvalidAddress {
            input: trimmed.to_string(),
            family,
        })?;

        let prefix = parse_prefix(prefix_str).ok_or_else(|| ParseError::InvalidPrefix {
            input: trimmed.to_string(),
        })?;

        if prefix > u32::from(family.width()) {
            return Err(ParseError::PrefixOutOfRange { prefix, family });
        }

        // Bounded by the width check above.
        let prefix_len = u8::try_from(prefix).map_err(|_| ParseError::PrefixOutOfRange {
            prefix,
            family,
        })?;

        Network::new(ip, prefix_len)
    }

    pub fn family(&self) -> AddressFamily {
        match self.0 {
            Block::V4 { .. } => AddressFamily::Ipv4,
            Block::V6 { .. } => AddressFamily::Ipv6,
        }
    }

    pub fn prefix_len(&self) -> u8 {
        match self.0 {
            Block::V4 { prefix_len, .. } | Block::V6 { prefix_len, .. } => prefix_len,
        }
    }

    /// The canonical (host bits cleared) network address.
    pub fn base_addr(&self) -> IpAddr {
        match self.0 {
            Block::V4 { base, .. } => IpAddr::V4(Ipv4Addr::from(base)),
            Block::V6 { base, .. } => IpAddr::V6(Ipv6Addr::from(base)),
        }
    }

    /// Returns `true` if `address` lies inside this network.
    ///
    /// Addresses of the other family never match, whatever the prefix.
    pub fn contains(&self, address: &Address) -> bool {
        if self.family() != address.family() {
            return false;
        }

        match (self.0, address) {
            (Block::V4 { base, prefix_len }, Address::V4(ipv4_addr)) => {
                u32::from(*ipv4_addr) & ipv4_mask(prefix_len) == base
            }
            (Block::V6 { base, prefix_len }, Address::V6(ipv6_addr)) => {
                u128::from(*ipv6_addr) & ipv6_mask(prefix_len) == base
            }
            _ => false,
        }
    }
}

/// Only plain decimal digits are accepted; `u32::from_str` alone would let `+24` through.
fn parse_prefix(s: &str) -> Option<u32> {
    if s.is_empty() || s.len() > 3 || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse::<u32>().ok()
}

impl FromStr for Network {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Network::parse(s)
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.base_addr(), self.prefix_len())
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
