//! Shared building blocks for `vpncheck`.
//!
//! Everything in here is pure: address family detection, literal address parsing,
//! CIDR parsing and containment, and the resolved runtime [`config::Config`].
//! Nothing in this crate performs IO.

pub mod config;
pub mod network;

pub use network::address::{Address, AddressError};
pub use network::cidr::{Network, ParseError};
pub use network::family::AddressFamily;
