//! # Network Primitives
//!
//! * [`family`]: IPv4/IPv6 classification of textual input.
//! * [`address`]: validated literal addresses used as lookup keys.
//! * [`cidr`]: `address/prefix` networks and the containment test.

pub mod address;
pub mod cidr;
pub mod family;
