//! # Range Sets
//!
//! A [`RangeSet`] is every network of one address family as it stood after a single
//! refresh. It is built once, off to the side, and never mutated afterwards; the
//! registry swaps whole sets in and out.

use tracing::{debug, trace};
use vpncheck_common::{Address, AddressFamily, Network};

#[derive(Debug, Clone)]
pub struct RangeSet {
    family: AddressFamily,
    networks: Vec<Network>,
    version: u64,
    skipped: usize,
}

impl RangeSet {
    /// The placeholder a registry starts with before any list has loaded.
    pub fn empty(family: AddressFamily) -> Self {
        Self {
            family,
            networks: Vec::new(),
            version: 0,
            skipped: 0,
        }
    }

    /// Parses raw list entries into a new set, returning it with the number of
    /// entries that were dropped.
    ///
    /// Blank entries are ignored outright. Entries that fail to parse, or that parse
    /// as the other family, are counted as skipped. Input order is preserved.
    pub fn build<I, S>(family: AddressFamily, entries: I, version: u64) -> (Self, usize)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut networks: Vec<Network> = Vec::new();
        let mut skipped: usize = 0;

        for entry in entries {
            let entry = entry.as_ref().trim();
            if entry.is_empty() {
                continue;
            }

            match Network::parse(entry) {
                Ok(network) if network.family() == family => networks.push(network),
                Ok(network) => {
                    trace!(%family, %network, "skipping network of the other family");
                    skipped += 1;
                }
                Err(e) => {
                    trace!(%family, entry, "skipping unparsable entry: {e}");
                    skipped += 1;
                }
            }
        }

        debug!(%family, count = networks.len(), skipped, version, "built range set");

        let set = Self {
            family,
            networks,
            version,
            skipped,
        };
        (set, skipped)
    }

    pub fn family(&self) -> AddressFamily {
        self.family
    }

    pub fn len(&self) -> usize {
        self.networks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.networks.is_empty()
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn skipped(&self) -> usize {
        self.skipped
    }

    /// Scans networks in list order and stops at the first one containing `address`.
    pub fn contains(&self, address: &Address) -> bool {
        self.networks.iter().any(|network| network.contains(address))
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

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(s: &str) -> Address {
        Address::parse(s).unwrap()
    }

    #[test]
    fn empty_set() {
        let set = RangeSet::empty(AddressFamily::Ipv4);
        assert!(set.is_empty());
        assert_eq!(set.len(), 0);
        assert_eq!(set.version(), 0);
        assert!(!set.contains(&addr("10.0.0.1")));
    }

    #[test]
    fn build_skips_blank_and_bad_lines() {
        let lines = ["10.0.0.0/8", "", "   ", "garbage", "192.168.0.0/16", "1.2.3.4/40"];
        let (set, skipped) = RangeSet::build(AddressFamily::Ipv4, lines, 7);

        assert_eq!(set.len(), 2);
        assert_eq!(skipped, 2);
        assert_eq!(set.skipped(), 2);
        assert_eq!(set.version(), 7);

        let rendered: Vec<String> = set.networks.iter().map(ToString::to_string).collect();
        assert_eq!(rendered, vec!["10.0.0.0/8", "192.168.0.0/16"]);
    }

    #[test]
    fn build_drops_other_family() {
        let lines = vec![
            "2001:db8::/32".to_string(),
            "10.0.0.0/8".to_string(),
            "fd00::/8".to_string(),
        ];
        let (set, skipped) = RangeSet::build(AddressFamily::Ipv6, &lines, 1);
        assert_eq!(set.len(), 2);
        assert_eq!(skipped, 1);
        assert!(set.networks.iter().all(|n| n.family() == AddressFamily::Ipv6));
    }

    #[test]
    fn build_from_text_lines() {
        let text = "10.0.0.0/8\r\n172.16.0.0/12\n\n";
        let (set, skipped) = RangeSet::build(AddressFamily::Ipv4, text.lines(), 1);
        assert_eq!(set.len(), 2);
        assert_eq!(skipped, 0);
    }

    #[test]
    fn contains_scans_all_networks() {
        let (set, _) =
            RangeSet::build(AddressFamily::Ipv4, ["10.0.0.0/8", "203.0.113.0/24"], 1);
        assert!(set.contains(&addr("10.5.5.5")));
        assert!(set.contains(&addr("203.0.113.200")));
        assert!(!set.contains(&addr("11.0.0.0")));
        assert!(!set.contains(&addr("::1")));
    }
}
