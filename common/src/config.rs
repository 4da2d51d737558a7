use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_IPV4_SOURCE: &str =
    "https://raw.githubusercontent.com/X4BNet/lists_vpn/main/ipv4.txt";
pub const DEFAULT_IPV6_SOURCE: &str =
    "https://raw.githubusercontent.com/MISP/misp-warninglists/main/lists/vpn-ipv6/list.json";
pub const DEFAULT_OVERRIDES: &[&str] = &["163.116.254.42"];
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(24 * 60 * 60);
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Where a raw range list is read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListLocation {
    /// Fetched over `http://` or `https://`.
    Url(String),
    /// Read from the local filesystem.
    File(PathBuf),
}

impl FromStr for ListLocation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err("list location cannot be empty".to_string());
        }

        let lower = s.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            Ok(ListLocation::Url(s.to_string()))
        } else {
            Ok(ListLocation::File(PathBuf::from(s)))
        }
    }
}

impl fmt::Display for ListLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ListLocation::Url(url) => f.write_str(url),
            ListLocation::File(path) => write!(f, "{}", path.display()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub ipv4_source: ListLocation,
    pub ipv6_source: ListLocation,
    /// Entries seeded into the override list at startup.
    pub overrides: Vec<String>,
    /// Zero disables periodic refreshing.
    pub refresh_interval: Duration,
    /// Upper bound on a single list fetch.
    pub fetch_timeout: Duration,
    /// Terminal verbosity; higher is quieter.
    pub quiet: u8,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ipv4_source: ListLocation::Url(DEFAULT_IPV4_SOURCE.to_string()),
            ipv6_source: ListLocation::Url(DEFAULT_IPV6_SOURCE.to_string()),
            overrides: DEFAULT_OVERRIDES.iter().map(|s| s.to_string()).collect(),
            refresh_interval: DEFAULT_REFRESH_INTERVAL,
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
            quiet: 0,
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
