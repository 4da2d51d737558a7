pub mod check;
pub mod refresh;
pub mod serve;

use std::net::IpAddr;
use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use vpncheck_common::config::{
    Config, DEFAULT_FETCH_TIMEOUT, DEFAULT_IPV4_SOURCE, DEFAULT_IPV6_SOURCE,
    DEFAULT_REFRESH_INTERVAL, ListLocation,
};
use vpncheck_server::{DEFAULT_PORT, DEFAULT_STATS_PATH, ServerConfig};

#[derive(Parser)]
#[command(name = "vpncheck")]
#[command(about = "Tells whether an IP address belongs to a known VPN range.")]
#[command(version)]
pub struct CommandLine {
    #[command(subcommand)]
    pub command: Commands,

    /// Where to fetch the IPv4 list from (URL or file path)
    #[arg(long, global = true, env = "VPNCHECK_IPV4_SOURCE", default_value = DEFAULT_IPV4_SOURCE)]
    pub ipv4_source: ListLocation,

    /// Where to fetch the IPv6 list from (URL or file path)
    #[arg(long, global = true, env = "VPNCHECK_IPV6_SOURCE", default_value = DEFAULT_IPV6_SOURCE)]
    pub ipv6_source: ListLocation,

    /// Entries always reported as VPN (repeatable, comma separated in the env var)
    #[arg(
        long = "override",
        global = true,
        env = "VPNCHECK_OVERRIDES",
        value_delimiter = ','
    )]
    pub overrides: Option<Vec<String>>,

    /// Seconds between scheduled refreshes, 0 disables them
    #[arg(long, global = true, env = "VPNCHECK_REFRESH_INTERVAL", default_value_t = DEFAULT_REFRESH_INTERVAL.as_secs())]
    pub refresh_interval: u64,

    /// Seconds before a list download is abandoned
    #[arg(long, global = true, env = "VPNCHECK_FETCH_TIMEOUT", default_value_t = DEFAULT_FETCH_TIMEOUT.as_secs())]
    pub fetch_timeout: u64,

    /// Less output (-q hides headers, -qq only results and errors)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub quiet: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the HTTP service
    #[command(alias = "s")]
    Serve(ServeArgs),
    /// Classify one or more addresses
    #[command(alias = "c")]
    Check {
        #[arg(required = true)]
        addresses: Vec<String>,
    },
    /// Fetch both lists once and print a summary
    #[command(alias = "r")]
    Refresh,
}

#[derive(Args)]
pub struct ServeArgs {
    /// Address to listen on
    #[arg(long, env = "BIND", default_value = "0.0.0.0")]
    pub bind: IpAddr,

    #[arg(short, long, env = "PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// File the latest ping per server is saved to
    #[arg(long, env = "STATS_PATH", default_value = DEFAULT_STATS_PATH)]
    pub stats_path: PathBuf,

    /// Seconds between stats saves, 0 saves only on shutdown
    #[arg(long, env = "STATS_FLUSH_INTERVAL", default_value_t = 5)]
    pub stats_flush_interval: u64,
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    pub fn config(&self) -> Config {
        let defaults = Config::default();
        Config {
            ipv4_source: self.ipv4_source.clone(),
            ipv6_source: self.ipv6_source.clone(),
            overrides: match &self.overrides {
                Some(entries) => entries
                    .iter()
                    .map(|entry| entry.trim())
                    .filter(|entry| !entry.is_empty())
                    .map(str::to_string)
                    .collect(),
                None => defaults.overrides,
            },
            refresh_interval: Duration::from_secs(self.refresh_interval),
            fetch_timeout: Duration::from_secs(self.fetch_timeout),
            quiet: self.quiet,
        }
    }
}

impl ServeArgs {
    pub fn server_config(&self) -> ServerConfig {
        ServerConfig {
            bind: self.bind,
            port: self.port,
            stats_path: self.stats_path.clone(),
            stats_flush_interval: Duration::from_secs(self.stats_flush_interval),
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
