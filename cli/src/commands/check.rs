use colored::*;
use vpncheck_common::config::Config;
use vpncheck_core::{LookupError, RangeRegistry};

use super::refresh::load_registry;
use crate::terminal::print;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Verdict {
    Vpn,
    NotVpn,
    Invalid,
    Unknown,
}

impl Verdict {
    fn of(registry: &RangeRegistry, input: &str) -> Self {
        match registry.lookup(input) {
            Ok(true) => Verdict::Vpn,
            Ok(false) => Verdict::NotVpn,
            Err(LookupError::InvalidAddress(_)) => Verdict::Invalid,
            Err(LookupError::NotReady { .. }) => Verdict::Unknown,
        }
    }

    fn colored(self) -> ColoredString {
        match self {
            Verdict::Vpn => "VPN".red().bold(),
            Verdict::NotVpn => "not VPN".green(),
            Verdict::Invalid => "invalid".yellow(),
            Verdict::Unknown => "unknown (list not loaded)".bright_black(),
        }
    }
}

pub async fn check(addresses: &[String], cfg: &Config) -> anyhow::Result<()> {
    let (registry, _) = load_registry(cfg).await?;

    print::header("results", cfg.quiet);
    print::set_key_width(addresses.iter().map(String::as_str));

    for input in addresses {
        print::aligned_line(input, Verdict::of(&registry, input).colored());
    }

    print::end_of_program(cfg.quiet);
    Ok(())
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
