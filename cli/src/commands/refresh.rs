use std::sync::Arc;
use std::time::Instant;

use anyhow::Context;
use colored::*;
use tracing::warn;
use vpncheck_common::config::Config;
use vpncheck_core::{HttpListSource, RangeRegistry, RefreshError, RefreshSummary};

use crate::terminal::{print, spinner};

/// Builds a registry from `cfg` and loads it once.
///
/// A partial failure only warns; the family that loaded is still usable.
pub(crate) async fn load_registry(cfg: &Config) -> anyhow::Result<(RangeRegistry, RefreshSummary)> {
    let source = HttpListSource::from_config(cfg).context("Failed to build HTTP client")?;
    let registry = RangeRegistry::new(Arc::new(source)).with_overrides(&cfg.overrides);

    spinner::start("Fetching VPN range lists...", cfg.quiet);
    let outcome = registry.refresh().await;
    spinner::stop();

    match outcome {
        Ok(summary) => Ok((registry, summary)),
        Err(RefreshError::Partial { summary, failures }) => {
            for failure in &failures {
                warn!("Keeping previous list for {failure}");
            }
            Ok((registry, summary))
        }
        Err(e) => Err(e).context("Could not load any VPN range list"),
    }
}

pub async fn refresh(cfg: &Config) -> anyhow::Result<()> {
    let started = Instant::now();
    let (_, summary) = load_registry(cfg).await?;

    print::header("range lists", cfg.quiet);

    let ipv4 = summary.ipv4_count.to_string().green().bold();
    let ipv6 = summary.ipv6_count.to_string().green().bold();
    let skipped = summary.ipv4_skipped + summary.ipv6_skipped;
    let skipped = if skipped == 0 {
        skipped.to_string().normal()
    } else {
        skipped.to_string().yellow()
    };
    let updated = summary.updated_at.to_rfc3339().normal();
    let elapsed = format!("{:.2}s", started.elapsed().as_secs_f64()).yellow();

    print::tree_head(0, "IPv4 + IPv6");
    print::as_tree_one_level(&[
        ("ipv4", ipv4),
        ("ipv6", ipv6),
        ("skipped", skipped),
        ("updated", updated),
        ("took", elapsed),
    ]);
    print::end_of_program(cfg.quiet);

    Ok(())
}
