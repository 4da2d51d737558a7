//! # vpncheck Server
//!
//! HTTP front end for the range registry: membership checks, manual overrides,
//! refresh triggers and the per-server ping statistics.
//!
//! ## Example
//! ```no_run
//! use vpncheck_server::{Server, ServerConfig};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     Server::builder()
//!         .server_config(ServerConfig::default())
//!         .build()
//!         .await?
//!         .run()
//!         .await
//! }
//! ```

mod error;
mod handlers;
mod router;
mod stats;
mod tasks;

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{error, info, warn};
use vpncheck_common::config::Config;
use vpncheck_core::{HttpListSource, ListSource, RangeRegistry};

pub use error::{ApiError, StatsError};
pub use router::init as build_router;
pub use stats::StatsStore;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_STATS_PATH: &str = "stats.json";
pub const DEFAULT_STATS_FLUSH_INTERVAL: Duration = Duration::from_secs(5);

/// Listener and persistence settings.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind: IpAddr,
    pub port: u16,
    pub stats_path: PathBuf,
    pub stats_flush_interval: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: DEFAULT_PORT,
            stats_path: PathBuf::from(DEFAULT_STATS_PATH),
            stats_flush_interval: DEFAULT_STATS_FLUSH_INTERVAL,
        }
    }
}

/// Shared handler state. Cheap to clone.
#[derive(Debug, Clone)]
pub struct AppState {
    pub registry: Arc<RangeRegistry>,
    pub stats: Arc<StatsStore>,
}

impl AppState {
    pub fn new(registry: Arc<RangeRegistry>, stats: Arc<StatsStore>) -> Self {
        Self { registry, stats }
    }
}

/// A fluent builder for configuring and initializing the [`Server`].
#[must_use = "builders do nothing unless you call .build()"]
#[derive(Default)]
pub struct ServerBuilder {
    cfg: Config,
    server: ServerConfig,
    source: Option<Arc<dyn ListSource>>,
}

impl ServerBuilder {
    pub fn config(mut self, cfg: Config) -> Self {
        self.cfg = cfg;
        self
    }

    pub fn server_config(mut self, server: ServerConfig) -> Self {
        self.server = server;
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.server.port = port;
        self
    }

    /// Replaces the HTTP list source built from the config.
    pub fn source(mut self, source: Arc<dyn ListSource>) -> Self {
        self.source = Some(source);
        self
    }

    /// Consumes the builder and initializes the server.
    ///
    /// # Process
    /// 1. Loads persisted ping statistics (a missing or broken file starts empty)
    /// 2. Fetches both range lists
    /// 3. Seeds the configured overrides
    ///
    /// # Errors
    /// Any refresh failure at startup is fatal, including a partial one.
    pub async fn build(self) -> Result<Server> {
        let source = match self.source {
            Some(source) => source,
            None => Arc::new(
                HttpListSource::from_config(&self.cfg).context("Failed to build HTTP client")?,
            ),
        };

        let stats = Arc::new(StatsStore::load(&self.server.stats_path));
        info!(
            servers = stats.len(),
            path = %self.server.stats_path.display(),
            "Loaded ping statistics"
        );

        let registry =
            Arc::new(RangeRegistry::new(source).with_overrides(self.cfg.overrides.iter()));

        let summary = registry
            .refresh()
            .await
            .context("Failed to initialize VPN detector")?;
        info!(
            ipv4 = summary.ipv4_count,
            ipv6 = summary.ipv6_count,
            "VPN detector initialized"
        );

        Ok(Server {
            state: AppState::new(registry, stats),
            server: self.server,
            refresh_interval: self.cfg.refresh_interval,
        })
    }
}

/// A fully initialized server instance ready to run.
#[must_use = "call .run().await to start the server"]
#[derive(Debug)]
pub struct Server {
    state: AppState,
    server: ServerConfig,
    refresh_interval: Duration,
}

impl Server {
    pub fn builder() -> ServerBuilder {
        ServerBuilder::default()
    }

    #[must_use]
    pub const fn state(&self) -> &AppState {
        &self.state
    }

    /// Starts the background tasks and serves until Ctrl+C or SIGTERM.
    ///
    /// Statistics are flushed one last time once the listener has drained.
    ///
    /// # Errors
    /// Returns an error if the listener cannot bind or the server fails.
    pub async fn run(self) -> Result<()> {
        let address = SocketAddr::new(self.server.bind, self.server.port);

        let refresh = if self.refresh_interval.is_zero() {
            warn!("Periodic refresh disabled");
            None
        } else {
            Some(tasks::spawn_refresh(
                Arc::clone(&self.state.registry),
                self.refresh_interval,
            ))
        };
        let flusher = if self.server.stats_flush_interval.is_zero() {
            None
        } else {
            Some(tasks::spawn_stats_flush(
                Arc::clone(&self.state.stats),
                self.server.stats_flush_interval,
            ))
        };

        let stats = Arc::clone(&self.state.stats);
        let app = router::init(self.state);

        let listener = TcpListener::bind(address)
            .await
            .with_context(|| format!("Failed to bind {address}"))?;
        info!("Starting HTTP server on http://{address}");

        axum::serve(listener, app)
            .with_graceful_shutdown(async {
                if let Err(e) = shutdown_signal().await {
                    error!("Error while waiting for shutdown signal: {e}");
                    return;
                }
                info!("Shutdown signal received, starting graceful shutdown...");
            })
            .await
            .context("HTTP server failed")?;

        for handle in [refresh, flusher].into_iter().flatten() {
            handle.abort();
        }

        match tokio::task::spawn_blocking(move || stats.flush()).await {
            Ok(Ok(true)) => info!("Ping statistics saved"),
            Ok(Ok(false)) => {}
            Ok(Err(e)) => error!("Failed to save ping statistics: {e}"),
            Err(e) => error!("Stats flush task failed: {e}"),
        }

        info!("Server shutdown complete");
        Ok(())
    }
}

/// Listens for shutdown signals (Ctrl+C, SIGTERM).
async fn shutdown_signal() -> Result<()> {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .context("Failed to install Ctrl+C handler")
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .context("Failed to install SIGTERM handler")?
            .recv()
            .await;
        Ok::<_, anyhow::Error>(())
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<Result<()>>();

    tokio::select! {
        res = ctrl_c => res?,
        res = terminate => res?,
    }

    Ok(())
}
