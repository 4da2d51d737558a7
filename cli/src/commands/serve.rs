use vpncheck_common::config::Config;
use vpncheck_server::{Server, ServerConfig};

pub async fn serve(cfg: Config, server: ServerConfig) -> anyhow::Result<()> {
    Server::builder()
        .config(cfg)
        .server_config(server)
        .build()
        .await?
        .run()
        .await
}
